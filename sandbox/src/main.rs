// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


// Glint Sandbox
// Drives a headless context through every kind of resource.

use std::mem;

use anyhow::{Context as _, Result};
use glint_core::renderer::api::*;
use glint_core::{Context, ContextSettings};
use glint_infra::HeadlessDriver;

const VERTEX_SHADER: &str = "
#version 330 core
in vec3 in_position;
in vec3 in_color;
in vec2 in_offset;
out vec3 v_color;
void main() {
    v_color = in_color;
    gl_Position = vec4(in_position.xy + in_offset, in_position.z, 1.0);
}
";

const FRAGMENT_SHADER: &str = "
#version 330 core
in vec3 v_color;
out vec4 f_color;
void main() { f_color = vec4(v_color, 1.0); }
";

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const VERTICES: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

const OFFSETS: &[[f32; 2]] = &[[-0.5, 0.0], [0.5, 0.0]];

const INDICES: &[u32] = &[0, 1, 2];

fn load_settings() -> Result<ContextSettings> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/glint.ron").to_owned());
    let settings =
        ContextSettings::load(&path).with_context(|| format!("loading settings from {path}"))?;
    log::info!("Loaded settings from {path}: {settings:?}");
    Ok(settings)
}

fn run(context: &Context) -> Result<()> {
    log::info!(
        "{} / {} / {} (version code {})",
        context.vendor()?,
        context.renderer()?,
        context.version()?,
        context.version_code()
    );

    // Geometry
    let vertices = context.buffer(Some(bytemuck::cast_slice(VERTICES)), 0, false)?;
    let offsets = context.buffer(Some(bytemuck::cast_slice(OFFSETS)), 0, false)?;
    let indices = context.buffer(Some(bytemuck::cast_slice(INDICES)), 0, false)?;
    let staging = context.buffer(None, mem::size_of_val(VERTICES), true)?;
    context.copy_buffer(&staging, &vertices, -1, 0, 0)?;

    // Program
    let vertex = context.vertex_shader(VERTEX_SHADER)?;
    let fragment = context.fragment_shader(FRAGMENT_SHADER)?;
    let program = context.program(&[&vertex, &fragment], &[])?;
    for attribute in program.attributes().iter() {
        log::info!(
            "Input '{}' at location {} ({} scalars)",
            attribute.name,
            attribute.location,
            attribute.scalars()
        );
    }

    let vertex_array = context.vertex_array(
        &program,
        &[
            VertexBufferBinding::new(&vertices, "3f 3f", &["in_position", "in_color"]),
            VertexBufferBinding::new(&offsets, "2f/i", &["in_offset"]),
        ],
        Some(&indices),
    )?;
    log::info!("Vertex array draws {:?} vertices", vertex_array.vertices());

    // Render targets
    let color = context.texture(
        &TextureDescriptor {
            label: Some("sandbox color".into()),
            ..TextureDescriptor::new((256, 256), 4)
        },
        None,
    )?;
    let mut offscreen = context.framebuffer(&[(&color).into()], None)?;
    let snapshot = context.texture(&TextureDescriptor::new((128, 128), 4), None)?;

    context.set_viewport((256, 256));
    context.clear(0.1, 0.1, 0.1, 1.0, None);
    context.clear(1.0, 1.0, 1.0, 1.0, Some(Viewport::from((64, 64, 128, 128))));
    context.copy_framebuffer(CopyTarget::Texture(&snapshot), &offscreen)?;
    context.copy_framebuffer(
        CopyTarget::Framebuffer(context.default_framebuffer()),
        &offscreen,
    )?;
    context.finish();

    let error = context.error();
    log::info!("Driver error flag: {error}");

    context.release(&mut offscreen)?;
    log::info!("Sandbox finished");
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let context = Context::new(Box::new(HeadlessDriver::new()), settings)?;
    run(&context)
}
