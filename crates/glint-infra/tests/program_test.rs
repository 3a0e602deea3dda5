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


use anyhow::Result;
use glint_core::renderer::api::*;
use glint_core::{Context, ContextSettings, ErrorKind, ResourceError, ShaderError};
use glint_infra::graphics::headless::ObjectKind;
use glint_infra::HeadlessDriver;

// --- Test Setup ---
const VERTEX: &str = "
#version 330 core
in vec3 in_vert;
in vec3 in_color;
in vec2 in_uv;
in mat4 in_model;
in uvec2 in_cell;
void main() { gl_Position = in_model * vec4(in_vert, 1.0); }
";

const FRAGMENT: &str = "
#version 330 core
out vec4 f_color;
void main() { f_color = vec4(1.0); }
";

fn context() -> Context {
    Context::new(Box::new(HeadlessDriver::new()), ContextSettings::default()).unwrap()
}

fn headless(context: &Context) -> &HeadlessDriver {
    context.driver().as_any().downcast_ref().unwrap()
}

fn program(context: &Context) -> Program {
    let vertex = context.vertex_shader(VERTEX).unwrap();
    let fragment = context.fragment_shader(FRAGMENT).unwrap();
    context.program(&[&vertex, &fragment], &[]).unwrap()
}
// ---

#[test]
fn test_program_reflects_vertex_inputs() {
    // ACT
    let context = context();
    let program = program(&context);

    // ASSERT
    let attributes = program.attributes();
    assert_eq!(attributes.len(), 5);
    let model = attributes.get("in_model").unwrap();
    assert_eq!(model.location, 3);
    assert_eq!(model.rows_length, 4);
    assert_eq!(model.scalars(), 16);
    assert_eq!(attributes.get("in_cell").unwrap().shape(), 'u');
    assert_eq!(program.stages(), [ShaderStage::Vertex, ShaderStage::Fragment]);
}

#[test]
fn test_program_rejects_two_shaders_for_one_stage() {
    // ARRANGE
    let context = context();
    let a = context.vertex_shader(VERTEX).unwrap();
    let b = context.vertex_shader(VERTEX).unwrap();

    // ACT
    let err = context.program(&[&a, &b], &[]).unwrap_err();

    // ASSERT
    assert_eq!(err, ResourceError::DuplicateSlot(ShaderStage::Vertex));
    assert_eq!(err.to_string(), "duplicate vertex_shader");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_compile_failure_carries_the_driver_log() {
    let context = context();

    let err = context
        .fragment_shader("#version 330 core\n#error nope\n")
        .unwrap_err();

    let ResourceError::Shader(ShaderError::CompilationFailed { stage, log }) = &err else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(*stage, ShaderStage::Fragment);
    assert!(log.starts_with("0:2:"));
    assert_eq!(err.kind(), ErrorKind::CompileOrLink);
}

#[test]
fn test_empty_source_is_rejected_before_compiling() {
    let context = context();

    let err = context.vertex_shader("   \n").unwrap_err();

    assert!(matches!(
        err,
        ResourceError::Shader(ShaderError::InvalidSource { .. })
    ));
    assert_eq!(headless(&context).live_objects(ObjectKind::Shader), 0);
}

#[test]
fn test_compute_stage_is_not_a_graphics_shader() {
    let context = context();

    let err = context.shader(ShaderStage::Compute, "void main() {}").unwrap_err();

    assert_eq!(err, ResourceError::StageMismatch(ShaderStage::Compute));
}

#[test]
fn test_compute_shader_links_its_own_program() -> Result<()> {
    // ARRANGE
    let context = context();

    // ACT
    let mut compute = context.compute_shader("#version 430\nvoid main() {}")?;
    let handles = compute.handles()?;

    // ASSERT
    assert_ne!(handles.program, handles.shader);
    context.release(&mut compute)?;
    assert!(!headless(&context).is_alive(handles.program));
    assert!(!headless(&context).is_alive(handles.shader));
    Ok(())
}

#[test]
fn test_transform_feedback_varyings_are_kept() -> Result<()> {
    let context = context();
    let vertex =
        context.vertex_shader("in vec3 in_vert;\nout vec3 v_out;\nvoid main() { v_out = in_vert; }")?;

    let program = context.program(&[&vertex], &["v_out"])?;
    let unknown = context.program(&[&vertex], &["missing"]).unwrap_err();

    assert_eq!(program.varyings(), ["v_out".to_owned()]);
    assert!(matches!(
        unknown,
        ResourceError::Shader(ShaderError::LinkFailed { .. })
    ));
    Ok(())
}

#[test]
fn test_vertex_array_counts_per_vertex_and_per_instance_buffers() -> Result<()> {
    // ARRANGE
    let context = context();
    let program = program(&context);
    // 10 vertices of position and color.
    let vertices = context.buffer(None, 10 * 24, false)?;
    // 3 instances of a model matrix.
    let instances = context.buffer(None, 3 * 64, false)?;

    // ACT
    let vertex_array = context.vertex_array(
        &program,
        &[
            VertexBufferBinding::new(&vertices, "3f 3f", &["in_vert", "in_color"]),
            VertexBufferBinding::new(&instances, "16f/i", &["in_model"]),
        ],
        None,
    )?;

    // ASSERT
    assert_eq!(vertex_array.vertices(), Some(10));
    let driver = headless(&context);
    let handle = vertex_array.handle()?;
    let pointers = driver.attrib_pointers(handle);
    assert_eq!(pointers.len(), 6);
    let model_rows: Vec<(u32, usize)> = pointers[2..]
        .iter()
        .map(|pointer| (pointer.location, pointer.offset))
        .collect();
    assert_eq!(model_rows, [(3, 0), (4, 16), (5, 32), (6, 48)]);
    assert_eq!(driver.attrib_divisor(handle, 3), Some(1));
    assert_eq!(driver.attrib_divisor(handle, 0), Some(0));
    assert_eq!(context.driver().current_binding(BindingPoint::VertexArray), None);
    assert_eq!(context.driver().current_binding(BindingPoint::Program), None);
    Ok(())
}

#[test]
fn test_vertex_array_with_index_buffer_counts_indices() -> Result<()> {
    let context = context();
    let program = program(&context);
    let vertices = context.buffer(None, 4 * 12, false)?;
    let indices = context.buffer(None, 6 * 4, false)?;

    let vertex_array = context.vertex_array(
        &program,
        &[VertexBufferBinding::new(&vertices, "3f", &["in_vert"])],
        Some(&indices),
    )?;

    assert_eq!(vertex_array.vertices(), Some(6));
    assert_eq!(vertex_array.index_buffer(), Some(indices.handle()?));
    Ok(())
}

#[test]
fn test_vertex_array_skips_padding_and_normalizes_only_floats() -> Result<()> {
    // ARRANGE
    let context = context();
    let program = program(&context);
    let buffer = context.buffer(None, 64, false)?;

    // ACT
    let vertex_array = context.vertex_array(
        &program,
        &[VertexBufferBinding::new(
            &buffer,
            "3f1 x 2u2",
            &["in_color", "in_cell"],
        )],
        None,
    )?;

    // ASSERT
    let pointers = headless(&context).attrib_pointers(vertex_array.handle()?);
    assert_eq!(pointers[0].kind, AttribPointerKind::Float { normalized: true });
    assert_eq!(pointers[0].scalar, ScalarType::U8);
    assert_eq!(pointers[1].kind, AttribPointerKind::Integer);
    assert_eq!(pointers[1].offset, 4);
    assert_eq!(pointers[1].stride, 8);
    assert_eq!(vertex_array.vertices(), Some(8));
    Ok(())
}

#[test]
fn test_vertex_array_reports_layout_mismatches() -> Result<()> {
    // ARRANGE
    let context = context();
    let program = program(&context);
    let buffer = context.buffer(None, 64, false)?;
    let message = |format: &str, attributes: &[&str]| {
        context
            .vertex_array(
                &program,
                &[VertexBufferBinding::new(&buffer, format, attributes)],
                None,
            )
            .unwrap_err()
            .to_string()
    };

    // ACT & ASSERT
    assert_eq!(
        message("3f 2f", &["in_vert"]),
        "content[0][1] and content[0][2] size mismatch 2 != 1"
    );
    assert_eq!(message("3f", &["in_nothing"]), "in_nothing is not a valid attribute");
    assert_eq!(message("2f", &["in_vert"]), "in_vert size is 3 not 2");
    assert_eq!(message("2i", &["in_uv"]), "in_uv shape is 'f' not 'i'");
    assert_eq!(message("3q", &["in_vert"]), "content[0][1] is an invalid format");
    assert_eq!(message("3f", &[]), "content[0][2] must not be empty");
    assert_eq!(
        message("3f/i", &["in_vert"]),
        "the first vertex attribute must not be a per instance attribute"
    );
    assert_eq!(
        context.vertex_array(&program, &[], None).unwrap_err().to_string(),
        "the content must not be empty"
    );
    assert_eq!(headless(&context).live_objects(ObjectKind::VertexArray), 0);
    Ok(())
}

#[test]
fn test_vertex_count_is_the_smallest_per_vertex_binding() -> Result<()> {
    // ARRANGE
    let context = context();
    let program = program(&context);
    let positions = context.buffer(None, 100 * 12, false)?;
    let colors = context.buffer(None, 80 * 12, false)?;
    let indices = context.buffer(None, 40, false)?;
    let content = [
        VertexBufferBinding::new(&positions, "3f", &["in_vert"]),
        VertexBufferBinding::new(&colors, "3f", &["in_color"]),
    ];

    // ACT
    let unindexed = context.vertex_array(&program, &content, None)?;
    let indexed = context.vertex_array(&program, &content, Some(&indices))?;

    // ASSERT
    assert_eq!(unindexed.vertices(), Some(80));
    assert_eq!(indexed.vertices(), Some(10));
    Ok(())
}
