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

//! The OpenGL driver.

use super::conversions::{GlTexelFormat, IntoGl};
use anyhow::{bail, Result};
use glint_core::renderer::api::*;
use glint_core::GlDriver;
use glow::HasContext;
use std::any::Any;
use std::cell::Cell;

/// A [`GlDriver`] over a live OpenGL 3.3+ context, through `glow`.
#[derive(Debug)]
pub struct GlowDriver {
    gl: glow::Context,
    /// glow exposes no `glPointSize`; the value is tracked here.
    point_size: Cell<f32>,
}

impl GlowDriver {
    /// Wraps a loaded `glow` context.
    ///
    /// # Safety
    ///
    /// The GL context behind `gl` must be current on the calling thread, and stay current
    /// on that thread for as long as the driver is used.
    pub unsafe fn new(gl: glow::Context) -> Result<Self> {
        let version = gl.version();
        if !version.is_embedded && (version.major, version.minor) < (3, 3) {
            bail!(
                "OpenGL 3.3 or newer is required, the context provides {}.{}",
                version.major,
                version.minor
            );
        }
        log::info!(
            "Using OpenGL {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );

        Ok(Self {
            gl,
            point_size: Cell::new(1.0),
        })
    }

    /// Loads GL entry points with `loader` and wraps the resulting context.
    ///
    /// # Safety
    ///
    /// Same requirements as [`GlowDriver::new`]; `loader` must resolve entry points of
    /// that current context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }

    /// The underlying `glow` context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

fn to_handle<T>(
    created: Result<T, String>,
    raw: impl FnOnce(T) -> std::num::NonZeroU32,
    kind: &str,
) -> Option<Handle> {
    match created {
        Ok(object) => Some(Handle::from_non_zero(raw(object))),
        Err(err) => {
            log::error!("Failed to create {kind}: {err}");
            None
        }
    }
}

fn gl_int(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn buffer(handle: Handle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle.non_zero())
}

fn texture(handle: Handle) -> glow::NativeTexture {
    glow::NativeTexture(handle.non_zero())
}

fn renderbuffer(handle: Handle) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(handle.non_zero())
}

fn framebuffer(handle: Handle) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(handle.non_zero())
}

fn shader(handle: Handle) -> glow::NativeShader {
    glow::NativeShader(handle.non_zero())
}

fn program(handle: Handle) -> glow::NativeProgram {
    glow::NativeProgram(handle.non_zero())
}

fn vertex_array(handle: Handle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle.non_zero())
}

// SAFETY (whole impl): `GlowDriver::new` requires the context to be current on this
// thread, and `GlDriver` is not `Send`, so every call below reaches a current context.
impl GlDriver for GlowDriver {
    fn create_buffer(&self) -> Option<Handle> {
        to_handle(unsafe { self.gl.create_buffer() }, |b| b.0, "buffer")
    }

    fn delete_buffer(&self, handle: Handle) {
        unsafe { self.gl.delete_buffer(buffer(handle)) }
    }

    fn bind_buffer(&self, target: BufferTarget, handle: Option<Handle>) {
        unsafe { self.gl.bind_buffer(target.into_gl(), handle.map(buffer)) }
    }

    fn buffer_data(&self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        unsafe {
            match data {
                Some(data) => self
                    .gl
                    .buffer_data_u8_slice(target.into_gl(), data, usage.into_gl()),
                None => self
                    .gl
                    .buffer_data_size(target.into_gl(), gl_int(size), usage.into_gl()),
            }
        }
    }

    fn copy_buffer_sub_data(&self, read_offset: usize, write_offset: usize, size: usize) {
        unsafe {
            self.gl.copy_buffer_sub_data(
                glow::COPY_READ_BUFFER,
                glow::COPY_WRITE_BUFFER,
                gl_int(read_offset),
                gl_int(write_offset),
                gl_int(size),
            )
        }
    }

    fn create_texture(&self) -> Option<Handle> {
        to_handle(unsafe { self.gl.create_texture() }, |t| t.0, "texture")
    }

    fn delete_texture(&self, handle: Handle) {
        unsafe { self.gl.delete_texture(texture(handle)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: TextureTarget, handle: Option<Handle>) {
        unsafe { self.gl.bind_texture(target.into_gl(), handle.map(texture)) }
    }

    fn set_linear_filtering(&self, target: TextureTarget) {
        unsafe {
            self.gl
                .tex_parameter_i32(target.into_gl(), glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl
                .tex_parameter_i32(target.into_gl(), glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        }
    }

    fn pixel_store(&self, param: PixelStore, alignment: u32) {
        unsafe { self.gl.pixel_store_i32(param.into_gl(), alignment as i32) }
    }

    fn tex_image_2d(&self, format: TexelFormat, width: u32, height: u32, data: Option<&[u8]>) {
        let gl_format: GlTexelFormat = format.into_gl();
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_format.internal as i32,
                width as i32,
                height as i32,
                0,
                gl_format.format,
                gl_format.ty,
                glow::PixelUnpackData::Slice(data),
            )
        }
    }

    fn tex_image_2d_multisample(&self, format: TexelFormat, width: u32, height: u32, samples: u32) {
        let gl_format: GlTexelFormat = format.into_gl();
        unsafe {
            self.gl.tex_image_2d_multisample(
                glow::TEXTURE_2D_MULTISAMPLE,
                samples as i32,
                gl_format.internal as i32,
                width as i32,
                height as i32,
                true,
            )
        }
    }

    fn copy_tex_image_2d(&self, target: TextureTarget, format: TexelFormat, width: u32, height: u32) {
        let gl_format: GlTexelFormat = format.into_gl();
        unsafe {
            self.gl.copy_tex_image_2d(
                target.into_gl(),
                0,
                gl_format.format,
                0,
                0,
                width as i32,
                height as i32,
                0,
            )
        }
    }

    fn create_renderbuffer(&self) -> Option<Handle> {
        to_handle(unsafe { self.gl.create_renderbuffer() }, |r| r.0, "renderbuffer")
    }

    fn delete_renderbuffer(&self, handle: Handle) {
        unsafe { self.gl.delete_renderbuffer(renderbuffer(handle)) }
    }

    fn bind_renderbuffer(&self, handle: Option<Handle>) {
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, handle.map(renderbuffer)) }
    }

    fn renderbuffer_storage(&self, format: TexelFormat, width: u32, height: u32, samples: u32) {
        let gl_format: GlTexelFormat = format.into_gl();
        unsafe {
            if samples == 0 {
                self.gl.renderbuffer_storage(
                    glow::RENDERBUFFER,
                    gl_format.internal,
                    width as i32,
                    height as i32,
                );
            } else {
                self.gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER,
                    samples as i32,
                    gl_format.internal,
                    width as i32,
                    height as i32,
                );
            }
        }
    }

    fn create_framebuffer(&self) -> Option<Handle> {
        to_handle(unsafe { self.gl.create_framebuffer() }, |f| f.0, "framebuffer")
    }

    fn delete_framebuffer(&self, handle: Handle) {
        unsafe { self.gl.delete_framebuffer(framebuffer(handle)) }
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, handle: Option<Handle>) {
        unsafe { self.gl.bind_framebuffer(target.into_gl(), handle.map(framebuffer)) }
    }

    fn attach_texture(&self, point: AttachmentPoint, target: TextureTarget, handle: Handle) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                point.into_gl(),
                target.into_gl(),
                Some(texture(handle)),
                0,
            )
        }
    }

    fn attach_renderbuffer(&self, point: AttachmentPoint, handle: Handle) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                point.into_gl(),
                glow::RENDERBUFFER,
                Some(renderbuffer(handle)),
            )
        }
    }

    fn check_framebuffer_status(&self) -> u32 {
        unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) }
    }

    fn blit_framebuffer(&self, width: i32, height: i32, mask: ClearMask) {
        unsafe {
            self.gl.blit_framebuffer(
                0,
                0,
                width,
                height,
                0,
                0,
                width,
                height,
                mask.into_gl(),
                glow::NEAREST,
            )
        }
    }

    fn current_binding(&self, point: BindingPoint) -> Option<Handle> {
        let raw = unsafe { self.gl.get_parameter_i32(point.into_gl()) };
        u32::try_from(raw).ok().and_then(Handle::new)
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Handle, String> {
        unsafe {
            let object = self.gl.create_shader(stage.into_gl())?;
            self.gl.shader_source(object, source);
            self.gl.compile_shader(object);
            if !self.gl.get_shader_compile_status(object) {
                let log = self.gl.get_shader_info_log(object);
                self.gl.delete_shader(object);
                return Err(log);
            }
            Ok(Handle::from_non_zero(object.0))
        }
    }

    fn delete_shader(&self, handle: Handle) {
        unsafe { self.gl.delete_shader(shader(handle)) }
    }

    fn link_program(&self, shaders: &[Handle], varyings: &[&str]) -> Result<Handle, String> {
        unsafe {
            let object = self.gl.create_program()?;
            for &handle in shaders {
                self.gl.attach_shader(object, shader(handle));
            }
            if !varyings.is_empty() {
                self.gl
                    .transform_feedback_varyings(object, varyings, glow::INTERLEAVED_ATTRIBS);
            }
            self.gl.link_program(object);
            if !self.gl.get_program_link_status(object) {
                let log = self.gl.get_program_info_log(object);
                self.gl.delete_program(object);
                return Err(log);
            }
            Ok(Handle::from_non_zero(object.0))
        }
    }

    fn delete_program(&self, handle: Handle) {
        unsafe { self.gl.delete_program(program(handle)) }
    }

    fn use_program(&self, handle: Option<Handle>) {
        unsafe { self.gl.use_program(handle.map(program)) }
    }

    fn active_attributes(&self, handle: Handle) -> Vec<ActiveAttribute> {
        let object = program(handle);
        unsafe {
            (0..self.gl.get_active_attributes(object))
                .filter_map(|index| self.gl.get_active_attribute(object, index))
                .map(|attribute| ActiveAttribute {
                    location: self.gl.get_attrib_location(object, &attribute.name),
                    gl_type: attribute.atype,
                    size: u32::try_from(attribute.size).unwrap_or(1),
                    name: attribute.name,
                })
                .collect()
        }
    }

    fn create_vertex_array(&self) -> Option<Handle> {
        to_handle(unsafe { self.gl.create_vertex_array() }, |v| v.0, "vertex array")
    }

    fn delete_vertex_array(&self, handle: Handle) {
        unsafe { self.gl.delete_vertex_array(vertex_array(handle)) }
    }

    fn bind_vertex_array(&self, handle: Option<Handle>) {
        unsafe { self.gl.bind_vertex_array(handle.map(vertex_array)) }
    }

    fn vertex_attrib_pointer(&self, pointer: &AttribPointer) {
        let components = pointer.components as i32;
        let scalar = pointer.scalar.into_gl();
        let stride = gl_int(pointer.stride);
        let offset = gl_int(pointer.offset);
        unsafe {
            match pointer.kind {
                AttribPointerKind::Float { normalized } => self.gl.vertex_attrib_pointer_f32(
                    pointer.location,
                    components,
                    scalar,
                    normalized,
                    stride,
                    offset,
                ),
                AttribPointerKind::Integer => self.gl.vertex_attrib_pointer_i32(
                    pointer.location,
                    components,
                    scalar,
                    stride,
                    offset,
                ),
                AttribPointerKind::Double => self.gl.vertex_attrib_pointer_f64(
                    pointer.location,
                    components,
                    scalar,
                    stride,
                    offset,
                ),
            }
        }
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(location, divisor) }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(mask.into_gl()) }
    }

    fn enable(&self, flag: EnableFlag) {
        unsafe { self.gl.enable(flag.into_gl()) }
    }

    fn disable(&self, flag: EnableFlag) {
        unsafe { self.gl.disable(flag.into_gl()) }
    }

    fn is_enabled(&self, flag: EnableFlag) -> bool {
        unsafe { self.gl.is_enabled(flag.into_gl()) }
    }

    fn scissor(&self, rect: Viewport) {
        unsafe { self.gl.scissor(rect.x, rect.y, rect.width, rect.height) }
    }

    fn finish(&self) {
        unsafe { self.gl.finish() }
    }

    fn get_float(&self, param: FloatParam) -> f32 {
        match param {
            FloatParam::PointSize => self.point_size.get(),
            FloatParam::LineWidth => unsafe { self.gl.get_parameter_f32(param.into_gl()) },
        }
    }

    fn get_integer(&self, param: IntegerParam) -> i32 {
        unsafe { self.gl.get_parameter_i32(param.into_gl()) }
    }

    fn get_string(&self, name: StringName) -> Option<String> {
        let value = unsafe { self.gl.get_parameter_string(name.into_gl()) };
        (!value.is_empty()).then_some(value)
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn set_line_width(&self, width: f32) {
        unsafe { self.gl.line_width(width) }
    }

    fn set_point_size(&self, size: f32) {
        log::warn!("glow has no glPointSize; point size {size} is recorded but not applied");
        self.point_size.set(size);
    }

    fn viewport(&self) -> Viewport {
        let mut rect = [0i32; 4];
        unsafe { self.gl.get_parameter_i32_slice(glow::VIEWPORT, &mut rect) };
        Viewport::from((rect[0], rect[1], rect[2], rect[3]))
    }

    fn set_viewport(&self, rect: Viewport) {
        unsafe { self.gl.viewport(rect.x, rect.y, rect.width, rect.height) }
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode.into_gl()) }
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.blend_func(src.into_gl(), dst.into_gl()) }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
