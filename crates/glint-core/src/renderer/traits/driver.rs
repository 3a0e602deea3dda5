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


use crate::renderer::api::*;
use std::any::Any;
use std::fmt::Debug;

/// The handle-based driver surface the [`Context`](crate::Context) is built on.
///
/// This is the only place core code touches the graphics API. Implementations translate
/// the typed arguments into their own constants (see `glint-infra`). Methods take `&self`
/// because driver functions are reached through a shared, current context; the trait is
/// not `Send`/`Sync` since that context belongs to one thread.
///
/// Allocation methods return `None` when the driver produced the reserved zero name.
pub trait GlDriver: Debug {
    // --- Buffers ---

    /// Generates a buffer name.
    fn create_buffer(&self) -> Option<Handle>;

    /// Deletes a buffer.
    fn delete_buffer(&self, buffer: Handle);

    /// Binds `buffer` to `target`, or unbinds with `None`.
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Handle>);

    /// (Re)specifies the storage of the buffer bound to `target`.
    ///
    /// With `data`, its length equals `size`; without, the storage is uninitialized.
    fn buffer_data(&self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage);

    /// Copies `size` bytes from the `CopyRead` buffer to the `CopyWrite` buffer.
    fn copy_buffer_sub_data(&self, read_offset: usize, write_offset: usize, size: usize);

    // --- Textures ---

    /// Generates a texture name.
    fn create_texture(&self) -> Option<Handle>;

    /// Deletes a texture.
    fn delete_texture(&self, texture: Handle);

    /// Selects the texture unit subsequent texture binds apply to.
    fn active_texture(&self, unit: u32);

    /// Binds `texture` to `target` on the active unit.
    fn bind_texture(&self, target: TextureTarget, texture: Option<Handle>);

    /// Sets linear minification and magnification filtering on the bound texture.
    fn set_linear_filtering(&self, target: TextureTarget);

    /// Sets a pixel row alignment.
    fn pixel_store(&self, param: PixelStore, alignment: u32);

    /// Specifies level 0 of the bound single-sample texture.
    fn tex_image_2d(&self, format: TexelFormat, width: u32, height: u32, data: Option<&[u8]>);

    /// Specifies the storage of the bound multisample texture.
    fn tex_image_2d_multisample(&self, format: TexelFormat, width: u32, height: u32, samples: u32);

    /// Copies from the read framebuffer into level 0 of the bound texture.
    fn copy_tex_image_2d(&self, target: TextureTarget, format: TexelFormat, width: u32, height: u32);

    // --- Renderbuffers ---

    /// Generates a renderbuffer name.
    fn create_renderbuffer(&self) -> Option<Handle>;

    /// Deletes a renderbuffer.
    fn delete_renderbuffer(&self, renderbuffer: Handle);

    /// Binds a renderbuffer.
    fn bind_renderbuffer(&self, renderbuffer: Option<Handle>);

    /// Specifies the storage of the bound renderbuffer; `samples == 0` is single-sample.
    fn renderbuffer_storage(&self, format: TexelFormat, width: u32, height: u32, samples: u32);

    // --- Framebuffers ---

    /// Generates a framebuffer name.
    fn create_framebuffer(&self) -> Option<Handle>;

    /// Deletes a framebuffer.
    fn delete_framebuffer(&self, framebuffer: Handle);

    /// Binds a framebuffer; `None` is the default framebuffer.
    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<Handle>);

    /// Attaches level 0 of a texture to the bound framebuffer.
    fn attach_texture(&self, point: AttachmentPoint, target: TextureTarget, texture: Handle);

    /// Attaches a renderbuffer to the bound framebuffer.
    fn attach_renderbuffer(&self, point: AttachmentPoint, renderbuffer: Handle);

    /// Returns the raw completeness code of the bound framebuffer.
    fn check_framebuffer_status(&self) -> u32;

    /// Copies the `(0, 0, width, height)` region from the read to the draw framebuffer.
    fn blit_framebuffer(&self, width: i32, height: i32, mask: ClearMask);

    // --- Binding queries ---

    /// Returns the object currently bound at `point`.
    fn current_binding(&self, point: BindingPoint) -> Option<Handle>;

    // --- Shader collaborator ---

    /// Compiles one stage. The error carries the compiler log.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Handle, String>;

    /// Deletes a shader object.
    fn delete_shader(&self, shader: Handle);

    /// Links compiled shaders into a program, capturing `varyings` with transform
    /// feedback when non-empty. The error carries the linker log.
    fn link_program(&self, shaders: &[Handle], varyings: &[&str]) -> Result<Handle, String>;

    /// Deletes a program.
    fn delete_program(&self, program: Handle);

    /// Makes `program` current.
    fn use_program(&self, program: Option<Handle>);

    /// Reflects the active vertex inputs of a linked program.
    fn active_attributes(&self, program: Handle) -> Vec<ActiveAttribute>;

    // --- Vertex arrays ---

    /// Generates a vertex array name.
    fn create_vertex_array(&self) -> Option<Handle>;

    /// Deletes a vertex array.
    fn delete_vertex_array(&self, vertex_array: Handle);

    /// Binds a vertex array.
    fn bind_vertex_array(&self, vertex_array: Option<Handle>);

    /// Points a location of the bound vertex array into the bound array buffer.
    fn vertex_attrib_pointer(&self, pointer: &AttribPointer);

    /// Sets the instancing divisor of a location.
    fn vertex_attrib_divisor(&self, location: u32, divisor: u32);

    /// Enables a location of the bound vertex array.
    fn enable_vertex_attrib_array(&self, location: u32);

    // --- Fixed-function state ---

    /// Sets the clear color.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);

    /// Clears buffers of the bound draw framebuffer.
    fn clear(&self, mask: ClearMask);

    /// Enables a capability.
    fn enable(&self, flag: EnableFlag);

    /// Disables a capability.
    fn disable(&self, flag: EnableFlag);

    /// Returns whether a capability is enabled.
    fn is_enabled(&self, flag: EnableFlag) -> bool;

    /// Sets the scissor box.
    fn scissor(&self, rect: Viewport);

    /// Blocks until all submitted work has completed.
    fn finish(&self);

    /// Reads float state.
    fn get_float(&self, param: FloatParam) -> f32;

    /// Reads integer state.
    fn get_integer(&self, param: IntegerParam) -> i32;

    /// Reads an informational string.
    fn get_string(&self, name: StringName) -> Option<String>;

    /// Returns and clears the raw error flag.
    fn get_error(&self) -> u32;

    /// Sets the rasterized line width.
    fn set_line_width(&self, width: f32);

    /// Sets the rasterized point size.
    fn set_point_size(&self, size: f32);

    /// Reads the viewport.
    fn viewport(&self) -> Viewport;

    /// Sets the viewport.
    fn set_viewport(&self, viewport: Viewport);

    /// Sets the polygon rasterization mode for both faces.
    fn polygon_mode(&self, mode: PolygonMode);

    /// Sets the blend function.
    fn blend_func(&self, src: BlendFactor, dst: BlendFactor);

    /// Allows downcasting to the concrete driver.
    fn as_any(&self) -> &dyn Any;
}
