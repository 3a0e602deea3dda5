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

//! Buffer copies, framebuffer copies, and clears.

use super::scope::{BindScope, ScissorScope};
use super::Context;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;

impl Context {
    /// Copies `size` bytes of `src` starting at `read_offset` into `dst` at
    /// `write_offset`.
    ///
    /// A negative `size` copies the rest of `src` from `read_offset`.
    pub fn copy_buffer(
        &self,
        dst: &Buffer,
        src: &Buffer,
        size: i64,
        read_offset: i64,
        write_offset: i64,
    ) -> Result<(), ResourceError> {
        self.ensure_owned(dst.context, || "the dst".to_owned())?;
        self.ensure_owned(src.context, || "the src".to_owned())?;

        let src_size = src.size() as i64;
        let size = if size < 0 { src_size.saturating_sub(read_offset) } else { size };

        if read_offset < 0 || write_offset < 0 {
            return Err(ResourceError::BufferUnderflow);
        }
        let past_end = |offset: i64, limit: i64| offset.checked_add(size).is_none_or(|end| end > limit);
        if size < 0 || past_end(read_offset, src_size) || past_end(write_offset, dst.size() as i64) {
            return Err(ResourceError::BufferOverflow);
        }

        let (src_handle, dst_handle) = (src.handle()?, dst.handle()?);

        self.driver.bind_buffer(BufferTarget::CopyRead, Some(src_handle));
        self.driver.bind_buffer(BufferTarget::CopyWrite, Some(dst_handle));
        self.driver
            .copy_buffer_sub_data(read_offset as usize, write_offset as usize, size as usize);

        log::debug!(
            "Copied {size} bytes from buffer {}@{read_offset} to buffer {}@{write_offset}",
            src_handle.get(),
            dst_handle.get()
        );
        Ok(())
    }

    /// Copies the overlapping `(0, 0, min width, min height)` region of `src` into `dst`.
    ///
    /// Framebuffer destinations receive color and depth. Texture destinations receive
    /// the read color buffer and must be single-sample.
    pub fn copy_framebuffer(&self, dst: CopyTarget<'_>, src: &Framebuffer) -> Result<(), ResourceError> {
        self.ensure_owned(src.context, || "the src".to_owned())?;
        let src_handle = src.handle()?;
        let (src_width, src_height) = src.size();

        match dst {
            CopyTarget::Framebuffer(dst) => {
                self.ensure_owned(dst.context, || "the dst".to_owned())?;
                let dst_handle = dst.handle()?;
                let (dst_width, dst_height) = dst.size();
                let width = i32::try_from(src_width.min(dst_width)).unwrap_or(i32::MAX);
                let height = i32::try_from(src_height.min(dst_height)).unwrap_or(i32::MAX);

                let mut scope = BindScope::new(self.driver());
                scope
                    .bind_framebuffer(FramebufferTarget::Read, src_handle)
                    .bind_framebuffer(FramebufferTarget::Draw, dst_handle);
                self.driver
                    .blit_framebuffer(width, height, ClearMask::COLOR_DEPTH);

                log::debug!("Blitted {width}x{height} between framebuffers");
            }
            CopyTarget::Texture(dst) => {
                self.ensure_owned(dst.context, || "the dst".to_owned())?;
                if dst.image.samples > 0 {
                    return Err(ResourceError::UnsupportedCopy(
                        "multisample textures cannot be copied into",
                    ));
                }
                if dst.image.depth {
                    return Err(ResourceError::UnsupportedCopy(
                        "depth textures cannot receive a color copy",
                    ));
                }
                let dst_handle = dst.handle()?;
                let (dst_width, dst_height) = dst.size();
                let width = src_width.min(dst_width);
                let height = src_height.min(dst_height);

                let target = TextureTarget::Texture2D;
                self.driver.active_texture(self.default_texture_unit.get());

                let mut scope = BindScope::new(self.driver());
                scope
                    .bind_framebuffer(FramebufferTarget::Read, src_handle)
                    .bind(target.into(), Some(dst_handle));
                self.driver
                    .copy_tex_image_2d(target, dst.image.format(), width, height);

                log::debug!(
                    "Copied {width}x{height} from a framebuffer into texture {}",
                    dst_handle.get()
                );
            }
        }
        Ok(())
    }

    /// Clears the bound framebuffer's color and depth.
    ///
    /// With a viewport, only that rectangle is cleared; scissoring is switched off again
    /// afterwards.
    pub fn clear(&self, r: f32, g: f32, b: f32, a: f32, viewport: Option<Viewport>) {
        self.driver.clear_color(r, g, b, a);

        let _scissor = viewport.map(|rect| ScissorScope::new(self.driver(), rect));
        self.driver.clear(ClearMask::COLOR_DEPTH);
    }

    /// Enables a capability.
    pub fn enable(&self, flag: EnableFlag) {
        self.driver.enable(flag);
    }

    /// Disables a capability.
    pub fn disable(&self, flag: EnableFlag) {
        self.driver.disable(flag);
    }

    /// Blocks until the driver has finished all submitted work.
    pub fn finish(&self) {
        self.driver.finish();
    }
}
