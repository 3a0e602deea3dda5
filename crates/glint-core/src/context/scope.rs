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

//! Bind-and-restore guards.
//!
//! Every temporary bind the context performs goes through one of these guards, so the
//! previous driver state comes back on every exit path, `?` included.

use crate::renderer::api::{
    BindingPoint, BufferTarget, EnableFlag, FramebufferTarget, Handle, TextureTarget, Viewport,
};
use crate::renderer::traits::GlDriver;

/// Binds objects and restores what was bound before when dropped.
///
/// Restores run in reverse order of the binds.
pub(crate) struct BindScope<'d> {
    driver: &'d dyn GlDriver,
    saved: Vec<(BindingPoint, Option<Handle>)>,
}

impl<'d> BindScope<'d> {
    pub(crate) fn new(driver: &'d dyn GlDriver) -> Self {
        Self {
            driver,
            saved: Vec::with_capacity(2),
        }
    }

    /// Saves the binding at `point` without changing it.
    pub(crate) fn save(&mut self, point: BindingPoint) -> &mut Self {
        self.saved.push((point, self.driver.current_binding(point)));
        self
    }

    /// Saves the binding at `point`, then binds `handle` there.
    pub(crate) fn bind(&mut self, point: BindingPoint, handle: Option<Handle>) -> &mut Self {
        self.save(point);
        rebind(self.driver, point, handle);
        self
    }

    /// Binds a framebuffer; the combined target saves both read and draw bindings.
    pub(crate) fn bind_framebuffer(
        &mut self,
        target: FramebufferTarget,
        handle: Option<Handle>,
    ) -> &mut Self {
        match target {
            FramebufferTarget::Framebuffer => {
                self.saved.push((
                    BindingPoint::ReadFramebuffer,
                    self.driver.current_binding(BindingPoint::ReadFramebuffer),
                ));
                self.saved.push((
                    BindingPoint::DrawFramebuffer,
                    self.driver.current_binding(BindingPoint::DrawFramebuffer),
                ));
                self.driver.bind_framebuffer(target, handle);
                self
            }
            FramebufferTarget::Read => self.bind(BindingPoint::ReadFramebuffer, handle),
            FramebufferTarget::Draw => self.bind(BindingPoint::DrawFramebuffer, handle),
        }
    }
}

impl Drop for BindScope<'_> {
    fn drop(&mut self) {
        while let Some((point, handle)) = self.saved.pop() {
            rebind(self.driver, point, handle);
        }
    }
}

fn rebind(driver: &dyn GlDriver, point: BindingPoint, handle: Option<Handle>) {
    match point {
        BindingPoint::DrawFramebuffer => driver.bind_framebuffer(FramebufferTarget::Draw, handle),
        BindingPoint::ReadFramebuffer => driver.bind_framebuffer(FramebufferTarget::Read, handle),
        BindingPoint::ArrayBuffer => driver.bind_buffer(BufferTarget::Array, handle),
        BindingPoint::Texture2D => driver.bind_texture(TextureTarget::Texture2D, handle),
        BindingPoint::Texture2DMultisample => {
            driver.bind_texture(TextureTarget::Texture2DMultisample, handle)
        }
        BindingPoint::Renderbuffer => driver.bind_renderbuffer(handle),
        BindingPoint::VertexArray => driver.bind_vertex_array(handle),
        BindingPoint::Program => driver.use_program(handle),
    }
}

/// Enables scissoring to a rectangle; disables it again when dropped.
pub(crate) struct ScissorScope<'d> {
    driver: &'d dyn GlDriver,
}

impl<'d> ScissorScope<'d> {
    pub(crate) fn new(driver: &'d dyn GlDriver, rect: Viewport) -> Self {
        driver.enable(EnableFlag::ScissorTest);
        driver.scissor(rect);
        Self { driver }
    }
}

impl Drop for ScissorScope<'_> {
    fn drop(&mut self) {
        self.driver.disable(EnableFlag::ScissorTest);
    }
}
