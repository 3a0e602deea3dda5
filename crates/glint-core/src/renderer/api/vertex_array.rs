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

//! Vertex arrays and the buffer bindings they are built from.

use super::buffer::Buffer;
use super::handle::{ContextId, GpuResource, Handle, ResourceState};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;

/// One vertex source: a buffer, its layout, and the program inputs it feeds.
///
/// `attributes` lists one input name per non-padding node of `format`, in order.
#[derive(Debug, Clone, Copy)]
pub struct VertexBufferBinding<'a> {
    /// The buffer holding the vertex data.
    pub buffer: &'a Buffer,
    /// Layout in the format mini-language, e.g. `"3f 2f"`.
    pub format: &'a str,
    /// Program input names, one per non-padding node.
    pub attributes: &'a [&'a str],
}

impl<'a> VertexBufferBinding<'a> {
    /// Bundles a buffer with its layout and input names.
    pub fn new(buffer: &'a Buffer, format: &'a str, attributes: &'a [&'a str]) -> Self {
        Self {
            buffer,
            format,
            attributes,
        }
    }
}

/// A program's vertex inputs wired to buffers.
#[derive(Debug)]
pub struct VertexArray {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) program: Handle,
    pub(crate) index_buffer: Option<Handle>,
    pub(crate) vertices: Option<usize>,
}

impl VertexArray {
    /// The driver handle, if the vertex array is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }

    /// Handle of the program the inputs were resolved against.
    pub fn program(&self) -> Handle {
        self.program
    }

    /// Handle of the index buffer, if any.
    pub fn index_buffer(&self) -> Option<Handle> {
        self.index_buffer
    }

    /// Vertices drawable from the bound buffers.
    ///
    /// `None` when nothing constrains the count (only per-instance bindings and no
    /// index buffer).
    pub fn vertices(&self) -> Option<usize> {
        self.vertices
    }
}

impl GpuResource for VertexArray {
    const KIND: &'static str = "vertex array";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_vertex_array(handle);
            log::debug!("Released vertex array {}", handle.get());
        }
    }
}
