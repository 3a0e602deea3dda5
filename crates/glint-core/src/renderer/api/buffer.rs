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

//! Buffer objects.

use super::handle::{ContextId, GpuResource, Handle, ResourceState};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;

/// Largest buffer the driver can address; sizes and offsets travel as signed 32-bit.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// A block of driver-side memory holding vertex, index, or arbitrary data.
#[derive(Debug)]
pub struct Buffer {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) size: usize,
    pub(crate) dynamic: bool,
}

impl Buffer {
    /// Size in bytes. Always positive.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer was created with the dynamic usage hint.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// The driver handle, if the buffer is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }
}

impl GpuResource for Buffer {
    const KIND: &'static str = "buffer";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_buffer(handle);
            log::debug!("Released buffer {}", handle.get());
        }
    }
}
