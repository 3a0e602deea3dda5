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

//! Driver handles, context identity tokens, and the live/released resource state.

use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, non-zero identifier returned by the driver for an allocated object.
///
/// The zero name is reserved by the driver for "no object" (for framebuffers: the
/// window surface), so it is represented as `Option<Handle>::None` wherever it can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Wraps a raw driver name. Returns `None` for the reserved zero name.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Wraps an already non-zero driver name.
    pub const fn from_non_zero(raw: NonZeroU32) -> Self {
        Self(raw)
    }

    /// Returns the raw driver name.
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the raw driver name as a `NonZeroU32`.
    pub const fn non_zero(self) -> NonZeroU32 {
        self.0
    }
}

/// Identity token of a [`Context`](crate::Context).
///
/// Every resource carries the token of the context that created it. Comparing tokens is
/// the only use: a resource never keeps its context alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    /// Allocates a process-unique token.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lifecycle of a driver-backed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState<H = Handle> {
    /// The driver object exists.
    Live(H),
    /// The driver object was deleted. The record is kept only for inspection.
    Released,
}

impl<H: Copy> ResourceState<H> {
    /// Returns the live handle, or [`ResourceError::Released`] naming the resource kind.
    pub fn live(&self, kind: &'static str) -> Result<H, ResourceError> {
        match self {
            ResourceState::Live(handle) => Ok(*handle),
            ResourceState::Released => Err(ResourceError::Released { kind }),
        }
    }

    /// Returns `true` while the driver object exists.
    pub fn is_live(&self) -> bool {
        matches!(self, ResourceState::Live(_))
    }

    /// Moves to `Released`, returning the handle if the resource was live.
    pub(crate) fn take(&mut self) -> Option<H> {
        match std::mem::replace(self, ResourceState::Released) {
            ResourceState::Live(handle) => Some(handle),
            ResourceState::Released => None,
        }
    }
}

/// A resource created by a [`Context`](crate::Context) that owns driver objects.
///
/// Release goes through [`Context::release`](crate::Context::release), which checks the
/// context identity before calling [`GpuResource::release_with`].
pub trait GpuResource {
    /// Human-readable kind, used in error messages and logs.
    const KIND: &'static str;

    /// The identity of the context that created this resource.
    fn context_id(&self) -> ContextId;

    /// Returns `true` while the driver object exists.
    fn is_live(&self) -> bool;

    /// Deletes the driver objects owned by this resource. Calling it on a released
    /// resource does nothing, so each driver delete is issued exactly once.
    fn release_with(&mut self, driver: &dyn GlDriver);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_handle() {
        assert!(Handle::new(0).is_none());
        assert_eq!(Handle::new(7).map(Handle::get), Some(7));
    }

    #[test]
    fn context_ids_are_unique() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn take_releases_once() {
        let mut state = ResourceState::Live(Handle::new(3).unwrap());
        assert_eq!(state.take().map(Handle::get), Some(3));
        assert_eq!(state.take(), None);
        assert!(matches!(
            state.live("buffer"),
            Err(ResourceError::Released { kind: "buffer" })
        ));
    }
}
