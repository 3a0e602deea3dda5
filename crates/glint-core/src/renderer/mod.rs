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

//! Provides the public, backend-agnostic contracts for driving a handle-based graphics API.
//!
//! This module defines the "common language" shared by the [`Context`](crate::Context)
//! and the concrete drivers: the [`GlDriver`] trait, the typed handles and enums it
//! speaks, the resource records the context hands out, and the error types.
//!
//! The 'how' lives in the `glint-infra` crate, which implements [`GlDriver`] on top of
//! `glow` and on top of a headless software driver.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{ErrorKind, ResourceError, ShaderError};
pub use self::traits::GlDriver;
