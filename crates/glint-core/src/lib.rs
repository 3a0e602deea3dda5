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

//! # Glint Core
//!
//! Foundational crate containing the driver contract, resource types, and the
//! validation rules that sit between user input and a handle-based graphics API.
//!
//! The [`context::Context`] is the entry point: it owns a [`renderer::GlDriver`]
//! and creates every buffer, texture, renderbuffer, framebuffer, shader, program
//! and vertex array, checking the cross-resource constraints the driver itself
//! does not check.

#![warn(missing_docs)]

pub mod context;
pub mod renderer;

pub use context::{Context, ContextSettings, SettingsError};
pub use renderer::{ErrorKind, GlDriver, ResourceError, ShaderError};
