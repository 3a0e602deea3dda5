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

//! # Glint Infra
//!
//! Concrete implementations of the [`GlDriver`](glint_core::GlDriver) contract:
//!
//! - [`graphics::opengl::GlowDriver`] talks to a real OpenGL 3.3+ context through `glow`.
//! - [`graphics::headless::HeadlessDriver`] simulates a driver in memory, for machines
//!   without a GPU and for tests.

#![warn(missing_docs)]

pub mod graphics;

#[cfg(feature = "headless")]
pub use graphics::headless::HeadlessDriver;
#[cfg(feature = "opengl")]
pub use graphics::opengl::GlowDriver;
