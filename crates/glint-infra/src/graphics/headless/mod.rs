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

//! A software driver that needs no GPU.
//!
//! [`HeadlessDriver`] keeps driver objects in memory: it allocates handles, stores buffer
//! bytes, tracks bindings and enabled state, decides framebuffer completeness from what
//! was attached, and reflects vertex inputs out of shader sources.

mod driver;
mod reflection;

pub use self::driver::{HeadlessDriver, ObjectKind};
pub use self::reflection::{glsl_type_code, reflect_inputs};
