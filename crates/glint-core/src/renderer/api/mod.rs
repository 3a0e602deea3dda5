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

//! The public, backend-agnostic vocabulary: handles, enums, resource records, and the
//! vertex layout and attribute reflection helpers.

pub mod attribute;
pub mod buffer;
pub mod enums;
pub mod format;
pub mod framebuffer;
pub mod handle;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use self::attribute::*;
pub use self::buffer::*;
pub use self::enums::*;
pub use self::format::*;
pub use self::framebuffer::*;
pub use self::handle::*;
pub use self::shader::*;
pub use self::texture::*;
pub use self::vertex_array::*;
