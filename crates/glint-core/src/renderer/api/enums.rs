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

//! Typed vocabulary of the driver contract.
//!
//! Backends translate these into their raw constants (see the `conversions` module of
//! each backend in `glint-infra`).

/// Bind targets for buffer objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute source.
    Array,
    /// Index source; recorded in the bound vertex array.
    ElementArray,
    /// Source side of a buffer-to-buffer copy.
    CopyRead,
    /// Destination side of a buffer-to-buffer copy.
    CopyWrite,
}

/// Usage hint given when a buffer's storage is (re)specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    StaticDraw,
    /// Rewritten repeatedly.
    DynamicDraw,
}

/// Bind targets for texture objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// A single-sample 2D texture.
    Texture2D,
    /// A multisample 2D texture. Cannot be uploaded to directly.
    Texture2DMultisample,
}

impl TextureTarget {
    /// Picks the target matching a sample count (0 means single-sample).
    pub fn for_samples(samples: u32) -> Self {
        if samples > 0 {
            TextureTarget::Texture2DMultisample
        } else {
            TextureTarget::Texture2D
        }
    }
}

/// Storage format of a texture or renderbuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    /// A color format with 1 to 4 components of 8-bit unsigned or 32-bit float scalars.
    Color {
        /// Number of components, in `1..=4`.
        components: u32,
        /// `true` for 32-bit float components, `false` for 8-bit unsigned ones.
        float: bool,
    },
    /// A single-component depth format (24-bit storage, float transfer type).
    Depth,
}

/// Pixel storage parameters that govern row alignment of client memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelStore {
    /// Alignment of rows read back from the driver.
    PackAlignment,
    /// Alignment of rows uploaded to the driver.
    UnpackAlignment,
}

/// Framebuffer bind targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    /// Both the read and the draw binding.
    Framebuffer,
    /// The read binding, used as a blit or copy source.
    Read,
    /// The draw binding, used as a blit destination.
    Draw,
}

/// Where an image is attached on a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentPoint {
    /// The n-th color attachment.
    Color(u32),
    /// The depth attachment.
    Depth,
}

/// Bindings the context saves and restores around temporary binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingPoint {
    /// The draw framebuffer binding (also the combined binding).
    DrawFramebuffer,
    /// The read framebuffer binding.
    ReadFramebuffer,
    /// The array buffer binding.
    ArrayBuffer,
    /// The 2D texture binding of the active texture unit.
    Texture2D,
    /// The multisample 2D texture binding of the active texture unit.
    Texture2DMultisample,
    /// The renderbuffer binding.
    Renderbuffer,
    /// The vertex array binding.
    VertexArray,
    /// The program in use.
    Program,
}

impl From<TextureTarget> for BindingPoint {
    fn from(target: TextureTarget) -> Self {
        match target {
            TextureTarget::Texture2D => BindingPoint::Texture2D,
            TextureTarget::Texture2DMultisample => BindingPoint::Texture2DMultisample,
        }
    }
}

/// Capabilities toggled with [`Context::enable`](crate::Context::enable) and
/// [`Context::disable`](crate::Context::disable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnableFlag {
    /// Color blending.
    Blend,
    /// Depth testing.
    DepthTest,
    /// Face culling.
    CullFace,
    /// Multisample rasterization.
    Multisample,
    /// Point size written by the vertex stage.
    ProgramPointSize,
    /// Primitive restart on the maximum index value.
    PrimitiveRestartFixedIndex,
    /// Scissor testing.
    ScissorTest,
    /// Discarding primitives before rasterization.
    RasterizerDiscard,
}

/// Polygon rasterization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    /// Filled polygons.
    Fill,
    /// Polygon edges only.
    Line,
}

/// Blend factors used by the context's initial blend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
}

/// Informational strings the driver reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringName {
    /// The implementation vendor.
    Vendor,
    /// The renderer (usually the GPU model).
    Renderer,
    /// The full version string.
    Version,
}

/// Integer state the context queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerParam {
    /// Number of texture image units available to fragment shaders.
    MaxTextureImageUnits,
    /// Major version number.
    MajorVersion,
    /// Minor version number.
    MinorVersion,
    /// Current pack alignment.
    PackAlignment,
    /// Current unpack alignment.
    UnpackAlignment,
}

/// Float state the context queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatParam {
    /// Rasterized line width.
    LineWidth,
    /// Rasterized point size.
    PointSize,
}

/// Scalar data types of vertex attribute sources and shader inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl ScalarType {
    /// Size of one scalar in bytes.
    pub const fn size(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }
}

/// How the driver converts a vertex source into the shader input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttribPointerKind {
    /// Converted to float; integer sources may be normalized to `[0, 1]` / `[-1, 1]`.
    Float {
        /// Normalize integer sources.
        normalized: bool,
    },
    /// Kept as integers.
    Integer,
    /// Kept as 64-bit floats.
    Double,
}

/// A vertex attribute pointer configuration for one attribute location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribPointer {
    /// The attribute location.
    pub location: u32,
    /// Components per vertex for this location (1 to 4).
    pub components: u32,
    /// Scalar type of the source data.
    pub scalar: ScalarType,
    /// Conversion applied by the driver.
    pub kind: AttribPointerKind,
    /// Byte distance between consecutive vertices.
    pub stride: usize,
    /// Byte offset of the first component inside the bound buffer.
    pub offset: usize,
}

/// A set of buffers to clear or blit, as a small bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearMask {
    bits: u32,
}

impl ClearMask {
    /// The color buffers.
    pub const COLOR: Self = Self { bits: 1 << 0 };
    /// The depth buffer.
    pub const DEPTH: Self = Self { bits: 1 << 1 };
    /// Color and depth.
    pub const COLOR_DEPTH: Self = Self {
        bits: Self::COLOR.bits | Self::DEPTH.bits,
    };

    /// Returns `true` if all bits of `other` are set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

impl std::ops::BitOr for ClearMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

/// A rectangle in window coordinates, origin at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl From<(i32, i32, i32, i32)> for Viewport {
    fn from((x, y, width, height): (i32, i32, i32, i32)) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A size-only rectangle anchored at the origin.
impl From<(i32, i32)> for Viewport {
    fn from((width, height): (i32, i32)) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// The driver's sticky error flag, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverError {
    /// No error has been recorded.
    NoError,
    /// An enum argument was out of range.
    InvalidEnum,
    /// A numeric argument was out of range.
    InvalidValue,
    /// The operation is not allowed in the current state.
    InvalidOperation,
    /// The bound framebuffer is not complete.
    InvalidFramebufferOperation,
    /// The driver ran out of memory.
    OutOfMemory,
    /// A stack pop on an empty stack.
    StackUnderflow,
    /// A stack push on a full stack.
    StackOverflow,
    /// A code not defined by the core API.
    Unknown(u32),
}

impl DriverError {
    /// Decodes a raw error code.
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => DriverError::NoError,
            0x0500 => DriverError::InvalidEnum,
            0x0501 => DriverError::InvalidValue,
            0x0502 => DriverError::InvalidOperation,
            0x0503 => DriverError::StackOverflow,
            0x0504 => DriverError::StackUnderflow,
            0x0505 => DriverError::OutOfMemory,
            0x0506 => DriverError::InvalidFramebufferOperation,
            other => DriverError::Unknown(other),
        }
    }
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriverError::NoError => "GL_NO_ERROR",
            DriverError::InvalidEnum => "GL_INVALID_ENUM",
            DriverError::InvalidValue => "GL_INVALID_VALUE",
            DriverError::InvalidOperation => "GL_INVALID_OPERATION",
            DriverError::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            DriverError::OutOfMemory => "GL_OUT_OF_MEMORY",
            DriverError::StackUnderflow => "GL_STACK_UNDERFLOW",
            DriverError::StackOverflow => "GL_STACK_OVERFLOW",
            DriverError::Unknown(_) => "GL_UNKNOWN_ERROR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_from_size_anchors_at_origin() {
        let viewport = Viewport::from((640, 480));
        assert_eq!(viewport, Viewport::from((0, 0, 640, 480)));
    }

    #[test]
    fn driver_error_names() {
        assert_eq!(DriverError::from_raw(0).to_string(), "GL_NO_ERROR");
        assert_eq!(
            DriverError::from_raw(0x0502).to_string(),
            "GL_INVALID_OPERATION"
        );
        assert_eq!(DriverError::from_raw(0x1234), DriverError::Unknown(0x1234));
        assert_eq!(
            DriverError::from_raw(0x1234).to_string(),
            "GL_UNKNOWN_ERROR"
        );
    }

    #[test]
    fn clear_mask_union() {
        let mask = ClearMask::COLOR | ClearMask::DEPTH;
        assert_eq!(mask, ClearMask::COLOR_DEPTH);
        assert!(mask.contains(ClearMask::DEPTH));
        assert!(!ClearMask::COLOR.contains(ClearMask::DEPTH));
    }
}
