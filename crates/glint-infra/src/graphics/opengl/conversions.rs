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


use glint_core::renderer::api::{
    AttachmentPoint, BindingPoint, BlendFactor, BufferTarget, BufferUsage, ClearMask, EnableFlag,
    FloatParam, FramebufferTarget, IntegerParam, PixelStore, PolygonMode, ScalarType, ShaderStage,
    StringName, TexelFormat, TextureTarget,
};

/// Converts the core vocabulary into GL constants.
pub trait IntoGl<T> {
    /// Consumes self and converts it into a GL-compatible value.
    fn into_gl(self) -> T;
}

// --- Buffers ---

impl IntoGl<u32> for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            BufferTarget::CopyRead => glow::COPY_READ_BUFFER,
            BufferTarget::CopyWrite => glow::COPY_WRITE_BUFFER,
        }
    }
}

impl IntoGl<u32> for BufferUsage {
    fn into_gl(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        }
    }
}

// --- Textures ---

impl IntoGl<u32> for TextureTarget {
    fn into_gl(self) -> u32 {
        match self {
            TextureTarget::Texture2D => glow::TEXTURE_2D,
            TextureTarget::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
        }
    }
}

impl IntoGl<u32> for PixelStore {
    fn into_gl(self) -> u32 {
        match self {
            PixelStore::PackAlignment => glow::PACK_ALIGNMENT,
            PixelStore::UnpackAlignment => glow::UNPACK_ALIGNMENT,
        }
    }
}

/// The three GL enums a texel format expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTexelFormat {
    /// Sized internal format, e.g. `RGBA8`.
    pub internal: u32,
    /// Base pixel format of client data, e.g. `RGBA`.
    pub format: u32,
    /// Component type of client data.
    pub ty: u32,
}

impl IntoGl<GlTexelFormat> for TexelFormat {
    fn into_gl(self) -> GlTexelFormat {
        match self {
            TexelFormat::Depth => GlTexelFormat {
                internal: glow::DEPTH_COMPONENT24,
                format: glow::DEPTH_COMPONENT,
                ty: glow::FLOAT,
            },
            TexelFormat::Color { components, float } => {
                let (format, byte, float_internal) = match components {
                    1 => (glow::RED, glow::R8, glow::R32F),
                    2 => (glow::RG, glow::RG8, glow::RG32F),
                    3 => (glow::RGB, glow::RGB8, glow::RGB32F),
                    _ => (glow::RGBA, glow::RGBA8, glow::RGBA32F),
                };
                if float {
                    GlTexelFormat {
                        internal: float_internal,
                        format,
                        ty: glow::FLOAT,
                    }
                } else {
                    GlTexelFormat {
                        internal: byte,
                        format,
                        ty: glow::UNSIGNED_BYTE,
                    }
                }
            }
        }
    }
}

// --- Framebuffers ---

impl IntoGl<u32> for FramebufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            FramebufferTarget::Framebuffer => glow::FRAMEBUFFER,
            FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
            FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
        }
    }
}

impl IntoGl<u32> for AttachmentPoint {
    fn into_gl(self) -> u32 {
        match self {
            AttachmentPoint::Color(index) => glow::COLOR_ATTACHMENT0 + index,
            AttachmentPoint::Depth => glow::DEPTH_ATTACHMENT,
        }
    }
}

impl IntoGl<u32> for ClearMask {
    fn into_gl(self) -> u32 {
        let mut bits = 0;
        if self.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if self.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        bits
    }
}

/// Binding points map to the `glGetIntegerv` parameter that reads them.
impl IntoGl<u32> for BindingPoint {
    fn into_gl(self) -> u32 {
        match self {
            BindingPoint::DrawFramebuffer => glow::DRAW_FRAMEBUFFER_BINDING,
            BindingPoint::ReadFramebuffer => glow::READ_FRAMEBUFFER_BINDING,
            BindingPoint::ArrayBuffer => glow::ARRAY_BUFFER_BINDING,
            BindingPoint::Texture2D => glow::TEXTURE_BINDING_2D,
            BindingPoint::Texture2DMultisample => glow::TEXTURE_BINDING_2D_MULTISAMPLE,
            BindingPoint::Renderbuffer => glow::RENDERBUFFER_BINDING,
            BindingPoint::VertexArray => glow::VERTEX_ARRAY_BINDING,
            BindingPoint::Program => glow::CURRENT_PROGRAM,
        }
    }
}

// --- Shaders and vertex input ---

impl IntoGl<u32> for ShaderStage {
    fn into_gl(self) -> u32 {
        self.info().gl_enum
    }
}

impl IntoGl<u32> for ScalarType {
    fn into_gl(self) -> u32 {
        match self {
            ScalarType::I8 => glow::BYTE,
            ScalarType::U8 => glow::UNSIGNED_BYTE,
            ScalarType::I16 => glow::SHORT,
            ScalarType::U16 => glow::UNSIGNED_SHORT,
            ScalarType::I32 => glow::INT,
            ScalarType::U32 => glow::UNSIGNED_INT,
            ScalarType::F32 => glow::FLOAT,
            ScalarType::F64 => glow::DOUBLE,
        }
    }
}

// --- Fixed-function state ---

impl IntoGl<u32> for EnableFlag {
    fn into_gl(self) -> u32 {
        match self {
            EnableFlag::Blend => glow::BLEND,
            EnableFlag::DepthTest => glow::DEPTH_TEST,
            EnableFlag::CullFace => glow::CULL_FACE,
            EnableFlag::Multisample => glow::MULTISAMPLE,
            EnableFlag::ProgramPointSize => glow::PROGRAM_POINT_SIZE,
            EnableFlag::PrimitiveRestartFixedIndex => glow::PRIMITIVE_RESTART_FIXED_INDEX,
            EnableFlag::ScissorTest => glow::SCISSOR_TEST,
            EnableFlag::RasterizerDiscard => glow::RASTERIZER_DISCARD,
        }
    }
}

impl IntoGl<u32> for PolygonMode {
    fn into_gl(self) -> u32 {
        match self {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        }
    }
}

impl IntoGl<u32> for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        }
    }
}

impl IntoGl<u32> for StringName {
    fn into_gl(self) -> u32 {
        match self {
            StringName::Vendor => glow::VENDOR,
            StringName::Renderer => glow::RENDERER,
            StringName::Version => glow::VERSION,
        }
    }
}

impl IntoGl<u32> for IntegerParam {
    fn into_gl(self) -> u32 {
        match self {
            IntegerParam::MaxTextureImageUnits => glow::MAX_TEXTURE_IMAGE_UNITS,
            IntegerParam::MajorVersion => glow::MAJOR_VERSION,
            IntegerParam::MinorVersion => glow::MINOR_VERSION,
            IntegerParam::PackAlignment => glow::PACK_ALIGNMENT,
            IntegerParam::UnpackAlignment => glow::UNPACK_ALIGNMENT,
        }
    }
}

impl IntoGl<u32> for FloatParam {
    fn into_gl(self) -> u32 {
        match self {
            FloatParam::LineWidth => glow::LINE_WIDTH,
            FloatParam::PointSize => glow::POINT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_formats_follow_component_count() {
        let rgb8: GlTexelFormat = TexelFormat::Color {
            components: 3,
            float: false,
        }
        .into_gl();
        assert_eq!(rgb8.internal, glow::RGB8);
        assert_eq!(rgb8.format, glow::RGB);
        assert_eq!(rgb8.ty, glow::UNSIGNED_BYTE);

        let r32f: GlTexelFormat = TexelFormat::Color {
            components: 1,
            float: true,
        }
        .into_gl();
        assert_eq!(r32f.internal, glow::R32F);
        assert_eq!(r32f.ty, glow::FLOAT);
    }

    #[test]
    fn depth_uses_24_bit_storage_with_float_transfer() {
        let depth: GlTexelFormat = TexelFormat::Depth.into_gl();
        assert_eq!(depth.internal, glow::DEPTH_COMPONENT24);
        assert_eq!(depth.format, glow::DEPTH_COMPONENT);
        assert_eq!(depth.ty, glow::FLOAT);
    }

    #[test]
    fn attachment_points_offset_from_color0() {
        let third: u32 = AttachmentPoint::Color(2).into_gl();
        assert_eq!(third, glow::COLOR_ATTACHMENT0 + 2);
        let depth: u32 = AttachmentPoint::Depth.into_gl();
        assert_eq!(depth, glow::DEPTH_ATTACHMENT);
    }

    #[test]
    fn clear_mask_bits() {
        let bits: u32 = ClearMask::COLOR_DEPTH.into_gl();
        assert_eq!(bits, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        let color: u32 = ClearMask::COLOR.into_gl();
        assert_eq!(color, glow::COLOR_BUFFER_BIT);
    }

    #[test]
    fn shader_stages_match_gl_constants() {
        let vertex: u32 = ShaderStage::Vertex.into_gl();
        let compute: u32 = ShaderStage::Compute.into_gl();
        assert_eq!(vertex, glow::VERTEX_SHADER);
        assert_eq!(compute, glow::COMPUTE_SHADER);
        let tess: u32 = ShaderStage::TessControl.into_gl();
        assert_eq!(tess, glow::TESS_CONTROL_SHADER);
    }
}
