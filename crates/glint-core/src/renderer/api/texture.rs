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

//! Textures, renderbuffers, and the descriptors used to create them.

use super::enums::TexelFormat;
use super::handle::{ContextId, GpuResource, Handle, ResourceState};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;
use std::borrow::Cow;

/// A descriptor used to create a color [`Texture`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label, used in logs.
    pub label: Option<Cow<'a, str>>,
    /// Width and height in pixels.
    pub size: (u32, u32),
    /// Components per pixel, in `1..=4`.
    pub components: u32,
    /// Sample count: 0 for a regular texture, a power of two for multisample.
    pub samples: u32,
    /// Row alignment of the uploaded data: 1, 2, 4 or 8.
    pub alignment: u32,
    /// 32-bit float components instead of 8-bit unsigned ones.
    pub float: bool,
}

impl<'a> TextureDescriptor<'a> {
    /// A single-sample 8-bit texture with byte-aligned rows.
    pub fn new(size: (u32, u32), components: u32) -> Self {
        Self {
            label: None,
            size,
            components,
            samples: 0,
            alignment: 1,
            float: false,
        }
    }
}

/// A descriptor used to create a depth [`Texture`].
#[derive(Debug, Clone)]
pub struct DepthTextureDescriptor<'a> {
    /// An optional debug label, used in logs.
    pub label: Option<Cow<'a, str>>,
    /// Width and height in pixels.
    pub size: (u32, u32),
    /// Sample count: 0 or a power of two.
    pub samples: u32,
    /// Row alignment of the uploaded data: 1, 2, 4 or 8.
    pub alignment: u32,
}

impl<'a> DepthTextureDescriptor<'a> {
    /// A single-sample depth texture with 4-byte aligned rows.
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            label: None,
            size,
            samples: 0,
            alignment: 4,
        }
    }
}

/// A descriptor used to create a color [`Renderbuffer`].
#[derive(Debug, Clone)]
pub struct RenderbufferDescriptor<'a> {
    /// An optional debug label, used in logs.
    pub label: Option<Cow<'a, str>>,
    /// Width and height in pixels.
    pub size: (u32, u32),
    /// Components per pixel, in `1..=4`.
    pub components: u32,
    /// Sample count: 0 or a power of two.
    pub samples: u32,
    /// 32-bit float components instead of 8-bit unsigned ones.
    pub float: bool,
}

impl<'a> RenderbufferDescriptor<'a> {
    /// A single-sample 8-bit renderbuffer.
    pub fn new(size: (u32, u32), components: u32) -> Self {
        Self {
            label: None,
            size,
            components,
            samples: 0,
            float: false,
        }
    }
}

/// The shape shared by textures and renderbuffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Components per pixel (1 for depth).
    pub components: u32,
    /// Sample count, 0 for single-sample.
    pub samples: u32,
    /// Float storage.
    pub float: bool,
    /// Depth storage.
    pub depth: bool,
}

impl ImageInfo {
    /// Storage format of the image.
    pub fn format(&self) -> TexelFormat {
        if self.depth {
            TexelFormat::Depth
        } else {
            TexelFormat::Color {
                components: self.components,
                float: self.float,
            }
        }
    }

    /// Bytes per component of client-side pixel data.
    pub fn element_size(&self) -> usize {
        if self.float || self.depth { 4 } else { 1 }
    }

    /// The `(width, height, samples)` triple attachments must agree on.
    pub fn extent(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.samples)
    }
}

/// A sampled image.
#[derive(Debug)]
pub struct Texture {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) image: ImageInfo,
}

impl Texture {
    /// Shape of the texture.
    pub fn info(&self) -> &ImageInfo {
        &self.image
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// The driver handle, if the texture is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }
}

impl GpuResource for Texture {
    const KIND: &'static str = "texture";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_texture(handle);
            log::debug!("Released texture {}", handle.get());
        }
    }
}

/// A render target that cannot be sampled.
#[derive(Debug)]
pub struct Renderbuffer {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) image: ImageInfo,
}

impl Renderbuffer {
    /// Shape of the renderbuffer.
    pub fn info(&self) -> &ImageInfo {
        &self.image
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// The driver handle, if the renderbuffer is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }
}

impl GpuResource for Renderbuffer {
    const KIND: &'static str = "renderbuffer";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_renderbuffer(handle);
            log::debug!("Released renderbuffer {}", handle.get());
        }
    }
}

pub(crate) fn validate_components(components: u32) -> Result<(), ResourceError> {
    if (1..=4).contains(&components) {
        Ok(())
    } else {
        Err(ResourceError::InvalidComponents(components))
    }
}

pub(crate) fn validate_samples(samples: u32) -> Result<(), ResourceError> {
    if samples & samples.wrapping_sub(1) == 0 {
        Ok(())
    } else {
        Err(ResourceError::InvalidSamples(samples))
    }
}

pub(crate) fn validate_alignment(alignment: u32) -> Result<(), ResourceError> {
    if matches!(alignment, 1 | 2 | 4 | 8) {
        Ok(())
    } else {
        Err(ResourceError::InvalidAlignment(alignment))
    }
}

/// Bytes of client data an image upload reads, each row padded to `alignment`.
///
/// `None` if the size does not fit in `usize`.
pub fn expected_data_size(image: &ImageInfo, alignment: u32) -> Option<usize> {
    let alignment = alignment as usize;
    let row = (image.width as usize)
        .checked_mul(image.components as usize)?
        .checked_mul(image.element_size())?;
    let padded = row.div_ceil(alignment).checked_mul(alignment)?;
    padded.checked_mul(image.height as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(width: u32, height: u32, components: u32, float: bool) -> ImageInfo {
        ImageInfo {
            width,
            height,
            components,
            samples: 0,
            float,
            depth: false,
        }
    }

    #[test]
    fn rows_are_padded_to_the_alignment() {
        assert_eq!(expected_data_size(&color(3, 2, 3, false), 1), Some(18));
        assert_eq!(expected_data_size(&color(3, 2, 3, false), 4), Some(24));
        assert_eq!(expected_data_size(&color(3, 2, 3, false), 8), Some(32));
        assert_eq!(expected_data_size(&color(4, 4, 4, true), 8), Some(256));
    }

    #[test]
    fn oversized_images_have_no_expected_size() {
        assert_eq!(expected_data_size(&color(u32::MAX, u32::MAX, 4, true), 4), None);
    }

    #[test]
    fn depth_uses_one_float_component() {
        let depth = ImageInfo {
            depth: true,
            components: 1,
            ..color(5, 1, 1, false)
        };
        assert_eq!(depth.format(), TexelFormat::Depth);
        assert_eq!(expected_data_size(&depth, 4), Some(20));
    }

    #[test]
    fn sample_counts_are_zero_or_powers_of_two() {
        for samples in [0, 1, 2, 4, 8, 16] {
            assert!(validate_samples(samples).is_ok());
        }
        for samples in [3, 5, 6, 12] {
            assert_eq!(
                validate_samples(samples),
                Err(ResourceError::InvalidSamples(samples))
            );
        }
    }

    #[test]
    fn component_and_alignment_ranges() {
        assert!(validate_components(0).is_err());
        assert!(validate_components(4).is_ok());
        assert_eq!(
            validate_components(5),
            Err(ResourceError::InvalidComponents(5))
        );
        assert!(validate_alignment(8).is_ok());
        assert!(validate_alignment(3).is_err());
    }
}
