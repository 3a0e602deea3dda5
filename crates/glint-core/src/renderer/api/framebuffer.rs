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

//! Framebuffers, their attachments, and the driver's completeness verdict.

use super::handle::{ContextId, GpuResource, Handle, ResourceState};
use super::texture::{ImageInfo, Renderbuffer, Texture};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;
use std::fmt;

/// A texture or renderbuffer passed as a framebuffer attachment.
#[derive(Debug, Clone, Copy)]
pub enum AttachmentRef<'a> {
    /// A texture attachment.
    Texture(&'a Texture),
    /// A renderbuffer attachment.
    Renderbuffer(&'a Renderbuffer),
}

impl<'a> AttachmentRef<'a> {
    pub(crate) fn context_id(&self) -> ContextId {
        match self {
            AttachmentRef::Texture(texture) => texture.context,
            AttachmentRef::Renderbuffer(renderbuffer) => renderbuffer.context,
        }
    }

    /// Shape of the attached image.
    pub fn image(&self) -> &'a ImageInfo {
        match self {
            AttachmentRef::Texture(texture) => &texture.image,
            AttachmentRef::Renderbuffer(renderbuffer) => &renderbuffer.image,
        }
    }

    pub(crate) fn record(&self) -> Result<AttachmentInfo, ResourceError> {
        let (kind, handle) = match self {
            AttachmentRef::Texture(texture) => (AttachmentKind::Texture, texture.handle()?),
            AttachmentRef::Renderbuffer(renderbuffer) => {
                (AttachmentKind::Renderbuffer, renderbuffer.handle()?)
            }
        };
        Ok(AttachmentInfo {
            kind,
            handle,
            image: *self.image(),
        })
    }
}

impl<'a> From<&'a Texture> for AttachmentRef<'a> {
    fn from(texture: &'a Texture) -> Self {
        AttachmentRef::Texture(texture)
    }
}

impl<'a> From<&'a Renderbuffer> for AttachmentRef<'a> {
    fn from(renderbuffer: &'a Renderbuffer) -> Self {
        AttachmentRef::Renderbuffer(renderbuffer)
    }
}

/// Whether an attachment is a texture or a renderbuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// A texture.
    Texture,
    /// A renderbuffer.
    Renderbuffer,
}

/// What a framebuffer remembers about one of its attachments.
///
/// The framebuffer does not own the attachment: releasing it leaves the image alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentInfo {
    /// Texture or renderbuffer.
    pub kind: AttachmentKind,
    /// Handle of the attached object at creation time.
    pub handle: Handle,
    /// Shape of the attached image.
    pub image: ImageInfo,
}

/// The depth target of a framebuffer.
#[derive(Debug)]
pub enum DepthAttachment {
    /// Supplied by the caller; not released with the framebuffer.
    Attached(AttachmentInfo),
    /// Created alongside the framebuffer and released with it.
    Synthesized(Renderbuffer),
}

/// Where a framebuffer copy writes to.
#[derive(Debug, Clone, Copy)]
pub enum CopyTarget<'a> {
    /// Blit into another framebuffer.
    Framebuffer(&'a Framebuffer),
    /// Copy the read buffer into a texture.
    Texture(&'a Texture),
}

/// A set of render targets.
///
/// The default framebuffer (the window surface) has no handle and no attachments.
#[derive(Debug)]
pub struct Framebuffer {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState<Option<Handle>>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) samples: u32,
    pub(crate) color_attachments: Vec<AttachmentInfo>,
    pub(crate) depth_attachment: Option<DepthAttachment>,
}

impl Framebuffer {
    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample count shared by all attachments.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// The driver handle if live; `Ok(None)` is the default framebuffer.
    pub fn handle(&self) -> Result<Option<Handle>, ResourceError> {
        self.state.live(Self::KIND)
    }

    /// Returns `true` for the window surface.
    pub fn is_default(&self) -> bool {
        matches!(self.state, ResourceState::Live(None))
    }

    /// Color attachments in attachment-point order.
    pub fn color_attachments(&self) -> &[AttachmentInfo] {
        &self.color_attachments
    }

    /// The depth target, if any.
    pub fn depth_attachment(&self) -> Option<&DepthAttachment> {
        self.depth_attachment.as_ref()
    }
}

impl GpuResource for Framebuffer {
    const KIND: &'static str = "framebuffer";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        let Some(handle) = self.state.take() else {
            return;
        };
        if let Some(handle) = handle {
            driver.delete_framebuffer(handle);
            log::debug!("Released framebuffer {}", handle.get());
        }
        if let Some(DepthAttachment::Synthesized(depth)) = self.depth_attachment.as_mut() {
            depth.release_with(driver);
        }
    }
}

/// The driver's verdict on a framebuffer's attachment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    /// Renderable.
    Complete,
    /// The default framebuffer does not exist.
    Undefined,
    /// An attachment is not attachment complete.
    IncompleteAttachment,
    /// No image is attached.
    IncompleteMissingAttachment,
    /// A draw buffer names an empty attachment point.
    IncompleteDrawBuffer,
    /// The read buffer names an empty attachment point.
    IncompleteReadBuffer,
    /// The combination of formats is not supported.
    Unsupported,
    /// Attachments disagree on sample count.
    IncompleteMultisample,
    /// Layered and non-layered attachments are mixed.
    IncompleteLayerTargets,
    /// A code not defined by the core API.
    Unknown(u32),
}

impl FramebufferStatus {
    /// Decodes a raw completeness code.
    pub fn from_raw(code: u32) -> Self {
        match code {
            0x8CD5 => FramebufferStatus::Complete,
            0x8219 => FramebufferStatus::Undefined,
            0x8CD6 => FramebufferStatus::IncompleteAttachment,
            0x8CD7 => FramebufferStatus::IncompleteMissingAttachment,
            0x8CDB => FramebufferStatus::IncompleteDrawBuffer,
            0x8CDC => FramebufferStatus::IncompleteReadBuffer,
            0x8CDD => FramebufferStatus::Unsupported,
            0x8D56 => FramebufferStatus::IncompleteMultisample,
            0x8DA8 => FramebufferStatus::IncompleteLayerTargets,
            other => FramebufferStatus::Unknown(other),
        }
    }

    /// The raw code, for drivers that report them.
    pub fn to_raw(self) -> u32 {
        match self {
            FramebufferStatus::Complete => 0x8CD5,
            FramebufferStatus::Undefined => 0x8219,
            FramebufferStatus::IncompleteAttachment => 0x8CD6,
            FramebufferStatus::IncompleteMissingAttachment => 0x8CD7,
            FramebufferStatus::IncompleteDrawBuffer => 0x8CDB,
            FramebufferStatus::IncompleteReadBuffer => 0x8CDC,
            FramebufferStatus::Unsupported => 0x8CDD,
            FramebufferStatus::IncompleteMultisample => 0x8D56,
            FramebufferStatus::IncompleteLayerTargets => 0x8DA8,
            FramebufferStatus::Unknown(code) => code,
        }
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => f.write_str("COMPLETE"),
            FramebufferStatus::Undefined => f.write_str("UNDEFINED"),
            FramebufferStatus::IncompleteAttachment => f.write_str("INCOMPLETE_ATTACHMENT"),
            FramebufferStatus::IncompleteMissingAttachment => {
                f.write_str("INCOMPLETE_MISSING_ATTACHMENT")
            }
            FramebufferStatus::IncompleteDrawBuffer => f.write_str("INCOMPLETE_DRAW_BUFFER"),
            FramebufferStatus::IncompleteReadBuffer => f.write_str("INCOMPLETE_READ_BUFFER"),
            FramebufferStatus::Unsupported => f.write_str("UNSUPPORTED"),
            FramebufferStatus::IncompleteMultisample => f.write_str("INCOMPLETE_MULTISAMPLE"),
            FramebufferStatus::IncompleteLayerTargets => {
                f.write_str("INCOMPLETE_LAYER_TARGETS")
            }
            FramebufferStatus::Unknown(code) => write!(f, "unknown status 0x{code:04X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip_through_the_raw_value() {
        for code in [0x8CD5, 0x8219, 0x8CD6, 0x8CD7, 0x8CDB, 0x8CDC, 0x8CDD, 0x8D56, 0x8DA8] {
            let status = FramebufferStatus::from_raw(code);
            assert!(!matches!(status, FramebufferStatus::Unknown(_)));
            assert_eq!(status.to_raw(), code);
        }
    }

    #[test]
    fn unknown_codes_get_a_generic_name() {
        let status = FramebufferStatus::from_raw(0xBEEF);
        assert_eq!(status, FramebufferStatus::Unknown(0xBEEF));
        assert_eq!(status.to_string(), "unknown status 0xBEEF");
    }
}
