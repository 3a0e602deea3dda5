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

//! Framebuffer assembly and the default framebuffer.

use super::scope::BindScope;
use super::Context;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;

impl Context {
    /// Assembles a framebuffer from color attachments and an optional depth attachment.
    ///
    /// All attachments must share the first color attachment's width, height and sample
    /// count. Without a depth attachment, a matching depth renderbuffer is created and
    /// released together with the framebuffer. Attachments passed in are never released
    /// by the framebuffer.
    pub fn framebuffer(
        &self,
        color_attachments: &[AttachmentRef<'_>],
        depth_attachment: Option<AttachmentRef<'_>>,
    ) -> Result<Framebuffer, ResourceError> {
        let Some(first) = color_attachments.first() else {
            return Err(ResourceError::EmptyAttachments);
        };
        let (width, height, samples) = first.image().extent();

        for (i, attachment) in color_attachments.iter().enumerate() {
            if attachment.image().extent() != (width, height, samples) {
                return Err(ResourceError::AttachmentMismatch(
                    "the color_attachments have different sizes or samples".to_owned(),
                ));
            }
            self.ensure_owned(attachment.context_id(), || format!("color_attachments[{i}]"))?;
        }

        if let Some(depth) = &depth_attachment {
            self.ensure_owned(depth.context_id(), || "the depth_attachment".to_owned())?;
            if depth.image().extent() != (width, height, samples) {
                return Err(ResourceError::AttachmentMismatch(
                    "the depth_attachment has a different size or samples".to_owned(),
                ));
            }
        }

        let colors = color_attachments
            .iter()
            .map(AttachmentRef::record)
            .collect::<Result<Vec<_>, _>>()?;
        let user_depth = depth_attachment.as_ref().map(AttachmentRef::record).transpose()?;

        let mut depth = match user_depth {
            Some(info) => DepthAttachment::Attached(info),
            None => DepthAttachment::Synthesized(self.create_renderbuffer(ImageInfo {
                width,
                height,
                components: 1,
                samples,
                float: true,
                depth: true,
            })?),
        };

        let handle = match self.driver.create_framebuffer() {
            Some(handle) => handle,
            None => {
                release_synthesized(self, &mut depth);
                return Err(ResourceError::AllocationFailed {
                    kind: Framebuffer::KIND,
                });
            }
        };

        let status = {
            let mut scope = BindScope::new(self.driver());
            scope.bind_framebuffer(FramebufferTarget::Framebuffer, Some(handle));

            for (i, color) in colors.iter().enumerate() {
                self.attach(AttachmentPoint::Color(i as u32), color);
            }
            match &depth {
                DepthAttachment::Attached(info) => self.attach(AttachmentPoint::Depth, info),
                DepthAttachment::Synthesized(renderbuffer) => {
                    if let Ok(depth_handle) = renderbuffer.handle() {
                        self.driver
                            .attach_renderbuffer(AttachmentPoint::Depth, depth_handle);
                    }
                }
            }

            FramebufferStatus::from_raw(self.driver.check_framebuffer_status())
        };

        if status != FramebufferStatus::Complete {
            if let FramebufferStatus::Unknown(code) = status {
                log::warn!("Driver returned unknown framebuffer status 0x{code:04X}");
            }
            self.driver.delete_framebuffer(handle);
            release_synthesized(self, &mut depth);
            return Err(ResourceError::Incomplete(status));
        }

        self.poll_errors(Framebuffer::KIND);
        log::debug!(
            "Created framebuffer {} ({}x{}, {} color attachments, {} samples, {} depth)",
            handle.get(),
            width,
            height,
            colors.len(),
            samples,
            match depth {
                DepthAttachment::Attached(_) => "attached",
                DepthAttachment::Synthesized(_) => "synthesized",
            }
        );

        Ok(Framebuffer {
            context: self.id,
            state: ResourceState::Live(Some(handle)),
            width,
            height,
            samples,
            color_attachments: colors,
            depth_attachment: Some(depth),
        })
    }

    fn attach(&self, point: AttachmentPoint, info: &AttachmentInfo) {
        match info.kind {
            AttachmentKind::Texture => self.driver.attach_texture(
                point,
                TextureTarget::for_samples(info.image.samples),
                info.handle,
            ),
            AttachmentKind::Renderbuffer => self.driver.attach_renderbuffer(point, info.handle),
        }
    }

    /// The window surface, sized from the viewport the first time it is requested.
    pub fn default_framebuffer(&self) -> &Framebuffer {
        self.default_framebuffer.get_or_init(|| {
            let viewport = self.driver.viewport();
            let width = u32::try_from(viewport.width).unwrap_or(0);
            let height = u32::try_from(viewport.height).unwrap_or(0);
            log::debug!("Default framebuffer is {width}x{height}");

            Framebuffer {
                context: self.id,
                state: ResourceState::Live(None),
                width,
                height,
                samples: 0,
                color_attachments: Vec::new(),
                depth_attachment: None,
            }
        })
    }
}

fn release_synthesized(context: &Context, depth: &mut DepthAttachment) {
    if let DepthAttachment::Synthesized(renderbuffer) = depth {
        renderbuffer.release_with(context.driver());
    }
}
