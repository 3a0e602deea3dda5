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

//! The resource factory.
//!
//! A [`Context`] owns a [`GlDriver`] and is the only way to create resources. Every
//! creation validates its arguments before issuing a driver call, and nothing is returned
//! until the driver object is fully configured.

mod assembler;
mod binder;
mod program;
mod properties;
mod scope;
mod settings;
mod transfer;

pub use self::settings::{ContextSettings, SettingsError};

use self::scope::BindScope;
use crate::renderer::api::texture::{validate_alignment, validate_components, validate_samples};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;
use std::cell::{Cell, OnceCell};

/// A graphics context: the driver connection plus the state this layer keeps about it.
///
/// A context is bound to the thread its driver is current on.
#[derive(Debug)]
pub struct Context {
    id: ContextId,
    driver: Box<dyn GlDriver>,
    settings: ContextSettings,
    max_texture_units: u32,
    default_texture_unit: Cell<u32>,
    wireframe: Cell<bool>,
    default_framebuffer: OnceCell<Framebuffer>,
}

impl Context {
    /// Wraps a driver whose context is current on this thread and applies the initial
    /// state from `settings`.
    pub fn new(driver: Box<dyn GlDriver>, settings: ContextSettings) -> Result<Self, ResourceError> {
        let max_texture_units =
            u32::try_from(driver.get_integer(IntegerParam::MaxTextureImageUnits))
                .unwrap_or(0)
                .max(1);

        let default_texture_unit = match settings.default_texture_unit {
            Some(unit) if unit >= max_texture_units => {
                return Err(ResourceError::InvalidTextureUnit {
                    unit,
                    max: max_texture_units,
                });
            }
            Some(unit) => unit,
            None => max_texture_units - 1,
        };

        if settings.alpha_blending_func {
            driver.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        }
        if settings.primitive_restart {
            driver.enable(EnableFlag::PrimitiveRestartFixedIndex);
        }

        let context = Self {
            id: ContextId::next(),
            driver,
            settings,
            max_texture_units,
            default_texture_unit: Cell::new(default_texture_unit),
            wireframe: Cell::new(false),
            default_framebuffer: OnceCell::new(),
        };

        log::info!(
            "Context created: vendor={}, renderer={}, version={}",
            context.driver.get_string(StringName::Vendor).as_deref().unwrap_or("unknown"),
            context.driver.get_string(StringName::Renderer).as_deref().unwrap_or("unknown"),
            context.driver.get_string(StringName::Version).as_deref().unwrap_or("unknown"),
        );
        log::debug!(
            "{} texture units, uploads go through unit {}",
            max_texture_units,
            default_texture_unit
        );

        Ok(context)
    }

    /// The identity token resources created here carry.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The underlying driver.
    pub fn driver(&self) -> &dyn GlDriver {
        self.driver.as_ref()
    }

    /// The settings the context was created with.
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Releases the driver objects of a resource created by this context.
    ///
    /// Releasing twice is a no-op; each driver delete happens once.
    pub fn release<R: GpuResource>(&self, resource: &mut R) -> Result<(), ResourceError> {
        self.ensure_owned(resource.context_id(), || format!("the {}", R::KIND))?;
        resource.release_with(self.driver());
        Ok(())
    }

    pub(crate) fn ensure_owned(
        &self,
        owner: ContextId,
        what: impl FnOnce() -> String,
    ) -> Result<(), ResourceError> {
        if owner == self.id {
            Ok(())
        } else {
            Err(ResourceError::ForeignContext(what()))
        }
    }

    /// Logs whatever the driver error flag holds, when enabled in the settings.
    pub(crate) fn poll_errors(&self, after: &str) {
        if !self.settings.check_errors {
            return;
        }
        let error = DriverError::from_raw(self.driver.get_error());
        if error != DriverError::NoError {
            log::warn!("Driver reported {error} after creating a {after}");
        }
    }

    /// Creates a buffer from `data`, or with `reserve` uninitialized bytes.
    ///
    /// Exactly one of the two must describe a non-empty buffer.
    pub fn buffer(
        &self,
        data: Option<&[u8]>,
        reserve: usize,
        dynamic: bool,
    ) -> Result<Buffer, ResourceError> {
        if data.is_some() && reserve != 0 {
            return Err(ResourceError::ArgumentConflict("data and reserve"));
        }

        let size = data.map_or(reserve, <[u8]>::len);
        if size == 0 {
            return Err(ResourceError::EmptyBuffer);
        }
        if size > MAX_BUFFER_SIZE {
            return Err(ResourceError::BufferTooLarge(size));
        }

        let handle = self.driver.create_buffer().ok_or(ResourceError::AllocationFailed {
            kind: Buffer::KIND,
        })?;

        let usage = if dynamic {
            BufferUsage::DynamicDraw
        } else {
            BufferUsage::StaticDraw
        };

        {
            let mut scope = BindScope::new(self.driver());
            scope.bind(BindingPoint::ArrayBuffer, Some(handle));
            self.driver.buffer_data(BufferTarget::Array, size, data, usage);
        }

        self.poll_errors(Buffer::KIND);
        log::debug!("Created buffer {} ({size} bytes, {usage:?})", handle.get());

        Ok(Buffer {
            context: self.id,
            state: ResourceState::Live(handle),
            size,
            dynamic,
        })
    }

    /// Creates a color texture, optionally uploading `data`.
    pub fn texture(
        &self,
        descriptor: &TextureDescriptor<'_>,
        data: Option<&[u8]>,
    ) -> Result<Texture, ResourceError> {
        validate_components(descriptor.components)?;
        validate_samples(descriptor.samples)?;
        validate_alignment(descriptor.alignment)?;

        let (width, height) = descriptor.size;
        let image = ImageInfo {
            width,
            height,
            components: descriptor.components,
            samples: descriptor.samples,
            float: descriptor.float,
            depth: false,
        };
        self.create_texture(descriptor.label.as_deref(), image, descriptor.alignment, data)
    }

    /// Creates a single-component float depth texture, optionally uploading `data`.
    pub fn depth_texture(
        &self,
        descriptor: &DepthTextureDescriptor<'_>,
        data: Option<&[u8]>,
    ) -> Result<Texture, ResourceError> {
        validate_samples(descriptor.samples)?;
        validate_alignment(descriptor.alignment)?;

        let (width, height) = descriptor.size;
        let image = ImageInfo {
            width,
            height,
            components: 1,
            samples: descriptor.samples,
            float: true,
            depth: true,
        };
        self.create_texture(descriptor.label.as_deref(), image, descriptor.alignment, data)
    }

    fn create_texture(
        &self,
        label: Option<&str>,
        image: ImageInfo,
        alignment: u32,
        data: Option<&[u8]>,
    ) -> Result<Texture, ResourceError> {
        if image.samples > 0 && data.is_some() {
            return Err(ResourceError::MultisampleWithData);
        }
        if let Some(data) = data {
            let expected = expected_data_size(&image, alignment).unwrap_or(usize::MAX);
            if data.len() != expected {
                return Err(ResourceError::SizeMismatch {
                    expected,
                    actual: data.len(),
                });
            }
        }

        let handle = self.driver.create_texture().ok_or(ResourceError::AllocationFailed {
            kind: Texture::KIND,
        })?;

        let target = TextureTarget::for_samples(image.samples);
        self.driver.active_texture(self.default_texture_unit.get());

        {
            let mut scope = BindScope::new(self.driver());
            scope.bind(target.into(), Some(handle));

            if image.samples > 0 {
                self.driver.tex_image_2d_multisample(
                    image.format(),
                    image.width,
                    image.height,
                    image.samples,
                );
            } else {
                self.driver.pixel_store(PixelStore::PackAlignment, alignment);
                self.driver.pixel_store(PixelStore::UnpackAlignment, alignment);
                self.driver
                    .tex_image_2d(image.format(), image.width, image.height, data);
                self.driver.set_linear_filtering(target);
            }
        }

        self.poll_errors(Texture::KIND);
        log::debug!(
            "Created texture {} '{}' ({}x{}, {:?}, {} samples)",
            handle.get(),
            label.unwrap_or(""),
            image.width,
            image.height,
            image.format(),
            image.samples
        );

        Ok(Texture {
            context: self.id,
            state: ResourceState::Live(handle),
            image,
        })
    }

    /// Creates a color renderbuffer.
    pub fn renderbuffer(
        &self,
        descriptor: &RenderbufferDescriptor<'_>,
    ) -> Result<Renderbuffer, ResourceError> {
        validate_components(descriptor.components)?;
        validate_samples(descriptor.samples)?;

        let (width, height) = descriptor.size;
        self.create_renderbuffer(ImageInfo {
            width,
            height,
            components: descriptor.components,
            samples: descriptor.samples,
            float: descriptor.float,
            depth: false,
        })
    }

    /// Creates a depth renderbuffer.
    pub fn depth_renderbuffer(
        &self,
        size: (u32, u32),
        samples: u32,
    ) -> Result<Renderbuffer, ResourceError> {
        validate_samples(samples)?;

        let (width, height) = size;
        self.create_renderbuffer(ImageInfo {
            width,
            height,
            components: 1,
            samples,
            float: true,
            depth: true,
        })
    }

    pub(crate) fn create_renderbuffer(&self, image: ImageInfo) -> Result<Renderbuffer, ResourceError> {
        let handle = self
            .driver
            .create_renderbuffer()
            .ok_or(ResourceError::AllocationFailed {
                kind: Renderbuffer::KIND,
            })?;

        {
            let mut scope = BindScope::new(self.driver());
            scope.bind(BindingPoint::Renderbuffer, Some(handle));
            self.driver
                .renderbuffer_storage(image.format(), image.width, image.height, image.samples);
        }

        self.poll_errors(Renderbuffer::KIND);
        log::debug!(
            "Created renderbuffer {} ({}x{}, {:?}, {} samples)",
            handle.get(),
            image.width,
            image.height,
            image.format(),
            image.samples
        );

        Ok(Renderbuffer {
            context: self.id,
            state: ResourceState::Live(handle),
            image,
        })
    }
}
