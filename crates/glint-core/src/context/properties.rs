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

//! Readable and writable context state.

use super::Context;
use crate::renderer::api::texture::validate_alignment;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;

impl Context {
    /// Rasterized line width.
    pub fn line_width(&self) -> f32 {
        self.driver.get_float(FloatParam::LineWidth)
    }

    /// Sets the rasterized line width.
    pub fn set_line_width(&self, width: f32) {
        self.driver.set_line_width(width);
    }

    /// Rasterized point size.
    pub fn point_size(&self) -> f32 {
        self.driver.get_float(FloatParam::PointSize)
    }

    /// Sets the rasterized point size.
    pub fn set_point_size(&self, size: f32) {
        self.driver.set_point_size(size);
    }

    /// The viewport rectangle.
    pub fn viewport(&self) -> Viewport {
        self.driver.viewport()
    }

    /// Sets the viewport from `(x, y, width, height)` or `(width, height)`.
    pub fn set_viewport(&self, viewport: impl Into<Viewport>) {
        self.driver.set_viewport(viewport.into());
    }

    /// `(pack, unpack)` row alignment.
    pub fn pixel_alignment(&self) -> (u32, u32) {
        let read = |param| u32::try_from(self.driver.get_integer(param)).unwrap_or(0);
        (
            read(IntegerParam::PackAlignment),
            read(IntegerParam::UnpackAlignment),
        )
    }

    /// Sets `(pack, unpack)` row alignment. Each must be 1, 2, 4 or 8.
    pub fn set_pixel_alignment(&self, (pack, unpack): (u32, u32)) -> Result<(), ResourceError> {
        validate_alignment(pack)?;
        validate_alignment(unpack)?;
        self.driver.pixel_store(PixelStore::PackAlignment, pack);
        self.driver.pixel_store(PixelStore::UnpackAlignment, unpack);
        Ok(())
    }

    /// Texture unit used for uploads and texture copies.
    pub fn default_texture_unit(&self) -> u32 {
        self.default_texture_unit.get()
    }

    /// Changes the upload texture unit.
    pub fn set_default_texture_unit(&self, unit: u32) -> Result<(), ResourceError> {
        if unit >= self.max_texture_units {
            return Err(ResourceError::InvalidTextureUnit {
                unit,
                max: self.max_texture_units,
            });
        }
        self.default_texture_unit.set(unit);
        Ok(())
    }

    /// Number of texture image units.
    pub fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    /// Returns `true` while polygons are rasterized as lines.
    pub fn wireframe(&self) -> bool {
        self.wireframe.get()
    }

    /// Switches between line and fill polygon rasterization.
    pub fn set_wireframe(&self, wireframe: bool) {
        let mode = if wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        };
        self.driver.polygon_mode(mode);
        self.wireframe.set(wireframe);
    }

    /// Reads and clears the driver's error flag.
    pub fn error(&self) -> DriverError {
        DriverError::from_raw(self.driver.get_error())
    }

    /// The implementation vendor.
    pub fn vendor(&self) -> Result<String, ResourceError> {
        self.driver_string(StringName::Vendor, "vendor")
    }

    /// The renderer, usually the GPU model.
    pub fn renderer(&self) -> Result<String, ResourceError> {
        self.driver_string(StringName::Renderer, "renderer")
    }

    /// The full version string.
    pub fn version(&self) -> Result<String, ResourceError> {
        self.driver_string(StringName::Version, "version")
    }

    fn driver_string(&self, name: StringName, what: &'static str) -> Result<String, ResourceError> {
        self.driver
            .get_string(name)
            .ok_or(ResourceError::MissingDriverString(what))
    }

    /// The version as `major * 100 + minor * 10`, e.g. 330 for 3.3.
    pub fn version_code(&self) -> u32 {
        let major = u32::try_from(self.driver.get_integer(IntegerParam::MajorVersion)).unwrap_or(0);
        let minor = u32::try_from(self.driver.get_integer(IntegerParam::MinorVersion)).unwrap_or(0);
        major.saturating_mul(100).saturating_add(minor.saturating_mul(10))
    }
}
