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

//! Shader stages, shaders, programs and compute shaders.

use super::attribute::AttributeTable;
use super::handle::{ContextId, GpuResource, Handle, ResourceState};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GlDriver;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Geometry stage.
    Geometry,
    /// Tessellation control stage.
    TessControl,
    /// Tessellation evaluation stage.
    TessEvaluation,
    /// Compute stage. Never part of a graphics [`Program`].
    Compute,
}

/// Static facts about a [`ShaderStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    /// Raw GL shader type constant.
    pub gl_enum: u32,
    /// Human-readable name, used in error messages.
    pub name: &'static str,
}

static STAGES: [StageInfo; 6] = [
    StageInfo { gl_enum: 0x8B31, name: "vertex_shader" },
    StageInfo { gl_enum: 0x8B30, name: "fragment_shader" },
    StageInfo { gl_enum: 0x8DD9, name: "geometry_shader" },
    StageInfo { gl_enum: 0x8E88, name: "tess_control_shader" },
    StageInfo { gl_enum: 0x8E87, name: "tess_evaluation_shader" },
    StageInfo { gl_enum: 0x91B9, name: "compute_shader" },
];

impl ShaderStage {
    /// The stages a graphics program is assembled from, in slot order.
    pub const GRAPHICS: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Geometry,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
    ];

    /// Index of this stage in the per-program slot table.
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Looks up the static facts of this stage.
    pub fn info(self) -> &'static StageInfo {
        &STAGES[self.slot()]
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        self.info().name
    }
}

/// A compiled shader object for one stage.
#[derive(Debug)]
pub struct Shader {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) stage: ShaderStage,
}

impl Shader {
    /// The stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The driver handle, if the shader is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }
}

impl GpuResource for Shader {
    const KIND: &'static str = "shader";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_shader(handle);
            log::debug!("Released {} {}", self.stage.name(), handle.get());
        }
    }
}

/// A linked graphics program with its reflected vertex inputs.
///
/// Releasing a program does not release the shaders it was linked from.
#[derive(Debug)]
pub struct Program {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState,
    pub(crate) attributes: AttributeTable,
    pub(crate) stages: Vec<ShaderStage>,
    pub(crate) varyings: Vec<String>,
}

impl Program {
    /// The driver handle, if the program is still live.
    pub fn handle(&self) -> Result<Handle, ResourceError> {
        self.state.live(Self::KIND)
    }

    /// The program's vertex inputs.
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// The stages linked into the program, in slot order.
    pub fn stages(&self) -> &[ShaderStage] {
        &self.stages
    }

    /// Names captured by transform feedback.
    pub fn varyings(&self) -> &[String] {
        &self.varyings
    }
}

impl GpuResource for Program {
    const KIND: &'static str = "program";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handle) = self.state.take() {
            driver.delete_program(handle);
            log::debug!("Released program {}", handle.get());
        }
    }
}

/// Driver objects behind a [`ComputeShader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeHandles {
    /// The linked program.
    pub program: Handle,
    /// The compute stage shader object.
    pub shader: Handle,
}

/// A compute shader linked into its own program.
#[derive(Debug)]
pub struct ComputeShader {
    pub(crate) context: ContextId,
    pub(crate) state: ResourceState<ComputeHandles>,
}

impl ComputeShader {
    /// The driver handles, if the compute shader is still live.
    pub fn handles(&self) -> Result<ComputeHandles, ResourceError> {
        self.state.live(Self::KIND)
    }
}

impl GpuResource for ComputeShader {
    const KIND: &'static str = "compute shader";

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn is_live(&self) -> bool {
        self.state.is_live()
    }

    fn release_with(&mut self, driver: &dyn GlDriver) {
        if let Some(handles) = self.state.take() {
            driver.delete_shader(handles.shader);
            driver.delete_program(handles.program);
            log::debug!("Released compute shader {}", handles.program.get());
        }
    }
}

/// Checks that `source` can be handed to a C-string based compiler.
pub(crate) fn validate_source(source: &str) -> Result<(), crate::renderer::error::ShaderError> {
    use crate::renderer::error::ShaderError;

    if source.trim().is_empty() {
        return Err(ShaderError::InvalidSource {
            reason: "the source is empty",
        });
    }
    if source.contains('\0') {
        return Err(ShaderError::InvalidSource {
            reason: "the source contains a NUL byte",
        });
    }
    Ok(())
}
