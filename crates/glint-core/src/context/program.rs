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

//! Shader, program, and compute shader creation.

use super::Context;
use crate::renderer::api::shader::validate_source;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};

impl Context {
    /// Compiles a shader for one graphics stage.
    pub fn shader(&self, stage: ShaderStage, source: &str) -> Result<Shader, ResourceError> {
        if stage == ShaderStage::Compute {
            return Err(ResourceError::StageMismatch(stage));
        }
        validate_source(source)?;

        let handle = self
            .driver
            .compile_shader(stage, source)
            .map_err(|log| ShaderError::CompilationFailed { stage, log })?;

        self.poll_errors(stage.name());
        log::debug!("Compiled {} {}", stage.name(), handle.get());

        Ok(Shader {
            context: self.id,
            state: ResourceState::Live(handle),
            stage,
        })
    }

    /// Compiles a vertex shader.
    pub fn vertex_shader(&self, source: &str) -> Result<Shader, ResourceError> {
        self.shader(ShaderStage::Vertex, source)
    }

    /// Compiles a fragment shader.
    pub fn fragment_shader(&self, source: &str) -> Result<Shader, ResourceError> {
        self.shader(ShaderStage::Fragment, source)
    }

    /// Compiles a geometry shader.
    pub fn geometry_shader(&self, source: &str) -> Result<Shader, ResourceError> {
        self.shader(ShaderStage::Geometry, source)
    }

    /// Compiles a tessellation control shader.
    pub fn tess_control_shader(&self, source: &str) -> Result<Shader, ResourceError> {
        self.shader(ShaderStage::TessControl, source)
    }

    /// Compiles a tessellation evaluation shader.
    pub fn tess_evaluation_shader(&self, source: &str) -> Result<Shader, ResourceError> {
        self.shader(ShaderStage::TessEvaluation, source)
    }

    /// Links shaders into a program and reflects its vertex inputs.
    ///
    /// At most one shader per stage. `varyings` names outputs captured by transform
    /// feedback.
    pub fn program(&self, shaders: &[&Shader], varyings: &[&str]) -> Result<Program, ResourceError> {
        let mut slots = [0u8; ShaderStage::GRAPHICS.len()];
        let mut handles = Vec::with_capacity(shaders.len());

        for (i, shader) in shaders.iter().enumerate() {
            self.ensure_owned(shader.context, || format!("shaders[{i}]"))?;

            let slot = &mut slots[shader.stage.slot()];
            *slot += 1;
            if *slot > 1 {
                return Err(ResourceError::DuplicateSlot(shader.stage));
            }
            handles.push(shader.handle()?);
        }

        if varyings.iter().any(|name| name.contains('\0')) {
            return Err(ShaderError::InvalidSource {
                reason: "a varying name contains a NUL byte",
            }
            .into());
        }

        let handle = self
            .driver
            .link_program(&handles, varyings)
            .map_err(|log| ShaderError::LinkFailed { log })?;

        let attributes = AttributeTable::from_active(self.driver.active_attributes(handle));
        let mut stages: Vec<ShaderStage> = shaders.iter().map(|shader| shader.stage).collect();
        stages.sort_by_key(|stage| stage.slot());

        self.poll_errors(Program::KIND);
        log::debug!(
            "Linked program {} ({} shaders, {} attributes, {} varyings)",
            handle.get(),
            shaders.len(),
            attributes.len(),
            varyings.len()
        );

        Ok(Program {
            context: self.id,
            state: ResourceState::Live(handle),
            attributes,
            stages,
            varyings: varyings.iter().map(|name| (*name).to_owned()).collect(),
        })
    }

    /// Compiles a compute shader and links it into its own program.
    pub fn compute_shader(&self, source: &str) -> Result<ComputeShader, ResourceError> {
        validate_source(source)?;

        let stage = ShaderStage::Compute;
        let shader = self
            .driver
            .compile_shader(stage, source)
            .map_err(|log| ShaderError::CompilationFailed { stage, log })?;

        let program = match self.driver.link_program(&[shader], &[]) {
            Ok(program) => program,
            Err(log) => {
                self.driver.delete_shader(shader);
                return Err(ShaderError::LinkFailed { log }.into());
            }
        };

        self.poll_errors(ComputeShader::KIND);
        log::debug!("Linked compute shader {}", program.get());

        Ok(ComputeShader {
            context: self.id,
            state: ResourceState::Live(ComputeHandles { program, shader }),
        })
    }
}
