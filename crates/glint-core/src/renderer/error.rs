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

//! Defines the hierarchy of error types for resource creation and transfer.

use crate::renderer::api::buffer::MAX_BUFFER_SIZE;
use crate::renderer::api::framebuffer::FramebufferStatus;
use crate::renderer::api::shader::ShaderStage;
use std::fmt;

/// An error raised by the shader compilation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The source is not usable as shader text.
    InvalidSource {
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A stage failed to compile.
    CompilationFailed {
        /// The stage that failed.
        stage: ShaderStage,
        /// The driver's info log.
        log: String,
    },
    /// The program failed to link.
    LinkFailed {
        /// The driver's info log.
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::InvalidSource { reason } => {
                write!(f, "the source must be shader text: {reason}")
            }
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "{} compilation failed: {log}", stage.name())
            }
            ShaderError::LinkFailed { log } => write!(f, "program link failed: {log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Broad classes of [`ResourceError`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong or conflicting arguments.
    Argument,
    /// Offsets or sizes out of range.
    Range,
    /// Resources that are individually fine but inconsistent with each other.
    Validation,
    /// A resource created by another context.
    ForeignResource,
    /// The driver could not allocate an object.
    Allocation,
    /// The driver rejected the framebuffer attachment set.
    IncompleteFramebuffer,
    /// Shader compilation or program linking failed.
    CompileOrLink,
}

/// An error related to creating, using, or releasing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Two arguments that exclude each other were both given.
    ArgumentConflict(&'static str),
    /// A buffer would have zero bytes.
    EmptyBuffer,
    /// A component count outside `1..=4`.
    InvalidComponents(u32),
    /// A sample count that is neither 0 nor a power of two.
    InvalidSamples(u32),
    /// A row alignment outside `{1, 2, 4, 8}`.
    InvalidAlignment(u32),
    /// Pixel data was given for a multisample texture.
    MultisampleWithData,
    /// Pixel data does not match the size implied by the descriptor.
    SizeMismatch {
        /// Bytes the descriptor requires.
        expected: usize,
        /// Bytes given.
        actual: usize,
    },
    /// A resource belongs to a different context. Names the offending argument.
    ForeignContext(String),
    /// A resource was used after release.
    Released {
        /// The resource kind.
        kind: &'static str,
    },
    /// The vertex array content, or one binding's attribute list, is empty.
    EmptyContent(String),
    /// A format string cannot be used for this binding.
    InvalidFormat(String),
    /// A format node does not match the program input it is bound to.
    AttributeMismatch(String),
    /// Two shaders occupy the same pipeline slot.
    DuplicateSlot(ShaderStage),
    /// A shader stage used where it cannot be linked.
    StageMismatch(ShaderStage),
    /// A framebuffer needs at least one color attachment.
    EmptyAttachments,
    /// Framebuffer attachments differ in size or sample count.
    AttachmentMismatch(String),
    /// The driver reported the framebuffer as not complete.
    Incomplete(FramebufferStatus),
    /// A negative copy offset.
    BufferUnderflow,
    /// A copy range past the end of a buffer.
    BufferOverflow,
    /// A buffer size past [`MAX_BUFFER_SIZE`].
    BufferTooLarge(usize),
    /// A texture unit the driver does not have.
    InvalidTextureUnit {
        /// The requested unit.
        unit: u32,
        /// Units available.
        max: u32,
    },
    /// A copy the driver cannot express.
    UnsupportedCopy(&'static str),
    /// The driver returned no string for a query.
    MissingDriverString(&'static str),
    /// The driver failed to produce a handle.
    AllocationFailed {
        /// The resource kind.
        kind: &'static str,
    },
    /// Compilation or linking failed.
    Shader(ShaderError),
}

impl ResourceError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::ArgumentConflict(_)
            | ResourceError::EmptyBuffer
            | ResourceError::InvalidComponents(_)
            | ResourceError::InvalidSamples(_)
            | ResourceError::InvalidAlignment(_)
            | ResourceError::MultisampleWithData
            | ResourceError::SizeMismatch { .. }
            | ResourceError::Released { .. }
            | ResourceError::EmptyContent(_)
            | ResourceError::InvalidFormat(_)
            | ResourceError::EmptyAttachments
            | ResourceError::StageMismatch(_)
            | ResourceError::InvalidTextureUnit { .. }
            | ResourceError::UnsupportedCopy(_)
            | ResourceError::MissingDriverString(_) => ErrorKind::Argument,
            ResourceError::BufferUnderflow
            | ResourceError::BufferOverflow
            | ResourceError::BufferTooLarge(_) => ErrorKind::Range,
            ResourceError::AttributeMismatch(_)
            | ResourceError::DuplicateSlot(_)
            | ResourceError::AttachmentMismatch(_) => ErrorKind::Validation,
            ResourceError::ForeignContext(_) => ErrorKind::ForeignResource,
            ResourceError::AllocationFailed { .. } => ErrorKind::Allocation,
            ResourceError::Incomplete(_) => ErrorKind::IncompleteFramebuffer,
            ResourceError::Shader(_) => ErrorKind::CompileOrLink,
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::ArgumentConflict(what) => write!(f, "{what} are mutually exclusive"),
            ResourceError::EmptyBuffer => write!(f, "the buffer cannot be empty"),
            ResourceError::InvalidComponents(_) => {
                write!(f, "the components must be 1, 2, 3 or 4")
            }
            ResourceError::InvalidSamples(samples) => {
                write!(f, "the number of samples is invalid ({samples})")
            }
            ResourceError::InvalidAlignment(_) => {
                write!(f, "the alignment must be 1, 2, 4 or 8")
            }
            ResourceError::MultisampleWithData => {
                write!(f, "multisample textures are not writable directly")
            }
            ResourceError::SizeMismatch { expected, actual } => {
                write!(f, "data size mismatch {actual} != {expected}")
            }
            ResourceError::ForeignContext(what) => {
                write!(f, "{what} belongs to a different context")
            }
            ResourceError::Released { kind } => write!(f, "the {kind} was already released"),
            ResourceError::EmptyContent(msg)
            | ResourceError::InvalidFormat(msg)
            | ResourceError::AttributeMismatch(msg)
            | ResourceError::AttachmentMismatch(msg) => f.write_str(msg),
            ResourceError::DuplicateSlot(stage) => write!(f, "duplicate {}", stage.name()),
            ResourceError::StageMismatch(stage) => {
                write!(f, "{} cannot be linked into a graphics program", stage.name())
            }
            ResourceError::EmptyAttachments => {
                write!(f, "the color_attachments must not be empty")
            }
            ResourceError::Incomplete(status) => {
                write!(f, "the framebuffer is not complete ({status})")
            }
            ResourceError::BufferUnderflow => write!(f, "buffer underflow"),
            ResourceError::BufferOverflow => write!(f, "buffer overflow"),
            ResourceError::BufferTooLarge(size) => {
                write!(f, "the buffer is too large ({size} > {MAX_BUFFER_SIZE})")
            }
            ResourceError::InvalidTextureUnit { unit, max } => {
                write!(f, "texture unit {unit} is out of range (max {max})")
            }
            ResourceError::UnsupportedCopy(what) => write!(f, "unsupported copy: {what}"),
            ResourceError::MissingDriverString(what) => {
                write!(f, "missing {what} information")
            }
            ResourceError::AllocationFailed { kind } => write!(f, "cannot create {kind}"),
            ResourceError::Shader(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_cite_the_offending_values() {
        let err = ResourceError::SizeMismatch {
            expected: 48,
            actual: 47,
        };
        assert_eq!(err.to_string(), "data size mismatch 47 != 48");

        let err = ResourceError::ForeignContext("content[2][0]".to_owned());
        assert_eq!(err.to_string(), "content[2][0] belongs to a different context");

        let err = ResourceError::DuplicateSlot(ShaderStage::Fragment);
        assert_eq!(err.to_string(), "duplicate fragment_shader");
    }

    #[test]
    fn incomplete_status_is_named() {
        let err = ResourceError::Incomplete(FramebufferStatus::IncompleteMissingAttachment);
        assert_eq!(
            err.to_string(),
            "the framebuffer is not complete (INCOMPLETE_MISSING_ATTACHMENT)"
        );
        assert_eq!(err.kind(), ErrorKind::IncompleteFramebuffer);
    }

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(ResourceError::InvalidComponents(5).kind(), ErrorKind::Argument);
        assert_eq!(ResourceError::InvalidSamples(3).kind(), ErrorKind::Argument);
        assert_eq!(ResourceError::BufferOverflow.kind(), ErrorKind::Range);
        assert_eq!(
            ResourceError::AttachmentMismatch(String::new()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ResourceError::from(ShaderError::LinkFailed { log: String::new() }).kind(),
            ErrorKind::CompileOrLink
        );
    }

    #[test]
    fn shader_errors_are_sources() {
        use std::error::Error;

        let err = ResourceError::from(ShaderError::LinkFailed {
            log: "no main".to_owned(),
        });
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "program link failed: no main");
    }
}
