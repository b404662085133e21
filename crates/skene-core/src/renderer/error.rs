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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::{BufferId, BufferKind, ShaderProgramId, TextureId, UniformLocation};
use std::fmt;

/// An error in the geometry supplied to a buffer at construction or
/// re-initialisation time.
///
/// Validation runs before any GPU interaction, so a failing construction
/// never leaves partially uploaded state behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The per-vertex attribute streams disagree on the vertex count.
    AttributeLengthMismatch {
        /// Number of positions supplied.
        positions: usize,
        /// Number of texture coordinates supplied.
        tex_coords: usize,
        /// Number of normals supplied, if any were.
        normals: Option<usize>,
    },
    /// A face references a vertex id outside the vertex streams.
    FaceIndexOutOfRange {
        /// Position of the offending face in the face list.
        face: usize,
        /// The out-of-range vertex id.
        index: u32,
        /// Number of vertices actually supplied.
        vertex_count: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::AttributeLengthMismatch {
                positions,
                tex_coords,
                normals,
            } => match normals {
                Some(normals) => write!(
                    f,
                    "Attribute streams disagree: {positions} positions, {tex_coords} texture coordinates, {normals} normals"
                ),
                None => write!(
                    f,
                    "Attribute streams disagree: {positions} positions, {tex_coords} texture coordinates"
                ),
            },
            ValidationError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            } => {
                write!(
                    f,
                    "Face {face} references vertex {index}, but only {vertex_count} vertices were supplied"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// An error related to a GPU resource at draw or upload time.
///
/// Resource errors are fatal for the draw call that hit them and are
/// surfaced to the caller unchanged; whether the frame continues without
/// the failed shape is the caller's policy, not this crate's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A texture in the draw list has no GPU handle bound.
    TextureUnbound {
        /// The texture unit the texture was about to occupy.
        unit: u32,
    },
    /// The shader program has no sampler uniform slot for a texture unit.
    MissingSamplerSlot {
        /// The texture unit without a matching sampler slot.
        unit: u32,
    },
    /// A draw was issued with no shader bound and no override supplied.
    MissingShader,
    /// An operation was attempted on geometry not resident on the GPU.
    GeometryNotResident,
    /// The buffer id is not known to the graphics device.
    UnknownBuffer(BufferId),
    /// The texture id is not known to the graphics device.
    UnknownTexture(TextureId),
    /// The shader program id is not known to the graphics device.
    UnknownProgram(ShaderProgramId),
    /// The uniform location was not issued by the graphics device.
    UnknownUniform(UniformLocation),
    /// A buffer write would run past the end of the allocation.
    OutOfBounds {
        /// Byte offset of the attempted write.
        offset: u64,
        /// Length of the attempted write in bytes.
        len: u64,
        /// Size of the buffer allocation in bytes.
        size: u64,
    },
    /// An error originating from the specific graphics backend implementation.
    Backend(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::TextureUnbound { unit } => {
                write!(f, "Texture for unit {unit} has no GPU handle bound")
            }
            ResourceError::MissingSamplerSlot { unit } => {
                write!(f, "Shader program exposes no sampler slot for texture unit {unit}")
            }
            ResourceError::MissingShader => {
                write!(f, "Draw issued with no shader bound and no override supplied")
            }
            ResourceError::GeometryNotResident => {
                write!(f, "Geometry is not resident on the GPU")
            }
            ResourceError::UnknownBuffer(id) => {
                write!(f, "Unknown buffer ID: {id:?}")
            }
            ResourceError::UnknownTexture(id) => {
                write!(f, "Unknown texture ID: {id:?}")
            }
            ResourceError::UnknownProgram(id) => {
                write!(f, "Unknown shader program ID: {id:?}")
            }
            ResourceError::UnknownUniform(location) => {
                write!(f, "Unknown uniform location: {location:?}")
            }
            ResourceError::OutOfBounds { offset, len, size } => {
                write!(
                    f,
                    "Buffer write of {len} bytes at offset {offset} exceeds allocation of {size} bytes"
                )
            }
            ResourceError::Backend(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error for the geometry buffer and scene draw paths.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The supplied geometry failed validation.
    Validation(ValidationError),
    /// A GPU resource was missing or invalid.
    Resource(ResourceError),
    /// A re-initialisation tried to change the byte size of an existing GPU
    /// allocation. The host API does not police this itself, so it is
    /// checked defensively before any upload.
    PreconditionViolation {
        /// Which of the two buffer objects the size change hit.
        buffer: BufferKind,
        /// Byte size of the existing GPU allocation.
        expected: u64,
        /// Byte size of the newly packed data.
        actual: u64,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Validation(err) => write!(f, "Geometry validation failed: {err}"),
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::PreconditionViolation {
                buffer,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Re-initialisation changed the {buffer:?} buffer size from {expected} to {actual} bytes; the GPU allocation is fixed"
                )
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Validation(err) => Some(err),
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RenderError {
    fn from(err: ValidationError) -> Self {
        RenderError::Validation(err)
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}
