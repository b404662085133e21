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

//! Defines the shader capability the draw path consumes.
//!
//! Shader source compilation and program linking happen outside this
//! crate; what the geometry buffer needs is a linked program's resolved
//! slots: where the vertex attributes bind and where the uniform blocks
//! and samplers upload.

/// An opaque handle representing a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderProgramId(pub usize);

/// A resolved vertex attribute binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// An opaque handle to a resolved uniform slot within a program.
///
/// Issued by the graphics device when the slot is resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub usize);

/// The attribute slots the interleaved vertex layout binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeLocations {
    /// Slot of the vertex position attribute (3 floats).
    pub position: AttributeLocation,
    /// Slot of the vertex normal attribute (3 floats).
    pub normal: AttributeLocation,
    /// Slot of the texture coordinate attribute (2 floats).
    pub texcoord: AttributeLocation,
}

/// A linked shader program's resolved slots.
///
/// Shared between many shapes and buffers via `Arc`; treated as read-only
/// during draw.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    /// The device handle of the linked program.
    pub program: ShaderProgramId,
    /// Where the vertex attributes bind.
    pub attributes: VertexAttributeLocations,
    /// Sampler uniform slots, one per texture unit, in unit order.
    pub sampler_units: Vec<UniformLocation>,
    /// The per-draw vec3 uniform block (tiling, shininess, blend factor,
    /// material, uv scale and offset).
    pub draw_block: UniformLocation,
    /// The per-shape vec3 uniform block (transform and light values).
    pub shape_block: UniformLocation,
    /// An optional debug label.
    pub label: Option<String>,
}

impl ShaderProgram {
    /// Sets a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
