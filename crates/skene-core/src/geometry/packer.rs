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

//! Packs attribute streams into upload-ready vertex and index blocks.
//!
//! The packing functions are pure: deterministic, no side effects beyond
//! allocation. The interleaved layout (position, normal, texture
//! coordinate, 8 floats per vertex) is the one the vertex attribute
//! pointers are configured against at draw time.

use crate::math::{Vec2, Vec3};
use crate::renderer::IndexFormat;

use super::Face;

/// Number of `f32` values per interleaved vertex: 3 position + 3 normal +
/// 2 texture coordinate.
pub const VERTEX_STRIDE_FLOATS: usize = 8;

/// Byte stride of one interleaved vertex.
pub const VERTEX_STRIDE_BYTES: usize = VERTEX_STRIDE_FLOATS * std::mem::size_of::<f32>();

/// The packed index block, at the width the vertex count requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    /// 16-bit indices (vertex count fits in `u16`).
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl IndexData {
    /// The [`IndexFormat`] matching this block.
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    /// Number of indices in the block.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    /// Whether the block holds no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw bytes of the block, ready for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// Interleaves equal-length position/normal/texcoord streams.
///
/// The output holds `positions.len() * 8` floats, laid out per vertex as
/// position (3), normal (3), texture coordinate (2).
///
/// The streams must already be validated to equal lengths.
pub fn pack_interleaved(positions: &[Vec3], normals: &[Vec3], tex_coords: &[Vec2]) -> Vec<f32> {
    debug_assert_eq!(positions.len(), normals.len());
    debug_assert_eq!(positions.len(), tex_coords.len());

    let mut data = Vec::with_capacity(positions.len() * VERTEX_STRIDE_FLOATS);
    for ((position, normal), uv) in positions.iter().zip(normals).zip(tex_coords) {
        data.extend_from_slice(&[
            position.x, position.y, position.z, normal.x, normal.y, normal.z, uv.x, uv.y,
        ]);
    }
    data
}

/// Flattens the face list into an index block, 3 indices per face in face
/// order, at a width sized to the vertex count (16-bit when it fits).
///
/// Face indices must already be validated against `vertex_count`.
pub fn pack_indices(faces: &[Face], vertex_count: usize) -> IndexData {
    if vertex_count <= u16::MAX as usize {
        IndexData::U16(
            faces
                .iter()
                .flat_map(|face| face.iter().map(|&index| index as u16))
                .collect(),
        )
    } else {
        IndexData::U32(faces.iter().flatten().copied().collect())
    }
}

/// The upload-ready form of one shape part's geometry.
///
/// Immutable once built: `re_init` replaces the whole value through the
/// same construction path, never patches it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedGeometry {
    vertex_data: Vec<f32>,
    indices: IndexData,
    vertex_count: usize,
    face_count: usize,
}

impl PackedGeometry {
    /// Packs validated attribute streams and faces.
    pub fn build(
        positions: &[Vec3],
        normals: &[Vec3],
        tex_coords: &[Vec2],
        faces: &[Face],
    ) -> Self {
        Self {
            vertex_data: pack_interleaved(positions, normals, tex_coords),
            indices: pack_indices(faces, positions.len()),
            vertex_count: positions.len(),
            face_count: faces.len(),
        }
    }

    /// The interleaved attribute block.
    pub fn vertex_data(&self) -> &[f32] {
        &self.vertex_data
    }

    /// The attribute block as raw bytes, ready for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_data)
    }

    /// The index block.
    pub fn indices(&self) -> &IndexData {
        &self.indices
    }

    /// The index block as raw bytes, ready for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    /// The index width of the packed index block.
    pub fn index_format(&self) -> IndexFormat {
        self.indices.format()
    }

    /// Total number of indices (3 per face).
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of packed vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.face_count
    }
}
