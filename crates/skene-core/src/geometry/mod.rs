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

//! The CPU-side geometry pipeline.
//!
//! This module turns raw per-vertex attribute streams and triangle faces
//! into upload-ready data: [`normals::estimate_normals`] derives per-vertex
//! normals when the caller supplies none, and [`packer`] interleaves the
//! attribute streams and packs the index block. Everything here is pure
//! CPU work; GPU interaction happens in [`crate::renderer`].

pub mod normals;
pub mod packer;

pub use self::normals::{estimate_normals, NormalSmoothing};
pub use self::packer::{
    pack_indices, pack_interleaved, IndexData, PackedGeometry, VERTEX_STRIDE_BYTES,
    VERTEX_STRIDE_FLOATS,
};

/// A triangle expressed as three indices into the vertex streams.
///
/// Index values must be valid vertex ids (`index < vertex_count`); the
/// geometry buffer validates this before any packing or GPU work.
pub type Face = [u32; 3];
