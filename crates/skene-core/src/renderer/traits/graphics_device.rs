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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The boundary between the geometry buffer core and a native graphics API.
///
/// A concrete implementation (the GL ES backend in `skene-infra`) owns the
/// native context and the mapping from the opaque ids in
/// [`crate::renderer::api`] to native objects. The rendering model is
/// single-threaded and immediate-mode: every method must be called on the
/// thread owning the graphics context, so the trait carries no `Send` or
/// `Sync` bound.
pub trait GraphicsDevice: Debug {
    /// Creates a new GPU buffer and initialises it with the provided data.
    /// ## Arguments
    /// * `descriptor` - The buffer configuration (kind, size, debug label).
    /// * `data` - The initial contents; its length must match `descriptor.size`.
    /// ## Returns
    /// The ID of the created buffer.
    /// ## Errors
    /// * `ResourceError` - If the backend fails to allocate or populate the buffer.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Overwrites a region of an existing GPU buffer in place.
    ///
    /// The allocation size never changes; writes past the end are rejected.
    /// ## Arguments
    /// * `id` - The buffer to write to.
    /// * `offset` - Byte offset of the write.
    /// * `data` - The bytes to write.
    /// ## Errors
    /// * `ResourceError` - If the id is unknown or the write is out of bounds.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer, releasing its memory.
    /// ## Arguments
    /// * `id` - The buffer to destroy.
    /// ## Errors
    /// * `ResourceError` - If the id is unknown.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Makes a vertex/index buffer pair the current geometry source.
    ///
    /// Subsequent attribute configuration, buffer writes, and indexed draws
    /// operate on these bindings.
    /// ## Errors
    /// * `ResourceError` - If either id is unknown.
    fn bind_geometry(&self, vertex: BufferId, index: BufferId) -> Result<(), ResourceError>;

    /// Points the vertex attributes at the currently bound vertex buffer.
    ///
    /// The layout is the packer's interleaved one: position (3 floats),
    /// normal (3 floats), texture coordinate (2 floats), 32-byte stride.
    /// ## Errors
    /// * `ResourceError` - If the backend rejects the configuration.
    fn configure_vertex_attributes(
        &self,
        locations: &VertexAttributeLocations,
    ) -> Result<(), ResourceError>;

    /// Makes a linked shader program current.
    /// ## Errors
    /// * `ResourceError` - If the id is unknown.
    fn use_program(&self, program: ShaderProgramId) -> Result<(), ResourceError>;

    /// Binds a texture to a texture unit.
    /// ## Arguments
    /// * `unit` - The texture unit to activate.
    /// * `texture` - The texture to bind.
    /// ## Errors
    /// * `ResourceError` - If the id is unknown.
    fn bind_texture(&self, unit: u32, texture: TextureId) -> Result<(), ResourceError>;

    /// Sets a sampler uniform to read from a texture unit.
    /// ## Errors
    /// * `ResourceError` - If the slot cannot be set.
    fn set_sampler_unit(&self, location: UniformLocation, unit: u32)
        -> Result<(), ResourceError>;

    /// Uploads an array of vec3 uniform slots to the current program.
    ///
    /// Used for both the per-draw block (4 slots) and the per-shape block.
    /// ## Errors
    /// * `ResourceError` - If the upload fails.
    fn upload_vec3_uniforms(
        &self,
        location: UniformLocation,
        slots: &[[f32; 3]],
    ) -> Result<(), ResourceError>;

    /// Enables or disables alpha blending for subsequent draws.
    /// ## Errors
    /// * `ResourceError` - If the backend rejects the state change.
    fn set_blend_enabled(&self, enabled: bool) -> Result<(), ResourceError>;

    /// Issues an indexed triangle draw over the currently bound geometry.
    /// ## Arguments
    /// * `index_count` - Number of indices to draw (3 per triangle).
    /// * `format` - Width of the indices in the bound index buffer.
    /// ## Errors
    /// * `ResourceError` - If the draw fails.
    fn draw_indexed_triangles(
        &self,
        index_count: u32,
        format: IndexFormat,
    ) -> Result<(), ResourceError>;
}
