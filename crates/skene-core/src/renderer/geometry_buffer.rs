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

//! The vertex buffer core: packed geometry, GPU buffer lifecycle, and the
//! per-draw-call contract.

use std::borrow::Cow;
use std::sync::Arc;

use crate::geometry::{estimate_normals, Face, NormalSmoothing, PackedGeometry};
use crate::math::{Vec2, Vec3};
use crate::renderer::api::{
    BufferDescriptor, BufferId, BufferKind, ShaderProgram, Texture,
};
use crate::renderer::draw_state::{DrawState, BLEND_FACTOR_BLENDED, BLEND_FACTOR_OPAQUE};
use crate::renderer::error::{RenderError, ResourceError, ValidationError};
use crate::renderer::traits::GraphicsDevice;

/// The GPU residency of a geometry buffer.
///
/// `Unloaded → Loaded` happens once, on the first draw (or an explicit
/// [`GeometryBuffer::ensure_loaded`]); `Loaded → Loaded` on every
/// [`GeometryBuffer::re_init`]. There is no transition back: the buffer
/// objects live until [`GeometryBuffer::release`].
#[derive(Debug, Clone, Copy)]
enum GpuState {
    Unloaded,
    Loaded(GpuGeometry),
}

/// The GPU-side buffer objects and their fixed allocation sizes.
#[derive(Debug, Clone, Copy)]
struct GpuGeometry {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    vertex_bytes: u64,
    index_bytes: u64,
}

/// Holds the packed vertex data and indices for one part of a shape that
/// is rendered with its own material and textures; a
/// [`Shape`](crate::scene::Shape) holds one or more of these.
///
/// Construction validates the raw geometry, derives normals when none are
/// supplied, and packs everything into upload-ready blocks. The GPU buffer
/// objects are created lazily on the first draw, so geometry that is
/// constructed but never rendered costs no GPU memory.
#[derive(Debug)]
pub struct GeometryBuffer {
    packed: PackedGeometry,
    draw_state: DrawState,
    gpu: GpuState,
    shader: Option<Arc<ShaderProgram>>,
    textures: Vec<Arc<Texture>>,
    label: Option<String>,
}

impl GeometryBuffer {
    /// Builds a geometry buffer from raw attribute streams and faces.
    ///
    /// `positions` and `tex_coords` must be the same length, as must
    /// `normals` when supplied; every face index must be a valid vertex
    /// id. When `normals` is `None` they are derived from the faces with
    /// the given smoothing strategy.
    ///
    /// Validation happens before anything else, so a failing construction
    /// creates no state at all, GPU or otherwise.
    pub fn new(
        positions: &[Vec3],
        tex_coords: &[Vec2],
        faces: &[Face],
        normals: Option<&[Vec3]>,
        smoothing: NormalSmoothing,
    ) -> Result<Self, ValidationError> {
        let packed = Self::build_packed(positions, tex_coords, faces, normals, smoothing)?;
        Ok(Self {
            packed,
            draw_state: DrawState::default(),
            gpu: GpuState::Unloaded,
            shader: None,
            textures: Vec::new(),
            label: None,
        })
    }

    /// Sets a debug label, used in buffer labels and log output.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replaces the geometry while keeping the draw state and, when the
    /// buffer is already resident, the existing GPU allocations.
    ///
    /// The arguments and the validation/normal-derivation path are the
    /// same as [`GeometryBuffer::new`]. The byte size of the newly packed
    /// data must equal the original allocation: the host API reuses the
    /// buffer objects in place and does not police their size itself, so a
    /// size change is rejected here before any upload.
    pub fn re_init(
        &mut self,
        device: &dyn GraphicsDevice,
        positions: &[Vec3],
        tex_coords: &[Vec2],
        faces: &[Face],
        normals: Option<&[Vec3]>,
        smoothing: NormalSmoothing,
    ) -> Result<(), RenderError> {
        let packed = Self::build_packed(positions, tex_coords, faces, normals, smoothing)?;

        if let GpuState::Loaded(gpu) = self.gpu {
            // Check both sizes up front: a violation must leave the GPU
            // buffers untouched, not half-written.
            let vertex_bytes = packed.vertex_bytes().len() as u64;
            if vertex_bytes != gpu.vertex_bytes {
                return Err(RenderError::PreconditionViolation {
                    buffer: BufferKind::Vertex,
                    expected: gpu.vertex_bytes,
                    actual: vertex_bytes,
                });
            }
            let index_bytes = packed.index_bytes().len() as u64;
            if index_bytes != gpu.index_bytes {
                return Err(RenderError::PreconditionViolation {
                    buffer: BufferKind::Index,
                    expected: gpu.index_bytes,
                    actual: index_bytes,
                });
            }

            device.bind_geometry(gpu.vertex_buffer, gpu.index_buffer)?;
            device.write_buffer(gpu.vertex_buffer, 0, packed.vertex_bytes())?;
            device.write_buffer(gpu.index_buffer, 0, packed.index_bytes())?;
            log::debug!(
                "re-initialised {} in place ({} vertices, {} faces)",
                self.label.as_deref().unwrap_or("geometry buffer"),
                packed.vertex_count(),
                packed.face_count()
            );
        }

        self.packed = packed;
        Ok(())
    }

    /// Creates and populates the GPU buffer objects if they do not exist
    /// yet. Idempotent: every call after the first is a no-op.
    pub fn ensure_loaded(&mut self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        if let GpuState::Loaded(_) = self.gpu {
            return Ok(());
        }

        let label = self.label.as_deref().unwrap_or("geometry");
        let vertex_bytes = self.packed.vertex_bytes();
        let index_bytes = self.packed.index_bytes();

        let vertex_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Owned(format!("{label}.vertices"))),
                kind: BufferKind::Vertex,
                size: vertex_bytes.len() as u64,
            },
            vertex_bytes,
        )?;
        let index_buffer = match device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Owned(format!("{label}.indices"))),
                kind: BufferKind::Index,
                size: index_bytes.len() as u64,
            },
            index_bytes,
        ) {
            Ok(id) => id,
            Err(err) => {
                // Don't leak the vertex buffer on a half-finished load.
                let _ = device.destroy_buffer(vertex_buffer);
                return Err(err);
            }
        };

        log::debug!(
            "loaded {label} onto the GPU ({} + {} bytes)",
            vertex_bytes.len(),
            index_bytes.len()
        );
        self.gpu = GpuState::Loaded(GpuGeometry {
            vertex_buffer,
            index_buffer,
            vertex_bytes: vertex_bytes.len() as u64,
            index_bytes: index_bytes.len() as u64,
        });
        Ok(())
    }

    /// Binds this buffer's vertex/index buffer objects as current.
    ///
    /// Used internally before attribute pointer setup and before data
    /// uploads; only valid once the buffer is resident.
    pub fn select(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        match self.gpu {
            GpuState::Loaded(gpu) => device.bind_geometry(gpu.vertex_buffer, gpu.index_buffer),
            GpuState::Unloaded => Err(ResourceError::GeometryNotResident),
        }
    }

    /// Stores the shader and texture list used by subsequent draws, plus
    /// the tiling and shininess uniform values.
    ///
    /// A shape-level call
    /// ([`Shape::set_draw_details`](crate::scene::Shape::set_draw_details))
    /// also records the shader on the owning shape.
    pub fn set_draw_details(
        &mut self,
        shader: &Arc<ShaderProgram>,
        textures: &[Arc<Texture>],
        tiles: f32,
        shininess: f32,
        u_mult: f32,
        v_mult: f32,
    ) {
        self.shader = Some(Arc::clone(shader));
        self.textures = textures.to_vec();
        self.draw_state.tiles = tiles;
        self.draw_state.shininess = shininess;
        self.draw_state.uv_scale = Vec2::new(u_mult, v_mult);
    }

    /// Sets the material base colour slot.
    pub fn set_material(&mut self, rgb: Vec3) {
        self.draw_state.material = rgb;
    }

    /// Sets the texture coordinate offset slot.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.draw_state.uv_offset = offset;
    }

    /// Draws this buffer.
    ///
    /// Ensures the GPU buffers are resident, binds them, configures the
    /// vertex attributes, binds each texture to its unit in order, uploads
    /// the per-draw uniform block and issues one indexed triangle draw
    /// over all stored indices.
    ///
    /// Blending is enabled for the whole draw if *any* bound texture
    /// requests it, in which case the blend-factor slot is set to
    /// [`BLEND_FACTOR_BLENDED`]; otherwise blending is disabled and the
    /// slot holds [`BLEND_FACTOR_OPAQUE`].
    ///
    /// The `shader` and `textures` arguments override the stored draw
    /// details for this call only; `tiles` and `shininess` overrides stick.
    /// A texture without a GPU handle fails the draw rather than silently
    /// skipping and corrupting texture unit state.
    pub fn draw(
        &mut self,
        device: &dyn GraphicsDevice,
        shader: Option<&Arc<ShaderProgram>>,
        textures: Option<&[Arc<Texture>]>,
        tiles: Option<f32>,
        shininess: Option<f32>,
    ) -> Result<(), RenderError> {
        self.ensure_loaded(device)?;

        let shader = match shader.or(self.shader.as_ref()) {
            Some(shader) => Arc::clone(shader),
            None => return Err(ResourceError::MissingShader.into()),
        };
        let textures: Vec<Arc<Texture>> = match textures {
            Some(textures) => textures.to_vec(),
            None => self.textures.clone(),
        };
        if let Some(tiles) = tiles {
            self.draw_state.tiles = tiles;
        }
        if let Some(shininess) = shininess {
            self.draw_state.shininess = shininess;
        }

        self.select(device)?;
        device.configure_vertex_attributes(&shader.attributes)?;

        device.set_blend_enabled(false)?;
        self.draw_state.blend_factor = BLEND_FACTOR_OPAQUE;

        for (unit, texture) in textures.iter().enumerate() {
            let unit = unit as u32;
            let gpu = texture
                .gpu()
                .ok_or(ResourceError::TextureUnbound { unit })?;
            let sampler = *shader
                .sampler_units
                .get(unit as usize)
                .ok_or(ResourceError::MissingSamplerSlot { unit })?;

            device.bind_texture(unit, gpu)?;
            device.set_sampler_unit(sampler, unit)?;

            if texture.blend() {
                // Any blending texture blends the whole draw.
                device.set_blend_enabled(true)?;
                self.draw_state.blend_factor = BLEND_FACTOR_BLENDED;
            }
        }

        device.upload_vec3_uniforms(shader.draw_block, &self.draw_state.to_uniform_slots())?;
        device.draw_indexed_triangles(self.packed.index_count(), self.packed.index_format())?;
        Ok(())
    }

    /// Destroys the GPU buffer objects, consuming the geometry buffer.
    ///
    /// The classic API left buffer objects to the process lifetime; tying
    /// release to destruction is the strengthened contract here. `Drop`
    /// cannot reach the device, so release is explicit.
    pub fn release(mut self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        if let GpuState::Loaded(gpu) = std::mem::replace(&mut self.gpu, GpuState::Unloaded) {
            device.destroy_buffer(gpu.vertex_buffer)?;
            device.destroy_buffer(gpu.index_buffer)?;
        }
        Ok(())
    }

    /// Whether the GPU buffer objects exist.
    pub fn is_loaded(&self) -> bool {
        matches!(self.gpu, GpuState::Loaded(_))
    }

    /// The packed CPU-side geometry.
    pub fn packed(&self) -> &PackedGeometry {
        &self.packed
    }

    /// The current per-draw uniform values.
    pub fn draw_state(&self) -> &DrawState {
        &self.draw_state
    }

    /// The shader stored by the last `set_draw_details`, if any.
    pub fn shader(&self) -> Option<&Arc<ShaderProgram>> {
        self.shader.as_ref()
    }

    /// The textures stored by the last `set_draw_details`.
    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    /// The debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn build_packed(
        positions: &[Vec3],
        tex_coords: &[Vec2],
        faces: &[Face],
        normals: Option<&[Vec3]>,
        smoothing: NormalSmoothing,
    ) -> Result<PackedGeometry, ValidationError> {
        validate_streams(positions, tex_coords, faces, normals)?;
        Ok(match normals {
            Some(normals) => PackedGeometry::build(positions, normals, tex_coords, faces),
            None => {
                let normals = estimate_normals(positions, faces, smoothing);
                PackedGeometry::build(positions, &normals, tex_coords, faces)
            }
        })
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        if let GpuState::Loaded(_) = self.gpu {
            log::warn!(
                "{} dropped while its GPU buffers are still allocated; call release() to free them",
                self.label.as_deref().unwrap_or("geometry buffer")
            );
        }
    }
}

/// Checks stream lengths and face index ranges.
fn validate_streams(
    positions: &[Vec3],
    tex_coords: &[Vec2],
    faces: &[Face],
    normals: Option<&[Vec3]>,
) -> Result<(), ValidationError> {
    let normal_len = normals.map(<[Vec3]>::len);
    if positions.len() != tex_coords.len() || normal_len.is_some_and(|n| n != positions.len()) {
        return Err(ValidationError::AttributeLengthMismatch {
            positions: positions.len(),
            tex_coords: tex_coords.len(),
            normals: normal_len,
        });
    }

    for (face_index, face) in faces.iter().enumerate() {
        for &index in face {
            if index as usize >= positions.len() {
                return Err(ValidationError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
    }
    Ok(())
}
