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

//! The per-draw uniform block of a geometry buffer.

use crate::math::{Vec2, Vec3};

/// Blend-factor slot value when no bound texture requests blending.
pub const BLEND_FACTOR_OPAQUE: f32 = 0.6;

/// Blend-factor slot value when any bound texture requests blending.
pub const BLEND_FACTOR_BLENDED: f32 = 0.05;

/// The per-draw uniform values of one geometry buffer.
///
/// Uploaded every draw as four vec3 slots:
///
/// | slot | contents                          |
/// |------|-----------------------------------|
/// | 0    | tiles, shininess, blend factor    |
/// | 1    | material r, g, b                  |
/// | 2    | uv scale u, v (third unused)      |
/// | 3    | uv offset u, v (third unused)     |
///
/// Named fields replace the raw slot-indexed float array of the classic
/// layout; [`DrawState::to_uniform_slots`] reproduces the exact upload
/// order. The blend factor slot is recomputed on every draw from the bound
/// textures' blend flags; all other fields change only through the
/// configuration calls on
/// [`GeometryBuffer`](crate::renderer::GeometryBuffer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    /// Tiling multiple for the normal map; 0.0 disables normal mapping.
    pub tiles: f32,
    /// Reflection strength, 0.0 to 1.0.
    pub shininess: f32,
    /// Shading-stage blend parameter, distinct from the GPU blend-enable
    /// flag. Recomputed each draw.
    pub blend_factor: f32,
    /// Material base colour.
    pub material: Vec3,
    /// Texture coordinate multipliers for tiling in u and v.
    pub uv_scale: Vec2,
    /// Texture coordinate offset in u and v.
    pub uv_offset: Vec2,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            tiles: 0.0,
            shininess: 0.0,
            blend_factor: 1.0,
            material: Vec3::new(0.5, 0.5, 0.5),
            uv_scale: Vec2::ONE,
            uv_offset: Vec2::ZERO,
        }
    }
}

impl DrawState {
    /// Lays the fields out as the four vec3 upload slots.
    pub fn to_uniform_slots(&self) -> [[f32; 3]; 4] {
        [
            [self.tiles, self.shininess, self.blend_factor],
            self.material.to_array(),
            [self.uv_scale.x, self.uv_scale.y, 0.0],
            [self.uv_offset.x, self.uv_offset.y, 0.0],
        ]
    }
}
