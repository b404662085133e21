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

//! Defines the application-facing renderable entity.

use std::sync::Arc;

use crate::math::{Vec2, Vec3};
use crate::renderer::api::{ShaderProgram, Texture};
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::GraphicsDevice;
use crate::renderer::GeometryBuffer;

use super::context::RenderContext;
use super::light::Light;

/// Number of vec3 slots in the per-shape uniform block.
const SHAPE_UNIFORM_SLOTS: usize = 6;

/// A renderable entity composed of one or more geometry buffers.
///
/// Each buffer carries the part of the shape rendered with its own
/// material and textures. The shape owns its buffers outright; the shader
/// is shared (`Arc`) and follows a single-shader-per-shape policy: when
/// individual buffers are given different shaders, the last writer wins.
#[derive(Debug)]
pub struct Shape {
    name: String,
    /// World-space position.
    pub position: Vec3,
    /// Rotation around the x, y and z axes, in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    buffers: Vec<GeometryBuffer>,
    shader: Option<Arc<ShaderProgram>>,
}

impl Shape {
    /// Creates an empty shape at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            buffers: Vec::new(),
            shader: None,
        }
    }

    /// Adds a geometry buffer to the shape.
    pub fn with_buffer(mut self, buffer: GeometryBuffer) -> Self {
        self.buffers.push(buffer);
        self
    }

    /// Adds a geometry buffer to the shape.
    pub fn add_buffer(&mut self, buffer: GeometryBuffer) {
        self.buffers.push(buffer);
    }

    /// The shape's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape's geometry buffers.
    pub fn buffers(&self) -> &[GeometryBuffer] {
        &self.buffers
    }

    /// Mutable access to one geometry buffer.
    pub fn buffer_mut(&mut self, index: usize) -> Option<&mut GeometryBuffer> {
        self.buffers.get_mut(index)
    }

    /// The shader the shape draws with, if one has been set.
    pub fn shader(&self) -> Option<&Arc<ShaderProgram>> {
        self.shader.as_ref()
    }

    /// Sets the draw details of every buffer and records the shader on the
    /// shape.
    pub fn set_draw_details(
        &mut self,
        shader: &Arc<ShaderProgram>,
        textures: &[Arc<Texture>],
        tiles: f32,
        shininess: f32,
        u_mult: f32,
        v_mult: f32,
    ) {
        for buffer in &mut self.buffers {
            buffer.set_draw_details(shader, textures, tiles, shininess, u_mult, v_mult);
        }
        self.shader = Some(Arc::clone(shader));
    }

    /// Sets the draw details of a single buffer, back-propagating its
    /// shader to the shape (last writer wins).
    ///
    /// Out-of-range indices are ignored.
    pub fn set_buffer_draw_details(
        &mut self,
        index: usize,
        shader: &Arc<ShaderProgram>,
        textures: &[Arc<Texture>],
        tiles: f32,
        shininess: f32,
        u_mult: f32,
        v_mult: f32,
    ) {
        if let Some(buffer) = self.buffers.get_mut(index) {
            buffer.set_draw_details(shader, textures, tiles, shininess, u_mult, v_mult);
            self.shader = Some(Arc::clone(shader));
        }
    }

    /// Sets the material base colour of every buffer.
    pub fn set_material(&mut self, rgb: Vec3) {
        for buffer in &mut self.buffers {
            buffer.set_material(rgb);
        }
    }

    /// Sets the texture coordinate offset of every buffer.
    pub fn set_offset(&mut self, offset: Vec2) {
        for buffer in &mut self.buffers {
            buffer.set_offset(offset);
        }
    }

    /// Draws the shape: activates its shader program, uploads the
    /// shape-level uniform block from the shape transform and the context
    /// light, then draws each buffer in order.
    ///
    /// The first failing buffer aborts the draw; whether the frame carries
    /// on without this shape is the caller's policy.
    pub fn draw(
        &mut self,
        device: &dyn GraphicsDevice,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let shader = match &self.shader {
            Some(shader) => Arc::clone(shader),
            None => return Err(ResourceError::MissingShader.into()),
        };

        device.use_program(shader.program)?;
        device.upload_vec3_uniforms(
            shader.shape_block,
            &self.uniform_slots(context.light),
        )?;

        for buffer in &mut self.buffers {
            buffer.draw(device, None, None, None, None)?;
        }
        Ok(())
    }

    /// Lays the shape transform and light values out as vec3 upload slots.
    fn uniform_slots(&self, light: &Light) -> [[f32; 3]; SHAPE_UNIFORM_SLOTS] {
        [
            self.position.to_array(),
            self.rotation.to_array(),
            self.scale.to_array(),
            light.direction.to_array(),
            light.color.to_rgb_array(),
            light.ambient.to_rgb_array(),
        ]
    }
}
