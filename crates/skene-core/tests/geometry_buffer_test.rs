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

//! Integration tests for the geometry buffer's GPU lifecycle and draw-call
//! contract, exercised against a recording mock device.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use skene_core::geometry::NormalSmoothing;
use skene_core::math::{Vec2, Vec3};
use skene_core::renderer::{
    AttributeLocation, BufferDescriptor, BufferId, BufferKind, GeometryBuffer, GraphicsDevice,
    IndexFormat, RenderError, ResourceError, ShaderProgram, ShaderProgramId, Texture, TextureId,
    UniformLocation, VertexAttributeLocations, BLEND_FACTOR_BLENDED, BLEND_FACTOR_OPAQUE,
};
use skene_core::scene::{Camera, Light, RenderContext, Shape};

/// Every device interaction the mock records, in call order.
#[derive(Debug, Clone, PartialEq)]
enum DeviceCall {
    CreateBuffer { kind: BufferKind, bytes: usize },
    WriteBuffer { id: BufferId, offset: u64, bytes: usize },
    DestroyBuffer(BufferId),
    BindGeometry { vertex: BufferId, index: BufferId },
    ConfigureAttributes,
    UseProgram(ShaderProgramId),
    BindTexture { unit: u32, id: TextureId },
    SetSamplerUnit { location: UniformLocation, unit: u32 },
    UploadVec3 { location: UniformLocation, slots: Vec<[f32; 3]> },
    SetBlend(bool),
    DrawIndexed { count: u32, format: IndexFormat },
}

/// A `GraphicsDevice` that records every call instead of talking to a GPU.
#[derive(Debug, Default)]
struct MockGraphicsDevice {
    calls: Mutex<Vec<DeviceCall>>,
    next_buffer_id: AtomicUsize,
    /// When set, index-buffer creation fails with a backend error.
    fail_index_creation: bool,
}

impl MockGraphicsDevice {
    fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// The slots of the last vec3 upload to `location`.
    fn last_upload_to(&self, location: UniformLocation) -> Option<Vec<[f32; 3]>> {
        self.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                DeviceCall::UploadVec3 { location: l, slots } if *l == location => {
                    Some(slots.clone())
                }
                _ => None,
            })
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if self.fail_index_creation && descriptor.kind == BufferKind::Index {
            return Err(ResourceError::Backend("out of memory".to_string()));
        }
        self.record(DeviceCall::CreateBuffer {
            kind: descriptor.kind,
            bytes: data.len(),
        });
        Ok(BufferId(self.next_buffer_id.fetch_add(1, Ordering::Relaxed)))
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.record(DeviceCall::WriteBuffer {
            id,
            offset,
            bytes: data.len(),
        });
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.record(DeviceCall::DestroyBuffer(id));
        Ok(())
    }

    fn bind_geometry(&self, vertex: BufferId, index: BufferId) -> Result<(), ResourceError> {
        self.record(DeviceCall::BindGeometry { vertex, index });
        Ok(())
    }

    fn configure_vertex_attributes(
        &self,
        _locations: &VertexAttributeLocations,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::ConfigureAttributes);
        Ok(())
    }

    fn use_program(&self, program: ShaderProgramId) -> Result<(), ResourceError> {
        self.record(DeviceCall::UseProgram(program));
        Ok(())
    }

    fn bind_texture(&self, unit: u32, texture: TextureId) -> Result<(), ResourceError> {
        self.record(DeviceCall::BindTexture { unit, id: texture });
        Ok(())
    }

    fn set_sampler_unit(
        &self,
        location: UniformLocation,
        unit: u32,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::SetSamplerUnit { location, unit });
        Ok(())
    }

    fn upload_vec3_uniforms(
        &self,
        location: UniformLocation,
        slots: &[[f32; 3]],
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::UploadVec3 {
            location,
            slots: slots.to_vec(),
        });
        Ok(())
    }

    fn set_blend_enabled(&self, enabled: bool) -> Result<(), ResourceError> {
        self.record(DeviceCall::SetBlend(enabled));
        Ok(())
    }

    fn draw_indexed_triangles(
        &self,
        index_count: u32,
        format: IndexFormat,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::DrawIndexed {
            count: index_count,
            format,
        });
        Ok(())
    }
}

const DRAW_BLOCK: UniformLocation = UniformLocation(10);
const SHAPE_BLOCK: UniformLocation = UniformLocation(11);

/// Helper: a shader program with two sampler slots.
fn test_shader() -> Arc<ShaderProgram> {
    Arc::new(ShaderProgram {
        program: ShaderProgramId(1),
        attributes: VertexAttributeLocations {
            position: AttributeLocation(0),
            normal: AttributeLocation(1),
            texcoord: AttributeLocation(2),
        },
        sampler_units: vec![UniformLocation(0), UniformLocation(1)],
        draw_block: DRAW_BLOCK,
        shape_block: SHAPE_BLOCK,
        label: None,
    })
}

/// Helper: a unit quad with no supplied normals.
fn quad_buffer() -> GeometryBuffer {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let tex_coords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let faces = vec![[0, 1, 2], [0, 2, 3]];
    GeometryBuffer::new(&positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)
        .expect("quad geometry is valid")
        .with_label("quad")
}

fn creation_calls(device: &MockGraphicsDevice) -> usize {
    device
        .calls()
        .iter()
        .filter(|call| matches!(call, DeviceCall::CreateBuffer { .. }))
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Lazy load lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_construction_touches_no_gpu_state() {
    let buffer = quad_buffer();
    assert!(
        !buffer.is_loaded(),
        "a freshly constructed buffer must be Unloaded"
    );
}

#[test]
fn test_ensure_loaded_is_idempotent() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();

    buffer.ensure_loaded(&device).unwrap();
    assert!(buffer.is_loaded());
    assert_eq!(
        creation_calls(&device),
        2,
        "first load creates exactly one vertex and one index buffer"
    );

    buffer.ensure_loaded(&device).unwrap();
    buffer.ensure_loaded(&device).unwrap();
    assert_eq!(
        creation_calls(&device),
        2,
        "repeated ensure_loaded must not create more buffers"
    );
}

#[test]
fn test_first_draw_uploads_lazily() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();

    buffer.draw(&device, Some(&shader), None, None, None).unwrap();
    assert_eq!(creation_calls(&device), 2, "first draw performs the upload");

    device.clear_calls();
    buffer.draw(&device, Some(&shader), None, None, None).unwrap();
    assert_eq!(
        creation_calls(&device),
        0,
        "subsequent draws reuse the existing buffers"
    );
}

#[test]
fn test_failed_index_creation_destroys_vertex_buffer() {
    let device = MockGraphicsDevice {
        fail_index_creation: true,
        ..MockGraphicsDevice::default()
    };
    let mut buffer = quad_buffer();

    let err = buffer.ensure_loaded(&device).unwrap_err();
    assert!(matches!(err, ResourceError::Backend(_)));
    assert!(!buffer.is_loaded());
    assert!(
        device
            .calls()
            .iter()
            .any(|call| matches!(call, DeviceCall::DestroyBuffer(_))),
        "the already-created vertex buffer must not leak"
    );
}

#[test]
fn test_release_destroys_both_buffers() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    buffer.ensure_loaded(&device).unwrap();

    device.clear_calls();
    buffer.release(&device).unwrap();

    let destroyed: Vec<_> = device
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DeviceCall::DestroyBuffer(_)))
        .collect();
    assert_eq!(destroyed.len(), 2, "release frees vertex and index buffers");
}

// ─────────────────────────────────────────────────────────────────────────────
// re_init
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_re_init_preserves_draw_state_and_repopulates_in_place() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();

    buffer.set_draw_details(&shader, &[], 3.0, 0.7, 2.0, 2.0);
    buffer.set_material(Vec3::new(0.8, 0.1, 0.2));
    buffer.set_offset(Vec2::new(0.5, 0.5));
    buffer.ensure_loaded(&device).unwrap();
    device.clear_calls();

    // Same topology, moved vertices: byte sizes are unchanged.
    let positions = vec![
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(2.0, 0.0, 1.0),
        Vec3::new(2.0, 2.0, 1.0),
        Vec3::new(0.0, 2.0, 1.0),
    ];
    let tex_coords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let faces = vec![[0, 1, 2], [0, 2, 3]];
    buffer
        .re_init(&device, &positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)
        .unwrap();

    assert_eq!(creation_calls(&device), 0, "re_init reuses the allocations");
    let writes: Vec<_> = device
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DeviceCall::WriteBuffer { .. }))
        .collect();
    assert_eq!(writes.len(), 2, "both blocks are repopulated in place");

    let state = buffer.draw_state();
    assert_eq!(state.tiles, 3.0);
    assert_eq!(state.shininess, 0.7);
    assert_eq!(state.material, Vec3::new(0.8, 0.1, 0.2));
    assert_eq!(state.uv_scale, Vec2::new(2.0, 2.0));
    assert_eq!(state.uv_offset, Vec2::new(0.5, 0.5));
}

#[test]
fn test_re_init_with_changed_size_is_rejected_before_upload() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    buffer.ensure_loaded(&device).unwrap();
    device.clear_calls();

    // A triangle instead of a quad: fewer vertices, fewer indices.
    let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    let tex_coords = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
    let faces = vec![[0, 1, 2]];

    let err = buffer
        .re_init(&device, &positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)
        .unwrap_err();
    assert!(matches!(err, RenderError::PreconditionViolation { .. }));
    assert!(
        device
            .calls()
            .iter()
            .all(|call| !matches!(call, DeviceCall::WriteBuffer { .. })),
        "a rejected re_init must not touch GPU memory"
    );
    // The original geometry is still in place.
    assert_eq!(buffer.packed().vertex_count(), 4);
}

#[test]
fn test_re_init_before_load_only_rebuilds_cpu_side() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();

    // Unloaded: size may change freely, nothing talks to the device.
    let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    let tex_coords = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
    let faces = vec![[0, 1, 2]];
    buffer
        .re_init(&device, &positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)
        .unwrap();

    assert!(device.calls().is_empty());
    assert_eq!(buffer.packed().vertex_count(), 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// draw() texture and blend behaviour
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_draw_with_zero_textures_disables_blending() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();

    buffer.draw(&device, Some(&shader), None, None, None).unwrap();

    let calls = device.calls();
    assert!(
        calls.contains(&DeviceCall::SetBlend(false)),
        "blending is explicitly disabled"
    );
    assert!(
        !calls.contains(&DeviceCall::SetBlend(true)),
        "nothing re-enables blending without a blending texture"
    );
    let slots = device.last_upload_to(DRAW_BLOCK).expect("uniforms uploaded");
    assert_eq!(slots[0][2], BLEND_FACTOR_OPAQUE);
}

#[test]
fn test_any_blending_texture_blends_the_whole_draw() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();
    let textures = vec![
        Arc::new(Texture::new(TextureId(7))),
        Arc::new(Texture::new(TextureId(8)).with_blend(true)),
    ];

    buffer
        .draw(&device, Some(&shader), Some(textures.as_slice()), None, None)
        .unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::SetBlend(true)));
    assert!(calls.contains(&DeviceCall::BindTexture {
        unit: 0,
        id: TextureId(7)
    }));
    assert!(calls.contains(&DeviceCall::BindTexture {
        unit: 1,
        id: TextureId(8)
    }));
    let slots = device.last_upload_to(DRAW_BLOCK).expect("uniforms uploaded");
    assert_eq!(slots[0][2], BLEND_FACTOR_BLENDED);
}

#[test]
fn test_sampler_uniforms_follow_unit_order() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();
    let textures = vec![
        Arc::new(Texture::new(TextureId(7))),
        Arc::new(Texture::new(TextureId(8))),
    ];

    buffer
        .draw(&device, Some(&shader), Some(textures.as_slice()), None, None)
        .unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::SetSamplerUnit {
        location: UniformLocation(0),
        unit: 0
    }));
    assert!(calls.contains(&DeviceCall::SetSamplerUnit {
        location: UniformLocation(1),
        unit: 1
    }));
}

#[test]
fn test_unbound_texture_fails_the_draw() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();
    let textures = vec![Arc::new(Texture::unbound())];

    let err = buffer
        .draw(&device, Some(&shader), Some(textures.as_slice()), None, None)
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::Resource(ResourceError::TextureUnbound { unit: 0 })
    );
    assert!(
        !device
            .calls()
            .iter()
            .any(|call| matches!(call, DeviceCall::DrawIndexed { .. })),
        "a failed draw must not reach the indexed draw call"
    );
}

#[test]
fn test_draw_without_shader_fails() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();

    let err = buffer.draw(&device, None, None, None, None).unwrap_err();
    assert_eq!(err, RenderError::Resource(ResourceError::MissingShader));
}

#[test]
fn test_draw_issues_one_indexed_draw_over_all_indices() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();

    buffer.draw(&device, Some(&shader), None, None, None).unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::DrawIndexed {
        count: 6,
        format: IndexFormat::Uint16
    }));
    // Geometry is bound and attributes configured before the draw lands.
    let bind = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::BindGeometry { .. }))
        .expect("geometry bound");
    let attrs = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::ConfigureAttributes))
        .expect("attributes configured");
    let draw = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::DrawIndexed { .. }))
        .expect("draw issued");
    assert!(bind < attrs && attrs < draw, "draw call order is bind → attributes → draw");
}

#[test]
fn test_tiles_and_shininess_overrides_stick() {
    let device = MockGraphicsDevice::new();
    let mut buffer = quad_buffer();
    let shader = test_shader();

    buffer
        .draw(&device, Some(&shader), None, Some(4.0), Some(0.9))
        .unwrap();
    assert_eq!(buffer.draw_state().tiles, 4.0);
    assert_eq!(buffer.draw_state().shininess, 0.9);

    // The next draw without overrides keeps the values.
    buffer.draw(&device, Some(&shader), None, None, None).unwrap();
    let slots = device.last_upload_to(DRAW_BLOCK).unwrap();
    assert_eq!(slots[0][0], 4.0);
    assert_eq!(slots[0][1], 0.9);
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape draw path
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shape_draw_activates_program_and_uploads_shape_block() {
    let device = MockGraphicsDevice::new();
    let shader = test_shader();
    let mut shape = Shape::new("quad").with_buffer(quad_buffer());
    shape.set_draw_details(&shader, &[], 0.0, 0.0, 1.0, 1.0);

    let camera = Camera::default();
    let light = Light::default();
    shape
        .draw(&device, &RenderContext::new(&camera, &light))
        .unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::UseProgram(ShaderProgramId(1))));
    let slots = device.last_upload_to(SHAPE_BLOCK).expect("shape block uploaded");
    assert_eq!(slots.len(), 6);
    assert_eq!(slots[3], [10.0, -10.0, 20.0], "default light direction");
    assert!(
        calls
            .iter()
            .any(|call| matches!(call, DeviceCall::DrawIndexed { .. })),
        "the shape's buffer is drawn"
    );
}

#[test]
fn test_shape_draw_without_shader_fails() {
    let device = MockGraphicsDevice::new();
    let mut shape = Shape::new("quad").with_buffer(quad_buffer());

    let camera = Camera::default();
    let light = Light::default();
    let err = shape
        .draw(&device, &RenderContext::new(&camera, &light))
        .unwrap_err();
    assert_eq!(err, RenderError::Resource(ResourceError::MissingShader));
}
