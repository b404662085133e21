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

//! Exercises the CPU side of the geometry pipeline without a GPU:
//! construction, normal estimation, packing, and draw-state configuration.

use anyhow::Result;

use skene_core::geometry::NormalSmoothing;
use skene_core::math::{Vec2, Vec3};
use skene_core::renderer::GeometryBuffer;
use skene_core::scene::{Camera, Light, RenderContext, Shape};

/// A unit quad in the XY plane, normals left to the estimator.
fn quad_buffer() -> Result<GeometryBuffer> {
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
    Ok(
        GeometryBuffer::new(&positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)?
            .with_label("quad"),
    )
}

/// A unit cube with shared corners, smooth normals.
fn cube_buffer() -> Result<GeometryBuffer> {
    let positions: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                (i & 1) as f32,
                ((i >> 1) & 1) as f32,
                ((i >> 2) & 1) as f32,
            )
        })
        .collect();
    let tex_coords: Vec<Vec2> = positions.iter().map(|p| Vec2::new(p.x, p.y)).collect();
    let faces = vec![
        [0, 2, 1],
        [1, 2, 3], // z = 0
        [4, 5, 6],
        [5, 7, 6], // z = 1
        [0, 1, 4],
        [1, 5, 4], // y = 0
        [2, 6, 3],
        [3, 6, 7], // y = 1
        [0, 4, 2],
        [2, 4, 6], // x = 0
        [1, 3, 5],
        [3, 7, 5], // x = 1
    ];
    Ok(
        GeometryBuffer::new(&positions, &tex_coords, &faces, None, NormalSmoothing::Smooth)?
            .with_label("cube"),
    )
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("debug")).init();

    let quad = quad_buffer()?;
    log::info!(
        "quad: {} vertices packed into {} floats, {} indices ({:?})",
        quad.packed().vertex_count(),
        quad.packed().vertex_data().len(),
        quad.packed().index_count(),
        quad.packed().index_format(),
    );
    // The estimator put +Z into the normal slot of every quad vertex.
    let first_normal = &quad.packed().vertex_data()[3..6];
    log::info!("quad normal at vertex 0: {first_normal:?}");

    let mut cube = Shape::new("cube").with_buffer(cube_buffer()?);
    cube.position = Vec3::new(0.0, 0.5, 4.0);
    cube.set_material(Vec3::new(0.8, 0.3, 0.1));
    cube.set_offset(Vec2::new(0.25, 0.0));
    if let Some(buffer) = cube.buffer_mut(0) {
        log::info!("cube draw uniforms: {:?}", buffer.draw_state().to_uniform_slots());
        log::info!("cube loaded on GPU: {}", buffer.is_loaded());
    }

    // The frame context carries camera and light explicitly; drawing would
    // hand it to `Shape::draw` together with a GL-backed device.
    let camera = Camera::default();
    let light = Light::default();
    let context = RenderContext::new(&camera, &light);
    log::info!(
        "frame context ready: camera at {:?}, light from {:?}",
        context.camera.position,
        context.light.direction,
    );

    Ok(())
}
