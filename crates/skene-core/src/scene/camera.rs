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

//! Defines the camera a frame is rendered from.

use crate::math::Vec3;

/// The viewpoint of a frame.
///
/// A plain parameter container: view/projection matrix construction is the
/// application's concern. There is no process-wide default camera; the
/// active camera reaches a draw call through the
/// [`RenderContext`](crate::scene::RenderContext) it is part of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The eye position in world space.
    pub position: Vec3,
    /// The point the camera looks at.
    pub target: Vec3,
    /// The vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// The near clipping distance.
    pub near: f32,
    /// The far clipping distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::Z,
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// The normalized direction the camera is looking in.
    ///
    /// Falls back to +Z when position and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::Z)
    }
}
