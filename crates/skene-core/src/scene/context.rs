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

//! The per-frame context a draw call receives.

use super::camera::Camera;
use super::light::Light;

/// The active camera and light for one frame.
///
/// Passed explicitly to every [`Shape::draw`](crate::scene::Shape::draw)
/// instead of living in hidden global state, so each call site decides
/// which viewpoint and which light it renders with.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The camera the frame is rendered from.
    pub camera: &'a Camera,
    /// The light shapes are shaded with.
    pub light: &'a Light,
}

impl<'a> RenderContext<'a> {
    /// Bundles a camera and a light for one frame.
    pub fn new(camera: &'a Camera, light: &'a Light) -> Self {
        Self { camera, light }
    }
}
