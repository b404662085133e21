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

//! Defines the light source shapes are shaded with.

use crate::math::{LinearRgba, Vec3};

/// A directional light with an ambient term.
///
/// The pixel shade is the light colour times the texture, scaled by the
/// dot product of the light direction and the inverted surface normal,
/// plus the ambient colour times the texture.
///
/// There is no process-wide default light: the active light reaches a draw
/// call through the [`RenderContext`](crate::scene::RenderContext) it is
/// part of.
///
/// # Examples
///
/// ```
/// use skene_core::scene::Light;
/// use skene_core::math::{LinearRgba, Vec3};
///
/// // A dim warm light from above.
/// let light = Light {
///     direction: Vec3::new(1.0, -1.0, 1.0),
///     color: LinearRgba::rgb(1.0, 0.9, 0.7),
///     ambient: LinearRgba::rgb(0.2, 0.2, 0.2),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// The direction the light travels, i.e. the vector *from* the light.
    pub direction: Vec3,

    /// The colour and brightness of the direct term.
    pub color: LinearRgba,

    /// The ambient multiplier applied regardless of surface orientation.
    pub ambient: LinearRgba,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(10.0, -10.0, 20.0),
            color: LinearRgba::WHITE,
            ambient: LinearRgba::rgb(0.1, 0.1, 0.2),
        }
    }
}
