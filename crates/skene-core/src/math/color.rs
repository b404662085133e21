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

//! Defines the `LinearRgba` color type and associated operations.

use std::ops::Mul;

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// Using a linear color space is crucial for correct lighting and blending.
/// The `f32` components allow component values to exceed `1.0` for HDR-style
/// light intensities.
///
/// `#[repr(C)]` ensures a consistent memory layout, which is important when
/// passing color data to graphics APIs.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the colour channels as an `[r, g, b]` array, dropping alpha.
    ///
    /// This is the form the vec3 uniform slots consume.
    #[inline]
    pub const fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for LinearRgba {
    /// The default color is opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;
    /// Scales the colour channels by a scalar, leaving alpha untouched.
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
            a: self.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_opaque() {
        let c = LinearRgba::rgb(0.2, 0.4, 0.6);
        assert_eq!(c.a, 1.0);
        assert_eq!(c.to_rgb_array(), [0.2, 0.4, 0.6]);
    }

    #[test]
    fn test_scalar_mul_leaves_alpha() {
        let c = LinearRgba::new(0.5, 0.5, 0.5, 0.8) * 2.0;
        assert_eq!(c, LinearRgba::new(1.0, 1.0, 1.0, 0.8));
    }
}
