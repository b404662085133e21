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

//! Derives per-vertex normals from triangle faces.

use crate::math::Vec3;

use super::Face;

/// The normal assigned to a vertex no face references.
///
/// A near-zero +Z stub rather than the zero vector, so downstream shading
/// never divides by a zero-length normal.
const ZERO_VALENCE_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 0.01);

/// Strategy for combining the face normals that meet at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalSmoothing {
    /// Average the normals of all faces meeting at the vertex.
    #[default]
    Smooth,
    /// Use the first face's normal only. Cheaper, and adequate for large
    /// meshes where the seams are invisible or acceptable.
    Flat,
}

/// Computes one normal per vertex from the triangle list.
///
/// For each face `(a, b, c)` the face normal is the normalized cross
/// product of the edges `pos[a] - pos[b]` and `pos[a] - pos[c]`, and is
/// accumulated on every vertex the face references. Vertices referenced by
/// no face receive a fixed near-zero fallback (see
/// [`NormalSmoothing`] for how the accumulated contributions are combined).
///
/// Degenerate faces (zero-area triangles) contribute the +Z unit vector
/// instead of faulting on a zero-length normalization.
///
/// Face indices must already be validated against `positions.len()`.
pub fn estimate_normals(positions: &[Vec3], faces: &[Face], smoothing: NormalSmoothing) -> Vec<Vec3> {
    log::debug!(
        "estimating {:?} normals for {} vertices / {} faces",
        smoothing,
        positions.len(),
        faces.len()
    );

    let mut accumulated = vec![Vec3::ZERO; positions.len()];
    let mut first = vec![Vec3::ZERO; positions.len()];
    let mut valence = vec![0u32; positions.len()];

    for face in faces {
        let [a, b, c] = *face;
        let ab = positions[a as usize] - positions[b as usize];
        let bc = positions[a as usize] - positions[c as usize];
        let normal = ab.cross(bc).normalize_or(Vec3::Z);

        for &index in face {
            let index = index as usize;
            if valence[index] == 0 {
                first[index] = normal;
            }
            accumulated[index] += normal;
            valence[index] += 1;
        }
    }

    (0..positions.len())
        .map(|index| {
            if valence[index] == 0 {
                ZERO_VALENCE_NORMAL
            } else {
                match smoothing {
                    NormalSmoothing::Smooth => accumulated[index].normalize_or(Vec3::Z),
                    // Face normals are unit length when accumulated.
                    NormalSmoothing::Flat => first[index],
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::math::EPSILON;

    /// Four corners of the unit square in the XY plane, consistent winding.
    fn unit_square() -> (Vec<Vec3>, Vec<Face>) {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        (positions, faces)
    }

    #[test]
    fn test_unit_square_smooth_normals_point_along_z() {
        let (positions, faces) = unit_square();
        let normals = estimate_normals(&positions, &faces, NormalSmoothing::Smooth);

        assert_eq!(normals.len(), 4);
        for normal in &normals {
            assert_relative_eq!(normal.x, 0.0, epsilon = EPSILON);
            assert_relative_eq!(normal.y, 0.0, epsilon = EPSILON);
            assert_relative_eq!(normal.z, 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_estimated_normals_are_unit_length() {
        // An irregular fan around a peak vertex.
        let positions = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::new(-0.5, -1.0, 0.0),
        ];
        let faces: Vec<Face> = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];

        for smoothing in [NormalSmoothing::Smooth, NormalSmoothing::Flat] {
            let normals = estimate_normals(&positions, &faces, smoothing);
            for normal in &normals {
                assert_relative_eq!(normal.length(), 1.0, epsilon = EPSILON);
            }
        }
    }

    #[test]
    fn test_zero_valence_vertex_gets_fallback_normal() {
        let (mut positions, faces) = unit_square();
        // A fifth vertex no face references.
        positions.push(Vec3::new(5.0, 5.0, 5.0));

        let normals = estimate_normals(&positions, &faces, NormalSmoothing::Smooth);
        assert_eq!(normals[4], Vec3::new(0.0, 0.0, 0.01));
    }

    #[test]
    fn test_smooth_equals_face_normal_for_coplanar_triangles() {
        // Vertices 0 and 2 are shared by both coplanar triangles; summing two
        // identical face normals and normalizing reproduces the face normal.
        let (positions, faces) = unit_square();
        let smooth = estimate_normals(&positions, &faces, NormalSmoothing::Smooth);
        let flat = estimate_normals(&positions, &faces, NormalSmoothing::Flat);

        for (s, f) in smooth.iter().zip(&flat) {
            assert_relative_eq!(s.x, f.x, epsilon = EPSILON);
            assert_relative_eq!(s.y, f.y, epsilon = EPSILON);
            assert_relative_eq!(s.z, f.z, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_degenerate_face_does_not_fault() {
        // All three corners coincide: the face normal is a zero-length cross
        // product and must fall back to a unit vector instead of NaN.
        let positions = vec![Vec3::ZERO, Vec3::ZERO, Vec3::ZERO];
        let faces: Vec<Face> = vec![[0, 1, 2]];

        let normals = estimate_normals(&positions, &faces, NormalSmoothing::Smooth);
        for normal in &normals {
            assert!(normal.x.is_finite() && normal.y.is_finite() && normal.z.is_finite());
            assert_relative_eq!(normal.length(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_flat_mode_uses_first_face_only() {
        // Two triangles meet at vertex 0 with different orientations; flat
        // mode must ignore the second contribution.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let faces: Vec<Face> = vec![[0, 1, 2], [0, 3, 1]];

        let flat = estimate_normals(&positions, &faces, NormalSmoothing::Flat);
        let first_face_only = estimate_normals(&positions, &faces[..1], NormalSmoothing::Flat);
        assert_eq!(flat[0], first_face_only[0]);
    }
}
