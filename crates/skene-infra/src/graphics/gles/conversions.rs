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

use skene_core::renderer::{BufferKind, IndexFormat};

/// A local extension trait to convert engine types into GL enum values.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()`
/// syntax.
pub(crate) trait IntoGl<T> {
    /// Consumes self and converts it into a GL-compatible value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for BufferKind {
    /// The binding target for this kind of buffer.
    fn into_gl(self) -> u32 {
        match self {
            BufferKind::Vertex => glow::ARRAY_BUFFER,
            BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl IntoGl<u32> for IndexFormat {
    /// The element type passed to indexed draws.
    fn into_gl(self) -> u32 {
        match self {
            IndexFormat::Uint16 => glow::UNSIGNED_SHORT,
            IndexFormat::Uint32 => glow::UNSIGNED_INT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_kinds_map_to_their_targets() {
        assert_eq!(BufferKind::Vertex.into_gl(), glow::ARRAY_BUFFER);
        assert_eq!(BufferKind::Index.into_gl(), glow::ELEMENT_ARRAY_BUFFER);
    }

    #[test]
    fn index_formats_map_to_element_types() {
        assert_eq!(IndexFormat::Uint16.into_gl(), glow::UNSIGNED_SHORT);
        assert_eq!(IndexFormat::Uint32.into_gl(), glow::UNSIGNED_INT);
    }
}
