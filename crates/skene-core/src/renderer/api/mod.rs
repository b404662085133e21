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

//! Backend-agnostic resource handles and descriptors.
//!
//! The types here are the vocabulary shared between the geometry buffer
//! core and a concrete [`GraphicsDevice`](crate::renderer::GraphicsDevice)
//! implementation: opaque ids for GPU objects, the descriptors used to
//! create them, and the thin texture/shader capability types the draw path
//! consumes.

pub mod buffer;
pub mod shader;
pub mod texture;

pub use self::buffer::{BufferDescriptor, BufferId, BufferKind, IndexFormat};
pub use self::shader::{
    AttributeLocation, ShaderProgram, ShaderProgramId, UniformLocation, VertexAttributeLocations,
};
pub use self::texture::{Texture, TextureId};
