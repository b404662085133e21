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

//! Provides the public, backend-agnostic rendering contracts of the toolkit.
//!
//! This module defines the "common language" for all rendering operations:
//! the abstract [`GraphicsDevice`] trait, the resource handles and
//! descriptors in [`api`], the error types, and the geometry buffer core.
//! It defines the 'what' of rendering, while the 'how' is handled by a
//! concrete backend in the `skene-infra` crate (the GL ES backend) which
//! implements these traits.

pub mod api;
pub mod draw_state;
pub mod error;
pub mod geometry_buffer;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::draw_state::{DrawState, BLEND_FACTOR_BLENDED, BLEND_FACTOR_OPAQUE};
pub use self::error::{RenderError, ResourceError, ValidationError};
pub use self::geometry_buffer::GeometryBuffer;
pub use self::traits::GraphicsDevice;
