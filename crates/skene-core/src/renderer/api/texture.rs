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

//! Defines the texture capability the draw path consumes.

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// A texture as the draw path sees it: a bindable handle plus a blend flag.
///
/// Image decoding and GPU upload happen outside this crate; a `Texture`
/// starts unbound and receives its handle once the external loader has
/// registered the image with the device. Drawing with an unbound texture is
/// an error, never a silent skip, so texture unit state is not corrupted
/// for the rest of the frame.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    gpu: Option<TextureId>,
    blend: bool,
    label: Option<String>,
}

impl Texture {
    /// Creates a texture bound to an existing GPU handle.
    pub fn new(gpu: TextureId) -> Self {
        Self {
            gpu: Some(gpu),
            blend: false,
            label: None,
        }
    }

    /// Creates a texture with no GPU handle yet.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Sets whether drawing with this texture requests alpha blending.
    pub fn with_blend(mut self, blend: bool) -> Self {
        self.blend = blend;
        self
    }

    /// Sets a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Binds the texture to a GPU handle.
    pub fn bind(&mut self, gpu: TextureId) {
        self.gpu = Some(gpu);
    }

    /// The GPU handle, if one is bound.
    pub fn gpu(&self) -> Option<TextureId> {
        self.gpu
    }

    /// Whether this texture requests alpha blending when drawn.
    pub fn blend(&self) -> bool {
        self.blend
    }

    /// The debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
