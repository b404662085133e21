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

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use glow::HasContext;

use skene_core::geometry::VERTEX_STRIDE_BYTES;
use skene_core::renderer::{
    AttributeLocation, BufferDescriptor, BufferId, GraphicsDevice, IndexFormat, ResourceError,
    ShaderProgramId, TextureId, UniformLocation, VertexAttributeLocations,
};

use super::conversions::IntoGl;

/// Byte offset of the normal attribute within an interleaved vertex.
const NORMAL_OFFSET: i32 = 12;
/// Byte offset of the texture coordinate attribute within an interleaved vertex.
const TEXCOORD_OFFSET: i32 = 24;

#[derive(Clone, Copy)]
struct GlesBufferEntry {
    raw: glow::Buffer,
    target: u32,
    size: u64, // To track VRAM accurately on destruction
}

/// The OpenGL ES implementation of [`GraphicsDevice`].
///
/// Owns the GL context plus the registries mapping the opaque ids of
/// `skene-core` to native GL objects. Textures and linked programs are
/// created by external collaborators (image loaders, shader compilers)
/// and adopted into the registries with [`GlesDevice::adopt_texture`] and
/// [`GlesDevice::adopt_program`].
///
/// The GL context is bound to the thread that created it; so is this
/// device. Internal registries are mutex-guarded only so that resource
/// bookkeeping can happen behind `&self`.
pub struct GlesDevice {
    gl: glow::Context,
    buffers: Mutex<HashMap<BufferId, GlesBufferEntry>>,
    textures: Mutex<HashMap<TextureId, glow::Texture>>,
    programs: Mutex<HashMap<ShaderProgramId, glow::Program>>,
    // A resolved uniform slot may be absent from the linked program (the
    // compiler pruned it); uploads to such a slot are silently ignored,
    // matching GL's own treatment of location -1.
    uniforms: Mutex<HashMap<UniformLocation, Option<glow::UniformLocation>>>,

    next_buffer_id: AtomicUsize,
    next_texture_id: AtomicUsize,
    next_program_id: AtomicUsize,
    next_uniform_id: AtomicUsize,

    // VRAM tracking
    vram_allocated_bytes: AtomicUsize,
}

impl GlesDevice {
    /// Creates a device over a GL ES context obtained from a loader
    /// function (the windowing layer's `get_proc_address`).
    ///
    /// # Safety
    ///
    /// The loader must resolve symbols of a current GL ES context that
    /// stays current on this thread for the device's lifetime.
    pub unsafe fn from_loader(
        loader: impl FnMut(&str) -> *const std::os::raw::c_void,
    ) -> Self {
        let gl = glow::Context::from_loader_function(loader);
        let version = gl.get_parameter_string(glow::VERSION);
        let renderer = gl.get_parameter_string(glow::RENDERER);
        log::info!("initialised GL ES device: {renderer} ({version})");
        Self::from_context(gl)
    }

    /// Creates a device over an already-constructed `glow` context.
    pub fn from_context(gl: glow::Context) -> Self {
        Self {
            gl,
            buffers: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
            programs: Mutex::new(HashMap::new()),
            uniforms: Mutex::new(HashMap::new()),
            next_buffer_id: AtomicUsize::new(0),
            next_texture_id: AtomicUsize::new(0),
            next_program_id: AtomicUsize::new(0),
            next_uniform_id: AtomicUsize::new(0),
            vram_allocated_bytes: AtomicUsize::new(0),
        }
    }

    /// Registers a GL texture created by an external loader and returns
    /// the opaque id the draw path uses.
    pub fn adopt_texture(&self, raw: glow::Texture) -> TextureId {
        let id = TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed));
        self.textures.lock().unwrap().insert(id, raw);
        id
    }

    /// Registers a linked GL program created by an external compiler and
    /// returns the opaque id the draw path uses.
    pub fn adopt_program(&self, raw: glow::Program) -> ShaderProgramId {
        let id = ShaderProgramId(self.next_program_id.fetch_add(1, Ordering::Relaxed));
        self.programs.lock().unwrap().insert(id, raw);
        id
    }

    /// Resolves a uniform slot of a linked program by name.
    ///
    /// A name the linker pruned still yields a usable slot; uploads to it
    /// are ignored, as GL itself ignores location -1.
    pub fn uniform_location(
        &self,
        program: ShaderProgramId,
        name: &str,
    ) -> Result<UniformLocation, ResourceError> {
        let raw = self.program(program)?;
        let native = unsafe { self.gl.get_uniform_location(raw, name) };
        if native.is_none() {
            log::debug!("uniform '{name}' not present in program {program:?}");
        }
        let location = UniformLocation(self.next_uniform_id.fetch_add(1, Ordering::Relaxed));
        self.uniforms.lock().unwrap().insert(location, native);
        Ok(location)
    }

    /// Resolves a vertex attribute slot of a linked program by name.
    ///
    /// Attributes are mandatory for the interleaved layout, so an absent
    /// name is an error rather than a silent slot.
    pub fn attribute_location(
        &self,
        program: ShaderProgramId,
        name: &str,
    ) -> Result<AttributeLocation, ResourceError> {
        let raw = self.program(program)?;
        unsafe { self.gl.get_attrib_location(raw, name) }
            .map(AttributeLocation)
            .ok_or_else(|| {
                ResourceError::Backend(format!("attribute '{name}' not found in program"))
            })
    }

    /// Total bytes currently held in buffer objects created through this
    /// device.
    pub fn vram_allocated_bytes(&self) -> usize {
        self.vram_allocated_bytes.load(Ordering::Relaxed)
    }

    fn buffer(&self, id: BufferId) -> Result<GlesBufferEntry, ResourceError> {
        self.buffers
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .ok_or(ResourceError::UnknownBuffer(id))
    }

    fn program(&self, id: ShaderProgramId) -> Result<glow::Program, ResourceError> {
        self.programs
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .ok_or(ResourceError::UnknownProgram(id))
    }

    fn uniform(
        &self,
        location: UniformLocation,
    ) -> Result<Option<glow::UniformLocation>, ResourceError> {
        self.uniforms
            .lock()
            .unwrap()
            .get(&location)
            .cloned()
            .ok_or(ResourceError::UnknownUniform(location))
    }

    fn check_gl_error(&self, what: &str) -> Result<(), ResourceError> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(ResourceError::Backend(format!(
                "{what} failed with GL error 0x{code:x}"
            )))
        }
    }
}

impl fmt::Debug for GlesDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlesDevice")
            .field("buffers", &self.buffers.lock().unwrap().len())
            .field("textures", &self.textures.lock().unwrap().len())
            .field("programs", &self.programs.lock().unwrap().len())
            .field("vram_allocated_bytes", &self.vram_allocated_bytes)
            .finish()
    }
}

impl GraphicsDevice for GlesDevice {
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let target = descriptor.kind.into_gl();
        let raw = unsafe { self.gl.create_buffer() }.map_err(ResourceError::Backend)?;
        unsafe {
            self.gl.bind_buffer(target, Some(raw));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(target, None);
        }
        if let Err(err) = self.check_gl_error("buffer allocation") {
            unsafe { self.gl.delete_buffer(raw) };
            return Err(err);
        }

        let id = BufferId(self.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        self.buffers.lock().unwrap().insert(
            id,
            GlesBufferEntry {
                raw,
                target,
                size: data.len() as u64,
            },
        );
        self.vram_allocated_bytes
            .fetch_add(data.len(), Ordering::Relaxed);
        log::debug!(
            "created {:?} {:?} ({} bytes, '{}')",
            descriptor.kind,
            id,
            data.len(),
            descriptor.label.as_deref().unwrap_or("unlabelled"),
        );
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.buffer(id)?;
        let end = offset + data.len() as u64;
        if end > entry.size {
            return Err(ResourceError::OutOfBounds {
                offset,
                len: data.len() as u64,
                size: entry.size,
            });
        }
        unsafe {
            self.gl.bind_buffer(entry.target, Some(entry.raw));
            self.gl
                .buffer_sub_data_u8_slice(entry.target, offset as i32, data);
            self.gl.bind_buffer(entry.target, None);
        }
        self.check_gl_error("buffer write")
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let entry = self
            .buffers
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(ResourceError::UnknownBuffer(id))?;
        unsafe { self.gl.delete_buffer(entry.raw) };
        self.vram_allocated_bytes
            .fetch_sub(entry.size as usize, Ordering::Relaxed);
        log::debug!("destroyed {:?} ({} bytes)", id, entry.size);
        Ok(())
    }

    fn bind_geometry(&self, vertex: BufferId, index: BufferId) -> Result<(), ResourceError> {
        let vertex_entry = self.buffer(vertex)?;
        let index_entry = self.buffer(index)?;
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(vertex_entry.raw));
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_entry.raw));
        }
        Ok(())
    }

    fn configure_vertex_attributes(
        &self,
        locations: &VertexAttributeLocations,
    ) -> Result<(), ResourceError> {
        let stride = VERTEX_STRIDE_BYTES as i32;
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                locations.position.0,
                3,
                glow::FLOAT,
                false,
                stride,
                0,
            );
            self.gl.vertex_attrib_pointer_f32(
                locations.normal.0,
                3,
                glow::FLOAT,
                false,
                stride,
                NORMAL_OFFSET,
            );
            self.gl.vertex_attrib_pointer_f32(
                locations.texcoord.0,
                2,
                glow::FLOAT,
                false,
                stride,
                TEXCOORD_OFFSET,
            );
            self.gl.enable_vertex_attrib_array(locations.position.0);
            self.gl.enable_vertex_attrib_array(locations.normal.0);
            self.gl.enable_vertex_attrib_array(locations.texcoord.0);
        }
        self.check_gl_error("vertex attribute setup")
    }

    fn use_program(&self, program: ShaderProgramId) -> Result<(), ResourceError> {
        let raw = self.program(program)?;
        unsafe { self.gl.use_program(Some(raw)) };
        Ok(())
    }

    fn bind_texture(&self, unit: u32, texture: TextureId) -> Result<(), ResourceError> {
        let raw = self
            .textures
            .lock()
            .unwrap()
            .get(&texture)
            .copied()
            .ok_or(ResourceError::UnknownTexture(texture))?;
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(raw));
        }
        Ok(())
    }

    fn set_sampler_unit(
        &self,
        location: UniformLocation,
        unit: u32,
    ) -> Result<(), ResourceError> {
        if let Some(native) = self.uniform(location)? {
            unsafe { self.gl.uniform_1_i32(Some(&native), unit as i32) };
        }
        Ok(())
    }

    fn upload_vec3_uniforms(
        &self,
        location: UniformLocation,
        slots: &[[f32; 3]],
    ) -> Result<(), ResourceError> {
        if let Some(native) = self.uniform(location)? {
            let flat: &[f32] = bytemuck::cast_slice(slots);
            unsafe { self.gl.uniform_3_f32_slice(Some(&native), flat) };
        }
        Ok(())
    }

    fn set_blend_enabled(&self, enabled: bool) -> Result<(), ResourceError> {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl
                    .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
        Ok(())
    }

    fn draw_indexed_triangles(
        &self,
        index_count: u32,
        format: IndexFormat,
    ) -> Result<(), ResourceError> {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, format.into_gl(), 0);
        }
        self.check_gl_error("indexed draw")
    }
}
