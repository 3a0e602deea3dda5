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

//! In-memory implementation of [`GlDriver`].

use super::reflection::reflect_inputs;
use glint_core::renderer::api::*;
use glint_core::GlDriver;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

const GL_INVALID_VALUE: u32 = 0x0501;
const GL_INVALID_OPERATION: u32 = 0x0502;

const STATUS_COMPLETE: u32 = 0x8CD5;
const STATUS_UNDEFINED: u32 = 0x8219;
const STATUS_INCOMPLETE_ATTACHMENT: u32 = 0x8CD6;
const STATUS_MISSING_ATTACHMENT: u32 = 0x8CD7;
const STATUS_INCOMPLETE_MULTISAMPLE: u32 = 0x8D56;

/// The kinds of objects the headless driver allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A buffer object.
    Buffer,
    /// A texture object.
    Texture,
    /// A renderbuffer object.
    Renderbuffer,
    /// A framebuffer object.
    Framebuffer,
    /// A shader object.
    Shader,
    /// A program object.
    Program,
    /// A vertex array object.
    VertexArray,
}

/// Width, height and samples of an allocated image.
type Extent = (u32, u32, u32);

#[derive(Debug)]
enum Object {
    Buffer(Vec<u8>),
    Texture(Option<Extent>),
    Renderbuffer(Option<Extent>),
    Framebuffer {
        colors: BTreeMap<u32, Handle>,
        depth: Option<Handle>,
    },
    Shader {
        stage: ShaderStage,
        source: String,
    },
    Program(Vec<ActiveAttribute>),
    VertexArray {
        pointers: Vec<AttribPointer>,
        divisors: HashMap<u32, u32>,
        enabled: HashSet<u32>,
    },
}

impl Object {
    fn kind(&self) -> ObjectKind {
        match self {
            Object::Buffer(_) => ObjectKind::Buffer,
            Object::Texture(_) => ObjectKind::Texture,
            Object::Renderbuffer(_) => ObjectKind::Renderbuffer,
            Object::Framebuffer { .. } => ObjectKind::Framebuffer,
            Object::Shader { .. } => ObjectKind::Shader,
            Object::Program(_) => ObjectKind::Program,
            Object::VertexArray { .. } => ObjectKind::VertexArray,
        }
    }
}

#[derive(Debug)]
struct State {
    next_handle: u32,
    objects: HashMap<Handle, Object>,
    deletions: HashMap<ObjectKind, usize>,
    buffers: HashMap<BufferTarget, Handle>,
    bindings: HashMap<BindingPoint, Handle>,
    enabled: HashSet<EnableFlag>,
    active_unit: u32,
    pack_alignment: u32,
    unpack_alignment: u32,
    viewport: Viewport,
    scissor: Viewport,
    line_width: f32,
    point_size: f32,
    polygon_mode: PolygonMode,
    blend: Option<(BlendFactor, BlendFactor)>,
    clear_color: [f32; 4],
    clears: Vec<(ClearMask, Option<Viewport>)>,
    error: u32,
    fail_next_allocation: bool,
    forced_status: Option<u32>,
    calls: Vec<String>,
}

/// A [`GlDriver`] that simulates an OpenGL 4.5 context in memory.
///
/// Shader sources containing `#error` fail to compile. Programs report the `in`
/// declarations of their vertex shader as active attributes.
#[derive(Debug)]
pub struct HeadlessDriver {
    state: RefCell<State>,
    max_texture_units: u32,
    version_numbers: (i32, i32),
    vendor: Option<String>,
    renderer: Option<String>,
    version: Option<String>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    /// A driver with 16 texture units and an 800x600 viewport.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_handle: 1,
                objects: HashMap::new(),
                deletions: HashMap::new(),
                buffers: HashMap::new(),
                bindings: HashMap::new(),
                enabled: HashSet::new(),
                active_unit: 0,
                pack_alignment: 4,
                unpack_alignment: 4,
                viewport: Viewport::from((800, 600)),
                scissor: Viewport::from((800, 600)),
                line_width: 1.0,
                point_size: 1.0,
                polygon_mode: PolygonMode::Fill,
                blend: None,
                clear_color: [0.0; 4],
                clears: Vec::new(),
                error: 0,
                fail_next_allocation: false,
                forced_status: None,
                calls: Vec::new(),
            }),
            max_texture_units: 16,
            version_numbers: (4, 5),
            vendor: Some("glint".to_owned()),
            renderer: Some("headless".to_owned()),
            version: Some("4.5 headless".to_owned()),
        }
    }

    /// Sets how many texture units the driver reports.
    pub fn with_max_texture_units(mut self, units: u32) -> Self {
        self.max_texture_units = units;
        self
    }

    /// Sets the major and minor version the driver reports.
    pub fn with_version(mut self, major: i32, minor: i32) -> Self {
        self.version_numbers = (major, minor);
        self
    }

    /// Sets the initial viewport.
    pub fn with_viewport(self, width: i32, height: i32) -> Self {
        self.state.borrow_mut().viewport = Viewport::from((width, height));
        self
    }

    /// Sets the identification strings; `None` makes the query come back empty.
    pub fn with_strings(
        mut self,
        vendor: Option<&str>,
        renderer: Option<&str>,
        version: Option<&str>,
    ) -> Self {
        self.vendor = vendor.map(str::to_owned);
        self.renderer = renderer.map(str::to_owned);
        self.version = version.map(str::to_owned);
        self
    }

    /// Makes the next object creation fail.
    pub fn fail_next_allocation(&self) {
        self.state.borrow_mut().fail_next_allocation = true;
    }

    /// Makes the next completeness check report `status`.
    pub fn force_framebuffer_status(&self, status: u32) {
        self.state.borrow_mut().forced_status = Some(status);
    }

    /// Raises a driver error flag, as a failed call would.
    pub fn raise_error(&self, code: u32) {
        self.state.borrow_mut().error = code;
    }

    /// Bytes stored in a buffer.
    pub fn buffer_contents(&self, buffer: Handle) -> Option<Vec<u8>> {
        match self.state.borrow().objects.get(&buffer) {
            Some(Object::Buffer(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Whether `handle` names a live object.
    pub fn is_alive(&self, handle: Handle) -> bool {
        self.state.borrow().objects.contains_key(&handle)
    }

    /// Number of live objects of a kind.
    pub fn live_objects(&self, kind: ObjectKind) -> usize {
        self.state
            .borrow()
            .objects
            .values()
            .filter(|object| object.kind() == kind)
            .count()
    }

    /// Number of deletions performed for a kind.
    pub fn deletions(&self, kind: ObjectKind) -> usize {
        self.state.borrow().deletions.get(&kind).copied().unwrap_or(0)
    }

    /// Width, height and samples of a texture or renderbuffer's storage.
    pub fn image_extent(&self, handle: Handle) -> Option<(u32, u32, u32)> {
        match self.state.borrow().objects.get(&handle) {
            Some(Object::Texture(extent) | Object::Renderbuffer(extent)) => *extent,
            _ => None,
        }
    }

    /// The handle attached at `point` of a framebuffer.
    pub fn attachment(&self, framebuffer: Handle, point: AttachmentPoint) -> Option<Handle> {
        match self.state.borrow().objects.get(&framebuffer) {
            Some(Object::Framebuffer { colors, depth }) => match point {
                AttachmentPoint::Color(i) => colors.get(&i).copied(),
                AttachmentPoint::Depth => *depth,
            },
            _ => None,
        }
    }

    /// Attribute pointers recorded on a vertex array, in call order.
    pub fn attrib_pointers(&self, vertex_array: Handle) -> Vec<AttribPointer> {
        match self.state.borrow().objects.get(&vertex_array) {
            Some(Object::VertexArray { pointers, .. }) => pointers.clone(),
            _ => Vec::new(),
        }
    }

    /// The divisor of an enabled location on a vertex array.
    pub fn attrib_divisor(&self, vertex_array: Handle, location: u32) -> Option<u32> {
        match self.state.borrow().objects.get(&vertex_array) {
            Some(Object::VertexArray {
                divisors, enabled, ..
            }) if enabled.contains(&location) => {
                Some(divisors.get(&location).copied().unwrap_or(0))
            }
            _ => None,
        }
    }

    /// Current (pack, unpack) pixel alignment.
    pub fn pixel_alignment(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.pack_alignment, state.unpack_alignment)
    }

    /// The texture unit selected last.
    pub fn active_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    /// Current polygon rasterization mode.
    pub fn current_polygon_mode(&self) -> PolygonMode {
        self.state.borrow().polygon_mode
    }

    /// Current blend factors, if set.
    pub fn blend_factors(&self) -> Option<(BlendFactor, BlendFactor)> {
        self.state.borrow().blend
    }

    /// Clear color set last.
    pub fn last_clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    /// Every clear so far, with the scissor rectangle active at the time.
    pub fn clears(&self) -> Vec<(ClearMask, Option<Viewport>)> {
        self.state.borrow().clears.clone()
    }

    /// The call log.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) {
        log::trace!("headless: {call}");
        self.state.borrow_mut().calls.push(call);
    }

    fn allocate(&self, object: Object) -> Option<Handle> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_allocation) {
            state.calls.push(format!("create {:?} failed", object.kind()));
            return None;
        }
        let handle = Handle::new(state.next_handle)?;
        state.next_handle += 1;
        state.calls.push(format!("create {:?} {}", object.kind(), handle.get()));
        state.objects.insert(handle, object);
        Some(handle)
    }

    fn delete(&self, kind: ObjectKind, handle: Handle) {
        let mut state = self.state.borrow_mut();
        if !state.objects.get(&handle).is_some_and(|object| object.kind() == kind) {
            log::warn!("headless: delete of unknown {kind:?} {}", handle.get());
            state.error = GL_INVALID_VALUE;
            return;
        }
        state.objects.remove(&handle);
        *state.deletions.entry(kind).or_default() += 1;
        state.bindings.retain(|_, bound| *bound != handle);
        state.buffers.retain(|_, bound| *bound != handle);
        state.calls.push(format!("delete {kind:?} {}", handle.get()));
    }

    fn set_binding(&self, point: BindingPoint, handle: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        match handle {
            Some(handle) => state.bindings.insert(point, handle),
            None => state.bindings.remove(&point),
        };
    }

    fn bound_image_mut<R>(
        &self,
        point: BindingPoint,
        f: impl FnOnce(&mut Option<Extent>) -> R,
    ) -> Option<R> {
        let mut state = self.state.borrow_mut();
        let handle = state.bindings.get(&point).copied()?;
        match state.objects.get_mut(&handle) {
            Some(Object::Texture(extent) | Object::Renderbuffer(extent)) => Some(f(extent)),
            _ => None,
        }
    }

    fn bound_vertex_array<R>(
        &self,
        f: impl FnOnce(&mut Vec<AttribPointer>, &mut HashMap<u32, u32>, &mut HashSet<u32>) -> R,
    ) -> Option<R> {
        let mut state = self.state.borrow_mut();
        let handle = state.bindings.get(&BindingPoint::VertexArray).copied()?;
        match state.objects.get_mut(&handle) {
            Some(Object::VertexArray {
                pointers,
                divisors,
                enabled,
            }) => Some(f(pointers, divisors, enabled)),
            _ => None,
        }
    }

    fn completeness(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        if let Some(status) = state.forced_status.take() {
            return status;
        }
        let Some(framebuffer) = state.bindings.get(&BindingPoint::DrawFramebuffer).copied() else {
            return STATUS_UNDEFINED;
        };
        let Some(Object::Framebuffer { colors, depth }) = state.objects.get(&framebuffer) else {
            return STATUS_UNDEFINED;
        };
        if colors.is_empty() && depth.is_none() {
            return STATUS_MISSING_ATTACHMENT;
        }

        let mut samples = None;
        for attached in colors.values().chain(depth.iter()) {
            let extent = match state.objects.get(attached) {
                Some(Object::Texture(Some(extent)) | Object::Renderbuffer(Some(extent))) => *extent,
                _ => return STATUS_INCOMPLETE_ATTACHMENT,
            };
            match samples {
                None => samples = Some(extent.2),
                Some(expected) if expected != extent.2 => return STATUS_INCOMPLETE_MULTISAMPLE,
                Some(_) => {}
            }
        }
        STATUS_COMPLETE
    }
}

impl GlDriver for HeadlessDriver {
    fn create_buffer(&self) -> Option<Handle> {
        self.allocate(Object::Buffer(Vec::new()))
    }

    fn delete_buffer(&self, buffer: Handle) {
        self.delete(ObjectKind::Buffer, buffer);
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        match buffer {
            Some(buffer) => state.buffers.insert(target, buffer),
            None => state.buffers.remove(&target),
        };
        if target == BufferTarget::Array {
            match buffer {
                Some(buffer) => state.bindings.insert(BindingPoint::ArrayBuffer, buffer),
                None => state.bindings.remove(&BindingPoint::ArrayBuffer),
            };
        }
    }

    fn buffer_data(&self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        let mut state = self.state.borrow_mut();
        let Some(handle) = state.buffers.get(&target).copied() else {
            state.error = GL_INVALID_OPERATION;
            return;
        };
        if let Some(Object::Buffer(bytes)) = state.objects.get_mut(&handle) {
            *bytes = data.map_or_else(|| vec![0; size], <[u8]>::to_vec);
        }
        state
            .calls
            .push(format!("buffer_data {:?} {} {size} {usage:?}", target, handle.get()));
    }

    fn copy_buffer_sub_data(&self, read_offset: usize, write_offset: usize, size: usize) {
        let mut state = self.state.borrow_mut();
        let (Some(src), Some(dst)) = (
            state.buffers.get(&BufferTarget::CopyRead).copied(),
            state.buffers.get(&BufferTarget::CopyWrite).copied(),
        ) else {
            state.error = GL_INVALID_OPERATION;
            return;
        };

        let chunk = match state.objects.get(&src) {
            Some(Object::Buffer(bytes)) => bytes
                .get(read_offset..read_offset + size)
                .map(<[u8]>::to_vec),
            _ => None,
        };
        let copied = match (chunk, state.objects.get_mut(&dst)) {
            (Some(chunk), Some(Object::Buffer(bytes))) => bytes
                .get_mut(write_offset..write_offset + size)
                .map(|target| target.copy_from_slice(&chunk))
                .is_some(),
            _ => false,
        };
        if !copied {
            state.error = GL_INVALID_VALUE;
        }
    }

    fn create_texture(&self) -> Option<Handle> {
        self.allocate(Object::Texture(None))
    }

    fn delete_texture(&self, texture: Handle) {
        self.delete(ObjectKind::Texture, texture);
    }

    fn active_texture(&self, unit: u32) {
        if unit >= self.max_texture_units {
            self.state.borrow_mut().error = GL_INVALID_VALUE;
            return;
        }
        self.state.borrow_mut().active_unit = unit;
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<Handle>) {
        self.set_binding(target.into(), texture);
    }

    fn set_linear_filtering(&self, target: TextureTarget) {
        self.record(format!("linear filtering {target:?}"));
    }

    fn pixel_store(&self, param: PixelStore, alignment: u32) {
        let mut state = self.state.borrow_mut();
        match param {
            PixelStore::PackAlignment => state.pack_alignment = alignment,
            PixelStore::UnpackAlignment => state.unpack_alignment = alignment,
        }
    }

    fn tex_image_2d(&self, format: TexelFormat, width: u32, height: u32, _data: Option<&[u8]>) {
        self.bound_image_mut(BindingPoint::Texture2D, |extent| {
            *extent = Some((width, height, 0));
        });
        self.record(format!("tex_image_2d {format:?} {width}x{height}"));
    }

    fn tex_image_2d_multisample(&self, format: TexelFormat, width: u32, height: u32, samples: u32) {
        self.bound_image_mut(BindingPoint::Texture2DMultisample, |extent| {
            *extent = Some((width, height, samples));
        });
        self.record(format!(
            "tex_image_2d_multisample {format:?} {width}x{height} {samples}"
        ));
    }

    fn copy_tex_image_2d(&self, target: TextureTarget, format: TexelFormat, width: u32, height: u32) {
        self.bound_image_mut(target.into(), |extent| {
            *extent = Some((width, height, 0));
        });
        self.record(format!("copy_tex_image_2d {format:?} {width}x{height}"));
    }

    fn create_renderbuffer(&self) -> Option<Handle> {
        self.allocate(Object::Renderbuffer(None))
    }

    fn delete_renderbuffer(&self, renderbuffer: Handle) {
        self.delete(ObjectKind::Renderbuffer, renderbuffer);
    }

    fn bind_renderbuffer(&self, renderbuffer: Option<Handle>) {
        self.set_binding(BindingPoint::Renderbuffer, renderbuffer);
    }

    fn renderbuffer_storage(&self, format: TexelFormat, width: u32, height: u32, samples: u32) {
        self.bound_image_mut(BindingPoint::Renderbuffer, |extent| {
            *extent = Some((width, height, samples));
        });
        self.record(format!(
            "renderbuffer_storage {format:?} {width}x{height} {samples}"
        ));
    }

    fn create_framebuffer(&self) -> Option<Handle> {
        self.allocate(Object::Framebuffer {
            colors: BTreeMap::new(),
            depth: None,
        })
    }

    fn delete_framebuffer(&self, framebuffer: Handle) {
        self.delete(ObjectKind::Framebuffer, framebuffer);
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<Handle>) {
        let points: &[BindingPoint] = match target {
            FramebufferTarget::Framebuffer => {
                &[BindingPoint::ReadFramebuffer, BindingPoint::DrawFramebuffer]
            }
            FramebufferTarget::Read => &[BindingPoint::ReadFramebuffer],
            FramebufferTarget::Draw => &[BindingPoint::DrawFramebuffer],
        };
        for &point in points {
            self.set_binding(point, framebuffer);
        }
    }

    fn attach_texture(&self, point: AttachmentPoint, _target: TextureTarget, texture: Handle) {
        self.attach(point, texture);
    }

    fn attach_renderbuffer(&self, point: AttachmentPoint, renderbuffer: Handle) {
        self.attach(point, renderbuffer);
    }

    fn check_framebuffer_status(&self) -> u32 {
        self.completeness()
    }

    fn blit_framebuffer(&self, width: i32, height: i32, mask: ClearMask) {
        let (read, draw) = {
            let state = self.state.borrow();
            (
                state.bindings.get(&BindingPoint::ReadFramebuffer).map(|h| h.get()),
                state.bindings.get(&BindingPoint::DrawFramebuffer).map(|h| h.get()),
            )
        };
        self.record(format!(
            "blit {read:?} -> {draw:?} {width}x{height} color={} depth={}",
            mask.contains(ClearMask::COLOR),
            mask.contains(ClearMask::DEPTH)
        ));
    }

    fn current_binding(&self, point: BindingPoint) -> Option<Handle> {
        self.state.borrow().bindings.get(&point).copied()
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Handle, String> {
        if let Some(line) = source.lines().position(|line| line.contains("#error")) {
            return Err(format!("0:{}: error: #error directive", line + 1));
        }
        self.allocate(Object::Shader {
            stage,
            source: source.to_owned(),
        })
        .ok_or_else(|| "cannot create shader object".to_owned())
    }

    fn delete_shader(&self, shader: Handle) {
        self.delete(ObjectKind::Shader, shader);
    }

    fn link_program(&self, shaders: &[Handle], varyings: &[&str]) -> Result<Handle, String> {
        if shaders.is_empty() {
            return Err("no shaders attached".to_owned());
        }

        let mut attributes = Vec::new();
        let mut sources = Vec::new();
        {
            let state = self.state.borrow();
            for shader in shaders {
                match state.objects.get(shader) {
                    Some(Object::Shader { stage, source }) => {
                        if *stage == ShaderStage::Vertex {
                            attributes = reflect_inputs(source);
                        }
                        sources.push(source.clone());
                    }
                    _ => return Err(format!("{} is not a shader object", shader.get())),
                }
            }
        }

        if let Some(missing) = varyings
            .iter()
            .find(|varying| !sources.iter().any(|source| source.contains(**varying)))
        {
            return Err(format!("unknown transform feedback varying {missing}"));
        }

        self.allocate(Object::Program(attributes))
            .ok_or_else(|| "cannot create program object".to_owned())
    }

    fn delete_program(&self, program: Handle) {
        self.delete(ObjectKind::Program, program);
    }

    fn use_program(&self, program: Option<Handle>) {
        self.set_binding(BindingPoint::Program, program);
    }

    fn active_attributes(&self, program: Handle) -> Vec<ActiveAttribute> {
        match self.state.borrow().objects.get(&program) {
            Some(Object::Program(attributes)) => attributes.clone(),
            _ => Vec::new(),
        }
    }

    fn create_vertex_array(&self) -> Option<Handle> {
        self.allocate(Object::VertexArray {
            pointers: Vec::new(),
            divisors: HashMap::new(),
            enabled: HashSet::new(),
        })
    }

    fn delete_vertex_array(&self, vertex_array: Handle) {
        self.delete(ObjectKind::VertexArray, vertex_array);
    }

    fn bind_vertex_array(&self, vertex_array: Option<Handle>) {
        self.set_binding(BindingPoint::VertexArray, vertex_array);
    }

    fn vertex_attrib_pointer(&self, pointer: &AttribPointer) {
        let pointer = *pointer;
        if self
            .bound_vertex_array(|pointers, _, _| pointers.push(pointer))
            .is_none()
        {
            self.state.borrow_mut().error = GL_INVALID_OPERATION;
        }
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        self.bound_vertex_array(|_, divisors, _| divisors.insert(location, divisor));
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.bound_vertex_array(|_, _, enabled| enabled.insert(location));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().clear_color = [r, g, b, a];
    }

    fn clear(&self, mask: ClearMask) {
        let mut state = self.state.borrow_mut();
        let scissor = state
            .enabled
            .contains(&EnableFlag::ScissorTest)
            .then_some(state.scissor);
        state.clears.push((mask, scissor));
    }

    fn enable(&self, flag: EnableFlag) {
        self.state.borrow_mut().enabled.insert(flag);
    }

    fn disable(&self, flag: EnableFlag) {
        self.state.borrow_mut().enabled.remove(&flag);
    }

    fn is_enabled(&self, flag: EnableFlag) -> bool {
        self.state.borrow().enabled.contains(&flag)
    }

    fn scissor(&self, rect: Viewport) {
        self.state.borrow_mut().scissor = rect;
    }

    fn finish(&self) {
        self.record("finish".to_owned());
    }

    fn get_float(&self, param: FloatParam) -> f32 {
        let state = self.state.borrow();
        match param {
            FloatParam::LineWidth => state.line_width,
            FloatParam::PointSize => state.point_size,
        }
    }

    fn get_integer(&self, param: IntegerParam) -> i32 {
        let state = self.state.borrow();
        match param {
            IntegerParam::MaxTextureImageUnits => self.max_texture_units as i32,
            IntegerParam::MajorVersion => self.version_numbers.0,
            IntegerParam::MinorVersion => self.version_numbers.1,
            IntegerParam::PackAlignment => state.pack_alignment as i32,
            IntegerParam::UnpackAlignment => state.unpack_alignment as i32,
        }
    }

    fn get_string(&self, name: StringName) -> Option<String> {
        match name {
            StringName::Vendor => self.vendor.clone(),
            StringName::Renderer => self.renderer.clone(),
            StringName::Version => self.version.clone(),
        }
    }

    fn get_error(&self) -> u32 {
        std::mem::take(&mut self.state.borrow_mut().error)
    }

    fn set_line_width(&self, width: f32) {
        self.state.borrow_mut().line_width = width;
    }

    fn set_point_size(&self, size: f32) {
        self.state.borrow_mut().point_size = size;
    }

    fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        self.state.borrow_mut().polygon_mode = mode;
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        self.state.borrow_mut().blend = Some((src, dst));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeadlessDriver {
    fn attach(&self, point: AttachmentPoint, image: Handle) {
        let mut state = self.state.borrow_mut();
        let Some(framebuffer) = state.bindings.get(&BindingPoint::DrawFramebuffer).copied() else {
            state.error = GL_INVALID_OPERATION;
            return;
        };
        if let Some(Object::Framebuffer { colors, depth }) = state.objects.get_mut(&framebuffer) {
            match point {
                AttachmentPoint::Color(i) => {
                    colors.insert(i, image);
                }
                AttachmentPoint::Depth => *depth = Some(image),
            }
        }
    }
}
