use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use piksels_backend::{
    blending::BlendingMode,
    color::RGBA32F,
    depth_stencil::{DepthTest, DepthWrite, StencilTest},
    error::Error,
    extension::{
        logger::{BackendLogger, LogEntry, LogLevel, Logger, LoggerExt},
        ExtensionsBuilder,
    },
    face_culling::FaceCulling,
    info,
    pixel::Pixel,
    primitive::Connector,
    render_targets::{ColorAttachmentPoint, ColorType, DepthStencilAttachmentPoint},
    scissor::Scissor,
    shader::{ShaderSources, UniformType, UniformTypeBase},
    swap_chain::SwapChainMode,
    texture::{Offset, Rect, Sampling, Size, Storage},
    vertex::{Type, VertexAttr},
    vertex_array::{MemoryLayout, VertexArrayData, VertexArrayUpdate},
    viewport::Viewport,
    Backend, BackendInfo, Scarce,
};
use piksels_core::{
    units::Units,
    vertex_array::{VertexArray, View},
    Device,
};
use pretty_assertions::assert_eq;

type Calls = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Debug, Eq, PartialEq)]
enum DummyBackendError {
    Common(Error),
}

impl From<Error> for DummyBackendError {
    fn from(e: Error) -> Self {
        DummyBackendError::Common(e)
    }
}

#[derive(Debug)]
struct DummyResource {
    index: u64,
    calls: Calls,
}

impl DummyResource {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Scarce<DummyBackend> for DummyResource {
    fn scarce_index(&self) -> u64 {
        self.index
    }

    fn scarce_clone(&self) -> Self {
        DummyResource {
            index: self.index,
            calls: self.calls.clone(),
        }
    }
}

struct DummyBackend {
    logger: Box<dyn Logger>,
    next_index: AtomicU64,
    max_units: u32,
    calls: Calls,
}

impl BackendLogger for DummyBackend {
    fn log(&self, entry: LogEntry) {
        self.logger.log(entry);
    }
}

impl DummyBackend {
    fn resource(&self, what: &str) -> DummyResource {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let resource = DummyResource {
            index,
            calls: self.calls.clone(),
        };
        resource.record(format!("new {what} {index}"));
        resource
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Backend for DummyBackend {
    type Err = DummyBackendError;
    type ScarceIndex = u64;
    type Unit = u32;
    type CmdBuf = DummyResource;
    type ColorAttachment = DummyResource;
    type DepthStencilAttachment = DummyResource;
    type RenderTargets = DummyResource;
    type Shader = DummyResource;
    type ShaderTextureBindingPoint = DummyResource;
    type ShaderUniformBufferBindingPoint = DummyResource;
    type SwapChain = DummyResource;
    type Texture = DummyResource;
    type Uniform = DummyResource;
    type UniformBuffer = DummyResource;
    type VertexArray = DummyResource;

    fn build<L>(extensions: ExtensionsBuilder<LoggerExt<L>>) -> Result<Self, Self::Err>
    where
        L: 'static + Logger,
    {
        Ok(DummyBackend {
            logger: Box::new(extensions.logger),
            next_index: AtomicU64::new(1),
            max_units: 2,
            calls: Calls::default(),
        })
    }

    fn author(&self) -> Result<String, Self::Err> {
        info!(self, "getting author");
        self.calls.lock().unwrap().push("author".to_owned());
        Ok("piksels".to_owned())
    }

    fn name(&self) -> Result<String, Self::Err> {
        Ok("dummy".to_owned())
    }

    fn version(&self) -> Result<String, Self::Err> {
        Ok("1.0.0".to_owned())
    }

    fn shading_lang_version(&self) -> Result<String, Self::Err> {
        Ok("none".to_owned())
    }

    fn info(&self) -> Result<BackendInfo, Self::Err> {
        Ok(BackendInfo {
            version: "1.0.0",
            git_commit_hash: "deadbeef",
        })
    }

    fn max_texture_units(&self) -> Result<u32, Self::Err> {
        Ok(self.max_units)
    }

    fn max_uniform_buffer_units(&self) -> Result<u32, Self::Err> {
        Ok(self.max_units)
    }

    fn new_vertex_array(
        &self,
        _: Connector,
        _: &VertexArrayData,
        _: &VertexArrayData,
        _: &[u32],
    ) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("vertex_array"))
    }

    fn drop_vertex_array(vertex_array: &DummyResource) {
        vertex_array.record(format!("drop vertex_array {}", vertex_array.index));
    }

    fn update_vertex_array(
        vertex_array: &DummyResource,
        update: &VertexArrayUpdate,
    ) -> Result<(), Self::Err> {
        vertex_array.record(format!(
            "update vertex_array {} {}+{}",
            vertex_array.index,
            update.start(),
            update.count()
        ));
        Ok(())
    }

    fn new_render_targets(
        &self,
        color_attachment_points: &[ColorAttachmentPoint],
        _: Option<DepthStencilAttachmentPoint>,
        _: Storage,
    ) -> Result<DummyResource, Self::Err> {
        let indices: Vec<_> = color_attachment_points
            .iter()
            .map(ColorAttachmentPoint::index)
            .collect();
        let rt = self.resource("render_targets");
        rt.record(format!("color points {indices:?}"));
        Ok(rt)
    }

    fn drop_render_targets(render_targets: &DummyResource) {
        render_targets.record(format!("drop render_targets {}", render_targets.index));
    }

    fn get_color_attachment(rt: &DummyResource, _: usize) -> Result<DummyResource, Self::Err> {
        Ok(rt.scarce_clone())
    }

    fn get_depth_stencil_attachment(rt: &DummyResource) -> Result<DummyResource, Self::Err> {
        Ok(rt.scarce_clone())
    }

    fn new_shader(&self, _: &ShaderSources) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("shader"))
    }

    fn drop_shader(shader: &DummyResource) {
        shader.record(format!("drop shader {}", shader.index));
    }

    fn get_uniform(
        shader: &DummyResource,
        _: &str,
        _: UniformType,
    ) -> Result<DummyResource, Self::Err> {
        Ok(shader.scarce_clone())
    }

    fn get_shader_texture_binding_point(
        shader: &DummyResource,
        _: &str,
    ) -> Result<DummyResource, Self::Err> {
        Ok(shader.scarce_clone())
    }

    fn get_shader_uniform_buffer_binding_point(
        shader: &DummyResource,
        _: &str,
    ) -> Result<DummyResource, Self::Err> {
        Ok(shader.scarce_clone())
    }

    fn new_uniform_buffer(&self, _: &[u8]) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("uniform_buffer"))
    }

    fn drop_uniform_buffer(uniform_buffer: &DummyResource) {
        uniform_buffer.record(format!("drop uniform_buffer {}", uniform_buffer.index));
    }

    fn update_uniform_buffer(
        uniform_buffer: &DummyResource,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), Self::Err> {
        uniform_buffer.record(format!("update uniform_buffer {offset}+{}", bytes.len()));
        Ok(())
    }

    fn new_texture(&self, _: Storage, _: Pixel, _: Sampling) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("texture"))
    }

    fn drop_texture(texture: &DummyResource) {
        texture.record(format!("drop texture {}", texture.index));
    }

    fn resize_texture(texture: &DummyResource, size: Size) -> Result<(), Self::Err> {
        texture.record(format!("resize texture {size:?}"));
        Ok(())
    }

    fn set_texels(
        texture: &DummyResource,
        _: Rect,
        _: bool,
        level: usize,
        texels: &[u8],
    ) -> Result<(), Self::Err> {
        texture.record(format!("set texels {level} {}", texels.len()));
        Ok(())
    }

    fn clear_texels(
        texture: &DummyResource,
        _: Rect,
        _: bool,
        clear_value: &[u8],
    ) -> Result<(), Self::Err> {
        texture.record(format!("clear texels {clear_value:?}"));
        Ok(())
    }

    fn new_cmd_buf(&self) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("cmd_buf"))
    }

    fn drop_cmd_buf(cmd_buf: &DummyResource) {
        cmd_buf.record("drop cmd_buf".to_owned());
    }

    fn cmd_buf_blending(cmd_buf: &DummyResource, blending: BlendingMode) -> Result<(), Self::Err> {
        cmd_buf.record(format!("blending {blending:?}"));
        Ok(())
    }

    fn cmd_buf_depth_test(cmd_buf: &DummyResource, depth_test: DepthTest) -> Result<(), Self::Err> {
        cmd_buf.record(format!("depth_test {depth_test:?}"));
        Ok(())
    }

    fn cmd_buf_depth_write(
        cmd_buf: &DummyResource,
        depth_write: DepthWrite,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("depth_write {depth_write:?}"));
        Ok(())
    }

    fn cmd_buf_stencil_test(
        cmd_buf: &DummyResource,
        stencil_test: StencilTest,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("stencil_test {stencil_test:?}"));
        Ok(())
    }

    fn cmd_buf_face_culling(
        cmd_buf: &DummyResource,
        face_culling: FaceCulling,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("face_culling {face_culling:?}"));
        Ok(())
    }

    fn cmd_buf_viewport(cmd_buf: &DummyResource, viewport: Viewport) -> Result<(), Self::Err> {
        cmd_buf.record(format!("viewport {viewport:?}"));
        Ok(())
    }

    fn cmd_buf_scissor(cmd_buf: &DummyResource, scissor: Scissor) -> Result<(), Self::Err> {
        cmd_buf.record(format!("scissor {scissor:?}"));
        Ok(())
    }

    fn cmd_buf_clear_color(
        cmd_buf: &DummyResource,
        clear_color: Option<RGBA32F>,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("clear_color {}", clear_color.is_some()));
        Ok(())
    }

    fn cmd_buf_clear_depth(
        cmd_buf: &DummyResource,
        clear_depth: Option<f32>,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("clear_depth {clear_depth:?}"));
        Ok(())
    }

    fn cmd_buf_clear_stencil(
        cmd_buf: &DummyResource,
        clear_stencil: Option<i32>,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("clear_stencil {clear_stencil:?}"));
        Ok(())
    }

    fn cmd_buf_srgb(cmd_buf: &DummyResource, srgb: bool) -> Result<(), Self::Err> {
        cmd_buf.record(format!("srgb {srgb}"));
        Ok(())
    }

    fn cmd_buf_set_uniform(
        cmd_buf: &DummyResource,
        _: &DummyResource,
        value: &[u8],
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("set_uniform {}", value.len()));
        Ok(())
    }

    fn cmd_buf_bind_texture(
        cmd_buf: &DummyResource,
        texture: &DummyResource,
        unit: &u32,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("bind texture {} to {unit}", texture.index));
        Ok(())
    }

    fn cmd_buf_associate_texture_unit(
        cmd_buf: &DummyResource,
        unit: &u32,
        _: &DummyResource,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("associate texture unit {unit}"));
        Ok(())
    }

    fn cmd_buf_bind_uniform_buffer(
        cmd_buf: &DummyResource,
        uniform_buffer: &DummyResource,
        unit: &u32,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!(
            "bind uniform_buffer {} to {unit}",
            uniform_buffer.index
        ));
        Ok(())
    }

    fn cmd_buf_associate_uniform_buffer_unit(
        cmd_buf: &DummyResource,
        unit: &u32,
        _: &DummyResource,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("associate uniform_buffer unit {unit}"));
        Ok(())
    }

    fn cmd_buf_bind_render_targets(
        cmd_buf: &DummyResource,
        render_targets: &DummyResource,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!("bind render_targets {}", render_targets.index));
        Ok(())
    }

    fn cmd_buf_bind_shader(cmd_buf: &DummyResource, shader: &DummyResource) -> Result<(), Self::Err> {
        cmd_buf.record(format!("bind shader {}", shader.index));
        Ok(())
    }

    fn cmd_buf_draw_vertex_array(
        cmd_buf: &DummyResource,
        vertex_array: &DummyResource,
        start: usize,
        count: usize,
        instances: usize,
    ) -> Result<(), Self::Err> {
        cmd_buf.record(format!(
            "draw {} {start}+{count} x{instances}",
            vertex_array.index
        ));
        Ok(())
    }

    fn cmd_buf_finish(cmd_buf: &DummyResource) -> Result<(), Self::Err> {
        cmd_buf.record("finish".to_owned());
        Ok(())
    }

    fn new_swap_chain(&self, _: u32, _: u32, _: SwapChainMode) -> Result<DummyResource, Self::Err> {
        Ok(self.resource("swap_chain"))
    }

    fn drop_swap_chain(swap_chain: &DummyResource) {
        swap_chain.record("drop swap_chain".to_owned());
    }

    fn swap_chain_render_targets(swap_chain: &DummyResource) -> Result<DummyResource, Self::Err> {
        Ok(swap_chain.scarce_clone())
    }

    fn present_render_targets(
        swap_chain: &DummyResource,
        _: &DummyResource,
    ) -> Result<(), Self::Err> {
        swap_chain.record("present".to_owned());
        Ok(())
    }
}

fn device() -> Device<DummyBackend> {
    let backend = DummyBackend::build(ExtensionsBuilder::default()).unwrap();
    Device::new(backend).unwrap()
}

fn triangle(device: &Device<DummyBackend>, indices: Vec<u32>) -> VertexArray<DummyBackend> {
    let vertices = VertexArrayData::new(
        vec![VertexAttr::new(0, "position", Type::Float2)],
        MemoryLayout::Interleaved {
            bytes: vec![0; 3 * 8],
        },
    );

    device
        .new_vertex_array(Connector::Triangle, vertices, VertexArrayData::empty(), indices)
        .unwrap()
}

#[test]
fn queries_are_cached() {
    let device = device();

    assert_eq!(device.author().unwrap(), "piksels");
    assert_eq!(device.author().unwrap(), "piksels");
    assert_eq!(device.name().unwrap(), "dummy");
    assert_eq!(device.info().unwrap().git_commit_hash, "deadbeef");

    let author_calls = device
        .backend()
        .calls()
        .into_iter()
        .filter(|call| call == "author")
        .count();
    assert_eq!(author_calls, 1);
}

#[test]
fn logger_extension() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let sink = entries.clone();
    let extensions = ExtensionsBuilder::default().logger(LoggerExt::new(
        LogLevel::Info,
        move |entry: LogEntry| sink.lock().unwrap().push(entry.msg),
    ));

    let backend = DummyBackend::build(extensions).unwrap();
    backend.author().unwrap();

    assert_eq!(*entries.lock().unwrap(), vec!["getting author".to_owned()]);
}

#[test]
fn resources_are_released() {
    let device = device();

    let texture = device
        .new_texture(
            Storage::Flat2D {
                width: 4,
                height: 4,
            },
            Pixel::RGBA8_UNORM,
            Sampling::default(),
        )
        .unwrap();
    drop(texture);

    let calls = device.backend().calls();
    assert_eq!(calls, vec!["new texture 1", "drop texture 1"]);
}

#[test]
fn vertex_array_validation() {
    let device = device();

    let broken = VertexArrayData::new(
        vec![VertexAttr::new(0, "position", Type::Float2)],
        MemoryLayout::Interleaved { bytes: vec![0; 7] },
    );
    assert!(matches!(
        device.new_vertex_array(Connector::Point, broken, VertexArrayData::empty(), Vec::new()),
        Err(DummyBackendError::Common(Error::InvalidVertexData { .. }))
    ));

    let vertices = VertexArrayData::new(
        vec![VertexAttr::new(0, "position", Type::Float2)],
        MemoryLayout::Interleaved { bytes: vec![0; 16] },
    );
    assert_eq!(
        device
            .new_vertex_array(Connector::Line, vertices, VertexArrayData::empty(), vec![0, 2])
            .err(),
        Some(DummyBackendError::Common(Error::IndexOutOfRange {
            index: 2,
            vertex_count: 2
        }))
    );
}

#[test]
fn vertex_array_views() {
    let device = device();
    let va = triangle(&device, Vec::new());

    let view = va.view(..).unwrap();
    assert_eq!((view.start(), view.count(), view.instance_count()), (0, 3, 1));

    let view = va.view(1..).unwrap();
    assert_eq!((view.start(), view.count()), (1, 2));

    let view = va.view(..=1).unwrap();
    assert_eq!((view.start(), view.count()), (0, 2));

    let view = va.view(1..2).unwrap().instances(4);
    assert_eq!((view.start(), view.count(), view.instance_count()), (1, 1, 4));
    assert_eq!(
        format!("{view:?}"),
        "VertexArrayView { start: 1, count: 1, instances: 4, .. }"
    );

    assert_eq!(
        va.view(2..4).err(),
        Some(Error::InvalidView {
            start: 2,
            count: 2,
            len: 3
        })
    );
    assert!(va.view(..=3).is_err());

    let indexed = triangle(&device, vec![0, 1, 2, 2, 1, 0]);
    assert_eq!(indexed.view(..).unwrap().count(), 6);
    assert!(indexed.view(3..6).is_ok());
}

#[test]
fn vertex_array_updates() {
    let device = device();
    let va = triangle(&device, vec![0, 1, 2]);

    let data = VertexArrayData::new(
        vec![VertexAttr::new(0, "position", Type::Float2)],
        MemoryLayout::Interleaved { bytes: vec![0; 16] },
    );
    va.update(&VertexArrayUpdate::Vertices { start: 1, data: data.clone() })
        .unwrap();
    assert!(matches!(
        va.update(&VertexArrayUpdate::Vertices { start: 2, data }),
        Err(DummyBackendError::Common(Error::UpdateOutOfBounds {
            start: 2,
            count: 2,
            len: 3
        }))
    ));
    assert!(matches!(
        va.update(&VertexArrayUpdate::Indices {
            start: 0,
            indices: vec![3]
        }),
        Err(DummyBackendError::Common(Error::IndexOutOfRange { .. }))
    ));

    let other_attrs = VertexArrayData::new(
        vec![VertexAttr::new(0, "position", Type::Float4)],
        MemoryLayout::Interleaved { bytes: vec![0; 16] },
    );
    assert!(va
        .update(&VertexArrayUpdate::Vertices {
            start: 0,
            data: other_attrs
        })
        .is_err());
}

#[test]
fn render_targets_points_are_sorted_and_unique() {
    let device = device();
    let storage = Storage::Flat2D {
        width: 8,
        height: 8,
    };

    let rt = device
        .new_render_targets(
            [
                ColorAttachmentPoint::new(2, "normal", ColorType::RGBA8),
                ColorAttachmentPoint::new(0, "color", ColorType::RGBA8),
            ],
            None,
            storage,
        )
        .unwrap();
    assert_eq!(
        rt.color_attachment_points()
            .iter()
            .map(ColorAttachmentPoint::name)
            .collect::<Vec<_>>(),
        vec!["color", "normal"]
    );
    assert!(device
        .backend()
        .calls()
        .contains(&"color points [0, 2]".to_owned()));

    assert!(matches!(
        device.new_render_targets(
            [
                ColorAttachmentPoint::new(1, "a", ColorType::RGBA8),
                ColorAttachmentPoint::new(1, "b", ColorType::RGBA8),
            ],
            None,
            storage,
        ),
        Err(DummyBackendError::Common(Error::DuplicateAttachmentIndex(1)))
    ));
}

#[test]
fn texture_validation() {
    let device = device();
    let mut texture = device
        .new_texture(
            Storage::Flat2D {
                width: 4,
                height: 4,
            },
            Pixel::RGBA8_UNORM,
            Sampling::default(),
        )
        .unwrap();

    let rect = Rect::new(Offset::Dim2 { x: 2, y: 2 }, Size::Dim2 { width: 2, height: 2 });
    texture.set(rect, false, 0, &[0; 16]).unwrap();
    texture.set_texels(rect, false, 0, &[0u32; 4]).unwrap();

    assert_eq!(
        texture.set(rect, false, 0, &[0; 15]).err(),
        Some(DummyBackendError::Common(Error::TexelsSizeMismatch {
            expected: 16,
            found: 15
        }))
    );
    assert_eq!(
        texture.set(rect, false, 1, &[0; 16]).err(),
        Some(DummyBackendError::Common(Error::RegionOutOfBounds))
    );
    assert_eq!(
        texture.set(rect, false, 3, &[0; 16]).err(),
        Some(DummyBackendError::Common(Error::RegionOutOfBounds))
    );

    texture.clear(rect, true, &[1, 2, 3, 4]).unwrap();
    assert!(texture.clear(rect, true, &[1, 2, 3]).is_err());

    assert_eq!(
        texture.resize(Size::Dim1 { width: 3 }).err(),
        Some(DummyBackendError::Common(Error::IncompatibleSize))
    );
    texture
        .resize(Size::Dim2 {
            width: 1,
            height: 1,
        })
        .unwrap();
    assert_eq!(
        texture.storage(),
        Storage::Flat2D {
            width: 1,
            height: 1
        }
    );
    assert!(texture.set(rect, false, 0, &[0; 16]).is_err());
}

#[test]
fn uniform_buffer_bounds() {
    let device = device();
    let buffer = device.new_uniform_buffer(&[0; 16]).unwrap();

    assert_eq!(buffer.len(), 16);
    buffer.update(8, &[1; 8]).unwrap();
    buffer.update_with(12, &1.0f32).unwrap();
    assert_eq!(
        buffer.update(12, &[1; 8]).err(),
        Some(DummyBackendError::Common(Error::UpdateOutOfBounds {
            start: 12,
            count: 8,
            len: 16
        }))
    );
}

#[test]
fn units() {
    let mut units = Units::<DummyBackend>::new(2);

    let a = units.get_unit(&10).unwrap();
    let b = units.get_unit(&11).unwrap();
    assert_eq!((a.unit, a.already_bound), (0, false));
    assert_eq!((b.unit, b.already_bound), (1, false));
    assert_eq!(units.get_unit(&12).err(), Some(Error::NoMoreUnits));

    // in use by another scope
    let again = units.get_unit(&10).unwrap();
    assert_eq!((again.unit, again.already_bound), (0, true));

    units.release(&10);
    assert_eq!(units.idle_len(), 0);
    units.release(&10);
    units.release(&11);
    assert_eq!(units.idle_len(), 2);

    // still bound to 11
    let c = units.get_unit(&11).unwrap();
    assert_eq!((c.unit, c.already_bound), (1, true));

    // recycles the smallest idle unit
    let d = units.get_unit(&12).unwrap();
    assert_eq!((d.unit, d.already_bound), (0, false));
    assert_eq!(units.in_use_len(), 2);
}

#[test]
fn layers_record_and_skip_redundant_states() {
    let device = device();
    let rt = device
        .new_render_targets(
            [ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            None,
            Storage::Flat2D {
                width: 8,
                height: 8,
            },
        )
        .unwrap();
    let shader = device.new_shader(&ShaderSources::default()).unwrap();
    let time = shader.uniform("time", UniformTypeBase::Float).unwrap();
    let va = triangle(&device, Vec::new());
    device.backend().clear_calls();

    device
        .new_layers()
        .unwrap()
        .clear_color(Some(RGBA32F::BLACK))
        .unwrap()
        .clear_color(Some(RGBA32F::BLACK))
        .unwrap()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .uniform(&time, &1.5f32)
        .unwrap()
        .draw(&va)
        .unwrap()
        .group()
        .viewport(Viewport::Whole)
        .unwrap()
        .draw_view(va.view(1..).unwrap().instances(2))
        .unwrap()
        .done()
        .done()
        .done()
        .finish()
        .unwrap();

    assert_eq!(
        device.backend().calls(),
        vec![
            "new cmd_buf 4",
            "clear_color true",
            "bind render_targets 1",
            "bind shader 2",
            "set_uniform 4",
            "draw 3 0+3 x1",
            "viewport Whole",
            "draw 3 1+2 x2",
            "finish",
            "drop cmd_buf",
        ]
    );
}

#[test]
fn uniform_type_is_checked() {
    let device = device();
    let rt = device
        .new_render_targets([], None, Storage::Flat1D { width: 1 })
        .unwrap();
    let shader = device.new_shader(&ShaderSources::default()).unwrap();
    let color = shader
        .uniform("color", UniformTypeBase::Float4)
        .unwrap();

    let result = device
        .new_layers()
        .unwrap()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .uniform(&color, &[1.0f32, 0.0, 0.0]);

    assert!(matches!(
        result,
        Err(DummyBackendError::Common(Error::UniformTypeMismatch { .. }))
    ));
}

#[test]
fn uniforms_of_other_shaders_are_rejected() {
    let device = device();
    let rt = device
        .new_render_targets([], None, Storage::Flat1D { width: 1 })
        .unwrap();
    let shader = device.new_shader(&ShaderSources::default()).unwrap();
    let other = device.new_shader(&ShaderSources::default()).unwrap();
    let time = other.uniform("time", UniformTypeBase::Float).unwrap();
    device.backend().clear_calls();

    let result = device
        .new_layers()
        .unwrap()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .uniform(&time, &1.0f32);

    assert!(matches!(
        result,
        Err(DummyBackendError::Common(Error::ForeignUniform))
    ));
    assert!(!device
        .backend()
        .calls()
        .iter()
        .any(|call| call.starts_with("set_uniform")));
}

#[test]
fn render_targets_rebind_but_shaders_do_not() {
    let device = device();
    let rt = device
        .new_render_targets([], None, Storage::Flat1D { width: 1 })
        .unwrap();
    let shader = device.new_shader(&ShaderSources::default()).unwrap();
    device.backend().clear_calls();

    device
        .new_layers()
        .unwrap()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .done()
        .shader(&shader)
        .unwrap()
        .done()
        .done()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .done()
        .done()
        .finish()
        .unwrap();

    assert_eq!(
        device.backend().calls(),
        vec![
            "new cmd_buf 3",
            "bind render_targets 1",
            "bind shader 2",
            "bind render_targets 1",
            "finish",
            "drop cmd_buf",
        ]
    );
}

#[test]
fn texture_units_are_reused_across_scopes() {
    let device = device();
    let rt = device
        .new_render_targets([], None, Storage::Flat1D { width: 1 })
        .unwrap();
    let shader = device.new_shader(&ShaderSources::default()).unwrap();
    let bp = shader.texture_binding_point("tex").unwrap();
    let new_texture = || {
        device
            .new_texture(Storage::Flat1D { width: 1 }, Pixel::RGBA8_UNORM, Sampling::default())
            .unwrap()
    };
    let (a, b, c) = (new_texture(), new_texture(), new_texture());
    device.backend().clear_calls();

    let layer = device
        .new_layers()
        .unwrap()
        .render_targets(&rt)
        .unwrap()
        .shader(&shader)
        .unwrap()
        .group()
        .texture(&a, &bp)
        .unwrap()
        .texture(&b, &bp)
        .unwrap()
        .done();

    // both units are idle now: a is still bound, c evicts the smallest unit
    let layer = layer
        .group()
        .texture(&b, &bp)
        .unwrap()
        .texture(&c, &bp)
        .unwrap();

    // every unit is taken by the open scope
    assert!(matches!(
        layer.texture(&a, &bp),
        Err(DummyBackendError::Common(Error::NoMoreUnits))
    ));

    let calls = device.backend().calls();
    assert_eq!(
        calls
            .iter()
            .filter(|call| call.starts_with("bind texture"))
            .collect::<Vec<_>>(),
        vec![
            "bind texture 3 to 0",
            "bind texture 4 to 1",
            "bind texture 5 to 0"
        ]
    );
}

#[test]
fn swap_chain_presents() {
    let device = device();
    let swap_chain = device.new_swap_chain(640, 480, SwapChainMode::Fifo).unwrap();
    let rt = swap_chain.render_targets().unwrap();

    assert_eq!(rt.color_attachment_points().len(), 1);
    assert_eq!(
        rt.storage(),
        Storage::Flat2D {
            width: 640,
            height: 480
        }
    );
    swap_chain.present(&rt).unwrap();
    assert!(device.backend().calls().contains(&"present".to_owned()));
}
