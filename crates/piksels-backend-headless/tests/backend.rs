use piksels_backend::{
    color::RGBA32F,
    extension::ExtensionsBuilder,
    pixel::{ChannelBits, Pixel},
    primitive::Connector,
    render_targets::{ColorAttachmentPoint, ColorType, DepthStencilAttachmentPoint, DepthStencilType},
    shader::{ShaderSources, UniformType, UniformTypeBase},
    swap_chain::SwapChainMode,
    texture::{Offset, Rect, Sampling, Size, Storage},
    vertex::{Type as VertexType, VertexAttr},
    vertex_array::{MemoryLayout, VertexArrayData, VertexArrayUpdate},
    viewport::Viewport,
    Backend, Error, Scarce,
};
use piksels_backend_headless::{
    ClearBuffers, Command, Handle, HeadlessBackend, HeadlessError, LiveCounts, RenderTargetsRes,
};
use pretty_assertions::assert_eq;

fn backend() -> HeadlessBackend {
    HeadlessBackend::build(ExtensionsBuilder::default()).unwrap()
}

fn triangle() -> VertexArrayData {
    VertexArrayData::new(
        vec![VertexAttr::new(0, "position", VertexType::Float2)],
        MemoryLayout::Interleaved {
            bytes: bytes_of(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
        },
    )
}

fn bytes_of(floats: &[f32]) -> Vec<u8> {
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

const VS: &str = "
    uniform mat4 projection;
    in vec2 position;
";

const FS: &str = "
    uniform vec4 tint;
    uniform sampler2D albedo;
    uniform Material {
        float roughness;
    };
";

#[test]
fn clears_run_when_the_command_buffer_finishes() {
    let backend = backend();
    let inspector = backend.inspector();

    let rt = backend
        .new_render_targets(
            &[ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            Some(DepthStencilAttachmentPoint::new(
                1,
                "depth",
                DepthStencilType::DepthStencil {
                    depth_bits: ChannelBits::ThirtyTwo,
                    stencil_bits: ChannelBits::Eight,
                },
            )),
            Storage::Flat2D {
                width: 2,
                height: 1,
            },
        )
        .unwrap();
    let color = HeadlessBackend::get_color_attachment(&rt, 0).unwrap();
    let depth = HeadlessBackend::get_depth_stencil_attachment(&rt).unwrap();
    let va = backend
        .new_vertex_array(Connector::Triangle, &triangle(), &VertexArrayData::empty(), &[])
        .unwrap();

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, Some(RGBA32F::new(1.0, 0.0, 0.0, 1.0)))
        .unwrap();
    HeadlessBackend::cmd_buf_clear_depth(&cmd_buf, Some(1.0)).unwrap();
    HeadlessBackend::cmd_buf_clear_stencil(&cmd_buf, Some(3)).unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &rt).unwrap();
    HeadlessBackend::cmd_buf_viewport(&cmd_buf, Viewport::Whole).unwrap();
    HeadlessBackend::cmd_buf_draw_vertex_array(&cmd_buf, &va, 0, 3, 1).unwrap();

    // nothing happens before the command buffer is finished
    assert_eq!(inspector.texels(color.texture(), 0).unwrap(), Some(vec![0; 8]));
    assert!(inspector.submissions().is_empty());

    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();

    assert_eq!(
        inspector.texels(color.texture(), 0).unwrap(),
        Some(vec![255, 0, 0, 255, 255, 0, 0, 255])
    );
    let depth_texel = [&1.0f32.to_le_bytes()[..], &[3]].concat();
    assert_eq!(
        inspector.texels(depth.texture(), 0).unwrap(),
        Some([depth_texel.clone(), depth_texel].concat())
    );

    let submissions = inspector.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].commands[3],
        Command::BindRenderTargets {
            render_targets: rt.scarce_index(),
            clear: ClearBuffers::all(),
        }
    );
    assert_eq!(
        submissions[0].draws().collect::<Vec<_>>(),
        vec![&Command::Draw {
            vertex_array: va.id().to_bits(),
            start: 0,
            count: 3,
            instances: 1,
        }]
    );

    // finishing again submits an empty buffer and clears nothing more
    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();
    assert_eq!(inspector.submissions()[1].commands, Vec::new());
}

#[test]
fn disabled_clears_are_not_flagged() {
    let backend = backend();
    let rt = backend
        .new_render_targets(
            &[ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            None,
            Storage::Flat2D {
                width: 1,
                height: 1,
            },
        )
        .unwrap();

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, None).unwrap();
    HeadlessBackend::cmd_buf_clear_depth(&cmd_buf, Some(1.0)).unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &rt).unwrap();
    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();

    assert_eq!(
        backend.inspector().submissions()[0].commands.last(),
        Some(&Command::BindRenderTargets {
            render_targets: rt.scarce_index(),
            clear: ClearBuffers::empty(),
        })
    );
    assert!(matches!(
        HeadlessBackend::get_depth_stencil_attachment(&rt),
        Err(HeadlessError::NoSuchAttachment { .. })
    ));
    assert!(matches!(
        HeadlessBackend::get_color_attachment(&rt, 1),
        Err(HeadlessError::NoSuchAttachment { .. })
    ));
}

fn single_color_target(backend: &HeadlessBackend, ty: ColorType) -> Handle<RenderTargetsRes> {
    backend
        .new_render_targets(
            &[ColorAttachmentPoint::new(0, "color", ty)],
            None,
            Storage::Flat1D { width: 1 },
        )
        .unwrap()
}

#[test]
fn failed_finish_keeps_the_recording() {
    let backend = backend();
    let inspector = backend.inspector();
    let kept = single_color_target(&backend, ColorType::RGBA8);
    let dropped = single_color_target(&backend, ColorType::RGBA8);
    let color = HeadlessBackend::get_color_attachment(&kept, 0).unwrap();

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, Some(RGBA32F::new(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &kept).unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &dropped).unwrap();
    HeadlessBackend::drop_render_targets(&dropped);

    assert_eq!(
        HeadlessBackend::cmd_buf_finish(&cmd_buf),
        Err(HeadlessError::UnknownResource {
            kind: "render targets"
        })
    );

    // the earlier clear did not run, and the commands are still there
    assert!(inspector.submissions().is_empty());
    assert_eq!(inspector.texels(color.texture(), 0).unwrap(), Some(vec![0; 4]));
    assert_eq!(
        inspector.cmd_buf(cmd_buf.id(), |res| res.commands().len()),
        Ok(3)
    );
}

#[test]
fn unsupported_clears_fail_at_bind() {
    let backend = backend();
    let packed = single_color_target(
        &backend,
        ColorType::UintRGB {
            red_bits: ChannelBits::Eleven,
            green_bits: ChannelBits::Eleven,
            blue_bits: ChannelBits::Ten,
        },
    );

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, Some(RGBA32F::BLACK)).unwrap();
    assert!(matches!(
        HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &packed),
        Err(HeadlessError::Unimplemented { .. })
    ));

    // without a clear color there is nothing to encode
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, None).unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &packed).unwrap();
    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();

    assert_eq!(
        backend.inspector().submissions()[0].commands,
        vec![
            Command::ClearColor(Some(RGBA32F::BLACK)),
            Command::ClearColor(None),
            Command::BindRenderTargets {
                render_targets: packed.scarce_index(),
                clear: ClearBuffers::empty(),
            },
        ]
    );
}

#[test]
fn swap_chain_presentation() {
    let backend = backend();
    let inspector = backend.inspector();

    let swap_chain = backend.new_swap_chain(2, 1, SwapChainMode::Fifo).unwrap();
    let rt = HeadlessBackend::swap_chain_render_targets(&swap_chain).unwrap();

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_clear_color(&cmd_buf, Some(RGBA32F::new(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    HeadlessBackend::cmd_buf_bind_render_targets(&cmd_buf, &rt).unwrap();
    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();

    HeadlessBackend::present_render_targets(&swap_chain, &rt).unwrap();
    HeadlessBackend::present_render_targets(&swap_chain, &rt).unwrap();

    let presentations = inspector.presentations();
    assert_eq!(presentations.len(), 2);
    assert_eq!(presentations[0].texels, vec![0, 0, 255, 255, 0, 0, 255, 255]);
    assert_eq!(presentations[0].frame, 0);
    assert_eq!(presentations[1].frame, 1);
    assert_eq!(
        inspector.swap_chain(swap_chain.id(), |sc| (sc.width(), sc.height(), sc.mode())),
        Ok((2, 1, SwapChainMode::Fifo))
    );

    let foreign = backend
        .new_render_targets(
            &[ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            None,
            Storage::Flat2D {
                width: 2,
                height: 1,
            },
        )
        .unwrap();
    assert_eq!(
        HeadlessBackend::present_render_targets(&swap_chain, &foreign),
        Err(HeadlessError::ForeignRenderTargets)
    );

    // the swap chain owns its render targets
    HeadlessBackend::drop_render_targets(&rt);
    HeadlessBackend::present_render_targets(&swap_chain, &rt).unwrap();

    HeadlessBackend::drop_swap_chain(&swap_chain);
    HeadlessBackend::drop_render_targets(&foreign);
    HeadlessBackend::drop_cmd_buf(&cmd_buf);
    assert_eq!(inspector.live(), LiveCounts::default());
}

#[test]
fn texels_and_mipmaps() {
    let backend = backend();
    let inspector = backend.inspector();
    let texture = backend
        .new_texture(
            Storage::Flat2D {
                width: 2,
                height: 2,
            },
            Pixel::RGBA8_UNORM,
            Sampling::default(),
        )
        .unwrap();

    assert_eq!(inspector.texture(texture.id(), |t| t.mipmap_levels()), Ok(2));

    let whole = Rect::whole(&texture_storage(&backend, &texture), 0).unwrap();
    #[rustfmt::skip]
    let texels = [
        1, 2, 3, 4,  0, 0, 0, 0,
        0, 0, 0, 0,  0, 0, 0, 0,
    ];
    HeadlessBackend::set_texels(&texture, whole, true, 0, &texels).unwrap();
    assert_eq!(inspector.texels(texture.id(), 1).unwrap(), Some(vec![1, 2, 3, 4]));

    let corner = Rect::new(Offset::Dim2 { x: 1, y: 1 }, Size::Dim2 { width: 1, height: 1 });
    HeadlessBackend::clear_texels(&texture, corner, false, &[9, 9, 9, 9]).unwrap();
    assert_eq!(
        inspector.texels(texture.id(), 0).unwrap().map(|t| t[12..].to_vec()),
        Some(vec![9, 9, 9, 9])
    );
    assert_eq!(
        HeadlessBackend::clear_texels(&texture, corner, false, &[9]),
        Err(HeadlessError::Common(Error::TexelsSizeMismatch {
            expected: 4,
            found: 1
        }))
    );

    HeadlessBackend::resize_texture(
        &texture,
        Size::Dim2 {
            width: 4,
            height: 1,
        },
    )
    .unwrap();
    assert_eq!(inspector.texels(texture.id(), 0).unwrap(), Some(vec![0; 16]));
    assert_eq!(
        HeadlessBackend::resize_texture(&texture, Size::Dim1 { width: 4 }),
        Err(HeadlessError::Common(Error::IncompatibleSize))
    );
}

fn texture_storage(
    backend: &HeadlessBackend,
    texture: &<HeadlessBackend as Backend>::Texture,
) -> Storage {
    backend
        .inspector()
        .texture(texture.id(), |t| t.storage())
        .unwrap()
}

#[test]
fn shader_declarations() {
    let backend = backend();
    let shader = backend
        .new_shader(&ShaderSources::default().vertex(VS).fragment(FS))
        .unwrap();

    let tint = HeadlessBackend::get_uniform(&shader, "tint", UniformTypeBase::Float4.into()).unwrap();
    assert_eq!(tint.name(), "tint");
    assert!(matches!(
        HeadlessBackend::get_uniform(&shader, "tint", UniformType::new(UniformTypeBase::Float4, 2)),
        Err(HeadlessError::UniformTypeMismatch { .. })
    ));
    assert!(matches!(
        HeadlessBackend::get_uniform(&shader, "missing", UniformTypeBase::Float.into()),
        Err(HeadlessError::UnknownUniform { .. })
    ));

    HeadlessBackend::get_shader_texture_binding_point(&shader, "albedo").unwrap();
    HeadlessBackend::get_shader_uniform_buffer_binding_point(&shader, "Material").unwrap();
    assert!(HeadlessBackend::get_shader_uniform_buffer_binding_point(&shader, "albedo").is_err());

    assert!(matches!(
        backend.new_shader(&ShaderSources::default().vertex(VS)),
        Err(HeadlessError::ShaderCompilation { .. })
    ));

    let cmd_buf = backend.new_cmd_buf().unwrap();
    HeadlessBackend::cmd_buf_bind_shader(&cmd_buf, &shader).unwrap();
    HeadlessBackend::cmd_buf_set_uniform(&cmd_buf, &tint, &[0; 16]).unwrap();
    HeadlessBackend::cmd_buf_finish(&cmd_buf).unwrap();

    assert_eq!(
        backend.inspector().submissions()[0].commands,
        vec![
            Command::BindShader {
                shader: shader.scarce_index()
            },
            Command::SetUniform {
                name: "tint".to_owned(),
                value: vec![0; 16],
            },
        ]
    );
}

#[test]
fn uniforms_need_their_shader_bound() {
    let backend = backend();
    let sources = ShaderSources::default().vertex(VS).fragment(FS);
    let shader = backend.new_shader(&sources).unwrap();
    let other = backend.new_shader(&sources).unwrap();
    let tint = HeadlessBackend::get_uniform(&shader, "tint", UniformTypeBase::Float4.into()).unwrap();

    let cmd_buf = backend.new_cmd_buf().unwrap();
    assert_eq!(
        HeadlessBackend::cmd_buf_set_uniform(&cmd_buf, &tint, &[0; 16]),
        Err(HeadlessError::Common(Error::ForeignUniform))
    );

    HeadlessBackend::cmd_buf_bind_shader(&cmd_buf, &other).unwrap();
    assert_eq!(
        HeadlessBackend::cmd_buf_set_uniform(&cmd_buf, &tint, &[0; 16]),
        Err(HeadlessError::Common(Error::ForeignUniform))
    );

    HeadlessBackend::cmd_buf_bind_shader(&cmd_buf, &shader).unwrap();
    HeadlessBackend::cmd_buf_set_uniform(&cmd_buf, &tint, &[0; 16]).unwrap();
}

#[test]
fn vertex_array_updates() {
    let backend = backend();
    let va = backend
        .new_vertex_array(
            Connector::Triangle,
            &triangle(),
            &VertexArrayData::empty(),
            &[0, 1, 2],
        )
        .unwrap();

    HeadlessBackend::update_vertex_array(
        &va,
        &VertexArrayUpdate::Indices {
            start: 1,
            indices: vec![2, 1],
        },
    )
    .unwrap();
    assert_eq!(
        HeadlessBackend::update_vertex_array(
            &va,
            &VertexArrayUpdate::Indices {
                start: 0,
                indices: vec![3],
            },
        ),
        Err(HeadlessError::Common(Error::IndexOutOfRange {
            index: 3,
            vertex_count: 3
        }))
    );
    assert_eq!(
        HeadlessBackend::update_vertex_array(
            &va,
            &VertexArrayUpdate::Indices {
                start: 2,
                indices: vec![0, 0],
            },
        ),
        Err(HeadlessError::Common(Error::UpdateOutOfBounds {
            start: 2,
            count: 2,
            len: 3
        }))
    );

    HeadlessBackend::update_vertex_array(
        &va,
        &VertexArrayUpdate::Vertices {
            start: 2,
            data: VertexArrayData::new(
                vec![VertexAttr::new(0, "position", VertexType::Float2)],
                MemoryLayout::Interleaved {
                    bytes: bytes_of(&[5.0, 5.0]),
                },
            ),
        },
    )
    .unwrap();

    let (indices, layout) = backend
        .inspector()
        .vertex_array(va.id(), |va| (va.indices().to_vec(), va.vertices().layout().clone()))
        .unwrap();
    assert_eq!(indices, vec![0, 2, 1]);
    assert_eq!(
        layout,
        MemoryLayout::Interleaved {
            bytes: bytes_of(&[0.0, 0.0, 1.0, 0.0, 5.0, 5.0]),
        }
    );
}

#[test]
fn uniform_buffers() {
    let backend = backend();
    let ub = backend.new_uniform_buffer(&[0; 8]).unwrap();

    HeadlessBackend::update_uniform_buffer(&ub, 4, &[1, 2, 3, 4]).unwrap();
    assert_eq!(
        backend.inspector().uniform_buffer(ub.id(), |ub| ub.bytes().to_vec()),
        Ok(vec![0, 0, 0, 0, 1, 2, 3, 4])
    );
    assert_eq!(
        HeadlessBackend::update_uniform_buffer(&ub, 6, &[1, 2, 3]),
        Err(HeadlessError::Common(Error::UpdateOutOfBounds {
            start: 6,
            count: 3,
            len: 8
        }))
    );
}

#[test]
fn dead_handles_are_reported() {
    let backend = backend();
    let texture = backend
        .new_texture(
            Storage::Flat1D { width: 4 },
            Pixel::RGBA8_UNORM,
            Sampling::default(),
        )
        .unwrap();
    let cmd_buf = backend.new_cmd_buf().unwrap();

    HeadlessBackend::drop_texture(&texture);

    assert_eq!(
        HeadlessBackend::cmd_buf_bind_texture(&cmd_buf, &texture, &0),
        Err(HeadlessError::UnknownResource { kind: "texture" })
    );
    assert_eq!(
        HeadlessBackend::resize_texture(&texture, Size::Dim1 { width: 2 }),
        Err(HeadlessError::UnknownResource { kind: "texture" })
    );

    HeadlessBackend::drop_cmd_buf(&cmd_buf);
    assert_eq!(
        HeadlessBackend::cmd_buf_srgb(&cmd_buf, true),
        Err(HeadlessError::UnknownResource {
            kind: "command buffer"
        })
    );
}
