#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FaceCulling {
    #[default]
    Off,
    On {
        order: FaceCullingOrder,
        face: FaceCullingFace,
    },
}

/// Winding order of front-facing triangles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FaceCullingOrder {
    CW,
    CCW,
}

/// Side to cull.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FaceCullingFace {
    Front,
    Back,
    Both,
}
