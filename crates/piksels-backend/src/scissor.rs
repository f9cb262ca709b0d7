#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Scissor {
    #[default]
    Off,
    On(ScissorRegion),
}

/// Screen region outside of which fragments are discarded.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScissorRegion {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

mk_bckd_type_getters!(
    ScissorRegion,
    x -> u32,
    y -> u32,
    width -> u32,
    height -> u32,
);

impl ScissorRegion {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
