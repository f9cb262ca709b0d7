macro_rules! mk_color_type {
    ($ty:ident: $field_ty:ty, $($field_name:ident),+) => {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct $ty {
            $(pub $field_name: $field_ty),+
        }

        impl $ty {
            #[must_use]
            pub fn new($($field_name: $field_ty),+) -> Self {
                Self { $($field_name),+ }
            }
        }
    };
}

mk_color_type!(RGB: u8, r, g, b);
mk_color_type!(RGBA: u8, r, g, b, a);
mk_color_type!(RGB32F: f32, r, g, b);
mk_color_type!(RGBA32F: f32, r, g, b, a);

impl RGBA32F {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Quantizes to 8 bits per channel, clamping to `[0, 1]` first.
    #[must_use]
    pub fn to_rgba8(self) -> RGBA {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        RGBA::new(q(self.r), q(self.g), q(self.b), q(self.a))
    }
}
