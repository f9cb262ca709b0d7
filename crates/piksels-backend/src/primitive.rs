//! Primitive connectors.

/// How vertices are linked together into primitives.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Connector {
    /// Unconnected points.
    Point,

    /// Disjoint lines: 0-1, 2-3, 4-5, ...
    Line,

    /// Continuous line: 0-1, 1-2, 2-3, ...
    LineStrip,

    /// Disjoint triangles: 0-1-2, 3-4-5, ...
    Triangle,

    /// Each new vertex makes a triangle with the previous two: 0-1-2, 1-2-3, ...
    TriangleStrip,

    /// Each new vertex makes a triangle with the first and the previous one:
    /// 0-1-2, 0-2-3, ...
    TriangleFan,

    /// Groups of the given number of vertices, interpreted by tessellation
    /// shaders.
    Patch(usize),
}

impl Connector {
    /// Number of primitives formed by `count` vertices.
    #[must_use]
    pub fn primitive_count(self, count: usize) -> usize {
        match self {
            Connector::Point => count,
            Connector::Line => count / 2,
            Connector::LineStrip => count.saturating_sub(1),
            Connector::Triangle => count / 3,
            Connector::TriangleStrip | Connector::TriangleFan => count.saturating_sub(2),
            Connector::Patch(0) => 0,
            Connector::Patch(n) => count / n,
        }
    }
}

/// A primitive class, tying a type to a [`Connector`].
pub trait Primitive {
    const CONNECTOR: Connector;
}

macro_rules! mk_primitive {
    ($($(#[$attr:meta])* $ty:ident => $connector:ident),+ $(,)?) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
            pub struct $ty;

            impl Primitive for $ty {
                const CONNECTOR: Connector = Connector::$connector;
            }
        )+
    };
}

mk_primitive!(
    Point => Point,
    Line => Line,
    LineStrip => LineStrip,
    Triangle => Triangle,
    TriangleStrip => TriangleStrip,
    TriangleFan => TriangleFan,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_counts() {
        assert_eq!(Connector::Triangle.primitive_count(7), 2);
        assert_eq!(Connector::TriangleFan.primitive_count(5), 3);
        assert_eq!(Connector::LineStrip.primitive_count(0), 0);
        assert_eq!(Connector::Patch(4).primitive_count(8), 2);
        assert_eq!(Connector::Patch(0).primitive_count(8), 0);
        assert_eq!(<Triangle as Primitive>::CONNECTOR, Connector::Triangle);
    }
}
