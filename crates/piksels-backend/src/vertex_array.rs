use crate::{vertex::VertexAttr, Error};

/// Attributes along with their bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VertexArrayData {
    attrs: Vec<VertexAttr>,
    layout: MemoryLayout,
}

impl Default for VertexArrayData {
    fn default() -> Self {
        Self::empty()
    }
}

impl VertexArrayData {
    #[must_use]
    pub fn new(attrs: Vec<VertexAttr>, layout: MemoryLayout) -> Self {
        Self { attrs, layout }
    }

    /// Data without attributes, used when a vertex array has no instance data
    /// for instance.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), MemoryLayout::Interleaved { bytes: Vec::new() })
    }

    #[must_use]
    pub fn attrs(&self) -> &[VertexAttr] {
        &self.attrs
    }

    #[must_use]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Size in bytes of a whole element across all attributes.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.attrs.iter().map(VertexAttr::size).sum()
    }

    /// Number of elements. Only meaningful for data that passes
    /// [`VertexArrayData::validate`].
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.layout {
            MemoryLayout::Interleaved { bytes } => match self.stride() {
                0 => 0,
                stride => bytes.len() / stride,
            },

            MemoryLayout::Deinterleaved { bytes_per_attr } => bytes_per_attr
                .first()
                .zip(self.attrs.first())
                .map_or(0, |(bytes, attr)| match attr.size() {
                    0 => 0,
                    size => bytes.len() / size,
                }),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both data have the same attributes laid out the same way.
    #[must_use]
    pub fn same_layout(&self, other: &VertexArrayData) -> bool {
        self.attrs == other.attrs
            && matches!(
                (&self.layout, &other.layout),
                (MemoryLayout::Interleaved { .. }, MemoryLayout::Interleaved { .. })
                    | (
                        MemoryLayout::Deinterleaved { .. },
                        MemoryLayout::Deinterleaved { .. }
                    )
            )
    }

    /// Checks that the bytes hold a whole number of elements for every
    /// attribute.
    ///
    /// ## Errors
    ///
    /// [`Error::InvalidVertexData`] describing the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason: String| Err(Error::InvalidVertexData { reason });

        match &self.layout {
            MemoryLayout::Interleaved { bytes } => {
                let stride = self.stride();

                if stride == 0 {
                    if !bytes.is_empty() {
                        return invalid(format!("{} bytes without attributes", bytes.len()));
                    }
                } else if bytes.len() % stride != 0 {
                    return invalid(format!(
                        "{} bytes is not a multiple of the {stride} bytes vertex size",
                        bytes.len()
                    ));
                }
            }

            MemoryLayout::Deinterleaved { bytes_per_attr } => {
                if bytes_per_attr.len() != self.attrs.len() {
                    return invalid(format!(
                        "{} attributes but {} buffers",
                        self.attrs.len(),
                        bytes_per_attr.len()
                    ));
                }

                let mut count = None;
                for (attr, bytes) in self.attrs.iter().zip(bytes_per_attr) {
                    let size = attr.size();

                    if size == 0 || bytes.len() % size != 0 {
                        return invalid(format!(
                            "{} bytes for attribute {} is not a multiple of {size}",
                            bytes.len(),
                            attr.name
                        ));
                    }

                    let n = bytes.len() / size;
                    match count {
                        Some(count) if count != n => {
                            return invalid(format!(
                                "attribute {} has {n} elements, expected {count}",
                                attr.name
                            ));
                        }
                        _ => count = Some(n),
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MemoryLayout {
    /// `{ x0, y0, r0, g0, b0, x1, y1, r1, g1, b1 }`
    Interleaved { bytes: Vec<u8> },

    /// `{ x0, y0, x1, y1 } { r0, g0, b0, r1, g1, b1 }`
    Deinterleaved { bytes_per_attr: Vec<Vec<u8>> },
}

/// Partial update of a vertex array. `start` counts elements, not bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VertexArrayUpdate {
    Vertices { start: usize, data: VertexArrayData },
    Instances { start: usize, data: VertexArrayData },
    Indices { start: usize, indices: Vec<u32> },
}

impl VertexArrayUpdate {
    #[must_use]
    pub fn start(&self) -> usize {
        match self {
            VertexArrayUpdate::Vertices { start, .. }
            | VertexArrayUpdate::Instances { start, .. }
            | VertexArrayUpdate::Indices { start, .. } => *start,
        }
    }

    /// Number of updated elements.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            VertexArrayUpdate::Vertices { data, .. } | VertexArrayUpdate::Instances { data, .. } => {
                data.len()
            }
            VertexArrayUpdate::Indices { indices, .. } => indices.len(),
        }
    }
}
