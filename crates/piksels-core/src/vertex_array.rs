use std::{
    fmt,
    ops::{Bound, RangeBounds},
};

use piksels_backend::{
    primitive::Connector,
    vertex::VertexAttr,
    vertex_array::{VertexArrayData, VertexArrayUpdate},
    Backend, Error,
};

/// Vertices, optional per-instance data and optional indices, living on the
/// device.
#[derive(Debug)]
pub struct VertexArray<B>
where
    B: Backend,
{
    raw: B::VertexArray,
    connector: Connector,
    vertex_attrs: Vec<VertexAttr>,
    instance_attrs: Vec<VertexAttr>,
    vertex_count: usize,
    instance_count: usize,
    index_count: usize,
}

impl<B> Drop for VertexArray<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_vertex_array(&self.raw);
    }
}

/// Checks that every index points at a vertex.
pub(crate) fn check_indices(indices: &[u32], vertex_count: usize) -> Result<(), Error> {
    match indices
        .iter()
        .find(|&&index| index as usize >= vertex_count)
    {
        Some(&index) => Err(Error::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

impl<B> VertexArray<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(
        raw: B::VertexArray,
        connector: Connector,
        vertices: &VertexArrayData,
        instances: &VertexArrayData,
        indices: &[u32],
    ) -> Self {
        Self {
            raw,
            connector,
            vertex_attrs: vertices.attrs().to_vec(),
            instance_attrs: instances.attrs().to_vec(),
            vertex_count: vertices.len(),
            instance_count: instances.len(),
            index_count: indices.len(),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &B::VertexArray {
        &self.raw
    }

    #[must_use]
    pub fn connector(&self) -> Connector {
        self.connector
    }

    #[must_use]
    pub fn vertex_attrs(&self) -> &[VertexAttr] {
        &self.vertex_attrs
    }

    #[must_use]
    pub fn instance_attrs(&self) -> &[VertexAttr] {
        &self.instance_attrs
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }

    /// Number of elements a draw goes through: indices if there are any,
    /// vertices otherwise.
    #[must_use]
    pub fn drawable_count(&self) -> usize {
        if self.is_indexed() {
            self.index_count
        } else {
            self.vertex_count
        }
    }

    /// Overwrites part of the vertices, instances or indices.
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidVertexData`] if the new data is malformed or does not
    ///   have the attributes of the data it replaces.
    /// - [`Error::UpdateOutOfBounds`] if the update does not fit.
    /// - [`Error::IndexOutOfRange`] if a new index points past the vertices.
    pub fn update(&self, update: &VertexArrayUpdate) -> Result<(), B::Err> {
        let len = match update {
            VertexArrayUpdate::Vertices { data, .. } => {
                Self::check_update_data(data, &self.vertex_attrs)?;
                self.vertex_count
            }
            VertexArrayUpdate::Instances { data, .. } => {
                Self::check_update_data(data, &self.instance_attrs)?;
                self.instance_count
            }
            VertexArrayUpdate::Indices { indices, .. } => {
                check_indices(indices, self.vertex_count)?;
                self.index_count
            }
        };

        let (start, count) = (update.start(), update.count());
        if start.checked_add(count).map_or(true, |end| end > len) {
            return Err(Error::UpdateOutOfBounds { start, count, len }.into());
        }

        B::update_vertex_array(&self.raw, update)
    }

    fn check_update_data(data: &VertexArrayData, attrs: &[VertexAttr]) -> Result<(), Error> {
        data.validate()?;

        if data.attrs() != attrs {
            return Err(Error::InvalidVertexData {
                reason: "attributes differ from the vertex array ones".to_owned(),
            });
        }

        Ok(())
    }
}

/// A range of elements of a [`VertexArray`] to draw, possibly instanced.
pub struct VertexArrayView<'a, B>
where
    B: Backend,
{
    vertex_array: &'a VertexArray<B>,
    start: usize,
    count: usize,
    instances: usize,
}

impl<B> fmt::Debug for VertexArrayView<'_, B>
where
    B: Backend,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArrayView")
            .field("start", &self.start)
            .field("count", &self.count)
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}

impl<'a, B> VertexArrayView<'a, B>
where
    B: Backend,
{
    #[must_use]
    pub fn vertex_array(&self) -> &'a VertexArray<B> {
        self.vertex_array
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances
    }

    #[must_use]
    pub fn instances(mut self, instances: usize) -> Self {
        self.instances = instances;
        self
    }
}

/// Ranges of drawable elements.
pub trait View<R> {
    type Backend: Backend;

    /// ## Errors
    ///
    /// [`Error::InvalidView`] if the range is not within the drawable
    /// elements.
    fn view(&self, range: R) -> Result<VertexArrayView<'_, Self::Backend>, Error>;
}

impl<B, R> View<R> for VertexArray<B>
where
    B: Backend,
    R: RangeBounds<usize>,
{
    type Backend = B;

    fn view(&self, range: R) -> Result<VertexArrayView<'_, B>, Error> {
        let len = self.drawable_count();

        let start = match range.start_bound() {
            Bound::Included(&start) => Some(start),
            Bound::Excluded(&start) => start.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1),
            Bound::Excluded(&end) => Some(end),
            Bound::Unbounded => Some(len),
        };

        match (start, end) {
            (Some(start), Some(end)) if start <= end && end <= len => Ok(VertexArrayView {
                vertex_array: self,
                start,
                count: end - start,
                instances: self.instance_count.max(1),
            }),
            (start, end) => {
                let start = start.unwrap_or(usize::MAX);
                Err(Error::InvalidView {
                    start,
                    count: end.unwrap_or(usize::MAX).saturating_sub(start),
                    len,
                })
            }
        }
    }
}
