//! Per-view addressing state.
//!
//! A [`ViewLayout`] maps the visible index space of a view onto the
//! physical row-major shape of the container it borrows. Every physical
//! dimension carries an `offset` and a `gain` (stride multiplier), or a
//! fixed coordinate once it has been collapsed out of the visible shape.
//! Visible dimensions keep their physical order, so `dimension_map` is
//! strictly increasing.
//!
//! Transformations never modify `self`; each one returns a new layout.

use super::error::{ArrayError, ArrayResult};
use super::shape::Shape;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewLayout {
    size: Shape,
    dimension_map: Vec<usize>,
    pub(crate) offset: Vec<usize>,
    pub(crate) gain: Vec<usize>,
    pub(crate) fixed: Vec<Option<usize>>,
    transformed: bool,
}

impl ViewLayout {
    pub fn identity(physical: &Shape) -> ViewLayout {
        let rank = physical.rank();
        ViewLayout {
            size: physical.clone(),
            dimension_map: (0..rank).collect(),
            offset: vec![0; rank],
            gain: vec![1; rank],
            fixed: vec![None; rank],
            transformed: false,
        }
    }

    /// The visible shape.
    pub fn size(&self) -> &Shape {
        &self.size
    }

    pub fn rank(&self) -> usize {
        self.size.rank()
    }

    pub fn physical_rank(&self) -> usize {
        self.gain.len()
    }

    pub fn dimension_map(&self) -> &[usize] {
        &self.dimension_map
    }

    pub fn offset(&self) -> &[usize] {
        &self.offset
    }

    pub fn gain(&self) -> &[usize] {
        &self.gain
    }

    /// The bound coordinate of every collapsed physical dimension.
    pub fn fixed(&self) -> &[Option<usize>] {
        &self.fixed
    }

    pub fn is_identity(&self) -> bool {
        !self.transformed
    }

    /// Flat offset of a visible index into a buffer of shape `physical`.
    #[inline]
    pub fn resolve(&self, physical: &Shape, index: &[usize]) -> ArrayResult<usize> {
        if self.transformed {
            physical.view_position(self, index)
        } else {
            physical.position(index)
        }
    }

    fn physical_dim(&self, dim: usize, op: &'static str) -> ArrayResult<usize> {
        self.dimension_map
            .get(dim)
            .copied()
            .ok_or(ArrayError::InvalidDimension {
                dim,
                rank: self.rank(),
                op,
            })
    }

    fn check_coord(&self, dim: usize, value: usize) -> ArrayResult<()> {
        if value >= self.size[dim] {
            return Err(ArrayError::IndexOutOfRange {
                index: vec![value],
                shape: vec![self.size[dim]],
            });
        }
        Ok(())
    }

    fn derive(&self) -> ViewLayout {
        let mut ret = self.clone();
        ret.transformed = true;
        ret
    }

    /// Drops the first `value` entries of visible dimension `dim`.
    pub fn set_range_begin(&self, dim: usize, value: usize) -> ArrayResult<ViewLayout> {
        let p = self.physical_dim(dim, "set_range_begin")?;
        self.check_coord(dim, value)?;

        let mut ret = self.derive();
        ret.offset[p] += value * self.gain[p];
        ret.size.0[dim] -= value;
        Ok(ret)
    }

    /// Keeps only the first `value` entries of visible dimension `dim`.
    pub fn set_range_end(&self, dim: usize, value: usize) -> ArrayResult<ViewLayout> {
        self.physical_dim(dim, "set_range_end")?;
        if value == 0 || value > self.size[dim] {
            return Err(ArrayError::invalid_argument(
                "set_range_end",
                format!("end {} outside 1..={}", value, self.size[dim]),
            ));
        }

        let mut ret = self.derive();
        ret.size.0[dim] = value;
        Ok(ret)
    }

    /// Keeps every `value`-th entry of visible dimension `dim`.
    pub fn set_range_stride(&self, dim: usize, value: usize) -> ArrayResult<ViewLayout> {
        let p = self.physical_dim(dim, "set_range_stride")?;
        if value == 0 {
            return Err(ArrayError::invalid_argument(
                "set_range_stride",
                "stride must be positive",
            ));
        }

        let mut ret = self.derive();
        ret.size.0[dim] = (self.size[dim] + value - 1) / value;
        ret.gain[p] *= value;
        Ok(ret)
    }

    /// Binds visible dimension `dim` to `value` and removes it from the
    /// visible shape.
    pub fn fix_dimension(&self, dim: usize, value: usize) -> ArrayResult<ViewLayout> {
        let p = self.physical_dim(dim, "fix_dimension")?;
        self.check_coord(dim, value)?;

        let mut ret = self.derive();
        ret.size.0.remove(dim);
        ret.dimension_map.remove(dim);
        ret.fixed[p] = Some(self.offset[p] + value * self.gain[p]);
        Ok(ret)
    }
}
