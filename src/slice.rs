//! Axis-split decomposition of a container.
//!
//! Splitting a row-major shape after axis `d` gives an outer ("left") index
//! space over extents `0..=d` and, for every outer index, a contiguous
//! inner ("right") block over the remaining extents. Each block is handed
//! out as a non-owning container aliasing the parent buffer.

use tracing::trace;

use crate::array::{Array, ConstArray};
use crate::error::{ArrayError, ArrayResult};
use crate::shape::{Axis, Shape};

fn split_shape(shape: &Shape, has_buffer: bool, axis: Axis, op: &'static str) -> ArrayResult<(Shape, Shape)> {
    if axis.index() + 1 >= shape.rank() {
        return Err(ArrayError::InvalidDimension {
            dim: axis.index(),
            rank: shape.rank(),
            op,
        });
    }
    if !has_buffer {
        return Err(ArrayError::EmptyBuffer { op });
    }
    let (left, right) = shape.split_at(axis)?;
    trace!(left = ?left.dims(), right = ?right.dims(), "split");
    Ok((left, right))
}

fn check_outer(index: usize, total_left: usize) -> ArrayResult<()> {
    if index >= total_left {
        return Err(ArrayError::IndexOutOfRange {
            index: vec![index],
            shape: vec![total_left],
        });
    }
    Ok(())
}

/// Mutable split; the blocks it hands out write into the parent buffer.
pub struct Slice<'a, T> {
    data: &'a mut [T],
    left_size: Shape,
    right_size: Shape,
}

impl<'a, T> Slice<'a, T> {
    /// Fails unless at least one axis remains to the right of `axis`.
    pub fn new(array: &'a mut Array<'_, T>, axis: Axis) -> ArrayResult<Self> {
        let (left_size, right_size) = split_shape(array.shape(), array.has_buffer(), axis, "slice")?;
        Ok(Slice {
            data: array.as_mut_slice(),
            left_size,
            right_size,
        })
    }

    pub fn left_size(&self) -> &Shape {
        &self.left_size
    }

    pub fn right_size(&self) -> &Shape {
        &self.right_size
    }

    pub fn total_left_size(&self) -> usize {
        self.left_size.total_size()
    }

    pub fn total_right_size(&self) -> usize {
        self.right_size.total_size()
    }

    pub fn get_element(&mut self, index: usize) -> ArrayResult<Array<'_, T>> {
        check_outer(index, self.total_left_size())?;
        let n = self.total_right_size();
        Ok(Array::borrowed(
            self.right_size.clone(),
            &mut self.data[index * n..(index + 1) * n],
        ))
    }

    /// Inner block at outer position `index`.
    ///
    /// # Panics
    ///
    /// If `index >= total_left_size()`.
    pub fn element(&mut self, index: usize) -> Array<'_, T> {
        match self.get_element(index) {
            Ok(a) => a,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn get_const_element(&self, index: usize) -> ArrayResult<ConstArray<'_, T>> {
        check_outer(index, self.total_left_size())?;
        let n = self.total_right_size();
        Ok(ConstArray::borrowed(
            self.right_size.clone(),
            &self.data[index * n..(index + 1) * n],
        ))
    }

    /// All inner blocks in outer row-major order.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = Array<'_, T>> + '_ {
        let right = &self.right_size;
        let n = right.total_size();
        let left = self.left_size.total_size();
        let mut rest: &mut [T] = &mut self.data[..left * n];
        (0..left).map(move |_| {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(n);
            rest = tail;
            Array::borrowed(right.clone(), head)
        })
    }
}

/// Read-only split.
pub struct ConstSlice<'a, T> {
    data: &'a [T],
    left_size: Shape,
    right_size: Shape,
}

impl<'a, T> ConstSlice<'a, T> {
    pub fn new(array: &'a ConstArray<'_, T>, axis: Axis) -> ArrayResult<Self> {
        Self::split(array.as_slice(), array.has_buffer(), array.shape(), axis)
    }

    pub(crate) fn split(data: &'a [T], has_buffer: bool, shape: &Shape, axis: Axis) -> ArrayResult<Self> {
        let (left_size, right_size) = split_shape(shape, has_buffer, axis, "const_slice")?;
        Ok(ConstSlice {
            data,
            left_size,
            right_size,
        })
    }

    pub fn left_size(&self) -> &Shape {
        &self.left_size
    }

    pub fn right_size(&self) -> &Shape {
        &self.right_size
    }

    pub fn total_left_size(&self) -> usize {
        self.left_size.total_size()
    }

    pub fn total_right_size(&self) -> usize {
        self.right_size.total_size()
    }

    pub fn get_element(&self, index: usize) -> ArrayResult<ConstArray<'a, T>> {
        check_outer(index, self.total_left_size())?;
        let n = self.total_right_size();
        Ok(ConstArray::borrowed(
            self.right_size.clone(),
            &self.data[index * n..(index + 1) * n],
        ))
    }

    /// # Panics
    ///
    /// If `index >= total_left_size()`.
    pub fn element(&self, index: usize) -> ConstArray<'a, T> {
        match self.get_element(index) {
            Ok(a) => a,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = ConstArray<'a, T>> + '_ {
        (0..self.total_left_size()).map(move |i| self.element(i))
    }
}
