use std::fmt;
use std::ops::Index;

use super::error::{ArrayError, ArrayResult};
use super::layout::ViewLayout;

pub(crate) fn zip<I, J>(i: I, j: J) -> std::iter::Zip<I::IntoIter, J::IntoIter>
where
    I: IntoIterator,
    J: IntoIterator,
{
    i.into_iter().zip(j)
}

/// An axis position, used to pick the dimension an operation splits or drops.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Axis(pub usize);

impl Axis {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Extents of an N-dimensional row-major array.
///
/// A rank-0 shape describes a single scalar element; a shape with any
/// zero extent describes no elements at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape(pub(crate) Vec<usize>);

impl Shape {
    pub fn from_vec(v: Vec<usize>) -> Shape {
        Shape(v)
    }

    pub fn from_array<const N: usize>(v: [usize; N]) -> Shape {
        Shape(v.to_vec())
    }

    pub fn from_slice(v: &[usize]) -> Shape {
        Shape(v.to_vec())
    }

    /// The empty (rank-0) shape.
    pub fn scalar() -> Shape {
        Shape(Vec::new())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Replaces every extent at once.
    pub fn set_dims(&mut self, dims: Vec<usize>) {
        self.0 = dims;
    }

    pub fn total_size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn same(&self, other: &[usize]) -> bool {
        self.0.as_slice() == other
    }

    pub fn check_index(&self, index: &[usize]) -> bool {
        index.len() == self.rank() && zip(index, &self.0).all(|(&i, &dim)| i < dim)
    }

    pub(crate) fn validate(&self, index: &[usize]) -> ArrayResult<()> {
        if index.len() != self.rank() {
            return Err(ArrayError::RankMismatch {
                expected: self.rank(),
                got: index.len(),
            });
        }
        if !self.check_index(index) {
            return Err(ArrayError::IndexOutOfRange {
                index: index.to_vec(),
                shape: self.0.clone(),
            });
        }
        Ok(())
    }

    /// Row-major flat offset of `index`.
    pub fn position(&self, index: &[usize]) -> ArrayResult<usize> {
        self.validate(index)?;
        Ok(zip(index, &self.0).fold(0, |position, (&i, &dim)| position * dim + i))
    }

    /// Flat offset of a visible `index` of a transformed view over this
    /// (physical) shape.
    ///
    /// Physical dimensions are walked in order. A fixed dimension
    /// contributes its bound coordinate, any other one consumes the next
    /// visible index `v` and contributes `v * gain + offset`. Contributions
    /// nest with the physical extents, so collapsed dimensions still take
    /// part in the row-major accumulation.
    pub fn view_position(&self, layout: &ViewLayout, index: &[usize]) -> ArrayResult<usize> {
        layout.size().validate(index)?;
        if layout.physical_rank() != self.rank() {
            return Err(ArrayError::RankMismatch {
                expected: self.rank(),
                got: layout.physical_rank(),
            });
        }

        let mut consumed = 0;
        let mut position = 0;
        for (p, &dim) in self.0.iter().enumerate() {
            let coord = match layout.fixed[p] {
                Some(value) => value,
                None => {
                    let v = *index.get(consumed).ok_or(ArrayError::RankMismatch {
                        expected: consumed + 1,
                        got: index.len(),
                    })?;
                    consumed += 1;
                    v * layout.gain[p] + layout.offset[p]
                }
            };
            position = position * dim + coord;
        }

        if consumed != index.len() {
            return Err(ArrayError::RankMismatch {
                expected: consumed,
                got: index.len(),
            });
        }
        Ok(position)
    }

    // [a, b, c] => strides [b * c, c, 1]
    pub fn strides(&self) -> Vec<usize> {
        let mut x = vec![0; self.rank()];
        let mut prod = 1;
        for (m, &dim) in x.iter_mut().rev().zip(self.0.iter().rev()) {
            *m = prod;
            prod *= dim;
        }
        x
    }

    /// The shape with axis `a` removed.
    pub fn select_axis(&self, a: Axis) -> ArrayResult<Shape> {
        if a.index() >= self.rank() {
            return Err(ArrayError::InvalidDimension {
                dim: a.index(),
                rank: self.rank(),
                op: "select_axis",
            });
        }
        let mut dst = Vec::with_capacity(self.rank() - 1);
        dst.extend_from_slice(&self.0[..a.index()]);
        dst.extend_from_slice(&self.0[a.index() + 1..]);
        Ok(Shape(dst))
    }

    /// Splits into the extents up to and including `a`, and the ones after it.
    /// At least one extent must remain on the right.
    pub fn split_at(&self, a: Axis) -> ArrayResult<(Shape, Shape)> {
        if a.index() + 1 >= self.rank() {
            return Err(ArrayError::InvalidDimension {
                dim: a.index(),
                rank: self.rank(),
                op: "split_at",
            });
        }
        let (left, right) = self.0.split_at(a.index() + 1);
        Ok((Shape::from_slice(left), Shape::from_slice(right)))
    }

    /// All valid indices in row-major order.
    pub fn iter(&self) -> ShapeIter<'_> {
        ShapeIter {
            dim: self,
            index: self.first_index(),
            remaining: self.total_size(),
        }
    }

    #[inline]
    pub(crate) fn first_index(&self) -> Option<Vec<usize>> {
        for ax in self.0.iter() {
            if *ax == 0 {
                return None;
            }
        }
        Some(vec![0; self.rank()])
    }

    #[inline]
    pub(crate) fn next_for(&self, index: &mut [usize]) -> Option<()> {
        for (&dim, ix) in zip(&self.0, index.iter_mut()).rev() {
            *ix += 1;
            if *ix == dim {
                *ix = 0;
            } else {
                return Some(());
            }
        }
        None
    }
}

impl Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape::from_vec(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(v: &[usize]) -> Self {
        Shape::from_slice(v)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(v: [usize; N]) -> Self {
        Shape::from_array(v)
    }
}

impl PartialEq<[usize]> for Shape {
    fn eq(&self, other: &[usize]) -> bool {
        self.same(other)
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.same(other)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", dim)?;
        }
        f.write_str(")")
    }
}

/// Row-major (last axis fastest) walk over every index of a [`Shape`].
#[derive(Clone)]
pub struct ShapeIter<'a> {
    dim: &'a Shape,
    index: Option<Vec<usize>>,
    remaining: usize,
}

impl<'a> Iterator for ShapeIter<'a> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.index.take()?;
        let mut next = current.clone();
        if self.dim.next_for(&mut next).is_some() {
            self.index = Some(next);
        }
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for ShapeIter<'a> {}
