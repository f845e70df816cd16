//! Zero-copy views over a container's buffer.
//!
//! A view borrows the flat buffer and the physical shape of the container
//! it was derived from and resolves every visible index through its
//! [`ViewLayout`]. [`ConstView`] transformations take `&self` and leave the
//! receiver usable. [`View`] transformations consume the receiver; call
//! [`View::reborrow`] first to keep it.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_traits::AsPrimitive;

use crate::array::{Array, NdAccess};
use crate::error::{ArrayError, ArrayResult};
use crate::layout::ViewLayout;
use crate::shape::Shape;

fn resolve_in(len: usize, layout: &ViewLayout, physical: &Shape, index: &[usize]) -> ArrayResult<usize> {
    if len == 0 && layout.size().total_size() > 0 {
        return Err(ArrayError::EmptyBuffer { op: "view" });
    }
    layout.resolve(physical, index)
}

/// Read-only view.
pub struct ConstView<'a, T> {
    data: &'a [T],
    physical: &'a Shape,
    layout: ViewLayout,
}

impl<'a, T> Clone for ConstView<'a, T> {
    fn clone(&self) -> Self {
        ConstView {
            data: self.data,
            physical: self.physical,
            layout: self.layout.clone(),
        }
    }
}

impl<'a, T> ConstView<'a, T> {
    pub(crate) fn new(data: &'a [T], physical: &'a Shape) -> Self {
        ConstView {
            data,
            physical,
            layout: ViewLayout::identity(physical),
        }
    }

    /// The visible shape.
    pub fn size(&self) -> &Shape {
        self.layout.size()
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn is_identity(&self) -> bool {
        self.layout.is_identity()
    }

    pub fn get(&self, index: &[usize]) -> ArrayResult<&'a T> {
        let pos = resolve_in(self.data.len(), &self.layout, self.physical, index)?;
        Ok(&self.data[pos])
    }

    /// # Panics
    ///
    /// On an index that does not fit the visible shape.
    pub fn at(&self, index: &[usize]) -> &'a T {
        match self.get(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    fn with_layout(&self, layout: ViewLayout) -> Self {
        ConstView {
            data: self.data,
            physical: self.physical,
            layout,
        }
    }

    pub fn set_range_begin(&self, dim: usize, value: usize) -> ArrayResult<Self> {
        Ok(self.with_layout(self.layout.set_range_begin(dim, value)?))
    }

    pub fn set_range_end(&self, dim: usize, value: usize) -> ArrayResult<Self> {
        Ok(self.with_layout(self.layout.set_range_end(dim, value)?))
    }

    pub fn set_range_stride(&self, dim: usize, value: usize) -> ArrayResult<Self> {
        Ok(self.with_layout(self.layout.set_range_stride(dim, value)?))
    }

    pub fn fix_dimension(&self, dim: usize, value: usize) -> ArrayResult<Self> {
        Ok(self.with_layout(self.layout.fix_dimension(dim, value)?))
    }

    /// Visible elements in row-major order of the visible shape.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.size().iter().map(move |idx| self.at(&idx))
    }

    /// Copies the visible elements into a new owned container.
    pub fn to_array(&self) -> Array<'static, T>
    where
        T: Clone,
    {
        if self.data.is_empty() && self.size().total_size() > 0 {
            return Array::with_shape(self.size().clone());
        }
        Array::owned(self.size().clone(), self.iter().cloned().collect())
    }
}

impl<'a, T> NdAccess<T> for ConstView<'a, T> {
    fn shape(&self) -> &Shape {
        self.size()
    }

    fn value(&self, index: &[usize]) -> ArrayResult<&T> {
        self.get(index)
    }
}

impl<'a, T> Index<&[usize]> for ConstView<'a, T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        self.at(index)
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for ConstView<'a, T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        self.at(&index)
    }
}

impl<'a, T> fmt::Debug for ConstView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstView")
            .field("physical", self.physical)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Mutable view.
pub struct View<'a, T> {
    data: &'a mut [T],
    physical: &'a Shape,
    layout: ViewLayout,
}

impl<'a, T> View<'a, T> {
    pub(crate) fn new(data: &'a mut [T], physical: &'a Shape) -> Self {
        View {
            data,
            physical,
            layout: ViewLayout::identity(physical),
        }
    }

    pub fn size(&self) -> &Shape {
        self.layout.size()
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn is_identity(&self) -> bool {
        self.layout.is_identity()
    }

    /// A view with the same layout that borrows from this one.
    pub fn reborrow(&mut self) -> View<'_, T> {
        View {
            data: &mut *self.data,
            physical: self.physical,
            layout: self.layout.clone(),
        }
    }

    pub fn as_const(&self) -> ConstView<'_, T> {
        ConstView {
            data: &*self.data,
            physical: self.physical,
            layout: self.layout.clone(),
        }
    }

    pub fn into_const(self) -> ConstView<'a, T> {
        ConstView {
            data: self.data,
            physical: self.physical,
            layout: self.layout,
        }
    }

    pub fn get(&self, index: &[usize]) -> ArrayResult<&T> {
        let pos = resolve_in(self.data.len(), &self.layout, self.physical, index)?;
        Ok(&self.data[pos])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> ArrayResult<&mut T> {
        let pos = resolve_in(self.data.len(), &self.layout, self.physical, index)?;
        Ok(&mut self.data[pos])
    }

    /// # Panics
    ///
    /// On an index that does not fit the visible shape.
    pub fn at(&self, index: &[usize]) -> &T {
        match self.get(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn at_mut(&mut self, index: &[usize]) -> &mut T {
        match self.get_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    fn with_layout(self, layout: ViewLayout) -> Self {
        View {
            data: self.data,
            physical: self.physical,
            layout,
        }
    }

    pub fn set_range_begin(self, dim: usize, value: usize) -> ArrayResult<Self> {
        let layout = self.layout.set_range_begin(dim, value)?;
        Ok(self.with_layout(layout))
    }

    pub fn set_range_end(self, dim: usize, value: usize) -> ArrayResult<Self> {
        let layout = self.layout.set_range_end(dim, value)?;
        Ok(self.with_layout(layout))
    }

    pub fn set_range_stride(self, dim: usize, value: usize) -> ArrayResult<Self> {
        let layout = self.layout.set_range_stride(dim, value)?;
        Ok(self.with_layout(layout))
    }

    pub fn fix_dimension(self, dim: usize, value: usize) -> ArrayResult<Self> {
        let layout = self.layout.fix_dimension(dim, value)?;
        Ok(self.with_layout(layout))
    }

    fn check_same(&self, other: &Shape) -> ArrayResult<()> {
        if !self.size().same(other.dims()) {
            return Err(ArrayError::ShapeMismatch {
                left: self.size().dims().to_vec(),
                right: other.dims().to_vec(),
            });
        }
        Ok(())
    }

    /// Copies `src` element by element over the visible indices of this view.
    pub fn assign<S>(&mut self, src: &S) -> ArrayResult<()>
    where
        T: Clone,
        S: NdAccess<T> + ?Sized,
    {
        self.check_same(src.shape())?;
        let shape = self.size().clone();
        for idx in shape.iter() {
            *self.get_mut(&idx)? = src.value(&idx)?.clone();
        }
        Ok(())
    }

    /// Like [`View::assign`], converting each element with `as` semantics.
    pub fn assign_cast<U, S>(&mut self, src: &S) -> ArrayResult<()>
    where
        T: Copy + 'static,
        U: AsPrimitive<T>,
        S: NdAccess<U> + ?Sized,
    {
        self.check_same(src.shape())?;
        let shape = self.size().clone();
        for idx in shape.iter() {
            *self.get_mut(&idx)? = src.value(&idx)?.as_();
        }
        Ok(())
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        let shape = self.size().clone();
        for idx in shape.iter() {
            *self.at_mut(&idx) = value.clone();
        }
    }

    pub fn to_array(&self) -> Array<'static, T>
    where
        T: Clone,
    {
        self.as_const().to_array()
    }
}

impl<'a, T> NdAccess<T> for View<'a, T> {
    fn shape(&self) -> &Shape {
        self.size()
    }

    fn value(&self, index: &[usize]) -> ArrayResult<&T> {
        self.get(index)
    }
}

impl<'a, T> Index<&[usize]> for View<'a, T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        self.at(index)
    }
}

impl<'a, T> IndexMut<&[usize]> for View<'a, T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        self.at_mut(index)
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for View<'a, T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        self.at(&index)
    }
}

impl<'a, T, const N: usize> IndexMut<[usize; N]> for View<'a, T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        self.at_mut(&index)
    }
}

impl<'a, T> fmt::Debug for View<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("physical", self.physical)
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array() -> Array<'static, i64> {
        let shape = Shape::from_array([2, 3, 4, 5, 6, 7]);
        let v = (0..shape.total_size() as i64).collect();
        Array::from_vec(shape, v).unwrap()
    }

    #[test]
    fn test_identity_view() {
        let a = array();
        let v = a.view();
        assert!(v.is_identity());
        assert_eq!(v.size(), &[2, 3, 4, 5, 6, 7]);
        for (i, idx) in a.shape().iter().enumerate() {
            assert_eq!(v[&idx[..]], i as i64);
        }
    }

    #[test]
    fn test_const_view_persistent() {
        let a = array();
        let v = a.view();
        let w = v.set_range_begin(2, 3).unwrap();
        assert_eq!(v.size(), &[2, 3, 4, 5, 6, 7]);
        assert!(v.is_identity());
        assert_eq!(w.size(), &[2, 3, 1, 5, 6, 7]);
        assert_eq!(w[[0, 0, 0, 0, 0, 0]], a[[0, 0, 3, 0, 0, 0]]);
    }

    #[test]
    fn test_mixed() {
        let a = array();
        let v = a
            .view()
            .set_range_begin(2, 3)
            .unwrap()
            .set_range_end(3, 2)
            .unwrap()
            .set_range_stride(4, 2)
            .unwrap();
        assert_eq!(v.size(), &[2, 3, 1, 2, 3, 7]);
        for i1 in 0..2 {
            for i2 in 0..3 {
                for i4 in 0..2 {
                    for i5 in (0..6).step_by(2) {
                        for i6 in 0..7 {
                            assert_eq!(a[[i1, i2, 3, i4, i5, i6]], v[[i1, i2, 0, i4, i5 / 2, i6]]);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_view_mut_writes_through() {
        let mut a = array();
        {
            let mut v = a.view_mut().fix_dimension(0, 1).unwrap().fix_dimension(0, 2).unwrap();
            assert_eq!(v.size(), &[4, 5, 6, 7]);
            v.fill(-1);
        }
        for idx in a.shape().iter() {
            let x = a[&idx[..]];
            if idx[0] == 1 && idx[1] == 2 {
                assert_eq!(x, -1);
            } else {
                assert!(x >= 0);
            }
        }
    }

    #[test]
    fn test_view_mut_reborrow_keeps_parent() {
        let mut a = array();
        let mut v = a.view_mut();
        {
            let mut w = v.reborrow().set_range_stride(5, 3).unwrap();
            assert_eq!(w.size(), &[2, 3, 4, 5, 6, 3]);
            w[[0, 0, 0, 0, 0, 1]] = 1000;
        }
        assert!(v.is_identity());
        assert_eq!(v[[0, 0, 0, 0, 0, 3]], 1000);
    }

    #[test]
    fn test_assign_from_views() {
        let a = array();
        let mut b = Array::<f32>::new([2, 3, 4, 5, 6, 7]);
        b.view_mut().assign_cast(&a.view()).unwrap();
        for (i, x) in b.as_slice().iter().enumerate() {
            assert_eq!(*x, i as f32);
        }

        let mut c = Array::<i64>::new([3, 7]);
        let src = a.view().fix_dimension(0, 1).unwrap().fix_dimension(1, 2).unwrap()
            .fix_dimension(1, 3).unwrap().fix_dimension(1, 4).unwrap();
        assert_eq!(src.size(), &[3, 7]);
        c.assign(&src).unwrap();
        for i in 0..3 {
            for j in 0..7 {
                assert_eq!(c[[i, j]], a[[1, i, 2, 3, 4, j]]);
            }
        }
    }

    #[test]
    fn test_assign_shape_mismatch() {
        let a = array();
        let mut b = Array::<i64>::new([2, 3]);
        assert!(matches!(
            b.view_mut().assign(&a.view()),
            Err(ArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_to_array() {
        let a = array();
        let v = a.view().set_range_begin(5, 1).unwrap().set_range_stride(5, 2).unwrap();
        let m = v.to_array();
        assert_eq!(m.shape(), &[2, 3, 4, 5, 6, 3]);
        assert!(m.is_owned());
        assert_eq!(m[[0, 0, 0, 0, 0, 2]], 5);
    }

    #[test]
    fn test_fix_to_scalar_view() {
        let mut a = array();
        let last = a.total_size() as i64 - 1;

        let mut c = a.view();
        for value in 1..=6 {
            c = c.fix_dimension(0, value).unwrap();
        }
        assert_eq!(c.rank(), 0);
        assert_eq!(c.size().total_size(), 1);
        assert_eq!(c[[]], last);
        assert_eq!(c.iter().count(), 1);

        let mut v = a.view_mut();
        for value in 1..=6 {
            v = v.fix_dimension(0, value).unwrap();
        }
        assert_eq!(v[[]], last);
        v[[]] = -7;
        assert_eq!(*v.get(&[]).unwrap(), -7);
        assert_eq!(a[[1, 2, 3, 4, 5, 6]], -7);
    }

    #[test]
    fn test_empty_buffer() {
        let a = Array::<i32>::with_shape([2, 2]);
        let v = a.view();
        assert_eq!(v.get(&[0, 0]), Err(ArrayError::EmptyBuffer { op: "view" }));
    }
}
