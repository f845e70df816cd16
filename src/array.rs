//! Row-major element containers.
//!
//! [`Array`] may write its elements; [`ConstArray`] never does. Both pair a
//! [`Shape`] with a buffer that is either owned, borrowed or absent, so the
//! ownership of the storage is part of the type instead of a flag.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_traits::{AsPrimitive, Zero};
use tracing::{debug, trace};

use crate::convert::{convert_slice, convert_vec};
use crate::error::{ArrayError, ArrayResult};
use crate::shape::{Axis, Shape};
use crate::slice::{ConstSlice, Slice};
use crate::view::{ConstView, View};

/// Read access shared by containers and views: a visible shape and a
/// checked element lookup against it.
pub trait NdAccess<T> {
    fn shape(&self) -> &Shape;

    fn value(&self, index: &[usize]) -> ArrayResult<&T>;
}

/// Storage of a mutable [`Array`].
pub enum Buffer<'a, T> {
    Empty,
    Owned(Vec<T>),
    Borrowed(&'a mut [T]),
}

impl<'a, T> Buffer<'a, T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Buffer::Empty => &[],
            Buffer::Owned(v) => v,
            Buffer::Borrowed(s) => s,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Buffer::Empty => &mut [],
            Buffer::Owned(v) => v,
            Buffer::Borrowed(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Buffer::Empty)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }
}

impl<'a, T> Default for Buffer<'a, T> {
    fn default() -> Self {
        Buffer::Empty
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Buffer<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buffer::Empty => f.write_str("Empty"),
            Buffer::Owned(v) => f.debug_tuple("Owned").field(v).finish(),
            Buffer::Borrowed(s) => f.debug_tuple("Borrowed").field(s).finish(),
        }
    }
}

/// Storage of a read-only [`ConstArray`].
///
/// Cloning deep-copies an owned buffer and aliases a borrowed one.
#[derive(Clone, Debug)]
pub enum ConstBuffer<'a, T> {
    Empty,
    Owned(Vec<T>),
    Borrowed(&'a [T]),
}

impl<'a, T> ConstBuffer<'a, T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            ConstBuffer::Empty => &[],
            ConstBuffer::Owned(v) => v,
            ConstBuffer::Borrowed(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConstBuffer::Empty)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, ConstBuffer::Owned(_))
    }
}

impl<'a, T> Default for ConstBuffer<'a, T> {
    fn default() -> Self {
        ConstBuffer::Empty
    }
}

impl<'a, T> From<Buffer<'a, T>> for ConstBuffer<'a, T> {
    fn from(b: Buffer<'a, T>) -> Self {
        match b {
            Buffer::Empty => ConstBuffer::Empty,
            Buffer::Owned(v) => ConstBuffer::Owned(v),
            Buffer::Borrowed(s) => ConstBuffer::Borrowed(s),
        }
    }
}

fn check_len(needed: usize, got: usize) -> ArrayResult<()> {
    if got < needed {
        return Err(ArrayError::BufferTooSmall { needed, got });
    }
    Ok(())
}

fn lookup<'s, T>(data: &'s [T], shape: &Shape, index: &[usize]) -> ArrayResult<&'s T> {
    if data.is_empty() && shape.total_size() > 0 {
        return Err(ArrayError::EmptyBuffer { op: "get" });
    }
    let pos = shape.position(index)?;
    Ok(&data[pos])
}

/// A mutable row-major container.
#[derive(Debug)]
pub struct Array<'a, T> {
    shape: Shape,
    buffer: Buffer<'a, T>,
}

impl<'a, T> Default for Array<'a, T> {
    fn default() -> Self {
        Array::empty()
    }
}

impl<'a, T> Array<'a, T> {
    /// A rank-0 container with no buffer.
    pub fn empty() -> Self {
        Array {
            shape: Shape::scalar(),
            buffer: Buffer::Empty,
        }
    }

    /// Adopts `v` as an owned buffer.
    pub fn from_vec(shape: impl Into<Shape>, v: Vec<T>) -> ArrayResult<Self> {
        let shape = shape.into();
        check_len(shape.total_size(), v.len())?;
        debug!(shape = ?shape.dims(), len = v.len(), "adopt buffer");
        Ok(Array {
            shape,
            buffer: Buffer::Owned(v),
        })
    }

    /// Borrows external storage; the container will never free or resize it.
    pub fn from_slice_mut(shape: impl Into<Shape>, s: &'a mut [T]) -> ArrayResult<Self> {
        let shape = shape.into();
        check_len(shape.total_size(), s.len())?;
        Ok(Self::borrowed(shape, s))
    }

    pub(crate) fn owned(shape: Shape, v: Vec<T>) -> Self {
        Array {
            shape,
            buffer: Buffer::Owned(v),
        }
    }

    pub(crate) fn borrowed(shape: Shape, s: &'a mut [T]) -> Self {
        Array {
            shape,
            buffer: Buffer::Borrowed(s),
        }
    }

    /// A container with `shape` and no buffer, waiting for [`Array::set_buffer`].
    pub fn with_shape(shape: impl Into<Shape>) -> Self {
        Array {
            shape: shape.into(),
            buffer: Buffer::Empty,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn total_size(&self) -> usize {
        self.shape.total_size()
    }

    pub fn buffer(&self) -> &Buffer<'a, T> {
        &self.buffer
    }

    pub fn is_owned(&self) -> bool {
        self.buffer.is_owned()
    }

    pub fn has_buffer(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Start of the buffer, for identity comparisons.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_slice().as_ptr()
    }

    /// The `total_size` elements in row-major order; empty without a buffer.
    pub fn as_slice(&self) -> &[T] {
        let s = self.buffer.as_slice();
        if s.is_empty() {
            s
        } else {
            &s[..self.shape.total_size()]
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let total = self.shape.total_size();
        let s = self.buffer.as_mut_slice();
        if s.is_empty() {
            s
        } else {
            &mut s[..total]
        }
    }

    /// Releases any owned buffer and attaches `buffer`. The shape is kept.
    pub fn set_buffer(&mut self, buffer: Buffer<'a, T>) -> ArrayResult<()> {
        if !buffer.is_empty() {
            check_len(self.shape.total_size(), buffer.len())?;
        }
        if self.buffer.is_owned() {
            debug!(len = self.buffer.len(), "release buffer");
        }
        trace!(owned = buffer.is_owned(), len = buffer.len(), "attach buffer");
        self.buffer = buffer;
        Ok(())
    }

    /// Moves the contents out, leaving this container empty.
    pub fn take(&mut self) -> Array<'a, T> {
        std::mem::take(self)
    }

    /// Aliases this container's buffer without taking ownership.
    pub fn reborrow(&mut self) -> Array<'_, T> {
        let shape = self.shape.clone();
        match &mut self.buffer {
            Buffer::Empty => Array::with_shape(shape),
            b => Array::borrowed(shape, b.as_mut_slice()),
        }
    }

    pub fn as_const(&self) -> ConstArray<'_, T> {
        let buffer = match &self.buffer {
            Buffer::Empty => ConstBuffer::Empty,
            b => ConstBuffer::Borrowed(b.as_slice()),
        };
        ConstArray {
            shape: self.shape.clone(),
            buffer,
        }
    }

    pub fn get(&self, index: &[usize]) -> ArrayResult<&T> {
        lookup(self.buffer.as_slice(), &self.shape, index)
    }

    pub fn get_mut(&mut self, index: &[usize]) -> ArrayResult<&mut T> {
        if self.buffer.is_empty() && self.shape.total_size() > 0 {
            return Err(ArrayError::EmptyBuffer { op: "get_mut" });
        }
        let pos = self.shape.position(index)?;
        Ok(&mut self.buffer.as_mut_slice()[pos])
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// If there is no buffer, the index rank differs from the shape rank, or
    /// a coordinate is out of range.
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

    /// An identity read-only view borrowing this container.
    pub fn view(&self) -> ConstView<'_, T> {
        ConstView::new(self.as_slice(), &self.shape)
    }

    /// An identity mutable view borrowing this container.
    pub fn view_mut(&mut self) -> View<'_, T> {
        let total = self.shape.total_size();
        let data = self.buffer.as_mut_slice();
        let data = if data.is_empty() {
            data
        } else {
            &mut data[..total]
        };
        trace!(shape = ?self.shape.dims(), "view");
        View::new(data, &self.shape)
    }

    /// Splits at `axis` into outer indices and contiguous inner containers.
    pub fn slice(&self, axis: Axis) -> ArrayResult<ConstSlice<'_, T>> {
        ConstSlice::split(self.as_slice(), self.has_buffer(), &self.shape, axis)
    }

    pub fn slice_mut(&mut self, axis: Axis) -> ArrayResult<Slice<'_, T>> {
        Slice::new(self, axis)
    }

    /// Copies every element of `src`, which must have the same shape.
    pub fn assign<S>(&mut self, src: &S) -> ArrayResult<()>
    where
        T: Clone,
        S: NdAccess<T> + ?Sized,
    {
        self.view_mut().assign(src)
    }

    /// Like [`Array::assign`], converting each element with `as` semantics.
    pub fn assign_cast<U, S>(&mut self, src: &S) -> ArrayResult<()>
    where
        T: Copy + 'static,
        U: AsPrimitive<T>,
        S: NdAccess<U> + ?Sized,
    {
        self.view_mut().assign_cast(src)
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.as_mut_slice().fill(value);
    }
}

impl<'a, T: Clone> Array<'a, T> {
    pub fn from_elem(shape: impl Into<Shape>, elem: T) -> Array<'static, T> {
        let shape = shape.into();
        let v = vec![elem; shape.total_size()];
        debug!(shape = ?shape.dims(), len = v.len(), "allocate buffer");
        Array {
            shape,
            buffer: Buffer::Owned(v),
        }
    }

    /// Copies the first `total_size` elements of `src` into a new allocation.
    pub fn copy_from_slice(shape: impl Into<Shape>, src: &[T]) -> ArrayResult<Array<'static, T>> {
        let shape = shape.into();
        let total = shape.total_size();
        check_len(total, src.len())?;
        Array::from_vec(shape, src[..total].to_vec())
    }

    /// Always deep-copies into a new owned allocation.
    pub fn to_owned_array(&self) -> Array<'static, T> {
        Array {
            shape: self.shape.clone(),
            buffer: match &self.buffer {
                Buffer::Empty => Buffer::Empty,
                _ => Buffer::Owned(self.as_slice().to_vec()),
            },
        }
    }

    /// Copy that follows the ownership of the source: an owned buffer is
    /// deep-copied, a borrowed one is aliased.
    pub fn duplicate(&mut self) -> Array<'_, T> {
        match self.buffer {
            Buffer::Owned(_) => Array::owned(self.shape.clone(), self.as_slice().to_vec()),
            _ => self.reborrow(),
        }
    }
}

impl<'a, T: Clone + Default> Array<'a, T> {
    /// Allocates a default-initialized buffer for `shape`.
    pub fn new(shape: impl Into<Shape>) -> Array<'static, T> {
        Array::from_elem(shape, T::default())
    }

    /// Changes the shape.
    ///
    /// With an unchanged total size only the shape is replaced, with or
    /// without a buffer. Otherwise a borrowed buffer fails with `NotResizable`,
    /// and an owned one is released and, if `allow_allocation`, replaced
    /// by a default-initialized allocation of the new size.
    pub fn resize(&mut self, shape: impl Into<Shape>, allow_allocation: bool) -> ArrayResult<()> {
        let shape = shape.into();
        if shape.total_size() == self.shape.total_size() {
            trace!(from = ?self.shape.dims(), to = ?shape.dims(), "reinterpret");
            self.shape = shape;
            return Ok(());
        }
        if let Buffer::Borrowed(_) = self.buffer {
            return Err(ArrayError::NotResizable {
                from: self.shape.dims().to_vec(),
                to: shape.dims().to_vec(),
            });
        }

        if self.buffer.is_owned() {
            debug!(len = self.buffer.len(), "release buffer");
        }
        self.buffer = if allow_allocation {
            debug!(shape = ?shape.dims(), len = shape.total_size(), "allocate buffer");
            Buffer::Owned(vec![T::default(); shape.total_size()])
        } else {
            Buffer::Empty
        };
        self.shape = shape;
        Ok(())
    }
}

impl<'a, T: Clone + Zero> Array<'a, T> {
    pub fn zeros(shape: impl Into<Shape>) -> Array<'static, T> {
        Array::from_elem(shape, T::zero())
    }
}

impl<'a, T: Copy + 'static> Array<'a, T> {
    /// Copies `src` into a new allocation, converting every element.
    pub fn convert_from_slice<U>(shape: impl Into<Shape>, src: &[U]) -> ArrayResult<Array<'static, T>>
    where
        U: AsPrimitive<T>,
    {
        let shape = shape.into();
        let total = shape.total_size();
        check_len(total, src.len())?;
        Array::from_vec(shape, convert_vec(&src[..total]))
    }

    /// A new owned container of element type `U` with the same shape.
    pub fn cast<U>(&self) -> Array<'static, U>
    where
        U: Copy + Default + 'static,
        T: AsPrimitive<U>,
    {
        let mut ret = Array::with_shape(self.shape.clone());
        if self.has_buffer() {
            let mut v = vec![U::default(); self.total_size()];
            convert_slice(&mut v, self.as_slice());
            ret.buffer = Buffer::Owned(v);
        }
        ret
    }
}

impl<'a, T> NdAccess<T> for Array<'a, T> {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn value(&self, index: &[usize]) -> ArrayResult<&T> {
        self.get(index)
    }
}

impl<'a, T> Index<&[usize]> for Array<'a, T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        self.at(index)
    }
}

impl<'a, T> IndexMut<&[usize]> for Array<'a, T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        self.at_mut(index)
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for Array<'a, T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        self.at(&index)
    }
}

impl<'a, T, const N: usize> IndexMut<[usize; N]> for Array<'a, T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        self.at_mut(&index)
    }
}

/// A read-only row-major container.
///
/// Cloning follows [`ConstBuffer`]: owned storage is deep-copied, borrowed
/// storage is shared.
#[derive(Clone, Debug)]
pub struct ConstArray<'a, T> {
    shape: Shape,
    buffer: ConstBuffer<'a, T>,
}

impl<'a, T> Default for ConstArray<'a, T> {
    fn default() -> Self {
        ConstArray::empty()
    }
}

impl<'a, T> ConstArray<'a, T> {
    pub fn empty() -> Self {
        ConstArray {
            shape: Shape::scalar(),
            buffer: ConstBuffer::Empty,
        }
    }

    pub fn with_shape(shape: impl Into<Shape>) -> Self {
        ConstArray {
            shape: shape.into(),
            buffer: ConstBuffer::Empty,
        }
    }

    pub fn from_vec(shape: impl Into<Shape>, v: Vec<T>) -> ArrayResult<Self> {
        let shape = shape.into();
        check_len(shape.total_size(), v.len())?;
        debug!(shape = ?shape.dims(), len = v.len(), "adopt buffer");
        Ok(ConstArray {
            shape,
            buffer: ConstBuffer::Owned(v),
        })
    }

    pub fn from_slice(shape: impl Into<Shape>, s: &'a [T]) -> ArrayResult<Self> {
        let shape = shape.into();
        check_len(shape.total_size(), s.len())?;
        Ok(Self::borrowed(shape, s))
    }

    pub(crate) fn borrowed(shape: Shape, s: &'a [T]) -> Self {
        ConstArray {
            shape,
            buffer: ConstBuffer::Borrowed(s),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn total_size(&self) -> usize {
        self.shape.total_size()
    }

    pub fn buffer(&self) -> &ConstBuffer<'a, T> {
        &self.buffer
    }

    pub fn is_owned(&self) -> bool {
        self.buffer.is_owned()
    }

    pub fn has_buffer(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_slice().as_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        let s = self.buffer.as_slice();
        if s.is_empty() {
            s
        } else {
            &s[..self.shape.total_size()]
        }
    }

    pub fn set_buffer(&mut self, buffer: ConstBuffer<'a, T>) -> ArrayResult<()> {
        if !buffer.is_empty() {
            check_len(self.shape.total_size(), buffer.len())?;
        }
        if self.buffer.is_owned() {
            debug!(len = self.buffer.len(), "release buffer");
        }
        self.buffer = buffer;
        Ok(())
    }

    /// Reinterprets the buffer under `shape`; the total size may not change.
    pub fn resize(&mut self, shape: impl Into<Shape>) -> ArrayResult<()> {
        let shape = shape.into();
        if shape.total_size() != self.shape.total_size() {
            return Err(ArrayError::NotResizable {
                from: self.shape.dims().to_vec(),
                to: shape.dims().to_vec(),
            });
        }
        trace!(from = ?self.shape.dims(), to = ?shape.dims(), "reinterpret");
        self.shape = shape;
        Ok(())
    }

    pub fn take(&mut self) -> ConstArray<'a, T> {
        std::mem::take(self)
    }

    pub fn get(&self, index: &[usize]) -> ArrayResult<&T> {
        lookup(self.buffer.as_slice(), &self.shape, index)
    }

    /// # Panics
    ///
    /// Under the same conditions as [`Array::at`].
    pub fn at(&self, index: &[usize]) -> &T {
        match self.get(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn view(&self) -> ConstView<'_, T> {
        ConstView::new(self.as_slice(), &self.shape)
    }

    pub fn slice(&self, axis: Axis) -> ArrayResult<ConstSlice<'_, T>> {
        ConstSlice::new(self, axis)
    }
}

impl<'a, T: Clone> ConstArray<'a, T> {
    /// Deep-copies into a mutable owner.
    pub fn to_array(&self) -> Array<'static, T> {
        Array {
            shape: self.shape.clone(),
            buffer: match &self.buffer {
                ConstBuffer::Empty => Buffer::Empty,
                _ => Buffer::Owned(self.as_slice().to_vec()),
            },
        }
    }
}

impl<'a, T> From<Array<'a, T>> for ConstArray<'a, T> {
    fn from(a: Array<'a, T>) -> Self {
        ConstArray {
            shape: a.shape,
            buffer: a.buffer.into(),
        }
    }
}

impl<'a, T> NdAccess<T> for ConstArray<'a, T> {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn value(&self, index: &[usize]) -> ArrayResult<&T> {
        self.get(index)
    }
}

impl<'a, T> Index<&[usize]> for ConstArray<'a, T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        self.at(index)
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for ConstArray<'a, T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        self.at(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<i32> {
        (0..120).collect()
    }

    fn check_values(v: &[i32]) {
        assert_eq!(v.len(), 120);
        for (i, x) in v.iter().enumerate() {
            assert_eq!(*x, i as i32);
        }
    }

    #[test]
    fn test_new_is_default_filled() {
        let a = Array::<f64>::new([2, 3]);
        assert!(a.is_owned());
        assert_eq!(a.as_slice(), &[0.0; 6]);
        let z = Array::<f32>::zeros([4]);
        assert_eq!(z.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_value_access() {
        let a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let mut index = 0;
        for idx in a.shape().iter() {
            assert_eq!(*a.at(&idx), index);
            index += 1;
        }
        assert_eq!(a[[1, 2, 3, 4]], 119);
        assert_eq!(a[&[0, 0, 0, 0][..]], 0);
    }

    #[test]
    fn test_write_access() {
        let mut a = Array::<i32>::new([2, 2]);
        a[[1, 0]] = 7;
        *a.at_mut(&[0, 1]) = 3;
        assert_eq!(a.as_slice(), &[0, 3, 7, 0]);
    }

    #[test]
    fn test_get_errors() {
        let a = Array::<i32>::new([2, 3]);
        assert_eq!(
            a.get(&[1]),
            Err(ArrayError::RankMismatch {
                expected: 2,
                got: 1
            })
        );
        assert!(matches!(
            a.get(&[1, 3]),
            Err(ArrayError::IndexOutOfRange { .. })
        ));
        let e = Array::<i32>::with_shape([2]);
        assert_eq!(e.get(&[0]), Err(ArrayError::EmptyBuffer { op: "get" }));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range_panics() {
        let a = Array::<i32>::new([2, 3]);
        a.at(&[2, 0]);
    }

    #[test]
    #[should_panic(expected = "rank mismatch")]
    fn test_at_rank_mismatch_panics() {
        let a = Array::<i32>::new([2, 3]);
        a.at(&[0, 0, 0]);
    }

    #[test]
    fn test_from_vec_too_small() {
        assert_eq!(
            Array::from_vec([2, 3], vec![1, 2]).unwrap_err(),
            ArrayError::BufferTooSmall { needed: 6, got: 2 }
        );
    }

    #[test]
    fn test_duplicate_owned() {
        let mut a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let ptr = a.as_ptr();
        let b = a.duplicate();
        assert!(b.is_owned());
        assert_ne!(b.as_ptr(), ptr);
        check_values(b.as_slice());
        check_values(a.as_slice());
    }

    #[test]
    fn test_duplicate_borrowed() {
        let mut storage = values();
        let ptr = storage.as_ptr();
        let mut a = Array::from_slice_mut([2, 3, 4, 5], &mut storage).unwrap();
        assert!(!a.is_owned());
        let mut b = a.duplicate();
        assert!(!b.is_owned());
        assert_eq!(b.as_ptr(), ptr);
        b[[0, 0, 0, 0]] = -1;
        assert_eq!(a[[0, 0, 0, 0]], -1);
    }

    #[test]
    fn test_take() {
        let mut a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let ptr = a.as_ptr();
        let b = a.take();
        assert_eq!(b.as_ptr(), ptr);
        assert!(b.is_owned());
        check_values(b.as_slice());
        assert!(!a.has_buffer());
        assert_eq!(a.rank(), 0);
    }

    #[test]
    fn test_resize_reinterpret() {
        let mut a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let ptr = a.as_ptr();
        a.resize([5, 4, 3, 2], true).unwrap();
        assert_eq!(a.as_ptr(), ptr);
        assert_eq!(a.shape(), &[5, 4, 3, 2]);
        check_values(a.as_slice());
        a.resize([2, 3, 4, 5], true).unwrap();
        check_values(a.as_slice());
    }

    #[test]
    fn test_resize_reallocate() {
        let mut a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        a.resize([4, 3, 2], true).unwrap();
        assert_eq!(a.total_size(), 24);
        assert_eq!(a.as_slice(), &[0; 24]);

        a.resize([3], false).unwrap();
        assert!(!a.has_buffer());
        assert_eq!(a.shape(), &[3]);
        a.set_buffer(Buffer::Owned(vec![1, 2, 3])).unwrap();
        assert_eq!(a[[2]], 3);
    }

    #[test]
    fn test_resize_empty_allocates() {
        let mut a = Array::<i32>::empty();
        a.resize([3], true).unwrap();
        assert!(a.is_owned());
        assert_eq!(a.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_resize_shape_only_same_size() {
        let mut a = Array::<i32>::with_shape([2, 3]);
        a.resize([3, 2], true).unwrap();
        assert!(!a.has_buffer());
        assert_eq!(a.shape(), &[3, 2]);
        a.resize([7], true).unwrap();
        assert!(a.is_owned());
        assert_eq!(a.total_size(), 7);
    }

    #[test]
    fn test_resize_borrowed() {
        let mut storage = values();
        let mut a = Array::from_slice_mut([2, 3, 4, 5], &mut storage).unwrap();
        a.resize([6, 20], true).unwrap();
        let err = a.resize([4, 3, 2], true).unwrap_err();
        assert!(matches!(err, ArrayError::NotResizable { .. }));
        assert_eq!(a.shape(), &[6, 20]);
        check_values(a.as_slice());
    }

    #[test]
    fn test_set_buffer() {
        let mut storage = values();
        let mut a = Array::<i32>::new([2, 3, 4, 5]);
        a.set_buffer(Buffer::Borrowed(&mut storage)).unwrap();
        assert!(!a.is_owned());
        check_values(a.as_slice());
        assert!(a.set_buffer(Buffer::Owned(vec![0; 3])).is_err());
    }

    #[test]
    fn test_assign() {
        let a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let mut b = Array::<i32>::new([1]);
        b.resize(a.shape().clone(), true).unwrap();
        b.assign(&a).unwrap();
        check_values(b.as_slice());
        assert_ne!(a.as_ptr(), b.as_ptr());

        let mut c = Array::<i32>::new([3]);
        assert!(matches!(
            c.assign(&a),
            Err(ArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_cast() {
        let a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let f = a.cast::<f32>();
        assert_eq!(f.shape(), a.shape());
        for (x, y) in f.as_slice().iter().zip(a.as_slice()) {
            assert_eq!(*x, *y as f32);
        }

        let mut g = Array::<f64>::new([2, 3, 4, 5]);
        g.assign_cast(&a).unwrap();
        assert_eq!(g[[1, 2, 3, 4]], 119.0);

        let t = Array::<i32>::convert_from_slice([3], &[1.9f32, -0.5, 2.0]).unwrap();
        assert_eq!(t.as_slice(), &[1, 0, 2]);
    }

    #[test]
    fn test_const_array_aliases() {
        let a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let c = a.as_const();
        assert!(!c.is_owned());
        assert_eq!(c.as_ptr(), a.as_ptr());
        let d = c.clone();
        assert_eq!(d.as_ptr(), a.as_ptr());
        assert_eq!(d[[1, 2, 3, 4]], 119);
    }

    #[test]
    fn test_const_array_owned_clone() {
        let c = ConstArray::from_vec([2, 3, 4, 5], values()).unwrap();
        let d = c.clone();
        assert!(d.is_owned());
        assert_ne!(d.as_ptr(), c.as_ptr());
        check_values(d.as_slice());
    }

    #[test]
    fn test_const_array_from_array() {
        let a = Array::from_vec([2, 3, 4, 5], values()).unwrap();
        let ptr = a.as_ptr();
        let c: ConstArray<'_, i32> = a.into();
        assert!(c.is_owned());
        assert_eq!(c.as_ptr(), ptr);

        let b = c.to_array();
        assert_ne!(b.as_ptr(), ptr);
        check_values(b.as_slice());
    }

    #[test]
    fn test_const_array_resize() {
        let storage = values();
        let mut c = ConstArray::from_slice([2, 3, 4, 5], &storage).unwrap();
        c.resize([10, 12]).unwrap();
        assert_eq!(c[[9, 11]], 119);
        assert!(matches!(
            c.resize([3]),
            Err(ArrayError::NotResizable { .. })
        ));
    }

    #[test]
    fn test_const_array_set_buffer() {
        let storage = values();
        let mut c = ConstArray::<i32>::with_shape([2, 3, 4, 5]);
        assert!(!c.has_buffer());
        c.set_buffer(ConstBuffer::Borrowed(&storage)).unwrap();
        assert_eq!(c[[0, 1, 0, 2]], 22);
    }
}
