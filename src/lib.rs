//! Shaped, row-major N-dimensional containers over flat buffers, with
//! zero-copy strided views and axis-split slicing.
//!
//! ```
//! use ndview::{shape, Array, Axis};
//!
//! let mut a = Array::<i32>::new(shape![2, 3, 4]);
//! a[[1, 2, 3]] = 7;
//! assert_eq!(a.as_slice()[23], 7);
//!
//! let v = a.view().fix_dimension(0, 1).unwrap();
//! assert_eq!(v[[2, 3]], 7);
//!
//! let s = a.slice(Axis(0)).unwrap();
//! assert_eq!(s.element(1)[[2, 3]], 7);
//! ```

mod array;
mod convert;
mod error;
mod layout;
mod shape;
mod slice;
mod view;

pub use array::{Array, Buffer, ConstArray, ConstBuffer, NdAccess};
pub use convert::{convert_slice, convert_vec};
pub use error::{ArrayError, ArrayResult};
pub use layout::ViewLayout;
pub use shape::{Axis, Shape, ShapeIter};
pub use slice::{ConstSlice, Slice};
pub use view::{ConstView, View};

#[cfg(feature = "half")]
pub use half::{bf16, f16};

/// Builds a [`Shape`] from its extents.
#[macro_export]
macro_rules! shape {
    ($($x:expr),* $(,)*) => {{
        $crate::Shape::from_vec(vec![$($x,)*])
    }};
}
