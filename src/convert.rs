use num_traits::AsPrimitive;

use crate::shape::zip;

/// Converts `src` element by element into `dst`, stopping at the shorter
/// of the two. Returns the number of converted elements.
///
/// Conversion follows `as` semantics: widening is exact, float to integer
/// truncates toward zero and saturates.
pub fn convert_slice<T, U>(dst: &mut [T], src: &[U]) -> usize
where
    T: Copy + 'static,
    U: AsPrimitive<T>,
{
    let l = dst.len().min(src.len());
    for (d, s) in zip(&mut dst[..l], &src[..l]) {
        *d = s.as_();
    }
    l
}

pub fn convert_vec<T, U>(src: &[U]) -> Vec<T>
where
    T: Copy + 'static,
    U: AsPrimitive<T>,
{
    src.iter().map(|s| s.as_()).collect()
}
