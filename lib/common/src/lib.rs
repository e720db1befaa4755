use num_traits::{AsPrimitive, NumCast, PrimInt, Unsigned};

pub mod macros;

/// Trait for types which can act as indices within an array (or an array-like structure), such
/// as the index buffer of a welded vertex attribute.
pub trait ArrayIndex:
    PrimInt + Unsigned + AsPrimitive<usize> + Send + Sync + std::fmt::Debug + 'static
{
    /// Convert an array position into this index type, if it is representable.
    #[inline]
    fn from_position(pos: usize) -> Option<Self> {
        <Self as NumCast>::from(pos)
    }

    /// The array position this index refers to.
    #[inline]
    fn position(self) -> usize {
        AsPrimitive::<usize>::as_(self)
    }
}
impl<P> ArrayIndex for P where
    P: PrimInt + Unsigned + AsPrimitive<usize> + Send + Sync + std::fmt::Debug + 'static
{
}

#[cfg(test)]
mod tests {
    use super::ArrayIndex;

    #[test]
    fn narrow_index_rejects_large_positions() {
        assert_eq!(u8::from_position(255), Some(255u8));
        assert_eq!(u8::from_position(256), None);
        assert_eq!(u16::from_position(70_000), None);
        assert_eq!(u32::from_position(70_000), Some(70_000u32));
    }

    #[test]
    fn position_round_trips() {
        assert_eq!(7u8.position(), 7);
        assert_eq!(u64::from_position(12).map(ArrayIndex::position), Some(12));
    }
}
