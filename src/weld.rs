//! Vertex welding: collapsing an expanded per-corner array into a pool of unique values and an
//! index buffer into that pool.

use std::collections::HashMap;

use weld_common::ArrayIndex;

use crate::{
    channel::{ChannelKind, Weldable},
    error::Error,
};

/// The method by which duplicates are found while welding.
///
/// Both strategies produce identical output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dedup {
    /// Look values up by their [weld key](Weldable::weld_key). O(n) amortized.
    #[default]
    Hashed,
    /// Compare each value against every unique value found so far. O(n·u).
    Linear,
}

/// Settings for [Mesh::optimize_with](crate::Mesh::optimize_with).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptimizeOptions {
    /// How duplicates are found.
    pub dedup: Dedup,
    /// Weld each channel on its own thread.
    pub parallel: bool,
}

/// A welded vertex attribute.
///
/// # Invariants
///
/// * `indices.len()` is the number of corners the channel was welded from
/// * `pool[indices[i]]` is the `i`th value of the expanded channel
/// * `pool` contains no two equal values, and keeps them in order of first occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedChannel<T, Idx: ArrayIndex = u32> {
    pool: Vec<T>,
    indices: Vec<Idx>,
}

impl<T, Idx: ArrayIndex> Default for OptimizedChannel<T, Idx> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, Idx: ArrayIndex> OptimizedChannel<T, Idx> {
    /// A channel with no values, as produced for channels absent from a mesh.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            pool: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// The unique values of this channel.
    #[inline]
    pub fn pool(&self) -> &[T] {
        &self.pool
    }

    /// One index into [pool](Self::pool) per corner.
    #[inline]
    pub fn indices(&self) -> &[Idx] {
        &self.indices
    }

    /// The number of corners (not unique values) in this channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the channel has no corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The value of the corner at `vertex`.
    #[inline]
    pub fn get(&self, vertex: usize) -> Option<&T> {
        self.pool.get(self.indices.get(vertex)?.position())
    }

    /// Iterate over the value of each corner, in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.indices.iter().map(|i| &self.pool[i.position()])
    }

    /// The pool and the index buffer.
    #[inline]
    pub fn into_parts(self) -> (Vec<T>, Vec<Idx>) {
        (self.pool, self.indices)
    }
}

impl<T: Clone, Idx: ArrayIndex> OptimizedChannel<T, Idx> {
    /// Reconstruct the expanded channel.
    pub fn expand(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

fn index_of<Idx: ArrayIndex>(channel: ChannelKind, pos: usize) -> Result<Idx, Error> {
    Idx::from_position(pos).ok_or(Error::IndexOverflow {
        channel,
        unique: pos + 1,
    })
}

/// Weld `expanded` into a pool of unique values and an index buffer.
///
/// Values are compared with exact equality; no tolerance is applied.
///
/// # Errors
///
/// * [Error::IndexOverflow] if the pool cannot be addressed by `Idx`
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(expanded), fields(corners = expanded.len()))
)]
pub fn optimize<T: Weldable, Idx: ArrayIndex>(
    channel: ChannelKind,
    expanded: &[T],
    dedup: Dedup,
) -> Result<OptimizedChannel<T, Idx>, Error> {
    if expanded.is_empty() {
        return Ok(OptimizedChannel::empty());
    }

    let mut pool: Vec<T> = Vec::new();
    let mut indices = Vec::with_capacity(expanded.len());

    match dedup {
        Dedup::Linear => {
            for value in expanded {
                let pos = match pool.iter().position(|p| p == value) {
                    Some(pos) => pos,
                    None => {
                        pool.push(value.clone());
                        pool.len() - 1
                    }
                };
                indices.push(index_of(channel, pos)?);
            }
        }
        Dedup::Hashed => {
            let mut seen: HashMap<T::Key, usize> = HashMap::new();
            for value in expanded {
                let pos = match value.weld_key() {
                    Some(key) => *seen.entry(key).or_insert_with(|| {
                        pool.push(value.clone());
                        pool.len() - 1
                    }),
                    // unequal to everything, including itself
                    None => {
                        pool.push(value.clone());
                        pool.len() - 1
                    }
                };
                indices.push(index_of(channel, pos)?);
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(unique = pool.len(), "welded {channel}");
    Ok(OptimizedChannel { pool, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Vec2, Vec4};

    fn expanded() -> Vec<Vec4> {
        let [a, b, c, d] = [0.0, 1.0, 2.0, 3.0].map(|x| Vec4::new(x, x * 2.0, 0.0, 1.0));
        vec![a, b, c, a, c, d]
    }

    #[test]
    fn shared_edge() {
        for dedup in [Dedup::Hashed, Dedup::Linear] {
            let welded: OptimizedChannel<_> =
                optimize(ChannelKind::Positions, &expanded(), dedup).unwrap();
            let e = expanded();
            assert_eq!(welded.pool(), &[e[0], e[1], e[2], e[5]]);
            assert_eq!(welded.indices(), &[0, 1, 2, 0, 2, 3]);
            assert_eq!(welded.expand(), expanded());
        }
    }

    #[test]
    fn empty_is_noop() {
        let welded: OptimizedChannel<Vec2> =
            optimize(ChannelKind::TexCoords, &[], Dedup::Hashed).unwrap();
        assert!(welded.is_empty());
        assert!(welded.pool().is_empty());
    }

    #[test]
    fn nan_never_welds() {
        let nan = Vec2::new(f64::NAN, 0.0);
        let values = [nan, nan, Vec2::zeros(), Vec2::zeros()];
        for dedup in [Dedup::Hashed, Dedup::Linear] {
            let welded: OptimizedChannel<_> =
                optimize(ChannelKind::TexCoords, &values, dedup).unwrap();
            assert_eq!(welded.indices(), &[0, 1, 2, 2]);
        }
    }

    #[test]
    fn negative_zero_welds() {
        let values = [Vec2::new(-0.0, 1.0), Vec2::new(0.0, 1.0)];
        let welded: OptimizedChannel<_> =
            optimize(ChannelKind::TexCoords, &values, Dedup::Hashed).unwrap();
        assert_eq!(welded.indices(), &[0, 0]);
        assert_eq!(welded.pool().len(), 1);
    }

    #[test]
    fn narrow_index_overflows() {
        let values: Vec<f32> = (0..300).map(|i| i as f32).collect();
        let res: Result<OptimizedChannel<f32, u8>, _> =
            optimize(ChannelKind::Positions, &values, Dedup::Hashed);
        assert_eq!(
            res,
            Err(Error::IndexOverflow {
                channel: ChannelKind::Positions,
                unique: 257
            })
        );

        let ok: OptimizedChannel<f32, u8> =
            optimize(ChannelKind::Positions, &values[..256], Dedup::Linear).unwrap();
        assert_eq!(ok.indices()[255], 255);
    }

    #[test]
    fn get_out_of_range() {
        let welded: OptimizedChannel<_> =
            optimize(ChannelKind::Positions, &expanded(), Dedup::Hashed).unwrap();
        assert_eq!(welded.get(5), Some(&expanded()[5]));
        assert_eq!(welded.get(6), None);
    }
}
