//! The six vertex attribute channels of a [Mesh](crate::Mesh), and the values they carry.

use std::{fmt, hash::Hash};

use nalgebra::{Point, Point4, SVector, Scalar, Vector2, Vector4};
use weld_common::{item_with, ArrayIndex};

use crate::{
    error::Error,
    extract,
    mesh::{ExpandedSet, OptimizedSet},
    source::MeshSource,
    weld::OptimizedChannel,
};

/// Positions, normals, tangents, and binormals.
pub type Vec4 = Vector4<f64>;
/// Texture coordinates.
pub type Vec2 = Vector2<f64>;
/// Vertex colors.
pub type Rgba = Point4<f64>;

/// Runtime identifier of a [Channel].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    /// [Positions]
    Positions,
    /// [TexCoords]
    TexCoords,
    /// [Normals]
    Normals,
    /// [Tangents]
    Tangents,
    /// [Binormals]
    Binormals,
    /// [Colors]
    Colors,
}

impl ChannelKind {
    /// Every channel, in extraction order.
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Positions,
        ChannelKind::TexCoords,
        ChannelKind::Normals,
        ChannelKind::Tangents,
        ChannelKind::Binormals,
        ChannelKind::Colors,
    ];

    /// Lowercase name, as used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ChannelKind::Positions => "positions",
            ChannelKind::TexCoords => "texcoords",
            ChannelKind::Normals => "normals",
            ChannelKind::Tangents => "tangents",
            ChannelKind::Binormals => "binormals",
            ChannelKind::Colors => "colors",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar components which can be compared through a hashable key.
pub trait WeldComponent: Scalar + Copy {
    /// A bit pattern such that `a == b` iff `a.canonical_bits() == b.canonical_bits()`.
    ///
    /// `None` for values which compare unequal to everything, including themselves (NaN).
    fn canonical_bits(self) -> Option<u64>;
}

item_with! {F: f32, f64 => impl WeldComponent for F {
    #[inline]
    fn canonical_bits(self) -> Option<u64> {
        // widening is exact, so equal f32s stay equal and unequal f32s stay unequal
        let wide = f64::from(self);
        if wide.is_nan() {
            None
        } else if wide == 0.0 {
            // -0.0 == 0.0
            Some(0)
        } else {
            Some(wide.to_bits())
        }
    }
}}

/// Values which can be welded.
///
/// `weld_key` must agree with [PartialEq]: two values have equal keys iff they compare equal. A
/// value which is not equal to itself has no key.
pub trait Weldable: Clone + PartialEq {
    /// Hashable stand-in for the value.
    type Key: Hash + Eq;

    /// The key of this value, if it equals anything at all.
    fn weld_key(&self) -> Option<Self::Key>;
}

item_with! {F: f32, f64 => impl Weldable for F {
    type Key = u64;
    #[inline]
    fn weld_key(&self) -> Option<u64> {
        self.canonical_bits()
    }
}}

impl<C: WeldComponent, const D: usize> Weldable for SVector<C, D> {
    type Key = [u64; D];

    fn weld_key(&self) -> Option<Self::Key> {
        let mut key = [0; D];
        for (k, c) in key.iter_mut().zip(self.iter()) {
            *k = c.canonical_bits()?;
        }
        Some(key)
    }
}

impl<C: WeldComponent, const D: usize> Weldable for Point<C, D> {
    type Key = [u64; D];

    #[inline]
    fn weld_key(&self) -> Option<Self::Key> {
        self.coords.weld_key()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A vertex attribute channel of a [Mesh](crate::Mesh).
///
/// Implemented by the marker types [Positions], [TexCoords], [Normals], [Tangents], [Binormals],
/// and [Colors]; used to select a channel at compile time, ex. `mesh.attribute::<Normals>(0)`.
pub trait Channel: sealed::Sealed + 'static {
    /// The type of one vertex's value in this channel.
    type Value: Weldable + fmt::Debug + Send + Sync + 'static;
    /// Runtime identifier of this channel.
    const KIND: ChannelKind;

    /// Resolve the per-corner values of this channel.
    ///
    /// Does not check the topology of `source`; see [extract::extract] for that.
    fn extract<S: MeshSource + ?Sized>(source: &S) -> Result<Vec<Self::Value>, Error>;

    #[doc(hidden)]
    fn expanded(set: &ExpandedSet) -> &[Self::Value];

    #[doc(hidden)]
    fn optimized<Idx: ArrayIndex>(set: &OptimizedSet<Idx>) -> &OptimizedChannel<Self::Value, Idx>;
}

macro_rules! channel {
    ($(#[$meta:meta])* $Name:ident: $Value:ty => $field:ident; |$src:ident| $extract:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $Name;

        impl sealed::Sealed for $Name {}

        impl Channel for $Name {
            type Value = $Value;
            const KIND: ChannelKind = ChannelKind::$Name;

            #[inline]
            fn extract<S: MeshSource + ?Sized>($src: &S) -> Result<Vec<$Value>, Error> {
                $extract
            }

            #[inline]
            fn expanded(set: &ExpandedSet) -> &[$Value] {
                &set.$field
            }

            #[inline]
            fn optimized<Idx: ArrayIndex>(
                set: &OptimizedSet<Idx>,
            ) -> &OptimizedChannel<$Value, Idx> {
                &set.$field
            }
        }
    };
}

channel!(
    /// Control point positions. Always resolved per control point, directly.
    Positions: Vec4 => positions; |src| extract::extract_positions(src)
);
channel!(
    /// Texture coordinates.
    TexCoords: Vec2 => tex_coords; |src| extract::extract_layer(src, ChannelKind::TexCoords, src.tex_coords())
);
channel!(
    /// Vertex normals.
    Normals: Vec4 => normals; |src| extract::extract_layer(src, ChannelKind::Normals, src.normals())
);
channel!(
    /// Vertex tangents; `w` holds handedness where the source provides it.
    Tangents: Vec4 => tangents; |src| extract::extract_layer(src, ChannelKind::Tangents, src.tangents())
);
channel!(
    /// Vertex binormals.
    Binormals: Vec4 => binormals; |src| extract::extract_layer(src, ChannelKind::Binormals, src.binormals())
);
channel!(
    /// Vertex colors.
    Colors: Rgba => colors; |src| extract::extract_layer(src, ChannelKind::Colors, src.colors())
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_shares_a_key() {
        assert_eq!((-0.0f64).weld_key(), 0.0f64.weld_key());
        assert_eq!(
            Vec4::new(-0.0, 1.0, 0.0, 1.0).weld_key(),
            Vec4::new(0.0, 1.0, -0.0, 1.0).weld_key()
        );
    }

    #[test]
    fn nan_has_no_key() {
        assert_eq!(f32::NAN.weld_key(), None);
        assert_eq!(Vec2::new(0.5, f64::NAN).weld_key(), None);
        assert_eq!(Rgba::new(f64::NAN, 0.0, 0.0, 1.0).weld_key(), None);
    }

    #[test]
    fn distinct_values_have_distinct_keys() {
        assert_ne!(
            Vec2::new(0.1, 0.2).weld_key(),
            Vec2::new(0.2, 0.1).weld_key()
        );
        assert_ne!(1.0f32.weld_key(), 1.000_000_1f32.weld_key());
    }

    #[test]
    fn channel_order() {
        assert_eq!(ChannelKind::ALL[0], Positions::KIND);
        assert_eq!(ChannelKind::ALL[5], Colors::KIND);
        assert_eq!(TexCoords::KIND.to_string(), "texcoords");
    }
}
