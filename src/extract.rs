//! Resolution of per-corner attribute values from a [MeshSource].
//!
//! Every extraction walks the corners of a triangulated mesh in `(triangle, slot)` order and
//! produces exactly one value per corner, or nothing at all when the source lacks the channel.

use crate::{
    channel::{Channel, ChannelKind, Vec4},
    error::{Error, SourceArray},
    source::{ChannelDescriptor, Corner, MappingMode, MeshSource, ReferenceMode},
};

/// Resolve one channel of `source` into its expanded, per-corner form.
///
/// # Errors
///
/// * [Error::UnsupportedTopology] if any polygon of `source` is not a triangle, before anything
///   is extracted
/// * [Error::InvalidMappingMode] / [Error::InvalidReferenceMode] if the channel's layer uses a
///   mode which cannot be resolved per corner
/// * [Error::MalformedSource] if the source cannot answer a lookup
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(source), fields(mesh = source.name(), channel = %C::KIND))
)]
pub fn extract<C: Channel, S: MeshSource + ?Sized>(source: &S) -> Result<Vec<C::Value>, Error> {
    ensure_triangulated(source)?;
    C::extract(source)
}

/// Fail with [Error::UnsupportedTopology] unless every polygon of `source` is a triangle.
pub fn ensure_triangulated<S: MeshSource + ?Sized>(source: &S) -> Result<(), Error> {
    if source.is_fully_triangulated() {
        Ok(())
    } else {
        Err(Error::UnsupportedTopology(source.name().to_owned()))
    }
}

fn control_point_of<S: MeshSource + ?Sized>(
    source: &S,
    channel: ChannelKind,
    corner: Corner,
) -> Result<usize, Error> {
    source
        .polygon_vertex(corner.triangle, corner.slot)
        .ok_or(Error::MalformedSource {
            channel,
            array: SourceArray::PolygonVertices,
            index: corner.index(),
        })
}

pub(crate) fn extract_positions<S: MeshSource + ?Sized>(source: &S) -> Result<Vec<Vec4>, Error> {
    Corner::all(source.polygon_count())
        .map(|corner| {
            let point = control_point_of(source, ChannelKind::Positions, corner)?;
            source.control_point(point).ok_or(Error::MalformedSource {
                channel: ChannelKind::Positions,
                array: SourceArray::ControlPoints,
                index: point,
            })
        })
        .collect()
}

pub(crate) fn extract_layer<T: Clone, S: MeshSource + ?Sized>(
    source: &S,
    channel: ChannelKind,
    layer: Option<ChannelDescriptor<'_, T>>,
) -> Result<Vec<T>, Error> {
    let Some(layer) = layer else {
        #[cfg(feature = "tracing")]
        tracing::trace!(mesh = source.name(), %channel, "channel absent");
        return Ok(Vec::new());
    };
    // no corners, so no mode is ever consulted
    if source.polygon_count() == 0 {
        return Ok(Vec::new());
    }

    let per_control_point = match layer.mapping {
        MappingMode::PerControlPoint => true,
        MappingMode::PerPolygonVertex => false,
        mode => return Err(Error::InvalidMappingMode { channel, mode }),
    };
    let indirect = match layer.reference {
        ReferenceMode::Direct => false,
        ReferenceMode::IndexToDirect => true,
        mode => return Err(Error::InvalidReferenceMode { channel, mode }),
    };

    Corner::all(source.polygon_count())
        .map(|corner| {
            let lookup = if per_control_point {
                control_point_of(source, channel, corner)?
            } else {
                corner.index()
            };
            let value = if indirect {
                layer
                    .indices
                    .get(lookup)
                    .map(|&i| i as usize)
                    .ok_or(Error::MalformedSource {
                        channel,
                        array: SourceArray::Indices,
                        index: lookup,
                    })?
            } else {
                lookup
            };
            layer.values.get(value).cloned().ok_or(Error::MalformedSource {
                channel,
                array: SourceArray::Values,
                index: value,
            })
        })
        .collect()
}
