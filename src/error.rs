use std::fmt;

use crate::{
    channel::ChannelKind,
    source::{MappingMode, ReferenceMode},
};

/// The array of a [MeshSource](crate::source::MeshSource) in which a lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceArray {
    /// [MeshSource::polygon_vertex](crate::source::MeshSource::polygon_vertex)
    PolygonVertices,
    /// [MeshSource::control_point](crate::source::MeshSource::control_point)
    ControlPoints,
    /// A layer's direct array
    Values,
    /// A layer's index array
    Indices,
}

impl fmt::Display for SourceArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceArray::PolygonVertices => "polygon vertex",
            SourceArray::ControlPoints => "control point",
            SourceArray::Values => "direct",
            SourceArray::Indices => "index",
        })
    }
}

/// A raw mode code outside the range its format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{value} is not a valid {kind} code")]
pub struct InvalidModeCode {
    /// "mapping mode" or "reference mode"
    pub kind: &'static str,
    /// The rejected code.
    pub value: u8,
}

/// Errors related to extracting, welding, and looking up mesh attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A polygon of the named mesh is not a triangle.
    #[error("Mesh {0} contains N-gons. Only triangle meshes are supported.")]
    UnsupportedTopology(String),
    /// A layer uses a mapping mode which cannot be resolved per corner.
    #[error("Invalid mapping mode for {channel}: {mode}")]
    InvalidMappingMode {
        channel: ChannelKind,
        mode: MappingMode,
    },
    /// A layer uses a reference mode which cannot be resolved per corner.
    #[error("Invalid reference mode for {channel}: {mode}")]
    InvalidReferenceMode {
        channel: ChannelKind,
        mode: ReferenceMode,
    },
    /// The collection holds no meshes.
    #[error("Failed to find mesh data.")]
    NoMeshesFound,
    /// No mesh has the given name.
    #[error("Failed to find a mesh with the name {0}")]
    MeshNotFound(String),
    /// A vertex past the end of a channel was requested.
    #[error("Attempted to access {channel} vertex {index}, but the channel has {len} vertices.")]
    OutOfRange {
        channel: ChannelKind,
        index: usize,
        len: usize,
    },
    /// The source could not answer a lookup made during extraction.
    #[error("Mesh source has no {array} entry at {index} while resolving {channel}")]
    MalformedSource {
        channel: ChannelKind,
        array: SourceArray,
        index: usize,
    },
    /// A channel has more unique values than the index type can address.
    #[error("{channel} has at least {unique} unique values, which exceeds the index type")]
    IndexOverflow { channel: ChannelKind, unique: usize },
}
