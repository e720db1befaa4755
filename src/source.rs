//! The capability through which mesh data enters the welder.
//!
//! A [MeshSource] exposes a polygon mesh the way interchange formats such as FBX store it: a set
//! of shared *control points* referenced by the corners of each polygon, plus any number of
//! attribute layers, each of which declares how its values are addressed (see [MappingMode] and
//! [ReferenceMode]).

use std::{borrow::Cow, fmt};

use crate::{
    channel::{Rgba, Vec2, Vec4},
    error::InvalidModeCode,
};

/// How the values of an attribute layer are associated with the corners of a mesh.
///
/// Only [PerControlPoint](MappingMode::PerControlPoint) and
/// [PerPolygonVertex](MappingMode::PerPolygonVertex) can be extracted; the remaining modes exist
/// so that sources can report what they actually found.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingMode {
    /// The layer declares no mapping.
    Unmapped = 0,
    /// One value per control point; corners sharing a control point share a value.
    PerControlPoint = 1,
    /// One value per corner, addressed by the corner's sequential index.
    PerPolygonVertex = 2,
    /// One value per polygon.
    PerPolygon = 3,
    /// One value per edge.
    PerEdge = 4,
    /// One value for the whole mesh.
    AllSame = 5,
}

impl MappingMode {
    /// Decode a raw mapping mode code, ex. as stored in an FBX layer element.
    pub fn from_raw(val: u8) -> Result<Self, InvalidModeCode> {
        match val {
            0 => Ok(Self::Unmapped),
            1 => Ok(Self::PerControlPoint),
            2 => Ok(Self::PerPolygonVertex),
            3 => Ok(Self::PerPolygon),
            4 => Ok(Self::PerEdge),
            5 => Ok(Self::AllSame),
            _ => Err(InvalidModeCode {
                kind: "mapping mode",
                value: val,
            }),
        }
    }

    /// The raw code of this mode.
    #[inline]
    pub fn to_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MappingMode {
    type Error = InvalidModeCode;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unmapped => "unmapped",
            Self::PerControlPoint => "per control point",
            Self::PerPolygonVertex => "per polygon vertex",
            Self::PerPolygon => "per polygon",
            Self::PerEdge => "per edge",
            Self::AllSame => "all same",
        })
    }
}

/// Whether the index derived from a [MappingMode] addresses a layer's values directly, or goes
/// through the layer's index array first.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceMode {
    /// The mapped index addresses the values.
    Direct = 0,
    /// Not extractable.
    Index = 1,
    /// The mapped index addresses the index array, which addresses the values.
    IndexToDirect = 2,
}

impl ReferenceMode {
    /// Decode a raw reference mode code, ex. as stored in an FBX layer element.
    pub fn from_raw(val: u8) -> Result<Self, InvalidModeCode> {
        match val {
            0 => Ok(Self::Direct),
            1 => Ok(Self::Index),
            2 => Ok(Self::IndexToDirect),
            _ => Err(InvalidModeCode {
                kind: "reference mode",
                value: val,
            }),
        }
    }

    /// The raw code of this mode.
    #[inline]
    pub fn to_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ReferenceMode {
    type Error = InvalidModeCode;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Index => "index",
            Self::IndexToDirect => "index to direct",
        })
    }
}

/// One attribute layer of a [MeshSource].
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor<'src, T: Clone> {
    /// How values map onto corners.
    pub mapping: MappingMode,
    /// Whether values are reached through `indices`.
    pub reference: ReferenceMode,
    /// The direct array; the values themselves.
    pub values: Cow<'src, [T]>,
    /// The index array. Only consulted with [ReferenceMode::IndexToDirect].
    pub indices: Cow<'src, [u32]>,
}

impl<'src, T: Clone> ChannelDescriptor<'src, T> {
    /// A layer whose mapped index addresses `values` directly.
    pub fn direct(mapping: MappingMode, values: impl Into<Cow<'src, [T]>>) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::Direct,
            values: values.into(),
            indices: Cow::Borrowed(&[]),
        }
    }

    /// A layer whose mapped index addresses `indices`, which in turn address `values`.
    pub fn indexed(
        mapping: MappingMode,
        values: impl Into<Cow<'src, [T]>>,
        indices: impl Into<Cow<'src, [u32]>>,
    ) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::IndexToDirect,
            values: values.into(),
            indices: indices.into(),
        }
    }
}

/// A single corner of a triangle: the unit addressed during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Corner {
    /// The triangle this corner belongs to.
    pub triangle: usize,
    /// 0, 1, or 2
    pub slot: usize,
}

impl Corner {
    /// Corners in a triangle.
    pub const PER_TRIANGLE: usize = 3;

    /// Corner `slot` of triangle `triangle`.
    #[inline]
    pub const fn new(triangle: usize, slot: usize) -> Self {
        Self { triangle, slot }
    }

    /// The sequential index of this corner within the mesh.
    #[inline]
    pub const fn index(self) -> usize {
        Self::PER_TRIANGLE * self.triangle + self.slot
    }

    /// Every corner of `triangles` triangles, in `(triangle, slot)` order.
    pub fn all(triangles: usize) -> impl ExactSizeIterator<Item = Corner> {
        (0..triangles * Self::PER_TRIANGLE).map(|i| Self {
            triangle: i / Self::PER_TRIANGLE,
            slot: i % Self::PER_TRIANGLE,
        })
    }
}

/// Read access to a polygon mesh and its attribute layers.
///
/// Attribute layers which the source does not carry are reported as `None`; this is not an
/// error, and yields an empty channel.
pub trait MeshSource: fmt::Debug {
    /// The name of the mesh.
    fn name(&self) -> &str;

    /// The number of polygons in the mesh. For a triangulated mesh, the number of triangles.
    fn polygon_count(&self) -> usize;

    /// Whether every polygon of the mesh has exactly three corners.
    fn is_fully_triangulated(&self) -> bool;

    /// The control point referenced by corner `slot` of triangle `triangle`.
    ///
    /// Only defined for `slot < 3`.
    fn polygon_vertex(&self, triangle: usize, slot: usize) -> Option<usize>;

    /// The position of a control point.
    fn control_point(&self, index: usize) -> Option<Vec4>;

    /// The texture coordinate layer, if any.
    fn tex_coords(&self) -> Option<ChannelDescriptor<'_, Vec2>> {
        None
    }

    /// The normal layer, if any.
    fn normals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        None
    }

    /// The tangent layer, if any.
    fn tangents(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        None
    }

    /// The binormal layer, if any.
    fn binormals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        None
    }

    /// The vertex color layer, if any.
    fn colors(&self) -> Option<ChannelDescriptor<'_, Rgba>> {
        None
    }
}

/// An attribute layer owned by a [MemSource].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<T> {
    /// See [ChannelDescriptor::mapping].
    pub mapping: MappingMode,
    /// See [ChannelDescriptor::reference].
    pub reference: ReferenceMode,
    /// See [ChannelDescriptor::values].
    pub values: Vec<T>,
    /// See [ChannelDescriptor::indices].
    pub indices: Vec<u32>,
}

impl<T> Layer<T> {
    /// A layer with any combination of modes.
    pub fn new(
        mapping: MappingMode,
        reference: ReferenceMode,
        values: Vec<T>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            mapping,
            reference,
            values,
            indices,
        }
    }

    /// See [ChannelDescriptor::direct].
    pub fn direct(mapping: MappingMode, values: Vec<T>) -> Self {
        Self::new(mapping, ReferenceMode::Direct, values, Vec::new())
    }

    /// See [ChannelDescriptor::indexed].
    pub fn indexed(mapping: MappingMode, values: Vec<T>, indices: Vec<u32>) -> Self {
        Self::new(mapping, ReferenceMode::IndexToDirect, values, indices)
    }
}

impl<T: Clone> Layer<T> {
    fn descriptor(&self) -> ChannelDescriptor<'_, T> {
        ChannelDescriptor {
            mapping: self.mapping,
            reference: self.reference,
            values: Cow::Borrowed(&self.values),
            indices: Cow::Borrowed(&self.indices),
        }
    }
}

/// A [MeshSource] held entirely in memory.
///
/// ```
/// use weld::{channel::Vec4, source::MemSource};
///
/// let quad = MemSource::new("quad")
///     .with_control_points([
///         Vec4::new(0.0, 0.0, 0.0, 1.0),
///         Vec4::new(1.0, 0.0, 0.0, 1.0),
///         Vec4::new(1.0, 1.0, 0.0, 1.0),
///         Vec4::new(0.0, 1.0, 0.0, 1.0),
///     ])
///     .with_triangles([[0, 1, 2], [0, 2, 3]]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemSource {
    name: String,
    control_points: Vec<Vec4>,
    polygons: Vec<Vec<usize>>,
    tex_coords: Option<Layer<Vec2>>,
    normals: Option<Layer<Vec4>>,
    tangents: Option<Layer<Vec4>>,
    binormals: Option<Layer<Vec4>>,
    colors: Option<Layer<Rgba>>,
}

impl MemSource {
    /// A source with no control points, polygons, or layers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append control points.
    pub fn with_control_points(mut self, points: impl IntoIterator<Item = Vec4>) -> Self {
        self.control_points.extend(points);
        self
    }

    /// Append triangles, each as three control point indices.
    pub fn with_triangles(mut self, triangles: impl IntoIterator<Item = [usize; 3]>) -> Self {
        self.polygons
            .extend(triangles.into_iter().map(|tri| tri.to_vec()));
        self
    }

    /// Append a polygon with any number of corners.
    pub fn with_polygon(mut self, corners: impl Into<Vec<usize>>) -> Self {
        self.polygons.push(corners.into());
        self
    }

    /// Set the texture coordinate layer.
    pub fn with_tex_coords(mut self, layer: Layer<Vec2>) -> Self {
        self.tex_coords = Some(layer);
        self
    }

    /// Set the normal layer.
    pub fn with_normals(mut self, layer: Layer<Vec4>) -> Self {
        self.normals = Some(layer);
        self
    }

    /// Set the tangent layer.
    pub fn with_tangents(mut self, layer: Layer<Vec4>) -> Self {
        self.tangents = Some(layer);
        self
    }

    /// Set the binormal layer.
    pub fn with_binormals(mut self, layer: Layer<Vec4>) -> Self {
        self.binormals = Some(layer);
        self
    }

    /// Set the vertex color layer.
    pub fn with_colors(mut self, layer: Layer<Rgba>) -> Self {
        self.colors = Some(layer);
        self
    }
}

impl MeshSource for MemSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn is_fully_triangulated(&self) -> bool {
        self.polygons
            .iter()
            .all(|poly| poly.len() == Corner::PER_TRIANGLE)
    }

    fn polygon_vertex(&self, triangle: usize, slot: usize) -> Option<usize> {
        if slot >= Corner::PER_TRIANGLE {
            return None;
        }
        self.polygons.get(triangle)?.get(slot).copied()
    }

    fn control_point(&self, index: usize) -> Option<Vec4> {
        self.control_points.get(index).copied()
    }

    fn tex_coords(&self) -> Option<ChannelDescriptor<'_, Vec2>> {
        self.tex_coords.as_ref().map(Layer::descriptor)
    }

    fn normals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        self.normals.as_ref().map(Layer::descriptor)
    }

    fn tangents(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        self.tangents.as_ref().map(Layer::descriptor)
    }

    fn binormals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        self.binormals.as_ref().map(Layer::descriptor)
    }

    fn colors(&self) -> Option<ChannelDescriptor<'_, Rgba>> {
        self.colors.as_ref().map(Layer::descriptor)
    }
}
