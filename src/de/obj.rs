//! Mesh sources backed by Wavefront OBJ files, via [tobj].
//!
//! # Notes
//!
//! * OBJ faces index positions, texture coordinates, and normals separately, so models are loaded
//!   without single-indexing: texture coordinates and normals are per-polygon-vertex layers
//!   addressed through their own index streams, and vertex positions are the control points.
//! * Vertex colors are stored alongside positions, so they are per-control-point.
//! * Faces are never triangulated on load; a model with any non-triangular face is reported as
//!   such.
//!
//! # See Also
//!
//! * [OBJ format reference](https://paulbourke.net/dataformats/obj/)

use std::{convert::Infallible, io::BufRead, path::Path};

use super::Error;
use crate::{
    channel::{Rgba, Vec2, Vec4},
    collection::MeshCatalog,
    source::{ChannelDescriptor, Corner, MappingMode, MeshSource},
};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// A layer addressed through its own index stream, if it has one.
fn layer<'src, T: Clone>(
    values: &'src [T],
    indices: &'src [u32],
) -> Option<ChannelDescriptor<'src, T>> {
    if values.is_empty() {
        None
    } else if indices.is_empty() {
        Some(ChannelDescriptor::direct(MappingMode::PerControlPoint, values))
    } else {
        Some(ChannelDescriptor::indexed(
            MappingMode::PerPolygonVertex,
            values,
            indices,
        ))
    }
}

/// A single model of an OBJ file.
#[derive(Debug, Clone)]
pub struct ObjSource {
    name: String,
    indices: Vec<u32>,
    /// Empty if every face is a triangle
    face_arities: Vec<u32>,
    control_points: Vec<Vec4>,
    tex_coords: Vec<Vec2>,
    tex_coord_indices: Vec<u32>,
    normals: Vec<Vec4>,
    normal_indices: Vec<u32>,
    colors: Vec<Rgba>,
}

impl ObjSource {
    /// Convert a loaded model, widening its values to `f64`.
    pub fn new(model: tobj::Model) -> Self {
        let mesh = model.mesh;
        let control_points: Vec<Vec4> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec4::new(p[0].into(), p[1].into(), p[2].into(), 1.0))
            .collect();
        let tex_coords: Vec<Vec2> = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0].into(), t[1].into()))
            .collect();
        let normals: Vec<Vec4> = mesh
            .normals
            .chunks_exact(3)
            .map(|n| Vec4::new(n[0].into(), n[1].into(), n[2].into(), 0.0))
            .collect();
        let colors: Vec<Rgba> = mesh
            .vertex_color
            .chunks_exact(3)
            .map(|c| Rgba::new(c[0].into(), c[1].into(), c[2].into(), 1.0))
            .collect();
        #[cfg(feature = "tracing")]
        tracing::trace!(
            name = model.name.as_str(),
            positions = mesh.positions.len() / 3,
            faces = mesh.face_arities.len(),
            "read OBJ model"
        );
        Self {
            name: model.name,
            indices: mesh.indices,
            face_arities: mesh.face_arities,
            control_points,
            tex_coords,
            tex_coord_indices: mesh.texcoord_indices,
            normals,
            normal_indices: mesh.normal_indices,
            colors,
        }
    }
}

impl MeshSource for ObjSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn polygon_count(&self) -> usize {
        if self.face_arities.is_empty() {
            self.indices.len() / Corner::PER_TRIANGLE
        } else {
            self.face_arities.len()
        }
    }

    fn is_fully_triangulated(&self) -> bool {
        if self.face_arities.is_empty() {
            self.indices.len() % Corner::PER_TRIANGLE == 0
        } else {
            self.face_arities
                .iter()
                .all(|&arity| arity as usize == Corner::PER_TRIANGLE)
        }
    }

    /// Only meaningful for triangulated models.
    fn polygon_vertex(&self, triangle: usize, slot: usize) -> Option<usize> {
        if slot >= Corner::PER_TRIANGLE {
            return None;
        }
        self.indices
            .get(Corner::new(triangle, slot).index())
            .map(|&i| i as usize)
    }

    fn control_point(&self, index: usize) -> Option<Vec4> {
        self.control_points.get(index).copied()
    }

    fn tex_coords(&self) -> Option<ChannelDescriptor<'_, Vec2>> {
        layer(&self.tex_coords, &self.tex_coord_indices)
    }

    fn normals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        layer(&self.normals, &self.normal_indices)
    }

    fn colors(&self) -> Option<ChannelDescriptor<'_, Rgba>> {
        layer(&self.colors, &[])
    }
}

/// Every model of an OBJ file.
///
/// Materials are not loaded.
#[derive(Debug, Clone)]
pub struct ObjCatalog {
    models: Vec<tobj::Model>,
}

impl ObjCatalog {
    /// Load an OBJ file. Materials are not loaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        #[cfg(feature = "tracing")]
        tracing::debug!(?path, "loading OBJ file");
        let (models, _materials) = tobj::load_obj(path, &load_options())?;
        Ok(Self { models })
    }

    /// Load OBJ data from a reader. `mtllib` statements are ignored.
    pub fn from_reader(reader: &mut impl BufRead) -> Result<Self, Error> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))?;
        Ok(Self { models })
    }

    /// The number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the file had no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl MeshCatalog for ObjCatalog {
    type Error = Infallible;

    fn into_sources(self) -> Result<Vec<Box<dyn MeshSource>>, Self::Error> {
        Ok(self
            .models
            .into_iter()
            .map(|model| Box::new(ObjSource::new(model)) as Box<dyn MeshSource>)
            .collect())
    }
}
