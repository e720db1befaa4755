//! Mesh sources backed by glTF 2.0 documents, via [gltf].
//!
//! # Notes
//!
//! * Each primitive of each mesh becomes its own source, named after its mesh (`mesh.N` when the
//!   mesh has more than one primitive, `mesh<index>` when the mesh is unnamed).
//! * glTF attributes are already indexed per vertex, so every attribute is a per-control-point
//!   layer and the primitive's index buffer describes the triangles.
//! * Only the first texture coordinate set and the first color set are read.
//!
//! # See Also
//!
//! * [glTF 2.0 specification](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html)

use std::path::Path;

use gltf::mesh::Mode;

use super::Error;
use crate::{
    channel::{Rgba, Vec2, Vec4},
    collection::MeshCatalog,
    source::{ChannelDescriptor, Corner, MappingMode, MeshSource},
};

fn layer<T: Clone>(values: &[T]) -> Option<ChannelDescriptor<'_, T>> {
    if values.is_empty() {
        None
    } else {
        Some(ChannelDescriptor::direct(MappingMode::PerControlPoint, values))
    }
}

fn vec4([x, y, z]: [f32; 3], w: f64) -> Vec4 {
    Vec4::new(x.into(), y.into(), z.into(), w)
}

/// A single primitive of a glTF mesh.
#[derive(Debug, Clone)]
pub struct GltfSource {
    name: String,
    mode: Mode,
    indices: Vec<u32>,
    control_points: Vec<Vec4>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec4>,
    tangents: Vec<Vec4>,
    colors: Vec<Rgba>,
}

impl GltfSource {
    /// Read `primitive` out of `buffers`.
    ///
    /// # Errors
    ///
    /// * [Error::MissingPositions] if the primitive has no `POSITION` attribute
    pub fn new(
        name: String,
        primitive: &gltf::Primitive<'_>,
        buffers: &[gltf::buffer::Data],
    ) -> Result<Self, Error> {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let control_points: Vec<Vec4> = reader
            .read_positions()
            .ok_or_else(|| Error::MissingPositions {
                mesh: name.clone(),
                primitive: primitive.index(),
            })?
            .map(|p| vec4(p, 1.0))
            .collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..control_points.len() as u32).collect(),
        };
        let tex_coords: Vec<Vec2> = reader
            .read_tex_coords(0)
            .map(|t| {
                t.into_f32()
                    .map(|[u, v]| Vec2::new(u.into(), v.into()))
                    .collect()
            })
            .unwrap_or_default();
        let normals: Vec<Vec4> = reader
            .read_normals()
            .map(|n| n.map(|n| vec4(n, 0.0)).collect())
            .unwrap_or_default();
        let tangents: Vec<Vec4> = reader
            .read_tangents()
            .map(|t| {
                t.map(|[x, y, z, w]| Vec4::new(x.into(), y.into(), z.into(), w.into()))
                    .collect()
            })
            .unwrap_or_default();
        let colors: Vec<Rgba> = reader
            .read_colors(0)
            .map(|c| {
                c.into_rgba_f32()
                    .map(|[r, g, b, a]| Rgba::new(r.into(), g.into(), b.into(), a.into()))
                    .collect()
            })
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            name = name.as_str(),
            mode = ?primitive.mode(),
            vertices = control_points.len(),
            indices = indices.len(),
            "read glTF primitive"
        );
        Ok(Self {
            name,
            mode: primitive.mode(),
            indices,
            control_points,
            tex_coords,
            normals,
            tangents,
            colors,
        })
    }
}

impl MeshSource for GltfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn polygon_count(&self) -> usize {
        let len = self.indices.len();
        match self.mode {
            Mode::Triangles => len / Corner::PER_TRIANGLE,
            Mode::TriangleStrip | Mode::TriangleFan => len.saturating_sub(2),
            Mode::Lines => len / 2,
            Mode::LineStrip => len.saturating_sub(1),
            Mode::LineLoop | Mode::Points => len,
        }
    }

    fn is_fully_triangulated(&self) -> bool {
        self.mode == Mode::Triangles && self.indices.len() % Corner::PER_TRIANGLE == 0
    }

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
        layer(&self.tex_coords)
    }

    fn normals(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        layer(&self.normals)
    }

    fn tangents(&self) -> Option<ChannelDescriptor<'_, Vec4>> {
        layer(&self.tangents)
    }

    fn colors(&self) -> Option<ChannelDescriptor<'_, Rgba>> {
        layer(&self.colors)
    }
}

/// Every mesh primitive of a glTF document, along with the buffers they are read from.
///
/// Images are loaded by the importer but otherwise ignored.
#[derive(Debug)]
pub struct GltfCatalog {
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
}

impl GltfCatalog {
    /// Import a `.gltf` or `.glb` file, resolving external and embedded buffers.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        #[cfg(feature = "tracing")]
        tracing::debug!(?path, "loading glTF file");
        let (document, buffers, _images) = gltf::import(path)?;
        Ok(Self { document, buffers })
    }

    /// Import glTF or GLB data from memory. Only embedded buffers can be resolved.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let (document, buffers, _images) = gltf::import_slice(bytes)?;
        Ok(Self { document, buffers })
    }

    /// The parsed document.
    pub fn document(&self) -> &gltf::Document {
        &self.document
    }
}

impl MeshCatalog for GltfCatalog {
    type Error = Error;

    fn into_sources(self) -> Result<Vec<Box<dyn MeshSource>>, Self::Error> {
        let mut res: Vec<Box<dyn MeshSource>> = Vec::new();
        for mesh in self.document.meshes() {
            let base = match mesh.name() {
                Some(name) => name.to_owned(),
                None => format!("mesh{}", mesh.index()),
            };
            let several = mesh.primitives().len() > 1;
            for primitive in mesh.primitives() {
                let name = if several {
                    format!("{base}.{}", primitive.index())
                } else {
                    base.clone()
                };
                res.push(Box::new(GltfSource::new(name, &primitive, &self.buffers)?));
            }
        }
        Ok(res)
    }
}
