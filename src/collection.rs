//! The set of meshes discovered within a single source document.

use std::convert::Infallible;

use weld_common::ArrayIndex;

use crate::{error::Error, mesh::Mesh, source::MeshSource, weld::OptimizeOptions};

/// Something which can enumerate the meshes of a document, ex. a parsed file.
pub trait MeshCatalog {
    /// Failure to enumerate the catalog's meshes.
    type Error;

    /// Every mesh in the catalog, in document order.
    fn into_sources(self) -> Result<Vec<Box<dyn MeshSource>>, Self::Error>;
}

impl MeshCatalog for Vec<Box<dyn MeshSource>> {
    type Error = Infallible;

    #[inline]
    fn into_sources(self) -> Result<Vec<Box<dyn MeshSource>>, Self::Error> {
        Ok(self)
    }
}

/// Every mesh of a [MeshCatalog], each in its own [Mesh].
#[derive(Debug)]
pub struct MeshCollection<Idx: ArrayIndex = u32> {
    meshes: Vec<Mesh<Idx>>,
}

impl<Idx: ArrayIndex> Default for MeshCollection<Idx> {
    fn default() -> Self {
        Self { meshes: Vec::new() }
    }
}

impl<Idx: ArrayIndex> FromIterator<Box<dyn MeshSource>> for MeshCollection<Idx> {
    fn from_iter<I: IntoIterator<Item = Box<dyn MeshSource>>>(iter: I) -> Self {
        Self {
            meshes: iter.into_iter().map(Mesh::new).collect(),
        }
    }
}

impl<Idx: ArrayIndex> MeshCollection<Idx> {
    /// Wrap every mesh of `catalog`, in catalog order.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(catalog)))]
    pub fn from_catalog<C: MeshCatalog>(catalog: C) -> Result<Self, C::Error> {
        let res: Self = catalog.into_sources()?.into_iter().collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            meshes = res.len(),
            names = ?res.iter().map(Mesh::name).collect::<Vec<_>>(),
            "discovered meshes"
        );
        Ok(res)
    }

    /// The number of meshes.
    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether there are no meshes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate over every mesh, in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mesh<Idx>> {
        self.meshes.iter()
    }

    /// See [iter](Self::iter).
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Mesh<Idx>> {
        self.meshes.iter_mut()
    }

    /// The first mesh discovered.
    ///
    /// # Errors
    ///
    /// * [Error::NoMeshesFound] if the collection is empty
    pub fn mesh(&self) -> Result<&Mesh<Idx>, Error> {
        self.meshes.first().ok_or(Error::NoMeshesFound)
    }

    /// See [mesh](Self::mesh).
    pub fn mesh_mut(&mut self) -> Result<&mut Mesh<Idx>, Error> {
        self.meshes.first_mut().ok_or(Error::NoMeshesFound)
    }

    /// The first mesh named `name`.
    ///
    /// # Errors
    ///
    /// * [Error::MeshNotFound] if no mesh has that name
    pub fn mesh_named(&self, name: &str) -> Result<&Mesh<Idx>, Error> {
        self.meshes
            .iter()
            .find(|mesh| mesh.name() == name)
            .ok_or_else(|| Error::MeshNotFound(name.to_owned()))
    }

    /// See [mesh_named](Self::mesh_named).
    pub fn mesh_named_mut(&mut self, name: &str) -> Result<&mut Mesh<Idx>, Error> {
        self.meshes
            .iter_mut()
            .find(|mesh| mesh.name() == name)
            .ok_or_else(|| Error::MeshNotFound(name.to_owned()))
    }

    /// [Extract](Mesh::extract_data) every mesh, stopping at the first failure.
    pub fn extract_all(&mut self) -> Result<(), Error> {
        self.meshes.iter_mut().try_for_each(Mesh::extract_data)
    }

    /// [Optimize](Mesh::optimize_with) every mesh, stopping at the first failure.
    pub fn optimize_all(&mut self, options: OptimizeOptions) -> Result<(), Error> {
        self.meshes
            .iter_mut()
            .try_for_each(|mesh| mesh.optimize_with(options))
    }
}

impl<'c, Idx: ArrayIndex> IntoIterator for &'c MeshCollection<Idx> {
    type Item = &'c Mesh<Idx>;
    type IntoIter = std::slice::Iter<'c, Mesh<Idx>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemSource;

    fn named(name: &str) -> Box<dyn MeshSource> {
        Box::new(MemSource::new(name))
    }

    #[test]
    fn empty_collection() {
        let mut meshes: MeshCollection =
            MeshCollection::from_catalog(Vec::<Box<dyn MeshSource>>::new()).unwrap();
        assert!(meshes.is_empty());
        assert_eq!(meshes.mesh().map(Mesh::name), Err(Error::NoMeshesFound));
        assert!(matches!(meshes.mesh_mut(), Err(Error::NoMeshesFound)));
    }

    #[test]
    fn first_mesh_is_default() {
        let meshes: MeshCollection = [named("Torso"), named("Head")].into_iter().collect();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes.mesh().map(Mesh::name), Ok("Torso"));
    }

    #[test]
    fn extract_and_optimize_all() {
        let mut meshes: MeshCollection = [named("a"), named("b")].into_iter().collect();
        meshes.extract_all().unwrap();
        meshes.optimize_all(OptimizeOptions::default()).unwrap();
        assert!(meshes
            .iter()
            .all(|mesh| mesh.stage() == crate::mesh::Stage::Optimized));
    }
}
