//! Deserialization of mesh sources from various storage formats.

#[cfg(feature = "de_gltf")]
pub mod gltf;
#[cfg(feature = "de_obj")]
pub mod obj;

/// Errors related to loading mesh catalogs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OBJ file could not be read.
    #[cfg(feature = "de_obj")]
    #[error(transparent)]
    Obj(#[from] tobj::LoadError),
    /// The glTF document could not be imported.
    #[cfg(feature = "de_gltf")]
    #[error(transparent)]
    Gltf(#[from] ::gltf::Error),
    /// A glTF primitive lacks a `POSITION` attribute.
    #[error("primitive {primitive} of mesh {mesh} has no vertex positions")]
    MissingPositions { mesh: String, primitive: usize },
}
