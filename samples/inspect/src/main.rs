use std::{
    convert::Infallible,
    path::{Path, PathBuf},
};

use clap::Parser;
use weld::{
    channel::{Binormals, Channel, Colors, Normals, Positions, Tangents, TexCoords},
    de::{gltf::GltfCatalog, obj::ObjCatalog},
    Mesh, MeshCollection, OptimizeOptions,
};

mod cli;
use cli::*;

#[derive(Debug, thiserror::Error)]
enum InspectError {
    #[error(transparent)]
    Load(#[from] weld::de::Error),
    #[error(transparent)]
    Weld(#[from] weld::Error),
    #[error("unrecognized mesh file extension: {0:?}")]
    UnknownFormat(PathBuf),
}

impl From<Infallible> for InspectError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

fn load(path: &Path) -> Result<MeshCollection, InspectError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    Ok(match ext.as_deref() {
        Some("obj") => MeshCollection::from_catalog(ObjCatalog::open(path)?)?,
        Some("gltf" | "glb") => MeshCollection::from_catalog(GltfCatalog::open(path)?)?,
        _ => return Err(InspectError::UnknownFormat(path.to_path_buf())),
    })
}

fn channel_line<C: Channel>(mesh: &Mesh) -> String {
    let (corners, unique) = mesh
        .channel::<C>()
        .map_or((0, 0), |c| (c.len(), c.pool().len()));
    format!("  {:<10} {corners:>8} corners {unique:>8} unique", C::KIND.name())
}

fn inspect(path: &Path, cli: &Cli) -> Result<(), InspectError> {
    let mut meshes = load(path)?;
    let mesh = match &cli.mesh {
        Some(name) => meshes.mesh_named_mut(name)?,
        None => meshes.mesh_mut()?,
    };
    mesh.extract_data()?;
    mesh.optimize_with(OptimizeOptions {
        dedup: cli.dedup.into(),
        parallel: cli.parallel,
    })?;

    println!("{}: {}", path.display(), mesh.name());
    for line in [
        channel_line::<Positions>(mesh),
        channel_line::<TexCoords>(mesh),
        channel_line::<Normals>(mesh),
        channel_line::<Tangents>(mesh),
        channel_line::<Binormals>(mesh),
        channel_line::<Colors>(mesh),
    ] {
        println!("{line}");
    }
    Ok(())
}

pub fn main() {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);

    let mut failed = false;
    for path in &cli.files {
        let _span = tracing::info_span!("inspect", ?path).entered();
        if let Err(e) = inspect(path, &cli) {
            tracing::error!("{e}");
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
}
