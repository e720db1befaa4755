//! Per-corner vertex attribute extraction and exact vertex welding.
//!
//! Interchange formats commonly store a triangle mesh as a set of shared control points plus a
//! number of attribute layers, each addressed either per control point or per triangle corner,
//! and either directly or through an index array. Renderers want something else: one pool of
//! unique values per attribute and an index buffer into it. This crate resolves the former into
//! a flat per-corner stream ([extract]) and welds that stream into the latter ([weld]).
//!
//! ```
//! use weld::{
//!     channel::{Positions, Vec4},
//!     source::MemSource,
//!     Mesh,
//! };
//!
//! let quad = MemSource::new("quad")
//!     .with_control_points([
//!         Vec4::new(0.0, 0.0, 0.0, 1.0),
//!         Vec4::new(1.0, 0.0, 0.0, 1.0),
//!         Vec4::new(1.0, 1.0, 0.0, 1.0),
//!         Vec4::new(0.0, 1.0, 0.0, 1.0),
//!     ])
//!     .with_triangles([[0, 1, 2], [0, 2, 3]]);
//!
//! let mut mesh: Mesh = Mesh::new(Box::new(quad));
//! mesh.extract_data()?;
//! mesh.optimize()?;
//!
//! let positions = mesh.channel::<Positions>().unwrap();
//! assert_eq!(positions.pool().len(), 4);
//! assert_eq!(positions.indices(), &[0, 1, 2, 0, 2, 3]);
//! # Ok::<(), weld::Error>(())
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod channel;
pub mod collection;
#[cfg(any(feature = "de_obj", feature = "de_gltf"))]
pub mod de;
pub mod error;
pub mod extract;
pub mod mesh;
pub mod source;
pub mod weld;

pub use collection::{MeshCatalog, MeshCollection};
pub use error::Error;
pub use mesh::{Mesh, Stage};
pub use source::MeshSource;
pub use weld::{Dedup, OptimizeOptions, OptimizedChannel};
pub use weld_common::ArrayIndex;
