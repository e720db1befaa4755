//! Named meshes and the lifecycle of their attribute channels.

use crossbeam::thread::ScopedJoinHandle;
use weld_common::ArrayIndex;

use crate::{
    channel::{
        Binormals, Channel, Colors, Normals, Positions, Rgba, Tangents, TexCoords, Vec2, Vec4,
    },
    error::Error,
    extract,
    source::MeshSource,
    weld::{self, Dedup, OptimizeOptions, OptimizedChannel},
};

/// The expanded, per-corner form of every channel of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedSet {
    pub(crate) positions: Vec<Vec4>,
    pub(crate) tex_coords: Vec<Vec2>,
    pub(crate) normals: Vec<Vec4>,
    pub(crate) tangents: Vec<Vec4>,
    pub(crate) binormals: Vec<Vec4>,
    pub(crate) colors: Vec<Rgba>,
}

impl ExpandedSet {
    /// Extract every channel of `source`, or none of them.
    pub fn extract<S: MeshSource + ?Sized>(source: &S) -> Result<Self, Error> {
        extract::ensure_triangulated(source)?;
        Ok(Self {
            positions: Positions::extract(source)?,
            tex_coords: TexCoords::extract(source)?,
            normals: Normals::extract(source)?,
            tangents: Tangents::extract(source)?,
            binormals: Binormals::extract(source)?,
            colors: Colors::extract(source)?,
        })
    }
}

/// The welded form of every channel of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedSet<Idx: ArrayIndex> {
    pub(crate) positions: OptimizedChannel<Vec4, Idx>,
    pub(crate) tex_coords: OptimizedChannel<Vec2, Idx>,
    pub(crate) normals: OptimizedChannel<Vec4, Idx>,
    pub(crate) tangents: OptimizedChannel<Vec4, Idx>,
    pub(crate) binormals: OptimizedChannel<Vec4, Idx>,
    pub(crate) colors: OptimizedChannel<Rgba, Idx>,
}

impl<Idx: ArrayIndex> Default for OptimizedSet<Idx> {
    fn default() -> Self {
        Self {
            positions: OptimizedChannel::empty(),
            tex_coords: OptimizedChannel::empty(),
            normals: OptimizedChannel::empty(),
            tangents: OptimizedChannel::empty(),
            binormals: OptimizedChannel::empty(),
            colors: OptimizedChannel::empty(),
        }
    }
}

fn weld_channel<C: Channel, Idx: ArrayIndex>(
    set: &ExpandedSet,
    dedup: Dedup,
) -> Result<OptimizedChannel<C::Value, Idx>, Error> {
    weld::optimize(C::KIND, C::expanded(set), dedup)
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}

impl<Idx: ArrayIndex> OptimizedSet<Idx> {
    /// Weld every channel of `set`.
    pub fn weld(set: &ExpandedSet, options: OptimizeOptions) -> Result<Self, Error> {
        let dedup = options.dedup;
        if !options.parallel {
            return Ok(Self {
                positions: weld_channel::<Positions, Idx>(set, dedup)?,
                tex_coords: weld_channel::<TexCoords, Idx>(set, dedup)?,
                normals: weld_channel::<Normals, Idx>(set, dedup)?,
                tangents: weld_channel::<Tangents, Idx>(set, dedup)?,
                binormals: weld_channel::<Binormals, Idx>(set, dedup)?,
                colors: weld_channel::<Colors, Idx>(set, dedup)?,
            });
        }

        // channels share no data; each scan stays on one thread to keep first-occurrence order
        crossbeam::scope(|s| -> Result<Self, Error> {
            let positions = s.spawn(move |_| weld_channel::<Positions, Idx>(set, dedup));
            let tex_coords = s.spawn(move |_| weld_channel::<TexCoords, Idx>(set, dedup));
            let normals = s.spawn(move |_| weld_channel::<Normals, Idx>(set, dedup));
            let tangents = s.spawn(move |_| weld_channel::<Tangents, Idx>(set, dedup));
            let binormals = s.spawn(move |_| weld_channel::<Binormals, Idx>(set, dedup));
            let colors = s.spawn(move |_| weld_channel::<Colors, Idx>(set, dedup));
            Ok(Self {
                positions: join(positions)?,
                tex_coords: join(tex_coords)?,
                normals: join(normals)?,
                tangents: join(tangents)?,
                binormals: join(binormals)?,
                colors: join(colors)?,
            })
        })
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
    }
}

/// The lifecycle stage of a [Mesh].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing has been extracted yet.
    Created,
    /// Per-corner values have been extracted, but not welded.
    Expanded,
    /// Every channel has been welded; attributes may be queried.
    Optimized,
}

#[derive(Debug, Clone)]
enum Data<Idx: ArrayIndex> {
    Created,
    Expanded(ExpandedSet),
    Optimized(OptimizedSet<Idx>),
}

/// A named mesh and its six vertex attribute channels.
///
/// A mesh starts out empty. [extract_data](Self::extract_data) resolves the per-corner value of
/// each channel from the mesh's [MeshSource]; [optimize](Self::optimize) then welds each channel
/// into a pool of unique values and an index buffer, after which
/// [attribute](Self::attribute) can be used to look up per-vertex values.
#[derive(Debug)]
pub struct Mesh<Idx: ArrayIndex = u32> {
    name: String,
    source: Box<dyn MeshSource>,
    data: Data<Idx>,
}

impl<Idx: ArrayIndex> Mesh<Idx> {
    /// An empty mesh over `source`, named after it.
    pub fn new(source: Box<dyn MeshSource>) -> Self {
        Self {
            name: source.name().to_owned(),
            source,
            data: Data::Created,
        }
    }

    /// The name of the mesh, as reported by its source on construction.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source this mesh extracts from.
    #[inline]
    pub fn source(&self) -> &dyn MeshSource {
        self.source.as_ref()
    }

    /// How far through its lifecycle this mesh is.
    pub fn stage(&self) -> Stage {
        match self.data {
            Data::Created => Stage::Created,
            Data::Expanded(_) => Stage::Expanded,
            Data::Optimized(_) => Stage::Optimized,
        }
    }

    /// Resolve the per-corner values of every channel from the mesh's source, replacing anything
    /// previously extracted or welded.
    ///
    /// On failure, the mesh is left as it was.
    ///
    /// # Errors
    ///
    /// See [extract::extract].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(mesh = %self.name)))]
    pub fn extract_data(&mut self) -> Result<(), Error> {
        let set = ExpandedSet::extract(self.source.as_ref())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            corners = set.positions.len(),
            tex_coords = !set.tex_coords.is_empty(),
            normals = !set.normals.is_empty(),
            tangents = !set.tangents.is_empty(),
            binormals = !set.binormals.is_empty(),
            colors = !set.colors.is_empty(),
            "extracted mesh attributes"
        );
        self.data = Data::Expanded(set);
        Ok(())
    }

    /// Weld every extracted channel. See [optimize_with](Self::optimize_with).
    #[inline]
    pub fn optimize(&mut self) -> Result<(), Error> {
        self.optimize_with(OptimizeOptions::default())
    }

    /// Weld every extracted channel.
    ///
    /// Optimizing a mesh which has not been extracted yields empty channels; optimizing a mesh
    /// twice does nothing the second time.
    ///
    /// # Errors
    ///
    /// * [Error::IndexOverflow] if a channel has more unique values than `Idx` can address; the
    ///   mesh is left as it was
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(mesh = %self.name)))]
    pub fn optimize_with(&mut self, options: OptimizeOptions) -> Result<(), Error> {
        let set = match &self.data {
            Data::Created => OptimizedSet::default(),
            Data::Expanded(expanded) => OptimizedSet::weld(expanded, options)?,
            Data::Optimized(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("already optimized");
                return Ok(());
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(vertices = set.positions.pool().len(), "optimized mesh");
        self.data = Data::Optimized(set);
        Ok(())
    }

    /// The welded form of channel `C`, once the mesh has been optimized.
    pub fn channel<C: Channel>(&self) -> Option<&OptimizedChannel<C::Value, Idx>> {
        match &self.data {
            Data::Optimized(set) => Some(C::optimized(set)),
            _ => None,
        }
    }

    /// The expanded form of channel `C`, between extraction and optimization.
    pub fn expanded<C: Channel>(&self) -> Option<&[C::Value]> {
        match &self.data {
            Data::Expanded(set) => Some(C::expanded(set)),
            _ => None,
        }
    }

    /// The value of channel `C` at corner `vertex`.
    ///
    /// # Errors
    ///
    /// * [Error::OutOfRange] if `vertex` is not less than the channel's index count. Before the
    ///   mesh is optimized, and for channels absent from the source, that count is 0.
    pub fn attribute<C: Channel>(&self, vertex: usize) -> Result<&C::Value, Error> {
        let channel = self.channel::<C>();
        channel
            .and_then(|c| c.get(vertex))
            .ok_or(Error::OutOfRange {
                channel: C::KIND,
                index: vertex,
                len: channel.map_or(0, OptimizedChannel::len),
            })
    }

    /// The number of corners in the optimized mesh; 0 before optimization.
    pub fn vertex_count(&self) -> usize {
        self.channel::<Positions>().map_or(0, OptimizedChannel::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::ChannelKind,
        source::{Layer, MappingMode, MemSource},
    };

    fn point(x: f64) -> Vec4 {
        Vec4::new(x, 0.0, 0.0, 1.0)
    }

    fn quad() -> MemSource {
        MemSource::new("quad")
            .with_control_points((0..4).map(|i| point(i as f64)))
            .with_triangles([[0, 1, 2], [0, 2, 3]])
            .with_normals(Layer::direct(
                MappingMode::PerControlPoint,
                vec![Vec4::z(); 4],
            ))
    }

    #[test]
    fn lifecycle() {
        let mut mesh: Mesh = Mesh::new(Box::new(quad()));
        assert_eq!(mesh.name(), "quad");
        assert_eq!(mesh.stage(), Stage::Created);

        mesh.extract_data().unwrap();
        assert_eq!(mesh.stage(), Stage::Expanded);
        assert_eq!(mesh.expanded::<Positions>().map(<[_]>::len), Some(6));
        assert_eq!(
            mesh.attribute::<Positions>(0),
            Err(Error::OutOfRange {
                channel: ChannelKind::Positions,
                index: 0,
                len: 0
            })
        );

        mesh.optimize().unwrap();
        assert_eq!(mesh.stage(), Stage::Optimized);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.attribute::<Positions>(5), Ok(&point(3.0)));
        assert_eq!(mesh.channel::<Normals>().unwrap().pool(), &[Vec4::z()]);
        assert_eq!(
            mesh.attribute::<Positions>(6),
            Err(Error::OutOfRange {
                channel: ChannelKind::Positions,
                index: 6,
                len: 6
            })
        );
    }

    #[test]
    fn optimize_before_extract_is_empty() {
        let mut mesh: Mesh = Mesh::new(Box::new(quad()));
        mesh.optimize().unwrap();
        assert_eq!(mesh.stage(), Stage::Optimized);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.channel::<Positions>().unwrap().is_empty());
    }

    #[test]
    fn optimize_twice_keeps_indices() {
        let mut mesh: Mesh = Mesh::new(Box::new(quad()));
        mesh.extract_data().unwrap();
        mesh.optimize().unwrap();
        let first = mesh.channel::<Positions>().cloned();
        mesh.optimize().unwrap();
        assert_eq!(mesh.channel::<Positions>().cloned(), first);
    }

    #[test]
    fn extract_again_after_optimize() {
        let mut mesh: Mesh = Mesh::new(Box::new(quad()));
        mesh.extract_data().unwrap();
        mesh.optimize().unwrap();
        mesh.extract_data().unwrap();
        assert_eq!(mesh.stage(), Stage::Expanded);
        assert_eq!(mesh.expanded::<Normals>().map(<[_]>::len), Some(6));
    }

    #[test]
    fn failed_extraction_keeps_state() {
        let mut mesh: Mesh = Mesh::new(Box::new(quad().with_polygon([0, 1, 2, 3])));
        mesh.optimize().unwrap();
        assert_eq!(
            mesh.extract_data(),
            Err(Error::UnsupportedTopology("quad".to_owned()))
        );
        assert_eq!(mesh.stage(), Stage::Optimized);
    }

    #[test]
    fn empty_mesh_with_unmapped_layer() {
        let src = MemSource::new("empty")
            .with_normals(Layer::direct(MappingMode::Unmapped, Vec::new()));
        let mut mesh: Mesh = Mesh::new(Box::new(src));
        assert_eq!(mesh.extract_data(), Ok(()));
        mesh.optimize().unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.channel::<Normals>().unwrap().is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq: Mesh<u16> = Mesh::new(Box::new(quad()));
        let mut par: Mesh<u16> = Mesh::new(Box::new(quad()));
        seq.extract_data().unwrap();
        par.extract_data().unwrap();
        seq.optimize().unwrap();
        par.optimize_with(OptimizeOptions {
            parallel: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            seq.channel::<Positions>().unwrap(),
            par.channel::<Positions>().unwrap()
        );
        assert_eq!(
            seq.channel::<Normals>().unwrap(),
            par.channel::<Normals>().unwrap()
        );
        assert!(par.channel::<Colors>().unwrap().is_empty());
    }
}
