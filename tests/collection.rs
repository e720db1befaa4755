use weld::{
    channel::{Binormals, ChannelKind, Colors, Positions, Vec4},
    source::MemSource,
    Error, MeshCollection, MeshSource, Stage,
};

fn triangle(name: &str) -> Box<dyn MeshSource> {
    Box::new(
        MemSource::new(name)
            .with_control_points([0.0, 1.0, 2.0].map(|x| Vec4::new(x, 0.0, 0.0, 1.0)))
            .with_triangles([[0, 1, 2]]),
    )
}

#[test]
fn select_by_name() {
    let mut meshes: MeshCollection = [triangle("Torso"), triangle("Head")].into_iter().collect();
    assert_eq!(meshes.mesh().unwrap().name(), "Torso");
    assert_eq!(meshes.mesh_named("Head").unwrap().name(), "Head");
    assert_eq!(
        meshes.mesh_named("Tail").map(|mesh| mesh.name()),
        Err(Error::MeshNotFound("Tail".to_owned()))
    );

    let head = meshes.mesh_named_mut("Head").unwrap();
    head.extract_data().unwrap();
    head.optimize().unwrap();
    assert_eq!(head.vertex_count(), 3);
    assert_eq!(meshes.mesh().unwrap().stage(), Stage::Created);
}

#[test]
fn ngon_is_rejected_before_extraction() {
    let pentagon = MemSource::new("Pentagon")
        .with_control_points((0..5).map(|i| Vec4::new(f64::from(i), 0.0, 0.0, 1.0)))
        .with_triangles([[0, 1, 2]])
        .with_polygon([0, 2, 3, 4]);
    let mut meshes: MeshCollection = [Box::new(pentagon) as Box<dyn MeshSource>]
        .into_iter()
        .collect();
    let mesh = meshes.mesh_mut().unwrap();
    assert_eq!(
        mesh.extract_data(),
        Err(Error::UnsupportedTopology("Pentagon".to_owned()))
    );
    assert_eq!(mesh.stage(), Stage::Created);
}

#[test]
fn absent_channels_are_empty() {
    let mut meshes: MeshCollection = [triangle("Plain")].into_iter().collect();
    meshes.extract_all().unwrap();
    meshes.optimize_all(Default::default()).unwrap();

    let mesh = meshes.mesh().unwrap();
    assert_eq!(mesh.channel::<Positions>().unwrap().len(), 3);
    assert!(mesh.channel::<Colors>().unwrap().is_empty());
    assert_eq!(
        mesh.attribute::<Binormals>(0),
        Err(Error::OutOfRange {
            channel: ChannelKind::Binormals,
            index: 0,
            len: 0
        })
    );
}

#[test]
fn empty_document() {
    let meshes: MeshCollection = MeshCollection::default();
    assert_eq!(meshes.mesh().map(|mesh| mesh.name()), Err(Error::NoMeshesFound));
}
