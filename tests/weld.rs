use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use weld::{
    channel::{ChannelKind, Normals, Positions, TexCoords, Vec2, Vec4},
    source::{Layer, MappingMode, MemSource},
    weld::optimize,
    Dedup, Mesh, OptimizeOptions, OptimizedChannel,
};

/// Map small integers onto a handful of distinct values, so that duplicates are common.
fn values(raw: &[(u8, u8)]) -> Vec<Vec2> {
    raw.iter()
        .map(|&(u, v)| Vec2::new(f64::from(u % 4) * 0.25, f64::from(v % 3) - 1.0))
        .collect()
}

fn weld(expanded: &[Vec2], dedup: Dedup) -> OptimizedChannel<Vec2> {
    optimize(ChannelKind::TexCoords, expanded, dedup).unwrap()
}

#[quickcheck]
fn hashed_matches_linear(raw: Vec<(u8, u8)>) -> bool {
    let expanded = values(&raw);
    weld(&expanded, Dedup::Hashed) == weld(&expanded, Dedup::Linear)
}

#[quickcheck]
fn welding_preserves_values(raw: Vec<(u8, u8)>) -> bool {
    let expanded = values(&raw);
    let welded = weld(&expanded, Dedup::Hashed);
    welded.len() == expanded.len()
        && welded
            .indices()
            .iter()
            .zip(&expanded)
            .all(|(&i, value)| &welded.pool()[i as usize] == value)
}

#[quickcheck]
fn pool_is_unique_in_first_occurrence_order(raw: Vec<(u8, u8)>) -> bool {
    let expanded = values(&raw);
    let welded = weld(&expanded, Dedup::Hashed);
    let mut first_seen: Vec<Vec2> = Vec::new();
    for value in &expanded {
        if !first_seen.contains(value) {
            first_seen.push(*value);
        }
    }
    welded.pool() == first_seen.as_slice()
}

#[quickcheck]
fn welding_a_pool_is_identity(raw: Vec<(u8, u8)>) -> bool {
    let pool = weld(&values(&raw), Dedup::Hashed).into_parts().0;
    let again = weld(&pool, Dedup::Linear);
    again.pool() == pool.as_slice() && again.indices().iter().copied().eq(0..pool.len() as u32)
}

#[quickcheck]
fn expanded_has_three_corners_per_triangle(points: u8, corners: Vec<u8>) -> TestResult {
    if points == 0 {
        return TestResult::discard();
    }
    let points = usize::from(points);
    let triangles: Vec<[usize; 3]> = corners
        .chunks_exact(3)
        .map(|c| [0, 1, 2].map(|s| usize::from(c[s]) % points))
        .collect();
    let source = MemSource::new("random")
        .with_control_points((0..points).map(|i| Vec4::new(i as f64, 0.0, 0.0, 1.0)))
        .with_triangles(triangles.iter().copied());

    let mut mesh: Mesh = Mesh::new(Box::new(source));
    mesh.extract_data().unwrap();
    let expanded_len = mesh.expanded::<Positions>().unwrap().len();
    mesh.optimize().unwrap();
    let positions = mesh.channel::<Positions>().unwrap();

    let corner_indices: Vec<usize> = triangles.iter().flatten().copied().collect();
    TestResult::from_bool(
        expanded_len == 3 * triangles.len()
            && positions.len() == expanded_len
            && positions.pool().len() <= points
            && positions
                .iter()
                .zip(&corner_indices)
                .all(|(p, &i)| p.x == i as f64),
    )
}

#[quickcheck]
fn parallel_matches_sequential(raw: Vec<(u8, u8)>) -> bool {
    let normals: Vec<Vec4> = values(&raw)
        .iter()
        .map(|v| Vec4::new(v.x, v.y, 1.0, 0.0))
        .collect();
    let triangles = normals.len() / 3;
    let source = || {
        MemSource::new("n")
            .with_control_points([Vec4::new(0.0, 0.0, 0.0, 1.0)])
            .with_triangles(std::iter::repeat([0, 0, 0]).take(triangles))
            .with_normals(Layer::direct(
                MappingMode::PerPolygonVertex,
                normals[..triangles * 3].to_vec(),
            ))
    };
    let run = |parallel| {
        let mut mesh: Mesh = Mesh::new(Box::new(source()));
        mesh.extract_data().unwrap();
        mesh.optimize_with(OptimizeOptions {
            dedup: Dedup::Hashed,
            parallel,
        })
        .unwrap();
        mesh.channel::<Normals>().cloned()
    };
    run(true) == run(false)
}

#[test]
fn worked_example() {
    let tex_coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .map(|(u, v)| Vec2::new(u, v));
    let welded = weld(&tex_coords, Dedup::Hashed);
    assert_eq!(
        welded.pool(),
        &[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0)
        ]
    );
    assert_eq!(welded.indices(), &[0, 1, 2, 0, 2, 3]);

    let source = MemSource::new("quad")
        .with_control_points([0.0, 1.0, 2.0, 3.0].map(|x| Vec4::new(x, 0.0, 0.0, 1.0)))
        .with_triangles([[0, 1, 2], [0, 2, 3]])
        .with_tex_coords(Layer::direct(
            MappingMode::PerPolygonVertex,
            tex_coords.to_vec(),
        ));
    let mut mesh: Mesh = Mesh::new(Box::new(source));
    mesh.extract_data().unwrap();
    mesh.optimize().unwrap();
    assert_eq!(mesh.channel::<TexCoords>(), Some(&welded));
    assert_eq!(mesh.attribute::<TexCoords>(5), Ok(&Vec2::new(0.0, 1.0)));
}
