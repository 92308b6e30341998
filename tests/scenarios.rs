//! The six numbered end-to-end scenarios from the spec: triangulate,
//! decompose, query visibility, find a path, and round-trip a couple of
//! commands through `Undo`, all driven through the public crate API
//! rather than any single module's internals.

use planar_edge_mesh::commands::{AddOuterFace, Command, InsertVerts};
use planar_edge_mesh::geom::{pt, Polygon};
use planar_edge_mesh::shape_splitter::convexify;
use planar_edge_mesh::triangulator::triangulate;
use planar_edge_mesh::visibility::get_visible_points;
use planar_edge_mesh::{EdgeMesh, PathFinder};

fn square() -> Polygon {
    Polygon::new(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)])
}

fn l_shape() -> Polygon {
    Polygon::new(vec![pt(0.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(10.0, 10.0), pt(10.0, 20.0), pt(0.0, 20.0)])
}

/// Rotates `pts` so it starts at the point equal to `start`, trying both
/// directions -- "up to rotation (and up to reversal if CCW)" per §8.
fn polygon_matches_up_to_rotation_and_reversal(got: &[planar_edge_mesh::geom::Pt2], want: &[planar_edge_mesh::geom::Pt2]) -> bool {
    if got.len() != want.len() {
        return false;
    }
    let n = got.len();
    let mut reversed = want.to_vec();
    reversed.reverse();
    for candidate in [want.to_vec(), reversed] {
        for shift in 0..n {
            let rotated: Vec<_> = (0..n).map(|i| candidate[(i + shift) % n]).collect();
            if rotated == got {
                return true;
            }
        }
    }
    false
}

/// Scenario 1: a square triangulates into two faces which
/// `dissolve_redundant_edges` merges back into one, recovering the
/// original boundary up to rotation.
#[test]
fn scenario_1_square_split_and_redissolve() {
    let mut mesh = triangulate(&square(), &[]).unwrap();
    assert_eq!(mesh.faces().count(), 2);

    mesh.dissolve_redundant_edges();
    mesh.update();

    assert_eq!(mesh.faces().count(), 1);
    let outer = mesh.get_outer_polygon();
    assert!(polygon_matches_up_to_rotation_and_reversal(&outer.points, &square().points));
}

/// Scenario 2: the L-shape decomposes into exactly two convex faces
/// sharing one edge between (10,10) and a notch corner.
#[test]
fn scenario_2_concave_decomposition() {
    let mut mesh = single_face_mesh(&l_shape());
    let face = mesh.faces().next().unwrap().0;
    convexify(&mut mesh, face).unwrap();
    mesh.update();

    assert_eq!(mesh.faces().count(), 2);
    for (_, f) in mesh.faces() {
        let pts = mesh.point_loop(f.edge);
        assert!(is_convex_ccw(&pts), "every face produced by convexify should be convex");
    }

    let shared: Vec<_> = mesh.edges().filter(|(_, e)| e.twin.is_some()).collect();
    assert_eq!(shared.len(), 2, "exactly one shared edge (both its half-edges) between the two faces");
    let a = mesh.vert(shared[0].1.vert).unwrap().pos;
    let b_edge_next = mesh.edge(shared[0].1.next).unwrap();
    let b = mesh.vert(b_edge_next.vert).unwrap().pos;
    let at_1010 = |p: planar_edge_mesh::geom::Pt2| (p.x - 10.0).abs() < 1e-9 && (p.y - 10.0).abs() < 1e-9;
    assert!(at_1010(a) || at_1010(b), "the bridge should touch the reflex vertex (10,10)");
}

/// Scenario 3: from (2,18) inside the L, the far corner (20,0) is
/// occluded by the notch while the near boundary verts are visible.
#[test]
fn scenario_3_visibility_in_l() {
    let mut mesh = single_face_mesh(&l_shape());
    let face = mesh.faces().next().unwrap().0;
    convexify(&mut mesh, face).unwrap();
    mesh.update();

    let visible = get_visible_points(&mesh, pt(2.0, 18.0));
    let visible_pts: Vec<_> = visible.iter().map(|&v| mesh.vert(v).unwrap().pos).collect();

    let contains = |p: planar_edge_mesh::geom::Pt2| visible_pts.iter().any(|&q| (q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9);

    assert!(!contains(pt(20.0, 0.0)), "(20,0) is hidden behind the notch");
    assert!(contains(pt(0.0, 0.0)));
    assert!(contains(pt(10.0, 10.0)));
    assert!(contains(pt(10.0, 20.0)));
    assert!(contains(pt(0.0, 20.0)));
}

/// Scenario 4: the shortest path from (2,18) to (18,2) detours through
/// the reflex vertex (10,10), with length 16*sqrt(2).
#[test]
fn scenario_4_shortest_path_in_l() {
    let mut mesh = single_face_mesh(&l_shape());
    let face = mesh.faces().next().unwrap().0;
    convexify(&mut mesh, face).unwrap();
    mesh.update();

    let mut finder = PathFinder::new(&mesh, pt(2.0, 18.0), pt(18.0, 2.0));
    finder.go();
    assert!(finder.is_finished());

    let expected_len = 16.0 * std::f64::consts::SQRT_2;
    assert!((finder.get_length() - expected_len).abs() < 1e-6, "got {}, want {}", finder.get_length(), expected_len);

    let path = finder.get_path();
    assert_eq!(path.len(), 3);
    assert!((path[0].x - 18.0).abs() < 1e-9 && (path[0].y - 2.0).abs() < 1e-9 || (path[0].x - 2.0).abs() < 1e-9 && (path[0].y - 18.0).abs() < 1e-9);
    let midpoint = path[1];
    assert!((midpoint.x - 10.0).abs() < 1e-9 && (midpoint.y - 10.0).abs() < 1e-9);
}

/// Scenario 5: inserting a vert at the midpoint of each square edge,
/// then undoing each in reverse order, restores the original mesh.
#[test]
fn scenario_5_insert_undo_round_trip() {
    let mut mesh = square_face_mesh();
    let vert_count_before = mesh.verts().count();
    let face_count_before = mesh.faces().count();
    let outer_before = mesh.get_outer_polygon();

    let edges: Vec<_> = mesh.face(mesh.faces().next().unwrap().0).unwrap().edges.clone();
    let mut cmds: Vec<InsertVerts> = Vec::new();
    for &e in &edges {
        let edge = mesh.edge(e).unwrap();
        let a = mesh.vert(edge.vert).unwrap().pos;
        let b = mesh.vert(mesh.edge(edge.next).unwrap().vert).unwrap().pos;
        let mid = pt((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let mut cmd = InsertVerts::new(e, vec![mid]);
        cmd.do_cmd(&mut mesh).unwrap();
        cmds.push(cmd);
    }

    mesh.update();
    assert_eq!(mesh.verts().count(), vert_count_before + edges.len());

    for mut cmd in cmds.into_iter().rev() {
        cmd.undo(&mut mesh);
    }
    mesh.update();

    assert_eq!(mesh.verts().count(), vert_count_before);
    assert_eq!(mesh.faces().count(), face_count_before);
    let outer_after = mesh.get_outer_polygon();
    assert!(polygon_matches_up_to_rotation_and_reversal(&outer_after.points, &outer_before.points));
}

/// Scenario 6: extending the square with a triangular outer face grows
/// the boundary to a hexagon; `Undo` restores the square exactly.
#[test]
fn scenario_6_add_outer_face_then_undo() {
    let mut mesh = square_face_mesh();
    let v00 = find_vert_at(&mesh, pt(0.0, 0.0));
    let v1010 = find_vert_at(&mesh, pt(10.0, 10.0));
    let start = mesh.find_outer_edge_with_vert(v00).unwrap();
    let end = mesh.find_outer_edge_with_vert(v1010).unwrap();

    let mut cmd = AddOuterFace::oriented(&mesh, start, end, vec![pt(5.0, 15.0)]).unwrap();
    cmd.do_cmd(&mut mesh).unwrap();
    mesh.update();

    assert_eq!(mesh.faces().count(), 2);
    let outer = mesh.get_outer_polygon();
    assert_eq!(outer.points.len(), 6, "boundary should become a hexagon");

    cmd.undo(&mut mesh);
    mesh.update();

    assert_eq!(mesh.faces().count(), 1);
    let outer = mesh.get_outer_polygon();
    assert!(polygon_matches_up_to_rotation_and_reversal(&outer.points, &square().points));
}

// -- Shared fixtures ----------------------------------------------------

fn single_face_mesh(poly: &Polygon) -> EdgeMesh {
    use planar_edge_mesh::edge::Edge;
    use planar_edge_mesh::face::Face;
    use planar_edge_mesh::{EdgeId, FaceId};

    let mut mesh = EdgeMesh::empty();
    let verts: Vec<_> = poly.points.iter().map(|&p| mesh.add_vert(p)).collect();
    let n = verts.len();
    let ids: Vec<EdgeId> = (0..n).map(EdgeId).collect();
    for i in 0..n {
        let prev = ids[(i + n - 1) % n];
        let next = ids[(i + 1) % n];
        mesh.push_edge(Edge { id: ids[i], vert: verts[i], face: FaceId(0), prev, next, twin: None });
    }
    mesh.push_face(Face::new(FaceId(0), ids[0], ids.clone()));
    mesh.update();
    mesh
}

fn square_face_mesh() -> EdgeMesh {
    single_face_mesh(&square())
}

fn find_vert_at(mesh: &EdgeMesh, p: planar_edge_mesh::geom::Pt2) -> planar_edge_mesh::VertId {
    mesh.verts().find(|(_, v)| (v.pos.x - p.x).abs() < 1e-9 && (v.pos.y - p.y).abs() < 1e-9).map(|(id, _)| id).unwrap()
}

fn is_convex_ccw(pts: &[planar_edge_mesh::geom::Pt2]) -> bool {
    let n = pts.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let c = pts[(i + 2) % n];
        planar_edge_mesh::geom::turn_sign(a, b, c) >= -1e-9
    })
}
