use fsmink_core::shapes::{NodeId, ShapeId};
use fsmink_core::{Scene, SceneConfig};
use kurbo::{Point, Rect};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddNode { x: i16, y: i16 },
    Connect { a: u16, b: u16 },
    RemoveNode { idx: u16 },
    RemoveEdge { idx: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode { x, y }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::Connect { a, b }),
        any::<u16>().prop_map(|idx| Op::RemoveNode { idx }),
        any::<u16>().prop_map(|idx| Op::RemoveEdge { idx }),
    ]
}

fn node_ids(scene: &Scene) -> Vec<NodeId> {
    scene.nodes().map(|node| node.id()).collect()
}

fn apply_op(scene: &mut Scene, op: Op) {
    match op {
        Op::AddNode { x, y } => {
            scene.create_node(Point::new(f64::from(x) * 0.1, f64::from(y) * 0.1));
        }
        Op::Connect { a, b } => {
            let ids = node_ids(scene);
            if ids.is_empty() {
                return;
            }
            let u = ids[a as usize % ids.len()];
            let v = ids[b as usize % ids.len()];
            let _ = scene.connect(u, v);
        }
        Op::RemoveNode { idx } => {
            let ids = node_ids(scene);
            if ids.is_empty() {
                return;
            }
            scene.remove_node(ids[idx as usize % ids.len()]);
        }
        Op::RemoveEdge { idx } => {
            let ids: Vec<_> = scene.edges().map(|edge| edge.id()).collect();
            if ids.is_empty() {
                return;
            }
            scene.remove_edge(ids[idx as usize % ids.len()]);
        }
    }
}

fn assert_incidence(scene: &Scene) {
    for node in scene.nodes() {
        for edge in node.edges() {
            let edge = scene.edge(edge).expect("incident edge exists");
            assert!(edge.touches(node.id()));
        }
    }
    for edge in scene.edges() {
        for endpoint in [edge.u, edge.v].into_iter().flatten() {
            let node = scene.node(endpoint).expect("endpoint exists");
            assert!(node.has_edge(edge.id()));
        }
    }
}

proptest! {
    #[test]
    fn incidence_stays_consistent(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut scene = Scene::new(SceneConfig::default());
        for op in ops {
            apply_op(&mut scene, op);
            assert_incidence(&scene);
        }
    }

    #[test]
    fn removing_node_removes_exactly_its_edges(ops in prop::collection::vec(op_strategy(), 1..60), pick in any::<u16>()) {
        let mut scene = Scene::new(SceneConfig::default());
        for op in ops {
            apply_op(&mut scene, op);
        }
        let ids = node_ids(&scene);
        prop_assume!(!ids.is_empty());
        let target = ids[pick as usize % ids.len()];
        let incident = scene.node(target).map_or(0, |node| node.edge_count());
        let before = scene.edge_count();

        scene.remove_node(target);
        prop_assert_eq!(scene.edge_count(), before - incident);
        prop_assert!(scene.edges().all(|edge| !edge.touches(target)));
    }

    #[test]
    fn full_canvas_box_selects_everything(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut scene = Scene::new(SceneConfig::default());
        for op in ops {
            apply_op(&mut scene, op);
        }
        let picked = scene.box_select(Rect::new(-10_000.0, -10_000.0, 10_000.0, 10_000.0));
        prop_assert_eq!(picked.len(), scene.node_count() + scene.edge_count());
    }
}

#[test]
fn zero_area_box_selects_nothing() {
    let mut scene = Scene::new(SceneConfig::default());
    let a = scene.create_node(Point::new(100.0, 100.0));
    let b = scene.create_node(Point::new(300.0, 100.0));
    scene.connect(a, b).unwrap();
    assert!(scene.box_select(Rect::new(200.0, 200.0, 200.0, 200.0)).is_empty());
    assert!(scene.box_select(Rect::new(100.0, 100.0, 100.0, 100.0)).is_empty());
    assert!(scene.box_select(Rect::new(100.0, 0.0, 100.0, 400.0)).is_empty());
    assert_eq!(
        scene.box_select(Rect::new(100.0, 100.0, 101.0, 101.0)),
        vec![ShapeId::Node(a)]
    );
    assert!(!scene.selection().is_empty());
}
