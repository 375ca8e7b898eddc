use selkie::{Bounds, Edge, Graph, Node, Outcome, Simulation, SimulationOptions};

fn distance(sim: &Simulation, a: &str, b: &str) -> f64 {
    let pa = sim.position(a).unwrap();
    let pb = sim.position(b).unwrap();
    ((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt()
}

#[test]
fn linked_pair_settles_near_the_rest_length() {
    // Two nodes 200 apart joined by a spring with rest length 80. Fifty
    // steps are plenty for the pair distance to relax onto the spring's
    // rest length (the weak centering term drags the equilibrium a couple
    // of units under 80).
    let graph = Graph {
        nodes: vec![Node::new("a").at(0.0, 0.0), Node::new("b").at(200.0, 0.0)],
        edges: vec![Edge::new("a", "b")],
    };
    let mut sim = Simulation::new(
        &graph,
        Bounds::new(800.0, 800.0),
        SimulationOptions::default(),
    )
    .unwrap();

    for _ in 0..50 {
        sim.step();
        for p in sim.positions().values() {
            assert!((50.0..=750.0).contains(&p.x));
            assert!((50.0..=750.0).contains(&p.y));
        }
    }

    let d = distance(&sim, "a", "b");
    assert!(
        (d - 80.0).abs() < 5.0,
        "pair distance {d} not within 5 of the rest length"
    );
}

#[test]
fn unlinked_nodes_spread_apart() {
    // Five nodes, no edges: repulsion against centering must leave every
    // pair clearly separated once the run cools.
    let graph = Graph {
        nodes: vec![
            Node::new("a").at(120.0, 110.0),
            Node::new("b").at(650.0, 130.0),
            Node::new("c").at(300.0, 420.0),
            Node::new("d").at(580.0, 470.0),
            Node::new("e").at(400.0, 250.0),
        ],
        edges: vec![],
    };
    let mut sim = Simulation::new(
        &graph,
        Bounds::new(800.0, 600.0),
        SimulationOptions::default(),
    )
    .unwrap();
    sim.run();
    assert_eq!(sim.outcome(), Some(Outcome::Converged));

    let ids = ["a", "b", "c", "d", "e"];
    let mut min = f64::INFINITY;
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            min = min.min(distance(&sim, a, b));
        }
    }
    assert!(min > 25.0, "closest pair ended up only {min} apart");
}

#[test]
fn single_node_follows_the_damped_integration_law() {
    let graph = Graph {
        nodes: vec![Node::new("only").at(100.0, 100.0)],
        edges: vec![],
    };
    let mut sim = Simulation::new(
        &graph,
        Bounds::new(800.0, 800.0),
        SimulationOptions::default(),
    )
    .unwrap();

    // Step 1: the only force is centering toward (400, 400).
    let f1 = 0.005 * (400.0 - 100.0);
    let v1 = (0.0 + f1) * 0.6;
    let x1 = 100.0 + v1;
    sim.step();
    let p = sim.position("only").unwrap();
    assert!((p.x - x1).abs() < 1e-12, "x after one step: {}", p.x);
    assert!((p.y - x1).abs() < 1e-12);

    // Step 2: velocity carries over before damping applies again.
    let f2 = 0.005 * 0.98 * (400.0 - x1);
    let v2 = (v1 + f2) * 0.6;
    let x2 = x1 + v2;
    sim.step();
    let p = sim.position("only").unwrap();
    assert!((p.x - x2).abs() < 1e-12, "x after two steps: {}", p.x);
}

#[test]
fn clamp_holds_under_violent_repulsion() {
    let graph = Graph {
        nodes: vec![
            Node::new("a").at(399.0, 300.0),
            Node::new("b").at(401.0, 300.0),
        ],
        edges: vec![],
    };
    let options = SimulationOptions {
        repulsion_strength: 1_000_000.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(&graph, Bounds::new(800.0, 600.0), options).unwrap();

    for _ in 0..20 {
        sim.step();
        for p in sim.positions().values() {
            assert!((50.0..=750.0).contains(&p.x), "x escaped the region: {}", p.x);
            assert!((50.0..=550.0).contains(&p.y), "y escaped the region: {}", p.y);
        }
    }
    // The kick was big enough to pin both nodes to the walls on step one.
    let mut sim2 = Simulation::new(
        &graph,
        Bounds::new(800.0, 600.0),
        SimulationOptions {
            repulsion_strength: 1_000_000.0,
            ..Default::default()
        },
    )
    .unwrap();
    sim2.step();
    assert_eq!(sim2.position("a").unwrap().x, 50.0);
    assert_eq!(sim2.position("b").unwrap().x, 750.0);
}
