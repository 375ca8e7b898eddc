use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use selkie::{Bounds, Edge, Graph, InitialPlacement, Node, Simulation, SimulationOptions};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct RunSpec {
    node_count: usize,
    fanout: usize,
}

impl RunSpec {
    fn build(&self) -> Simulation {
        let nodes: Vec<Node> = (0..self.node_count)
            .map(|i| Node::new(format!("n{i}")))
            .collect();

        // A spine plus a few forward edges per node, enough spring work to
        // keep the edge pass honest without dominating the pair loop.
        let mut edges: Vec<Edge> = Vec::new();
        for i in 0..self.node_count.saturating_sub(1) {
            edges.push(Edge::new(format!("n{i}"), format!("n{}", i + 1)));
        }
        for i in 0..self.node_count {
            for k in 2..=(self.fanout + 1) {
                let to = i + k;
                if to >= self.node_count {
                    break;
                }
                edges.push(Edge::new(format!("n{i}"), format!("n{to}")));
            }
        }

        let options = SimulationOptions {
            placement: InitialPlacement::Random,
            random_seed: 42,
            ..Default::default()
        };
        let graph = Graph { nodes, edges };
        Simulation::new(&graph, Bounds::new(1600.0, 1200.0), options)
            .expect("bench spec must construct")
    }
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("nodes_50", 50usize, 3usize),
        ("nodes_200", 200usize, 3usize),
        ("nodes_500", 500usize, 3usize),
    ];

    for (name, node_count, fanout) in cases {
        let spec = RunSpec { node_count, fanout };
        group.bench_with_input(BenchmarkId::new("simulation", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut sim| {
                    // Ten steps per sample amortize the setup clone; the
                    // O(n^2) pair loop dominates regardless.
                    for _ in 0..10 {
                        sim.step();
                    }
                    black_box(sim.alpha());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
