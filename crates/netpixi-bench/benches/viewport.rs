use criterion::{Criterion, black_box, criterion_group, criterion_main};
use netpixi_bench::util;
use netpixi_events::{Event, EventListener};
use netpixi_graph::{
    NetworkView, RecordingSurface, Vec2, VertexIndex, ViewOptions, ViewportIndex, load_network,
};

fn options() -> ViewOptions {
    ViewOptions {
        width: 1000.0,
        aspect: 2.0,
        seed: Some(3),
        ..Default::default()
    }
}

fn view(vertex_count: usize, edge_count: usize) -> NetworkView<RecordingSurface> {
    let text = util::generate_synthetic_graph(vertex_count, edge_count, 5);
    let options = options();
    let network = load_network(text.as_bytes(), &options).unwrap();
    NetworkView::new(network, &options, RecordingSurface::new())
}

fn bench_build_index(c: &mut Criterion) {
    let view = view(10_000, 20_000);
    let bounds = view.camera().bounds();
    let mut network = view.network().clone();

    c.bench_function("build_viewport_index_10k", |b| {
        b.iter(|| black_box(ViewportIndex::build(network.vertices_mut(), bounds)))
    });
}

fn bench_drag_vertex(c: &mut Criterion) {
    let mut view = view(10_000, 20_000);
    let vertex = VertexIndex(0);
    let mut step = 0u32;

    c.bench_function("drag_vertex_across_canvas", |b| {
        b.iter(|| {
            step = (step + 37) % 1000;
            let to = Vec2::new(step as f64, 500.0 - step as f64 / 2.0);
            view.move_vertex(black_box(vertex), to);
        })
    });
}

fn bench_pan(c: &mut Criterion) {
    let mut view = view(10_000, 20_000);
    let mut offset = 0.0;

    c.bench_function("pan_away_and_back", |b| {
        b.iter(|| {
            offset = (offset + 13.0) % 200.0;
            view.handle_event(&Event::PointerDown { x: 0.0, y: 0.0 });
            view.handle_event(&Event::PointerMove {
                x: -offset,
                y: offset / 2.0,
            });
            view.handle_event(&Event::PointerMove { x: 0.0, y: 0.0 });
            view.handle_event(&Event::PointerUp);
        })
    });
}

criterion_group!(benches, bench_build_index, bench_drag_vertex, bench_pan);
criterion_main!(benches);
