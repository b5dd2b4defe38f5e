// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use trellis_scene::{
    HorizontalAlign, Node, NodeOptions, PaintProps, RecordingContext, Scene, SceneOptions,
    VerticalAlign,
};

const ALIGNMENTS: [(VerticalAlign, HorizontalAlign); 3] = [
    (VerticalAlign::Top, HorizontalAlign::Left),
    (VerticalAlign::Middle, HorizontalAlign::Center),
    (VerticalAlign::Bottom, HorizontalAlign::Right),
];

/// `rows` containers of `cols` animated boxes each, with mixed alignment.
fn gen_scene(rows: usize, cols: usize) -> Scene<RecordingContext> {
    let mut scene = Scene::new(
        RecordingContext::new(Size::new(1920.0, 1080.0)),
        SceneOptions::default(),
    );
    for r in 0..rows {
        let mut row = Node::container(
            NodeOptions::sized(1800.0, 40.0).offset(Vec2::new(0.0, r as f64 * 45.0)),
        )
        .unwrap();
        for c in 0..cols {
            let (v, h) = ALIGNMENTS[(r + c) % ALIGNMENTS.len()];
            let options = NodeOptions::sized(20.0, 20.0)
                .aligned(v, h)
                .offset(Vec2::new(c as f64 * 25.0, 0.0))
                .padding(2.0)
                .paint(PaintProps::default());
            let mut cell = Node::bounded(options).unwrap();
            cell.on_update(|cx| {
                if let Some(layout) = cx.layout_mut() {
                    let offset = layout.offset();
                    layout.set_offset(Vec2::new(offset.x, (offset.y + 1.0) % 10.0));
                }
                Ok(())
            });
            cell.on_render(|cx| {
                let r = Rect::from_origin_size(cx.rendering_position(), cx.size());
                cx.ctx().fill_rect(r);
                Ok(())
            });
            row.add_child(cell).unwrap();
        }
        scene.add_child(row);
    }
    scene
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &n in &[16usize, 32, 64] {
        let mut scene = gen_scene(n, n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("update_n{}", n), |b| {
            b.iter(|| black_box(scene.update()));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    for &n in &[16usize, 32, 64] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("frame_n{}", n), |b| {
            b.iter_batched(
                || gen_scene(n, n),
                |mut scene| {
                    let report = scene.frame();
                    black_box(report.is_ok());
                    black_box(scene.context().ops().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut scene = gen_scene(32, 32);
    let mut wide = false;
    c.bench_function("resize_n32", |b| {
        b.iter(|| {
            wide = !wide;
            let w = if wide { 1920.0 } else { 1280.0 };
            let report = scene.resize(w, 1080.0);
            scene.context_mut().take_ops();
            black_box(report)
        });
    });
}

criterion_group!(benches, bench_update, bench_frame, bench_resize);
criterion_main!(benches);
