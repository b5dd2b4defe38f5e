// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics.
//!
//! Build a small scene on a recording context, run a frame, resize, and
//! print what was drawn.
//!
//! Run:
//! - `cargo run -p trellis_demos --example scene_basics`

use kurbo::{Rect, Size, Vec2};
use trellis_scene::{
    Color, HorizontalAlign, Node, NodeOptions, PaintProps, RecordingContext, Scene, SceneOptions,
    VerticalAlign,
};

fn main() {
    let mut scene = Scene::new(
        RecordingContext::new(Size::new(300.0, 200.0)),
        SceneOptions {
            background: Some(Color::named("white")),
            ..Default::default()
        },
    );

    // A centered card with a padded body
    let mut card = Node::container(
        NodeOptions::sized(100.0, 100.0)
            .aligned(VerticalAlign::Middle, HorizontalAlign::Center)
            .padding(10.0),
    )
    .unwrap();
    card.on_render(|cx| {
        let frame = Rect::from_origin_size(cx.rendering_position(), cx.size());
        cx.ctx().stroke_rect(frame);
        Ok(())
    });

    // Drifts right by one pixel per frame
    let mut dot = Node::bounded(
        NodeOptions::sized(20.0, 20.0).paint(PaintProps {
            fill: Color::named("teal"),
            ..Default::default()
        }),
    )
    .unwrap();
    dot.on_update(|cx| {
        if let Some(layout) = cx.layout_mut() {
            layout.set_offset(layout.offset() + Vec2::new(1.0, 0.0));
        }
        Ok(())
    });
    dot.on_render(|cx| {
        let r = Rect::from_origin_size(cx.rendering_position(), cx.size());
        cx.ctx().fill_rect(r);
        Ok(())
    });

    card.add_child(dot).unwrap();
    scene.add_child(card);

    for _ in 0..3 {
        let report = scene.frame();
        assert!(report.is_ok(), "no hook failed");
    }
    let card = scene.children()[0].layout().unwrap();
    println!("card at {:?}, content {:?}", card.rendering_position(), card.inner_bounds());
    let dot = scene.children()[0].children().unwrap()[0].layout().unwrap();
    println!("dot at {:?}", dot.rendering_position());

    // Resizing relays out the tree without re-adding anything
    scene.resize(600.0, 400.0);
    let card = scene.children()[0].layout().unwrap();
    println!("after resize, card at {:?}", card.rendering_position());

    let ops = scene.context_mut().take_ops();
    println!("{} draw calls recorded", ops.len());
}
