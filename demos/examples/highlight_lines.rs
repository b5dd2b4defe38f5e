// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Highlight lines.
//!
//! A centered column of text lines with a highlight bar that eases toward
//! whichever line the pointer is over. The lines and the bar talk through
//! their shared parent's store; the pointer trails its input and sheds
//! shrinking particles. Frames are pumped by a manual scheduler over a
//! recording context, standing in for a browser.
//!
//! Run:
//! - `cargo run -p trellis_demos --example highlight_lines`

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use kurbo::{Arc, Point, Rect, Size, Vec2};
use trellis_scene::{
    Animator, Color, CompositeOp, Font, FontWeight, HorizontalAlign, ManualScheduler, Motion,
    Node, NodeOptions, PaintProps, Pointer, PointerOptions, PropValue, RecordingContext, Scene,
    SceneOptions, TextMeasure, VerticalAlign,
};

const ITEMS: [&str; 4] = ["Fell", "in Love", "with", "a Girl"];
const LINE_HEIGHT: f64 = 130.0;
const FONT_SIZE: f64 = 140.0;
const HIGHLIGHT_KEY: &str = "highlight_y";
const HIGHLIGHT_EASE: f64 = 0.07;
const MAX_PARTICLES: usize = 150;
const PALETTE: [&str; 3] = ["#C20F00", "#000000", "#ffffff"];

struct Particle {
    at: Point,
    velocity: Vec2,
    radius: f64,
    color: Color,
}

fn font() -> Font {
    Font::new("Amatic SC", FONT_SIZE).with_weight(FontWeight::Normal)
}

fn line(text: &str, index: usize, measure: &dyn TextMeasure) -> Node {
    let paint = PaintProps {
        line_width: 3.0,
        stroke: Color::named("black"),
        fill: Color::named("white"),
        ..Default::default()
    };
    let options = NodeOptions::default()
        .aligned(VerticalAlign::Top, HorizontalAlign::Center)
        .offset(Vec2::new(0.0, LINE_HEIGHT * index as f64))
        .paint(paint);
    let mut node = Node::text(text, LINE_HEIGHT, font(), measure, options).unwrap();
    node.on_update(|cx| {
        let Some(pointer) = cx.pointer() else {
            return Ok(());
        };
        let Some(target) = pointer.borrow().target_position() else {
            return Ok(());
        };
        let Some(layout) = cx.layout() else {
            return Ok(());
        };
        if layout.inner_bounds().contains(target) {
            let y = layout.offset().y;
            cx.set_parent_prop(HIGHLIGHT_KEY, y);
        }
        Ok(())
    });
    node.on_render(|cx| {
        let at = cx.rendering_position();
        let text = cx.text().unwrap_or_default().to_owned();
        cx.ctx().fill_text(&text, at);
        cx.ctx().stroke_text(&text, at);
        Ok(())
    });
    node
}

fn highlight(width: f64) -> Node {
    let paint = PaintProps {
        fill: Color::named("#000000"),
        composite: CompositeOp::SourceAtop,
        ..Default::default()
    };
    let mut node = Node::bounded(NodeOptions::sized(width, LINE_HEIGHT).paint(paint)).unwrap();
    node.on_mount(|cx| cx.set_parent_prop(HIGHLIGHT_KEY, 0.0));
    node.on_update(|cx| {
        let target = cx
            .parent_prop(HIGHLIGHT_KEY)
            .and_then(PropValue::as_number)
            .unwrap_or(0.0);
        if let Some(layout) = cx.layout_mut() {
            let mut offset = layout.offset();
            offset.y += (target - offset.y) * HIGHLIGHT_EASE;
            layout.set_offset(offset);
        }
        Ok(())
    });
    node.on_render(|cx| {
        let bar = Rect::from_origin_size(cx.rendering_position(), cx.size());
        cx.ctx().fill_rect(bar);
        Ok(())
    });
    node
}

fn particle_pointer() -> Pointer {
    let mut pointer = Pointer::new(PointerOptions {
        motion: Motion::Smooth { factor: 0.1 },
        paint: None,
        ..Default::default()
    });
    let particles: Rc<RefCell<Vec<Particle>>> = Rc::default();

    let spawned = Rc::clone(&particles);
    let mut count = 0_usize;
    pointer.on_update(move |target, current| {
        let next = Motion::Smooth { factor: 0.1 }.step(target, current);
        let mut particles = spawned.borrow_mut();
        if let Some(at) = next {
            if particles.len() < MAX_PARTICLES {
                // Golden-angle spread stands in for random directions.
                let angle = count as f64 * 2.399_963;
                particles.push(Particle {
                    at,
                    velocity: Vec2::from_angle(angle),
                    radius: 1.0 + (count % 11) as f64,
                    color: Color::new(PALETTE[count % PALETTE.len()]),
                });
                count += 1;
            }
        }
        for p in particles.iter_mut() {
            p.radius -= 0.05;
            p.at += p.velocity;
        }
        particles.retain(|p| p.radius >= 1.0);
        Ok(next)
    });

    pointer.on_render(move |ctx, _| {
        for p in particles.borrow().iter() {
            ctx.save();
            ctx.set_fill_color(&p.color);
            ctx.fill_arc(&Arc {
                center: p.at,
                radii: Vec2::new(p.radius, p.radius),
                start_angle: 0.0,
                sweep_angle: TAU,
                x_rotation: 0.0,
            });
            ctx.restore();
        }
        Ok(())
    });
    pointer
}

fn main() {
    let scheduler = Rc::new(ManualScheduler::new());
    let mut scene = Scene::new(
        RecordingContext::new(Size::new(1280.0, 720.0)),
        SceneOptions::default(),
    );

    let widest = ITEMS
        .iter()
        .map(|item| scene.context().measure_text(item, &font()))
        .fold(0.0, f64::max);
    let lines: Vec<Node> = ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| line(item, i, scene.context()))
        .collect();

    let mut column = Node::container(
        NodeOptions::sized(widest, LINE_HEIGHT * ITEMS.len() as f64)
            .aligned(VerticalAlign::Middle, HorizontalAlign::Center),
    )
    .unwrap();
    column.add_children(lines).unwrap();
    column.add_child(highlight(widest)).unwrap();
    scene.add_child(column);

    let animator = Animator::new(scene, Rc::clone(&scheduler));
    animator.start();

    let pointer = particle_pointer().into_handle();
    let mut attached = false;
    // Sweep the pointer down through the column, one sample per frame.
    for frame in 0..120 {
        let (x, y) = (640.0, 100.0 + frame as f64 * 4.0);
        let scene = animator.scene();
        if attached {
            scene.borrow_mut().set_pointer_target(x, y).unwrap();
        } else {
            pointer.borrow_mut().initialise_position(x, y);
            scene.borrow_mut().attach_pointer(Rc::clone(&pointer)).unwrap();
            attached = true;
        }
        scheduler.fire(frame as f64 * 16.7);

        if frame % 30 == 29 {
            let scene = scene.borrow();
            let column = &scene.children()[0];
            let bar = column.children().unwrap()[ITEMS.len()].layout().unwrap();
            println!(
                "frame {frame}: pointer {:?}, highlight y {:.1}",
                pointer.borrow().rendering_position().unwrap_or_default(),
                bar.offset().y,
            );
        }
    }

    animator.scene().borrow_mut().resize(800.0, 600.0);
    scheduler.fire(2004.0);
    animator.stop();
    println!("ran {} frames", animator.frame_count());
}
