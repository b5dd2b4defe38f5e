// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: root container, drawing context, and optional pointer.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Size;

use crate::context::DrawContext;
use crate::defaults;
use crate::error::{FailureSite, FrameReport, Phase, StateError};
use crate::layout::Layout;
use crate::node::{Composite, Node};
use crate::paint::Color;
use crate::pointer::PointerHandle;
use crate::props::{PropValue, Props, keys};

/// Construction options for a [`Scene`].
#[derive(Clone, Debug, Default)]
pub struct SceneOptions {
    /// Inset of the root content region from the surface edges.
    pub padding: f64,
    /// Fill color painted before each frame. Transparent clear when `None`.
    pub background: Option<Color>,
}

/// Root of a scene graph, bound to one drawing context.
///
/// The root region always spans the whole surface. Children added to the
/// scene are aligned inside it (minus padding), and shared keys set on the
/// scene propagate down like any other container's.
#[derive(Debug)]
pub struct Scene<C: DrawContext> {
    props: Props,
    root: Composite,
    context: C,
    background: Option<Color>,
    pointer: Option<PointerHandle>,
}

impl<C: DrawContext> Scene<C> {
    /// Create a scene covering the whole surface of `context`.
    pub fn new(mut context: C, options: SceneOptions) -> Self {
        let size = context.surface_size();
        let mut layout = Layout::fixed(size, options.padding);
        layout.set_bounds(size.to_rect());
        apply_text_defaults(&mut context);
        Self {
            props: Props::new(),
            root: Composite::new(layout),
            context,
            background: options.background,
            pointer: None,
        }
    }

    /// Attach `child` to the root.
    pub fn add_child(&mut self, child: Node) {
        self.root.attach(&mut self.props, child);
    }

    /// Attach each of `children` to the root, in order.
    pub fn add_children(&mut self, children: impl IntoIterator<Item = Node>) {
        for child in children {
            self.add_child(child);
        }
    }

    /// Top-level nodes in paint order.
    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    /// Mutable access to the top-level nodes.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.root.children
    }

    /// Geometry of the root region.
    pub fn layout(&self) -> &Layout {
        &self.root.layout
    }

    /// The scene's shared store.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Value under `key` in the scene's shared store.
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Store `value` under `key` in the scene's shared store.
    pub fn set_prop(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        self.props.set(key, value);
    }

    /// Add `key` to the keys the root copies down to its children.
    pub fn share_key(&mut self, key: impl Into<Cow<'static, str>>) {
        let key = key.into();
        if !self.root.shared.contains(&key) {
            self.root.shared.push(key);
        }
    }

    /// The drawing context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable drawing context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Current surface size.
    pub fn size(&self) -> Size {
        self.context.surface_size()
    }

    /// Resize the surface and lay the tree out against it.
    ///
    /// Runs one update pass before returning.
    pub fn resize(&mut self, width: f64, height: f64) -> FrameReport {
        let size = Size::new(width, height);
        self.context.set_surface_size(size);
        apply_text_defaults(&mut self.context);
        self.root.layout.set_size(size);
        self.root.layout.set_bounds(size.to_rect());
        log::debug!("scene resized to {width}x{height}");
        self.update()
    }

    /// Attach `pointer`, returning the one it replaces.
    ///
    /// The handle is published under [`keys::POINTER`]. Nodes that already
    /// hold a pointer keep it; only nodes without one pick up the new handle.
    ///
    /// A pointer belongs to one scene at a time. Attaching a pointer another
    /// scene holds fails with [`StateError::PointerAlreadyAttached`];
    /// re-attaching this scene's own pointer does nothing.
    pub fn attach_pointer(
        &mut self,
        pointer: PointerHandle,
    ) -> Result<Option<PointerHandle>, StateError> {
        if self
            .pointer
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &pointer))
        {
            return Ok(None);
        }
        if pointer.borrow().is_attached() {
            return Err(StateError::PointerAlreadyAttached);
        }
        pointer.borrow_mut().set_attached(true);
        self.props.set(keys::POINTER, pointer.clone());
        log::debug!("pointer attached");
        let previous = self.pointer.replace(pointer);
        if let Some(previous) = &previous {
            previous.borrow_mut().set_attached(false);
        }
        Ok(previous)
    }

    /// Detach the pointer and unpublish it.
    pub fn detach_pointer(&mut self) -> Option<PointerHandle> {
        self.props.remove(keys::POINTER);
        let previous = self.pointer.take();
        if let Some(pointer) = &previous {
            pointer.borrow_mut().set_attached(false);
            log::debug!("pointer detached");
        }
        previous
    }

    /// The attached pointer.
    pub fn pointer(&self) -> Option<&PointerHandle> {
        self.pointer.as_ref()
    }

    /// Forward an input sample to the attached pointer.
    pub fn set_pointer_target(&mut self, x: f64, y: f64) -> Result<(), StateError> {
        let pointer = self.pointer.as_ref().ok_or(StateError::PointerNotAttached)?;
        pointer.borrow_mut().set_target_position(x, y);
        Ok(())
    }

    /// Run the update pass: the pointer first, then the tree.
    pub fn update(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        if let Some(pointer) = &self.pointer {
            if let Err(error) = pointer.borrow_mut().update(&mut self.props) {
                report.record(Phase::Update, FailureSite::Pointer, error);
            }
        }
        let mut path = Vec::new();
        self.root
            .update_children(&mut self.props, &mut report, &mut path);
        report
    }

    /// Run the render pass: clear, the tree, then the pointer on top.
    pub fn render(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        let surface = self.context.surface_size().to_rect();
        match &self.background {
            Some(color) => {
                self.context.save();
                self.context.set_fill_color(color);
                self.context.fill_rect(surface);
                self.context.restore();
            }
            None => self.context.clear_rect(surface),
        }

        let mut path = Vec::new();
        self.root
            .render_children(&self.props, &mut self.context, &mut report, &mut path);

        if let Some(pointer) = &self.pointer {
            if let Err(error) = pointer.borrow_mut().render(&mut self.context) {
                report.record(Phase::Render, FailureSite::Pointer, error);
            }
        }
        report
    }

    /// Update then render.
    pub fn frame(&mut self) -> FrameReport {
        let mut report = self.update();
        report.merge(self.render());
        report
    }
}

impl<C: DrawContext> Drop for Scene<C> {
    fn drop(&mut self) {
        if let Some(pointer) = &self.pointer {
            // Release the pointer for other scenes.
            if let Ok(mut pointer) = pointer.try_borrow_mut() {
                pointer.set_attached(false);
            }
        }
    }
}

fn apply_text_defaults(ctx: &mut dyn DrawContext) {
    ctx.set_text_baseline(defaults::TEXT_BASELINE);
    ctx.set_text_align(defaults::TEXT_ALIGN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DrawOp, RecordingContext};
    use crate::error::HookError;
    use crate::pointer::{Motion, Pointer, PointerOptions};
    use crate::types::{HorizontalAlign, NodeOptions, VerticalAlign};
    use kurbo::{Point, Rect};

    fn headless(w: f64, h: f64) -> Scene<RecordingContext> {
        Scene::new(RecordingContext::new(Size::new(w, h)), SceneOptions::default())
    }

    fn centered(w: f64, h: f64) -> Node {
        Node::container(
            NodeOptions::sized(w, h).aligned(VerticalAlign::Middle, HorizontalAlign::Center),
        )
        .unwrap()
    }

    #[test]
    fn centered_container_in_scene() {
        let mut scene = headless(300.0, 200.0);
        scene.add_child(centered(100.0, 100.0));
        let layout = scene.children()[0].layout().unwrap();
        assert_eq!(
            layout.rendering_position(),
            Point::new(100.0, 50.0),
            "centered in the surface"
        );
    }

    #[test]
    fn new_applies_text_defaults() {
        let scene = headless(10.0, 10.0);
        assert_eq!(
            scene.context().ops(),
            &[
                DrawOp::TextBaseline(defaults::TEXT_BASELINE),
                DrawOp::TextAlign(defaults::TEXT_ALIGN),
            ],
            "base text state set on construction"
        );
    }

    #[test]
    fn resize_relays_out_existing_children() {
        let mut scene = headless(100.0, 100.0);
        scene.add_child(Node::bounded(NodeOptions::sized(300.0, 200.0)).unwrap());
        assert!(scene.resize(300.0, 200.0).is_ok(), "no hooks failed");
        assert_eq!(scene.size(), Size::new(300.0, 200.0), "surface resized");
        assert_eq!(
            scene.layout().inner_bounds(),
            Rect::new(0.0, 0.0, 300.0, 200.0),
            "root spans the new surface"
        );
        assert_eq!(
            scene.children()[0].layout().unwrap().inner_bounds(),
            Rect::new(0.0, 0.0, 300.0, 200.0),
            "child laid out against the new root region"
        );

        let mut centered_scene = scene;
        centered_scene.add_child(centered(100.0, 100.0));
        centered_scene.resize(500.0, 300.0);
        assert_eq!(
            centered_scene.children()[1]
                .layout()
                .unwrap()
                .rendering_position(),
            Point::new(200.0, 100.0),
            "centered child follows the resize"
        );
    }

    #[test]
    fn padding_insets_the_root_region() {
        let scene = Scene::new(
            RecordingContext::new(Size::new(100.0, 50.0)),
            SceneOptions {
                padding: 5.0,
                ..Default::default()
            },
        );
        assert_eq!(
            scene.layout().inner_bounds(),
            Rect::new(5.0, 5.0, 95.0, 45.0),
            "padding shrinks the root region on every side"
        );
    }

    #[test]
    fn pointer_target_requires_attachment() {
        let mut scene = headless(100.0, 100.0);
        assert_eq!(
            scene.set_pointer_target(1.0, 2.0),
            Err(StateError::PointerNotAttached),
            "no pointer yet"
        );

        let pointer = Pointer::default().into_handle();
        assert_eq!(
            scene.attach_pointer(pointer.clone()).map(|p| p.is_none()),
            Ok(true),
            "first attach"
        );
        assert_eq!(scene.set_pointer_target(1.0, 2.0), Ok(()), "now attached");
        scene.update();
        assert_eq!(
            scene.prop(keys::POINTER_POSITION).and_then(PropValue::as_point),
            Some(Point::new(1.0, 2.0)),
            "position published into the scene store"
        );
        assert_eq!(
            pointer.borrow().rendering_position(),
            Some(Point::new(1.0, 2.0)),
            "host handle sees the update"
        );

        assert!(scene.detach_pointer().is_some(), "detach returns the handle");
        assert!(scene.prop(keys::POINTER).is_none(), "pointer unpublished");
        assert_eq!(
            scene.set_pointer_target(0.0, 0.0),
            Err(StateError::PointerNotAttached),
            "detached again"
        );
    }

    #[test]
    fn children_inherit_the_attached_pointer() {
        let mut scene = headless(100.0, 100.0);
        scene.attach_pointer(Pointer::default().into_handle()).unwrap();
        scene.add_child(Node::leaf());
        assert!(
            scene.children()[0].props().pointer().is_some(),
            "pointer copied down on attach"
        );
    }

    #[test]
    fn background_fills_instead_of_clearing() {
        let mut scene = Scene::new(
            RecordingContext::new(Size::new(20.0, 10.0)),
            SceneOptions {
                background: Some(Color::named("navy")),
                ..Default::default()
            },
        );
        scene.context_mut().take_ops();
        scene.render();
        assert_eq!(
            scene.context().ops(),
            &[
                DrawOp::Save,
                DrawOp::FillColor(Color::named("navy")),
                DrawOp::FillRect(Rect::new(0.0, 0.0, 20.0, 10.0)),
                DrawOp::Restore,
            ],
            "background painted over the whole surface"
        );

        let mut plain = headless(20.0, 10.0);
        plain.context_mut().take_ops();
        plain.render();
        assert_eq!(
            plain.context().ops(),
            &[DrawOp::ClearRect(Rect::new(0.0, 0.0, 20.0, 10.0))],
            "no background clears to transparent"
        );
    }

    #[test]
    fn pointer_paints_last() {
        let mut scene = headless(100.0, 100.0);
        let mut node = Node::leaf();
        node.on_render(|cx| {
            cx.ctx().fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
            Ok(())
        });
        scene.add_child(node);
        let pointer = Pointer::default().into_handle();
        pointer.borrow_mut().initialise_position(50.0, 50.0);
        scene.attach_pointer(pointer).unwrap();

        scene.context_mut().take_ops();
        assert!(scene.frame().is_ok(), "frame ran cleanly");
        let ops = scene.context().ops();
        let rect_at = ops
            .iter()
            .position(|op| matches!(op, DrawOp::FillRect(_)))
            .unwrap();
        let arc_at = ops
            .iter()
            .position(|op| matches!(op, DrawOp::FillArc(_)))
            .unwrap();
        assert!(rect_at < arc_at, "pointer drawn above the tree");
        assert_eq!(scene.context().save_depth(), 0, "saves balanced");
    }

    #[test]
    fn pointer_failures_are_isolated() {
        let mut scene = headless(100.0, 100.0);
        let pointer = Pointer::default().into_handle();
        pointer
            .borrow_mut()
            .on_update(|_, _| Err(HookError::new("lost tracking")));
        scene.attach_pointer(pointer).unwrap();

        let mut node = Node::leaf();
        node.on_update(|cx| {
            cx.set_prop("ran", true);
            Ok(())
        });
        scene.add_child(node);

        let report = scene.update();
        assert_eq!(report.failures().len(), 1, "one failure recorded");
        assert_eq!(report.failures()[0].site, FailureSite::Pointer, "blamed on the pointer");
        assert_eq!(
            scene.children()[0].prop("ran").and_then(PropValue::as_bool),
            Some(true),
            "tree still updated"
        );
    }

    #[test]
    fn shared_keys_reach_children() {
        let mut scene = headless(100.0, 100.0);
        scene.share_key("theme");
        scene.set_prop("theme", "dark");
        scene.add_child(Node::leaf());
        assert_eq!(
            scene.children()[0].prop("theme").and_then(PropValue::as_text),
            Some("dark"),
            "scene keys propagate to top-level nodes"
        );
    }

    #[test]
    fn pointer_belongs_to_one_scene() {
        let pointer = Pointer::new(PointerOptions {
            motion: Motion::Smooth { factor: 0.5 },
            ..Default::default()
        })
        .into_handle();
        pointer.borrow_mut().initialise_position(0.0, 0.0);
        pointer.borrow_mut().set_target_position(100.0, 0.0);

        let mut first = headless(200.0, 200.0);
        let mut second = headless(200.0, 200.0);
        first.attach_pointer(pointer.clone()).unwrap();
        assert_eq!(
            second.attach_pointer(pointer.clone()).map(|p| p.is_none()),
            Err(StateError::PointerAlreadyAttached),
            "second scene refused"
        );
        assert!(second.pointer().is_none(), "refused pointer not kept");
        assert_eq!(
            first.attach_pointer(pointer.clone()).map(|p| p.is_none()),
            Ok(true),
            "re-attaching to the same scene is a no-op"
        );

        first.frame();
        second.frame();
        assert_eq!(
            pointer.borrow().rendering_position(),
            Some(Point::new(50.0, 0.0)),
            "stepped once per frame, not once per scene"
        );

        first.detach_pointer();
        assert!(!pointer.borrow().is_attached(), "detach releases the pointer");
        second.attach_pointer(pointer.clone()).unwrap();
        let other = Pointer::default().into_handle();
        let replaced = second.attach_pointer(other.clone()).unwrap();
        assert!(
            replaced.is_some_and(|p| Rc::ptr_eq(&p, &pointer)),
            "replacement returns the old pointer"
        );
        assert!(!pointer.borrow().is_attached(), "replacement releases it");

        drop(second);
        assert!(!other.borrow().is_attached(), "dropping the scene releases it");
        assert!(
            first.attach_pointer(other).is_ok(),
            "free to attach elsewhere"
        );
    }

    #[test]
    fn siblings_share_through_their_parent_only() {
        let mut writer = Node::leaf();
        writer.on_update(|cx| {
            cx.set_parent_prop("hovered", 3.0);
            Ok(())
        });
        let mut reader = Node::leaf();
        reader.on_update(|cx| {
            if let Some(seen) = cx.parent_prop("hovered").and_then(PropValue::as_number) {
                cx.set_prop("seen", seen);
            }
            Ok(())
        });
        let mut container = centered(50.0, 50.0);
        container.add_children([writer, reader]).unwrap();

        let mut scene = headless(100.0, 100.0);
        scene.add_child(container);
        assert!(scene.update().is_ok(), "no hooks failed");

        let container = &scene.children()[0];
        assert_eq!(
            container.children().unwrap()[1]
                .prop("seen")
                .and_then(PropValue::as_number),
            Some(3.0),
            "reader saw the write in the same tick"
        );
        assert_eq!(
            container.prop("hovered").and_then(PropValue::as_number),
            Some(3.0),
            "value lives in the parent's store"
        );
        assert!(scene.prop("hovered").is_none(), "scene store untouched");
    }
}
