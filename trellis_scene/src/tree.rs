// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container protocol: attaching children and the two-phase traversal.
//!
//! Both passes walk the tree depth-first, pre-order, in insertion order.
//! Update recomputes each child's bounds against its parent's current content
//! region before descending, so grandchildren always see fresh parent bounds.
//! Render order is paint order: a child's whole subtree is painted before its
//! next sibling starts.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::context::DrawContext;
use crate::error::{FailureSite, FrameReport, Phase, StateError};
use crate::node::{Composite, Node, NodeKind};
use crate::props::Props;
use crate::types::NodeFlags;

impl Composite {
    /// Attach `child`: inherit shared keys, place it, mount it, append it.
    pub(crate) fn attach(&mut self, props: &mut Props, mut child: Node) {
        child.props.inherit(props, &self.shared);
        let outer = self.layout.inner_bounds();
        if let Some(layout) = child.kind.layout_mut() {
            layout.set_bounds(outer);
        }
        child.mount(props);
        self.children.push(child);
    }

    pub(crate) fn update_children(
        &mut self,
        props: &mut Props,
        report: &mut FrameReport,
        path: &mut Vec<usize>,
    ) {
        let outer = self.layout.inner_bounds();
        for (i, child) in self.children.iter_mut().enumerate() {
            path.push(i);
            child.props.inherit(props, &self.shared);
            if child.flags.contains(NodeFlags::ANIMATED) {
                if let Err(error) = child.run_update(props) {
                    report.record(Phase::Update, FailureSite::Node(path.clone()), error);
                }
            }
            if let Some(layout) = child.kind.layout_mut() {
                layout.set_bounds(outer);
            }
            if let NodeKind::Composite(composite) = &mut child.kind {
                composite.update_children(&mut child.props, report, path);
            }
            path.pop();
        }
    }

    pub(crate) fn render_children(
        &mut self,
        props: &Props,
        ctx: &mut dyn DrawContext,
        report: &mut FrameReport,
        path: &mut Vec<usize>,
    ) {
        for (i, child) in self.children.iter_mut().enumerate() {
            if !child.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            path.push(i);
            if let Err(error) = child.run_render(ctx, props) {
                report.record(Phase::Render, FailureSite::Node(path.clone()), error);
            }
            if let NodeKind::Composite(composite) = &mut child.kind {
                composite.render_children(&child.props, ctx, report, path);
            }
            path.pop();
        }
    }
}

impl Node {
    /// Append `child` to this composite node.
    ///
    /// The child inherits this node's shared keys where it has no value of its
    /// own, is placed against this node's content region, and has its mount
    /// hook run once.
    pub fn add_child(&mut self, child: Node) -> Result<(), StateError> {
        let Self { props, kind, .. } = self;
        let NodeKind::Composite(composite) = kind else {
            return Err(StateError::NotComposite);
        };
        composite.attach(props, child);
        Ok(())
    }

    /// Append each of `children` in order.
    pub fn add_children(
        &mut self,
        children: impl IntoIterator<Item = Node>,
    ) -> Result<(), StateError> {
        if !self.is_composite() {
            return Err(StateError::NotComposite);
        }
        for child in children {
            self.add_child(child)?;
        }
        Ok(())
    }

    /// Add `key` to the keys this composite copies down to its children.
    pub fn share_key(&mut self, key: impl Into<Cow<'static, str>>) -> Result<(), StateError> {
        let NodeKind::Composite(composite) = &mut self.kind else {
            return Err(StateError::NotComposite);
        };
        let key = key.into();
        if !composite.shared.contains(&key) {
            composite.shared.push(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DrawOp, RecordingContext};
    use crate::error::HookError;
    use crate::layout::Layout;
    use crate::paint::PaintProps;
    use crate::props::PropValue;
    use crate::types::{HorizontalAlign, NodeOptions, VerticalAlign};
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::{Point, Rect, Size, Vec2};

    type Trace = Rc<RefCell<Vec<String>>>;

    fn root(w: f64, h: f64) -> (Composite, Props) {
        let mut layout = Layout::fixed(Size::new(w, h), 0.0);
        layout.set_bounds(Rect::new(0.0, 0.0, w, h));
        (Composite::new(layout), Props::new())
    }

    fn traced(name: &'static str, trace: &Trace, children: Vec<Node>) -> Node {
        let mut node = Node::container(NodeOptions::sized(10.0, 10.0)).unwrap();
        let t = trace.clone();
        node.on_update(move |_| {
            t.borrow_mut().push(alloc::format!("update {name}"));
            Ok(())
        });
        let t = trace.clone();
        node.on_render(move |_| {
            t.borrow_mut().push(alloc::format!("render {name}"));
            Ok(())
        });
        node.add_children(children).unwrap();
        node
    }

    #[test]
    fn add_child_requires_a_composite() {
        let mut leaf = Node::leaf();
        assert_eq!(leaf.add_child(Node::leaf()), Err(StateError::NotComposite));
        assert_eq!(
            leaf.add_children([Node::leaf()]),
            Err(StateError::NotComposite)
        );
        assert_eq!(leaf.share_key("x"), Err(StateError::NotComposite));
    }

    #[test]
    fn attach_places_then_mounts_then_appends() {
        let options = NodeOptions::sized(100.0, 100.0)
            .aligned(VerticalAlign::Middle, HorizontalAlign::Center);
        let mut parent = Node::container(options).unwrap();
        parent
            .layout_mut()
            .unwrap()
            .set_bounds(Rect::new(0.0, 0.0, 300.0, 200.0));

        let mut child = Node::bounded(NodeOptions::sized(10.0, 10.0)).unwrap();
        child.on_mount(|cx| {
            let at = cx.layout().unwrap().rendering_position();
            cx.set_parent_prop("mounted_at", at);
        });
        parent.add_child(child).unwrap();

        assert_eq!(
            parent.prop("mounted_at").and_then(PropValue::as_point),
            Some(Point::new(100.0, 50.0)),
            "bounds are computed before the mount hook runs"
        );
        assert_eq!(parent.children().map(<[Node]>::len), Some(1));
    }

    #[test]
    fn shared_keys_are_copied_only_when_absent() {
        let mut parent = Node::container(NodeOptions::sized(10.0, 10.0)).unwrap();
        parent.share_key("theme").unwrap();
        parent.set_prop("theme", "dark");

        let mut own = Node::leaf();
        own.set_prop("theme", "light");
        parent.add_children([Node::leaf(), own]).unwrap();

        let children = parent.children().unwrap();
        assert_eq!(
            children[0].prop("theme").and_then(PropValue::as_text),
            Some("dark")
        );
        assert_eq!(
            children[1].prop("theme").and_then(PropValue::as_text),
            Some("light"),
            "propagation never overwrites"
        );
    }

    #[test]
    fn shared_keys_refresh_on_update() {
        let (mut root, mut props) = root(10.0, 10.0);
        root.shared.push(Cow::Borrowed("late"));
        root.attach(&mut props, Node::leaf());
        assert!(!root.children[0].props.contains("late"), "nothing to copy yet");

        props.set("late", 1.0);
        root.update_children(&mut props, &mut FrameReport::default(), &mut Vec::new());
        assert!(
            root.children[0].props.contains("late"),
            "values published after attach arrive on the next update"
        );
    }

    #[test]
    fn traversal_is_preorder_and_subtree_complete() {
        let trace: Trace = Rc::default();
        let a = traced(
            "a",
            &trace,
            vec![traced("a1", &trace, vec![traced("a1x", &trace, vec![])])],
        );
        let b = traced("b", &trace, vec![traced("b1", &trace, vec![])]);
        let c = traced("c", &trace, vec![]);

        let (mut root, mut props) = root(100.0, 100.0);
        for n in [a, b, c] {
            root.attach(&mut props, n);
        }

        let mut report = FrameReport::default();
        root.update_children(&mut props, &mut report, &mut Vec::new());
        let mut ctx = RecordingContext::new(Size::new(100.0, 100.0));
        root.render_children(&props, &mut ctx, &mut report, &mut Vec::new());
        assert!(report.is_ok(), "no hook failed");

        let expected = [
            "update a",
            "update a1",
            "update a1x",
            "update b",
            "update b1",
            "update c",
            "render a",
            "render a1",
            "render a1x",
            "render b",
            "render b1",
            "render c",
        ];
        assert_eq!(*trace.borrow(), expected);
    }

    #[test]
    fn children_see_parent_bounds_from_the_same_tick() {
        let (mut root, mut props) = root(100.0, 100.0);
        let mut parent = Node::container(NodeOptions::sized(50.0, 50.0)).unwrap();
        parent.on_update(|cx| {
            let layout = cx.layout_mut().unwrap();
            layout.set_offset(layout.offset() + Vec2::new(5.0, 0.0));
            Ok(())
        });
        let mut child = Node::bounded(NodeOptions::sized(10.0, 10.0)).unwrap();
        child.on_update(|cx| {
            let x = cx.layout().unwrap().rendering_position().x;
            cx.set_prop("x_before_place", x);
            Ok(())
        });
        parent.add_child(child).unwrap();
        root.attach(&mut props, parent);

        let mut report = FrameReport::default();
        root.update_children(&mut props, &mut report, &mut Vec::new());
        root.update_children(&mut props, &mut report, &mut Vec::new());

        let child = &root.children[0].children().unwrap()[0];
        assert_eq!(child.layout().unwrap().rendering_position().x, 10.0);
        assert_eq!(
            child.prop("x_before_place").and_then(PropValue::as_number),
            Some(5.0),
            "the child's own placement lags only by its own update"
        );
    }

    #[test]
    fn failures_are_isolated_and_reported() {
        let trace: Trace = Rc::default();
        let mut failing = Node::container(NodeOptions::sized(10.0, 10.0)).unwrap();
        failing.on_update(|_| Err(HookError::new("update broke")));
        failing.on_render(|_| Err(HookError::new("render broke")));
        failing.add_child(traced("inner", &trace, vec![])).unwrap();

        let (mut root, mut props) = root(100.0, 100.0);
        root.attach(&mut props, failing);
        root.attach(&mut props, traced("sibling", &trace, vec![]));

        let mut report = FrameReport::default();
        root.update_children(&mut props, &mut report, &mut Vec::new());
        let mut ctx = RecordingContext::new(Size::new(100.0, 100.0));
        root.render_children(&props, &mut ctx, &mut report, &mut Vec::new());

        assert_eq!(
            *trace.borrow(),
            ["update inner", "update sibling", "render inner", "render sibling"]
        );
        let failures = report.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].phase, Phase::Update);
        assert_eq!(failures[0].site, FailureSite::Node(vec![0]));
        assert_eq!(failures[1].phase, Phase::Render);
        assert_eq!(failures[1].error.message(), "render broke");
    }

    #[test]
    fn paint_scopes_wrap_only_declaring_nodes() {
        let mut painted = Node::bounded(
            NodeOptions::sized(10.0, 10.0).paint(PaintProps::default()),
        )
        .unwrap();
        painted.on_render(|cx| {
            let rect = cx.layout().unwrap().footprint();
            cx.ctx().fill_rect(rect);
            Err(HookError::new("after drawing"))
        });
        let mut plain = Node::bounded(NodeOptions::sized(10.0, 10.0)).unwrap();
        plain.on_render(|cx| {
            let rect = cx.layout().unwrap().footprint();
            cx.ctx().stroke_rect(rect);
            Ok(())
        });

        let (mut root, mut props) = root(100.0, 100.0);
        root.attach(&mut props, painted);
        root.attach(&mut props, plain);

        let mut ctx = RecordingContext::new(Size::new(100.0, 100.0));
        let mut report = FrameReport::default();
        root.render_children(&props, &mut ctx, &mut report, &mut Vec::new());

        let ops = ctx.ops();
        assert_eq!(ops.iter().filter(|op| **op == DrawOp::Save).count(), 1);
        assert_eq!(ctx.save_depth(), 0, "scope restored despite the failure");
        let restore_at = ops.iter().position(|op| *op == DrawOp::Restore).unwrap();
        let stroke_at = ops
            .iter()
            .position(|op| matches!(op, DrawOp::StrokeRect(_)))
            .unwrap();
        assert!(restore_at < stroke_at, "sibling paints outside the scope");
    }

    #[test]
    fn hidden_nodes_skip_render_and_paused_nodes_skip_update() {
        let trace: Trace = Rc::default();
        let mut hidden = traced("hidden", &trace, vec![traced("under", &trace, vec![])]);
        hidden.set_flags(NodeFlags::ANIMATED);
        let mut paused = traced("paused", &trace, vec![]);
        paused.set_flags(NodeFlags::VISIBLE);

        let (mut root, mut props) = root(100.0, 100.0);
        root.attach(&mut props, hidden);
        root.attach(&mut props, paused);

        let mut report = FrameReport::default();
        root.update_children(&mut props, &mut report, &mut Vec::new());
        let mut ctx = RecordingContext::new(Size::new(100.0, 100.0));
        root.render_children(&props, &mut ctx, &mut report, &mut Vec::new());

        assert_eq!(
            *trace.borrow(),
            ["update hidden", "update under", "render paused"]
        );
    }
}
