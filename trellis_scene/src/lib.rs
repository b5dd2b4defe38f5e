// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a Kurbo-native retained scene graph for 2D canvas drawing.
//!
//! A scene is a tree of nodes painted into a host drawing context once per
//! frame. Nodes carry their own property store and optional lifecycle hooks;
//! bounded nodes are aligned inside their parent's content region; a pointer
//! can follow input and be painted on top of everything.
//!
//! - Represents a hierarchy of aligned boxes with padding, offsets, and text anchoring.
//! - Runs a two-phase frame: an update pass that re-lays out the tree, then a render pass in paint order.
//! - Scopes shared state to siblings: hooks see their own store and their direct parent's, nothing else.
//!
//! ## Not a layout engine
//!
//! Each bounded node has a fixed size and is placed by alignment alone
//! (top/middle/bottom, left/center/right) inside its parent's region. There is
//! no measurement pass, no flex, and no wrapping. Hooks may move a node by
//! changing its offset; the next update recomputes its bounds and those of its
//! children.
//!
//! ## API overview
//!
//! - [`Node`]: a property store with hooks. Build one with [`Node::leaf`],
//!   [`Node::bounded`], [`Node::text`] or [`Node::container`].
//! - [`Layout`]: the alignment state of bounded and composite nodes.
//! - [`Scene`]: the root container bound to a [`DrawContext`]; owns clear,
//!   resize, and the optional [`Pointer`].
//! - [`Animator`]: runs [`Scene::frame`] once per host frame through a
//!   [`FrameScheduler`].
//! - [`RecordingContext`] and [`ManualScheduler`]: headless implementations
//!   of the host traits.
//!
//! Hook failures never stop a frame. They are logged through the `log`
//! facade and collected in the returned [`FrameReport`].
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use trellis_scene::{
//!     DrawOp, HorizontalAlign, Node, NodeOptions, PropValue, RecordingContext, Scene,
//!     SceneOptions, VerticalAlign,
//! };
//!
//! let mut scene = Scene::new(
//!     RecordingContext::new(Size::new(300.0, 200.0)),
//!     SceneOptions::default(),
//! );
//!
//! // A centered panel whose children share a value through it.
//! let panel = Node::container(
//!     NodeOptions::sized(100.0, 100.0).aligned(VerticalAlign::Middle, HorizontalAlign::Center),
//! )?;
//! // Place the panel first so its children mount against its final region.
//! scene.add_child(panel);
//!
//! let mut marker = Node::bounded(NodeOptions::sized(10.0, 10.0))?;
//! marker.on_mount(|cx| {
//!     let at = cx.layout().map(|l| l.rendering_position()).unwrap_or_default();
//!     cx.set_parent_prop("marker", at);
//! });
//!
//! let mut label = Node::leaf();
//! label.on_render(|cx| {
//!     if let Some(at) = cx.parent_prop("marker").and_then(PropValue::as_point) {
//!         cx.ctx().fill_text("here", at);
//!     }
//!     Ok(())
//! });
//!
//! scene.children_mut()[0].add_children([marker, label])?;
//!
//! let report = scene.frame();
//! assert!(report.is_ok());
//!
//! let panel = scene.children()[0].layout().unwrap();
//! assert_eq!(panel.rendering_position(), Point::new(100.0, 50.0));
//! assert!(
//!     scene
//!         .context()
//!         .ops()
//!         .contains(&DrawOp::FillText("here".into(), Point::new(100.0, 50.0)))
//! );
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animator;
mod context;
pub mod defaults;
mod error;
mod layout;
mod node;
mod paint;
mod pointer;
mod props;
mod scene;
mod tree;
mod types;

pub use animator::{
    Animator, AnimatorHandle, FrameCallback, FrameId, FrameScheduler, ManualScheduler,
};
pub use context::{DrawContext, DrawOp, RecordingContext, TextAlign, TextBaseline, TextMeasure};
pub use error::{
    ConfigurationError, FailureSite, FrameReport, HookError, HookFailure, Phase, StateError,
};
pub use layout::Layout;
pub use node::{Composite, MountHook, Node, NodeCx, NodeKind, PaintCx, RenderHook, UpdateHook};
pub use paint::{Color, CompositeOp, Font, FontWeight, PaintProps, PaintScope};
pub use pointer::{
    Motion, Pointer, PointerHandle, PointerOptions, PointerRenderHook, PointerUpdateHook,
};
pub use props::{PropValue, Props, keys};
pub use scene::{Scene, SceneOptions};
pub use types::{Anchor, HorizontalAlign, NodeFlags, NodeOptions, VerticalAlign};
