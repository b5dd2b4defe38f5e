// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nodes: property stores with per-instance lifecycle hooks.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::context::{DrawContext, TextMeasure};
use crate::error::{ConfigurationError, HookError};
use crate::layout::Layout;
use crate::paint::{Font, PaintProps, PaintScope};
use crate::pointer::PointerHandle;
use crate::props::{PropValue, Props, keys};
use crate::types::{Anchor, NodeFlags, NodeOptions};

/// Runs once, when the node is added to a container.
pub type MountHook = Box<dyn FnOnce(&mut NodeCx<'_>)>;
/// Runs every update pass.
pub type UpdateHook = Box<dyn FnMut(&mut NodeCx<'_>) -> Result<(), HookError>>;
/// Runs every render pass.
pub type RenderHook = Box<dyn FnMut(&mut PaintCx<'_>) -> Result<(), HookError>>;

#[derive(Default)]
struct Hooks {
    mount: Option<MountHook>,
    update: Option<UpdateHook>,
    render: Option<RenderHook>,
}

/// The shape of a node.
#[derive(Debug)]
pub enum NodeKind {
    /// No geometry and no children.
    Leaf,
    /// An aligned box.
    Bounded(Layout),
    /// An aligned box that owns children.
    Composite(Composite),
}

impl NodeKind {
    pub(crate) fn layout(&self) -> Option<&Layout> {
        match self {
            Self::Leaf => None,
            Self::Bounded(layout) => Some(layout),
            Self::Composite(c) => Some(&c.layout),
        }
    }

    pub(crate) fn layout_mut(&mut self) -> Option<&mut Layout> {
        match self {
            Self::Leaf => None,
            Self::Bounded(layout) => Some(layout),
            Self::Composite(c) => Some(&mut c.layout),
        }
    }
}

/// Geometry and children of a composite node.
pub struct Composite {
    pub(crate) layout: Layout,
    pub(crate) children: Vec<Node>,
    pub(crate) shared: Vec<Cow<'static, str>>,
}

impl Composite {
    pub(crate) fn new(layout: Layout) -> Self {
        Self {
            layout,
            children: Vec::new(),
            shared: vec![Cow::Borrowed(keys::POINTER)],
        }
    }

    /// The composite's own geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Children in insertion (and paint) order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Keys copied down to children that lack them.
    pub fn shared_keys(&self) -> impl Iterator<Item = &str> {
        self.shared.iter().map(|k| k.as_ref())
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("layout", &self.layout)
            .field("children", &self.children)
            .field("shared", &self.shared)
            .finish()
    }
}

/// A node in the scene tree.
///
/// Every node has its own [`Props`] store and up to one hook per lifecycle
/// phase. Hooks are plain closures owned by the instance; installing a hook
/// replaces the previous one.
pub struct Node {
    pub(crate) props: Props,
    hooks: Hooks,
    paint: Option<PaintProps>,
    pub(crate) flags: NodeFlags,
    pub(crate) kind: NodeKind,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("props", &self.props)
            .field("paint", &self.paint)
            .field("flags", &self.flags)
            .field("on_mount", &self.hooks.mount.is_some())
            .field("on_update", &self.hooks.update.is_some())
            .field("on_render", &self.hooks.render.is_some())
            .finish()
    }
}

impl Node {
    fn with_kind(kind: NodeKind, paint: Option<PaintProps>, flags: NodeFlags) -> Self {
        Self {
            props: Props::new(),
            hooks: Hooks::default(),
            paint,
            flags,
            kind,
        }
    }

    /// A node with no geometry and no children.
    pub fn leaf() -> Self {
        Self::with_kind(NodeKind::Leaf, None, NodeFlags::default())
    }

    /// A box-anchored node aligned inside its parent's content region.
    pub fn bounded(options: NodeOptions) -> Result<Self, ConfigurationError> {
        let layout = Layout::new(&options)?;
        Ok(Self::with_kind(
            NodeKind::Bounded(layout),
            options.paint,
            options.flags,
        ))
    }

    /// A text-anchored node sized to `text` in `font`.
    ///
    /// The width comes from `measure`; the height is `line_height`. Any size
    /// in `options` is ignored. The string is stored under [`keys::TEXT`] and
    /// `font` becomes part of the node's paint properties.
    pub fn text(
        text: &str,
        line_height: f64,
        font: Font,
        measure: &dyn TextMeasure,
        options: NodeOptions,
    ) -> Result<Self, ConfigurationError> {
        let width = measure.measure_text(text, &font);
        let mut options = NodeOptions {
            width: Some(width),
            height: Some(line_height),
            ..options
        };
        let mut paint = options.paint.take().unwrap_or_default();
        paint.font = font;
        let layout = Layout::new(&options)?.with_anchor(Anchor::Text);
        let mut node = Self::with_kind(NodeKind::Bounded(layout), Some(paint), options.flags);
        node.props.set(keys::TEXT, text);
        Ok(node)
    }

    /// A box-anchored node that owns children.
    pub fn container(options: NodeOptions) -> Result<Self, ConfigurationError> {
        let layout = Layout::new(&options)?;
        Ok(Self::with_kind(
            NodeKind::Composite(Composite::new(layout)),
            options.paint,
            options.flags,
        ))
    }

    /// The node's shape.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns true if the node can own children.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite(_))
    }

    /// Geometry, for bounded and composite nodes.
    pub fn layout(&self) -> Option<&Layout> {
        self.kind.layout()
    }

    /// Mutable geometry, for bounded and composite nodes.
    pub fn layout_mut(&mut self) -> Option<&mut Layout> {
        self.kind.layout_mut()
    }

    /// Children, for composite nodes.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Composite(c) => Some(&c.children),
            _ => None,
        }
    }

    /// Mutable children, for composite nodes.
    pub fn children_mut(&mut self) -> Option<&mut [Node]> {
        match &mut self.kind {
            NodeKind::Composite(c) => Some(&mut c.children),
            _ => None,
        }
    }

    /// The node's own store.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Value under `key` in the node's own store.
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Store `value` under `key` in the node's own store.
    pub fn set_prop(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        self.props.set(key, value);
    }

    /// Remove the value under `key` from the node's own store.
    pub fn remove_prop(&mut self, key: &str) -> Option<PropValue> {
        self.props.remove(key)
    }

    /// Declared paint properties.
    pub fn paint(&self) -> Option<&PaintProps> {
        self.paint.as_ref()
    }

    /// Replace the declared paint properties.
    pub fn set_paint(&mut self, paint: Option<PaintProps>) {
        self.paint = paint;
    }

    /// Phase participation flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Replace the phase participation flags.
    pub fn set_flags(&mut self, flags: NodeFlags) {
        self.flags = flags;
    }

    /// Install the mount hook.
    pub fn on_mount(&mut self, hook: impl FnOnce(&mut NodeCx<'_>) + 'static) -> &mut Self {
        self.hooks.mount = Some(Box::new(hook));
        self
    }

    /// Install the update hook.
    pub fn on_update(
        &mut self,
        hook: impl FnMut(&mut NodeCx<'_>) -> Result<(), HookError> + 'static,
    ) -> &mut Self {
        self.hooks.update = Some(Box::new(hook));
        self
    }

    /// Install the render hook.
    pub fn on_render(
        &mut self,
        hook: impl FnMut(&mut PaintCx<'_>) -> Result<(), HookError> + 'static,
    ) -> &mut Self {
        self.hooks.render = Some(Box::new(hook));
        self
    }

    /// Run the mount hook, if it has not run yet.
    pub(crate) fn mount(&mut self, parent: &mut Props) {
        let Some(hook) = self.hooks.mount.take() else {
            return;
        };
        let mut cx = NodeCx {
            props: &mut self.props,
            parent,
            layout: self.kind.layout_mut(),
        };
        hook(&mut cx);
    }

    pub(crate) fn run_update(&mut self, parent: &mut Props) -> Result<(), HookError> {
        let Self {
            props, hooks, kind, ..
        } = self;
        let Some(hook) = hooks.update.as_mut() else {
            return Ok(());
        };
        let mut cx = NodeCx {
            props,
            parent,
            layout: kind.layout_mut(),
        };
        hook(&mut cx)
    }

    pub(crate) fn run_render(
        &mut self,
        ctx: &mut dyn DrawContext,
        parent: &Props,
    ) -> Result<(), HookError> {
        let Self {
            props,
            hooks,
            paint,
            kind,
            ..
        } = self;
        let Some(hook) = hooks.render.as_mut() else {
            return Ok(());
        };
        let layout = kind.layout();
        match paint {
            Some(paint) => {
                let mut scope = PaintScope::open(ctx, paint);
                hook(&mut PaintCx {
                    ctx: &mut *scope,
                    props,
                    parent,
                    layout,
                })
            }
            None => hook(&mut PaintCx {
                ctx,
                props,
                parent,
                layout,
            }),
        }
    }
}

/// Context handed to mount and update hooks.
///
/// It borrows exactly two stores: the node's own and that of its direct
/// parent. Writes through [`set_parent_prop`](Self::set_parent_prop) are
/// therefore visible to siblings and to nothing further up the tree.
pub struct NodeCx<'a> {
    props: &'a mut Props,
    parent: &'a mut Props,
    layout: Option<&'a mut Layout>,
}

impl fmt::Debug for NodeCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCx")
            .field("props", &self.props)
            .field("parent", &self.parent)
            .field("layout", &self.layout)
            .finish()
    }
}

impl NodeCx<'_> {
    /// Value under `key` in the node's own store.
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Store `value` under `key` in the node's own store.
    pub fn set_prop(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        self.props.set(key, value);
    }

    /// Value under `key` in the parent's store.
    pub fn parent_prop(&self, key: &str) -> Option<&PropValue> {
        self.parent.get(key)
    }

    /// Store `value` under `key` in the parent's store.
    pub fn set_parent_prop(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<PropValue>,
    ) {
        self.parent.set(key, value);
    }

    /// The pointer propagated into this node, if any.
    pub fn pointer(&self) -> Option<PointerHandle> {
        self.props.pointer().cloned()
    }

    /// The node's geometry, for bounded and composite nodes.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_deref()
    }

    /// Mutable geometry, for bounded and composite nodes.
    pub fn layout_mut(&mut self) -> Option<&mut Layout> {
        self.layout.as_deref_mut()
    }
}

/// Context handed to render hooks.
///
/// When the node declares paint properties, the drawing context is already
/// inside a paint scope that is restored after the hook returns.
pub struct PaintCx<'a> {
    ctx: &'a mut dyn DrawContext,
    props: &'a Props,
    parent: &'a Props,
    layout: Option<&'a Layout>,
}

impl fmt::Debug for PaintCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintCx")
            .field("props", &self.props)
            .field("parent", &self.parent)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl PaintCx<'_> {
    /// The drawing context.
    pub fn ctx(&mut self) -> &mut dyn DrawContext {
        &mut *self.ctx
    }

    /// Value under `key` in the node's own store.
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Value under `key` in the parent's store.
    pub fn parent_prop(&self, key: &str) -> Option<&PropValue> {
        self.parent.get(key)
    }

    /// The pointer propagated into this node, if any.
    pub fn pointer(&self) -> Option<PointerHandle> {
        self.props.pointer().cloned()
    }

    /// The node's geometry, for bounded and composite nodes.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout
    }

    /// Rendering position, or the origin for leaves.
    pub fn rendering_position(&self) -> Point {
        self.layout.map_or(Point::ORIGIN, Layout::rendering_position)
    }

    /// Footprint size, or zero for leaves.
    pub fn size(&self) -> Size {
        self.layout.map_or(Size::ZERO, Layout::size)
    }

    /// Content region, or an empty rect for leaves.
    pub fn inner_bounds(&self) -> Rect {
        self.layout.map_or(Rect::ZERO, Layout::inner_bounds)
    }

    /// The string stored under [`keys::TEXT`], if any.
    pub fn text(&self) -> Option<&str> {
        self.props.get(keys::TEXT).and_then(PropValue::as_text)
    }
}
