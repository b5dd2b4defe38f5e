// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame driver: a cancelable repeating task over a host frame scheduler.
//!
//! [`Animator`] asks its [`FrameScheduler`] for one frame at a time. Each
//! callback runs [`Scene::frame`] and, if the animator is still running,
//! requests the next one. At most one request is outstanding, and
//! [`Animator::stop`] cancels it.
//!
//! Browser hosts schedule through `requestAnimationFrame`; headless hosts and
//! tests use [`ManualScheduler`] and fire frames by hand.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::context::DrawContext;
use crate::scene::Scene;

/// Identifies one outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub i32);

impl From<i32> for FrameId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Runs once, with the host timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// A host source of animation frames.
pub trait FrameScheduler {
    /// Run `callback` on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameId;
    /// Drop the request `id` if it has not run. Unknown ids are ignored.
    fn cancel_frame(&self, id: FrameId);
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Rc<T> {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, id: FrameId) {
        (**self).cancel_frame(id);
    }
}

struct AnimatorInner<C: DrawContext, S> {
    scene: Rc<RefCell<Scene<C>>>,
    scheduler: S,
    running: Cell<bool>,
    /// The one outstanding request, cleared when it fires.
    pending: Cell<Option<FrameId>>,
    frames: Cell<u64>,
}

trait Control {
    fn stop(&self);
    fn is_running(&self) -> bool;
}

impl<C: DrawContext + 'static, S: FrameScheduler + 'static> Control for AnimatorInner<C, S> {
    fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        log::debug!("animator stopped after {} frames", self.frames.get());
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

fn schedule<C, S>(inner: &Rc<AnimatorInner<C, S>>)
where
    C: DrawContext + 'static,
    S: FrameScheduler + 'static,
{
    // Restarted from inside a frame; the request is already out.
    if inner.pending.get().is_some() {
        return;
    }
    let weak = Rc::downgrade(inner);
    let id = inner.scheduler.request_frame(Box::new(move |timestamp| {
        if let Some(inner) = weak.upgrade() {
            tick(&inner, timestamp);
        }
    }));
    inner.pending.set(Some(id));
}

fn tick<C, S>(inner: &Rc<AnimatorInner<C, S>>, timestamp: f64)
where
    C: DrawContext + 'static,
    S: FrameScheduler + 'static,
{
    inner.pending.set(None);
    if !inner.running.get() {
        return;
    }
    let frame = inner.frames.get();
    inner.frames.set(frame + 1);
    log::trace!("frame {frame} at {timestamp}ms");
    let report = inner.scene.borrow_mut().frame();
    if !report.is_ok() {
        log::trace!("frame {frame} isolated {} failures", report.failures().len());
    }
    // A hook may have stopped us.
    if inner.running.get() {
        schedule(inner);
    }
}

/// Drives a [`Scene`] once per host frame.
///
/// The scene is shared so the host can keep feeding it input and resizes
/// while the animator runs. Dropping the animator stops it.
pub struct Animator<C: DrawContext + 'static, S: FrameScheduler + 'static> {
    inner: Rc<AnimatorInner<C, S>>,
}

impl<C: DrawContext + 'static, S: FrameScheduler + 'static> Animator<C, S> {
    /// Create a stopped animator for `scene`.
    pub fn new(scene: Scene<C>, scheduler: S) -> Self {
        Self::from_shared(Rc::new(RefCell::new(scene)), scheduler)
    }

    /// Create a stopped animator for a scene the host already shares.
    pub fn from_shared(scene: Rc<RefCell<Scene<C>>>, scheduler: S) -> Self {
        Self {
            inner: Rc::new(AnimatorInner {
                scene,
                scheduler,
                running: Cell::new(false),
                pending: Cell::new(None),
                frames: Cell::new(0),
            }),
        }
    }

    /// Request the first frame. No-op while running.
    pub fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }
        log::debug!("animator started");
        schedule(&self.inner);
    }

    /// Cancel the outstanding request and stop rescheduling.
    ///
    /// Calling this while stopped does nothing.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Returns true between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.inner.frames.get()
    }

    /// The driven scene.
    pub fn scene(&self) -> &Rc<RefCell<Scene<C>>> {
        &self.inner.scene
    }

    /// The scheduler frames are requested from.
    pub fn scheduler(&self) -> &S {
        &self.inner.scheduler
    }

    /// A weak handle that can stop this animator from inside a hook.
    pub fn handle(&self) -> AnimatorHandle {
        let inner: Rc<dyn Control> = self.inner.clone();
        AnimatorHandle {
            inner: Rc::downgrade(&inner),
        }
    }
}

impl<C: DrawContext + 'static, S: FrameScheduler + 'static> Drop for Animator<C, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<C: DrawContext + 'static, S: FrameScheduler + 'static> fmt::Debug for Animator<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("running", &self.inner.running.get())
            .field("pending", &self.inner.pending.get())
            .field("frames", &self.inner.frames.get())
            .finish_non_exhaustive()
    }
}

/// Non-owning control handle for an [`Animator`].
///
/// Does nothing once the animator is dropped.
#[derive(Clone)]
pub struct AnimatorHandle {
    inner: Weak<dyn Control>,
}

impl AnimatorHandle {
    /// Stop the animator, as [`Animator::stop`].
    pub fn stop(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.stop();
        }
    }

    /// Whether the animator is alive and running.
    pub fn is_running(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.is_running())
    }
}

impl fmt::Debug for AnimatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatorHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// A [`FrameScheduler`] that runs frames only when told to.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<(FrameId, FrameCallback)>>,
    next_id: Cell<i32>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting for the next [`fire`](Self::fire).
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every request queued before this call, returning how many ran.
    ///
    /// Requests made by the callbacks wait for the next call.
    pub fn fire(&self, timestamp: f64) -> usize {
        let due = core::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.queue.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}
