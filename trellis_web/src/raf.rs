// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduler.
//!
//! One JS closure is registered for the scheduler's whole life and handed to
//! every `requestAnimationFrame` call. The browser runs callbacks of one frame
//! in request order, so each invocation pops the oldest queued request.
//! Cancelled requests are removed from the queue and from the browser.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use trellis_scene::{FrameCallback, FrameId, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

#[derive(Default)]
struct Queue {
    requests: RefCell<VecDeque<(FrameId, FrameCallback)>>,
}

/// A [`FrameScheduler`] backed by the browser's `requestAnimationFrame`.
///
/// Timestamps passed to callbacks are the browser's `DOMHighResTimeStamp`,
/// in milliseconds. Dropping the scheduler cancels every pending request.
pub struct RafScheduler {
    queue: Rc<Queue>,
    closure: RafClosure,
}

impl RafScheduler {
    /// Create a scheduler with nothing requested.
    pub fn new() -> Self {
        let queue = Rc::new(Queue::default());
        let weak = Rc::downgrade(&queue);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(queue) = weak.upgrade() else {
                return;
            };
            // Release the borrow before running; the callback may request again.
            let next = queue.requests.borrow_mut().pop_front();
            if let Some((_, callback)) = next {
                callback(timestamp_ms);
            }
        }) as Box<dyn FnMut(f64)>);
        Self { queue, closure }
    }

    /// Number of requests not yet run or cancelled.
    pub fn pending(&self) -> usize {
        self.queue.requests.borrow().len()
    }
}

impl Default for RafScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(request_animation_frame(self.closure.as_ref().unchecked_ref()));
        self.queue.requests.borrow_mut().push_back((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        let mut requests = self.queue.requests.borrow_mut();
        let before = requests.len();
        requests.retain(|(queued, _)| *queued != id);
        if requests.len() != before {
            cancel_animation_frame(id.0);
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        for (id, _) in self.queue.requests.borrow_mut().drain(..) {
            cancel_animation_frame(id.0);
        }
    }
}

impl fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RafScheduler")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
