//! Owned, cancellable per-frame loop.
//!
//! The host decides when a frame happens (a redraw request, a vsync callback);
//! the loop only records whether frames should still be produced and how many
//! were. Stopping is possible from any clone of the [`FrameLoopHandle`].

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

#[derive(Debug, Default)]
struct LoopState {
    running: AtomicBool,
    frames: AtomicU64,
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    state: Arc<LoopState>,
}

/// Cloneable cancellation handle for a [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct FrameLoopHandle {
    state: Arc<LoopState>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.state.running.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Number of frames produced since the loop was created.
    pub fn frames(&self) -> u64 {
        self.state.frames.load(Ordering::Relaxed)
    }

    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            state: self.state.clone(),
        }
    }

    /// Counts a frame if the loop is running; returns whether it did.
    pub(crate) fn begin_frame(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state.frames.fetch_add(1, Ordering::Relaxed);
        true
    }
}

impl FrameLoopHandle {
    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    pub fn frames(&self) -> u64 {
        self.state.frames.load(Ordering::Relaxed)
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
