//! Frame-driven tick scheduling for the windowed host.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::trace;

use crate::scheduler::{RenderState, Tick, TickHandle};
use crate::surface::Surface;

/// Runs render ticks from the host's frame loop while a render is active.
///
/// Each frame gets a time budget; ticks are cheap, so many of them fit in
/// one frame without holding up event handling or presentation.
#[derive(Clone, Debug, Default)]
pub struct FrameTicker {
    active: Rc<Cell<bool>>,
}

/// Keeps a [`FrameTicker`] running until stopped.
#[derive(Debug)]
pub struct FrameTickerHandle {
    active: Rc<Cell<bool>>,
}

impl TickHandle for FrameTickerHandle {
    fn stop(self) {
        self.active.set(false);
    }
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> FrameTickerHandle {
        self.active.set(true);
        FrameTickerHandle {
            active: Rc::clone(&self.active),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Ticks `state` until the render finishes or `budget` has elapsed. At
    /// least one tick runs if the ticker is active. Returns the number of
    /// ticks that painted or finished.
    pub fn run_frame<H, S>(
        &self,
        state: &mut RenderState<H>,
        surface: &mut S,
        budget: Duration,
    ) -> usize
    where
        H: TickHandle,
        S: Surface + ?Sized,
    {
        let started = Instant::now();
        let mut ticks = 0;
        while self.is_active() {
            match state.tick(surface) {
                Tick::Idle => break,
                Tick::Finished => {
                    ticks += 1;
                    break;
                }
                Tick::Painted => ticks += 1,
            }
            if started.elapsed() >= budget {
                break;
            }
        }
        trace!("{} ticks in {:?}", ticks, started.elapsed());
        ticks
    }
}
