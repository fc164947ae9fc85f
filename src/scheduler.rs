/*!
Progressive, cooperative scan scheduling.

A render cycle paints the canvas four times, each pass with blocks half the
side of the previous one: 8×8, 4×4, 2×2 and finally single pixels. Each block
gets one escape-time evaluation at its top-left pixel. The viewer sees a coarse
image almost immediately and it sharpens as later passes overwrite it.

The work is split into ticks of exactly one block so the host can interleave
rendering with its own event handling. The host owns the scheduling mechanism
(a frame loop, a timer, a worker loop); it hands the [`RenderState`] a
[`TickHandle`] when a render starts, and the state stops that handle itself
when the last pass completes or the render is cancelled.
*/

use std::time::Instant;

use log::{debug, info, trace};

use crate::colour;
use crate::escape::escape_time;
use crate::pass::{Pass, Tiling};
use crate::surface::Surface;
use crate::view::ViewParameters;

/// Host-side handle that keeps ticks coming for one render cycle.
pub trait TickHandle {
    /// Stops scheduling further ticks.
    fn stop(self);
}

/// For hosts that drive ticks by polling [`RenderState::is_in_progress`].
impl TickHandle for () {
    fn stop(self) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Running {
        view: ViewParameters,
        pass: Pass,
        cursor: u64,
    },
}

/// Outcome of a single [`RenderState::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No render in progress; nothing was painted.
    Idle,
    /// The render is still in progress.
    Painted,
    /// The last block of the last pass was painted and the state is idle again.
    Finished,
}

struct Cycle<H> {
    view: ViewParameters,
    pass: Pass,
    cursor: u64,
    handle: H,
    started: Instant,
}

/// The single owner of the active render cycle, if any.
pub struct RenderState<H: TickHandle = ()> {
    cycle: Option<Cycle<H>>,
    last_view: Option<ViewParameters>,
}

impl<H: TickHandle> Default for RenderState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TickHandle> RenderState<H> {
    pub fn new() -> Self {
        Self {
            cycle: None,
            last_view: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.cycle.is_some()
    }

    /// View of the most recently accepted render request, whether it is
    /// still running, finished or cancelled.
    pub fn last_view(&self) -> Option<ViewParameters> {
        self.last_view
    }

    pub fn phase(&self) -> Phase {
        match &self.cycle {
            None => Phase::Idle,
            Some(cycle) => Phase::Running {
                view: cycle.view,
                pass: cycle.pass,
                cursor: cycle.cursor,
            },
        }
    }

    /// Starts a render cycle for `view` if idle. `start_ticking` is called only
    /// when the request is accepted; the handle it returns is stopped when the
    /// cycle ends.
    ///
    /// Returns `false`, leaving the running cycle untouched, if a render is
    /// already in progress.
    pub fn request_render(
        &mut self,
        view: ViewParameters,
        start_ticking: impl FnOnce() -> H,
    ) -> bool {
        if let Some(cycle) = &self.cycle {
            debug!(
                "ignoring render request, pass {} block {} in progress",
                cycle.pass.index(),
                cycle.cursor
            );
            return false;
        }

        info!(
            "rendering zoom {} around {} + {}i, {} iterations",
            view.zoom_level, view.center.re, view.center.im, view.max_iterations
        );
        self.last_view = Some(view);
        self.cycle = Some(Cycle {
            view,
            pass: Pass::FIRST,
            cursor: 0,
            handle: start_ticking(),
            started: Instant::now(),
        });
        true
    }

    /// Abandons the running cycle, if any, and stops its tick handle. Pixels
    /// already painted are left as they are.
    pub fn cancel(&mut self) -> bool {
        match self.cycle.take() {
            Some(cycle) => {
                info!(
                    "render cancelled during pass {} after {:?}",
                    cycle.pass.index(),
                    cycle.started.elapsed()
                );
                cycle.handle.stop();
                true
            }
            None => false,
        }
    }

    /// Evaluates and paints the next block.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Tick {
        let cycle = match self.cycle.as_mut() {
            Some(cycle) => cycle,
            None => return Tick::Idle,
        };

        let size = surface.size();
        let tiling = Tiling::new(cycle.pass, size);
        if cycle.cursor < tiling.block_count() {
            let block = tiling.block(cycle.cursor);
            let point = cycle.view.pixel_to_point(block.x, block.y, size);
            let escape = escape_time(point, cycle.view.max_iterations);
            let colour = colour::shade(escape);
            trace!(
                "pass {} block {} at ({}, {}): {:?} -> {}",
                cycle.pass.index(),
                cycle.cursor,
                block.x,
                block.y,
                escape,
                colour
            );
            surface.fill_rect(block.x, block.y, block.size, block.size, colour);
            cycle.cursor += 1;
        }

        if cycle.cursor < tiling.block_count() {
            return Tick::Painted;
        }

        debug!(
            "pass {} complete: {} blocks of {}x{}",
            cycle.pass.index(),
            tiling.block_count(),
            cycle.pass.block_size(),
            cycle.pass.block_size()
        );
        match cycle.pass.next() {
            Some(pass) => {
                cycle.pass = pass;
                cycle.cursor = 0;
                Tick::Painted
            }
            None => {
                self.finish();
                Tick::Finished
            }
        }
    }

    fn finish(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            info!("render finished in {:?}", cycle.started.elapsed());
            cycle.handle.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::colour::Colour;
    use crate::complex::Complex;
    use crate::screen;
    use crate::surface::Framebuffer;

    struct CountingHandle(Rc<Cell<u32>>);

    impl TickHandle for CountingHandle {
        fn stop(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn view(max_iterations: u32) -> ViewParameters {
        ViewParameters {
            zoom_level: 0,
            center: Complex::new(-0.5, 0.0),
            max_iterations,
        }
    }

    fn run_to_completion<H: TickHandle>(
        state: &mut RenderState<H>,
        surface: &mut Framebuffer,
    ) -> usize {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match state.tick(surface) {
                Tick::Painted => {}
                Tick::Finished => return ticks,
                Tick::Idle => panic!("went idle without finishing"),
            }
        }
    }

    #[test_log::test]
    fn starts_idle() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(8, 8));
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.tick(&mut surface), Tick::Idle);
        assert!(!state.cancel());
    }

    #[test_log::test]
    fn request_enters_first_pass() {
        let mut state: RenderState = RenderState::new();
        assert!(state.request_render(view(50), || ()));
        assert_eq!(
            state.phase(),
            Phase::Running {
                view: view(50),
                pass: Pass::FIRST,
                cursor: 0
            }
        );
    }

    #[test_log::test]
    fn one_tick_paints_one_block() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(16, 16));
        state.request_render(view(50), || ());
        assert_eq!(state.tick(&mut surface), Tick::Painted);
        match state.phase() {
            Phase::Running { pass, cursor, .. } => {
                assert_eq!(pass, Pass::FIRST);
                assert_eq!(cursor, 1);
            }
            Phase::Idle => panic!("finished after one tick"),
        }
    }

    #[test_log::test]
    fn advances_pass_after_last_block() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(16, 8));
        state.request_render(view(50), || ());
        state.tick(&mut surface);
        state.tick(&mut surface);
        assert_eq!(
            state.phase(),
            Phase::Running {
                view: view(50),
                pass: Pass::new(1).unwrap(),
                cursor: 0
            }
        );
    }

    #[test_log::test]
    fn tick_count_matches_block_count() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(16, 8));
        state.request_render(view(50), || ());
        // 2 + 8 + 32 + 128 blocks.
        assert_eq!(run_to_completion(&mut state, &mut surface), 170);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test_log::test]
    fn duplicate_request_is_ignored() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(16, 16));
        state.request_render(view(50), || ());
        for _ in 0..5 {
            state.tick(&mut surface);
        }
        let before = state.phase();

        let mut started = false;
        let other = ViewParameters {
            zoom_level: 3,
            ..view(1000)
        };
        assert!(!state.request_render(other, || started = true));
        assert!(!started);
        assert_eq!(state.phase(), before);
    }

    #[test_log::test]
    fn last_view_tracks_accepted_requests_only() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(8, 8));
        assert_eq!(state.last_view(), None);

        state.request_render(view(50), || ());
        let edited = ViewParameters {
            zoom_level: 2,
            ..view(50)
        };
        state.request_render(edited, || ());
        assert_eq!(state.last_view(), Some(view(50)));

        run_to_completion(&mut state, &mut surface);
        assert_eq!(state.last_view(), Some(view(50)));

        state.request_render(edited, || ());
        state.cancel();
        assert_eq!(state.last_view(), Some(edited));
    }

    #[test_log::test]
    fn handle_is_stopped_once_on_completion() {
        let stops = Rc::new(Cell::new(0));
        let mut state = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(8, 8));
        state.request_render(view(10), || CountingHandle(Rc::clone(&stops)));
        run_to_completion(&mut state, &mut surface);
        assert_eq!(stops.get(), 1);
        assert_eq!(state.tick(&mut surface), Tick::Idle);
        assert_eq!(stops.get(), 1);
    }

    #[test_log::test]
    fn cancel_stops_handle_and_allows_a_new_render() {
        let stops = Rc::new(Cell::new(0));
        let mut state = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(8, 8));
        state.request_render(view(10), || CountingHandle(Rc::clone(&stops)));
        state.tick(&mut surface);

        assert!(state.cancel());
        assert_eq!(stops.get(), 1);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.tick(&mut surface), Tick::Idle);

        assert!(state.request_render(view(20), || CountingHandle(Rc::clone(&stops))));
        assert_eq!(stops.get(), 1);
    }

    #[test_log::test]
    fn empty_canvas_finishes_without_painting() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(0, 0));
        surface.take_dirty();
        state.request_render(view(10), || ());
        assert_eq!(run_to_completion(&mut state, &mut surface), 4);
        assert!(!surface.take_dirty());
    }

    #[test_log::test]
    fn non_finite_view_renders_black() {
        let mut state: RenderState = RenderState::new();
        let mut surface = Framebuffer::new(screen::Size::new(8, 8));
        surface.fill_rect(0, 0, 8, 8, Colour::gray(255));
        let view = ViewParameters {
            center: Complex::new(f64::NAN, 0.0),
            ..view(10)
        };
        state.request_render(view, || ());
        run_to_completion(&mut state, &mut surface);
        assert!(surface
            .texels()
            .iter()
            .all(|&t| t == crate::surface::Texel::BLACK));
    }
}
