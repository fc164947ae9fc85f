//! Keyboard controls for the windowed viewer.
//!
//! Edits apply to the *pending* view only; nothing is re-rendered until a
//! render is requested, and a request during a render is ignored.

use winit::event::VirtualKeyCode as Key;

use crate::complex::Complex;
use crate::view::ViewParameters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Pan { right: i8, up: i8 },
    ZoomIn,
    ZoomOut,
    MoreIterations,
    FewerIterations,
    Render,
    Cancel,
}

impl Command {
    pub fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Left => Command::Pan { right: -1, up: 0 },
            Key::Right => Command::Pan { right: 1, up: 0 },
            Key::Up => Command::Pan { right: 0, up: 1 },
            Key::Down => Command::Pan { right: 0, up: -1 },
            Key::Plus | Key::Equals | Key::NumpadAdd => Command::ZoomIn,
            Key::Minus | Key::NumpadSubtract => Command::ZoomOut,
            Key::RBracket => Command::MoreIterations,
            Key::LBracket => Command::FewerIterations,
            Key::Return | Key::NumpadEnter | Key::R => Command::Render,
            Key::Escape => Command::Cancel,
            _ => return None,
        };
        Some(command)
    }

    /// The view after this command, or `None` for commands that do not edit
    /// the view.
    pub fn edit(self, view: ViewParameters) -> Option<ViewParameters> {
        let edited = match self {
            Command::Pan { right, up } => {
                // A quarter of the visible width.
                let step = view.span() / 4.0;
                let offset = Complex::new(f64::from(right) * step, f64::from(up) * step);
                ViewParameters {
                    center: view.center + offset,
                    ..view
                }
            }
            Command::ZoomIn => ViewParameters {
                zoom_level: view.zoom_level.saturating_add(1),
                ..view
            },
            Command::ZoomOut => ViewParameters {
                zoom_level: view.zoom_level.saturating_sub(1),
                ..view
            },
            Command::MoreIterations => ViewParameters {
                max_iterations: view.max_iterations.saturating_mul(2).max(1),
                ..view
            },
            Command::FewerIterations => ViewParameters {
                max_iterations: (view.max_iterations / 2).max(1),
                ..view
            },
            Command::Render | Command::Cancel => return None,
        };
        Some(edited)
    }
}
