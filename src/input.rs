//! Pointer simulation
//!
//! The polling loop drives the pointer through the `PointerDriver` trait so
//! the loop itself stays testable; the production driver wraps enigo.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Interval between interpolation steps of a glided pointer move.
const GLIDE_STEP: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum PointerError {
    #[error("failed to initialize pointer driver: {0}")]
    Init(String),
    #[error("pointer simulation failed: {0}")]
    Simulate(String),
}

/// Pointer capability consumed by the polling loop.
pub trait PointerDriver {
    /// Current pointer position in screen coordinates.
    fn cursor_position(&mut self) -> Result<(i32, i32), PointerError>;

    /// Glide the pointer to (x, y) over roughly `duration`.
    fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<(), PointerError>;

    /// Left-click at (x, y).
    fn click(&mut self, x: i32, y: i32) -> Result<(), PointerError>;
}

/// enigo-backed pointer driver.
pub struct EnigoDriver {
    enigo: Enigo,
}

impl EnigoDriver {
    pub fn new() -> Result<Self, PointerError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|err| PointerError::Init(err.to_string()))?;
        Ok(Self { enigo })
    }
}

impl PointerDriver for EnigoDriver {
    fn cursor_position(&mut self) -> Result<(i32, i32), PointerError> {
        self.enigo
            .location()
            .map_err(|err| PointerError::Simulate(err.to_string()))
    }

    fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<(), PointerError> {
        let (start_x, start_y) = self.cursor_position()?;
        let steps = (duration.as_millis() / GLIDE_STEP.as_millis()).max(1) as i32;

        for step in 1..=steps {
            let ix = start_x + (x - start_x) * step / steps;
            let iy = start_y + (y - start_y) * step / steps;
            self.enigo
                .move_mouse(ix, iy, Coordinate::Abs)
                .map_err(|err| PointerError::Simulate(err.to_string()))?;
            thread::sleep(GLIDE_STEP);
        }
        Ok(())
    }

    fn click(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|err| PointerError::Simulate(err.to_string()))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|err| PointerError::Simulate(err.to_string()))
    }
}
