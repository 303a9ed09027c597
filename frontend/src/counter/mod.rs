//! Count-up numbers that animate once they scroll into view.
//!
//! The core ([`visibility`], [`driver`], [`board`]) is headless: it only
//! talks to the page through [`Scheduler`] and [`TextSurface`], so the same
//! state machine runs against the browser ([`browser`]) and against a
//! virtual clock in tests.

pub mod board;
pub mod browser;
pub mod driver;
pub mod easing;
pub mod element;
pub mod error;
pub mod schedule;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use board::{BoardSettings, CounterBoard};
pub use driver::TickOutcome;
pub use element::{CounterSource, ElementId, SuffixRule};
pub use schedule::{Scheduler, TaskHandle, TextSurface};
pub use visibility::{Bounds, ReplayPolicy};
