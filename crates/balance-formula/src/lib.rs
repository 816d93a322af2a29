#![deny(warnings)]

//! Progression formulas: per-level curve evaluation, affordability,
//! time-based upgrade yield and modifier folding.
//!
//! Every function here is pure. Degenerate tuning resolves to a defined
//! number; the only rejected input is a time budget that could never
//! terminate (see [`events_in_time`]).

pub mod afford;
pub mod formula;
pub mod modifiers;
pub mod time_yield;

pub use afford::{affordable_levels, max_purchase, total_cost, Purchase};
pub use formula::evaluate;
pub use modifiers::apply_modifiers;
pub use time_yield::{event_time, events_in_time, YieldError, MAX_EVENTS};
