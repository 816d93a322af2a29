//! How many upgrade events fit in an elapsed duration.
//!
//! Each event costs more time than the previous one, following a fixed
//! curve that does not come from tuning data:
//! `(base * 2^(n / max(4 * sqrt(n), 1)) + n) / divisor`, where `n` is the
//! number of events already committed.

use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound on events committed by a single call.
pub const MAX_EVENTS: u64 = 10_000_000;

/// Inputs that would make the accumulation loop meaningless or endless.
#[derive(Debug, Error, PartialEq)]
pub enum YieldError {
    /// Speed divisor must be finite and strictly positive.
    #[error("speed divisor must be finite and > 0, got {0}")]
    InvalidSpeedDivisor(f64),
    /// Base event time must be finite and non-negative.
    #[error("base event time must be finite and >= 0, got {0}")]
    InvalidEventTime(f64),
    /// Elapsed time must be finite.
    #[error("elapsed time must be finite, got {0}")]
    InvalidElapsed(f64),
}

/// Time cost of the next event after `committed` events.
pub fn event_time(base_event_time: f64, committed: u64, speed_divisor: f64) -> f64 {
    let n = committed as f64;
    let growth = 2f64.powf(n / (4.0 * n.sqrt()).max(1.0));
    (base_event_time * growth + n) / speed_divisor
}

/// Greedily commit events while the remaining time covers the next one.
///
/// Rejects a non-positive divisor, a negative base time and non-finite input
/// before entering the loop. Negative elapsed time yields zero events.
///
/// The count is capped at [`MAX_EVENTS`]; a window long enough for more
/// returns exactly `MAX_EVENTS`, which is a lower bound, not the true count.
pub fn events_in_time(
    base_event_time: f64,
    elapsed: f64,
    speed_divisor: f64,
) -> Result<u64, YieldError> {
    if !(speed_divisor.is_finite() && speed_divisor > 0.0) {
        warn!(speed_divisor, "rejecting speed divisor");
        return Err(YieldError::InvalidSpeedDivisor(speed_divisor));
    }
    if !(base_event_time.is_finite() && base_event_time >= 0.0) {
        warn!(base_event_time, "rejecting base event time");
        return Err(YieldError::InvalidEventTime(base_event_time));
    }
    if !elapsed.is_finite() {
        warn!(elapsed, "rejecting elapsed time");
        return Err(YieldError::InvalidElapsed(elapsed));
    }

    let mut left = elapsed;
    let mut events: u64 = 0;
    while events < MAX_EVENTS {
        let cost = event_time(base_event_time, events, speed_divisor);
        if left >= cost {
            left -= cost;
            events += 1;
        } else {
            return Ok(events);
        }
    }
    debug!(events, left, "event count saturated");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_event_costs_base_over_divisor() {
        assert_eq!(event_time(60.0, 0, 1.0), 60.0);
        assert_eq!(event_time(60.0, 0, 4.0), 15.0);
        // n = 4: 2^(4/8) * 60 + 4
        let expected = 60.0 * 2f64.sqrt() + 4.0;
        assert!((event_time(60.0, 4, 1.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn counts_events_in_window() {
        // 60 + 72.35 + 78.66 + 84.01 = 295.0; the fifth costs 88.9
        assert_eq!(events_in_time(60.0, 300.0, 1.0), Ok(4));
        assert_eq!(events_in_time(60.0, 300.0, 2.0), Ok(7));
        assert_eq!(events_in_time(20.0, 100.0, 1.0), Ok(3));
    }

    #[test]
    fn short_window_yields_nothing() {
        assert_eq!(events_in_time(60.0, 0.0, 1.0), Ok(0));
        assert_eq!(events_in_time(60.0, 59.9, 1.0), Ok(0));
        assert_eq!(events_in_time(60.0, -10.0, 1.0), Ok(0));
    }

    #[test]
    fn zero_base_time_still_terminates() {
        // first event is free, the second costs 1
        assert_eq!(events_in_time(0.0, 0.0, 1.0), Ok(1));
        assert!(events_in_time(0.0, 1e6, 1.0).unwrap() > 1000);
    }

    #[test]
    fn long_window_is_capped() {
        // sum of n for n < MAX_EVENTS is about 5e13, well inside 1e15
        assert_eq!(events_in_time(0.0, 1e15, 1.0), Ok(MAX_EVENTS));
    }

    #[test]
    fn rejects_non_terminating_input() {
        assert_eq!(
            events_in_time(60.0, 300.0, 0.0),
            Err(YieldError::InvalidSpeedDivisor(0.0))
        );
        assert_eq!(
            events_in_time(60.0, 300.0, -2.0),
            Err(YieldError::InvalidSpeedDivisor(-2.0))
        );
        assert!(matches!(
            events_in_time(60.0, 300.0, f64::NAN),
            Err(YieldError::InvalidSpeedDivisor(_))
        ));
        assert_eq!(
            events_in_time(-1.0, 300.0, 1.0),
            Err(YieldError::InvalidEventTime(-1.0))
        );
        assert_eq!(
            events_in_time(60.0, f64::INFINITY, 1.0),
            Err(YieldError::InvalidElapsed(f64::INFINITY))
        );
    }

    proptest! {
        #[test]
        fn faster_speed_never_yields_fewer(base in 1.0f64..600.0,
                                           elapsed in 0.0f64..100_000.0,
                                           d in 0.1f64..10.0,
                                           boost in 1.0f64..5.0) {
            let slow = events_in_time(base, elapsed, d).unwrap();
            let fast = events_in_time(base, elapsed, d * boost).unwrap();
            prop_assert!(fast >= slow);
        }

        #[test]
        fn event_cost_grows(base in 0.0f64..600.0, n in 0u64..10_000, d in 0.1f64..10.0) {
            prop_assert!(event_time(base, n + 1, d) > event_time(base, n, d));
        }
    }
}
