//! Log2-bucketed difficulty scaling.
//!
//! A coefficient `c > 1` falls between tiers `floor(log2 c)` and the next
//! one; the factor is interpolated exponentially between the cumulative
//! products of per-tier jump multipliers.

use serde::Serialize;
use thiserror::Error;

/// First jump multiplier of the built-in sequence.
pub const DEFAULT_FIRST_JUMP: f64 = 11.0;
/// Length of the built-in sequence (one jump per cup boundary).
pub const DEFAULT_JUMP_COUNT: usize = 10;

/// Errors building a jump sequence.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressionError {
    #[error("jump sequence must not be empty")]
    Empty,
    #[error("jump {index} must be finite and > 0, got {value}")]
    InvalidJump { index: usize, value: f64 },
}

/// Immutable per-tier jump multipliers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JumpSequence {
    jumps: Vec<f64>,
}

impl JumpSequence {
    /// Accepts any non-empty list of finite, positive jumps.
    ///
    /// Jumps above 1 keep the factor increasing in the coefficient.
    pub fn new(jumps: Vec<f64>) -> Result<Self, ProgressionError> {
        if jumps.is_empty() {
            return Err(ProgressionError::Empty);
        }
        if let Some((index, &value)) = jumps
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(ProgressionError::InvalidJump { index, value });
        }
        Ok(Self { jumps })
    }

    /// `jump[0] = first`, `jump[i] = jump[i - 1] + (i + 2)`.
    ///
    /// Example: `triangular(11.0, 4)` gives `[11, 14, 18, 23]`.
    pub fn triangular(first: f64, len: usize) -> Result<Self, ProgressionError> {
        Self::new(triangular_values(first, len))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.jumps
    }

    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    fn last(&self) -> f64 {
        self.jumps[self.jumps.len() - 1]
    }
}

impl Default for JumpSequence {
    fn default() -> Self {
        Self {
            jumps: triangular_values(DEFAULT_FIRST_JUMP, DEFAULT_JUMP_COUNT),
        }
    }
}

fn triangular_values(first: f64, len: usize) -> Vec<f64> {
    let mut jumps = Vec::with_capacity(len);
    let mut current = first;
    for i in 0..len {
        if i > 0 {
            current += (i + 2) as f64;
        }
        jumps.push(current);
    }
    jumps
}

/// Maps a difficulty coefficient to a multiplicative scaling factor.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionModel {
    jumps: JumpSequence,
    // prefix[i] = product of jumps[0..i]
    prefix: Vec<f64>,
}

impl ProgressionModel {
    pub fn new(jumps: JumpSequence) -> Self {
        let mut prefix = Vec::with_capacity(jumps.len() + 1);
        let mut acc = 1.0;
        prefix.push(acc);
        for j in jumps.as_slice() {
            acc *= j;
            prefix.push(acc);
        }
        Self { jumps, prefix }
    }

    pub fn jumps(&self) -> &JumpSequence {
        &self.jumps
    }

    /// Product of the first `index` jumps; indices past the sequence reuse
    /// the last jump. Non-positive indices give 1.
    pub fn factor_at(&self, index: i64) -> f64 {
        if index <= 0 {
            return 1.0;
        }
        let len = self.jumps.len();
        match usize::try_from(index) {
            Ok(i) if i <= len => self.prefix[i],
            _ => {
                let extra = (index as f64) - (len as f64);
                self.prefix[len] * self.jumps.last().powf(extra)
            }
        }
    }

    /// Scaling factor for `coefficient`; 1 at or below the baseline tier.
    pub fn progression_factor(&self, coefficient: f64) -> f64 {
        if !(coefficient > 1.0) {
            return 1.0;
        }
        let index = coefficient.log2();
        if !index.is_finite() {
            return self.factor_at(i64::MAX);
        }
        let lower = index.floor();
        let fraction = index - lower;
        let lower_index = lower as i64;
        let lower_factor = self.factor_at(lower_index);
        if fraction == 0.0 || !lower_factor.is_finite() {
            return lower_factor;
        }
        let upper_factor = self.factor_at(lower_index.saturating_add(1));
        lower_factor * (upper_factor / lower_factor).powf(fraction)
    }
}

impl Default for ProgressionModel {
    fn default() -> Self {
        Self::new(JumpSequence::default())
    }
}
