//! Ordered additive/multiplicative adjustments.

use balance_core::{Modifier, ModifierKind};

/// Fold `modifiers` over `base` left to right.
///
/// No clamping or reordering: `[+2, x3]` and `[x3, +2]` differ.
pub fn apply_modifiers(base: f64, modifiers: &[Modifier]) -> f64 {
    modifiers.iter().fold(base, |acc, m| match m.kind {
        ModifierKind::Additive => acc + m.magnitude,
        ModifierKind::Multiplicative => acc * m.magnitude,
    })
}
