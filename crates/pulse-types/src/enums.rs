//! Enumeration types shared across the Pulse workspace.

use serde::{Deserialize, Serialize};

/// Execution priority of a scheduled tick.
///
/// Within one simulation step, due events fire in `(priority,
/// insertion-sequence)` order. The declaration order here is the sort
/// order: [`TickPriority::ExtremelyHigh`] fires first. [`TickPriority::Low`]
/// is reserved and unused by the built-in block kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TickPriority {
    /// Chain-escalation priority: lets a run of dependent diodes settle
    /// upstream-first within a single step.
    ExtremelyHigh,
    /// Turn-off transitions, so falling edges commit before rising ones.
    VeryHigh,
    /// Default diode transition priority.
    High,
    /// Everything else.
    Normal,
    /// Reserved.
    Low,
}

impl core::fmt::Display for TickPriority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::ExtremelyHigh => "extremely-high",
            Self::VeryHigh => "very-high",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        };
        write!(f, "{name}")
    }
}

/// Operating mode of a comparator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ComparatorMode {
    /// Pass the main input through when it is at least the side input.
    Compare,
    /// Emit main input minus side input.
    Subtract,
}

impl ComparatorMode {
    /// Return the other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Compare => Self::Subtract,
            Self::Subtract => Self::Compare,
        }
    }
}

impl core::fmt::Display for ComparatorMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Compare => "compare",
            Self::Subtract => "subtract",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_sorts_most_urgent_first() {
        let mut priorities = [
            TickPriority::Normal,
            TickPriority::ExtremelyHigh,
            TickPriority::High,
            TickPriority::Low,
            TickPriority::VeryHigh,
        ];
        priorities.sort();
        assert_eq!(
            priorities,
            [
                TickPriority::ExtremelyHigh,
                TickPriority::VeryHigh,
                TickPriority::High,
                TickPriority::Normal,
                TickPriority::Low,
            ]
        );
    }

    #[test]
    fn mode_toggles_back_and_forth() {
        assert_eq!(ComparatorMode::Compare.toggled(), ComparatorMode::Subtract);
        assert_eq!(
            ComparatorMode::Compare.toggled().toggled(),
            ComparatorMode::Compare
        );
    }
}
