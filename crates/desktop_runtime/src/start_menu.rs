//! Start-menu open/close transition machine.
//!
//! Opening and closing take a fixed transition time. Launch actions are only considered safe
//! once the menu reports [`StartMenuPhase::Open`], which the DOM exposes as the
//! `start-menu-ready` marker class.

use platform_host::{deadline_after, is_past_deadline};
use serde::{Deserialize, Serialize};

/// Start-menu phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMenuPhase {
    /// Hidden.
    #[default]
    Closed,
    /// Animating in; settles into `Open` at `settle_at_ms`.
    Opening {
        /// Absolute settle time.
        settle_at_ms: u64,
    },
    /// Fully shown; launcher clicks are safe.
    Open,
    /// Animating out; settles into `Closed` at `settle_at_ms`.
    Closing {
        /// Absolute settle time.
        settle_at_ms: u64,
    },
}

impl StartMenuPhase {
    /// Stable token for `data-state`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening { .. } => "opening",
            Self::Open => "open",
            Self::Closing { .. } => "closing",
        }
    }

    /// Whether the menu should be rendered at all.
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether the open transition has completed.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether the menu is open or heading there.
    pub const fn is_opening_or_open(self) -> bool {
        matches!(self, Self::Opening { .. } | Self::Open)
    }

    /// Settle time of an in-flight transition.
    pub const fn settle_at_ms(self) -> Option<u64> {
        match self {
            Self::Opening { settle_at_ms } | Self::Closing { settle_at_ms } => Some(settle_at_ms),
            Self::Closed | Self::Open => None,
        }
    }

    /// Flips direction. Returns the settle time the caller must schedule a tick for.
    pub fn toggle(&mut self, now_ms: u64, transition_ms: u64) -> Option<u64> {
        if self.is_opening_or_open() {
            self.close(now_ms, transition_ms)
        } else {
            let settle_at_ms = deadline_after(now_ms, transition_ms);
            *self = Self::Opening { settle_at_ms };
            Some(settle_at_ms)
        }
    }

    /// Starts closing unless already closed or closing.
    pub fn close(&mut self, now_ms: u64, transition_ms: u64) -> Option<u64> {
        if !self.is_opening_or_open() {
            return None;
        }
        let settle_at_ms = deadline_after(now_ms, transition_ms);
        *self = Self::Closing { settle_at_ms };
        Some(settle_at_ms)
    }

    /// Settles a finished transition. Returns whether the phase changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let next = match *self {
            Self::Opening { settle_at_ms } if is_past_deadline(now_ms, settle_at_ms) => Self::Open,
            Self::Closing { settle_at_ms } if is_past_deadline(now_ms, settle_at_ms) => {
                Self::Closed
            }
            _ => return false,
        };
        *self = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn open_cycle_reaches_ready_only_after_transition() {
        let mut phase = StartMenuPhase::Closed;
        assert_eq!(phase.toggle(1_000, 200), Some(1_200));
        assert!(phase.is_visible());
        assert!(!phase.is_ready());

        assert!(!phase.tick(1_199));
        assert!(phase.tick(1_200));
        assert!(phase.is_ready());

        assert_eq!(phase.toggle(2_000, 200), Some(2_200));
        assert_eq!(phase.as_str(), "closing");
        assert!(phase.tick(5_000));
        assert_eq!(phase, StartMenuPhase::Closed);
    }

    #[test]
    fn settle_time_is_reported_only_mid_transition() {
        let mut phase = StartMenuPhase::Closed;
        assert_eq!(phase.settle_at_ms(), None);
        phase.toggle(0, 200);
        assert_eq!(phase.settle_at_ms(), Some(200));
        phase.tick(200);
        assert_eq!(phase.settle_at_ms(), None);
    }

    #[test]
    fn toggling_mid_transition_reverses_direction() {
        let mut phase = StartMenuPhase::Closed;
        phase.toggle(0, 200);
        phase.toggle(50, 200);
        assert_eq!(phase, StartMenuPhase::Closing { settle_at_ms: 250 });
        phase.toggle(60, 200);
        assert_eq!(phase, StartMenuPhase::Opening { settle_at_ms: 260 });
    }

    #[test]
    fn close_is_noop_when_closed() {
        let mut phase = StartMenuPhase::Closed;
        assert_eq!(phase.close(0, 200), None);
        assert!(!phase.tick(10_000));
    }
}
