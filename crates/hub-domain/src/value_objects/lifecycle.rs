//! Component lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one component instance
///
/// States only move forward; `Failed` is reachable from any non-terminal
/// state. `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Descriptor registered, nothing built yet
    #[default]
    Registered,
    /// Configuration bound
    Configured,
    /// Instance constructed with its dependencies
    Injected,
    /// Init phase succeeded
    Initialized,
    /// Startup finished; the Run phase (if any) was started
    Running,
    /// Close phase attempted successfully
    Closed,
    /// A phase failed
    Failed,
}

impl LifecycleState {
    fn rank(self) -> u8 {
        match self {
            Self::Registered => 0,
            Self::Configured => 1,
            Self::Injected => 2,
            Self::Initialized => 3,
            Self::Running => 4,
            Self::Closed => 5,
            Self::Failed => 6,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    /// Whether `next` is a legal transition from this state
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Failed || next.rank() > self.rank()
    }

    /// Whether the instance passed Init and still needs a Close attempt
    pub fn needs_close(self) -> bool {
        matches!(self, Self::Initialized | Self::Running)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
