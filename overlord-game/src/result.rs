//! Terminal conditions of a reign
use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Ways a reign can end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// Every planet in the galaxy is owned
    Victory,
    /// The treasury hit zero
    Bankruptcy,
    /// No planets remain under the overlord's control
    TerritorialCollapse,
    /// Happiness hit zero
    Uprising,
    /// Rebellion struck and the overlord could not pay the penalty
    Execution,
}

impl Ending {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Bankruptcy => "bankruptcy",
            Self::TerritorialCollapse => "territorial_collapse",
            Self::Uprising => "uprising",
            Self::Execution => "execution",
        }
    }

    /// Player-facing explanation shown on the game-over screen.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Victory => {
                "Every world in the galaxy now flies your banner. Your ducks will sing of the greatest overlord ever hatched."
            }
            Self::Bankruptcy => {
                "The vaults are empty. Without a single coin left, your empire sinks under its debts."
            }
            Self::TerritorialCollapse => {
                "Not one planet answers to you anymore. An overlord without worlds is no overlord at all."
            }
            Self::Uprising => {
                "Your subjects have had enough. Riots sweep every world and you are driven from the throne."
            }
            Self::Execution => {
                "Rebellion engulfs the empire and you have nothing left to buy peace. The mob drags you from the throne and ends your reign for good."
            }
        }
    }

    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// First terminal condition met by `state`, in priority order.
///
/// Victory is checked first so a transition that completes the galaxy is
/// never reported as a loss.
#[must_use]
pub fn check_terminal(state: &GameState) -> Option<Ending> {
    let owned = state.owned_count();
    if owned > 0 && owned == state.total_planets() {
        return Some(Ending::Victory);
    }
    if state.player.coins == 0 {
        return Some(Ending::Bankruptcy);
    }
    if owned == 0 {
        return Some(Ending::TerritorialCollapse);
    }
    if state.player.happiness == 0 {
        return Some(Ending::Uprising);
    }
    None
}
