//! Action dispatch over explicit game-state values.
//!
//! Every action takes the current [`GameState`] and returns the next one. The
//! input is never mutated, so callers can keep snapshots, diff them, or
//! discard a rejected transition without cleanup.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DataLoader;
use crate::catalog::Catalog;
use crate::config::{ConfigError, EngineConfig};
use crate::constants::{
    LOG_BOUNTY_FAILURE, LOG_BOUNTY_SUCCESS, LOG_DIVINE_WRATH, LOG_DONATION, LOG_TUTORIAL,
};
use crate::day_cycle::{clear_summary, close_visit};
use crate::effects::apply_effects;
use crate::selector::{Guard, select_visitor};
use crate::state::{ActiveEncounter, Gender, GameState, SummaryPhase};

/// The operations the presentation layer may perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Initialize {
        name: String,
        #[serde(default)]
        gender: Option<Gender>,
    },
    RequestVisitor,
    ChooseOption {
        index: usize,
    },
    AcknowledgeDaySummary,
    Reset,
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the reign is over")]
    GameOver,
    #[error("a visitor is still waiting for an answer")]
    VisitorWaiting,
    #[error("no visitor is waiting for an answer")]
    NoPendingChoice,
    #[error("a day summary must be acknowledged first")]
    SummaryOutstanding,
    #[error("there is no day summary to acknowledge")]
    NoSummary,
    #[error("option {index} does not exist; the visitor offers {available}")]
    UnknownOption { index: usize, available: usize },
    #[error("option costs {cost} coins but the treasury holds {coins}")]
    Unaffordable { cost: i32, coins: i32 },
}

/// Content and balance shared by every reign.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
}

impl Engine {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn new(catalog: Catalog, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// Build an engine from any content source.
    ///
    /// # Errors
    ///
    /// Propagates loader failures and config validation errors.
    pub fn from_loader<L>(loader: &L) -> Result<Self, L::Error>
    where
        L: DataLoader,
        L::Error: From<ConfigError>,
    {
        let catalog = loader.load_catalog()?;
        let config = loader.load_config()?;
        Ok(Self::new(catalog, config)?)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The state of a reign that has not started yet.
    #[must_use]
    pub fn initial_state(&self) -> GameState {
        GameState::new(&self.config, &self.catalog.planets)
    }

    /// Apply `action`, returning the unchanged state when it is rejected.
    pub fn dispatch<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        action: &Action,
        rng: &mut R,
    ) -> GameState {
        match self.try_dispatch(state, action, rng) {
            Ok(next) => next,
            Err(rejection) => {
                log::debug!("ignored {action:?}: {rejection}");
                state.clone()
            }
        }
    }

    /// Apply `action`, surfacing why it was ignored.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] when the action is not valid for `state`.
    pub fn try_dispatch<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        action: &Action,
        rng: &mut R,
    ) -> Result<GameState, Rejection> {
        let next = match action {
            Action::Initialize { name, gender } => self.initialize(name, *gender),
            Action::RequestVisitor => self.request_visitor(state, rng)?,
            Action::ChooseOption { index } => self.choose_option(state, *index, rng)?,
            Action::AcknowledgeDaySummary => self.acknowledge_day_summary(state, rng)?,
            Action::Reset => self.reset(),
        };
        next.debug_assert_invariants();
        Ok(next)
    }

    /// Start a fresh reign for the named overlord.
    #[must_use]
    pub fn initialize(&self, name: &str, gender: Option<Gender>) -> GameState {
        let mut state = self.initial_state();
        state.player.name = name.trim().to_string();
        state.player.gender = gender;
        log::info!("reign started for {:?}", state.player.name);
        state
    }

    /// Draw the next visitor, or reveal a pending day summary.
    ///
    /// # Errors
    ///
    /// Rejected while the game is over, a visitor awaits an answer, or a
    /// summary is on screen.
    pub fn request_visitor<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> Result<GameState, Rejection> {
        if state.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if state.awaiting_choice() {
            return Err(Rejection::VisitorWaiting);
        }

        let mut next = state.clone();
        match state.summary_phase {
            SummaryPhase::Shown => return Err(Rejection::SummaryOutstanding),
            SummaryPhase::Pending => {
                next.summary_phase = SummaryPhase::Shown;
                next.encounter = None;
                return Ok(next);
            }
            SummaryPhase::Hidden => {}
        }

        let selection = select_visitor(&mut next, &self.catalog, &self.config, rng);
        if let Some(key) = guard_log_key(selection.guard) {
            next.push_log(key);
        }
        next.encounter = selection.visitor.map(ActiveEncounter::new);
        Ok(next)
    }

    /// Resolve option `index` of the visitor awaiting an answer.
    ///
    /// # Errors
    ///
    /// Rejected when the game is over, a summary is outstanding, no visitor
    /// awaits an answer, the index is out of range, or the option costs more
    /// coins than the treasury holds.
    pub fn choose_option<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        index: usize,
        rng: &mut R,
    ) -> Result<GameState, Rejection> {
        if state.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if state.summary_outstanding() {
            return Err(Rejection::SummaryOutstanding);
        }
        let visitor = match &state.encounter {
            Some(encounter) if encounter.reaction.is_none() => &encounter.visitor,
            _ => return Err(Rejection::NoPendingChoice),
        };
        let option = visitor.option(index).ok_or(Rejection::UnknownOption {
            index,
            available: visitor.options.len(),
        })?;
        if !option.effects.is_affordable(state.player.coins) {
            return Err(Rejection::Unaffordable {
                cost: option.effects.coin_cost(),
                coins: state.player.coins,
            });
        }

        let mut next = state.clone();
        let outcome = apply_effects(&mut next, &option.effects, &self.config, rng);
        close_visit(
            &mut next,
            &visitor.id,
            &option.reaction,
            outcome.narrative,
            &self.config,
            rng,
        );
        Ok(next)
    }

    /// Dismiss the day summary and immediately request the next visitor.
    ///
    /// # Errors
    ///
    /// Rejected when the game is over or no summary is staged.
    pub fn acknowledge_day_summary<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> Result<GameState, Rejection> {
        if state.is_game_over() {
            return Err(Rejection::GameOver);
        }
        let mut next = state.clone();
        if !clear_summary(&mut next) {
            return Err(Rejection::NoSummary);
        }
        self.request_visitor(&next, rng)
    }

    /// Discard the reign entirely.
    #[must_use]
    pub fn reset(&self) -> GameState {
        self.initial_state()
    }
}

const fn guard_log_key(guard: Guard) -> Option<&'static str> {
    match guard {
        Guard::Tutorial => Some(LOG_TUTORIAL),
        Guard::Donation => Some(LOG_DONATION),
        Guard::DivineWrath => Some(LOG_DIVINE_WRATH),
        Guard::BountySuccess => Some(LOG_BOUNTY_SUCCESS),
        Guard::BountyFailure => Some(LOG_BOUNTY_FAILURE),
        _ => None,
    }
}
