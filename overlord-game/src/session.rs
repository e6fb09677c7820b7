use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;

use crate::engine::{Action, Engine, Rejection};
use crate::state::{Gender, GameState};

/// Receives every state produced by a [`GameSession`].
pub trait StateObserver {
    fn on_action(&mut self, action: &Action, state: &GameState);
}

impl<F> StateObserver for F
where
    F: FnMut(&Action, &GameState),
{
    fn on_action(&mut self, action: &Action, state: &GameState) {
        self(action, state);
    }
}

/// A reign in progress: engine, current state, random source and observers.
pub struct GameSession<R: Rng = ChaCha20Rng> {
    engine: Engine,
    state: GameState,
    rng: R,
    observers: Vec<Box<dyn StateObserver>>,
}

impl GameSession<ChaCha20Rng> {
    /// Deterministic session: the same seed and choices replay the same reign.
    #[must_use]
    pub fn from_seed(engine: Engine, seed: u64) -> Self {
        Self::with_rng(engine, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Deterministically reseed the random source.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }
}

impl<R: Rng> GameSession<R> {
    #[must_use]
    pub fn with_rng(engine: Engine, rng: R) -> Self {
        let state = engine.initial_state();
        Self {
            engine,
            state,
            rng,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply an action; rejected actions leave the state unchanged. Observers
    /// are notified either way.
    pub fn apply(&mut self, action: &Action) -> &GameState {
        self.state = self.engine.dispatch(&self.state, action, &mut self.rng);
        self.notify(action);
        &self.state
    }

    /// Apply an action, reporting why it was ignored. Observers only hear
    /// about accepted actions.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] and keeps the current state.
    pub fn try_apply(&mut self, action: &Action) -> Result<&GameState, Rejection> {
        self.state = self
            .engine
            .try_dispatch(&self.state, action, &mut self.rng)?;
        self.notify(action);
        Ok(&self.state)
    }

    pub fn initialize(&mut self, name: &str, gender: Option<Gender>) -> &GameState {
        self.apply(&Action::Initialize {
            name: name.to_string(),
            gender,
        })
    }

    pub fn request_visitor(&mut self) -> &GameState {
        self.apply(&Action::RequestVisitor)
    }

    pub fn choose_option(&mut self, index: usize) -> &GameState {
        self.apply(&Action::ChooseOption { index })
    }

    pub fn acknowledge_day_summary(&mut self) -> &GameState {
        self.apply(&Action::AcknowledgeDaySummary)
    }

    pub fn reset(&mut self) -> &GameState {
        self.apply(&Action::Reset)
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Apply a closure to the mutable game state, bypassing the actions.
    /// Intended for tests and tools that stage specific situations.
    pub fn with_state_mut<T>(&mut self, f: impl FnOnce(&mut GameState) -> T) -> T {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    fn notify(&mut self, action: &Action) {
        for observer in &mut self.observers {
            observer.on_action(action, &self.state);
        }
    }
}

impl<R: Rng> fmt::Debug for GameSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
