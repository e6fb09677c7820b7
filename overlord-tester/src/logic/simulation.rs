use anyhow::{Result, anyhow};
use overlord_game::constants::{HAPPINESS_MAX, REBELLION_MAX, TAX_RATE_MAX};
use overlord_game::{Action, DaySummary, Engine, GameSession, GameState, SummaryPhase};
use serde::Serialize;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

const DEFAULT_MAX_DAYS: u32 = 60;
/// Action budget per simulated day; a reign that spends it is stuck.
const ACTIONS_PER_DAY: u32 = 100;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_days: u32,
    pub max_actions: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_days: DEFAULT_MAX_DAYS,
            max_actions: action_budget(DEFAULT_MAX_DAYS),
        }
    }

    /// Also resizes the action budget to the new day cap.
    #[must_use]
    pub const fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self.max_actions = action_budget(max_days);
        self
    }

    #[must_use]
    pub const fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }
}

const fn action_budget(max_days: u32) -> u32 {
    max_days.saturating_add(1).saturating_mul(ACTIONS_PER_DAY)
}

/// Snapshot of an answered visitor.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub day: u32,
    pub visitor_id: String,
    pub visitor_name: String,
    pub option_index: usize,
    pub option_id: String,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Result of one step of the autoplay loop.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    pub decision: Option<DecisionRecord>,
    pub summary: Option<DaySummary>,
    /// Log keys the engine recorded during this step.
    pub new_logs: Vec<String>,
    pub violations: Vec<String>,
    pub stalled: bool,
    pub game_ended: bool,
}

/// Drives one reign through the engine's public actions.
#[derive(Debug)]
pub struct SimulationSession {
    session: GameSession,
    max_days: u32,
    max_actions: u32,
    actions: u32,
}

impl SimulationSession {
    #[must_use]
    pub fn new(engine: Engine, config: SimulationConfig) -> Self {
        let mut session = GameSession::from_seed(engine, config.seed);
        session.initialize(&format!("{} Duck", config.strategy), None);
        Self {
            session,
            max_days: config.max_days,
            max_actions: config.max_actions,
            actions: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.session.state()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.session.into_state()
    }

    /// Perform the next action the court calls for: reveal or acknowledge a
    /// day summary, answer the visitor, or summon a new one.
    pub fn advance(&mut self, policy: &mut dyn PlayerPolicy) -> TurnOutcome {
        let before = self.session.state().clone();
        let mut outcome = TurnOutcome::default();
        self.actions = self.actions.saturating_add(1);

        let step = match before.summary_phase {
            SummaryPhase::Pending => self
                .apply(&Action::RequestVisitor)
                .and_then(|()| self.apply(&Action::AcknowledgeDaySummary))
                .map(|()| outcome.summary = before.last_day_summary),
            SummaryPhase::Shown => self.apply(&Action::AcknowledgeDaySummary),
            SummaryPhase::Hidden => match before.current_visitor() {
                Some(visitor) if before.awaiting_choice() => {
                    match policy.pick_option(&before, visitor) {
                        Some(PolicyDecision {
                            option_index,
                            rationale,
                        }) => {
                            outcome.decision = Some(DecisionRecord {
                                day: before.day,
                                visitor_id: visitor.id.clone(),
                                visitor_name: visitor.name.clone(),
                                option_index,
                                option_id: visitor
                                    .option(option_index)
                                    .map_or_else(String::new, |option| option.id.clone()),
                                policy_name: policy.name().to_string(),
                                rationale,
                            });
                            self.apply(&Action::ChooseOption {
                                index: option_index,
                            })
                        }
                        None => {
                            outcome.stalled = true;
                            Ok(())
                        }
                    }
                }
                _ => self.apply(&Action::RequestVisitor),
            },
        };
        if let Err(err) = step {
            outcome.violations.push(err.to_string());
        }

        let after = self.session.state();
        if !after.is_game_over()
            && after.summary_phase == SummaryPhase::Hidden
            && after.encounter.is_none()
        {
            // The pool had nobody left to send; the day can never finish.
            outcome.stalled = true;
        }
        if !after.is_game_over() && self.actions >= self.max_actions {
            log::warn!(
                "reign still on day {} after {} actions; treating it as stalled",
                after.day,
                self.actions
            );
            outcome.stalled = true;
        }
        outcome.new_logs = after.logs[before.logs.len().min(after.logs.len())..].to_vec();
        outcome
            .violations
            .extend(check_invariants(&before, after));
        outcome.game_ended = after.is_game_over() || outcome.stalled || after.day > self.max_days;
        outcome
    }

    fn apply(&mut self, action: &Action) -> Result<()> {
        self.session
            .try_apply(action)
            .map(|_| ())
            .map_err(|rejection| anyhow!("engine rejected {action:?}: {rejection}"))
    }
}

/// Bounds every reachable state must respect.
#[must_use]
pub fn check_invariants(before: &GameState, after: &GameState) -> Vec<String> {
    let mut violations = Vec::new();
    let mut expect = |ok: bool, message: String| {
        if !ok {
            violations.push(message);
        }
    };

    expect(
        after.player.coins >= 0,
        format!("coins went negative: {}", after.player.coins),
    );
    expect(
        (0..=HAPPINESS_MAX).contains(&after.player.happiness),
        format!("happiness out of range: {}", after.player.happiness),
    );
    expect(
        (0..=REBELLION_MAX).contains(&after.rebellion_chance),
        format!("rebellion out of range: {}", after.rebellion_chance),
    );
    expect(
        (0.0..=TAX_RATE_MAX).contains(&after.tax_rate),
        format!("tax rate out of range: {}", after.tax_rate),
    );
    expect(
        after.visits_today <= after.max_visitors_per_day,
        format!(
            "visits {} exceed the daily limit {}",
            after.visits_today, after.max_visitors_per_day
        ),
    );
    expect(
        after.day == before.day || after.day == before.day + 1,
        format!("day jumped from {} to {}", before.day, after.day),
    );
    expect(
        !before.is_game_over() || before.game_over == after.game_over,
        "game over was undone".to_string(),
    );
    violations
}
