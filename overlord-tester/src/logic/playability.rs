use std::collections::BTreeMap;

use overlord_game::constants::{
    LOG_REBELLION_PLANET_LOST, LOG_WAR_DEFEAT, LOG_WAR_SURRENDER, LOG_WAR_VICTORY,
};
use overlord_game::{Engine, GameState};
use serde::Serialize;

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{DecisionRecord, SimulationConfig, SimulationSession, TurnOutcome};

/// Label used for runs that hit the day cap without an ending.
pub const ENDING_SURVIVED: &str = "survived";
/// Label used for runs that could not make progress.
pub const ENDING_STALLED: &str = "stalled";

/// Measurements of a single reign.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayabilityMetrics {
    pub days_survived: u32,
    pub ending: String,
    pub final_coins: i32,
    pub final_happiness: i32,
    pub final_rebellion: i32,
    pub final_planets: usize,
    pub peak_planets: usize,
    pub wars_won: u32,
    pub wars_lost: u32,
    pub surrenders: u32,
    pub rebellions: u32,
    pub decisions: usize,
    pub violations: Vec<String>,
}

impl PlayabilityMetrics {
    fn record_turn(&mut self, outcome: &TurnOutcome, state: &GameState) {
        for key in &outcome.new_logs {
            match key.as_str() {
                LOG_WAR_VICTORY => self.wars_won += 1,
                LOG_WAR_DEFEAT => self.wars_lost += 1,
                LOG_WAR_SURRENDER => self.surrenders += 1,
                LOG_REBELLION_PLANET_LOST => self.rebellions += 1,
                _ => {}
            }
        }
        if outcome.decision.is_some() {
            self.decisions += 1;
        }
        self.peak_planets = self.peak_planets.max(state.owned_count());
        self.violations.extend(outcome.violations.iter().cloned());
    }

    fn finalize(&mut self, state: &GameState, stalled: bool) {
        self.days_survived = state.day;
        self.ending = match state.ending() {
            Some(ending) => ending.key().to_string(),
            None if stalled => ENDING_STALLED.to_string(),
            None => ENDING_SURVIVED.to_string(),
        };
        self.final_coins = state.player.coins;
        self.final_happiness = state.player.happiness;
        self.final_rebellion = state.rebellion_chance;
        self.final_planets = state.owned_count();
        self.peak_planets = self.peak_planets.max(self.final_planets);
    }

    #[must_use]
    pub fn survived(&self) -> bool {
        self.ending == ENDING_SURVIVED || self.ending == overlord_game::Ending::Victory.key()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityRecord {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityAggregate {
    pub strategy: GameplayStrategy,
    pub iterations: usize,
    pub survival_rate: f64,
    pub victory_rate: f64,
    pub mean_days: f64,
    pub std_days: f64,
    pub mean_final_coins: f64,
    pub mean_peak_planets: f64,
    pub mean_wars: f64,
    pub mean_rebellions: f64,
    pub endings: BTreeMap<String, usize>,
    pub violations: usize,
}

/// Play one reign to completion with `config`.
#[must_use]
pub fn run_reign(engine: &Engine, config: SimulationConfig, verbose: bool) -> PlayabilityRecord {
    let mut session = SimulationSession::new(engine.clone(), config);
    let mut policy = config.strategy.create_policy(config.seed);
    let mut metrics = PlayabilityMetrics::default();

    let stalled = loop {
        let outcome = session.advance(policy.as_mut());
        metrics.record_turn(&outcome, session.state());
        if verbose && let Some(decision) = &outcome.decision {
            log_decision(decision, session.state());
        }
        if outcome.game_ended {
            break outcome.stalled;
        }
    };

    let final_state = session.into_state();
    metrics.finalize(&final_state, stalled);
    log::debug!(
        "{} seed {} finished on day {} ({})",
        config.strategy,
        config.seed,
        metrics.days_survived,
        metrics.ending
    );

    PlayabilityRecord {
        strategy: config.strategy,
        seed: config.seed,
        metrics,
    }
}

/// Run every strategy over every seed, `iterations` times each. Iteration
/// `n` plays seed `seed + n`.
#[must_use]
pub fn run_playability_analysis(
    engine: &Engine,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
    iterations: usize,
    max_days: u32,
    verbose: bool,
) -> Vec<PlayabilityRecord> {
    let iterations = iterations.max(1);
    let mut records = Vec::with_capacity(strategies.len() * seeds.len() * iterations);

    for &strategy in strategies {
        for &seed in seeds {
            for iteration in 0..iterations {
                let iteration_offset = u64::try_from(iteration).unwrap_or(0);
                let config = SimulationConfig::new(strategy, seed.wrapping_add(iteration_offset))
                    .with_max_days(max_days);
                records.push(run_reign(engine, config, verbose));
            }
        }
    }

    records
}

#[must_use]
pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<GameplayStrategy, AggregateBuilder> = BTreeMap::new();
    for record in records {
        aggregates
            .entry(record.strategy)
            .or_insert_with(|| AggregateBuilder::new(record.strategy))
            .ingest(&record.metrics);
    }
    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

struct AggregateBuilder {
    strategy: GameplayStrategy,
    stats_days: RunningStats,
    iterations: u32,
    survived: u32,
    victories: u32,
    coins_sum: f64,
    peak_planets_sum: f64,
    wars_sum: u32,
    rebellions_sum: u32,
    endings: BTreeMap<String, usize>,
    violations: usize,
}

impl AggregateBuilder {
    fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            stats_days: RunningStats::default(),
            iterations: 0,
            survived: 0,
            victories: 0,
            coins_sum: 0.0,
            peak_planets_sum: 0.0,
            wars_sum: 0,
            rebellions_sum: 0,
            endings: BTreeMap::new(),
            violations: 0,
        }
    }

    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.stats_days.add(f64::from(metrics.days_survived));
        if metrics.survived() {
            self.survived += 1;
        }
        if metrics.ending == overlord_game::Ending::Victory.key() {
            self.victories += 1;
        }
        self.coins_sum += f64::from(metrics.final_coins);
        self.peak_planets_sum += f64::from(u32::try_from(metrics.peak_planets).unwrap_or(u32::MAX));
        self.wars_sum = self
            .wars_sum
            .saturating_add(metrics.wars_won + metrics.wars_lost);
        self.rebellions_sum = self.rebellions_sum.saturating_add(metrics.rebellions);
        *self.endings.entry(metrics.ending.clone()).or_default() += 1;
        self.violations += metrics.violations.len();
    }

    fn finish(self) -> PlayabilityAggregate {
        let runs = f64::from(self.iterations.max(1));
        PlayabilityAggregate {
            strategy: self.strategy,
            iterations: usize::try_from(self.iterations).unwrap_or(usize::MAX),
            survival_rate: f64::from(self.survived) / runs,
            victory_rate: f64::from(self.victories) / runs,
            mean_days: self.stats_days.mean(),
            std_days: self.stats_days.std_dev(),
            mean_final_coins: self.coins_sum / runs,
            mean_peak_planets: self.peak_planets_sum / runs,
            mean_wars: f64::from(self.wars_sum) / runs,
            mean_rebellions: f64::from(self.rebellions_sum) / runs,
            endings: self.endings,
            violations: self.violations,
        }
    }
}

#[derive(Default)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}

fn log_decision(decision: &DecisionRecord, state: &GameState) {
    println!(
        "  day {:>3} | {:<24} -> {:<20} | coins {:>4} happiness {:>3} rebellion {:>3}",
        decision.day,
        decision.visitor_name,
        decision.option_id,
        state.player.coins,
        state.player.happiness,
        state.rebellion_chance
    );
}
