use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::constants::{HAPPINESS_MAX, REBELLION_MAX, TAX_RATE_MAX, WAR_NO_DISCOUNT};
use crate::data::{Planet, Visitor};
use crate::result::Ending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub gender: Option<Gender>,
    pub coins: i32,
    pub happiness: i32,
}

/// Progress through the scientist's funding chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScienceStep {
    #[default]
    NotStarted,
    /// The first grant was paid; the scientist will ask for more.
    AwaitingFunding,
    /// Fully funded; the breakthrough visit is due.
    Funded,
    /// Finished or abandoned. The chain never restarts.
    Concluded,
}

impl ScienceStep {
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::AwaitingFunding => 1,
            Self::Funded => 2,
            Self::Concluded => 3,
        }
    }
}

/// An open bounty contract awaiting its next report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyContract {
    pub next_report_day: u32,
    pub failed_reports: u32,
}

/// Resource levels captured at the start of a day for the summary deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStart {
    pub coins: i32,
    pub happiness: i32,
    pub rebellion: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u32,
    pub coins_change: i32,
    pub happiness_change: i32,
    pub rebellion_change: i32,
}

/// Whether a day summary gates the next visitor draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPhase {
    #[default]
    Hidden,
    /// Staged at day end; the next visitor request reveals it.
    Pending,
    /// On screen until acknowledged.
    Shown,
}

/// The visitor currently at court and, once answered, the reaction to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEncounter {
    pub visitor: Visitor,
    pub reaction: Option<String>,
}

impl ActiveEncounter {
    #[must_use]
    pub const fn new(visitor: Visitor) -> Self {
        Self {
            visitor,
            reaction: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub ending: Ending,
    pub reason: String,
}

/// Complete snapshot of a reign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub planets: Vec<Planet>,
    pub day: u32,
    pub encounter: Option<ActiveEncounter>,
    pub tax_rate: f64,
    pub rebellion_chance: i32,
    pub visits_today: u32,
    pub max_visitors_per_day: u32,
    pub visitors_seen_today: BTreeSet<String>,
    pub science_step: ScienceStep,
    pub bounty: Option<BountyContract>,
    pub god_denied: bool,
    pub jester_hired: bool,
    pub intern_hired: bool,
    pub refugee_banned: bool,
    /// Multiplier on war offer costs; `1.0` means no discount is pending.
    pub war_discount: f64,
    pub day_start: DayStart,
    pub last_day_summary: Option<DaySummary>,
    pub summary_phase: SummaryPhase,
    pub game_over: Option<GameOver>,
    pub logs: Vec<String>,
}

impl GameState {
    /// Fresh reign using the configured starting resources and catalog planets.
    #[must_use]
    pub fn new(cfg: &EngineConfig, planets: &[Planet]) -> Self {
        let start = &cfg.start;
        Self {
            player: Player {
                name: String::new(),
                gender: None,
                coins: start.coins,
                happiness: start.happiness,
            },
            planets: planets.to_vec(),
            day: 1,
            encounter: None,
            tax_rate: start.tax_rate,
            rebellion_chance: 0,
            visits_today: 0,
            max_visitors_per_day: start.max_visitors_per_day,
            visitors_seen_today: BTreeSet::new(),
            science_step: ScienceStep::NotStarted,
            bounty: None,
            god_denied: false,
            jester_hired: false,
            intern_hired: false,
            refugee_banned: false,
            war_discount: WAR_NO_DISCOUNT,
            day_start: DayStart {
                coins: start.coins,
                happiness: start.happiness,
                rebellion: 0,
            },
            last_day_summary: None,
            summary_phase: SummaryPhase::Hidden,
            game_over: None,
            logs: Vec::new(),
        }
    }

    #[must_use]
    pub fn owned_count(&self) -> usize {
        self.planets.iter().filter(|planet| planet.owned).count()
    }

    #[must_use]
    pub fn total_planets(&self) -> usize {
        self.planets.len()
    }

    #[must_use]
    pub fn planet(&self, id: &str) -> Option<&Planet> {
        self.planets.iter().find(|planet| planet.id == id)
    }

    #[must_use]
    pub fn is_owned(&self, id: &str) -> bool {
        self.planet(id).is_some_and(|planet| planet.owned)
    }

    /// Set ownership of a planet, returning whether it exists.
    pub fn set_owned(&mut self, id: &str, owned: bool) -> bool {
        match self.planets.iter_mut().find(|planet| planet.id == id) {
            Some(planet) => {
                planet.owned = owned;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn planet_name(&self, id: &str) -> String {
        self.planet(id)
            .map_or_else(|| String::from("the world"), |planet| planet.name.clone())
    }

    pub fn random_owned_planet<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Planet> {
        let owned: Vec<&Planet> = self.planets.iter().filter(|planet| planet.owned).collect();
        owned.choose(rng).map(|planet| (*planet).clone())
    }

    pub fn random_unowned_planet<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Planet> {
        let unowned: Vec<&Planet> = self.planets.iter().filter(|planet| !planet.owned).collect();
        unowned.choose(rng).map(|planet| (*planet).clone())
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    #[must_use]
    pub fn ending(&self) -> Option<Ending> {
        self.game_over.as_ref().map(|over| over.ending)
    }

    /// A visitor is at court and has not been answered yet.
    #[must_use]
    pub fn awaiting_choice(&self) -> bool {
        self.encounter
            .as_ref()
            .is_some_and(|encounter| encounter.reaction.is_none())
    }

    #[must_use]
    pub fn current_visitor(&self) -> Option<&Visitor> {
        self.encounter.as_ref().map(|encounter| &encounter.visitor)
    }

    #[must_use]
    pub fn reaction_text(&self) -> Option<&str> {
        self.encounter
            .as_ref()
            .and_then(|encounter| encounter.reaction.as_deref())
    }

    #[must_use]
    pub fn summary_outstanding(&self) -> bool {
        !matches!(self.summary_phase, SummaryPhase::Hidden)
    }

    #[must_use]
    pub fn seen_today(&self, visitor_id: &str) -> bool {
        self.visitors_seen_today.contains(visitor_id)
    }

    pub fn add_coins(&mut self, delta: i32) {
        self.player.coins = self.player.coins.saturating_add(delta).max(0);
    }

    pub fn add_happiness(&mut self, delta: i32) {
        self.player.happiness = self
            .player
            .happiness
            .saturating_add(delta)
            .clamp(0, HAPPINESS_MAX);
    }

    pub fn add_rebellion(&mut self, delta: i32) {
        self.rebellion_chance = self
            .rebellion_chance
            .saturating_add(delta)
            .clamp(0, REBELLION_MAX);
    }

    pub fn add_tax_rate(&mut self, delta: f64) {
        let next = self.tax_rate + delta;
        self.tax_rate = if next.is_finite() {
            next.clamp(0.0, TAX_RATE_MAX)
        } else {
            self.tax_rate
        };
    }

    pub fn push_log(&mut self, key: &str) {
        self.logs.push(key.to_string());
    }

    /// Capture the current resources as the baseline for the next summary.
    pub const fn snapshot_day_start(&mut self) {
        self.day_start = DayStart {
            coins: self.player.coins,
            happiness: self.player.happiness,
            rebellion: self.rebellion_chance,
        };
    }

    /// Fail fast on impossible states in debug builds.
    pub fn debug_assert_invariants(&self) {
        debug_assert!(self.player.coins >= 0, "coins went negative");
        debug_assert!(
            (0..=HAPPINESS_MAX).contains(&self.player.happiness),
            "happiness out of range"
        );
        debug_assert!(
            (0.0..=TAX_RATE_MAX).contains(&self.tax_rate),
            "tax rate out of range"
        );
        debug_assert!(self.rebellion_chance >= 0, "rebellion went negative");
        debug_assert!(
            self.visits_today <= self.max_visitors_per_day,
            "visit counter overflowed the day"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn planets() -> Vec<Planet> {
        vec![
            Planet {
                id: "home".to_string(),
                name: "Home".to_string(),
                owned: true,
            },
            Planet {
                id: "far".to_string(),
                name: "Far".to_string(),
                owned: false,
            },
        ]
    }

    #[test]
    fn fresh_state_uses_config() {
        let state = GameState::new(&EngineConfig::default(), &planets());
        assert_eq!(state.player.coins, 100);
        assert_eq!(state.player.happiness, 50);
        assert_eq!(state.day, 1);
        assert_eq!(state.owned_count(), 1);
        assert_eq!(state.total_planets(), 2);
        assert!(!state.awaiting_choice());
        assert!(!state.is_game_over());
    }

    #[test]
    fn resource_helpers_clamp() {
        let mut state = GameState::new(&EngineConfig::default(), &planets());
        state.add_coins(-500);
        assert_eq!(state.player.coins, 0);
        state.add_happiness(500);
        assert_eq!(state.player.happiness, 100);
        state.add_happiness(-500);
        assert_eq!(state.player.happiness, 0);
        state.add_tax_rate(2.0);
        assert!((state.tax_rate - TAX_RATE_MAX).abs() < f64::EPSILON);
        state.add_tax_rate(-2.0);
        assert!(state.tax_rate.abs() < f64::EPSILON);
        state.add_rebellion(-10);
        assert_eq!(state.rebellion_chance, 0);
    }

    #[test]
    fn random_planet_helpers_respect_ownership() {
        let state = GameState::new(&EngineConfig::default(), &planets());
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(state.random_owned_planet(&mut rng).unwrap().id, "home");
            assert_eq!(state.random_unowned_planet(&mut rng).unwrap().id, "far");
        }
    }

    #[test]
    fn ownership_toggles_by_id() {
        let mut state = GameState::new(&EngineConfig::default(), &planets());
        assert!(state.set_owned("far", true));
        assert_eq!(state.owned_count(), 2);
        assert!(!state.set_owned("nowhere", true));
        assert_eq!(state.planet_name("nowhere"), "the world");
    }

    #[test]
    fn gender_parses() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert!("duck".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.to_string(), "male");
    }
}
