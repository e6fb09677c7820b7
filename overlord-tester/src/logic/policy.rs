use std::fmt;
use std::str::FromStr;

use overlord_game::{CampaignKind, Effects, GameState, SpecialEffect, Visitor};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub option_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(option_index: usize, rationale: Option<String>) -> Self {
        Self {
            option_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select an option for the visitor at court. Returns `None` when the
    /// treasury cannot cover any of them.
    fn pick_option(&mut self, state: &GameState, visitor: &Visitor) -> Option<PolicyDecision>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    Cautious,
    Greedy,
    Populist,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Greedy, Self::Populist, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Greedy => "Greedy",
            Self::Populist => "Populist",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Greedy => "greedy",
            Self::Populist => "populist",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Cautious => "avoid spending, unrest and gambles",
            Self::Greedy => "chase coins and new planets",
            Self::Populist => "keep the ducks happy and rebellion low",
            Self::Random => "any affordable option, seeded",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Cautious => Box::new(ScoringPolicy::new(self, cautious_score)),
            Self::Greedy => Box::new(ScoringPolicy::new(self, greedy_score)),
            Self::Populist => Box::new(ScoringPolicy::new(self, populist_score)),
            Self::Random => Box::new(RandomPolicy {
                rng: ChaCha20Rng::seed_from_u64(seed),
            }),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy: {s}"))
    }
}

type ScoreFn = fn(&GameState, &Effects) -> i32;

/// Picks the affordable option with the highest score; ties go to the
/// earliest option.
struct ScoringPolicy {
    strategy: GameplayStrategy,
    score: ScoreFn,
}

impl ScoringPolicy {
    const fn new(strategy: GameplayStrategy, score: ScoreFn) -> Self {
        Self { strategy, score }
    }
}

impl PlayerPolicy for ScoringPolicy {
    fn name(&self) -> &'static str {
        self.strategy.label()
    }

    fn pick_option(&mut self, state: &GameState, visitor: &Visitor) -> Option<PolicyDecision> {
        let mut best: Option<(usize, i32)> = None;
        for (idx, option) in affordable(state, visitor) {
            let score = (self.score)(state, &option.effects);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, score)| PolicyDecision::new(idx, Some(format!("score {score}"))))
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        GameplayStrategy::Random.label()
    }

    fn pick_option(&mut self, state: &GameState, visitor: &Visitor) -> Option<PolicyDecision> {
        let candidates: Vec<usize> = affordable(state, visitor).map(|(idx, _)| idx).collect();
        candidates
            .choose(&mut self.rng)
            .map(|idx| PolicyDecision::new(*idx, None))
    }
}

fn affordable<'a>(
    state: &'a GameState,
    visitor: &'a Visitor,
) -> impl Iterator<Item = (usize, &'a overlord_game::VisitorOption)> + 'a {
    visitor
        .options
        .iter()
        .enumerate()
        .filter(|(_, option)| option.effects.is_affordable(state.player.coins))
}

fn cautious_score(state: &GameState, effects: &Effects) -> i32 {
    let mut risk = effects.coin_cost() * 2
        + (-effects.happiness).max(0) * 3
        + effects.rebellion.max(0) * 4;
    risk += match &effects.special {
        Some(SpecialEffect::Gamble) => 40,
        Some(SpecialEffect::StartWar {
            campaign: CampaignKind::Attack,
            ..
        }) => 60,
        Some(SpecialEffect::StartWar { .. }) => 10,
        Some(SpecialEffect::Surrender { .. }) => surrender_penalty(state),
        Some(SpecialEffect::CancelContract) => 20,
        _ => 0,
    };
    if effects.add_planet.is_some() {
        risk -= 100;
    }
    -risk
}

fn greedy_score(state: &GameState, effects: &Effects) -> i32 {
    let mut reward = effects.coins * 2 + effects.happiness / 2 - effects.rebellion;
    reward += match &effects.special {
        Some(SpecialEffect::Gamble) => 30,
        Some(SpecialEffect::TaxCollection) => 50,
        Some(SpecialEffect::StartWar { investment, .. }) => 120 + investment / 2,
        Some(SpecialEffect::Surrender { .. }) => -surrender_penalty(state),
        Some(SpecialEffect::ScienceStart | SpecialEffect::ScienceContinue) => 40,
        _ => 0,
    };
    if effects.add_planet.is_some() {
        reward += 200;
    }
    if state.player.happiness + effects.happiness <= 10 {
        reward -= 150;
    }
    reward
}

fn populist_score(state: &GameState, effects: &Effects) -> i32 {
    let mut score = effects.happiness * 3 - effects.rebellion * 4 + effects.coins / 4;
    score += match &effects.special {
        Some(SpecialEffect::HireJester) => 30,
        Some(SpecialEffect::StartWar { .. }) => 20,
        Some(SpecialEffect::Surrender { .. }) => -surrender_penalty(state),
        Some(SpecialEffect::Gamble) => -10,
        _ => 0,
    };
    if effects.add_planet.is_some() {
        score += 120;
    }
    if state.player.coins + effects.coins < 20 {
        score -= 100;
    }
    score
}

/// Giving up a planet is fatal when it is the last one.
fn surrender_penalty(state: &GameState) -> i32 {
    if state.owned_count() <= 1 { 1_000 } else { 150 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlord_game::{BundledContent, Engine, VisitorOption};

    fn state_with_coins(coins: i32) -> GameState {
        let mut state = Engine::from_loader(&BundledContent)
            .unwrap()
            .initialize("Tester", None);
        state.player.coins = coins;
        state
    }

    fn option(id: &str, effects: Effects) -> VisitorOption {
        VisitorOption::new(id, id, "").with_effects(effects)
    }

    fn visitor() -> Visitor {
        Visitor::scripted(
            "merchant",
            "Merchant",
            "merchant.png",
            "Wares?",
            vec![
                option(
                    "luxury",
                    Effects {
                        coins: -200,
                        happiness: 40,
                        ..Effects::default()
                    },
                ),
                option(
                    "sell",
                    Effects {
                        coins: 30,
                        happiness: -5,
                        ..Effects::default()
                    },
                ),
                option(
                    "festival",
                    Effects {
                        coins: -20,
                        happiness: 15,
                        rebellion: -5,
                        ..Effects::default()
                    },
                ),
                option(
                    "gamble",
                    Effects {
                        special: Some(SpecialEffect::Gamble),
                        ..Effects::default()
                    },
                ),
            ],
        )
    }

    #[test]
    fn strategies_pick_what_they_value() {
        let state = state_with_coins(100);
        let visitor = visitor();
        let pick = |strategy: GameplayStrategy| {
            strategy
                .create_policy(1)
                .pick_option(&state, &visitor)
                .unwrap()
                .option_index
        };
        assert_eq!(pick(GameplayStrategy::Greedy), 1);
        assert_eq!(pick(GameplayStrategy::Populist), 2);
        assert_eq!(pick(GameplayStrategy::Cautious), 1);
    }

    #[test]
    fn policies_never_pick_unaffordable_options() {
        let state = state_with_coins(100);
        let visitor = visitor();
        for strategy in GameplayStrategy::ALL {
            let mut policy = strategy.create_policy(7);
            for _ in 0..50 {
                let decision = policy.pick_option(&state, &visitor).unwrap();
                assert_ne!(decision.option_index, 0, "{strategy} bought the luxury");
            }
        }
    }

    #[test]
    fn nothing_affordable_yields_no_decision() {
        let state = state_with_coins(5);
        let broke = Visitor::scripted(
            "collector",
            "Collector",
            "collector.png",
            "Pay up.",
            vec![option(
                "pay",
                Effects {
                    coins: -50,
                    ..Effects::default()
                },
            )],
        );
        for strategy in GameplayStrategy::ALL {
            assert!(strategy.create_policy(3).pick_option(&state, &broke).is_none());
        }
    }

    #[test]
    fn cautious_never_abandons_the_last_planet() {
        let state = state_with_coins(100);
        let general = Visitor::scripted(
            "war_general",
            "General",
            "general.png",
            "They come.",
            vec![
                option(
                    "defend",
                    Effects {
                        coins: -60,
                        special: Some(SpecialEffect::StartWar {
                            campaign: CampaignKind::Defense,
                            defended_planet: Some("quackus_prime".to_string()),
                            enemy_planet: Some("mallardia".to_string()),
                            investment: 60,
                        }),
                        ..Effects::default()
                    },
                ),
                option(
                    "abandon",
                    Effects {
                        special: Some(SpecialEffect::Surrender {
                            planet: "quackus_prime".to_string(),
                        }),
                        ..Effects::default()
                    },
                ),
            ],
        );
        let mut policy = GameplayStrategy::Cautious.create_policy(0);
        assert_eq!(policy.pick_option(&state, &general).unwrap().option_index, 0);
    }

    #[test]
    fn parses_strategy_keys() {
        assert_eq!(
            " Greedy ".parse::<GameplayStrategy>(),
            Ok(GameplayStrategy::Greedy)
        );
        assert!("reckless".parse::<GameplayStrategy>().is_err());
    }
}
