//! Applying a chosen option to the game state
use rand::Rng;

use crate::config::EngineConfig;
use crate::constants::{
    LOG_BOUNTY_CANCELLED, LOG_BOUNTY_STARTED, LOG_GAMBLE_LOST, LOG_GAMBLE_WON,
    LOG_PLANET_GRANTED, LOG_SCIENCE_STEP, LOG_TAX_COLLECTED, LOG_WAR_SURRENDER,
    PROPHECY_DIRE_REBELLION, PROPHECY_WARNING_REBELLION, WAR_NO_DISCOUNT,
};
use crate::data::{Effects, SpecialEffect};
use crate::numbers::{count_to_f64, round_f64_to_i32};
use crate::state::{BountyContract, GameState, ScienceStep};
use crate::war::{WarPlan, WarReport, resolve_war};

/// What resolving an option produced beyond the state change itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceOutcome {
    /// Narrative generated by special effects, appended to the reaction.
    pub narrative: Vec<String>,
    pub war: Option<WarReport>,
}

/// Apply `effects` to `state`: numeric deltas first (clamped), then the
/// planet grant, then the special effect.
pub fn apply_effects<R: Rng + ?Sized>(
    state: &mut GameState,
    effects: &Effects,
    cfg: &EngineConfig,
    rng: &mut R,
) -> ChoiceOutcome {
    state.add_coins(effects.coins);
    state.add_happiness(effects.happiness);
    state.add_tax_rate(effects.tax_rate);
    state.add_rebellion(effects.rebellion);

    if let Some(planet) = effects.add_planet.as_deref()
        && state.set_owned(planet, true)
    {
        state.push_log(LOG_PLANET_GRANTED);
    }

    let mut outcome = ChoiceOutcome::default();
    if let Some(special) = &effects.special {
        apply_special(state, special, cfg, rng, &mut outcome);
    }
    outcome
}

fn apply_special<R: Rng + ?Sized>(
    state: &mut GameState,
    special: &SpecialEffect,
    cfg: &EngineConfig,
    rng: &mut R,
    outcome: &mut ChoiceOutcome,
) {
    match special {
        SpecialEffect::Gamble => gamble(state, cfg, rng, outcome),
        SpecialEffect::Prophecy => outcome.narrative.push(prophecy(state.rebellion_chance)),
        SpecialEffect::TaxCollection => {
            let income = tax_income(state, cfg);
            state.add_coins(income);
            state.push_log(LOG_TAX_COLLECTED);
            outcome
                .narrative
                .push(format!("The vaults swell by {income} coins of honest labor."));
        }
        SpecialEffect::StartContract => {
            state.bounty = Some(BountyContract {
                next_report_day: state.day + 1,
                failed_reports: 0,
            });
            state.push_log(LOG_BOUNTY_STARTED);
        }
        SpecialEffect::ContinueContract => {
            let failed_reports = state
                .bounty
                .map_or(1, |contract| contract.failed_reports + 1);
            state.bounty = Some(BountyContract {
                next_report_day: state.day + 1,
                failed_reports,
            });
        }
        SpecialEffect::CancelContract => {
            state.bounty = None;
            state.push_log(LOG_BOUNTY_CANCELLED);
        }
        SpecialEffect::ScienceStart => advance_science(state, ScienceStep::AwaitingFunding),
        SpecialEffect::ScienceContinue => advance_science(state, ScienceStep::Funded),
        SpecialEffect::ScienceComplete => advance_science(state, ScienceStep::Concluded),
        SpecialEffect::StartWar {
            campaign,
            defended_planet,
            enemy_planet,
            investment,
        } => {
            let plan = WarPlan {
                campaign: *campaign,
                investment: *investment,
                defended_planet: defended_planet.clone(),
                enemy_planet: enemy_planet.clone(),
            };
            let report = resolve_war(state, &cfg.war, &plan, rng);
            outcome.narrative.push(report.narrative.clone());
            outcome.war = Some(report);
            state.war_discount = WAR_NO_DISCOUNT;
        }
        SpecialEffect::Surrender { planet } => {
            state.set_owned(planet, false);
            state.push_log(LOG_WAR_SURRENDER);
            outcome
                .narrative
                .push(format!("You abandon {}.", state.planet_name(planet)));
            state.war_discount = WAR_NO_DISCOUNT;
        }
        SpecialEffect::DenyGod => state.god_denied = true,
        SpecialEffect::HireJester => state.jester_hired = true,
        SpecialEffect::HireIntern => state.intern_hired = true,
        SpecialEffect::BanRefugees => state.refugee_banned = true,
        SpecialEffect::WarDiscount { factor } => {
            if factor.is_finite() {
                state.war_discount = factor.clamp(0.0, WAR_NO_DISCOUNT);
            }
        }
    }
}

fn gamble<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &EngineConfig,
    rng: &mut R,
    outcome: &mut ChoiceOutcome,
) {
    let odds = &cfg.gamble;
    if rng.gen_bool(odds.win_chance) {
        state.add_coins(odds.win_coins);
        state.add_happiness(odds.win_happiness);
        state.add_rebellion(odds.win_rebellion);
        state.push_log(LOG_GAMBLE_WON);
        outcome
            .narrative
            .push(String::from("Gold pours from the cauldron. Fortune smiles on you."));
    } else {
        state.add_coins(-odds.loss_coins);
        state.add_happiness(-odds.loss_happiness);
        state.add_rebellion(odds.loss_rebellion);
        state.push_log(LOG_GAMBLE_LOST);
        outcome.narrative.push(String::from(
            "The cauldron belches smoke and swallows your coins. Your subjects snicker.",
        ));
    }
}

/// Narrative reading of the rebellion risk.
#[must_use]
pub fn prophecy(rebellion_chance: i32) -> String {
    let text = if rebellion_chance >= PROPHECY_DIRE_REBELLION {
        "The ripples churn red. Revolt is at your door; win back your subjects or lose your crown."
    } else if rebellion_chance >= PROPHECY_WARNING_REBELLION {
        "The ripples tremble. Anger is brewing in the nests of your subjects."
    } else {
        "The ripples are calm. Your subjects are content under your rule."
    };
    text.to_string()
}

/// Income from a tax collection: `round(owned × per_planet × tax_rate)`.
#[must_use]
pub fn tax_income(state: &GameState, cfg: &EngineConfig) -> i32 {
    round_f64_to_i32(count_to_f64(state.owned_count()) * cfg.taxes.per_planet * state.tax_rate)
        .max(0)
}

fn advance_science(state: &mut GameState, step: ScienceStep) {
    state.science_step = step;
    state.push_log(LOG_SCIENCE_STEP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FLOAT_EPSILON, LOG_WAR_VICTORY};
    use crate::data::{CampaignKind, Planet};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn state() -> GameState {
        let planets = vec![
            Planet {
                id: "home".to_string(),
                name: "Home".to_string(),
                owned: true,
            },
            Planet {
                id: "colony".to_string(),
                name: "Colony".to_string(),
                owned: true,
            },
            Planet {
                id: "rival".to_string(),
                name: "Rival".to_string(),
                owned: false,
            },
        ];
        GameState::new(&EngineConfig::default(), &planets)
    }

    fn special(special: SpecialEffect) -> Effects {
        Effects {
            special: Some(special),
            ..Effects::default()
        }
    }

    #[test]
    fn deltas_are_clamped() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let effects = Effects {
            coins: 20,
            happiness: 80,
            tax_rate: 0.9,
            rebellion: -10,
            ..Effects::default()
        };
        apply_effects(&mut state, &effects, &cfg, &mut rng);
        assert_eq!(state.player.coins, 120);
        assert_eq!(state.player.happiness, 100);
        assert!((state.tax_rate - 0.5).abs() < FLOAT_EPSILON);
        assert_eq!(state.rebellion_chance, 0);
    }

    #[test]
    fn planet_grant_sets_ownership() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let effects = Effects {
            add_planet: Some("rival".to_string()),
            ..Effects::default()
        };
        apply_effects(&mut state, &effects, &cfg, &mut rng);
        assert!(state.is_owned("rival"));
        assert_eq!(state.logs, vec![LOG_PLANET_GRANTED.to_string()]);
    }

    #[test]
    fn gamble_outcomes_follow_config() {
        let mut cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        cfg.gamble.win_chance = 1.0;
        let mut won = state();
        let outcome = apply_effects(&mut won, &special(SpecialEffect::Gamble), &cfg, &mut rng);
        assert_eq!(won.player.coins, 250);
        assert_eq!(won.player.happiness, 60);
        assert_eq!(outcome.narrative.len(), 1);

        cfg.gamble.win_chance = 0.0;
        let mut lost = state();
        lost.rebellion_chance = 10;
        apply_effects(&mut lost, &special(SpecialEffect::Gamble), &cfg, &mut rng);
        assert_eq!(lost.player.coins, 25);
        assert_eq!(lost.player.happiness, 35);
        assert_eq!(lost.rebellion_chance, 15);
        assert_eq!(lost.logs.last().map(String::as_str), Some(LOG_GAMBLE_LOST));
    }

    #[test]
    fn prophecy_tiers() {
        assert_ne!(prophecy(30), prophecy(20));
        assert_ne!(prophecy(20), prophecy(19));
        assert_eq!(prophecy(45), prophecy(30));
        assert_eq!(prophecy(0), prophecy(19));
    }

    #[test]
    fn tax_collection_scales_with_planets_and_rate() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        // 2 planets × 100 × 0.15 = 30
        assert_eq!(tax_income(&state, &cfg), 30);
        apply_effects(&mut state, &special(SpecialEffect::TaxCollection), &cfg, &mut rng);
        assert_eq!(state.player.coins, 130);
    }

    #[test]
    fn contract_lifecycle() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        state.day = 4;
        apply_effects(&mut state, &special(SpecialEffect::StartContract), &cfg, &mut rng);
        assert_eq!(
            state.bounty,
            Some(BountyContract {
                next_report_day: 5,
                failed_reports: 0
            })
        );

        state.day = 5;
        apply_effects(&mut state, &special(SpecialEffect::ContinueContract), &cfg, &mut rng);
        assert_eq!(
            state.bounty,
            Some(BountyContract {
                next_report_day: 6,
                failed_reports: 1
            })
        );

        apply_effects(&mut state, &special(SpecialEffect::CancelContract), &cfg, &mut rng);
        assert!(state.bounty.is_none());
    }

    #[test]
    fn science_steps_advance() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        apply_effects(&mut state, &special(SpecialEffect::ScienceStart), &cfg, &mut rng);
        assert_eq!(state.science_step.index(), 1);
        apply_effects(&mut state, &special(SpecialEffect::ScienceContinue), &cfg, &mut rng);
        assert_eq!(state.science_step.index(), 2);
        apply_effects(&mut state, &special(SpecialEffect::ScienceComplete), &cfg, &mut rng);
        assert_eq!(state.science_step, ScienceStep::Concluded);
    }

    #[test]
    fn flag_toggles() {
        let mut state = state();
        let cfg = EngineConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for flag in [
            SpecialEffect::DenyGod,
            SpecialEffect::HireJester,
            SpecialEffect::HireIntern,
            SpecialEffect::BanRefugees,
            SpecialEffect::WarDiscount { factor: 0.5 },
        ] {
            apply_effects(&mut state, &special(flag), &cfg, &mut rng);
        }
        assert!(state.god_denied);
        assert!(state.jester_hired);
        assert!(state.intern_hired);
        assert!(state.refugee_banned);
        assert!((state.war_discount - 0.5).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn war_choices_consume_discount() {
        let mut cfg = EngineConfig::default();
        cfg.war.min_chance = 1.0;
        cfg.war.max_chance = 1.0;
        let mut rng = ChaCha20Rng::seed_from_u64(8);

        let mut state = state();
        state.war_discount = 0.5;
        let war = special(SpecialEffect::StartWar {
            campaign: CampaignKind::Attack,
            defended_planet: None,
            enemy_planet: Some("rival".to_string()),
            investment: 80,
        });
        let outcome = apply_effects(&mut state, &war, &cfg, &mut rng);
        assert!(outcome.war.as_ref().is_some_and(|report| report.victory));
        assert!(state.is_owned("rival"));
        assert!(state.logs.contains(&LOG_WAR_VICTORY.to_string()));
        assert!((state.war_discount - WAR_NO_DISCOUNT).abs() < FLOAT_EPSILON);

        state.war_discount = 0.5;
        let surrender = special(SpecialEffect::Surrender {
            planet: "colony".to_string(),
        });
        let outcome = apply_effects(&mut state, &surrender, &cfg, &mut rng);
        assert!(!state.is_owned("colony"));
        assert_eq!(outcome.narrative, vec!["You abandon Colony.".to_string()]);
        assert!((state.war_discount - WAR_NO_DISCOUNT).abs() < FLOAT_EPSILON);
    }
}
