//! Single-roll war resolution
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WarCfg;
use crate::constants::{LOG_WAR_DEFEAT, LOG_WAR_VICTORY};
use crate::data::CampaignKind;
use crate::numbers::i32_to_f64;
use crate::state::GameState;

/// The campaign a war option commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarPlan {
    pub campaign: CampaignKind,
    pub investment: i32,
    pub defended_planet: Option<String>,
    pub enemy_planet: Option<String>,
}

/// Outcome of a resolved war, kept for reaction text and telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarReport {
    pub campaign: CampaignKind,
    pub enemy_strength: i32,
    pub win_chance: f64,
    pub roll: f64,
    pub victory: bool,
    pub planet_gained: Option<String>,
    pub planet_lost: Option<String>,
    pub happiness_delta: i32,
    pub narrative: String,
}

/// Enemy commitment: the campaign base plus a uniform draw in `[0, spread)`.
pub fn enemy_strength<R: Rng + ?Sized>(cfg: &WarCfg, campaign: CampaignKind, rng: &mut R) -> i32 {
    let base = match campaign {
        CampaignKind::Defense => cfg.defense_enemy_base,
        CampaignKind::Attack => cfg.attack_enemy_base,
    };
    let spread = cfg.enemy_spread.max(1);
    base + rng.gen_range(0..spread)
}

/// Chance of winning for a given investment against a fixed enemy.
///
/// Non-decreasing in `investment`. Non-positive investments count as zero.
#[must_use]
pub fn win_probability(
    cfg: &WarCfg,
    campaign: CampaignKind,
    investment: i32,
    enemy_strength: i32,
) -> f64 {
    let invested = i32_to_f64(investment.max(0));
    let enemy = i32_to_f64(enemy_strength.max(0));
    let denominator = invested / cfg.investment_damping + enemy;
    let mut chance = if denominator > 0.0 {
        invested / denominator
    } else {
        0.0
    };

    if campaign == CampaignKind::Defense {
        chance += cfg.defense_bonus;
        if investment >= enemy_strength {
            chance = chance.max(cfg.defense_overmatch_floor);
        }
    }

    chance.clamp(cfg.min_chance, cfg.max_chance)
}

/// Roll the war described by `plan` and apply its territorial and happiness
/// consequences to `state`.
pub fn resolve_war<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &WarCfg,
    plan: &WarPlan,
    rng: &mut R,
) -> WarReport {
    let enemy_strength = enemy_strength(cfg, plan.campaign, rng);
    let win_chance = win_probability(cfg, plan.campaign, plan.investment, enemy_strength);
    let roll: f64 = rng.gen_range(0.0..1.0);
    let victory = roll < win_chance;

    log::debug!(
        "war | {:?} invest={} enemy={} chance={:.3} roll={:.3} win={}",
        plan.campaign,
        plan.investment,
        enemy_strength,
        win_chance,
        roll,
        victory
    );

    let mut planet_gained = None;
    let mut planet_lost = None;
    let (happiness_delta, narrative) = match (plan.campaign, victory) {
        (CampaignKind::Defense, true) => (
            cfg.victory_happiness,
            String::from("The invaders break against your defenses. The planet stands."),
        ),
        (CampaignKind::Attack, true) => {
            if let Some(target) = plan.enemy_planet.as_deref()
                && state.set_owned(target, true)
            {
                planet_gained = Some(target.to_string());
                (
                    cfg.victory_happiness,
                    format!(
                        "{} falls to your armada and joins the empire.",
                        state.planet_name(target)
                    ),
                )
            } else {
                (
                    cfg.victory_happiness,
                    String::from("Your armada returns victorious."),
                )
            }
        }
        (CampaignKind::Defense, false) => {
            if let Some(defended) = plan.defended_planet.as_deref()
                && state.set_owned(defended, false)
            {
                planet_lost = Some(defended.to_string());
                (
                    cfg.defense_defeat_happiness,
                    format!(
                        "The enemy overwhelms the garrison. {} is lost.",
                        state.planet_name(defended)
                    ),
                )
            } else {
                (
                    cfg.defense_defeat_happiness,
                    String::from("Your forces are routed."),
                )
            }
        }
        (CampaignKind::Attack, false) => (
            cfg.attack_defeat_happiness,
            String::from("The invasion stalls and your fleet limps home."),
        ),
    };

    state.add_happiness(happiness_delta);
    state.push_log(if victory {
        LOG_WAR_VICTORY
    } else {
        LOG_WAR_DEFEAT
    });

    WarReport {
        campaign: plan.campaign,
        enemy_strength,
        win_chance,
        roll,
        victory,
        planet_gained,
        planet_lost,
        happiness_delta,
        narrative,
    }
}
