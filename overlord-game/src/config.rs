//! Balance configuration for the engine.
//!
//! Every section carries `#[serde(default)]`, so a JSON file only needs the
//! values it overrides.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BOUNTY_CONTINUE_BASE_COST, BOUNTY_CONTINUE_COST_STEP, BOUNTY_CONTINUE_REBELLION,
    BOUNTY_STAND_DOWN_HAPPINESS, BOUNTY_STAND_DOWN_REBELLION, BOUNTY_SUCCESS_CHANCE,
    BOUNTY_SUCCESS_HAPPINESS, BOUNTY_SUCCESS_REBELLION, DONATION_MIN_HAPPINESS,
    DONATION_PER_PLANET, GAMBLE_LOSS_COINS, GAMBLE_LOSS_HAPPINESS, GAMBLE_LOSS_REBELLION,
    GAMBLE_WIN_CHANCE, GAMBLE_WIN_COINS, GAMBLE_WIN_HAPPINESS, GAMBLE_WIN_REBELLION,
    HAPPINESS_MAX, INTERN_COINS, JESTER_HAPPINESS, JESTER_REBELLION, MAX_VISITORS_PER_DAY,
    REBELLION_LOW_HAPPINESS, REBELLION_LOW_HAPPINESS_GAIN, REBELLION_PENALTY_COINS,
    REBELLION_THRESHOLD, SCIENCE_DECLINE_HAPPINESS, SCIENCE_FUNDING_COST,
    SCIENCE_FUNDING_HAPPINESS, SCIENCE_REWARD_COINS, SCIENCE_REWARD_HAPPINESS,
    SCIENCE_VISIT_CHANCE, START_COINS, START_HAPPINESS, START_TAX_RATE, TAX_DAY_INTERVAL,
    TAX_PER_PLANET, TAX_RATE_MAX, WAR_ATTACK_COST, WAR_ATTACK_DEFEAT_HAPPINESS,
    WAR_ATTACK_ENEMY_BASE, WAR_ATTACK_HEAVY_COST, WAR_ATTACK_MIN_COINS, WAR_ATTACK_OFFER_CHANCE,
    WAR_DEFEND_COST, WAR_DEFEND_HEAVY_COST, WAR_DEFENSE_BONUS, WAR_DEFENSE_DEFEAT_HAPPINESS,
    WAR_DEFENSE_ENEMY_BASE, WAR_DEFENSE_MIN_DAY, WAR_DEFENSE_OFFER_CHANCE,
    WAR_DEFENSE_OVERMATCH_FLOOR, WAR_ENEMY_SPREAD, WAR_INVESTMENT_DAMPING, WAR_MAX_CHANCE,
    WAR_MIN_CHANCE, WAR_VICTORY_HAPPINESS, WRATH_COIN_SHARE,
};

/// Errors raised while loading or validating an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid engine config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Resources and pacing at the start of a reign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartCfg {
    pub coins: i32,
    pub happiness: i32,
    pub tax_rate: f64,
    pub max_visitors_per_day: u32,
}

impl Default for StartCfg {
    fn default() -> Self {
        Self {
            coins: START_COINS,
            happiness: START_HAPPINESS,
            tax_rate: START_TAX_RATE,
            max_visitors_per_day: MAX_VISITORS_PER_DAY,
        }
    }
}

/// Rewards and penalties attached to the scripted court visitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtCfg {
    pub donation_min_happiness: i32,
    pub donation_per_planet: i32,
    pub wrath_coin_share: f64,
    pub jester_happiness: i32,
    pub jester_rebellion: i32,
    pub intern_coins: i32,
}

impl Default for CourtCfg {
    fn default() -> Self {
        Self {
            donation_min_happiness: DONATION_MIN_HAPPINESS,
            donation_per_planet: DONATION_PER_PLANET,
            wrath_coin_share: WRATH_COIN_SHARE,
            jester_happiness: JESTER_HAPPINESS,
            jester_rebellion: JESTER_REBELLION,
            intern_coins: INTERN_COINS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScienceCfg {
    pub visit_chance: f64,
    pub funding_cost: i32,
    pub funding_happiness: i32,
    pub decline_happiness: i32,
    pub reward_coins: i32,
    pub reward_happiness: i32,
}

impl Default for ScienceCfg {
    fn default() -> Self {
        Self {
            visit_chance: SCIENCE_VISIT_CHANCE,
            funding_cost: SCIENCE_FUNDING_COST,
            funding_happiness: SCIENCE_FUNDING_HAPPINESS,
            decline_happiness: SCIENCE_DECLINE_HAPPINESS,
            reward_coins: SCIENCE_REWARD_COINS,
            reward_happiness: SCIENCE_REWARD_HAPPINESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BountyCfg {
    pub success_chance: f64,
    pub success_happiness: i32,
    pub success_rebellion: i32,
    pub continue_base_cost: i32,
    /// Added to the continue fee for every failed report so far.
    pub continue_cost_step: i32,
    pub continue_rebellion: i32,
    pub stand_down_happiness: i32,
    pub stand_down_rebellion: i32,
}

impl Default for BountyCfg {
    fn default() -> Self {
        Self {
            success_chance: BOUNTY_SUCCESS_CHANCE,
            success_happiness: BOUNTY_SUCCESS_HAPPINESS,
            success_rebellion: BOUNTY_SUCCESS_REBELLION,
            continue_base_cost: BOUNTY_CONTINUE_BASE_COST,
            continue_cost_step: BOUNTY_CONTINUE_COST_STEP,
            continue_rebellion: BOUNTY_CONTINUE_REBELLION,
            stand_down_happiness: BOUNTY_STAND_DOWN_HAPPINESS,
            stand_down_rebellion: BOUNTY_STAND_DOWN_REBELLION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxCfg {
    pub day_interval: u32,
    pub per_planet: f64,
}

impl Default for TaxCfg {
    fn default() -> Self {
        Self {
            day_interval: TAX_DAY_INTERVAL,
            per_planet: TAX_PER_PLANET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GambleCfg {
    pub win_chance: f64,
    pub win_coins: i32,
    pub win_happiness: i32,
    pub win_rebellion: i32,
    pub loss_coins: i32,
    pub loss_happiness: i32,
    pub loss_rebellion: i32,
}

impl Default for GambleCfg {
    fn default() -> Self {
        Self {
            win_chance: GAMBLE_WIN_CHANCE,
            win_coins: GAMBLE_WIN_COINS,
            win_happiness: GAMBLE_WIN_HAPPINESS,
            win_rebellion: GAMBLE_WIN_REBELLION,
            loss_coins: GAMBLE_LOSS_COINS,
            loss_happiness: GAMBLE_LOSS_HAPPINESS,
            loss_rebellion: GAMBLE_LOSS_REBELLION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarCfg {
    pub defense_offer_chance: f64,
    /// Defense offers only appear after this day.
    pub defense_min_day: u32,
    pub attack_offer_chance: f64,
    pub attack_min_coins: i32,
    pub defend_cost: i32,
    pub defend_heavy_cost: i32,
    pub attack_cost: i32,
    pub attack_heavy_cost: i32,
    pub defense_enemy_base: i32,
    pub attack_enemy_base: i32,
    pub enemy_spread: i32,
    pub investment_damping: f64,
    pub defense_bonus: f64,
    pub defense_overmatch_floor: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    pub victory_happiness: i32,
    pub attack_defeat_happiness: i32,
    pub defense_defeat_happiness: i32,
}

impl Default for WarCfg {
    fn default() -> Self {
        Self {
            defense_offer_chance: WAR_DEFENSE_OFFER_CHANCE,
            defense_min_day: WAR_DEFENSE_MIN_DAY,
            attack_offer_chance: WAR_ATTACK_OFFER_CHANCE,
            attack_min_coins: WAR_ATTACK_MIN_COINS,
            defend_cost: WAR_DEFEND_COST,
            defend_heavy_cost: WAR_DEFEND_HEAVY_COST,
            attack_cost: WAR_ATTACK_COST,
            attack_heavy_cost: WAR_ATTACK_HEAVY_COST,
            defense_enemy_base: WAR_DEFENSE_ENEMY_BASE,
            attack_enemy_base: WAR_ATTACK_ENEMY_BASE,
            enemy_spread: WAR_ENEMY_SPREAD,
            investment_damping: WAR_INVESTMENT_DAMPING,
            defense_bonus: WAR_DEFENSE_BONUS,
            defense_overmatch_floor: WAR_DEFENSE_OVERMATCH_FLOOR,
            min_chance: WAR_MIN_CHANCE,
            max_chance: WAR_MAX_CHANCE,
            victory_happiness: WAR_VICTORY_HAPPINESS,
            attack_defeat_happiness: WAR_ATTACK_DEFEAT_HAPPINESS,
            defense_defeat_happiness: WAR_DEFENSE_DEFEAT_HAPPINESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebellionCfg {
    pub low_happiness: i32,
    pub low_happiness_gain: i32,
    pub threshold: i32,
    pub penalty_coins: i32,
}

impl Default for RebellionCfg {
    fn default() -> Self {
        Self {
            low_happiness: REBELLION_LOW_HAPPINESS,
            low_happiness_gain: REBELLION_LOW_HAPPINESS_GAIN,
            threshold: REBELLION_THRESHOLD,
            penalty_coins: REBELLION_PENALTY_COINS,
        }
    }
}

/// Complete balance configuration consumed by [`crate::engine::Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub start: StartCfg,
    pub court: CourtCfg,
    pub science: ScienceCfg,
    pub bounty: BountyCfg,
    pub taxes: TaxCfg,
    pub gamble: GambleCfg,
    pub war: WarCfg,
    pub rebellion: RebellionCfg,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the ranges the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start.coins < 0 {
            return Err(invalid("start.coins", "must not be negative"));
        }
        if !(0..=HAPPINESS_MAX).contains(&self.start.happiness) {
            return Err(invalid("start.happiness", "must be within 0..=100"));
        }
        if !(0.0..=TAX_RATE_MAX).contains(&self.start.tax_rate) {
            return Err(invalid("start.tax_rate", "must be within 0.0..=0.5"));
        }
        if self.start.max_visitors_per_day == 0 {
            return Err(invalid("start.max_visitors_per_day", "must be positive"));
        }
        if self.taxes.day_interval == 0 {
            return Err(invalid("taxes.day_interval", "must be positive"));
        }
        if self.war.enemy_spread <= 0 {
            return Err(invalid("war.enemy_spread", "must be positive"));
        }
        if self.war.investment_damping <= 0.0 {
            return Err(invalid("war.investment_damping", "must be positive"));
        }
        if self.war.min_chance > self.war.max_chance {
            return Err(invalid("war.min_chance", "must not exceed war.max_chance"));
        }
        if !(0.0..=1.0).contains(&self.court.wrath_coin_share) {
            return Err(invalid("court.wrath_coin_share", "must be within 0.0..=1.0"));
        }
        let probabilities = [
            ("science.visit_chance", self.science.visit_chance),
            ("bounty.success_chance", self.bounty.success_chance),
            ("gamble.win_chance", self.gamble.win_chance),
            ("war.defense_offer_chance", self.war.defense_offer_chance),
            ("war.attack_offer_chance", self.war.attack_offer_chance),
            ("war.min_chance", self.war.min_chance),
            ("war.max_chance", self.war.max_chance),
            ("war.defense_overmatch_floor", self.war.defense_overmatch_floor),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be a probability within 0.0..=1.0"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
