//! Centralized balance and tuning constants for the Duck Overlord engine.
//!
//! These values seed [`crate::config::EngineConfig::default`]. A config file
//! may override any of them; the scripted visitor ids and log keys are fixed.

// Logging keys -------------------------------------------------------------
pub const LOG_TUTORIAL: &str = "log.tutorial";
pub const LOG_DONATION: &str = "log.donation";
pub const LOG_DIVINE_WRATH: &str = "log.god.wrath";
pub const LOG_BOUNTY_SUCCESS: &str = "log.bounty.success";
pub const LOG_BOUNTY_FAILURE: &str = "log.bounty.failure";
pub const LOG_BOUNTY_STARTED: &str = "log.bounty.started";
pub const LOG_BOUNTY_CANCELLED: &str = "log.bounty.cancelled";
pub const LOG_TAX_COLLECTED: &str = "log.tax.collected";
pub const LOG_GAMBLE_WON: &str = "log.gamble.won";
pub const LOG_GAMBLE_LOST: &str = "log.gamble.lost";
pub const LOG_SCIENCE_STEP: &str = "log.science.step";
pub const LOG_WAR_VICTORY: &str = "log.war.victory";
pub const LOG_WAR_DEFEAT: &str = "log.war.defeat";
pub const LOG_WAR_SURRENDER: &str = "log.war.surrender";
pub const LOG_PLANET_GRANTED: &str = "log.planet.granted";
pub const LOG_REBELLION_PLANET_LOST: &str = "log.rebellion.planet-lost";
pub const LOG_DAY_END: &str = "log.day.end";
pub const LOG_GAME_OVER: &str = "log.game-over";

// Scripted visitor ids -----------------------------------------------------
pub const VISITOR_TUTORIAL: &str = "royal_advisor_intro";
pub const VISITOR_DONATION: &str = "happy_citizen";
pub const VISITOR_DIVINE_WRATH: &str = "god_attack";
pub const VISITOR_JESTER: &str = "jester_entertainment";
pub const VISITOR_INTERN: &str = "intern_money";
pub const VISITOR_SCIENCE_FUNDING: &str = "scientist_more_funding";
pub const VISITOR_SCIENCE_BREAKTHROUGH: &str = "scientist_complete";
pub const VISITOR_BOUNTY_SUCCESS: &str = "bounty_result_success";
pub const VISITOR_BOUNTY_FAILURE: &str = "bounty_result_fail";
pub const VISITOR_TAX_COLLECTOR: &str = "tax_collector";
pub const VISITOR_WAR_GENERAL: &str = "war_general";

/// Catalog id whose name and sprite are reused for bounty reports.
pub const CATALOG_BOUNTY_HUNTER: &str = "bounty_hunter";

/// Ids the engine builds itself; catalog visitors may not reuse them.
pub const RESERVED_VISITOR_IDS: [&str; 11] = [
    VISITOR_TUTORIAL,
    VISITOR_DONATION,
    VISITOR_DIVINE_WRATH,
    VISITOR_JESTER,
    VISITOR_INTERN,
    VISITOR_SCIENCE_FUNDING,
    VISITOR_SCIENCE_BREAKTHROUGH,
    VISITOR_BOUNTY_SUCCESS,
    VISITOR_BOUNTY_FAILURE,
    VISITOR_TAX_COLLECTOR,
    VISITOR_WAR_GENERAL,
];

/// Visitors that never consume one of the daily visit slots.
pub const NON_COUNTING_VISITORS: [&str; 3] =
    [VISITOR_JESTER, VISITOR_INTERN, VISITOR_TAX_COLLECTOR];

// Start of run -------------------------------------------------------------
pub(crate) const START_COINS: i32 = 100;
pub(crate) const START_HAPPINESS: i32 = 50;
pub(crate) const START_TAX_RATE: f64 = 0.15;
pub(crate) const MAX_VISITORS_PER_DAY: u32 = 5;

// Resource bounds ----------------------------------------------------------
pub const HAPPINESS_MAX: i32 = 100;
pub const TAX_RATE_MAX: f64 = 0.5;
pub const REBELLION_MAX: i32 = 100;

// Scripted rewards ---------------------------------------------------------
pub(crate) const TUTORIAL_VISITS: u32 = 2;
pub(crate) const DONATION_MIN_HAPPINESS: i32 = 80;
pub(crate) const DONATION_PER_PLANET: i32 = 15;
pub(crate) const WRATH_COIN_SHARE: f64 = 0.25;
pub(crate) const JESTER_HAPPINESS: i32 = 5;
pub(crate) const JESTER_REBELLION: i32 = -3;
pub(crate) const INTERN_COINS: i32 = 10;

// Science chain ------------------------------------------------------------
pub(crate) const SCIENCE_VISIT_CHANCE: f64 = 0.3;
pub(crate) const SCIENCE_FUNDING_COST: i32 = 40;
pub(crate) const SCIENCE_FUNDING_HAPPINESS: i32 = 10;
pub(crate) const SCIENCE_DECLINE_HAPPINESS: i32 = -5;
pub(crate) const SCIENCE_REWARD_COINS: i32 = 100;
pub(crate) const SCIENCE_REWARD_HAPPINESS: i32 = 50;

// Bounty contracts ---------------------------------------------------------
pub(crate) const BOUNTY_SUCCESS_CHANCE: f64 = 0.6;
pub(crate) const BOUNTY_SUCCESS_HAPPINESS: i32 = 20;
pub(crate) const BOUNTY_SUCCESS_REBELLION: i32 = -15;
pub(crate) const BOUNTY_CONTINUE_BASE_COST: i32 = 40;
pub(crate) const BOUNTY_CONTINUE_COST_STEP: i32 = 20;
pub(crate) const BOUNTY_CONTINUE_REBELLION: i32 = -5;
pub(crate) const BOUNTY_STAND_DOWN_HAPPINESS: i32 = -10;
pub(crate) const BOUNTY_STAND_DOWN_REBELLION: i32 = 15;

// Taxes --------------------------------------------------------------------
pub(crate) const TAX_DAY_INTERVAL: u32 = 5;
pub(crate) const TAX_PER_PLANET: f64 = 100.0;

// Gamble -------------------------------------------------------------------
pub(crate) const GAMBLE_WIN_CHANCE: f64 = 0.5;
pub(crate) const GAMBLE_WIN_COINS: i32 = 150;
pub(crate) const GAMBLE_WIN_HAPPINESS: i32 = 10;
pub(crate) const GAMBLE_WIN_REBELLION: i32 = -5;
pub(crate) const GAMBLE_LOSS_COINS: i32 = 75;
pub(crate) const GAMBLE_LOSS_HAPPINESS: i32 = 15;
pub(crate) const GAMBLE_LOSS_REBELLION: i32 = 5;

// Prophecy tiers -----------------------------------------------------------
pub(crate) const PROPHECY_DIRE_REBELLION: i32 = 30;
pub(crate) const PROPHECY_WARNING_REBELLION: i32 = 20;

// War ----------------------------------------------------------------------
pub(crate) const WAR_DEFENSE_OFFER_CHANCE: f64 = 0.1;
pub(crate) const WAR_DEFENSE_MIN_DAY: u32 = 3;
pub(crate) const WAR_ATTACK_OFFER_CHANCE: f64 = 0.3;
pub(crate) const WAR_ATTACK_MIN_COINS: i32 = 150;
pub(crate) const WAR_DEFEND_COST: i32 = 60;
pub(crate) const WAR_DEFEND_HEAVY_COST: i32 = 110;
pub(crate) const WAR_ATTACK_COST: i32 = 80;
pub(crate) const WAR_ATTACK_HEAVY_COST: i32 = 140;
pub(crate) const WAR_DEFENSE_ENEMY_BASE: i32 = 30;
pub(crate) const WAR_ATTACK_ENEMY_BASE: i32 = 50;
pub(crate) const WAR_ENEMY_SPREAD: i32 = 40;
pub(crate) const WAR_INVESTMENT_DAMPING: f64 = 1.5;
pub(crate) const WAR_DEFENSE_BONUS: f64 = 0.15;
pub(crate) const WAR_DEFENSE_OVERMATCH_FLOOR: f64 = 0.85;
pub(crate) const WAR_MIN_CHANCE: f64 = 0.05;
pub(crate) const WAR_MAX_CHANCE: f64 = 0.95;
pub(crate) const WAR_VICTORY_HAPPINESS: i32 = 5;
pub(crate) const WAR_ATTACK_DEFEAT_HAPPINESS: i32 = -5;
pub(crate) const WAR_DEFENSE_DEFEAT_HAPPINESS: i32 = -10;
pub(crate) const WAR_NO_DISCOUNT: f64 = 1.0;

// Rebellion ----------------------------------------------------------------
pub(crate) const REBELLION_LOW_HAPPINESS: i32 = 20;
pub(crate) const REBELLION_LOW_HAPPINESS_GAIN: i32 = 5;
pub(crate) const REBELLION_THRESHOLD: i32 = 30;
pub(crate) const REBELLION_PENALTY_COINS: i32 = 100;

/// Tolerance for float comparisons in tests.
#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
