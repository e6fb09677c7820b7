use serde::{Deserialize, Serialize};

use crate::state::ScienceStep;

/// A world in the galaxy. Ownership changes only through option effects or war.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owned: bool,
}

/// Eligibility constraints for a catalog visitor. Absent fields do not constrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Conditions {
    #[serde(default)]
    pub min_coins: Option<i32>,
    #[serde(default)]
    pub max_coins: Option<i32>,
    #[serde(default)]
    pub min_happiness: Option<i32>,
    #[serde(default)]
    pub max_happiness: Option<i32>,
    #[serde(default)]
    pub min_tax_rate: Option<f64>,
    #[serde(default)]
    pub max_tax_rate: Option<f64>,
    #[serde(default)]
    pub min_rebellion_chance: Option<i32>,
    #[serde(default)]
    pub max_rebellion_chance: Option<i32>,
    #[serde(default)]
    pub god_denied: Option<bool>,
    #[serde(default)]
    pub jester_hired: Option<bool>,
    #[serde(default)]
    pub intern_hired: Option<bool>,
    #[serde(default)]
    pub refugee_banned: Option<bool>,
    #[serde(default)]
    pub bounty_active: Option<bool>,
    #[serde(default)]
    pub science_step: Option<ScienceStep>,
    #[serde(default)]
    pub requires_owned_planet: Option<String>,
    #[serde(default)]
    pub requires_planet_not_owned: Option<String>,
}

/// Which side of a war campaign the player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignKind {
    Attack,
    Defense,
}

/// Named side effect of an option beyond plain resource deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Coin flip between a windfall and a loss.
    Gamble,
    /// Narrative reading of the current rebellion risk.
    Prophecy,
    /// Income proportional to owned planets and the tax rate.
    TaxCollection,
    StartContract,
    ContinueContract,
    CancelContract,
    ScienceStart,
    ScienceContinue,
    ScienceComplete,
    StartWar {
        campaign: CampaignKind,
        #[serde(default)]
        defended_planet: Option<String>,
        #[serde(default)]
        enemy_planet: Option<String>,
        investment: i32,
    },
    /// Give up a defended planet without a fight.
    Surrender { planet: String },
    DenyGod,
    HireJester,
    HireIntern,
    BanRefugees,
    /// Multiplier applied to the coin cost of the next war offer.
    WarDiscount { factor: f64 },
}

/// Effects applied when an option is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub coins: i32,
    #[serde(default)]
    pub happiness: i32,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub rebellion: i32,
    #[serde(default)]
    pub add_planet: Option<String>,
    #[serde(default)]
    pub special: Option<SpecialEffect>,
}

impl Effects {
    /// Coins the option costs up front (zero for gains).
    #[must_use]
    pub fn coin_cost(&self) -> i32 {
        self.coins.saturating_neg().max(0)
    }

    #[must_use]
    pub fn is_affordable(&self, coins: i32) -> bool {
        self.coins >= 0 || coins + self.coins >= 0
    }
}

/// A choice offered by a visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub reaction: String,
    #[serde(default)]
    pub effects: Effects,
}

impl VisitorOption {
    #[must_use]
    pub fn new(id: &str, text: impl Into<String>, reaction: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            text: text.into(),
            reaction: reaction.into(),
            effects: Effects::default(),
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }
}

/// A dialogue encounter at the overlord's court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    pub name: String,
    pub sprite: String,
    /// May contain the `{user}` token; substitution is left to the presentation layer.
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub conditions: Option<Conditions>,
    pub options: Vec<VisitorOption>,
}

const fn default_weight() -> u32 {
    1
}

impl Visitor {
    /// Build a visitor that bypasses the catalog (tutorial, wars, reports, ...).
    #[must_use]
    pub fn scripted(
        id: &str,
        name: &str,
        sprite: &str,
        text: impl Into<String>,
        options: Vec<VisitorOption>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sprite: sprite.to_string(),
            text: text.into(),
            weight: default_weight(),
            conditions: None,
            options,
        }
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&VisitorOption> {
        self.options.get(index)
    }

    #[must_use]
    pub fn selection_weight(&self) -> u32 {
        self.weight.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitor_parses_with_defaults_and_special_effects() {
        let json = r#"{
            "id": "wizard",
            "name": "Wizard",
            "sprite": "wizard.png",
            "text": "Care to wager, {user}?",
            "options": [
                {
                    "id": "wager",
                    "text": "Roll the bones",
                    "effects": { "coins": -20, "special": { "kind": "gamble" } }
                },
                {
                    "id": "defend",
                    "text": "Hold the line",
                    "effects": {
                        "special": {
                            "kind": "start_war",
                            "campaign": "defense",
                            "defended_planet": "quackus",
                            "investment": 60
                        }
                    }
                }
            ]
        }"#;

        let visitor: Visitor = serde_json::from_str(json).unwrap();
        assert_eq!(visitor.weight, 1);
        assert!(visitor.conditions.is_none());
        assert_eq!(visitor.options[0].effects.coins, -20);
        assert_eq!(visitor.options[0].reaction, "");
        assert_eq!(
            visitor.options[0].effects.special,
            Some(SpecialEffect::Gamble)
        );
        assert_eq!(
            visitor.options[1].effects.special,
            Some(SpecialEffect::StartWar {
                campaign: CampaignKind::Defense,
                defended_planet: Some("quackus".to_string()),
                enemy_planet: None,
                investment: 60,
            })
        );
    }

    #[test]
    fn affordability_only_limits_costs() {
        let cost = Effects {
            coins: -40,
            ..Effects::default()
        };
        assert!(cost.is_affordable(40));
        assert!(!cost.is_affordable(39));
        assert_eq!(cost.coin_cost(), 40);

        let gain = Effects {
            coins: 15,
            ..Effects::default()
        };
        assert!(gain.is_affordable(0));
        assert_eq!(gain.coin_cost(), 0);
    }

    #[test]
    fn extreme_cost_saturates() {
        let ruinous: Effects = serde_json::from_str(r#"{ "coins": -2147483648 }"#).unwrap();
        assert_eq!(ruinous.coins, i32::MIN);
        assert_eq!(ruinous.coin_cost(), i32::MAX);
        assert!(!ruinous.is_affordable(1_000));
    }

    #[test]
    fn zero_weight_selects_as_one() {
        let mut visitor = Visitor::scripted("a", "A", "a.png", "hi", Vec::new());
        visitor.weight = 0;
        assert_eq!(visitor.selection_weight(), 1);
    }
}
