//! Visitors built by the engine rather than drawn from the catalog.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;
use crate::config::{BountyCfg, CourtCfg, ScienceCfg, WarCfg};
use crate::constants::{
    CATALOG_BOUNTY_HUNTER, VISITOR_BOUNTY_FAILURE, VISITOR_BOUNTY_SUCCESS, VISITOR_DIVINE_WRATH,
    VISITOR_DONATION, VISITOR_INTERN, VISITOR_JESTER, VISITOR_SCIENCE_BREAKTHROUGH,
    VISITOR_SCIENCE_FUNDING, VISITOR_TAX_COLLECTOR, VISITOR_TUTORIAL, VISITOR_WAR_GENERAL,
};
use crate::data::{CampaignKind, Effects, Planet, SpecialEffect, Visitor, VisitorOption};
use crate::numbers::{count_to_i32, i32_to_f64, round_f64_to_i32, scale_coins};

const ADVISOR_NAME: &str = "Royal Advisor";
const ADVISOR_SPRITE: &str = "royal_advisor.png";
const SCIENTIST_NAME: &str = "Scientist";
const SCIENTIST_SPRITE: &str = "scientist.png";
const GENERAL_NAME: &str = "War General";
const GENERAL_SPRITE: &str = "war_general.png";
const BOUNTY_FALLBACK_NAME: &str = "Bounty Huntress";
const BOUNTY_FALLBACK_SPRITE: &str = "bounty_huntress.png";

const INTERN_LINES: [&str; 7] = [
    "Boss! I sold my old skateboard to a collector. Here's your share!",
    "I found a pebble shaped like your face and sold it. Profit!",
    "Someone paid me to stop whistling in the hallway. I took the deal.",
    "I was paid to test a new bread. It was fine. Here's the money.",
    "There were coins in the fountain. Nobody was using them.",
    "I sold tickets to watch me do my homework. Turns out people paid.",
    "I won a staring contest against a goose. The prize is yours, boss.",
];

/// First part of the day-one tutorial.
#[must_use]
pub fn tutorial_welcome() -> Visitor {
    Visitor::scripted(
        VISITOR_TUTORIAL,
        ADVISOR_NAME,
        ADVISOR_SPRITE,
        "Hail, {user}, new overlord of this humble pond empire! The galaxy awaits your rule. Let your enemies quiver in their feathers.",
        vec![VisitorOption::new(
            "tutorial_ready",
            "I am ready to rule.",
            "Splendid! Allow me to explain how things work around here.",
        )],
    )
}

/// Second part of the day-one tutorial.
#[must_use]
pub fn tutorial_rules() -> Visitor {
    Visitor::scripted(
        VISITOR_TUTORIAL,
        ADVISOR_NAME,
        ADVISOR_SPRITE,
        "Each day visitors will petition you and you must choose how to answer. Watch your coins and the mood of your subjects, or rebellion will follow. Claim every planet and the galaxy is yours, {user}!",
        vec![
            VisitorOption::new("tutorial_understood", "Understood.", "Good luck, my liege!"),
            VisitorOption::new("tutorial_eager", "Let's begin!", "Good luck, my liege!"),
        ],
    )
}

/// A grateful citizen whose gift grows with the empire.
#[must_use]
pub fn donation(cfg: &CourtCfg, owned_planets: usize) -> Visitor {
    let gift = count_to_i32(owned_planets).saturating_mul(cfg.donation_per_planet);
    Visitor::scripted(
        VISITOR_DONATION,
        "Happy Citizen",
        "happy_citizen.png",
        "Overlord! Everyone in my village chipped in to thank you for your wonderful rule!",
        vec![
            VisitorOption::new(
                "donation_accept",
                "How generous of you!",
                "Nothing is too good for our overlord!",
            )
            .with_effects(Effects {
                coins: gift,
                ..Effects::default()
            }),
        ],
    )
}

/// The scorned deity returns for its share of the treasury.
#[must_use]
pub fn divine_wrath(cfg: &CourtCfg, coins: i32) -> Visitor {
    let toll = round_f64_to_i32(i32_to_f64(coins) * cfg.wrath_coin_share);
    Visitor::scripted(
        VISITOR_DIVINE_WRATH,
        "The Great Drake",
        "god.png",
        "You denied me my tribute. Now I shall take it myself, along with a quarter of your gold.",
        vec![
            VisitorOption::new("wrath_accept", "I accept my punishment.", "Let this be a lesson.")
                .with_effects(Effects {
                    coins: -toll,
                    ..Effects::default()
                }),
        ],
    )
}

#[must_use]
pub fn jester(cfg: &CourtCfg) -> Visitor {
    Visitor::scripted(
        VISITOR_JESTER,
        "Jester",
        "jester.png",
        "Good morrow, my lord! Today's performance features juggling, pratfalls and one very confused goose!",
        vec![
            VisitorOption::new("jester_perform", "Begin the show!", "Honk! Thank you, thank you!")
                .with_effects(Effects {
                    happiness: cfg.jester_happiness,
                    rebellion: cfg.jester_rebellion,
                    ..Effects::default()
                }),
        ],
    )
}

/// The intern's daily windfall with a line drawn uniformly from a fixed pool.
pub fn intern<R: Rng + ?Sized>(cfg: &CourtCfg, rng: &mut R) -> Visitor {
    let line = INTERN_LINES.choose(rng).copied().unwrap_or(INTERN_LINES[0]);
    Visitor::scripted(
        VISITOR_INTERN,
        "Eager Intern",
        "intern.png",
        line,
        vec![
            VisitorOption::new("intern_give", "Nice work!", "Anytime, boss!").with_effects(
                Effects {
                    coins: cfg.intern_coins,
                    ..Effects::default()
                },
            ),
        ],
    )
}

#[must_use]
pub fn science_funding(cfg: &ScienceCfg) -> Visitor {
    Visitor::scripted(
        VISITOR_SCIENCE_FUNDING,
        SCIENTIST_NAME,
        SCIENTIST_SPRITE,
        "My lord, we are so close! One more grant and the breakthrough is ours!",
        vec![
            VisitorOption::new(
                "science_fund",
                format!("Take the funds. (-{} coins)", cfg.funding_cost),
                "Thank you, my lord! I will return with results soon!",
            )
            .with_effects(Effects {
                coins: -cfg.funding_cost,
                happiness: cfg.funding_happiness,
                special: Some(SpecialEffect::ScienceContinue),
                ..Effects::default()
            }),
            VisitorOption::new(
                "science_decline",
                "The treasury cannot spare it.",
                "So close... but I understand. The lab will close.",
            )
            .with_effects(Effects {
                happiness: cfg.decline_happiness,
                special: Some(SpecialEffect::ScienceComplete),
                ..Effects::default()
            }),
        ],
    )
}

#[must_use]
pub fn science_breakthrough(cfg: &ScienceCfg) -> Visitor {
    Visitor::scripted(
        VISITOR_SCIENCE_BREAKTHROUGH,
        SCIENTIST_NAME,
        SCIENTIST_SPRITE,
        "Eureka! Your patronage has paid off, my lord. The whole empire marvels at our discovery!",
        vec![
            VisitorOption::new(
                "science_celebrate",
                "Magnificent!",
                "Glory to science and glory to the empire!",
            )
            .with_effects(Effects {
                coins: cfg.reward_coins,
                happiness: cfg.reward_happiness,
                special: Some(SpecialEffect::ScienceComplete),
                ..Effects::default()
            }),
        ],
    )
}

fn bounty_identity(catalog: &Catalog) -> (String, String) {
    catalog.visitor(CATALOG_BOUNTY_HUNTER).map_or_else(
        || {
            (
                BOUNTY_FALLBACK_NAME.to_string(),
                BOUNTY_FALLBACK_SPRITE.to_string(),
            )
        },
        |hunter| (hunter.name.clone(), hunter.sprite.clone()),
    )
}

#[must_use]
pub fn bounty_success(cfg: &BountyCfg, catalog: &Catalog) -> Visitor {
    let (name, sprite) = bounty_identity(catalog);
    Visitor::scripted(
        VISITOR_BOUNTY_SUCCESS,
        &name,
        &sprite,
        "The culprit is behind bars, overlord. Your subjects sleep easier tonight.",
        vec![
            VisitorOption::new("bounty_success_ack", "Well done.", "A pleasure doing business.")
                .with_effects(Effects {
                    happiness: cfg.success_happiness,
                    rebellion: cfg.success_rebellion,
                    ..Effects::default()
                }),
        ],
    )
}

/// Failed report; the continue fee escalates with every prior failure.
#[must_use]
pub fn bounty_failure(cfg: &BountyCfg, catalog: &Catalog, failed_reports: u32) -> Visitor {
    let (name, sprite) = bounty_identity(catalog);
    let fee = cfg.continue_base_cost.saturating_add(
        cfg.continue_cost_step
            .saturating_mul(i32::try_from(failed_reports).unwrap_or(i32::MAX)),
    );
    Visitor::scripted(
        VISITOR_BOUNTY_FAILURE,
        &name,
        &sprite,
        "The trail went cold, overlord. The culprit is slippery. Shall I keep hunting?",
        vec![
            VisitorOption::new(
                "bounty_continue",
                format!("Keep hunting. (-{fee} coins)"),
                "As you wish. My fee climbs with every day of the chase.",
            )
            .with_effects(Effects {
                coins: -fee,
                rebellion: cfg.continue_rebellion,
                special: Some(SpecialEffect::ContinueContract),
                ..Effects::default()
            }),
            VisitorOption::new(
                "bounty_stand_down",
                "Stand down.",
                "Then the culprit walks free, and your subjects know it.",
            )
            .with_effects(Effects {
                happiness: cfg.stand_down_happiness,
                rebellion: cfg.stand_down_rebellion,
                special: Some(SpecialEffect::CancelContract),
                ..Effects::default()
            }),
        ],
    )
}

#[must_use]
pub fn tax_collector() -> Visitor {
    Visitor::scripted(
        VISITOR_TAX_COLLECTOR,
        "Imperial Tax Collector",
        "tax_collector.png",
        "Overlord {user}, the season's taxes are in. Shall I deliver them to the vault?",
        vec![
            VisitorOption::new(
                "taxes_accept",
                "Deliver them.",
                "Right away, my liege.",
            )
            .with_effects(Effects {
                special: Some(SpecialEffect::TaxCollection),
                ..Effects::default()
            }),
        ],
    )
}

/// An enemy world threatens one of ours.
#[must_use]
pub fn war_defense(cfg: &WarCfg, ours: &Planet, enemy: &Planet, discount: f64) -> Visitor {
    let normal = scale_coins(cfg.defend_cost, discount);
    let heavy = scale_coins(cfg.defend_heavy_cost, discount);
    let defend = |id: &str, text: String, reaction: &str, cost: i32, investment: i32| {
        VisitorOption::new(id, text, reaction).with_effects(Effects {
            coins: -cost,
            special: Some(SpecialEffect::StartWar {
                campaign: CampaignKind::Defense,
                defended_planet: Some(ours.id.clone()),
                enemy_planet: Some(enemy.id.clone()),
                investment,
            }),
            ..Effects::default()
        })
    };
    Visitor::scripted(
        VISITOR_WAR_GENERAL,
        GENERAL_NAME,
        GENERAL_SPRITE,
        format!(
            "My lord, {} has launched an assault on {}! How much shall we commit to its defense?",
            enemy.name, ours.name
        ),
        vec![
            defend(
                "defend_normal",
                format!("Defend {} (-{normal} coins)", ours.name),
                "We will hold the line with what we have.",
                normal,
                cfg.defend_cost,
            ),
            defend(
                "defend_heavy",
                format!("Fortify {} heavily (-{heavy} coins)", ours.name),
                "Every cannon we own is on its way.",
                heavy,
                cfg.defend_heavy_cost,
            ),
            VisitorOption::new(
                "defend_abandon",
                format!("Abandon {}.", ours.name),
                format!("{} will fall without a fight.", ours.name),
            )
            .with_effects(Effects {
                special: Some(SpecialEffect::Surrender {
                    planet: ours.id.clone(),
                }),
                ..Effects::default()
            }),
        ],
    )
}

/// An invasion of an unowned world.
#[must_use]
pub fn war_attack(cfg: &WarCfg, enemy: &Planet, discount: f64) -> Visitor {
    let normal = scale_coins(cfg.attack_cost, discount);
    let heavy = scale_coins(cfg.attack_heavy_cost, discount);
    let attack = |id: &str, text: String, reaction: &str, cost: i32, investment: i32| {
        VisitorOption::new(id, text, reaction).with_effects(Effects {
            coins: -cost,
            special: Some(SpecialEffect::StartWar {
                campaign: CampaignKind::Attack,
                defended_planet: None,
                enemy_planet: Some(enemy.id.clone()),
                investment,
            }),
            ..Effects::default()
        })
    };
    Visitor::scripted(
        VISITOR_WAR_GENERAL,
        GENERAL_NAME,
        GENERAL_SPRITE,
        format!(
            "My lord, {} lies ripe for conquest. How large a force shall we send?",
            enemy.name
        ),
        vec![
            attack(
                "attack_normal",
                format!("Attack {} (-{normal} coins)", enemy.name),
                "A solid force is assembling.",
                normal,
                cfg.attack_cost,
            ),
            attack(
                "attack_heavy",
                format!("Launch a full invasion (-{heavy} coins)"),
                "The whole armada sets sail.",
                heavy,
                cfg.attack_heavy_cost,
            ),
            VisitorOption::new(
                "attack_decline",
                "Not today.",
                "The army will stay on standby.",
            ),
        ],
    )
}
