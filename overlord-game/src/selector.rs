//! Visitor selection: an ordered chain of scripted guards with a weighted
//! catalog draw as the fallback.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::conditions::matches;
use crate::config::EngineConfig;
use crate::constants::{
    TUTORIAL_VISITS, VISITOR_INTERN, VISITOR_JESTER, VISITOR_TAX_COLLECTOR, VISITOR_WAR_GENERAL,
};
use crate::data::Visitor;
use crate::scripted;
use crate::state::{GameState, ScienceStep};

/// Which rule produced the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    Tutorial,
    Donation,
    DivineWrath,
    Jester,
    Intern,
    ScienceFunding,
    ScienceBreakthrough,
    BountySuccess,
    BountyFailure,
    TaxCollector,
    WarDefense,
    WarAttack,
    Catalog,
    /// No catalog visitor was eligible; the slot stays empty.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub guard: Guard,
    pub visitor: Option<Visitor>,
}

impl Selection {
    const fn scripted(guard: Guard, visitor: Visitor) -> Self {
        Self {
            guard,
            visitor: Some(visitor),
        }
    }
}

/// Choose the next visitor. Guards are evaluated in order and the first
/// match wins.
///
/// Draw-time side effects are applied to `state`: the wrath visitor clears
/// `god_denied` and a successful bounty report closes the contract.
pub fn select_visitor<R: Rng + ?Sized>(
    state: &mut GameState,
    catalog: &Catalog,
    cfg: &EngineConfig,
    rng: &mut R,
) -> Selection {
    let selection = run_guards(state, catalog, cfg, rng);
    log::debug!(
        "visitor selection | day {} visit {} guard {:?} -> {}",
        state.day,
        state.visits_today,
        selection.guard,
        selection
            .visitor
            .as_ref()
            .map_or("<none>", |visitor| visitor.id.as_str())
    );
    selection
}

fn run_guards<R: Rng + ?Sized>(
    state: &mut GameState,
    catalog: &Catalog,
    cfg: &EngineConfig,
    rng: &mut R,
) -> Selection {
    let owned = state.owned_count();

    if state.day == 1 && state.visits_today < TUTORIAL_VISITS {
        let visitor = if state.visits_today == 0 {
            scripted::tutorial_welcome()
        } else {
            scripted::tutorial_rules()
        };
        return Selection::scripted(Guard::Tutorial, visitor);
    }

    if state.visits_today + 1 == state.max_visitors_per_day
        && state.player.happiness >= cfg.court.donation_min_happiness
    {
        return Selection::scripted(Guard::Donation, scripted::donation(&cfg.court, owned));
    }

    if state.god_denied {
        state.god_denied = false;
        return Selection::scripted(
            Guard::DivineWrath,
            scripted::divine_wrath(&cfg.court, state.player.coins),
        );
    }

    if state.jester_hired && !state.seen_today(VISITOR_JESTER) {
        return Selection::scripted(Guard::Jester, scripted::jester(&cfg.court));
    }

    if state.intern_hired && !state.seen_today(VISITOR_INTERN) {
        return Selection::scripted(Guard::Intern, scripted::intern(&cfg.court, rng));
    }

    if state.science_step == ScienceStep::AwaitingFunding
        && rng.gen_bool(cfg.science.visit_chance)
    {
        return Selection::scripted(
            Guard::ScienceFunding,
            scripted::science_funding(&cfg.science),
        );
    }

    if state.science_step == ScienceStep::Funded && rng.gen_bool(cfg.science.visit_chance) {
        return Selection::scripted(
            Guard::ScienceBreakthrough,
            scripted::science_breakthrough(&cfg.science),
        );
    }

    if let Some(contract) = state.bounty
        && state.day >= contract.next_report_day
        && state.visits_today == 0
    {
        if rng.gen_bool(cfg.bounty.success_chance) {
            state.bounty = None;
            return Selection::scripted(
                Guard::BountySuccess,
                scripted::bounty_success(&cfg.bounty, catalog),
            );
        }
        return Selection::scripted(
            Guard::BountyFailure,
            scripted::bounty_failure(&cfg.bounty, catalog, contract.failed_reports),
        );
    }

    if state.day.checked_rem(cfg.taxes.day_interval) == Some(0)
        && state.visits_today == 0
        && owned > 0
        && !state.seen_today(VISITOR_TAX_COLLECTOR)
    {
        return Selection::scripted(Guard::TaxCollector, scripted::tax_collector());
    }

    let general_available = !state.seen_today(VISITOR_WAR_GENERAL);

    if general_available
        && state.day > cfg.war.defense_min_day
        && rng.gen_bool(cfg.war.defense_offer_chance)
        && let Some(ours) = state.random_owned_planet(rng)
        && let Some(enemy) = state.random_unowned_planet(rng)
    {
        return Selection::scripted(
            Guard::WarDefense,
            scripted::war_defense(&cfg.war, &ours, &enemy, state.war_discount),
        );
    }

    if general_available
        && state.player.coins >= cfg.war.attack_min_coins
        && rng.gen_bool(cfg.war.attack_offer_chance)
        && let Some(enemy) = state.random_unowned_planet(rng)
    {
        return Selection::scripted(
            Guard::WarAttack,
            scripted::war_attack(&cfg.war, &enemy, state.war_discount),
        );
    }

    draw_from_catalog(state, catalog, rng)
}

fn draw_from_catalog<R: Rng + ?Sized>(
    state: &GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> Selection {
    let pool: Vec<&Visitor> = catalog
        .visitors
        .iter()
        .filter(|visitor| !state.seen_today(&visitor.id) && matches(visitor, state))
        .collect();
    let weights: Vec<(usize, u32)> = pool
        .iter()
        .enumerate()
        .map(|(idx, visitor)| (idx, visitor.selection_weight()))
        .collect();

    match choose_weighted(&weights, rng).and_then(|(idx, _)| pool.get(idx)) {
        Some(visitor) => Selection {
            guard: Guard::Catalog,
            visitor: Some((*visitor).clone()),
        },
        None => Selection {
            guard: Guard::Empty,
            visitor: None,
        },
    }
}

/// Pick an index with probability proportional to its weight, returning the
/// index and the roll that selected it.
pub fn choose_weighted<R: Rng + ?Sized>(
    weights: &[(usize, u32)],
    rng: &mut R,
) -> Option<(usize, u32)> {
    let total_weight: u32 = weights
        .iter()
        .fold(0_u32, |acc, (_, weight)| acc.saturating_add(*weight));
    if total_weight == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total_weight);
    let mut current = 0_u32;
    for (idx, weight) in weights {
        current = current.saturating_add(*weight);
        if roll < current {
            return Some((*idx, roll));
        }
    }

    weights.first().map(|(idx, _)| (*idx, roll))
}
