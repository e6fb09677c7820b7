//! Visit bookkeeping, end-of-day rebellion checks and day summaries
use rand::Rng;

use crate::config::EngineConfig;
use crate::constants::{
    LOG_DAY_END, LOG_GAME_OVER, LOG_REBELLION_PLANET_LOST, NON_COUNTING_VISITORS,
};
use crate::result::{Ending, check_terminal};
use crate::state::{DaySummary, GameOver, GameState, SummaryPhase};

/// Finish the visit after an option was applied.
///
/// Runs the terminal checks, counts the visit, closes the day when the last
/// slot is used and records the reaction (or the game-over reason).
pub fn close_visit<R: Rng + ?Sized>(
    state: &mut GameState,
    visitor_id: &str,
    reaction: &str,
    mut narrative: Vec<String>,
    cfg: &EngineConfig,
    rng: &mut R,
) {
    if let Some(ending) = check_terminal(state) {
        finish_game(state, ending, &narrative);
        return;
    }

    state.visitors_seen_today.insert(visitor_id.to_string());
    if !NON_COUNTING_VISITORS.contains(&visitor_id) {
        state.visits_today += 1;
    }

    if state.visits_today >= state.max_visitors_per_day
        && let Some(ending) = end_day(state, cfg, rng, &mut narrative)
    {
        finish_game(state, ending, &narrative);
        return;
    }

    let combined = join_text(std::iter::once(reaction).chain(narrative.iter().map(String::as_str)));
    if let Some(encounter) = state.encounter.as_mut() {
        encounter.reaction = Some(combined);
    }
}

/// Apply the end-of-day rebellion rules and, if the reign survives, stage the
/// summary and roll over to the next day.
fn end_day<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &EngineConfig,
    rng: &mut R,
    narrative: &mut Vec<String>,
) -> Option<Ending> {
    let rules = &cfg.rebellion;
    if state.player.happiness < rules.low_happiness {
        state.add_rebellion(rules.low_happiness_gain);
    }

    if state.rebellion_chance >= rules.threshold {
        log::debug!(
            "rebellion | day {} chance {} coins {}",
            state.day,
            state.rebellion_chance,
            state.player.coins
        );
        if state.player.coins < rules.penalty_coins {
            return Some(Ending::Execution);
        }
        state.add_coins(-rules.penalty_coins);
        if let Some(lost) = state.random_owned_planet(rng) {
            state.set_owned(&lost.id, false);
            narrative.push(format!(
                "Rebellion erupts on {}. You lose {} coins and control of the world.",
                lost.name, rules.penalty_coins
            ));
        }
        state.rebellion_chance = 0;
        state.push_log(LOG_REBELLION_PLANET_LOST);

        if let Some(ending) = check_terminal(state) {
            return Some(ending);
        }
    }

    let summary = DaySummary {
        day: state.day,
        coins_change: state.player.coins - state.day_start.coins,
        happiness_change: state.player.happiness - state.day_start.happiness,
        rebellion_change: state.rebellion_chance - state.day_start.rebellion,
    };
    log::info!(
        "day {} closed | coins {:+} happiness {:+} rebellion {:+}",
        summary.day,
        summary.coins_change,
        summary.happiness_change,
        summary.rebellion_change
    );
    state.last_day_summary = Some(summary);
    state.summary_phase = SummaryPhase::Pending;
    state.day += 1;
    state.visits_today = 0;
    state.visitors_seen_today.clear();
    state.snapshot_day_start();
    state.push_log(LOG_DAY_END);
    None
}

/// Record the ending. Narrative produced by the final choice is prefixed to
/// the reason and the encounter is cleared.
pub fn finish_game(state: &mut GameState, ending: Ending, narrative: &[String]) {
    let reason = join_text(
        narrative
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(ending.reason())),
    );
    log::info!("game over on day {} | {ending}", state.day);
    state.game_over = Some(GameOver { ending, reason });
    state.encounter = None;
    state.push_log(LOG_GAME_OVER);
}

/// Acknowledge a staged summary. Returns whether there was one to clear.
pub fn clear_summary(state: &mut GameState) -> bool {
    if state.summary_phase == SummaryPhase::Hidden {
        return false;
    }
    state.summary_phase = SummaryPhase::Hidden;
    state.encounter = None;
    true
}

fn join_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
