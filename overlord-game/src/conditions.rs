//! Eligibility filtering for catalog visitors
use crate::data::{Conditions, Visitor};
use crate::state::GameState;

/// Whether `visitor` may be drawn given `state`. Visitors without conditions
/// always match.
#[must_use]
pub fn matches(visitor: &Visitor, state: &GameState) -> bool {
    visitor
        .conditions
        .as_ref()
        .is_none_or(|conditions| conditions_hold(conditions, state))
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

fn flag_matches(expected: Option<bool>, actual: bool) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

fn conditions_hold(c: &Conditions, state: &GameState) -> bool {
    within(state.player.coins, c.min_coins, c.max_coins)
        && within(state.player.happiness, c.min_happiness, c.max_happiness)
        && within(state.tax_rate, c.min_tax_rate, c.max_tax_rate)
        && within(
            state.rebellion_chance,
            c.min_rebellion_chance,
            c.max_rebellion_chance,
        )
        && flag_matches(c.god_denied, state.god_denied)
        && flag_matches(c.jester_hired, state.jester_hired)
        && flag_matches(c.intern_hired, state.intern_hired)
        && flag_matches(c.refugee_banned, state.refugee_banned)
        && flag_matches(c.bounty_active, state.bounty.is_some())
        && c.science_step.is_none_or(|step| step == state.science_step)
        && c
            .requires_owned_planet
            .as_deref()
            .is_none_or(|id| state.is_owned(id))
        && c
            .requires_planet_not_owned
            .as_deref()
            .is_none_or(|id| !state.is_owned(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::data::Planet;
    use crate::state::{BountyContract, ScienceStep};

    fn state() -> GameState {
        let planets = vec![
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
        ];
        GameState::new(&EngineConfig::default(), &planets)
    }

    fn visitor(conditions: Conditions) -> Visitor {
        let mut visitor = Visitor::scripted("v", "V", "v.png", "", Vec::new());
        visitor.conditions = Some(conditions);
        visitor
    }

    #[test]
    fn no_conditions_always_match() {
        let visitor = Visitor::scripted("v", "V", "v.png", "", Vec::new());
        assert!(matches(&visitor, &state()));
        assert!(matches(&self::visitor(Conditions::default()), &state()));
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let state = state();
        let exact = visitor(Conditions {
            min_coins: Some(100),
            max_coins: Some(100),
            ..Conditions::default()
        });
        assert!(matches(&exact, &state));

        let too_rich = visitor(Conditions {
            min_coins: Some(101),
            ..Conditions::default()
        });
        assert!(!matches(&too_rich, &state));

        let taxes = visitor(Conditions {
            min_tax_rate: Some(0.3),
            ..Conditions::default()
        });
        assert!(!matches(&taxes, &state));
    }

    #[test]
    fn every_present_field_must_hold() {
        let mut state = state();
        let picky = visitor(Conditions {
            min_happiness: Some(40),
            jester_hired: Some(true),
            ..Conditions::default()
        });
        assert!(!matches(&picky, &state));
        state.jester_hired = true;
        assert!(matches(&picky, &state));
        state.player.happiness = 10;
        assert!(!matches(&picky, &state));
    }

    #[test]
    fn flags_and_steps_compare_for_equality() {
        let mut state = state();
        let fresh_science = visitor(Conditions {
            science_step: Some(ScienceStep::NotStarted),
            bounty_active: Some(false),
            ..Conditions::default()
        });
        assert!(matches(&fresh_science, &state));
        state.science_step = ScienceStep::Funded;
        assert!(!matches(&fresh_science, &state));
        state.science_step = ScienceStep::NotStarted;
        state.bounty = Some(BountyContract {
            next_report_day: 2,
            failed_reports: 0,
        });
        assert!(!matches(&fresh_science, &state));
    }

    #[test]
    fn planet_ownership_requirements() {
        let state = state();
        let needs_far = visitor(Conditions {
            requires_owned_planet: Some("far".to_string()),
            ..Conditions::default()
        });
        let needs_far_free = visitor(Conditions {
            requires_planet_not_owned: Some("far".to_string()),
            ..Conditions::default()
        });
        assert!(!matches(&needs_far, &state));
        assert!(matches(&needs_far_free, &state));
    }
}
