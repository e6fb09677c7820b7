use std::collections::HashSet;

use overlord_game::constants::CATALOG_BOUNTY_HUNTER;
use overlord_game::{
    Action, BundledContent, Catalog, DataLoader, Engine, GameSession, GameState, SpecialEffect,
};

#[test]
fn bundled_catalog_has_a_home_world_and_rivals() {
    let catalog = BundledContent.load_catalog().expect("bundled catalog");
    let owned = catalog.planets.iter().filter(|planet| planet.owned).count();
    assert_eq!(owned, 1);
    assert!(catalog.planets.len() > owned);

    let ids: HashSet<&str> = catalog.planets.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.planets.len());
}

#[test]
fn bundled_visitors_are_well_formed() {
    let catalog = Catalog::bundled().unwrap();
    assert!(catalog.visitor(CATALOG_BOUNTY_HUNTER).is_some());

    for visitor in &catalog.visitors {
        assert!(!visitor.options.is_empty(), "{} offers nothing", visitor.id);
        assert!(visitor.selection_weight() > 0, "{} never appears", visitor.id);
        let option_ids: HashSet<&str> = visitor.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            option_ids.len(),
            visitor.options.len(),
            "{} repeats an option id",
            visitor.id
        );
    }
}

#[test]
fn bundled_visitors_cover_every_flag_effect() {
    let catalog = Catalog::bundled().unwrap();
    let specials: Vec<&SpecialEffect> = catalog
        .visitors
        .iter()
        .flat_map(|visitor| &visitor.options)
        .filter_map(|option| option.effects.special.as_ref())
        .collect();

    let has = |probe: fn(&SpecialEffect) -> bool| specials.iter().any(|s| probe(s));
    assert!(has(|s| matches!(s, SpecialEffect::Gamble)));
    assert!(has(|s| matches!(s, SpecialEffect::Prophecy)));
    assert!(has(|s| matches!(s, SpecialEffect::StartContract)));
    assert!(has(|s| matches!(s, SpecialEffect::ScienceStart)));
    assert!(has(|s| matches!(s, SpecialEffect::DenyGod)));
    assert!(has(|s| matches!(s, SpecialEffect::HireJester)));
    assert!(has(|s| matches!(s, SpecialEffect::HireIntern)));
    assert!(has(|s| matches!(s, SpecialEffect::BanRefugees)));
    assert!(has(|s| matches!(s, SpecialEffect::WarDiscount { .. })));
}

#[test]
fn game_state_survives_a_json_trip_mid_reign() {
    let engine = Engine::from_loader(&BundledContent).unwrap();
    let mut session = GameSession::from_seed(engine, 21);
    session.initialize("Drake", None);
    session.request_visitor();
    session.choose_option(0);
    session.request_visitor();

    let state = session.state();
    let json = serde_json::to_string(state).expect("serialize state");
    let restored: GameState = serde_json::from_str(&json).expect("deserialize state");
    assert_eq!(&restored, state);
}

#[test]
fn actions_use_a_tagged_wire_format() {
    let json = serde_json::to_value(Action::AcknowledgeDaySummary).unwrap();
    assert_eq!(json["action"], "acknowledge_day_summary");

    let json = serde_json::to_value(Action::ChooseOption { index: 1 }).unwrap();
    assert_eq!(json["action"], "choose_option");
    assert_eq!(json["index"], 1);

    let parsed: Action =
        serde_json::from_str(r#"{ "action": "initialize", "name": "Drake", "gender": "female" }"#)
            .unwrap();
    assert!(matches!(parsed, Action::Initialize { gender: Some(_), .. }));
}

#[test]
fn visitor_json_accepts_sparse_effects() {
    let planets = r#"[{ "id": "home", "name": "Home", "owned": true }]"#;
    let visitors = r#"[{
        "id": "courier",
        "name": "Courier",
        "sprite": "courier.png",
        "text": "A letter for {user}.",
        "options": [
            { "id": "read", "text": "Read it", "reaction": "Ah.", "effects": { "happiness": 2 } },
            { "id": "burn", "text": "Burn it", "reaction": "Oh.", "effects": { "special": { "kind": "prophecy" } } }
        ]
    }]"#;
    let catalog = Catalog::from_json(planets, visitors).expect("sparse catalog");
    let courier = catalog.visitor("courier").unwrap();
    assert_eq!(courier.options[0].effects.coins, 0);
    assert_eq!(
        courier.options[1].effects.special,
        Some(SpecialEffect::Prophecy)
    );
}
