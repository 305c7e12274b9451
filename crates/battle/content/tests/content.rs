use std::path::PathBuf;

use battle_content::{ContentFactory, EncounterBuilder};
use battle_core::{AiPolicy, Battle, ClassOracle, MonsterKind, PcgRng, Roles};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn shipped_data_files_load() {
    let factory = ContentFactory::new(data_dir());

    let rules = factory.load_rules().unwrap();
    assert_eq!(rules.critical_chance_percent, 10);

    let catalog = factory.load_catalog().unwrap();
    let orc = catalog.template(MonsterKind::Orc.into()).unwrap();
    assert_eq!(orc.roles, Roles::TANK);
    assert_eq!(orc.abilities.len(), 3);
    assert_eq!(catalog.len(), 9);
}

#[test]
fn random_encounter_plays_to_completion() {
    let factory = ContentFactory::new(data_dir());
    let catalog = factory.load_catalog().unwrap();
    let rules = factory.load_rules().unwrap();

    for seed in [1_u64, 7, 99] {
        let mut rng = PcgRng::seeded(seed);
        let builder = EncounterBuilder::new(&catalog);
        let heroes = builder.party(4, &mut rng).unwrap();
        let monsters = builder.monsters(3, &mut rng).unwrap();

        let mut battle = Battle::new(heroes, monsters, rules.clone(), rng).unwrap();
        let mut events = Vec::new();
        let outcome = battle
            .run(&mut AiPolicy::standard(), &mut AiPolicy::standard(), &mut events)
            .unwrap();

        assert!(outcome.is_terminal());
        assert!(events.last().is_some_and(|e| e.is_terminal()));
    }
}
