use std::sync::Arc;

use battle_core::{
    Ability, AbilityCategory, AiPolicy, Battle, BattleEvent, ClassTag, Combatant, CombatantStats,
    CombatRules, HeroClass, ModifiableStat, MonsterKind, PcgRng, Roles, Roster, Side,
    SpecialEffect,
};

fn party() -> Roster {
    let slash = Ability::new("Slash", AbilityCategory::Attack, 5, 15);
    let heal = Ability::new("Heal", AbilityCategory::Heal, 8, 25);
    let blessing =
        Ability::new("Blessing", AbilityCategory::Buff, 15, 5).with_modifier(ModifiableStat::Attack, 2);
    let guard = Ability::special("Guard", SpecialEffect::Guard, 5, 0);

    Roster::from_combatants(
        Side::Heroes,
        [
            Combatant::new(
                ClassTag::Hero(HeroClass::Warrior),
                CombatantStats::new("Bran", 220, 40, 45, 30, 18),
            )
            .with_abilities([Arc::new(slash), Arc::new(guard)])
            .with_roles(Roles::TANK | Roles::STRIKER)
            .with_aggressiveness(70),
            Combatant::new(
                ClassTag::Hero(HeroClass::Druid),
                CombatantStats::new("Ivy", 120, 180, 30, 25, 22),
            )
            .with_abilities([Arc::new(heal), Arc::new(blessing)])
            .with_roles(Roles::HEALER)
            .with_aggressiveness(40),
        ],
    )
    .unwrap()
}

fn horde() -> Roster {
    let breath = Ability::new("Fire Breath", AbilityCategory::Attack, 15, 25);
    let roar = Ability::new("Roar", AbilityCategory::Debuff, 8, 5).with_modifier(ModifiableStat::Defense, 2);

    Roster::from_combatants(
        Side::Monsters,
        [
            Combatant::new(
                ClassTag::Monster(MonsterKind::Dragon),
                CombatantStats::new("Dragon 0", 320, 60, 55, 40, 15),
            )
            .with_abilities([Arc::new(breath), Arc::new(roar)])
            .with_aggressiveness(70),
            Combatant::new(
                ClassTag::Monster(MonsterKind::Orc),
                CombatantStats::new("Orc 1", 160, 0, 35, 20, 20),
            ),
        ],
    )
    .unwrap()
}

fn seeded(seed: u64) -> Battle {
    Battle::new(party(), horde(), CombatRules::default(), PcgRng::seeded(seed)).unwrap()
}

fn assert_resources_in_bounds(b: &Battle) {
    for side in [Side::Heroes, Side::Monsters] {
        for c in b.roster(side).iter() {
            assert!(c.hp() <= c.max_hp(), "{c}");
            assert!(c.mp() <= c.max_mp(), "{c}");
        }
    }
}

#[test]
fn hp_and_mp_stay_in_bounds_every_turn() {
    for seed in 0..20 {
        let mut b = seeded(seed);
        let (mut heroes, mut monsters) = (AiPolicy::standard(), AiPolicy::standard());
        let mut events = Vec::new();

        while !b.is_over() {
            b.begin_round(&mut events).unwrap();
            while let Some(actor) = b.next_turn() {
                let provider = match actor.side {
                    Side::Heroes => &mut heroes,
                    Side::Monsters => &mut monsters,
                };
                b.take_turn(actor, provider, &mut events).unwrap();
                assert_resources_in_bounds(&b);
            }
            assert!(b.round() < 500, "seed {seed} did not terminate");
        }
    }
}

#[test]
fn every_hit_deals_at_least_one() {
    let wall = Combatant::new(
        ClassTag::Monster(MonsterKind::Golem),
        CombatantStats::new("Wall", 10, 0, 1, 10_000, 10),
    );
    let mut b = Battle::new(
        party(),
        Roster::from_combatants(Side::Monsters, [wall]).unwrap(),
        CombatRules::default(),
        PcgRng::seeded(3),
    )
    .unwrap();
    let mut events = Vec::new();
    b.run(&mut AiPolicy::brute(), &mut AiPolicy::brute(), &mut events)
        .unwrap();

    let damages: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Attacked { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert!(!damages.is_empty());
    assert!(damages.iter().all(|&d| d >= 1));
}

#[test]
fn heal_at_full_hp_changes_nothing() {
    let mut c = Combatant::new(
        ClassTag::Hero(HeroClass::Paladin),
        CombatantStats::new("Sera", 150, 60, 40, 35, 20),
    );
    assert_eq!(c.heal(50), 0);
    assert_eq!(c.hp(), 150);
}

#[test]
fn same_seed_replays_identically() {
    let play = |seed| {
        let mut b = seeded(seed);
        let mut events = Vec::new();
        let outcome = b
            .run(&mut AiPolicy::standard(), &mut AiPolicy::standard(), &mut events)
            .unwrap();
        (outcome, events, b.round())
    };

    assert_eq!(play(1234), play(1234));
}

#[test]
fn battle_always_reports_one_winner() {
    for seed in 0..10 {
        let mut b = seeded(seed);
        let mut events = Vec::new();
        let outcome = b
            .run(&mut AiPolicy::standard(), &mut AiPolicy::standard(), &mut events)
            .unwrap();

        let winner = outcome.winner().unwrap();
        assert!(!b.roster(winner).is_defeated());
        assert!(b.roster(winner.opponent()).is_defeated());
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }
}
