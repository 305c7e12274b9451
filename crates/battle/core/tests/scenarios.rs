use std::sync::Arc;

use battle_core::{
    Ability, AbilityCategory, Action, AiPolicy, Battle, BattleEvent, ClassTag, Combatant,
    CombatantId, CombatantStats, CombatRules, HeroClass, MonsterKind, Outcome, PcgRng, Roles,
    Roster, Side, SpecialEffect,
};

fn hero(name: &str, hp: u32, mp: u32, attack: u32, defense: u32, speed: u32) -> Combatant {
    Combatant::new(
        ClassTag::Hero(HeroClass::Warrior),
        CombatantStats::new(name, hp, mp, attack, defense, speed),
    )
}

fn monster(name: &str, hp: u32, attack: u32, defense: u32, speed: u32) -> Combatant {
    Combatant::new(
        ClassTag::Monster(MonsterKind::Golem),
        CombatantStats::new(name, hp, 0, attack, defense, speed),
    )
}

fn battle(heroes: Vec<Combatant>, monsters: Vec<Combatant>) -> Battle {
    Battle::new(
        Roster::from_combatants(Side::Heroes, heroes).unwrap(),
        Roster::from_combatants(Side::Monsters, monsters).unwrap(),
        CombatRules::deterministic(),
        PcgRng::seeded(42),
    )
    .unwrap()
}

#[test]
fn basic_attack_deals_attack_minus_defense() {
    let mut b = battle(
        vec![hero("Attacker", 100, 0, 30, 10, 20)],
        vec![monster("Defender", 50, 10, 10, 10)],
    );
    let mut events = Vec::new();

    b.execute(CombatantId::hero(0), Action::Attack(CombatantId::monster(0)), &mut events)
        .unwrap();

    assert_eq!(b.combatant(CombatantId::monster(0)).unwrap().hp(), 30);
    assert!(matches!(events[0], BattleEvent::Attacked { damage: 20, .. }));
}

#[test]
fn ability_without_mana_leaves_mp_untouched() {
    let costly = Arc::new(Ability::new("Meteor", AbilityCategory::Attack, 15, 40));
    let mut b = battle(
        vec![hero("Caster", 100, 10, 30, 10, 20).with_abilities([costly])],
        vec![monster("Golem", 300, 10, 10, 10)],
    );
    let mut events = Vec::new();

    b.execute(
        CombatantId::hero(0),
        Action::ability("Meteor", CombatantId::monster(0)),
        &mut events,
    )
    .unwrap();

    assert_eq!(b.combatant(CombatantId::hero(0)).unwrap().mp(), 10);
    assert_eq!(b.combatant(CombatantId::monster(0)).unwrap().hp(), 300);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        BattleEvent::InsufficientMana {
            cost: 15,
            available: 10,
            ..
        }
    ));
}

#[test]
fn guarded_ally_adds_tank_defense() {
    let guard = Arc::new(Ability::special("Guard", SpecialEffect::Guard, 0, 0));
    let tank = hero("Tank", 200, 10, 20, 15, 20)
        .with_abilities([guard])
        .with_roles(Roles::TANK);
    let mut b = battle(
        vec![tank, hero("Ward", 100, 0, 20, 5, 20)],
        vec![monster("Golem", 300, 25, 10, 10)],
    );
    let mut events = Vec::new();

    b.execute(
        CombatantId::hero(0),
        Action::ability("Guard", CombatantId::hero(1)),
        &mut events,
    )
    .unwrap();
    b.execute(
        CombatantId::monster(0),
        Action::Attack(CombatantId::hero(1)),
        &mut events,
    )
    .unwrap();

    assert_eq!(b.combatant(CombatantId::hero(1)).unwrap().hp(), 95);
}

#[test]
fn wiping_the_monsters_ends_the_round_immediately() {
    let mut b = battle(
        vec![
            hero("Swift", 100, 0, 100, 10, 30),
            hero("Quick", 100, 0, 100, 10, 29),
        ],
        vec![
            monster("Golem 1", 20, 50, 5, 10),
            monster("Golem 2", 25, 50, 5, 11),
        ],
    );
    let mut events = Vec::new();

    let outcome = b
        .play_round(&mut AiPolicy::brute(), &mut AiPolicy::brute(), &mut events)
        .unwrap();

    assert_eq!(outcome, Outcome::HeroesWon);
    assert_eq!(b.round(), 1);
    assert!(b.roster(Side::Heroes).iter().all(|h| h.hp() == 100));
    assert!(!events.iter().any(|e| matches!(
        e,
        BattleEvent::Attacked { attacker, .. } if attacker.id.side == Side::Monsters
    )));
    assert!(events.last().is_some_and(BattleEvent::is_terminal));
}

#[test]
fn combatant_defeated_earlier_in_round_does_not_act() {
    let mut b = battle(
        vec![hero("Swift", 100, 0, 100, 10, 30)],
        vec![
            monster("Golem 1", 20, 50, 5, 10),
            monster("Golem 2", 300, 50, 5, 11),
        ],
    );
    let mut events = Vec::new();
    b.play_round(&mut AiPolicy::brute(), &mut AiPolicy::brute(), &mut events)
        .unwrap();

    let attackers: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Attacked { attacker, .. } => Some(attacker.id),
            _ => None,
        })
        .collect();
    assert_eq!(attackers, vec![CombatantId::hero(0), CombatantId::monster(1)]);
}

#[test]
fn stepwise_loop_matches_play_round() {
    let heroes = || vec![hero("A", 150, 0, 40, 15, 22), hero("B", 120, 0, 35, 10, 18)];
    let monsters = || vec![monster("G", 200, 30, 10, 20)];

    let mut composed = battle(heroes(), monsters());
    let mut composed_events = Vec::new();
    composed
        .play_round(&mut AiPolicy::brute(), &mut AiPolicy::brute(), &mut composed_events)
        .unwrap();

    let mut stepped = battle(heroes(), monsters());
    let mut stepped_events = Vec::new();
    let mut ai = AiPolicy::brute();
    stepped.begin_round(&mut stepped_events).unwrap();
    while let Some(actor) = stepped.next_turn() {
        stepped.take_turn(actor, &mut ai, &mut stepped_events).unwrap();
    }

    assert_eq!(composed_events, stepped_events);
    assert_eq!(composed.snapshot(), stepped.snapshot());
}
