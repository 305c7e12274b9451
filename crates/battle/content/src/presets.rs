//! Built-in hero classes and monster kinds.
//!
//! Stat ranges are inclusive. Speed is shared by every type
//! ([`StatRange::DEFAULT_SPEED`]).

use battle_core::{
    Ability, AbilityCategory, Bounds, ClassTemplate, HeroClass, ModifiableStat, MonsterKind,
    Roles, SpecialEffect, StatRange,
};

use crate::catalog::ClassCatalog;

/// Catalog with every built-in class.
pub fn builtin_catalog() -> ClassCatalog {
    ClassCatalog::from_iter([
        mage(),
        druid(),
        warrior(),
        paladin(),
        golem(),
        orc(),
        troll(),
        undead(),
        dragon(),
    ])
}

fn range(hp: (u32, u32), mp: (u32, u32), attack: (u32, u32), defense: (u32, u32)) -> StatRange {
    StatRange::new(
        Bounds::new(hp.0, hp.1),
        Bounds::new(mp.0, mp.1),
        Bounds::new(attack.0, attack.1),
        Bounds::new(defense.0, defense.1),
    )
}

// ===== heroes =====

pub fn mage() -> ClassTemplate {
    ClassTemplate::new(
        HeroClass::Mage.into(),
        range((50, 100), (150, 300), (30, 40), (10, 25))
            .with_description("Fragile caster with a deep mana pool"),
    )
    .with_ability(
        Ability::new("Fireball", AbilityCategory::Attack, 12, 20)
            .with_description("Hurls a ball of fire"),
    )
    .with_ability(
        Ability::new("Ice Shard", AbilityCategory::Attack, 10, 18)
            .with_description("Launches a freezing shard"),
    )
    .with_ability(
        Ability::new("Lightning Bolt", AbilityCategory::Attack, 15, 25)
            .with_description("Calls down lightning"),
    )
    .with_roles(Roles::STRIKER)
    .with_aggressiveness(75)
}

pub fn druid() -> ClassTemplate {
    ClassTemplate::new(
        HeroClass::Druid.into(),
        range((80, 160), (120, 250), (25, 40), (18, 35))
            .with_description("Nature healer who keeps the party standing"),
    )
    .with_ability(
        Ability::new("Heal", AbilityCategory::Heal, 8, 25).with_description("Restores health"),
    )
    .with_ability(
        Ability::new("Group Heal", AbilityCategory::Heal, 20, 15)
            .with_description("A wave of soothing light"),
    )
    .with_ability(
        Ability::new("Blessing", AbilityCategory::Buff, 15, 5)
            .with_modifier(ModifiableStat::Attack, 3)
            .with_description("Empowers an ally"),
    )
    .with_ability(
        Ability::special("Purify", SpecialEffect::Cleanse, 10, 0)
            .with_description("Washes away curses and taunts"),
    )
    .with_ability(
        Ability::special("Channel", SpecialEffect::RestoreMana, 15, 15)
            .with_description("Shares mana with an ally"),
    )
    .with_roles(Roles::HEALER)
    .with_aggressiveness(30)
}

pub fn warrior() -> ClassTemplate {
    ClassTemplate::new(
        HeroClass::Warrior.into(),
        range((180, 300), (10, 60), (35, 55), (20, 35))
            .with_description("Front-line fighter with heavy blows"),
    )
    .with_ability(
        Ability::new("Slash", AbilityCategory::Attack, 5, 15).with_description("A powerful slash"),
    )
    .with_ability(
        Ability::new("Shield Bash", AbilityCategory::Attack, 8, 10)
            .with_description("Bashes with the shield"),
    )
    .with_ability(
        Ability::new("War Cry", AbilityCategory::Debuff, 12, 5)
            .with_modifier(ModifiableStat::Defense, 2)
            .with_description("A terrifying shout that rattles the enemy"),
    )
    .with_roles(Roles::STRIKER | Roles::TANK)
    .with_aggressiveness(70)
}

pub fn paladin() -> ClassTemplate {
    ClassTemplate::new(
        HeroClass::Paladin.into(),
        range((100, 200), (50, 100), (30, 50), (25, 45))
            .with_description("Holy guardian who shields and revives allies"),
    )
    .with_ability(
        Ability::new("Holy Strike", AbilityCategory::Attack, 8, 12)
            .with_description("A blessed blow"),
    )
    .with_ability(
        Ability::special("Guard", SpecialEffect::Guard, 5, 0)
            .with_description("Stands between an ally and harm"),
    )
    .with_ability(
        Ability::special("Taunt", SpecialEffect::Provoke, 6, 0)
            .with_description("Draws the enemy's wrath"),
    )
    .with_ability(
        Ability::special("Revive", SpecialEffect::Revive { hp: 50 }, 25, 0)
            .with_description("Calls a fallen ally back to the fight"),
    )
    .with_roles(Roles::TANK | Roles::HEALER)
    .with_aggressiveness(40)
}

// ===== monsters =====

pub fn golem() -> ClassTemplate {
    ClassTemplate::new(
        MonsterKind::Golem.into(),
        range((200, 400), (0, 20), (40, 60), (30, 50))
            .with_description("Slow stone giant, very hard to hurt"),
    )
    .with_ability(
        Ability::new("Rock Slam", AbilityCategory::Attack, 8, 18)
            .with_description("Pounds the ground with stone fists"),
    )
    .with_ability(
        Ability::new("Harden", AbilityCategory::Buff, 6, 10)
            .with_modifier(ModifiableStat::Defense, 2)
            .with_description("Its skin turns to granite"),
    )
    .with_aggressiveness(50)
}

pub fn orc() -> ClassTemplate {
    ClassTemplate::new(
        MonsterKind::Orc.into(),
        range((150, 300), (20, 40), (30, 50), (20, 40))
            .with_description("Brutish raider"),
    )
    .with_ability(
        Ability::new("Brutal Swing", AbilityCategory::Attack, 8, 18)
            .with_description("A wild overhead swing"),
    )
    .with_ability(
        Ability::new("Intimidate", AbilityCategory::Debuff, 6, 5)
            .with_modifier(ModifiableStat::Attack, 2)
            .with_description("A menacing glare"),
    )
    .with_aggressiveness(90)
}

pub fn troll() -> ClassTemplate {
    ClassTemplate::new(
        MonsterKind::Troll.into(),
        range((180, 350), (10, 30), (35, 55), (25, 45))
            .with_description("Hulking brute that fights dirty"),
    )
    .with_ability(
        Ability::new("Quick Strike", AbilityCategory::Attack, 3, 8)
            .with_description("A fast jab"),
    )
    .with_ability(
        Ability::new("Dirty Fighting", AbilityCategory::Attack, 5, 12)
            .with_description("Kicks sand and strikes low"),
    )
    .with_aggressiveness(80)
}

pub fn undead() -> ClassTemplate {
    ClassTemplate::new(
        MonsterKind::Undead.into(),
        range((100, 250), (40, 80), (25, 45), (15, 35))
            .with_description("Restless dead animated by dark magic"),
    )
    .with_ability(
        Ability::new("Bone Throw", AbilityCategory::Attack, 4, 10)
            .with_description("Throws a sharpened bone"),
    )
    .with_ability(
        Ability::new("Dark Magic", AbilityCategory::Attack, 12, 15)
            .with_description("Unleashes necrotic energy"),
    )
    .with_aggressiveness(60)
}

pub fn dragon() -> ClassTemplate {
    ClassTemplate::new(
        MonsterKind::Dragon.into(),
        range((300, 600), (60, 100), (50, 80), (40, 60))
            .with_description("Ancient winged terror"),
    )
    .with_ability(
        Ability::new("Fire Breath", AbilityCategory::Attack, 15, 25)
            .with_description("Engulfs the target in flame"),
    )
    .with_ability(
        Ability::new("Tail Sweep", AbilityCategory::Attack, 10, 20)
            .with_description("A crushing sweep of the tail"),
    )
    .with_ability(
        Ability::new("Roar", AbilityCategory::Debuff, 8, 8)
            .with_modifier(ModifiableStat::Defense, 2)
            .with_description("A deafening roar"),
    )
    .with_aggressiveness(70)
}
