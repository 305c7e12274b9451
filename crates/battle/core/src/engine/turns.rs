use crate::combatant::{CombatantId, Roster};
use crate::config::CombatRules;
use crate::rng::RngSource;

/// One entry of a round's acting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTurn {
    pub id: CombatantId,
    pub priority: u32,
}

/// Computes the acting order for one round.
///
/// Priority is effective speed plus a uniform jitter in
/// `0..=turn_jitter_max`. Jitter is drawn heroes first, then monsters, each in
/// slot order. The sort is stable, so equal priorities keep that same order.
pub fn schedule(
    heroes: &Roster,
    monsters: &Roster,
    rules: &CombatRules,
    rng: &mut (impl RngSource + ?Sized),
) -> Vec<ScheduledTurn> {
    let mut order: Vec<ScheduledTurn> = heroes
        .living()
        .chain(monsters.living())
        .map(|c| ScheduledTurn {
            id: c.id(),
            priority: c
                .effective_speed()
                .saturating_add(rng.range(0, rules.turn_jitter_max)),
        })
        .collect();

    order.sort_by(|a, b| b.priority.cmp(&a.priority));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassTag, HeroClass, MonsterKind};
    use crate::combatant::{Combatant, Side};
    use crate::rng::PcgRng;
    use crate::stats::CombatantStats;

    fn roster(side: Side, speeds: &[u32]) -> Roster {
        let class = match side {
            Side::Heroes => ClassTag::Hero(HeroClass::Warrior),
            Side::Monsters => ClassTag::Monster(MonsterKind::Orc),
        };
        Roster::from_combatants(
            side,
            speeds.iter().enumerate().map(|(i, &speed)| {
                Combatant::new(class, CombatantStats::new(format!("{side} {i}"), 100, 0, 30, 10, speed))
            }),
        )
        .unwrap()
    }

    fn ids(order: &[ScheduledTurn]) -> Vec<CombatantId> {
        order.iter().map(|t| t.id).collect()
    }

    #[test]
    fn without_jitter_orders_by_speed_then_insertion() {
        let heroes = roster(Side::Heroes, &[15, 30]);
        let monsters = roster(Side::Monsters, &[30, 10]);
        let rules = CombatRules::deterministic();

        let order = schedule(&heroes, &monsters, &rules, &mut PcgRng::seeded(0));
        assert_eq!(
            ids(&order),
            vec![
                CombatantId::hero(1),
                CombatantId::monster(0),
                CombatantId::hero(0),
                CombatantId::monster(1),
            ]
        );
    }

    #[test]
    fn defeated_combatants_are_skipped() {
        let heroes = roster(Side::Heroes, &[20, 25]);
        let mut monsters = roster(Side::Monsters, &[12]);
        if let Some(m) = monsters.get_mut(CombatantId::monster(0)) {
            m.take_damage(1_000);
        }

        let order = schedule(&heroes, &monsters, &CombatRules::default(), &mut PcgRng::seeded(4));
        assert_eq!(order.len(), 2);
        assert!(order.iter().all(|t| t.id.side == Side::Heroes));
    }

    #[test]
    fn seeded_order_is_reproducible() {
        let heroes = roster(Side::Heroes, &[18, 22, 15, 30]);
        let monsters = roster(Side::Monsters, &[20, 20, 25, 11, 16]);
        let rules = CombatRules::default();

        let first = schedule(&heroes, &monsters, &rules, &mut PcgRng::seeded(2024));
        let second = schedule(&heroes, &monsters, &rules, &mut PcgRng::seeded(2024));
        assert_eq!(first, second);
    }

    #[test]
    fn priority_stays_within_jitter_window() {
        let heroes = roster(Side::Heroes, &[20]);
        let monsters = roster(Side::Monsters, &[10]);
        let rules = CombatRules::default();
        let mut rng = PcgRng::seeded(77);

        for _ in 0..100 {
            for turn in schedule(&heroes, &monsters, &rules, &mut rng) {
                let base = if turn.id.side == Side::Heroes { 20 } else { 10 };
                assert!((base..=base + rules.turn_jitter_max).contains(&turn.priority));
            }
        }
    }
}
