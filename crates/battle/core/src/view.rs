//! Read-only battle state handed to decision providers.

use crate::combatant::{Combatant, CombatantId, Roster, Side};
use crate::engine::Outcome;

/// Borrowed view over both rosters.
#[derive(Clone, Copy, Debug)]
pub struct BattleView<'a> {
    heroes: &'a Roster,
    monsters: &'a Roster,
    round: u32,
    outcome: Outcome,
}

impl<'a> BattleView<'a> {
    pub fn new(heroes: &'a Roster, monsters: &'a Roster, round: u32, outcome: Outcome) -> Self {
        Self {
            heroes,
            monsters,
            round,
            outcome,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn roster(&self, side: Side) -> &'a Roster {
        match side {
            Side::Heroes => self.heroes,
            Side::Monsters => self.monsters,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.roster(id.side).get(id)
    }

    /// The combatant if it is alive.
    pub fn living(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.combatant(id).filter(|c| c.is_alive())
    }

    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.roster(side).living()
    }

    /// Lowest-HP living combatant on `side`; ties go to the lowest slot.
    pub fn weakest(&self, side: Side) -> Option<&'a Combatant> {
        self.living_on(side).min_by_key(|c| (c.hp(), c.id().slot))
    }

    /// Target a combatant on `side` would focus: its weakest living opponent.
    pub fn focus_target(&self, side: Side) -> Option<&'a Combatant> {
        self.weakest(side.opponent())
    }
}

/// Owned copy of the battle state, for consumers outside the battle's owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleSnapshot {
    pub heroes: Roster,
    pub monsters: Roster,
    pub round: u32,
    pub outcome: Outcome,
}

impl BattleSnapshot {
    pub fn view(&self) -> BattleView<'_> {
        BattleView::new(&self.heroes, &self.monsters, self.round, self.outcome)
    }
}
