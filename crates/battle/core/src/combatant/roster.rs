use crate::config::BattleConfig;
use crate::error::{CombatError, ErrorSeverity};

use super::{Combatant, CombatantId, Side};

/// Errors raised while assembling a roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("slot {slot} is outside the roster (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },

    #[error("slot {slot} of the {side} roster is already occupied")]
    SlotOccupied { side: Side, slot: usize },

    #[error("the {side} roster is full")]
    Full { side: Side },
}

impl CombatError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "ROSTER_SLOT_OUT_OF_RANGE",
            Self::SlotOccupied { .. } => "ROSTER_SLOT_OCCUPIED",
            Self::Full { .. } => "ROSTER_FULL",
        }
    }
}

/// Relation between two combatants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkKind {
    #[strum(serialize = "guard")]
    Guard,
    #[strum(serialize = "provocation")]
    Provocation,
}

/// A link dropped because the combatant it pointed at was defeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleasedLink {
    /// Combatant that held the link.
    pub holder: CombatantId,
    /// Defeated combatant the link pointed at.
    pub released_from: CombatantId,
    pub kind: LinkKind,
}

/// Fixed-capacity set of combatant slots for one side.
///
/// A slot index never changes once assigned; defeated combatants stay in
/// their slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    side: Side,
    slots: [Option<Combatant>; BattleConfig::ROSTER_CAPACITY],
}

impl Roster {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            slots: Default::default(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub const fn capacity(&self) -> usize {
        BattleConfig::ROSTER_CAPACITY
    }

    /// Places a combatant at a specific slot.
    pub fn insert(&mut self, slot: usize, mut combatant: Combatant) -> Result<CombatantId, RosterError> {
        let side = self.side;
        let entry = self.slots.get_mut(slot).ok_or(RosterError::SlotOutOfRange {
            slot,
            capacity: BattleConfig::ROSTER_CAPACITY,
        })?;
        if entry.is_some() {
            return Err(RosterError::SlotOccupied { side, slot });
        }

        let id = CombatantId {
            side,
            slot: slot as u8,
        };
        combatant.assign_id(id);
        *entry = Some(combatant);
        Ok(id)
    }

    /// Places a combatant in the first free slot.
    pub fn push(&mut self, combatant: Combatant) -> Result<CombatantId, RosterError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(RosterError::Full { side: self.side })?;
        self.insert(slot, combatant)
    }

    /// Builds a roster from combatants in slot order.
    pub fn from_combatants(
        side: Side,
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, RosterError> {
        let mut roster = Self::new(side);
        for combatant in combatants {
            roster.push(combatant)?;
        }
        Ok(roster)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        if id.side != self.side {
            return None;
        }
        self.slots.get(usize::from(id.slot))?.as_ref()
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        if id.side != self.side {
            return None;
        }
        self.slots.get_mut(usize::from(id.slot))?.as_mut()
    }

    /// Occupied slots in slot order, defeated combatants included.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Living combatants in slot order.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.iter().filter(|c| c.is_alive())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True when no combatant in the roster is alive.
    pub fn is_defeated(&self) -> bool {
        self.living().next().is_none()
    }

    /// Drops every guard or provocation link pointing at `target`.
    pub fn release_links_to(&mut self, target: CombatantId) -> Vec<ReleasedLink> {
        let mut released = Vec::new();
        for combatant in self.iter_mut() {
            if combatant.defended_by() == Some(target) {
                combatant.set_defended_by(None);
                released.push(ReleasedLink {
                    holder: combatant.id(),
                    released_from: target,
                    kind: LinkKind::Guard,
                });
            }
            if combatant.provoked_by() == Some(target) {
                combatant.set_provoked_by(None);
                released.push(ReleasedLink {
                    holder: combatant.id(),
                    released_from: target,
                    kind: LinkKind::Provocation,
                });
            }
        }
        released
    }
}
