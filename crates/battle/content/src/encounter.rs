//! Random hero parties and monster encounters.

use tracing::debug;

use battle_core::{
    BattleConfig, ClassOracle, ClassTag, CombatantSpec, RngSource, Roster, RosterError, SetupError,
    Side, StatSource,
};

/// Builds a roster from explicit specs, in slot order.
pub fn roster_from_specs(
    side: Side,
    specs: &[CombatantSpec],
    oracle: &(impl ClassOracle + ?Sized),
    rng: &mut (impl RngSource + ?Sized),
) -> Result<Roster, SetupError> {
    if specs.is_empty() {
        return Err(SetupError::EmptyRoster(side));
    }

    let mut roster = Roster::new(side);
    for spec in specs {
        if spec.class.side() != side {
            return Err(SetupError::WrongSide {
                class: spec.class,
                side,
            });
        }
        let combatant = spec.build(oracle, rng)?;
        debug!(%side, name = combatant.name(), class = %spec.class, "combatant built");
        roster.push(combatant)?;
    }
    Ok(roster)
}

/// Generates rosters of random classes from a catalog.
///
/// Combatants are named `"<Class> <n>"` with `n` counting from 1 in slot
/// order.
pub struct EncounterBuilder<'a> {
    oracle: &'a dyn ClassOracle,
    level: Option<u32>,
}

impl<'a> EncounterBuilder<'a> {
    pub fn new(oracle: &'a dyn ClassOracle) -> Self {
        Self {
            oracle,
            level: None,
        }
    }

    /// Uses level-interpolated stats instead of uniform draws.
    pub fn at_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Classes of `side` the catalog knows about.
    pub fn classes(&self, side: Side) -> Vec<ClassTag> {
        ClassTag::all()
            .filter(|tag| tag.side() == side && self.oracle.template(*tag).is_some())
            .collect()
    }

    /// Draws `size` random class specs for `side`.
    pub fn specs(
        &self,
        side: Side,
        size: usize,
        rng: &mut (impl RngSource + ?Sized),
    ) -> Result<Vec<CombatantSpec>, SetupError> {
        let classes = self.classes(side);
        if size == 0 || classes.is_empty() {
            return Err(SetupError::EmptyRoster(side));
        }
        if size > BattleConfig::ROSTER_CAPACITY {
            return Err(RosterError::Full { side }.into());
        }

        let last = u32::try_from(classes.len() - 1).unwrap_or(u32::MAX);
        let specs = (1..=size)
            .map(|n| {
                let class = classes[rng.range(0, last) as usize];
                let source = self.level.map_or(StatSource::Random, StatSource::Level);
                CombatantSpec {
                    class,
                    name: format!("{class} {n}"),
                    source,
                }
            })
            .collect();
        Ok(specs)
    }

    pub fn roster(
        &self,
        side: Side,
        size: usize,
        rng: &mut (impl RngSource + ?Sized),
    ) -> Result<Roster, SetupError> {
        let specs = self.specs(side, size, rng)?;
        roster_from_specs(side, &specs, self.oracle, rng)
    }

    pub fn party(&self, size: usize, rng: &mut (impl RngSource + ?Sized)) -> Result<Roster, SetupError> {
        self.roster(Side::Heroes, size, rng)
    }

    pub fn monsters(&self, size: usize, rng: &mut (impl RngSource + ?Sized)) -> Result<Roster, SetupError> {
        self.roster(Side::Monsters, size, rng)
    }
}
