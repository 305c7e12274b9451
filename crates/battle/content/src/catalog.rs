//! Class catalog: the lookup table from class tag to template.

use std::collections::BTreeMap;

use battle_core::{ClassOracle, ClassTag, ClassTemplate, Side};

/// Class templates keyed by tag.
///
/// Serialized as a plain list of templates; a later entry for the same tag
/// replaces an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<ClassTemplate>", into = "Vec<ClassTemplate>")
)]
pub struct ClassCatalog {
    templates: BTreeMap<ClassTag, ClassTemplate>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the template for its tag, returning the old one.
    pub fn insert(&mut self, template: ClassTemplate) -> Option<ClassTemplate> {
        self.templates.insert(template.tag, template)
    }

    pub fn with(mut self, template: ClassTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn get(&self, class: ClassTag) -> Option<&ClassTemplate> {
        self.templates.get(&class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassTemplate> + '_ {
        self.templates.values()
    }

    /// Tags available for `side`, in declaration order.
    pub fn classes(&self, side: Side) -> Vec<ClassTag> {
        self.templates
            .keys()
            .copied()
            .filter(|tag| tag.side() == side)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Overlays every template of `other` onto this catalog.
    pub fn merge(&mut self, other: ClassCatalog) {
        self.templates.extend(other.templates);
    }
}

impl ClassOracle for ClassCatalog {
    fn template(&self, class: ClassTag) -> Option<&ClassTemplate> {
        self.get(class)
    }
}

impl From<Vec<ClassTemplate>> for ClassCatalog {
    fn from(templates: Vec<ClassTemplate>) -> Self {
        templates.into_iter().collect()
    }
}

impl From<ClassCatalog> for Vec<ClassTemplate> {
    fn from(catalog: ClassCatalog) -> Self {
        catalog.templates.into_values().collect()
    }
}

impl FromIterator<ClassTemplate> for ClassCatalog {
    fn from_iter<I: IntoIterator<Item = ClassTemplate>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|t| (t.tag, t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Bounds, CombatantStats, HeroClass, MonsterKind, SetupError, StatRange};

    fn range(hp: (u32, u32)) -> StatRange {
        StatRange::new(
            Bounds::new(hp.0, hp.1),
            Bounds::new(0, 50),
            Bounds::new(10, 20),
            Bounds::new(5, 10),
        )
    }

    #[test]
    fn later_template_replaces_earlier() {
        let catalog: ClassCatalog = vec![
            ClassTemplate::new(HeroClass::Mage.into(), range((50, 100))),
            ClassTemplate::new(HeroClass::Mage.into(), range((60, 90))),
            ClassTemplate::new(MonsterKind::Orc.into(), range((150, 300))),
        ]
        .into();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.range(HeroClass::Mage.into()).map(|r| r.hp),
            Some(Bounds::new(60, 90))
        );
        assert_eq!(catalog.classes(Side::Monsters), vec![ClassTag::Monster(MonsterKind::Orc)]);
    }

    #[test]
    fn oracle_validates_against_range() {
        let catalog = ClassCatalog::new().with(ClassTemplate::new(HeroClass::Mage.into(), range((50, 100))));

        let ok = CombatantStats::new("Mira", 80, 20, 15, 7, 20);
        assert!(catalog.validate(HeroClass::Mage.into(), &ok).is_ok());

        let too_tough = CombatantStats::new("Mira", 400, 20, 15, 7, 20);
        assert!(matches!(
            catalog.validate(HeroClass::Mage.into(), &too_tough),
            Err(SetupError::Validation(_))
        ));
        assert!(matches!(
            catalog.validate(HeroClass::Druid.into(), &ok),
            Err(SetupError::UnknownClass(_))
        ));
    }
}
