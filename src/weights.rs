//! Weight tables for each role and mode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::{Feature, FeatureVector};

/// One weight per feature; features a table does not name weigh 0.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightProfile {
    weights: [f64; Feature::COUNT],
}

impl WeightProfile {
    pub fn zeros() -> Self {
        Self {
            weights: [0.0; Feature::COUNT],
        }
    }

    pub fn from_pairs(pairs: &[(Feature, f64)]) -> Self {
        let mut profile = Self::zeros();
        for &(feature, weight) in pairs {
            profile.set(feature, weight);
        }
        profile
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, weight: f64) {
        self.weights[feature.index()] = weight;
    }

    pub fn apply_overrides(&mut self, overrides: &BTreeMap<Feature, f64>) {
        for (&feature, &weight) in overrides {
            self.set(feature, weight);
        }
    }
}

pub const OFFENSE_WEIGHTS: [(Feature, f64); 11] = [
    (Feature::NormalDefenderDistance, 5.0),
    (Feature::ScaredDefenderDistance, -3.0),
    (Feature::DistanceToFood, -3.0),
    (Feature::EatFood, 20.0),
    (Feature::Stop, -15.0),
    (Feature::Reverse, -5.0),
    (Feature::Revisit, -13.0),
    (Feature::InvaderDistance, -2.0),
    (Feature::DistanceToCapsule, -1.0),
    (Feature::LimitedEscape, -3.0),
    (Feature::ReturnWithFood, -2.0),
];

pub const OFFENSE_DEFENSIVE_WEIGHTS: [(Feature, f64); 3] = [
    (Feature::DistanceToInvader, -100.0),
    (Feature::InvaderChase, 500.0),
    (Feature::ScaredOfInvader, 300.0),
];

pub const DEFENSE_WEIGHTS: [(Feature, f64); 8] = [
    (Feature::NumInvaders, -1000.0),
    (Feature::OnDefense, 100.0),
    (Feature::InvaderDistance, -100.0),
    (Feature::InvaderChase, 500.0),
    (Feature::PatrolDistance, -10.0),
    (Feature::ScaredOfInvader, 300.0),
    (Feature::Stop, -100.0),
    (Feature::Reverse, -50.0),
];

pub const BASELINE_WEIGHTS: [(Feature, f64); 1] = [(Feature::SuccessorScore, 1.0)];

/// Per-table weight replacements read from configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightOverrides {
    pub offense: BTreeMap<Feature, f64>,
    pub offense_defensive: BTreeMap<Feature, f64>,
    pub defense: BTreeMap<Feature, f64>,
    pub baseline: BTreeMap<Feature, f64>,
}

/// The full set of tables an agent may consult.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTables {
    pub offense: WeightProfile,
    pub offense_defensive: WeightProfile,
    pub defense: WeightProfile,
    pub baseline: WeightProfile,
}

impl Default for WeightTables {
    fn default() -> Self {
        Self {
            offense: WeightProfile::from_pairs(&OFFENSE_WEIGHTS),
            offense_defensive: WeightProfile::from_pairs(&OFFENSE_DEFENSIVE_WEIGHTS),
            defense: WeightProfile::from_pairs(&DEFENSE_WEIGHTS),
            baseline: WeightProfile::from_pairs(&BASELINE_WEIGHTS),
        }
    }
}

impl WeightTables {
    pub fn with_overrides(overrides: &WeightOverrides) -> Self {
        let mut tables = Self::default();
        tables.offense.apply_overrides(&overrides.offense);
        tables.offense_defensive.apply_overrides(&overrides.offense_defensive);
        tables.defense.apply_overrides(&overrides.defense);
        tables.baseline.apply_overrides(&overrides.baseline);
        tables
    }

    /// Offense switches tables on the `defensive` flag of the features
    /// already computed for this action.
    pub fn offense_for(&self, features: &FeatureVector) -> &WeightProfile {
        if features.get(Feature::Defensive) == 0.0 {
            &self.offense
        } else {
            &self.offense_defensive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offense_table_values() {
        let tables = WeightTables::default();
        let offense = &tables.offense;
        assert_eq!(offense.get(Feature::NormalDefenderDistance), 5.0);
        assert_eq!(offense.get(Feature::ScaredDefenderDistance), -3.0);
        assert_eq!(offense.get(Feature::DistanceToFood), -3.0);
        assert_eq!(offense.get(Feature::EatFood), 20.0);
        assert_eq!(offense.get(Feature::Stop), -15.0);
        assert_eq!(offense.get(Feature::Reverse), -5.0);
        assert_eq!(offense.get(Feature::Revisit), -13.0);
        assert_eq!(offense.get(Feature::InvaderDistance), -2.0);
        assert_eq!(offense.get(Feature::DistanceToCapsule), -1.0);
        assert_eq!(offense.get(Feature::LimitedEscape), -3.0);
        assert_eq!(offense.get(Feature::ReturnWithFood), -2.0);
        // Score is computed but deliberately unweighted
        assert_eq!(offense.get(Feature::Score), 0.0);
        assert_eq!(offense.get(Feature::InvaderChase), 0.0);
    }

    #[test]
    fn test_defensive_and_defense_tables() {
        let tables = WeightTables::default();
        assert_eq!(tables.offense_defensive.get(Feature::DistanceToInvader), -100.0);
        assert_eq!(tables.offense_defensive.get(Feature::InvaderChase), 500.0);
        assert_eq!(tables.offense_defensive.get(Feature::ScaredOfInvader), 300.0);
        assert_eq!(tables.offense_defensive.get(Feature::DistanceToFood), 0.0);

        assert_eq!(tables.defense.get(Feature::NumInvaders), -1000.0);
        assert_eq!(tables.defense.get(Feature::OnDefense), 100.0);
        assert_eq!(tables.defense.get(Feature::InvaderDistance), -100.0);
        assert_eq!(tables.defense.get(Feature::InvaderChase), 500.0);
        assert_eq!(tables.defense.get(Feature::PatrolDistance), -10.0);
        assert_eq!(tables.defense.get(Feature::ScaredOfInvader), 300.0);
        assert_eq!(tables.defense.get(Feature::Stop), -100.0);
        assert_eq!(tables.defense.get(Feature::Reverse), -50.0);
    }

    #[test]
    fn test_offense_table_follows_defensive_flag() {
        let tables = WeightTables::default();
        let mut features = FeatureVector::new();
        assert_eq!(tables.offense_for(&features), &tables.offense);

        features.set(Feature::Defensive, 0.0);
        assert_eq!(tables.offense_for(&features), &tables.offense);

        features.set(Feature::Defensive, 1.0);
        assert_eq!(tables.offense_for(&features), &tables.offense_defensive);
    }

    #[test]
    fn test_overrides_replace_single_entries() {
        let mut overrides = WeightOverrides::default();
        overrides.offense.insert(Feature::Stop, -20.0);
        overrides.defense.insert(Feature::Score, 1.5);
        let tables = WeightTables::with_overrides(&overrides);

        assert_eq!(tables.offense.get(Feature::Stop), -20.0);
        assert_eq!(tables.offense.get(Feature::Reverse), -5.0);
        assert_eq!(tables.defense.get(Feature::Score), 1.5);
        assert_eq!(tables.baseline, WeightTables::default().baseline);
    }
}
