//! Named features and the per-(state, action) feature vector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every feature any role can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    SuccessorScore,
    Score,
    DistanceToFood,
    EatFood,
    InvaderDistance,
    ScaredDefenderDistance,
    NormalDefenderDistance,
    DistanceToCapsule,
    Stop,
    Reverse,
    Revisit,
    LimitedEscape,
    ReturnWithFood,
    Defensive,
    ScaredOfInvader,
    DistanceToInvader,
    InvaderChase,
    OnDefense,
    NumInvaders,
    PatrolDistance,
}

impl Feature {
    pub const COUNT: usize = 20;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::SuccessorScore,
        Feature::Score,
        Feature::DistanceToFood,
        Feature::EatFood,
        Feature::InvaderDistance,
        Feature::ScaredDefenderDistance,
        Feature::NormalDefenderDistance,
        Feature::DistanceToCapsule,
        Feature::Stop,
        Feature::Reverse,
        Feature::Revisit,
        Feature::LimitedEscape,
        Feature::ReturnWithFood,
        Feature::Defensive,
        Feature::ScaredOfInvader,
        Feature::DistanceToInvader,
        Feature::InvaderChase,
        Feature::OnDefense,
        Feature::NumInvaders,
        Feature::PatrolDistance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::SuccessorScore => "successor_score",
            Feature::Score => "score",
            Feature::DistanceToFood => "distance_to_food",
            Feature::EatFood => "eat_food",
            Feature::InvaderDistance => "invader_distance",
            Feature::ScaredDefenderDistance => "scared_defender_distance",
            Feature::NormalDefenderDistance => "normal_defender_distance",
            Feature::DistanceToCapsule => "distance_to_capsule",
            Feature::Stop => "stop",
            Feature::Reverse => "reverse",
            Feature::Revisit => "revisit",
            Feature::LimitedEscape => "limited_escape",
            Feature::ReturnWithFood => "return_with_food",
            Feature::Defensive => "defensive",
            Feature::ScaredOfInvader => "scared_of_invader",
            Feature::DistanceToInvader => "distance_to_invader",
            Feature::InvaderChase => "invader_chase",
            Feature::OnDefense => "on_defense",
            Feature::NumInvaders => "num_invaders",
            Feature::PatrolDistance => "patrol_distance",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature values for one candidate action. Unset features are absent and
/// read as 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureVector {
    values: [Option<f64>; Feature::COUNT],
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = Some(value);
    }

    /// Value of `feature`, 0 when unset.
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()].unwrap_or(0.0)
    }

    pub fn is_set(&self, feature: Feature) -> bool {
        self.values[feature.index()].is_some()
    }

    /// Multiply a set feature in place; unset features stay unset.
    pub fn scale(&mut self, feature: Feature, factor: f64) {
        if let Some(value) = self.values[feature.index()].as_mut() {
            *value *= factor;
        }
    }

    /// Set features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL
            .iter()
            .filter_map(move |&feature| self.values[feature.index()].map(|v| (feature, v)))
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (feature, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", feature, value)?;
        }
        write!(f, "}}")
    }
}
