use crate::features::FeatureVector;
use crate::weights::WeightProfile;

/// Linear score of one candidate action: the sum of `feature * weight` over
/// the features that are set. Features without a weight contribute 0.
pub fn evaluate(features: &FeatureVector, weights: &WeightProfile) -> f64 {
    features
        .iter()
        .map(|(feature, value)| value * weights.get(feature))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    #[test]
    fn test_dot_product() {
        let mut features = FeatureVector::new();
        features.set(Feature::DistanceToFood, 4.0);
        features.set(Feature::EatFood, 10.0);
        features.set(Feature::Stop, 1.0);

        let weights = WeightProfile::from_pairs(&[
            (Feature::DistanceToFood, -3.0),
            (Feature::EatFood, 20.0),
            (Feature::Stop, -15.0),
        ]);
        assert_eq!(evaluate(&features, &weights), -12.0 + 200.0 - 15.0);
    }

    #[test]
    fn test_unweighted_features_contribute_zero() {
        let mut features = FeatureVector::new();
        features.set(Feature::Score, 42.0);
        features.set(Feature::Stop, 1.0);

        let weights = WeightProfile::from_pairs(&[(Feature::Stop, -15.0)]);
        assert_eq!(evaluate(&features, &weights), -15.0);
    }

    #[test]
    fn test_unset_features_contribute_zero() {
        let features = FeatureVector::new();
        let weights = WeightProfile::from_pairs(&[(Feature::Stop, -15.0)]);
        assert_eq!(evaluate(&features, &weights), 0.0);
    }

    #[test]
    fn test_evaluate_is_deterministic_and_finite() {
        let mut features = FeatureVector::new();
        features.set(Feature::InvaderChase, 1.0 / 3.0);
        features.set(Feature::NormalDefenderDistance, 14.4);
        let weights = WeightProfile::from_pairs(&[
            (Feature::InvaderChase, 500.0),
            (Feature::NormalDefenderDistance, 5.0),
        ]);

        let first = evaluate(&features, &weights);
        let second = evaluate(&features, &weights);
        assert!(first.is_finite());
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
