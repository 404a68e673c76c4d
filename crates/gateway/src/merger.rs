//! Constraint merger.
//!
//! Per numeric field the first valid value wins, in this order:
//! authoritative extractor, model classifier, fallback parser. The
//! restaurant is only ever taken from a validated resolver match.

use mealroute_core::types::{
    ConstraintField, Constraints, ExplicitRestaurant, RawConstraints, RestaurantIdentity,
};

use crate::keywords::mentions_breakfast;
use crate::resolution::RestaurantResolution;

/// Everything the merger reads.
#[derive(Debug, Clone, Copy)]
pub struct MergeInputs<'a> {
    pub message: &'a str,
    /// `None` when the authoritative extractor was unavailable.
    pub authoritative: Option<&'a Constraints>,
    /// Present only when the model classifier ran.
    pub model: Option<&'a RawConstraints>,
    pub fallback: &'a Constraints,
    pub explicit: &'a ExplicitRestaurant,
    pub resolution: &'a RestaurantResolution,
}

/// Merged constraints plus the restaurant the search is scoped to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConstraints {
    pub constraints: Constraints,
    pub restaurant: Option<RestaurantIdentity>,
    /// A matched restaurant was dropped because macro bounds were present.
    pub restaurant_dropped: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintMerger;

impl ConstraintMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, inputs: MergeInputs<'_>) -> MergedConstraints {
        let model = inputs.model.map(RawConstraints::normalize);
        let sources: Vec<&Constraints> = inputs
            .authoritative
            .into_iter()
            .chain(model.as_ref())
            .chain(std::iter::once(inputs.fallback))
            .collect();

        let mut constraints = Constraints::default();
        for field in ConstraintField::ALL {
            let value = sources.iter().find_map(|source| source.get(field));
            constraints.set(field, value);
        }

        // Meal times other than breakfast never become filters.
        if mentions_breakfast(inputs.message) {
            constraints.breakfast = Some(true);
        }

        if let Some(proposed) = model.as_ref().and_then(|m| m.restaurant.as_deref()) {
            tracing::debug!(proposed = %proposed, "Ignoring model-proposed restaurant");
        }

        let identity = inputs.resolution.restaurant_match.identity();
        let mut merged = MergedConstraints {
            constraints,
            ..MergedConstraints::default()
        };
        match identity {
            Some(identity) if inputs.explicit.has_restaurant => {
                if merged.constraints.has_macro_constraint() {
                    tracing::info!(
                        restaurant = %identity.name,
                        "Dropping matched restaurant because macro bounds are present"
                    );
                    merged.restaurant_dropped = true;
                } else {
                    merged.constraints.restaurant = Some(identity.name.clone());
                    merged.restaurant = Some(identity);
                }
            }
            _ => {}
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealroute_core::types::{MatchType, NumericValue, RestaurantMatch};

    fn chipotle_match() -> RestaurantResolution {
        RestaurantResolution {
            restaurant_match: RestaurantMatch::Match {
                canonical_name: "Chipotle Mexican Grill".into(),
                id: Some("r-1".into()),
                variants: vec!["Chipotle".into()],
                match_type: MatchType::Alias,
            },
            restaurant_only: false,
        }
    }

    fn no_restaurant() -> RestaurantResolution {
        RestaurantResolution {
            restaurant_match: RestaurantMatch::NoRestaurantIntent,
            restaurant_only: false,
        }
    }

    #[test]
    fn test_precedence_per_field() {
        let authoritative = Constraints::default().with(ConstraintField::CalorieCap, 600.0);
        let model = RawConstraints {
            calorie_cap: Some(NumericValue::from(900.0)),
            min_protein: Some(NumericValue::from("30")),
            ..RawConstraints::default()
        };
        let fallback = Constraints::default()
            .with(ConstraintField::MinProtein, 20.0)
            .with(ConstraintField::MaxCarbs, 50.0);

        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "lunch",
            authoritative: Some(&authoritative),
            model: Some(&model),
            fallback: &fallback,
            explicit: &ExplicitRestaurant::none(),
            resolution: &no_restaurant(),
        });

        assert_eq!(merged.constraints.calorie_cap, Some(600.0));
        assert_eq!(merged.constraints.min_protein, Some(30.0));
        assert_eq!(merged.constraints.max_carbs, Some(50.0));
        assert!(merged.restaurant.is_none());
    }

    #[test]
    fn test_invalid_model_values_fall_through() {
        let model = RawConstraints {
            calorie_cap: Some(NumericValue::from("NaN")),
            max_fats: Some(NumericValue::from(-4.0)),
            ..RawConstraints::default()
        };
        let fallback = Constraints::default().with(ConstraintField::CalorieCap, 700.0);

        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "something",
            authoritative: None,
            model: Some(&model),
            fallback: &fallback,
            explicit: &ExplicitRestaurant::none(),
            resolution: &no_restaurant(),
        });
        assert_eq!(merged.constraints.calorie_cap, Some(700.0));
        assert_eq!(merged.constraints.max_fats, None);
    }

    #[test]
    fn test_restaurant_set_without_macros() {
        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "burrito from Chipotle",
            authoritative: Some(&Constraints::default()),
            model: None,
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::detected("Chipotle"),
            resolution: &chipotle_match(),
        });
        assert_eq!(
            merged.constraints.restaurant.as_deref(),
            Some("Chipotle Mexican Grill")
        );
        assert_eq!(merged.restaurant.unwrap().id.as_deref(), Some("r-1"));
        assert!(!merged.restaurant_dropped);
    }

    #[test]
    fn test_macro_drops_matched_restaurant() {
        let authoritative = Constraints::default().with(ConstraintField::CalorieCap, 700.0);
        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "under 700 calories from Chipotle",
            authoritative: Some(&authoritative),
            model: None,
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::detected("Chipotle"),
            resolution: &chipotle_match(),
        });
        assert_eq!(merged.constraints.calorie_cap, Some(700.0));
        assert!(merged.constraints.restaurant.is_none());
        assert!(merged.restaurant.is_none());
        assert!(merged.restaurant_dropped);
    }

    #[test]
    fn test_model_restaurant_never_trusted() {
        let model = RawConstraints {
            restaurant: Some("Taco Bell".into()),
            ..RawConstraints::default()
        };
        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "something cheesy",
            authoritative: Some(&Constraints::default()),
            model: Some(&model),
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::none(),
            resolution: &no_restaurant(),
        });
        assert!(merged.constraints.restaurant.is_none());
        assert!(merged.restaurant.is_none());
    }

    #[test]
    fn test_match_without_explicit_detection_is_ignored() {
        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "burrito",
            authoritative: None,
            model: None,
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::none(),
            resolution: &chipotle_match(),
        });
        assert!(merged.restaurant.is_none());
    }

    #[test]
    fn test_breakfast_requires_literal_word() {
        let model = RawConstraints {
            breakfast: Some(true),
            ..RawConstraints::default()
        };
        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "something for the morning",
            authoritative: None,
            model: Some(&model),
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::none(),
            resolution: &no_restaurant(),
        });
        assert_eq!(merged.constraints.breakfast, None);

        let merged = ConstraintMerger::new().merge(MergeInputs {
            message: "Breakfast ideas",
            authoritative: None,
            model: None,
            fallback: &Constraints::default(),
            explicit: &ExplicitRestaurant::none(),
            resolution: &no_restaurant(),
        });
        assert_eq!(merged.constraints.breakfast, Some(true));
    }
}
