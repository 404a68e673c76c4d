//! Authoritative rule-based extractor.
//!
//! Accepts decimals, ranges, and both number-first and noun-first phrasing
//! for every axis. Its restaurant detection is the one the pipeline trusts.

use once_cell::sync::Lazy;

use mealroute_core::traits::ConstraintSource;
use mealroute_core::types::{ConstraintField, Constraints, ExplicitRestaurant};
use mealroute_core::Result;

use super::patterns::{
    bare_amount, first_match, noun_first, number_first, ranges, Axis, Bound, FieldPattern,
    CALORIES, CARBS, DECIMAL, FATS, PROTEIN,
};
use super::{parse_positive_decimal, restaurant_candidate, RestaurantPatterns};
use crate::keywords::mentions_breakfast;

struct AxisRules {
    min_field: ConstraintField,
    max_field: ConstraintField,
    ranges: Vec<FieldPattern>,
    min: Vec<FieldPattern>,
    max: Vec<FieldPattern>,
}

impl AxisRules {
    /// `bare` picks the bound a comparator-free gram amount fills, if any.
    fn new(
        axis: Axis,
        min_field: ConstraintField,
        max_field: ConstraintField,
        bare: Option<Bound>,
    ) -> Self {
        let mut min = number_first(axis, Bound::Min, DECIMAL);
        min.extend(noun_first(axis, Bound::Min, DECIMAL));
        let mut max = number_first(axis, Bound::Max, DECIMAL);
        max.extend(noun_first(axis, Bound::Max, DECIMAL));
        match bare {
            Some(Bound::Min) => min.push(bare_amount(axis, DECIMAL)),
            Some(Bound::Max) => max.push(bare_amount(axis, DECIMAL)),
            None => {}
        }
        Self {
            min_field,
            max_field,
            ranges: ranges(axis, DECIMAL),
            min,
            max,
        }
    }

    /// Ranges first; single bounds fill whatever the range left open.
    fn apply(&self, text: &str, constraints: &mut Constraints) {
        if let Some((low, high)) = self
            .ranges
            .iter()
            .find_map(|p| p.first_range(text, parse_positive_decimal))
        {
            constraints.set(self.min_field, Some(low));
            constraints.set(self.max_field, Some(high));
        }
        if constraints.get(self.min_field).is_none() {
            constraints.set(
                self.min_field,
                first_match(&self.min, text, parse_positive_decimal),
            );
        }
        if constraints.get(self.max_field).is_none() {
            constraints.set(
                self.max_field,
                first_match(&self.max, text, parse_positive_decimal),
            );
        }
    }
}

static AXES: Lazy<Vec<AxisRules>> = Lazy::new(|| {
    vec![
        AxisRules::new(
            CALORIES,
            ConstraintField::MinCalories,
            ConstraintField::MaxCalories,
            None,
        ),
        AxisRules::new(
            PROTEIN,
            ConstraintField::MinProtein,
            ConstraintField::MaxProtein,
            Some(Bound::Min),
        ),
        AxisRules::new(
            CARBS,
            ConstraintField::MinCarbs,
            ConstraintField::MaxCarbs,
            Some(Bound::Max),
        ),
        AxisRules::new(
            FATS,
            ConstraintField::MinFats,
            ConstraintField::MaxFats,
            Some(Bound::Max),
        ),
    ]
});

/// The authoritative extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, message: &str) -> Constraints {
        let mut constraints = Constraints::default();
        for axis in AXES.iter() {
            axis.apply(message, &mut constraints);
        }
        // The calorie ceiling doubles as the cap.
        constraints.calorie_cap = constraints.max_calories;
        if mentions_breakfast(message) {
            constraints.breakfast = Some(true);
        }
        constraints
    }

    pub fn detect(&self, message: &str) -> ExplicitRestaurant {
        match restaurant_candidate(message, RestaurantPatterns::Full) {
            Some(name) => ExplicitRestaurant::detected(name),
            None => ExplicitRestaurant::none(),
        }
    }
}

impl ConstraintSource for RuleBasedExtractor {
    fn extract_constraints(&self, message: &str) -> Result<Constraints> {
        Ok(self.extract(message))
    }

    fn detect_explicit_restaurant(&self, message: &str) -> Result<ExplicitRestaurant> {
        Ok(self.detect(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(msg: &str) -> Constraints {
        RuleBasedExtractor::new().extract(msg)
    }

    #[test]
    fn test_calorie_range_sets_cap() {
        let c = extract("between 400 and 600 calories");
        assert_eq!(c.min_calories, Some(400.0));
        assert_eq!(c.max_calories, Some(600.0));
        assert_eq!(c.calorie_cap, Some(600.0));

        let c = extract("dinner 500-750 kcal");
        assert_eq!(c.min_calories, Some(500.0));
        assert_eq!(c.calorie_cap, Some(750.0));
    }

    #[test]
    fn test_decimals_and_noun_first() {
        let c = extract("protein over 32.5 and fat under 12.5g");
        assert_eq!(c.min_protein, Some(32.5));
        assert_eq!(c.max_fats, Some(12.5));
        assert_eq!(c.max_protein, None);
    }

    #[test]
    fn test_macro_range() {
        let c = extract("30-45g protein bowl");
        assert_eq!(c.min_protein, Some(30.0));
        assert_eq!(c.max_protein, Some(45.0));
    }

    #[test]
    fn test_zero_bound_discarded() {
        let c = extract("under 0 calories");
        assert_eq!(c.calorie_cap, None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_mixed_request() {
        let c = extract("breakfast under 500 calories with at least 25g protein and under 40g carbs");
        assert_eq!(c.calorie_cap, Some(500.0));
        assert_eq!(c.min_protein, Some(25.0));
        assert_eq!(c.max_carbs, Some(40.0));
        assert_eq!(c.breakfast, Some(true));
    }

    #[test]
    fn test_not_negations_flip_bound() {
        let c = extract("lunch with not more than 500 calories");
        assert_eq!(c.calorie_cap, Some(500.0));
        assert_eq!(c.max_calories, Some(500.0));
        assert_eq!(c.min_calories, None);

        let c = extract("protein not less than 30 and not over 20g fat");
        assert_eq!(c.min_protein, Some(30.0));
        assert_eq!(c.max_fats, Some(20.0));
        assert_eq!(c.max_protein, None);
        assert_eq!(c.min_fats, None);
    }

    #[test]
    fn test_bare_protein_before_alternative() {
        assert_eq!(extract("40g protein or a salad").min_protein, Some(40.0));
        assert_eq!(extract("burrito with 40g protein or chicken bowl").min_protein, Some(40.0));
        assert_eq!(extract("40g protein or more").min_protein, Some(40.0));
    }

    #[test]
    fn test_thousands_separator() {
        let c = extract("under 1,000 calories");
        assert_eq!(c.calorie_cap, Some(1000.0));
        assert_eq!(c.min_calories, None);
    }

    #[test]
    fn test_detects_restaurants() {
        let extractor = RuleBasedExtractor::new();
        let found = extractor.detect("high protein lunch from Chipotle under 700 calories");
        assert!(found.has_restaurant);
        assert_eq!(found.restaurant_query.as_deref(), Some("Chipotle"));

        let found = extractor.detect("what's good on the Panera Bread menu");
        assert_eq!(found.restaurant_query.as_deref(), Some("Panera Bread"));

        let found = extractor.detect("lunch under 600 calories");
        assert!(!found.has_restaurant);
        assert!(found.restaurant_query.is_none());
    }

    #[test]
    fn test_rejects_quantifier_lead_ins() {
        let extractor = RuleBasedExtractor::new();
        assert!(!extractor.detect("at least 30g protein").has_restaurant);
        assert!(!extractor.detect("lunch at 12:30").has_restaurant);
        assert!(!extractor.detect("dinner at home").has_restaurant);
    }
}
