//! Fallback regex parser.
//!
//! Lighter than the authoritative pass: integer values only, number-first
//! phrasing only, "from"/"at" restaurant lead-ins only. It fills gaps the
//! authoritative extractor leaves and stands in when that extractor is
//! unavailable.

use once_cell::sync::Lazy;

use mealroute_core::types::{ConstraintField, Constraints};

use super::patterns::{
    bare_amount, first_match, number_first, Axis, Bound, FieldPattern, CALORIES, CARBS, FATS,
    INTEGER, PROTEIN,
};
use super::{parse_positive_int, restaurant_candidate, RestaurantPatterns};
use crate::keywords::mentions_breakfast;

/// Output of the fallback pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConstraints {
    /// Numeric bounds and the breakfast flag. `restaurant` is never set.
    pub constraints: Constraints,
    /// Best-effort restaurant phrase, for messages only.
    pub restaurant_phrase: Option<String>,
}

/// Ordered pattern lists per field.
struct FieldTable {
    field: ConstraintField,
    patterns: Vec<FieldPattern>,
}

fn macro_table(axis: Axis, min: ConstraintField, max: ConstraintField, bare: Bound) -> [FieldTable; 2] {
    let mut min_patterns = number_first(axis, Bound::Min, INTEGER);
    let mut max_patterns = number_first(axis, Bound::Max, INTEGER);
    match bare {
        Bound::Min => min_patterns.push(bare_amount(axis, INTEGER)),
        Bound::Max => max_patterns.push(bare_amount(axis, INTEGER)),
    }
    [
        FieldTable {
            field: min,
            patterns: min_patterns,
        },
        FieldTable {
            field: max,
            patterns: max_patterns,
        },
    ]
}

static FIELD_TABLES: Lazy<Vec<FieldTable>> = Lazy::new(|| {
    let mut tables = vec![
        FieldTable {
            field: ConstraintField::CalorieCap,
            patterns: number_first(CALORIES, Bound::Max, INTEGER),
        },
        FieldTable {
            field: ConstraintField::MinCalories,
            patterns: number_first(CALORIES, Bound::Min, INTEGER),
        },
    ];
    // A bare "35g protein" reads as a floor; bare carbs and fat read as a ceiling.
    tables.extend(macro_table(
        PROTEIN,
        ConstraintField::MinProtein,
        ConstraintField::MaxProtein,
        Bound::Min,
    ));
    tables.extend(macro_table(
        CARBS,
        ConstraintField::MinCarbs,
        ConstraintField::MaxCarbs,
        Bound::Max,
    ));
    tables.extend(macro_table(
        FATS,
        ConstraintField::MinFats,
        ConstraintField::MaxFats,
        Bound::Max,
    ));
    tables
});

/// The fallback regex parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser;

impl FallbackParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw message. First pattern wins per field.
    pub fn parse(&self, message: &str) -> ParsedConstraints {
        let mut constraints = Constraints::default();
        for table in FIELD_TABLES.iter() {
            constraints.set(
                table.field,
                first_match(&table.patterns, message, parse_positive_int),
            );
        }
        if mentions_breakfast(message) {
            constraints.breakfast = Some(true);
        }

        ParsedConstraints {
            constraints,
            restaurant_phrase: restaurant_candidate(message, RestaurantPatterns::LeadIns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(msg: &str) -> ParsedConstraints {
        FallbackParser::new().parse(msg)
    }

    #[test]
    fn test_calorie_cap_forms() {
        for (msg, expected) in [
            ("under 600 calories", 600.0),
            ("below 450 cal", 450.0),
            ("max 700 calories", 700.0),
            ("Lunch UNDER 550 Calories", 550.0),
            ("800 calories or less", 800.0),
            ("no more than 900 kcal", 900.0),
        ] {
            assert_eq!(parse(msg).constraints.calorie_cap, Some(expected), "{msg}");
        }
    }

    #[test]
    fn test_protein_bounds() {
        let parsed = parse("at least 35g protein");
        assert_eq!(parsed.constraints.min_protein, Some(35.0));
        assert_eq!(parsed.constraints.max_protein, None);
        assert_eq!(parsed.restaurant_phrase, None);

        let parsed = parse("40g protein");
        assert_eq!(parsed.constraints.min_protein, Some(40.0));

        let parsed = parse("under 20 grams of protein");
        assert_eq!(parsed.constraints.max_protein, Some(20.0));
        assert_eq!(parsed.constraints.min_protein, None);
    }

    #[test]
    fn test_carbs_and_fat() {
        let parsed = parse("30g carbs and less than 15g fat");
        assert_eq!(parsed.constraints.max_carbs, Some(30.0));
        assert_eq!(parsed.constraints.max_fats, Some(15.0));
        assert_eq!(parsed.constraints.min_carbs, None);
    }

    #[test]
    fn test_zero_discarded_and_decimals_truncated() {
        assert_eq!(parse("under 0 calories").constraints.calorie_cap, None);
        assert_eq!(parse("under 12.5g fat").constraints.max_fats, Some(12.0));
    }

    #[test]
    fn test_not_negations_flip_bound() {
        let parsed = parse("lunch with not more than 500 calories");
        assert_eq!(parsed.constraints.calorie_cap, Some(500.0));
        assert_eq!(parsed.constraints.min_calories, None);

        let parsed = parse("dinner not less than 400 calories");
        assert_eq!(parsed.constraints.min_calories, Some(400.0));
        assert_eq!(parsed.constraints.calorie_cap, None);
    }

    #[test]
    fn test_bare_protein_before_alternative() {
        assert_eq!(parse("40g protein or a salad").constraints.min_protein, Some(40.0));
        assert_eq!(
            parse("burrito with 40g protein or chicken bowl").constraints.min_protein,
            Some(40.0)
        );
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse("under 1,000 calories").constraints.calorie_cap, Some(1000.0));
    }

    #[test]
    fn test_breakfast_only_from_literal_word() {
        assert_eq!(parse("breakfast sandwich").constraints.breakfast, Some(true));
        assert_eq!(parse("lunch bowl").constraints.breakfast, None);
        assert_eq!(parse("dinner plate").constraints.breakfast, None);
    }

    #[test]
    fn test_restaurant_phrase() {
        let parsed = parse("under 700 calories from Chipotle");
        assert_eq!(parsed.constraints.calorie_cap, Some(700.0));
        assert_eq!(parsed.restaurant_phrase.as_deref(), Some("Chipotle"));
        assert!(parsed.constraints.restaurant.is_none());
    }
}
