//! Regex builders shared by both extraction passes.

use regex::{Captures, Regex};

/// Integer capture, thousands separators allowed. A fractional tail is
/// consumed but left out of the group.
pub(crate) const INTEGER: &str = r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";
/// Integer or decimal capture, thousands separators allowed.
pub(crate) const DECIMAL: &str = r"((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)";

const MIN_COMPARATORS: &str = r"at\s+least|(?:no|not|never)\s+(?:less|fewer)\s+than|(?:not|never)\s+(?:under|below)|over|above|more\s+than|greater\s+than|min(?:imum)?(?:\s+of)?";
const MAX_COMPARATORS: &str = r"under|below|less\s+than|fewer\s+than|max(?:imum)?(?:\s+of)?|at\s+most|(?:no|not|never)\s+more\s+than|(?:not|never)\s+(?:over|above)|up\s+to";

/// A nutrient axis: the noun naming it and the unit that may follow a number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Axis {
    pub noun: &'static str,
    pub unit: &'static str,
}

pub(crate) const CALORIES: Axis = Axis {
    noun: r"(?:k?cals?|calories?)",
    unit: "",
};
pub(crate) const PROTEIN: Axis = Axis {
    noun: r"(?:proteins?)",
    unit: r"(?:g|grams?|gr)?",
};
pub(crate) const CARBS: Axis = Axis {
    noun: r"(?:carbs?|carbohydrates?)",
    unit: r"(?:g|grams?|gr)?",
};
pub(crate) const FATS: Axis = Axis {
    noun: r"(?:fats?)",
    unit: r"(?:g|grams?|gr)?",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Min,
    Max,
}

/// A compiled pattern plus which groups carry the value and which groups,
/// when present, disqualify a match.
#[derive(Debug)]
pub(crate) struct FieldPattern {
    regex: Regex,
    value_groups: Vec<usize>,
    guard_groups: Vec<usize>,
}

impl FieldPattern {
    fn new(pattern: String, value_groups: Vec<usize>, guard_groups: Vec<usize>) -> Self {
        Self {
            regex: Regex::new(&pattern).unwrap(),
            value_groups,
            guard_groups,
        }
    }

    fn first_unguarded<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex
            .captures_iter(text)
            .find(|caps| !self.guard_groups.iter().any(|g| caps.get(*g).is_some()))
    }

    /// Value of the first unguarded match.
    pub fn first_value(&self, text: &str, parse: fn(&str) -> Option<f64>) -> Option<f64> {
        let caps = self.first_unguarded(text)?;
        let group = *self.value_groups.first()?;
        caps.get(group).and_then(|m| parse(m.as_str()))
    }

    /// Pair of values of the first unguarded match, as (low, high).
    pub fn first_range(&self, text: &str, parse: fn(&str) -> Option<f64>) -> Option<(f64, f64)> {
        let caps = self.first_unguarded(text)?;
        let mut values = self
            .value_groups
            .iter()
            .map(|g| caps.get(*g).and_then(|m| parse(m.as_str())));
        let a = values.next().flatten()?;
        let b = values.next().flatten()?;
        Some((a.min(b), a.max(b)))
    }
}

fn comparators(bound: Bound) -> &'static str {
    match bound {
        Bound::Min => MIN_COMPARATORS,
        Bound::Max => MAX_COMPARATORS,
    }
}

/// Patterns where the number precedes the noun ("under 600 calories",
/// "30g protein or more", "30g+ protein").
pub(crate) fn number_first(axis: Axis, bound: Bound, num: &str) -> Vec<FieldPattern> {
    let Axis { noun, unit } = axis;
    let cmp = comparators(bound);
    // A negated comparator ("not more than") belongs to the opposite bound.
    let mut patterns = vec![FieldPattern::new(
        format!(r"(?i)(\b(?:no|not|never)\s+)?\b(?:{cmp})\s*{num}\s*{unit}\s*(?:of\s+)?{noun}\b"),
        vec![2],
        vec![1],
    )];
    match bound {
        Bound::Min => {
            patterns.push(FieldPattern::new(
                format!(r"(?i)\b{num}\s*{unit}\s*\+\s*{unit}\s*(?:of\s+)?{noun}\b"),
                vec![1],
                vec![],
            ));
            patterns.push(FieldPattern::new(
                format!(r"(?i)\b{num}\s*{unit}\s*(?:of\s+)?{noun}\s+(?:or\s+(?:more|higher|above)|minimum|min|plus|at\s+least)\b"),
                vec![1],
                vec![],
            ));
        }
        Bound::Max => {
            patterns.push(FieldPattern::new(
                format!(r"(?i)\b{num}\s*{unit}\s*(?:of\s+)?{noun}\s+(?:or\s+(?:less|fewer|lower|under|below)|max(?:imum)?|at\s+most)\b"),
                vec![1],
                vec![],
            ));
        }
    }
    patterns
}

/// Patterns where the noun precedes the comparator ("protein over 30").
pub(crate) fn noun_first(axis: Axis, bound: Bound, num: &str) -> Vec<FieldPattern> {
    let Axis { noun, .. } = axis;
    let cmp = comparators(bound);
    vec![FieldPattern::new(
        format!(r"(?i)\b{noun}\s+(?:of\s+|is\s+|count\s+)?(?:{cmp})\s*{num}"),
        vec![1],
        vec![],
    )]
}

/// A bare amount with a gram unit and no comparator ("35g protein").
pub(crate) fn bare_amount(axis: Axis, num: &str) -> FieldPattern {
    let Axis { noun, .. } = axis;
    FieldPattern::new(
        format!(
            r"(?i)(?:\b((?:{MIN_COMPARATORS}|{MAX_COMPARATORS}))\s*)?\b{num}\s*(?:g|grams?|gr)\s*(\+)?\s*(?:of\s+)?{noun}\b(\s+(?:or\s+(?:more|less|fewer|higher|lower|above|below|under|over)\b|max(?:imum)?|min(?:imum)?|plus|at\s+(?:least|most)))?"
        ),
        vec![2],
        vec![1, 3, 4],
    )
}

/// Range patterns ("between 400 and 600 calories", "30-40g protein").
pub(crate) fn ranges(axis: Axis, num: &str) -> Vec<FieldPattern> {
    let Axis { noun, unit } = axis;
    vec![
        FieldPattern::new(
            format!(r"(?i)\bbetween\s+{num}\s*{unit}\s*(?:and|to|-|–)\s*{num}\s*{unit}\s*(?:of\s+)?{noun}\b"),
            vec![1, 2],
            vec![],
        ),
        FieldPattern::new(
            format!(r"(?i)\b{num}\s*{unit}\s*(?:-|–|to)\s*{num}\s*{unit}\s*(?:of\s+)?{noun}\b"),
            vec![1, 2],
            vec![],
        ),
    ]
}

/// First value produced by an ordered pattern list.
pub(crate) fn first_match(
    patterns: &[FieldPattern],
    text: &str,
    parse: fn(&str) -> Option<f64>,
) -> Option<f64> {
    patterns.iter().find_map(|p| p.first_value(text, parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{parse_positive_decimal, parse_positive_int};

    #[test]
    fn test_bare_amount_ignores_comparator_forms() {
        let bare = bare_amount(PROTEIN, INTEGER);
        assert_eq!(bare.first_value("35g protein", parse_positive_int), Some(35.0));
        assert_eq!(bare.first_value("under 35g protein", parse_positive_int), None);
        assert_eq!(bare.first_value("35g protein or more", parse_positive_int), None);
        assert_eq!(bare.first_value("35g+ protein", parse_positive_int), None);
    }

    #[test]
    fn test_bare_amount_followed_by_alternative_dish() {
        let bare = bare_amount(PROTEIN, INTEGER);
        assert_eq!(bare.first_value("40g protein or a salad", parse_positive_int), Some(40.0));
        assert_eq!(
            bare.first_value("burrito with 40g protein or chicken bowl", parse_positive_int),
            Some(40.0)
        );
        assert_eq!(bare.first_value("40g protein or less", parse_positive_int), None);
    }

    #[test]
    fn test_thousands_separator() {
        let max = number_first(CALORIES, Bound::Max, INTEGER);
        assert_eq!(first_match(&max, "under 1,000 calories", parse_positive_int), Some(1000.0));
        let max = number_first(CALORIES, Bound::Max, DECIMAL);
        assert_eq!(
            first_match(&max, "under 1,200.5 calories", parse_positive_decimal),
            Some(1200.5)
        );
    }

    #[test]
    fn test_range_orders_values() {
        let patterns = ranges(CALORIES, INTEGER);
        assert_eq!(
            patterns[0].first_range("between 600 and 400 calories", parse_positive_int),
            Some((400.0, 600.0))
        );
        assert_eq!(
            patterns[1].first_range("400-600 cal", parse_positive_int),
            Some((400.0, 600.0))
        );
    }

    #[test]
    fn test_negated_comparator_switches_bound() {
        let max = number_first(CALORIES, Bound::Max, INTEGER);
        let min = number_first(CALORIES, Bound::Min, INTEGER);
        assert_eq!(first_match(&max, "no more than 900 kcal", parse_positive_int), Some(900.0));
        assert_eq!(first_match(&min, "no more than 900 kcal", parse_positive_int), None);
        assert_eq!(first_match(&min, "no less than 300 calories", parse_positive_int), Some(300.0));
        assert_eq!(first_match(&max, "no less than 300 calories", parse_positive_int), None);
    }

    #[test]
    fn test_not_and_never_negations_switch_bound() {
        let max = number_first(CALORIES, Bound::Max, INTEGER);
        let min = number_first(CALORIES, Bound::Min, INTEGER);
        for msg in ["not more than 500 calories", "never over 500 cal", "not above 500 kcal"] {
            assert_eq!(first_match(&max, msg, parse_positive_int), Some(500.0), "{msg}");
            assert_eq!(first_match(&min, msg, parse_positive_int), None, "{msg}");
        }
        for msg in ["not less than 300 calories", "not under 300 cal", "never below 300 kcal"] {
            assert_eq!(first_match(&min, msg, parse_positive_int), Some(300.0), "{msg}");
            assert_eq!(first_match(&max, msg, parse_positive_int), None, "{msg}");
        }
    }

    #[test]
    fn test_noun_first() {
        let patterns = noun_first(PROTEIN, Bound::Min, INTEGER);
        assert_eq!(
            first_match(&patterns, "protein over 40 please", parse_positive_int),
            Some(40.0)
        );
    }
}
