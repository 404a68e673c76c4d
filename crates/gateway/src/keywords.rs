//! Static keyword tables for intent detection.
//!
//! Plain data, kept together so each rule can be tested on its own. All
//! entries are lowercase; matching helpers lowercase the input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Phrases that mark a question about the app itself.
pub const META_QUESTION_PHRASES: &[&str] = &[
    "how does this app work",
    "how does this work",
    "how do i use this",
    "how do you work",
    "how does this app",
    "how does it work",
    "how do you",
    "this app",
    "what is this app",
    "what can you do",
    "what do you do",
    "who made this",
    "who built this",
    "pricing",
    "subscription",
    "premium plan",
    "cancel my account",
    "delete my account",
    "support",
    "customer service",
    "contact us",
    "privacy policy",
    "terms of service",
    "refund",
    "report a bug",
];

/// Fixed answer for meta/app questions.
pub const META_ANSWER: &str = "I help you find menu items that fit your goals. Tell me what \
you're in the mood for, add a calorie or macro target like \"under 600 calories\" or \"at least \
30g protein\", and optionally name a restaurant. For account, billing, or support questions, \
use the Help section in the app.";

/// Whole-message patterns for location-only requests.
pub const LOCATION_ONLY_PATTERNS: &[&str] = &[
    r"near\s+me",
    r"near\s?by",
    r"close\s+(?:by|to\s+me)",
    r"around\s+(?:me|here)",
    r"(?:closest|nearest)(?:\s+(?:one|place|spot)s?)?",
    r"within\s+\d+(?:\.\d+)?\s*(?:miles?|mi|km|kilometers?|minutes?|mins?)(?:\s+(?:of|from)\s+me)?",
];

/// Location phrases removed from search text.
pub const LOCATION_FILLER_PATTERNS: &[&str] = &[
    r"\bwithin\s+\d+(?:\.\d+)?\s*(?:miles?|mi|km|kilometers?|minutes?|mins?)(?:\s+(?:of|from)\s+(?:me|here))?\b",
    r"\b(?:near|close\s+to|around)\s+(?:me|here|my\s+(?:location|area|house|home|office|work))\b",
    r"\bin\s+my\s+area\b",
    r"\bnear\s?by\b",
    r"\bclose\s+by\b",
    r"\b(?:closest|nearest)\b",
    r"\blocal(?:ly)?\b",
];

/// Politeness and urgency filler removed from search text.
pub const SEARCH_FILLER_PATTERNS: &[&str] = &[r"\bplease\b", r"\bright\s+now\b", r"\basap\b"];

/// Verbs and phrases signalling a food request.
pub const FOOD_INTENT_VERBS: &[&str] = &[
    "find",
    "show me",
    "show",
    "recommend",
    "suggest",
    "give me",
    "get me",
    "i want",
    "i need",
    "looking for",
    "search",
    "craving",
    "hungry",
    "what should i eat",
    "what can i eat",
    "order",
];

/// Meal-time nouns.
pub const MEAL_TIME_NOUNS: &[&str] = &[
    "breakfast", "brunch", "lunch", "dinner", "supper", "snack", "dessert",
];

/// Dish-type nouns. Plural forms match too.
pub const DISH_NOUNS: &[&str] = &[
    "meal", "food", "burger", "salad", "bowl", "sandwich", "wrap", "pizza", "burrito", "taco",
    "chicken", "steak", "sushi", "pasta", "soup", "smoothie", "shake", "oatmeal", "omelet", "egg",
    "fry", "fries", "noodle", "rice", "sub", "pho", "curry", "poke", "entree", "plate", "nugget",
    "quesadilla", "bagel", "pancake", "waffle",
];

/// Macro and calorie keywords. Plural forms match too.
pub const MACRO_KEYWORDS: &[&str] = &[
    "calorie",
    "cal",
    "kcal",
    "protein",
    "carb",
    "carbohydrate",
    "fat",
    "macro",
];

/// Diet and allergen terms the service cannot filter on yet.
pub const DIET_KEYWORDS: &[&str] = &[
    "vegan",
    "vegetarian",
    "plant-based",
    "plant based",
    "keto",
    "ketogenic",
    "paleo",
    "gluten-free",
    "gluten free",
    "dairy-free",
    "dairy free",
    "lactose-free",
    "lactose free",
    "nut-free",
    "nut free",
    "halal",
    "kosher",
    "pescatarian",
    "whole30",
    "allergy",
    "allergic",
    "allergen",
    "celiac",
];

/// Reply for diet or allergen requests.
pub const DIET_UNSUPPORTED_ANSWER: &str = "Dietary and allergen filters (like vegan, keto, or \
gluten-free) aren't supported yet, so I can't promise menu items meet that requirement. You can \
still search by calories, protein, carbs, fat, or restaurant.";

/// Notice attached to meal results when the user asked for nearby places.
pub const LOCATION_NOTICE: &str =
    "Location-based filtering isn't available yet, so these results aren't limited to places near you.";

/// Tokens that can never be part of a restaurant name.
///
/// Quantifiers, prepositions, macro nouns, meal-time nouns, generic verbs,
/// and place/time words that follow "at" or "from" in ordinary speech.
pub const FORBIDDEN_RESTAURANT_TOKENS: &[&str] = &[
    // quantifiers
    "least", "most", "max", "maximum", "min", "minimum", "under", "over", "below", "above", "less",
    "more", "than", "around", "about", "approximately", "only", "no", "low", "high", "any", "some",
    "all", "lots",
    // prepositions and pronouns
    "at", "from", "in", "on", "with", "without", "for", "to", "of", "near", "by", "me", "my",
    // macro nouns and units
    "calorie", "calories", "cal", "cals", "kcal", "protein", "proteins", "carb", "carbs",
    "carbohydrates", "fat", "fats", "g", "gram", "grams", "macros",
    // meal times
    "breakfast", "brunch", "lunch", "dinner", "supper", "snack", "lunchtime", "dinnertime",
    // generic verbs
    "find", "show", "get", "give", "want", "eat", "recommend", "need", "looking", "make", "order",
    // places and times
    "home", "work", "office", "school", "gym", "house", "anywhere", "somewhere", "everywhere",
    "night", "tonight", "today", "tomorrow", "noon", "morning", "evening", "once",
];

/// Trailing words stripped from a restaurant candidate.
pub const RESTAURANT_TRAILING_WORDS: &[&str] = &[
    "restaurant", "restaurants", "place", "near", "nearby", "here", "please", "menu",
];

/// Leading articles stripped from a restaurant candidate.
pub const RESTAURANT_LEADING_ARTICLES: &[&str] = &["the", "a", "an"];

static LOCATION_ONLY_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    LOCATION_ONLY_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!(r"(?i)^\s*{}\s*[.!?]*\s*$", p)).unwrap())
        .collect()
});

/// Whether `text` contains `phrase` delimited by non-alphanumeric characters.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let lower = text.to_lowercase();
    lower.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = lower[..start].chars().next_back();
        let after = lower[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Like [`contains_phrase`] but also accepts an `s` or `es` plural.
pub fn mentions_noun(text: &str, noun: &str) -> bool {
    contains_phrase(text, noun)
        || contains_phrase(text, &format!("{}s", noun))
        || contains_phrase(text, &format!("{}es", noun))
}

/// First meta-question phrase present in `text`.
pub fn find_meta_phrase(text: &str) -> Option<&'static str> {
    META_QUESTION_PHRASES
        .iter()
        .copied()
        .find(|phrase| contains_phrase(text, phrase))
}

/// Whether the entire message is a location phrase.
pub fn is_location_only(text: &str) -> bool {
    LOCATION_ONLY_REGEXES.iter().any(|re| re.is_match(text))
}

/// First food-intent term present in `text`, if any.
pub fn find_food_term(text: &str) -> Option<&'static str> {
    FOOD_INTENT_VERBS
        .iter()
        .copied()
        .find(|verb| contains_phrase(text, verb))
        .or_else(|| {
            MEAL_TIME_NOUNS
                .iter()
                .chain(DISH_NOUNS)
                .chain(MACRO_KEYWORDS)
                .copied()
                .find(|noun| mentions_noun(text, noun))
        })
}

/// Whether `text` mentions a calorie or macro keyword.
pub fn mentions_macro(text: &str) -> bool {
    MACRO_KEYWORDS.iter().any(|k| mentions_noun(text, k))
}

/// First diet or allergen keyword in `text`.
pub fn find_diet_keyword(text: &str) -> Option<&'static str> {
    DIET_KEYWORDS
        .iter()
        .copied()
        .find(|k| contains_phrase(text, k))
}

/// Whether `token` (any case) is a forbidden restaurant token.
pub fn is_forbidden_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    FORBIDDEN_RESTAURANT_TOKENS.contains(&lower.as_str())
}

/// Whether the literal word "breakfast" appears.
pub fn mentions_breakfast(text: &str) -> bool {
    contains_phrase(text, "breakfast")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("Show me pricing!", "pricing"));
        assert!(!contains_phrase("supportive staff", "support"));
        assert!(!contains_phrase("refined", "find"));
        assert!(contains_phrase("FIND me lunch", "find"));
    }

    #[test]
    fn test_mentions_noun_accepts_plurals() {
        assert!(mentions_noun("two burgers", "burger"));
        assert!(mentions_noun("low carbs", "carb"));
        assert!(mentions_noun("500 calories", "calorie"));
        assert!(!mentions_noun("burgundy", "burger"));
    }

    #[test]
    fn test_location_only_is_whole_message() {
        for msg in ["near me", "Nearby", "  near by ", "within 5 miles", "Within 10 km of me", "closest"] {
            assert!(is_location_only(msg), "{msg} should be location-only");
        }
        assert!(!is_location_only("burgers near me"));
        assert!(!is_location_only("near me under 500 calories"));
    }

    #[test]
    fn test_meta_phrases() {
        assert_eq!(find_meta_phrase("How does this app work?"), Some("how does this app work"));
        assert_eq!(find_meta_phrase("what's the pricing"), Some("pricing"));
        assert_eq!(find_meta_phrase("find me lunch"), None);
        assert_eq!(
            find_meta_phrase("how does this app find me lunch"),
            Some("how does this app")
        );
        assert_eq!(find_meta_phrase("is this app free"), Some("this app"));
    }

    #[test]
    fn test_food_terms() {
        assert_eq!(find_food_term("Find me lunch"), Some("find"));
        assert_eq!(find_food_term("vegan bowl"), Some("bowl"));
        assert_eq!(find_food_term("40g protein"), Some("protein"));
        assert_eq!(find_food_term("hello there"), None);
        assert_eq!(find_food_term("why does fiber matter"), None);
    }

    #[test]
    fn test_diet_keywords() {
        assert_eq!(find_diet_keyword("vegan bowl"), Some("vegan"));
        assert_eq!(find_diet_keyword("Gluten-Free pizza"), Some("gluten-free"));
        assert_eq!(find_diet_keyword("chicken bowl"), None);
    }

    #[test]
    fn test_forbidden_tokens_are_case_insensitive() {
        assert!(is_forbidden_token("Least"));
        assert!(is_forbidden_token("protein"));
        assert!(!is_forbidden_token("Chipotle"));
    }

    #[test]
    fn test_every_location_only_pattern_compiles() {
        assert_eq!(LOCATION_ONLY_REGEXES.len(), LOCATION_ONLY_PATTERNS.len());
    }
}
