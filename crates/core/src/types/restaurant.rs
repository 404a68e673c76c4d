use serde::{Deserialize, Serialize};

/// How a resolver matched a restaurant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Alias,
    Fuzzy,
}

/// A scored resolver candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCandidate {
    pub name: String,
    pub score: f64,
}

/// Outcome of resolving a restaurant phrase against the catalog.
///
/// Produced fresh per request by the resolver; only ever pattern-matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestaurantMatch {
    Match {
        canonical_name: String,
        id: Option<String>,
        variants: Vec<String>,
        match_type: MatchType,
    },
    NotFound {
        query_text: Option<String>,
    },
    /// Candidates are ordered highest score first.
    Ambiguous {
        candidates: Vec<RestaurantCandidate>,
    },
    NoRestaurantIntent,
    NoMenuItems {
        canonical_name: String,
    },
}

impl RestaurantMatch {
    /// Status label used in logs.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Match { .. } => "match",
            Self::NotFound { .. } => "not_found",
            Self::Ambiguous { .. } => "ambiguous",
            Self::NoRestaurantIntent => "no_restaurant_intent",
            Self::NoMenuItems { .. } => "no_menu_items",
        }
    }

    /// Restaurant identity when this is a `Match`.
    pub fn identity(&self) -> Option<RestaurantIdentity> {
        match self {
            Self::Match {
                canonical_name,
                id,
                variants,
                ..
            } => Some(RestaurantIdentity {
                name: canonical_name.clone(),
                id: id.clone(),
                variants: variants.clone(),
            }),
            _ => None,
        }
    }
}

/// Result of deterministic explicit-restaurant detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitRestaurant {
    pub has_restaurant: bool,
    pub restaurant_query: Option<String>,
}

impl ExplicitRestaurant {
    /// A detected restaurant phrase.
    pub fn detected(query: impl Into<String>) -> Self {
        Self {
            has_restaurant: true,
            restaurant_query: Some(query.into()),
        }
    }

    /// No restaurant in the message.
    pub fn none() -> Self {
        Self::default()
    }
}

/// A validated restaurant the search is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantIdentity {
    pub name: String,
    pub id: Option<String>,
    pub variants: Vec<String>,
}

impl RestaurantIdentity {
    /// Whether a meal's restaurant name refers to this restaurant.
    pub fn matches(&self, restaurant_name: &str) -> bool {
        let needle = restaurant_name.trim();
        self.name.eq_ignore_ascii_case(needle)
            || self.variants.iter().any(|v| v.eq_ignore_ascii_case(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_serializes_with_status_tag() {
        let m = RestaurantMatch::NotFound {
            query_text: Some("Chipotel".into()),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["query_text"], "Chipotel");
    }

    #[test]
    fn test_identity_only_for_match() {
        let m = RestaurantMatch::Match {
            canonical_name: "Chipotle Mexican Grill".into(),
            id: Some("r-1".into()),
            variants: vec!["Chipotle".into()],
            match_type: MatchType::Alias,
        };
        let identity = m.identity().unwrap();
        assert!(identity.matches("chipotle"));
        assert!(identity.matches("Chipotle Mexican Grill"));
        assert!(!identity.matches("Qdoba"));

        assert!(RestaurantMatch::NoRestaurantIntent.identity().is_none());
    }
}
