use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Numeric constraint fields, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintField {
    CalorieCap,
    MinCalories,
    MaxCalories,
    MinProtein,
    MaxProtein,
    MinCarbs,
    MaxCarbs,
    MinFats,
    MaxFats,
}

impl ConstraintField {
    pub const ALL: [ConstraintField; 9] = [
        Self::CalorieCap,
        Self::MinCalories,
        Self::MaxCalories,
        Self::MinProtein,
        Self::MaxProtein,
        Self::MinCarbs,
        Self::MaxCarbs,
        Self::MinFats,
        Self::MaxFats,
    ];

    /// Wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::CalorieCap => "calorieCap",
            Self::MinCalories => "minCalories",
            Self::MaxCalories => "maxCalories",
            Self::MinProtein => "minProtein",
            Self::MaxProtein => "maxProtein",
            Self::MinCarbs => "minCarbs",
            Self::MaxCarbs => "maxCarbs",
            Self::MinFats => "minFats",
            Self::MaxFats => "maxFats",
        }
    }
}

/// Normalized search constraints.
///
/// Every present numeric field is finite and strictly positive. Use
/// [`Constraints::set`] to write numeric fields so the invariant holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fats: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fats: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<bool>,
}

impl Constraints {
    /// Read a numeric field.
    pub fn get(&self, field: ConstraintField) -> Option<f64> {
        match field {
            ConstraintField::CalorieCap => self.calorie_cap,
            ConstraintField::MinCalories => self.min_calories,
            ConstraintField::MaxCalories => self.max_calories,
            ConstraintField::MinProtein => self.min_protein,
            ConstraintField::MaxProtein => self.max_protein,
            ConstraintField::MinCarbs => self.min_carbs,
            ConstraintField::MaxCarbs => self.max_carbs,
            ConstraintField::MinFats => self.min_fats,
            ConstraintField::MaxFats => self.max_fats,
        }
    }

    /// Write a numeric field. Non-finite and non-positive values clear it.
    pub fn set(&mut self, field: ConstraintField, value: Option<f64>) {
        let value = value.filter(|v| is_valid_bound(*v));
        let slot = match field {
            ConstraintField::CalorieCap => &mut self.calorie_cap,
            ConstraintField::MinCalories => &mut self.min_calories,
            ConstraintField::MaxCalories => &mut self.max_calories,
            ConstraintField::MinProtein => &mut self.min_protein,
            ConstraintField::MaxProtein => &mut self.max_protein,
            ConstraintField::MinCarbs => &mut self.min_carbs,
            ConstraintField::MaxCarbs => &mut self.max_carbs,
            ConstraintField::MinFats => &mut self.min_fats,
            ConstraintField::MaxFats => &mut self.max_fats,
        };
        *slot = value;
    }

    /// Builder-style [`Constraints::set`].
    pub fn with(mut self, field: ConstraintField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Whether any calorie or macro bound is present.
    pub fn has_macro_constraint(&self) -> bool {
        ConstraintField::ALL
            .iter()
            .any(|field| self.get(*field).is_some())
    }

    /// Whether no field at all is present.
    pub fn is_empty(&self) -> bool {
        !self.has_macro_constraint() && self.restaurant.is_none() && self.breakfast.is_none()
    }

    /// Effective upper calorie bound (the tighter of cap and max).
    pub fn effective_max_calories(&self) -> Option<f64> {
        match (self.calorie_cap, self.max_calories) {
            (Some(cap), Some(max)) => Some(cap.min(max)),
            (cap, max) => cap.or(max),
        }
    }
}

/// Whether a numeric bound is acceptable: finite and strictly positive.
pub fn is_valid_bound(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// A number that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    /// Coerce to a valid bound, or `None` when the value is unusable.
    pub fn normalize(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        is_valid_bound(value).then_some(value)
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NumericValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Constraints as proposed by the model classifier, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_cap: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_calories: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_protein: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_protein: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_carbs: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_carbs: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_fats: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fats: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<bool>,
}

impl RawConstraints {
    /// Read a raw numeric field.
    pub fn get(&self, field: ConstraintField) -> Option<&NumericValue> {
        match field {
            ConstraintField::CalorieCap => self.calorie_cap.as_ref(),
            ConstraintField::MinCalories => self.min_calories.as_ref(),
            ConstraintField::MaxCalories => self.max_calories.as_ref(),
            ConstraintField::MinProtein => self.min_protein.as_ref(),
            ConstraintField::MaxProtein => self.max_protein.as_ref(),
            ConstraintField::MinCarbs => self.min_carbs.as_ref(),
            ConstraintField::MaxCarbs => self.max_carbs.as_ref(),
            ConstraintField::MinFats => self.min_fats.as_ref(),
            ConstraintField::MaxFats => self.max_fats.as_ref(),
        }
    }

    /// Normalize every numeric field, dropping unusable values.
    ///
    /// The restaurant is carried over untouched; whether it is trusted is
    /// decided by the merger, not here.
    pub fn normalize(&self) -> Constraints {
        let mut constraints = Constraints {
            restaurant: self.restaurant.clone(),
            breakfast: self.breakfast,
            ..Constraints::default()
        };
        for field in ConstraintField::ALL {
            constraints.set(field, self.get(field).and_then(NumericValue::normalize));
        }
        constraints
    }
}
