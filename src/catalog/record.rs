use serde::{Deserialize, Serialize};

/// Instructions shown when a catalog row has no recipe text
pub const RECIPE_PLACEHOLDER: &str = "Recipe not available.";

/// The catalog's marker for an unknown value
const UNKNOWN_MARKER: &str = "-1";

/// One catalog row as read from the source file, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecipe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub recipe: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub prep_time: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub cook_time: Option<i64>,
    #[serde(default)]
    pub flavor_profile: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl RawRecipe {
    /// Convenience constructor for the two required fields
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ingredients: Some(ingredients.into()),
            ..Default::default()
        }
    }

    pub fn has_name(&self) -> bool {
        present(self.name.as_deref()).is_some()
    }

    pub fn has_ingredients(&self) -> bool {
        present(self.ingredients.as_deref()).is_some()
    }
}

/// A validated catalog entry. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Case-folded ingredient list
    pub ingredients: String,
    pub diet: Option<String>,
    pub course: Option<String>,
    pub state: Option<String>,
    /// Instructions, or [`RECIPE_PLACEHOLDER`]
    pub recipe: String,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub flavor_profile: Option<String>,
    pub region: Option<String>,
}

impl Recipe {
    /// Validate a raw row. Returns `None` when `name` or `ingredients` is missing.
    pub fn from_raw(raw: RawRecipe) -> Option<Self> {
        let name = present(raw.name.as_deref())?.to_string();
        let ingredients = present(raw.ingredients.as_deref())?.to_lowercase();

        let recipe = present(raw.recipe.as_deref())
            .unwrap_or(RECIPE_PLACEHOLDER)
            .to_string();

        Some(Self {
            name,
            ingredients,
            diet: categorical(raw.diet),
            course: categorical(raw.course),
            state: categorical(raw.state),
            recipe,
            prep_time_minutes: minutes(raw.prep_time),
            cook_time_minutes: minutes(raw.cook_time),
            flavor_profile: categorical(raw.flavor_profile),
            region: categorical(raw.region),
        })
    }

    pub fn has_instructions(&self) -> bool {
        self.recipe != RECIPE_PLACEHOLDER
    }

    /// Combined preparation and cooking time, when both are known
    pub fn total_time_minutes(&self) -> Option<u32> {
        Some(self.prep_time_minutes? + self.cook_time_minutes?)
    }
}

/// Trimmed, non-empty value
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn categorical(value: Option<String>) -> Option<String> {
    present(value.as_deref())
        .filter(|v| *v != UNKNOWN_MARKER)
        .map(str::to_string)
}

fn minutes(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}
