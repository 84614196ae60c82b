use crate::catalog::Recipe;
use crate::resolver::{RecipeMatch, Resolution};
use serde::{Deserialize, Serialize};

/// GET /recommend/ parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendParams {
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// GET /api/recipe parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/suggested parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestedParams {
    #[serde(default)]
    pub limit: Option<String>,
}

/// Public view of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub name: String,
    pub ingredients: String,
    pub diet: String,
    pub course: String,
    pub state: String,
    pub recipe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl From<&Recipe> for RecordView {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            diet: recipe.diet.clone().unwrap_or_default(),
            course: recipe.course.clone().unwrap_or_default(),
            state: recipe.state.clone().unwrap_or_default(),
            recipe: recipe.recipe.clone(),
            score: None,
        }
    }
}

impl From<&RecipeMatch<'_>> for RecordView {
    fn from(m: &RecipeMatch<'_>) -> Self {
        Self {
            score: m.score,
            ..RecordView::from(m.recipe)
        }
    }
}

/// Query response: one of three shapes depending on the resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Message { message: String },
    Recipe { recipe: RecordView },
    Recommendations { recommendations: Vec<RecordView> },
}

impl From<Resolution<'_>> for QueryResponse {
    fn from(resolution: Resolution<'_>) -> Self {
        match resolution {
            Resolution::SingleRecipe(m) => QueryResponse::Recipe {
                recipe: RecordView::from(&m),
            },
            Resolution::RankedResults(matches) => QueryResponse::Recommendations {
                recommendations: matches.iter().map(RecordView::from).collect(),
            },
            other => QueryResponse::Message {
                message: other.message().unwrap_or_default().to_string(),
            },
        }
    }
}

/// Suggested listing
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedResponse {
    pub recipes: Vec<RecordView>,
    pub total: usize,
}

/// Catalog statistics
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub recipes: usize,
    pub vocabulary: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub catalog: String,
}
