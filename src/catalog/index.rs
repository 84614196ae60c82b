// In-memory catalog index: validated recipes, their vectors and a name map
use crate::catalog::record::{RawRecipe, Recipe};
use crate::catalog::vectorizer::{SparseVector, TfIdfVectorizer};
use crate::error::{Error, Result};
use crate::utils::normalize_query;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Read-only recipe catalog with a TF-IDF view of every ingredient list.
///
/// Positions (`recipe(i)`, `vector(i)`, `ScoredRecipe::index`) count indexed
/// recipes only. Rows skipped during `build` take no position, so a position
/// can differ from the row number in the source file.
///
/// Built once from the full catalog. Nothing is mutated afterwards, so a
/// shared reference can be queried from any number of threads.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    recipes: Vec<Recipe>,
    vectors: Vec<SparseVector>,
    vectorizer: TfIdfVectorizer,
    /// Normalized name -> first row carrying it
    names: HashMap<String, usize>,
}

/// A catalog entry paired with its cosine similarity to a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRecipe<'a> {
    /// Position in the index, not the source row number
    pub index: usize,
    pub recipe: &'a Recipe,
    pub score: f32,
}

impl CatalogIndex {
    /// Validate the raw rows and build the vector space
    pub fn build(raw: Vec<RawRecipe>) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::Catalog("Catalog contains no records".to_string()));
        }
        if !raw.iter().any(RawRecipe::has_name) {
            return Err(Error::Catalog(
                "Required field 'name' is missing from every record".to_string(),
            ));
        }
        if !raw.iter().any(RawRecipe::has_ingredients) {
            return Err(Error::Catalog(
                "Required field 'ingredients' is missing from every record".to_string(),
            ));
        }

        let total = raw.len();
        let mut recipes = Vec::with_capacity(total);
        for (row, record) in raw.into_iter().enumerate() {
            match Recipe::from_raw(record) {
                Some(recipe) => recipes.push(recipe),
                None => warn!("Skipping source row {}: missing name or ingredients", row + 1),
            }
        }

        if recipes.is_empty() {
            return Err(Error::Catalog(
                "No record has both a name and ingredients".to_string(),
            ));
        }

        let documents: Vec<&str> = recipes.iter().map(|r| r.ingredients.as_str()).collect();
        let vectorizer = TfIdfVectorizer::fit(&documents)?;
        let vectors: Vec<SparseVector> = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();

        let mut names = HashMap::with_capacity(recipes.len());
        for (i, recipe) in recipes.iter().enumerate() {
            names.entry(normalize_query(&recipe.name)).or_insert(i);
        }

        info!(
            "Catalog index built: {} recipes ({} skipped), vocabulary of {} tokens",
            recipes.len(),
            total - recipes.len(),
            vectorizer.dimensions()
        );

        Ok(Self {
            recipes,
            vectors,
            vectorizer,
            names,
        })
    }

    /// Map text into the catalog's vector space
    pub fn vectorize(&self, text: &str) -> SparseVector {
        self.vectorizer.transform(text)
    }

    /// Exact case-insensitive name lookup. The first row wins when names repeat.
    pub fn find_by_name(&self, name: &str) -> Option<(usize, &Recipe)> {
        let index = *self.names.get(&normalize_query(name))?;
        Some((index, &self.recipes[index]))
    }

    /// The `k` entries most similar to `query`, best first.
    ///
    /// Equal scores keep catalog order.
    pub fn top_matches(&self, query: &SparseVector, k: usize) -> Vec<ScoredRecipe<'_>> {
        let mut scored: Vec<ScoredRecipe<'_>> = self
            .recipes
            .iter()
            .zip(&self.vectors)
            .enumerate()
            .map(|(index, (recipe, vector))| ScoredRecipe {
                index,
                recipe,
                score: query.cosine(vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        scored.truncate(k);

        debug!(
            "Top {} matches, best score {:?}",
            scored.len(),
            scored.first().map(|s| s.score)
        );

        scored
    }

    /// First `n` entries in catalog order
    pub fn suggested(&self, n: usize) -> &[Recipe] {
        &self.recipes[..n.min(self.recipes.len())]
    }

    pub fn recipe(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Stored vector for a catalog row
    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.dimensions()
    }
}
