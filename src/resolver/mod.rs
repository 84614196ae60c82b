// Query classification and resolution
// Checks run in order: chat table, minimum length, dish names, ingredient
// similarity. The first step that produces an answer wins.

use crate::catalog::{CatalogIndex, Recipe, ScoredRecipe};
use crate::config::chat::ChatTable;
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::utils::{char_len, normalize_query};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

pub const TOO_SHORT_MESSAGE: &str =
    "Please provide more details, like ingredients or a dish name.";
pub const NO_MATCH_MESSAGE: &str =
    "Sorry, I couldn't find a good match. Try listing a few ingredients.";

/// How many results the caller wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// One answer, subject to the minimum similarity
    SingleBest,
    /// Up to `k` answers ranked by similarity, no threshold
    RankedList(usize),
}

/// A catalog entry chosen for a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeMatch<'a> {
    /// Position in the indexed catalog, after incomplete rows were skipped
    pub index: usize,
    pub recipe: &'a Recipe,
    /// Cosine similarity; `None` for exact name hits
    pub score: Option<f32>,
}

impl<'a> From<ScoredRecipe<'a>> for RecipeMatch<'a> {
    fn from(scored: ScoredRecipe<'a>) -> Self {
        Self {
            index: scored.index,
            recipe: scored.recipe,
            score: Some(scored.score),
        }
    }
}

/// Outcome of resolving one query
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    ConversationalReply(String),
    SingleRecipe(RecipeMatch<'a>),
    RankedResults(Vec<RecipeMatch<'a>>),
    TooShort,
    NoMatch,
}

impl Resolution<'_> {
    /// Guidance text for outcomes that carry no recipe
    pub fn message(&self) -> Option<&str> {
        match self {
            Resolution::ConversationalReply(reply) => Some(reply.as_str()),
            Resolution::TooShort => Some(TOO_SHORT_MESSAGE),
            Resolution::NoMatch => Some(NO_MATCH_MESSAGE),
            Resolution::SingleRecipe(_) | Resolution::RankedResults(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::ConversationalReply(_) => "conversational",
            Resolution::SingleRecipe(_) => "single",
            Resolution::RankedResults(_) => "ranked",
            Resolution::TooShort => "too_short",
            Resolution::NoMatch => "no_match",
        }
    }
}

/// Resolves free text against a catalog installed once at startup
pub struct QueryResolver {
    catalog: OnceLock<Arc<CatalogIndex>>,
    chat: ChatTable,
    config: SearchConfig,
}

impl QueryResolver {
    /// Resolver without a catalog. Queries fail with `NotInitialized` until
    /// [`install`](Self::install) is called.
    pub fn new(chat: ChatTable, config: SearchConfig) -> Self {
        Self {
            catalog: OnceLock::new(),
            chat,
            config,
        }
    }

    pub fn with_catalog(catalog: Arc<CatalogIndex>, chat: ChatTable, config: SearchConfig) -> Self {
        Self {
            catalog: OnceLock::from(catalog),
            chat,
            config,
        }
    }

    /// Install the catalog. Only the first call succeeds.
    pub fn install(&self, catalog: Arc<CatalogIndex>) -> Result<()> {
        let recipes = catalog.len();
        self.catalog
            .set(catalog)
            .map_err(|_| Error::Internal("Catalog index is already installed".to_string()))?;
        info!("Query resolver ready with {} recipes", recipes);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.catalog.get().is_some()
    }

    pub fn catalog(&self) -> Result<&CatalogIndex> {
        self.catalog
            .get()
            .map(|catalog| catalog.as_ref())
            .ok_or(Error::NotInitialized)
    }

    pub fn chat(&self) -> &ChatTable {
        &self.chat
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn resolve(&self, query: &str, mode: ResolveMode) -> Result<Resolution<'_>> {
        let catalog = self.catalog()?;
        let normalized = normalize_query(query);

        if let Some(reply) = self.chat.reply(&normalized) {
            debug!("Conversational query: {:?}", normalized);
            return Ok(Resolution::ConversationalReply(reply.to_string()));
        }

        if char_len(&normalized) <= self.config.min_query_len {
            debug!("Query too short: {:?}", normalized);
            return Ok(Resolution::TooShort);
        }

        if let Some((index, recipe)) = catalog.find_by_name(&normalized) {
            debug!("Exact name match for {:?} at row {}", normalized, index);
            return Ok(Resolution::SingleRecipe(RecipeMatch {
                index,
                recipe,
                score: None,
            }));
        }

        let k = match mode {
            ResolveMode::SingleBest => 1,
            ResolveMode::RankedList(k) => k.max(1),
        };
        let query_vector = catalog.vectorize(&normalized);
        let matches = catalog.top_matches(&query_vector, k);

        let resolution = match mode {
            ResolveMode::SingleBest => match matches.into_iter().next() {
                Some(best) if best.score >= self.config.min_score => {
                    Resolution::SingleRecipe(best.into())
                }
                Some(best) => {
                    debug!(
                        "Best score {:.3} below threshold {:.3}",
                        best.score, self.config.min_score
                    );
                    Resolution::NoMatch
                }
                None => Resolution::NoMatch,
            },
            ResolveMode::RankedList(_) => {
                if matches.is_empty() {
                    Resolution::NoMatch
                } else {
                    Resolution::RankedResults(matches.into_iter().map(Into::into).collect())
                }
            }
        };

        debug!("Resolved {:?} as {}", normalized, resolution.kind());
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawRecipe;

    fn resolver() -> QueryResolver {
        let index = CatalogIndex::build(vec![
            RawRecipe::new("Poha", "flattened rice, onion, mustard seeds"),
            RawRecipe::new("Upma", "semolina, onion, mustard seeds"),
            RawRecipe::new("Kheer", "milk, rice, sugar, cardamom"),
        ])
        .unwrap();
        QueryResolver::with_catalog(Arc::new(index), ChatTable::default(), SearchConfig::default())
    }

    #[test]
    fn test_not_initialized() {
        let resolver = QueryResolver::new(ChatTable::default(), SearchConfig::default());
        assert!(!resolver.is_ready());
        let err = resolver.resolve("onion", ResolveMode::SingleBest).unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[test]
    fn test_install_once() {
        let resolver = QueryResolver::new(ChatTable::default(), SearchConfig::default());
        let index = Arc::new(CatalogIndex::build(vec![RawRecipe::new("Poha", "rice")]).unwrap());

        resolver.install(index.clone()).unwrap();
        assert!(resolver.is_ready());
        assert!(matches!(resolver.install(index), Err(Error::Internal(_))));
    }

    #[test]
    fn test_chat_short_circuit() {
        let resolver = resolver();
        let resolution = resolver.resolve("  Hello ", ResolveMode::RankedList(5)).unwrap();
        assert_eq!(
            resolution,
            Resolution::ConversationalReply("Hey there! Looking for a delicious recipe?".to_string())
        );
        // Short chat phrases are not rejected as too short
        let resolution = resolver.resolve("hi", ResolveMode::SingleBest).unwrap();
        assert!(matches!(resolution, Resolution::ConversationalReply(_)));
    }

    #[test]
    fn test_too_short() {
        let resolver = resolver();
        for query in ["ok", "yes", "  dal ", ""] {
            let resolution = resolver.resolve(query, ResolveMode::SingleBest).unwrap();
            assert_eq!(resolution, Resolution::TooShort, "query {query:?}");
            assert_eq!(resolution.message(), Some(TOO_SHORT_MESSAGE));
        }
    }

    #[test]
    fn test_exact_name_in_both_modes() {
        let resolver = resolver();
        for mode in [ResolveMode::SingleBest, ResolveMode::RankedList(5)] {
            match resolver.resolve("UPMA", mode).unwrap() {
                Resolution::SingleRecipe(m) => {
                    assert_eq!(m.recipe.name, "Upma");
                    assert_eq!(m.score, None);
                }
                other => panic!("expected single recipe, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_single_best_threshold() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("chocolate truffle", ResolveMode::SingleBest).unwrap(),
            Resolution::NoMatch
        );

        match resolver.resolve("semolina and onion", ResolveMode::SingleBest).unwrap() {
            Resolution::SingleRecipe(m) => {
                assert_eq!(m.recipe.name, "Upma");
                assert!(m.score.unwrap() >= 0.1);
            }
            other => panic!("expected single recipe, got {other:?}"),
        }
    }

    #[test]
    fn test_ranked_mode_ignores_threshold() {
        let resolver = resolver();
        match resolver.resolve("chocolate truffle", ResolveMode::RankedList(2)).unwrap() {
            Resolution::RankedResults(matches) => {
                assert_eq!(matches.len(), 2);
                assert_eq!(matches[0].index, 0);
                assert_eq!(matches[1].index, 1);
                assert!(matches.iter().all(|m| m.score == Some(0.0)));
            }
            other => panic!("expected ranked results, got {other:?}"),
        }
    }

    #[test]
    fn test_ranked_zero_is_treated_as_one() {
        let resolver = resolver();
        match resolver.resolve("milk and sugar", ResolveMode::RankedList(0)).unwrap() {
            Resolution::RankedResults(matches) => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].recipe.name, "Kheer");
            }
            other => panic!("expected ranked results, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_config() {
        let index = CatalogIndex::build(vec![RawRecipe::new("Poha", "rice, onion")]).unwrap();
        let config = SearchConfig {
            top_k: 5,
            min_score: 0.99,
            min_query_len: 1,
        };
        let resolver = QueryResolver::with_catalog(Arc::new(index), ChatTable::default(), config);

        // Two characters pass a lower length gate
        assert_ne!(
            resolver.resolve("ab", ResolveMode::SingleBest).unwrap(),
            Resolution::TooShort
        );
        // Partial overlap no longer clears a stricter threshold
        assert_eq!(
            resolver.resolve("onion tomato", ResolveMode::SingleBest).unwrap(),
            Resolution::NoMatch
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(Resolution::NoMatch.message(), Some(NO_MATCH_MESSAGE));
        assert_eq!(
            Resolution::ConversationalReply("hey".to_string()).message(),
            Some("hey")
        );
        assert_eq!(Resolution::RankedResults(Vec::new()).message(), None);
    }
}
