// Recipe catalog and its TF-IDF vector space

pub mod index;
pub mod loader;
pub mod record;
pub mod vectorizer;

// Re-exports
pub use index::{CatalogIndex, ScoredRecipe};
pub use loader::{load_catalog, load_index, read_catalog};
pub use record::{RawRecipe, Recipe, RECIPE_PLACEHOLDER};
pub use vectorizer::{SparseVector, TfIdfVectorizer, Tokenizer};
