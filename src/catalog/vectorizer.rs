// TF-IDF vector space over ingredient text.
//
// Tokens are runs of two or more word characters in case-folded text.
// Dimensions are assigned in lexicographic token order when the vectorizer
// is fitted and never change afterwards. Weights use smoothed IDF,
// `ln((1 + n) / (1 + df)) + 1`, times raw term frequency, and every vector
// is L2-normalised.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Splits text into lower-case word tokens
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::Internal(format!("Invalid token pattern: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern.find_iter(text).map(|m| m.as_str())
    }

    /// Token counts for already case-folded text
    fn counts<'a>(&'a self, text: &'a str) -> BTreeMap<&'a str, u32> {
        let mut counts = BTreeMap::new();
        for token in self.tokens(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}

/// Sparse vector with entries sorted by dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dimensions: usize,
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    pub fn zero(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (da, wa) = self.entries[i];
            let (db, wb) = other.entries[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity. Zero when either side has no magnitude.
    pub fn cosine(&self, other: &SparseVector) -> f32 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot(other) / (norm_a * norm_b)
    }
}

/// Vocabulary and IDF weights frozen at fit time
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    /// Fit the vocabulary and IDF weights over a corpus of case-folded documents
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let tokenizer = Tokenizer::new()?;
        let n = documents.len();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<&str> = tokenizer.tokens(doc.as_ref()).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration gives lexicographic dimension order
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (dim, (token, df)) in document_frequency.into_iter().enumerate() {
            let dim = u32::try_from(dim)
                .map_err(|_| Error::Catalog("Vocabulary exceeds u32 dimensions".to_string()))?;
            vocabulary.insert(token.to_string(), dim);
            idf.push((((1 + n) as f64 / (1 + df) as f64).ln() + 1.0) as f32);
        }

        Ok(Self {
            tokenizer,
            vocabulary,
            idf,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.idf.len()
    }

    pub fn dimension_of(&self, token: &str) -> Option<u32> {
        self.vocabulary.get(token).copied()
    }

    pub fn idf(&self, token: &str) -> Option<f32> {
        self.dimension_of(token).map(|dim| self.idf[dim as usize])
    }

    /// Project text into the fitted space. Unknown tokens are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let folded = text.to_lowercase();

        let mut entries: Vec<(u32, f32)> = self
            .tokenizer
            .counts(&folded)
            .into_iter()
            .filter_map(|(token, count)| {
                let dim = self.dimension_of(token)?;
                Some((dim, count as f32 * self.idf[dim as usize]))
            })
            .collect();
        entries.sort_by_key(|(dim, _)| *dim);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        SparseVector {
            dimensions: self.dimensions(),
            entries,
        }
    }
}
