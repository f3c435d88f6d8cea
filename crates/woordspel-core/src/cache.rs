//! Durable cache of accepted answers.
//!
//! The cache maps (category, letter) to the set of normalized answers the
//! judge has accepted before. It only ever grows, and every successful insert
//! rewrites the whole document on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::CacheError;
use crate::model::{Category, Letter, NormalizedAnswer};

/// On-disk shape: `{ "categories": { category: { letter: [answer, ...] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl CacheDocument {
    /// A document with an empty answer set for every category × letter pair.
    pub fn seeded() -> Self {
        let mut document = Self::default();
        document.fill_missing_pairs();
        document
    }

    fn fill_missing_pairs(&mut self) {
        for category in Category::all() {
            let letters = self
                .categories
                .entry(category.as_str().to_string())
                .or_default();
            for letter in Letter::all() {
                letters.entry(letter.to_string()).or_default();
            }
        }
    }

    fn renormalize(&mut self) {
        for letters in self.categories.values_mut() {
            for answers in letters.values_mut() {
                *answers = std::mem::take(answers)
                    .iter()
                    .map(|a| NormalizedAnswer::new(a))
                    .filter(|a| !a.is_empty())
                    .map(NormalizedAnswer::into_string)
                    .collect();
            }
        }
    }
}

/// Accepted answers per (category, letter), optionally backed by a file.
#[derive(Debug, Clone)]
pub struct AnswerCache {
    document: CacheDocument,
    path: Option<PathBuf>,
}

impl AnswerCache {
    /// A cache that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            document: CacheDocument::seeded(),
            path: None,
        }
    }

    /// Load the cache stored at `path`, or start a seeded one if the file does not exist.
    ///
    /// Stored answers are normalized again and pairs missing from the document
    /// are added, so documents written with an older category list stay usable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let document = match fs::read_to_string(&path) {
            Ok(content) => {
                let mut document: CacheDocument =
                    serde_json::from_str(&content).map_err(|source| CacheError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                document.renormalize();
                document.fill_missing_pairs();
                tracing::debug!(path = %path.display(), "loaded answer cache");
                document
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no answer cache yet, starting empty");
                CacheDocument::seeded()
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        Ok(Self {
            document,
            path: Some(path),
        })
    }

    /// Whether `answer` was accepted before for this pair.
    ///
    /// A pair that was never initialized behaves as an empty set.
    pub fn contains(&self, category: &Category, letter: &Letter, answer: &str) -> bool {
        let answer = NormalizedAnswer::new(answer);
        self.answers(category, letter)
            .is_some_and(|answers| answers.contains(answer.as_str()))
    }

    /// Record `answer` as accepted. Returns `false` if it was already present
    /// or normalizes to nothing; in that case nothing is written.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory cache
    /// stays authoritative for the rest of the process.
    pub fn insert(&mut self, category: &Category, letter: &Letter, answer: &str) -> bool {
        let answer = NormalizedAnswer::new(answer);
        if answer.is_empty() {
            return false;
        }

        let inserted = self
            .document
            .categories
            .entry(category.as_str().to_string())
            .or_default()
            .entry(letter.to_string())
            .or_default()
            .insert(answer.as_str().to_string());
        if !inserted {
            return false;
        }

        if let Err(e) = self.save() {
            tracing::warn!(
                %category,
                %letter,
                answer = %answer,
                "failed to persist answer cache: {e}"
            );
        }
        true
    }

    /// The stored answers for a pair, if the pair exists.
    pub fn answers(&self, category: &Category, letter: &Letter) -> Option<&BTreeSet<String>> {
        self.document
            .categories
            .get(category.as_str())?
            .get(&letter.to_string())
    }

    /// Total number of stored answers across all pairs.
    pub fn len(&self) -> usize {
        self.document
            .categories
            .values()
            .flat_map(|letters| letters.values())
            .map(BTreeSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn document(&self) -> &CacheDocument {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the whole document to its file, atomically. No-op for in-memory caches.
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(io_err)?;

        let bytes = serde_json::to_vec_pretty(&self.document).map_err(|e| io_err(e.into()))?;
        let mut temp_file = NamedTempFile::new_in(parent).map_err(io_err)?;
        temp_file.write_all(&bytes).map_err(io_err)?;
        temp_file.as_file().sync_all().map_err(io_err)?;
        temp_file.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
