use crate::config::ArtifactsCfg;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::path::PathBuf;

/// Keys attested in the corpus, with their embedding values.
pub type Vocabulary<V> = BTreeMap<String, V>;

/// Fragments with no entry in the embedding table.
pub type OrphanSet = BTreeSet<String>;

/// Exact-match, case-sensitive view over a table of embedding keys.
pub trait EmbeddingLookup {
    type Value: Clone;

    fn lookup(&self, key: &str) -> Option<&Self::Value>;

    fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

impl<V: Clone, S: BuildHasher> EmbeddingLookup for HashMap<String, V, S> {
    type Value = V;

    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

impl<V: Clone> EmbeddingLookup for BTreeMap<String, V> {
    type Value = V;

    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

/// Dense embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Space-separated components, as they appear in GloVe text files.
impl fmt::Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Which step of the cascade produced a trace row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Whitespace,
    Separator(String),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Whitespace => f.write_str("Tab, space, newline"),
            Stage::Separator(separator) => f.write_str(separator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrace {
    pub stage: Stage,
    pub vocabulary_size: usize,
    pub orphan_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub cfg_hash: String,
    pub created_at: String,
    pub dim: usize,
    pub vocabulary_size: usize,
    pub orphan_count: usize,
    pub synthesized: usize,
}

/// Locations of every file written for one alignment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub vocabulary: PathBuf,
    pub orphans: PathBuf,
    pub log: PathBuf,
    pub embeddings: PathBuf,
    pub packed: PathBuf,
    pub packed_keys: PathBuf,
    pub manifest: PathBuf,
}

impl From<&ArtifactsCfg> for ArtifactPaths {
    fn from(cfg: &ArtifactsCfg) -> Self {
        let file = |suffix: &str| cfg.dir.join(format!("{}.{suffix}", cfg.prefix));
        Self {
            dir: cfg.dir.clone(),
            vocabulary: file("vocabulary.txt"),
            orphans: file("orphans.txt"),
            log: file("log.txt"),
            embeddings: file("embeddings.txt"),
            packed: file("embeddings.safetensors"),
            packed_keys: file("embeddings.vocab.json"),
            manifest: file("manifest.json"),
        }
    }
}
