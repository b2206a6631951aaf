use crate::errors::{Error, Result};
use crate::separators::{DEFAULT_SEPARATORS, DEFAULT_STOPWORD_SUFFIXES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARTIFACT_PREFIX: &str = "glove";
pub const DEFAULT_HALF_RANGE: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub table: TableCfg,
    pub corpus: CorpusCfg,
    #[serde(default)]
    pub tokenization: TokenizationCfg,
    #[serde(default)]
    pub synthesis: SynthesisCfg,
    pub artifacts: ArtifactsCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCfg {
    pub path: PathBuf,
    pub dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusCfg {
    pub inputs: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Ordered `(from, to)` pairs; `None` keeps the built-in table.
    #[serde(default)]
    pub replacements: Option<Vec<(String, String)>>,
}

/// Separator cascade and whitespace-stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizationCfg {
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
    #[serde(default = "default_stopword_suffixes")]
    pub stopword_suffixes: Vec<char>,
    /// Separators that are used for splitting but never registered as
    /// vocabulary entries or orphans themselves.
    #[serde(default)]
    pub unregistered_separators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisCfg {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_half_range")]
    pub half_range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsCfg {
    pub dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for TokenizationCfg {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            stopword_suffixes: default_stopword_suffixes(),
            unregistered_separators: Vec::new(),
        }
    }
}

impl TokenizationCfg {
    pub fn with_separators<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn registers(&self, separator: &str) -> bool {
        !self
            .unregistered_separators
            .iter()
            .any(|candidate| candidate == separator)
    }
}

impl Default for SynthesisCfg {
    fn default() -> Self {
        Self {
            seed: None,
            half_range: DEFAULT_HALF_RANGE,
        }
    }
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config: Config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            Some("toml") | None => toml::from_str(&contents)?,
            Some(_) => {
                return Err(Error::InvalidConfig(
                    "configuration file must be .toml or .json",
                ))
            }
        };

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.apply_base_path(base_dir);
        Ok(config)
    }

    pub fn dim(&self) -> usize {
        self.table.dim
    }

    fn apply_base_path(&mut self, base: &Path) {
        self.table.path = resolve_relative(base, &self.table.path);
        for input in &mut self.corpus.inputs {
            *input = resolve_relative(base, input);
        }
        self.artifacts.dir = resolve_relative(base, &self.artifacts.dir);
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn default_true() -> bool {
    true
}

fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect()
}

fn default_stopword_suffixes() -> Vec<char> {
    DEFAULT_STOPWORD_SUFFIXES.to_vec()
}

fn default_half_range() -> f32 {
    DEFAULT_HALF_RANGE
}

fn default_prefix() -> String {
    DEFAULT_ARTIFACT_PREFIX.to_string()
}
