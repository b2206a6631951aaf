use crate::config::Config;
use crate::errors::{Error, Result};
use crate::table::EmbeddingTable;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

pub fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.table.dim == 0 {
        return Err(Error::Validation(
            "table.dim must be greater than zero".into(),
        ));
    }

    if cfg.corpus.inputs.is_empty() {
        return Err(Error::Validation(
            "corpus.inputs must contain at least one path".into(),
        ));
    }

    let tokenization = &cfg.tokenization;
    if tokenization.separators.iter().any(String::is_empty) {
        return Err(Error::Validation(
            "tokenization.separators must not contain an empty separator".into(),
        ));
    }

    let mut seen = HashSet::new();
    for separator in &tokenization.separators {
        if !seen.insert(separator.as_str()) {
            warn!(%separator, "separator appears more than once and will run again");
        }
    }

    for separator in &tokenization.unregistered_separators {
        if !seen.contains(separator.as_str()) {
            return Err(Error::Validation(format!(
                "unregistered separator '{separator}' is not part of tokenization.separators"
            )));
        }
    }

    if tokenization.stopword_suffixes.is_empty() {
        warn!("no stopword suffixes configured; trailing punctuation is left to the cascade");
    }

    if !cfg.synthesis.half_range.is_finite() || cfg.synthesis.half_range <= 0.0 {
        return Err(Error::Validation(format!(
            "synthesis.half_range must be a positive finite number (got {})",
            cfg.synthesis.half_range
        )));
    }

    if cfg.artifacts.prefix.trim().is_empty() {
        return Err(Error::Validation(
            "artifacts.prefix must not be empty".into(),
        ));
    }

    ensure_directory_creatable(cfg.artifacts.dir.as_path())
}

pub fn validate_table(table: &EmbeddingTable, cfg: &Config) -> Result<()> {
    if table.dim() != cfg.table.dim {
        return Err(Error::Validation(format!(
            "embedding table has dimension {} but config expects {}",
            table.dim(),
            cfg.table.dim
        )));
    }

    if table.is_empty() {
        return Err(Error::Validation(format!(
            "embedding table at {} has no entries",
            cfg.table.path.display()
        )));
    }

    Ok(())
}

fn ensure_directory_creatable(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    if dir.exists() {
        return Err(Error::Validation(format!(
            "artifact directory path '{}' exists but is not a directory",
            dir.display()
        )));
    }

    // Missing ancestors are created alongside the directory itself.
    let mut ancestor = dir.parent();
    while let Some(parent) = ancestor {
        if parent.as_os_str().is_empty() || parent.is_dir() {
            return Ok(());
        }
        if parent.exists() {
            return Err(Error::Validation(format!(
                "artifact directory ancestor '{}' is not a directory",
                parent.display()
            )));
        }
        ancestor = parent.parent();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArtifactsCfg, CorpusCfg, SynthesisCfg, TableCfg, TokenizationCfg};
    use std::fs;
    use std::path::PathBuf;

    fn config(dir: &Path) -> Config {
        Config {
            table: TableCfg {
                path: dir.join("table.txt"),
                dim: 2,
            },
            corpus: CorpusCfg {
                inputs: vec![dir.join("corpus.txt")],
                normalize: true,
                replacements: None,
            },
            tokenization: TokenizationCfg::default(),
            synthesis: SynthesisCfg::default(),
            artifacts: ArtifactsCfg {
                dir: dir.join("out").join("nested"),
                prefix: "glove".into(),
            },
        }
    }

    #[test]
    fn default_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        validate_config(&config(dir.path())).unwrap();
    }

    #[test]
    fn empty_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.tokenization.separators.push(String::new());
        assert!(matches!(validate_config(&cfg), Err(Error::Validation(_))));
    }

    #[test]
    fn unregistered_separator_must_be_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.tokenization.unregistered_separators = vec!["@@".into()];
        let err = validate_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("'@@'"));
    }

    #[test]
    fn missing_inputs_and_zero_dim_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.corpus.inputs.clear();
        assert!(validate_config(&cfg).is_err());

        let mut cfg = config(dir.path());
        cfg.table.dim = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn artifact_dir_under_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut cfg = config(dir.path());
        cfg.artifacts.dir = blocker.join("out");
        assert!(validate_config(&cfg).is_err());

        cfg.artifacts.dir = PathBuf::from("relative-out");
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn table_dimension_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let table = EmbeddingTable::from_entries(3, [("a", vec![0.0, 0.0, 0.0])]).unwrap();
        assert!(validate_table(&table, &cfg).is_err());

        let table = EmbeddingTable::from_entries(2, [("a", vec![0.0, 0.0])]).unwrap();
        assert!(validate_table(&table, &cfg).is_ok());
    }
}
