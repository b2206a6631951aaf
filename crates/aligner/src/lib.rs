//! Corpus-specific embedding tables from a pretrained GloVe vocabulary.
//!
//! The crate aligns a corpus with a fixed table of embedding keys by
//! progressive tokenization. Documents are split on whitespace first, then
//! every unmatched fragment is re-split by an ordered cascade of separators
//! until only irreducible orphans remain. Orphans receive random embeddings so
//! the resulting table covers every token of the corpus.
//!
//! # Configuration
//!
//! [`Config`] names the embedding table and its dimensionality, the corpus
//! inputs, the separator cascade, orphan synthesis settings and the artifact
//! directory. Configs load from TOML or JSON, or come from a [`Dataset`]
//! preset. Validation runs before any file is read.
//!
//! # Artifacts
//!
//! [`build_vocabulary`] writes the following under the artifact directory:
//!
//! - the sorted vocabulary and orphan listings
//! - a tab-separated stage log
//! - a GloVe-format embeddings dump
//! - a packed safetensors matrix with its row keys
//! - a manifest with a content hash
//!
//! # Thread Safety
//!
//! [`align`] keeps all of its state in the vocabulary it is handed, so
//! independent runs may share one [`EmbeddingTable`] across threads.

pub mod align;
pub mod artifacts;
pub mod config;
pub mod datasets;
pub mod errors;
pub mod separators;
pub mod synth;
pub mod table;
pub mod types;

mod validate;

pub use align::{align, split_and_match, whitespace_stage, Alignment};
pub use config::{ArtifactsCfg, Config, CorpusCfg, SynthesisCfg, TableCfg, TokenizationCfg};
pub use datasets::{Dataset, EmbeddingSize};
pub use errors::{Error, Result};
pub use synth::OrphanSynthesizer;
pub use table::{load_table, parse_line, read_table, EmbeddingTable};
pub use types::{
    ArtifactManifest, ArtifactPaths, Embedding, EmbeddingLookup, OrphanSet, Stage, StageTrace,
    Vocabulary,
};
pub use validate::validate_config;

use corpus::{collect_documents, DocumentStats, Normalizer, StreamingCorpus};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Summary of a completed [`build_vocabulary`] run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub paths: ArtifactPaths,
    pub manifest: ArtifactManifest,
    pub documents: DocumentStats,
    pub trace: Vec<StageTrace>,
}

/// Runs the full pipeline: load, align, synthesize orphans, write artifacts.
pub fn build_vocabulary(cfg: &Config) -> Result<BuildReport> {
    validate::validate_config(cfg)?;

    let table = load_table(&cfg.table.path, cfg.table.dim)?;
    validate::validate_table(&table, cfg)?;

    let (documents, stats) = load_documents(cfg)?;

    info!(documents = documents.len(), "aligning corpus with embedding table");
    let alignment = align(&documents, &table, &cfg.tokenization, Vocabulary::new());
    info!(
        vocabulary = alignment.vocabulary.len(),
        orphans = alignment.orphans.len(),
        "alignment finished"
    );

    let paths = ArtifactPaths::from(&cfg.artifacts);
    fs::create_dir_all(&paths.dir)?;

    artifacts::write_key_listing(
        &paths.vocabulary,
        alignment.vocabulary.keys().map(String::as_str),
    )?;
    artifacts::write_key_listing(&paths.orphans, alignment.orphans.iter().map(String::as_str))?;
    artifacts::write_stage_log(&paths.log, &alignment.trace)?;

    let (mut vocabulary, orphans, trace) = alignment.into_parts();
    let matched = vocabulary.len();
    let mut synthesizer = OrphanSynthesizer::new(&cfg.synthesis, cfg.table.dim)?;
    let synthesized = synthesizer.extend(&mut vocabulary, &orphans);

    artifacts::write_embeddings_text(&paths.embeddings, &vocabulary)?;
    artifacts::write_packed(&paths.packed, &paths.packed_keys, &vocabulary, cfg.table.dim)?;

    let written: [&Path; 6] = [
        &paths.vocabulary,
        &paths.orphans,
        &paths.log,
        &paths.embeddings,
        &paths.packed,
        &paths.packed_keys,
    ];
    let manifest = ArtifactManifest {
        cfg_hash: artifacts::compute_config_hash(cfg, &written)?,
        created_at: created_at()?,
        dim: cfg.table.dim,
        vocabulary_size: matched,
        orphan_count: orphans.len(),
        synthesized,
    };
    artifacts::write_manifest(&paths.manifest, &manifest)?;

    info!(dir = %paths.dir.display(), "artifacts written");
    Ok(BuildReport {
        paths,
        manifest,
        documents: stats,
        trace,
    })
}

fn load_documents(cfg: &Config) -> Result<(Vec<String>, DocumentStats)> {
    let corpus = StreamingCorpus::new(cfg.corpus.inputs.clone())?;
    let normalizer = if cfg.corpus.normalize {
        cfg.corpus
            .replacements
            .clone()
            .map(Normalizer::new)
            .unwrap_or_default()
    } else {
        Normalizer::identity()
    };
    Ok(collect_documents(&corpus, &normalizer)?)
}

fn created_at() -> Result<String> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Artifact(format!("failed to compute timestamp: {e}")))?
        .as_secs();
    Ok(format!("unix:{secs}"))
}
