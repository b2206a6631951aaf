//! Document sources for vocabulary alignment.
//!
//! Corpora are plain text files holding one document per line. Documents are
//! deduplicated and their look-alike punctuation folded before tokenization.

pub mod corpora;
pub mod preprocessing;

pub use corpora::{CorpusStream, StreamingCorpus, TextCorpus};
pub use preprocessing::{collect_documents, DocumentStats, Normalizer, DEFAULT_REPLACEMENTS};
