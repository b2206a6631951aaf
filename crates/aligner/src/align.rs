//! Progressive tokenization of a corpus against an embedding vocabulary.
//!
//! Documents are first split on whitespace. Every fragment the table does not
//! know becomes an orphan, and each separator of the cascade then re-splits
//! the current orphan pool. Pieces that match move into the vocabulary, and
//! the rest form the next pool. Separators run in a fixed priority order, so
//! multi-character runs such as `...` are tried before the single marks they
//! are made of.

use crate::config::TokenizationCfg;
use crate::types::{EmbeddingLookup, OrphanSet, Stage, StageTrace, Vocabulary};
use tracing::debug;

/// Outcome of one alignment run.
#[derive(Debug, Clone)]
pub struct Alignment<V> {
    pub vocabulary: Vocabulary<V>,
    /// Final orphans; never contains the empty string.
    pub orphans: OrphanSet,
    pub trace: Vec<StageTrace>,
}

impl<V> Alignment<V> {
    pub fn into_parts(self) -> (Vocabulary<V>, OrphanSet, Vec<StageTrace>) {
        (self.vocabulary, self.orphans, self.trace)
    }
}

/// Aligns `documents` with `table`, accumulating matches into `vocabulary`.
///
/// The vocabulary is taken by value and handed back inside the result, so a
/// caller can chain runs over several corpora by passing the previous
/// vocabulary in. Pass `Vocabulary::new()` to start fresh.
pub fn align<T, I, S>(
    documents: I,
    table: &T,
    options: &TokenizationCfg,
    mut vocabulary: Vocabulary<T::Value>,
) -> Alignment<T::Value>
where
    T: EmbeddingLookup + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut trace = Vec::with_capacity(options.separators.len() + 1);

    let mut orphans = whitespace_stage(
        documents,
        table,
        &options.stopword_suffixes,
        &mut vocabulary,
    );
    record(&mut trace, Stage::Whitespace, &vocabulary, &orphans);

    for separator in &options.separators {
        orphans = split_and_match(&orphans, separator, table, &mut vocabulary);
        if options.registers(separator) {
            classify(separator, table, &mut vocabulary, &mut orphans);
        }
        record(
            &mut trace,
            Stage::Separator(separator.clone()),
            &vocabulary,
            &orphans,
        );
    }

    orphans.remove("");
    Alignment {
        vocabulary,
        orphans,
        trace,
    }
}

/// Splits every document on whitespace runs and classifies each fragment.
///
/// A fragment ending in one of `suffixes` is replaced by its stripped form
/// when only the stripped form is known to the table. Stripping happens at
/// most once per fragment.
pub fn whitespace_stage<T, I, S>(
    documents: I,
    table: &T,
    suffixes: &[char],
    vocabulary: &mut Vocabulary<T::Value>,
) -> OrphanSet
where
    T: EmbeddingLookup + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut orphans = OrphanSet::new();
    for document in documents {
        for word in document.as_ref().split_whitespace() {
            let word = strip_stopword_suffix(word, suffixes, table);
            classify(word, table, vocabulary, &mut orphans);
        }
    }
    orphans
}

/// Splits each orphan on every literal occurrence of `separator`.
///
/// Matching pieces go into `vocabulary`. Everything else, including the empty
/// pieces left by adjacent or boundary separators, forms the returned set.
/// The input pool is left untouched.
pub fn split_and_match<T>(
    orphans: &OrphanSet,
    separator: &str,
    table: &T,
    vocabulary: &mut Vocabulary<T::Value>,
) -> OrphanSet
where
    T: EmbeddingLookup + ?Sized,
{
    let mut next = OrphanSet::new();
    for fragment in orphans {
        for piece in fragment.split(separator) {
            classify(piece, table, vocabulary, &mut next);
        }
    }
    next
}

fn strip_stopword_suffix<'a, T>(word: &'a str, suffixes: &[char], table: &T) -> &'a str
where
    T: EmbeddingLookup + ?Sized,
{
    let mut chars = word.chars();
    match chars.next_back() {
        Some(last) if suffixes.contains(&last) => {
            let stripped = chars.as_str();
            if !stripped.is_empty() && table.contains_key(stripped) {
                stripped
            } else {
                word
            }
        }
        _ => word,
    }
}

fn classify<T>(
    fragment: &str,
    table: &T,
    vocabulary: &mut Vocabulary<T::Value>,
    orphans: &mut OrphanSet,
) where
    T: EmbeddingLookup + ?Sized,
{
    match table.lookup(fragment) {
        Some(value) => {
            vocabulary.insert(fragment.to_string(), value.clone());
        }
        None => {
            if !orphans.contains(fragment) {
                orphans.insert(fragment.to_string());
            }
        }
    }
}

fn record<V>(
    trace: &mut Vec<StageTrace>,
    stage: Stage,
    vocabulary: &Vocabulary<V>,
    orphans: &OrphanSet,
) {
    debug!(
        stage = %stage,
        vocabulary = vocabulary.len(),
        orphans = orphans.len(),
        "alignment stage complete"
    );
    trace.push(StageTrace {
        stage,
        vocabulary_size: vocabulary.len(),
        orphan_count: orphans.len(),
    });
}
