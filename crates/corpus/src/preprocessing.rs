use std::collections::HashSet;
use std::io;

use tracing::info;

use crate::corpora::TextCorpus;

/// Look-alike punctuation folded to a single representative before tokenization.
///
/// Replacements run in this order, so `’’` first becomes `''` and then `"`.
pub const DEFAULT_REPLACEMENTS: [(&str, &str); 9] = [
    ("\u{2019}", "'"),
    ("\u{2018}", "'"),
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
    ("''", "\""),
    ("\u{2014}", "-"),
    ("\u{2212}", "-"),
    ("\u{2013}", "-"),
    ("\u{2044}", "/"),
];

/// Ordered literal replacement table applied to every document.
#[derive(Debug, Clone)]
pub struct Normalizer {
    replacements: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_REPLACEMENTS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }
}

impl Normalizer {
    /// Builds a normalizer; pairs with an empty pattern are dropped.
    pub fn new(replacements: Vec<(String, String)>) -> Self {
        let replacements = replacements
            .into_iter()
            .filter(|(from, _)| !from.is_empty())
            .collect();
        Self { replacements }
    }

    /// A normalizer that leaves text untouched.
    pub fn identity() -> Self {
        Self {
            replacements: Vec::new(),
        }
    }

    pub fn replacements(&self) -> &[(String, String)] {
        &self.replacements
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut normalized = text.to_string();
        for (from, to) in &self.replacements {
            if normalized.contains(from.as_str()) {
                normalized = normalized.replace(from.as_str(), to);
            }
        }
        normalized
    }
}

/// Counts gathered while collecting documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub read: usize,
    pub unique: usize,
}

/// Reads every document of `corpus`, drops exact duplicates (first occurrence
/// wins) and normalizes the survivors.
///
/// Deduplication runs on the raw text, so two documents that only differ in
/// quote style are both kept.
pub fn collect_documents<C: TextCorpus>(
    corpus: &C,
    normalizer: &Normalizer,
) -> io::Result<(Vec<String>, DocumentStats)> {
    let mut seen = HashSet::new();
    let mut documents = Vec::new();
    let mut stats = DocumentStats::default();

    for document in corpus.stream()? {
        let document = document?;
        stats.read += 1;
        if !seen.contains(&document) {
            documents.push(normalizer.normalize(&document));
            seen.insert(document);
        }
    }
    stats.unique = documents.len();

    info!(
        read = stats.read,
        unique = stats.unique,
        "collected corpus documents"
    );
    Ok((documents, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpora::StreamingCorpus;
    use std::fs;

    #[test]
    fn folds_curly_quotes_and_dashes() {
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.normalize("\u{201C}don\u{2019}t\u{201D} \u{2014} 1\u{2044}2"),
            "\"don't\" - 1/2"
        );
    }

    #[test]
    fn replacement_order_is_applied_sequentially() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("\u{2019}\u{2019}quoted''"), "\"quoted\"");
    }

    #[test]
    fn identity_normalizer_is_a_no_op() {
        let text = "\u{2018}left\u{2019}";
        assert_eq!(Normalizer::identity().normalize(text), text);
    }

    #[test]
    fn empty_patterns_are_ignored() {
        let normalizer = Normalizer::new(vec![
            (String::new(), "x".to_string()),
            ("a".to_string(), "b".to_string()),
        ]);
        assert_eq!(normalizer.replacements().len(), 1);
        assert_eq!(normalizer.normalize("aaa"), "bbb");
    }

    #[test]
    fn collect_documents_dedups_before_normalizing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(
            &path,
            "it\u{2019}s here\nit's here\nit\u{2019}s here\nsecond line\n",
        )
        .unwrap();

        let corpus = StreamingCorpus::new(vec![path]).unwrap();
        let (documents, stats) = collect_documents(&corpus, &Normalizer::default()).unwrap();

        assert_eq!(documents, vec!["it's here", "it's here", "second line"]);
        assert_eq!(stats, DocumentStats { read: 4, unique: 3 });
    }
}
