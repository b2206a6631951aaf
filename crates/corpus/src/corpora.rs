use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use tracing::debug;

/// Trait for corpus types that can stream documents, one per item.
pub trait TextCorpus {
    type Stream: Iterator<Item = io::Result<String>>;
    fn stream(&self) -> io::Result<Self::Stream>;
}

/// Line-oriented corpus spread over one or more text files.
///
/// Every non-blank line is one document. Files are read in the order given,
/// so the stream is deterministic for a fixed input list.
#[derive(Clone, Debug)]
pub struct StreamingCorpus {
    files: Vec<PathBuf>,
}

impl StreamingCorpus {
    pub fn new(files: Vec<PathBuf>) -> io::Result<Self> {
        if files.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "expected at least one input file for corpus",
            ));
        }

        debug!(files = files.len(), "streaming corpus created");
        Ok(Self { files })
    }

    pub fn file_paths(&self) -> &[PathBuf] {
        &self.files
    }
}

impl TextCorpus for StreamingCorpus {
    type Stream = CorpusStream;

    fn stream(&self) -> io::Result<Self::Stream> {
        Ok(CorpusStream::new(self.files.clone()))
    }
}

pub struct CorpusStream {
    files: Vec<PathBuf>,
    next_file: usize,
    current_reader: Option<io::Lines<BufReader<File>>>,
}

impl CorpusStream {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            next_file: 0,
            current_reader: None,
        }
    }

    fn advance_file(&mut self) -> io::Result<bool> {
        let Some(path) = self.files.get(self.next_file) else {
            return Ok(false);
        };
        debug!(
            file = %path.display(),
            index = self.next_file + 1,
            total = self.files.len(),
            "reading corpus file"
        );

        let file = File::open(path).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("failed to open corpus file {}: {err}", path.display()),
            )
        })?;
        self.current_reader = Some(BufReader::new(file).lines());
        self.next_file += 1;
        Ok(true)
    }
}

impl Iterator for CorpusStream {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reader) = self.current_reader.as_mut() {
                match reader.next() {
                    Some(Ok(mut line)) => {
                        if line.ends_with('\r') {
                            line.pop();
                        }
                        if line.trim().is_empty() {
                            continue;
                        }
                        return Some(Ok(line));
                    }
                    Some(Err(err)) => return Some(Err(err)),
                    None => {
                        self.current_reader = None;
                        continue;
                    }
                }
            }

            match self.advance_file() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(err) => {
                    // Skip past the failing file so the stream terminates.
                    self.next_file += 1;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn streams_non_blank_lines_across_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "one\n\n   \ntwo\r\n").unwrap();
        fs::write(&second, "three\n").unwrap();

        let corpus = StreamingCorpus::new(vec![first, second]).unwrap();
        let lines = corpus
            .stream()
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn rejects_empty_file_list() {
        let err = StreamingCorpus::new(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_file_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = StreamingCorpus::new(vec![dir.path().join("absent.txt")]).unwrap();

        let mut stream = corpus.stream().unwrap();
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(stream.next().is_none());
    }
}
