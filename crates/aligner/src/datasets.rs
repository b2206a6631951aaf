//! Fixed directory layouts for the argument-mining corpora this tool is run on.
//!
//! Every preset resolves to a full [`Config`] rooted at a working directory:
//!
//! ```text
//! <root>/resources/glove.840B.300d.txt
//! <root>/Datasets/<name>/pickles/<version>/source_propositions.txt
//! <root>/Datasets/<name>/resources/glove300/glove.*
//! ```

use crate::config::{
    ArtifactsCfg, Config, CorpusCfg, SynthesisCfg, TableCfg, TokenizationCfg,
    DEFAULT_ARTIFACT_PREFIX,
};
use crate::errors::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const CORPUS_FILE: &str = "source_propositions.txt";

/// Supported pretrained tables, identified by their dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingSize {
    /// `glove.twitter.27B.25d`
    D25,
    /// `glove.840B.300d`
    D300,
}

impl EmbeddingSize {
    pub fn dim(self) -> usize {
        match self {
            EmbeddingSize::D25 => 25,
            EmbeddingSize::D300 => 300,
        }
    }

    pub fn source_file(self) -> &'static str {
        match self {
            EmbeddingSize::D25 => "glove.twitter.27B.25d.txt",
            EmbeddingSize::D300 => "glove.840B.300d.txt",
        }
    }

    pub fn embed_name(self) -> &'static str {
        match self {
            EmbeddingSize::D25 => "glove25",
            EmbeddingSize::D300 => "glove300",
        }
    }
}

impl TryFrom<usize> for EmbeddingSize {
    type Error = Error;

    fn try_from(dim: usize) -> Result<Self> {
        match dim {
            25 => Ok(EmbeddingSize::D25),
            300 => Ok(EmbeddingSize::D300),
            other => Err(Error::UnsupportedDimension(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Rct,
    DrInventor,
    Cdcp,
    Echr,
    Ukp,
    Scidtb,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::Rct,
        Dataset::DrInventor,
        Dataset::Cdcp,
        Dataset::Echr,
        Dataset::Ukp,
        Dataset::Scidtb,
    ];

    /// Short name accepted on the command line.
    pub fn flag(self) -> &'static str {
        match self {
            Dataset::Rct => "rct",
            Dataset::DrInventor => "drinv",
            Dataset::Cdcp => "cdcp",
            Dataset::Echr => "echr",
            Dataset::Ukp => "ukp",
            Dataset::Scidtb => "scidtb",
        }
    }

    /// Directory under `Datasets/`.
    pub fn directory(self) -> &'static str {
        match self {
            Dataset::Rct => "RCT",
            Dataset::DrInventor => "DrInventor",
            Dataset::Cdcp => "cdcp_ACL17",
            Dataset::Echr => "ECHR2018",
            Dataset::Ukp => "AAEC_v2",
            Dataset::Scidtb => "scidtb_argmin_annotations",
        }
    }

    pub fn version(self) -> Option<&'static str> {
        match self {
            Dataset::Rct => None,
            Dataset::DrInventor => Some("arg10"),
            Dataset::Cdcp => Some("new_3"),
            Dataset::Echr => Some("arg0"),
            Dataset::Ukp => Some("new_2R"),
            Dataset::Scidtb => Some("only_arg_v1"),
        }
    }

    /// Builds the full configuration for this dataset under `root`.
    ///
    /// ECHR only ships with the 300d table, which it reads from `root`
    /// directly and writes to `Datasets/ECHR2018/glove`.
    pub fn config(self, root: &Path, size: EmbeddingSize) -> Result<Config> {
        let dataset_dir = root.join("Datasets").join(self.directory());

        let mut pickles = dataset_dir.join("pickles");
        if let Some(version) = self.version() {
            pickles = pickles.join(version);
        }

        let (table_path, output_dir) = match self {
            Dataset::Echr => {
                if size != EmbeddingSize::D300 {
                    return Err(Error::UnsupportedDimension(size.dim()));
                }
                (root.join(size.source_file()), dataset_dir.join("glove"))
            }
            _ => (
                root.join("resources").join(size.source_file()),
                dataset_dir.join("resources").join(size.embed_name()),
            ),
        };

        Ok(Config {
            table: TableCfg {
                path: table_path,
                dim: size.dim(),
            },
            corpus: CorpusCfg {
                inputs: vec![pickles.join(CORPUS_FILE)],
                normalize: true,
                replacements: None,
            },
            tokenization: TokenizationCfg::default(),
            synthesis: SynthesisCfg::default(),
            artifacts: ArtifactsCfg {
                dir: output_dir,
                prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            },
        })
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.flag() == lowered)
            .ok_or_else(|| {
                let known: Vec<_> = Dataset::ALL.iter().map(|d| d.flag()).collect();
                format!(
                    "dataset '{value}' not supported (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}
