use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vocab_align::{build_vocabulary, Config, Dataset, EmbeddingSize, Error};

fn main() {
    if let Err(err) = run() {
        eprintln!("alignment failed: {}", err);
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Builds a corpus-specific GloVe vocabulary with synthetic embeddings for orphans",
    long_about = None
)]
struct Args {
    #[arg(
        short = 'c',
        long,
        default_value = "cdcp",
        help = "Dataset preset: rct, drinv, cdcp, echr, ukp or scidtb"
    )]
    corpus: Dataset,

    #[arg(short, long, default_value_t = 300, help = "Embedding size (25 or 300)")]
    size: usize,

    #[arg(
        long,
        value_name = "PATH",
        help = "TOML or JSON config file; replaces the dataset preset"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Working directory holding resources/ and Datasets/"
    )]
    root: PathBuf,

    #[arg(long, help = "Seed for orphan embedding synthesis")]
    seed: Option<u64>,

    #[arg(short, long, help = "Log every alignment stage")]
    verbose: bool,
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut config = resolve_config(&args)?;
    if args.seed.is_some() {
        config.synthesis.seed = args.seed;
    }

    let report = build_vocabulary(&config)?;

    info!(
        documents = report.documents.unique,
        stages = report.trace.len(),
        "finished"
    );
    println!("Vocabulary entries: {}", report.manifest.vocabulary_size);
    println!("Orphans: {}", report.manifest.orphan_count);
    println!("Synthesized embeddings: {}", report.manifest.synthesized);
    println!("Output directory: {}", report.paths.dir.display());

    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config, Error> {
    if let Some(path) = args.config.as_ref() {
        info!(config = %path.display(), "loading configuration file");
        return Config::from_path(path);
    }

    let size = EmbeddingSize::try_from(args.size)?;
    info!(dataset = %args.corpus, dim = size.dim(), "using dataset preset");
    args.corpus.config(&args.root, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_cdcp_300() {
        let args = Args::try_parse_from(["align-vocab"]).unwrap();
        assert_eq!(args.corpus, Dataset::Cdcp);
        assert_eq!(args.size, 300);
        assert!(args.config.is_none());
    }

    #[test]
    fn unsupported_size_is_fatal() {
        let args = Args::try_parse_from(["align-vocab", "-c", "rct", "-s", "50"]).unwrap();
        assert!(matches!(
            resolve_config(&args),
            Err(Error::UnsupportedDimension(50))
        ));
    }

    #[test]
    fn unknown_dataset_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["align-vocab", "--corpus", "wiki"]).is_err());
    }

    #[test]
    fn preset_uses_root_directory() {
        let args =
            Args::try_parse_from(["align-vocab", "-c", "ukp", "-s", "25", "--root", "/data"])
                .unwrap();
        let cfg = resolve_config(&args).unwrap();
        assert_eq!(cfg.dim(), 25);
        assert!(cfg.artifacts.dir.starts_with("/data/Datasets/AAEC_v2"));
    }
}
