use std::fs;
use std::path::Path;

use candle_core::Device;
use vocab_align::artifacts::{read_manifest, read_packed_keys, PACKED_TENSOR_NAME};
use vocab_align::errors::Result;
use vocab_align::{
    build_vocabulary, ArtifactsCfg, Config, CorpusCfg, Error, SynthesisCfg, TableCfg,
    TokenizationCfg,
};

const TABLE: &str = "\
the 0.1 0.2 0.3
cat 1 2 3
sat -1 -2 -3
. 0 0 1
mat 0.5 0.5 0.5
( 1 0 0
's 0 1 0
dog 2 2 2
";

const CORPUS: &str = "\
The cat sat.
the cat's mat (really)
the cat sat.
The cat sat.
it\u{2019}s a dog
";

fn write_fixture(dir: &Path) -> Result<Config> {
    let table_path = dir.join("table.txt");
    let corpus_path = dir.join("corpus.txt");
    fs::write(&table_path, TABLE)?;
    fs::write(&corpus_path, CORPUS)?;

    Ok(Config {
        table: TableCfg {
            path: table_path,
            dim: 3,
        },
        corpus: CorpusCfg {
            inputs: vec![corpus_path],
            normalize: true,
            replacements: None,
        },
        tokenization: TokenizationCfg::with_separators(["(", ")", "'s", "."]),
        synthesis: SynthesisCfg {
            seed: Some(42),
            ..SynthesisCfg::default()
        },
        artifacts: ArtifactsCfg {
            dir: dir.join("out").join("glove3"),
            prefix: "glove".into(),
        },
    })
}

fn lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(|line| line.to_string())
        .collect())
}

#[test]
fn build_writes_all_artifacts() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let cfg = write_fixture(tmp.path())?;
    let report = build_vocabulary(&cfg)?;

    assert_eq!(report.documents.read, 5);
    assert_eq!(report.documents.unique, 4);

    assert_eq!(
        lines(&report.paths.vocabulary)?,
        vec!["'s", "(", ".", "cat", "dog", "mat", "sat", "the"]
    );
    assert_eq!(
        lines(&report.paths.orphans)?,
        vec![")", "The", "a", "it", "really"]
    );
    assert_eq!(
        lines(&report.paths.log)?,
        vec![
            "Sep\tVoc_size\tOrphans",
            "Tab, space, newline\t5\t5",
            "(\t6\t6",
            ")\t6\t7",
            "'s\t7\t6",
            ".\t8\t6",
        ]
    );

    let embeddings = lines(&report.paths.embeddings)?;
    assert_eq!(embeddings.len(), 13);
    assert_eq!(embeddings[0], "'s 0 1 0");
    assert!(embeddings.contains(&"cat 1 2 3".to_string()));
    let really = embeddings
        .iter()
        .find(|line| line.starts_with("really "))
        .expect("orphan embedding written");
    let components: Vec<f32> = really
        .split(' ')
        .skip(1)
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(components.len(), 3);
    assert!(components.iter().all(|v| (-0.5..0.5).contains(v)));

    let packed_keys = read_packed_keys(&report.paths.packed_keys)?;
    assert_eq!(
        packed_keys,
        vec![
            "'s", "(", ")", ".", "The", "a", "cat", "dog", "it", "mat", "really", "sat", "the"
        ]
    );
    let tensors = candle_core::safetensors::load(&report.paths.packed, &Device::Cpu)?;
    let packed = &tensors[PACKED_TENSOR_NAME];
    assert_eq!(packed.dims(), &[13, 3]);
    let rows = packed.to_vec2::<f32>()?;
    assert_eq!(rows[6], vec![1.0, 2.0, 3.0]);

    let manifest = read_manifest(&report.paths.manifest)?;
    assert_eq!(manifest, report.manifest);
    assert_eq!(manifest.dim, 3);
    assert_eq!(manifest.vocabulary_size, 8);
    assert_eq!(manifest.orphan_count, 5);
    assert_eq!(manifest.synthesized, 5);
    assert_eq!(manifest.cfg_hash.len(), 64);
    assert!(manifest.created_at.starts_with("unix:"));
    Ok(())
}

#[test]
fn seeded_builds_are_reproducible() -> Result<()> {
    let first_dir = tempfile::tempdir()?;
    let second_dir = tempfile::tempdir()?;
    let first = build_vocabulary(&write_fixture(first_dir.path())?)?;
    let second = build_vocabulary(&write_fixture(second_dir.path())?)?;

    assert_eq!(
        fs::read_to_string(&first.paths.embeddings)?,
        fs::read_to_string(&second.paths.embeddings)?
    );
    assert_eq!(first.trace, second.trace);
    Ok(())
}

#[test]
fn config_file_drives_the_build() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_fixture(tmp.path())?;
    let config_path = tmp.path().join("align.toml");
    fs::write(
        &config_path,
        r#"
[table]
path = "table.txt"
dim = 3

[corpus]
inputs = ["corpus.txt"]
normalize = false

[tokenization]
separators = ["'s"]

[artifacts]
dir = "from-config"
prefix = "emb"
"#,
    )?;

    let cfg = Config::from_path(&config_path)?;
    let report = build_vocabulary(&cfg)?;

    assert_eq!(report.paths.dir, tmp.path().join("from-config"));
    assert!(report.paths.vocabulary.ends_with("emb.vocabulary.txt"));
    // Without normalization the curly apostrophe keeps "it’s" whole.
    let orphans = lines(&report.paths.orphans)?;
    assert!(orphans.contains(&"it\u{2019}s".to_string()));
    assert!(!orphans.contains(&"it".to_string()));
    Ok(())
}

#[test]
fn table_with_wrong_dimension_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut cfg = write_fixture(tmp.path())?;
    cfg.table.dim = 4;

    match build_vocabulary(&cfg) {
        Err(Error::Table { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected table error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_corpus_file_is_reported() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut cfg = write_fixture(tmp.path())?;
    cfg.corpus.inputs = vec![tmp.path().join("absent.txt")];

    assert!(matches!(build_vocabulary(&cfg), Err(Error::Io(_))));
    assert!(!cfg.artifacts.dir.exists());
    Ok(())
}
