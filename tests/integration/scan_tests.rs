use std::fs;
use std::path::Path;

use tempfile::{tempdir, TempDir};
use textdupe::config::Config;
use textdupe::duplicates::FindingKind;
use textdupe::scanner::{DocumentReader, ReadSummary, ReaderConfig, Walker};

const SETUP: &str = "Install the toolchain with the installer.\n\
Run the setup command from a new terminal.\n\
Restart your shell when it finishes.";

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn load(dir: &TempDir, config: &Config) -> ReadSummary {
    let walker = Walker::new(dir.path(), config.to_walker_config());
    let paths: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    DocumentReader::new(ReaderConfig::default().with_io_threads(config.io_threads))
        .read(dir.path(), paths)
        .unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let config = Config::default();

    let summary = load(&dir, &config);
    let (outcome, score) = textdupe::analyze(&summary.documents, &config);

    assert!(summary.documents.is_empty());
    assert!(outcome.findings.is_empty());
    assert_eq!(score.value, 100.0);
    assert!(score.passed);
}

#[test]
fn test_scan_finds_cross_file_paragraph() {
    let dir = tempdir().unwrap();
    write(dir.path(), "guide.md", &format!("# Guide\n\n{SETUP}\n"));
    write(
        dir.path(),
        "docs/setup.md",
        &format!("# Setup\n\n{SETUP}\n\nDone."),
    );
    let config = Config::default();

    let summary = load(&dir, &config);
    let (outcome, _) = textdupe::analyze(&summary.documents, &config);

    assert_eq!(outcome.findings.len(), 1);
    let finding = &outcome.findings[0];
    assert_eq!(finding.kind, FindingKind::CrossFileParagraphDuplicate);
    // docs/setup.md sorts before guide.md, so it is the origin.
    assert_eq!(finding.paths, vec!["guide.md", "docs/setup.md"]);
}

#[test]
fn test_only_included_extensions_are_scanned() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.md", SETUP);
    write(dir.path(), "b.txt", SETUP);
    write(dir.path(), "c.rs", SETUP);
    write(dir.path(), "d.rst", SETUP);
    let config = Config::default();

    let summary = load(&dir, &config);
    let names: Vec<_> = summary.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(names, vec!["a.md", "b.txt", "d.rst"]);

    let (outcome, _) = textdupe::analyze(&summary.documents, &config);
    assert_eq!(outcome.stats.num_file_dupes, 2);
    assert_eq!(outcome.findings[0].paths, vec!["b.txt", "a.md", "d.rst"]);
}

#[test]
fn test_default_ignores_skip_dependency_trees() {
    let dir = tempdir().unwrap();
    write(dir.path(), "README.md", SETUP);
    write(dir.path(), "node_modules/pkg/README.md", SETUP);
    write(dir.path(), "target/doc/notes.md", SETUP);
    let config = Config::default();

    let summary = load(&dir, &config);
    assert_eq!(summary.documents.len(), 1);
    assert_eq!(summary.documents[0].path, "README.md");
}

#[test]
fn test_gitignore_is_respected_by_default() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".gitignore", "generated/\n");
    write(dir.path(), "a.md", SETUP);
    write(dir.path(), "generated/a.md", SETUP);

    let summary = load(&dir, &Config::default());
    assert_eq!(summary.documents.len(), 1);

    let config = Config {
        respect_gitignore: false,
        ..Config::default()
    };
    assert_eq!(load(&dir, &config).documents.len(), 2);
}

#[test]
fn test_binary_and_invalid_files_are_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "good.md", SETUP);
    fs::write(dir.path().join("nul.md"), b"text\0more").unwrap();
    fs::write(dir.path().join("latin1.txt"), [0x63u8, 0x61, 0x66, 0xe9]).unwrap();

    let summary = load(&dir, &Config::default());

    assert_eq!(summary.documents.len(), 1);
    assert_eq!(summary.errors.len(), 2);
}

#[test]
fn test_canonical_order_independent_of_thread_count() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        write(
            dir.path(),
            &format!("part{:02}/doc.md", 39 - i),
            &format!("Doc {i}\n\n{SETUP}"),
        );
    }

    let single = Config {
        io_threads: 1,
        ..Config::default()
    };
    let many = Config {
        io_threads: 8,
        ..Config::default()
    };

    let a = load(&dir, &single);
    let b = load(&dir, &many);
    assert_eq!(a.documents, b.documents);
    assert_eq!(a.documents[0].path, "part00/doc.md");

    let (outcome_a, _) = textdupe::analyze(&a.documents, &single);
    let (outcome_b, _) = textdupe::analyze(&b.documents, &many);
    assert_eq!(outcome_a, outcome_b);
    assert_eq!(outcome_a.findings[0].paths[1], "part00/doc.md");
}

#[test]
fn test_unicode_paths_sort_by_normalized_form() {
    let dir = tempdir().unwrap();
    write(dir.path(), "caf\u{e9}.md", SETUP);
    write(dir.path(), "cafe.md", SETUP);

    let summary = load(&dir, &Config::default());
    let names: Vec<_> = summary.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(names, vec!["cafe.md", "caf\u{e9}.md"]);
}
