//! End-to-end tests for a migration over a small source tree

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;
use unprefix::{Catalog, Config, DirectoryGroup, Pipeline, Rewriter, WriteMode};

// =============================================================================
// Fixtures
// =============================================================================

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// A miniature library whose files are already named without the prefix
fn corpus() -> (TempDir, Config) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path();

    write(
        root,
        "src/Pop.h",
        "#ifndef eoPop_h\n#define eoPop_h\n// eoPop holds individuals\ntemplate <class EOT> class eoPop {};\n#endif\n",
    );
    write(
        root,
        "src/PopEval.h",
        "#include \"eoPop.h\"\nclass eoPopEval : public eoEvalFunc {};\n",
    );
    write(root, "src/Init.cpp", "#include \"eoInit.h\"\neoInit::eoInit() {}\n");
    write(root, "src/Makefile.am", "SOURCES = eoInit.cpp eoPop.h\n");
    write(root, "src/ga/BitOp.h", "class eoBitOp : public eoMonOp<Chrom> {};\n");
    write(root, "src/ga/nested/Deep.h", "class eoDeep {};\n");
    write(root, "app/main.cpp", "eoPop<Indi> pop; eoPopEval eval; eoBitOp op;\nstd::cout << \"eoPop\";\n");
    write(root, "test/t-Pop.cpp", "int main() { eoPop<int> p; eoDeep d; }\n");

    let config = Config {
        root: root.to_path_buf(),
        prefix: "eo".to_string(),
        library_dirs: vec![PathBuf::from("src"), PathBuf::from("src/ga")],
        consumer_dirs: vec![PathBuf::from("app"), PathBuf::from("test")],
        static_names: vec!["EvalFunc".to_string(), "MonOp".to_string()],
        ..Default::default()
    };

    (temp, config)
}

// =============================================================================
// Selection and catalog
// =============================================================================

#[test]
fn test_selection_is_complete_and_ordered_by_group() {
    let (_temp, config) = corpus();
    let pipeline = Pipeline::from_config(&config).unwrap();

    let paths: Vec<PathBuf> = pipeline.files.paths().iter().map(|p| p.to_path_buf()).collect();
    let unique: HashSet<_> = paths.iter().collect();
    assert_eq!(unique.len(), paths.len(), "each file appears exactly once");

    let expected: HashSet<PathBuf> = [
        "src/Pop.h",
        "src/PopEval.h",
        "src/Init.cpp",
        "src/ga/BitOp.h",
        "app/main.cpp",
        "test/t-Pop.cpp",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(paths.iter().cloned().collect::<HashSet<_>>(), expected);

    let groups: Vec<DirectoryGroup> = pipeline.files.iter().map(|f| f.group).collect();
    let first_consumer = groups.iter().position(|g| *g == DirectoryGroup::Consumer).unwrap();
    assert!(groups[..first_consumer].iter().all(|g| *g == DirectoryGroup::Library));
    assert!(groups[first_consumer..].iter().all(|g| *g == DirectoryGroup::Consumer));

    // Configured directory order is kept: src before src/ga, app before test
    let position = |p: &str| paths.iter().position(|x| x == Path::new(p)).unwrap();
    assert!(position("src/Pop.h") < position("src/ga/BitOp.h"));
    assert!(position("app/main.cpp") < position("test/t-Pop.cpp"));
}

#[test]
fn test_catalog_contains_static_and_library_names() {
    let (_temp, config) = corpus();
    let pipeline = Pipeline::from_config(&config).unwrap();
    let catalog = &pipeline.catalog;

    for name in ["EvalFunc", "MonOp", "Pop", "PopEval", "Init", "BitOp"] {
        assert!(catalog.contains(name), "missing {name}");
    }
    // Consumer files and nested directories contribute nothing
    assert!(!catalog.contains("main"));
    assert!(!catalog.contains("t-Pop"));
    assert!(!catalog.contains("Deep"));

    assert_eq!(&catalog.names()[..2], &["EvalFunc", "MonOp"]);
}

// =============================================================================
// Rewriting
// =============================================================================

#[test]
fn test_migration_rewrites_every_selected_file() {
    let (temp, config) = corpus();

    let pipeline = Pipeline::from_config(&config).unwrap();
    let summary = pipeline.rewriter.rewrite_all(&pipeline.files, WriteMode::Apply, |_| {}).unwrap();

    assert_eq!(summary.files_processed, 6);
    assert_eq!(summary.files_changed, 6);

    let root = temp.path();
    assert_eq!(
        read(root, "src/Pop.h"),
        "#ifndef Pop_h\n#define Pop_h\n// Pop holds individuals\ntemplate <class EOT> class Pop {};\n#endif\n"
    );
    assert_eq!(
        read(root, "src/PopEval.h"),
        "#include \"Pop.h\"\nclass PopEval : public EvalFunc {};\n"
    );
    assert_eq!(read(root, "src/Init.cpp"), "#include \"Init.h\"\nInit::Init() {}\n");
    assert_eq!(read(root, "src/ga/BitOp.h"), "class BitOp : public MonOp<Chrom> {};\n");
    assert_eq!(
        read(root, "app/main.cpp"),
        "Pop<Indi> pop; PopEval eval; BitOp op;\nstd::cout << \"Pop\";\n"
    );
    // Deep.h sits below a configured directory, so Deep is not in the catalog
    assert_eq!(read(root, "test/t-Pop.cpp"), "int main() { Pop<int> p; eoDeep d; }\n");

    // Files that were not selected stay as they were
    assert_eq!(read(root, "src/Makefile.am"), "SOURCES = eoInit.cpp eoPop.h\n");
    assert_eq!(read(root, "src/ga/nested/Deep.h"), "class eoDeep {};\n");
}

#[test]
fn test_second_run_is_a_no_op() {
    let (temp, config) = corpus();

    let pipeline = Pipeline::from_config(&config).unwrap();
    pipeline.rewriter.rewrite_all(&pipeline.files, WriteMode::Apply, |_| {}).unwrap();
    let after_first = read(temp.path(), "app/main.cpp");

    let pipeline = Pipeline::from_config(&config).unwrap();
    let summary = pipeline.rewriter.rewrite_all(&pipeline.files, WriteMode::Apply, |_| {}).unwrap();

    assert_eq!(summary.files_changed, 0);
    assert_eq!(summary.replacements, 0);
    assert_eq!(read(temp.path(), "app/main.cpp"), after_first);
}

#[test]
fn test_dry_run_reports_without_writing() {
    let (temp, config) = corpus();
    let before = read(temp.path(), "app/main.cpp");

    let pipeline = Pipeline::from_config(&config).unwrap();
    let summary = pipeline.rewriter.rewrite_all(&pipeline.files, WriteMode::DryRun, |_| {}).unwrap();

    assert_eq!(summary.files_changed, 6);
    assert_eq!(read(temp.path(), "app/main.cpp"), before);
}

#[test]
fn test_missing_consumer_directory_aborts_before_rewriting() {
    let (temp, mut config) = corpus();
    config.consumer_dirs.push(PathBuf::from("examples"));

    let result = Pipeline::from_config(&config);

    assert!(result.is_err());
    assert!(read(temp.path(), "app/main.cpp").contains("eoPop"));
}

#[test]
fn test_equal_length_names_do_not_depend_on_catalog_order() {
    let forward = Rewriter::new("eo", &Catalog::new(["Ae", "Bx"]));
    let reversed = Rewriter::new("eo", &Catalog::new(["Bx", "Ae"]));

    assert_eq!(forward.rewrite_line("eoAeoBx"), "ABx");
    assert_eq!(reversed.rewrite_line("eoAeoBx"), "ABx");
}

#[test]
fn test_foo_foobar_scenario() {
    let rewriter = Rewriter::new("eo", &Catalog::new(["Foo", "FooBar"]));
    let out = rewriter.rewrite_line("eoFooBar x; eoFoo y;");
    assert_eq!(out, "FooBar x; Foo y;");
    assert_ne!(out, "Bar x; Foo y;");
}

// =============================================================================
// Properties
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Foo",
        "FooBar",
        "Bar",
        "Op",
        "QuadOp",
        "BinOp",
        "o",
        "eo",
        "Pop",
        "Population",
        "Ae",
        "Bx",
    ])
        .prop_map(String::from)
}

fn text_strategy() -> impl Strategy<Value = String> {
    let token = prop::sample::select(vec![
        "eo", "Foo", "FooBar", "Bar", "Op", "Quad", "Bin", "Pop", "ulation", "A", "Ae", "Bx", " ", ";", "\n", "\"", "//",
        "x",
    ]);
    prop::collection::vec(token, 0..40).prop_map(|tokens| tokens.concat())
}

proptest! {
    #[test]
    fn prop_rewrite_is_idempotent(
        names in prop::collection::vec(name_strategy(), 0..8),
        text in text_strategy(),
    ) {
        let rewriter = Rewriter::new("eo", &Catalog::new(names));
        let once = rewriter.rewrite_text(&text);
        let twice = rewriter.rewrite_text(&once.text);

        prop_assert_eq!(&twice.text, &once.text);
        prop_assert_eq!(twice.replacements, 0);
        prop_assert_eq!(rewriter.remaining(&once.text), 0);
    }

    #[test]
    fn prop_catalog_order_does_not_matter(
        names in prop::collection::vec(name_strategy(), 0..8),
        rotation in 0usize..8,
        text in text_strategy(),
    ) {
        let mut reversed = names.clone();
        reversed.reverse();
        let mut rotated = names.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(rotation % len);
        }

        let forward = Rewriter::new("eo", &Catalog::new(names)).rewrite_text(&text).text;
        let backward = Rewriter::new("eo", &Catalog::new(reversed)).rewrite_text(&text).text;
        let rotated = Rewriter::new("eo", &Catalog::new(rotated)).rewrite_text(&text).text;

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(&forward, &rotated);
    }

    #[test]
    fn prop_longer_name_never_left_half_stripped(suffix in "[A-Z][a-z]{1,6}") {
        let long = format!("Foo{suffix}");
        let rewriter = Rewriter::new("eo", &Catalog::new(["Foo".to_string(), long.clone()]));

        let out = rewriter.rewrite_line(&format!("eo{long} eoFoo"));
        prop_assert_eq!(out, format!("{long} Foo"));
    }
}
