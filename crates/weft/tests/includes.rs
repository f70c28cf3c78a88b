//! Integration tests for include expansion.

use std::fs;
use std::io;
use std::path::Path;

use weft::{Engine, LoadError, SourceLoader};

// =============================================================================
// Filesystem includes
// =============================================================================

#[test]
fn includes_are_inlined_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("header.tpl"), "HEADER ${TITLE}\n").unwrap();
    fs::write(
        dir.path().join("page.tpl"),
        "<!-- INCLUDE header.tpl -->body\n",
    )
    .unwrap();

    let mut engine = Engine::new();
    let mut tpl = engine.load_from_file(dir.path().join("page.tpl")).unwrap();
    tpl.assign("TITLE", "Welcome");
    assert_eq!(engine.render(&tpl).unwrap(), "HEADER Welcome\nbody\n");
}

#[test]
fn nested_includes_resolve_relative_to_the_including_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("partials")).unwrap();
    fs::write(dir.path().join("partials/inner.tpl"), "inner").unwrap();
    fs::write(
        dir.path().join("partials/outer.tpl"),
        "[<!-- INCLUDE inner.tpl -->]",
    )
    .unwrap();
    fs::write(
        dir.path().join("page.tpl"),
        "<!-- INCLUDE partials/outer.tpl -->",
    )
    .unwrap();

    let mut engine = Engine::new();
    let tpl = engine.load_from_file(dir.path().join("page.tpl")).unwrap();
    assert_eq!(engine.render(&tpl).unwrap(), "[inner]");
}

#[test]
fn included_files_may_declare_blocks() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("rows.tpl"),
        "<!-- BEGIN ROW -->(${N})<!-- END ROW -->",
    )
    .unwrap();
    fs::write(dir.path().join("page.tpl"), "<!-- INCLUDE rows.tpl -->").unwrap();

    let mut engine = Engine::new();
    let mut tpl = engine.load_from_file(dir.path().join("page.tpl")).unwrap();
    let mut row = tpl.fetch("ROW").unwrap();
    row.assign("N", "1");
    tpl.assign("ROW", row);
    assert_eq!(engine.render(&tpl).unwrap(), "(1)");
}

#[test]
fn missing_include_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("page.tpl"), "<!-- INCLUDE nope.tpl -->").unwrap();

    let mut engine = Engine::new();
    let err = engine
        .load_from_file(dir.path().join("page.tpl"))
        .unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("nope.tpl")),
        other => panic!("expected Io, got: {other}"),
    }
}

#[test]
fn cyclic_includes_hit_the_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.tpl"), "<!-- INCLUDE b.tpl -->").unwrap();
    fs::write(dir.path().join("b.tpl"), "<!-- INCLUDE a.tpl -->").unwrap();

    let mut engine = Engine::new();
    let err = engine.load_from_file(dir.path().join("a.tpl")).unwrap_err();
    assert!(matches!(err, LoadError::IncludeDepthExceeded { .. }));
}

// =============================================================================
// Custom loaders
// =============================================================================

/// In-memory loader keyed by file name.
struct MapLoader(Vec<(&'static str, &'static str)>);

impl SourceLoader for MapLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, content)| (*content).to_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }
}

#[test]
fn loaders_are_pluggable() {
    let loader = MapLoader(vec![
        ("page.tpl", "<!-- INCLUDE part.tpl -->!"),
        ("part.tpl", "from memory"),
    ]);

    let mut engine = Engine::builder().loader(Box::new(loader)).build();
    let tpl = engine.load_from_file("page.tpl").unwrap();
    assert_eq!(engine.render(&tpl).unwrap(), "from memory!");
}
