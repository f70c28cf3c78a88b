//! Integration tests for the engine session lifecycle.

use weft::{Engine, RenderError};

// =============================================================================
// Session reset
// =============================================================================

#[test]
fn loading_a_new_root_resets_global_scope() {
    let mut engine = Engine::new();
    let tpl = engine.load_from_str("=${G}=").unwrap();
    engine.assign_global("G", "one");
    assert_eq!(engine.render(&tpl).unwrap(), "=one=");

    let fresh = engine.load_from_str("=${G}=").unwrap();
    assert_eq!(engine.render(&fresh).unwrap(), "==");
}

#[test]
fn loading_a_new_root_resets_parameters() {
    let mut engine = Engine::new();
    engine
        .load_from_str("<!-- PARAMETER mode 'debug' -->")
        .unwrap();
    assert!(engine.is_parameter_set("mode"));

    engine.load_from_str("plain").unwrap();
    assert!(!engine.is_parameter_set("mode"));
}

#[test]
fn default_formatter_survives_reload() {
    let mut engine = Engine::new();
    engine.set_default_formatter(Some("Upper"));

    let mut tpl = engine.load_from_str("${A}").unwrap();
    tpl.assign("A", "x");
    assert_eq!(engine.render(&tpl).unwrap(), "X");
}

// =============================================================================
// Rendering lifecycle
// =============================================================================

#[test]
fn the_same_template_renders_under_changing_globals() {
    let mut engine = Engine::new();
    let tpl = engine.load_from_str("${G}").unwrap();

    engine.assign_global("G", "first");
    assert_eq!(engine.render(&tpl).unwrap(), "first");

    engine.assign_global("G", "second");
    assert_eq!(engine.render(&tpl).unwrap(), "second");
}

#[test]
fn deep_block_nesting_is_bounded() {
    let mut engine = Engine::builder().max_render_depth(2).build();
    let base = engine.load_from_str("${X}").unwrap();

    let mut level3 = base.clone();
    level3.assign("X", "bottom");
    let mut level2 = base.clone();
    level2.assign("X", level3);
    let mut level1 = base.clone();
    level1.assign("X", level2);
    let mut root = base;
    root.assign("X", level1);

    let err = engine.render(&root).unwrap_err();
    assert!(matches!(err, RenderError::MaxDepthExceeded));
}

#[test]
fn nesting_under_the_limit_renders() {
    let mut engine = Engine::new();
    let base = engine.load_from_str("${X}").unwrap();

    let mut inner = base.clone();
    inner.assign("X", "bottom");
    let mut root = base;
    root.assign("X", inner);

    assert_eq!(engine.render(&root).unwrap(), "bottom");
}

// =============================================================================
// Builder configuration
// =============================================================================

#[test]
fn builder_sets_default_formatter() {
    let mut engine = Engine::builder().default_formatter("Lower").build();
    let mut tpl = engine.load_from_str("${A}").unwrap();
    tpl.assign("A", "ABC");
    assert_eq!(engine.render(&tpl).unwrap(), "abc");
}

#[test]
fn builder_defaults() {
    let engine = Engine::builder().max_include_depth(4).build();
    assert!(engine.default_formatter().is_none());
    assert!(engine.formatters().has("Html"));
}
