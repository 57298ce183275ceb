//! 渲染集成测试
//!
//! 需要安装 Graphviz (`dot` 在 PATH 中)
//! 运行: `cargo test -p diagram --test render_integration -- --ignored`

use diagram::{overview, DotGenerator, OutputFormat, RenderConfig, RenderError, Renderer, Variant};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_overview_is_deterministic() {
    for variant in [Variant::Hoverdrive, Variant::Datalinker] {
        let first = overview::build(variant).unwrap();
        let second = overview::build(variant).unwrap();

        assert_eq!(first.edge_labels(), second.edge_labels());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(
            DotGenerator::new().generate(&first),
            DotGenerator::new().generate(&second)
        );
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}

#[test]
fn test_variants_differ() {
    let a = overview::build(Variant::Hoverdrive).unwrap();
    let b = overview::build(Variant::Datalinker).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_overview_dot_source() {
    let dot = DotGenerator::new().generate(&overview::build(Variant::Hoverdrive).unwrap());

    assert_eq!(dot.matches("subgraph cluster_").count(), 3);
    assert_eq!(dot.matches(" -> ").count(), 7);
    assert_eq!(dot.matches("[dir=back]").count(), 1);
    for label in ["Rubin Science Platform", "Roundtable", "lsst.io", "dr1.lsst.io", "Users"] {
        assert!(dot.contains(&format!("label=\"{}\"", label)), "missing {}", label);
    }
}

#[test]
fn test_overview_json_model() {
    let diagram = overview::build(Variant::Datalinker).unwrap();
    let json = serde_json::to_value(&diagram).unwrap();

    assert_eq!(json["title"], "");
    assert_eq!(json["direction"], "LR");
    assert_eq!(json["curve_style"], "ortho");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 8);
    assert_eq!(json["nodes"][0]["label"], "datalinker");
    assert_eq!(json["nodes"][0]["kind"], "deployment");
}

#[test]
#[ignore = "requires graphviz"]
fn test_render_png() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("overview");

    let diagram = overview::build(Variant::Hoverdrive).unwrap();
    let target = Renderer::default().render(&diagram, &output, false).expect("render failed");

    assert_eq!(target, dir.path().join("overview.png"));
    let bytes = fs::read(&target).expect("output missing");
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
#[ignore = "requires graphviz"]
fn test_render_twice_overwrites() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("overview");
    let renderer = Renderer::new(RenderConfig::default().with_format(OutputFormat::Svg));
    let diagram = overview::build(Variant::Datalinker).unwrap();

    let first = renderer.render(&diagram, &output, false).unwrap();
    let second = renderer.render(&diagram, &output, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    let svg = fs::read_to_string(&second).unwrap();
    assert!(svg.contains("datalinker"));
}

#[test]
#[ignore = "requires graphviz"]
fn test_render_unwritable_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("missing").join("overview");

    let diagram = overview::build(Variant::Hoverdrive).unwrap();
    let err = Renderer::default().render(&diagram, &output, false).unwrap_err();
    assert!(matches!(err, RenderError::Engine { .. }));
}
