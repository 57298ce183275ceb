//! Rubin 文档架构总览图
//!
//! 文档从包经 CDN 站点和 Roundtable 的 `ook` 服务流入 Science Platform，再提供给用户

use crate::model::{CurveStyle, Diagram, DiagramBuilder, Direction, NodeKind, Result};
use clap::ValueEnum;
use serde::Serialize;

/// 总览图的两个版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// `hoverdrive` 服务，自下而上布局，曲线边
    #[default]
    Hoverdrive,
    /// `datalinker` 服务，引擎默认布局
    Datalinker,
}

impl Variant {
    /// 由 `ook` 输入、输出到 `tap` 的服务名
    pub fn service(self) -> &'static str {
        match self {
            Variant::Hoverdrive => "hoverdrive",
            Variant::Datalinker => "datalinker",
        }
    }
}

/// 仅当 show 参数为 "true" (不区分大小写) 时打开查看器
pub fn show_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// 构建总览图
pub fn build(variant: Variant) -> Result<Diagram> {
    let mut builder = DiagramBuilder::new("");
    if variant == Variant::Hoverdrive {
        builder = builder
            .direction(Direction::BottomTop)
            .curve_style(CurveStyle::Curved);
    }

    let (service, portal, tap) = {
        let mut rsp = builder.cluster("Rubin Science Platform");
        (
            rsp.node(NodeKind::Deployment, variant.service())?,
            rsp.node(NodeKind::Deployment, "portal")?,
            rsp.node(NodeKind::Deployment, "tap")?,
        )
    };
    let ook = builder.cluster("Roundtable").node(NodeKind::Deployment, "ook")?;
    let dr1 = builder.cluster("lsst.io").node(NodeKind::CdnEndpoint, "dr1.lsst.io")?;

    let documenteer = builder.node(NodeKind::Package, "documenteer")?;
    let sdm_schemas = builder.node(NodeKind::Package, "sdm_schemas")?;

    builder.connect(documenteer, dr1)?;
    builder.connect(dr1, ook)?;
    builder.connect_from(service, ook)?;
    builder.connect(sdm_schemas, tap)?;
    builder.connect(tap, portal)?;
    builder.connect(service, tap)?;
    let users = builder.node(NodeKind::Users, "Users")?;
    builder.connect(portal, users)?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn edge_set(diagram: &Diagram) -> HashSet<(String, String)> {
        diagram
            .edge_labels()
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect()
    }

    fn expected_edges(service: &str) -> HashSet<(String, String)> {
        [
            ("documenteer", "dr1.lsst.io"),
            ("dr1.lsst.io", "ook"),
            ("ook", service),
            ("sdm_schemas", "tap"),
            ("tap", "portal"),
            (service, "tap"),
            ("portal", "Users"),
        ]
        .into_iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
    }

    #[test]
    fn test_show_flag() {
        for value in ["true", "True", "TRUE", "tRuE"] {
            assert!(show_flag(value), "{value}");
        }
        for value in ["false", "", "1", "yes", " true"] {
            assert!(!show_flag(value), "{value:?}");
        }
    }

    #[test]
    fn test_hoverdrive_counts() {
        let diagram = build(Variant::Hoverdrive).unwrap();
        assert_eq!(diagram.clusters().len(), 3);
        assert_eq!(diagram.nodes().len(), 8);
        assert_eq!(diagram.nodes().iter().filter(|n| n.cluster.is_some()).count(), 5);
        assert_eq!(diagram.edges().len(), 7);
    }

    #[test]
    fn test_cluster_membership() {
        let diagram = build(Variant::Hoverdrive).unwrap();
        let members = |label: &str| -> Vec<String> {
            let cluster = diagram.clusters().iter().find(|c| c.label == label).unwrap();
            diagram.members(Some(cluster.id)).map(|n| n.label.clone()).collect()
        };

        assert_eq!(members("Rubin Science Platform"), ["hoverdrive", "portal", "tap"]);
        assert_eq!(members("Roundtable"), ["ook"]);
        assert_eq!(members("lsst.io"), ["dr1.lsst.io"]);

        let top: Vec<_> = diagram.members(None).map(|n| (n.label.as_str(), n.kind)).collect();
        assert_eq!(
            top,
            [
                ("documenteer", NodeKind::Package),
                ("sdm_schemas", NodeKind::Package),
                ("Users", NodeKind::Users),
            ]
        );
    }

    #[test]
    fn test_hoverdrive_edges() {
        let diagram = build(Variant::Hoverdrive).unwrap();
        assert_eq!(edge_set(&diagram), expected_edges("hoverdrive"));
    }

    #[test]
    fn test_datalinker_edges() {
        let diagram = build(Variant::Datalinker).unwrap();
        assert_eq!(edge_set(&diagram), expected_edges("datalinker"));
        assert!(diagram.find("hoverdrive").is_none());
        assert_eq!(diagram.nodes().len(), 8);
    }

    #[test]
    fn test_layout_options() {
        let a = build(Variant::Hoverdrive).unwrap();
        assert_eq!(a.title(), "");
        assert_eq!(a.direction(), Direction::BottomTop);
        assert_eq!(a.curve_style(), CurveStyle::Curved);

        let b = build(Variant::Datalinker).unwrap();
        assert_eq!(b.direction(), Direction::default());
        assert_eq!(b.curve_style(), CurveStyle::default());
    }

    #[test]
    fn test_ook_edge_declared_reversed() {
        let diagram = build(Variant::Hoverdrive).unwrap();
        let reversed: Vec<_> = diagram
            .edges()
            .iter()
            .filter(|e| e.reversed)
            .map(|e| diagram.node(e.source).unwrap().label.as_str())
            .collect();
        assert_eq!(reversed, ["ook"]);
    }

    #[test]
    fn test_variant_service() {
        assert_eq!(Variant::default(), Variant::Hoverdrive);
        assert_eq!(Variant::Datalinker.service(), "datalinker");
    }
}
