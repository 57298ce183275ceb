use crate::model::{Cluster, Diagram, Edge, Node, NodeId, NodeKind};

/// 分组背景色，按嵌套深度循环
const CLUSTER_BGCOLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

const FONT: &str = "Sans-Serif";
const FONT_COLOR: &str = "#2D3436";
const EDGE_COLOR: &str = "#7B8894";
const CLUSTER_PEN_COLOR: &str = "#AEB6BE";

/// Graphviz DOT 源码生成器
pub struct DotGenerator {
    indent: usize,
}

impl DotGenerator {
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// 生成整张图的 DOT 源码
    pub fn generate(&self, diagram: &Diagram) -> String {
        let mut lines = vec![format!("digraph {} {{", Self::quote(diagram.title()))];

        lines.push(self.line(1, &format!(
            "graph [label={}, rankdir={}, splines={}, pad=\"2.0\", nodesep=\"0.60\", ranksep=\"0.75\", fontname={}, fontsize=\"15\", fontcolor={}]",
            Self::quote(diagram.title()),
            diagram.direction().as_str(),
            diagram.curve_style().as_str(),
            Self::quote(FONT),
            Self::quote(FONT_COLOR),
        )));
        lines.push(self.line(1, &format!(
            "node [shape=box, style=\"rounded,filled\", fontname={}, fontsize=\"13\", fontcolor={}]",
            Self::quote(FONT),
            Self::quote(FONT_COLOR),
        )));
        lines.push(self.line(1, &format!("edge [color={}]", Self::quote(EDGE_COLOR))));

        for cluster in diagram.children(None) {
            self.push_cluster(diagram, cluster, 1, &mut lines);
        }

        for node in diagram.members(None) {
            lines.push(self.line(1, &Self::node_stmt(node)));
        }

        for edge in diagram.edges() {
            lines.push(self.line(1, &Self::edge_stmt(edge)));
        }

        lines.push("}".to_string());
        let mut source = lines.join("\n");
        source.push('\n');
        source
    }

    fn push_cluster(&self, diagram: &Diagram, cluster: &Cluster, level: usize, lines: &mut Vec<String>) {
        lines.push(self.line(level, &format!("subgraph cluster_{} {{", cluster.id.index())));

        let inner = level + 1;
        lines.push(self.line(inner, &format!(
            "graph [label={}, labeljust=l, style=rounded, bgcolor={}, pencolor={}, fontname={}, fontsize=\"12\"]",
            Self::quote(&cluster.label),
            Self::quote(Self::cluster_bgcolor(cluster.depth)),
            Self::quote(CLUSTER_PEN_COLOR),
            Self::quote(FONT),
        )));

        for child in diagram.children(Some(cluster.id)) {
            self.push_cluster(diagram, child, inner, lines);
        }

        for node in diagram.members(Some(cluster.id)) {
            lines.push(self.line(inner, &Self::node_stmt(node)));
        }

        lines.push(self.line(level, "}"));
    }

    fn node_stmt(node: &Node) -> String {
        let (shape, fill) = Self::node_style(node.kind);
        format!(
            "{} [label={}, shape={}, fillcolor={}]",
            Self::node_id(node.id),
            Self::quote(&node.label),
            shape,
            Self::quote(fill),
        )
    }

    fn edge_stmt(edge: &Edge) -> String {
        // 反向声明的边保持声明顺序，只翻转箭头
        if edge.reversed {
            format!("{} -> {} [dir=back]", Self::node_id(edge.target), Self::node_id(edge.source))
        } else {
            format!("{} -> {}", Self::node_id(edge.source), Self::node_id(edge.target))
        }
    }

    fn line(&self, level: usize, text: &str) -> String {
        format!("{}{}", " ".repeat(level * self.indent), text)
    }

    #[doc(hidden)]
    pub fn node_style(kind: NodeKind) -> (&'static str, &'static str) {
        match kind {
            NodeKind::Deployment => ("box", "#C9D8F8"),
            NodeKind::CdnEndpoint => ("hexagon", "#F9D8D2"),
            NodeKind::Package => ("note", "#FFF3C4"),
            NodeKind::Users => ("oval", "#E4E7EA"),
        }
    }

    #[doc(hidden)]
    pub fn cluster_bgcolor(depth: usize) -> &'static str {
        CLUSTER_BGCOLORS[depth % CLUSTER_BGCOLORS.len()]
    }

    #[doc(hidden)]
    pub fn node_id(id: NodeId) -> String {
        format!("n{}", id.index())
    }

    /// 加引号并转义 DOT 字符串
    #[doc(hidden)]
    pub fn quote(text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

impl Default for DotGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// 结构哈希 (DOT 源码的 SHA256 前16位)
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(DotGenerator::new().generate(self).as_bytes());
        let result = hasher.finalize();
        result[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}
