use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_BUILDER: AtomicU64 = AtomicU64::new(0);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("Duplicate node label: {0}")]
    DuplicateLabel(String),
    #[error("Unknown node: #{0}")]
    UnknownNode(usize),
}

pub type Result<T> = std::result::Result<T, BuildError>;

/// 节点句柄，仅对创建它的 builder 有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId {
    #[serde(skip)]
    owner: u64,
    index: usize,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClusterId(usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// 已部署的服务实例
    Deployment,
    /// CDN 前置的文档站点
    CdnEndpoint,
    /// 外部包/库
    Package,
    /// 终端用户
    Users,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub cluster: Option<ClusterId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub label: String,
    pub parent: Option<ClusterId>,
    /// 顶层分组为 0
    pub depth: usize,
}

/// 有向边: `source` 依赖或路由到 `target`
///
/// `reversed` 表示该边以目标在前的方式声明 ("target 被 source 连接")，
/// 绘制时保持声明顺序，只翻转箭头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub reversed: bool,
}

/// Graphviz `rankdir`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

/// Graphviz `splines`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveStyle {
    #[default]
    Ortho,
    Curved,
}

impl CurveStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveStyle::Ortho => "ortho",
            CurveStyle::Curved => "curved",
        }
    }
}

/// 构建完成的图，[`DiagramBuilder::build`] 返回后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    #[serde(skip)]
    owner: u64,
    title: String,
    direction: Direction,
    curve_style: CurveStyle,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn curve_style(&self) -> CurveStyle {
        self.curve_style
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id.owner != self.owner {
            return None;
        }
        self.nodes.get(id.index)
    }

    /// 按标签查找节点
    pub fn find(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// 直接属于 `cluster` 的节点 (`None` 为顶层)
    pub fn members(&self, cluster: Option<ClusterId>) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.cluster == cluster)
    }

    /// 直接嵌套在 `parent` 下的分组 (`None` 为顶层)
    pub fn children(&self, parent: Option<ClusterId>) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.parent == parent)
    }

    /// 以 (源标签, 目标标签) 形式返回所有边
    pub fn edge_labels(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| (self.label(e.source), self.label(e.target)))
            .collect()
    }

    fn label(&self, id: NodeId) -> &str {
        // 加边时已校验 id
        self.nodes[id.index].label.as_str()
    }
}

/// [`Diagram`] 构建器
///
/// 用 [`DiagramBuilder::cluster`] 打开分组，通过返回的 scope 创建的节点归属该分组
pub struct DiagramBuilder {
    diagram: Diagram,
    labels: HashMap<String, NodeId>,
}

impl DiagramBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            diagram: Diagram {
                owner: NEXT_BUILDER.fetch_add(1, Ordering::Relaxed),
                title: title.into(),
                direction: Direction::default(),
                curve_style: CurveStyle::default(),
                nodes: Vec::new(),
                clusters: Vec::new(),
                edges: Vec::new(),
            },
            labels: HashMap::new(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.diagram.direction = direction;
        self
    }

    pub fn curve_style(mut self, style: CurveStyle) -> Self {
        self.diagram.curve_style = style;
        self
    }

    /// 添加不属于任何分组的节点
    pub fn node(&mut self, kind: NodeKind, label: &str) -> Result<NodeId> {
        self.add_node(kind, label, None)
    }

    /// 打开顶层分组
    pub fn cluster(&mut self, label: &str) -> ClusterScope<'_> {
        let id = self.add_cluster(label, None);
        ClusterScope { builder: self, id }
    }

    /// `source` 连接到 `target`
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<()> {
        self.add_edge(source, target, false)
    }

    /// `target` 被 `source` 连接，与 `connect(source, target)` 是同一条边
    pub fn connect_from(&mut self, target: NodeId, source: NodeId) -> Result<()> {
        self.add_edge(source, target, true)
    }

    pub fn build(self) -> Diagram {
        tracing::debug!(
            nodes = self.diagram.nodes.len(),
            clusters = self.diagram.clusters.len(),
            edges = self.diagram.edges.len(),
            "Diagram built"
        );
        self.diagram
    }

    fn add_node(&mut self, kind: NodeKind, label: &str, cluster: Option<ClusterId>) -> Result<NodeId> {
        if self.labels.contains_key(label) {
            return Err(BuildError::DuplicateLabel(label.to_string()));
        }

        let id = NodeId {
            owner: self.diagram.owner,
            index: self.diagram.nodes.len(),
        };
        self.diagram.nodes.push(Node {
            id,
            label: label.to_string(),
            kind,
            cluster,
        });
        self.labels.insert(label.to_string(), id);
        Ok(id)
    }

    fn add_cluster(&mut self, label: &str, parent: Option<ClusterId>) -> ClusterId {
        let depth = parent.map_or(0, |p| self.diagram.clusters[p.0].depth + 1);
        let id = ClusterId(self.diagram.clusters.len());
        self.diagram.clusters.push(Cluster {
            id,
            label: label.to_string(),
            parent,
            depth,
        });
        id
    }

    fn add_edge(&mut self, source: NodeId, target: NodeId, reversed: bool) -> Result<()> {
        for id in [source, target] {
            if id.owner != self.diagram.owner || id.index >= self.diagram.nodes.len() {
                return Err(BuildError::UnknownNode(id.index));
            }
        }
        self.diagram.edges.push(Edge { source, target, reversed });
        Ok(())
    }
}

/// 打开中的分组，drop 前一直借用 builder
pub struct ClusterScope<'a> {
    builder: &'a mut DiagramBuilder,
    id: ClusterId,
}

impl ClusterScope<'_> {
    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn node(&mut self, kind: NodeKind, label: &str) -> Result<NodeId> {
        self.builder.add_node(kind, label, Some(self.id))
    }

    /// 打开嵌套分组
    pub fn cluster(&mut self, label: &str) -> ClusterScope<'_> {
        let id = self.builder.add_cluster(label, Some(self.id));
        ClusterScope { builder: self.builder, id }
    }
}
