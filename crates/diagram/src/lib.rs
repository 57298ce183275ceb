//! diagram - 架构图
//!
//! 分组节点建图、DOT 序列化、调用 `dot` 渲染

mod config;
mod dot;
mod model;
mod render;

pub mod overview;

pub use config::{OutputFormat, RenderConfig};
pub use dot::DotGenerator;
pub use model::{
    BuildError, Cluster, ClusterId, ClusterScope, CurveStyle, Diagram, DiagramBuilder, Direction, Edge, Node,
    NodeId, NodeKind,
};
pub use overview::Variant;
pub use render::{RenderError, Renderer};
