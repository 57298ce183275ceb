//! 渲染配置

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 输出格式，作为 `-T<format>` 传给引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    Dot,
}

impl OutputFormat {
    /// 引擎格式名，同时作为文件扩展名
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "dot" => Ok(OutputFormat::Dot),
            other => Err(format!("Unsupported output format: {}", other)),
        }
    }
}

/// 渲染配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// 负责布局和编码的 Graphviz 可执行文件
    pub engine: String,
    pub format: OutputFormat,
    /// 查看器命令，未设置时使用平台默认打开方式
    pub viewer: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: "dot".to_string(),
            format: OutputFormat::Png,
            viewer: None,
        }
    }
}

impl RenderConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[doc(hidden)]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("OVERVIEW_ENGINE").filter(|v| !v.is_empty()) {
            config.engine = v;
        }

        if let Some(v) = lookup("OVERVIEW_FORMAT") {
            match v.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!("Ignoring OVERVIEW_FORMAT: {}", e),
            }
        }

        if let Some(v) = lookup("OVERVIEW_VIEWER").filter(|v| !v.is_empty()) {
            config.viewer = Some(v);
        }

        config
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }
}
