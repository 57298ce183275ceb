use crate::config::RenderConfig;
use crate::dot::DotGenerator;
use crate::model::Diagram;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Graphviz engine not found: {0}")]
    EngineNotFound(String),
    #[error("Graphviz engine failed ({status}): {stderr}")]
    Engine { status: ExitStatus, stderr: String },
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// 渲染器 - 通过 Graphviz 引擎布局并输出图片
pub struct Renderer {
    config: RenderConfig,
    generator: DotGenerator,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            generator: DotGenerator::new(),
        }
    }

    /// 渲染到 `<output>.<format>` 并返回该路径
    ///
    /// `show` 为 true 时随后用查看器打开生成的文件
    pub fn render(&self, diagram: &Diagram, output: &Path, show: bool) -> Result<PathBuf> {
        let source = self.generator.generate(diagram);
        let target = self.target_path(output);

        self.run_engine(&source, &target)?;
        tracing::info!("Rendered {}", target.display());

        if show {
            self.open(&target);
        }

        Ok(target)
    }

    /// 追加格式扩展名后的输出路径
    pub fn target_path(&self, output: &Path) -> PathBuf {
        let mut name = OsString::from(output.as_os_str());
        name.push(".");
        name.push(self.config.format.as_str());
        PathBuf::from(name)
    }

    fn run_engine(&self, source: &str, target: &Path) -> Result<()> {
        let engine = &self.config.engine;
        tracing::debug!("Running {} -T{} -o {}", engine, self.config.format, target.display());

        let mut child = Command::new(engine)
            .arg(format!("-T{}", self.config.format))
            .arg("-o")
            .arg(target)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RenderError::EngineNotFound(engine.clone()),
                _ => RenderError::Io(e),
            })?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                RenderError::Io(std::io::Error::new(ErrorKind::BrokenPipe, "engine stdin unavailable"))
            })?;
            // 引擎可能未读完就退出，以退出状态为准
            if let Err(e) = stdin.write_all(source.as_bytes()) {
                tracing::warn!("Writing DOT source to {} failed: {}", engine, e);
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Engine {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }

    fn open(&self, target: &Path) {
        let mut command = match &self.config.viewer {
            Some(viewer) => Command::new(viewer),
            None => Self::platform_opener(),
        };
        command.arg(target);

        match command.status() {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!("Viewer exited with {}", status),
            Err(e) => tracing::warn!("Could not open {}: {}", target.display(), e),
        }
    }

    fn platform_opener() -> Command {
        if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else {
            Command::new("xdg-open")
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
