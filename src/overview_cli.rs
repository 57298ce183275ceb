//! Diagram generation command

use clap::{Args, ValueEnum};
use diagram::{overview, DotGenerator, OutputFormat, RenderConfig, Renderer, Variant};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OverviewArgs {
    /// Output file path, without extension
    pub output_path: PathBuf,
    /// Open the rendered image when "true" (case-insensitive)
    pub show: String,
    /// Diagram variant
    #[arg(long, value_enum, default_value_t = Variant::Hoverdrive)]
    pub variant: Variant,
    /// Image format (default: $OVERVIEW_FORMAT or png)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Print the diagram to stdout instead of rendering it
    #[arg(long, value_enum)]
    pub print: Option<PrintMode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrintMode {
    /// Graphviz DOT source
    Dot,
    /// Diagram model as JSON
    Json,
}

pub fn run(args: OverviewArgs) -> anyhow::Result<()> {
    let diagram = overview::build(args.variant)?;
    tracing::debug!(variant = ?args.variant, fingerprint = %diagram.fingerprint(), "Built overview");

    match args.print {
        Some(PrintMode::Dot) => {
            print!("{}", DotGenerator::new().generate(&diagram));
            return Ok(());
        }
        Some(PrintMode::Json) => {
            println!("{}", serde_json::to_string_pretty(&diagram)?);
            return Ok(());
        }
        None => {}
    }

    let config = render_config(RenderConfig::from_env(), args.format);
    let show = overview::show_flag(&args.show);
    let target = Renderer::new(config).render(&diagram, &args.output_path, show)?;
    println!("Saved to: {}", target.display());

    Ok(())
}

/// Command-line flags take precedence over the environment
fn render_config(base: RenderConfig, format: Option<OutputFormat>) -> RenderConfig {
    match format {
        Some(format) => base.with_format(format),
        None => base,
    }
}
