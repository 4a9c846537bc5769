//! Command-line interface definitions for spatialctl.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use logging::LogArgs;
use spatial::{OcclusionMode, Size, arrange::Strategy};

/// Command-line interface for the `spatialctl` binary.
#[derive(Parser, Debug)]
#[command(
    name = "spatialctl",
    about = "Offline diagnostics for the spatial layout engine",
    version
)]
pub struct Cli {
    /// Logging controls shared across workspace binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Engine configuration file (RON).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Which diagnostic to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a window snapshot as a symbolic grid.
    Encode(EncodeArgs),
    /// Parse a grid out of free text into move commands.
    Decode(DecodeArgs),
    /// Report overlaps and clickable-area violations.
    Occlusion(OcclusionArgs),
    /// Plan an arrangement for one display.
    Arrange(ArrangeArgs),
    /// Check a layout preset against known minimum sizes.
    Feasibility(FeasibilityArgs),
}

/// Window snapshot input shared by several commands.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// JSON array of window states; `-` reads stdin.
    #[arg(long, short = 'w', value_name = "PATH")]
    pub windows: PathBuf,
}

/// Arguments for `encode`.
#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Window snapshot.
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Screen size, e.g. `1920x1080`.
    #[arg(long, value_parser = parse_screen, value_name = "WxH")]
    pub screen: Size,

    /// Take the file order as back-to-front instead of sorting by layer.
    #[arg(long)]
    pub as_given: bool,
}

/// Arguments for `decode`.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Text containing a grid block; `-` reads stdin.
    #[arg(value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Screen size, e.g. `1920x1080`.
    #[arg(long, value_parser = parse_screen, value_name = "WxH")]
    pub screen: Size,
}

/// Occlusion combination mode on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    /// Subtract each higher overlap in turn.
    Sequential,
    /// Subtract the exact union of higher overlaps.
    Union,
}

impl From<ModeArg> for OcclusionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => Self::Sequential,
            ModeArg::Union => Self::Union,
        }
    }
}

/// Arguments for `occlusion`.
#[derive(Args, Debug, Clone)]
pub struct OcclusionArgs {
    /// Window snapshot.
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Override the configured combination mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// Arrangement strategy on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StrategyArg {
    /// Pick by window count and screen shape.
    Auto,
    /// Non-overlapping tiles.
    Tiled,
    /// Importance-ordered cascade.
    Cascade,
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Tiled => Self::Tiled,
            StrategyArg::Cascade => Self::Cascade,
        }
    }
}

/// Arguments for `arrange`.
#[derive(Args, Debug, Clone)]
pub struct ArrangeArgs {
    /// Window snapshot.
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Size of every display, e.g. `1920x1080`.
    #[arg(long, value_parser = parse_screen, value_name = "WxH")]
    pub screen: Size,

    /// Display to arrange.
    #[arg(long, default_value_t = 0)]
    pub display: usize,

    /// Override the configured strategy.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Most-recently-focused apps, most recent first.
    #[arg(long, value_delimiter = ',', value_name = "APP,...")]
    pub recent: Vec<String>,
}

/// Arguments for `feasibility`.
#[derive(Args, Debug, Clone)]
pub struct FeasibilityArgs {
    /// Window snapshot.
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Screen size, e.g. `1920x1080`.
    #[arg(long, value_parser = parse_screen, value_name = "WxH")]
    pub screen: Size,

    /// Layout preset: full, halves, thirds, main-sidebar, quadrants.
    #[arg(long, default_value = "halves")]
    pub layout: String,
}

/// Parse `WIDTHxHEIGHT` into a size.
pub fn parse_screen(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n > 0.0)
            .ok_or_else(|| format!("invalid dimension '{v}' in '{s}'"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}
