// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-viewer")]
#[command(about = "Real-time 3D scene viewer with modal camera and mirror", long_about = None)]
pub struct Cli {
    /// Window width in physical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in physical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// JSON file overriding the built-in tunables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
