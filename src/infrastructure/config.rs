use std::path::PathBuf;

use clap::Parser;

use crate::application::Settings;
use crate::domain::Stage;

/// Launch options for the job application board.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "jobb", version, about = "Track job applications on a terminal kanban board")]
pub struct Config {
    /// Terminal widths below this many columns use the compact one-column layout
    #[arg(long, env = "JOBB_COMPACT_WIDTH", default_value_t = 100)]
    pub compact_width: u16,

    /// Directory for log files (defaults to a folder under the system temp dir)
    #[arg(long, env = "JOBB_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Stage column the cursor starts on, by label (e.g. "Phone Interview")
    #[arg(long, env = "JOBB_START_STAGE", default_value_t = Stage::first())]
    pub start_stage: Stage,

    /// Do not capture the mouse; cards can still be moved with the keyboard
    #[arg(long)]
    pub no_mouse: bool,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            compact_width: self.compact_width,
            start_stage: self.start_stage,
        }
    }

    pub fn mouse_enabled(&self) -> bool {
        !self.no_mouse
    }
}
