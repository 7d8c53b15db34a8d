//! Command-line and environment arguments.

use clap::Parser;
use plainwiki_core::config::DEFAULT_LISTEN_ADDR;
use plainwiki_core::{default_log_level, WikiConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plainwiki")]
#[command(version)]
#[command(about = "Serve editable text pages stored as one file per title")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "PLAINWIKI_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub addr: String,

    /// Directory holding `<title>.txt` page files.
    #[arg(long, env = "PLAINWIKI_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory holding `view.html` and `edit.html`.
    #[arg(long, env = "PLAINWIKI_TEMPLATE_DIR", default_value = ".")]
    pub template_dir: PathBuf,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "PLAINWIKI_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when omitted.
    #[arg(long, env = "PLAINWIKI_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> WikiConfig {
        WikiConfig {
            listen_addr: self.addr,
            data_dir: self.data_dir,
            template_dir: self.template_dir,
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir,
        }
    }
}
