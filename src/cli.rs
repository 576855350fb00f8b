use std::path::PathBuf;
use clap::{Subcommand, Parser, ValueEnum};
use indicatif::ProgressStyle;
use log::LevelFilter;
use crate::resources::DEFAULT_PREFIX;

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Build helpers for the IDE: post-install housekeeping and resource manifests")]
pub struct Cli {
    #[command(subcommand)]
    pub sub_command: CliSubCommand,
    #[clap(env = "BUILD_AUX_LOG", long, default_value = "info", global = true, ignore_case = true)]
    pub rust_log: LogLevel,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CliSubCommand {
    /// Refresh icon cache, schemas and mime database after installing
    PostInstall {
        /// Installed data directory, usually <prefix>/share
        datadir: PathBuf,
        /// Staging root; when set the hook does nothing
        #[clap(env = "DESTDIR", long)]
        destdir: Option<String>,
    },
    /// Read a file list from stdin and print a resource manifest
    ResourceList {
        #[clap(env = "RESOURCE_PREFIX", long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Walk the source tree and write a resource manifest to OUTPUT
    ResourceTree {
        srcdir: PathBuf,
        output: PathBuf,
        #[clap(env = "RESOURCE_PREFIX", long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub fn walk_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix.bold.dim} {spinner} {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
}
