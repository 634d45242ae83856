//! Process-wide logging through `env_logger`.
//!
//! `init` is called once at the top of `main` and `flush` once at the very end,
//! so a log file always receives every record even when the build fails.

use anyhow::{Context, Result};
use log::LevelFilter;
use std::io::Write;
use std::path::Path;

/// Where log records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// stderr, alongside everything else printed to the user
    Terminal,
    File,
}

impl Destination {
    pub fn for_log_file(log_file: Option<&Path>) -> Destination {
        match log_file {
            Some(_) => Destination::File,
            None => Destination::Terminal,
        }
    }

    /// Whether an error that was logged has already been shown to the user.
    pub fn reaches_terminal(self) -> bool {
        self == Destination::Terminal
    }
}

pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Destination> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<8} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .with_context(|| "Failed to initialise logging")?;
    Ok(Destination::for_log_file(log_file))
}

pub fn flush() {
    log::logger().flush();
}
