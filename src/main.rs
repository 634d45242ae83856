use anyhow::{anyhow, Result};
use cli::{Cli, GeometryArgs};
use config::{Configuration, Geometry};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;

mod assemble;
mod chapters;
mod cli;
mod config;
mod driver;
mod error;
mod images;
mod logging;
mod sinks;
#[cfg(all(test, unix))]
mod test_helpers;
mod tool;

fn main() -> ExitCode {
    use clap::Parser;
    let cli = Cli::parse();

    let destination = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(destination) => destination,
        Err(e) => {
            eprintln!("{}: {e:#}", console::style("Error").red());
            return ExitCode::FAILURE;
        }
    };

    let result = try_main(cli, destination);
    if let Err(e) = &result {
        if !destination.reaches_terminal() {
            log::error!("{e:#}");
        }
        eprintln!("{}: {e:#}", console::style("Error").red());
    }
    logging::flush();

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn apply_geometry(geometry: &mut Geometry, args: GeometryArgs) {
    let GeometryArgs {
        left,
        right,
        top,
        bottom,
    } = args;
    for (side, value) in [
        (&mut geometry.left, left),
        (&mut geometry.right, right),
        (&mut geometry.top, top),
        (&mut geometry.bottom, bottom),
    ] {
        if let Some(value) = value {
            *side = value;
        }
    }
}

fn try_main(cli: Cli, destination: logging::Destination) -> Result<()> {
    let mut config = Configuration::load(&cli.config)?;

    match cli.command {
        cli::Commands::Chapters { language } => {
            for chapter in driver::chapters(&config, &language)? {
                println!(
                    "{:<16} {}{}",
                    chapter.order_key,
                    "  ".repeat(chapter.depth),
                    chapter.title
                );
            }
            Ok(())
        }
        cli::Commands::Build(args) => {
            apply_geometry(&mut config.geometry, args.geometry);
            let languages = driver::select_languages(config.languages()?, &args.languages)?;

            let progress = if cli.verbose {
                ProgressBar::hidden()
            } else {
                ProgressBar::new(languages.len() as u64)
            };
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("can parse progress style")
                    .progress_chars("#>-"),
            );

            let report = driver::build(&config, &languages, args.fail_fast, &progress)?;
            progress.finish_and_clear();

            if !report.artifacts.is_empty() {
                println!("Built:");
                for artifact in &report.artifacts {
                    println!("  {}", artifact.display());
                }
            }

            if report.failures.is_empty() {
                log::info!("done");
                Ok(())
            } else {
                // the driver has already logged each failure
                if !destination.reaches_terminal() {
                    for (language, e) in &report.failures {
                        eprintln!("{} '{language}': {e:#}", console::style("Failed").red());
                    }
                }
                Err(anyhow!(
                    "{} of {} edition(s) failed",
                    report.failures.len(),
                    languages.len()
                ))
            }
        }
    }
}
