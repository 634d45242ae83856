use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct GeometryArgs {
    /// Left page margin of the PDF, e.g. 2cm
    #[clap(long = "geometry-left", value_name = "LENGTH")]
    pub left: Option<String>,
    /// Right page margin of the PDF
    #[clap(long = "geometry-right", value_name = "LENGTH")]
    pub right: Option<String>,
    /// Top page margin of the PDF
    #[clap(long = "geometry-top", value_name = "LENGTH")]
    pub top: Option<String>,
    /// Bottom page margin of the PDF
    #[clap(long = "geometry-bottom", value_name = "LENGTH")]
    pub bottom: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Only build these language editions (defaults to every configured language)
    #[clap(short, long = "language", value_name = "ID")]
    pub languages: Vec<String>,

    /// Stop at the first edition that fails instead of moving on to the next one
    #[clap(long)]
    pub fail_fast: bool,

    #[clap(flatten)]
    pub geometry: GeometryArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds the PDF and EPUB books for each language edition
    Build(BuildArgs),
    /// Lists the chapters of a language edition in book order
    Chapters {
        /// The language edition to list
        #[clap(short, long, value_name = "ID")]
        language: String,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Build configuration (defaults are used if the file doesn't exist)
    #[clap(long, env = "VK_EBOOK_CONFIG", default_value = "ebook.toml", global = true)]
    pub config: PathBuf,

    /// Log debug output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Write the log to this file instead of the terminal
    #[clap(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "vk-ebook",
            "build",
            "-l",
            "en",
            "--language",
            "fr",
            "--fail-fast",
            "--geometry-left",
            "2cm",
        ])
        .expect("valid arguments");

        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.languages, vec!["en".to_string(), "fr".to_string()]);
                assert!(args.fail_fast);
                assert_eq!(args.geometry.left.as_deref(), Some("2cm"));
                assert_eq!(args.geometry.right, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn chapters_requires_a_language() {
        assert!(Cli::try_parse_from(["vk-ebook", "chapters"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
