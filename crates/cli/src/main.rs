mod args;
mod cmd;
mod logging;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "notegen",
    version,
    about = "Create an nb note from a template note",
    after_help = "Any other --<name> <value> option is passed to the template as a variable \
                  (kebab-case names become camelCase, e.g. --project-name -> projectName)."
)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/notegen/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Template note: [notebook:][folder/]<id | filename | title>
    pub template: String,

    /// Filename of the note to create: [notebook:][folder/]<filename>
    pub note: String,

    /// Invocation date, also the base date of the `format` helper
    #[arg(long, default_value_t = today())]
    pub date: String,

    /// Replace the template's first heading with `# <title>`
    #[arg(long)]
    pub title: Option<String>,

    /// Remove the template's first heading when no --title is given
    #[arg(
        long = "removeTitle",
        alias = "remove-title",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value = "true",
        default_missing_value = "true"
    )]
    pub remove_title: bool,

    /// Print the note instead of creating it
    #[arg(
        long = "dry-run",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub dry_run: bool,
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn main() {
    // One command instance, so the default date is computed once.
    let command = Cli::command();
    let (argv, vars) = args::split_vars(std::env::args_os(), &command);
    let matches = command.get_matches_from(argv);
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    cmd::generate::run(cli, vars);
}
