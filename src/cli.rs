//! Command-line interface module for dirclean.
//!
//! This module handles:
//! - Argument parsing
//! - Building the organizer from the arguments
//! - Printing the run summary

use crate::error::OrganizeResult;
use crate::organizer::{DirectoryOrganizer, FailurePolicy, OrganizeOptions, OrganizeSummary};
use crate::output::{OutputFormatter, plural_files};
use crate::report::{ConsoleReporter, LogReporter};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Tidy a directory by moving each file into a folder named after its type.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirclean", version, about)]
pub struct Cli {
    /// Directory whose top-level files should be organized
    pub directory: PathBuf,

    /// Category map (JSON or TOML: category = [extensions])
    #[arg(short, long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Show what would be moved without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep organizing when a file cannot be moved
    #[arg(short, long)]
    pub keep_going: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Run options derived from the flags.
    pub fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            dry_run: self.dry_run,
            on_error: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
        }
    }

    /// Default log filter for the chosen verbosity. `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Runs one organization pass as described by the parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirclean::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirclean", "/path/to/directory", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(summary) => println!("{} files", summary.moved.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> OrganizeResult<OrganizeSummary> {
    let organizer =
        DirectoryOrganizer::new(&cli.directory, cli.map.as_deref())?.with_options(cli.options());

    if cli.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            cli.directory.display()
        ));
    } else {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            cli.directory.display()
        ));
    }

    let summary = if cli.no_progress {
        organizer.organize(&mut LogReporter)?
    } else {
        organizer.organize(&mut ConsoleReporter::new())?
    };

    print_summary(&summary, &cli.directory);
    Ok(summary)
}

fn print_summary(summary: &OrganizeSummary, directory: &Path) {
    if summary.moved.is_empty() && summary.failed.is_empty() {
        OutputFormatter::info("No files found to organize.");
        return;
    }

    if summary.dry_run {
        OutputFormatter::header("DRY RUN: Files would be organized as follows:");
        for planned in &summary.moved {
            println!(" - {}", planned.name);
            println!("   → Would move to {}/", planned.category);
        }
    }

    if !summary.failed.is_empty() {
        OutputFormatter::header("FAILED");
        for (path, reason) in &summary.failed {
            OutputFormatter::error(&format!("{}: {}", path.display(), reason));
        }
    }

    OutputFormatter::summary_table(&summary.category_counts(), summary.moved.len());

    if summary.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
        println!(
            "Run 'dirclean {}' (without --dry-run) to execute the organization.",
            directory.display()
        );
    } else if summary.is_complete_success() {
        OutputFormatter::success("Organization complete!");
    } else {
        OutputFormatter::warning(&format!(
            "{} {} could not be organized. Please review errors above.",
            summary.failed.len(),
            plural_files(summary.failed.len())
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["dirclean", "/tmp/downloads"]).unwrap();
        assert_eq!(cli.directory, PathBuf::from("/tmp/downloads"));
        assert_eq!(cli.map, None);
        assert_eq!(cli.options(), OrganizeOptions::default());
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "dirclean",
            "/tmp/downloads",
            "--map",
            "map.toml",
            "--dry-run",
            "--keep-going",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.map, Some(PathBuf::from("map.toml")));
        assert_eq!(
            cli.options(),
            OrganizeOptions {
                dry_run: true,
                on_error: FailurePolicy::Continue,
            }
        );
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dirclean", "/tmp", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["dirclean", "/tmp", "-q"]).unwrap();
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Cli::try_parse_from(["dirclean"]).is_err());
    }
}
