// src/cli.rs
use anyhow::{Context as _, Result};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, load_config};
use crate::core::batch::{add_tag, cleanup, delete_empty, find_replace};
use crate::core::mutation::{Engine, preview};
use crate::core::organize::{RenamePattern, Strategy, plan_organize, plan_rename};
use crate::core::properties::{PropertySteps, plan_properties};
use crate::core::report::{build_report, render};
use crate::core::scanner::{Scanner, analyze};
use crate::models::{DateField, FileRecord, Operation};
use crate::session::Session;
use crate::utils::{format_apply_report, format_vault, print_paths, print_progress};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Vault directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    /// More log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Apply planned changes instead of only previewing them
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Only preview, even when --yes is given
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Do not keep backups; deletes become permanent
    #[arg(long, global = true)]
    pub no_backup: bool,

    /// Number of planned operations to list before applying
    #[arg(short, long, global = true)]
    pub preview: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check whether a directory looks like a vault
    Analyze {
        /// Directory to inspect (defaults to --directory or the current directory)
        path: Option<PathBuf>,
    },
    /// List markdown files in the vault
    List {
        /// List directories instead of files
        #[arg(long)]
        dirs: bool,
    },
    /// Move notes into organized/<strategy>/...
    Organize {
        #[arg(value_enum)]
        by: OrganizeBy,
        /// Path template for `custom`, e.g. "{type}/{year}"
        #[arg(long)]
        pattern: Option<String>,
        /// Timestamp used by `date` (defaults to the config value)
        #[arg(long, value_enum)]
        field: Option<DateField>,
    },
    /// Rename notes in place
    Rename {
        #[arg(value_enum)]
        pattern: RenamePattern,
    },
    /// Standardize, clean, complete and sort frontmatter properties (all by default)
    Properties {
        #[arg(long)]
        standardize: bool,
        #[arg(long)]
        clean: bool,
        #[arg(long)]
        add_missing: bool,
        #[arg(long)]
        sort: bool,
    },
    /// Find and replace text in note bodies
    Replace {
        find: String,
        replace: String,
        /// Treat FIND as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(short, long)]
        ignore_case: bool,
    },
    /// Trim trailing whitespace and collapse blank lines
    Cleanup,
    /// Add a tag to every note's frontmatter
    Tag { tag: String },
    /// Delete notes with no body and no frontmatter
    DeleteEmpty,
    /// Write a vault health report
    Report {
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeBy {
    Date,
    Tag,
    Type,
    Size,
    Custom,
}

impl Args {
    fn start_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    const fn should_apply(&self) -> bool {
        self.yes && !self.dry_run
    }

    /// Config with command-line overrides applied.
    fn effective_config(&self, mut config: Config) -> Config {
        if self.no_backup {
            config.backup = false;
        }
        if let Some(limit) = self.preview {
            config.preview_limit = limit;
        }
        config
    }
}

/// Runs one command.
///
/// # Errors
///
/// This function may return an error if:
/// * The directory is not a vault
/// * The config or ignore file is invalid
/// * A pattern or tag argument is invalid
/// * The report file cannot be written
pub fn run(args: Args) -> Result<()> {
    let mut session = Session::default();

    if let Command::Analyze { path } = &args.command {
        let dir = path.clone().unwrap_or_else(|| args.start_dir());
        let vault = analyze(&dir);
        println!("{}", format_vault(&vault));
        if !session.set_current_vault(vault) {
            println!("Not a vault: no .obsidian folder and no markdown files");
        }
        return Ok(());
    }

    session.set_current_vault(analyze(&args.start_dir()));
    let root = session.resolve_vault(None)?;
    session.config = args.effective_config(load_config(&root)?);

    let scanner = Scanner::for_vault(&root, &session.config)
        .with_context(|| format!("Failed to prepare scan of {}", root.display()))?;
    let today = Local::now().date_naive();

    let operations = match args.command.clone() {
        Command::Analyze { .. } => return Ok(()),
        Command::List { dirs } => {
            let paths = if dirs {
                scanner.directories()
            } else {
                scanner.markdown_files()
            };
            print_paths(&paths, &root);
            return Ok(());
        }
        Command::Report { output } => {
            let text = render(&build_report(&scanner.scan()));
            match output {
                Some(file) => {
                    fs::write(&file, &text)
                        .with_context(|| format!("Failed to write report: {}", file.display()))?;
                    println!("Report written to {}", file.display());
                }
                None => print!("{text}"),
            }
            return Ok(());
        }
        Command::Organize { by, pattern, field } => {
            let strategy = match by {
                OrganizeBy::Date => Strategy::ByDate(field.unwrap_or(session.config.date_field)),
                OrganizeBy::Tag => Strategy::ByTag,
                OrganizeBy::Type => Strategy::ByType,
                OrganizeBy::Size => Strategy::BySize,
                OrganizeBy::Custom => Strategy::Custom(pattern.unwrap_or_default()),
            };
            plan_organize(&scan_records(&scanner), &root, &strategy, today)?
        }
        Command::Rename { pattern } => plan_rename(&scan_records(&scanner), pattern, today),
        Command::Properties {
            standardize,
            clean,
            add_missing,
            sort,
        } => {
            let steps = PropertySteps {
                standardize,
                clean,
                add_missing,
                sort,
            };
            let steps = if steps.is_empty() {
                PropertySteps::all()
            } else {
                steps
            };
            plan_properties(&scan_records(&scanner), steps)
        }
        Command::Replace {
            find,
            replace,
            regex,
            ignore_case,
        } => find_replace(&scan_records(&scanner), &find, &replace, regex, !ignore_case)?,
        Command::Cleanup => cleanup(&scan_records(&scanner)),
        Command::Tag { tag } => add_tag(&scan_records(&scanner), &tag)?,
        Command::DeleteEmpty => delete_empty(&scan_records(&scanner)),
    };

    execute(&operations, &session.config, args.should_apply(), &root);
    Ok(())
}

fn scan_records(scanner: &Scanner) -> Vec<FileRecord> {
    let outcome = scanner.scan();
    for (path, err) in &outcome.errors {
        warn!("not included: {}: {err}", path.display());
    }
    outcome.records
}

fn execute(operations: &[Operation], config: &Config, apply: bool, root: &Path) {
    if operations.is_empty() {
        println!("Nothing to do.");
        return;
    }
    println!("{}", preview(operations, config.preview_limit));
    if !apply {
        println!("Run again with --yes to apply.");
        return;
    }

    let engine = Engine::local().with_backup(config.backup);
    let report = engine.apply(operations, print_progress);
    println!("{}", format_apply_report(&report, root));
}
