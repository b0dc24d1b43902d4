use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_import::cli::{run_import_workflow, ImportWorkflowArgs};
use git_import::config;
use git_import::git::{self, BackendKind};
use git_import::ui::{self, ConsoleReporter};

#[derive(clap::Parser)]
#[command(
    name = "git-import",
    about = "Import source files from a version-selected ref of a remote git repository"
)]
struct Args {
    #[arg(long, help = "URL of the repository to import from")]
    url: String,

    #[arg(short, long, default_value = "HEAD", help = "Branch or ref to check out")]
    branch: String,

    #[arg(
        long = "version",
        value_name = "REQUIREMENT",
        help = "Version requirement selecting a tag, e.g. \"~> 1.0.0\" or \">= 1.2, < 2.0\""
    )]
    version: Option<String>,

    #[arg(short, long, help = "Copy imported files into this directory")]
    dest: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, value_enum, help = "Repository access backend (overrides config)")]
    backend: Option<BackendKind>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let backend = git::create_backend(args.backend.unwrap_or(config.git.backend));
    let workflow_args = ImportWorkflowArgs {
        url: args.url,
        branch: Some(args.branch),
        version: args.version,
        dest: args.dest,
    };

    // Entries and the summary line are printed by the reporter as the run goes
    match run_import_workflow(workflow_args, &config, backend.as_ref(), &ConsoleReporter) {
        Ok(_) => Ok(()),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
