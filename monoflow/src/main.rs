mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use monoflow_core::version::BumpType;
use tracing::Level;

#[derive(Parser)]
#[command(name = "monoflow")]
#[command(about = "Dependency-aware change impact and release analysis for monorepos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "./packages")]
    packages_dir: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    Scan {
        #[arg(long, action)]
        json: bool,
        #[arg(long, action)]
        strict: bool,
    },
    Order {
        #[arg(long, action)]
        json: bool,
    },
    Affected {
        files: Vec<String>,
        #[arg(long)]
        git: bool,
        #[arg(long)]
        since: Option<String>,
        #[arg(long, action)]
        json: bool,
    },
    Deps {
        package: String,
        #[arg(long, action)]
        json: bool,
    },
    Release {
        package: String,
        #[arg(long)]
        since: Option<String>,
        #[arg(long, value_enum, conflicts_with = "to")]
        bump: Option<BumpArg>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, action)]
        apply: bool,
        #[arg(long, action)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum BumpArg {
    Major,
    Minor,
    Patch,
}

impl From<BumpArg> for BumpType {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Major => BumpType::Major,
            BumpArg::Minor => BumpType::Minor,
            BumpArg::Patch => BumpType::Patch,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    match cli.command {
        Commands::Scan { json, strict } => commands::cmd_scan(cli.packages_dir, json, strict)?,
        Commands::Order { json } => commands::cmd_order(cli.packages_dir, json)?,
        Commands::Affected {
            files,
            git,
            since,
            json,
        } => commands::cmd_affected(cli.packages_dir, files, git, since, json)?,
        Commands::Deps { package, json } => commands::cmd_deps(cli.packages_dir, package, json)?,
        Commands::Release {
            package,
            since,
            bump,
            to,
            apply,
            json,
        } => commands::cmd_release(
            cli.packages_dir,
            package,
            since,
            bump.map(Into::into),
            to,
            apply,
            json,
        )?,
    }

    Ok(())
}
