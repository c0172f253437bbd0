use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nsv::cli::orchestration::{self, BuildDetails, NextVersionArgs};
use nsv::ui;

#[derive(clap::Parser)]
#[command(
    name = "nsv",
    about = "Generate the next semantic version from conventional commits"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(
        long,
        env = "NSV_SHOW",
        action = ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new(),
        help = "Show how the next semantic version was calculated"
    )]
    show: bool,

    #[arg(
        long,
        env = "NSV_FORMAT",
        help = "Template for the printed version, e.g. 'v{{.Version}}'"
    )]
    format: Option<String>,

    #[arg(
        long,
        env = "NSV_PATH",
        help = "Directory to version, relative to the repository root"
    )]
    path: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Enable debug logging on stderr")]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print build time version information
    Version {
        #[arg(long, help = "Only print the version number")]
        short: bool,
    },
    /// Print the manual page in roff format
    Man,
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.debug);

    match args.command {
        Some(Command::Version { short }) => {
            let details = BuildDetails::current();
            if short {
                println!("{}", details.version);
            } else {
                println!("{}", serde_json::to_string(&details)?);
            }
            return Ok(());
        }
        Some(Command::Man) => {
            clap_mangen::Man::new(Args::command()).render(&mut std::io::stdout())?;
            return Ok(());
        }
        None => {}
    }

    let workflow_args = NextVersionArgs {
        config_path: args.config,
        show: args.show,
        format: args.format,
        path: args.path,
    };

    match orchestration::run_next_version(workflow_args) {
        Ok(result) => {
            ui::display_analysis(&result.analysis, result.show);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Set up logging/tracing on stderr, keeping stdout for the version.
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::try_new("nsv=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
