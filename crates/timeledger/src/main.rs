//! `TimeLedger` - a terminal timeline of mail, images and browser history.
//!
//! Loads exported data files, filters them by date and sender, and draws
//! every visible event on one shared time axis.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod command;
mod effects;
mod shell;
mod style;
mod view;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use timeledger_core::import::{firefox, mbox, write_json};
use timeledger_core::loader::load;
use timeledger_core::{Action, Category, Session, Settings, parse_bound};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use style::Palette;
use view::track_width;

#[derive(Parser)]
#[command(name = "timeledger")]
#[command(version, about = "Timeline of sent mail, received mail, images and browser history")]
struct Cli {
    /// Path to the settings file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the timeline once and exit
    Render {
        #[command(flatten)]
        sources: Sources,

        /// Track width in columns (overrides the settings file)
        #[arg(long, short = 'w', value_parser = clap::value_parser!(u16).range(10..))]
        width: Option<u16>,

        /// Also list every marker with its details
        #[arg(long, short = 'd')]
        details: bool,

        /// Print the laid-out timeline as JSON instead of drawing it
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: load files, change filters, open markers
    Shell {
        #[command(flatten)]
        sources: Sources,
    },

    /// Convert an mbox archive into a sent/inbox JSON file
    ImportMbox {
        /// The mbox archive
        mbox: PathBuf,
        /// Output file (prints to stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Convert a Firefox places.sqlite database into a history JSON file
    ImportFirefox {
        /// The places.sqlite database
        places: PathBuf,
        /// Output file (prints to stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write the current (or default) settings to the settings file
    InitConfig,
}

/// Data files and filters to start from.
#[derive(Args, Debug, Default)]
struct Sources {
    /// Sent mail JSON file
    #[arg(long)]
    sent: Option<PathBuf>,

    /// Received mail JSON file
    #[arg(long)]
    inbox: Option<PathBuf>,

    /// Browser history JSON file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Image files or directories
    #[arg(long, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Start of the date range (inclusive)
    #[arg(long)]
    from: Option<String>,

    /// End of the date range (inclusive)
    #[arg(long)]
    to: Option<String>,

    /// Address to emphasize (repeatable)
    #[arg(long)]
    mark: Vec<String>,

    /// Address to hide (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timeledger=info,timeledger_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render {
            sources,
            width,
            details,
            json,
        } => {
            let session = build_session(config, &sources).await?;
            let width = track_width(
                width.map(usize::from).or(session.settings().track_width),
                view::terminal_columns(),
            );
            render(&session, width, details, json)
        }
        Commands::Shell { sources } => {
            let session = build_session(config, &sources).await?;
            shell::run(session).await
        }
        Commands::ImportMbox { mbox: path, output } => {
            let records = mbox::import_mbox(&path).await?;
            emit(records.as_slice(), output.as_deref()).await
        }
        Commands::ImportFirefox { places, output } => {
            let records = firefox::import_history(&places)
                .await
                .with_context(|| format!("Failed to read history from {}", places.display()))?;
            emit(records.as_slice(), output.as_deref()).await
        }
        Commands::InitConfig => {
            let settings = Settings::load(config).await?;
            settings.save(config).await?;
            println!(
                "{}",
                config.map_or_else(Settings::default_path, Path::to_path_buf).display()
            );
            Ok(())
        }
    }
}

/// Loads settings and every requested source into a fresh session.
async fn build_session(config: Option<&Path>, sources: &Sources) -> anyhow::Result<Session> {
    let settings = Settings::load(config)
        .await
        .context("Failed to load settings")?;
    let mut session = Session::new(settings);

    let files = [
        (Category::Sent, sources.sent.as_slice()),
        (Category::Inbox, sources.inbox.as_slice()),
        (Category::History, sources.history.as_slice()),
        (Category::Images, sources.images.as_slice()),
    ];
    for (category, paths) in files {
        if paths.is_empty() {
            continue;
        }
        let report = load(category, paths).await?;
        if report.skipped > 0 {
            eprintln!("{category}: skipped {} undated records", report.skipped);
        }
        session.update(Action::Replace(report.batch));
    }

    for address in &sources.mark {
        session.update(Action::Mark(address.clone()));
    }
    for address in &sources.exclude {
        session.update(Action::Exclude(address.clone()));
    }
    if let Some(from) = &sources.from {
        session.update(Action::SetFrom(parse_bound(from)?));
    }
    if let Some(to) = &sources.to {
        session.update(Action::SetTo(parse_bound(to)?));
    }

    info!(events = session.store().len(), "Session ready");
    Ok(session)
}

fn render(session: &Session, width: usize, details: bool, json: bool) -> anyhow::Result<()> {
    let timeline = session.timeline();

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    let Some(timeline) = timeline else {
        println!("Nothing to show.");
        return Ok(());
    };

    let palette = Palette::new(std::io::stdout().is_terminal());
    print!("{}", view::render_timeline(&timeline, width, palette));
    if details {
        print!("{}", view::render_details(&timeline.markers, false, palette));
    }
    Ok(())
}

async fn emit<T: serde::Serialize>(records: &[T], output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_json(path, records).await?;
            eprintln!("Wrote {} records to {}", records.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}
