//! Interactive shell.
//!
//! Reads one command per line and handles it to completion before the next
//! is read: file loads are awaited, then the session is updated and the
//! timeline redrawn. Errors are printed and the loop continues.

use std::io::{IsTerminal, Write};

use timeledger_core::loader::load;
use timeledger_core::{Action, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::command::{Command, HELP};
use crate::effects::Effects;
use crate::style::Palette;
use crate::view::{
    render_details, render_status, render_timeline, terminal_columns, track_width,
};

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Session state plus the side-effect runner.
struct Shell {
    session: Session,
    effects: Effects,
    palette: Palette,
}

/// Runs the shell on stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if stdin or stdout fail.
pub async fn run(session: Session) -> anyhow::Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let mut shell = Shell {
        session,
        effects: Effects::new(),
        palette: Palette::new(std::io::stdout().is_terminal()),
    };

    info!("Starting shell");
    print!("{}", shell.draw());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("timeledger> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e:#}");
                continue;
            }
        };

        let (flow, output) = shell.handle(command).await;
        print!("{output}");
        if flow == Flow::Quit {
            break;
        }
    }

    info!("Shell closed");
    Ok(())
}

impl Shell {
    async fn handle(&mut self, command: Command) -> (Flow, String) {
        debug!(?command, "Handling command");
        let output = match command {
            Command::Load(category, paths) => match load(category, &paths).await {
                Ok(report) => {
                    let mut out = format!("Loaded {} {category} records", report.batch.len());
                    if report.skipped > 0 {
                        out.push_str(&format!(", skipped {} undated", report.skipped));
                    }
                    out.push('\n');
                    self.session.update(Action::Replace(report.batch));
                    out.push_str(&self.draw());
                    out
                }
                Err(e) => {
                    warn!(%category, error = %e, "Load failed, collection unchanged");
                    format!("error: {e}\n")
                }
            },
            Command::Update(action) => {
                if self.session.update(action) {
                    self.draw()
                } else {
                    "No change.\n".to_string()
                }
            }
            Command::Show => self.draw(),
            Command::List => self.session.timeline().map_or_else(
                || "Nothing to show.\n".to_string(),
                |timeline| render_details(&timeline.markers, true, self.palette),
            ),
            Command::Open(index) => self.open(index),
            Command::Json => match serde_json::to_string_pretty(&self.session.timeline()) {
                Ok(json) => format!("{json}\n"),
                Err(e) => format!("error: {e}\n"),
            },
            Command::Status => render_status(&self.session),
            Command::Help => format!("{HELP}\n"),
            Command::Quit => return (Flow::Quit, String::new()),
        };
        (Flow::Continue, output)
    }

    fn draw(&self) -> String {
        self.session.timeline().map_or_else(
            || "Nothing to show.\n".to_string(),
            |timeline| {
                let width =
                    track_width(self.session.settings().track_width, terminal_columns());
                render_timeline(&timeline, width, self.palette)
            },
        )
    }

    fn open(&mut self, index: usize) -> String {
        let click = self
            .session
            .timeline()
            .and_then(|timeline| timeline.markers.into_iter().nth(index - 1))
            .map(|marker| marker.click);

        match click {
            None => format!("No marker {index}.\n"),
            Some(None) => format!("Marker {index} has no action.\n"),
            Some(Some(action)) => format!("{}\n", self.effects.activate(&action)),
        }
    }
}
