//! Shell commands.
//!
//! Each input line of the interactive shell parses into one [`Command`].
//! Filter commands map directly onto a core [`Action`]; the rest are
//! handled by the shell itself.

use std::path::PathBuf;

use anyhow::{Context, bail};
use timeledger_core::{Action, Category, parse_bound};

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace a collection from files on disk.
    Load(Category, Vec<PathBuf>),
    /// A pure state change.
    Update(Action),
    /// Redraw the timeline.
    Show,
    /// Print the numbered marker list with previews.
    List,
    /// Activate the numbered marker (copy or open).
    Open(usize),
    /// Print the timeline as JSON.
    Json,
    /// Print sets, range and collection sizes.
    Status,
    /// Print the command reference.
    Help,
    /// Leave the shell.
    Quit,
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
Commands:
  load <sent|inbox|history|images> <path>...   replace a collection
  mark <address>       emphasize mail involving an address
  unmark <address>     remove emphasis
  exclude <address>    hide mail involving an address
  include <address>    show an excluded address again
  from <date|->        set or clear the start of the date range
  to <date|->          set or clear the end of the date range
  clear-range          remove both date bounds
  show                 redraw the timeline
  list                 numbered markers with previews
  open <n>             copy the address or open the file/URL of marker n
  json                 print the timeline as JSON
  status               show filters and collection sizes
  help                 this text
  quit                 leave";

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands and bad arguments.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_lowercase().as_str() {
            "load" => {
                let mut args = rest.split_whitespace();
                let kind = args.next().context("usage: load <category> <path>...")?;
                let category =
                    Category::parse(kind).with_context(|| format!("unknown category {kind:?}"))?;
                let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
                if paths.is_empty() {
                    bail!("usage: load {category} <path>...");
                }
                Self::Load(category, paths)
            }
            "mark" => Self::Update(Action::Mark(address(word, rest)?)),
            "unmark" => Self::Update(Action::Unmark(address(word, rest)?)),
            "exclude" => Self::Update(Action::Exclude(address(word, rest)?)),
            "include" => Self::Update(Action::Include(address(word, rest)?)),
            "from" => Self::Update(Action::SetFrom(parse_bound(rest)?)),
            "to" => Self::Update(Action::SetTo(parse_bound(rest)?)),
            "clear-range" => Self::Update(Action::ClearDateRange),
            "show" | "render" => Self::Show,
            "list" | "ls" => Self::List,
            "open" => {
                let index: usize = rest
                    .parse()
                    .with_context(|| format!("expected a marker number, got {rest:?}"))?;
                if index == 0 {
                    bail!("markers are numbered from 1");
                }
                Self::Open(index)
            }
            "json" => Self::Json,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?}, try `help`"),
        };
        Ok(Some(command))
    }
}

fn address(command: &str, rest: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("usage: {command} <address>");
    }
    Ok(rest.to_string())
}
