//! # Terminal Front End
//!
//! Line-oriented screen for the counter store.
//!
//! ## Input Grammar
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  +                  increment the active counter                        │
//! │  -                  decrement the active counter                        │
//! │  add                add "Counter N" and switch to it                    │
//! │  select <id>        switch to counter <id>                              │
//! │  rename <text>      rename the active counter (text kept verbatim)      │
//! │  list               redraw the screen                                   │
//! │  export             print the stored JSON form                          │
//! │  help               show this table                                     │
//! │  quit               leave                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reader and writer are generic so a session can be driven from a byte
//! slice in tests.

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::commands::{self, CountersView};
use crate::error::ApiError;
use crate::state::CounterStore;

const TITLE: &str = "Tally Counter 🔢";

const HELP: &str = "\
Commands:
  +              increment the active counter
  -              decrement the active counter
  add            add a new counter and switch to it
  select <id>    switch to counter <id>
  rename <text>  rename the active counter
  list           redraw the counters
  export         print the saved JSON form
  help           show this help
  quit           exit";

// =============================================================================
// Input
// =============================================================================

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Increment,
    Decrement,
    Add,
    /// Raw id text, validated by the command.
    Select(String),
    /// New name, everything after `rename `.
    Rename(String),
    List,
    Export,
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();

        if let Some(name) = rename_argument(line) {
            return Ok(Input::Rename(name.to_string()));
        }

        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or("");

        match keyword {
            "" | "list" | "ls" => Ok(Input::List),
            "+" | "inc" => Ok(Input::Increment),
            "-" | "dec" => Ok(Input::Decrement),
            "add" | "new" => Ok(Input::Add),
            "select" | "sel" => match words.next() {
                Some(id) => Ok(Input::Select(id.to_string())),
                None => Err(ApiError::validation("Usage: select <id>")),
            },
            "export" => Ok(Input::Export),
            "help" | "?" => Ok(Input::Help),
            "quit" | "exit" | "q" => Ok(Input::Quit),
            other => Err(ApiError::validation(format!(
                "Unknown command '{}'. Type 'help' for a list.",
                other
            ))),
        }
    }
}

/// Text after `rename` and one whitespace separator, kept verbatim.
fn rename_argument(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("rename")?;
    let mut chars = rest.chars();
    match chars.next() {
        None => Some(""),
        Some(separator) if separator.is_whitespace() => Some(chars.as_str()),
        Some(_) => None,
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Draws one frame of the counter screen.
pub fn render(view: &CountersView) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');

    if !view.ready {
        out.push_str("(loading saved counters...)\n");
    }

    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|tab| {
            if tab.is_active {
                format!("[*{}* #{}]", tab.name, tab.id)
            } else {
                format!("[ {} #{} ]", tab.name, tab.id)
            }
        })
        .collect();
    out.push_str(&tabs.join(" "));
    out.push('\n');

    match &view.active {
        Some(active) => {
            out.push_str(&format!("{}\n{}\n", active.name, active.count));
        }
        None => out.push_str("No counters\n"),
    }

    out
}

// =============================================================================
// Session Loop
// =============================================================================

/// Runs an interactive session until `quit` or end of input.
pub async fn run<R, W>(store: &CounterStore, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    write_frame(&mut output, &render(&commands::get_counters(store))).await?;

    while let Some(line) = lines.next_line().await? {
        let parsed = match line.parse::<Input>() {
            Ok(parsed) => parsed,
            Err(e) => {
                write_frame(&mut output, &e.message).await?;
                continue;
            }
        };
        debug!(input = ?parsed, "Front end input");

        let frame = match parsed {
            Input::Quit => break,
            Input::Help => HELP.to_string(),
            Input::Export => match commands::export_counters(store) {
                Ok(json) => json,
                Err(e) => e.message,
            },
            Input::Increment => render(&commands::increment(store)),
            Input::Decrement => render(&commands::decrement(store)),
            Input::Add => render(&commands::add_counter(store)),
            Input::Rename(name) => render(&commands::rename_counter(store, &name)),
            Input::List => render(&commands::get_counters(store)),
            Input::Select(id) => match commands::select_counter(store, &id) {
                Ok(view) => render(&view),
                Err(e) => e.message,
            },
        };

        write_frame(&mut output, &frame).await?;
    }

    info!("Session ended");
    Ok(())
}

async fn write_frame<W: AsyncWrite + Unpin>(output: &mut W, frame: &str) -> std::io::Result<()> {
    output.write_all(frame.as_bytes()).await?;
    if !frame.ends_with('\n') {
        output.write_all(b"\n").await?;
    }
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tally_core::CounterCollection;
    use tally_db::MemoryStore;

    #[test]
    fn test_parse_commands() {
        assert_eq!("+".parse::<Input>().unwrap(), Input::Increment);
        assert_eq!(" - ".parse::<Input>().unwrap(), Input::Decrement);
        assert_eq!("add".parse::<Input>().unwrap(), Input::Add);
        assert_eq!("select 3".parse::<Input>().unwrap(), Input::Select("3".into()));
        assert_eq!("".parse::<Input>().unwrap(), Input::List);
        assert_eq!("quit".parse::<Input>().unwrap(), Input::Quit);
        assert!("select".parse::<Input>().is_err());
        assert!("jump".parse::<Input>().is_err());
    }

    #[test]
    fn test_parse_rename_keeps_text() {
        assert_eq!(
            "rename  Pages read ".parse::<Input>().unwrap(),
            Input::Rename(" Pages read ".into())
        );
        assert_eq!("rename".parse::<Input>().unwrap(), Input::Rename(String::new()));
        assert_eq!(
            "rename\tLaps".parse::<Input>().unwrap(),
            Input::Rename("Laps".into())
        );
        assert!("renamed Laps".parse::<Input>().is_err());
    }

    #[test]
    fn test_render_marks_active_tab() {
        let counters = CounterCollection::default().increment().add_counter();
        let frame = render(&CountersView::new(true, &counters));

        assert!(frame.starts_with(TITLE));
        assert!(frame.contains("[ Default #1 ]"));
        assert!(frame.contains("[*Counter 2* #2]"));
        assert!(frame.ends_with("Counter 2\n0\n"));
        assert!(!frame.contains("loading"));
    }

    #[test]
    fn test_render_not_ready() {
        let frame = render(&CountersView::new(false, &CounterCollection::default()));
        assert!(frame.contains("(loading saved counters...)"));
    }

    #[tokio::test]
    async fn test_session() {
        let storage = Arc::new(MemoryStore::new());
        let store = CounterStore::new(storage.clone());
        store.load().await;

        let script: &[u8] = b"+\n+\nadd\n-\nselect x\nselect 1\nbogus\nquit\n+\n";
        let mut output = Vec::new();
        run(&store, script, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("must be a whole number"));
        assert!(output.contains("Unknown command 'bogus'"));

        // The "+" after quit is never read.
        let counters = store.snapshot();
        assert_eq!(counters.active_id().get(), 1);
        assert_eq!(counters.counters()[0].count, 2);
        assert_eq!(counters.counters()[1].count, -1);
    }
}
