//! Command dispatch: bridges CLI args -> analyzer queries -> output formatting.

pub mod config_cmd;
pub mod graph;
pub mod impact;
pub mod path;
pub mod rules;
pub mod search;
pub mod segments;
pub mod util;

use netseg_core::{Analyzer, MemoryStore};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a snapshot-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    analyzer: &Analyzer<MemoryStore>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Graph(args) => graph::handle(analyzer, args, global).await,
        Command::Path(args) => path::handle(analyzer, args, global).await,
        Command::Impact(args) => impact::handle(analyzer, args, global).await,
        Command::Segments(args) => segments::handle(analyzer, args, global).await,
        Command::Rules(args) => rules::handle(analyzer, args, global).await,
        Command::Search(args) => search::handle(analyzer, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not read a snapshot".into(),
        )),
    }
}
