//! The interpretation of the commands that the CLI can handle.

mod exit_codes;
pub mod logging;


use std::io::Write;

use clap::Subcommand;
use files_manager_db::{mongodb::DatabaseTrait, DbClient};
use serde::Serialize;
use tracing::error;

pub use self::exit_codes::ExitCode;

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report whether the database is reachable. Exits with status 201 if it is not.
    Status,

    /// Print the number of users and files.
    Stats,

    /// Print the number of documents in one collection.
    Count {
        #[arg(value_name = "COLLECTION")]
        collection: String,
    },
}

pub struct Context<D> {
    pub db_client: DbClient<D>,

    /// Indent JSON output.
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct CollectionCount<'a> {
    collection: &'a str,
    count: u64,
}

/// Connects, runs a command, and writes its JSON output to `out`. Returns the exit code to use
/// when the command did not succeed.
pub async fn run<D>(
    command: Command,
    context: &Context<D>,
    out: &mut impl Write,
) -> Result<(), ExitCode>
where
    D: DatabaseTrait,
{
    let db_client = &context.db_client;
    db_client.connect().await;

    match command {
        Command::Status => {
            let status = db_client.status();
            write_output(context, out, &status)?;
            if !status.db {
                return Err(ExitCode::DatabaseUnreachable);
            }
        }
        Command::Stats => {
            let stats = db_client.stats().await;
            write_output(context, out, &stats)?;
        }
        Command::Count { collection } => {
            let count = db_client.count_records(&collection).await;
            write_output(
                context,
                out,
                &CollectionCount {
                    collection: &collection,
                    count,
                },
            )?;
        }
    };
    Ok(())
}

fn write_output<D>(
    context: &Context<D>,
    out: &mut impl Write,
    value: &impl Serialize,
) -> Result<(), ExitCode> {
    let serialized = if context.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let result = serialized
        .map_err(|err| err.to_string())
        .and_then(|json| writeln!(out, "{json}").map_err(|err| err.to_string()));
    if let Err(err) = result {
        error!(%err, "error writing output");
        return Err(ExitCode::ErrorWriting);
    }
    Ok(())
}
