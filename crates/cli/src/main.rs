//! Command-line access to the files manager database: liveness and document counts.
//!
//! Connection settings come from flags, or from the same `DB_HOST`, `DB_PORT`, and `DB_DATABASE`
//! variables the application reads.

use std::io;
use std::process::exit;

use clap::Parser;
use files_manager_cli::{logging::init_logging, run, Command, Context};
use files_manager_db::{
    interface_types::{
        DB_DATABASE_ENV_VAR, DB_HOST_ENV_VAR, DB_PORT_ENV_VAR, DEFAULT_DATABASE, DEFAULT_HOST,
        DEFAULT_PORT,
    },
    DbClient, DbConfig,
};

/// The command-line arguments.
#[derive(Debug, Parser)]
pub struct Args {
    /// Host name of the MongoDB server.
    #[arg(long, env = DB_HOST_ENV_VAR, default_value = DEFAULT_HOST, value_name = "HOST")]
    pub host: String,

    /// Port of the MongoDB server.
    #[arg(long, env = DB_PORT_ENV_VAR, default_value_t = DEFAULT_PORT, value_name = "PORT")]
    pub port: u16,

    /// Name of the database that holds the `users` and `files` collections.
    #[arg(long, env = DB_DATABASE_ENV_VAR, default_value = DEFAULT_DATABASE, value_name = "NAME")]
    pub database: String,

    /// Indent JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// The command to invoke.
    #[command(subcommand)]
    pub subcommand: Command,
}

/// The application entrypoint. It pulls information from the environment and then calls the [run]
/// function. The library remains unaware of the environment, so that we can more easily test it.
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = DbConfig::new(args.host, args.port, args.database);
    let context = Context {
        db_client: DbClient::new(config),
        pretty: args.pretty,
    };

    let mut stdout = io::stdout().lock();
    if let Err(exit_code) = run(args.subcommand, &context, &mut stdout).await {
        exit(exit_code.into())
    }
    Ok(())
}
