use mongodb::bson::doc;

use crate::mongodb::DatabaseTrait;

/// Sends a `ping` command. Success means the server is reachable and accepted the command.
pub async fn ping(database: &impl DatabaseTrait) -> Result<(), mongodb::error::Error> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
