use mongodb::{
    options::{ClientOptions, DriverInfo, ServerAddress},
    Client,
};

use crate::interface_types::{DbClientError, DbConfig};

const DRIVER_NAME: &str = "files-manager";

/// Builds a driver client for the configured server. This does not perform any I/O: the driver
/// connects lazily, so the first command sent through the client is what actually reaches the
/// server. The driver spawns its monitoring tasks here, so this must be called from within a
/// tokio runtime.
pub fn get_mongodb_client(config: &DbConfig) -> Result<Client, DbClientError> {
    let mut options = ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: config.host.clone(),
            port: Some(config.port),
        }])
        .build();

    // Lets the server attribute connections to this application
    options.driver_info = Some(DriverInfo::builder().name(DRIVER_NAME).build());

    let client = Client::with_options(options)?;
    Ok(client)
}
