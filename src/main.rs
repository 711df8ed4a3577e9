use std::net::TcpListener;

use bigmarker_relay::configuration::get_configuration;
use bigmarker_relay::startup::{build_action_registry, build_profile_store, run};
use bigmarker_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "bigmarker-relay".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let config = get_configuration()
        .expect("Failed to read configuration");
    let address = format!(
        "{address}:{port}",
        address = config.application.host,
        port = config.application.port
    );
    let listener = TcpListener::bind(address)?;
    let registry = build_action_registry(&config.bigmarker)?;
    let profile_store = build_profile_store(config.database.as_ref()).await?;

    run(listener, registry, profile_store)?.await?;
    Ok(())
}
