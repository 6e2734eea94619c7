use std::net::SocketAddr;
use tokio::net::TcpListener;

use headsup::config::Config;
use headsup::metrics::register_metrics;
use headsup::startup::create_web_server;

#[tokio::main]
async fn main() {
    std_logger::Config::logfmt().init();
    register_metrics();

    let config = match Config::get() {
        Ok(config) => config,
        Err(error) => {
            log::error!("Unable to read the configuration. Error: '{error}'.");
            std::process::exit(1);
        }
    };

    let address: SocketAddr = match format!(
        "{}:{}",
        config.application.host, config.application.port
    )
    .parse()
    {
        Ok(address) => address,
        Err(error) => {
            log::error!("Invalid application address. Error: '{error}'.");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            log::error!("Failed to bind the address {address}. Error: '{error}'.");
            std::process::exit(1);
        }
    };

    if let Err(error) = create_web_server(config, listener).await {
        log::error!("Server error. Error: '{error}'.");
        std::process::exit(1);
    }
}
