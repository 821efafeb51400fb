#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use maintenance_scheduler::{MaintenanceRegister, SchedulerConfig, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("MAINTENANCE_CONFIG") {
        Ok(path) => SchedulerConfig::from_json_file(path)?.apply_env()?,
        Err(_) => SchedulerConfig::from_env()?,
    };
    let addr: SocketAddr = config.http_addr.parse()?;

    let register = MaintenanceRegister::new();
    http_api::serve(addr, register, &config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
