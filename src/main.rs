use slo_simulator::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = startup::run().await {
        tracing::error!(error = %e, "Startup failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
