//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;

use slo_simulator::{
    RandomSource, RequestMetrics, Shutdown, SimulatorConfig, SimulatorServer,
};
use tokio::net::TcpListener;

/// A simulator serving on an ephemeral port; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub metrics: RequestMetrics,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a simulator with `config` drawing from `random`.
pub async fn spawn_simulator(
    mut config: SimulatorConfig,
    random: Arc<dyn RandomSource>,
) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let metrics = RequestMetrics::new(&config.slo.app).unwrap();
    let server = SimulatorServer::new(config, metrics.clone(), random).unwrap();

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    TestServer {
        addr,
        metrics,
        shutdown,
    }
}

/// Config with the simulated delay disabled.
#[allow(dead_code)]
pub fn instant_config() -> SimulatorConfig {
    let mut config = SimulatorConfig::default();
    config.latency.max_ms = 0;
    config
}

/// Non-pooled client so each test sees fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
