use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "slo-load")]
#[command(about = "Drive traffic at a running SLO simulator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send GET / repeatedly and summarize the simulated outcomes
    Run {
        /// Total number of requests
        #[arg(short = 'n', long, default_value_t = 100)]
        requests: usize,

        /// Requests in flight at once
        #[arg(short, long, default_value_t = 10)]
        concurrency: usize,
    },
    /// Check liveness and readiness
    Probe,
    /// Print the Prometheus exposition
    Metrics,
}

/// Outcome counts for a run.
#[derive(Debug, Default, Serialize, PartialEq)]
struct Tally {
    requests: usize,
    errors: usize,
    statuses: BTreeMap<u16, usize>,
    classes: BTreeMap<String, usize>,
    results: BTreeMap<String, usize>,
}

/// What one request returned: status plus `slo-class` and `slo-result`.
type Sample = (u16, Option<String>, Option<String>);

impl Tally {
    fn record(&mut self, sample: Result<Sample, reqwest::Error>) {
        self.requests += 1;
        match sample {
            Ok((status, class, result)) => {
                *self.statuses.entry(status).or_default() += 1;
                if let Some(class) = class {
                    *self.classes.entry(class).or_default() += 1;
                }
                if let Some(result) = result {
                    *self.results.entry(result).or_default() += 1;
                }
            }
            Err(_) => self.errors += 1,
        }
    }

    /// Share of `slo-result=fail` among answered requests.
    fn failure_ratio(&self) -> f64 {
        let answered = self.requests - self.errors;
        if answered == 0 {
            return 0.0;
        }
        self.results.get("fail").copied().unwrap_or(0) as f64 / answered as f64
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Run {
            requests,
            concurrency,
        } => {
            let url = format!("{}/", cli.url);
            let tally = stream::iter(0..requests)
                .map(|_| fetch(&client, &url))
                .buffer_unordered(concurrency.max(1))
                .fold(Tally::default(), |mut tally, sample| async move {
                    tally.record(sample);
                    tally
                })
                .await;

            println!("{}", serde_json::to_string_pretty(&tally)?);
            println!("slo failure ratio: {:.3}", tally.failure_ratio());
        }
        Commands::Probe => {
            for path in ["/liveness", "/readiness"] {
                let res = client.get(format!("{}{}", cli.url, path)).send().await?;
                println!("{:<10} {}", path, res.status());
            }
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", cli.url)).send().await?;
            if !res.status().is_success() {
                eprintln!("Error: metrics endpoint returned status {}", res.status());
                return Ok(());
            }
            print!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Sample, reqwest::Error> {
    let res = client.get(url).send().await?;
    let header = |name: &str| {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Ok((res.status().as_u16(), header("slo-class"), header("slo-result")))
}
