/*
 * Copyright 2025 vectorbench contributors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! vectorbench CLI — select adapters and scenarios by name, run the
//! benchmark, and persist the JSON report.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vectorbench::adapters::{self, VectorDb};
use vectorbench::report::write_report;
use vectorbench::scenarios::{self, Scenario};
use vectorbench::{Config, Runner};

#[derive(Parser)]
#[command(name = "vectorbench")]
#[command(about = "Deterministic stress-test harness for vector-search backends")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available adapters.
    Adapters,
    /// List available scenarios.
    Scenarios,
    /// Run benchmark scenarios.
    Run {
        /// TOML configuration file; defaults are used when absent.
        #[arg(short, long, default_value = "vectorbench.toml")]
        config: PathBuf,

        /// Comma-separated adapter names.
        #[arg(short, long, value_delimiter = ',', default_value = "flat")]
        adapters: Vec<String>,

        /// Comma-separated scenario names; all scenarios when omitted.
        #[arg(short, long, value_delimiter = ',')]
        scenarios: Option<Vec<String>>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        dim: Option<usize>,

        #[arg(long)]
        num_embeddings: Option<usize>,

        #[arg(long)]
        artifacts_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Adapters => {
            for name in adapters::AVAILABLE_ADAPTERS {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Scenarios => {
            for name in scenarios::AVAILABLE_SCENARIOS {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Run {
            config,
            adapters: adapter_names,
            scenarios: scenario_names,
            seed,
            dim,
            num_embeddings,
            artifacts_dir,
        } => {
            run(
                config,
                adapter_names,
                scenario_names,
                seed,
                dim,
                num_embeddings,
                artifacts_dir,
            )
            .await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    config_path: PathBuf,
    adapter_names: Vec<String>,
    scenario_names: Option<Vec<String>>,
    seed: Option<u64>,
    dim: Option<usize>,
    num_embeddings: Option<usize>,
    artifacts_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        toml::from_str::<Config>(&raw)
            .with_context(|| format!("parsing {}", config_path.display()))?
    } else {
        info!("configuration file not found, using defaults");
        Config::default()
    };

    if seed.is_some() {
        config.run.seed = seed;
    }
    if dim.is_some() {
        config.run.dim = dim;
    }
    if num_embeddings.is_some() {
        config.run.num_embeddings = num_embeddings;
    }
    if let Some(dir) = artifacts_dir {
        config.artifacts_dir = dir;
    }

    let mut selected_adapters: Vec<std::sync::Arc<dyn VectorDb>> = Vec::new();
    for name in &adapter_names {
        match adapters::build_adapter(name, &config) {
            Some(adapter) => selected_adapters.push(adapter),
            None => warn!(adapter = %name, "unknown adapter, skipping"),
        }
    }

    let selected_scenarios: Vec<std::sync::Arc<dyn Scenario>> = match scenario_names {
        Some(names) => {
            let mut selected = Vec::new();
            for name in &names {
                match scenarios::build_scenario(name) {
                    Some(scenario) => selected.push(scenario),
                    None => warn!(scenario = %name, "unknown scenario, skipping"),
                }
            }
            selected
        }
        None => scenarios::all_scenarios(),
    };

    if selected_adapters.is_empty() || selected_scenarios.is_empty() {
        bail!("no valid adapters or scenarios selected");
    }

    let runner = Runner::new(selected_adapters, selected_scenarios);
    let report = runner.run(&config.run).await;

    let path = write_report(&report, &config.artifacts_dir)?;
    info!(path = %path.display(), "benchmark run completed");
    Ok(())
}
