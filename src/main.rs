use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use multimodal_router::config::EngineConfig;
use multimodal_router::domain::{FeasibleRoute, RouteRequest};
use multimodal_router::oracle::{CachingOracle, HttpOracle, StubOracle};
use multimodal_router::orchestrator::plan_route;

/// Multi-modal trip planning and ranking engine
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a JSON-encoded route request (origin, destination, inventory, ...)
    request_path: PathBuf,

    /// Skip the external directions oracle; use a deterministic
    /// haversine-based stand-in instead (no network access required)
    #[clap(long)]
    offline: bool,

    /// Base URL of the external directions/snap oracle (ignored with --offline)
    #[clap(long)]
    oracle_url: Option<String>,

    /// Maximum number of ranked routes to print
    #[clap(long, default_value_t = 10)]
    limit: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let request = match load_request(&args.request_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = EngineConfig::from_env();
    if let Some(url) = args.oracle_url {
        config.oracle_base_url = url;
    }

    let result = if args.offline {
        plan_route(&request, &StubOracle)
    } else {
        let oracle = CachingOracle::new(HttpOracle::from_config(&config), config.oracle_cache_capacity);
        plan_route(&request, &oracle)
    };

    match result {
        Ok(routes) => {
            print_routes(&routes, args.limit);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("route planning failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_request(path: &PathBuf) -> Result<RouteRequest, String> {
    let body = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&body).map_err(|e| format!("failed to parse request: {e}"))
}

fn print_routes(routes: &[FeasibleRoute], limit: usize) {
    println!("{:<4} {:<24} {:>10} {:>10} {:>6}", "#", "pattern", "dist_m", "dur_s", "cost");
    for (i, r) in routes.iter().enumerate().take(limit) {
        println!("{:<4} {:<24} {:>10.1} {:>10.1} {:>6}", i, r.pattern, r.total_distance_m, r.total_duration_s, r.total_cost);
    }
    if routes.len() > limit {
        println!("... and {} more", routes.len() - limit);
    }
}
