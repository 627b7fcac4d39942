use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use airsight::config::DashboardConfig;
use airsight::ingest::{AirQualityApi, HttpApiClient};
use airsight::logging::{self, init_logger, Component, LogLevel};
use airsight::map::SceneBackend;
use airsight::store::{FileStore, LastCityStore};
use airsight::view::{DisplayRegion, RegionState};
use airsight::Dashboard;

#[derive(Debug, Parser)]
#[command(name = "airsight")]
#[command(about = "Air quality snapshot, insights and forecast for a city")]
struct Args {
    /// City to search first (defaults to the last searched city)
    city: Option<String>,

    /// Exit after the first search instead of prompting for more cities
    #[arg(long)]
    once: bool,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match DashboardConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    init_logger(config.log_level().unwrap_or(LogLevel::Info));

    let api = match HttpApiClient::new(&config.base_url, config.timeout()) {
        Ok(api) => api,
        Err(e) => {
            logging::error(Component::System, None, &e.to_string());
            return ExitCode::FAILURE;
        }
    };
    logging::info(
        Component::System,
        None,
        &format!("using API at {} (timeout {}s)", api.base_url(), config.timeout_secs),
    );

    let store = FileStore::new(&config.store_path);
    let mut dashboard = Dashboard::new(api, store, SceneBackend::new(), &config);

    let outcome = match args.city {
        Some(city) => dashboard.search_for(&city).await,
        None => dashboard.startup().await,
    };
    print_dashboard(&dashboard);

    if args.once {
        return if outcome.is_ready() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let stdin = io::stdin();
    loop {
        print!("{}", prompt(dashboard.default_city()));
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                logging::error(Component::Ui, None, &format!("failed to read input: {}", e));
                break;
            }
        }
        let line = line.trim();
        if line == ":q" || line == ":quit" {
            break;
        }

        dashboard.search_for(line).await;
        print_dashboard(&dashboard);
    }

    ExitCode::SUCCESS
}

/// A blank line searches the default city, so that is what the prompt shows.
fn prompt(default_city: &str) -> String {
    format!("city (blank for {}, :q to quit)> ", default_city)
}

fn print_region(region: &DisplayRegion) {
    match (region.state(), region.content()) {
        (_, Some(panel)) => print!("{}", panel),
        (RegionState::Loading, None) => println!("[{}: loading]", region.name()),
        (_, None) => println!("[{}]", region.name()),
    }
    println!();
}

fn print_dashboard<A, S>(dashboard: &Dashboard<A, S, SceneBackend>)
where
    A: AirQualityApi,
    S: LastCityStore,
{
    let theme = dashboard.theme();
    println!();
    println!("== {} == ({})", theme.hero_title(), theme.page_class());
    println!("{}", theme.hero_sub());
    println!("{}", theme.tier().sub_phrase);
    println!();

    print_region(dashboard.snapshot_region());
    print_region(dashboard.insights_region());
    print_region(dashboard.forecast_region());
    print_region(dashboard.map_region());

    print!("{}", dashboard.map().backend());
    if let Some(badge) = dashboard.map_badge() {
        println!("badge: {} ({})", badge.text, badge.color);
    }
}
