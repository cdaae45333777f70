//! Command-line entry point.
//!
//! Run with: tradfri-workaround <bridge> <light ids...>

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use tradfri_workaround::{
    Bridge, CredentialStore, Error, FailurePolicy, LightDirectory, LightId, LogSink,
    MonitorConfig, PollDriver, shutdown_channel,
};

#[derive(Parser, Debug)]
#[command(name = "tradfri-workaround")]
#[command(
    about = "Workaround for the IKEA Trådfri brightness issue on a Philips Hue bridge",
    long_about = "Workaround for the IKEA Trådfri brightness issue on a Philips Hue bridge. \
        Run with the bridge address and the Trådfri light ids as arguments. \
        Push the link button on the bridge before the first run."
)]
struct Cli {
    /// Bridge address (IP or host, optionally with :port)
    bridge: String,

    /// Ids of the lights to watch
    light_ids: Vec<LightId>,

    /// How often the lights are checked for a brightness change, in seconds
    #[arg(short = 't', long, default_value = "0.2", value_parser = parse_seconds)]
    poll_time: Duration,

    /// How long a brightness change must hold before it is written back, in seconds
    #[arg(short = 'd', long, default_value = "1.2", value_parser = parse_seconds)]
    brightness_delay: Duration,

    /// List available lights and exit
    #[arg(short, long)]
    list: bool,

    /// Be more verbose; -vv prints debug messages
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Credential file (default: ~/.tradfri-workaround.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep polling the other lights when one fails
    #[arg(long)]
    keep_going: bool,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("Arguments: {:?}", cli);

    let store_path = cli
        .config
        .clone()
        .unwrap_or_else(CredentialStore::default_path);
    let mut store = CredentialStore::open(store_path)?;

    info!("Trying to connect to the bridge...");
    let bridge = match Bridge::connect(&cli.bridge, &mut store).await {
        Ok(bridge) => bridge,
        Err(Error::LinkButtonNotPressed) => {
            eprintln!(
                "Press the link button on the bridge, then run this again within 30 seconds."
            );
            return Err(Error::LinkButtonNotPressed.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Connected to the bridge");

    if cli.list {
        list_lights(&bridge).await?;
    } else if !cli.light_ids.is_empty() {
        watch_lights(&bridge, &cli).await?;
    } else {
        println!("No light IDs provided");
    }

    Ok(())
}

async fn list_lights(bridge: &Bridge) -> Result<(), Error> {
    info!("Getting list of lights...");
    let lights = bridge.lights().await?;

    println!("Available lights:");
    if lights.is_empty() {
        println!("<no lights found>");
    }
    for (id, light) in lights {
        println!("{}: {}", id, light.summary());
    }
    Ok(())
}

async fn watch_lights(bridge: &Bridge, cli: &Cli) -> Result<(), Error> {
    let lights = bridge.list_lights().await?;
    let policy = if cli.keep_going {
        FailurePolicy::Isolate
    } else {
        FailurePolicy::FailFast
    };
    let config = MonitorConfig::new(cli.light_ids.clone())
        .poll_interval(cli.poll_time)
        .settle_delay(cli.brightness_delay)
        .failure_policy(policy);

    let mut driver = PollDriver::new(&lights, &config, Arc::new(LogSink)).await?;
    info!(
        "Watching {} light(s), polling every {:?}, settle delay {:?}",
        driver.monitors().len(),
        config.poll_interval,
        config.settle_delay
    );

    let (shutdown, ctx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping");
            shutdown.trigger();
        }
    });

    driver.run(ctx).await
}
