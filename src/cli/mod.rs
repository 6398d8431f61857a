use crate::{
    config::{LogFormat, Settings},
    server, Recommender, RecommendationResponse,
};
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("hotel-recommender")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Natural-language hotel recommendations with a rule-based fallback")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Address to bind (or set HOST env var)"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(clap::value_parser!(u16))
                        .help("Port to bind (or set PORT env var)"),
                ),
        )
        .subcommand(
            Command::new("recommend")
                .about("Answer a single demand and print the JSON response")
                .arg(
                    Arg::new("demand")
                        .help("What the traveller is looking for")
                        .required(true)
                        .index(1),
                ),
        )
}

/// CLI entry point for the hotel recommender
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let matches = command().get_matches();
    let mut settings = Settings::from_env().context("invalid configuration")?;
    init_tracing(&settings);
    settings.log_summary();

    match matches.subcommand() {
        Some(("serve", args)) => {
            apply_overrides(&mut settings, args);
            server::serve(&settings).await
        }
        Some(("recommend", args)) => {
            let demand = args
                .get_one::<String>("demand")
                .context("a demand is required")?;
            recommend_once(&settings, demand).await
        }
        _ => Ok(()),
    }
}

fn apply_overrides(settings: &mut Settings, args: &ArgMatches) {
    if let Some(host) = args.get_one::<String>("host") {
        settings.host = host.clone();
    }
    if let Some(port) = args.get_one::<u16>("port") {
        settings.port = *port;
    }
}

async fn recommend_once(settings: &Settings, demand: &str) -> anyhow::Result<()> {
    let recommender = Recommender::from_settings(settings)?;
    info!(inventory = recommender.inventory_name(), "running one-shot recommendation");

    match recommender.recommend(demand).await {
        Ok(recommendation) => {
            info!(
                extraction = %recommendation.extraction,
                filtering = ?recommendation.filtering,
                "recommendation completed"
            );
            let response = RecommendationResponse::from(recommendation);
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            error!("Recommendation failed: {}", e);
            Err(e.into())
        }
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
