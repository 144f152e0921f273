mod args;

pub use args::{Args, ClusterArgs, Commands, parse_args};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::env;
use tracing::info;

use crate::config::Config;
use crate::dataproc::{
    ClusterController, ClusterRecord, ClusterResolver, RestClusterController, build_filter,
    extract_host,
};
use crate::jdbc::{ConnectionOptions, parse_url};

/// YARN metric shown by `clusters`
const YARN_MEMORY_AVAILABLE: &str = "yarn-memory-mb-available";

/// Environment variables checked, in order, for an access token
const TOKEN_ENV_VARS: [&str; 2] = ["DATAPROC_ACCESS_TOKEN", "GOOGLE_OAUTH_ACCESS_TOKEN"];

pub async fn run(args: Args, mut config: Config) -> Result<()> {
    match &args.command {
        Commands::SetConfig { key, value } => {
            config.set_value(key, value)?;
            let path = config.save()?;
            println!("✅ Set {} = {}", key, config.get_value(key)?);
            println!("Configuration saved to: {}", path.display());
            Ok(())
        }
        Commands::GetConfig { key } => {
            println!("{}", config.display(key.as_deref().unwrap_or(""))?);
            if let Ok(path) = Config::config_file_path() {
                println!("Config file: {}", path.display());
            }
            Ok(())
        }
        Commands::Filter { label } => {
            println!("{}", build_filter(label.as_deref())?);
            Ok(())
        }
        Commands::Resolve { url } => {
            let options = parse_url(url).context("Failed to parse connection URL")?;
            let resolver = ClusterResolver::new(create_controller(&args, &config)?);
            println!("{}", resolver.to_hive_url(&options).await?);
            Ok(())
        }
        Commands::Host { target, cluster, label } => {
            let mut builder = target_options(target, &config)?.cluster_pool_label(label.clone());
            if let Some(name) = cluster {
                builder = builder.cluster_name(name.clone());
            }
            let options = builder.build()?;
            let resolver = ClusterResolver::new(create_controller(&args, &config)?);
            println!("{}", resolver.resolve_host(&options).await?);
            Ok(())
        }
        Commands::Clusters { target, label } => {
            let options = target_options(target, &config)?
                .cluster_pool_label(label.clone())
                .build()?;
            let resolver = ClusterResolver::new(create_controller(&args, &config)?);
            list_clusters(&resolver, &options).await
        }
    }
}

/// Project and region from the command line, falling back to the config file
fn target_options(target: &ClusterArgs, config: &Config) -> Result<crate::jdbc::ConnectionOptionsBuilder> {
    let project = target
        .project
        .clone()
        .or_else(|| config.project_id.clone())
        .ok_or_else(|| anyhow!("No project given. Use --project or `dataproc-url setconfig project_id <id>`"))?;
    let region = target
        .region
        .clone()
        .or_else(|| config.region.clone())
        .ok_or_else(|| anyhow!("No region given. Use --region or `dataproc-url setconfig region <region>`"))?;

    Ok(ConnectionOptions::builder().project_id(project).region(region))
}

fn create_controller(args: &Args, config: &Config) -> Result<RestClusterController> {
    let endpoint = args.endpoint.as_deref().unwrap_or(&config.api.endpoint);
    let timeout = args.timeout.unwrap_or(config.api.timeout_seconds);
    let token = access_token(args);
    if token.is_none() {
        info!("No access token found, sending unauthenticated requests");
    }

    RestClusterController::new(endpoint, token, timeout).context("Failed to create HTTP client")
}

fn access_token(args: &Args) -> Option<String> {
    args.access_token
        .clone()
        .or_else(|| token_from_env(|name| env::var(name).ok()))
}

/// First non-blank token among [`TOKEN_ENV_VARS`]
fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|token| !token.trim().is_empty()))
}

async fn list_clusters<C: ClusterController>(
    resolver: &ClusterResolver<C>,
    options: &ConnectionOptions,
) -> Result<()> {
    let filter = build_filter(options.cluster_pool_label())?;
    let clusters = resolver
        .list_matching(options.project_id(), options.region(), &filter)
        .await?;

    if clusters.is_empty() {
        println!(
            "No clusters match \"{}\" in project \"{}\" region \"{}\"",
            filter,
            options.project_id(),
            options.region()
        );
        return Ok(());
    }

    println!("{} {}", "Filter:".bold(), filter);
    println!("{}", cluster_table(&clusters));

    if clusters.len() > 1 {
        println!(
            "{}",
            "⚠️  More than one cluster matches; connections with this label will be rejected.".yellow()
        );
    }
    Ok(())
}

fn cluster_table(clusters: &[ClusterRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Cluster", "State", "Host", "YARN Memory Available (MB)"]);

    for cluster in clusters {
        let state = Cell::new(cluster.state()).fg(if cluster.is_running() {
            Color::Green
        } else {
            Color::Yellow
        });
        let host = extract_host(cluster).unwrap_or_else(|_| "-".to_string());
        let memory = cluster.yarn_metric(YARN_MEMORY_AVAILABLE).unwrap_or("-");

        table.add_row(vec![
            Cell::new(&cluster.cluster_name),
            state,
            Cell::new(host),
            Cell::new(memory),
        ]);
    }
    table
}
