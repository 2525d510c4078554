use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

use snapshot_api::model::Configuration;
use snapshot_api::resolver::QueryPath;

#[derive(Parser)]
#[command(name = "snapshot-cli")]
#[command(about = "Client for the configuration snapshot API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token, when the API requires authentication.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the snapshot or one entity, e.g. `get docker/backends/b1`
    Get {
        #[arg(default_value = "")]
        path: String,
    },
    /// Submit a configuration file for a provider
    Put { provider: String, file: PathBuf },
    /// Show version and codename
    Version,
    /// Show aggregate request statistics
    Health,
    /// Liveness probe
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    }

    let base_url = Url::parse(&cli.url)?;
    let base = cli.url.trim_end_matches('/');
    match cli.command {
        Commands::Get { path } => {
            let query = QueryPath::parse_str(&path)?;
            let res = client
                .get(api_url(&query, &base_url)?)
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Put { provider, file } => {
            let content = std::fs::read_to_string(&file)?;
            // Catch local mistakes before they reach the server.
            let configuration: Configuration = serde_json::from_str(&content)?;
            let res = client
                .put(api_url(&QueryPath::Provider { provider }, &base_url)?)
                .headers(headers)
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&configuration)?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Version => {
            let res = client.get(format!("{base}/api/version")).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{base}/health")).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Ping => {
            let res = client.get(format!("{base}/ping")).headers(headers).send().await?;
            let status = res.status();
            let text = res.text().await?;
            if status.is_success() {
                println!("{text}");
            } else {
                eprintln!("Error: API returned status {status}");
            }
        }
    }

    Ok(())
}

fn api_url(query: &QueryPath, base: &Url) -> Result<Url, String> {
    query
        .to_url(base)
        .ok_or_else(|| format!("{base} cannot be used as an API base URL"))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
