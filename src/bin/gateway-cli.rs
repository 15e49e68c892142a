use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send journal operations through a running gateway", long_about = None)]
struct Cli {
    /// Gateway mount point.
    #[arg(short, long, default_value = "http://localhost:8080/api/gs")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward a GET operation
    Get {
        /// Logical operation path, e.g. `trips`
        path: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// Forward a POST operation
    Post {
        /// Logical operation path, e.g. `trips`
        path: String,
        /// Raw body text
        #[arg(short, long, conflicts_with = "file")]
        body: Option<String>,
        /// Read the raw body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Check gateway liveness
    Health,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Get { path, query } => {
            client
                .get(format!("{}/{}", base, urlencoding::encode(&path)))
                .query(&query)
                .send()
                .await?
        }
        Commands::Post { path, body, file } => {
            let body = match (body, file) {
                (Some(body), _) => body.into_bytes(),
                (None, Some(file)) => std::fs::read(file)?,
                (None, None) => Vec::new(),
            };
            client
                .post(format!("{}/{}", base, urlencoding::encode(&path)))
                .header("content-type", "text/plain;charset=utf-8")
                .body(body)
                .send()
                .await?
        }
        Commands::Health => {
            let origin = reqwest::Url::parse(base)?.join("/healthz")?;
            client.get(origin).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
