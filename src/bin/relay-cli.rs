use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for a running search relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the client settings the relay exposes
    Config,
    /// Send a raw JSON search request
    Search {
        /// Request body, e.g. '{"search":"hello","top":5}'
        body: String,
    },
    /// Search for plain text
    Query {
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Config => {
            let res = client.get(format!("{}/api/config", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Search { body } => {
            let body: Value = serde_json::from_str(&body)?;
            let res = client
                .post(format!("{}/api/search", base))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Query { text } => {
            let res = client
                .post(format!("{}/api/search", base))
                .json(&json!({ "search": text }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
