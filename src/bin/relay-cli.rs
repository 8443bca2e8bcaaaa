use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the web relay", long_about = None)]
struct Cli {
    /// Relay base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token, when the relay has auth enabled
    #[arg(short, long)]
    token: Option<String>,

    /// Relay endpoint path
    #[arg(long, default_value = "/relay")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay status
    Status,
    /// Fetch a page through the relay and print the rewritten response
    Fetch {
        /// Target URL; a bare host is upgraded to https
        target: String,
    },
    /// Manage session history
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List recorded sessions, most recent first
    List,
    /// Record a visited URL
    Add {
        url: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete a session by id
    Delete { id: i64 },
    /// Delete every session of the current user
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Fetch { target } => {
            let res = client
                .get(format!("{}{}", base, cli.endpoint))
                .query(&[("url", target)])
                .headers(headers)
                .send()
                .await?;
            println!("{}", res.status());
            for (name, value) in res.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
            println!();
            println!("{}", res.text().await?);
        }
        Commands::Sessions { action } => {
            let sessions = format!("{}/api/sessions", base);
            let res = match action {
                SessionAction::List => client.get(&sessions).headers(headers).send().await?,
                SessionAction::Add { url, title } => {
                    client
                        .post(&sessions)
                        .headers(headers)
                        .json(&json!({ "url": url, "title": title }))
                        .send()
                        .await?
                }
                SessionAction::Clear => client.delete(&sessions).headers(headers).send().await?,
                SessionAction::Delete { id } => {
                    client
                        .delete(format!("{}/{}", sessions, id))
                        .headers(headers)
                        .send()
                        .await?
                }
            };
            print_json(res).await?;
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }
    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
