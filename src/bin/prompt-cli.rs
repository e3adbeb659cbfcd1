use clap::Parser;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "prompt-cli")]
#[command(about = "Send a prompt through a running gemini-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/gemini-proxy")]
    url: String,

    /// Print the JSON response instead of just the text
    #[arg(long)]
    raw: bool,

    /// Prompt to send
    prompt: String,
}

/// POST the prompt and return the status with the unparsed body.
async fn send_prompt(
    client: &reqwest::Client,
    url: &str,
    prompt: &str,
) -> Result<(StatusCode, String), reqwest::Error> {
    let res = client.post(url).json(&json!({ "prompt": prompt })).send().await?;
    let status = res.status();
    let body = res.text().await?;
    Ok((status, body))
}

/// `Ok` goes to stdout, `Err` to stderr.
fn render(status: StatusCode, body: &str, raw: bool) -> Result<String, String> {
    let failure = |detail: &str| format!("Error: proxy returned status {}\nResponse: {}", status, detail);

    let json = serde_json::from_str::<Value>(body).map_err(|_| failure(body))?;

    if raw {
        return serde_json::to_string_pretty(&json).map_err(|e| failure(&e.to_string()));
    }
    match json.get("text").and_then(Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => Err(failure(json.get("error").and_then(Value::as_str).unwrap_or(body))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (status, body) = send_prompt(&client, &cli.url, &cli.prompt).await?;

    let printed = match render(status, &body, cli.raw) {
        Ok(out) => {
            println!("{}", out);
            true
        }
        Err(err) => {
            eprintln!("{}", err);
            false
        }
    };

    if !printed || !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
