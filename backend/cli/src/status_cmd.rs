//! CLI Status Command
//!
//! Probes a running server's `/health` endpoint.

use anyhow::Result;
use serde_json::Value;

pub async fn run(port: u16) -> Result<()> {
    println!("Folio status: checking...");
    let client = reqwest::Client::new();
    match client
        .get(format!("http://localhost:{port}/health"))
        .send()
        .await
    {
        Ok(resp) => {
            let status = resp.status();
            let body: Value = resp.json().await?;
            if status.is_success() {
                println!("🟢 healthy ({status})");
            } else {
                println!("🔴 unhealthy ({status})");
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("Folio is not running on port {port}");
        }
    }
    Ok(())
}
