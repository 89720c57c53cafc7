use anyhow::Context;

pub async fn handle(base_url: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.context("invalid health response")?;
    println!("{} {}", status.as_u16(), serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("server reported unhealthy");
    }
    Ok(())
}
