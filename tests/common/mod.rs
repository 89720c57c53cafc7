use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // The server bootstraps the schema itself, so a scratch database
        // named by VIDSHELF_DB in the environment is all the setup needed.
        let mut cmd = Command::new("target/debug/vidshelf");
        cmd.env("VIDSHELF_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and VIDSHELF_DB from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    if resp.status() == StatusCode::OK {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Create a list with a unique name, returning its id.
pub async fn create_list(base_url: &str) -> Result<Uuid> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/lists", base_url))
        .json(&json!({ "name": format!("list-{}", Uuid::new_v4()) }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "list create failed: {}", res.status());
    let body: Value = res.json().await?;
    id_of(&body)
}

/// Pull the "id" field out of a resource body.
pub fn id_of(body: &Value) -> Result<Uuid> {
    let raw = body
        .get("id")
        .and_then(|v| v.as_str())
        .context("response has no id")?;
    Ok(Uuid::parse_str(raw)?)
}
