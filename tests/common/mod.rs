use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

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

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/client-project-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Ready once health answers, even in degraded mode
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when a database is reachable through DATABASE_URL (including via .env)
pub fn db_configured() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").is_ok()
}

/// Server handle for tests that need durable state; None means skip
pub async fn ensure_server_with_db() -> Result<Option<&'static TestServer>> {
    if !db_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(None);
    }
    Ok(Some(ensure_server().await?))
}

static USER_SEQ: AtomicU32 = AtomicU32::new(0);

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Create a unique user through the admin CLI binary
pub fn create_user(prefix: &str) -> Result<TestUser> {
    let seq = USER_SEQ.fetch_add(1, Ordering::SeqCst);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .subsec_nanos();
    let username = format!("{}-{}-{}-{}", prefix, std::process::id(), seq, nanos);
    let password = "test-password".to_string();

    let output = Command::new("target/debug/cpadmin")
        .args(["user", "add", &username, &password])
        .output()
        .context("failed to run cpadmin")?;
    anyhow::ensure!(
        output.status.success(),
        "cpadmin user add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Output format: "Created user <name> (id <n>)"
    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = stdout
        .rsplit("(id ")
        .next()
        .and_then(|s| s.trim_end().trim_end_matches(')').parse::<i64>().ok())
        .with_context(|| format!("could not parse user id from: {}", stdout))?;

    Ok(TestUser { id, username, password })
}

/// Exchange credentials for the user's opaque token
pub async fn obtain_token(server: &TestServer, user: &TestUser) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api-token-auth/", server.base_url))
        .json(&serde_json::json!({
            "username": user.username,
            "password": user.password,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "token request failed: {}",
        res.status()
    );
    let body: serde_json::Value = res.json().await?;
    Ok(body["token"]
        .as_str()
        .context("missing token in response")?
        .to_string())
}
