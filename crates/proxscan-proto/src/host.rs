//! Host and environment facts shown in the status ticker.
//!
//! Every lookup degrades to a fixed sentinel instead of returning an error.

use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

pub const LAN_UNKNOWN: &str = "IP N/A";
pub const PUBLIC_UNKNOWN: &str = "N/A";
pub const MODEL_UNKNOWN: &str = "UNKNOWN MODEL";
pub const OS_UNKNOWN: &str = "UNKNOWN OS";
pub const GEO_UNKNOWN: &str = "UNKNOWN";

const PUBLIC_IP_URLS: [&str; 2] = ["https://api.ipify.org", "https://ifconfig.me"];
const GEO_URL: &str = "https://ipinfo.io/loc";
const HTTP_TIMEOUT: Duration = Duration::from_secs(2);
const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Facts that need the network and are refreshed on the dwell interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlowFacts {
    pub public_ip: String,
    pub geo: String,
}

impl Default for SlowFacts {
    fn default() -> Self {
        Self {
            public_ip: PUBLIC_UNKNOWN.to_string(),
            geo: GEO_UNKNOWN.to_string(),
        }
    }
}

/// Facts read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFacts {
    pub lan_ip: String,
    pub model: String,
    pub os: String,
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub async fn static_facts() -> StaticFacts {
    StaticFacts {
        lan_ip: lan_ip().await,
        model: device_model(),
        os: os_name(),
    }
}

pub async fn slow_facts(client: &reqwest::Client) -> SlowFacts {
    let (public_ip, geo) = tokio::join!(public_ip(client), geolocation(client));
    SlowFacts { public_ip, geo }
}

/// Trimmed stdout of `program args`, empty on any failure.
async fn command_output(program: &str, args: &[&str]) -> String {
    let fut = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();
    match tokio::time::timeout(COMMAND_TIMEOUT, fut).await {
        Ok(Ok(out)) if out.status.success() => {
            String::from_utf8_lossy(&out.stdout).trim().to_string()
        }
        Ok(Ok(out)) => {
            debug!("host: {} exited with {}", program, out.status);
            String::new()
        }
        Ok(Err(e)) => {
            debug!("host: {} failed: {}", program, e);
            String::new()
        }
        Err(_) => {
            debug!("host: {} timed out", program);
            String::new()
        }
    }
}

/// First address printed by `hostname -I`.
pub async fn lan_ip() -> String {
    first_token(&command_output("hostname", &["-I"]).await)
        .unwrap_or(LAN_UNKNOWN)
        .to_string()
}

fn first_token(out: &str) -> Option<&str> {
    out.split_whitespace().next()
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Option<String> {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!("host: GET {} failed: {}", url, e);
            return None;
        }
    };
    if !resp.status().is_success() {
        debug!("host: GET {} returned {}", url, resp.status());
        return None;
    }
    let body = resp.text().await.ok()?;
    let body = body.replace('\0', "").trim().to_string();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

pub async fn public_ip(client: &reqwest::Client) -> String {
    for url in PUBLIC_IP_URLS {
        if let Some(ip) = fetch_text(client, url).await {
            return ip;
        }
    }
    PUBLIC_UNKNOWN.to_string()
}

pub async fn geolocation(client: &reqwest::Client) -> String {
    fetch_text(client, GEO_URL)
        .await
        .unwrap_or_else(|| GEO_UNKNOWN.to_string())
}

pub fn device_model() -> String {
    match std::fs::read("/proc/device-tree/model") {
        Ok(raw) => parse_model(&raw),
        Err(e) => {
            debug!("host: no device-tree model: {}", e);
            MODEL_UNKNOWN.to_string()
        }
    }
}

pub fn parse_model(raw: &[u8]) -> String {
    let cleaned: Vec<u8> = raw.iter().copied().filter(|b| *b != 0).collect();
    let model = String::from_utf8_lossy(&cleaned).trim().to_string();
    if model.is_empty() {
        MODEL_UNKNOWN.to_string()
    } else {
        model
    }
}

pub fn os_name() -> String {
    match std::fs::read_to_string("/etc/os-release") {
        Ok(content) => parse_os_release(&content),
        Err(e) => {
            debug!("host: no os-release: {}", e);
            OS_UNKNOWN.to_string()
        }
    }
}

/// `PRETTY_NAME` from an os-release document, quotes stripped.
pub fn parse_os_release(content: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|v| v.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| OS_UNKNOWN.to_string())
}

pub fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S %Z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_strips_nuls() {
        assert_eq!(parse_model(b"Raspberry Pi 4 Model B Rev 1.4\0"), "Raspberry Pi 4 Model B Rev 1.4");
        assert_eq!(parse_model(b"\0\0"), MODEL_UNKNOWN);
    }

    #[test]
    fn test_parse_os_release() {
        let content = "NAME=\"Debian GNU/Linux\"\nPRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\n";
        assert_eq!(parse_os_release(content), "Debian GNU/Linux 12 (bookworm)");
        assert_eq!(parse_os_release("ID=arch\n"), OS_UNKNOWN);
    }

    #[test]
    fn test_first_token() {
        assert_eq!(first_token("192.168.1.20 fe80::1 \n"), Some("192.168.1.20"));
        assert_eq!(first_token("   "), None);
    }

    #[test]
    fn test_local_time_shape() {
        let t = local_time();
        assert_eq!(&t[2..3], ":");
        assert_eq!(&t[5..6], ":");
    }
}
