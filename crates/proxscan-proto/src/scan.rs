use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::network::{parse_nmcli_terse, Network};

/// A source of wireless scans. Implementations never fail: anything that
/// goes wrong yields an empty list.
pub trait NetworkScan {
    fn scan(&self) -> impl Future<Output = Vec<Network>> + Send;
}

/// Runs `nmcli` and parses its terse listing.
#[derive(Debug, Clone)]
pub struct NmcliScanner {
    timeout: Duration,
}

impl NmcliScanner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl NetworkScan for NmcliScanner {
    /// One blocking scan. A missing binary, a non-zero exit or a timeout all
    /// give an empty list.
    async fn scan(&self) -> Vec<Network> {
        let child = tokio::process::Command::new("nmcli")
            .args(["-t", "-f", "SSID,SIGNAL,SECURITY,BSSID", "dev", "wifi"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                warn!("scan: nmcli failed to start: {}", e);
                return Vec::new();
            }
            Err(_) => {
                warn!("scan: nmcli timed out after {:?}", self.timeout);
                return Vec::new();
            }
        };

        if !output.status.success() {
            warn!("scan: nmcli exited with {}", output.status);
            return Vec::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let nets = parse_nmcli_terse(&stdout);
        info!("scan: {} networks", nets.len());
        debug!("scan: raw output {} bytes", output.stdout.len());
        nets
    }
}
