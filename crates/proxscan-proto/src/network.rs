use serde::{Deserialize, Serialize};

/// Shown instead of an empty SSID.
pub const HIDDEN_SSID: &str = "<hidden>";
/// Shown instead of an empty security column.
pub const OPEN_SECURITY: &str = "OPEN";

/// One access point as reported by a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub ssid: String,
    /// Signal quality, 0-100.
    pub signal: u8,
    pub security: String,
    /// Hardware address; the key used by the device stores.
    pub bssid: String,
}

/// Parse `nmcli -t -f SSID,SIGNAL,SECURITY,BSSID dev wifi` output.
///
/// Lines with fewer than four fields are skipped, the rest of the batch is
/// still used. The result is sorted by signal, strongest first.
pub fn parse_nmcli_terse(output: &str) -> Vec<Network> {
    let mut nets: Vec<Network> = output.lines().filter_map(parse_line).collect();
    nets.sort_by(|a, b| b.signal.cmp(&a.signal));
    nets
}

fn parse_line(line: &str) -> Option<Network> {
    let mut fields = split_terse(line);
    if fields.len() < 4 {
        return None;
    }
    // Anything past the fourth separator belongs to the BSSID.
    let bssid = fields.split_off(3).join(":");
    let security = fields.pop().unwrap_or_default();
    let signal = fields.pop().unwrap_or_default();
    let ssid = fields.pop().unwrap_or_default();

    Some(Network {
        ssid: if ssid.is_empty() {
            HIDDEN_SSID.to_string()
        } else {
            ssid
        },
        signal: signal
            .trim()
            .parse::<i64>()
            .map(|s| s.clamp(0, 100) as u8)
            .unwrap_or(0),
        security: if security.is_empty() {
            OPEN_SECURITY.to_string()
        } else {
            security
        },
        bssid,
    })
}

/// Split a terse nmcli line on unescaped `:`. nmcli escapes `:` and `\`
/// inside values with a backslash.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_escaped_bssid() {
        let out = "HomeNet:72:WPA2:AA\\:BB\\:CC\\:DD\\:EE\\:FF\n";
        let nets = parse_nmcli_terse(out);
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].ssid, "HomeNet");
        assert_eq!(nets[0].signal, 72);
        assert_eq!(nets[0].security, "WPA2");
        assert_eq!(nets[0].bssid, "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_defaults_for_empty_fields() {
        let nets = parse_nmcli_terse(":::11\\:22\n");
        assert_eq!(nets[0].ssid, HIDDEN_SSID);
        assert_eq!(nets[0].security, OPEN_SECURITY);
        assert_eq!(nets[0].signal, 0);
        assert_eq!(nets[0].bssid, "11:22");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let out = "broken:line\nCafe:40:WPA1:01\\:02\n\nLab:90::03\\:04\n";
        let nets = parse_nmcli_terse(out);
        assert_eq!(nets.len(), 2);
        assert_eq!(nets[0].ssid, "Lab");
        assert_eq!(nets[1].ssid, "Cafe");
    }

    #[test]
    fn test_sorted_strongest_first() {
        let out = "a:10:WPA2:k1\nb:95:WPA2:k2\nc:55:WPA2:k3\n";
        let signals: Vec<u8> = parse_nmcli_terse(out).iter().map(|n| n.signal).collect();
        assert_eq!(signals, vec![95, 55, 10]);
    }

    #[test]
    fn test_unescaped_bssid_keeps_every_octet() {
        let nets = parse_nmcli_terse("x:50:WPA2:AA:BB:CC\n");
        assert_eq!(nets[0].bssid, "AA:BB:CC");
    }

    #[test]
    fn test_signal_clamped() {
        let nets = parse_nmcli_terse("x:140:WPA2:k\n");
        assert_eq!(nets[0].signal, 100);
    }
}
