use serde::{Deserialize, Serialize};

/// One reachable host found during a scan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub avg_response_ms: f64,
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub open_ports: Vec<String>,
}

impl ScanResult {
    /// A freshly resolved host before latency and ports are filled in.
    pub fn resolved(host: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ip_address: Some(ip.into()),
            avg_response_ms: 0.0,
            reachable: true,
            open_ports: Vec::new(),
        }
    }
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Counters and timing for one scan run.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ScanSummary {
    pub total: u64,
    pub scanned: u64,
    pub reachable: u64,
    pub started_at: String,
    pub elapsed_ms: u64,
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub results: Vec<ScanResult>,
    pub summary: ScanSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_omitted() {
        let r = ScanResult::resolved("www.example.com", "93.184.216.34");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            r#"{"host":"www.example.com","ip_address":"93.184.216.34","reachable":true}"#
        );
    }

    #[test]
    fn missing_fields_default_on_read() {
        let json = r#"{"host":"a.example.com","reachable":true}"#;
        let r: ScanResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.ip_address, None);
        assert_eq!(r.avg_response_ms, 0.0);
        assert!(r.open_ports.is_empty());
    }
}
