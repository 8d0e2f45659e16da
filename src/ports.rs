use anyhow::{bail, Context, Result};
use std::collections::HashSet;

/// Parse the user's port selection into canonical port strings, in probe order.
///
/// Supported entries, separated by commas:
/// - single port number: `80`
/// - inclusive range: `8000-8010`
/// - whitespace and empty entries are ignored
///
/// Duplicates are dropped, keeping the first appearance.
pub fn parse_port_list(s: &str) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for raw in s.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            continue;
        }

        if let Some((a, b)) = entry.split_once('-') {
            let start = parse_port_str(a.trim())
                .with_context(|| format!("invalid start in range: {entry}"))?;
            let end = parse_port_str(b.trim())
                .with_context(|| format!("invalid end in range: {entry}"))?;
            if start > end {
                bail!("invalid range {start}-{end} (start > end)");
            }
            for p in start..=end {
                if seen.insert(p) {
                    out.push(p.to_string());
                }
            }
            continue;
        }

        let p = parse_port_str(entry).with_context(|| format!("invalid port value: {entry}"))?;
        if seen.insert(p) {
            out.push(p.to_string());
        }
    }

    Ok(out)
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}
