//! Rendering of port listings

use port_info::PortDescriptor;
use serde::Serialize;

/// Busy/valid probe results for one port
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProbeState {
    pub busy: bool,
    pub valid: bool,
}

impl ProbeState {
    pub fn of(port: &PortDescriptor) -> Self {
        Self {
            busy: port.is_busy(),
            valid: port.is_valid(),
        }
    }
}

/// One listed port with optional probe state
#[derive(Debug, Serialize)]
pub struct PortRow<'a> {
    #[serde(flatten)]
    pub port: &'a PortDescriptor,
    #[serde(flatten)]
    pub probe: Option<ProbeState>,
}

/// Render rows as pretty JSON
pub fn render_json(rows: &[PortRow<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Render rows as aligned columns
pub fn render_table(rows: &[PortRow<'_>]) -> String {
    if rows.is_empty() {
        return "No serial ports found\n".to_string();
    }

    let with_probe = rows.iter().any(|r| r.probe.is_some());
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);

    let mut header = vec!["PORT", "LOCATION", "VID:PID", "MANUFACTURER", "DESCRIPTION"];
    if with_probe {
        header.push("STATE");
    }
    lines.push(header.into_iter().map(String::from).collect());

    for row in rows {
        let port = row.port;
        let ids = if port.vendor_identifier().is_empty() && port.product_identifier().is_empty() {
            "-".to_string()
        } else {
            format!("{}:{}", port.vendor_identifier(), port.product_identifier())
        };
        let mut line = vec![
            port.port_name().to_string(),
            port.system_location().to_string(),
            ids,
            port.manufacturer().to_string(),
            port.description().to_string(),
        ];
        if with_probe {
            line.push(row.probe.map(state_label).unwrap_or("-").to_string());
        }
        lines.push(line);
    }

    let columns = lines[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| lines.iter().map(|l| l[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Short label for a probe state
pub fn state_label(state: ProbeState) -> &'static str {
    match (state.busy, state.valid) {
        (true, _) => "busy",
        (false, true) => "free",
        (false, false) => "invalid",
    }
}
