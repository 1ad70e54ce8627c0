use crate::alignment::Scanner;
use crate::geometry::Point3D;
use anyhow::Context;
use std::fmt::Write;
use std::path::Path;

/// Load a scanner report from disk
pub fn load_scanners<P: AsRef<Path>>(path: P) -> crate::Result<Vec<Scanner>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scanner report {:?}", path))?;
    parse_scanner_report(&text).with_context(|| format!("Malformed scanner report {:?}", path))
}

/// Parse the textual report format:
///
/// ```text
/// --- scanner 0 ---
/// 404,-588,-901
/// 528,-643,409
///
/// --- scanner 1 ---
/// 686,422,578
/// ```
///
/// Each header starts a scanner named after the text between the dashes.
pub fn parse_scanner_report(text: &str) -> crate::Result<Vec<Scanner>> {
    let mut scanners: Vec<Scanner> = Vec::new();

    for (line_index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let line_number = line_index + 1;

        if line.is_empty() {
            continue;
        }

        if line.starts_with("---") {
            let name = line.trim_matches('-').trim();
            let name = if name.is_empty() {
                format!("scanner {}", scanners.len())
            } else {
                name.to_string()
            };
            scanners.push(Scanner::new(name, Vec::new()));
            continue;
        }

        let scanner = scanners.last_mut().ok_or_else(|| {
            anyhow::anyhow!("Line {}: beacon '{}' appears before any scanner header", line_number, line)
        })?;
        let beacon: Point3D = line
            .parse()
            .with_context(|| format!("Line {}: invalid beacon in {}", line_number, scanner.name))?;
        scanner.beacons.push(beacon);
    }

    if scanners.is_empty() {
        return Err(anyhow::anyhow!("No scanners found in report"));
    }

    for scanner in &scanners {
        tracing::debug!(scanner = %scanner.name, beacons = scanner.beacon_count(), "Parsed scanner");
    }

    Ok(scanners)
}

/// Render scanners back into the report format accepted by `parse_scanner_report`
pub fn format_scanner_report(scanners: &[Scanner]) -> String {
    let mut report = String::new();
    for (i, scanner) in scanners.iter().enumerate() {
        if i > 0 {
            report.push('\n');
        }
        let _ = writeln!(report, "--- {} ---", scanner.name);
        for beacon in &scanner.beacons {
            let _ = writeln!(report, "{}", beacon);
        }
    }
    report
}
