//! Link speed extractors.
//!
//! Two sources: the system-wide speed table (`wmic nic ... get Name,Speed`),
//! matched by hardware description, and for wireless adapters the receive
//! rate reported by `netsh wlan show interfaces`.

use super::{Field, fields};

/// Speed reported by drivers that have no link.
const NO_LINK_SPEED: u64 = i64::MAX.unsigned_abs();

/// Receive-rate labels, lowercased with spaces removed.
const RATE_LABELS: &[&str] = &["receiverate(mbps)", "receiverate", "接收速率(mbps)", "接收速率"];
const NAME_LABELS: &[&str] = &["name", "名称"];

/// Formats bits per second as bps, Mbps or Gbps with one decimal place.
#[must_use]
#[allow(clippy::cast_precision_loss)] // display precision only
pub fn format_bits_per_second(bps: u64) -> String {
    let value = bps as f64;
    if value >= 1e9 {
        format!("{:.1} Gbps", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1} Mbps", value / 1e6)
    } else {
        format!("{bps} bps")
    }
}

/// Looks up the speed of the adapter with `description` in the speed table.
///
/// An exact (case-insensitive) name match is preferred; otherwise a name
/// that contains, or is contained in, the description.
#[must_use]
pub fn parse_speed_table(text: &str, description: &str) -> Option<String> {
    let wanted = description.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let rows: Vec<(String, u64)> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Node,"))
        .filter_map(parse_speed_row)
        .collect();

    let exact = rows.iter().find(|(name, _)| *name == wanted);
    let fuzzy = || {
        rows.iter()
            .find(|(name, _)| name.contains(&wanted) || wanted.contains(name.as_str()))
    };
    exact
        .or_else(fuzzy)
        .map(|(_, bps)| format_bits_per_second(*bps))
}

/// `Node,Name,Speed` with the name possibly containing commas.
fn parse_speed_row(line: &str) -> Option<(String, u64)> {
    let cells: Vec<&str> = line.split(',').collect();
    if cells.len() < 3 {
        return None;
    }
    let speed: u64 = cells[cells.len() - 1].trim().parse().ok()?;
    let name = cells[1..cells.len() - 1].join(",").trim().to_lowercase();
    (speed > 0 && speed != NO_LINK_SPEED && !name.is_empty()).then_some((name, speed))
}

/// Receive rate of the wireless interface named `adapter_name`, as "X Mbps".
///
/// If no section carries that name, the first section with a rate is used.
#[must_use]
pub fn parse_wireless_rate(text: &str, adapter_name: &str) -> Option<String> {
    let parsed = fields(text);
    let sections = split_sections(&parsed);
    let named = sections.iter().find(|section| {
        section
            .iter()
            .any(|f| f.is_any(NAME_LABELS) && f.value().eq_ignore_ascii_case(adapter_name.trim()))
    });

    named
        .and_then(|section| rate_of(section))
        .or_else(|| sections.iter().find_map(|section| rate_of(section)))
        .map(|rate| format!("{rate} Mbps"))
}

/// Groups fields into per-interface sections, each starting at a name field.
fn split_sections<'a, 'b>(fields: &'b [Field<'a>]) -> Vec<&'b [Field<'a>]> {
    let starts: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_any(NAME_LABELS))
        .map(|(i, _)| i)
        .collect();
    if starts.is_empty() {
        return vec![fields];
    }
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(fields.len());
            &fields[start..end]
        })
        .collect()
}

fn rate_of<'a>(section: &[Field<'a>]) -> Option<&'a str> {
    section.iter().find_map(|f| {
        let label = f.label.to_lowercase().replace(' ', "");
        if !RATE_LABELS.contains(&label.as_str()) {
            return None;
        }
        let value = f.values.first().copied()?;
        let end = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(value.len());
        let number = &value[..end];
        number.parse::<f64>().ok().map(|_| number)
    })
}
