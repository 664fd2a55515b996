//! Adapter table extractor (`wmic ... /format:csv`).

use crate::network::adapter::AdapterRecord;

/// Column order when the dump carries no header row.
const DEFAULT_HEADER: &str = "Node,Description,GUID,MACAddress,Name,NetConnectionID,NetConnectionStatus";

const MIN_COLUMNS: usize = 6;

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    width: usize,
    description: Option<usize>,
    guid: Option<usize>,
    mac: Option<usize>,
    name: Option<usize>,
    connection_id: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn from_header(line: &str) -> Self {
        let names: Vec<String> = line.split(',').map(|c| c.trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|c| c == name);
        Self {
            width: names.len(),
            description: find("description"),
            guid: find("guid"),
            mac: find("macaddress"),
            name: find("name"),
            connection_id: find("netconnectionid"),
            status: find("netconnectionstatus"),
        }
    }
}

/// Parses the adapter table into records, in source order.
///
/// Header and blank rows are skipped. A row is accepted only if its
/// hardware description is non-empty; the description doubles as the
/// display name when the connection id is blank.
#[must_use]
pub fn parse_adapter_table(text: &str) -> Vec<AdapterRecord> {
    let mut columns = Columns::from_header(DEFAULT_HEADER);
    let mut records = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if line.starts_with("Node,") {
            columns = Columns::from_header(line);
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() < MIN_COLUMNS || cells.len() != columns.width {
            tracing::debug!("Skipping malformed adapter row: {line}");
            continue;
        }
        if let Some(record) = parse_row(&cells, &columns) {
            records.push(record);
        }
    }

    records
}

fn parse_row(cells: &[&str], columns: &Columns) -> Option<AdapterRecord> {
    let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i).copied()).unwrap_or("");

    let description = cell(columns.description);
    if description.is_empty() {
        return None;
    }

    let connection_id = cell(columns.connection_id);
    let display_name = if connection_id.is_empty() {
        description
    } else {
        connection_id
    };
    let guid = cell(columns.guid);
    let id = if guid.is_empty() { display_name } else { guid };

    Some(AdapterRecord::new(
        id,
        cell(columns.name),
        display_name,
        description,
        cell(columns.mac),
        cell(columns.status),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::extract::fixtures;

    #[test]
    fn english_dump_yields_described_adapters() {
        let records = parse_adapter_table(fixtures::ENUMERATION_EN);

        assert_eq!(records.len(), 3);
        let ethernet = &records[0];
        assert_eq!(ethernet.id, "{6F1D7A3E-0001}");
        assert_eq!(ethernet.display_name, "Ethernet");
        assert_eq!(ethernet.description, "Intel(R) Ethernet Connection I219-V");
        assert_eq!(ethernet.mac_address, "00:11:22:33:44:55");
        assert_eq!(ethernet.status_code, "2");
        assert!(ethernet.enabled);
    }

    #[test]
    fn blank_connection_id_falls_back_to_description() {
        let records = parse_adapter_table(fixtures::ENUMERATION_EN);
        let virtualbox = &records[2];

        assert_eq!(virtualbox.display_name, "VirtualBox Host-Only Ethernet Adapter");
        assert!(!virtualbox.enabled);
    }

    #[test]
    fn rows_without_description_are_rejected() {
        let records = parse_adapter_table(fixtures::ENUMERATION_EN);
        assert!(records.iter().all(|r| r.display_name != "Bogus"));
    }

    #[test]
    fn chinese_connection_names_survive() {
        let records = parse_adapter_table(fixtures::ENUMERATION_ZH);
        assert_eq!(records[0].display_name, "以太网");
        assert_eq!(records[1].status_code, "7");
    }

    #[test]
    fn header_order_is_respected() {
        let text = "Node,NetConnectionStatus,NetConnectionID,Name,MACAddress,GUID,Description\n\
                    PC,2,Ethernet,Intel NIC,00:11,{G},Intel NIC";
        let records = parse_adapter_table(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "{G}");
        assert_eq!(records[0].display_name, "Ethernet");
        assert_eq!(records[0].status_code, "2");
    }

    #[test]
    fn headerless_rows_use_default_columns() {
        let text = "PC,Intel NIC,{G},00:11,Intel NIC,Ethernet,2";
        let records = parse_adapter_table(text);
        assert_eq!(records[0].display_name, "Ethernet");
    }

    #[test]
    fn blank_guid_uses_display_name_as_id() {
        let text = "PC,Intel NIC,,00:11,Intel NIC,Ethernet,2";
        assert_eq!(parse_adapter_table(text)[0].id, "Ethernet");
    }

    #[test]
    fn short_and_comma_shifted_rows_are_skipped() {
        let text = "PC,Intel NIC,{G}\nPC,Intel, Inc. NIC,{G},00:11,Intel NIC,Ethernet,2";
        assert!(parse_adapter_table(text).is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(parse_adapter_table("").is_empty());
        assert!(parse_adapter_table("\n\n").is_empty());
    }
}
