use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use super::DataBlock;
use super::inventory::HOST_INFO_COLUMN;
use crate::nodes::HostLookup;

/// Source column of every output field. `PHY_DB12` does not name its module
/// fields, part and serial numbers live in `field23` and `field26`.
const SOURCE_COLUMNS: [&str; 5] = ["PortGuid", "NodeGuid", "PortNum", "field23", "field26"];
pub const PHY_HEADER: [&str; 5] = ["PortGuid", "NodeGuid", "PortNum", "PartNumber", "SerialNumber"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhyRecord {
    pub port_guid: String,
    pub node_guid: String,
    pub port_num: String,
    pub part_number: String,
    pub serial_number: String,
}

impl PhyRecord {
    pub fn to_row(&self) -> [&str; 5] {
        [
            &self.port_guid,
            &self.node_guid,
            &self.port_num,
            &self.part_number,
            &self.serial_number,
        ]
    }
}

/// One record per serial number, first occurrence wins. Rows without a serial
/// number are all kept.
pub fn extract_phy(block: &DataBlock) -> Vec<PhyRecord> {
    let indices = SOURCE_COLUMNS.map(|column| block.column(column));
    let mut seen: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();

    for row in &block.rows {
        let field = |column: usize| {
            indices[column]
                .and_then(|index| row.get(index))
                .map(String::as_str)
                .unwrap_or_default()
        };

        let serial = field(4);
        if !serial.is_empty() && !seen.insert(serial) {
            continue;
        }

        records.push(PhyRecord {
            port_guid: field(0).to_string(),
            node_guid: field(1).to_string(),
            port_num: field(2).to_string(),
            part_number: field(3).to_string(),
            serial_number: serial.to_string(),
        });
    }

    records
}

pub fn write_phy(path: &Path, records: &[PhyRecord], hosts: Option<&mut (dyn HostLookup + '_)>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_phy_to(file, records, hosts).with_context(|| format!("writing {}", path.display()))
}

pub fn write_phy_to<W: Write>(
    writer: W,
    records: &[PhyRecord],
    mut hosts: Option<&mut (dyn HostLookup + '_)>,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = PHY_HEADER.to_vec();
    if hosts.is_some() {
        header.push(HOST_INFO_COLUMN);
    }
    wtr.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = record.to_row().iter().map(|field| field.to_string()).collect();
        if let Some(hosts) = hosts.as_deref_mut() {
            row.push(hosts.host_info(&record.node_guid));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cable::find_block;

    const PHY: &str = "\
START_PHY_DB12
NodeGuid,PortGuid,PortNum,field22,field23,field24,field25,field26
0xn1,0xp1,1,x,MMA4Z00-NS,x,x,SN001
0xn1,0xp2,2,x,MMA4Z00-NS,x,x,SN001
0xn2,0xp3,1,x,MCP1650,x,x,
0xn2,0xp4,2,x,MCP1650,x,x,
END_PHY_DB12
";

    #[test]
    fn maps_field_columns_and_deduplicates() {
        let block = find_block(PHY, "PHY_DB12").unwrap();
        let records = extract_phy(&block);
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            PhyRecord {
                port_guid: "0xp1".to_string(),
                node_guid: "0xn1".to_string(),
                port_num: "1".to_string(),
                part_number: "MMA4Z00-NS".to_string(),
                serial_number: "SN001".to_string(),
            }
        );
        assert_eq!(records[1].port_guid, "0xp3");
        assert_eq!(records[2].port_guid, "0xp4");
    }

    #[test]
    fn writes_header_in_output_order() {
        let block = find_block(PHY, "PHY_DB12").unwrap();
        let mut out = Vec::new();
        write_phy_to(&mut out, &extract_phy(&block), None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("PortGuid,NodeGuid,PortNum,PartNumber,SerialNumber"));
        assert_eq!(lines.next(), Some("0xp1,0xn1,1,MMA4Z00-NS,SN001"));
    }
}
