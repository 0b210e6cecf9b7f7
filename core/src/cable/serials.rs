//! Serial number consistency of the cable inventory.
//!
//! Every transceiver should be reported once per cable end it terminates. Parts whose
//! number contains one of [`DUAL_PORT_PATTERNS`] serve two ports and are expected
//! twice; everything else once. A serial seen more often is a duplicate (two modules
//! sharing one serial), one seen less often is incomplete (a missing or dead port).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;

use super::{CableError, CableRecord};

pub const DUAL_PORT_PATTERNS: [&str; 2] = ["SR8", "DR8"];

const RULE: usize = 60;

pub fn is_dual_port(pn: &str) -> bool {
    DUAL_PORT_PATTERNS.iter().any(|pattern| pn.contains(pattern))
}

/// Number of records expected per serial number for part `pn`.
pub fn expected_count(pn: &str) -> usize {
    if is_dual_port(pn) { 2 } else { 1 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialProblem {
    pub sn: String,
    pub pn: String,
    pub vendor: String,
    pub actual: usize,
    pub expected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialAnalysis {
    pub total_records: usize,
    /// Records carrying a serial number.
    pub valid_records: usize,
    pub unique_serials: usize,
    pub dual_port_records: usize,
    pub single_port_records: usize,
    /// Sorted by serial number.
    pub duplicates: Vec<SerialProblem>,
    /// Sorted by serial number.
    pub incomplete: Vec<SerialProblem>,
}

struct SerialEntry<'a> {
    count: usize,
    pn: &'a str,
    vendor: &'a str,
}

impl SerialAnalysis {
    /// Counts records per serial number. PN and vendor of a serial are taken from
    /// its first record.
    pub fn analyze(records: &[CableRecord]) -> Result<Self, CableError> {
        if records.is_empty() {
            return Err(CableError::NoRecords);
        }

        let mut serials: BTreeMap<&str, SerialEntry<'_>> = BTreeMap::new();
        let mut analysis = SerialAnalysis {
            total_records: records.len(),
            ..SerialAnalysis::default()
        };

        for record in records {
            if !record.pn.is_empty() {
                if is_dual_port(&record.pn) {
                    analysis.dual_port_records += 1;
                } else {
                    analysis.single_port_records += 1;
                }
            }

            if record.sn.is_empty() {
                continue;
            }
            analysis.valid_records += 1;
            serials
                .entry(record.sn.as_str())
                .or_insert(SerialEntry {
                    count: 0,
                    pn: &record.pn,
                    vendor: &record.vendor,
                })
                .count += 1;
        }

        analysis.unique_serials = serials.len();

        for (sn, entry) in serials {
            let expected = expected_count(entry.pn);
            let problem = || SerialProblem {
                sn: sn.to_string(),
                pn: entry.pn.to_string(),
                vendor: entry.vendor.to_string(),
                actual: entry.count,
                expected,
            };

            if entry.count > expected {
                analysis.duplicates.push(problem());
            } else if entry.count < expected {
                analysis.incomplete.push(problem());
            }
        }

        Ok(analysis)
    }

    pub fn problem_count(&self) -> usize {
        self.duplicates.len() + self.incomplete.len()
    }

    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }

    pub fn problem_serials(&self) -> BTreeSet<&str> {
        self.duplicates
            .iter()
            .chain(&self.incomplete)
            .map(|problem| problem.sn.as_str())
            .collect()
    }

    /// Records whose serial number is a duplicate or incomplete, in input order.
    pub fn problem_records<'a>(&self, records: &'a [CableRecord]) -> Vec<&'a CableRecord> {
        let serials = self.problem_serials();
        records
            .iter()
            .filter(|record| serials.contains(record.sn.as_str()))
            .collect()
    }

    /// Plain text report written next to the CSV files.
    pub fn render_report(&self, generated_at: &NaiveDateTime) -> String {
        self.report(generated_at).to_string()
    }

    pub fn report<'a>(&'a self, generated_at: &'a NaiveDateTime) -> SerialReport<'a> {
        SerialReport {
            analysis: self,
            generated_at,
        }
    }
}

/// Text form of a [`SerialAnalysis`].
pub struct SerialReport<'a> {
    analysis: &'a SerialAnalysis,
    generated_at: &'a NaiveDateTime,
}

impl fmt::Display for SerialReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        let dual_port = DUAL_PORT_PATTERNS.join("/");

        writeln!(f, "================== IB transceiver SN report ==================")?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Dual port transceivers ({dual_port}) are expected twice, all others once\n")?;

        writeln!(f, "Overview:")?;
        writeln!(f, "  Total records: {}", analysis.total_records)?;
        writeln!(f, "  Records with SN: {}", analysis.valid_records)?;
        writeln!(f, "  Unique SN: {}\n", analysis.unique_serials)?;

        writeln!(f, "Transceiver types:")?;
        writeln!(f, "  Dual port ({dual_port}): {} records", analysis.dual_port_records)?;
        writeln!(f, "  Single port (other): {} records\n", analysis.single_port_records)?;

        if analysis.is_clean() {
            return writeln!(f, "Result: no duplicate or incomplete SN found");
        }

        writeln!(f, "Result: {} problem SN found\n", analysis.problem_count())?;
        write_section(
            f,
            &format!("Duplicate SN ({}), possibly cloned transceivers:", analysis.duplicates.len()),
            &analysis.duplicates,
        )?;
        write_section(
            f,
            &format!("Incomplete SN ({}), possibly failed ports or links:", analysis.incomplete.len()),
            &analysis.incomplete,
        )
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, problems: &[SerialProblem]) -> fmt::Result {
    if problems.is_empty() {
        return Ok(());
    }

    let rule = "-".repeat(RULE);
    writeln!(f, "{title}")?;
    writeln!(f, "{rule}")?;
    writeln!(f, "{:<18} {:<16} {:<12} {:>8} {:>8}", "SN", "PN", "Vendor", "Count", "Expect")?;
    writeln!(f, "{rule}")?;
    for problem in problems {
        writeln!(
            f,
            "{:<18} {:<16} {:<12} {:>8} {:>8}",
            problem.sn, problem.pn, problem.vendor, problem.actual, problem.expected
        )?;
    }
    writeln!(f)
}

pub fn write_report(path: &Path, report: &str) -> anyhow::Result<()> {
    std::fs::write(path, report).with_context(|| format!("writing {}", path.display()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(pn: &str, sn: &str) -> CableRecord {
        CableRecord {
            pn: pn.to_string(),
            sn: sn.to_string(),
            vendor: "Mellanox".to_string(),
            ..CableRecord::default()
        }
    }

    fn repeated(pn: &str, sn: &str, times: usize) -> Vec<CableRecord> {
        (0..times).map(|_| record(pn, sn)).collect()
    }

    #[test]
    fn test_expected_counts() {
        assert_eq!(expected_count("MMA4Z00-NS400 SR8"), 2);
        assert_eq!(expected_count("MMS4X00-NM-DR8"), 2);
        assert_eq!(expected_count("MCP1650-H002E26"), 1);
        assert_eq!(expected_count(""), 1);
    }

    #[test]
    fn test_dual_port_seen_twice_is_clean() {
        let analysis = SerialAnalysis::analyze(&repeated("OSFP-SR8", "SN1", 2)).unwrap();
        assert!(analysis.is_clean());
        assert_eq!(analysis.dual_port_records, 2);
    }

    #[test]
    fn test_dual_port_seen_three_times_is_duplicate() {
        let analysis = SerialAnalysis::analyze(&repeated("OSFP-SR8", "SN1", 3)).unwrap();
        assert_eq!(
            analysis.duplicates,
            vec![SerialProblem {
                sn: "SN1".to_string(),
                pn: "OSFP-SR8".to_string(),
                vendor: "Mellanox".to_string(),
                actual: 3,
                expected: 2,
            }]
        );
        assert!(analysis.incomplete.is_empty());
    }

    #[test]
    fn test_dual_port_seen_once_is_incomplete() {
        let analysis = SerialAnalysis::analyze(&repeated("QSFP-DR8", "SN9", 1)).unwrap();
        assert_eq!(analysis.incomplete.len(), 1);
        assert_eq!((analysis.incomplete[0].actual, analysis.incomplete[0].expected), (1, 2));
    }

    #[test]
    fn test_single_port_seen_twice_is_duplicate() {
        let analysis = SerialAnalysis::analyze(&repeated("MCP1650", "SN2", 2)).unwrap();
        assert_eq!(analysis.duplicates[0].expected, 1);
        assert_eq!(analysis.duplicates[0].actual, 2);
    }

    #[test]
    fn test_counters_and_ordering() {
        let mut records = repeated("MCP1650", "SNb", 2);
        records.extend(repeated("MCP1650", "SNa", 2));
        records.push(record("MCP1650", ""));
        records.push(record("", "SNc"));

        let analysis = SerialAnalysis::analyze(&records).unwrap();
        assert_eq!(analysis.total_records, 6);
        assert_eq!(analysis.valid_records, 5);
        assert_eq!(analysis.unique_serials, 3);
        assert_eq!(analysis.single_port_records, 5);
        assert_eq!(analysis.dual_port_records, 0);

        let serials: Vec<&str> = analysis.duplicates.iter().map(|p| p.sn.as_str()).collect();
        assert_eq!(serials, vec!["SNa", "SNb"]);
        assert_eq!(analysis.problem_records(&records).len(), 4);
    }

    #[test]
    fn test_no_records_is_an_error() {
        assert_eq!(SerialAnalysis::analyze(&[]), Err(CableError::NoRecords));
    }

    #[test]
    fn test_report_lists_problems() {
        let generated = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();

        let clean = SerialAnalysis::analyze(&repeated("OSFP-SR8", "SN1", 2)).unwrap();
        let text = clean.render_report(&generated);
        assert!(text.contains("Generated: 2024-05-01 08:00:00"));
        assert!(text.contains("no duplicate or incomplete SN found"));

        let broken = SerialAnalysis::analyze(&repeated("OSFP-SR8", "SN1", 3)).unwrap();
        let text = broken.render_report(&generated);
        assert!(text.contains("Duplicate SN (1)"));
        assert!(!text.contains("Incomplete SN"));
        let row = text.lines().find(|line| line.starts_with("SN1")).unwrap();
        assert!(row.ends_with("       3        2"));
    }

    #[test]
    fn test_report_sections_follow_the_problems() {
        let generated = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let mut records = repeated("QSFP-DR8", "SN1", 1);
        records.extend(repeated("MCP1650", "SN2", 2));
        let analysis = SerialAnalysis::analyze(&records).unwrap();

        let text = format!("{}", analysis.report(&generated));
        assert_eq!(text, analysis.render_report(&generated));
        assert!(text.contains("Dual port (SR8/DR8): 1 records"));
        assert!(text.contains("Result: 2 problem SN found"));

        let duplicate = text.find("Duplicate SN (1)").unwrap();
        let incomplete = text.find("Incomplete SN (1)").unwrap();
        assert!(duplicate < incomplete);
        assert!(text.ends_with("        2\n\n"));
    }
}
