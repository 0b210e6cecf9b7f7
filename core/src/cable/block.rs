use tracing::debug;

use super::CableError;

/// One named CSV block of the diagnostic database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBlock {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataBlock {
    /// Index of the column called `name`, if the header has one.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }
}

/// Extracts the block enclosed in `START_<name>` and `END_<name>`.
///
/// Marker lines must match exactly once trimmed. The first non-empty line of the
/// block is the header. Lines the CSV reader rejects are skipped.
pub fn find_block(text: &str, name: &str) -> Result<DataBlock, CableError> {
    let start = format!("START_{name}");
    let end = format!("END_{name}");

    let mut lines = text.lines().map(str::trim);
    if !lines.any(|line| line == start) {
        return Err(CableError::MissingBlock(name.to_string()));
    }

    let mut records = lines
        .take_while(|line| *line != end)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let record = parse_record(line);
            if record.is_none() {
                debug!("Skipping unreadable {name} line: {line}");
            }
            record
        });

    let Some(header) = records.next() else {
        return Err(CableError::EmptyBlock(name.to_string()));
    };

    Ok(DataBlock {
        name: name.to_string(),
        header,
        rows: records.collect(),
    })
}

fn parse_record(line: &str) -> Option<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let record = reader.records().next()?.ok()?;
    Some(record.iter().map(clean_field).collect())
}

/// Strips surrounding whitespace and quotes.
pub fn clean_field(field: &str) -> String {
    field.trim().trim_matches('"').trim().to_string()
}
