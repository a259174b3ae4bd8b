use csv::StringRecord;
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::RunError;

/// The whole input table held in memory, header first.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Table {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RunError> {
        let file = File::open(path.as_ref())?;
        let table = Self::from_reader(file)?;
        info!(
            "loaded {} rows with {} columns from {}",
            table.len(),
            table.headers.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RunError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_strips_bom_and_whitespace() {
        let data = "\u{feff}year , month,season\n2023,5,spring\n2024, 9 ,fall\n";
        let table = Table::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.headers(), &["year", "month", "season"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].get(1), Some("9"));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table = Table::from_reader("year,month\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }
}
