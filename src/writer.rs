use crate::models::PostingRecord;
use crate::taxonomy::Taxonomy;
use crate::{Error, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Leading columns of the technology report, before one column per technology.
pub const DESCRIPTIVE_COLUMNS: [&str; 6] = [
    "Должность",
    "Ссылка",
    "Компания",
    "Зарплата",
    "Опыт",
    "Удаленная работа",
];
pub const SALARY_NOT_SPECIFIED: &str = "не указана";
pub const REMOTE_YES: &str = "Да";
pub const REMOTE_NO: &str = "Нет";

/// In-memory copy of an exported CSV file: a header and rows of cells.
///
/// Tables built by [`export`] or [`ReportTable::push_row`] always have rows
/// as wide as the header. Tables read back from disk are taken as they are;
/// the importer rejects ragged ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn from_parts(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.header.len() {
            return Err(Error::RowWidth {
                row: self.rows.len() + 1,
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Self::read_from(File::open(path)?)
    }

    /// First record is the header. Rows may differ in width from it.
    pub fn read_from<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut records = reader.records();
        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(Error::EmptyTable),
        };
        let rows = records
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { header, rows })
    }
}

/// Builds the technology report: descriptive columns, then a 0/1 flag for
/// every technology in taxonomy order.
pub fn export(records: &[PostingRecord], taxonomy: &Taxonomy) -> ReportTable {
    let header = DESCRIPTIVE_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(taxonomy.ids().map(|id| id.to_string()))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let descriptive = [
                record.title.clone(),
                record.url.clone(),
                record.company.clone(),
                record
                    .salary
                    .clone()
                    .unwrap_or_else(|| SALARY_NOT_SPECIFIED.to_string()),
                record.experience.clone(),
                if record.remote { REMOTE_YES } else { REMOTE_NO }.to_string(),
            ];
            let flags = taxonomy
                .ids()
                .map(|id| if record.skills.contains(id) { "1" } else { "0" }.to_string());
            descriptive.into_iter().chain(flags).collect()
        })
        .collect();

    ReportTable::from_parts(header, rows)
}
