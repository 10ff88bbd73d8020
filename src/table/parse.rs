use crate::table::{Column, ColumnData, Table};
use crate::Result;
use anyhow::{Context, anyhow, bail};
use std::fs;
use std::io;
use std::path::Path;

/// Read a delimited profiler report into a [`Table`].
///
/// The first non-blank line is the header. A column is numeric when every
/// non-empty cell parses as a finite number; anything else is text.
///
/// Example (delimiter `^`):
/// Function^Source File^CPU Time
/// [Outside any known module]^[Unknown]^0
pub fn read_delimited(path: impl AsRef<Path>, delim: char) -> Result<Table> {
    let path = path.as_ref();
    let reader = reader_builder(delim)?
        .from_path(path)
        .with_context(|| format!("read report file {}", path.display()))?;
    load(reader).with_context(|| format!("parse report file {}", path.display()))
}

/// Parse delimited text. Errors carry the 1-based line number.
pub fn parse_delimited(text: &str, delim: char) -> Result<Table> {
    load(reader_builder(delim)?.from_reader(text.as_bytes()))
}

fn delimiter_byte(delim: char) -> Result<u8> {
    if !delim.is_ascii() {
        bail!("delimiter {:?} is not a single ASCII character", delim);
    }
    Ok(delim as u8)
}

fn reader_builder(delim: char) -> Result<csv::ReaderBuilder> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter_byte(delim)?)
        .has_headers(true)
        .flexible(true);
    Ok(builder)
}

fn load<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
    let header = reader.headers().context("line 1")?.clone();
    if header.is_empty() {
        bail!("report has no header line");
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); header.len()];
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != header.len() {
            bail!(
                "line {}: expected {} fields, found {}",
                line,
                header.len(),
                record.len()
            );
        }
        for (col, f) in cells.iter_mut().zip(record.iter()) {
            col.push(f.to_string());
        }
    }

    let columns = header
        .iter()
        .zip(cells)
        .map(|(name, raw)| Column {
            name: name.to_string(),
            data: classify(raw),
        })
        .collect();

    Ok(Table::from_columns(columns)?)
}

fn classify(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return Some(None);
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(Some(v)),
                _ => None,
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(raw),
    }
}

impl Table {
    /// Render as delimited text with a header line. Output is deterministic;
    /// fields are quoted only when they contain the delimiter, a quote or a
    /// line break.
    pub fn to_delimited(&self, delim: char) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_byte(delim)?)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(self.columns().iter().map(|c| c.name.as_str()))?;
        for row in 0..self.num_rows() {
            writer.write_record(self.columns().iter().map(|c| c.cell(row)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("flush delimited output: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn write_delimited(&self, path: impl AsRef<Path>, delim: char) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_delimited(delim)?)
            .with_context(|| format!("write table {}", path.display()))
    }
}
