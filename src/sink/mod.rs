//! Row output for pass-to-csv.
//!
//! This module handles:
//! - The `RowWriter` seam finished records are written through
//! - CSV serialization of records
//! - Running entries through the pipeline before writing

use crate::error::Result;
use crate::rules::{Entry, HEADER, Pipeline, Record};
use std::io::Write;
use tracing::debug;

/// Consumer of finished seven-column records.
pub trait RowWriter {
	fn write_record(&mut self, record: &Record) -> Result<()>;

	fn flush(&mut self) -> Result<()> {
		Ok(())
	}
}

impl RowWriter for Vec<Record> {
	fn write_record(&mut self, record: &Record) -> Result<()> {
		self.push(record.clone());
		Ok(())
	}
}

/// Writes records as CSV rows, optionally preceded by a header row.
///
/// Rows end in `\r\n`, the line ending most importers expect.
pub struct CsvRowWriter<W: Write> {
	inner: csv::Writer<W>,
}

impl<W: Write> CsvRowWriter<W> {
	pub fn new(writer: W, header: bool) -> Result<Self> {
		let mut inner = csv::WriterBuilder::new()
			.has_headers(false)
			.terminator(csv::Terminator::CRLF)
			.from_writer(writer);
		if header {
			inner.write_record(HEADER)?;
		}
		Ok(CsvRowWriter { inner })
	}

	/// Flush and return the underlying writer.
	pub fn into_inner(self) -> Result<W> {
		self.inner
			.into_inner()
			.map_err(|e| csv::Error::from(e.into_error()).into())
	}
}

impl<W: Write> RowWriter for CsvRowWriter<W> {
	fn write_record(&mut self, record: &Record) -> Result<()> {
		self.inner.write_record(record.to_row())?;
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		self.inner.flush().map_err(csv::Error::from)?;
		Ok(())
	}
}

/// Adapter that transforms each entry through a [`Pipeline`] before handing
/// the record to the wrapped writer. One write per entry.
pub struct FilteredWriter<W: RowWriter> {
	writer: W,
	pipeline: Pipeline,
}

impl<W: RowWriter> FilteredWriter<W> {
	pub fn new(writer: W, pipeline: Pipeline) -> Self {
		FilteredWriter { writer, pipeline }
	}

	pub fn write_entry(&mut self, entry: &Entry) -> Result<()> {
		let (record, rule) = self.pipeline.classify(entry);
		debug!(identifier = %entry.identifier, %rule, title = %record.title, "classified entry");
		self.writer.write_record(&record)
	}

	pub fn flush(&mut self) -> Result<()> {
		self.writer.flush()
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::{Chain, Preparer};

	fn record() -> Record {
		Record {
			title: "example.com".to_string(),
			username: "bob".to_string(),
			password: "p,w \"q\"".to_string(),
			url: "example.com".to_string(),
			notes: String::new(),
			group: "General".to_string(),
			kind: "Pass".to_string(),
		}
	}

	#[test]
	fn test_csv_row_quoting() {
		let mut writer = CsvRowWriter::new(Vec::new(), false).unwrap();
		writer.write_record(&record()).unwrap();
		let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();

		assert_eq!(
			out,
			"example.com,bob,\"p,w \"\"q\"\"\",example.com,,General,Pass\r\n"
		);
	}

	#[test]
	fn test_csv_header() {
		let writer = CsvRowWriter::new(Vec::new(), true).unwrap();
		let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
		assert_eq!(out, "Title,Username,Password,URL,Notes,Group,Type\r\n");
	}

	#[test]
	fn test_multiline_secret_stays_one_record() {
		let mut writer = CsvRowWriter::new(Vec::new(), false).unwrap();
		let mut r = record();
		r.password = "line1\nline2".to_string();
		writer.write_record(&r).unwrap();
		let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
		assert!(out.contains("\"line1\nline2\""));
	}

	#[test]
	fn test_rows_end_in_crlf() {
		let mut writer = CsvRowWriter::new(Vec::new(), true).unwrap();
		writer.write_record(&record()).unwrap();
		writer.write_record(&record()).unwrap();
		let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();

		assert_eq!(out.matches("\r\n").count(), 3);
		assert!(!out.replace("\r\n", "").contains('\n'));
	}

	#[test]
	fn test_filtered_writer_composes_each_entry() {
		let pipeline = Pipeline::new(
			Preparer::new("General", "Pass"),
			Chain::builder().prefix("work").build(),
		);
		let mut sink = FilteredWriter::new(Vec::new(), pipeline);

		sink.write_entry(&Entry::new("/simple", "a")).unwrap();
		sink.write_entry(&Entry::new("work/site", "b")).unwrap();
		sink.write_entry(&Entry::new("example.com/bob", "c")).unwrap();

		let rows = sink.into_inner();
		assert_eq!(rows.len(), 3);
		assert_eq!(rows[0].title, "simple");
		assert_eq!(rows[1].group, "work");
		assert_eq!(rows[1].title, "site");
		assert_eq!(rows[2].username, "bob");
		assert_eq!(rows[2].password, "c");
	}
}
