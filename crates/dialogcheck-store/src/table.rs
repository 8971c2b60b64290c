//! Reading and writing whole tables as CSV or Parquet.
//!
//! CSV columns are always read as `Utf8`, so conversation ids like `007`
//! keep their leading zeros and nothing depends on type inference.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::info;

use crate::StoreError;

/// On-disk table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") | Some("pq") => Ok(Self::Parquet),
            _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read a CSV or Parquet file into Arrow RecordBatches.
pub fn read_table(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let format = TableFormat::from_path(path)?;
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let batches = match format {
        TableFormat::Csv => read_csv(path)?,
        TableFormat::Parquet => read_parquet(path)?,
    };

    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    info!(path = %path.display(), rows, "read table");
    Ok(batches)
}

/// Write a single RecordBatch as CSV (with header) or Parquet.
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<(), StoreError> {
    let format = TableFormat::from_path(path)?;
    let file = File::create(path)?;

    match format {
        TableFormat::Csv => {
            let mut writer = WriterBuilder::new().with_header(true).build(file);
            writer.write(batch)?;
        }
        TableFormat::Parquet => {
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
            writer.write(batch)?;
            writer.close()?;
        }
    }

    info!(path = %path.display(), rows = batch.num_rows(), "wrote table");
    Ok(())
}

fn read_csv(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let mut file = File::open(path)?;
    // Only the header names are needed; every column is read as Utf8.
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(1))?;
    file.rewind()?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema).with_header(true).build(file)?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok(batches?)
}

fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok(batches?)
}
