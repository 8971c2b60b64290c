//! Table I/O: CSV and Parquet files in, Arrow record batches and domain rows out.

mod convert;
mod error;
mod table;

pub use convert::{combine, report_batch, tagged_lines, transcript_lines, with_tags};
pub use error::StoreError;
pub use table::{TableFormat, read_table, write_table};
