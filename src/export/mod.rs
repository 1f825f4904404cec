//! Download artifacts built from the merged table.

pub mod csv_writer;
pub mod xlsx_writer;

pub use csv_writer::to_csv;
pub use xlsx_writer::to_xlsx;
