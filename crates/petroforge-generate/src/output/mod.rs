pub mod csv;

pub use self::csv::{CsvArtifact, write_table_csv, write_tables_csv};
