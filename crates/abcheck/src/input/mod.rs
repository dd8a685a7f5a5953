//! Input loading and data source handling.

mod fetch;
mod parser;
mod source;

pub use fetch::{read_source, DEFAULT_TIMEOUT};
pub use parser::{parse_delimiter, Parser, ParserConfig};
pub use source::{DataSource, DataTable, SourceMetadata};
