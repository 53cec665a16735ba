pub mod keyword_import;
pub mod reader;
pub mod resolver;

pub use keyword_import::{KeywordCsvImporter, ToolProfile};
pub use reader::DelimitedTable;
pub use resolver::ColumnMap;
