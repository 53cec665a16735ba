pub mod gsc_workbook;

pub use gsc_workbook::GscWorkbook;
