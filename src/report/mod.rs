//! Report Assembler - exportable artifacts built from repository reads
//!
//! - `document`: paginated PDF with one line per report row
//! - `chart`: grouped bar chart PNG of digitalized counts per internship

pub mod chart;
pub mod document;

pub use chart::{render_chart, render_labelled_chart, ChartFont, ChartImage};
pub use document::{layout_pages, render_document, DocumentSettings, Page, PlacedLine};
