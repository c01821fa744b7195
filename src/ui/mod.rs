pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{badge, error, header, info, metric, section, success, warn};
pub use table::{internship_table, metrics_table, report_table, TableBuilder};
pub use theme::{theme, Theme};
