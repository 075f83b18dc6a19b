pub mod filters;
pub mod terminal;
pub mod view;

pub use filters::{BlockStatus, Filters};
pub use terminal::{render_notice, render_panel, render_report};
pub use view::ReportView;
