//! Reporting and rendering helpers.
//!
//! Formats benchmark outcomes as console text, TSV and a standalone HTML
//! page (Plotly + maud), and renders fitted decision trees for inspection.
pub mod html;
pub mod plots;
pub mod summary;
pub mod tree_render;

pub use html::write_html_report;
pub use summary::{format_report, write_results_tsv};
pub use tree_render::{render_tree, DotRenderer, RenderFormat, TikzRenderer, TreeRenderer};
