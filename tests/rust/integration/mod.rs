//! Integration test harness - host-level pieces wired together: rule files
//! on disk, engine ingestion, and the render edge.

mod render_edge_tests;
mod rule_file_tests;
