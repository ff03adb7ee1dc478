//! Unit test harness - parser-level tests against the public API.

mod parser_robustness_tests;
