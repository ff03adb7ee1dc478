//! Rule file loading with mtime-driven hot reload.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::engine::TinylandEngine;
use crate::tinytalk_parser;

/// Tracks one rule file. Rules are separated by blank lines; each parses
/// independently, so a broken rule is logged and dropped while its
/// neighbours load. The engine deduplicates rules, which makes a full
/// reload after every mtime change safe.
pub struct RuleFile {
    path: PathBuf,
    last_loaded: Option<SystemTime>,
}

impl RuleFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        RuleFile {
            path: path.as_ref().to_path_buf(),
            last_loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file into the engine when its mtime moved since the last
    /// load. Returns how many rules parsed on this pass (0 when unchanged).
    pub fn reload_if_changed(
        &mut self,
        engine: &mut TinylandEngine,
    ) -> std::io::Result<usize> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        if self.last_loaded == Some(modified) {
            return Ok(0);
        }
        let source = std::fs::read_to_string(&self.path)?;
        let mut loaded = 0;
        for result in tinytalk_parser::parse_rules_source(&source) {
            match result {
                Ok(rule) => {
                    engine.load_rule(rule);
                    loaded += 1;
                }
                Err(err) => {
                    log::error!("discarding unparseable rule in {}: {}", self.path.display(), err);
                }
            }
        }
        self.last_loaded = Some(modified);
        Ok(loaded)
    }
}
