//! Destinations for emitted programs.

use std::path::PathBuf;

use tracing::info;

use crate::error::{GcodeError, Result};

/// File name used when the caller does not choose one.
pub const DEFAULT_FILENAME: &str = "output.gcode";

/// Accepts a finished program and makes it available to the user.
pub trait ToolpathSink {
    /// Persist `gcode` under `filename`.
    fn persist(&mut self, gcode: &str, filename: &str) -> Result<()>;
}

/// Writes programs into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    /// Target directory.
    pub dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ToolpathSink for FileSink {
    fn persist(&mut self, gcode: &str, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        std::fs::write(&path, gcode).map_err(|source| GcodeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), bytes = gcode.len(), "wrote toolpath");
        Ok(())
    }
}

/// Keeps programs in memory, in persist order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// `(filename, gcode)` pairs.
    pub files: Vec<(String, String)>,
}

impl MemorySink {
    /// Contents of the most recent program stored under `filename`.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .find(|(name, _)| name == filename)
            .map(|(_, gcode)| gcode.as_str())
    }
}

impl ToolpathSink for MemorySink {
    fn persist(&mut self, gcode: &str, filename: &str) -> Result<()> {
        self.files.push((filename.to_string(), gcode.to_string()));
        Ok(())
    }
}
