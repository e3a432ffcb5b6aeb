//! Rendering target: where rendered documents are written.

use crate::render::RenderError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    Stdout,
    File(PathBuf),
}

impl RenderTarget {
    pub fn from_option(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Stdout,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Fails when the target's parent directory does not exist.
    pub fn ensure_available(&self) -> Result<(), RenderError> {
        let Self::File(path) = self else {
            return Ok(());
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(RenderError::MissingTarget(path.clone()));
        }
        Ok(())
    }

    /// Writes a full document, replacing previous file content.
    pub fn write_document(&self, document: &str) -> Result<(), RenderError> {
        self.ensure_available()?;
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(document.as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(|source| self.io_error(source))
            }
            Self::File(path) => {
                std::fs::write(path, document).map_err(|source| self.io_error(source))
            }
        }
    }

    fn io_error(&self, source: std::io::Error) -> RenderError {
        RenderError::Io {
            target: self.describe(),
            source,
        }
    }
}
