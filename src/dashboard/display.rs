//! Hands the rendered figure to the platform image viewer.

use super::{RenderError, Result};
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::info;

/// Where the rendered PNG lives.
pub enum Figure {
    /// Removed when dropped.
    Temporary(TempPath),
    /// Caller-chosen path, left in place.
    Kept(PathBuf),
}

impl Figure {
    pub fn temporary() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("homicide-dashboard-")
            .suffix(".png")
            .tempfile()?
            .into_temp_path();
        Ok(Figure::Temporary(path))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Figure::Kept(path.into())
    }

    pub fn path(&self) -> &Path {
        match self {
            Figure::Temporary(path) => &**path,
            Figure::Kept(path) => path,
        }
    }
}

/// Opens the figure and, on an interactive terminal, blocks until Enter is pressed.
///
/// Without a terminal the viewer may still be loading when this returns, so a
/// temporary figure is kept on disk instead of being removed.
pub fn show(figure: Figure) -> Result<()> {
    let path = figure.path().to_path_buf();
    open::that(&path).map_err(RenderError::Display)?;
    info!(path = %path.display(), "Dashboard opened in the image viewer");

    if std::io::stdin().is_terminal() {
        println!("Press Enter to close the dashboard...");
        wait_for_enter(std::io::stdin().lock())?;
    } else if let Figure::Temporary(tmp) = figure {
        let kept = tmp.keep().map_err(|e| RenderError::FileSave(e.error))?;
        info!(path = %kept.display(), "Non-interactive session, figure left for the viewer");
    }

    Ok(())
}

/// Blocks until a line (or EOF) is read from `input`.
fn wait_for_enter(mut input: impl BufRead) -> Result<()> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(RenderError::Display)?;
    Ok(())
}
