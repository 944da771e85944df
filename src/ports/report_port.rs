//! Report generation port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::EtfRankError;
use std::path::{Path, PathBuf};

/// Port for writing an analysis result to disk in some rendering.
pub trait ReportPort {
    /// Write a report into `output_dir`, returning the path written.
    fn write(&self, result: &AnalysisResult, output_dir: &Path) -> Result<PathBuf, EtfRankError>;
}
