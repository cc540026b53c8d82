//! Mapping source paths under the input directory to destinations under the
//! output directory.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Rewrites the input-directory prefix of a path to the output directory.
#[derive(Debug, Clone)]
pub struct OutputPathMapper {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl OutputPathMapper {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// `input_dir/rest` becomes `output_dir/rest`.
    ///
    /// The prefix is matched on whole path components, so `/data/inbox/a.png`
    /// is not considered to be under `/data/in`.
    pub fn output_path(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let relative = source
            .strip_prefix(&self.input_dir)
            .map_err(|_| PipelineError::PathRewrite {
                path: source.to_path_buf(),
                input_dir: self.input_dir.clone(),
            })?;
        if relative.as_os_str().is_empty() {
            return Err(PipelineError::PathRewrite {
                path: source.to_path_buf(),
                input_dir: self.input_dir.clone(),
            });
        }
        Ok(self.output_dir.join(relative))
    }
}
