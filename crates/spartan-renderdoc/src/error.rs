use std::path::PathBuf;

use thiserror::Error;

use crate::ApiVersion;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CaptureToolError {
    #[error(
        "RenderDoc is not installed: no resident module and no install location containing the library was found (set SPARTAN_RENDERDOC_DIR to override)"
    )]
    ToolNotInstalled,

    #[error("failed to load RenderDoc library from {}: {reason}", .path.display())]
    ModuleLoadFailed { path: PathBuf, reason: String },

    #[error("RENDERDOC_GetAPI not found in RenderDoc module: {0}")]
    SymbolResolutionFailed(String),

    #[error("RENDERDOC_GetAPI failed for API version {version}")]
    ApiAcquisitionFailed { version: ApiVersion },

    #[error("required API function pointer is null: {0}")]
    MissingFunction(&'static str),

    #[error("failed to launch the RenderDoc replay UI")]
    ReviewUiLaunchFailed,
}

impl CaptureToolError {
    /// Errors that leave capture support unavailable for the rest of the session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CaptureToolError::ReviewUiLaunchFailed)
    }
}
