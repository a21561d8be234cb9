use std::path::PathBuf;

use serde::Serialize;

use crate::{
    INSTALL_DIR_ENV, InstallCatalog, LIBRARY_FILE_NAME, ModuleLoader, discover_library_paths,
};

/// Snapshot of what RenderDoc discovery finds on this machine.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureToolDiagnostics {
    pub platform_supported: bool,
    pub library_file_name: &'static str,
    pub install_dir_env: &'static str,
    /// Whether a RenderDoc module is already mapped into this process.
    pub resident_module: bool,
    pub candidate_paths: Vec<PathBuf>,
    /// The path initialization would load when no module is resident.
    pub selected_path: Option<PathBuf>,
}

impl CaptureToolDiagnostics {
    pub fn collect<L, C>(loader: &L, catalog: &C) -> Self
    where
        L: ModuleLoader,
        C: InstallCatalog + ?Sized,
    {
        // A resident module is only probed, never unloaded.
        let resident_module = loader.find_resident().is_some();
        let candidate_paths = discover_library_paths(catalog);

        Self {
            platform_supported: catalog.is_supported(),
            library_file_name: LIBRARY_FILE_NAME,
            install_dir_env: INSTALL_DIR_ENV,
            resident_module,
            selected_path: candidate_paths.first().cloned(),
            candidate_paths,
        }
    }
}
