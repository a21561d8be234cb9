use std::{
    mem,
    path::{Path, PathBuf},
};

use crate::{
    ApiTable, ApiVersion, CaptureOption, CaptureToolDiagnostics, CaptureToolError,
    InstallCatalog, LoadedModule, ModuleLoader, ModuleOwnership, OverlayBits, SystemCatalog,
    SystemLoader, discover_library_paths, select_library_path,
};

/// What [`CaptureToolManager::trigger_capture`] did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaptureOutcome {
    /// RenderDoc is not attached; nothing happened.
    Skipped,
    /// A replay UI was already connected and has been brought to the foreground.
    ReviewUiRaised,
    /// A replay UI was launched and told to connect to this process.
    ReviewUiLaunched { pid: u32 },
    /// The capture was triggered but the replay UI could not be started.
    ReviewUiLaunchFailed,
}

/// Owns the RenderDoc module and its API table for the renderer.
///
/// Call [`initialize`](Self::initialize) before creating the graphics device, and
/// [`shutdown`](Self::shutdown) (or drop the manager) during teardown. Both must happen on the
/// thread that manages the device.
pub struct CaptureToolManager<L = SystemLoader, C = SystemCatalog>
where
    L: ModuleLoader,
    C: InstallCatalog,
{
    loader: L,
    catalog: C,
    state: State<L::Module>,
}

enum State<M> {
    Uninitialized,
    Ready(Session<M>),
    /// Initialization failed. Capture support stays off for the session; there is no retry.
    Failed(CaptureToolError),
    /// Shut down after attaching to a resident module. Terminal.
    Detached,
}

struct Session<M> {
    // Dropped before `module`: the table lives inside it.
    api: ApiTable,
    module: M,
    library_path: Option<PathBuf>,
}

impl<M: LoadedModule> Session<M> {
    fn close(self) -> ModuleOwnership {
        let Session { api, module, .. } = self;
        drop(api);
        let ownership = module.ownership();
        release(module);
        ownership
    }
}

fn release<M: LoadedModule>(module: M) {
    match module.ownership() {
        ModuleOwnership::Owned => {
            tracing::debug!("unloading RenderDoc module");
            module.unload();
        }
        ModuleOwnership::Resident => {
            tracing::debug!("leaving resident RenderDoc module loaded");
        }
    }
}

impl CaptureToolManager<SystemLoader, SystemCatalog> {
    /// Manager using the platform loader and install catalog.
    pub fn system() -> Self {
        Self::new(SystemLoader, SystemCatalog::from_env())
    }
}

impl Default for CaptureToolManager<SystemLoader, SystemCatalog> {
    fn default() -> Self {
        Self::system()
    }
}

impl<L, C> CaptureToolManager<L, C>
where
    L: ModuleLoader,
    C: InstallCatalog,
{
    pub fn new(loader: L, catalog: C) -> Self {
        Self {
            loader,
            catalog,
            state: State::Uninitialized,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Attaches to or loads RenderDoc and configures it. Call before graphics device creation.
    ///
    /// Idempotent: once attached, later calls do nothing. Once failed, later calls return the
    /// same error without searching again.
    pub fn initialize(&mut self) -> Result<(), CaptureToolError> {
        match &self.state {
            State::Ready(_) | State::Detached => return Ok(()),
            State::Failed(err) => return Err(err.clone()),
            State::Uninitialized => {}
        }

        match self.attach() {
            Ok(session) => {
                tracing::info!(
                    ownership = ?session.module.ownership(),
                    version = %session.api.requested_version(),
                    "RenderDoc attached"
                );
                self.state = State::Ready(session);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "RenderDoc capture support is unavailable");
                self.state = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn attach(&self) -> Result<Session<L::Module>, CaptureToolError> {
        let (module, library_path) = match self.loader.find_resident() {
            Some(module) => {
                tracing::info!("RenderDoc is already injected, using the resident module");
                (module, None)
            }
            None => {
                let path = select_library_path(discover_library_paths(&self.catalog))?;
                tracing::info!(path = %path.display(), "loading RenderDoc");
                (self.loader.load(&path)?, Some(path))
            }
        };

        match Self::bind(&module) {
            Ok(api) => Ok(Session {
                api,
                module,
                library_path,
            }),
            Err(err) => {
                release(module);
                Err(err)
            }
        }
    }

    fn bind(module: &L::Module) -> Result<ApiTable, CaptureToolError> {
        let get_api = module.entry_point()?;
        // SAFETY: the table is stored next to `module` in a `Session`, which drops it first.
        let api = unsafe { ApiTable::acquire(get_api, ApiVersion::TARGET)? };

        // Keep validation layer messages flowing while RenderDoc is attached.
        api.set_capture_option_u32(CaptureOption::DebugOutputMute, 0)?;
        // No overlay.
        api.mask_overlay_bits(OverlayBits::empty(), OverlayBits::empty())?;

        match api.get_api_version() {
            Ok((major, minor, patch)) => {
                tracing::debug!(major, minor, patch, "RenderDoc reports API version");
            }
            Err(e) => tracing::debug!(error = %e, "RenderDoc API version unavailable"),
        }

        Ok(api)
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn ownership(&self) -> Option<ModuleOwnership> {
        match &self.state {
            State::Ready(session) => Some(session.module.ownership()),
            _ => None,
        }
    }

    pub fn api_version(&self) -> Option<ApiVersion> {
        match &self.state {
            State::Ready(session) => Some(session.api.requested_version()),
            _ => None,
        }
    }

    /// Path the module was loaded from. `None` when attached to a resident module.
    pub fn library_path(&self) -> Option<&Path> {
        match &self.state {
            State::Ready(session) => session.library_path.as_deref(),
            _ => None,
        }
    }

    /// The error initialization failed with, if it did.
    pub fn failure(&self) -> Option<&CaptureToolError> {
        match &self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Captures the next frame and brings up the replay UI.
    ///
    /// Does nothing when RenderDoc is not attached. Never waits for the UI; a failed UI launch is
    /// logged and reported through the outcome, the capture itself was already requested.
    pub fn trigger_capture(&self) -> Result<CaptureOutcome, CaptureToolError> {
        let State::Ready(session) = &self.state else {
            return Ok(CaptureOutcome::Skipped);
        };
        let api = &session.api;

        api.trigger_capture()?;

        if api.is_target_control_connected()? {
            tracing::info!("bringing RenderDoc to foreground");
            if !api.show_replay_ui()? {
                tracing::debug!("RenderDoc did not confirm bringing the replay UI forward");
            }
            return Ok(CaptureOutcome::ReviewUiRaised);
        }

        tracing::info!("launching RenderDoc");
        match api.launch_replay_ui(true, c"")? {
            0 => {
                tracing::error!(
                    error = %CaptureToolError::ReviewUiLaunchFailed,
                    "failed to launch RenderDoc"
                );
                Ok(CaptureOutcome::ReviewUiLaunchFailed)
            }
            pid => Ok(CaptureOutcome::ReviewUiLaunched { pid }),
        }
    }

    /// Releases RenderDoc. Unloads the module only if this manager loaded it.
    pub fn shutdown(&mut self) {
        match mem::replace(&mut self.state, State::Uninitialized) {
            State::Ready(session) => {
                self.state = match session.close() {
                    ModuleOwnership::Owned => State::Uninitialized,
                    ModuleOwnership::Resident => State::Detached,
                };
            }
            other => self.state = other,
        }
    }

    /// Reports what discovery sees right now, without attaching.
    pub fn diagnose(&self) -> CaptureToolDiagnostics {
        CaptureToolDiagnostics::collect(&self.loader, &self.catalog)
    }
}

impl<L, C> Drop for CaptureToolManager<L, C>
where
    L: ModuleLoader,
    C: InstallCatalog,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
