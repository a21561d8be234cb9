use std::path::Path;

use serde::Serialize;

use crate::{CaptureToolError, GetApiFn};

#[cfg(unix)]
use libloading::Library;

#[cfg(windows)]
use windows_sys::Win32::Foundation::{FreeLibrary, HMODULE};

#[cfg(windows)]
use windows_sys::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress, LoadLibraryW};

/// Who is responsible for unloading a RenderDoc module.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleOwnership {
    /// Already mapped into the process before we looked (injected by a launcher). Never unloaded
    /// by us.
    Resident,
    /// Loaded by us from a discovered install location.
    Owned,
}

/// A RenderDoc module mapped into the current process.
pub trait LoadedModule {
    fn ownership(&self) -> ModuleOwnership;

    /// Resolves `RENDERDOC_GetAPI`.
    fn entry_point(&self) -> Result<GetApiFn, CaptureToolError>;

    /// Unmaps the module. Only called for [`ModuleOwnership::Owned`] modules.
    fn unload(self);
}

/// The operating system's dynamic loader, as far as RenderDoc is concerned.
pub trait ModuleLoader {
    type Module: LoadedModule;

    /// Returns the RenderDoc module if something already injected it into this process.
    fn find_resident(&self) -> Option<Self::Module>;

    fn load(&self, path: &Path) -> Result<Self::Module, CaptureToolError>;
}

const ENTRY_POINT: &std::ffi::CStr = c"RENDERDOC_GetAPI";

#[cfg(target_os = "linux")]
const RESIDENT_NAMES: [&str; 2] = ["librenderdoc.so", "librenderdoc.so.1"];

/// [`ModuleLoader`] backed by the platform's dynamic loader.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLoader;

#[derive(Debug)]
enum Handle {
    #[cfg(windows)]
    Windows(HMODULE),
    #[cfg(unix)]
    Unix(Library),
}

#[derive(Debug)]
pub struct SystemModule {
    handle: Handle,
    ownership: ModuleOwnership,
}

impl ModuleLoader for SystemLoader {
    type Module = SystemModule;

    fn find_resident(&self) -> Option<SystemModule> {
        #[cfg(windows)]
        {
            // Only look up an injected module, do not LoadLibrary.
            let module = unsafe { GetModuleHandleA(c"renderdoc.dll".as_ptr().cast()) };
            if module == 0 {
                return None;
            }
            Some(SystemModule {
                handle: Handle::Windows(module),
                ownership: ModuleOwnership::Resident,
            })
        }

        #[cfg(target_os = "linux")]
        {
            use libloading::os::unix;

            // RTLD_NOLOAD is a non-POSIX extension; we only enable it on Linux. The handle it
            // returns holds its own reference, so closing it never unmaps the injected module.
            let flags = unix::RTLD_LAZY | unix::RTLD_LOCAL | libc::RTLD_NOLOAD;
            for candidate in RESIDENT_NAMES {
                if let Ok(lib) = unsafe { unix::Library::open(Some(candidate), flags) } {
                    return Some(SystemModule {
                        handle: Handle::Unix(Library::from(lib)),
                        ownership: ModuleOwnership::Resident,
                    });
                }
            }
            None
        }

        #[cfg(not(any(windows, target_os = "linux")))]
        {
            None
        }
    }

    fn load(&self, path: &Path) -> Result<SystemModule, CaptureToolError> {
        #[cfg(windows)]
        {
            use std::os::windows::ffi::OsStrExt;

            let wide: Vec<u16> = path
                .as_os_str()
                .encode_wide()
                .chain(std::iter::once(0))
                .collect();
            let module = unsafe { LoadLibraryW(wide.as_ptr()) };
            if module == 0 {
                return Err(CaptureToolError::ModuleLoadFailed {
                    path: path.to_path_buf(),
                    reason: std::io::Error::last_os_error().to_string(),
                });
            }
            Ok(SystemModule {
                handle: Handle::Windows(module),
                ownership: ModuleOwnership::Owned,
            })
        }

        #[cfg(unix)]
        {
            // SAFETY: Loading RenderDoc runs its initializers, which hook the graphics APIs. The
            // path comes from discovery and is only used to resolve `RENDERDOC_GetAPI`.
            let lib = unsafe { Library::new(path) }.map_err(|e| {
                CaptureToolError::ModuleLoadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            Ok(SystemModule {
                handle: Handle::Unix(lib),
                ownership: ModuleOwnership::Owned,
            })
        }

        #[cfg(not(any(windows, unix)))]
        {
            Err(CaptureToolError::ModuleLoadFailed {
                path: path.to_path_buf(),
                reason: "dynamic loading is not supported on this platform".to_string(),
            })
        }
    }
}

impl LoadedModule for SystemModule {
    fn ownership(&self) -> ModuleOwnership {
        self.ownership
    }

    fn entry_point(&self) -> Result<GetApiFn, CaptureToolError> {
        match &self.handle {
            #[cfg(windows)]
            Handle::Windows(module) => {
                let proc = unsafe { GetProcAddress(*module, ENTRY_POINT.as_ptr().cast()) }
                    .ok_or_else(|| {
                        CaptureToolError::SymbolResolutionFailed(
                            std::io::Error::last_os_error().to_string(),
                        )
                    })?;
                // SAFETY: `RENDERDOC_GetAPI` is declared with this signature in renderdoc_app.h.
                let get_api = unsafe {
                    std::mem::transmute::<unsafe extern "system" fn() -> isize, GetApiFn>(proc)
                };
                Ok(get_api)
            }
            #[cfg(unix)]
            Handle::Unix(lib) => {
                let get_api = unsafe { lib.get::<GetApiFn>(ENTRY_POINT.to_bytes_with_nul()) }
                    .map_err(|e| CaptureToolError::SymbolResolutionFailed(e.to_string()))?;
                Ok(*get_api)
            }
            #[cfg(not(any(windows, unix)))]
            _ => Err(CaptureToolError::SymbolResolutionFailed(
                "dynamic loading is not supported on this platform".to_string(),
            )),
        }
    }

    fn unload(self) {
        match self.handle {
            #[cfg(windows)]
            Handle::Windows(module) => {
                if unsafe { FreeLibrary(module) } == 0 {
                    tracing::warn!(
                        error = %std::io::Error::last_os_error(),
                        "FreeLibrary failed for RenderDoc module"
                    );
                }
            }
            #[cfg(unix)]
            Handle::Unix(lib) => {
                if let Err(e) = lib.close() {
                    tracing::warn!(error = %e, "failed to close RenderDoc module");
                }
            }
            #[cfg(not(any(windows, unix)))]
            _ => {}
        }
    }
}
