//! RenderDoc frame-capture support for the Spartan RHI.
//!
//! [`CaptureToolManager`] owns the RenderDoc in-application API (`renderdoc_app.h`) on behalf of
//! the renderer:
//! - attaching to an already injected RenderDoc (Windows, Linux),
//! - otherwise discovering an install (Windows Installer folders, Linux library paths) and
//!   loading it,
//! - binding API version 1.5.0 and turning off debug output muting and the overlay,
//! - triggering captures and bringing up the replay UI,
//! - unloading the module on shutdown, but only if it was loaded here.
//!
//! ```no_run
//! let mut renderdoc = spartan_renderdoc::CaptureToolManager::system();
//! if let Err(e) = renderdoc.initialize() {
//!     eprintln!("frame capture disabled: {e}");
//! }
//! // ... create the device, render ...
//! renderdoc.trigger_capture()?;
//! renderdoc.shutdown();
//! # Ok::<(), spartan_renderdoc::CaptureToolError>(())
//! ```
//!
//! Set `SPARTAN_RENDERDOC_DIR` to a RenderDoc install directory to have it searched first.

mod api;
mod diagnostics;
mod discovery;
mod error;
mod loader;
mod manager;
mod settings;

#[cfg(test)]
mod testing;

pub use api::*;
pub use diagnostics::*;
pub use discovery::*;
pub use error::*;
pub use loader::*;
pub use manager::*;
pub use settings::*;
