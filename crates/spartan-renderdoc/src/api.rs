use std::{
    cell::Cell,
    ffi::{CStr, c_int, c_void},
    ptr::NonNull,
};

use spartan_renderdoc_sys as sys;

use crate::{ApiVersion, CaptureOption, CaptureToolError, OverlayBits};

/// Signature of the `RENDERDOC_GetAPI` export once resolved from a module.
pub type GetApiFn =
    unsafe extern "C" fn(version: sys::RENDERDOC_Version, out: *mut *mut c_void) -> c_int;

/// The function table handed out by `RENDERDOC_GetAPI`.
///
/// The table lives inside the RenderDoc module; an `ApiTable` must never outlive the module it
/// was acquired from.
pub struct ApiTable {
    api: NonNull<sys::RENDERDOC_API_1_5_0>,
    version: ApiVersion,
    _not_sync: Cell<()>,
}

impl ApiTable {
    /// Requests the function table for `version` through the module's entry point.
    ///
    /// # Safety
    ///
    /// `get_api` must be the `RENDERDOC_GetAPI` export of a module that stays loaded for as long
    /// as the returned table is alive.
    pub unsafe fn acquire(get_api: GetApiFn, version: ApiVersion) -> Result<Self, CaptureToolError> {
        let mut out: *mut c_void = std::ptr::null_mut();
        let ok = unsafe { get_api(version.into(), &mut out) };
        if ok != 1 {
            return Err(CaptureToolError::ApiAcquisitionFailed { version });
        }
        let api = NonNull::new(out.cast::<sys::RENDERDOC_API_1_5_0>())
            .ok_or(CaptureToolError::ApiAcquisitionFailed { version })?;

        Ok(Self {
            api,
            version,
            _not_sync: Cell::new(()),
        })
    }

    fn api(&self) -> &sys::RENDERDOC_API_1_5_0 {
        unsafe { self.api.as_ref() }
    }

    pub fn requested_version(&self) -> ApiVersion {
        self.version
    }

    pub fn get_api_version(&self) -> Result<(i32, i32, i32), CaptureToolError> {
        let f = self
            .api()
            .GetAPIVersion
            .ok_or(CaptureToolError::MissingFunction("GetAPIVersion"))?;
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;
        unsafe { f(&mut major, &mut minor, &mut patch) };
        Ok((major, minor, patch))
    }

    pub fn set_capture_option_u32(
        &self,
        opt: CaptureOption,
        val: u32,
    ) -> Result<bool, CaptureToolError> {
        let f = self
            .api()
            .SetCaptureOptionU32
            .ok_or(CaptureToolError::MissingFunction("SetCaptureOptionU32"))?;
        Ok(unsafe { f(opt.into(), val) } == 1)
    }

    /// Clears the overlay bits not in `and_mask`, then sets those in `or_mask`.
    pub fn mask_overlay_bits(
        &self,
        and_mask: OverlayBits,
        or_mask: OverlayBits,
    ) -> Result<(), CaptureToolError> {
        let f = self
            .api()
            .MaskOverlayBits
            .ok_or(CaptureToolError::MissingFunction("MaskOverlayBits"))?;
        unsafe { f(and_mask.bits(), or_mask.bits()) };
        Ok(())
    }

    /// Captures the next frame presented on the active window. Returns immediately.
    pub fn trigger_capture(&self) -> Result<(), CaptureToolError> {
        let f = self
            .api()
            .TriggerCapture
            .ok_or(CaptureToolError::MissingFunction("TriggerCapture"))?;
        unsafe { f() };
        Ok(())
    }

    pub fn is_target_control_connected(&self) -> Result<bool, CaptureToolError> {
        let f = self
            .api()
            .IsTargetControlConnected
            .ok_or(CaptureToolError::MissingFunction("IsTargetControlConnected"))?;
        Ok(unsafe { f() } == 1)
    }

    /// Starts the replay UI. Returns its PID, or 0 when the launch failed.
    pub fn launch_replay_ui(
        &self,
        connect_target_control: bool,
        cmdline: &CStr,
    ) -> Result<u32, CaptureToolError> {
        let f = self
            .api()
            .LaunchReplayUI
            .ok_or(CaptureToolError::MissingFunction("LaunchReplayUI"))?;
        Ok(unsafe { f(u32::from(connect_target_control), cmdline.as_ptr()) })
    }

    pub fn show_replay_ui(&self) -> Result<bool, CaptureToolError> {
        let f = self
            .api()
            .ShowReplayUI
            .ok_or(CaptureToolError::MissingFunction("ShowReplayUI"))?;
        Ok(unsafe { f() } == 1)
    }
}

impl std::fmt::Debug for ApiTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTable")
            .field("api", &self.api)
            .field("version", &self.version)
            .finish()
    }
}
