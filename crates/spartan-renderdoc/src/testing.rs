//! In-process stand-ins for the RenderDoc module, the OS loader and the install catalog.
//!
//! The fake API table is a real `extern "C"` function table so the FFI wrapper is exercised end
//! to end. Calls are recorded per thread; every test runs on its own thread.

use std::{
    cell::{Cell, RefCell},
    ffi::{CStr, c_char, c_int, c_void},
    path::{Path, PathBuf},
    rc::Rc,
};

use spartan_renderdoc_sys as sys;

use crate::{
    CaptureToolError, GetApiFn, InstallCatalog, LoadedModule, ModuleLoader, ModuleOwnership,
};

pub const FAKE_UI_PID: u32 = 4242;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    GetApi(u32),
    GetApiVersion,
    SetCaptureOptionU32(u32, u32),
    MaskOverlayBits(u32, u32),
    TriggerCapture,
    IsTargetControlConnected,
    ShowReplayUI,
    LaunchReplayUI(u32, String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GetApiBehavior {
    Complete,
    Incomplete,
    Fail,
    NullTable,
}

thread_local! {
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
    static GET_API: Cell<GetApiBehavior> = const { Cell::new(GetApiBehavior::Complete) };
    static TARGET_CONNECTED: Cell<bool> = const { Cell::new(false) };
    static LAUNCH_PID: Cell<u32> = const { Cell::new(FAKE_UI_PID) };
}

pub fn reset() {
    clear_calls();
    GET_API.with(|b| b.set(GetApiBehavior::Complete));
    TARGET_CONNECTED.with(|c| c.set(false));
    LAUNCH_PID.with(|p| p.set(FAKE_UI_PID));
}

pub fn calls() -> Vec<Call> {
    CALLS.with(|c| c.borrow().clone())
}

pub fn clear_calls() {
    CALLS.with(|c| c.borrow_mut().clear());
}

pub fn set_get_api_behavior(behavior: GetApiBehavior) {
    GET_API.with(|b| b.set(behavior));
}

pub fn set_target_connected(connected: bool) {
    TARGET_CONNECTED.with(|c| c.set(connected));
}

pub fn set_launch_pid(pid: u32) {
    LAUNCH_PID.with(|p| p.set(pid));
}

fn record(call: Call) {
    CALLS.with(|c| c.borrow_mut().push(call));
}

unsafe extern "C" fn get_api_version(major: *mut c_int, minor: *mut c_int, patch: *mut c_int) {
    record(Call::GetApiVersion);
    unsafe {
        *major = 1;
        *minor = 5;
        *patch = 0;
    }
}

unsafe extern "C" fn set_capture_option_u32(opt: sys::RENDERDOC_CaptureOption, val: u32) -> c_int {
    record(Call::SetCaptureOptionU32(opt.0, val));
    1
}

unsafe extern "C" fn mask_overlay_bits(and: u32, or: u32) {
    record(Call::MaskOverlayBits(and, or));
}

unsafe extern "C" fn trigger_capture() {
    record(Call::TriggerCapture);
}

unsafe extern "C" fn is_target_control_connected() -> u32 {
    record(Call::IsTargetControlConnected);
    u32::from(TARGET_CONNECTED.with(Cell::get))
}

unsafe extern "C" fn show_replay_ui() -> u32 {
    record(Call::ShowReplayUI);
    1
}

unsafe extern "C" fn launch_replay_ui(connect: u32, cmdline: *const c_char) -> u32 {
    let cmdline = if cmdline.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(cmdline) }
            .to_string_lossy()
            .into_owned()
    };
    record(Call::LaunchReplayUI(connect, cmdline));
    LAUNCH_PID.with(Cell::get)
}

const COMPLETE_TABLE: sys::RENDERDOC_API_1_5_0 = sys::RENDERDOC_API_1_5_0 {
    GetAPIVersion: Some(get_api_version),
    SetCaptureOptionU32: Some(set_capture_option_u32),
    SetCaptureOptionF32: None,
    GetCaptureOptionU32: None,
    GetCaptureOptionF32: None,
    SetFocusToggleKeys: None,
    SetCaptureKeys: None,
    GetOverlayBits: None,
    MaskOverlayBits: Some(mask_overlay_bits),
    RemoveHooks: None,
    UnloadCrashHandler: None,
    SetCaptureFilePathTemplate: None,
    GetCaptureFilePathTemplate: None,
    GetNumCaptures: None,
    GetCapture: None,
    TriggerCapture: Some(trigger_capture),
    IsTargetControlConnected: Some(is_target_control_connected),
    LaunchReplayUI: Some(launch_replay_ui),
    SetActiveWindow: None,
    StartFrameCapture: None,
    IsFrameCapturing: None,
    EndFrameCapture: None,
    TriggerMultiFrameCapture: None,
    SetCaptureFileComments: None,
    DiscardFrameCapture: None,
    ShowReplayUI: Some(show_replay_ui),
};

static COMPLETE_API: sys::RENDERDOC_API_1_5_0 = COMPLETE_TABLE;

// Configuration entry points present, capture entry points missing.
static INCOMPLETE_API: sys::RENDERDOC_API_1_5_0 = sys::RENDERDOC_API_1_5_0 {
    TriggerCapture: None,
    IsTargetControlConnected: None,
    LaunchReplayUI: None,
    ShowReplayUI: None,
    ..COMPLETE_TABLE
};

pub unsafe extern "C" fn fake_get_api(
    version: sys::RENDERDOC_Version,
    out: *mut *mut c_void,
) -> c_int {
    record(Call::GetApi(version.0));
    let table: &'static sys::RENDERDOC_API_1_5_0 = match GET_API.with(Cell::get) {
        GetApiBehavior::Fail => return 0,
        GetApiBehavior::NullTable => {
            unsafe { *out = std::ptr::null_mut() };
            return 1;
        }
        GetApiBehavior::Complete => &COMPLETE_API,
        GetApiBehavior::Incomplete => &INCOMPLETE_API,
    };
    unsafe { *out = (table as *const sys::RENDERDOC_API_1_5_0).cast_mut().cast() };
    1
}

#[derive(Debug, Default)]
pub struct LoaderLog {
    pub resident_queries: usize,
    pub loads: Vec<PathBuf>,
    pub unloads: usize,
    pub dropped_without_unload: usize,
}

/// Scripted OS loader. Shares its log with every module it hands out.
#[derive(Debug, Default)]
pub struct FakeLoader {
    pub resident: bool,
    pub load_error: Option<String>,
    pub missing_entry_point: bool,
    pub log: Rc<RefCell<LoaderLog>>,
}

impl FakeLoader {
    pub fn log(&self) -> Rc<RefCell<LoaderLog>> {
        Rc::clone(&self.log)
    }

    fn module(&self, ownership: ModuleOwnership) -> FakeModule {
        FakeModule {
            ownership,
            missing_entry_point: self.missing_entry_point,
            log: Rc::clone(&self.log),
            unloaded: false,
        }
    }
}

impl ModuleLoader for FakeLoader {
    type Module = FakeModule;

    fn find_resident(&self) -> Option<FakeModule> {
        self.log.borrow_mut().resident_queries += 1;
        self.resident
            .then(|| self.module(ModuleOwnership::Resident))
    }

    fn load(&self, path: &Path) -> Result<FakeModule, CaptureToolError> {
        self.log.borrow_mut().loads.push(path.to_path_buf());
        if let Some(reason) = &self.load_error {
            return Err(CaptureToolError::ModuleLoadFailed {
                path: path.to_path_buf(),
                reason: reason.clone(),
            });
        }
        Ok(self.module(ModuleOwnership::Owned))
    }
}

#[derive(Debug)]
pub struct FakeModule {
    ownership: ModuleOwnership,
    missing_entry_point: bool,
    log: Rc<RefCell<LoaderLog>>,
    unloaded: bool,
}

impl LoadedModule for FakeModule {
    fn ownership(&self) -> ModuleOwnership {
        self.ownership
    }

    fn entry_point(&self) -> Result<GetApiFn, CaptureToolError> {
        if self.missing_entry_point {
            return Err(CaptureToolError::SymbolResolutionFailed(
                "symbol not found".to_string(),
            ));
        }
        Ok(fake_get_api)
    }

    fn unload(mut self) {
        self.unloaded = true;
        self.log.borrow_mut().unloads += 1;
    }
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        if !self.unloaded {
            self.log.borrow_mut().dropped_without_unload += 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub unsupported: bool,
    pub dirs: Vec<PathBuf>,
}

impl InstallCatalog for FakeCatalog {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn candidate_dirs(&self) -> Vec<PathBuf> {
        self.dirs.clone()
    }
}

/// Creates `dir/<library file name>` so discovery accepts `dir`.
pub fn install_library(dir: &Path) -> PathBuf {
    let path = dir.join(crate::LIBRARY_FILE_NAME);
    std::fs::write(&path, b"").unwrap();
    path
}
