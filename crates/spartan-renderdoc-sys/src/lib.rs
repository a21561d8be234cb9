//! Low-level FFI bindings for RenderDoc's in-application API (`renderdoc_app.h`).
//!
//! Only the surface of the header the engine talks to is declared here: the entry point, the
//! versioned API table and the enumerations passed through it. Enumerations are modeled as
//! transparent newtypes with associated constants so that values the header adds later can
//! still cross the boundary without undefined behavior.
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use std::ffi::{c_char, c_int, c_void};

pub type RENDERDOC_DevicePointer = *mut c_void;
pub type RENDERDOC_WindowHandle = *mut c_void;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RENDERDOC_Version(pub u32);

impl RENDERDOC_Version {
    pub const eRENDERDOC_API_Version_1_0_0: Self = Self(10000);
    pub const eRENDERDOC_API_Version_1_0_1: Self = Self(10001);
    pub const eRENDERDOC_API_Version_1_0_2: Self = Self(10002);
    pub const eRENDERDOC_API_Version_1_1_0: Self = Self(10100);
    pub const eRENDERDOC_API_Version_1_1_1: Self = Self(10101);
    pub const eRENDERDOC_API_Version_1_1_2: Self = Self(10102);
    pub const eRENDERDOC_API_Version_1_2_0: Self = Self(10200);
    pub const eRENDERDOC_API_Version_1_3_0: Self = Self(10300);
    pub const eRENDERDOC_API_Version_1_4_0: Self = Self(10400);
    pub const eRENDERDOC_API_Version_1_4_1: Self = Self(10401);
    pub const eRENDERDOC_API_Version_1_4_2: Self = Self(10402);
    pub const eRENDERDOC_API_Version_1_5_0: Self = Self(10500);
    pub const eRENDERDOC_API_Version_1_6_0: Self = Self(10600);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RENDERDOC_CaptureOption(pub u32);

impl RENDERDOC_CaptureOption {
    pub const eRENDERDOC_Option_AllowVSync: Self = Self(0);
    pub const eRENDERDOC_Option_AllowFullscreen: Self = Self(1);
    pub const eRENDERDOC_Option_APIValidation: Self = Self(2);
    pub const eRENDERDOC_Option_CaptureCallstacks: Self = Self(3);
    pub const eRENDERDOC_Option_CaptureCallstacksOnlyDraws: Self = Self(4);
    pub const eRENDERDOC_Option_DelayForDebugger: Self = Self(5);
    pub const eRENDERDOC_Option_VerifyBufferAccess: Self = Self(6);
    pub const eRENDERDOC_Option_HookIntoChildren: Self = Self(7);
    pub const eRENDERDOC_Option_RefAllResources: Self = Self(8);
    pub const eRENDERDOC_Option_SaveAllInitials: Self = Self(9);
    pub const eRENDERDOC_Option_CaptureAllCmdLists: Self = Self(10);
    pub const eRENDERDOC_Option_DebugOutputMute: Self = Self(11);
    pub const eRENDERDOC_Option_AllowUnsupportedVendorExtensions: Self = Self(12);
    pub const eRENDERDOC_Option_SoftMemoryLimit: Self = Self(13);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RENDERDOC_OverlayBits(pub u32);

impl RENDERDOC_OverlayBits {
    pub const eRENDERDOC_Overlay_Enabled: Self = Self(0x1);
    pub const eRENDERDOC_Overlay_FrameRate: Self = Self(0x2);
    pub const eRENDERDOC_Overlay_FrameNumber: Self = Self(0x4);
    pub const eRENDERDOC_Overlay_CaptureList: Self = Self(0x8);
    pub const eRENDERDOC_Overlay_Default: Self = Self(0xF);
    pub const eRENDERDOC_Overlay_All: Self = Self(0x7ff_ffff);
    pub const eRENDERDOC_Overlay_None: Self = Self(0);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RENDERDOC_InputButton(pub u32);

pub type pRENDERDOC_GetAPIVersion =
    Option<unsafe extern "C" fn(major: *mut c_int, minor: *mut c_int, patch: *mut c_int)>;
pub type pRENDERDOC_SetCaptureOptionU32 =
    Option<unsafe extern "C" fn(opt: RENDERDOC_CaptureOption, val: u32) -> c_int>;
pub type pRENDERDOC_SetCaptureOptionF32 =
    Option<unsafe extern "C" fn(opt: RENDERDOC_CaptureOption, val: f32) -> c_int>;
pub type pRENDERDOC_GetCaptureOptionU32 =
    Option<unsafe extern "C" fn(opt: RENDERDOC_CaptureOption) -> u32>;
pub type pRENDERDOC_GetCaptureOptionF32 =
    Option<unsafe extern "C" fn(opt: RENDERDOC_CaptureOption) -> f32>;
pub type pRENDERDOC_SetFocusToggleKeys =
    Option<unsafe extern "C" fn(keys: *mut RENDERDOC_InputButton, num: c_int)>;
pub type pRENDERDOC_SetCaptureKeys =
    Option<unsafe extern "C" fn(keys: *mut RENDERDOC_InputButton, num: c_int)>;
pub type pRENDERDOC_GetOverlayBits = Option<unsafe extern "C" fn() -> u32>;
pub type pRENDERDOC_MaskOverlayBits = Option<unsafe extern "C" fn(and: u32, or: u32)>;
pub type pRENDERDOC_RemoveHooks = Option<unsafe extern "C" fn()>;
pub type pRENDERDOC_UnloadCrashHandler = Option<unsafe extern "C" fn()>;
pub type pRENDERDOC_SetCaptureFilePathTemplate =
    Option<unsafe extern "C" fn(path_template: *const c_char)>;
pub type pRENDERDOC_GetCaptureFilePathTemplate = Option<unsafe extern "C" fn() -> *const c_char>;
pub type pRENDERDOC_GetNumCaptures = Option<unsafe extern "C" fn() -> u32>;
pub type pRENDERDOC_GetCapture = Option<
    unsafe extern "C" fn(
        idx: u32,
        filename: *mut c_char,
        path_length: *mut u32,
        timestamp: *mut u64,
    ) -> u32,
>;
pub type pRENDERDOC_TriggerCapture = Option<unsafe extern "C" fn()>;
pub type pRENDERDOC_IsTargetControlConnected = Option<unsafe extern "C" fn() -> u32>;
pub type pRENDERDOC_LaunchReplayUI =
    Option<unsafe extern "C" fn(connect_target_control: u32, cmdline: *const c_char) -> u32>;
pub type pRENDERDOC_SetActiveWindow =
    Option<unsafe extern "C" fn(device: RENDERDOC_DevicePointer, wnd: RENDERDOC_WindowHandle)>;
pub type pRENDERDOC_StartFrameCapture =
    Option<unsafe extern "C" fn(device: RENDERDOC_DevicePointer, wnd: RENDERDOC_WindowHandle)>;
pub type pRENDERDOC_IsFrameCapturing = Option<unsafe extern "C" fn() -> u32>;
pub type pRENDERDOC_EndFrameCapture = Option<
    unsafe extern "C" fn(device: RENDERDOC_DevicePointer, wnd: RENDERDOC_WindowHandle) -> u32,
>;
pub type pRENDERDOC_TriggerMultiFrameCapture = Option<unsafe extern "C" fn(num_frames: u32)>;
pub type pRENDERDOC_SetCaptureFileComments =
    Option<unsafe extern "C" fn(file_path: *const c_char, comments: *const c_char)>;
pub type pRENDERDOC_DiscardFrameCapture = Option<
    unsafe extern "C" fn(device: RENDERDOC_DevicePointer, wnd: RENDERDOC_WindowHandle) -> u32,
>;
pub type pRENDERDOC_ShowReplayUI = Option<unsafe extern "C" fn() -> u32>;

/// `RENDERDOC_GetAPI`, the single exported entry point of the RenderDoc module.
pub type pRENDERDOC_GetAPI = Option<
    unsafe extern "C" fn(version: RENDERDOC_Version, out_api_pointers: *mut *mut c_void) -> c_int,
>;

/// Function table for API version 1.5.0.
///
/// Every older version is a prefix of this layout. Fields the header declares as unions of a
/// renamed function (`Shutdown`/`RemoveHooks`, `IsRemoteAccessConnected`/`IsTargetControlConnected`,
/// ...) are exposed under their current name only.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RENDERDOC_API_1_5_0 {
    pub GetAPIVersion: pRENDERDOC_GetAPIVersion,
    pub SetCaptureOptionU32: pRENDERDOC_SetCaptureOptionU32,
    pub SetCaptureOptionF32: pRENDERDOC_SetCaptureOptionF32,
    pub GetCaptureOptionU32: pRENDERDOC_GetCaptureOptionU32,
    pub GetCaptureOptionF32: pRENDERDOC_GetCaptureOptionF32,
    pub SetFocusToggleKeys: pRENDERDOC_SetFocusToggleKeys,
    pub SetCaptureKeys: pRENDERDOC_SetCaptureKeys,
    pub GetOverlayBits: pRENDERDOC_GetOverlayBits,
    pub MaskOverlayBits: pRENDERDOC_MaskOverlayBits,
    pub RemoveHooks: pRENDERDOC_RemoveHooks,
    pub UnloadCrashHandler: pRENDERDOC_UnloadCrashHandler,
    pub SetCaptureFilePathTemplate: pRENDERDOC_SetCaptureFilePathTemplate,
    pub GetCaptureFilePathTemplate: pRENDERDOC_GetCaptureFilePathTemplate,
    pub GetNumCaptures: pRENDERDOC_GetNumCaptures,
    pub GetCapture: pRENDERDOC_GetCapture,
    pub TriggerCapture: pRENDERDOC_TriggerCapture,
    pub IsTargetControlConnected: pRENDERDOC_IsTargetControlConnected,
    pub LaunchReplayUI: pRENDERDOC_LaunchReplayUI,
    pub SetActiveWindow: pRENDERDOC_SetActiveWindow,
    pub StartFrameCapture: pRENDERDOC_StartFrameCapture,
    pub IsFrameCapturing: pRENDERDOC_IsFrameCapturing,
    pub EndFrameCapture: pRENDERDOC_EndFrameCapture,
    // 1.1.0
    pub TriggerMultiFrameCapture: pRENDERDOC_TriggerMultiFrameCapture,
    // 1.2.0
    pub SetCaptureFileComments: pRENDERDOC_SetCaptureFileComments,
    // 1.4.0
    pub DiscardFrameCapture: pRENDERDOC_DiscardFrameCapture,
    // 1.5.0
    pub ShowReplayUI: pRENDERDOC_ShowReplayUI,
}
