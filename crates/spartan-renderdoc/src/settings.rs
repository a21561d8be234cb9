use std::fmt;

use bitflags::bitflags;

use spartan_renderdoc_sys as sys;

/// RenderDoc capture options (strongly typed wrapper).
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CaptureOption {
    AllowVSync = 0,
    AllowFullscreen = 1,
    ApiValidation = 2,
    CaptureCallstacks = 3,
    CaptureCallstacksOnlyDraws = 4,
    DelayForDebugger = 5,
    VerifyBufferAccess = 6,
    HookIntoChildren = 7,
    RefAllResources = 8,
    SaveAllInitials = 9,
    CaptureAllCmdLists = 10,
    /// Mute API validation / debug layer output while capturing.
    DebugOutputMute = 11,
    AllowUnsupportedVendorExtensions = 12,
    SoftMemoryLimit = 13,
}

impl From<CaptureOption> for sys::RENDERDOC_CaptureOption {
    fn from(value: CaptureOption) -> Self {
        sys::RENDERDOC_CaptureOption(value as u32)
    }
}

bitflags! {
    /// Elements of the in-application overlay RenderDoc draws over the presented image.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct OverlayBits: u32 {
        const ENABLED = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_Enabled.0;
        const FRAME_RATE = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_FrameRate.0;
        const FRAME_NUMBER = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_FrameNumber.0;
        const CAPTURE_LIST = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_CaptureList.0;
        const DEFAULT = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_Default.0;
        const ALL = sys::RENDERDOC_OverlayBits::eRENDERDOC_Overlay_All.0;
    }
}

/// API versions the engine knows how to request from `RENDERDOC_GetAPI`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ApiVersion {
    V1_0_0,
    V1_1_0,
    V1_2_0,
    V1_3_0,
    V1_4_0,
    V1_5_0,
}

impl ApiVersion {
    /// The version the capture tool manager binds against.
    pub const TARGET: ApiVersion = ApiVersion::V1_5_0;

    pub fn triple(self) -> (u32, u32, u32) {
        match self {
            ApiVersion::V1_0_0 => (1, 0, 0),
            ApiVersion::V1_1_0 => (1, 1, 0),
            ApiVersion::V1_2_0 => (1, 2, 0),
            ApiVersion::V1_3_0 => (1, 3, 0),
            ApiVersion::V1_4_0 => (1, 4, 0),
            ApiVersion::V1_5_0 => (1, 5, 0),
        }
    }
}

impl From<ApiVersion> for sys::RENDERDOC_Version {
    fn from(value: ApiVersion) -> Self {
        match value {
            ApiVersion::V1_0_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_0_0,
            ApiVersion::V1_1_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_1_0,
            ApiVersion::V1_2_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_2_0,
            ApiVersion::V1_3_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_3_0,
            ApiVersion::V1_4_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_4_0,
            ApiVersion::V1_5_0 => sys::RENDERDOC_Version::eRENDERDOC_API_Version_1_5_0,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, patch) = self.triple();
        write!(f, "{major}.{minor}.{patch}")
    }
}
