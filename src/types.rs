//! Snapshot records returned by DRM queries
//!
//! Every record here is an owned copy of what the kernel reported. Nothing
//! holds a reference back into the device, so dropping a record is all the
//! "release" it needs.

use std::fmt;

use crate::ffi;

/// Capabilities reported for every device, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    DumbBuffer,
    VblankHighCrtc,
    DumbPreferredDepth,
    DumbPreferShadow,
    Prime,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::DumbBuffer,
        Capability::VblankHighCrtc,
        Capability::DumbPreferredDepth,
        Capability::DumbPreferShadow,
        Capability::Prime,
    ];

    /// Kernel capability code
    pub fn code(self) -> u64 {
        match self {
            Capability::DumbBuffer => ffi::DRM_CAP_DUMB_BUFFER,
            Capability::VblankHighCrtc => ffi::DRM_CAP_VBLANK_HIGH_CRTC,
            Capability::DumbPreferredDepth => ffi::DRM_CAP_DUMB_PREFERRED_DEPTH,
            Capability::DumbPreferShadow => ffi::DRM_CAP_DUMB_PREFER_SHADOW,
            Capability::Prime => ffi::DRM_CAP_PRIME,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::DumbBuffer => "DRM_CAP_DUMB_BUFFER",
            Capability::VblankHighCrtc => "DRM_CAP_VBLANK_HIGH_CRTC",
            Capability::DumbPreferredDepth => "DRM_CAP_DUMB_PREFERRED_DEPTH",
            Capability::DumbPreferShadow => "DRM_CAP_DUMB_PREFER_SHADOW",
            Capability::Prime => "DRM_CAP_PRIME",
        }
    }
}

/// Driver identification from DRM_IOCTL_VERSION
#[derive(Debug, Clone, Default)]
pub struct DriverVersion {
    pub major: i32,
    pub minor: i32,
    pub patchlevel: i32,
    pub name: String,
    pub date: String,
    pub description: String,
}

/// Top-level resource listing
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub framebuffers: Vec<u32>,
    pub crtcs: Vec<u32>,
    pub encoders: Vec<u32>,
    pub connectors: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FramebufferInfo {
    pub id: u32,
    pub handle: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub bpp: u32,
    pub pitch: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CrtcInfo {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub fb_id: u32,
    pub x: u32,
    pub y: u32,
    pub gamma_size: u32,
    /// `None` when the kernel reports no valid mode
    pub mode: Option<ModeInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncoderType {
    #[default]
    None,
    Dac,
    Tmds,
    Lvds,
    TvDac,
    Virtual,
    Dsi,
    DpMst,
    Dpi,
    Unknown(u32),
}

impl From<u32> for EncoderType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => EncoderType::None,
            1 => EncoderType::Dac,
            2 => EncoderType::Tmds,
            3 => EncoderType::Lvds,
            4 => EncoderType::TvDac,
            5 => EncoderType::Virtual,
            6 => EncoderType::Dsi,
            7 => EncoderType::DpMst,
            8 => EncoderType::Dpi,
            other => EncoderType::Unknown(other),
        }
    }
}

impl fmt::Display for EncoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncoderType::None => "NONE",
            EncoderType::Dac => "DAC",
            EncoderType::Tmds => "TMDS",
            EncoderType::Lvds => "LVDS",
            EncoderType::TvDac => "TVDAC",
            EncoderType::Virtual => "VIRTUAL",
            EncoderType::Dsi => "DSI",
            EncoderType::DpMst => "DPMST",
            EncoderType::Dpi => "DPI",
            EncoderType::Unknown(raw) => return write!(f, "{}", raw),
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EncoderInfo {
    pub id: u32,
    pub encoder_type: EncoderType,
    pub crtc_id: u32,
    pub possible_crtcs: u32,
    pub possible_clones: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorType {
    Vga,
    DviI,
    DviD,
    DviA,
    Composite,
    SVideo,
    Lvds,
    Component,
    NinePinDin,
    DisplayPort,
    HdmiA,
    HdmiB,
    Tv,
    EDp,
    Unknown(u32),
}

impl From<u32> for ConnectorType {
    fn from(raw: u32) -> Self {
        match raw {
            1 => ConnectorType::Vga,
            2 => ConnectorType::DviI,
            3 => ConnectorType::DviD,
            4 => ConnectorType::DviA,
            5 => ConnectorType::Composite,
            6 => ConnectorType::SVideo,
            7 => ConnectorType::Lvds,
            8 => ConnectorType::Component,
            9 => ConnectorType::NinePinDin,
            10 => ConnectorType::DisplayPort,
            11 => ConnectorType::HdmiA,
            12 => ConnectorType::HdmiB,
            13 => ConnectorType::Tv,
            14 => ConnectorType::EDp,
            other => ConnectorType::Unknown(other),
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectorType::Vga => "VGA",
            ConnectorType::DviI => "DVII",
            ConnectorType::DviD => "DVID",
            ConnectorType::DviA => "DVIA",
            ConnectorType::Composite => "Composite",
            ConnectorType::SVideo => "SVIDEO",
            ConnectorType::Lvds => "LVDS",
            ConnectorType::Component => "Component",
            ConnectorType::NinePinDin => "9PinDIN",
            ConnectorType::DisplayPort => "DisplayPort",
            ConnectorType::HdmiA => "HDMIA",
            ConnectorType::HdmiB => "HDMIB",
            ConnectorType::Tv => "TV",
            ConnectorType::EDp => "eDP",
            ConnectorType::Unknown(_) => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPixel {
    HorizontalRgb,
    HorizontalBgr,
    VerticalRgb,
    VerticalBgr,
    None,
    /// Kernel's own "unknown" (1) and any code we don't recognize
    Unknown(u32),
}

impl From<u32> for SubPixel {
    fn from(raw: u32) -> Self {
        match raw {
            2 => SubPixel::HorizontalRgb,
            3 => SubPixel::HorizontalBgr,
            4 => SubPixel::VerticalRgb,
            5 => SubPixel::VerticalBgr,
            6 => SubPixel::None,
            other => SubPixel::Unknown(other),
        }
    }
}

impl fmt::Display for SubPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubPixel::HorizontalRgb => "HORIZONTAL_RGB",
            SubPixel::HorizontalBgr => "HORIZONTAL_BGR",
            SubPixel::VerticalRgb => "VERTICAL_RGB",
            SubPixel::VerticalBgr => "VERTICAL_BGR",
            SubPixel::None => "NONE",
            SubPixel::Unknown(_) => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Connected,
    Disconnected,
    Unknown(u32),
}

impl From<u32> for Connection {
    fn from(raw: u32) -> Self {
        match raw {
            1 => Connection::Connected,
            2 => Connection::Disconnected,
            other => Connection::Unknown(other),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connection::Connected => "connected",
            Connection::Disconnected => "disconnected",
            Connection::Unknown(_) => "unknown",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConnectorInfo {
    pub id: u32,
    pub connector_type: ConnectorType,
    pub connector_type_id: u32,
    /// Currently bound encoder, 0 if none
    pub encoder_id: u32,
    pub mm_width: u32,
    pub mm_height: u32,
    pub subpixel: SubPixel,
    pub connection: Connection,
    pub encoders: Vec<u32>,
    /// (property id, current value), in kernel order
    pub properties: Vec<(u32, u64)>,
    pub modes: Vec<ModeInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyInfo {
    pub id: u32,
    pub name: String,
    pub flags: u32,
    pub values: Vec<u64>,
    /// (raw value, symbolic name); empty for blob properties
    pub enums: Vec<(u64, String)>,
}

impl PropertyInfo {
    pub fn is_blob(&self) -> bool {
        self.flags & ffi::DRM_MODE_PROP_BLOB != 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyBlob {
    pub id: u32,
    pub data: Vec<u8>,
}

/// Display mode timings (kernel drm_mode_modeinfo)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeInfo {
    pub name: String,
    /// Pixel clock in kHz
    pub clock: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub hskew: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    pub vscan: u16,
    pub vrefresh: u32,
    pub flags: u32,
    pub mode_type: u32,
}

impl From<&ffi::DrmModeModeinfo> for ModeInfo {
    fn from(m: &ffi::DrmModeModeinfo) -> Self {
        Self {
            name: ffi::c_name(&m.name),
            clock: m.clock,
            hdisplay: m.hdisplay,
            hsync_start: m.hsync_start,
            hsync_end: m.hsync_end,
            htotal: m.htotal,
            hskew: m.hskew,
            vdisplay: m.vdisplay,
            vsync_start: m.vsync_start,
            vsync_end: m.vsync_end,
            vtotal: m.vtotal,
            vscan: m.vscan,
            vrefresh: m.vrefresh,
            flags: m.flags,
            mode_type: m.type_,
        }
    }
}
