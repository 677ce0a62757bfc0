//! Raw DRM ioctl bindings
//!
//! Layouts mirror the kernel's `drm.h` / `drm_mode.h` uapi structs. Only the
//! read-only query ioctls are defined here.

use std::mem::size_of;
use std::os::raw::{c_char, c_int, c_ulong};

const DRM_IOCTL_BASE: c_ulong = 0x64; // 'd'

/// `_IOWR('d', nr, size)`
const fn drm_iowr(nr: c_ulong, size: usize) -> c_ulong {
    (3 << 30) | (DRM_IOCTL_BASE << 8) | nr | ((size as c_ulong) << 16)
}

pub const DRM_IOCTL_VERSION: c_ulong = drm_iowr(0x00, size_of::<DrmVersion>());
pub const DRM_IOCTL_GET_CAP: c_ulong = drm_iowr(0x0c, size_of::<DrmGetCap>());
pub const DRM_IOCTL_MODE_GETRESOURCES: c_ulong = drm_iowr(0xa0, size_of::<DrmModeCardRes>());
pub const DRM_IOCTL_MODE_GETCRTC: c_ulong = drm_iowr(0xa1, size_of::<DrmModeCrtc>());
pub const DRM_IOCTL_MODE_GETENCODER: c_ulong = drm_iowr(0xa6, size_of::<DrmModeGetEncoder>());
pub const DRM_IOCTL_MODE_GETCONNECTOR: c_ulong = drm_iowr(0xa7, size_of::<DrmModeGetConnector>());
pub const DRM_IOCTL_MODE_GETPROPERTY: c_ulong = drm_iowr(0xaa, size_of::<DrmModeGetProperty>());
pub const DRM_IOCTL_MODE_GETPROPBLOB: c_ulong = drm_iowr(0xac, size_of::<DrmModeGetBlob>());
pub const DRM_IOCTL_MODE_GETFB: c_ulong = drm_iowr(0xad, size_of::<DrmModeFbCmd>());

/// Capability codes for DRM_IOCTL_GET_CAP
pub const DRM_CAP_DUMB_BUFFER: u64 = 0x1;
pub const DRM_CAP_VBLANK_HIGH_CRTC: u64 = 0x2;
pub const DRM_CAP_DUMB_PREFERRED_DEPTH: u64 = 0x3;
pub const DRM_CAP_DUMB_PREFER_SHADOW: u64 = 0x4;
pub const DRM_CAP_PRIME: u64 = 0x5;

/// Property flag: value is a blob id
pub const DRM_MODE_PROP_BLOB: u32 = 1 << 4;

pub const DRM_DISPLAY_MODE_LEN: usize = 32;
pub const DRM_PROP_NAME_LEN: usize = 32;

/// struct drm_version
#[repr(C)]
pub struct DrmVersion {
    pub version_major: c_int,
    pub version_minor: c_int,
    pub version_patchlevel: c_int,
    pub name_len: libc::size_t,
    pub name: *mut c_char,
    pub date_len: libc::size_t,
    pub date: *mut c_char,
    pub desc_len: libc::size_t,
    pub desc: *mut c_char,
}

impl Default for DrmVersion {
    fn default() -> Self {
        Self {
            version_major: 0,
            version_minor: 0,
            version_patchlevel: 0,
            name_len: 0,
            name: std::ptr::null_mut(),
            date_len: 0,
            date: std::ptr::null_mut(),
            desc_len: 0,
            desc: std::ptr::null_mut(),
        }
    }
}

/// struct drm_get_cap
#[repr(C)]
#[derive(Default)]
pub struct DrmGetCap {
    pub capability: u64,
    pub value: u64,
}

/// struct drm_mode_card_res
#[repr(C)]
#[derive(Default)]
pub struct DrmModeCardRes {
    pub fb_id_ptr: u64,
    pub crtc_id_ptr: u64,
    pub connector_id_ptr: u64,
    pub encoder_id_ptr: u64,
    pub count_fbs: u32,
    pub count_crtcs: u32,
    pub count_connectors: u32,
    pub count_encoders: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

/// struct drm_mode_fb_cmd
#[repr(C)]
#[derive(Default)]
pub struct DrmModeFbCmd {
    pub fb_id: u32,
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub bpp: u32,
    pub depth: u32,
    pub handle: u32,
}

/// struct drm_mode_modeinfo
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct DrmModeModeinfo {
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
    pub type_: u32,
    pub name: [c_char; DRM_DISPLAY_MODE_LEN],
}

/// struct drm_mode_crtc
#[repr(C)]
#[derive(Default)]
pub struct DrmModeCrtc {
    pub set_connectors_ptr: u64,
    pub count_connectors: u32,
    pub crtc_id: u32,
    pub fb_id: u32,
    pub x: u32,
    pub y: u32,
    pub gamma_size: u32,
    pub mode_valid: u32,
    pub mode: DrmModeModeinfo,
}

/// struct drm_mode_get_encoder
#[repr(C)]
#[derive(Default)]
pub struct DrmModeGetEncoder {
    pub encoder_id: u32,
    pub encoder_type: u32,
    pub crtc_id: u32,
    pub possible_crtcs: u32,
    pub possible_clones: u32,
}

/// struct drm_mode_get_connector
#[repr(C)]
#[derive(Default)]
pub struct DrmModeGetConnector {
    pub encoders_ptr: u64,
    pub modes_ptr: u64,
    pub props_ptr: u64,
    pub prop_values_ptr: u64,
    pub count_modes: u32,
    pub count_props: u32,
    pub count_encoders: u32,
    pub encoder_id: u32,
    pub connector_id: u32,
    pub connector_type: u32,
    pub connector_type_id: u32,
    pub connection: u32,
    pub mm_width: u32,
    pub mm_height: u32,
    pub subpixel: u32,
    pub pad: u32,
}

/// struct drm_mode_property_enum
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct DrmModePropertyEnum {
    pub value: u64,
    pub name: [c_char; DRM_PROP_NAME_LEN],
}

/// struct drm_mode_get_property
#[repr(C)]
#[derive(Default)]
pub struct DrmModeGetProperty {
    pub values_ptr: u64,
    pub enum_blob_ptr: u64,
    pub prop_id: u32,
    pub flags: u32,
    pub name: [c_char; DRM_PROP_NAME_LEN],
    pub count_values: u32,
    pub count_enum_blobs: u32,
}

/// struct drm_mode_get_blob
#[repr(C)]
#[derive(Default)]
pub struct DrmModeGetBlob {
    pub blob_id: u32,
    pub length: u32,
    pub data: u64,
}

/// Convert a fixed-size, NUL-padded kernel name into an owned string
pub fn c_name(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioctl_numbers_match_kernel() {
        // Values from <drm/drm.h> on 64-bit Linux
        assert_eq!(DRM_IOCTL_GET_CAP, 0xc010_640c);
        assert_eq!(DRM_IOCTL_MODE_GETRESOURCES, 0xc040_64a0);
        assert_eq!(DRM_IOCTL_MODE_GETCRTC, 0xc068_64a1);
        assert_eq!(DRM_IOCTL_MODE_GETENCODER, 0xc014_64a6);
        assert_eq!(DRM_IOCTL_MODE_GETCONNECTOR, 0xc050_64a7);
        assert_eq!(DRM_IOCTL_MODE_GETPROPERTY, 0xc040_64aa);
        assert_eq!(DRM_IOCTL_MODE_GETPROPBLOB, 0xc010_64ac);
        assert_eq!(DRM_IOCTL_MODE_GETFB, 0xc01c_64ad);
    }

    #[test]
    fn test_c_name_stops_at_nul() {
        let mut raw = [0 as c_char; DRM_DISPLAY_MODE_LEN];
        for (i, b) in b"1920x1080".iter().enumerate() {
            raw[i] = *b as c_char;
        }
        assert_eq!(c_name(&raw), "1920x1080");
    }
}
