//! DRM device access
//!
//! [`KmsQuery`] is the read-only query surface the report walks. [`Card`]
//! implements it over a real device node with the kernel's mode ioctls.
//!
//! Queries that return arrays follow the kernel's two-pass protocol: the
//! first call reports counts, the second fills caller-allocated arrays. If a
//! count grew in between (hotplug), the query starts over.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::raw::{c_char, c_ulong, c_void};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ffi::{self, *};
use crate::types::*;
use crate::{Error, Result};

/// Read-only DRM queries used by the report
pub trait KmsQuery {
    fn driver_version(&self) -> Result<DriverVersion>;
    fn capability(&self, cap: Capability) -> Result<u64>;
    fn resources(&self) -> Result<Resources>;
    fn framebuffer(&self, id: u32) -> Result<FramebufferInfo>;
    fn crtc(&self, id: u32) -> Result<CrtcInfo>;
    fn encoder(&self, id: u32) -> Result<EncoderInfo>;
    fn connector(&self, id: u32) -> Result<ConnectorInfo>;
    fn property(&self, id: u32) -> Result<PropertyInfo>;
    fn property_blob(&self, id: u32) -> Result<PropertyBlob>;
}

/// An opened DRM device node
pub struct Card {
    file: File,
    path: PathBuf,
}

/// Kernel user pointer for an array, 0 when there is nothing to fill
fn user_ptr<T>(v: &mut [T]) -> u64 {
    if v.is_empty() {
        0
    } else {
        v.as_mut_ptr() as u64
    }
}

impl Card {
    /// Open a device node read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Opened {} (fd {})", path.display(), file.as_raw_fd());

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Issue one ioctl, retrying on EINTR/EAGAIN
    fn ioctl<T>(&self, request: c_ulong, name: &'static str, arg: &mut T) -> Result<()> {
        loop {
            // SAFETY: `arg` is a live, correctly sized #[repr(C)] struct for
            // `request`, and any user pointers inside it point at buffers
            // that outlive this call.
            let ret = unsafe {
                libc::ioctl(
                    self.file.as_raw_fd(),
                    request as _,
                    arg as *mut T as *mut c_void,
                )
            };
            if ret != -1 {
                debug!("{} ok", name);
                return Ok(());
            }

            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EINTR) | Some(libc::EAGAIN) => continue,
                _ => {
                    debug!("{} failed on {}: {}", name, self.path.display(), err);
                    return Err(Error::Ioctl {
                        request: name,
                        source: err,
                    });
                }
            }
        }
    }
}

impl AsRawFd for Card {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl KmsQuery for Card {
    fn driver_version(&self) -> Result<DriverVersion> {
        let mut ver = DrmVersion::default();
        self.ioctl(DRM_IOCTL_VERSION, "DRM_IOCTL_VERSION", &mut ver)?;

        let mut name = vec![0u8; ver.name_len];
        let mut date = vec![0u8; ver.date_len];
        let mut desc = vec![0u8; ver.desc_len];
        ver.name = name.as_mut_ptr() as *mut c_char;
        ver.date = date.as_mut_ptr() as *mut c_char;
        ver.desc = desc.as_mut_ptr() as *mut c_char;
        self.ioctl(DRM_IOCTL_VERSION, "DRM_IOCTL_VERSION", &mut ver)?;

        let text = |buf: &[u8]| {
            let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            String::from_utf8_lossy(&buf[..end]).into_owned()
        };

        Ok(DriverVersion {
            major: ver.version_major,
            minor: ver.version_minor,
            patchlevel: ver.version_patchlevel,
            name: text(&name),
            date: text(&date),
            description: text(&desc),
        })
    }

    fn capability(&self, cap: Capability) -> Result<u64> {
        let mut arg = DrmGetCap {
            capability: cap.code(),
            value: 0,
        };
        self.ioctl(DRM_IOCTL_GET_CAP, "DRM_IOCTL_GET_CAP", &mut arg)?;
        Ok(arg.value)
    }

    fn resources(&self) -> Result<Resources> {
        loop {
            let mut res = DrmModeCardRes::default();
            self.ioctl(DRM_IOCTL_MODE_GETRESOURCES, "DRM_IOCTL_MODE_GETRESOURCES", &mut res)?;

            let counts = (res.count_fbs, res.count_crtcs, res.count_connectors, res.count_encoders);
            let mut fbs = vec![0u32; res.count_fbs as usize];
            let mut crtcs = vec![0u32; res.count_crtcs as usize];
            let mut connectors = vec![0u32; res.count_connectors as usize];
            let mut encoders = vec![0u32; res.count_encoders as usize];
            res.fb_id_ptr = user_ptr(&mut fbs);
            res.crtc_id_ptr = user_ptr(&mut crtcs);
            res.connector_id_ptr = user_ptr(&mut connectors);
            res.encoder_id_ptr = user_ptr(&mut encoders);
            self.ioctl(DRM_IOCTL_MODE_GETRESOURCES, "DRM_IOCTL_MODE_GETRESOURCES", &mut res)?;

            if res.count_fbs > counts.0
                || res.count_crtcs > counts.1
                || res.count_connectors > counts.2
                || res.count_encoders > counts.3
            {
                debug!("Resource counts changed between passes, retrying");
                continue;
            }

            fbs.truncate(res.count_fbs as usize);
            crtcs.truncate(res.count_crtcs as usize);
            connectors.truncate(res.count_connectors as usize);
            encoders.truncate(res.count_encoders as usize);

            return Ok(Resources {
                min_width: res.min_width,
                max_width: res.max_width,
                min_height: res.min_height,
                max_height: res.max_height,
                framebuffers: fbs,
                crtcs,
                encoders,
                connectors,
            });
        }
    }

    fn framebuffer(&self, id: u32) -> Result<FramebufferInfo> {
        let mut fb = DrmModeFbCmd {
            fb_id: id,
            ..Default::default()
        };
        self.ioctl(DRM_IOCTL_MODE_GETFB, "DRM_IOCTL_MODE_GETFB", &mut fb)?;

        Ok(FramebufferInfo {
            id: fb.fb_id,
            handle: fb.handle,
            width: fb.width,
            height: fb.height,
            depth: fb.depth,
            bpp: fb.bpp,
            pitch: fb.pitch,
        })
    }

    fn crtc(&self, id: u32) -> Result<CrtcInfo> {
        let mut crtc = DrmModeCrtc {
            crtc_id: id,
            ..Default::default()
        };
        self.ioctl(DRM_IOCTL_MODE_GETCRTC, "DRM_IOCTL_MODE_GETCRTC", &mut crtc)?;

        let mode = (crtc.mode_valid != 0).then(|| ModeInfo::from(&crtc.mode));
        let (width, height) = mode
            .as_ref()
            .map(|m| (u32::from(m.hdisplay), u32::from(m.vdisplay)))
            .unwrap_or((0, 0));

        Ok(CrtcInfo {
            id: crtc.crtc_id,
            width,
            height,
            fb_id: crtc.fb_id,
            x: crtc.x,
            y: crtc.y,
            gamma_size: crtc.gamma_size,
            mode,
        })
    }

    fn encoder(&self, id: u32) -> Result<EncoderInfo> {
        let mut enc = DrmModeGetEncoder {
            encoder_id: id,
            ..Default::default()
        };
        self.ioctl(DRM_IOCTL_MODE_GETENCODER, "DRM_IOCTL_MODE_GETENCODER", &mut enc)?;

        Ok(EncoderInfo {
            id: enc.encoder_id,
            encoder_type: EncoderType::from(enc.encoder_type),
            crtc_id: enc.crtc_id,
            possible_crtcs: enc.possible_crtcs,
            possible_clones: enc.possible_clones,
        })
    }

    fn connector(&self, id: u32) -> Result<ConnectorInfo> {
        loop {
            let mut conn = DrmModeGetConnector {
                connector_id: id,
                ..Default::default()
            };
            self.ioctl(DRM_IOCTL_MODE_GETCONNECTOR, "DRM_IOCTL_MODE_GETCONNECTOR", &mut conn)?;

            let counts = (conn.count_modes, conn.count_props, conn.count_encoders);
            let mut modes = vec![DrmModeModeinfo::default(); conn.count_modes as usize];
            let mut props = vec![0u32; conn.count_props as usize];
            let mut prop_values = vec![0u64; conn.count_props as usize];
            let mut encoders = vec![0u32; conn.count_encoders as usize];
            conn.modes_ptr = user_ptr(&mut modes);
            conn.props_ptr = user_ptr(&mut props);
            conn.prop_values_ptr = user_ptr(&mut prop_values);
            conn.encoders_ptr = user_ptr(&mut encoders);
            self.ioctl(DRM_IOCTL_MODE_GETCONNECTOR, "DRM_IOCTL_MODE_GETCONNECTOR", &mut conn)?;

            if conn.count_modes > counts.0
                || conn.count_props > counts.1
                || conn.count_encoders > counts.2
            {
                debug!("Connector {} counts changed between passes, retrying", id);
                continue;
            }

            modes.truncate(conn.count_modes as usize);
            props.truncate(conn.count_props as usize);
            prop_values.truncate(conn.count_props as usize);
            encoders.truncate(conn.count_encoders as usize);

            return Ok(ConnectorInfo {
                id: conn.connector_id,
                connector_type: ConnectorType::from(conn.connector_type),
                connector_type_id: conn.connector_type_id,
                encoder_id: conn.encoder_id,
                mm_width: conn.mm_width,
                mm_height: conn.mm_height,
                subpixel: SubPixel::from(conn.subpixel),
                connection: Connection::from(conn.connection),
                encoders,
                properties: props.into_iter().zip(prop_values).collect(),
                modes: modes.iter().map(ModeInfo::from).collect(),
            });
        }
    }

    fn property(&self, id: u32) -> Result<PropertyInfo> {
        loop {
            let mut prop = DrmModeGetProperty {
                prop_id: id,
                ..Default::default()
            };
            self.ioctl(DRM_IOCTL_MODE_GETPROPERTY, "DRM_IOCTL_MODE_GETPROPERTY", &mut prop)?;

            let is_blob = prop.flags & DRM_MODE_PROP_BLOB != 0;
            let counts = (prop.count_values, prop.count_enum_blobs);
            let mut values = vec![0u64; prop.count_values as usize];
            // Blob properties report no enum entries on current kernels
            let enum_count = if is_blob { 0 } else { prop.count_enum_blobs };
            let mut enums = vec![DrmModePropertyEnum::default(); enum_count as usize];
            prop.values_ptr = user_ptr(&mut values);
            prop.enum_blob_ptr = user_ptr(&mut enums);
            prop.count_enum_blobs = enum_count;
            self.ioctl(DRM_IOCTL_MODE_GETPROPERTY, "DRM_IOCTL_MODE_GETPROPERTY", &mut prop)?;

            if prop.count_values > counts.0 || (!is_blob && prop.count_enum_blobs > counts.1) {
                debug!("Property {} counts changed between passes, retrying", id);
                continue;
            }

            values.truncate(prop.count_values as usize);
            enums.truncate(prop.count_enum_blobs as usize);

            return Ok(PropertyInfo {
                id: prop.prop_id,
                name: ffi::c_name(&prop.name),
                flags: prop.flags,
                values,
                enums: enums
                    .iter()
                    .map(|e| (e.value, ffi::c_name(&e.name)))
                    .collect(),
            });
        }
    }

    fn property_blob(&self, id: u32) -> Result<PropertyBlob> {
        let mut blob = DrmModeGetBlob {
            blob_id: id,
            ..Default::default()
        };
        self.ioctl(DRM_IOCTL_MODE_GETPROPBLOB, "DRM_IOCTL_MODE_GETPROPBLOB", &mut blob)?;

        let mut data = vec![0u8; blob.length as usize];
        blob.data = user_ptr(&mut data);
        self.ioctl(DRM_IOCTL_MODE_GETPROPBLOB, "DRM_IOCTL_MODE_GETPROPBLOB", &mut blob)?;
        data.truncate(blob.length as usize);

        Ok(PropertyBlob { id, data })
    }
}
