//! Device report
//!
//! Walks one device top-down (driver, capabilities, resources, then each
//! framebuffer, CRTC, encoder and connector) and writes the text report.
//! Every record is fetched, printed and dropped inside its own loop
//! iteration. A failed fetch becomes a diagnostic line and the walk moves
//! on; only a failing output stream stops it.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::device::{Card, KmsQuery};
use crate::format;
use crate::types::Capability;
use crate::{Error, Result};

/// How far the report for one device got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every query that matters succeeded
    Complete,
    /// The resource listing or some detail records could not be fetched
    Incomplete { failures: usize },
    /// The device node could not be opened
    OpenFailed,
}

impl Outcome {
    pub fn is_failure(self) -> bool {
        self != Outcome::Complete
    }
}

/// Result of a whole run over several device paths
#[derive(Debug, Default)]
pub struct Summary {
    pub devices: usize,
    pub failed: Vec<PathBuf>,
}

impl Summary {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Report every path in order, one device at a time
pub fn run<P: AsRef<Path>>(paths: &[P], out: &mut dyn Write) -> Result<Summary> {
    let mut summary = Summary::default();

    for path in paths {
        let path = path.as_ref();
        let outcome = report_path(path, out)?;
        summary.devices += 1;
        if outcome.is_failure() {
            summary.failed.push(path.to_path_buf());
        }
    }

    out.flush()?;
    Ok(summary)
}

/// Open one device node and report it; the node is closed before returning
pub fn report_path(path: &Path, out: &mut dyn Write) -> Result<Outcome> {
    info!("Reporting {}", path.display());
    writeln!(out, "Device {}:", path.display())?;

    let card = match Card::open(path) {
        Ok(card) => card,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            writeln!(out, "  cannot open device {}", e.diagnostic())?;
            writeln!(out)?;
            return Ok(Outcome::OpenFailed);
        }
    };

    report_device(&card, out)
}

/// Write the report body for an already opened device
pub fn report_device<Q: KmsQuery + ?Sized>(device: &Q, out: &mut dyn Write) -> Result<Outcome> {
    let mut report = Report {
        device,
        out,
        failures: 0,
    };
    report.driver()?;
    report.capabilities()?;
    report.resources()?;

    Ok(match report.failures {
        0 => Outcome::Complete,
        failures => Outcome::Incomplete { failures },
    })
}

struct Report<'a, Q: ?Sized> {
    device: &'a Q,
    out: &'a mut dyn Write,
    failures: usize,
}

impl<Q: KmsQuery + ?Sized> Report<'_, Q> {
    /// Diagnostic for a record that could not be fetched
    fn skipped(&mut self, indent: &str, kind: &str, id: u32, err: &Error) -> Result<()> {
        warn!("{} {}: {}", kind, id, err);
        self.failures += 1;
        writeln!(self.out, "{}{} {}: cannot retrieve {}", indent, kind, id, err.diagnostic())?;
        Ok(())
    }

    fn driver(&mut self) -> Result<()> {
        match self.device.driver_version() {
            Ok(v) => {
                writeln!(
                    self.out,
                    "  Driver: {} {}.{}.{} ({})",
                    v.name, v.major, v.minor, v.patchlevel, v.date
                )?;
                writeln!(self.out, "  Description: {}", v.description)?;
            }
            Err(e) => writeln!(self.out, "  Driver: unknown {}", e.diagnostic())?,
        }
        Ok(())
    }

    fn capabilities(&mut self) -> Result<()> {
        writeln!(self.out, "  Capabilities:")?;
        for cap in Capability::ALL {
            let value = match self.device.capability(cap) {
                Ok(v) => format::capability_value(v),
                Err(_) => "unknown".to_string(),
            };
            writeln!(self.out, "    {}: {}", cap.name(), value)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn resources(&mut self) -> Result<()> {
        let res = match self.device.resources() {
            Ok(res) => res,
            Err(e) => {
                warn!("No resources: {}", e);
                self.failures += 1;
                writeln!(self.out, "  cannot retrieve DRM resources {}", e.diagnostic())?;
                writeln!(self.out)?;
                return Ok(());
            }
        };

        writeln!(self.out, "  Resources:")?;
        writeln!(self.out, "    Width: {} - {}", res.min_width, res.max_width)?;
        writeln!(self.out, "    Height: {} - {}", res.min_height, res.max_height)?;
        writeln!(self.out, "    Framebuffers: {}", format::counted_list(&res.framebuffers))?;
        writeln!(self.out, "    CRTCs: {}", format::counted_list(&res.crtcs))?;
        writeln!(self.out, "    Encoders: {}", format::counted_list(&res.encoders))?;
        writeln!(self.out, "    Connectors: {}", res.connectors.len())?;
        writeln!(self.out)?;

        self.framebuffers(&res.framebuffers)?;
        self.crtcs(&res.crtcs)?;
        self.encoders(&res.encoders)?;
        self.connectors(&res.connectors)?;
        Ok(())
    }

    fn framebuffers(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            match self.device.framebuffer(id) {
                Ok(fb) => {
                    writeln!(self.out, "      Framebuffer {}:", fb.id)?;
                    writeln!(self.out, "        Handle: {}", fb.handle)?;
                    writeln!(self.out, "        Size: {}x{}", fb.width, fb.height)?;
                    writeln!(self.out, "        Depth: {}", fb.depth)?;
                    writeln!(self.out, "        BPP: {}", fb.bpp)?;
                    writeln!(self.out, "        Pitch: {}", fb.pitch)?;
                }
                Err(e) => self.skipped("      ", "Framebuffer", id, &e)?,
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn crtcs(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            match self.device.crtc(id) {
                Ok(crtc) => {
                    writeln!(self.out, "      CRTC {}:", crtc.id)?;
                    writeln!(self.out, "        Size: {}x{}", crtc.width, crtc.height)?;
                    writeln!(self.out, "        Framebuffer: {}", crtc.fb_id)?;
                    writeln!(self.out, "        Position: {}, {}", crtc.x, crtc.y)?;
                    writeln!(self.out, "        Gamma size: {}", crtc.gamma_size)?;
                    match &crtc.mode {
                        Some(mode) => writeln!(self.out, "        Mode: {}", format::mode_line(mode))?,
                        None => writeln!(self.out, "        Mode: none")?,
                    }
                }
                Err(e) => self.skipped("      ", "CRTC", id, &e)?,
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn encoders(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            match self.device.encoder(id) {
                Ok(enc) => {
                    writeln!(self.out, "      Encoder {}:", enc.id)?;
                    writeln!(self.out, "        Type: {}", enc.encoder_type)?;
                    writeln!(self.out, "        CRTC: {}", enc.crtc_id)?;
                    writeln!(self.out, "        Possible CRTCs: {}", format::bitmask(enc.possible_crtcs))?;
                    writeln!(self.out, "        Possible clones: {}", format::bitmask(enc.possible_clones))?;
                }
                Err(e) => self.skipped("      ", "Encoder", id, &e)?,
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn connectors(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            let conn = match self.device.connector(id) {
                Ok(conn) => conn,
                Err(e) => {
                    self.skipped("      ", "Connector", id, &e)?;
                    writeln!(self.out)?;
                    continue;
                }
            };

            writeln!(self.out, "      Connector {}:", conn.id)?;
            writeln!(self.out, "        Type: {}", conn.connector_type)?;
            writeln!(self.out, "        Name: {}-{}", conn.connector_type, conn.connector_type_id)?;
            writeln!(self.out, "        Dimensions: {}mm x {}mm", conn.mm_width, conn.mm_height)?;
            writeln!(self.out, "        SubPixel: {}", conn.subpixel)?;
            writeln!(self.out, "        Connection: {}", conn.connection)?;
            writeln!(self.out, "        Encoder: {}", conn.encoder_id)?;
            writeln!(self.out, "        Encoders: {}", format::counted_list(&conn.encoders))?;

            writeln!(self.out, "        Properties: {}", conn.properties.len())?;
            for &(prop_id, value) in &conn.properties {
                self.property(prop_id, value)?;
            }

            writeln!(self.out, "        Modes: {}", conn.modes.len())?;
            for mode in &conn.modes {
                writeln!(self.out, "          {}", format::mode_line(mode))?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// One property attached to a connector, with its current value
    fn property(&mut self, id: u32, value: u64) -> Result<()> {
        let prop = match self.device.property(id) {
            Ok(prop) => prop,
            Err(e) => return self.skipped("          ", "Property", id, &e),
        };

        writeln!(self.out, "          Property {}:", prop.id)?;
        writeln!(self.out, "            Name: {}", prop.name)?;
        writeln!(self.out, "            Flags: 0x{:08x}", prop.flags)?;
        writeln!(self.out, "            Values: {}", format::counted_list(&prop.values))?;

        if prop.is_blob() {
            return self.blob(value);
        }

        writeln!(self.out, "            Value: {}", value)?;
        let mut marked = false;
        for (raw, name) in &prop.enums {
            let active = !marked && *raw == value;
            marked |= active;
            let marker = if active { "*" } else { " " };
            writeln!(self.out, "              {} {}: {}", marker, raw, name)?;
        }
        Ok(())
    }

    /// Blob-typed property value: length and the first word of content
    fn blob(&mut self, value: u64) -> Result<()> {
        // Blob ids are 32-bit object ids carried in the 64-bit value slot
        let id = value as u32;
        let blob = match self.device.property_blob(id) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Blob {}: {}", id, e);
                writeln!(self.out, "            Blob {}: cannot retrieve {}", id, e.diagnostic())?;
                return Ok(());
            }
        };

        match format::blob_word(&blob.data) {
            Some(word) => writeln!(
                self.out,
                "            Blob {}: {} bytes, data 0x{:08x}",
                blob.id,
                blob.data.len(),
                word
            )?,
            None => {
                let short = Error::ShortBlob {
                    id: blob.id,
                    len: blob.data.len(),
                };
                warn!("{}", short);
                writeln!(self.out, "            {}", short)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use std::collections::HashMap;
    use std::io;

    fn missing(request: &'static str) -> Error {
        Error::Ioctl {
            request,
            source: io::Error::from_raw_os_error(libc::ENOENT),
        }
    }

    /// In-memory device; anything not inserted fails with ENOENT
    #[derive(Default)]
    struct FakeCard {
        caps: HashMap<u64, u64>,
        resources: Option<Resources>,
        framebuffers: HashMap<u32, FramebufferInfo>,
        crtcs: HashMap<u32, CrtcInfo>,
        encoders: HashMap<u32, EncoderInfo>,
        connectors: HashMap<u32, ConnectorInfo>,
        properties: HashMap<u32, PropertyInfo>,
        blobs: HashMap<u32, PropertyBlob>,
        no_driver: bool,
    }

    impl KmsQuery for FakeCard {
        fn driver_version(&self) -> Result<DriverVersion> {
            if self.no_driver {
                return Err(missing("DRM_IOCTL_VERSION"));
            }
            Ok(DriverVersion {
                major: 1,
                minor: 2,
                patchlevel: 3,
                name: "fake".to_string(),
                date: "20240101".to_string(),
                description: "Fake DRM driver".to_string(),
            })
        }

        fn capability(&self, cap: Capability) -> Result<u64> {
            self.caps
                .get(&cap.code())
                .copied()
                .ok_or_else(|| missing("DRM_IOCTL_GET_CAP"))
        }

        fn resources(&self) -> Result<Resources> {
            self.resources
                .clone()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETRESOURCES"))
        }

        fn framebuffer(&self, id: u32) -> Result<FramebufferInfo> {
            self.framebuffers
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETFB"))
        }

        fn crtc(&self, id: u32) -> Result<CrtcInfo> {
            self.crtcs
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETCRTC"))
        }

        fn encoder(&self, id: u32) -> Result<EncoderInfo> {
            self.encoders
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETENCODER"))
        }

        fn connector(&self, id: u32) -> Result<ConnectorInfo> {
            self.connectors
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETCONNECTOR"))
        }

        fn property(&self, id: u32) -> Result<PropertyInfo> {
            self.properties
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETPROPERTY"))
        }

        fn property_blob(&self, id: u32) -> Result<PropertyBlob> {
            self.blobs
                .get(&id)
                .cloned()
                .ok_or_else(|| missing("DRM_IOCTL_MODE_GETPROPBLOB"))
        }
    }

    fn connector(id: u32) -> ConnectorInfo {
        ConnectorInfo {
            id,
            connector_type: ConnectorType::HdmiA,
            connector_type_id: 1,
            encoder_id: 0,
            mm_width: 0,
            mm_height: 0,
            subpixel: SubPixel::Unknown(1),
            connection: Connection::Disconnected,
            encoders: vec![40],
            properties: vec![],
            modes: vec![],
        }
    }

    fn render(card: &FakeCard) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = report_device(card, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    fn lines_between<'a>(text: &'a str, start: &str, end: &str) -> Vec<&'a str> {
        text.lines()
            .skip_while(|l| !l.contains(start))
            .skip(1)
            .take_while(|l| !l.contains(end))
            .collect()
    }

    #[test]
    fn test_capabilities_in_fixed_order() {
        let mut card = FakeCard::default();
        card.caps.insert(0x1, 1);
        card.caps.insert(0x3, 24);
        let (_, text) = render(&card);

        let caps = lines_between(&text, "Capabilities:", "DRM resources");
        let caps: Vec<_> = caps.into_iter().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            caps,
            vec![
                "    DRM_CAP_DUMB_BUFFER: 1",
                "    DRM_CAP_VBLANK_HIGH_CRTC: unknown",
                "    DRM_CAP_DUMB_PREFERRED_DEPTH: 24",
                "    DRM_CAP_DUMB_PREFER_SHADOW: unknown",
                "    DRM_CAP_PRIME: unknown",
            ]
        );
    }

    #[test]
    fn test_capability_value_is_bounded() {
        let mut card = FakeCard::default();
        card.caps.insert(0x1, 12_345_678_901);
        let (_, text) = render(&card);
        assert!(text.contains("    DRM_CAP_DUMB_BUFFER: 123456789\n"));
    }

    #[test]
    fn test_driver_failure_is_reported_inline() {
        let mut card = FakeCard::default();
        card.no_driver = true;
        let (_, text) = render(&card);

        assert!(text.contains("  Driver: unknown (2): No such file or directory\n"));
        assert!(!text.contains("  Description:"));
        // The rest of the report still runs
        assert!(text.contains("  Capabilities:\n"));
    }

    #[test]
    fn test_missing_resources_ends_report() {
        let card = FakeCard::default();
        let (outcome, text) = render(&card);

        assert_eq!(outcome, Outcome::Incomplete { failures: 1 });
        assert!(text.contains("  cannot retrieve DRM resources (2): No such file or directory"));
        assert!(!text.contains("Resources:"));
        assert!(text.contains("  Driver: fake 1.2.3 (20240101)"));
    }

    #[test]
    fn test_single_disconnected_connector() {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            max_width: 4096,
            max_height: 4096,
            encoders: vec![40],
            connectors: vec![41],
            ..Default::default()
        });
        card.encoders.insert(
            40,
            EncoderInfo {
                id: 40,
                encoder_type: EncoderType::Tmds,
                crtc_id: 0,
                possible_crtcs: 0b1011,
                possible_clones: 0,
            },
        );
        card.connectors.insert(41, connector(41));

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Complete);
        assert!(text.contains("    Framebuffers: 0\n"));
        assert!(text.contains("    CRTCs: 0\n"));
        assert!(text.contains("    Encoders: 1: 40\n"));
        assert!(text.contains("    Connectors: 1\n"));
        assert!(text.contains("        Possible CRTCs: 00, 01, 03 (11, 0x0000000b, 0000000000000013)"));
        assert!(text.contains("        Possible clones: NONE (0, 0x00000000, 0000000000000000)"));

        assert_eq!(text.matches("      Connector ").count(), 1);
        let block = lines_between(&text, "Connector 41:", "\u{0}");
        assert_eq!(
            block,
            vec![
                "        Type: HDMIA",
                "        Name: HDMIA-1",
                "        Dimensions: 0mm x 0mm",
                "        SubPixel: unknown",
                "        Connection: disconnected",
                "        Encoder: 0",
                "        Encoders: 1: 40",
                "        Properties: 0",
                "        Modes: 0",
                "",
            ]
        );
    }

    #[test]
    fn test_failed_fetches_are_skipped() {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            framebuffers: vec![1, 2],
            crtcs: vec![10],
            connectors: vec![20, 21, 22],
            ..Default::default()
        });
        card.framebuffers.insert(
            2,
            FramebufferInfo {
                id: 2,
                width: 1920,
                height: 1080,
                depth: 24,
                bpp: 32,
                pitch: 7680,
                ..Default::default()
            },
        );
        card.connectors.insert(20, connector(20));
        card.connectors.insert(22, connector(22));

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Incomplete { failures: 3 });
        assert!(text.contains("      Framebuffer 1: cannot retrieve (2): No such file or directory\n"));
        assert!(text.contains("      Framebuffer 2:\n        Handle: 0\n        Size: 1920x1080\n"));
        assert!(text.contains("      CRTC 10: cannot retrieve (2): No such file or directory\n"));
        assert!(text.contains("      Connector 21: cannot retrieve (2): No such file or directory\n"));
        assert_eq!(text.matches("      Connector 20:\n").count(), 1);
        assert_eq!(text.matches("      Connector 22:\n").count(), 1);

        // Order follows the resource listing
        let pos20 = text.find("Connector 20").unwrap();
        let pos21 = text.find("Connector 21").unwrap();
        let pos22 = text.find("Connector 22").unwrap();
        assert!(pos20 < pos21 && pos21 < pos22);
    }

    #[test]
    fn test_failed_encoder_is_skipped() {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            encoders: vec![5, 6],
            ..Default::default()
        });
        card.encoders.insert(
            6,
            EncoderInfo {
                id: 6,
                encoder_type: EncoderType::Dac,
                crtc_id: 3,
                possible_crtcs: 1,
                possible_clones: 0,
            },
        );

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Incomplete { failures: 1 });
        assert!(text.contains("      Encoder 5: cannot retrieve (2): No such file or directory\n"));
        assert!(text.contains("      Encoder 6:\n        Type: DAC\n        CRTC: 3\n"));
        assert!(text.find("Encoder 5").unwrap() < text.find("Encoder 6").unwrap());
    }

    #[test]
    fn test_failed_property_is_skipped() {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            connectors: vec![30],
            ..Default::default()
        });
        let mut conn = connector(30);
        conn.properties = vec![(1, 0), (2, 1)];
        card.connectors.insert(30, conn);
        card.properties.insert(2, dpms());

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Incomplete { failures: 1 });
        assert!(text.contains("        Properties: 2\n"));
        assert!(text.contains("          Property 1: cannot retrieve (2): No such file or directory\n"));
        assert!(text.contains("          Property 2:\n            Name: DPMS\n"));
        assert!(text.contains("        Modes: 0\n"));
    }

    fn dpms() -> PropertyInfo {
        PropertyInfo {
            id: 2,
            name: "DPMS".to_string(),
            flags: 0x08,
            values: vec![],
            enums: vec![
                (0, "A".to_string()),
                (1, "B".to_string()),
                (2, "C".to_string()),
            ],
        }
    }

    fn card_with_property(prop: PropertyInfo, value: u64) -> FakeCard {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            connectors: vec![30],
            ..Default::default()
        });
        let mut conn = connector(30);
        conn.properties = vec![(prop.id, value)];
        card.connectors.insert(30, conn);
        card.properties.insert(prop.id, prop);
        card
    }

    #[test]
    fn test_enum_property_marks_current_value() {
        let (_, text) = render(&card_with_property(dpms(), 1));
        assert!(text.contains("          Property 2:\n            Name: DPMS\n"));
        assert!(text.contains("            Flags: 0x00000008\n"));
        assert!(text.contains("            Values: 0\n"));
        assert!(text.contains("            Value: 1\n"));
        assert!(text.contains("                0: A\n"));
        assert!(text.contains("              * 1: B\n"));
        assert!(text.contains("                2: C\n"));
        assert_eq!(text.matches("* ").count(), 1);
    }

    #[test]
    fn test_enum_property_without_match() {
        let (outcome, text) = render(&card_with_property(dpms(), 5));
        assert_eq!(outcome, Outcome::Complete);
        assert!(text.contains("            Value: 5\n"));
        assert_eq!(text.matches("* ").count(), 0);
    }

    #[test]
    fn test_range_property_lists_values() {
        let prop = PropertyInfo {
            id: 3,
            name: "max bpc".to_string(),
            flags: 0x02,
            values: vec![0, 100],
            enums: vec![],
        };
        let (_, text) = render(&card_with_property(prop, 50));
        assert!(text.contains("            Values: 2: 0, 100\n"));
        assert!(text.contains("            Value: 50\n"));
    }

    fn edid() -> PropertyInfo {
        PropertyInfo {
            id: 1,
            name: "EDID".to_string(),
            flags: 0x10 | 0x40,
            values: vec![],
            enums: vec![],
        }
    }

    #[test]
    fn test_blob_property_peeks_first_word() {
        let mut card = card_with_property(edid(), 77);
        let mut data = vec![0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];
        data.resize(128, 0);
        card.blobs.insert(77, PropertyBlob { id: 77, data });

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Complete);
        assert!(text.contains("            Flags: 0x00000050\n"));
        assert!(text.contains("            Blob 77: 128 bytes, data 0x00ffffff\n"));
        assert!(!text.contains("Value:"));
    }

    #[test]
    fn test_short_blob_reports_shortfall() {
        let mut card = card_with_property(edid(), 78);
        card.blobs.insert(
            78,
            PropertyBlob {
                id: 78,
                data: vec![1, 2],
            },
        );
        let (_, text) = render(&card);
        assert!(text.contains("            Blob 78: 2 bytes, short read (need 4)\n"));
    }

    #[test]
    fn test_missing_blob_does_not_abort_connector() {
        let mut card = card_with_property(edid(), 79);
        card.connectors.get_mut(&30).unwrap().modes = vec![ModeInfo {
            name: "800x600".to_string(),
            hdisplay: 800,
            vdisplay: 600,
            vrefresh: 60,
            clock: 40000,
            ..Default::default()
        }];

        let (outcome, text) = render(&card);
        assert_eq!(outcome, Outcome::Complete);
        assert!(text.contains("            Blob 79: cannot retrieve (2): No such file or directory\n"));
        assert!(text.contains("        Modes: 1\n          800x600     800x 600  60fps"));
    }

    #[test]
    fn test_crtc_with_and_without_mode() {
        let mut card = FakeCard::default();
        card.resources = Some(Resources {
            crtcs: vec![50, 51],
            ..Default::default()
        });
        card.crtcs.insert(
            50,
            CrtcInfo {
                id: 50,
                width: 1920,
                height: 1080,
                fb_id: 99,
                gamma_size: 256,
                mode: Some(ModeInfo {
                    name: "1920x1080".to_string(),
                    hdisplay: 1920,
                    vdisplay: 1080,
                    vrefresh: 60,
                    clock: 148500,
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        card.crtcs.insert(
            51,
            CrtcInfo {
                id: 51,
                ..Default::default()
            },
        );

        let (_, text) = render(&card);
        assert!(text.contains("        Mode: 1920x1080  1920x1080  60fps (148500"));
        assert!(text.contains("      CRTC 51:\n        Size: 0x0\n"));
        assert!(text.contains("        Mode: none\n"));
    }

    #[test]
    fn test_run_continues_past_unopenable_device() {
        let paths = ["/nonexistent/dri/card0", "/nonexistent/dri/card1"];
        let mut out = Vec::new();
        let summary = run(&paths[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary.devices, 2);
        assert_eq!(summary.failed.len(), 2);
        assert!(!summary.success());
        assert!(text.contains("Device /nonexistent/dri/card0:\n  cannot open device (2): No such file or directory\n"));
        assert!(text.contains("Device /nonexistent/dri/card1:\n"));
    }
}
