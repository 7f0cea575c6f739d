//! Binary star catalog (`stars.bin`).
//!
//! Little-endian, two sections:
//!
//! 1. **Header** (32 bytes)
//!
//! | Offset | Type | Field |
//! |--------|------|-------|
//! | 0..4 | `[u8; 4]` | magic `SKST` |
//! | 4..8 | `u32` | version, currently 1 |
//! | 8..16 | `u64` | record count |
//! | 16..20 | `u32` | record size, always 40 |
//! | 20..24 | `f32` | faintest magnitude in the file |
//! | 24..32 | | reserved |
//!
//! 2. **Records** (`count × 40` bytes)
//!
//! | Offset | Type | Field |
//! |--------|------|-------|
//! | 0..8 | `u64` | identifier |
//! | 8..16 | `f64` | right ascension, radians |
//! | 16..24 | `f64` | declination, radians |
//! | 24..28 | `f32` | magnitude |
//! | 28..32 | `f32` | μα·cosδ, mas/yr |
//! | 32..36 | `f32` | μδ, mas/yr |
//! | 36 | `u8` | spectral class letter, 0 or space for none |
//! | 37 | `u8` | flags, see [`FLAG_HAS_PROPER_MOTION`] |
//! | 38..40 | | reserved |
//!
//! The file is memory-mapped and decoded record by record; positions are
//! validated and right ascension is wrapped into `[0, 2π)` on load.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use skychart_core::angle::wrap_0_2pi;
use skychart_core::constants::{HALF_PI, J2000_YEAR, MILLIARCSEC_TO_RAD};
use skychart_core::SkyPoint;

use crate::error::{CatalogError, CatalogResult};

const STAR_MAGIC: &[u8; 4] = b"SKST";
const STAR_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 32;
pub const RECORD_SIZE: usize = 40;

/// Star has measured proper motion (pmra and pmdec are valid).
pub const FLAG_HAS_PROPER_MOTION: u8 = 1 << 0;

#[derive(Debug, Clone, PartialEq)]
pub struct StarCatalogHeader {
    pub version: u32,
    pub count: u64,
    pub mag_limit: f32,
}

impl fmt::Display for StarCatalogHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "star catalog v{}: {} stars, faintest {:.2}",
            self.version, self.count, self.mag_limit
        )
    }
}

/// One star as loaded from `stars.bin`. Immutable after load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    pub id: u64,
    /// Right ascension at J2000.0, radians in `[0, 2π)`.
    pub ra: f64,
    /// Declination at J2000.0, radians.
    pub dec: f64,
    pub mag: f64,
    /// Proper motion in RA including the cos(δ) factor, mas/yr.
    pub pmra: f64,
    /// Proper motion in declination, mas/yr.
    pub pmdec: f64,
    pub spectral_class: Option<char>,
    pub flags: u8,
}

impl StarRecord {
    #[inline]
    pub fn position(&self) -> SkyPoint {
        SkyPoint {
            ra: self.ra,
            dec: self.dec,
        }
    }

    #[inline]
    pub fn has_proper_motion(&self) -> bool {
        self.flags & FLAG_HAS_PROPER_MOTION != 0
    }

    /// Position linearly propagated from J2000.0 to the Julian year `epoch`.
    ///
    /// Stars without proper motion, or with `epoch` equal to J2000.0, are
    /// returned unchanged. Declination is clamped to the poles.
    pub fn position_at(&self, epoch: f64) -> SkyPoint {
        if !self.has_proper_motion() || epoch == J2000_YEAR {
            return self.position();
        }
        let dt_years = epoch - J2000_YEAR;
        let dec = (self.dec + self.pmdec * MILLIARCSEC_TO_RAD * dt_years).clamp(-HALF_PI, HALF_PI);
        let cos_dec = libm::cos(self.dec).max(1e-9);
        let ra = self.ra + self.pmra * MILLIARCSEC_TO_RAD * dt_years / cos_dec;
        SkyPoint::new(ra, dec)
    }
}

/// Opens, validates and decodes a binary star catalog.
///
/// # Errors
/// [`CatalogError::NotFound`] if the file is missing, [`CatalogError::Format`]
/// for a short file, bad magic, unsupported version, unexpected record size,
/// a length that disagrees with the record count, or an invalid record.
pub fn read_star_catalog(path: &Path) -> CatalogResult<(StarCatalogHeader, Vec<StarRecord>)> {
    let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
    let len = file.metadata().map_err(|e| CatalogError::io(path, e))?.len();
    if len < HEADER_SIZE as u64 {
        return Err(CatalogError::in_header(
            path,
            format!("star catalog too small: {len} bytes"),
        ));
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| CatalogError::io(path, e))?;
    let header = parse_header(path, &mmap)?;

    let expected = header
        .count
        .checked_mul(RECORD_SIZE as u64)
        .and_then(|n| n.checked_add(HEADER_SIZE as u64))
        .ok_or_else(|| {
            CatalogError::in_header(path, format!("record count too large: {}", header.count))
        })?;
    if mmap.len() as u64 != expected {
        return Err(CatalogError::in_header(
            path,
            format!(
                "file length {} bytes does not match {} records (expected {} bytes)",
                mmap.len(),
                header.count,
                expected
            ),
        ));
    }

    let records = mmap[HEADER_SIZE..]
        .chunks_exact(RECORD_SIZE)
        .enumerate()
        .map(|(i, bytes)| decode_record(path, i as u64, bytes))
        .collect::<CatalogResult<Vec<_>>>()?;

    log::debug!("{}: {}", path.display(), header);
    Ok((header, records))
}

fn parse_header(path: &Path, bytes: &[u8]) -> CatalogResult<StarCatalogHeader> {
    let magic = &bytes[0..4];
    if magic != STAR_MAGIC {
        return Err(CatalogError::in_header(
            path,
            format!("Invalid catalog magic: expected {STAR_MAGIC:?}, got {magic:?}"),
        ));
    }

    let version = LittleEndian::read_u32(&bytes[4..8]);
    if version != STAR_VERSION {
        return Err(CatalogError::in_header(
            path,
            format!("Unsupported catalog version: expected {STAR_VERSION}, got {version}"),
        ));
    }

    let count = LittleEndian::read_u64(&bytes[8..16]);
    let record_size = LittleEndian::read_u32(&bytes[16..20]);
    if record_size as usize != RECORD_SIZE {
        return Err(CatalogError::in_header(
            path,
            format!("Unsupported record size: expected {RECORD_SIZE}, got {record_size}"),
        ));
    }
    let mag_limit = LittleEndian::read_f32(&bytes[20..24]);

    Ok(StarCatalogHeader {
        version,
        count,
        mag_limit,
    })
}

fn decode_record(path: &Path, index: u64, bytes: &[u8]) -> CatalogResult<StarRecord> {
    let id = LittleEndian::read_u64(&bytes[0..8]);
    let ra = LittleEndian::read_f64(&bytes[8..16]);
    let dec = LittleEndian::read_f64(&bytes[16..24]);
    let mag = LittleEndian::read_f32(&bytes[24..28]) as f64;
    let pmra = LittleEndian::read_f32(&bytes[28..32]) as f64;
    let pmdec = LittleEndian::read_f32(&bytes[32..36]) as f64;
    let spectral_class = match bytes[36] {
        0 | b' ' => None,
        c => Some(c as char),
    };
    let flags = bytes[37];

    if !ra.is_finite() || !dec.is_finite() {
        return Err(CatalogError::at_record(
            path,
            index,
            format!("star {id}: non-finite position"),
        ));
    }
    if dec.abs() > HALF_PI {
        return Err(CatalogError::at_record(
            path,
            index,
            format!("star {id}: declination {dec} rad outside [-π/2, π/2]"),
        ));
    }
    if !mag.is_finite() {
        return Err(CatalogError::at_record(
            path,
            index,
            format!("star {id}: non-finite magnitude"),
        ));
    }
    if flags & FLAG_HAS_PROPER_MOTION != 0 && !(pmra.is_finite() && pmdec.is_finite()) {
        return Err(CatalogError::at_record(
            path,
            index,
            format!("star {id}: non-finite proper motion"),
        ));
    }

    Ok(StarRecord {
        id,
        ra: wrap_0_2pi(ra),
        dec,
        mag,
        pmra,
        pmdec,
        spectral_class,
        flags,
    })
}

/// Writes `records` in the `stars.bin` format. The header's magnitude limit
/// is the faintest record (0 for an empty catalog).
pub fn write_star_catalog(path: &Path, records: &[StarRecord]) -> CatalogResult<()> {
    let file = File::create(path).map_err(|e| CatalogError::io(path, e))?;
    let mut out = BufWriter::new(file);

    let mag_limit = records
        .iter()
        .map(|r| r.mag as f32)
        .fold(None, |acc: Option<f32>, m| Some(acc.map_or(m, |a| a.max(m))))
        .unwrap_or(0.0);

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(STAR_MAGIC);
    LittleEndian::write_u32(&mut header[4..8], STAR_VERSION);
    LittleEndian::write_u64(&mut header[8..16], records.len() as u64);
    LittleEndian::write_u32(&mut header[16..20], RECORD_SIZE as u32);
    LittleEndian::write_f32(&mut header[20..24], mag_limit);
    out.write_all(&header).map_err(|e| CatalogError::io(path, e))?;

    for record in records {
        out.write_all(&encode_record(record))
            .map_err(|e| CatalogError::io(path, e))?;
    }
    out.flush().map_err(|e| CatalogError::io(path, e))
}

pub(crate) fn encode_record(record: &StarRecord) -> [u8; RECORD_SIZE] {
    let mut buf = [0u8; RECORD_SIZE];
    LittleEndian::write_u64(&mut buf[0..8], record.id);
    LittleEndian::write_f64(&mut buf[8..16], record.ra);
    LittleEndian::write_f64(&mut buf[16..24], record.dec);
    LittleEndian::write_f32(&mut buf[24..28], record.mag as f32);
    LittleEndian::write_f32(&mut buf[28..32], record.pmra as f32);
    LittleEndian::write_f32(&mut buf[32..36], record.pmdec as f32);
    buf[36] = record.spectral_class.map_or(0, |c| c as u8);
    buf[37] = record.flags;
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use skychart_core::constants::{DEG_TO_RAD, TWOPI};
    use tempfile::NamedTempFile;

    fn make_star(id: u64, ra: f64, dec: f64, mag: f64) -> StarRecord {
        StarRecord {
            id,
            ra,
            dec,
            mag,
            pmra: 0.0,
            pmdec: 0.0,
            spectral_class: None,
            flags: 0,
        }
    }

    fn build_raw(header_count: u64, records: &[[u8; RECORD_SIZE]]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"SKST");
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&header_count.to_le_bytes());
        buf.extend_from_slice(&40u32.to_le_bytes());
        buf.extend_from_slice(&12.0f32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);
        assert_eq!(buf.len(), HEADER_SIZE);
        for r in records {
            buf.extend_from_slice(r);
        }
        buf
    }

    fn write_raw(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn expect_format_error(bytes: &[u8], needle: &str) {
        let file = write_raw(bytes);
        let msg = read_star_catalog(file.path())
            .err()
            .expect("expected error")
            .to_string();
        assert!(msg.contains(needle), "unexpected error: {msg}");
    }

    #[test]
    fn test_write_then_read() {
        let mut vega = make_star(91262, 279.2347 * DEG_TO_RAD, 38.7837 * DEG_TO_RAD, 0.03);
        vega.spectral_class = Some('A');
        vega.flags = FLAG_HAS_PROPER_MOTION;
        vega.pmra = 200.94;
        vega.pmdec = 286.23;
        let stars = vec![vega, make_star(1, 0.0, 0.0, 5.0)];

        let file = NamedTempFile::new().unwrap();
        write_star_catalog(file.path(), &stars).unwrap();
        let (header, loaded) = read_star_catalog(file.path()).unwrap();

        assert_eq!(header.count, 2);
        assert_eq!(header.mag_limit, 5.0);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 91262);
        assert_eq!(loaded[0].spectral_class, Some('A'));
        assert!(loaded[0].has_proper_motion());
        assert!((loaded[0].pmra - 200.94).abs() < 1e-4);
        assert_eq!(loaded[0].ra, vega.ra);
        assert_eq!(loaded[1].spectral_class, None);
        assert!(!loaded[1].has_proper_motion());
    }

    #[test]
    fn test_ra_wrapped_on_load() {
        let rec = encode_record(&make_star(7, -0.5, 0.1, 3.0));
        let file = write_raw(&build_raw(1, &[rec]));
        let (_, stars) = read_star_catalog(file.path()).unwrap();
        assert!((stars[0].ra - (TWOPI - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_star_catalog(&dir.path().join("stars.bin")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn test_truncated_header() {
        expect_format_error(&[0u8; 16], "too small");
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_raw(0, &[]);
        bytes[0..4].copy_from_slice(b"XXXX");
        expect_format_error(&bytes, "Invalid catalog magic");
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = build_raw(0, &[]);
        bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
        expect_format_error(&bytes, "Unsupported catalog version");
    }

    #[test]
    fn test_bad_record_size() {
        let mut bytes = build_raw(0, &[]);
        bytes[16..20].copy_from_slice(&56u32.to_le_bytes());
        expect_format_error(&bytes, "Unsupported record size");
    }

    #[test]
    fn test_count_mismatch() {
        let rec = encode_record(&make_star(1, 0.0, 0.0, 1.0));
        expect_format_error(&build_raw(2, &[rec]), "does not match 2 records");
        let mut bytes = build_raw(1, &[rec]);
        bytes.extend_from_slice(&[0u8; 7]);
        expect_format_error(&bytes, "does not match 1 records");
    }

    #[test]
    fn test_huge_record_count() {
        expect_format_error(&build_raw(1 << 60, &[]), "record count too large");
        expect_format_error(&build_raw(u64::MAX, &[]), "record count too large");
    }

    #[test]
    fn test_invalid_record_values() {
        let rec = encode_record(&make_star(3, 0.0, 2.0, 1.0));
        expect_format_error(&build_raw(1, &[rec]), "record 0");
        let rec = encode_record(&make_star(4, 0.0, 0.0, f64::NAN));
        expect_format_error(&build_raw(1, &[rec]), "non-finite magnitude");
    }

    #[test]
    fn test_proper_motion_one_century() {
        let mut star = make_star(1, 1.0, 0.0, 5.0);
        star.flags = FLAG_HAS_PROPER_MOTION;
        star.pmdec = 1000.0;
        let moved = star.position_at(2100.0);
        assert!((moved.dec - 100_000.0 * MILLIARCSEC_TO_RAD).abs() < 1e-15);
        assert!((moved.ra - 1.0).abs() < 1e-15);
        assert_eq!(star.position_at(J2000_YEAR), star.position());

        star.flags = 0;
        assert_eq!(star.position_at(2100.0), star.position());
    }

    #[test]
    fn test_header_display() {
        let header = StarCatalogHeader {
            version: 1,
            count: 42,
            mag_limit: 9.5,
        };
        assert_eq!(header.to_string(), "star catalog v1: 42 stars, faintest 9.50");
    }
}
