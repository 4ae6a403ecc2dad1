//! Adobe/Resolve `.cube` 3D LUT format.
//!
//! Files written here always carry the same header, so a LUT exported twice
//! produces identical bytes:
//!
//! ```text
//! # LUTor Generated 3D LUT
//! # Created with LUTor Style Transfer
//!
//! TITLE "LUTor Style Transfer LUT"
//! LUT_3D_SIZE 64
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//!
//! 0.000000 0.000000 0.000000
//! ...
//! ```
//!
//! Data lines follow with red varying fastest, then green, then blue.
//!
//! # Example
//!
//! ```rust,ignore
//! use lutor_lut::cube;
//!
//! let lut = cube::read_3d("grade.cube")?;
//! cube::write_3d("copy.cube", &lut)?;
//! ```

use crate::lut3d::check_size;
use crate::{Lut3D, LutError, LutResult, MAX_LUT_SIZE};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Reads a 3D LUT from a `.cube` file.
pub fn read_3d<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let file = File::open(path.as_ref())?;
    parse_3d(BufReader::new(file))
}

/// Parses a 3D LUT from a reader.
///
/// Comments and blank lines are skipped. `TITLE` and `DOMAIN_*` are kept on
/// the returned LUT.
pub fn parse_3d<R: BufRead>(reader: R) -> LutResult<Lut3D> {
    let mut size: Option<usize> = None;
    let mut title: Option<String> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut data: Vec<[f32; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("TITLE") {
            title = Some(rest.trim().trim_matches('"').to_string());
        } else if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(LutError::ParseError("expected 3D LUT, found 1D".into()));
        } else if line.starts_with("DOMAIN_MIN") {
            domain_min = parse_triplet(line, 1)?;
        } else if line.starts_with("DOMAIN_MAX") {
            domain_max = parse_triplet(line, 1)?;
        } else {
            data.push(parse_triplet(line, 0)?);
        }
    }

    let size = size.ok_or_else(|| LutError::ParseError("missing LUT_3D_SIZE".into()))?;
    let expected = size * size * size;
    if data.len() != expected {
        return Err(LutError::ParseError(format!(
            "expected {} values, found {}",
            expected,
            data.len()
        )));
    }

    let mut lut = Lut3D::from_data(data, size)?.with_domain(domain_min, domain_max);
    if let Some(title) = title {
        lut = lut.with_title(title);
    }
    Ok(lut)
}

/// Writes a 3D LUT to a `.cube` file.
pub fn write_3d<P: AsRef<Path>>(path: P, lut: &Lut3D) -> LutResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_3d_to(&mut writer, lut)?;
    writer.flush()?;
    debug!(path = %path.as_ref().display(), size = lut.size, "wrote cube LUT");
    Ok(())
}

/// Serializes a 3D LUT into `writer`.
pub fn write_3d_to<W: Write>(writer: &mut W, lut: &Lut3D) -> LutResult<()> {
    let expected = lut.entry_count();
    if lut.data.len() != expected {
        return Err(LutError::InvalidSize(format!(
            "expected {} entries for size {}, got {}",
            expected,
            lut.size,
            lut.data.len()
        )));
    }

    let min = lut.domain_min;
    let max = lut.domain_max;
    writeln!(writer, "# LUTor Generated 3D LUT")?;
    writeln!(writer, "# Created with LUTor Style Transfer")?;
    writeln!(writer)?;
    writeln!(writer, "TITLE \"{}\"", lut.title)?;
    writeln!(writer, "LUT_3D_SIZE {}", lut.size)?;
    writeln!(writer, "DOMAIN_MIN {:?} {:?} {:?}", min[0], min[1], min[2])?;
    writeln!(writer, "DOMAIN_MAX {:?} {:?} {:?}", max[0], max[1], max[2])?;
    writeln!(writer)?;

    // Storage order is already the file order (red fastest).
    for rgb in &lut.data {
        writeln!(writer, "{:.6} {:.6} {:.6}", rgb[0], rgb[1], rgb[2])?;
    }
    Ok(())
}

/// Serializes a 3D LUT into an in-memory `.cube` document.
pub fn encode_3d(lut: &Lut3D) -> LutResult<Vec<u8>> {
    let mut out = Vec::with_capacity(128 + lut.data.len() * 27);
    write_3d_to(&mut out, lut)?;
    Ok(out)
}

fn parse_size(line: &str) -> LutResult<usize> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(LutError::ParseError("invalid size line".into()));
    }
    let size: usize = parts[1]
        .parse()
        .map_err(|_| LutError::ParseError(format!("invalid size value: {}", parts[1])))?;
    check_size(size).map_err(|_| {
        LutError::ParseError(format!("LUT_3D_SIZE {size} outside 2..={MAX_LUT_SIZE}"))
    })?;
    Ok(size)
}

/// Parses three floats starting at token `skip`.
fn parse_triplet(line: &str, skip: usize) -> LutResult<[f32; 3]> {
    let parts: Vec<&str> = line.split_whitespace().skip(skip).collect();
    if parts.len() < 3 {
        return Err(LutError::ParseError(format!("invalid line: {}", line)));
    }
    let value = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| LutError::ParseError(format!("invalid number {:?} in line: {}", s, line)))
    };
    Ok([value(parts[0])?, value(parts[1])?, value(parts[2])?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(lut: &Lut3D) -> String {
        String::from_utf8(encode_3d(lut).unwrap()).unwrap()
    }

    #[test]
    fn identity_export_layout() {
        let lut = Lut3D::identity(4).unwrap();
        let out = text(&lut);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            &lines[..8],
            &[
                "# LUTor Generated 3D LUT",
                "# Created with LUTor Style Transfer",
                "",
                "TITLE \"LUTor Style Transfer LUT\"",
                "LUT_3D_SIZE 4",
                "DOMAIN_MIN 0.0 0.0 0.0",
                "DOMAIN_MAX 1.0 1.0 1.0",
                "",
            ]
        );
        assert_eq!(lines.len(), 64 + 8);
        assert_eq!(lines[8], "0.000000 0.000000 0.000000");
        assert_eq!(lines[9], "0.333333 0.000000 0.000000");
        assert_eq!(lines[8 + 4], "0.000000 0.333333 0.000000");
        assert_eq!(lines[8 + 16], "0.000000 0.000000 0.333333");
        assert_eq!(lines[8 + 63], "1.000000 1.000000 1.000000");
        assert!(out.ends_with("1.000000 1.000000 1.000000\n"));
    }

    #[test]
    fn parse_keeps_title_and_domain() {
        let cube = r#"
# Test LUT
TITLE "Test Grade"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 2.0 2.0 2.0

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;
        let lut = parse_3d(Cursor::new(cube)).unwrap();
        assert_eq!(lut.size, 2);
        assert_eq!(lut.title, "Test Grade");
        assert_eq!(lut.domain_max, [2.0, 2.0, 2.0]);
        assert_eq!(lut.get(1, 0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(lut.get(0, 0, 1), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn decode_encode_is_byte_identical() {
        let mut lut = Lut3D::identity(5).unwrap().with_title("Warm Look");
        for (i, cell) in lut.data.iter_mut().enumerate() {
            cell[0] = (cell[0] * 0.9 + 0.05).min(1.0);
            cell[2] = (i % 7) as f32 / 7.0;
        }
        let bytes = encode_3d(&lut).unwrap();
        let decoded = parse_3d(Cursor::new(&bytes)).unwrap();
        assert_eq!(encode_3d(&decoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_malformed_input() {
        let one_d = "LUT_1D_SIZE 3\n0 0 0\n0.5 0.5 0.5\n1 1 1\n";
        assert!(matches!(parse_3d(Cursor::new(one_d)), Err(LutError::ParseError(_))));

        let missing = "0 0 0\n";
        assert!(matches!(parse_3d(Cursor::new(missing)), Err(LutError::ParseError(_))));

        let short = "LUT_3D_SIZE 2\n0 0 0\n1 1 1\n";
        assert!(matches!(parse_3d(Cursor::new(short)), Err(LutError::ParseError(_))));

        let huge = "LUT_3D_SIZE 4000000\n0 0 0\n";
        assert!(matches!(parse_3d(Cursor::new(huge)), Err(LutError::ParseError(_))));

        let tiny = "LUT_3D_SIZE 1\n0 0 0\n";
        assert!(matches!(parse_3d(Cursor::new(tiny)), Err(LutError::ParseError(_))));

        let garbage = "LUT_3D_SIZE 2\n0 x 0\n";
        assert!(matches!(parse_3d(Cursor::new(garbage)), Err(LutError::ParseError(_))));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.cube");
        let lut = Lut3D::identity(3).unwrap();

        write_3d(&path, &lut).unwrap();
        let loaded = read_3d(&path).unwrap();

        assert_eq!(loaded.size, 3);
        assert!(loaded.max_abs_diff(&lut).unwrap() < 1e-6);
        assert_eq!(std::fs::read(&path).unwrap(), encode_3d(&lut).unwrap());
    }
}
