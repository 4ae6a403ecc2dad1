//! Adobe Camera Raw `.xmp` presets.
//!
//! The writer emits one fixed document layout (Camera Raw settings namespace,
//! `Version` 13.0, `ProcessVersion` 11.0). Exposure is written with two
//! decimals, every other slider as a whole number:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="Adobe XMP Core 5.6-c132 79.159284, 2016/04/19-13:13:40">
//!  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!   <rdf:Description rdf:about=""
//!     xmlns:crs="http://ns.adobe.com/camera-raw-settings/1.0/">
//!    <crs:Version>13.0</crs:Version>
//!    ...
//!    <crs:HasSettings>True</crs:HasSettings>
//!   </rdf:Description>
//!  </rdf:RDF>
//! </x:xmpmeta>
//! ```
//!
//! The reader accepts both element (`<crs:Tint>5</crs:Tint>`) and attribute
//! (`crs:Tint="+5"`) forms, so presets saved by Lightroom load too.

use crate::{AdjustmentSet, PresetError, PresetResult};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Renders the preset document.
pub fn encode(adj: &AdjustmentSet) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="Adobe XMP Core 5.6-c132 79.159284, 2016/04/19-13:13:40">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:crs="http://ns.adobe.com/camera-raw-settings/1.0/">
   <crs:Version>13.0</crs:Version>
   <crs:ProcessVersion>11.0</crs:ProcessVersion>
   <crs:Exposure2012>{:.2}</crs:Exposure2012>
   <crs:Highlights2012>{:.0}</crs:Highlights2012>
   <crs:Shadows2012>{:.0}</crs:Shadows2012>
   <crs:Vibrance>{:.0}</crs:Vibrance>
   <crs:Saturation>{:.0}</crs:Saturation>
   <crs:Temperature>{:.0}</crs:Temperature>
   <crs:Tint>{:.0}</crs:Tint>
   <crs:HasSettings>True</crs:HasSettings>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>"#,
        adj.exposure,
        adj.highlights,
        adj.shadows,
        adj.vibrance,
        adj.saturation,
        adj.temperature,
        adj.tint,
    )
}

/// Writes the preset document into `writer`.
pub fn write_xmp_to<W: Write>(writer: &mut W, adj: &AdjustmentSet) -> PresetResult<()> {
    writer.write_all(encode(adj).as_bytes())?;
    Ok(())
}

/// Writes a preset file.
pub fn write_xmp<P: AsRef<Path>>(path: P, adj: &AdjustmentSet) -> PresetResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_xmp_to(&mut writer, adj)?;
    writer.flush()?;
    debug!(path = %path.as_ref().display(), "wrote XMP preset");
    Ok(())
}

/// Reads a preset file.
pub fn read_xmp<P: AsRef<Path>>(path: P) -> PresetResult<AdjustmentSet> {
    let file = File::open(path.as_ref())?;
    parse_xmp(BufReader::new(file))
}

/// Reads the seven supported sliders from an XMP document.
///
/// Sliders absent from the document are left at zero. A document carrying
/// none of them is rejected.
pub fn parse_xmp<R: BufRead>(reader: R) -> PresetResult<AdjustmentSet> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut adj = AdjustmentSet::default();
    let mut found = 0usize;
    let mut current: Option<String> = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                found += read_attributes(e, &mut adj)?;
                current = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Empty(ref e)) => {
                found += read_attributes(e, &mut adj)?;
            }
            Ok(Event::Text(ref e)) => {
                if let Some(name) = current.as_deref() {
                    let text = String::from_utf8_lossy(e);
                    if let Some(value) = parse_value(name, &text)? {
                        if adj.set_by_name(name, value) {
                            found += 1;
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                current = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PresetError::ParseError(format!("XML error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if found == 0 {
        return Err(PresetError::ParseError(
            "no Camera Raw adjustment settings found".into(),
        ));
    }
    Ok(adj)
}

/// Picks up `crs:*` sliders stored as attributes.
fn read_attributes(e: &BytesStart<'_>, adj: &mut AdjustmentSet) -> PresetResult<usize> {
    let mut found = 0;
    for attr in e.attributes().flatten() {
        let key = attr.key;
        if key.prefix().is_none_or(|p| p.as_ref() != b"crs") {
            continue;
        }
        let name = String::from_utf8_lossy(key.local_name().as_ref()).into_owned();
        let text = String::from_utf8_lossy(&attr.value).into_owned();
        if let Some(value) = parse_value(&name, &text)? {
            if adj.set_by_name(&name, value) {
                found += 1;
            }
        }
    }
    Ok(found)
}

/// Parses a slider value; `None` for names that are not sliders.
fn parse_value(name: &str, text: &str) -> PresetResult<Option<f64>> {
    if AdjustmentSet::default().entries().iter().all(|(n, _)| *n != name) {
        return Ok(None);
    }
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PresetError::ParseError(format!("invalid value for {}: {:?}", name, text)))
}
