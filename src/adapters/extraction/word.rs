//! Word document extraction.
//!
//! DOCX text lives in `word/document.xml` inside a zip container. Legacy
//! `.doc` files are OLE compound files; the text stream is recovered as
//! printable UTF-16LE runs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::domain::document::{ExtractionError, ExtractionMethod};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const DOCUMENT_PART: &str = "word/document.xml";

/// Shortest UTF-16 run kept from a legacy document.
pub const MIN_LEGACY_RUN: usize = 4;

/// Largest inflated `word/document.xml` accepted.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

/// Extracts paragraph text from a DOCX container.
pub fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    docx_text_within(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn docx_text_within(bytes: &[u8], limit: u64) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::CorruptDocument(format!("not a zip container: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::CorruptDocument(format!("missing {DOCUMENT_PART}: {e}")))?;

    // One byte past the limit tells an exact fit from an overflow.
    let mut xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::CorruptDocument(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > limit {
        return Err(ExtractionError::CorruptDocument(format!(
            "{DOCUMENT_PART} inflates beyond {limit} bytes"
        )));
    }

    document_xml_text(&xml)
}

/// Walks WordprocessingML and collects `w:t` runs.
///
/// Paragraph ends and `w:br` become newlines, `w:tab` becomes a space.
fn document_xml_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:br" | b"w:cr" | b"w:p" => out.push('\n'),
                b"w:tab" => out.push(' '),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::CorruptDocument(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::CorruptDocument(format!(
                    "malformed document xml at {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}

/// Extracts text from a file uploaded as `.doc`.
///
/// Many `.doc` uploads are really DOCX; those take the zip path.
pub fn legacy_doc_text(bytes: &[u8]) -> Result<(String, ExtractionMethod), ExtractionError> {
    if bytes.starts_with(ZIP_MAGIC) {
        return Ok((docx_text(bytes)?, ExtractionMethod::WordDocument));
    }
    if bytes.starts_with(OLE_MAGIC) {
        return Ok((utf16_runs(bytes), ExtractionMethod::LegacyWordDocument));
    }
    Err(ExtractionError::CorruptDocument(
        "neither an OLE compound file nor a zip container".to_string(),
    ))
}

fn is_document_char(c: char) -> bool {
    matches!(c,
        ' '..='~'
        | '\t' | '\r' | '\n'
        | '\u{00A0}'..='\u{00FF}'
        | '\u{0400}'..='\u{04FF}'
        | '\u{2010}'..='\u{201F}'
        | '\u{2116}'
    )
}

/// Collects printable UTF-16LE runs of at least `MIN_LEGACY_RUN` chars,
/// one run per line.
fn utf16_runs(bytes: &[u8]) -> String {
    let mut lines = Vec::new();
    let mut run = String::new();
    let mut run_len = 0usize;

    let mut flush = |run: &mut String, run_len: &mut usize| {
        if *run_len >= MIN_LEGACY_RUN {
            lines.push(std::mem::take(run));
        } else {
            run.clear();
        }
        *run_len = 0;
    };

    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        match char::from_u32(u32::from(unit)).filter(|c| is_document_char(*c)) {
            Some('\r') | Some('\n') => flush(&mut run, &mut run_len),
            Some(c) => {
                run.push(c);
                run_len += 1;
            }
            None => flush(&mut run, &mut run_len),
        }
    }
    flush(&mut run, &mut run_len);

    lines.join("\n")
}
