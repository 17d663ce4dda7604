//! Decoder for the deduplicated string table that every other chunk
//! references by index.
//!
//! A pool is either UTF-8 or UTF-16 throughout, selected by a header
//! flag. Both encodings prefix each entry with a small variable-length
//! count: one or two bytes for UTF-8 (continuation in the high bit),
//! one or two 16-bit units for UTF-16 (continuation in the high bit of
//! the first unit).

use std::io::{Read, Seek};

use crate::chunk::{ChunkHeader, StringPoolHeader};
use crate::cursor::ByteCursor;
use crate::{Result, UTF8_FLAG};

/// One styled region within a pool string. `tag` indexes the pool
/// entry naming the style ("b", "i", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    pub tag: u32,
    pub start: u32,
    pub end: u32,
}

/// The style runs attached to one pool string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRun {
    pub string_index: u32,
    pub spans: Vec<StyleSpan>,
}

/// Terminates a span list within the style table.
const SPAN_END: u32 = 0xFFFF_FFFF;

/// The decoded pool. Owned by one decode pass and read-only from then
/// on; indices are stable for the lifetime of the pass.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Vec<String>,
    styles: Vec<StyleRun>,
}

impl StringPool {
    pub(crate) fn read<R: Read + Seek>(
        data: &mut R,
        chunk: &ChunkHeader,
        header: &StringPoolHeader,
    ) -> Result<Self> {
        let utf8 = header.flags & UTF8_FLAG != 0;
        let chunk_end = chunk.body_end();

        // Offset tables follow the header: strings first, then styles.
        let mut offsets = Vec::with_capacity(header.string_count as usize);
        for _ in 0..header.string_count {
            offsets.push(data.read_u32()?);
        }
        let mut style_offsets = Vec::with_capacity(header.style_count as usize);
        for _ in 0..header.style_count {
            style_offsets.push(data.read_u32()?);
        }

        let data_base = chunk.start + header.strings_start as u64;
        let data_end = if header.style_count > 0 {
            chunk.start + header.styles_start as u64
        } else {
            chunk_end
        };

        let mut strings = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let at = data_base + offset as u64;
            if at >= data_end {
                // Dangling offsets decode to an empty entry, never an
                // error: a single bad slot must not sink the document.
                strings.push(String::new());
                continue;
            }
            data.goto(at)?;
            strings.push(if utf8 {
                read_utf8_entry(data)?
            } else {
                read_utf16_entry(data)?
            });
        }

        let style_base = chunk.start + header.styles_start as u64;
        let mut styles = Vec::with_capacity(style_offsets.len());
        for (index, offset) in style_offsets.into_iter().enumerate() {
            let at = style_base + offset as u64;
            if at >= chunk_end {
                continue;
            }
            data.goto(at)?;
            let mut spans = Vec::new();
            while data.pos() + 12 <= chunk_end {
                let tag = data.read_u32()?;
                if tag == SPAN_END {
                    break;
                }
                spans.push(StyleSpan {
                    tag,
                    start: data.read_u32()?,
                    end: data.read_u32()?,
                });
            }
            styles.push(StyleRun {
                string_index: index as u32,
                spans,
            });
        }

        Ok(Self { strings, styles })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    pub fn styles(&self) -> &[StyleRun] {
        &self.styles
    }
}

fn read_utf8_entry<R: Read + Seek>(data: &mut R) -> Result<String> {
    // Character count, then byte count; only the latter sizes the read.
    let _chars = read_utf8_len(data)?;
    let bytes = read_utf8_len(data)?;
    let buffer = data.read_bytes(bytes)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn read_utf16_entry<R: Read + Seek>(data: &mut R) -> Result<String> {
    let units = read_utf16_len(data)?;
    let mut buffer = Vec::with_capacity(units);
    for _ in 0..units {
        buffer.push(data.read_u16()?);
    }
    Ok(String::from_utf16_lossy(&buffer))
}

fn read_utf8_len<R: Read + Seek>(data: &mut R) -> Result<usize> {
    let first = data.read_u8()? as usize;
    if first & 0x80 != 0 {
        let second = data.read_u8()? as usize;
        return Ok(((first & 0x7F) << 8) | second);
    }
    Ok(first)
}

fn read_utf16_len<R: Read + Seek>(data: &mut R) -> Result<usize> {
    let first = data.read_u16()? as usize;
    if first & 0x8000 != 0 {
        let second = data.read_u16()? as usize;
        return Ok(((first & 0x7FFF) << 16) | second);
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use byteorder::{WriteBytesExt, LE};

    use super::*;
    use crate::chunk::ChunkDetail;
    use crate::ChunkType;

    const HEADER_SIZE: u16 = 28;

    fn utf8_entry(out: &mut Vec<u8>, s: &str) {
        write_utf8_len(out, s.chars().count());
        write_utf8_len(out, s.len());
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }

    fn write_utf8_len(out: &mut Vec<u8>, len: usize) {
        if len > 0x7F {
            out.push(0x80 | (len >> 8) as u8);
            out.push(len as u8);
        } else {
            out.push(len as u8);
        }
    }

    fn utf16_entry(out: &mut Vec<u8>, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        if units.len() > 0x7FFF {
            out.write_u16::<LE>(0x8000 | (units.len() >> 16) as u16).unwrap();
            out.write_u16::<LE>(units.len() as u16).unwrap();
        } else {
            out.write_u16::<LE>(units.len() as u16).unwrap();
        }
        for unit in units {
            out.write_u16::<LE>(unit).unwrap();
        }
        out.write_u16::<LE>(0).unwrap();
    }

    /// Assembles a pool chunk and decodes it back.
    fn decode(strings: &[&str], utf8: bool, style_data: Option<(&[u32], Vec<u8>)>) -> StringPool {
        let mut entries = Vec::new();
        let mut offsets = Vec::new();
        for s in strings {
            offsets.push(entries.len() as u32);
            if utf8 {
                utf8_entry(&mut entries, s);
            } else {
                utf16_entry(&mut entries, s);
            }
        }

        let (style_offsets, style_bytes) = match &style_data {
            Some((offs, bytes)) => (offs.to_vec(), bytes.clone()),
            None => (Vec::new(), Vec::new()),
        };

        let strings_start =
            HEADER_SIZE as u32 + 4 * strings.len() as u32 + 4 * style_offsets.len() as u32;
        let styles_start = if style_offsets.is_empty() {
            0
        } else {
            strings_start + entries.len() as u32
        };

        let mut body = Vec::new();
        for off in &offsets {
            body.write_u32::<LE>(*off).unwrap();
        }
        for off in &style_offsets {
            body.write_u32::<LE>(*off).unwrap();
        }
        body.extend_from_slice(&entries);
        body.extend_from_slice(&style_bytes);

        let total_size = HEADER_SIZE as u32 + body.len() as u32;
        let header = StringPoolHeader {
            string_count: strings.len() as u32,
            style_count: style_offsets.len() as u32,
            flags: if utf8 { UTF8_FLAG } else { 0 },
            strings_start,
            styles_start,
        };
        let chunk = ChunkHeader {
            start: 0,
            raw_type: 0x0001,
            kind: Some(ChunkType::StringPool),
            header_size: HEADER_SIZE,
            total_size,
            detail: ChunkDetail::StringPool(header),
        };

        // The parser hands the pool a cursor positioned past the
        // header, i.e. at the offset table.
        let mut padded = vec![0u8; HEADER_SIZE as usize];
        padded.extend_from_slice(&body);
        let mut cursor = Cursor::new(padded);
        cursor.goto(HEADER_SIZE as u64).unwrap();
        StringPool::read(&mut cursor, &chunk, &header).unwrap()
    }

    #[test]
    fn utf8_round_trip() {
        let pool = decode(&["manifest", "", "com.example", "äöü"], true, None);
        assert_eq!(pool.get(0), Some("manifest"));
        assert_eq!(pool.get(1), Some(""));
        assert_eq!(pool.get(2), Some("com.example"));
        assert_eq!(pool.get(3), Some("äöü"));
        assert_eq!(pool.get(4), None);
    }

    #[test]
    fn utf16_round_trip() {
        let pool = decode(&["versionCode", "", "\u{1F600}"], false, None);
        assert_eq!(pool.get(0), Some("versionCode"));
        assert_eq!(pool.get(1), Some(""));
        assert_eq!(pool.get(2), Some("\u{1F600}"));
    }

    #[test]
    fn utf8_length_continuation_boundary() {
        let at_limit = "a".repeat(127);
        let past_limit = "b".repeat(128);
        let pool = decode(&[&at_limit, &past_limit], true, None);
        assert_eq!(pool.get(0), Some(at_limit.as_str()));
        assert_eq!(pool.get(1), Some(past_limit.as_str()));
    }

    #[test]
    fn dangling_offset_decodes_to_empty() {
        // Second offset points far past the chunk.
        let mut entries = Vec::new();
        utf8_entry(&mut entries, "ok");
        let strings_start = HEADER_SIZE as u32 + 8;
        let mut body = Vec::new();
        body.write_u32::<LE>(0).unwrap();
        body.write_u32::<LE>(0x1000).unwrap();
        body.extend_from_slice(&entries);

        let header = StringPoolHeader {
            string_count: 2,
            style_count: 0,
            flags: UTF8_FLAG,
            strings_start,
            styles_start: 0,
        };
        let chunk = ChunkHeader {
            start: 0,
            raw_type: 0x0001,
            kind: Some(ChunkType::StringPool),
            header_size: HEADER_SIZE,
            total_size: HEADER_SIZE as u32 + body.len() as u32,
            detail: ChunkDetail::StringPool(header),
        };
        let mut padded = vec![0u8; HEADER_SIZE as usize];
        padded.extend_from_slice(&body);
        let mut cursor = Cursor::new(padded);
        cursor.goto(HEADER_SIZE as u64).unwrap();

        let pool = StringPool::read(&mut cursor, &chunk, &header).unwrap();
        assert_eq!(pool.get(0), Some("ok"));
        assert_eq!(pool.get(1), Some(""));
    }

    #[test]
    fn style_spans_decode_with_sentinel() {
        let mut style_bytes = Vec::new();
        // One run: <b> over chars 0..4, then the terminator.
        style_bytes.write_u32::<LE>(1).unwrap();
        style_bytes.write_u32::<LE>(0).unwrap();
        style_bytes.write_u32::<LE>(4).unwrap();
        style_bytes.write_u32::<LE>(SPAN_END).unwrap();

        let pool = decode(&["hello", "b"], true, Some((&[0], style_bytes)));
        assert_eq!(pool.styles().len(), 1);
        let run = &pool.styles()[0];
        assert_eq!(run.string_index, 0);
        assert_eq!(
            run.spans,
            vec![StyleSpan {
                tag: 1,
                start: 0,
                end: 4
            }]
        );
    }

    #[test]
    fn no_styles_needs_no_special_casing() {
        let pool = decode(&["x"], true, None);
        assert!(pool.styles().is_empty());
    }
}
