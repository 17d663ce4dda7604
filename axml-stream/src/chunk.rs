//! The universal 8-byte chunk prefix and the type-specific header
//! fields that follow it.

use std::io::{Read, Seek};

use crate::cursor::ByteCursor;
use crate::{AxmlError, ChunkType, Result};

/// Chunk ids in this range belong to the XML tree; an unrecognised id
/// inside it is skipped by the driver, one outside it aborts the
/// decode.
pub(crate) const XML_FIRST_CHUNK: u16 = 0x0100;
pub(crate) const XML_LAST_CHUNK: u16 = 0x017f;

#[derive(Debug, Clone)]
pub(crate) struct ChunkHeader {
    pub start: u64,
    pub raw_type: u16,
    pub kind: Option<ChunkType>,
    pub header_size: u16,
    pub total_size: u32,
    pub detail: ChunkDetail,
}

#[derive(Debug, Clone)]
pub(crate) enum ChunkDetail {
    None,
    StringPool(StringPoolHeader),
    Node(NodeHeader),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StringPoolHeader {
    pub string_count: u32,
    pub style_count: u32,
    pub flags: u32,
    pub strings_start: u32,
    pub styles_start: u32,
}

/// Common header of namespace, element and CDATA chunks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeHeader {
    pub line: u32,
    /// String-pool index of the comment, -1 encoded as absent. Decoded
    /// for completeness; comments do not surface as events.
    #[allow(unused)]
    pub comment: Option<u32>,
}

impl ChunkHeader {
    /// First byte past the chunk, per its declared total size. The
    /// driver repositions here after every body, whatever the body
    /// decoder actually consumed.
    pub fn body_end(&self) -> u64 {
        self.start + self.total_size as u64
    }

    pub fn line(&self) -> u32 {
        match self.detail {
            ChunkDetail::Node(node) => node.line,
            _ => 0,
        }
    }
}

/// Reads one chunk header at the cursor. Returns `None` once the cursor
/// has reached `stream_end`; running out of bytes mid-header is an
/// error. Leaves the cursor at `start + header_size`.
pub(crate) fn read_chunk_header<R: Read + Seek>(
    data: &mut R,
    stream_end: u64,
) -> Result<Option<ChunkHeader>> {
    let start = data.pos();
    if start >= stream_end {
        return Ok(None);
    }

    let raw_type = data.read_u16()?;
    let header_size = data.read_u16()?;
    let total_size = data.read_u32()?;

    if total_size < 8 || (header_size as u32) > total_size {
        return Err(AxmlError::MalformedChunk {
            offset: start,
            chunk_type: raw_type,
            reason: "declared sizes are inconsistent",
        });
    }
    if start + total_size as u64 > stream_end {
        return Err(AxmlError::TruncatedInput { offset: start });
    }

    let kind = ChunkType::parse(raw_type);
    let detail = match kind {
        Some(ChunkType::StringPool) => ChunkDetail::StringPool(StringPoolHeader {
            string_count: data.read_u32()?,
            style_count: data.read_u32()?,
            flags: data.read_u32()?,
            strings_start: data.read_u32()?,
            styles_start: data.read_u32()?,
        }),
        Some(
            ChunkType::StartNamespace
            | ChunkType::EndNamespace
            | ChunkType::StartElement
            | ChunkType::EndElement
            | ChunkType::Cdata,
        ) => {
            let line = data.read_u32()?;
            let comment = data.read_i32()?;
            ChunkDetail::Node(NodeHeader {
                line,
                comment: if comment < 0 { None } else { Some(comment as u32) },
            })
        }
        Some(ChunkType::Xml | ChunkType::ResourceMap) => ChunkDetail::None,
        None => {
            if (XML_FIRST_CHUNK..=XML_LAST_CHUNK).contains(&raw_type) {
                ChunkDetail::None
            } else {
                return Err(AxmlError::MalformedChunk {
                    offset: start,
                    chunk_type: raw_type,
                    reason: "unrecognised chunk type",
                });
            }
        }
    };

    data.goto(start + header_size as u64)?;
    Ok(Some(ChunkHeader {
        start,
        raw_type,
        kind,
        header_size,
        total_size,
        detail,
    }))
}
