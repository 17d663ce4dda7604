//! Chunk dispatch driver and the element/attribute assembler.
//!
//! The document is one XML chunk whose body is, in order: the string
//! pool, an optional resource-ID map, then the namespace/element/text
//! chunks of the tree. The driver decodes each chunk's body and then
//! repositions the cursor to the chunk's declared end, so bodies with
//! trailing fields this implementation does not know about cannot
//! derail the chunk walk.

use std::io::{Read, Seek, SeekFrom};

use log::warn;

use crate::attr_enums;
use crate::chunk::{read_chunk_header, ChunkDetail, ChunkHeader};
use crate::cursor::ByteCursor;
use crate::res_ids;
use crate::res_value::TypedValue;
use crate::string_pool::StringPool;
use crate::visitor::{TagPath, XmlVisitor, DEFAULT_MAX_DEPTH};
use crate::{
    Attribute, AxmlError, ChunkType, Element, Namespace, ResourceTable, Result, Text,
};

/// Streaming decoder for one AXML document.
///
/// ```no_run
/// use axml_stream::{AxmlParser, XmlVisitor};
///
/// struct Sink;
/// impl XmlVisitor for Sink {}
///
/// # fn main() -> axml_stream::Result<()> {
/// let buffer: Vec<u8> = std::fs::read("AndroidManifest.xml").unwrap();
/// let mut cursor = std::io::Cursor::new(&buffer[..]);
/// AxmlParser::new(&mut cursor)?.parse(&mut Sink)?;
/// # Ok(())
/// # }
/// ```
pub struct AxmlParser<'a, R: Read + Seek> {
    data: &'a mut R,
    stream_end: u64,
    pool: StringPool,
    res_map: Vec<u32>,
    resources: Option<&'a dyn ResourceTable>,
    locale: Option<&'a str>,
    path: TagPath,
}

impl<'a, R: Read + Seek> AxmlParser<'a, R> {
    pub fn new(data: &'a mut R) -> Result<Self> {
        let stream_end = data
            .seek(SeekFrom::End(0))
            .map_err(|_| AxmlError::TruncatedInput { offset: 0 })?;
        data.goto(0)?;
        Ok(Self {
            data,
            stream_end,
            pool: StringPool::default(),
            res_map: Vec::new(),
            resources: None,
            locale: None,
            path: TagPath::new(DEFAULT_MAX_DEPTH),
        })
    }

    /// Supplies the resource table that REFERENCE/ATTRIBUTE values
    /// resolve through. Without one they render as hex literals.
    pub fn with_resources(mut self, table: &'a dyn ResourceTable) -> Self {
        self.resources = Some(table);
        self
    }

    /// Locale tag handed through to resource-table lookups.
    pub fn with_locale(mut self, locale: &'a str) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.path = TagPath::new(max_depth);
        self
    }

    /// Runs the decode pass, dispatching events to `visitor` in source
    /// order. Events dispatched before a fatal error remain valid; no
    /// events follow one.
    pub fn parse(mut self, visitor: &mut dyn XmlVisitor) -> Result<()> {
        // Document chunk. An empty buffer yields no events.
        let Some(document) = read_chunk_header(self.data, self.stream_end)? else {
            return Ok(());
        };
        if document.kind != Some(ChunkType::Xml) {
            return Err(AxmlError::MalformedChunk {
                offset: document.start,
                chunk_type: document.raw_type,
                reason: "document does not begin with an XML chunk",
            });
        }
        // Trailing bytes past the declared document size are ignored.
        self.stream_end = self.stream_end.min(document.body_end());

        // The string pool comes first; everything after it references
        // pool indices.
        let Some(header) = read_chunk_header(self.data, self.stream_end)? else {
            return Ok(());
        };
        match (&header.kind, &header.detail) {
            (Some(ChunkType::StringPool), ChunkDetail::StringPool(pool_header)) => {
                self.pool = StringPool::read(self.data, &header, pool_header)?;
            }
            _ => {
                return Err(AxmlError::MalformedChunk {
                    offset: header.start,
                    chunk_type: header.raw_type,
                    reason: "expected the string pool after the document header",
                })
            }
        }
        self.data.goto(header.body_end())?;

        let mut next = read_chunk_header(self.data, self.stream_end)?;

        // Optional resource-ID map, index-aligned with the pool.
        if let Some(header) = next.take() {
            if header.kind == Some(ChunkType::ResourceMap) {
                let count = (header.total_size as u64 - header.header_size as u64) / 4;
                self.res_map.reserve(count as usize);
                for _ in 0..count {
                    self.res_map.push(self.data.read_u32()?);
                }
                self.data.goto(header.body_end())?;
                next = read_chunk_header(self.data, self.stream_end)?;
            } else {
                next = Some(header);
            }
        }

        while let Some(header) = next {
            match header.kind {
                Some(ChunkType::StartNamespace) => {
                    let ns = self.read_namespace()?;
                    visitor.on_namespace_start(&ns);
                }
                Some(ChunkType::EndNamespace) => {
                    let ns = self.read_namespace()?;
                    visitor.on_namespace_end(&ns);
                }
                Some(ChunkType::StartElement) => self.read_element(&header, visitor)?,
                Some(ChunkType::EndElement) => self.read_end_element(visitor)?,
                Some(ChunkType::Cdata) => self.read_cdata(&header, visitor)?,
                Some(_) => {
                    return Err(AxmlError::MalformedChunk {
                        offset: header.start,
                        chunk_type: header.raw_type,
                        reason: "chunk type not allowed in the document body",
                    })
                }
                None => {
                    warn!(
                        "skipping unknown chunk type {:#06x} at {:#x}",
                        header.raw_type, header.start
                    );
                }
            }

            self.data.goto(header.body_end())?;
            next = read_chunk_header(self.data, self.stream_end)?;
        }

        Ok(())
    }

    fn read_namespace(&mut self) -> Result<Namespace> {
        let prefix_ref = self.data.read_i32()?;
        let uri_ref = self.data.read_i32()?;
        Ok(Namespace {
            prefix: self.lookup_opt(prefix_ref),
            uri: self.lookup_opt(uri_ref),
        })
    }

    fn read_element(&mut self, header: &ChunkHeader, visitor: &mut dyn XmlVisitor) -> Result<()> {
        let body_start = self.data.pos();
        let ns_ref = self.data.read_i32()?;
        let name_ref = self.data.read_i32()?;
        let attr_start = self.data.read_u16()?;
        let attr_size = self.data.read_u16()?;
        let attr_count = self.data.read_u16()?;
        // id/class/style positions are informational only.
        let _id_index = self.data.read_u16()?;
        let _class_index = self.data.read_u16()?;
        let _style_index = self.data.read_u16()?;

        // Attribute entries sit at a declared offset with a declared
        // stride, normally 20/20; honouring both tolerates widened
        // layouts.
        let attr_base = body_start + attr_start as u64;
        let mut attributes = Vec::with_capacity(attr_count as usize);
        for index in 0..attr_count {
            self.data
                .goto(attr_base + index as u64 * attr_size as u64)?;
            attributes.push(self.read_attribute()?);
        }

        let name = self.pooled_or_empty(name_ref);
        if !self.path.push(&name) {
            return Err(AxmlError::MalformedChunk {
                offset: header.start,
                chunk_type: header.raw_type,
                reason: "element nesting exceeds the depth ceiling",
            });
        }

        let element = Element {
            namespace: self.lookup_opt(ns_ref),
            name,
            attributes,
            line: header.line(),
        };
        visitor.on_element_start(&element, &self.path);
        Ok(())
    }

    fn read_attribute(&mut self) -> Result<Attribute> {
        let ns_ref = self.data.read_i32()?;
        let name_ref = self.data.read_i32()?;
        let raw_ref = self.data.read_i32()?;
        let typed = TypedValue::read(self.data)?;

        let name = self.attribute_name(name_ref);
        let mut value = typed.resolve(&self.pool, self.resources, self.locale);
        if let Some(symbolic) = attr_enums::apply(&name, &value) {
            value = symbolic;
        }

        Ok(Attribute {
            namespace: self.lookup_opt(ns_ref),
            name,
            raw_value: self.lookup_opt(raw_ref),
            typed,
            value,
        })
    }

    fn read_end_element(&mut self, visitor: &mut dyn XmlVisitor) -> Result<()> {
        let ns_ref = self.data.read_i32()?;
        let name_ref = self.data.read_i32()?;
        let namespace = self.lookup_opt(ns_ref);
        let name = self.pooled_or_empty(name_ref);
        visitor.on_element_end(namespace.as_deref(), &name, &self.path);
        // Unconditional: mismatched or surplus end tags must not leave
        // the path out of step, let alone panic.
        self.path.pop();
        Ok(())
    }

    fn read_cdata(&mut self, header: &ChunkHeader, visitor: &mut dyn XmlVisitor) -> Result<()> {
        let raw_ref = self.data.read_i32()?;
        let typed = TypedValue::read(self.data)?;
        let text = Text {
            raw: self.lookup_opt(raw_ref),
            typed,
            value: typed.resolve(&self.pool, self.resources, self.locale),
            line: header.line(),
        };
        visitor.on_text(&text);
        Ok(())
    }

    /// Optional string reference: zero and negative indices mean
    /// "absent".
    fn lookup_opt(&self, raw: i32) -> Option<String> {
        if raw <= 0 {
            return None;
        }
        self.pool.get(raw as u32).map(str::to_owned)
    }

    /// Name-position reference: index 0 is a real pool slot here.
    fn pooled_or_empty(&self, raw: i32) -> String {
        if raw < 0 {
            return String::new();
        }
        self.pool.get(raw as u32).unwrap_or_default().to_owned()
    }

    /// Attribute names fall back from the pool to the resource-ID map:
    /// optimising packagers blank the pool entry of attributes that
    /// have a well-known ID. An ID missing from the static name table
    /// gets a synthetic placeholder so the attribute stays addressable.
    fn attribute_name(&self, name_ref: i32) -> String {
        let pooled = self.pooled_or_empty(name_ref);
        if !pooled.is_empty() {
            return pooled;
        }
        if name_ref >= 0 {
            if let Some(&id) = self.res_map.get(name_ref as usize) {
                if let Some(name) = res_ids::attr_name(id) {
                    return name.to_owned();
                }
                return format!("attr:{id:#010x}");
            }
        }
        pooled
    }
}

/// Decodes one AXML document from an in-memory buffer, without a
/// resource table. The common entry point for manifest extraction.
pub fn parse_document(data: &[u8], visitor: &mut dyn XmlVisitor) -> Result<()> {
    let mut cursor = std::io::Cursor::new(data);
    AxmlParser::new(&mut cursor)?.parse(visitor)
}
