//! Streaming decoder for Android's compiled binary XML format (AXML),
//! the representation used for `AndroidManifest.xml` and resource-bound
//! XML inside APKs.
//!
//! The decoder makes a single forward pass over one in-memory document
//! and hands each namespace, element and text chunk to an [`XmlVisitor`]
//! as soon as it has been decoded, in byte order. It never builds a
//! tree; consumers that need one assemble it from the event stream.
//!
//! Typed attribute values (integers, booleans, dimensions, colors,
//! resource references) are resolved to display text during the pass.
//! References into the app's resource table are delegated to an
//! externally supplied [`ResourceTable`]; everything else resolves from
//! static, process-wide tables.

mod attr_enums;
mod chunk;
mod cursor;
mod error;
mod parser;
mod res_ids;
mod res_value;
mod string_pool;
mod to_xml;
mod visitor;

pub use error::AxmlError;
pub use parser::{parse_document, AxmlParser};
pub use res_value::{TypedValue, ValueType};
pub use string_pool::{StringPool, StyleRun, StyleSpan};
pub use to_xml::{axml_to_xml_string, XmlPrinter};
pub use visitor::{TagPath, XmlVisitor, DEFAULT_MAX_DEPTH};

pub type Result<T> = std::result::Result<T, AxmlError>;

const UTF8_FLAG: u32 = 0x00000100;
pub const ANDROID_NS_URI: &str = "http://schemas.android.com/apk/res/android";

/// Read-only lookup into an externally decoded resource table.
///
/// The decoder only consumes this interface; it never mutates the
/// table, so one table may back concurrent decode passes as long as its
/// owner keeps it immutable.
pub trait ResourceTable {
    /// Resolves a resource ID to display text, preferring the entry for
    /// `locale` when one exists. `None` leaves the decoder to render a
    /// hex reference literal instead.
    fn lookup(&self, resource_id: u32, locale: Option<&str>) -> Option<String>;
}

/// A namespace declaration. Malformed input may end a namespace that
/// was never started; the decoder reports it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: Option<String>,
}

/// One decoded attribute. `value` is always usable display text:
/// resolution falls back through the resource-ID map for blank names
/// and to hex literals for unresolvable references rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    /// String-pool-backed literal, present only when the compiler kept
    /// one alongside the typed value.
    pub raw_value: Option<String>,
    pub typed: TypedValue,
    pub value: String,
}

/// An opening element with its attributes in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Source line recorded by the compiler.
    pub line: u32,
}

impl Element {
    /// Looks up an attribute's resolved value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// A text/CDATA node. `value` is the typed cell resolved through the
/// same path as attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub raw: Option<String>,
    pub typed: TypedValue,
    pub value: String,
    pub line: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum ChunkType {
    StringPool,
    Xml,
    ResourceMap,
    StartNamespace,
    EndNamespace,
    StartElement,
    EndElement,
    Cdata,
}

impl ChunkType {
    pub(crate) fn parse(raw: u16) -> Option<Self> {
        match raw {
            0x0001 => Some(Self::StringPool),
            0x0003 => Some(Self::Xml),
            0x0100 => Some(Self::StartNamespace),
            0x0101 => Some(Self::EndNamespace),
            0x0102 => Some(Self::StartElement),
            0x0103 => Some(Self::EndElement),
            0x0104 => Some(Self::Cdata),
            0x0180 => Some(Self::ResourceMap),
            _ => None,
        }
    }
}
