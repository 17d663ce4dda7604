//! Renders the event stream back into readable XML text.
//!
//! AXML declares namespaces in their own chunks ahead of the opening
//! tag they belong to, so declarations are queued and attached to the
//! next element start. Prefixes are tracked per URI to qualify element
//! and attribute names the way a hand-written manifest would.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Context;
use xml::name::Name;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::parser::parse_document;
use crate::visitor::{TagPath, XmlVisitor};
use crate::{Element, Namespace, Text};

/// Visitor that pretty-prints the decoded document. Writer errors are
/// remembered and reported by [`into_inner`](Self::into_inner); the
/// remaining events are then ignored.
pub struct XmlPrinter<W: Write> {
    writer: EventWriter<W>,
    queued_namespaces: Vec<Namespace>,
    // URI -> prefix, for qualifying names.
    ns_prefixes: HashMap<String, String>,
    error: Option<xml::writer::Error>,
}

impl<W: Write> XmlPrinter<W> {
    pub fn new(sink: W) -> Self {
        let writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(sink);
        Self {
            writer,
            queued_namespaces: Vec::new(),
            ns_prefixes: HashMap::new(),
            error: None,
        }
    }

    /// Returns the sink, or the first error hit while writing.
    pub fn into_inner(self) -> anyhow::Result<W> {
        match self.error {
            Some(error) => Err(error).context("writing XML output"),
            None => Ok(self.writer.into_inner()),
        }
    }
}

impl<W: Write> XmlVisitor for XmlPrinter<W> {
    fn on_namespace_start(&mut self, ns: &Namespace) {
        if let (Some(prefix), Some(uri)) = (&ns.prefix, &ns.uri) {
            self.ns_prefixes.insert(uri.clone(), prefix.clone());
        }
        self.queued_namespaces.push(ns.clone());
    }

    fn on_namespace_end(&mut self, ns: &Namespace) {
        if let Some(uri) = &ns.uri {
            self.ns_prefixes.remove(uri);
        }
    }

    fn on_element_start(&mut self, element: &Element, _path: &TagPath) {
        if self.error.is_some() {
            return;
        }
        let queued = std::mem::take(&mut self.queued_namespaces);
        let prefixes = &self.ns_prefixes;

        let mut builder = XmlEvent::start_element(qualified(
            &element.name,
            element.namespace.as_deref(),
            prefixes,
        ));
        for attr in &element.attributes {
            builder = builder.attr(
                qualified(&attr.name, attr.namespace.as_deref(), prefixes),
                &attr.value,
            );
        }
        for ns in &queued {
            builder = match (&ns.prefix, &ns.uri) {
                (Some(prefix), Some(uri)) => builder.ns(prefix.as_str(), uri.as_str()),
                (None, Some(uri)) => builder.default_ns(uri.as_str()),
                _ => builder,
            };
        }

        if let Err(error) = self.writer.write(builder) {
            self.error = Some(error);
        }
    }

    fn on_element_end(&mut self, _namespace: Option<&str>, _name: &str, _path: &TagPath) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.writer.write(XmlEvent::end_element()) {
            self.error = Some(error);
        }
    }

    fn on_text(&mut self, text: &Text) {
        if self.error.is_some() || text.value.is_empty() {
            return;
        }
        if let Err(error) = self.writer.write(XmlEvent::characters(&text.value)) {
            self.error = Some(error);
        }
    }
}

fn qualified<'a>(
    name: &'a str,
    namespace: Option<&'a str>,
    prefixes: &'a HashMap<String, String>,
) -> Name<'a> {
    match namespace {
        Some(uri) => Name::qualified(name, uri, prefixes.get(uri).map(String::as_str)),
        None => Name::local(name),
    }
}

/// Decodes an AXML buffer and renders it as indented XML text.
pub fn axml_to_xml_string(data: &[u8]) -> anyhow::Result<String> {
    let mut printer = XmlPrinter::new(Vec::new());
    parse_document(data, &mut printer).context("decoding AXML document")?;
    let bytes = printer.into_inner()?;
    String::from_utf8(bytes).context("XML output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::res_value::{TypedValue, ValueType};
    use crate::{Attribute, ANDROID_NS_URI};

    fn string_attr(namespace: Option<&str>, name: &str, value: &str) -> Attribute {
        Attribute {
            namespace: namespace.map(str::to_owned),
            name: name.to_owned(),
            raw_value: Some(value.to_owned()),
            typed: TypedValue {
                value_type: ValueType::String,
                data: 0,
            },
            value: value.to_owned(),
        }
    }

    #[test]
    fn prints_prefixed_attributes() {
        let mut printer = XmlPrinter::new(Vec::new());
        let path = TagPath::default();

        printer.on_namespace_start(&Namespace {
            prefix: Some("android".to_owned()),
            uri: Some(ANDROID_NS_URI.to_owned()),
        });
        printer.on_element_start(
            &Element {
                namespace: None,
                name: "manifest".to_owned(),
                attributes: vec![
                    string_attr(None, "package", "com.example"),
                    string_attr(Some(ANDROID_NS_URI), "versionName", "1.0"),
                ],
                line: 1,
            },
            &path,
        );
        printer.on_element_end(None, "manifest", &path);

        let text = String::from_utf8(printer.into_inner().unwrap()).unwrap();
        assert!(text.contains("<manifest"));
        assert!(text.contains("package=\"com.example\""));
        assert!(text.contains("android:versionName=\"1.0\""));
        assert!(text.contains(&format!("xmlns:android=\"{ANDROID_NS_URI}\"")));
    }

    #[test]
    fn prints_text_nodes() {
        let mut printer = XmlPrinter::new(Vec::new());
        let path = TagPath::default();

        printer.on_element_start(
            &Element {
                namespace: None,
                name: "note".to_owned(),
                attributes: Vec::new(),
                line: 1,
            },
            &path,
        );
        printer.on_text(&Text {
            raw: Some("hello".to_owned()),
            typed: TypedValue {
                value_type: ValueType::String,
                data: 0,
            },
            value: "hello".to_owned(),
            line: 2,
        });
        printer.on_element_end(None, "note", &path);

        let text = String::from_utf8(printer.into_inner().unwrap()).unwrap();
        assert!(text.contains("hello"));
    }
}
