//! Flattens a decoded binary `AndroidManifest.xml` event stream into a
//! metadata record.
//!
//! This is a consumer of `axml-stream`: it implements the visitor
//! interface, pattern-matches the handful of well-known manifest
//! elements and collects their attributes. Anything it does not
//! recognise passes through untouched; no validation is attempted.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use axml_stream::{Element, TagPath, XmlVisitor};

/// Required GL ES version, packed as major/minor in a single integer
/// in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlEsVersion {
    pub major: i32,
    pub minor: i32,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsesFeature {
    pub name: String,
    pub required: bool,
}

/// A `<permission>` declared by the package itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub name: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub group: Option<String>,
    pub description: Option<String>,
    pub protection_level: Option<String>,
}

/// Flat summary of one manifest. Every field is best-effort: absent
/// attributes stay `None`/`false` rather than failing the read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMeta {
    pub package_name: Option<String>,
    pub version_code: Option<i64>,
    pub version_name: Option<String>,
    pub install_location: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub min_sdk_version: Option<String>,
    pub target_sdk_version: Option<String>,
    pub max_sdk_version: Option<String>,
    pub any_density: bool,
    pub small_screens: bool,
    pub normal_screens: bool,
    pub large_screens: bool,
    pub gl_es_version: Option<GlEsVersion>,
    pub uses_permissions: Vec<String>,
    pub uses_features: Vec<UsesFeature>,
    pub permissions: Vec<Permission>,
}

/// Visitor that assembles a [`ManifestMeta`] from the event stream.
#[derive(Debug, Default)]
pub struct MetaCollector {
    meta: ManifestMeta,
}

impl MetaCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_meta(self) -> ManifestMeta {
        self.meta
    }
}

impl XmlVisitor for MetaCollector {
    fn on_element_start(&mut self, element: &Element, path: &TagPath) {
        match element.name.as_str() {
            "manifest" => {
                self.meta.package_name = attr_string(element, "package");
                self.meta.version_code = attr_parsed(element, "versionCode");
                self.meta.version_name = attr_string(element, "versionName");
                if let Some(location) = attr_string(element, "installLocation") {
                    self.meta.install_location = Some(location);
                }
            }
            "application" if path.matches(&["application"]) => {
                self.meta.label = attr_string(element, "label");
                self.meta.icon = attr_string(element, "icon");
            }
            "uses-sdk" => {
                self.meta.min_sdk_version = attr_string(element, "minSdkVersion");
                self.meta.target_sdk_version = attr_string(element, "targetSdkVersion");
                self.meta.max_sdk_version = attr_string(element, "maxSdkVersion");
            }
            "supports-screens" => {
                self.meta.any_density = attr_bool(element, "anyDensity");
                self.meta.small_screens = attr_bool(element, "smallScreens");
                self.meta.normal_screens = attr_bool(element, "normalScreens");
                self.meta.large_screens = attr_bool(element, "largeScreens");
            }
            "uses-feature" => {
                let required = attr_bool(element, "required");
                if let Some(name) = attr_string(element, "name") {
                    self.meta.uses_features.push(UsesFeature { name, required });
                } else if let Some(packed) = attr_parsed::<i32>(element, "glEsVersion") {
                    self.meta.gl_es_version = Some(GlEsVersion {
                        major: packed >> 16,
                        minor: packed & 0xFFFF,
                        required,
                    });
                } else {
                    debug!("uses-feature with neither name nor glEsVersion");
                }
            }
            "uses-permission" => {
                if let Some(name) = attr_string(element, "name") {
                    self.meta.uses_permissions.push(name);
                }
            }
            "permission" => {
                self.meta.permissions.push(Permission {
                    name: attr_string(element, "name"),
                    label: attr_string(element, "label"),
                    icon: attr_string(element, "icon"),
                    group: attr_string(element, "group"),
                    description: attr_string(element, "description"),
                    protection_level: attr_string(element, "protectionLevel"),
                });
            }
            _ => {}
        }
    }
}

fn attr_string(element: &Element, name: &str) -> Option<String> {
    element.attr(name).map(str::to_owned)
}

/// Numeric getter, tolerant of enum-substituted text: anything that no
/// longer parses reads as absent.
fn attr_parsed<T: std::str::FromStr>(element: &Element, name: &str) -> Option<T> {
    element.attr(name)?.parse().ok()
}

fn attr_bool(element: &Element, name: &str) -> bool {
    attr_parsed(element, name).unwrap_or(false)
}

/// Decodes the metadata record from one binary manifest buffer.
pub fn read_manifest(data: &[u8]) -> Result<ManifestMeta> {
    let mut collector = MetaCollector::new();
    axml_stream::parse_document(data, &mut collector).context("decoding binary manifest")?;
    Ok(collector.into_meta())
}
