//! Android's 8-byte tagged value cell and its rendering rules.
//!
//! A cell is a type tag plus a 32-bit payload. Resolution to display
//! text never fails: references that cannot be resolved render as hex
//! literals (`@0x7f010001` / `?0x7f010001`) and unrecognised type tags
//! render the payload in decimal, so one odd attribute cannot abort the
//! rest of the document.

use std::io::{Read, Seek};

use log::debug;

use crate::cursor::ByteCursor;
use crate::res_ids;
use crate::string_pool::StringPool;
use crate::{ResourceTable, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Reference,
    Attribute,
    String,
    Float,
    Dimension,
    Fraction,
    DynamicReference,
    IntDec,
    IntHex,
    Boolean,
    ColorArgb8,
    ColorRgb8,
    ColorArgb4,
    ColorRgb4,
    Unknown(u8),
}

impl ValueType {
    fn parse(raw: u8) -> Self {
        match raw {
            0x00 => Self::Null,
            0x01 => Self::Reference,
            0x02 => Self::Attribute,
            0x03 => Self::String,
            0x04 => Self::Float,
            0x05 => Self::Dimension,
            0x06 => Self::Fraction,
            0x07 => Self::DynamicReference,
            0x10 => Self::IntDec,
            0x11 => Self::IntHex,
            0x12 => Self::Boolean,
            0x1c => Self::ColorArgb8,
            0x1d => Self::ColorRgb8,
            0x1e => Self::ColorArgb4,
            0x1f => Self::ColorRgb4,
            other => Self::Unknown(other),
        }
    }
}

/// One typed value cell, as found in attribute entries and CDATA
/// chunks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypedValue {
    pub value_type: ValueType,
    pub data: u32,
}

impl TypedValue {
    pub(crate) fn read<R: Read + Seek>(data: &mut R) -> Result<Self> {
        let _size = data.read_u16()?;
        let _res0 = data.read_u8()?;
        let value_type = ValueType::parse(data.read_u8()?);
        let payload = data.read_u32()?;
        Ok(Self {
            value_type,
            data: payload,
        })
    }

    /// Renders the cell as display text. Pure: the same cell always
    /// renders to the same string for a given pool/table/locale.
    pub fn resolve(
        &self,
        pool: &StringPool,
        table: Option<&dyn ResourceTable>,
        locale: Option<&str>,
    ) -> String {
        match self.value_type {
            ValueType::Null => String::new(),
            ValueType::String => pool.get(self.data).unwrap_or_default().to_owned(),
            ValueType::IntDec => (self.data as i32).to_string(),
            ValueType::IntHex => format!("{:#x}", self.data),
            ValueType::Boolean => if self.data != 0 { "true" } else { "false" }.to_owned(),
            ValueType::Float => f32::from_bits(self.data).to_string(),
            ValueType::Dimension => format_dimension(self.data),
            ValueType::Fraction => format_fraction(self.data),
            ValueType::Reference | ValueType::DynamicReference => {
                resolve_reference(self.data, table, locale, '@')
            }
            ValueType::Attribute => resolve_reference(self.data, table, locale, '?'),
            // Every color variant carries a full 32-bit ARGB payload;
            // the narrower source forms are widened before encoding.
            ValueType::ColorArgb8
            | ValueType::ColorRgb8
            | ValueType::ColorArgb4
            | ValueType::ColorRgb4 => format!("#{:08x}", self.data),
            ValueType::Unknown(_) => self.data.to_string(),
        }
    }
}

// Complex values pack a mantissa above a 2-bit radix selector and a
// 4-bit unit.
const RADIX_MULTS: [f32; 4] = [
    1.0 / (1u64 << 8) as f32,
    1.0 / (1u64 << 15) as f32,
    1.0 / (1u64 << 23) as f32,
    1.0 / (1u64 << 31) as f32,
];

fn complex_to_float(data: u32) -> f32 {
    let mantissa = (data & 0xFFFF_FF00) as i32;
    mantissa as f32 * RADIX_MULTS[((data >> 4) & 0x3) as usize]
}

fn format_dimension(data: u32) -> String {
    let value = complex_to_float(data);
    match data & 0xF {
        0x0 => format!("{value}px"),
        0x1 => format!("{value}dp"),
        0x2 => format!("{value}sp"),
        0x3 => format!("{value}pt"),
        0x4 => format!("{value}in"),
        0x5 => format!("{value}mm"),
        unit => format!("{value}unit:{unit:#x}"),
    }
}

fn format_fraction(data: u32) -> String {
    // Fractions store a [0,1] scale; canonical text is a percentage.
    let value = complex_to_float(data) * 100.0;
    match data & 0xF {
        0x1 => format!("{value}%p"),
        _ => format!("{value}%"),
    }
}

fn resolve_reference(
    resource_id: u32,
    table: Option<&dyn ResourceTable>,
    locale: Option<&str>,
    prefix: char,
) -> String {
    // Only plain references name framework styles; attribute
    // references into that range keep their `?` literal form.
    if prefix == '@' {
        if let Some(style) = res_ids::sys_style_name(resource_id) {
            return format!("@android:style/{style}");
        }
    }
    if let Some(table) = table {
        if let Some(resolved) = table.lookup(resource_id, locale) {
            return resolved;
        }
        debug!("resource {resource_id:#010x} not in the supplied table");
    }
    format!("{prefix}{resource_id:#010x}")
}
