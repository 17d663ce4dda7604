//! Symbolic decode tables for the closed set of manifest attributes
//! whose values are integer encodings of platform constants.
//!
//! Substitution happens after normal value resolution and only when the
//! resolved text is still purely numeric; an attribute that resolved to
//! a string (or through the resource table) is left alone. Bitmask
//! attributes render their known bits joined with `|` in table order;
//! an unknown remainder is appended as a hex literal rather than
//! dropped. A scalar value with no mapping keeps its numeric text.

/// Applies the decode table for `name`, if there is one. `None` means
/// the caller keeps the resolved text it already has.
pub(crate) fn apply(name: &str, resolved: &str) -> Option<String> {
    if !is_numeric(resolved) {
        return None;
    }
    let value: i64 = resolved.parse().ok()?;
    let value = value as i32;

    let substituted = match name {
        "screenOrientation" => screen_orientation(value).map(str::to_owned),
        "launchMode" => launch_mode(value).map(str::to_owned),
        "installLocation" => install_location(value).map(str::to_owned),
        "configChanges" => Some(render_flags(value as u32, CONFIG_CHANGES)),
        "windowSoftInputMode" => Some(window_soft_input_mode(value as u32)),
        "protectionLevel" => Some(protection_level(value as u32)),
        _ => None,
    };

    // An empty rendering (e.g. configChanges="0") keeps the number.
    substituted.filter(|text| !text.is_empty())
}

fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn screen_orientation(value: i32) -> Option<&'static str> {
    Some(match value {
        -1 => "unspecified",
        0 => "landscape",
        1 => "portrait",
        2 => "user",
        3 => "behind",
        4 => "sensor",
        5 => "nosensor",
        6 => "sensorLandscape",
        7 => "sensorPortrait",
        8 => "reverseLandscape",
        9 => "reversePortrait",
        10 => "fullSensor",
        11 => "userLandscape",
        12 => "userPortrait",
        13 => "fullUser",
        14 => "locked",
        _ => return None,
    })
}

fn launch_mode(value: i32) -> Option<&'static str> {
    Some(match value {
        0 => "standard",
        1 => "singleTop",
        2 => "singleTask",
        3 => "singleInstance",
        _ => return None,
    })
}

fn install_location(value: i32) -> Option<&'static str> {
    Some(match value {
        0 => "auto",
        1 => "internalOnly",
        2 => "preferExternal",
        _ => return None,
    })
}

const CONFIG_CHANGES: &[(u32, &str)] = &[
    (0x0001, "mcc"),
    (0x0002, "mnc"),
    (0x0004, "locale"),
    (0x0008, "touchscreen"),
    (0x0010, "keyboard"),
    (0x0020, "keyboardHidden"),
    (0x0040, "navigation"),
    (0x0080, "orientation"),
    (0x0100, "screenLayout"),
    (0x0200, "uiMode"),
    (0x0400, "screenSize"),
    (0x0800, "smallestScreenSize"),
    (0x1000, "density"),
    (0x2000, "layoutDirection"),
    (0x4000_0000, "fontScale"),
];

fn render_flags(value: u32, table: &[(u32, &str)]) -> String {
    let mut parts = Vec::new();
    let mut rest = value;
    for &(bit, name) in table {
        if value & bit != 0 {
            parts.push(name.to_owned());
            rest &= !bit;
        }
    }
    if rest != 0 {
        parts.push(format!("{rest:#x}"));
    }
    parts.join("|")
}

fn window_soft_input_mode(value: u32) -> String {
    let mut parts = Vec::new();
    match value & 0x0F {
        0x1 => parts.push("stateUnchanged".to_owned()),
        0x2 => parts.push("stateHidden".to_owned()),
        0x3 => parts.push("stateAlwaysHidden".to_owned()),
        0x4 => parts.push("stateVisible".to_owned()),
        0x5 => parts.push("stateAlwaysVisible".to_owned()),
        _ => {}
    }
    match value & 0xF0 {
        0x10 => parts.push("adjustResize".to_owned()),
        0x20 => parts.push("adjustPan".to_owned()),
        0x30 => parts.push("adjustNothing".to_owned()),
        _ => {}
    }
    let rest = value & !0xFFu32;
    if rest != 0 {
        parts.push(format!("{rest:#x}"));
    }
    parts.join("|")
}

fn protection_level(value: u32) -> String {
    let mut parts = Vec::new();
    match value & 0x0F {
        0x0 => parts.push("normal".to_owned()),
        0x1 => parts.push("dangerous".to_owned()),
        0x2 => parts.push("signature".to_owned()),
        0x3 => parts.push("signatureOrSystem".to_owned()),
        _ => {}
    }
    if value & 0x10 != 0 {
        parts.push("system".to_owned());
    }
    if value & 0x20 != 0 {
        parts.push("development".to_owned());
    }
    let rest = value & !0x3Fu32;
    if rest != 0 {
        parts.push(format!("{rest:#x}"));
    }
    parts.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_substitution() {
        assert_eq!(apply("screenOrientation", "1"), Some("portrait".to_owned()));
        assert_eq!(
            apply("screenOrientation", "-1"),
            Some("unspecified".to_owned())
        );
        assert_eq!(apply("launchMode", "2"), Some("singleTask".to_owned()));
        assert_eq!(apply("installLocation", "0"), Some("auto".to_owned()));
    }

    #[test]
    fn unmapped_scalar_keeps_numeric_text() {
        assert_eq!(apply("screenOrientation", "99"), None);
        assert_eq!(apply("launchMode", "7"), None);
    }

    #[test]
    fn substitution_only_touches_the_fixed_set() {
        assert_eq!(apply("versionCode", "7"), None);
        assert_eq!(apply("screenOrientation", "portrait"), None);
    }

    #[test]
    fn bitmask_rendering_is_deterministic() {
        let value = (0x0004 | 0x0080 | 0x2000).to_string();
        let expected = "locale|orientation|layoutDirection";
        assert_eq!(apply("configChanges", &value), Some(expected.to_owned()));
        // Same input, same output, however often it is asked.
        assert_eq!(apply("configChanges", &value), Some(expected.to_owned()));
    }

    #[test]
    fn bitmask_keeps_unknown_remainder() {
        let value = (0x0008u32 | 0x0080 | 0x0001_0000).to_string();
        assert_eq!(
            apply("configChanges", &value),
            Some("touchscreen|orientation|0x10000".to_owned())
        );
    }

    #[test]
    fn zero_bitmask_keeps_numeric_text() {
        assert_eq!(apply("configChanges", "0"), None);
    }

    #[test]
    fn soft_input_mode_combines_state_and_adjust() {
        let value = (0x4u32 | 0x10).to_string();
        assert_eq!(
            apply("windowSoftInputMode", &value),
            Some("stateVisible|adjustResize".to_owned())
        );
    }

    #[test]
    fn protection_level_flags() {
        assert_eq!(apply("protectionLevel", "0"), Some("normal".to_owned()));
        assert_eq!(
            apply("protectionLevel", &(0x2u32 | 0x10).to_string()),
            Some("signature|system".to_owned())
        );
    }
}
