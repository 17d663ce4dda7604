//! Static tables naming well-known framework resources.
//!
//! Loaded into the binary once and shared read-only by every decode
//! pass. `ATTR_NAMES` recovers attribute names that optimising
//! packagers blank out of the string pool, keyed by the IDs in the
//! resource-map chunk; `SYS_STYLES` names the public framework styles
//! that manifests reference by ID (themes, mostly). Both slices are
//! sorted by ID for binary search.

/// `android.R.attr` IDs for the attributes that appear in manifests.
static ATTR_NAMES: &[(u32, &str)] = &[
    (0x0101_0000, "theme"),
    (0x0101_0001, "label"),
    (0x0101_0002, "icon"),
    (0x0101_0003, "name"),
    (0x0101_0004, "manageSpaceActivity"),
    (0x0101_0005, "allowClearUserData"),
    (0x0101_0006, "permission"),
    (0x0101_0007, "readPermission"),
    (0x0101_0008, "writePermission"),
    (0x0101_0009, "protectionLevel"),
    (0x0101_000a, "permissionGroup"),
    (0x0101_000b, "sharedUserId"),
    (0x0101_000c, "hasCode"),
    (0x0101_000d, "persistent"),
    (0x0101_000e, "enabled"),
    (0x0101_000f, "debuggable"),
    (0x0101_0010, "exported"),
    (0x0101_0011, "process"),
    (0x0101_0012, "taskAffinity"),
    (0x0101_0013, "multiprocess"),
    (0x0101_0014, "finishOnTaskLaunch"),
    (0x0101_0015, "clearTaskOnLaunch"),
    (0x0101_0016, "stateNotNeeded"),
    (0x0101_0017, "excludeFromRecents"),
    (0x0101_0018, "authorities"),
    (0x0101_0019, "syncable"),
    (0x0101_001a, "initOrder"),
    (0x0101_001b, "grantUriPermissions"),
    (0x0101_001c, "priority"),
    (0x0101_001d, "launchMode"),
    (0x0101_001e, "screenOrientation"),
    (0x0101_001f, "configChanges"),
    (0x0101_0020, "description"),
    (0x0101_0021, "targetPackage"),
    (0x0101_0022, "handleProfiling"),
    (0x0101_0023, "functionalTest"),
    (0x0101_0024, "value"),
    (0x0101_0025, "resource"),
    (0x0101_0026, "mimeType"),
    (0x0101_0027, "scheme"),
    (0x0101_0028, "host"),
    (0x0101_0029, "port"),
    (0x0101_002a, "path"),
    (0x0101_002b, "pathPrefix"),
    (0x0101_002c, "pathPattern"),
    (0x0101_002d, "action"),
    (0x0101_002e, "data"),
    (0x0101_002f, "targetClass"),
    (0x0101_020c, "minSdkVersion"),
    (0x0101_021b, "versionCode"),
    (0x0101_021c, "versionName"),
    (0x0101_022b, "windowSoftInputMode"),
    (0x0101_0270, "targetSdkVersion"),
    (0x0101_0271, "maxSdkVersion"),
    (0x0101_0272, "testOnly"),
    (0x0101_0280, "allowBackup"),
    (0x0101_0281, "glEsVersion"),
    (0x0101_0284, "smallScreens"),
    (0x0101_0285, "normalScreens"),
    (0x0101_0286, "largeScreens"),
    (0x0101_0287, "resizeable"),
    (0x0101_0288, "anyDensity"),
    (0x0101_028e, "required"),
    (0x0101_02b7, "installLocation"),
    (0x0101_02bf, "xlargeScreens"),
];

/// Public `android.R.style` entries, named as manifests reference
/// them.
static SYS_STYLES: &[(u32, &str)] = &[
    (0x0103_0000, "Animation"),
    (0x0103_0001, "Animation.Activity"),
    (0x0103_0002, "Animation.Dialog"),
    (0x0103_0003, "Animation.Translucent"),
    (0x0103_0004, "Animation.Toast"),
    (0x0103_0005, "Theme"),
    (0x0103_0006, "Theme.Black"),
    (0x0103_0007, "Theme.Black.NoTitleBar"),
    (0x0103_0008, "Theme.Black.NoTitleBar.Fullscreen"),
    (0x0103_0009, "Theme.Dialog"),
    (0x0103_000a, "Theme.Light"),
    (0x0103_000b, "Theme.Light.NoTitleBar"),
    (0x0103_000c, "Theme.Light.NoTitleBar.Fullscreen"),
    (0x0103_000d, "Theme.NoDisplay"),
    (0x0103_000e, "Theme.NoTitleBar"),
    (0x0103_000f, "Theme.NoTitleBar.Fullscreen"),
    (0x0103_0010, "Theme.Panel"),
    (0x0103_0011, "Theme.Translucent"),
    (0x0103_0012, "Theme.Translucent.NoTitleBar"),
    (0x0103_0013, "Theme.Translucent.NoTitleBar.Fullscreen"),
    (0x0103_0014, "Theme.Wallpaper"),
    (0x0103_0015, "Theme.Wallpaper.NoTitleBar"),
    (0x0103_0016, "Theme.Wallpaper.NoTitleBar.Fullscreen"),
    (0x0103_0017, "Widget"),
];

const SYS_STYLE_START: u32 = 0x0103_0000;
const SYS_STYLE_END: u32 = 0x0104_0000;

pub(crate) fn attr_name(resource_id: u32) -> Option<&'static str> {
    lookup(ATTR_NAMES, resource_id)
}

pub(crate) fn sys_style_name(resource_id: u32) -> Option<&'static str> {
    if !(SYS_STYLE_START..SYS_STYLE_END).contains(&resource_id) {
        return None;
    }
    lookup(SYS_STYLES, resource_id)
}

fn lookup(table: &'static [(u32, &'static str)], resource_id: u32) -> Option<&'static str> {
    table
        .binary_search_by_key(&resource_id, |&(id, _)| id)
        .ok()
        .map(|index| table[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_for_binary_search() {
        for table in [ATTR_NAMES, SYS_STYLES] {
            for pair in table.windows(2) {
                assert!(pair[0].0 < pair[1].0, "{:#010x} out of order", pair[1].0);
            }
        }
    }

    #[test]
    fn known_attr_ids_resolve() {
        assert_eq!(attr_name(0x0101_0003), Some("name"));
        assert_eq!(attr_name(0x0101_021b), Some("versionCode"));
        assert_eq!(attr_name(0x7F01_0001), None);
    }

    #[test]
    fn style_lookup_is_range_gated() {
        assert_eq!(sys_style_name(0x0103_0009), Some("Theme.Dialog"));
        assert_eq!(sys_style_name(0x0103_0FFF), None);
        assert_eq!(sys_style_name(0x0101_0000), None);
    }
}
