//! Static label tables: origin flags and activity slugs.

/// Activities with their own month tables and landing pages, in display order.
pub const ACTIVITIES: &[&str] = &[
    "sowing",
    "transplanting",
    "harvesting",
    "flowering",
    "planting",
    "pruning",
];

const ACTIVITY_SLUGS: &[(&str, &str)] = &[
    ("sowing", "siembra"),
    ("transplanting", "trasplante"),
    ("harvesting", "cosecha"),
    ("flowering", "floracion"),
    ("planting", "plantacion"),
    ("pruning", "poda"),
];

const LOCALE_FLAGS: &[(&str, &str)] = &[
    ("es-ES", "🇪🇸"),
    ("en-US", "🇺🇸"),
    ("en-GB", "🇬🇧"),
    ("fr-FR", "🇫🇷"),
    ("it-IT", "🇮🇹"),
    ("de-DE", "🇩🇪"),
    ("pt-PT", "🇵🇹"),
    ("pt-BR", "🇧🇷"),
    ("zh-CN", "🇨🇳"),
    ("zh-TW", "🇹🇼"),
    ("ja-JP", "🇯🇵"),
    ("ko-KR", "🇰🇷"),
    ("ru-RU", "🇷🇺"),
    ("ar-SA", "🇸🇦"),
    ("hi-IN", "🇮🇳"),
    ("tr-TR", "🇹🇷"),
    ("el-GR", "🇬🇷"),
    ("nl-NL", "🇳🇱"),
    ("sv-SE", "🇸🇪"),
    ("no-NO", "🇳🇴"),
    ("da-DK", "🇩🇰"),
    ("fi-FI", "🇫🇮"),
    ("pl-PL", "🇵🇱"),
    ("cs-CZ", "🇨🇿"),
    ("hu-HU", "🇭🇺"),
    ("ro-RO", "🇷🇴"),
    ("bg-BG", "🇧🇬"),
    ("hr-HR", "🇭🇷"),
    ("sk-SK", "🇸🇰"),
    ("sl-SI", "🇸🇮"),
    ("et-EE", "🇪🇪"),
    ("lv-LV", "🇱🇻"),
    ("lt-LT", "🇱🇹"),
    ("mt-MT", "🇲🇹"),
    ("cy-GB", "🏴\u{e0067}\u{e0062}\u{e0077}\u{e006c}\u{e0073}\u{e007f}"),
];

pub const UNKNOWN_ORIGIN: &str = "📍";

/// Flag for a locale (`es-ES`) or bare country code (`ES`).
///
/// A bare code takes the first locale in the table with that region, so
/// `GB` is the Union flag rather than Wales.
pub fn origin_flag(code: &str) -> &'static str {
    let code = code.trim();
    if code.is_empty() {
        return UNKNOWN_ORIGIN;
    }
    if let Some((_, flag)) = LOCALE_FLAGS.iter().find(|(locale, _)| *locale == code) {
        return *flag;
    }
    LOCALE_FLAGS
        .iter()
        .find(|(locale, _)| {
            locale
                .split_once('-')
                .is_some_and(|(_, region)| region.eq_ignore_ascii_case(code))
        })
        .map(|(_, flag)| *flag)
        .unwrap_or(UNKNOWN_ORIGIN)
}

/// `sowing` → `siembra`. Unknown activities pass through.
pub fn activity_to_slug(activity: &str) -> &str {
    ACTIVITY_SLUGS
        .iter()
        .find(|(a, _)| *a == activity)
        .map(|(_, slug)| *slug)
        .unwrap_or(activity)
}

/// `siembra` → `sowing`. Unknown slugs pass through.
pub fn slug_to_activity(slug: &str) -> &str {
    ACTIVITY_SLUGS
        .iter()
        .find(|(_, s)| *s == slug)
        .map(|(activity, _)| *activity)
        .unwrap_or(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_for_locales_and_bare_codes() {
        assert_eq!(origin_flag("es-ES"), "🇪🇸");
        assert_eq!(origin_flag("ES"), "🇪🇸");
        assert_eq!(origin_flag("br"), "🇧🇷");
        assert_eq!(origin_flag("GB"), "🇬🇧");
    }

    #[test]
    fn unknown_origin_gets_pin() {
        assert_eq!(origin_flag(""), UNKNOWN_ORIGIN);
        assert_eq!(origin_flag("XX"), UNKNOWN_ORIGIN);
        assert_eq!(origin_flag("Mediterráneo"), UNKNOWN_ORIGIN);
    }

    #[test]
    fn activity_slugs_round_trip() {
        for activity in ACTIVITIES {
            assert_eq!(slug_to_activity(activity_to_slug(activity)), *activity);
        }
        assert_eq!(activity_to_slug("pruning"), "poda");
        assert_eq!(activity_to_slug("care"), "care");
        assert_eq!(slug_to_activity("riego"), "riego");
    }
}
