use serde::{Deserialize, Serialize};

/// Per-user settings record, stored inside the user entry. Values are
/// free-form strings on purpose: unknown values are not an error, the
/// applier falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub language: String,
    pub theme: String,
    pub font_size: String,
    pub notify_pomodoro: bool,
    pub notify_tasks: bool,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "he".into(),
            theme: "light".into(),
            font_size: "medium".into(),
            notify_pomodoro: true,
            notify_tasks: true,
            sound: true,
        }
    }
}

/// Document-level presentation flags derived from a settings record:
/// the CSS classes and text direction a client should apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub theme_class: Option<String>,
    pub font_class: Option<String>,
    pub lang: String,
    pub dir: String,
    pub rtl: bool,
}

/// Pure and idempotent mapping from settings to presentation flags.
pub fn apply(settings: &Settings) -> Presentation {
    let theme_class = match settings.theme.as_str() {
        "dark" | "blue" | "green" => Some(format!("theme-{}", settings.theme)),
        _ => None,
    };
    let font_class = match settings.font_size.as_str() {
        "small" => Some("font-small".to_string()),
        "large" => Some("font-large".to_string()),
        _ => None,
    };
    let (lang, dir) = if settings.language == "en" {
        ("en", "ltr")
    } else {
        ("he", "rtl")
    };
    Presentation {
        theme_class,
        font_class,
        lang: lang.to_string(),
        dir: dir.to_string(),
        rtl: dir == "rtl",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_to_no_classes_and_rtl() {
        let p = apply(&Settings::default());
        assert_eq!(p.theme_class, None);
        assert_eq!(p.font_class, None);
        assert_eq!(p.lang, "he");
        assert_eq!(p.dir, "rtl");
        assert!(p.rtl);
    }

    #[test]
    fn dark_large_english_sets_all_flags() {
        let settings = Settings {
            language: "en".into(),
            theme: "dark".into(),
            font_size: "large".into(),
            ..Settings::default()
        };
        let p = apply(&settings);
        assert_eq!(p.theme_class.as_deref(), Some("theme-dark"));
        assert_eq!(p.font_class.as_deref(), Some("font-large"));
        assert_eq!(p.lang, "en");
        assert_eq!(p.dir, "ltr");
        assert!(!p.rtl);
    }

    #[test]
    fn unknown_values_fall_back_silently() {
        let settings = Settings {
            language: "klingon".into(),
            theme: "neon".into(),
            font_size: "gigantic".into(),
            ..Settings::default()
        };
        let p = apply(&settings);
        assert_eq!(p.theme_class, None);
        assert_eq!(p.font_class, None);
        assert_eq!(p.lang, "he");
    }

    #[test]
    fn apply_is_idempotent_over_equal_input() {
        let settings = Settings {
            theme: "blue".into(),
            ..Settings::default()
        };
        assert_eq!(apply(&settings), apply(&settings));
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let s: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(s.theme, "dark");
        assert_eq!(s.language, "he");
        assert!(s.notify_pomodoro);
    }
}
