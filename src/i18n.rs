use std::collections::HashMap;

use axum::{extract::Path, routing::get, Json, Router};
use lazy_static::lazy_static;

use crate::state::AppState;

lazy_static! {
    static ref HE: HashMap<&'static str, &'static str> = HashMap::from([
        ("appName", "תיק הלימודים החכם"),
        ("nav.home", "בית"),
        ("nav.writing", "כתיבה"),
        ("nav.learning", "למידה"),
        ("nav.voice", "קול"),
        ("nav.tools", "כלים"),
        ("nav.planner", "תכנון"),
        ("hero.title", "תיק הלימודים החכם שלך"),
        ("hero.subtitle", "כל הכלים שאתה צריך להצלחה בלימודים - במקום אחד"),
        ("hero.tools", "כלי למידה"),
        ("hero.streak", "ימי למידה רצופים"),
        ("hero.points", "נקודות"),
    ]);
    static ref EN: HashMap<&'static str, &'static str> = HashMap::from([
        ("appName", "Smart Learning Bag"),
        ("nav.home", "Home"),
        ("nav.writing", "Writing"),
        ("nav.learning", "Learning"),
        ("nav.voice", "Voice"),
        ("nav.tools", "Tools"),
        ("nav.planner", "Planner"),
        ("hero.title", "Your Smart Learning Bag"),
        ("hero.subtitle", "All the tools you need to succeed in your studies - in one place"),
        ("hero.tools", "Learning Tools"),
        ("hero.streak", "Day Streak"),
        ("hero.points", "Points"),
    ]);
}

/// UI string table for a language; anything but "en" reads as Hebrew.
pub fn strings(lang: &str) -> &'static HashMap<&'static str, &'static str> {
    match lang {
        "en" => &EN,
        _ => &HE,
    }
}

/// Single-key lookup, falling back to the key itself when missing.
pub fn translate<'a>(lang: &str, key: &'a str) -> &'a str {
    strings(lang).get(key).copied().unwrap_or(key)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/i18n/:lang", get(language_strings))
}

async fn language_strings(
    Path(lang): Path<String>,
) -> Json<&'static HashMap<&'static str, &'static str>> {
    Json(strings(&lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_strings_resolve() {
        assert_eq!(translate("en", "nav.home"), "Home");
        assert_eq!(translate("en", "hero.points"), "Points");
    }

    #[test]
    fn unknown_language_falls_back_to_hebrew() {
        assert_eq!(translate("fr", "nav.home"), translate("he", "nav.home"));
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        assert_eq!(translate("en", "nav.missing"), "nav.missing");
    }

    #[test]
    fn both_tables_cover_the_same_keys() {
        for key in HE.keys() {
            assert!(EN.contains_key(key), "missing en translation for {key}");
        }
        assert_eq!(HE.len(), EN.len());
    }
}
