//! The data types exchanged with the news API.
//!
//! `NewsItem` is a single article as the server delivers it.  The API sends
//! camelCase JSON, so every type here derives [`Deserialize`] with
//! `rename_all = "camelCase"`.
//!
//! ## For contributors
//!
//! Optional wire fields should default rather than fail deserialisation: the
//! server omits `isRead` for anonymous feeds and `translations` for articles
//! that were never translated, and sometimes sends them as `null`.  A single
//! odd item must not fail the whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Identifier of a news section (topic / category).
pub type SectionId = u32;

/// A single news article.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Opaque, unique identifier.  Used as the key for read-state commands.
    pub id: String,

    pub title: String,

    pub summary: String,

    /// URL of the full article.
    pub link: String,

    /// Offset-less timestamps are taken as UTC.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub published_at: DateTime<Utc>,

    /// Section this item was fetched for.
    pub section_id: SectionId,

    #[serde(default)]
    pub section_name: Option<String>,

    /// URL of the originating site.  Items are grouped by its domain.
    pub source_url: String,

    #[serde(default)]
    pub source_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_new: bool,

    /// Whether the current user has read this item.
    ///
    /// Monotonic within a session: once set it is never cleared.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<Translation>,
}

/// A translated title/summary pair for one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Upper-case language code, e.g. `"EN"` or `"DE"`.
    pub language_code: String,
    pub title: String,
    pub summary: String,
}

/// One section of the `news/by-sections` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionWithNews {
    pub section_id: SectionId,
    pub section_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub news: Vec<NewsItem>,
}

/// An entry of the section directory (`GET /sections`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }

    /// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        s.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }
}

// ---------------------------------------------------------------------------
// Display language
// ---------------------------------------------------------------------------

/// The language titles and summaries are displayed in.
///
/// Codes are normalised to upper case so that `"de"` and `"DE"` compare
/// equal to the server's `languageCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(String);

impl Language {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self("EN".to_string())
    }
}

impl NewsItem {
    fn translation(&self, lang: &Language) -> Option<&Translation> {
        self.translations
            .iter()
            .find(|t| t.language_code.eq_ignore_ascii_case(lang.code()))
    }

    /// Title in `lang`, falling back to the original when no (non-empty)
    /// translation exists.
    pub fn display_title(&self, lang: &Language) -> &str {
        match self.translation(lang) {
            Some(t) if !t.title.is_empty() => &t.title,
            _ => &self.title,
        }
    }

    /// Summary in `lang`, with the same fallback rule as [`display_title`].
    ///
    /// [`display_title`]: NewsItem::display_title
    pub fn display_summary(&self, lang: &Language) -> &str {
        match self.translation(lang) {
            Some(t) if !t.summary.is_empty() => &t.summary,
            _ => &self.summary,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
