/*!
 * Language catalog and resolver.
 *
 * The catalog is a static, process-wide table of supported languages. Record 0
 * is the reserved Unknown sentinel. Every lookup family performs a case-folded
 * linear scan over the table and resolves to the FIRST matching record, so
 * catalog order is the tie-break for shared aliases.
 *
 * The table is compiled into the binary and never mutated; unsynchronized
 * concurrent reads from any number of threads are safe. This is a required
 * invariant, not an accident of the current implementation.
 */

use std::fmt;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::errors::LanguageError;
use crate::file_utils::FileManager;

/// One immutable catalog entry.
///
/// Each record carries an ordered set of locale aliases, an ordered set of
/// ISO-639 aliases, exactly one three-letter language id, and one display name.
#[derive(Debug)]
pub struct LanguageRecord {
    locales: &'static [&'static str],
    iso639s: &'static [&'static str],
    id: &'static str,
    name: &'static str,
}

/// A language value referencing a catalog entry.
///
/// `Language` is a plain immutable value type: cheap to clone, compared by
/// catalog index, hashable. An unresolved query produces the unknown variant,
/// which always points at catalog record 0 and additionally carries the raw
/// diagnostic code; two unknowns are equal only when their raw codes match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    /// Index into `LANGUAGES`, never 0.
    Known(usize),
    /// Raw unresolved query, case-folded.
    Unknown(String),
}

/// Lookup systems enabled for [`Language::from_unknown`].
///
/// Systems are always tried in fixed priority order: ISO-639, three-letter id,
/// locale, display name. This struct only restricts which of them participate.
#[derive(Debug, Clone, Copy)]
pub struct LookupSystems {
    pub iso639: bool,
    pub language_id: bool,
    pub locale: bool,
    pub name: bool,
}

impl Default for LookupSystems {
    fn default() -> Self {
        Self {
            iso639: true,
            language_id: true,
            locale: true,
            name: true,
        }
    }
}

#[derive(Clone, Copy)]
enum LookupKey {
    Iso639,
    LanguageId,
    Locale,
    Name,
}

impl LookupKey {
    fn describe(self) -> &'static str {
        match self {
            LookupKey::Iso639 => "ISO639",
            LookupKey::LanguageId => "language id",
            LookupKey::Locale => "locale",
            LookupKey::Name => "language name",
        }
    }
}

impl Language {
    fn known(id: usize) -> Self {
        debug_assert!(id > 0 && id < LANGUAGES.len());
        Language(Repr::Known(id))
    }

    /// Create an unknown language carrying `code` as its diagnostic value.
    pub fn unknown(code: &str) -> Self {
        Language(Repr::Unknown(fold(code)))
    }

    /// The generic unknown language, carrying no information about the failed query.
    pub fn generic_unknown() -> Self {
        Language(Repr::Unknown("unknown".to_string()))
    }

    fn record(&self) -> &'static LanguageRecord {
        match &self.0 {
            Repr::Known(id) => &LANGUAGES[*id],
            Repr::Unknown(_) => &LANGUAGES[0],
        }
    }

    /// Primary locale of this language, e.g. `pt_BR`
    pub fn locale(&self) -> &'static str {
        self.record().locales[0]
    }

    /// Primary ISO-639 code of this language, e.g. `pt`
    pub fn iso639(&self) -> &'static str {
        self.record().iso639s[0]
    }

    /// The unique three-letter language id, e.g. `pob`
    pub fn language_id(&self) -> &'static str {
        self.record().id
    }

    /// All published locale aliases of this language
    pub fn locales(&self) -> &'static [&'static str] {
        self.record().locales
    }

    /// All published ISO-639 aliases of this language
    pub fn iso639_aliases(&self) -> &'static [&'static str] {
        self.record().iso639s
    }

    /// Readable name. For an unknown language this is the raw diagnostic code.
    pub fn name(&self) -> String {
        match &self.0 {
            Repr::Known(_) => self.record().name.to_string(),
            Repr::Unknown(code) => code.clone(),
        }
    }

    /// Readable name without any diagnostic detail
    pub fn generic_name(&self) -> &'static str {
        self.record().name
    }

    /// True for any unknown language, generic or not
    pub fn is_unknown(&self) -> bool {
        matches!(self.0, Repr::Unknown(_))
    }

    /// True only for the generic unknown language
    pub fn is_generic(&self) -> bool {
        matches!(&self.0, Repr::Unknown(code) if code == "unknown")
    }

    /// The raw diagnostic code of an unknown language
    pub fn unknown_code(&self) -> Option<&str> {
        match &self.0 {
            Repr::Known(_) => None,
            Repr::Unknown(code) => Some(code),
        }
    }

    /// Resolve a locale string, e.g. `pt_BR`.
    ///
    /// On no match, logs a warning and returns an unknown language carrying the
    /// query; this never fails.
    pub fn from_locale(locale: &str) -> Language {
        Self::resolve_or_unknown(LookupKey::Locale, locale)
    }

    /// Resolve an ISO-639 code, e.g. `pt`. Never fails, see [`Language::from_locale`].
    pub fn from_iso639(code: &str) -> Language {
        Self::resolve_or_unknown(LookupKey::Iso639, code)
    }

    /// Resolve a three-letter language id, e.g. `pob`. Never fails, see
    /// [`Language::from_locale`].
    pub fn from_language_id(id: &str) -> Language {
        Self::resolve_or_unknown(LookupKey::LanguageId, id)
    }

    /// Resolve a display name, e.g. `French`. Never fails, see
    /// [`Language::from_locale`].
    pub fn from_name(name: &str) -> Language {
        Self::resolve_or_unknown(LookupKey::Name, name)
    }

    fn resolve_or_unknown(key: LookupKey, value: &str) -> Language {
        let folded = fold(value);
        match lookup(key, &folded) {
            Ok(language) => language,
            Err(_) => {
                warn!("Unknown {}: {}", key.describe(), value);
                Language(Repr::Unknown(folded))
            }
        }
    }

    /// Try to resolve a value of which only limited information is available.
    ///
    /// The enabled lookup systems are tried in fixed priority order (ISO-639,
    /// three-letter id, locale, display name) and the first success wins.
    pub fn from_unknown(value: &str, systems: LookupSystems) -> Result<Language, LanguageError> {
        let folded = fold(value);
        let attempts = [
            (systems.iso639, LookupKey::Iso639),
            (systems.language_id, LookupKey::LanguageId),
            (systems.locale, LookupKey::Locale),
            (systems.name, LookupKey::Name),
        ];
        for (enabled, key) in attempts {
            if !enabled {
                continue;
            }
            if let Ok(language) = lookup(key, &folded) {
                return Ok(language);
            }
        }
        Err(LanguageError::NotALanguage(value.to_string()))
    }

    /// Whether the content-based guessing capability is available.
    ///
    /// When this returns false, [`Language::from_file`] and
    /// [`Language::from_bytes`] fail with
    /// [`LanguageError::DetectionUnsupported`] and must not be offered to users.
    pub fn can_detect_from_file() -> bool {
        cfg!(feature = "detect")
    }

    /// Try to determine the language of a text file.
    ///
    /// At most `chunk_size` bytes are read when a limit is given.
    pub fn from_file(path: &Path, chunk_size: Option<usize>) -> Result<Language, LanguageError> {
        debug!("Language::from_file: {:?}, chunk={:?} ...", path, chunk_size);
        if !Self::can_detect_from_file() {
            debug!("... Failed: built without the detect feature");
            return Err(LanguageError::DetectionUnsupported(
                "built without the detect feature".to_string(),
            ));
        }
        let data = FileManager::read_prefix(path, chunk_size)
            .map_err(|e| LanguageError::NotALanguage(format!("unreadable file: {}", e)))?;
        Self::from_bytes(&data)
    }

    /// Try to determine the language of raw subtitle content.
    #[cfg(feature = "detect")]
    pub fn from_bytes(data: &[u8]) -> Result<Language, LanguageError> {
        let text = strip_markup(&String::from_utf8_lossy(data));
        let info = whatlang::detect(&text).ok_or_else(|| {
            debug!("... Failed: detector produced no guess");
            LanguageError::NotALanguage("could not detect language from content".to_string())
        })?;
        let code3 = info.lang().code();
        // The detector speaks ISO 639-3; the catalog aliases are ISO 639-1.
        let iso639 = isolang::Language::from_639_3(code3)
            .and_then(|lang| lang.to_639_1())
            .ok_or_else(|| {
                debug!("... Failed: no ISO639 mapping for detector guess {:?}", code3);
                LanguageError::NotALanguage(code3.to_string())
            })?;
        let language = Self::from_iso639(iso639);
        if language.is_unknown() {
            debug!("... Failed: detector returned unsupported language {:?}", iso639);
            return Err(LanguageError::NotALanguage(iso639.to_string()));
        }
        debug!("... Success: language={}", language.language_id());
        Ok(language)
    }

    /// Try to determine the language of raw subtitle content.
    #[cfg(not(feature = "detect"))]
    pub fn from_bytes(_data: &[u8]) -> Result<Language, LanguageError> {
        debug!("... Failed: built without the detect feature");
        Err(LanguageError::DetectionUnsupported(
            "built without the detect feature".to_string(),
        ))
    }

    /// Settings-store encoding: the three-letter id, or an empty string for
    /// any unknown language.
    pub fn to_setting(&self) -> &str {
        if self.is_unknown() { "" } else { self.language_id() }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Languages persist in settings as their three-letter id.
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_setting())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() {
            Ok(Language::generic_unknown())
        } else {
            Ok(Language::from_language_id(&value))
        }
    }
}

/// All catalog languages excluding the Unknown sentinel, in catalog order
pub fn legal_languages() -> impl Iterator<Item = Language> {
    (1..LANGUAGES.len()).map(Language::known)
}

/// The generic unknown language followed by [`legal_languages`]
pub fn all_languages() -> impl Iterator<Item = Language> {
    std::iter::once(Language::generic_unknown()).chain(legal_languages())
}

/// Encode a language sequence for the settings store: comma-joined
/// three-letter ids, unknown entries collapsing to empty elements.
pub fn languages_to_setting(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|language| language.to_setting())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a settings-store language sequence. Empty elements are dropped.
pub fn languages_from_setting(value: &str) -> Vec<Language> {
    value
        .split(',')
        .filter(|code| !code.is_empty())
        .map(Language::from_language_id)
        .collect()
}

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Remove `<...>` markup from subtitle content before language guessing
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `folded` must already be trimmed and lowercased.
fn lookup(key: LookupKey, folded: &str) -> Result<Language, LanguageError> {
    if folded == "unknown" {
        return Ok(Language::generic_unknown());
    }
    for (id, record) in LANGUAGES.iter().enumerate().skip(1) {
        let aliases: &[&str] = match key {
            LookupKey::Iso639 => record.iso639s,
            LookupKey::LanguageId => std::slice::from_ref(&record.id),
            LookupKey::Locale => record.locales,
            LookupKey::Name => std::slice::from_ref(&record.name),
        };
        if aliases.iter().any(|alias| alias.eq_ignore_ascii_case(folded)) {
            return Ok(Language::known(id));
        }
    }
    Err(LanguageError::NotALanguage(folded.to_string()))
}

/// The language table. Record 0 is the Unknown sentinel; the table is
/// append-only at compile time and read-only at runtime.
static LANGUAGES: &[LanguageRecord] = &[
    LanguageRecord { locales: &["unknown"], iso639s: &["unknown"], id: "unknown", name: "Unknown" },
    LanguageRecord { locales: &["sq"], iso639s: &["sq"], id: "alb", name: "Albanian" },
    LanguageRecord { locales: &["ar"], iso639s: &["ar"], id: "ara", name: "Arabic" },
    LanguageRecord { locales: &["hy"], iso639s: &["hy"], id: "arm", name: "Armenian" },
    LanguageRecord { locales: &["ms"], iso639s: &["ms"], id: "may", name: "Malay" },
    LanguageRecord { locales: &["bs"], iso639s: &["bs"], id: "bos", name: "Bosnian" },
    LanguageRecord { locales: &["bg"], iso639s: &["bg"], id: "bul", name: "Bulgarian" },
    LanguageRecord { locales: &["ca"], iso639s: &["ca"], id: "cat", name: "Catalan" },
    LanguageRecord { locales: &["eu"], iso639s: &["eu"], id: "eus", name: "Basque" },
    LanguageRecord { locales: &["zh_CN"], iso639s: &["zh"], id: "chi", name: "Chinese (China)" },
    LanguageRecord { locales: &["zh", "zt"], iso639s: &["zh", "zt"], id: "zht", name: "Chinese (traditional)" },
    LanguageRecord { locales: &["hr"], iso639s: &["hr"], id: "hrv", name: "Croatian" },
    LanguageRecord { locales: &["cs"], iso639s: &["cs"], id: "cze", name: "Czech" },
    LanguageRecord { locales: &["da"], iso639s: &["da"], id: "dan", name: "Danish" },
    LanguageRecord { locales: &["nl"], iso639s: &["nl"], id: "dut", name: "Dutch" },
    LanguageRecord { locales: &["en"], iso639s: &["en"], id: "eng", name: "English (US)" },
    LanguageRecord { locales: &["en_GB"], iso639s: &["en"], id: "bre", name: "English (UK)" },
    LanguageRecord { locales: &["eo"], iso639s: &["eo"], id: "epo", name: "Esperanto" },
    LanguageRecord { locales: &["et"], iso639s: &["et"], id: "est", name: "Estonian" },
    LanguageRecord { locales: &["fi"], iso639s: &["fi"], id: "fin", name: "Finnish" },
    LanguageRecord { locales: &["fr"], iso639s: &["fr"], id: "fre", name: "French" },
    LanguageRecord { locales: &["gl"], iso639s: &["gl"], id: "glg", name: "Galician" },
    LanguageRecord { locales: &["ka"], iso639s: &["ka"], id: "geo", name: "Georgian" },
    LanguageRecord { locales: &["de"], iso639s: &["de"], id: "ger", name: "German" },
    LanguageRecord { locales: &["el", "gr"], iso639s: &["el", "gr"], id: "ell", name: "Greek" },
    LanguageRecord { locales: &["he"], iso639s: &["he"], id: "heb", name: "Hebrew" },
    LanguageRecord { locales: &["hu"], iso639s: &["hu"], id: "hun", name: "Hungarian" },
    LanguageRecord { locales: &["id"], iso639s: &["id"], id: "ind", name: "Indonesian" },
    LanguageRecord { locales: &["it"], iso639s: &["it"], id: "ita", name: "Italian" },
    LanguageRecord { locales: &["ja"], iso639s: &["ja"], id: "jpn", name: "Japanese" },
    LanguageRecord { locales: &["kk"], iso639s: &["kk"], id: "kaz", name: "Kazakh" },
    LanguageRecord { locales: &["ko"], iso639s: &["ko"], id: "kor", name: "Korean" },
    LanguageRecord { locales: &["lv"], iso639s: &["lv"], id: "lav", name: "Latvian" },
    LanguageRecord { locales: &["lt"], iso639s: &["lt"], id: "lit", name: "Lithuanian" },
    LanguageRecord { locales: &["lb"], iso639s: &["lb"], id: "ltz", name: "Luxembourgish" },
    LanguageRecord { locales: &["mk"], iso639s: &["mk"], id: "mac", name: "Macedonian" },
    LanguageRecord { locales: &["no"], iso639s: &["no"], id: "nor", name: "Norwegian" },
    LanguageRecord { locales: &["oc"], iso639s: &["oc"], id: "oci", name: "Occitan" },
    LanguageRecord { locales: &["fa"], iso639s: &["fa"], id: "per", name: "Persian" },
    LanguageRecord { locales: &["pl"], iso639s: &["pl"], id: "pol", name: "Polish" },
    LanguageRecord { locales: &["pt_PT", "pt"], iso639s: &["pt"], id: "por", name: "Portuguese (Portugal)" },
    LanguageRecord { locales: &["pt_BR"], iso639s: &["pb"], id: "pob", name: "Portuguese (Brazil)" },
    LanguageRecord { locales: &["ro"], iso639s: &["ro"], id: "rum", name: "Romanian" },
    LanguageRecord { locales: &["ru"], iso639s: &["ru"], id: "rus", name: "Russian" },
    LanguageRecord { locales: &["sr"], iso639s: &["sr"], id: "scc", name: "Serbian" },
    LanguageRecord { locales: &["sk"], iso639s: &["sk"], id: "slo", name: "Slovak" },
    LanguageRecord { locales: &["sl"], iso639s: &["sl"], id: "slv", name: "Slovenian" },
    LanguageRecord { locales: &["es_ES"], iso639s: &["es"], id: "spa", name: "Spanish (Spain)" },
    LanguageRecord { locales: &["sv"], iso639s: &["sv"], id: "swe", name: "Swedish" },
    LanguageRecord { locales: &["th"], iso639s: &["th"], id: "tha", name: "Thai" },
    LanguageRecord { locales: &["tr"], iso639s: &["tr"], id: "tur", name: "Turkish" },
    LanguageRecord { locales: &["uk"], iso639s: &["uk"], id: "ukr", name: "Ukrainian" },
    LanguageRecord { locales: &["vi"], iso639s: &["vi"], id: "vie", name: "Vietnamese" },
];
