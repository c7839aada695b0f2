use super::ja::japanese;
use super::text_processors::{
    TextTransformation, CAPITALIZE_FIRST_LETTER, DECAPITALIZE, REMOVE_ALPHABETIC_DIACRITICS,
};

/// Per-language lookup behavior: which text transformations exist, whether
/// emphatic-sequence collapsing applies, and how readings normalize for
/// headword comparison.
#[derive(Clone, Copy)]
pub struct LanguageDescriptor {
    pub iso: &'static str,
    pub name: &'static str,
    pub text_transformations: &'static [TextTransformation],
    pub has_emphatic_sequences: bool,
    pub reading_normalizer: Option<fn(&str) -> String>,
}

static JAPANESE_TEXT_TRANSFORMATIONS: &[TextTransformation] = &[
    japanese::CONVERT_HALFWIDTH_KANA,
    japanese::NORMALIZE_COMBINING_CHARACTERS,
    japanese::KATAKANA_TO_HIRAGANA,
    japanese::HIRAGANA_TO_KATAKANA,
];

static LATIN_TEXT_TRANSFORMATIONS: &[TextTransformation] = &[
    DECAPITALIZE,
    CAPITALIZE_FIRST_LETTER,
    REMOVE_ALPHABETIC_DIACRITICS,
];

pub static LANGUAGE_DESCRIPTORS: &[LanguageDescriptor] = &[
    LanguageDescriptor {
        iso: "ja",
        name: "Japanese",
        text_transformations: JAPANESE_TEXT_TRANSFORMATIONS,
        has_emphatic_sequences: true,
        reading_normalizer: Some(japanese::normalize_reading),
    },
    LanguageDescriptor {
        iso: "en",
        name: "English",
        text_transformations: LATIN_TEXT_TRANSFORMATIONS,
        has_emphatic_sequences: false,
        reading_normalizer: None,
    },
];

static DEFAULT_DESCRIPTOR: LanguageDescriptor = LanguageDescriptor {
    iso: "",
    name: "Default",
    text_transformations: LATIN_TEXT_TRANSFORMATIONS,
    has_emphatic_sequences: false,
    reading_normalizer: None,
};

/// Returns the descriptor for an ISO-639 code, falling back to a generic
/// Latin-script descriptor for languages without a specific entry.
pub fn get_language_descriptor(iso: &str) -> &'static LanguageDescriptor {
    LANGUAGE_DESCRIPTORS
        .iter()
        .find(|descriptor| descriptor.iso == iso)
        .unwrap_or(&DEFAULT_DESCRIPTOR)
}
