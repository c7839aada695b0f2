use fancy_regex::Regex;
use indexmap::{IndexMap, IndexSet};

use crate::dictionary::TermSourceMatchType;

/// The matching type for looking up terms.
pub type FindTermsMatchType = TermSourceMatchType;

/// Determines the format of a `find_terms` result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindTermsMode {
    /// Raw entries, one per database hit, with no grouping or enrichment.
    Simple,
    /// One entry per `(term, reading, inflection hypotheses)` headword key.
    Group,
    /// Entries merged across dictionaries by main-dictionary sequence.
    Merge,
    /// Raw entries, enriched but not grouped.
    Split,
}

/// A sorting order to use when a frequency dictionary drives sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FindTermsSortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Which deinflection machinery feeds candidate lemmas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeinflectionSource {
    Algorithm,
    Dictionary,
    #[default]
    Both,
}

/// Tri-state setting for a single text transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextTransformationSetting {
    #[default]
    Off,
    On,
    /// Search both the transformed and untransformed variants.
    Both,
}

/// Setting for the language-specific emphatic-sequence collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollapseEmphatic {
    #[default]
    Off,
    On,
    /// Collapse runs away entirely rather than reducing them to one char.
    Full,
}

/// Whether every substring is searched, or only whole words.
///
/// `Letter`: A dog → "A dog" | "A do" | "A d" | "A".
/// `Word`: A dog → "A dog" | "A".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchResolution {
    #[default]
    Letter,
    Word,
}

/// Information about how text should be replaced when looking up terms.
#[derive(Debug, Clone)]
pub struct FindTermsTextReplacement {
    pub pattern: Regex,
    /// May contain JS-style special sequences such as `$&` and `$1`.
    pub replacement: String,
    pub is_global: bool,
}

/// The replacement variant axis: each element is one variant, either no
/// replacement or an ordered list of replacements applied in sequence.
pub type FindTermsTextReplacements = Vec<Option<Vec<FindTermsTextReplacement>>>;

/// Details about one enabled dictionary.
#[derive(Debug, Clone, Default)]
pub struct FindTermDictionary {
    /// Position in the original list of dictionaries used for the lookup.
    pub index: usize,
    pub priority: i64,
    /// Whether secondary `(term, reading)` searches may pull related
    /// entries out of this dictionary during merging.
    pub allow_secondary_searches: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FindKanjiDictionary {
    pub index: usize,
    pub priority: i64,
}

pub type TermEnabledDictionaryMap = IndexMap<String, FindTermDictionary>;
pub type KanjiEnabledDictionaryMap = IndexMap<String, FindKanjiDictionary>;

/// An options object for use with `Translator::find_terms`.
#[derive(Debug, Clone)]
pub struct FindTermsOptions {
    /// The matching type for looking up terms.
    pub match_type: FindTermsMatchType,
    /// Whether or not algorithm deinflection should be performed at all.
    pub deinflect: bool,
    /// Which deinflection sources participate in candidate generation.
    pub deinflection_source: DeinflectionSource,
    /// Whether candidate rule masks are checked against word classes.
    pub deinflection_pos_filter: bool,
    /// The dictionary whose sequence numbers drive `merge` grouping.
    pub main_dictionary: String,
    /// The name of the frequency dictionary used for sorting.
    pub sort_frequency_dictionary: Option<String>,
    pub sort_frequency_dictionary_order: FindTermsSortOrder,
    /// Whether the input is truncated at the first non-Japanese code point.
    pub remove_non_japanese_characters: bool,
    /// Text replacement variants applied during variant generation.
    pub text_replacements: FindTermsTextReplacements,
    /// Language-specific emphatic sequence collapsing.
    pub collapse_emphatic_sequences: CollapseEmphatic,
    /// Per-transformation tri-state settings, keyed by transformation id.
    pub text_transformations: IndexMap<String, TextTransformationSetting>,
    /// The mapping of dictionaries to search for terms in, keyed by name.
    pub enabled_dictionary_map: TermEnabledDictionaryMap,
    /// Dictionaries whose definitions are stripped from the results.
    pub exclude_dictionary_definitions: Option<IndexSet<String>>,
    pub search_resolution: SearchResolution,
    /// ISO-639 code of the language.
    pub language: String,
}

impl Default for FindTermsOptions {
    fn default() -> Self {
        Self {
            match_type: TermSourceMatchType::Exact,
            deinflect: true,
            deinflection_source: DeinflectionSource::default(),
            deinflection_pos_filter: true,
            main_dictionary: String::new(),
            sort_frequency_dictionary: None,
            sort_frequency_dictionary_order: FindTermsSortOrder::default(),
            remove_non_japanese_characters: false,
            text_replacements: vec![None],
            collapse_emphatic_sequences: CollapseEmphatic::default(),
            text_transformations: IndexMap::new(),
            enabled_dictionary_map: IndexMap::new(),
            exclude_dictionary_definitions: None,
            search_resolution: SearchResolution::default(),
            language: "ja".to_string(),
        }
    }
}

/// An options object for use with `Translator::find_kanji`.
#[derive(Debug, Clone, Default)]
pub struct FindKanjiOptions {
    pub enabled_dictionary_map: KanjiEnabledDictionaryMap,
    pub remove_non_japanese_characters: bool,
}
