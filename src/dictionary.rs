use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dictionary_data::TermGlossary;

/// Where an inflection hypothesis was observed. The values form a small
/// join lattice: conflicting observations promote to `Both`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflectionSource {
    Algorithm,
    Dictionary,
    Both,
}

impl InflectionSource {
    pub fn combine(self, other: InflectionSource) -> InflectionSource {
        if self == other {
            self
        } else {
            InflectionSource::Both
        }
    }
}

/// One way the looked-up text might be an inflected form of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflectionHypothesis {
    pub source: InflectionSource,
    /// Inflection rule identifiers, outermost first.
    pub inflections: Vec<String>,
}

impl InflectionHypothesis {
    /// Hypotheses compare by their inflection names ignoring order.
    pub fn same_inflections(&self, other: &[String]) -> bool {
        if self.inflections.len() != other.len() {
            return false;
        }
        let mut a: Vec<&str> = self.inflections.iter().map(String::as_str).collect();
        let mut b: Vec<&str> = other.iter().map(String::as_str).collect();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

/// A tag represents some brief information about part of a dictionary entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// The name of the tag.
    pub name: String,
    /// The category of the tag.
    pub category: String,
    /// A number indicating the sorting order of the tag.
    pub order: i64,
    /// A score value for the tag.
    pub score: i64,
    /// Descriptions for the tag; entries typically originate from
    /// different dictionaries, with duplicates removed.
    pub content: Vec<String>,
    /// Names of the dictionaries that contained a tag with this name and
    /// category.
    pub dictionaries: Vec<String>,
    /// Whether or not this tag is redundant with previous tags.
    pub redundant: bool,
}

/// Provenance of a group of tag names: which dictionary declared them.
/// Tag groups are expanded into [`Tag`] records by metadata enrichment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub dictionary: String,
    pub tag_names: Vec<String>,
}

impl TagGroup {
    pub fn new(dictionary: impl Into<String>, tag_names: Vec<String>) -> Self {
        Self {
            dictionary: dictionary.into(),
            tag_names,
        }
    }
}

/// Enum representing how the search term relates to the final term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSourceMatchType {
    Exact,
    Prefix,
    Suffix,
}

/// Enum representing what database field was used to match the source term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSourceMatchSource {
    Term,
    Reading,
    Sequence,
}

/// How the original text was transformed to arrive at the matched term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSource {
    /// The original text that was searched.
    pub original_text: String,
    /// The text after transformations, before deinflection.
    pub transformed_text: String,
    /// The final text after deinflection.
    pub deinflected_text: String,
    pub match_type: TermSourceMatchType,
    pub match_source: TermSourceMatchSource,
    /// Primary sources are derived from the scanned text; non-primary
    /// sources originate from related-entry lookups.
    pub is_primary: bool,
}

/// A term headword is a combination of a term, reading, and auxiliary
/// information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermHeadword {
    /// Position of this headword within its entry's headword list.
    pub index: usize,
    pub term: String,
    pub reading: String,
    pub sources: Vec<TermSource>,
    pub tag_groups: Vec<TagGroup>,
    /// Expanded by metadata enrichment; empty before that.
    pub tags: Vec<Tag>,
    /// Word classes (parts of speech) for the headword.
    pub word_classes: Vec<String>,
}

/// A single definition within a term dictionary entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermDefinition {
    /// The original order of the definition, used as the final sort key.
    pub index: usize,
    /// Headwords this definition corresponds to; sorted and unique.
    pub headword_indices: Vec<usize>,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    /// Database id for the definition.
    pub id: String,
    pub score: i64,
    /// Sorting value based on the determined term frequency.
    pub frequency_order: i64,
    /// Database sequence numbers; `-1` means no sequence. Multiple values
    /// appear when definitions with different sequences were merged.
    pub sequences: Vec<i64>,
    pub is_primary: bool,
    pub tag_groups: Vec<TagGroup>,
    pub tags: Vec<Tag>,
    /// The definition content entries.
    pub entries: Vec<TermGlossary>,
}

/// Pitch accent information, as the position of the downstep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitchAccent {
    pub position: i64,
    pub nasal_positions: Vec<i64>,
    pub devoice_positions: Vec<i64>,
    pub tag_groups: Vec<TagGroup>,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoneticTranscription {
    pub ipa: String,
    pub tag_groups: Vec<TagGroup>,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Pronunciation {
    PitchAccent(PitchAccent),
    PhoneticTranscription(PhoneticTranscription),
}

/// Ways to pronounce one of an entry's headwords.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermPronunciation {
    pub index: usize,
    pub headword_index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    pub pronunciations: Vec<Pronunciation>,
}

/// How frequently a term appears in a corpus: a number of occurrences or
/// an overall rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub index: usize,
    pub headword_index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    /// Whether the frequency had an explicit reading specified.
    pub has_reading: bool,
    pub frequency: i64,
    /// A display value to show to the user.
    pub display_value: Option<String>,
    /// Whether `display_value` was parsed to determine the frequency.
    pub display_value_parsed: bool,
}

/// A dictionary entry for a term or group of terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermDictionaryEntry {
    /// Whether any source is a primary source.
    pub is_primary: bool,
    /// Ways the looked-up text might be an inflected form of this entry.
    pub inflection_hypotheses: Vec<InflectionHypothesis>,
    pub score: i64,
    pub frequency_order: i64,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    /// Number of headwords with a primary source that matched on the term
    /// field.
    pub source_term_exact_match_count: usize,
    /// Maximum transformed-text length over all primary sources, in chars.
    pub max_transformed_text_length: usize,
    pub headwords: Vec<TermHeadword>,
    pub definitions: Vec<TermDefinition>,
    pub pronunciations: Vec<TermPronunciation>,
    pub frequencies: Vec<TermFrequency>,
}

/// Helper enum for values that are either numbers or strings in bank data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    String(String),
}

/// A generic piece of information about a kanji character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KanjiStat {
    pub name: String,
    pub category: String,
    pub content: String,
    pub order: i64,
    pub score: i64,
    pub dictionary: String,
    pub value: NumberOrString,
}

/// Stats about a kanji character, grouped by category.
pub type KanjiStatGroups = IndexMap<String, Vec<KanjiStat>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KanjiFrequency {
    pub index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    pub character: String,
    pub frequency: i64,
    pub display_value: Option<String>,
    pub display_value_parsed: bool,
}

/// A dictionary entry for a single kanji character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KanjiDictionaryEntry {
    pub character: String,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_priority: i64,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tag_groups: Vec<TagGroup>,
    pub tags: Vec<Tag>,
    pub stats: KanjiStatGroups,
    pub definitions: Vec<String>,
    pub frequencies: Vec<KanjiFrequency>,
}

/// A `(term, reading)` query item for `get_term_frequencies`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermReadingItem {
    pub term: String,
    pub reading: Option<String>,
}

/// One frequency fact about a term, outside any dictionary entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermFrequencySimple {
    pub term: String,
    pub reading: Option<String>,
    pub dictionary: String,
    pub has_reading: bool,
    pub frequency: i64,
    pub display_value: Option<String>,
    pub display_value_parsed: bool,
}
