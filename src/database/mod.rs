pub mod memory;

use indexmap::{IndexMap, IndexSet};

use crate::dictionary::{NumberOrString, TermSourceMatchSource, TermSourceMatchType};
use crate::dictionary_data::{GenericFrequencyData, TermGlossary, TermMetaData, TermMetaMode};
use crate::errors::DatabaseError;

pub use memory::MemoryDictionaryDatabase;

/// A set of dictionary names a query is restricted to. Implemented by the
/// enabled-dictionary option maps and by plain name sets.
pub trait DictionarySet {
    fn has(&self, dictionary: &str) -> bool;
}

impl DictionarySet for IndexSet<String> {
    fn has(&self, dictionary: &str) -> bool {
        self.contains(dictionary)
    }
}

impl<V> DictionarySet for IndexMap<String, V> {
    fn has(&self, dictionary: &str) -> bool {
        self.contains_key(dictionary)
    }
}

/// A term row answering a bulk query.
#[derive(Clone, Debug, PartialEq)]
pub struct TermEntry {
    /// Stable database id for the row.
    pub id: String,
    /// 0-based position of the input query this row answers.
    pub index: usize,
    pub term: String,
    pub reading: String,
    pub definition_tags: Vec<String>,
    pub term_tags: Vec<String>,
    pub word_classes: Vec<String>,
    pub glossary: Vec<TermGlossary>,
    pub score: i64,
    /// `-1` when the dictionary assigned no sequence.
    pub sequence: i64,
    pub dictionary: String,
    pub match_type: TermSourceMatchType,
    pub match_source: TermSourceMatchSource,
    pub form_of: Option<String>,
    pub inflection_hypotheses: Vec<Vec<String>>,
}

impl TermEntry {
    /// Whether this row is a dictionary-declared inflected form that only
    /// exists to point at its lemma.
    pub fn is_non_lemma(&self) -> bool {
        self.definition_tags
            .iter()
            .any(|tag| tag == crate::dictionary_data::NON_LEMMA_TAG)
    }
}

/// A kanji row answering a bulk query.
#[derive(Clone, Debug, PartialEq)]
pub struct KanjiEntry {
    pub index: usize,
    pub character: String,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tags: Vec<String>,
    pub definitions: Vec<String>,
    pub stats: IndexMap<String, NumberOrString>,
    pub dictionary: String,
}

/// One term metadata fact (frequency, pitch, or IPA).
#[derive(Clone, Debug, PartialEq)]
pub struct TermMetaEntry {
    pub index: usize,
    pub term: String,
    pub mode: TermMetaMode,
    pub data: TermMetaData,
    pub dictionary: String,
}

/// One kanji metadata fact; only frequency data exists for kanji.
#[derive(Clone, Debug, PartialEq)]
pub struct KanjiMetaEntry {
    pub index: usize,
    pub character: String,
    pub data: GenericFrequencyData,
    pub dictionary: String,
}

/// A tag metadata record.
#[derive(Clone, Debug, PartialEq)]
pub struct TagEntry {
    pub name: String,
    pub category: String,
    pub order: i64,
    pub notes: String,
    pub score: i64,
    pub dictionary: String,
}

/// An exact `(term, reading)` pair query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermExactRequest {
    pub term: String,
    pub reading: String,
}

/// A by-sequence query scoped to one dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceQuery {
    pub sequence: i64,
    pub dictionary: String,
}

/// A tag lookup scoped to one dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagQuery {
    pub query: String,
    pub dictionary: String,
}

/// The narrow, bulk-oriented query interface the lookup engine consumes.
///
/// Every result carries the `index` of the input query it answers. The
/// engine performs no retries; transport errors abort the request.
pub trait DictionaryDatabase {
    /// Terms matching any of `terms` on the term or reading field, using
    /// `match_type`, restricted to `dictionaries`.
    fn find_terms_bulk(
        &self,
        terms: &[String],
        dictionaries: &dyn DictionarySet,
        match_type: TermSourceMatchType,
    ) -> Result<Vec<TermEntry>, DatabaseError>;

    /// Terms matching `(term, reading)` pairs exactly.
    fn find_terms_exact_bulk(
        &self,
        queries: &[TermExactRequest],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<TermEntry>, DatabaseError>;

    /// Terms carrying one of the queried sequence numbers, scoped per
    /// query to a single dictionary.
    fn find_terms_by_sequence_bulk(
        &self,
        queries: &[SequenceQuery],
    ) -> Result<Vec<TermEntry>, DatabaseError>;

    /// Frequency, pitch, and IPA metadata for the queried terms.
    fn find_term_meta_bulk(
        &self,
        terms: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<TermMetaEntry>, DatabaseError>;

    /// Kanji rows for the queried characters.
    fn find_kanji_bulk(
        &self,
        characters: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<KanjiEntry>, DatabaseError>;

    /// Frequency metadata for the queried characters.
    fn find_kanji_meta_bulk(
        &self,
        characters: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<KanjiMetaEntry>, DatabaseError>;

    /// Tag records for the queried `(tag, dictionary)` pairs. The result
    /// is index-parallel with `queries`; a miss yields `None`.
    fn find_tag_meta_bulk(
        &self,
        queries: &[TagQuery],
    ) -> Result<Vec<Option<TagEntry>>, DatabaseError>;
}
