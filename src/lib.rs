//! Multilingual pop-up dictionary lookup engine.
//!
//! Given a span of text, the [`Translator`] finds the longest prefixes
//! corresponding to known dictionary headwords, reversing surface
//! inflection back to lemmas along the way, and assembles structured
//! dictionary entries by consulting every enabled dictionary at once.
//! Entries carry definitions, readings, pronunciations, frequency data,
//! and provenance tags, ordered and deduplicated under a well-defined
//! priority scheme.
//!
//! The engine consumes its storage through the narrow
//! [`database::DictionaryDatabase`] query interface;
//! [`MemoryDictionaryDatabase`] is a complete in-memory implementation
//! able to ingest dictionary banks in their positional tuple formats.
//!
//! ```no_run
//! use jiten::{
//!     FindTermsMode, FindTermsOptions, MemoryDictionaryDatabase, Translator,
//! };
//!
//! # fn main() -> jiten::Result<()> {
//! let mut db = MemoryDictionaryDatabase::new();
//! db.import_term_bank("jmdict", r#"[["食べる","たべる","","v1",10,["to eat"],1,""]]"#)
//!     .map_err(jiten::errors::DatabaseError::from)?;
//!
//! let translator = Translator::new(db);
//! let mut options = FindTermsOptions::default();
//! options
//!     .enabled_dictionary_map
//!     .insert("jmdict".to_string(), Default::default());
//! let result = translator.find_terms(FindTermsMode::Group, "食べた", &options)?;
//! assert_eq!(result.dictionary_entries[0].headwords[0].term, "食べる");
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod dictionary;
pub mod dictionary_data;
pub mod errors;
pub mod language;
pub mod regex_util;
pub mod text_source_map;
pub mod text_variants;
pub mod translation;
mod translation_internal;
pub mod translator;

#[cfg(test)]
mod tests;

pub use database::{DictionaryDatabase, MemoryDictionaryDatabase};
pub use dictionary::{
    InflectionHypothesis, InflectionSource, KanjiDictionaryEntry, Tag, TermDictionaryEntry,
    TermFrequencySimple, TermReadingItem, TermSourceMatchSource, TermSourceMatchType,
};
pub use errors::{JitenError, Result};
pub use translation::{
    CollapseEmphatic, DeinflectionSource, FindKanjiOptions, FindTermDictionary, FindTermsMode,
    FindTermsOptions, FindTermsSortOrder, SearchResolution, TextTransformationSetting,
};
pub use translator::{FindTermsResult, Translator};
