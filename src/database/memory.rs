use indexmap::IndexMap;
use indexmap::IndexSet;

use super::{
    DictionaryDatabase, DictionarySet, KanjiEntry, KanjiMetaEntry, SequenceQuery, TagEntry,
    TagQuery, TermEntry, TermExactRequest, TermMetaEntry,
};
use crate::dictionary::{TermSourceMatchSource, TermSourceMatchType};
use crate::dictionary_data::{
    KanjiBankEntry, KanjiMetaBankEntry, TagBankEntry, TermBankEntry, TermMetaBankEntry,
};
use crate::errors::{DatabaseError, SchemaError};

/// An in-memory [`DictionaryDatabase`] that ingests dictionary banks in
/// their positional tuple formats.
///
/// Lookups are linear scans over the imported rows, which is plenty for
/// tests and small embedded dictionaries; a persistent backend would
/// replace this behind the same trait.
#[derive(Default)]
pub struct MemoryDictionaryDatabase {
    dictionaries: IndexMap<String, DictionaryContents>,
    next_id: usize,
}

#[derive(Default)]
struct DictionaryContents {
    terms: Vec<StoredTerm>,
    term_meta: Vec<TermMetaBankEntry>,
    kanji: Vec<KanjiBankEntry>,
    kanji_meta: Vec<KanjiMetaBankEntry>,
    tags: Vec<TagBankEntry>,
}

struct StoredTerm {
    id: String,
    entry: TermBankEntry,
}

fn parse_bank<T: serde::de::DeserializeOwned>(
    bank_json: &str,
    make_error: impl Fn(usize, String) -> SchemaError,
) -> Result<Vec<T>, SchemaError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(bank_json)?;
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|reason| make_error(index, reason.to_string()))
        })
        .collect()
}

impl MemoryDictionaryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dictionary_names(&self) -> Vec<&str> {
        self.dictionaries.keys().map(String::as_str).collect()
    }

    pub fn add_term_entries(&mut self, dictionary: &str, entries: Vec<TermBankEntry>) {
        let contents = self.dictionaries.entry(dictionary.to_string()).or_default();
        for entry in entries {
            let id = format!("{dictionary}:{}", self.next_id);
            self.next_id += 1;
            contents.terms.push(StoredTerm { id, entry });
        }
    }

    /// Imports a term bank in the
    /// `[term, reading, tags, rules, score, definitions, sequence, term_tags, …]`
    /// tuple format. Returns the number of imported rows.
    pub fn import_term_bank(
        &mut self,
        dictionary: &str,
        bank_json: &str,
    ) -> Result<usize, SchemaError> {
        let entries: Vec<TermBankEntry> = parse_bank(bank_json, |index, reason| {
            SchemaError::TermBankEntry { index, reason }
        })?;
        let count = entries.len();
        self.add_term_entries(dictionary, entries);
        log::info!("imported {count} term rows into {dictionary}");
        Ok(count)
    }

    pub fn import_term_meta_bank(
        &mut self,
        dictionary: &str,
        bank_json: &str,
    ) -> Result<usize, SchemaError> {
        let entries: Vec<TermMetaBankEntry> = parse_bank(bank_json, |index, reason| {
            SchemaError::TermMetaBankEntry { index, reason }
        })?;
        let count = entries.len();
        self.dictionaries
            .entry(dictionary.to_string())
            .or_default()
            .term_meta
            .extend(entries);
        log::info!("imported {count} term meta rows into {dictionary}");
        Ok(count)
    }

    pub fn import_kanji_bank(
        &mut self,
        dictionary: &str,
        bank_json: &str,
    ) -> Result<usize, SchemaError> {
        let entries: Vec<KanjiBankEntry> = parse_bank(bank_json, |index, reason| {
            SchemaError::KanjiBankEntry { index, reason }
        })?;
        let count = entries.len();
        self.dictionaries
            .entry(dictionary.to_string())
            .or_default()
            .kanji
            .extend(entries);
        Ok(count)
    }

    pub fn import_kanji_meta_bank(
        &mut self,
        dictionary: &str,
        bank_json: &str,
    ) -> Result<usize, SchemaError> {
        let entries: Vec<KanjiMetaBankEntry> = parse_bank(bank_json, |index, reason| {
            SchemaError::KanjiMetaBankEntry { index, reason }
        })?;
        let count = entries.len();
        self.dictionaries
            .entry(dictionary.to_string())
            .or_default()
            .kanji_meta
            .extend(entries);
        Ok(count)
    }

    pub fn import_tag_bank(
        &mut self,
        dictionary: &str,
        bank_json: &str,
    ) -> Result<usize, SchemaError> {
        let entries: Vec<TagBankEntry> = parse_bank(bank_json, |index, reason| {
            SchemaError::TagBankEntry { index, reason }
        })?;
        let count = entries.len();
        self.dictionaries
            .entry(dictionary.to_string())
            .or_default()
            .tags
            .extend(entries);
        Ok(count)
    }

    fn make_term_entry(
        dictionary: &str,
        stored: &StoredTerm,
        index: usize,
        query: &str,
        match_source: TermSourceMatchSource,
        match_type: TermSourceMatchType,
    ) -> TermEntry {
        let entry = &stored.entry;
        let matched_field = match match_source {
            TermSourceMatchSource::Reading => &entry.reading,
            _ => &entry.term,
        };
        let match_type = if matched_field == query {
            TermSourceMatchType::Exact
        } else {
            match_type
        };
        TermEntry {
            id: stored.id.clone(),
            index,
            term: entry.term.clone(),
            reading: entry.reading.clone(),
            definition_tags: entry.definition_tags.clone(),
            term_tags: entry.term_tags.clone(),
            word_classes: entry.word_classes.clone(),
            glossary: entry.glossary.clone(),
            score: entry.score,
            sequence: entry.sequence,
            dictionary: dictionary.to_string(),
            match_type,
            match_source,
            form_of: entry.form_of.clone(),
            inflection_hypotheses: entry.inflection_hypotheses.clone(),
        }
    }
}

fn field_matches(field: &str, query: &str, match_type: TermSourceMatchType) -> bool {
    match match_type {
        TermSourceMatchType::Exact => field == query,
        TermSourceMatchType::Prefix => field.starts_with(query),
        TermSourceMatchType::Suffix => field.ends_with(query),
    }
}

impl DictionaryDatabase for MemoryDictionaryDatabase {
    fn find_terms_bulk(
        &self,
        terms: &[String],
        dictionaries: &dyn DictionarySet,
        match_type: TermSourceMatchType,
    ) -> Result<Vec<TermEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, query) in terms.iter().enumerate() {
            for (dictionary, contents) in &self.dictionaries {
                if !dictionaries.has(dictionary) {
                    continue;
                }
                for stored in &contents.terms {
                    if field_matches(&stored.entry.term, query, match_type) {
                        results.push(Self::make_term_entry(
                            dictionary,
                            stored,
                            index,
                            query,
                            TermSourceMatchSource::Term,
                            match_type,
                        ));
                    } else if field_matches(&stored.entry.reading, query, match_type) {
                        results.push(Self::make_term_entry(
                            dictionary,
                            stored,
                            index,
                            query,
                            TermSourceMatchSource::Reading,
                            match_type,
                        ));
                    }
                }
            }
        }

        // Dedup is per query index: the same row may legitimately answer
        // one query via its term field and another via its reading.
        let mut visited: IndexSet<(usize, String)> = IndexSet::new();
        results.retain(|entry| visited.insert((entry.index, entry.id.clone())));
        Ok(results)
    }

    fn find_terms_exact_bulk(
        &self,
        queries: &[TermExactRequest],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<TermEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, request) in queries.iter().enumerate() {
            for (dictionary, contents) in &self.dictionaries {
                if !dictionaries.has(dictionary) {
                    continue;
                }
                for stored in &contents.terms {
                    if stored.entry.term == request.term && stored.entry.reading == request.reading
                    {
                        results.push(Self::make_term_entry(
                            dictionary,
                            stored,
                            index,
                            &request.term,
                            TermSourceMatchSource::Term,
                            TermSourceMatchType::Exact,
                        ));
                    }
                }
            }
        }
        Ok(results)
    }

    fn find_terms_by_sequence_bulk(
        &self,
        queries: &[SequenceQuery],
    ) -> Result<Vec<TermEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, query) in queries.iter().enumerate() {
            let Some(contents) = self.dictionaries.get(&query.dictionary) else {
                continue;
            };
            for stored in &contents.terms {
                if stored.entry.sequence == query.sequence {
                    results.push(Self::make_term_entry(
                        &query.dictionary,
                        stored,
                        index,
                        &stored.entry.term,
                        TermSourceMatchSource::Sequence,
                        TermSourceMatchType::Exact,
                    ));
                }
            }
        }
        Ok(results)
    }

    fn find_term_meta_bulk(
        &self,
        terms: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<TermMetaEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, query) in terms.iter().enumerate() {
            for (dictionary, contents) in &self.dictionaries {
                if !dictionaries.has(dictionary) {
                    continue;
                }
                for row in &contents.term_meta {
                    if &row.term == query {
                        results.push(TermMetaEntry {
                            index,
                            term: row.term.clone(),
                            mode: row.mode,
                            data: row.data.clone(),
                            dictionary: dictionary.clone(),
                        });
                    }
                }
            }
        }
        Ok(results)
    }

    fn find_kanji_bulk(
        &self,
        characters: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<KanjiEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, character) in characters.iter().enumerate() {
            for (dictionary, contents) in &self.dictionaries {
                if !dictionaries.has(dictionary) {
                    continue;
                }
                for row in &contents.kanji {
                    if &row.character == character {
                        results.push(KanjiEntry {
                            index,
                            character: row.character.clone(),
                            onyomi: row.onyomi.clone(),
                            kunyomi: row.kunyomi.clone(),
                            tags: row.tags.clone(),
                            definitions: row.meanings.clone(),
                            stats: row.stats.clone(),
                            dictionary: dictionary.clone(),
                        });
                    }
                }
            }
        }
        Ok(results)
    }

    fn find_kanji_meta_bulk(
        &self,
        characters: &[String],
        dictionaries: &dyn DictionarySet,
    ) -> Result<Vec<KanjiMetaEntry>, DatabaseError> {
        let mut results = Vec::new();
        for (index, character) in characters.iter().enumerate() {
            for (dictionary, contents) in &self.dictionaries {
                if !dictionaries.has(dictionary) {
                    continue;
                }
                for row in &contents.kanji_meta {
                    if &row.character == character {
                        results.push(KanjiMetaEntry {
                            index,
                            character: row.character.clone(),
                            data: row.data.clone(),
                            dictionary: dictionary.clone(),
                        });
                    }
                }
            }
        }
        Ok(results)
    }

    fn find_tag_meta_bulk(
        &self,
        queries: &[TagQuery],
    ) -> Result<Vec<Option<TagEntry>>, DatabaseError> {
        let results = queries
            .iter()
            .map(|query| {
                let contents = self.dictionaries.get(&query.dictionary)?;
                contents
                    .tags
                    .iter()
                    .find(|tag| tag.name == query.query)
                    .map(|tag| TagEntry {
                        name: tag.name.clone(),
                        category: tag.category.clone(),
                        order: tag.order,
                        notes: tag.notes.clone(),
                        score: tag.score,
                        dictionary: query.dictionary.clone(),
                    })
            })
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_db() -> MemoryDictionaryDatabase {
        let mut db = MemoryDictionaryDatabase::new();
        db.import_term_bank(
            "jmdict",
            r#"[
                ["食べる","たべる","pop","v1",10,["to eat"],1,""],
                ["食べ物","たべもの","","n",5,["food"],2,""]
            ]"#,
        )
        .unwrap();
        db
    }

    fn enabled() -> IndexSet<String> {
        IndexSet::from(["jmdict".to_string()])
    }

    #[test]
    fn exact_lookup_matches_term_and_reading() {
        let db = sample_db();
        let hits = db
            .find_terms_bulk(
                &["たべる".to_string()],
                &enabled(),
                TermSourceMatchType::Exact,
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "食べる");
        assert_eq!(hits[0].match_source, TermSourceMatchSource::Reading);
        assert_eq!(hits[0].match_type, TermSourceMatchType::Exact);
    }

    #[test]
    fn prefix_lookup_reports_exact_when_equal() {
        let db = sample_db();
        let hits = db
            .find_terms_bulk(
                &["食べ".to_string()],
                &enabled(),
                TermSourceMatchType::Prefix,
            )
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits
            .iter()
            .all(|hit| hit.match_type == TermSourceMatchType::Prefix));
    }

    #[test]
    fn one_row_answers_term_and_reading_queries_separately() {
        let mut db = MemoryDictionaryDatabase::new();
        db.import_term_bank("jmdict", r#"[["走る","はしる","","v5",5,["to run"],1,""]]"#)
            .unwrap();
        let hits = db
            .find_terms_bulk(
                &["走る".to_string(), "はしる".to_string()],
                &enabled(),
                TermSourceMatchType::Exact,
            )
            .unwrap();
        // The row answers index 0 by term and index 1 by reading.
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[0].match_source, TermSourceMatchSource::Term);
        assert_eq!(hits[1].index, 1);
        assert_eq!(hits[1].match_source, TermSourceMatchSource::Reading);
    }

    #[test]
    fn disabled_dictionary_is_invisible() {
        let db = sample_db();
        let hits = db
            .find_terms_bulk(
                &["食べる".to_string()],
                &IndexSet::<String>::new(),
                TermSourceMatchType::Exact,
            )
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn tag_meta_results_are_index_parallel() {
        let mut db = sample_db();
        db.import_tag_bank("jmdict", r#"[["v1","partOfSpeech",0,"Ichidan verb",10]]"#)
            .unwrap();
        let results = db
            .find_tag_meta_bulk(&[
                TagQuery {
                    query: "missing".to_string(),
                    dictionary: "jmdict".to_string(),
                },
                TagQuery {
                    query: "v1".to_string(),
                    dictionary: "jmdict".to_string(),
                },
            ])
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_none());
        assert_eq!(results[1].as_ref().unwrap().category, "partOfSpeech");
    }

    #[test]
    fn malformed_row_is_rejected_with_position() {
        let mut db = MemoryDictionaryDatabase::new();
        let err = db
            .import_term_bank("bad", r#"[["only","two"]]"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::TermBankEntry { index: 0, .. }));
    }
}
