mod grouping;
mod kanji;
mod metadata;
mod sorting;

use std::sync::LazyLock;

use fancy_regex::Regex;
use icu::collator::{options::CollatorOptions, Collator, CollatorBorrowed};
use icu::locale::locale;
use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use serde::Serialize;

use crate::database::{DictionaryDatabase, TagEntry, TermEntry};
use crate::dictionary::{
    InflectionHypothesis, InflectionSource, TagGroup, TermDefinition, TermDictionaryEntry,
    TermHeadword, TermSource, TermSourceMatchSource,
};
use crate::errors::{Result, TranslatorError};
use crate::language::deinflector::{Deinflector, Rules};
use crate::language::ja::japanese::is_code_point_japanese;
use crate::language::languages::get_language_descriptor;
use crate::text_variants::TextVariantGenerator;
use crate::translation::{
    DeinflectionSource, FindKanjiDictionary, FindTermDictionary, FindTermsMode, FindTermsOptions,
    SearchResolution,
};
use crate::translation_internal::DatabaseDeinflection;

static GET_NEXT_SUBSTRING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}][\p{L}\p{N}]*$").expect("next substring pattern")
});

/// The result of a `find_terms` call.
#[derive(Clone, Debug, PartialEq)]
pub struct FindTermsResult {
    pub dictionary_entries: Vec<TermDictionaryEntry>,
    /// Length, in chars, of the longest original-text span that produced a
    /// hit (dictionary-deinflection hits excluded).
    pub original_text_length: usize,
}

type TagCache = IndexMap<String, IndexMap<String, Option<TagEntry>>>;

/// Finds term and kanji dictionary entries for text.
///
/// Each lookup is an independent request-scoped computation; the only
/// state shared between calls is the tag cache, which must be dropped via
/// [`Translator::clear_database_caches`] whenever the database changes.
pub struct Translator<D> {
    db: D,
    deinflector: Deinflector,
    tag_cache: Mutex<TagCache>,
    /// Invariant locale, default "en-US".
    string_comparer: CollatorBorrowed<'static>,
    number_pattern: Regex,
}

impl<D: DictionaryDatabase> Translator<D> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            deinflector: Deinflector::japanese(),
            tag_cache: Mutex::new(IndexMap::new()),
            string_comparer: Collator::try_new(locale!("en-US").into(), CollatorOptions::default())
                .expect("collator for the invariant locale"),
            number_pattern: Regex::new(r"[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?")
                .expect("number pattern"),
        }
    }

    /// Drops the database-derived caches. Must be called if the database
    /// contents change.
    pub fn clear_database_caches(&self) {
        self.tag_cache.lock().clear();
    }

    /// Finds term dictionary entries for the longest prefixes of `text`.
    ///
    /// `mode` selects the output shape: `Simple` and `Split` return raw
    /// per-hit entries, `Group` folds entries sharing a headword, and
    /// `Merge` combines entries across dictionaries by main-dictionary
    /// sequence. `Merge` requires `options.main_dictionary`.
    pub fn find_terms(
        &self,
        mode: FindTermsMode,
        text: &str,
        options: &FindTermsOptions,
    ) -> Result<FindTermsResult> {
        if mode == FindTermsMode::Merge && options.main_dictionary.is_empty() {
            return Err(TranslatorError::MissingMainDictionary.into());
        }

        let mut text = text.to_string();
        if options.remove_non_japanese_characters
            && ["ja", "zh", "yue"].contains(&options.language.as_str())
        {
            text = japanese_only_prefix(&text).to_string();
        }
        if text.is_empty() {
            return Ok(FindTermsResult {
                dictionary_entries: Vec::new(),
                original_text_length: 0,
            });
        }

        let (deinflections, original_text_length) = self._get_deinflections(&text, options)?;
        let mut dictionary_entries = self._get_dictionary_entries(&deinflections, options);
        log::debug!(
            "find_terms: {} raw entries from {} deinflection candidates",
            dictionary_entries.len(),
            deinflections.len()
        );

        match mode {
            FindTermsMode::Group => {
                dictionary_entries =
                    self._group_dictionary_entries_by_headword(&options.language, &dictionary_entries);
            }
            FindTermsMode::Merge => {
                dictionary_entries = self._get_related_dictionary_entries(dictionary_entries, options)?;
            }
            FindTermsMode::Simple | FindTermsMode::Split => {}
        }

        if let Some(excluded) = &options.exclude_dictionary_definitions {
            Self::_remove_excluded_definitions(&mut dictionary_entries, excluded);
        }

        if mode == FindTermsMode::Simple {
            Self::_clear_term_tag_groups(&mut dictionary_entries);
        } else {
            self._add_term_meta(&mut dictionary_entries, &options.enabled_dictionary_map)?;
            self._expand_term_tag_groups(&mut dictionary_entries)?;
        }

        if let Some(sort_dictionary) = &options.sort_frequency_dictionary {
            sorting::update_sort_frequency_order(
                &mut dictionary_entries,
                sort_dictionary,
                options.sort_frequency_dictionary_order,
            );
        }

        self._sort_term_dictionary_entries(&mut dictionary_entries);
        for entry in &mut dictionary_entries {
            self._sort_term_dictionary_entry_data(entry);
        }

        Ok(FindTermsResult {
            dictionary_entries,
            original_text_length,
        })
    }

    /*************** deinflection candidate generation ***************/

    fn _get_deinflections(
        &self,
        text: &str,
        options: &FindTermsOptions,
    ) -> Result<(Vec<DatabaseDeinflection>, usize)> {
        let mut deinflections = self._get_text_candidates(text, options);
        if deinflections.is_empty() {
            return Ok((Vec::new(), 0));
        }

        self._add_entries_to_deinflections(&mut deinflections, options)?;

        if options.deinflection_source != DeinflectionSource::Algorithm {
            let dictionary_deinflections =
                self._get_dictionary_deinflections(&deinflections, options)?;
            deinflections.extend(dictionary_deinflections);
        }

        // Measured before the non-lemma strip so a scanned span whose only
        // hit seeds dictionary deinflection still counts.
        let mut original_text_length = 0;
        for deinflection in &deinflections {
            if !deinflection.is_dictionary_deinflection && !deinflection.database_entries.is_empty()
            {
                original_text_length =
                    original_text_length.max(char_len(&deinflection.original_text));
            }
        }

        // Non-lemma rows exist only to seed dictionary deinflection.
        for deinflection in &mut deinflections {
            deinflection.database_entries.retain(|entry| !entry.is_non_lemma());
        }
        deinflections.retain(|deinflection| !deinflection.database_entries.is_empty());

        Ok((deinflections, original_text_length))
    }

    /// Walks every text variant and every prefix of it, deinflecting each
    /// untried source into lookup candidates.
    fn _get_text_candidates(
        &self,
        text: &str,
        options: &FindTermsOptions,
    ) -> Vec<DatabaseDeinflection> {
        let descriptor = get_language_descriptor(&options.language);
        let use_algorithm =
            options.deinflect && options.deinflection_source != DeinflectionSource::Dictionary;

        let mut candidates = Vec::new();
        let mut tried: IndexSet<String> = IndexSet::new();

        let variants = TextVariantGenerator::new(
            text,
            descriptor,
            &options.text_replacements,
            &options.text_transformations,
            options.collapse_emphatic_sequences,
        );
        for (variant, source_map) in variants {
            let mut source = variant;
            while !source.is_empty() {
                if tried.insert(source.clone()) {
                    let source_chars = source.chars().count();
                    let original_text = char_prefix(text, source_map.source_length(source_chars));
                    if use_algorithm {
                        for deinflection in self.deinflector.deinflect(&source) {
                            let hypotheses = if deinflection.reasons.is_empty() {
                                Vec::new()
                            } else {
                                vec![InflectionHypothesis {
                                    source: InflectionSource::Algorithm,
                                    inflections: deinflection
                                        .reasons
                                        .iter()
                                        .map(|reason| reason.to_string())
                                        .collect(),
                                }]
                            };
                            candidates.push(DatabaseDeinflection::new(
                                original_text,
                                &source,
                                deinflection.term,
                                deinflection.rules,
                                hypotheses,
                            ));
                        }
                    } else {
                        candidates.push(DatabaseDeinflection::new(
                            original_text,
                            &source,
                            source.clone(),
                            Rules::NONE,
                            Vec::new(),
                        ));
                    }
                }
                source = next_substring(options.search_resolution, &source);
            }
        }

        candidates
    }

    /// Groups candidates by deinflected term, performs one bulk lookup for
    /// the unique terms, and attaches each returned row to every candidate
    /// whose rule mask fits.
    fn _add_entries_to_deinflections(
        &self,
        deinflections: &mut [DatabaseDeinflection],
        options: &FindTermsOptions,
    ) -> Result<()> {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, deinflection) in deinflections.iter().enumerate() {
            groups
                .entry(deinflection.deinflected_text.clone())
                .or_default()
                .push(index);
        }
        let unique_terms: Vec<String> = groups.keys().cloned().collect();

        let database_entries = self.db.find_terms_bulk(
            &unique_terms,
            &options.enabled_dictionary_map,
            options.match_type,
        )?;
        log::debug!(
            "term lookup: {} rows for {} unique candidates",
            database_entries.len(),
            unique_terms.len()
        );

        for entry in database_entries {
            let (_, candidate_indices) = groups
                .get_index(entry.index)
                .expect("bulk result index within query batch");
            let entry_rules = Rules::from_parts_of_speech(&entry.word_classes);
            for &candidate_index in candidate_indices {
                let deinflection = &mut deinflections[candidate_index];
                if !options.deinflection_pos_filter
                    || Rules::fits(deinflection.conditions, entry_rules)
                {
                    deinflection.database_entries.push(entry.clone());
                }
            }
        }

        Ok(())
    }

    /// Treats non-lemma hits as a second deinflection source: their
    /// declared lemma becomes a new candidate whose hypotheses are the
    /// cross product of the algorithm chains with the dictionary chains.
    fn _get_dictionary_deinflections(
        &self,
        deinflections: &[DatabaseDeinflection],
        options: &FindTermsOptions,
    ) -> Result<Vec<DatabaseDeinflection>> {
        let mut dictionary_deinflections: Vec<DatabaseDeinflection> = Vec::new();

        for deinflection in deinflections {
            for entry in &deinflection.database_entries {
                if !entry.is_non_lemma() {
                    continue;
                }
                let Some(form_of) = entry.form_of.as_deref() else {
                    continue;
                };
                if form_of.is_empty() {
                    continue;
                }

                let algorithm_chains: Vec<InflectionHypothesis> =
                    if deinflection.inflection_hypotheses.is_empty() {
                        vec![InflectionHypothesis {
                            source: InflectionSource::Algorithm,
                            inflections: Vec::new(),
                        }]
                    } else {
                        deinflection.inflection_hypotheses.clone()
                    };
                let dictionary_chains: Vec<Vec<String>> =
                    if entry.inflection_hypotheses.is_empty() {
                        vec![Vec::new()]
                    } else {
                        entry.inflection_hypotheses.clone()
                    };

                let mut hypotheses = Vec::new();
                for algorithm_chain in &algorithm_chains {
                    for dictionary_chain in &dictionary_chains {
                        let source = if algorithm_chain.inflections.is_empty() {
                            InflectionSource::Dictionary
                        } else {
                            InflectionSource::Both
                        };
                        let inflections: Vec<String> = algorithm_chain
                            .inflections
                            .iter()
                            .cloned()
                            .chain(dictionary_chain.iter().cloned())
                            .collect();
                        hypotheses.push(InflectionHypothesis {
                            source,
                            inflections,
                        });
                    }
                }

                let mut dictionary_deinflection = DatabaseDeinflection::new(
                    &deinflection.original_text,
                    &deinflection.transformed_text,
                    form_of,
                    Rules::NONE,
                    hypotheses,
                );
                dictionary_deinflection.is_dictionary_deinflection = true;
                dictionary_deinflections.push(dictionary_deinflection);
            }
        }

        self._add_entries_to_deinflections(&mut dictionary_deinflections, options)?;
        Ok(dictionary_deinflections)
    }

    /*************** entry construction ***************/

    /// Converts attached database rows into dictionary entries,
    /// deduplicating by row id. A later sighting of an id with a
    /// transformed text at least as long merges its hypotheses into the
    /// existing entry; a shorter sighting is discarded.
    fn _get_dictionary_entries(
        &self,
        deinflections: &[DatabaseDeinflection],
        options: &FindTermsOptions,
    ) -> Vec<TermDictionaryEntry> {
        let mut dictionary_entries: Vec<TermDictionaryEntry> = Vec::new();
        let mut ids: IndexSet<String> = IndexSet::new();

        for deinflection in deinflections {
            for database_entry in &deinflection.database_entries {
                if ids.insert(database_entry.id.clone()) {
                    dictionary_entries.push(self._create_term_dictionary_entry_from_database_entry(
                        database_entry,
                        &deinflection.original_text,
                        &deinflection.transformed_text,
                        &deinflection.deinflected_text,
                        deinflection.inflection_hypotheses.clone(),
                        true,
                        &options.enabled_dictionary_map,
                    ));
                    continue;
                }

                let Some(existing_index) =
                    Self::_find_existing_entry(&dictionary_entries, &database_entry.id)
                else {
                    continue;
                };
                let existing_transformed_length = dictionary_entries[existing_index]
                    .headwords
                    .first()
                    .and_then(|headword| headword.sources.first())
                    .map(|source| char_len(&source.transformed_text))
                    .unwrap_or(0);
                if char_len(&deinflection.transformed_text) < existing_transformed_length {
                    continue;
                }
                Self::_merge_inflection_hypotheses(
                    &mut dictionary_entries[existing_index],
                    &deinflection.inflection_hypotheses,
                );
            }
        }

        dictionary_entries
    }

    fn _find_existing_entry(
        dictionary_entries: &[TermDictionaryEntry],
        id: &str,
    ) -> Option<usize> {
        dictionary_entries.iter().position(|entry| {
            entry
                .definitions
                .iter()
                .any(|definition| definition.id == id)
        })
    }

    /// Hypothesis equality compares inflection names ignoring order; a
    /// duplicate observed from a different source promotes to `Both`.
    fn _merge_inflection_hypotheses(
        existing_entry: &mut TermDictionaryEntry,
        inflection_hypotheses: &[InflectionHypothesis],
    ) {
        for hypothesis in inflection_hypotheses {
            if let Some(duplicate) = existing_entry
                .inflection_hypotheses
                .iter_mut()
                .find(|existing| existing.same_inflections(&hypothesis.inflections))
            {
                duplicate.source = duplicate.source.combine(hypothesis.source);
            } else {
                existing_entry.inflection_hypotheses.push(hypothesis.clone());
            }
        }
    }

    /// Builds a term dictionary entry with exactly one headword and one
    /// definition from a database row.
    #[allow(clippy::too_many_arguments)]
    fn _create_term_dictionary_entry_from_database_entry(
        &self,
        database_entry: &TermEntry,
        original_text: &str,
        transformed_text: &str,
        deinflected_text: &str,
        inflection_hypotheses: Vec<InflectionHypothesis>,
        is_primary: bool,
        enabled_dictionary_map: &IndexMap<String, FindTermDictionary>,
    ) -> TermDictionaryEntry {
        let TermEntry {
            id,
            term,
            reading,
            dictionary,
            score,
            sequence,
            match_type,
            match_source,
            ..
        } = database_entry;

        let reading = if reading.is_empty() {
            term.clone()
        } else {
            reading.clone()
        };
        let (dictionary_index, dictionary_priority) =
            term_dictionary_order(dictionary, enabled_dictionary_map);
        let source_term_exact_match_count = usize::from(is_primary && deinflected_text == term);
        let max_transformed_text_length = char_len(transformed_text);

        let source = TermSource {
            original_text: original_text.to_string(),
            transformed_text: transformed_text.to_string(),
            deinflected_text: deinflected_text.to_string(),
            match_type: *match_type,
            match_source: *match_source,
            is_primary,
        };

        let headword_tag_groups = if database_entry.term_tags.is_empty() {
            Vec::new()
        } else {
            vec![TagGroup::new(dictionary, database_entry.term_tags.clone())]
        };
        let definition_tag_groups = if database_entry.definition_tags.is_empty() {
            Vec::new()
        } else {
            vec![TagGroup::new(dictionary, database_entry.definition_tags.clone())]
        };

        let headwords = vec![TermHeadword {
            index: 0,
            term: term.clone(),
            reading,
            sources: vec![source],
            tag_groups: headword_tag_groups,
            tags: Vec::new(),
            word_classes: database_entry.word_classes.clone(),
        }];
        let definitions = vec![TermDefinition {
            index: 0,
            headword_indices: vec![0],
            dictionary: dictionary.clone(),
            dictionary_index,
            dictionary_priority,
            id: id.clone(),
            score: *score,
            frequency_order: 0,
            sequences: vec![*sequence],
            is_primary,
            tag_groups: definition_tag_groups,
            tags: Vec::new(),
            entries: database_entry.glossary.clone(),
        }];

        TermDictionaryEntry {
            is_primary,
            inflection_hypotheses,
            score: *score,
            frequency_order: 0,
            dictionary_index,
            dictionary_priority,
            source_term_exact_match_count,
            max_transformed_text_length,
            headwords,
            definitions,
            pronunciations: Vec::new(),
            frequencies: Vec::new(),
        }
    }

    /*************** definition exclusion ***************/

    fn _remove_excluded_definitions(
        dictionary_entries: &mut Vec<TermDictionaryEntry>,
        excluded: &IndexSet<String>,
    ) {
        dictionary_entries.retain_mut(|entry| {
            entry
                .definitions
                .retain(|definition| !excluded.contains(&definition.dictionary));
            if entry.definitions.is_empty() {
                return false;
            }
            entry
                .pronunciations
                .retain(|pronunciation| !excluded.contains(&pronunciation.dictionary));
            entry
                .frequencies
                .retain(|frequency| !excluded.contains(&frequency.dictionary));
            for headword in &mut entry.headwords {
                headword
                    .tag_groups
                    .retain(|group| !excluded.contains(&group.dictionary));
            }
            Self::_remove_unused_headwords(entry);
            for (index, definition) in entry.definitions.iter_mut().enumerate() {
                definition.index = index;
            }
            for (index, pronunciation) in entry.pronunciations.iter_mut().enumerate() {
                pronunciation.index = index;
            }
            for (index, frequency) in entry.frequencies.iter_mut().enumerate() {
                frequency.index = index;
            }
            true
        });
    }

    /// Drops headwords no remaining definition refers to, remapping every
    /// headword index in the entry.
    fn _remove_unused_headwords(entry: &mut TermDictionaryEntry) {
        let used: IndexSet<usize> = entry
            .definitions
            .iter()
            .flat_map(|definition| definition.headword_indices.iter().copied())
            .collect();
        if used.len() == entry.headwords.len() {
            return;
        }

        let mut remap: Vec<Option<usize>> = vec![None; entry.headwords.len()];
        let mut next_index = 0;
        for (old_index, slot) in remap.iter_mut().enumerate() {
            if used.contains(&old_index) {
                *slot = Some(next_index);
                next_index += 1;
            }
        }

        let mut old_index = 0;
        entry.headwords.retain(|_| {
            let keep = remap[old_index].is_some();
            old_index += 1;
            keep
        });
        for (index, headword) in entry.headwords.iter_mut().enumerate() {
            headword.index = index;
        }

        for definition in &mut entry.definitions {
            definition.headword_indices = definition
                .headword_indices
                .iter()
                .filter_map(|&index| remap[index])
                .collect();
            definition.headword_indices.sort_unstable();
            definition.headword_indices.dedup();
        }
        entry
            .pronunciations
            .retain(|pronunciation| remap[pronunciation.headword_index].is_some());
        for pronunciation in &mut entry.pronunciations {
            pronunciation.headword_index =
                remap[pronunciation.headword_index].expect("retained pronunciation headword");
        }
        entry
            .frequencies
            .retain(|frequency| remap[frequency.headword_index].is_some());
        for frequency in &mut entry.frequencies {
            frequency.headword_index =
                remap[frequency.headword_index].expect("retained frequency headword");
        }
    }

    fn _clear_term_tag_groups(dictionary_entries: &mut [TermDictionaryEntry]) {
        for entry in dictionary_entries {
            for headword in &mut entry.headwords {
                headword.tag_groups.clear();
            }
            for definition in &mut entry.definitions {
                definition.tag_groups.clear();
            }
        }
    }
}

/*************** free helpers ***************/

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The prefix of `text` holding its first `char_count` chars.
pub(crate) fn char_prefix(text: &str, char_count: usize) -> &str {
    match text.char_indices().nth(char_count) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Structural grouping key: the JSON serialization of the key tuple.
pub(crate) fn map_key(value: &impl Serialize) -> String {
    serde_json::to_string(value).expect("grouping key serialization")
}

/// Initial portion of a string containing only Japanese characters.
fn japanese_only_prefix(text: &str) -> &str {
    for (byte_index, c) in text.char_indices() {
        if !is_code_point_japanese(c as u32) {
            return &text[..byte_index];
        }
    }
    text
}

/// Position of the next source end for the prefix scan. `Word` resolution
/// jumps to the end of the previous word; `Letter` drops one char.
fn next_substring(search_resolution: SearchResolution, current: &str) -> String {
    if search_resolution == SearchResolution::Word {
        let end = match GET_NEXT_SUBSTRING_PATTERN.find(current) {
            Ok(Some(found)) => found.start(),
            _ => 0,
        };
        return current[..end].to_string();
    }
    let mut chars = current.chars();
    chars.next_back();
    chars.as_str().to_string()
}

pub(crate) fn term_dictionary_order(
    dictionary: &str,
    enabled_dictionary_map: &IndexMap<String, FindTermDictionary>,
) -> (usize, i64) {
    match enabled_dictionary_map.get(dictionary) {
        Some(details) => (details.index, details.priority),
        None => (enabled_dictionary_map.len(), 0),
    }
}

pub(crate) fn kanji_dictionary_order(
    dictionary: &str,
    enabled_dictionary_map: &IndexMap<String, FindKanjiDictionary>,
) -> (usize, i64) {
    match enabled_dictionary_map.get(dictionary) {
        Some(details) => (details.index, details.priority),
        None => (enabled_dictionary_map.len(), 0),
    }
}

pub(crate) fn count_source_term_exact_matches(headwords: &[TermHeadword]) -> usize {
    headwords
        .iter()
        .filter(|headword| {
            headword.sources.iter().any(|source| {
                source.is_primary && source.match_source == TermSourceMatchSource::Term
            })
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_substring_letter_drops_one_char() {
        assert_eq!(next_substring(SearchResolution::Letter, "食べた"), "食べ");
        assert_eq!(next_substring(SearchResolution::Letter, "a"), "");
    }

    #[test]
    fn next_substring_word_jumps_to_word_boundary() {
        assert_eq!(next_substring(SearchResolution::Word, "out of"), "out");
        assert_eq!(next_substring(SearchResolution::Word, "word"), "");
    }

    #[test]
    fn japanese_prefix_truncates_at_first_foreign_char() {
        assert_eq!(japanese_only_prefix("食べたabc"), "食べた");
        assert_eq!(japanese_only_prefix("abc"), "");
    }

    #[test]
    fn char_prefix_clamps() {
        assert_eq!(char_prefix("食べた", 2), "食べ");
        assert_eq!(char_prefix("食べた", 10), "食べた");
    }
}
