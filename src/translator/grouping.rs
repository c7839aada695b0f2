use indexmap::{IndexMap, IndexSet};

use super::{count_source_term_exact_matches, map_key, Translator};
use crate::database::{DictionaryDatabase, SequenceQuery, TermExactRequest};
use crate::dictionary::{
    InflectionHypothesis, TagGroup, TermDefinition, TermDictionaryEntry, TermHeadword, TermSource,
};
use crate::errors::Result;
use crate::language::languages::get_language_descriptor;
use crate::translation::FindTermsOptions;

#[derive(Default)]
struct DictionaryEntryGroup {
    ids: IndexSet<String>,
    dictionary_entries: Vec<TermDictionaryEntry>,
}

fn normalized_reading(reading_normalizer: Option<fn(&str) -> String>, reading: &str) -> String {
    match reading_normalizer {
        Some(normalize) => normalize(reading),
        None => reading.to_string(),
    }
}

fn add_unique_strings(list: &mut Vec<String>, new_items: &[String]) {
    for item in new_items {
        if !list.contains(item) {
            list.push(item.clone());
        }
    }
}

fn add_unique_sequences(list: &mut Vec<i64>, new_items: &[i64]) {
    for &item in new_items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}

/// Unions tag groups by dictionary, keeping tag names unique per group.
fn merge_tag_groups(target: &mut Vec<TagGroup>, source: &[TagGroup]) {
    for group in source {
        match target
            .iter_mut()
            .find(|existing| existing.dictionary == group.dictionary)
        {
            Some(existing) => add_unique_strings(&mut existing.tag_names, &group.tag_names),
            None => target.push(group.clone()),
        }
    }
}

/// Sorted-unique insertion via binary search.
fn add_unique_headword_index(headword_indices: &mut Vec<usize>, headword_index: usize) {
    if let Err(position) = headword_indices.binary_search(&headword_index) {
        headword_indices.insert(position, headword_index);
    }
}

fn add_unique_sources(sources: &mut Vec<TermSource>, new_sources: &[TermSource]) {
    for new_source in new_sources {
        let existing = sources.iter_mut().find(|source| {
            source.original_text == new_source.original_text
                && source.transformed_text == new_source.transformed_text
                && source.deinflected_text == new_source.deinflected_text
                && source.match_type == new_source.match_type
                && source.match_source == new_source.match_source
        });
        match existing {
            Some(source) => source.is_primary |= new_source.is_primary,
            None => sources.push(new_source.clone()),
        }
    }
}

impl<D: DictionaryDatabase> Translator<D> {
    /// Folds entries sharing a `(term, reading, inflection hypotheses)`
    /// key into grouped entries. Secondary definition dedup is off here;
    /// raw entries never carry duplicate definitions.
    pub(super) fn _group_dictionary_entries_by_headword(
        &self,
        language: &str,
        dictionary_entries: &[TermDictionaryEntry],
    ) -> Vec<TermDictionaryEntry> {
        let reading_normalizer = get_language_descriptor(language).reading_normalizer;
        let mut groups: IndexMap<String, Vec<&TermDictionaryEntry>> = IndexMap::new();
        for dictionary_entry in dictionary_entries {
            let headword = dictionary_entry
                .headwords
                .first()
                .expect("dictionary entry has at least one headword");
            let reading = normalized_reading(reading_normalizer, &headword.reading);
            let key = map_key(&(
                &headword.term,
                &reading,
                &dictionary_entry.inflection_hypotheses,
            ));
            groups.entry(key).or_default().push(dictionary_entry);
        }

        groups
            .values()
            .map(|group| self._create_grouped_dictionary_entry(language, group, false))
            .collect()
    }

    /// Merges a group of entries into one: shared headwords keyed by
    /// `(term, reading)`, aggregated scores and priorities, definitions
    /// optionally deduplicated by `(dictionary, entries)` payload.
    pub(super) fn _create_grouped_dictionary_entry(
        &self,
        language: &str,
        dictionary_entries: &[&TermDictionaryEntry],
        mut check_duplicate_definitions: bool,
    ) -> TermDictionaryEntry {
        let reading_normalizer = get_language_descriptor(language).reading_normalizer;

        // Headwords are merged before anything else so definition
        // headword indices can be remapped entry by entry.
        let mut headwords: IndexMap<String, TermHeadword> = IndexMap::new();
        let headword_index_maps: Vec<Vec<usize>> = dictionary_entries
            .iter()
            .map(|entry| Self::_add_term_headwords(&mut headwords, &entry.headwords, reading_normalizer))
            .collect();

        if dictionary_entries.len() <= 1 {
            check_duplicate_definitions = false;
        }

        let mut score = i64::MIN;
        let mut dictionary_index = usize::MAX;
        let mut dictionary_priority = i64::MIN;
        let mut max_transformed_text_length = 0;
        let mut is_primary = false;
        let mut definitions: Vec<TermDefinition> = Vec::new();
        let mut definitions_map: Option<IndexMap<String, usize>> = if check_duplicate_definitions {
            Some(IndexMap::new())
        } else {
            None
        };
        let mut inflections: Option<&Vec<InflectionHypothesis>> = None;

        for (dictionary_entry, headword_index_map) in
            dictionary_entries.iter().zip(&headword_index_maps)
        {
            score = score.max(dictionary_entry.score);
            dictionary_index = dictionary_index.min(dictionary_entry.dictionary_index);
            dictionary_priority = dictionary_priority.max(dictionary_entry.dictionary_priority);

            if dictionary_entry.is_primary {
                is_primary = true;
                max_transformed_text_length =
                    max_transformed_text_length.max(dictionary_entry.max_transformed_text_length);
                let entry_inflections = &dictionary_entry.inflection_hypotheses;
                if inflections.is_none_or(|current| entry_inflections.len() < current.len()) {
                    inflections = Some(entry_inflections);
                }
            }

            match definitions_map.as_mut() {
                Some(map) => Self::_add_term_definitions(
                    &mut definitions,
                    map,
                    &dictionary_entry.definitions,
                    headword_index_map,
                ),
                None => Self::_add_term_definitions_fast(
                    &mut definitions,
                    &dictionary_entry.definitions,
                    headword_index_map,
                ),
            }
        }

        let headwords: Vec<TermHeadword> = headwords.into_values().collect();
        let source_term_exact_match_count = count_source_term_exact_matches(&headwords);

        TermDictionaryEntry {
            is_primary,
            inflection_hypotheses: inflections.cloned().unwrap_or_default(),
            score,
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

    /// Adds an entry's headwords into the shared map and returns the
    /// old-index → shared-index mapping for that entry.
    fn _add_term_headwords(
        headwords_map: &mut IndexMap<String, TermHeadword>,
        headwords: &[TermHeadword],
        reading_normalizer: Option<fn(&str) -> String>,
    ) -> Vec<usize> {
        headwords
            .iter()
            .map(|headword| {
                let reading = normalized_reading(reading_normalizer, &headword.reading);
                let key = map_key(&(&headword.term, &reading));
                let next_index = headwords_map.len();
                let shared = headwords_map.entry(key).or_insert_with(|| TermHeadword {
                    index: next_index,
                    term: headword.term.clone(),
                    reading: headword.reading.clone(),
                    sources: Vec::new(),
                    tag_groups: Vec::new(),
                    tags: Vec::new(),
                    word_classes: Vec::new(),
                });
                add_unique_sources(&mut shared.sources, &headword.sources);
                add_unique_strings(&mut shared.word_classes, &headword.word_classes);
                merge_tag_groups(&mut shared.tag_groups, &headword.tag_groups);
                shared.index
            })
            .collect()
    }

    fn _add_term_definitions_fast(
        definitions: &mut Vec<TermDefinition>,
        new_definitions: &[TermDefinition],
        headword_index_map: &[usize],
    ) {
        for new_definition in new_definitions {
            let mut definition = new_definition.clone();
            definition.index = definitions.len();
            definition.headword_indices = new_definition
                .headword_indices
                .iter()
                .map(|&index| headword_index_map[index])
                .collect();
            definition.headword_indices.sort_unstable();
            definitions.push(definition);
        }
    }

    /// Dedup variant: definitions sharing a `(dictionary, entries)`
    /// payload key are merged instead of appended.
    fn _add_term_definitions(
        definitions: &mut Vec<TermDefinition>,
        definitions_map: &mut IndexMap<String, usize>,
        new_definitions: &[TermDefinition],
        headword_index_map: &[usize],
    ) {
        for new_definition in new_definitions {
            let key = map_key(&(&new_definition.dictionary, &new_definition.entries));
            let position = match definitions_map.get(&key) {
                Some(&position) => {
                    let existing = &mut definitions[position];
                    existing.is_primary |= new_definition.is_primary;
                    add_unique_sequences(&mut existing.sequences, &new_definition.sequences);
                    merge_tag_groups(&mut existing.tag_groups, &new_definition.tag_groups);
                    position
                }
                None => {
                    let position = definitions.len();
                    let mut definition = new_definition.clone();
                    definition.index = position;
                    definition.headword_indices = Vec::new();
                    definitions.push(definition);
                    definitions_map.insert(key, position);
                    position
                }
            };
            let headword_indices = &mut definitions[position].headword_indices;
            for &headword_index in &new_definition.headword_indices {
                add_unique_headword_index(headword_indices, headword_index_map[headword_index]);
            }
        }
    }

    /*************** merge mode ***************/

    /// Merges entries across dictionaries by main-dictionary sequence:
    /// grouped entries pull in the full sequence from the database,
    /// absorb ungrouped entries sharing a headword, and optionally pull
    /// related entries out of secondary-search dictionaries. Whatever
    /// remains ungrouped is grouped by headword and appended.
    pub(super) fn _get_related_dictionary_entries(
        &self,
        dictionary_entries: Vec<TermDictionaryEntry>,
        options: &FindTermsOptions,
    ) -> Result<Vec<TermDictionaryEntry>> {
        let main_dictionary = &options.main_dictionary;
        let language = &options.language;

        let mut groups: IndexMap<i64, DictionaryEntryGroup> = IndexMap::new();
        let mut ungrouped: IndexMap<String, TermDictionaryEntry> = IndexMap::new();
        for dictionary_entry in dictionary_entries {
            let definition = dictionary_entry
                .definitions
                .first()
                .expect("raw dictionary entry has one definition");
            let sequence = definition.sequences[0];
            if definition.dictionary == *main_dictionary && sequence >= 0 {
                let group = groups.entry(sequence).or_default();
                group.ids.insert(definition.id.clone());
                group.dictionary_entries.push(dictionary_entry);
            } else {
                ungrouped.insert(definition.id.clone(), dictionary_entry);
            }
        }

        if !groups.is_empty() {
            self._add_related_dictionary_entries(&mut groups, options)?;
        }
        if !ungrouped.is_empty() {
            Self::_absorb_ungrouped_by_headword(&mut groups, &mut ungrouped);
        }
        if !ungrouped.is_empty() {
            self._add_secondary_related_dictionary_entries(&mut groups, &mut ungrouped, options)?;
        }

        let mut results = Vec::with_capacity(groups.len());
        for group in groups.values_mut() {
            group
                .dictionary_entries
                .sort_by(|a, b| a.definitions[0].id.cmp(&b.definitions[0].id));
            let members: Vec<&TermDictionaryEntry> = group.dictionary_entries.iter().collect();
            results.push(self._create_grouped_dictionary_entry(language, &members, true));
        }

        if !ungrouped.is_empty() {
            let leftovers: Vec<TermDictionaryEntry> = ungrouped.into_values().collect();
            results.extend(self._group_dictionary_entries_by_headword(language, &leftovers));
        }

        Ok(results)
    }

    /// Pulls every entry of each grouped sequence out of the main
    /// dictionary and adds the ones not already present as non-primary
    /// members.
    fn _add_related_dictionary_entries(
        &self,
        groups: &mut IndexMap<i64, DictionaryEntryGroup>,
        options: &FindTermsOptions,
    ) -> Result<()> {
        let queries: Vec<SequenceQuery> = groups
            .keys()
            .map(|&sequence| SequenceQuery {
                sequence,
                dictionary: options.main_dictionary.clone(),
            })
            .collect();
        let database_entries = self.db.find_terms_by_sequence_bulk(&queries)?;

        for database_entry in database_entries {
            let (_, group) = groups
                .get_index_mut(database_entry.index)
                .expect("sequence result index within query batch");
            if group.ids.contains(&database_entry.id) {
                continue;
            }
            let term = database_entry.term.clone();
            let dictionary_entry = self._create_term_dictionary_entry_from_database_entry(
                &database_entry,
                &term,
                &term,
                &term,
                Vec::new(),
                false,
                &options.enabled_dictionary_map,
            );
            group.ids.insert(database_entry.id);
            group.dictionary_entries.push(dictionary_entry);
        }
        Ok(())
    }

    /// Moves ungrouped entries into any group containing a headword with
    /// the same `(term, reading)`.
    fn _absorb_ungrouped_by_headword(
        groups: &mut IndexMap<i64, DictionaryEntryGroup>,
        ungrouped: &mut IndexMap<String, TermDictionaryEntry>,
    ) {
        for group in groups.values_mut() {
            let keys: IndexSet<(String, String)> = group
                .dictionary_entries
                .iter()
                .flat_map(|entry| {
                    entry
                        .headwords
                        .iter()
                        .map(|headword| (headword.term.clone(), headword.reading.clone()))
                })
                .collect();

            let matching_ids: Vec<String> = ungrouped
                .iter()
                .filter(|(_, entry)| {
                    entry.headwords.iter().any(|headword| {
                        keys.contains(&(headword.term.clone(), headword.reading.clone()))
                    })
                })
                .map(|(id, _)| id.clone())
                .collect();
            for id in matching_ids {
                if let Some(entry) = ungrouped.shift_remove(&id) {
                    group.ids.insert(id);
                    group.dictionary_entries.push(entry);
                }
            }
        }
    }

    /// Exact `(term, reading)` lookups against secondary-search
    /// dictionaries; results join their headword's groups as non-primary
    /// members, absorbing matching ungrouped entries along the way.
    fn _add_secondary_related_dictionary_entries(
        &self,
        groups: &mut IndexMap<i64, DictionaryEntryGroup>,
        ungrouped: &mut IndexMap<String, TermDictionaryEntry>,
        options: &FindTermsOptions,
    ) -> Result<()> {
        let secondary_dictionaries: IndexSet<String> = options
            .enabled_dictionary_map
            .iter()
            .filter(|(_, details)| details.allow_secondary_searches)
            .map(|(name, _)| name.clone())
            .collect();
        if secondary_dictionaries.is_empty() {
            return Ok(());
        }

        let mut requests: Vec<TermExactRequest> = Vec::new();
        let mut request_groups: Vec<usize> = Vec::new();
        let mut seen: IndexSet<(usize, String, String)> = IndexSet::new();
        for (group_index, group) in groups.values().enumerate() {
            for entry in &group.dictionary_entries {
                for headword in &entry.headwords {
                    if seen.insert((
                        group_index,
                        headword.term.clone(),
                        headword.reading.clone(),
                    )) {
                        requests.push(TermExactRequest {
                            term: headword.term.clone(),
                            reading: headword.reading.clone(),
                        });
                        request_groups.push(group_index);
                    }
                }
            }
        }
        if requests.is_empty() {
            return Ok(());
        }

        let database_entries = self
            .db
            .find_terms_exact_bulk(&requests, &secondary_dictionaries)?;
        for database_entry in database_entries {
            let group_index = request_groups[database_entry.index];
            let (_, group) = groups
                .get_index_mut(group_index)
                .expect("secondary result maps to a known group");
            if group.ids.contains(&database_entry.id) {
                continue;
            }
            let dictionary_entry = match ungrouped.shift_remove(&database_entry.id) {
                Some(entry) => entry,
                None => {
                    let term = database_entry.term.clone();
                    self._create_term_dictionary_entry_from_database_entry(
                        &database_entry,
                        &term,
                        &term,
                        &term,
                        Vec::new(),
                        false,
                        &options.enabled_dictionary_map,
                    )
                }
            };
            group.ids.insert(database_entry.id);
            group.dictionary_entries.push(dictionary_entry);
        }
        Ok(())
    }
}
