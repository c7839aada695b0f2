use indexmap::{IndexMap, IndexSet};

use super::{term_dictionary_order, Translator};
use crate::database::{DictionaryDatabase, TagEntry, TagQuery};
use crate::dictionary::{
    PhoneticTranscription, PitchAccent, Pronunciation, Tag, TagGroup, TermDictionaryEntry,
    TermFrequency, TermFrequencySimple, TermPronunciation, TermReadingItem,
};
use crate::dictionary_data::{
    GenericFrequencyData, MoraPositions, TermMetaData, TermMetaFrequencyData,
};
use crate::errors::Result;
use crate::translation::TermEnabledDictionaryMap;

/// Tag records are looked up by the tag name truncated at the first `:`;
/// the produced tag keeps the full name.
pub(super) fn tag_query_text(tag_name: &str) -> String {
    tag_name
        .split(':')
        .next()
        .unwrap_or(tag_name)
        .to_string()
}

/// Same `(name, category)` merges: order takes the minimum, score the
/// maximum, dictionaries and content append uniquely.
fn merge_similar_tags(tags: &mut Vec<Tag>) {
    let mut merged: Vec<Tag> = Vec::new();
    for tag in tags.drain(..) {
        match merged
            .iter_mut()
            .find(|existing| existing.name == tag.name && existing.category == tag.category)
        {
            Some(existing) => {
                existing.order = existing.order.min(tag.order);
                existing.score = existing.score.max(tag.score);
                for dictionary in tag.dictionaries {
                    if !existing.dictionaries.contains(&dictionary) {
                        existing.dictionaries.push(dictionary);
                    }
                }
                for content in tag.content {
                    if !existing.content.contains(&content) {
                        existing.content.push(content);
                    }
                }
            }
            None => merged.push(tag),
        }
    }
    *tags = merged;
}

fn collect_tag_queries(tag_groups: &[TagGroup], queries: &mut IndexSet<TagQuery>) {
    for group in tag_groups {
        for name in &group.tag_names {
            queries.insert(TagQuery {
                query: tag_query_text(name),
                dictionary: group.dictionary.clone(),
            });
        }
    }
}

impl<D: DictionaryDatabase> Translator<D> {
    /*************** frequency / pitch / IPA ***************/

    /// Attaches frequency, pitch-accent, and IPA metadata to every
    /// headword it applies to. Reading-scoped metadata only applies to
    /// headwords with the matching reading.
    pub(super) fn _add_term_meta(
        &self,
        dictionary_entries: &mut [TermDictionaryEntry],
        enabled_dictionary_map: &TermEnabledDictionaryMap,
    ) -> Result<()> {
        let mut targets: IndexMap<String, Vec<(usize, usize)>> = IndexMap::new();
        for (entry_index, entry) in dictionary_entries.iter().enumerate() {
            for (headword_index, headword) in entry.headwords.iter().enumerate() {
                targets
                    .entry(headword.term.clone())
                    .or_default()
                    .push((entry_index, headword_index));
            }
        }
        if targets.is_empty() {
            return Ok(());
        }
        let term_list: Vec<String> = targets.keys().cloned().collect();
        let metas = self.db.find_term_meta_bulk(&term_list, enabled_dictionary_map)?;
        log::debug!("term meta: {} rows for {} terms", metas.len(), term_list.len());

        for meta in metas {
            let Some((_, slots)) = targets.get_index(meta.index) else {
                continue;
            };
            let (dictionary_index, dictionary_priority) =
                term_dictionary_order(&meta.dictionary, enabled_dictionary_map);

            match &meta.data {
                TermMetaData::Frequency(data) => {
                    for &(entry_index, headword_index) in slots {
                        let headword_reading =
                            dictionary_entries[entry_index].headwords[headword_index]
                                .reading
                                .clone();
                        let (has_reading, frequency_data) = match data {
                            TermMetaFrequencyData::WithReading { reading, frequency } => {
                                if *reading != headword_reading {
                                    continue;
                                }
                                (true, frequency)
                            }
                            TermMetaFrequencyData::Generic(value) => (false, value),
                        };
                        let (frequency, display_value, display_value_parsed) =
                            self.convert_frequency_value(frequency_data);
                        let entry = &mut dictionary_entries[entry_index];
                        entry.frequencies.push(TermFrequency {
                            index: entry.frequencies.len(),
                            headword_index,
                            dictionary: meta.dictionary.clone(),
                            dictionary_index,
                            dictionary_priority,
                            has_reading,
                            frequency,
                            display_value,
                            display_value_parsed,
                        });
                    }
                }
                TermMetaData::Pitch(data) => {
                    for &(entry_index, headword_index) in slots {
                        if dictionary_entries[entry_index].headwords[headword_index].reading
                            != data.reading
                        {
                            continue;
                        }
                        let pronunciations: Vec<Pronunciation> = data
                            .pitches
                            .iter()
                            .map(|pitch| {
                                let tag_groups = match &pitch.tags {
                                    Some(tags) if !tags.is_empty() => {
                                        vec![TagGroup::new(&meta.dictionary, tags.clone())]
                                    }
                                    _ => Vec::new(),
                                };
                                Pronunciation::PitchAccent(PitchAccent {
                                    position: pitch.position,
                                    nasal_positions: pitch
                                        .nasal
                                        .as_ref()
                                        .map(MoraPositions::to_vec)
                                        .unwrap_or_default(),
                                    devoice_positions: pitch
                                        .devoice
                                        .as_ref()
                                        .map(MoraPositions::to_vec)
                                        .unwrap_or_default(),
                                    tag_groups,
                                    tags: Vec::new(),
                                })
                            })
                            .collect();
                        let entry = &mut dictionary_entries[entry_index];
                        entry.pronunciations.push(TermPronunciation {
                            index: entry.pronunciations.len(),
                            headword_index,
                            dictionary: meta.dictionary.clone(),
                            dictionary_index,
                            dictionary_priority,
                            pronunciations,
                        });
                    }
                }
                TermMetaData::Phonetic(data) => {
                    for &(entry_index, headword_index) in slots {
                        if dictionary_entries[entry_index].headwords[headword_index].reading
                            != data.reading
                        {
                            continue;
                        }
                        let pronunciations: Vec<Pronunciation> = data
                            .transcriptions
                            .iter()
                            .map(|transcription| {
                                let tag_groups = match &transcription.tags {
                                    Some(tags) if !tags.is_empty() => {
                                        vec![TagGroup::new(&meta.dictionary, tags.clone())]
                                    }
                                    _ => Vec::new(),
                                };
                                Pronunciation::PhoneticTranscription(PhoneticTranscription {
                                    ipa: transcription.ipa.clone(),
                                    tag_groups,
                                    tags: Vec::new(),
                                })
                            })
                            .collect();
                        let entry = &mut dictionary_entries[entry_index];
                        entry.pronunciations.push(TermPronunciation {
                            index: entry.pronunciations.len(),
                            headword_index,
                            dictionary: meta.dictionary.clone(),
                            dictionary_index,
                            dictionary_priority,
                            pronunciations,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Turns a raw frequency payload into the comparable value plus the
    /// display form; purely numeric display strings parse back into the
    /// value.
    pub(super) fn convert_frequency_value(
        &self,
        data: &GenericFrequencyData,
    ) -> (i64, Option<String>, bool) {
        match data {
            GenericFrequencyData::Number(value) => (*value, None, false),
            GenericFrequencyData::Text(text) => match self.parse_number(text) {
                Some(value) => (value, Some(text.clone()), true),
                None => (0, Some(text.clone()), false),
            },
            GenericFrequencyData::Detailed {
                value,
                display_value,
            } => (*value, display_value.clone(), false),
        }
    }

    fn parse_number(&self, text: &str) -> Option<i64> {
        let found = self.number_pattern.find(text).ok().flatten()?;
        let digits = found.as_str();
        digits
            .parse::<i64>()
            .ok()
            .or_else(|| digits.parse::<f64>().ok().map(|value| value as i64))
    }

    /*************** tag expansion ***************/

    /// Expands every tag group in the entries into merged, sorted [`Tag`]
    /// records, reading tag metadata through the cache.
    pub(super) fn _expand_term_tag_groups(
        &self,
        dictionary_entries: &mut [TermDictionaryEntry],
    ) -> Result<()> {
        let mut queries: IndexSet<TagQuery> = IndexSet::new();
        for entry in dictionary_entries.iter() {
            for headword in &entry.headwords {
                collect_tag_queries(&headword.tag_groups, &mut queries);
            }
            for definition in &entry.definitions {
                collect_tag_queries(&definition.tag_groups, &mut queries);
            }
            for pronunciation in &entry.pronunciations {
                for item in &pronunciation.pronunciations {
                    match item {
                        Pronunciation::PitchAccent(pitch) => {
                            collect_tag_queries(&pitch.tag_groups, &mut queries)
                        }
                        Pronunciation::PhoneticTranscription(transcription) => {
                            collect_tag_queries(&transcription.tag_groups, &mut queries)
                        }
                    }
                }
            }
        }
        if queries.is_empty() {
            return Ok(());
        }

        let lookup = self._get_tag_records(queries)?;
        for entry in dictionary_entries.iter_mut() {
            for headword in &mut entry.headwords {
                headword.tags = self.build_tags(&headword.tag_groups, &lookup);
            }
            for definition in &mut entry.definitions {
                definition.tags = self.build_tags(&definition.tag_groups, &lookup);
            }
            for pronunciation in &mut entry.pronunciations {
                for item in &mut pronunciation.pronunciations {
                    match item {
                        Pronunciation::PitchAccent(pitch) => {
                            pitch.tags = self.build_tags(&pitch.tag_groups, &lookup);
                        }
                        Pronunciation::PhoneticTranscription(transcription) => {
                            transcription.tags =
                                self.build_tags(&transcription.tag_groups, &lookup);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves tag queries through the cache, batching the misses into a
    /// single database read.
    pub(super) fn _get_tag_records(
        &self,
        queries: IndexSet<TagQuery>,
    ) -> Result<IndexMap<TagQuery, Option<TagEntry>>> {
        let mut lookup: IndexMap<TagQuery, Option<TagEntry>> = IndexMap::new();
        let mut missing: Vec<TagQuery> = Vec::new();
        {
            let cache = self.tag_cache.lock();
            for query in queries {
                match cache
                    .get(&query.dictionary)
                    .and_then(|dictionary_cache| dictionary_cache.get(&query.query))
                {
                    Some(record) => {
                        lookup.insert(query, record.clone());
                    }
                    None => missing.push(query),
                }
            }
        }

        if !missing.is_empty() {
            // Racing calls may query the same missing keys; the store is
            // deterministic and these writes are idempotent.
            let records = self.db.find_tag_meta_bulk(&missing)?;
            let mut cache = self.tag_cache.lock();
            for (query, record) in missing.into_iter().zip(records) {
                cache
                    .entry(query.dictionary.clone())
                    .or_default()
                    .insert(query.query.clone(), record.clone());
                lookup.insert(query, record);
            }
        }
        Ok(lookup)
    }

    /// Builds the expanded tag list for one slot. A missing tag record is
    /// not an error; the tag falls back to the default category.
    pub(super) fn build_tags(
        &self,
        tag_groups: &[TagGroup],
        lookup: &IndexMap<TagQuery, Option<TagEntry>>,
    ) -> Vec<Tag> {
        let mut tags: Vec<Tag> = Vec::new();
        for group in tag_groups {
            for name in &group.tag_names {
                let query = TagQuery {
                    query: tag_query_text(name),
                    dictionary: group.dictionary.clone(),
                };
                let record = lookup.get(&query).and_then(Option::as_ref);
                tags.push(match record {
                    Some(record) => Tag {
                        name: name.clone(),
                        category: record.category.clone(),
                        order: record.order,
                        score: record.score,
                        content: if record.notes.is_empty() {
                            Vec::new()
                        } else {
                            vec![record.notes.clone()]
                        },
                        dictionaries: vec![group.dictionary.clone()],
                        redundant: false,
                    },
                    None => Tag {
                        name: name.clone(),
                        category: "default".to_string(),
                        order: 0,
                        score: 0,
                        content: Vec::new(),
                        dictionaries: vec![group.dictionary.clone()],
                        redundant: false,
                    },
                });
            }
        }
        merge_similar_tags(&mut tags);
        self.sort_tags(&mut tags);
        tags
    }

    pub(super) fn sort_tags(&self, tags: &mut [Tag]) {
        tags.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| self.string_comparer.compare(&a.name, &b.name))
        });
    }

    /*************** standalone frequency lookup ***************/

    /// Frequency facts for `(term, reading?)` items, outside any entry
    /// assembly. An item without a reading accepts reading-scoped data
    /// and reports the data's reading back.
    pub fn get_term_frequencies(
        &self,
        items: &[TermReadingItem],
        dictionaries: &[String],
    ) -> Result<Vec<TermFrequencySimple>> {
        let dictionary_set: IndexSet<String> = dictionaries.iter().cloned().collect();
        let term_list: Vec<String> = items.iter().map(|item| item.term.clone()).collect();
        let metas = self.db.find_term_meta_bulk(&term_list, &dictionary_set)?;

        let mut results = Vec::new();
        for meta in metas {
            let TermMetaData::Frequency(data) = &meta.data else {
                continue;
            };
            let item = &items[meta.index];
            let mut reading = item.reading.clone();
            let (has_reading, frequency_data) = match data {
                TermMetaFrequencyData::WithReading {
                    reading: data_reading,
                    frequency,
                } => {
                    match &reading {
                        Some(item_reading) if item_reading != data_reading => continue,
                        Some(_) => {}
                        None => reading = Some(data_reading.clone()),
                    }
                    (true, frequency)
                }
                TermMetaFrequencyData::Generic(value) => (false, value),
            };
            let (frequency, display_value, display_value_parsed) =
                self.convert_frequency_value(frequency_data);
            results.push(TermFrequencySimple {
                term: item.term.clone(),
                reading,
                dictionary: meta.dictionary,
                has_reading,
                frequency,
                display_value,
                display_value_parsed,
            });
        }
        Ok(results)
    }
}
