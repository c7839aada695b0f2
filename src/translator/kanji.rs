use indexmap::{IndexMap, IndexSet};
use unicode_segmentation::UnicodeSegmentation;

use super::metadata::tag_query_text;
use super::{kanji_dictionary_order, sorting, Translator};
use crate::database::{DictionaryDatabase, KanjiEntry, TagEntry, TagQuery};
use crate::dictionary::{KanjiDictionaryEntry, KanjiFrequency, KanjiStat, KanjiStatGroups, TagGroup};
use crate::errors::Result;
use crate::language::ja::japanese::is_code_point_japanese;
use crate::translation::FindKanjiOptions;

impl<D: DictionaryDatabase> Translator<D> {
    /// Finds kanji dictionary entries for the characters of `text`.
    ///
    /// Characters are deduplicated before the bulk query; hits come back
    /// in batch order with tags, stats, and frequency metadata expanded.
    pub fn find_kanji(
        &self,
        text: &str,
        options: &FindKanjiOptions,
    ) -> Result<Vec<KanjiDictionaryEntry>> {
        let mut text = text.to_string();
        if options.remove_non_japanese_characters {
            text = text
                .chars()
                .take_while(|c| is_code_point_japanese(*c as u32))
                .collect();
        }

        let mut unique: IndexSet<String> = IndexSet::new();
        for grapheme in text.graphemes(true) {
            unique.insert(grapheme.to_string());
        }
        let characters: Vec<String> = unique.into_iter().collect();
        if characters.is_empty() {
            return Ok(Vec::new());
        }

        let mut database_entries = self
            .db
            .find_kanji_bulk(&characters, &options.enabled_dictionary_map)?;
        database_entries.sort_by_key(|entry| entry.index);
        log::debug!(
            "kanji lookup: {} rows for {} characters",
            database_entries.len(),
            characters.len()
        );

        let mut queries: IndexSet<TagQuery> = IndexSet::new();
        for database_entry in &database_entries {
            for tag in &database_entry.tags {
                queries.insert(TagQuery {
                    query: tag_query_text(tag),
                    dictionary: database_entry.dictionary.clone(),
                });
            }
            for stat_name in database_entry.stats.keys() {
                queries.insert(TagQuery {
                    query: tag_query_text(stat_name),
                    dictionary: database_entry.dictionary.clone(),
                });
            }
        }
        let lookup = self._get_tag_records(queries)?;

        let mut entries: Vec<KanjiDictionaryEntry> = Vec::new();
        for database_entry in database_entries {
            let (dictionary_index, dictionary_priority) = kanji_dictionary_order(
                &database_entry.dictionary,
                &options.enabled_dictionary_map,
            );
            let tag_groups = if database_entry.tags.is_empty() {
                Vec::new()
            } else {
                vec![TagGroup::new(
                    &database_entry.dictionary,
                    database_entry.tags.clone(),
                )]
            };
            let tags = self.build_tags(&tag_groups, &lookup);
            let stats = expand_kanji_stats(&database_entry, &lookup);

            entries.push(KanjiDictionaryEntry {
                character: database_entry.character,
                dictionary: database_entry.dictionary,
                dictionary_index,
                dictionary_priority,
                onyomi: database_entry.onyomi,
                kunyomi: database_entry.kunyomi,
                tag_groups,
                tags,
                stats,
                definitions: database_entry.definitions,
                frequencies: Vec::new(),
            });
        }

        self._add_kanji_meta(&mut entries, options)?;
        for entry in &mut entries {
            sorting::sort_kanji_frequencies(&mut entry.frequencies);
        }
        Ok(entries)
    }

    fn _add_kanji_meta(
        &self,
        entries: &mut [KanjiDictionaryEntry],
        options: &FindKanjiOptions,
    ) -> Result<()> {
        let mut targets: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (entry_index, entry) in entries.iter().enumerate() {
            targets
                .entry(entry.character.clone())
                .or_default()
                .push(entry_index);
        }
        if targets.is_empty() {
            return Ok(());
        }
        let characters: Vec<String> = targets.keys().cloned().collect();
        let metas = self
            .db
            .find_kanji_meta_bulk(&characters, &options.enabled_dictionary_map)?;

        for meta in metas {
            let Some((_, slots)) = targets.get_index(meta.index) else {
                continue;
            };
            let (dictionary_index, dictionary_priority) =
                kanji_dictionary_order(&meta.dictionary, &options.enabled_dictionary_map);
            let (frequency, display_value, display_value_parsed) =
                self.convert_frequency_value(&meta.data);
            for &entry_index in slots {
                let entry = &mut entries[entry_index];
                entry.frequencies.push(KanjiFrequency {
                    index: entry.frequencies.len(),
                    dictionary: meta.dictionary.clone(),
                    dictionary_index,
                    dictionary_priority,
                    character: meta.character.clone(),
                    frequency,
                    display_value: display_value.clone(),
                    display_value_parsed,
                });
            }
        }
        Ok(())
    }
}

/// Expands stat values against tag metadata and groups them by the tag
/// record's category; stats without a record land in `misc`.
fn expand_kanji_stats(
    database_entry: &KanjiEntry,
    lookup: &IndexMap<TagQuery, Option<TagEntry>>,
) -> KanjiStatGroups {
    let mut groups: KanjiStatGroups = IndexMap::new();
    for (name, value) in &database_entry.stats {
        let record = lookup
            .get(&TagQuery {
                query: tag_query_text(name),
                dictionary: database_entry.dictionary.clone(),
            })
            .and_then(Option::as_ref);
        let (category, content, order, score) = match record {
            Some(record) if !record.category.is_empty() => (
                record.category.clone(),
                record.notes.clone(),
                record.order,
                record.score,
            ),
            _ => ("misc".to_string(), String::new(), 0, 0),
        };
        groups.entry(category.clone()).or_default().push(KanjiStat {
            name: name.clone(),
            category,
            content,
            order,
            score,
            dictionary: database_entry.dictionary.clone(),
            value: value.clone(),
        });
    }
    for stats in groups.values_mut() {
        stats.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    }
    groups
}
