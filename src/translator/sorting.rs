use std::cmp::Ordering;

use super::{char_len, Translator};
use crate::database::DictionaryDatabase;
use crate::dictionary::{KanjiFrequency, TermDefinition, TermDictionaryEntry};
use crate::translation::FindTermsSortOrder;

impl<D: DictionaryDatabase> Translator<D> {
    /// The entry ordering. Stable sorts keep insertion order on full ties.
    pub(super) fn _sort_term_dictionary_entries(&self, entries: &mut [TermDictionaryEntry]) {
        entries.sort_by(|a, b| self._compare_term_dictionary_entries(a, b));
    }

    fn _compare_term_dictionary_entries(
        &self,
        a: &TermDictionaryEntry,
        b: &TermDictionaryEntry,
    ) -> Ordering {
        // Longer matched text wins, then plainer (less inflected) parses.
        let mut order = b
            .max_transformed_text_length
            .cmp(&a.max_transformed_text_length);
        if order != Ordering::Equal {
            return order;
        }
        order = a
            .inflection_hypotheses
            .len()
            .cmp(&b.inflection_hypotheses.len());
        if order != Ordering::Equal {
            return order;
        }
        order = b
            .source_term_exact_match_count
            .cmp(&a.source_term_exact_match_count);
        if order != Ordering::Equal {
            return order;
        }
        order = a.frequency_order.cmp(&b.frequency_order);
        if order != Ordering::Equal {
            return order;
        }
        order = b.dictionary_priority.cmp(&a.dictionary_priority);
        if order != Ordering::Equal {
            return order;
        }
        order = b.score.cmp(&a.score);
        if order != Ordering::Equal {
            return order;
        }
        if let (Some(a_headword), Some(b_headword)) = (a.headwords.first(), b.headwords.first()) {
            order = char_len(&b_headword.term).cmp(&char_len(&a_headword.term));
            if order != Ordering::Equal {
                return order;
            }
            order = self.string_comparer.compare(&a_headword.term, &b_headword.term);
            if order != Ordering::Equal {
                return order;
            }
        }
        order = b.definitions.len().cmp(&a.definitions.len());
        if order != Ordering::Equal {
            return order;
        }
        a.dictionary_index.cmp(&b.dictionary_index)
    }

    /// Sorts an entry's definitions, pronunciations, and frequencies, and
    /// flags part-of-speech tags that repeat the previous definition's.
    pub(super) fn _sort_term_dictionary_entry_data(&self, entry: &mut TermDictionaryEntry) {
        entry.definitions.sort_by(compare_term_definitions);
        entry.pronunciations.sort_by(|a, b| {
            b.dictionary_priority
                .cmp(&a.dictionary_priority)
                .then_with(|| a.headword_index.cmp(&b.headword_index))
                .then_with(|| a.dictionary_index.cmp(&b.dictionary_index))
                .then_with(|| a.index.cmp(&b.index))
        });
        entry.frequencies.sort_by(|a, b| {
            b.dictionary_priority
                .cmp(&a.dictionary_priority)
                .then_with(|| a.headword_index.cmp(&b.headword_index))
                .then_with(|| a.dictionary_index.cmp(&b.dictionary_index))
                .then_with(|| a.index.cmp(&b.index))
        });
        flag_redundant_definition_tags(&mut entry.definitions);
    }
}

fn compare_term_definitions(a: &TermDefinition, b: &TermDefinition) -> Ordering {
    a.frequency_order
        .cmp(&b.frequency_order)
        .then_with(|| b.dictionary_priority.cmp(&a.dictionary_priority))
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.headword_indices.cmp(&b.headword_indices))
        .then_with(|| a.dictionary_index.cmp(&b.dictionary_index))
        .then_with(|| tag_score_sum(b).cmp(&tag_score_sum(a)))
        .then_with(|| a.index.cmp(&b.index))
}

fn tag_score_sum(definition: &TermDefinition) -> i64 {
    definition.tags.iter().map(|tag| tag.score).sum()
}

/// Walking one entry's definitions in order per dictionary: a definition
/// repeating the previous definition's part-of-speech tag name sequence
/// has those tags flagged redundant.
fn flag_redundant_definition_tags(definitions: &mut [TermDefinition]) {
    let mut last_dictionary: Option<String> = None;
    let mut last_part_of_speech: Option<String> = None;

    for definition in definitions {
        if last_dictionary.as_deref() != Some(definition.dictionary.as_str()) {
            last_dictionary = Some(definition.dictionary.clone());
            last_part_of_speech = None;
        }

        let names: Vec<&str> = definition
            .tags
            .iter()
            .filter(|tag| tag.category == "partOfSpeech")
            .map(|tag| tag.name.as_str())
            .collect();
        let key = names.join("\u{0}");

        if last_part_of_speech.as_deref() == Some(key.as_str()) {
            for tag in &mut definition.tags {
                if tag.category == "partOfSpeech" {
                    tag.redundant = true;
                }
            }
        } else {
            last_part_of_speech = Some(key);
        }
    }
}

/// Recomputes `frequency_order` for entries and their definitions from a
/// nominated frequency dictionary. Ascending order: minimum frequency,
/// missing sorts last; descending: negated maximum, missing sorts last.
pub(super) fn update_sort_frequency_order(
    entries: &mut [TermDictionaryEntry],
    dictionary: &str,
    order: FindTermsSortOrder,
) {
    for entry in entries {
        let mut minimum = i64::MAX;
        let mut maximum = i64::MIN;
        for frequency in &entry.frequencies {
            if frequency.dictionary == dictionary {
                minimum = minimum.min(frequency.frequency);
                maximum = maximum.max(frequency.frequency);
            }
        }
        let present = minimum <= maximum;
        entry.frequency_order = match order {
            FindTermsSortOrder::Ascending => {
                if present {
                    minimum
                } else {
                    i64::MAX
                }
            }
            FindTermsSortOrder::Descending => {
                if present {
                    -maximum
                } else {
                    0
                }
            }
        };

        for definition in &mut entry.definitions {
            let mut minimum = i64::MAX;
            let mut maximum = i64::MIN;
            for frequency in &entry.frequencies {
                if frequency.dictionary == dictionary
                    && definition
                        .headword_indices
                        .binary_search(&frequency.headword_index)
                        .is_ok()
                {
                    minimum = minimum.min(frequency.frequency);
                    maximum = maximum.max(frequency.frequency);
                }
            }
            let present = minimum <= maximum;
            definition.frequency_order = match order {
                FindTermsSortOrder::Ascending => {
                    if present {
                        minimum
                    } else {
                        i64::MAX
                    }
                }
                FindTermsSortOrder::Descending => {
                    if present {
                        -maximum
                    } else {
                        0
                    }
                }
            };
        }
    }
}

pub(super) fn sort_kanji_frequencies(frequencies: &mut [KanjiFrequency]) {
    frequencies.sort_by(|a, b| {
        b.dictionary_priority
            .cmp(&a.dictionary_priority)
            .then_with(|| a.dictionary_index.cmp(&b.dictionary_index))
            .then_with(|| a.index.cmp(&b.index))
    });
}
