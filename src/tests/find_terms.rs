use indexmap::{IndexMap, IndexSet};
use pretty_assertions::assert_eq;

use crate::dictionary::Pronunciation;
use crate::{
    DeinflectionSource, FindKanjiOptions, FindTermDictionary, FindTermsMode, FindTermsOptions,
    FindTermsSortOrder, InflectionSource, JitenError, MemoryDictionaryDatabase, SearchResolution,
    TermReadingItem, TermSourceMatchSource, TermSourceMatchType, TextTransformationSetting,
    Translator,
};

fn enabled_map(names: &[&str]) -> IndexMap<String, FindTermDictionary> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            (
                name.to_string(),
                FindTermDictionary {
                    index,
                    priority: 0,
                    allow_secondary_searches: false,
                },
            )
        })
        .collect()
}

fn options_for(names: &[&str]) -> FindTermsOptions {
    FindTermsOptions {
        enabled_dictionary_map: enabled_map(names),
        ..FindTermsOptions::default()
    }
}

fn japanese_db() -> MemoryDictionaryDatabase {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "jmdict",
        r#"[
            ["食べる","たべる","pop","v1",10,["to eat"],1,""],
            ["走る","はしる","","v5",5,["to run"],2,""]
        ]"#,
    )
    .unwrap();
    db.import_tag_bank(
        "jmdict",
        r#"[
            ["v1","partOfSpeech",0,"Ichidan verb",10],
            ["pop","popular",-10,"Popular term",100]
        ]"#,
    )
    .unwrap();
    db
}

#[test]
fn deinflected_past_tense_lookup() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "食べた", &options)
        .unwrap();

    assert_eq!(result.dictionary_entries.len(), 1);
    assert_eq!(result.original_text_length, 3);

    let entry = &result.dictionary_entries[0];
    assert_eq!(entry.headwords.len(), 1);
    let headword = &entry.headwords[0];
    assert_eq!(headword.term, "食べる");
    assert_eq!(headword.reading, "たべる");

    assert_eq!(entry.inflection_hypotheses.len(), 1);
    let hypothesis = &entry.inflection_hypotheses[0];
    assert_eq!(hypothesis.source, InflectionSource::Algorithm);
    assert_eq!(hypothesis.inflections, vec!["past".to_string()]);

    let source = &headword.sources[0];
    assert_eq!(source.original_text, "食べた");
    assert_eq!(source.transformed_text, "食べた");
    assert_eq!(source.deinflected_text, "食べる");
    assert_eq!(source.match_type, TermSourceMatchType::Exact);
    assert_eq!(source.match_source, TermSourceMatchSource::Term);
    assert!(source.is_primary);
}

#[test]
fn decapitalize_transformation_recovers_original_text() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank("webster", r#"[["read","","","v",0,["to look at words"],-1,""]]"#)
        .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["webster"]);
    options.language = "en".to_string();
    options.text_transformations.insert(
        "decapitalize".to_string(),
        TextTransformationSetting::On,
    );

    let result = translator
        .find_terms(FindTermsMode::Group, "Read", &options)
        .unwrap();

    assert_eq!(result.dictionary_entries.len(), 1);
    assert_eq!(result.original_text_length, 4);
    let headword = &result.dictionary_entries[0].headwords[0];
    assert_eq!(headword.term, "read");
    // Empty reading falls back to the term.
    assert_eq!(headword.reading, "read");
    let source = &headword.sources[0];
    assert_eq!(source.original_text, "Read");
    assert_eq!(source.transformed_text, "read");
}

#[test]
fn word_search_resolution_scans_whole_words() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank("webster", r#"[["run","","","v",0,["to move quickly"],-1,""]]"#)
        .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["webster"]);
    options.language = "en".to_string();
    options.search_resolution = SearchResolution::Word;

    let result = translator
        .find_terms(FindTermsMode::Group, "run fast", &options)
        .unwrap();

    assert_eq!(result.dictionary_entries.len(), 1);
    let source = &result.dictionary_entries[0].headwords[0].sources[0];
    assert_eq!(source.original_text, "run");
    assert_eq!(result.original_text_length, 3);
}

#[test]
fn dictionary_deinflection_merges_into_both_source() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "wikt",
        r#"[
            ["食べる","たべる","","v1",10,["to eat"],1,""],
            ["食べた","たべた","non-lemma","",0,["past of 食べる"],1,"","食べる",[["past"]]]
        ]"#,
    )
    .unwrap();
    let translator = Translator::new(db);
    let options = options_for(&["wikt"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "食べた", &options)
        .unwrap();

    // The non-lemma row itself never becomes an entry.
    assert_eq!(result.dictionary_entries.len(), 1);
    let entry = &result.dictionary_entries[0];
    assert_eq!(entry.headwords[0].term, "食べる");

    // Algorithm and dictionary agreed on the same chain.
    assert_eq!(entry.inflection_hypotheses.len(), 1);
    let hypothesis = &entry.inflection_hypotheses[0];
    assert_eq!(hypothesis.source, InflectionSource::Both);
    assert_eq!(hypothesis.inflections, vec!["past".to_string()]);
}

#[test]
fn dictionary_only_deinflection_skips_algorithm() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "wikt",
        r#"[
            ["walk","","","v",0,["to walk"],-1,""],
            ["walked","","non-lemma","",0,["past of walk"],-1,"","walk",[["past"]]]
        ]"#,
    )
    .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["wikt"]);
    options.language = "en".to_string();
    options.deinflection_source = DeinflectionSource::Dictionary;

    let result = translator
        .find_terms(FindTermsMode::Group, "walked", &options)
        .unwrap();

    assert_eq!(result.dictionary_entries.len(), 1);
    let entry = &result.dictionary_entries[0];
    assert_eq!(entry.headwords[0].term, "walk");
    let hypothesis = &entry.inflection_hypotheses[0];
    assert_eq!(hypothesis.source, InflectionSource::Dictionary);
    assert_eq!(hypothesis.inflections, vec!["past".to_string()]);
    // Dictionary-deinflection hits do not extend the consumed length.
    assert_eq!(result.original_text_length, 6);
}

#[test]
fn merge_mode_unions_entries_sharing_a_sequence() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "main",
        r#"[
            ["走る","はしる","","v5",5,["to run"],42,""],
            ["駆ける","かける","","v1",4,["to dash"],42,""]
        ]"#,
    )
    .unwrap();
    db.import_term_bank("sub", r#"[["走る","はしる","","v5",1,["run (sub)"],-1,""]]"#)
        .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["main", "sub"]);
    options.main_dictionary = "main".to_string();

    let result = translator
        .find_terms(FindTermsMode::Merge, "走った", &options)
        .unwrap();

    assert_eq!(result.dictionary_entries.len(), 1);
    let entry = &result.dictionary_entries[0];

    // Headwords are keyed by (term, reading).
    let mut terms: Vec<&str> = entry
        .headwords
        .iter()
        .map(|headword| headword.term.as_str())
        .collect();
    terms.sort_unstable();
    assert_eq!(terms, vec!["走る", "駆ける"]);

    // Primary hit, sequence sibling, and the absorbed sub-dictionary
    // entry all contribute definitions.
    assert_eq!(entry.definitions.len(), 3);
    assert!(entry.is_primary);
    let related = entry
        .headwords
        .iter()
        .find(|headword| headword.term == "駆ける")
        .unwrap();
    assert!(related.sources.iter().all(|source| !source.is_primary));
    assert_eq!(
        related.sources[0].match_source,
        TermSourceMatchSource::Sequence
    );
}

#[test]
fn merge_mode_requires_main_dictionary() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);
    let error = translator
        .find_terms(FindTermsMode::Merge, "食べた", &options)
        .unwrap_err();
    assert!(matches!(error, JitenError::Translator(_)));
}

#[test]
fn excluded_dictionary_definitions_are_stripped() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank("a", r#"[["走る","はしる","","v5",5,["to run"],-1,""]]"#)
        .unwrap();
    db.import_term_bank("b", r#"[["走る","はしる","","v5",5,["to run (b)"],-1,""]]"#)
        .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["a", "b"]);
    options.exclude_dictionary_definitions = Some(IndexSet::from(["b".to_string()]));

    let result = translator
        .find_terms(FindTermsMode::Group, "走る", &options)
        .unwrap();
    assert_eq!(result.dictionary_entries.len(), 1);
    let entry = &result.dictionary_entries[0];
    assert_eq!(entry.definitions.len(), 1);
    assert_eq!(entry.definitions[0].dictionary, "a");

    // An entry whose every definition is excluded disappears entirely.
    let mut options = options_for(&["b"]);
    options.exclude_dictionary_definitions = Some(IndexSet::from(["b".to_string()]));
    let result = translator
        .find_terms(FindTermsMode::Group, "走る", &options)
        .unwrap();
    assert!(result.dictionary_entries.is_empty());
}

#[test]
fn frequency_dictionary_drives_sort_order() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "jmdict",
        r#"[
            ["箸","はし","","n",0,["chopsticks"],-1,""],
            ["橋","はし","","n",0,["bridge"],-1,""],
            ["端","はし","","n",0,["edge"],-1,""]
        ]"#,
    )
    .unwrap();
    db.import_term_meta_bank(
        "freqs",
        r#"[
            ["箸","freq",10],
            ["橋","freq",2]
        ]"#,
    )
    .unwrap();
    let translator = Translator::new(db);

    let mut options = options_for(&["jmdict", "freqs"]);
    options.sort_frequency_dictionary = Some("freqs".to_string());
    options.sort_frequency_dictionary_order = FindTermsSortOrder::Ascending;

    let result = translator
        .find_terms(FindTermsMode::Group, "はし", &options)
        .unwrap();
    let terms: Vec<&str> = result
        .dictionary_entries
        .iter()
        .map(|entry| entry.headwords[0].term.as_str())
        .collect();
    // Entries without a frequency in the sorting dictionary go last.
    assert_eq!(terms, vec!["橋", "箸", "端"]);

    options.sort_frequency_dictionary_order = FindTermsSortOrder::Descending;
    let result = translator
        .find_terms(FindTermsMode::Group, "はし", &options)
        .unwrap();
    let terms: Vec<&str> = result
        .dictionary_entries
        .iter()
        .map(|entry| entry.headwords[0].term.as_str())
        .collect();
    assert_eq!(terms, vec!["箸", "橋", "端"]);
}

#[test]
fn tags_expand_with_categories_and_merge() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "食べる", &options)
        .unwrap();
    let entry = &result.dictionary_entries[0];

    let definition = &entry.definitions[0];
    assert_eq!(definition.tags.len(), 1);
    let tag = &definition.tags[0];
    assert_eq!(tag.name, "pop");
    assert_eq!(tag.category, "popular");
    assert_eq!(tag.order, -10);
    assert_eq!(tag.score, 100);
    assert_eq!(tag.content, vec!["Popular term".to_string()]);
    assert_eq!(tag.dictionaries, vec!["jmdict".to_string()]);
    assert!(!tag.redundant);
}

#[test]
fn repeated_part_of_speech_tags_flagged_redundant() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "jmdict",
        r#"[
            ["食べる","たべる","v1","v1",10,["to eat"],1,""],
            ["食べる","たべる","v1","v1",5,["to live on"],1,""]
        ]"#,
    )
    .unwrap();
    db.import_tag_bank("jmdict", r#"[["v1","partOfSpeech",0,"Ichidan verb",10]]"#)
        .unwrap();
    let translator = Translator::new(db);
    let options = options_for(&["jmdict"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "食べる", &options)
        .unwrap();
    assert_eq!(result.dictionary_entries.len(), 1);
    let definitions = &result.dictionary_entries[0].definitions;
    assert_eq!(definitions.len(), 2);
    assert!(!definitions[0].tags[0].redundant);
    assert!(definitions[1].tags[0].redundant);
}

#[test]
fn simple_mode_returns_bare_entries() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);

    let result = translator
        .find_terms(FindTermsMode::Simple, "食べた", &options)
        .unwrap();
    assert_eq!(result.dictionary_entries.len(), 1);
    let entry = &result.dictionary_entries[0];
    assert!(entry.headwords[0].tags.is_empty());
    assert!(entry.headwords[0].tag_groups.is_empty());
    assert!(entry.frequencies.is_empty());
}

#[test]
fn pitch_accent_metadata_attaches_to_matching_reading() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank("jmdict", r#"[["雨","あめ","","n",0,["rain"],-1,""]]"#)
        .unwrap();
    db.import_term_meta_bank(
        "accents",
        r#"[["雨","pitch",{"reading":"あめ","pitches":[{"position":1}]}]]"#,
    )
    .unwrap();
    let translator = Translator::new(db);
    let options = options_for(&["jmdict", "accents"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "雨", &options)
        .unwrap();
    let entry = &result.dictionary_entries[0];
    assert_eq!(entry.pronunciations.len(), 1);
    let pronunciation = &entry.pronunciations[0];
    assert_eq!(pronunciation.dictionary, "accents");
    match &pronunciation.pronunciations[0] {
        Pronunciation::PitchAccent(pitch) => assert_eq!(pitch.position, 1),
        other => panic!("unexpected pronunciation: {other:?}"),
    }
}

#[test]
fn reading_scoped_frequency_skips_other_readings() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_bank(
        "jmdict",
        r#"[
            ["行った","いった","","",0,["went"],-1,""],
            ["行った","おこなった","","",0,["carried out"],-1,""]
        ]"#,
    )
    .unwrap();
    db.import_term_meta_bank(
        "freqs",
        r#"[["行った","freq",{"reading":"いった","frequency":7}]]"#,
    )
    .unwrap();
    let translator = Translator::new(db);
    let options = options_for(&["jmdict", "freqs"]);

    let result = translator
        .find_terms(FindTermsMode::Group, "行った", &options)
        .unwrap();
    assert_eq!(result.dictionary_entries.len(), 2);
    for entry in &result.dictionary_entries {
        let reading = &entry.headwords[0].reading;
        if reading == "いった" {
            assert_eq!(entry.frequencies.len(), 1);
            assert_eq!(entry.frequencies[0].frequency, 7);
            assert!(entry.frequencies[0].has_reading);
        } else {
            assert!(entry.frequencies.is_empty());
        }
    }
}

#[test]
fn empty_text_yields_empty_result() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);
    let result = translator
        .find_terms(FindTermsMode::Group, "", &options)
        .unwrap();
    assert!(result.dictionary_entries.is_empty());
    assert_eq!(result.original_text_length, 0);
}

#[test]
fn non_japanese_characters_can_truncate_input() {
    let translator = Translator::new(japanese_db());
    let mut options = options_for(&["jmdict"]);
    options.remove_non_japanese_characters = true;
    let result = translator
        .find_terms(FindTermsMode::Group, "abc食べた", &options)
        .unwrap();
    assert!(result.dictionary_entries.is_empty());
}

#[test]
fn find_kanji_builds_expanded_entries() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_kanji_bank(
        "kanjidic",
        r#"[["食","ショク ジキ","く.う た.べる","jouyou",["food","to eat"],{"grade":2}]]"#,
    )
    .unwrap();
    db.import_kanji_meta_bank("kanjifreq", r#"[["食","freq",320]]"#)
        .unwrap();
    db.import_tag_bank(
        "kanjidic",
        r#"[
            ["jouyou","frequent",0,"Jouyou kanji",5],
            ["grade","index",0,"School grade",0]
        ]"#,
    )
    .unwrap();
    let translator = Translator::new(db);

    let mut enabled = IndexMap::new();
    enabled.insert("kanjidic".to_string(), Default::default());
    enabled.insert("kanjifreq".to_string(), Default::default());
    let options = FindKanjiOptions {
        enabled_dictionary_map: enabled,
        remove_non_japanese_characters: false,
    };

    let entries = translator.find_kanji("食べた", &options).unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.character, "食");
    assert_eq!(entry.onyomi, vec!["ショク".to_string(), "ジキ".to_string()]);
    assert_eq!(entry.kunyomi.len(), 2);
    assert_eq!(entry.definitions, vec!["food".to_string(), "to eat".to_string()]);

    assert_eq!(entry.tags.len(), 1);
    assert_eq!(entry.tags[0].name, "jouyou");
    assert_eq!(entry.tags[0].category, "frequent");

    let index_stats = entry.stats.get("index").expect("grade stat group");
    assert_eq!(index_stats[0].name, "grade");
    assert_eq!(index_stats[0].content, "School grade");

    assert_eq!(entry.frequencies.len(), 1);
    assert_eq!(entry.frequencies[0].frequency, 320);
}

#[test]
fn term_frequencies_lookup_outside_entries() {
    let mut db = MemoryDictionaryDatabase::new();
    db.import_term_meta_bank(
        "freqs",
        r#"[
            ["読む","freq",5],
            ["読む","freq",{"reading":"よむ","frequency":"3"}]
        ]"#,
    )
    .unwrap();
    let translator = Translator::new(db);

    let items = vec![TermReadingItem {
        term: "読む".to_string(),
        reading: None,
    }];
    let results = translator
        .get_term_frequencies(&items, &["freqs".to_string()])
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(!results[0].has_reading);
    assert_eq!(results[0].frequency, 5);
    assert!(results[1].has_reading);
    assert_eq!(results[1].reading.as_deref(), Some("よむ"));
    // "3" is a purely numeric display value, parsed back into the value.
    assert_eq!(results[1].frequency, 3);
    assert!(results[1].display_value_parsed);

    // A mismatching explicit reading filters the scoped row out.
    let items = vec![TermReadingItem {
        term: "読む".to_string(),
        reading: Some("どくむ".to_string()),
    }];
    let results = translator
        .get_term_frequencies(&items, &["freqs".to_string()])
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].has_reading);
}

#[test]
fn cache_clear_keeps_lookups_working() {
    let translator = Translator::new(japanese_db());
    let options = options_for(&["jmdict"]);

    let first = translator
        .find_terms(FindTermsMode::Group, "食べる", &options)
        .unwrap();
    translator.clear_database_caches();
    let second = translator
        .find_terms(FindTermsMode::Group, "食べる", &options)
        .unwrap();
    assert_eq!(first.dictionary_entries, second.dictionary_entries);
}
