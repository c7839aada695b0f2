use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_untagged::UntaggedEnumVisitor;
use std::fmt;

use crate::dictionary::NumberOrString;

/// Tag name recognised as the marker for dictionary-sourced deinflection
/// entries; entries carrying it never become results themselves.
pub const NON_LEMMA_TAG: &str = "non-lemma";

/// One glossary entry of a term: plain text or a typed content payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TermGlossary {
    Text(String),
    Content(TermGlossaryContent),
}

impl<'de> Deserialize<'de> for TermGlossary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        UntaggedEnumVisitor::new()
            .string(|text| Ok(TermGlossary::Text(text.to_string())))
            .map(|map| map.deserialize().map(TermGlossary::Content))
            .deserialize(deserializer)
    }
}

/// A typed glossary payload; `structured-content` is carried opaquely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TermGlossaryContent {
    Text {
        text: String,
    },
    Image {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    StructuredContent {
        content: serde_json::Value,
    },
}

fn split_tag_field(field: Option<String>) -> Vec<String> {
    field
        .map(|names| names.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// One row of a term bank: the positional tuple
/// `[term, reading, definition_tags, rules, score, definitions, sequence,
///   term_tags, form_of?, inflection_hypotheses?]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TermBankEntry {
    pub term: String,
    pub reading: String,
    pub definition_tags: Vec<String>,
    pub word_classes: Vec<String>,
    pub score: i64,
    pub glossary: Vec<TermGlossary>,
    pub sequence: i64,
    pub term_tags: Vec<String>,
    /// Dictionary-declared lemma for non-lemma entries.
    pub form_of: Option<String>,
    /// Dictionary-declared inflection rule chains.
    pub inflection_hypotheses: Vec<Vec<String>>,
}

impl<'de> Deserialize<'de> for TermBankEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TermBankEntryVisitor;

        impl<'de> Visitor<'de> for TermBankEntryVisitor {
            type Value = TermBankEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a term bank tuple of length >= 8")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TermBankEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                macro_rules! element {
                    ($index:expr, $ty:ty, $name:literal) => {{
                        seq.next_element::<$ty>()?
                            .ok_or_else(|| de::Error::invalid_length($index, &$name))?
                    }};
                }

                let term = element!(0, String, "term");
                let reading = element!(1, String, "reading");
                let definition_tags = element!(2, Option<String>, "definition tags");
                let rules = element!(3, Option<String>, "rules");
                let score = element!(4, i64, "score");
                let glossary = element!(5, Vec<TermGlossary>, "definitions");
                let sequence = element!(6, i64, "sequence");
                let term_tags = element!(7, Option<String>, "term tags");
                let form_of = seq.next_element::<Option<String>>()?.flatten();
                let inflection_hypotheses = seq
                    .next_element::<Option<Vec<Vec<String>>>>()?
                    .flatten()
                    .unwrap_or_default();

                Ok(TermBankEntry {
                    term,
                    reading,
                    definition_tags: split_tag_field(definition_tags),
                    word_classes: split_tag_field(rules),
                    score,
                    glossary,
                    sequence,
                    term_tags: split_tag_field(term_tags),
                    form_of,
                    inflection_hypotheses,
                })
            }
        }

        deserializer.deserialize_seq(TermBankEntryVisitor)
    }
}

/// The kind of term metadata a meta bank row carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermMetaMode {
    Freq,
    Pitch,
    Ipa,
}

/// A frequency value: bare number, bare string, or `{value, displayValue}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenericFrequencyData {
    Number(i64),
    Text(String),
    Detailed {
        value: i64,
        #[serde(rename = "displayValue")]
        display_value: Option<String>,
    },
}

impl<'de> Deserialize<'de> for GenericFrequencyData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Detailed {
            value: i64,
            #[serde(rename = "displayValue", default)]
            display_value: Option<String>,
        }

        UntaggedEnumVisitor::new()
            .i64(|value| Ok(GenericFrequencyData::Number(value)))
            .u64(|value| Ok(GenericFrequencyData::Number(value as i64)))
            .string(|text| Ok(GenericFrequencyData::Text(text.to_string())))
            .map(|map| {
                let Detailed {
                    value,
                    display_value,
                } = map.deserialize()?;
                Ok(GenericFrequencyData::Detailed {
                    value,
                    display_value,
                })
            })
            .deserialize(deserializer)
    }
}

/// Frequency metadata, optionally scoped to one reading of the term.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TermMetaFrequencyData {
    WithReading {
        reading: String,
        frequency: GenericFrequencyData,
    },
    Generic(GenericFrequencyData),
}

impl<'de> Deserialize<'de> for TermMetaFrequencyData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("reading").is_some() && value.get("frequency").is_some() {
            #[derive(Deserialize)]
            struct WithReading {
                reading: String,
                frequency: GenericFrequencyData,
            }
            let WithReading { reading, frequency } =
                serde_json::from_value(value).map_err(de::Error::custom)?;
            Ok(TermMetaFrequencyData::WithReading { reading, frequency })
        } else {
            serde_json::from_value(value)
                .map(TermMetaFrequencyData::Generic)
                .map_err(de::Error::custom)
        }
    }
}

/// Positions of morae; bank data uses either a bare number or an array.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MoraPositions {
    One(i64),
    Many(Vec<i64>),
}

impl MoraPositions {
    pub fn to_vec(&self) -> Vec<i64> {
        match self {
            MoraPositions::One(position) => vec![*position],
            MoraPositions::Many(positions) => positions.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for MoraPositions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        UntaggedEnumVisitor::new()
            .i64(|position| Ok(MoraPositions::One(position)))
            .u64(|position| Ok(MoraPositions::One(position as i64)))
            .seq(|seq| seq.deserialize().map(MoraPositions::Many))
            .deserialize(deserializer)
    }
}

/// A single pitch accent downstep description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitchData {
    /// Mora position of the downstep; 0 means heiban.
    pub position: i64,
    #[serde(default)]
    pub nasal: Option<MoraPositions>,
    #[serde(default)]
    pub devoice: Option<MoraPositions>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermMetaPitchData {
    pub reading: String,
    pub pitches: Vec<PitchData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoneticTranscriptionData {
    pub ipa: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermMetaPhoneticData {
    pub reading: String,
    pub transcriptions: Vec<PhoneticTranscriptionData>,
}

/// The payload of a term meta bank row, discriminated by its mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TermMetaData {
    Frequency(TermMetaFrequencyData),
    Pitch(TermMetaPitchData),
    Phonetic(TermMetaPhoneticData),
}

/// One row of a term meta bank: `[term, mode, data]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TermMetaBankEntry {
    pub term: String,
    pub mode: TermMetaMode,
    pub data: TermMetaData,
}

impl<'de> Deserialize<'de> for TermMetaBankEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TermMetaBankEntryVisitor;

        impl<'de> Visitor<'de> for TermMetaBankEntryVisitor {
            type Value = TermMetaBankEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a term meta tuple [term, mode, data]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TermMetaBankEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let term: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"term"))?;
                let mode: TermMetaMode = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"mode"))?;
                let data: serde_json::Value = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &"data"))?;
                let data = match mode {
                    TermMetaMode::Freq => serde_json::from_value(data)
                        .map(TermMetaData::Frequency)
                        .map_err(de::Error::custom)?,
                    TermMetaMode::Pitch => serde_json::from_value(data)
                        .map(TermMetaData::Pitch)
                        .map_err(de::Error::custom)?,
                    TermMetaMode::Ipa => serde_json::from_value(data)
                        .map(TermMetaData::Phonetic)
                        .map_err(de::Error::custom)?,
                };
                Ok(TermMetaBankEntry { term, mode, data })
            }
        }

        deserializer.deserialize_seq(TermMetaBankEntryVisitor)
    }
}

/// One row of a kanji bank:
/// `[character, onyomi, kunyomi, tags, meanings, stats?]`.
#[derive(Clone, Debug, PartialEq)]
pub struct KanjiBankEntry {
    pub character: String,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tags: Vec<String>,
    pub meanings: Vec<String>,
    pub stats: IndexMap<String, NumberOrString>,
}

impl<'de> Deserialize<'de> for KanjiBankEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KanjiBankEntryVisitor;

        impl<'de> Visitor<'de> for KanjiBankEntryVisitor {
            type Value = KanjiBankEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a kanji bank tuple of length >= 5")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<KanjiBankEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let character: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"character"))?;
                let onyomi: Option<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"onyomi"))?;
                let kunyomi: Option<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &"kunyomi"))?;
                let tags: Option<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(3, &"tags"))?;
                let meanings: Vec<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(4, &"meanings"))?;
                let stats: IndexMap<String, NumberOrString> =
                    seq.next_element()?.unwrap_or_default();

                Ok(KanjiBankEntry {
                    character,
                    onyomi: split_tag_field(onyomi),
                    kunyomi: split_tag_field(kunyomi),
                    tags: split_tag_field(tags),
                    meanings,
                    stats,
                })
            }
        }

        deserializer.deserialize_seq(KanjiBankEntryVisitor)
    }
}

/// One row of a kanji meta bank: `[character, "freq", data]`.
#[derive(Clone, Debug, PartialEq)]
pub struct KanjiMetaBankEntry {
    pub character: String,
    pub data: GenericFrequencyData,
}

impl<'de> Deserialize<'de> for KanjiMetaBankEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KanjiMetaBankEntryVisitor;

        impl<'de> Visitor<'de> for KanjiMetaBankEntryVisitor {
            type Value = KanjiMetaBankEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a kanji meta tuple [character, \"freq\", data]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<KanjiMetaBankEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let character: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"character"))?;
                let mode: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"mode"))?;
                if mode != "freq" {
                    return Err(de::Error::custom(format!(
                        "unsupported kanji meta mode: {mode}"
                    )));
                }
                let data: GenericFrequencyData = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &"data"))?;
                Ok(KanjiMetaBankEntry { character, data })
            }
        }

        deserializer.deserialize_seq(KanjiMetaBankEntryVisitor)
    }
}

/// One row of a tag bank: `[name, category, order, notes, score]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TagBankEntry {
    pub name: String,
    pub category: String,
    pub order: i64,
    pub notes: String,
    pub score: i64,
}

impl<'de> Deserialize<'de> for TagBankEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TagBankEntryVisitor;

        impl<'de> Visitor<'de> for TagBankEntryVisitor {
            type Value = TagBankEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a tag bank tuple [name, category, order, notes, score]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TagBankEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"name"))?;
                let category: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"category"))?;
                let order: i64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &"order"))?;
                let notes: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(3, &"notes"))?;
                let score: i64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(4, &"score"))?;
                Ok(TagBankEntry {
                    name,
                    category,
                    order,
                    notes,
                    score,
                })
            }
        }

        deserializer.deserialize_seq(TagBankEntryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn term_bank_tuple_parses() {
        let json = r#"["食べる","たべる","pop","v1",10,["to eat"],1,""]"#;
        let entry: TermBankEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.term, "食べる");
        assert_eq!(entry.reading, "たべる");
        assert_eq!(entry.definition_tags, vec!["pop".to_string()]);
        assert_eq!(entry.word_classes, vec!["v1".to_string()]);
        assert_eq!(entry.score, 10);
        assert_eq!(entry.sequence, 1);
        assert!(entry.form_of.is_none());
    }

    #[test]
    fn term_bank_tuple_with_form_of() {
        let json = r#"["食べました","たべました","non-lemma","",0,["polite past of 食べる"],-1,"","食べる",[["polite","past"]]]"#;
        let entry: TermBankEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.form_of.as_deref(), Some("食べる"));
        assert_eq!(
            entry.inflection_hypotheses,
            vec![vec!["polite".to_string(), "past".to_string()]]
        );
    }

    #[test]
    fn term_bank_tuple_too_short_is_rejected() {
        let json = r#"["食べる","たべる"]"#;
        assert!(serde_json::from_str::<TermBankEntry>(json).is_err());
    }

    #[test]
    fn glossary_accepts_text_and_content() {
        let json = r#"["plain",{"type":"text","text":"detailed"},{"type":"structured-content","content":{"tag":"div"}}]"#;
        let glossary: Vec<TermGlossary> = serde_json::from_str(json).unwrap();
        assert_eq!(glossary.len(), 3);
        assert_eq!(glossary[0], TermGlossary::Text("plain".to_string()));
        assert!(matches!(
            glossary[1],
            TermGlossary::Content(TermGlossaryContent::Text { .. })
        ));
    }

    #[test]
    fn term_meta_frequency_variants() {
        let bare: TermMetaBankEntry = serde_json::from_str(r#"["読む","freq",5]"#).unwrap();
        assert!(matches!(
            bare.data,
            TermMetaData::Frequency(TermMetaFrequencyData::Generic(
                GenericFrequencyData::Number(5)
            ))
        ));

        let with_reading: TermMetaBankEntry = serde_json::from_str(
            r#"["読む","freq",{"reading":"よむ","frequency":{"value":12,"displayValue":"12"}}]"#,
        )
        .unwrap();
        match with_reading.data {
            TermMetaData::Frequency(TermMetaFrequencyData::WithReading { reading, frequency }) => {
                assert_eq!(reading, "よむ");
                assert_eq!(
                    frequency,
                    GenericFrequencyData::Detailed {
                        value: 12,
                        display_value: Some("12".to_string()),
                    }
                );
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn term_meta_pitch_parses() {
        let entry: TermMetaBankEntry = serde_json::from_str(
            r#"["雨","pitch",{"reading":"あめ","pitches":[{"position":1,"nasal":2,"tags":["n"]}]}]"#,
        )
        .unwrap();
        match entry.data {
            TermMetaData::Pitch(data) => {
                assert_eq!(data.reading, "あめ");
                assert_eq!(data.pitches[0].position, 1);
                assert_eq!(data.pitches[0].nasal.as_ref().unwrap().to_vec(), vec![2]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn kanji_bank_tuple_parses() {
        let json = r#"["食","ショク ジキ","く.う た.べる","jouyou",["food","to eat"],{"grade":2,"strokes":"9"}]"#;
        let entry: KanjiBankEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.character, "食");
        assert_eq!(entry.onyomi, vec!["ショク".to_string(), "ジキ".to_string()]);
        assert_eq!(entry.meanings.len(), 2);
        assert_eq!(entry.stats.len(), 2);
    }

    #[test]
    fn tag_bank_tuple_parses() {
        let entry: TagBankEntry =
            serde_json::from_str(r#"["v1","partOfSpeech",0,"Ichidan verb",10]"#).unwrap();
        assert_eq!(entry.name, "v1");
        assert_eq!(entry.category, "partOfSpeech");
        assert_eq!(entry.score, 10);
    }
}
