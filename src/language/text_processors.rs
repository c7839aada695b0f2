use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::text_source_map::TextSourceMap;

/// A single text transformation applied while generating lookup variants.
///
/// Transformations create alternate versions of the input text to search
/// for, which helps when the text does not exactly match the form stored
/// in the database. A transformation must keep `source_map` consistent
/// whenever it changes the char count of the text.
#[derive(Clone, Copy)]
pub struct TextTransformation {
    /// Stable identifier referenced by `FindTermsOptions.text_transformations`.
    pub id: &'static str,
    pub name: &'static str,
    pub apply: fn(&str, &mut TextSourceMap) -> String,
}

impl std::fmt::Debug for TextTransformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextTransformation")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

static DIACRITIC_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{0300}-\u{036f}]").expect("diacritic mark pattern"));

/// CAPITALIZED TEXT → capitalized text
pub const DECAPITALIZE: TextTransformation = TextTransformation {
    id: "decapitalize",
    name: "Decapitalize Text",
    apply: |text, source_map| {
        let mut result = String::with_capacity(text.len());
        let mut position = 0;
        for c in text.chars() {
            position = push_mapped(&mut result, source_map, position, c.to_lowercase());
        }
        result
    },
};

/// lowercase text → Lowercase text
pub const CAPITALIZE_FIRST_LETTER: TextTransformation = TextTransformation {
    id: "capitalize_first_letter",
    name: "Capitalize First Letter",
    apply: |text, source_map| {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };
        let mut result = String::with_capacity(text.len());
        let _ = push_mapped(&mut result, source_map, 0, first.to_uppercase());
        result.push_str(chars.as_str());
        result
    },
};

/// ἄήé → αηe
pub const REMOVE_ALPHABETIC_DIACRITICS: TextTransformation = TextTransformation {
    id: "remove_alphabetic_diacritics",
    name: "Remove Alphabetic Diacritics",
    apply: |text, source_map| {
        let mut result = String::with_capacity(text.len());
        let mut position = 0;
        for c in text.chars() {
            let stripped: String = c
                .nfd()
                .filter(|d| !DIACRITIC_MARKS.is_match(&d.to_string()))
                .collect();
            position = push_mapped(&mut result, source_map, position, stripped.chars());
        }
        result
    },
};

/// Appends the chars produced for one input char at `position`, recording
/// any char-count change in the source map. Returns the next position.
fn push_mapped(
    result: &mut String,
    source_map: &mut TextSourceMap,
    position: usize,
    produced: impl IntoIterator<Item = char>,
) -> usize {
    let mut count = 0;
    for c in produced {
        result.push(c);
        count += 1;
    }
    match count {
        0 => {
            source_map.replace_range(position, 1, 0);
            position
        }
        1 => position + 1,
        n => {
            source_map.insert(position + 1, &vec![0; n - 1]);
            position + n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decapitalize() {
        let mut map = TextSourceMap::new("Read");
        let out = (DECAPITALIZE.apply)("Read", &mut map);
        assert_eq!(out, "read");
        assert_eq!(map.source_length(4), 4);
    }

    #[test]
    fn capitalize_first_letter() {
        let mut map = TextSourceMap::new("read");
        let out = (CAPITALIZE_FIRST_LETTER.apply)("read", &mut map);
        assert_eq!(out, "Read");
        assert_eq!(map.source_length(4), 4);
    }

    #[test]
    fn remove_diacritics_keeps_source_lengths() {
        let mut map = TextSourceMap::new("é");
        let out = (REMOVE_ALPHABETIC_DIACRITICS.apply)("é", &mut map);
        assert_eq!(out, "e");
        assert_eq!(map.source_length(1), 1);
    }
}
