use std::collections::HashMap;
use std::sync::LazyLock;

use crate::language::cjk_utils::{
    is_code_point_in_range, is_code_point_in_ranges, CodepointRange, CJK_IDEOGRAPH_RANGES,
};
use crate::text_source_map::TextSourceMap;
use crate::language::text_processors::TextTransformation;

pub const HIRAGANA_SMALL_TSU_CODE_POINT: u32 = 0x3063;
pub const KATAKANA_SMALL_TSU_CODE_POINT: u32 = 0x30c3;
pub const KATAKANA_SMALL_KA_CODE_POINT: u32 = 0x30f5;
pub const KATAKANA_SMALL_KE_CODE_POINT: u32 = 0x30f6;
pub const KANA_PROLONGED_SOUND_MARK_CODE_POINT: u32 = 0x30fc;

pub const HIRAGANA_CONVERSION_RANGE: CodepointRange = (0x3041, 0x3096);
pub const KATAKANA_CONVERSION_RANGE: CodepointRange = (0x30a1, 0x30f6);

pub const HIRAGANA_RANGE: CodepointRange = (0x3040, 0x309f);
pub const KATAKANA_RANGE: CodepointRange = (0x30a0, 0x30ff);

pub const KANA_RANGES: &[CodepointRange] = &[HIRAGANA_RANGE, KATAKANA_RANGE];

const JP_RANGES_BASE: [CodepointRange; 14] = [
    HIRAGANA_RANGE,
    KATAKANA_RANGE,
    (0xff66, 0xff9f), // Halfwidth katakana
    (0x30fb, 0x30fc), // Katakana punctuation
    (0xff61, 0xff65), // Kana punctuation
    (0x3000, 0x303f), // CJK punctuation
    (0xff10, 0xff19), // Fullwidth numbers
    (0xff21, 0xff3a), // Fullwidth upper case Latin letters
    (0xff41, 0xff5a), // Fullwidth lower case Latin letters
    (0xff01, 0xff0f), // Fullwidth punctuation 1
    (0xff1a, 0xff1f), // Fullwidth punctuation 2
    (0xff3b, 0xff3f), // Fullwidth punctuation 3
    (0xff5b, 0xff60), // Fullwidth punctuation 4
    (0xffe0, 0xffee), // Currency markers
];

pub static JAPANESE_RANGES: LazyLock<[CodepointRange; 26]> = LazyLock::new(|| {
    let mut combined: [CodepointRange; 26] = [(0, 0); 26];
    combined[..14].copy_from_slice(&JP_RANGES_BASE);
    combined[14..].copy_from_slice(&CJK_IDEOGRAPH_RANGES);
    combined
});

#[rustfmt::skip]
static HALFWIDTH_KATAKANA_MAP: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('･', "・"),('ｦ', "ヲヺ"),('ｧ', "ァ"),('ｨ', "ィ"),('ｩ', "ゥ"),('ｪ', "ェ"),
        ('ｫ', "ォ"),('ｬ', "ャ"),('ｭ', "ュ"),('ｮ', "ョ"),('ｯ', "ッ"),('ｰ', "ー"),
        ('ｱ', "ア"),('ｲ', "イ"),('ｳ', "ウヴ"),('ｴ', "エ"),('ｵ', "オ"),('ｶ', "カガ"),
        ('ｷ', "キギ"),('ｸ', "クグ"),('ｹ', "ケゲ"),('ｺ', "コゴ"),('ｻ', "サザ"),
        ('ｼ', "シジ"),('ｽ', "スズ"),('ｾ', "セゼ"),('ｿ', "ソゾ"),('ﾀ', "タダ"),('ﾁ', "チヂ"),
        ('ﾂ', "ツヅ"),('ﾃ', "テデ"),('ﾄ', "トド"),('ﾅ', "ナ"),('ﾆ', "ニ"),('ﾇ', "ヌ"),
        ('ﾈ', "ネ"),('ﾉ', "ノ"),('ﾊ', "ハバパ"),('ﾋ', "ヒビピ"),('ﾌ', "フブプ"),
        ('ﾍ', "ヘベペ"),('ﾎ', "ホボポ"),('ﾏ', "マ"),('ﾐ', "ミ"),('ﾑ', "ム"),
        ('ﾒ', "メ"),('ﾓ', "モ"),('ﾔ', "ヤ"),('ﾕ', "ユ"),('ﾖ', "ヨ"),('ﾗ', "ラ"),
        ('ﾘ', "リ"),('ﾙ', "ル"),('ﾚ', "レ"),('ﾛ', "ロ"),('ﾜ', "ワ"),('ﾝ', "ン"),
    ])
});

#[rustfmt::skip]
static VOWEL_TO_KANA_MAPPING: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('a', "ぁあかがさざただなはばぱまゃやらゎわヵァアカガサザタダナハバパマャヤラヮワヵヷ"),
        ('i', "ぃいきぎしじちぢにひびぴみりゐィイキギシジチヂニヒビピミリヰヸ"),
        ('u', "ぅうくぐすずっつづぬふぶぷむゅゆるゥウクグスズッツヅヌフブプムュユルヴ"),
        ('e', "ぇえけげせぜてでねへべぺめれゑヶェエケゲセゼテデネヘベペメレヱヶヹ"),
        ('o', "ぉおこごそぞとどのほぼぽもょよろをォオコゴソゾトドノホボポモョヨロヲヺ"),
        ('_', "のノ"),
    ])
});

static KANA_TO_VOWEL_MAPPING: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (&vowel, characters) in VOWEL_TO_KANA_MAPPING.iter() {
        for c in characters.chars() {
            map.insert(c, vowel);
        }
    }
    map
});

pub fn is_code_point_kana(code_point: u32) -> bool {
    is_code_point_in_ranges(code_point, KANA_RANGES)
}

pub fn is_code_point_japanese(code_point: u32) -> bool {
    is_code_point_in_ranges(code_point, &*JAPANESE_RANGES)
}

pub fn is_string_partially_japanese(text: &str) -> bool {
    text.chars().any(|c| is_code_point_japanese(c as u32))
}

fn get_prolonged_hiragana(previous: char) -> Option<char> {
    match KANA_TO_VOWEL_MAPPING.get(&previous)? {
        'a' => Some('あ'),
        'i' => Some('い'),
        'u' => Some('う'),
        'e' => Some('い'),
        'o' => Some('う'),
        _ => None,
    }
}

pub fn convert_katakana_to_hiragana(text: &str, keep_prolonged_sound_marks: bool) -> String {
    let mut result = String::with_capacity(text.len());
    let offset = KATAKANA_CONVERSION_RANGE.0 - HIRAGANA_CONVERSION_RANGE.0;

    for c in text.chars() {
        let code_point = c as u32;
        let converted = match code_point {
            KATAKANA_SMALL_KA_CODE_POINT | KATAKANA_SMALL_KE_CODE_POINT => c,
            KANA_PROLONGED_SOUND_MARK_CODE_POINT => {
                if !keep_prolonged_sound_marks {
                    result
                        .chars()
                        .last()
                        .and_then(get_prolonged_hiragana)
                        .unwrap_or(c)
                } else {
                    c
                }
            }
            _ if is_code_point_in_range(code_point, KATAKANA_CONVERSION_RANGE) => {
                char::from_u32(code_point - offset).unwrap_or(c)
            }
            _ => c,
        };
        result.push(converted);
    }

    result
}

pub fn convert_hiragana_to_katakana(text: &str) -> String {
    let offset = KATAKANA_CONVERSION_RANGE.0 - HIRAGANA_CONVERSION_RANGE.0;
    text.chars()
        .map(|c| {
            let code_point = c as u32;
            if is_code_point_in_range(code_point, HIRAGANA_CONVERSION_RANGE) {
                char::from_u32(code_point + offset).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Converts halfwidth katakana to fullwidth, folding a following dakuten or
/// handakuten mark into the voiced character.
pub fn convert_halfwidth_kana_to_fullwidth(text: &str, source_map: &mut TextSourceMap) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut position = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let Some(mapping) = HALFWIDTH_KATAKANA_MAP.get(&c) else {
            result.push(c);
            position += 1;
            i += 1;
            continue;
        };

        let mut index = 0;
        if i + 1 < chars.len() {
            match chars[i + 1] as u32 {
                0xff9e => index = 1, // Dakuten
                0xff9f => index = 2, // Handakuten
                _ => {}
            }
        }

        let mut c2 = mapping.chars().nth(index);
        let mut consumed = 1;
        if index > 0 {
            match c2 {
                Some(_) => consumed = 2,
                None => c2 = mapping.chars().next(),
            }
        }

        result.push(c2.unwrap_or(c));
        if consumed == 2 {
            source_map.combine(position, 1);
        }
        position += 1;
        i += consumed;
    }

    result
}

fn dakuten_allowed(code_point: u32) -> bool {
    // かがきぎくぐけげこごさざしじすずせぜそぞただちぢっつづてでとはばぱひびぴふぶぷへべぺほ
    // plus the katakana row equivalents
    (0x304b..=0x3068).contains(&code_point)
        || (0x306f..=0x307b).contains(&code_point)
        || (0x30ab..=0x30c8).contains(&code_point)
        || (0x30cf..=0x30db).contains(&code_point)
}

fn handakuten_allowed(code_point: u32) -> bool {
    // はばぱひびぴふぶぷへべぺほ plus the katakana row equivalents
    (0x306f..=0x307b).contains(&code_point) || (0x30cf..=0x30db).contains(&code_point)
}

/// Replaces combining dakuten/handakuten (U+3099/U+309A) pairs with their
/// precomposed forms.
pub fn normalize_combining_characters(text: &str, source_map: &mut TextSourceMap) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut position = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let combined = if i + 1 < chars.len() {
            match chars[i + 1] {
                '\u{3099}' if dakuten_allowed(c as u32) => char::from_u32(c as u32 + 1),
                '\u{309A}' if handakuten_allowed(c as u32) => char::from_u32(c as u32 + 2),
                _ => None,
            }
        } else {
            None
        };

        match combined {
            Some(c2) => {
                result.push(c2);
                source_map.combine(position, 1);
                i += 2;
            }
            None => {
                result.push(c);
                i += 1;
            }
        }
        position += 1;
    }

    result
}

pub fn is_emphatic_code_point(code_point: u32) -> bool {
    code_point == HIRAGANA_SMALL_TSU_CODE_POINT
        || code_point == KATAKANA_SMALL_TSU_CODE_POINT
        || code_point == KANA_PROLONGED_SOUND_MARK_CODE_POINT
}

/// Collapses emphatic character sequences (small tsu, prolonged sound mark)
/// in the interior of the text. With `full_collapse` the emphatics are
/// removed entirely; otherwise each run is reduced to a single character.
/// Leading and trailing emphatics are left untouched.
pub fn collapse_emphatic_sequences(
    text: &str,
    full_collapse: bool,
    source_map: &mut TextSourceMap,
) -> String {
    let chars: Vec<char> = text.chars().collect();

    let mut left = 0;
    while left < chars.len() && is_emphatic_code_point(chars[left] as u32) {
        left += 1;
    }
    let mut right = chars.len();
    while right > left && is_emphatic_code_point(chars[right - 1] as u32) {
        right -= 1;
    }
    if left >= right {
        return text.to_string();
    }

    let mut result: String = chars[..left].iter().collect();
    let mut position = left;
    let mut current_collapsed: Option<u32> = None;

    for &c in &chars[left..right] {
        let code_point = c as u32;
        if is_emphatic_code_point(code_point) {
            let is_new_run = current_collapsed != Some(code_point);
            current_collapsed = Some(code_point);
            if is_new_run && !full_collapse {
                result.push(c);
                position += 1;
                continue;
            }
            source_map.replace_range(position, 1, 0);
        } else {
            current_collapsed = None;
            result.push(c);
            position += 1;
        }
    }

    result.extend(&chars[right..]);
    result
}

/// Normalizes a reading for headword comparison; katakana readings compare
/// equal to their hiragana spelling.
pub fn normalize_reading(reading: &str) -> String {
    convert_katakana_to_hiragana(reading, false)
}

fn apply_convert_halfwidth(text: &str, source_map: &mut TextSourceMap) -> String {
    convert_halfwidth_kana_to_fullwidth(text, source_map)
}

fn apply_katakana_to_hiragana(text: &str, _source_map: &mut TextSourceMap) -> String {
    convert_katakana_to_hiragana(text, false)
}

fn apply_hiragana_to_katakana(text: &str, _source_map: &mut TextSourceMap) -> String {
    convert_hiragana_to_katakana(text)
}

fn apply_normalize_combining(text: &str, source_map: &mut TextSourceMap) -> String {
    normalize_combining_characters(text, source_map)
}

pub const CONVERT_HALFWIDTH_KANA: TextTransformation = TextTransformation {
    id: "convert_halfwidth_kana",
    name: "Convert Half Width Characters to Full Width",
    apply: apply_convert_halfwidth,
};

pub const KATAKANA_TO_HIRAGANA: TextTransformation = TextTransformation {
    id: "katakana_to_hiragana",
    name: "Convert Katakana to Hiragana",
    apply: apply_katakana_to_hiragana,
};

pub const HIRAGANA_TO_KATAKANA: TextTransformation = TextTransformation {
    id: "hiragana_to_katakana",
    name: "Convert Hiragana to Katakana",
    apply: apply_hiragana_to_katakana,
};

pub const NORMALIZE_COMBINING_CHARACTERS: TextTransformation = TextTransformation {
    id: "normalize_combining_characters",
    name: "Normalize Combining Characters",
    apply: apply_normalize_combining,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn katakana_to_hiragana_round() {
        assert_eq!(convert_katakana_to_hiragana("タベル", false), "たべる");
        assert_eq!(convert_hiragana_to_katakana("たべる"), "タベル");
    }

    #[test]
    fn prolonged_sound_mark_resolves_to_vowel() {
        assert_eq!(convert_katakana_to_hiragana("カー", false), "かあ");
        assert_eq!(convert_katakana_to_hiragana("カー", true), "かー");
    }

    #[test]
    fn halfwidth_kana_with_dakuten_merges() {
        let mut map = TextSourceMap::new("ｶﾞｷ");
        let out = convert_halfwidth_kana_to_fullwidth("ｶﾞｷ", &mut map);
        assert_eq!(out, "ガキ");
        assert_eq!(map.source_length(1), 2);
        assert_eq!(map.source_length(2), 3);
    }

    #[test]
    fn combining_dakuten_normalizes() {
        let text = "か\u{3099}き";
        let mut map = TextSourceMap::new(text);
        let out = normalize_combining_characters(text, &mut map);
        assert_eq!(out, "がき");
        assert_eq!(map.source_length(1), 2);
    }

    #[test]
    fn emphatic_collapse_single() {
        let mut map = TextSourceMap::new("すっっごい");
        let out = collapse_emphatic_sequences("すっっごい", false, &mut map);
        assert_eq!(out, "すっごい");
        assert_eq!(map.source_length(4), 5);
    }

    #[test]
    fn emphatic_collapse_full() {
        let mut map = TextSourceMap::new("すっっごい");
        let out = collapse_emphatic_sequences("すっっごい", true, &mut map);
        assert_eq!(out, "すごい");
        assert_eq!(map.source_length(3), 5);
    }

    #[test]
    fn leading_and_trailing_emphatics_kept() {
        let mut map = TextSourceMap::new("っすごいー");
        let out = collapse_emphatic_sequences("っすごいー", true, &mut map);
        assert_eq!(out, "っすごいー");
        assert_eq!(map.source_length(5), 5);
    }

    #[test]
    fn japanese_code_point_classification() {
        assert!(is_code_point_japanese('食' as u32));
        assert!(is_code_point_japanese('べ' as u32));
        assert!(!is_code_point_japanese('R' as u32));
    }
}
