use fancy_regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::text_source_map::TextSourceMap;

static MATCH_REPLACEMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\$|&|`|'|(\d\d?)|<([^>]*)>)").expect("replacement pattern"));

/// Applies a single regex replacement to `text`, updating `source_map` so
/// transformed positions keep pointing at the original text.
///
/// `replacement` supports the JS-style special sequences `$$`, `$&`,
/// `` $` ``, `$'`, `$1`–`$99` and `$<name>`.
pub fn apply_text_replacement(
    text: &str,
    source_map: &mut TextSourceMap,
    pattern: &Regex,
    replacement: &str,
    is_global: bool,
) -> String {
    let mut current_text = text.to_string();
    let mut current_pos = 0;
    let mut first_match_done = false;

    loop {
        if !is_global && first_match_done {
            break;
        }

        let captures = match pattern.captures(&current_text[current_pos..]) {
            Ok(Some(caps)) => caps,
            Ok(None) | Err(_) => break,
        };

        let match_text = captures.get(0).expect("group 0 always present");
        let match_start = current_pos + match_text.start();
        let match_end = current_pos + match_text.end();

        let actual_replacement =
            apply_match_replacement(replacement, &captures, &current_text[current_pos..]);

        let match_char_start = current_text[..match_start].chars().count();
        let match_char_count = current_text[match_start..match_end].chars().count();
        let replacement_char_count = actual_replacement.chars().count();
        source_map.replace_range(match_char_start, match_char_count, replacement_char_count);

        let match_is_empty = match_start == match_end;
        let mut new_text = String::with_capacity(
            current_text.len() - (match_end - match_start) + actual_replacement.len(),
        );
        new_text.push_str(&current_text[..match_start]);
        new_text.push_str(&actual_replacement);
        new_text.push_str(&current_text[match_end..]);
        current_text = new_text;

        first_match_done = true;

        // Resume after the replacement; a zero-width match must still advance.
        current_pos = match_start + actual_replacement.len();
        if match_is_empty {
            match current_text[current_pos..].chars().next() {
                Some(c) => current_pos += c.len_utf8(),
                None => break,
            }
        }
        if current_pos >= current_text.len() {
            break;
        }
    }

    current_text
}

fn apply_match_replacement(
    replacement_pattern: &str,
    outer_captures: &Captures,
    original_text_at_match_time: &str,
) -> String {
    MATCH_REPLACEMENT_PATTERN
        .replace_all(replacement_pattern, |inner_caps: &Captures| {
            let g0 = inner_caps.get(0).expect("group 0 always present").as_str();

            if let Some(digits) = inner_caps.get(1) {
                if let Ok(idx) = digits.as_str().parse::<usize>() {
                    if idx > 0 && idx < outer_captures.len() {
                        return outer_captures
                            .get(idx)
                            .map_or(String::new(), |m| m.as_str().to_string());
                    }
                }
                g0.to_string()
            } else if let Some(name) = inner_caps.get(2) {
                match outer_captures.name(name.as_str()) {
                    Some(named) => named.as_str().to_string(),
                    None => g0.to_string(),
                }
            } else {
                let whole = outer_captures.get(0).expect("group 0 always present");
                match g0 {
                    "$$" => "$".to_string(),
                    "$&" => whole.as_str().to_string(),
                    "$`" => original_text_at_match_time[..whole.start()].to_string(),
                    "$'" => original_text_at_match_time[whole.end()..].to_string(),
                    _ => g0.to_string(),
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_replacement_updates_source_map() {
        let pattern = Regex::new("ぢ").unwrap();
        let mut map = TextSourceMap::new("ぢしょ");
        let out = apply_text_replacement("ぢしょ", &mut map, &pattern, "じ", true);
        assert_eq!(out, "じしょ");
        assert_eq!(map.source_length(3), 3);
    }

    #[test]
    fn numbered_group_replacement() {
        let pattern = Regex::new(r"(\w+)-(\w+)").unwrap();
        let mut map = TextSourceMap::new("ab-cd");
        let out = apply_text_replacement("ab-cd", &mut map, &pattern, "$2$1", true);
        assert_eq!(out, "cdab");
        assert_eq!(map.source_length(4), 5);
    }

    #[test]
    fn non_global_stops_after_first() {
        let pattern = Regex::new("a").unwrap();
        let mut map = TextSourceMap::new("aaa");
        let out = apply_text_replacement("aaa", &mut map, &pattern, "b", false);
        assert_eq!(out, "baa");
    }

    #[test]
    fn dollar_ampersand_expands_to_match() {
        let pattern = Regex::new("b+").unwrap();
        let mut map = TextSourceMap::new("abbc");
        let out = apply_text_replacement("abbc", &mut map, &pattern, "[$&]", true);
        assert_eq!(out, "a[bb]c");
        assert_eq!(map.source_length(6), 4);
    }
}
