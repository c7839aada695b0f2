use crate::language::ja::japanese;
use crate::language::languages::LanguageDescriptor;
use crate::language::text_processors::TextTransformation;
use crate::regex_util::apply_text_replacement;
use crate::text_source_map::TextSourceMap;
use crate::translation::{
    CollapseEmphatic, FindTermsTextReplacements, TextTransformationSetting,
};

/// Lazily enumerates the Cartesian product of lookup-text variants for one
/// source string, yielding each transformed string with the source map
/// that ties its positions back to the input.
///
/// Axes, most significant first: text replacements, then the language's
/// text transformations in registry order, then the emphatic collapse.
/// The counter is mixed-radix with the least-significant axis changing
/// fastest, so the order is deterministic and the untouched text always
/// comes out first.
pub struct TextVariantGenerator<'a> {
    text: &'a str,
    replacements: &'a FindTermsTextReplacements,
    transformations: Vec<(TextTransformation, &'static [bool])>,
    emphatic: Vec<(bool, bool)>,
    counter: Vec<usize>,
    radices: Vec<usize>,
    exhausted: bool,
}

const SETTING_OFF: &[bool] = &[false];
const SETTING_ON: &[bool] = &[true];
const SETTING_BOTH: &[bool] = &[false, true];

impl<'a> TextVariantGenerator<'a> {
    pub fn new(
        text: &'a str,
        descriptor: &'static LanguageDescriptor,
        replacements: &'a FindTermsTextReplacements,
        transformation_settings: &indexmap::IndexMap<String, TextTransformationSetting>,
        collapse_emphatic: CollapseEmphatic,
    ) -> Self {
        let transformations: Vec<(TextTransformation, &'static [bool])> = descriptor
            .text_transformations
            .iter()
            .map(|transformation| {
                let setting = transformation_settings
                    .get(transformation.id)
                    .copied()
                    .unwrap_or_default();
                let options = match setting {
                    TextTransformationSetting::Off => SETTING_OFF,
                    TextTransformationSetting::On => SETTING_ON,
                    TextTransformationSetting::Both => SETTING_BOTH,
                };
                (*transformation, options)
            })
            .collect();

        let emphatic = if descriptor.has_emphatic_sequences {
            match collapse_emphatic {
                CollapseEmphatic::Off => vec![(false, false)],
                CollapseEmphatic::On => vec![(false, false), (true, false)],
                CollapseEmphatic::Full => vec![(false, false), (true, true)],
            }
        } else {
            vec![(false, false)]
        };

        let mut radices = Vec::with_capacity(transformations.len() + 2);
        radices.push(replacements.len().max(1));
        radices.extend(transformations.iter().map(|(_, options)| options.len()));
        radices.push(emphatic.len());

        Self {
            text,
            replacements,
            transformations,
            emphatic,
            counter: vec![0; radices.len()],
            radices,
            exhausted: false,
        }
    }

    fn advance(&mut self) {
        for axis in (0..self.counter.len()).rev() {
            self.counter[axis] += 1;
            if self.counter[axis] < self.radices[axis] {
                return;
            }
            self.counter[axis] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for TextVariantGenerator<'_> {
    type Item = (String, TextSourceMap);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut source_map = TextSourceMap::new(self.text);
        let mut current = self.text.to_string();

        if let Some(Some(replacements)) = self.replacements.get(self.counter[0]) {
            for replacement in replacements {
                current = apply_text_replacement(
                    &current,
                    &mut source_map,
                    &replacement.pattern,
                    &replacement.replacement,
                    replacement.is_global,
                );
            }
        }

        for (axis, (transformation, options)) in self.transformations.iter().enumerate() {
            if options[self.counter[axis + 1]] {
                current = (transformation.apply)(&current, &mut source_map);
            }
        }

        let (collapse, full) = self.emphatic[*self.counter.last().expect("counter non-empty")];
        if collapse {
            current = japanese::collapse_emphatic_sequences(&current, full, &mut source_map);
        }

        self.advance();
        Some((current, source_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::languages::get_language_descriptor;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn collect_variants(
        text: &str,
        language: &str,
        settings: IndexMap<String, TextTransformationSetting>,
        collapse: CollapseEmphatic,
    ) -> Vec<String> {
        let replacements = vec![None];
        TextVariantGenerator::new(
            text,
            get_language_descriptor(language),
            &replacements,
            &settings,
            collapse,
        )
        .map(|(variant, _)| variant)
        .collect()
    }

    #[test]
    fn no_transformations_single_identity_variant() {
        let variants = collect_variants("食べた", "ja", IndexMap::new(), CollapseEmphatic::Off);
        assert_eq!(variants, vec!["食べた".to_string()]);
    }

    #[test]
    fn both_setting_doubles_variants_untransformed_first() {
        let settings =
            IndexMap::from([("decapitalize".to_string(), TextTransformationSetting::Both)]);
        let variants = collect_variants("Read", "en", settings, CollapseEmphatic::Off);
        assert_eq!(variants, vec!["Read".to_string(), "read".to_string()]);
    }

    #[test]
    fn emphatic_axis_changes_fastest() {
        let settings = IndexMap::from([(
            "katakana_to_hiragana".to_string(),
            TextTransformationSetting::Both,
        )]);
        let variants = collect_variants("スッッゴイ", "ja", settings, CollapseEmphatic::Full);
        assert_eq!(
            variants,
            vec![
                "スッッゴイ".to_string(),
                "スゴイ".to_string(),
                "すっっごい".to_string(),
                "すごい".to_string(),
            ]
        );
    }

    #[test]
    fn replacement_axis_updates_source_map() {
        let replacements = vec![
            None,
            Some(vec![crate::translation::FindTermsTextReplacement {
                pattern: fancy_regex::Regex::new("っっ").unwrap(),
                replacement: "っ".to_string(),
                is_global: true,
            }]),
        ];
        let generator = TextVariantGenerator::new(
            "すっっごい",
            get_language_descriptor("ja"),
            &replacements,
            &IndexMap::new(),
            CollapseEmphatic::Off,
        );
        let variants: Vec<(String, TextSourceMap)> = generator.collect();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].0, "すっごい");
        // The full replaced prefix maps back onto the full original text.
        assert_eq!(variants[1].1.source_length(4), 5);
    }
}
