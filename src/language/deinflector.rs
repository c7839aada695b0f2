use indexmap::IndexSet;

/// Bitset over the grammatical rule vocabulary shared by the deinflector
/// and dictionary word classes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rules(u32);

impl Rules {
    pub const NONE: Rules = Rules(0);
    /// Ichidan verb
    pub const V1: Rules = Rules(1);
    /// Godan verb
    pub const V5: Rules = Rules(1 << 1);
    /// Suru verb
    pub const VS: Rules = Rules(1 << 2);
    /// Kuru verb
    pub const VK: Rules = Rules(1 << 3);
    /// Zuru verb
    pub const VZ: Rules = Rules(1 << 4);
    /// Adjective with i ending
    pub const ADJ_I: Rules = Rules(1 << 5);
    /// Intermediate -iru endings for progressive or perfect tense
    pub const IRU: Rules = Rules(1 << 6);

    pub const fn or(self, other: Rules) -> Rules {
        Rules(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersects(self, other: Rules) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Maps dictionary word-class identifiers onto the shared bit layout.
    /// Unknown identifiers contribute no bits.
    pub fn from_parts_of_speech<S: AsRef<str>>(parts_of_speech: &[S]) -> Rules {
        let mut rules = Rules::NONE;
        for part in parts_of_speech {
            rules = rules.or(match part.as_ref() {
                "v1" => Rules::V1,
                "v5" => Rules::V5,
                "vs" => Rules::VS,
                "vk" => Rules::VK,
                "vz" => Rules::VZ,
                "adj-i" => Rules::ADJ_I,
                "iru" => Rules::IRU,
                _ => Rules::NONE,
            });
        }
        rules
    }

    /// Whether a deinflection candidate is morphologically compatible with
    /// a dictionary entry's word classes.
    pub fn fits(candidate: Rules, entry: Rules) -> bool {
        candidate.is_empty() || candidate.intersects(entry)
    }
}

impl std::ops::BitOr for Rules {
    type Output = Rules;
    fn bitor(self, rhs: Rules) -> Rules {
        self.or(rhs)
    }
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rules({:#09b})", self.0)
    }
}

/// One suffix rewrite: replace a trailing `suffix_in` with `suffix_out`.
#[derive(Clone, Copy, Debug)]
pub struct SuffixRule {
    pub suffix_in: &'static str,
    pub suffix_out: &'static str,
    /// Candidate masks this rule may follow; `NONE` means unrestricted.
    pub rules_in: Rules,
    /// Mask describing the produced form.
    pub rules_out: Rules,
}

/// A named group of suffix rules; the group name is the inflection rule
/// identifier recorded in deinflection reason chains.
#[derive(Clone, Copy, Debug)]
pub struct DeinflectionRuleGroup {
    pub name: &'static str,
    pub rules: &'static [SuffixRule],
}

/// A candidate lemma recovered from a surface form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deinflection {
    pub term: String,
    pub rules: Rules,
    /// Names of the rule groups applied, outermost inflection first.
    pub reasons: Vec<&'static str>,
}

/// Breadth-first suffix rewriting over a static rule table.
#[derive(Clone, Debug)]
pub struct Deinflector {
    groups: &'static [DeinflectionRuleGroup],
}

impl Deinflector {
    pub fn new(groups: &'static [DeinflectionRuleGroup]) -> Self {
        Self { groups }
    }

    pub fn japanese() -> Self {
        Self::new(super::ja::deinflect::JAPANESE_DEINFLECTION_RULES)
    }

    /// Produces every reachable `(term, rules, reasons)` candidate for
    /// `source`, the unchanged source first. Duplicate `(term, rules)`
    /// pairs are pruned, which also bounds the search.
    pub fn deinflect(&self, source: &str) -> Vec<Deinflection> {
        let mut results = vec![Deinflection {
            term: source.to_string(),
            rules: Rules::NONE,
            reasons: Vec::new(),
        }];
        let mut seen: IndexSet<(String, u32)> = IndexSet::new();
        seen.insert((source.to_string(), 0));

        let mut i = 0;
        while i < results.len() {
            let Deinflection {
                term,
                rules,
                reasons,
            } = results[i].clone();
            for group in self.groups {
                for rule in group.rules {
                    if !(rule.rules_in.is_empty() || rules.intersects(rule.rules_in)) {
                        continue;
                    }
                    let Some(stem) = term.strip_suffix(rule.suffix_in) else {
                        continue;
                    };
                    if stem.is_empty() && rule.suffix_out.is_empty() {
                        continue;
                    }
                    let new_term = format!("{stem}{}", rule.suffix_out);
                    if !seen.insert((new_term.clone(), rule.rules_out.bits())) {
                        continue;
                    }
                    log::trace!("deinflect: {term} -{}-> {new_term}", group.name);
                    let mut new_reasons = reasons.clone();
                    new_reasons.push(group.name);
                    results.push(Deinflection {
                        term: new_term,
                        rules: rule.rules_out,
                        reasons: new_reasons,
                    });
                }
            }
            i += 1;
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn japanese_candidates(source: &str) -> Vec<Deinflection> {
        Deinflector::japanese().deinflect(source)
    }

    fn find<'a>(candidates: &'a [Deinflection], term: &str) -> Option<&'a Deinflection> {
        candidates.iter().find(|c| c.term == term)
    }

    #[test]
    fn emits_source_unchanged_first() {
        let candidates = japanese_candidates("食べた");
        assert_eq!(candidates[0].term, "食べた");
        assert!(candidates[0].reasons.is_empty());
        assert!(candidates[0].rules.is_empty());
    }

    #[test]
    fn past_tense_ichidan() {
        let candidates = japanese_candidates("食べた");
        let lemma = find(&candidates, "食べる").expect("食べる candidate");
        assert_eq!(lemma.reasons, vec!["past"]);
        assert!(lemma.rules.intersects(Rules::V1));
    }

    #[test]
    fn te_form_godan() {
        let candidates = japanese_candidates("走って");
        let lemma = find(&candidates, "走る").expect("走る candidate");
        assert_eq!(lemma.reasons, vec!["-te"]);
        assert!(lemma.rules.intersects(Rules::V5));
    }

    #[test]
    fn negative_past_chains() {
        let candidates = japanese_candidates("食べなかった");
        let lemma = find(&candidates, "食べる").expect("食べる candidate");
        assert_eq!(lemma.reasons, vec!["past", "negative"]);
    }

    #[test]
    fn polite_past_suru() {
        let candidates = japanese_candidates("勉強しました");
        assert!(find(&candidates, "勉強する").is_some());
    }

    #[test]
    fn rule_fit_semantics() {
        assert!(Rules::fits(Rules::NONE, Rules::V5));
        assert!(Rules::fits(Rules::V1, Rules::V1 | Rules::VS));
        assert!(!Rules::fits(Rules::V1, Rules::V5));
    }

    #[test]
    fn duplicate_candidates_pruned() {
        let candidates = japanese_candidates("きた");
        let count = candidates
            .iter()
            .filter(|c| c.term == "くる" && c.rules == Rules::VK)
            .count();
        assert_eq!(count, 1);
    }
}
