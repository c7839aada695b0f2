use crate::database::TermEntry;
use crate::dictionary::InflectionHypothesis;
use crate::language::deinflector::Rules;

/// A deinflection candidate flowing through the term-finding pipeline:
/// the text trail that produced it, the rule mask constraining which
/// dictionary entries fit, and the database hits attached so far.
#[derive(Clone, Debug)]
pub struct DatabaseDeinflection {
    pub original_text: String,
    pub transformed_text: String,
    pub deinflected_text: String,
    pub conditions: Rules,
    pub inflection_hypotheses: Vec<InflectionHypothesis>,
    /// Set when this candidate was synthesized from a form-of entry rather
    /// than scanned out of the source text.
    pub is_dictionary_deinflection: bool,
    pub database_entries: Vec<TermEntry>,
}

impl DatabaseDeinflection {
    pub fn new(
        original_text: impl Into<String>,
        transformed_text: impl Into<String>,
        deinflected_text: impl Into<String>,
        conditions: Rules,
        inflection_hypotheses: Vec<InflectionHypothesis>,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            transformed_text: transformed_text.into(),
            deinflected_text: deinflected_text.into(),
            conditions,
            inflection_hypotheses,
            is_dictionary_deinflection: false,
            database_entries: Vec::new(),
        }
    }
}
