use thiserror::Error;

/// Crate-wide result type, defaulting to [`JitenError`].
pub type Result<T, E = JitenError> = std::result::Result<T, E>;

/// All error paths reachable through the public lookup API.
#[derive(Error, Debug)]
pub enum JitenError {
    #[error(transparent)]
    Translator(#[from] TranslatorError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Errors raised by the translator itself, before any database work.
///
/// These are programming errors on the caller's side; the translator
/// assumes options were validated and fails fast when they were not.
#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("merge mode requires options.main_dictionary to be set")]
    MissingMainDictionary,
}

/// Transport failures at the dictionary database boundary.
///
/// The translator propagates these unchanged and performs no retry; a
/// failed bulk query aborts the whole request.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("dictionary database query failed: {0}")]
    Query(String),
    #[error("dictionary data error: {0}")]
    Schema(#[from] SchemaError),
}

/// Schema violations detected while validating dictionary bank data.
///
/// Bank rows are positional tuples; every variant carries enough context
/// to locate the offending row in its source file.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("term bank entry {index}: {reason}")]
    TermBankEntry { index: usize, reason: String },
    #[error("term meta bank entry {index}: {reason}")]
    TermMetaBankEntry { index: usize, reason: String },
    #[error("kanji bank entry {index}: {reason}")]
    KanjiBankEntry { index: usize, reason: String },
    #[error("kanji meta bank entry {index}: {reason}")]
    KanjiMetaBankEntry { index: usize, reason: String },
    #[error("tag bank entry {index}: {reason}")]
    TagBankEntry { index: usize, reason: String },
    #[error("malformed bank json: {0}")]
    Json(#[from] serde_json::Error),
}
