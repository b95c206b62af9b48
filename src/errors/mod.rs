use core::fmt;
use std::error::Error;
use std::fmt::Display;

/// Error type of the election core and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionError {
    text: String,
    cause: String,
}

pub(crate) type Result<T> = std::result::Result<T, ElectionError>;

/// Creates an Err variant with the message text and an optional (possibly empty) cause.
pub fn new_err<T>(text: String, cause: String) -> std::result::Result<T, ElectionError> {
    Err(ElectionError { text, cause })
}

impl ElectionError {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl Display for ElectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cause_word = {
            if !self.cause.is_empty() {
                " Cause: ".to_string()
            } else {
                String::new()
            }
        };
        write!(f, "{}.{}{}", self.text, cause_word, self.cause)
    }
}

impl Error for ElectionError {}

impl From<std::io::Error> for ElectionError {
    fn from(err: std::io::Error) -> Self {
        ElectionError {
            text: "I/O failure".to_string(),
            cause: err.to_string(),
        }
    }
}

/// Folds several errors into one. Only the first `shown` causes are spelled out, the rest
/// are counted.
pub(crate) fn new_multiple_err<T>(text: String, causes: Vec<ElectionError>, shown: usize) -> Result<T> {
    let omitted = causes.len().saturating_sub(shown);
    let listed: Vec<String> = causes
        .iter()
        .take(shown)
        .enumerate()
        .map(|(index, err)| format!("{}) {}", index + 1, err))
        .collect();

    let mut cause = String::new();
    if !listed.is_empty() {
        cause = format!("Errors: {}", listed.join(" "));
    }
    if omitted > 0 {
        cause.push_str(&format!(" (+{} more)", omitted));
    }

    Err(ElectionError { text, cause })
}
