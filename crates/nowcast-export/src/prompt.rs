//! Operator prompt wording and answer matching

pub const PROMPT: &str = "Скопировать последние десять записей в Excel файл? (Д/н)";

/// Answers that trigger an export, compared trimmed and lowercased
pub const AFFIRMATIVE: &[&str] = &["да", "yes", "y", "д"];

pub fn is_affirmative(line: &str) -> bool {
    let answer = line.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}
