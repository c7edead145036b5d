//! Download file names.

use chrono::NaiveDate;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Make a patient name safe for a file name.
///
/// Names are decomposed (NFD) and combining marks dropped, so accented
/// letters fold to their base letter. Anything else outside ASCII letters,
/// digits, whitespace, `-` and `_` is removed, and whitespace runs become a
/// single `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let kept: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `orcamento_<number>_<name>.pdf`.
pub fn budget_file_name(number: &str, patient_name: &str) -> String {
    format!("orcamento_{}_{}.pdf", number, sanitize_file_stem(patient_name))
}

/// `anamnese_<name>_<YYYY-MM-DD>.pdf`.
pub fn anamnesis_file_name(patient_name: &str, date: NaiveDate) -> String {
    format!(
        "anamnese_{}_{}.pdf",
        sanitize_file_stem(patient_name),
        date.format("%Y-%m-%d")
    )
}
