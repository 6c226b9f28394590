//! Normalization of raw PDF-extracted text before chunking.

use std::sync::LazyLock;

use regex::Regex;

static FORM_FEED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x0c").unwrap());

/// Repeating header/footer lines specific to the known source documents,
/// with any trailing page number.
static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"SHRM HUMAN RESOURCE CURRICULUM GUIDEBOOK.*?PROGRAMS\s*\d*",
        r"2018 SHRM Guide to Public Policy Issues\s*\d*",
        r"2017 SHRM Guide to Public Policy Issues\s*\d*",
        r"©\d{4}.*?reserved\.",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static STANDALONE_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\d{1,3}\s*\n").unwrap());
static PAGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Page \d+").unwrap());
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"www\.\S+").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip extraction noise from raw document text.
///
/// Total function: always returns a (possibly empty) string.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut text = FORM_FEED.replace_all(text, " ").into_owned();

    for pattern in BOILERPLATE.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }

    text = STANDALONE_PAGE_NUMBER.replace_all(&text, "\n").into_owned();
    text = PAGE_TOKEN.replace_all(&text, "").into_owned();

    text = HTTP_URL.replace_all(&text, "").into_owned();
    text = BARE_URL.replace_all(&text, "").into_owned();

    text = WHITESPACE_RUN.replace_all(&text, " ").into_owned();
    text = NEWLINE_RUN.replace_all(&text, "\n\n").into_owned();

    text.trim().to_owned()
}
