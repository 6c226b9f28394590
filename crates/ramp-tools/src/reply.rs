/// Tagged result of a knowledge tool.
///
/// Domain misses are variants, not free-form strings, so callers can
/// discriminate them programmatically; `render` converts to the text handed
/// to the LLM at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    Answer(String),
    /// Unknown employee id (or other missing entity).
    NotFound,
    /// A search that matched nothing.
    NoMatches,
}

impl ToolReply {
    #[must_use]
    pub fn render(self) -> String {
        match self {
            Self::Answer(text) => text,
            Self::NotFound => "Employee not found.".into(),
            Self::NoMatches => "No results found.".into(),
        }
    }

    #[must_use]
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }
}
