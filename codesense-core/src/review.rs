use serde::{Deserialize, Serialize};

/// Structured review produced for a single analyzed file.
///
/// This struct is the single source of truth for the review shape: the
/// Gemini response schema is generated from the same field set (see
/// `gemini::response_schema`), and the model's raw text is validated
/// against it on the way back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    pub summary: String,
    pub readability: String,
    pub modularity: String,
    pub bugs: String,
    pub suggestions: String,
    /// Overall quality score. The prompt asks for 0-10 but the range is not
    /// enforced at runtime, only that it is an integer.
    pub score: i64,
}

/// System prompt for code review
pub fn system_prompt() -> String {
    include_str!("../prompt.txt").to_string()
}

/// Create a user prompt from a filename and its (possibly truncated) contents
pub fn user_prompt(filename: &str, snippet: &str) -> String {
    format!(
        "Analyze this code for readability, modularity, and potential bugs.\n\
         Provide improvement suggestions.\n\
         \n\
         Code file: {}\n\
         \n\
         Code:\n\
         ---\n\
         {}\n\
         ---\n\
         \n\
         Generate the complete JSON object now.\n",
        filename, snippet
    )
}

/// Parse and validate the model's raw text as a `CodeReview`.
///
/// The parse is strict: the text must be a bare JSON object with every field
/// present and correctly typed. Anything else is an error for the caller to
/// surface.
pub fn parse_review(raw: &str) -> Result<CodeReview, serde_json::Error> {
    serde_json::from_str(raw)
}
