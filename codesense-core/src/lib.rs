pub mod gemini;
pub mod review;
pub mod snippet;

pub use gemini::{GeminiClient, GeminiError};
pub use review::{parse_review, system_prompt, user_prompt, CodeReview};
pub use snippet::{has_allowed_extension, prepare_snippet, ALLOWED_EXTENSIONS};
