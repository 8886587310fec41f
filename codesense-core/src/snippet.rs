/// File extensions accepted for analysis.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".py", ".js", ".java", ".ts", ".cpp", ".c"];

/// Check whether a filename ends in one of the accepted extensions.
pub fn has_allowed_extension(filename: &str) -> bool {
    ALLOWED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
}

/// Decode uploaded bytes as UTF-8 and cap the result at `max_chars` characters.
///
/// Decoding is lossy: invalid byte sequences become U+FFFD rather than
/// failing the upload. The cap bounds prompt size and may cut the code
/// mid-token; truncation always lands on a character boundary.
pub fn prepare_snippet(bytes: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.into_owned(),
    }
}
