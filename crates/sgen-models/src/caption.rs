//! Caption text normalization.

/// Maximum caption length in characters before burn-in.
///
/// Bounds the drawtext overlay so long transcripts do not cover the frame.
pub const MAX_CAPTION_CHARS: usize = 200;

/// Normalize transcript text into caption text for burn-in.
///
/// Newlines are collapsed to single spaces, then the text is truncated to
/// [`MAX_CAPTION_CHARS`] characters (on a char boundary, so multi-byte text
/// is never split mid-character).
pub fn normalize_caption(text: &str) -> String {
    let collapsed: String = text
        .split(['\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    collapsed.chars().take(MAX_CAPTION_CHARS).collect()
}
