//! Locating JSON objects inside free-form model output.

/// Return the JSON object embedded in `text`, if any.
///
/// Handles fenced ```json blocks and bare objects surrounded by prose.
/// The result spans from the first `{` to the last `}` of the candidate.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    let candidate = match text.find("```json") {
        Some(start) => {
            let start = start + 7;
            let end = text[start..]
                .find("```")
                .map(|i| start + i)
                .unwrap_or(text.len());
            &text[start..end]
        }
        None => text,
    };

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    (end > start).then(|| &candidate[start..=end])
}
