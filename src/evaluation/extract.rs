//! Post-processing of model output and prompts.

/// Marker that precedes the final answer in a chain-of-thought response.
pub const ANSWER_MARKER: &str = "<ANSWER>: ";

/// Text after the last [`ANSWER_MARKER`], or the whole text when there is no marker.
///
/// Returns `None` for a missing or empty input.
pub fn extract_final_answer(text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    let answer = match text.rsplit_once(ANSWER_MARKER) {
        Some((_, answer)) => answer,
        None => text,
    };
    Some(answer.to_string())
}

/// All lines of an instruction except the last one, which holds the question.
///
/// A single-line instruction yields an empty context; a missing or empty
/// input yields `None`.
pub fn extract_context(instruction: Option<&str>) -> Option<String> {
    let instruction = instruction.filter(|t| !t.is_empty())?;
    let lines: Vec<&str> = instruction.split('\n').collect();
    Some(lines[..lines.len() - 1].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_final_answer() {
        assert_eq!(
            extract_final_answer(Some("reasoning text <ANSWER>: 42")).as_deref(),
            Some("42")
        );
        assert_eq!(
            extract_final_answer(Some("no marker here")).as_deref(),
            Some("no marker here")
        );
        assert_eq!(extract_final_answer(None), None);
        assert_eq!(extract_final_answer(Some("")), None);
    }

    #[test]
    fn test_extract_final_answer_uses_last_marker() {
        assert_eq!(
            extract_final_answer(Some("<ANSWER>: draft\nrevised <ANSWER>: final")).as_deref(),
            Some("final")
        );
    }

    #[test]
    fn test_extract_final_answer_marker_at_end() {
        assert_eq!(extract_final_answer(Some("thinking <ANSWER>: ")).as_deref(), Some(""));
    }

    #[test]
    fn test_extract_context() {
        assert_eq!(
            extract_context(Some("doc1\ndoc2\nWhat is X?")).as_deref(),
            Some("doc1\ndoc2")
        );
        assert_eq!(extract_context(Some("What is X?")).as_deref(), Some(""));
        assert_eq!(extract_context(None), None);
        assert_eq!(extract_context(Some("")), None);
    }

    #[test]
    fn test_extract_context_trailing_newline() {
        assert_eq!(extract_context(Some("doc1\nQ?\n")).as_deref(), Some("doc1\nQ?"));
    }
}
