use crate::error::{ParseError, ParseErrorKind};
use crate::types::WizardDefinition;

/// Parse a YAML or JSON string into an unvalidated wizard definition.
///
/// Performs deserialization and type mapping only. Missing required
/// attributes are not parse errors; they are reported by validation.
pub fn parse(input: &str) -> Result<WizardDefinition, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::Syntax, "empty input"));
    }

    check_multi_document(input)?;

    // JSON is a YAML subset, so one decoder covers both encodings.
    let value: serde_json::Value = serde_saphyr::from_str(input)
        .map_err(|e| ParseError::new(ParseErrorKind::Syntax, e.to_string()))?;

    if !value.is_object() {
        return Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            "wizard definition root must be a mapping",
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError::new(classify_json_error(&msg), msg)
    })
}

/// Only `---` at column 0 counts as a document marker.
fn check_multi_document(input: &str) -> Result<(), ParseError> {
    let mut doc_count = 0;
    for (line_num, line) in input.lines().enumerate() {
        if line.starts_with("---") && line[3..].trim().is_empty() {
            doc_count += 1;
            if doc_count > 1 {
                return Err(ParseError {
                    kind: ParseErrorKind::Syntax,
                    message: "multi-document YAML is not supported".to_string(),
                    line: Some(line_num + 1),
                    column: Some(1),
                });
            }
        }
    }
    Ok(())
}

fn classify_json_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("invalid type") || lower.contains("expected") || lower.contains("flag") {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}
