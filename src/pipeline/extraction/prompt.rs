//! Fixed prompt template for appointment-field extraction.

/// Builds the extraction prompt around one transcript.
///
/// The model is instructed to answer with a single JSON dictionary holding
/// exactly four keys: dn, pn, ds, time. Anything else in the reply is
/// tolerated by the parser but never trusted.
pub fn build_extraction_prompt(transcript: &str) -> String {
    format!(
        r#"Extract the following details from this text and return them strictly as a JSON dictionary:
- "dn": doctor number (return an integer)
- "pn": patient number (return an integer)
- "ds": disease
- "time": appointment time (in 12 hour format, with AM or PM)

Text: "{transcript}"

Only return the JSON dictionary. Do not include any explanation or extra text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_transcript_and_keys() {
        let prompt = build_extraction_prompt("Book doctor 7 for patient 42");
        assert!(prompt.contains("Book doctor 7 for patient 42"));
        for key in ["\"dn\"", "\"pn\"", "\"ds\"", "\"time\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Only return the JSON dictionary"));
    }
}
