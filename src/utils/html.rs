use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Entry-sheet fields are free text typed by the user and rendered back by
/// several clients, so everything stored goes through whitelist-based
/// sanitization: safe tags (like <b>, <p>) survive, dangerous tags (like
/// <script>, <iframe>) and attributes (like onclick) are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_html("hello <script>alert(1)</script>world");
        assert!(!cleaned.contains("script"));
        assert!(cleaned.contains("hello"));
    }

    #[test]
    fn keeps_plain_text() {
        assert_eq!(clean_html("I led a student project."), "I led a student project.");
    }
}
