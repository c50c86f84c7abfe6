use crate::parsers::text;

#[cfg(test)]
mod trim_tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(text::trim_text(""), "");
        assert_eq!(text::trim_text("   \n   \t   \r\n   "), "");
    }

    #[test]
    fn test_keeps_inner_whitespace() {
        assert_eq!(
            text::trim_text("  Bomba\n   de infusión  "),
            "Bomba\n   de infusión"
        );
    }

    #[test]
    fn test_join_fragments() {
        let fragments = ["\n  ", "RISARH", "-2024", "\n   ", "-001 "];
        assert_eq!(text::join_fragments(fragments), "RISARH-2024\n   -001");
    }
}
