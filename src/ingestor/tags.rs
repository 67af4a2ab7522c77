//! Tag extraction from `#EXTINF` descriptor lines
//!
//! Extraction is a plain substring search for `name="`, returning everything
//! up to the next `"`. Escaped quotes are not understood, and a value with no
//! closing quote runs to the end of the line.

pub const TAG_GROUP_TITLE: &str = "group-title";
pub const TAG_TVG_NAME: &str = "tvg-name";
pub const TAG_TVG_ID: &str = "tvg-id";
pub const TAG_TVG_LOGO: &str = "tvg-logo";

/// Extract the value of `tag_name` from a descriptor line.
///
/// Returns an empty string when the tag is absent.
pub fn extract_tag<'a>(metadata_line: &'a str, tag_name: &str) -> &'a str {
    let marker = format!("{}=\"", tag_name);
    let Some(pos) = metadata_line.find(&marker) else {
        return "";
    };

    let value = &metadata_line[pos + marker.len()..];
    match value.find('"') {
        Some(end) => &value[..end],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"#EXTINF:-1 tvg-id="" tvg-name="24/7 Wild Nile" tvg-logo="http://logo/x.png" group-title="24/7 Shows",24/7 Wild Nile"#;

    #[test]
    fn test_extract_present_tags() {
        assert_eq!(extract_tag(LINE, TAG_TVG_NAME), "24/7 Wild Nile");
        assert_eq!(extract_tag(LINE, TAG_TVG_LOGO), "http://logo/x.png");
        assert_eq!(extract_tag(LINE, TAG_GROUP_TITLE), "24/7 Shows");
    }

    #[test]
    fn test_extract_empty_and_absent_tags() {
        assert_eq!(extract_tag(LINE, TAG_TVG_ID), "");
        assert_eq!(extract_tag(LINE, "tvg-shift"), "");
        assert_eq!(extract_tag("", TAG_TVG_NAME), "");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let line = r#"#EXTINF:-1 group-title="A" group-title="B",x"#;
        assert_eq!(extract_tag(line, TAG_GROUP_TITLE), "A");
    }

    #[test]
    fn test_unterminated_value_runs_to_end_of_line() {
        let line = r#"#EXTINF:-1 tvg-name="Broken,Broken"#;
        assert_eq!(extract_tag(line, TAG_TVG_NAME), "Broken,Broken");
    }

    #[test]
    fn test_embedded_quote_truncates_value() {
        let line = r#"#EXTINF:-1 tvg-name="The \"Best\" Channel",x"#;
        assert_eq!(extract_tag(line, TAG_TVG_NAME), r"The \");
    }

    #[test]
    fn test_substring_search_matches_suffix_of_longer_tag() {
        // "x-tvg-name" contains the marker "tvg-name=\""
        let line = r#"#EXTINF:-1 x-tvg-name="Alias" tvg-name="Real",Real"#;
        assert_eq!(extract_tag(line, TAG_TVG_NAME), "Alias");
    }

    #[test]
    fn test_multibyte_values() {
        let line = r#"#EXTINF:-1 tvg-name="Ünïcødé ТВ" group-title="日本",x"#;
        assert_eq!(extract_tag(line, TAG_TVG_NAME), "Ünïcødé ТВ");
        assert_eq!(extract_tag(line, TAG_GROUP_TITLE), "日本");
    }
}
