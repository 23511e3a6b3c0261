use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid tag pattern"));

/// Derives the tag list from note content: every `#word` occurrence,
/// deduplicated, first-seen order.
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for capture in TAG_PATTERN.captures_iter(content) {
        let tag = capture[1].to_owned();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::extract_tags;

    #[test]
    fn extracts_and_deduplicates_hashtags() {
        let tags = extract_tags("an #idea about #writing, revisiting the #idea");
        assert_eq!(tags, vec!["idea", "writing"]);
    }

    #[test]
    fn plain_text_yields_no_tags() {
        assert!(extract_tags("no tags here, # alone does not count").is_empty());
    }
}
