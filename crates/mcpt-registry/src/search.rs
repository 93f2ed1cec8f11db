//! Catalog queries: substring search and "did you mean" suggestions.

use crate::{RegistryDocument, ToolEntry};

const SUGGEST_THRESHOLD: f64 = 0.2;

/// Every tool whose id, name, description or any tag contains `query`,
/// case-insensitively. Registry order is kept and each tool appears at most
/// once.
pub fn search_tools<'a>(doc: &'a RegistryDocument, query: &str) -> Vec<&'a ToolEntry> {
    let needle = query.to_lowercase();
    doc.tools
        .iter()
        .filter(|tool| matches(tool, &needle))
        .collect()
}

fn matches(tool: &ToolEntry, needle: &str) -> bool {
    [&tool.id, &tool.name, &tool.description]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
        || tool
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Up to `limit` tools whose ids look like `query`, highest score first.
///
/// Score: 0.5 when the query is a substring of the id, 0.3 more when the id
/// starts with it, plus half the similarity ratio of the two strings. Scores
/// at or below 0.2 are dropped; ties keep registry order.
pub fn suggest_similar<'a>(
    doc: &'a RegistryDocument,
    query: &str,
    limit: usize,
) -> Vec<&'a ToolEntry> {
    let query = query.to_lowercase();
    let mut scored: Vec<(f64, &ToolEntry)> = doc
        .tools
        .iter()
        .filter_map(|tool| {
            let id = tool.id.to_lowercase();
            let mut score = 0.0;
            if id.contains(&query) {
                score += 0.5;
            }
            if id.starts_with(&query) {
                score += 0.3;
            }
            score += similarity_ratio(&query, &id) * 0.5;
            (score > SUGGEST_THRESHOLD).then_some((score, tool))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, t)| t).collect()
}

/// Ratcliff/Obershelp similarity in `[0, 1]`: twice the number of matching
/// characters over the combined length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Start in `a`, start in `b`, and length of the earliest longest common run.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = row;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(id: &str, name: &str, description: &str, tags: &[&str]) -> ToolEntry {
        let mut t = ToolEntry::new(id);
        t.name = name.into();
        t.description = description.into();
        t.tags = tags.iter().map(|s| s.to_string()).collect();
        t
    }

    fn ids<'a>(tools: &[&'a ToolEntry]) -> Vec<&'a str> {
        tools.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn search_by_id_keeps_registry_order() {
        let doc = RegistryDocument::new(vec![
            ToolEntry::new("file-compass"),
            ToolEntry::new("tool-compass"),
            ToolEntry::new("voice-soundboard"),
        ]);
        assert_eq!(
            ids(&search_tools(&doc, "compass")),
            vec!["file-compass", "tool-compass"]
        );
    }

    #[test]
    fn search_covers_name_description_and_tags() {
        let doc = RegistryDocument::new(vec![
            tool("a", "Voice Board", "", &[]),
            tool("b", "", "Plays AUDIO clips", &[]),
            tool("c", "", "", &["Audio", "fun"]),
            tool("d", "", "", &["video"]),
        ]);
        assert_eq!(ids(&search_tools(&doc, "voice")), vec!["a"]);
        assert_eq!(ids(&search_tools(&doc, "audio")), vec!["b", "c"]);
        assert_eq!(ids(&search_tools(&doc, "FUN")), vec!["c"]);
    }

    #[test]
    fn tool_matching_several_fields_appears_once() {
        let doc = RegistryDocument::new(vec![tool(
            "compass",
            "Compass",
            "compass for files",
            &["compass"],
        )]);
        assert_eq!(search_tools(&doc, "compass").len(), 1);
    }

    #[test]
    fn search_without_hits_is_empty() {
        let doc = RegistryDocument::new(vec![ToolEntry::new("file-compass")]);
        assert!(search_tools(&doc, "nonexistent").is_empty());
    }

    #[test]
    fn similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", "abc"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        // "abcd" vs "bcde": "bcd" matches, 2*3/8
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn suggest_ranks_exact_match_first() {
        let doc = RegistryDocument::new(vec![
            ToolEntry::new("tool-scan"),
            ToolEntry::new("file-compass"),
        ]);
        let hits = suggest_similar(&doc, "FILE-COMPASS", 5);
        assert_eq!(hits.first().map(|t| t.id.as_str()), Some("file-compass"));
    }

    #[test]
    fn suggest_respects_limit_and_threshold() {
        let tools = (0..10).map(|i| ToolEntry::new(format!("tool-{i}"))).collect();
        let doc = RegistryDocument::new(tools);
        assert_eq!(suggest_similar(&doc, "tool", 3).len(), 3);

        let unrelated = RegistryDocument::new(vec![ToolEntry::new("zzzzzzzz")]);
        assert!(suggest_similar(&unrelated, "abc", 5).is_empty());
    }

    #[test]
    fn suggest_finds_partial_matches() {
        let doc = RegistryDocument::new(vec![
            ToolEntry::new("file-compass"),
            ToolEntry::new("tool-compass"),
            ToolEntry::new("voice-soundboard"),
        ]);
        let hits = ids(&suggest_similar(&doc, "compass", 5));
        assert!(hits.contains(&"file-compass"));
        assert!(hits.contains(&"tool-compass"));
    }
}
