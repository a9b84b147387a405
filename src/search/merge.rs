use std::collections::HashMap;

use crate::models::SearchResult;

/// Merge per-platform hit lists into one result per `rawLyricFile`.
///
/// The first hit for a file seeds the merged result (its `id` and `metadata` are
/// kept); later hits only add their platform tag. Only platforms that matched on
/// their own show up in `platforms`. Output order is first-seen order across the
/// lists as given.
pub fn merge_platform_hits<I>(per_platform: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = Vec<SearchResult>>,
{
    let mut merged: Vec<SearchResult> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for hits in per_platform {
        for hit in hits {
            match positions.get(&hit.raw_lyric_file) {
                Some(&pos) => {
                    let existing = &mut merged[pos];
                    for platform in hit.platforms {
                        if !existing.platforms.contains(&platform) {
                            existing.platforms.push(platform);
                        }
                    }
                }
                None => {
                    positions.insert(hit.raw_lyric_file.clone(), merged.len());
                    merged.push(hit);
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::models::Metadata;

    fn hit(id: &str, file: &str, platform: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            raw_lyric_file: file.to_string(),
            metadata: Metadata(vec![vec![json!("id"), json!([id])]]),
            platforms: vec![platform.to_string()],
        }
    }

    #[test]
    fn test_same_file_across_platforms_merges() {
        let merged = merge_platform_hits(vec![
            vec![hit("1", "a.ttml", "ncm")],
            vec![hit("2", "a.ttml", "qq")],
            vec![hit("3", "a.ttml", "am")],
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].platforms, vec!["ncm", "qq", "am"]);
        assert_eq!(merged[0].metadata.values("id"), Some(&[json!("1")][..]));
    }

    #[test]
    fn test_distinct_files_stay_separate() {
        let merged = merge_platform_hits(vec![
            vec![hit("1", "a.ttml", "ncm"), hit("2", "b.ttml", "ncm")],
            vec![hit("3", "c.ttml", "qq")],
        ]);

        let files: Vec<&str> = merged.iter().map(|r| r.raw_lyric_file.as_str()).collect();
        assert_eq!(files, vec!["a.ttml", "b.ttml", "c.ttml"]);
    }

    #[test]
    fn test_duplicate_file_within_platform_does_not_duplicate_tag() {
        let merged = merge_platform_hits(vec![vec![
            hit("1", "a.ttml", "ncm"),
            hit("2", "a.ttml", "ncm"),
        ]]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].platforms, vec!["ncm"]);
    }

    #[test]
    fn test_platform_set_is_independent_of_list_order() {
        let forward = merge_platform_hits(vec![
            vec![hit("1", "a.ttml", "ncm")],
            vec![hit("2", "a.ttml", "qq")],
            vec![hit("3", "b.ttml", "qq")],
        ]);
        let backward = merge_platform_hits(vec![
            vec![hit("3", "b.ttml", "qq"), hit("2", "a.ttml", "qq")],
            vec![hit("1", "a.ttml", "ncm")],
        ]);

        let as_sets = |results: &[SearchResult]| -> HashSet<(String, Vec<String>)> {
            results
                .iter()
                .map(|r| {
                    let mut platforms = r.platforms.clone();
                    platforms.sort();
                    (r.raw_lyric_file.clone(), platforms)
                })
                .collect()
        };
        assert_eq!(as_sets(&forward), as_sets(&backward));
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_platform_hits(Vec::<Vec<SearchResult>>::new()).is_empty());
        assert!(merge_platform_hits(vec![Vec::new(), Vec::new()]).is_empty());
    }
}
