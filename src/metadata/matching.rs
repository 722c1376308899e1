//! Name matching between a local title and metadata search results.
//!
//! The metadata API returns results in relevance order, but the first hit is
//! frequently a DLC, bundle or remaster. Candidates are ranked by the edit
//! distance between normalized names instead.

/// Lowercase, collapse every run of non-alphanumeric characters to one space, trim.
///
/// `"The Witcher 3: Wild Hunt"` and `"the witcher 3 - wild hunt"` both become
/// `"the witcher 3 wild hunt"`.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Levenshtein distance over Unicode scalar values.
///
/// Two rows of the DP table are kept; the shorter string indexes the row.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Similarity in `[0.0, 1.0]` derived from the edit distance of the normalized names.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Index and distance of the candidate closest to `query`.
///
/// Ties keep the earliest candidate so the API's relevance order breaks them.
/// Returns `None` for an empty candidate list.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<(usize, usize)> {
    let query = normalize(query);
    let mut best: Option<(usize, usize)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let distance = levenshtein(&query, &normalize(candidate.as_ref()));
        if distance == 0 {
            return Some((index, 0));
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }

    best
}

/// Distances of every candidate to `query`, ordered closest first.
///
/// The sort is stable, so equal distances keep their original order.
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<(usize, usize)> {
    let query = normalize(query);
    let mut ranked: Vec<(usize, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, levenshtein(&query, &normalize(c.as_ref()))))
        .collect();
    ranked.sort_by_key(|&(_, distance)| distance);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("The Witcher 3: Wild Hunt"), "the witcher 3 wild hunt");
        assert_eq!(normalize("  --Hades--  "), "hades");
        assert_eq!(normalize("Baldur's Gate 3"), "baldur s gate 3");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize("Ōkami HD"), "ōkami hd");
    }

    #[test]
    fn levenshtein_textbook_cases() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_is_symmetric_and_counts_chars_not_bytes() {
        assert_eq!(levenshtein("celeste", "céleste"), 1);
        assert_eq!(levenshtein("céleste", "celeste"), 1);
        assert_eq!(levenshtein("portal", "portal 2"), levenshtein("portal 2", "portal"));
    }

    #[test]
    fn best_match_prefers_closest_name() {
        let candidates = [
            "Stardew Valley Soundtrack",
            "Stardew Valley",
            "Stardew Valley: Collector's Edition",
        ];
        assert_eq!(best_match("stardew valley", &candidates), Some((1, 0)));

        let candidates = ["Portal 2", "Portal", "Portal Stories: Mel"];
        assert_eq!(best_match("Portl", &candidates), Some((1, 1)));
    }

    #[test]
    fn best_match_ties_keep_api_order() {
        let candidates = ["Doom 2", "Doom 3"];
        assert_eq!(best_match("Doom", &candidates), Some((0, 2)));
    }

    #[test]
    fn best_match_on_empty_list_is_none() {
        let candidates: [&str; 0] = [];
        assert_eq!(best_match("anything", &candidates), None);
    }

    #[test]
    fn rank_orders_by_distance_stably() {
        let candidates = ["Halo 3", "Halo", "Halo 2", "Halo Wars"];
        let ranked = rank("halo", &candidates);
        let order: Vec<usize> = ranked.iter().map(|&(i, _)| i).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("Hades", "hades!"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let s = similarity("Celeste", "Celestia");
        assert!(s > 0.7 && s < 1.0);
    }
}
