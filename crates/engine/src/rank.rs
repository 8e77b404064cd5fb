//! Path similarity ranking for ambiguous candidates.

use codesync_core::RelativePath;

/// Scores how alike two paths are, comparing components tail-first so the
/// filename is weighed before its directories. Each matching component
/// contributes -1 and each mismatch +1 over the shorter component sequence;
/// lower is more similar.
pub(crate) fn rank(source: &RelativePath, candidate: &RelativePath) -> i32 {
    let source_parts: Vec<String> = source.components().rev().map(str::to_lowercase).collect();
    let candidate_parts: Vec<String> =
        candidate.components().rev().map(str::to_lowercase).collect();

    let mut score = 0;
    for (a, b) in source_parts.iter().zip(candidate_parts.iter()) {
        if a == b {
            score -= 1;
        } else {
            score += 1;
        }
    }
    score
}

/// Orders candidates from most to least similar. The sort is stable, so ties
/// keep their insertion order. Lists shorter than two entries are returned
/// unranked.
pub(crate) fn rank_candidates(
    source: &RelativePath,
    candidates: &[RelativePath],
) -> Vec<RelativePath> {
    if candidates.len() < 2 {
        return candidates.to_vec();
    }
    let mut ranked: Vec<(i32, RelativePath)> = candidates
        .iter()
        .map(|candidate| (rank(source, candidate), candidate.clone()))
        .collect();
    ranked.sort_by_key(|(score, _)| *score);
    ranked.into_iter().map(|(_, candidate)| candidate).collect()
}
