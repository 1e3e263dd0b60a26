//! Maximal marginal relevance selection.
//!
//! Picks `k` candidates that are relevant to the query while being
//! dissimilar to each other. The first pick is always the candidate most
//! similar to the query; each following pick maximizes
//! `lambda * sim(query, c) - (1 - lambda) * max(sim(c, picked))`.

/// Cosine similarity of two vectors. Zero-norm or mismatched inputs give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Indices of the selected candidates, in selection order.
pub fn select(query: &[f32], candidates: &[Vec<f32>], k: usize, lambda_mult: f32) -> Vec<usize> {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let relevance: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();

    let target = k.min(candidates.len());
    let mut picked = Vec::with_capacity(target);

    while picked.len() < target {
        let scores = (0..candidates.len())
            .filter(|i| !picked.contains(i))
            .map(|i| {
                if picked.is_empty() {
                    return (i, relevance[i]);
                }
                let redundancy = picked
                    .iter()
                    .map(|&p| cosine_similarity(&candidates[i], &candidates[p]))
                    .fold(f32::NEG_INFINITY, f32::max);
                (i, lambda_mult * relevance[i] - (1.0 - lambda_mult) * redundancy)
            });
        match argmax(scores) {
            Some(i) => picked.push(i),
            None => break,
        }
    }

    picked
}

/// First index with the highest score. NaN ranks below every number but
/// still counts, so any non-empty input yields one of its own indices.
fn argmax(scores: impl Iterator<Item = (usize, f32)>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, score) in scores {
        let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
