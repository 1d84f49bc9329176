/// Cosine similarity of two embeddings, accumulated in `f64`.
///
/// Returns 0.0 when the lengths differ, either vector is empty or has zero magnitude,
/// or the result is not finite. A nonzero vector compared with itself gives exactly 1.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b).sqrt();
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}
