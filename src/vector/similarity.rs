//! Vector Similarity Functions
//!
//! Inner-product scoring plus the normalization helpers callers need
//! when their embedding model does not emit unit vectors.

/// Compute dot product of two vectors
///
/// Processes four lanes per step so the compiler can vectorize the loop.
/// Callers are responsible for passing equal-length slices.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut lanes = [0.0f32; 4];
    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        lanes[0] += x[0] * y[0];
        lanes[1] += x[1] * y[1];
        lanes[2] += x[2] * y[2];
        lanes[3] += x[3] * y[3];
    }

    let tail: f32 = a_tail.iter().zip(b_tail).map(|(x, y)| x * y).sum();
    (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]) + tail
}

/// Euclidean length of a vector
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Compute cosine similarity between two vectors
///
/// Returns value in range [-1, 1]. Zero vectors score 0.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let denom = magnitude(a) * magnitude(b);
    if denom > 0.0 {
        dot_product(a, b) / denom
    } else {
        0.0
    }
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn normalize_vector(v: &mut [f32]) {
    let len = magnitude(v);
    if len == 0.0 || !len.is_finite() {
        return;
    }
    let inv = len.recip();
    v.iter_mut().for_each(|x| *x *= inv);
}

/// Unit-length copy of `v`
pub fn normalized(v: &[f32]) -> Vec<f32> {
    let len = magnitude(v);
    if len == 0.0 || !len.is_finite() {
        return v.to_vec();
    }
    v.iter().map(|x| x / len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_spans_unrolled_and_tail() {
        let a: Vec<f32> = (1..=7).map(|x| x as f32).collect();
        let b = vec![1.0; 7];
        assert!((dot_product(&a, &b) - 28.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_empty() {
        assert_eq!(dot_product(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let unit = normalized(&[0.0, 5.0, 12.0]);
        assert!(unit[0].abs() < 1e-6);
        assert!((unit[1] - 5.0 / 13.0).abs() < 1e-6);
        assert!((unit[2] - 12.0 / 13.0).abs() < 1e-6);
        assert!((magnitude(&unit) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_in_place_matches_copy() {
        let mut v = vec![-2.0, 1.0, 2.0];
        let copy = normalized(&v);
        normalize_vector(&mut v);
        for (a, b) in v.iter().zip(&copy) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let mut v = vec![0.0, 0.0];
        normalize_vector(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }
}
