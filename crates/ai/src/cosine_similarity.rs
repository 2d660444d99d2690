/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 means identical direction.
/// Empty vectors, vectors of different lengths and zero-norm vectors all
/// score `0.0` instead of dividing by zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
  if a.is_empty() || b.is_empty() || a.len() != b.len() {
    return 0.0;
  }

  let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
    (0.0_f64, 0.0_f64, 0.0_f64),
    |(dot, norm_a, norm_b), (&x, &y)| {
      (x.mul_add(y, dot), x.mul_add(x, norm_a), y.mul_add(y, norm_b))
    },
  );

  let denom = norm_a.sqrt() * norm_b.sqrt();
  if denom < 1e-12 {
    return 0.0;
  }

  // rounding can push parallel vectors a hair past 1.0
  (dot / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::cosine_similarity;

  const EPS: f64 = 1e-9;

  /// Vectors with at least one component far enough from zero to have a norm.
  fn non_zero_vector() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e3_f64..1.0e3, 1..64)
      .prop_filter("needs a non-zero norm", |v| v.iter().any(|x| x.abs() > 1e-3))
  }

  proptest! {
    #[test]
    fn any_vector_scores_one_against_itself(v in non_zero_vector()) {
      prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < EPS);
    }

    #[test]
    fn any_vector_scores_minus_one_against_its_negation(v in non_zero_vector()) {
      let neg: Vec<f64> = v.iter().map(|x| -x).collect();
      prop_assert!((cosine_similarity(&v, &neg) + 1.0).abs() < EPS);
    }

    #[test]
    fn scores_stay_in_range(a in non_zero_vector(), b in non_zero_vector()) {
      let score = cosine_similarity(&a, &b);
      prop_assert!((-1.0..=1.0).contains(&score));
    }
  }

  #[test]
  fn orthogonal_vectors_score_zero() {
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPS);
  }

  #[test]
  fn diagonal_scores_inverse_sqrt_two() {
    let score = cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]);
    assert!((score - std::f64::consts::FRAC_1_SQRT_2).abs() < EPS);
  }

  #[test]
  fn zero_norm_scores_zero() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
  }

  #[test]
  fn empty_or_mismatched_scores_zero() {
    assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
  }
}
