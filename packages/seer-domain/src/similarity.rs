#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorRejection {
	Empty,
	DimensionMismatch { expected: usize, actual: usize },
	NonFinite,
	Zero,
}
impl VectorRejection {
	pub fn reason(self) -> &'static str {
		match self {
			Self::Empty => "vector is empty",
			Self::DimensionMismatch { .. } => "vector has the wrong dimension",
			Self::NonFinite => "vector or its magnitude is not finite",
			Self::Zero => "vector has zero magnitude",
		}
	}
}

/// Checks that a vector can be compared against an index of dimension `dim`. Used for query
/// vectors and for stored embeddings before they are indexed.
pub fn validate_query(vector: &[f32], dim: usize) -> Result<(), VectorRejection> {
	if vector.is_empty() {
		return Err(VectorRejection::Empty);
	}
	if vector.len() != dim {
		return Err(VectorRejection::DimensionMismatch { expected: dim, actual: vector.len() });
	}
	if vector.iter().any(|value| !value.is_finite()) {
		return Err(VectorRejection::NonFinite);
	}

	let norm = l2_norm(vector);

	if !norm.is_finite() {
		return Err(VectorRejection::NonFinite);
	}
	if norm == 0.0 {
		return Err(VectorRejection::Zero);
	}

	Ok(())
}

/// Accumulated in f64, so finite components never overflow the sum of squares. The result
/// is infinite only when the norm itself exceeds `f32::MAX`.
pub fn l2_norm(vector: &[f32]) -> f32 {
	norm_f64(vector) as f32
}

/// Returns `None` for zero or non-finite norms.
pub fn l2_normalized(vector: &[f32]) -> Option<Vec<f32>> {
	let norm = norm_f64(vector);

	if norm == 0.0 || !(norm as f32).is_finite() {
		return None;
	}

	Some(vector.iter().map(|value| (f64::from(*value) / norm) as f32).collect())
}

/// Cosine similarity in [-1, 1]; zero when either side has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() {
		return 0.0;
	}

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	let denominator = norm_a.sqrt() * norm_b.sqrt();

	if denominator == 0.0 || !denominator.is_finite() {
		return 0.0;
	}

	(dot / denominator).clamp(-1.0, 1.0) as f32
}

fn norm_f64(vector: &[f32]) -> f64 {
	vector.iter().map(|value| f64::from(*value) * f64::from(*value)).sum::<f64>().sqrt()
}
