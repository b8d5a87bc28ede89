use seer_domain::VectorRejection;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Query vector has dimension {actual}; the index expects {expected}.")]
	DimensionMismatch { expected: usize, actual: usize },
	#[error("Invalid query vector: {reason}")]
	InvalidQueryVector { reason: String },
	#[error("Embedding service unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Vector index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<VectorRejection> for Error {
	fn from(rejection: VectorRejection) -> Self {
		match rejection {
			VectorRejection::DimensionMismatch { expected, actual } =>
				Self::DimensionMismatch { expected, actual },
			other => Self::InvalidQueryVector { reason: other.reason().to_string() },
		}
	}
}

impl From<seer_storage::Error> for Error {
	fn from(err: seer_storage::Error) -> Self {
		match err {
			seer_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			seer_storage::Error::CorruptRow(message) => Self::Storage { message },
			seer_storage::Error::Qdrant(inner) =>
				Self::IndexUnavailable { message: inner.to_string() },
			seer_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			seer_storage::Error::DimensionMismatch { expected, actual } =>
				Self::DimensionMismatch { expected, actual },
		}
	}
}

impl From<seer_providers::Error> for Error {
	fn from(err: seer_providers::Error) -> Self {
		match err {
			seer_providers::Error::EmptyImage =>
				Self::InvalidRequest { message: "Image body must be non-empty.".to_string() },
			other => Self::EmbeddingUnavailable { message: other.to_string() },
		}
	}
}
