pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),
	#[error("Invalid test DSN: {0}")]
	InvalidDsn(#[source] sqlx::Error),
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
