pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Embedding error: {message}")]
	Embedding { message: String },
	#[error("Retrieval failed: {source}")]
	Retrieval { source: Box<Error> },
	#[error("Messages API error: {message}")]
	Source { message: String },
	#[error("Answer generation error: {message}")]
	Generation { message: String },
}
impl Error {
	pub(crate) fn retrieval(cause: Error) -> Self {
		Self::Retrieval { source: Box::new(cause) }
	}
}
