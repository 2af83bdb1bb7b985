use thiserror::Error;

/// Errors raised while training, querying or persisting the statistical models.
#[derive(Debug, Error)]
pub enum ModelError {
	/// A query was issued against a model whose vocabulary is still empty.
	#[error("model has not been trained")]
	NotTrained,

	/// A transition query named a conditioning context never observed in training.
	#[error("context {context:?} was never observed")]
	UnseenContext {
		/// The context that has no recorded occurrences.
		context: Vec<String>,
	},

	/// A query carried the wrong number of symbols for the model order.
	#[error("expected {expected} symbols, got {got}")]
	MalformedInput { expected: usize, got: usize },

	/// A model was requested with an order too small to have a conditioning context.
	#[error("order must be >= 2, got {0}")]
	InvalidOrder(usize),

	/// A snapshot was produced by a model of a different order than the loader expects.
	#[error("snapshot order mismatch: expected {expected}, found {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// Two models with different bracketing sentinels cannot be combined or substituted.
	#[error("sentinel mismatch: {ours} vs {theirs}")]
	SentinelMismatch { ours: String, theirs: String },

	/// A snapshot or corpus file could not be read or written.
	#[error("i/o failure: {0}")]
	Io(#[from] std::io::Error),

	/// A snapshot could not be encoded or decoded.
	#[error("snapshot codec failure: {0}")]
	Codec(#[from] postcard::Error),

	/// A corpus or statistics document could not be parsed or serialized.
	#[error("corpus document failure: {0}")]
	Corpus(#[from] serde_json::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_display_messages() {
		let err = ModelError::NotTrained;
		assert_eq!(err.to_string(), "model has not been trained");

		let err = ModelError::UnseenContext { context: vec!["JJ".to_owned()] };
		assert!(err.to_string().contains("JJ"));

		let err = ModelError::OrderMismatch { expected: 2, found: 3 };
		assert_eq!(err.to_string(), "snapshot order mismatch: expected 2, found 3");
	}

	#[test]
	fn error_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<ModelError>();
	}
}
