use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    /// Provider was unable to produce an embedding for the supplied input.
    #[error("Failed to generate embedding: {0}")]
    GenerationFailed(String),
}

/// Interface implemented by embedding backends.
///
/// Implementations must produce vectors of a fixed dimensionality per
/// deployment; remote backends may block and should carry their own timeout.
#[async_trait]
pub trait EmbeddingClient {
    /// Produce a dense vector for the supplied text.
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError>;
}

/// Deterministic local embedding backend.
///
/// Folds the input bytes into a fixed number of slots with a rolling
/// multiplier and L2-normalizes the result. Not semantically meaningful,
/// but stable across processes, which is what the idempotent store and the
/// retrieval tests require.
pub struct HashedEncoder {
    dimension: usize,
}

impl HashedEncoder {
    /// Construct an encoder producing vectors of the given dimensionality.
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingClient for HashedEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError> {
        if self.dimension == 0 {
            return Err(EmbeddingClientError::GenerationFailed(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        let mut vector = vec![0.0_f32; self.dimension];
        let mut slot = 0_usize;
        for byte in text.bytes() {
            slot = (slot.wrapping_mul(31).wrapping_add(byte as usize)) % self.dimension;
            vector[slot] += f32::from(byte) / 255.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }
}

/// Build the embedding client used by the analysis service.
pub fn default_client(dimension: usize) -> std::sync::Arc<dyn EmbeddingClient + Send + Sync> {
    std::sync::Arc::new(HashedEncoder::new(dimension))
}
