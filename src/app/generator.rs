use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, error};

use super::encoder::{EncodeOptions, EncodingError, QrEncoder};
use super::format::local_now;
use super::state::{GenerationRequest, GenerationResult};

/// Calls the encoder with the panel's fixed options and stamps the result.
pub(crate) struct Generator<E> {
    encoder: Arc<E>,
    options: EncodeOptions,
}

impl<E> Clone for Generator<E> {
    fn clone(&self) -> Self {
        Self {
            encoder: Arc::clone(&self.encoder),
            options: self.options.clone(),
        }
    }
}

impl<E: QrEncoder> Generator<E> {
    pub(crate) fn new(encoder: Arc<E>, options: EncodeOptions) -> Self {
        Self { encoder, options }
    }

    pub(crate) fn generate(&self, text: &str) -> Result<GenerationResult, EncodingError> {
        if text.trim().is_empty() {
            return Err(EncodingError::Blank);
        }

        let image = self.encoder.encode(text, &self.options)?;
        debug!(
            chars = text.chars().count(),
            side = image.side(),
            bytes = image.png().len(),
            "QR code encoded"
        );

        Ok(GenerationResult {
            text: text.to_string(),
            image,
            generated_at: local_now(),
        })
    }

    /// Run one request to completion, keeping its sequence number attached.
    ///
    /// A panicking encoder is reported as [`EncodingError::Panicked`] so the
    /// request still resolves.
    pub(crate) fn generate_request(
        &self,
        request: GenerationRequest,
    ) -> (u64, Result<GenerationResult, EncodingError>) {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.generate(&request.text)))
            .unwrap_or_else(|_| {
                error!(seq = request.seq, "QR encoder panicked");
                Err(EncodingError::Panicked)
            });
        (request.seq, outcome)
    }
}
