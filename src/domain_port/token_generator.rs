#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("digits and symbols exceed the requested length")]
    CompositionTooLong,
    #[error("requested length exceeds the available distinct characters")]
    CharsetExhausted,
}

/// Produces opaque random token strings of a requested composition.
#[async_trait::async_trait]
pub trait RandomTokenGenerator: Send + Sync {
    /// `num_digits` and `num_symbols` positions are drawn from the digit and
    /// symbol alphabets, the rest from letters. `no_upper` restricts letters
    /// to lowercase; with `allow_repeat` off every character is distinct.
    async fn generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        no_upper: bool,
        allow_repeat: bool,
    ) -> Result<String, GeneratorError>;
}
