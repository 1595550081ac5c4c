use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::CoreBPE;

/// Counts tokens in a piece of text.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// BPE encodings available for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// gpt-35-turbo and gpt-4 family
    #[default]
    Cl100kBase,
    /// gpt-4o family
    O200kBase,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::O200kBase => "o200k_base",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = FineTuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cl100k_base" => Ok(Encoding::Cl100kBase),
            "o200k_base" => Ok(Encoding::O200kBase),
            other => Err(FineTuneError::Configuration(ConfigurationError::Tokenizer(
                format!("unknown encoding '{}'", other),
            ))),
        }
    }
}

/// [`TokenCounter`] backed by `tiktoken-rs`.
pub struct TiktokenCounter {
    encoding: Encoding,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn new(encoding: Encoding) -> FineTuneResult<Self> {
        let bpe = match encoding {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
        }
        .map_err(|e| FineTuneError::Configuration(ConfigurationError::Tokenizer(e.to_string())))?;

        Ok(Self { encoding, bpe })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &self.encoding)
            .finish()
    }
}
