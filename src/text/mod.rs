//! Text cleaning and keyword-context trimming.
//!
//! - [`TextNormalizer`] turns raw post text into the lowercase, link-free,
//!   punctuation-light form used for modeling.
//! - [`KeywordContextExtractor`] shortens long posts to the sentences that
//!   mention a keyword and the sentences right around them.

mod context;
mod normalizer;

pub use context::{
    ContextError, KEYWORD_ALTERNATION, KeywordContextExtractor, sentences_around_keyword,
};
pub use normalizer::{TextNormalizer, clean_text, decode_ascii};
