pub mod fingerprint;
pub mod keywords;
pub mod record;

pub use fingerprint::Fingerprint;
pub use keywords::KeywordExtractor;
pub use record::{Record, ScoredRecord};
