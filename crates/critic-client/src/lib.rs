pub mod fetcher;
pub mod llm;
pub mod omdb;
pub mod reviews;

pub use fetcher::{FileFetcher, ReqwestFetcher, SourceFetcher};
pub use llm::OpenAiSummarizer;
pub use omdb::OmdbClient;
pub use reviews::HtmlReviewExtractor;
