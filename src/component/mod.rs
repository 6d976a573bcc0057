//! 功能元件模組
//!
//! 每個子模組實現一個獨立的批次功能，包含主要邏輯和專用工具

pub mod filename_normalizer;
pub mod thumbnail_extractor;
pub mod video_encoder;

pub use filename_normalizer::FilenameNormalizer;
pub use thumbnail_extractor::ThumbnailExtractor;
pub use video_encoder::VideoEncoder;
