//! 影片首尾幀縮圖元件
//!
//! 對資料夾中的每部影片輸出第一幀與最後一幀 PNG。
//! 最後一幀先嘗試直接跳轉到倒數第二幀，失敗時改為從頭循序讀取。

mod frame_extractor;
mod main;

pub use frame_extractor::{
    ExtractError, ExtractionOutcome, ExtractionReport, FIRST_THUMB_SUFFIX, FramePhase,
    LAST_THUMB_SUFFIX, LastFrame, LastFrameStrategy, extract_frames, seek_target,
    thumbnail_paths,
};
pub use main::{ExtractionSummary, ThumbnailExtractor};
