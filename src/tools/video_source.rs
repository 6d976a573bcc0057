//! 影片解碼能力抽象
//!
//! 縮圖擷取只依賴這組 trait，實際解碼由 ffmpeg 或測試用的替身提供

use anyhow::Result;
use image::{ImageFormat, ImageResult, RgbImage};
use std::path::Path;

/// 解碼後的單一畫格（RGB24）
pub type Frame = RgbImage;

/// 已開啟的影片來源
///
/// 釋放即 `Drop`：呼叫端在重新開啟同一部影片前必須先丟棄舊的來源
pub trait VideoSource {
    /// 回報的總幀數，可能為 0、負數或不準確
    fn frame_count(&self) -> i64;

    /// 讀取下一幀，串流結束或解碼失敗時回傳 `None`
    fn read_next_frame(&mut self) -> Option<Frame>;

    /// 盡力跳轉到指定幀，下一次 `read_next_frame` 從該幀開始
    fn seek_to_frame(&mut self, index: u64) -> bool;
}

/// 影片解碼器，負責開啟影片來源
pub trait VideoDecoder {
    type Source: VideoSource;

    fn open(&self, path: &Path) -> Result<Self::Source>;
}

/// 以 PNG 格式寫出畫格
pub fn write_png(frame: &Frame, path: &Path) -> ImageResult<()> {
    frame.save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_write_png_roundtrip_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = Frame::from_pixel(4, 3, Rgb([10, 20, 30]));

        write_png(&frame, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_write_png_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let frame = Frame::new(2, 2);

        assert!(write_png(&frame, &path).is_err());
    }
}
