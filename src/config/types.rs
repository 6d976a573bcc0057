use serde::{Deserialize, Serialize};

/// 最近使用路徑的最大數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 縮圖擷取設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// 要掃描的影片副檔名（不含前導點）
    pub video_extension: String,
    pub default_directory: String,
    /// 未設定時輸出到影片所在資料夾
    pub output_directory: Option<String>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            video_extension: "mp4".to_string(),
            default_directory: "medias".to_string(),
            output_directory: None,
        }
    }
}

/// H.264 重新編碼設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoEncoderSettings {
    pub video_codec: String,
    pub profile: String,
    pub level: String,
    pub audio_codec: String,
    pub video_extension: String,
    /// 暫存輸出檔名的後綴，含此後綴的檔案在掃描時會被略過
    pub temp_suffix: String,
}

impl Default for VideoEncoderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            profile: "baseline".to_string(),
            level: "3.0".to_string(),
            audio_codec: "aac".to_string(),
            video_extension: "mp4".to_string(),
            temp_suffix: "_tmp".to_string(),
        }
    }
}

/// 檔名正規化設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerSettings {
    pub directories: Vec<String>,
    pub search: String,
    pub replacement: String,
}

impl Default for RenamerSettings {
    fn default() -> Self {
        Self {
            directories: vec!["medias".to_string(), "interactive_task_image".to_string()],
            search: "-".to_string(),
            replacement: "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub thumbnail: ThumbnailSettings,
    pub video_encoder: VideoEncoderSettings,
    pub renamer: RenamerSettings,
    pub recent_paths: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
