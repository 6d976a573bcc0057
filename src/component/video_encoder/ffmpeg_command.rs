use crate::config::VideoEncoderSettings;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 將影片轉為 H.264 baseline 的 ffmpeg 指令
pub struct FfmpegCommand {
    source_path: PathBuf,
    destination_path: PathBuf,
    settings: VideoEncoderSettings,
}

impl FfmpegCommand {
    #[must_use]
    pub fn new(source_path: &Path, settings: &VideoEncoderSettings) -> Self {
        let destination_path = Self::generate_destination_path(source_path, &settings.temp_suffix);
        Self {
            source_path: source_path.to_path_buf(),
            destination_path,
            settings: settings.clone(),
        }
    }

    /// 暫存輸出與原始檔放在同一資料夾：`{stem}{suffix}.mp4`
    fn generate_destination_path(source_path: &Path, temp_suffix: &str) -> PathBuf {
        let file_stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let parent = source_path.parent().unwrap_or(Path::new("."));
        parent.join(format!("{file_stem}{temp_suffix}.mp4"))
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");

        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]);
        cmd.arg(&self.source_path);
        cmd.args([
            "-vcodec",
            self.settings.video_codec.as_str(),
            "-profile:v",
            self.settings.profile.as_str(),
            "-level",
            self.settings.level.as_str(),
            "-acodec",
            self.settings.audio_codec.as_str(),
        ]);
        cmd.arg(&self.destination_path);

        cmd
    }
}
