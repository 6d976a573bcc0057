//! 以 ffmpeg 子程序實作的影片解碼器
//!
//! 開啟時用 ffprobe 取得尺寸與幀數，讀取時啟動 ffmpeg 將畫格以 rawvideo/rgb24
//! 輸出到 stdout，再逐幀讀取固定大小的位元組區塊

use super::ffprobe_info::{VideoInfo, get_video_info};
use super::video_source::{Frame, VideoDecoder, VideoSource};
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// 使用系統上的 ffmpeg / ffprobe 解碼
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegDecoder;

impl VideoDecoder for FfmpegDecoder {
    type Source = FfmpegSource;

    fn open(&self, path: &Path) -> Result<FfmpegSource> {
        let info = get_video_info(path)?;
        if info.width == 0 || info.height == 0 {
            bail!("影片尺寸無效: {}x{}", info.width, info.height);
        }
        debug!(
            "開啟影片 {}: {}x{}, {} 幀",
            path.display(),
            info.width,
            info.height,
            info.frame_count
        );
        Ok(FfmpegSource::new(path, info))
    }
}

/// 正在執行的 ffmpeg 解碼程序
struct FrameStream {
    child: Child,
    stdout: ChildStdout,
}

impl FrameStream {
    fn stop(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    start_frame: u64,
    stream: Option<FrameStream>,
    exhausted: bool,
}

impl FfmpegSource {
    fn new(path: &Path, info: VideoInfo) -> Self {
        Self {
            path: path.to_path_buf(),
            info,
            start_frame: 0,
            stream: None,
            exhausted: false,
        }
    }

    fn frame_len(&self) -> usize {
        self.info.width as usize * self.info.height as usize * 3
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-noautorotate"]);
        cmd.arg("-i").arg(&self.path);
        cmd.args(["-map", "0:v:0"]);

        if self.start_frame > 0 {
            cmd.arg("-vf")
                .arg(format!("select=gte(n\\,{})", self.start_frame));
        }

        cmd.args([
            "-vsync", "0", "-an", "-sn", "-dn", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1",
        ]);
        cmd
    }

    fn spawn_stream(&self) -> Result<FrameStream> {
        let mut child = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("無法執行 ffmpeg 解碼: {}", self.path.display()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("無法取得 ffmpeg 標準輸出"))?;

        Ok(FrameStream { child, stdout })
    }

    fn stop_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl VideoSource for FfmpegSource {
    fn frame_count(&self) -> i64 {
        self.info.frame_count
    }

    fn read_next_frame(&mut self) -> Option<Frame> {
        if self.exhausted {
            return None;
        }

        if self.stream.is_none() {
            match self.spawn_stream() {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => {
                    warn!("{e:#}");
                    self.exhausted = true;
                    return None;
                }
            }
        }

        let mut buffer = vec![0u8; self.frame_len()];
        let read_result = self.stream.as_mut()?.stdout.read_exact(&mut buffer);

        if let Err(e) = read_result {
            debug!("解碼結束 {}: {e}", self.path.display());
            self.exhausted = true;
            self.stop_stream();
            return None;
        }

        Frame::from_raw(self.info.width, self.info.height, buffer)
    }

    fn seek_to_frame(&mut self, index: u64) -> bool {
        self.stop_stream();
        self.start_frame = index;
        self.exhausted = false;

        match self.spawn_stream() {
            Ok(stream) => {
                self.stream = Some(stream);
                true
            }
            Err(e) => {
                warn!("跳轉到第 {index} 幀失敗: {e:#}");
                self.exhausted = true;
                false
            }
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stop_stream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(width: u32, height: u32) -> FfmpegSource {
        FfmpegSource::new(
            Path::new("/videos/clip.mp4"),
            VideoInfo {
                width,
                height,
                frame_rate: 30.0,
                duration_seconds: Some(1.0),
                frame_count: 30,
            },
        )
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_frame_len_is_rgb24() {
        assert_eq!(source(64, 48).frame_len(), 64 * 48 * 3);
    }

    #[test]
    fn test_command_from_start_has_no_select_filter() {
        let args = args_of(&source(64, 48).build_command());
        assert!(!args.iter().any(|a| a == "-vf"));
        assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_command_after_seek_selects_from_index() {
        let mut src = source(64, 48);
        src.start_frame = 28;
        let args = args_of(&src.build_command());
        assert!(args.windows(2).any(|w| w[0] == "-vf" && w[1] == "select=gte(n\\,28)"));
    }

    #[test]
    fn test_exhausted_source_returns_none() {
        let mut src = source(8, 8);
        src.exhausted = true;
        assert!(src.read_next_frame().is_none());
        assert_eq!(src.frame_count(), 30);
    }
}
