//! 影片重新編碼元件
//!
//! 使用 ffmpeg 將影片轉為 H.264 baseline，成功後取代原始檔

mod encode_runner;
mod ffmpeg_command;
mod main;

pub use encode_runner::{EncodingTask, TaskStatus, finalize_task, is_temp_output, run_task};
pub use ffmpeg_command::FfmpegCommand;
pub use main::VideoEncoder;
