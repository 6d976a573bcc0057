use super::ffmpeg_command::FfmpegCommand;
use crate::config::VideoEncoderSettings;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// ffmpeg 非零結束時，輸出檔至少要這麼大才視為可用
const MIN_VALID_OUTPUT_BYTES: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
    /// ffmpeg 回報錯誤但輸出檔可用（來源檔可能有損壞的 frame）
    CompletedWithWarning,
    Failed,
}

#[derive(Debug)]
pub struct EncodingTask {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub status: TaskStatus,
    pub error_message: Option<String>,
}

impl EncodingTask {
    #[must_use]
    pub fn new(source_path: &Path, settings: &VideoEncoderSettings) -> Self {
        let ffmpeg_cmd = FfmpegCommand::new(source_path, settings);
        Self {
            source_path: source_path.to_path_buf(),
            destination_path: ffmpeg_cmd.destination_path().to_path_buf(),
            status: TaskStatus::Pending,
            error_message: None,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Completed | TaskStatus::CompletedWithWarning
        )
    }

    fn fail(&mut self, message: String) {
        error!("轉檔失敗 {}: {}", self.source_path.display(), message);
        self.status = TaskStatus::Failed;
        self.error_message = Some(message);
    }
}

/// 前一次執行留下的暫存檔不再轉檔
#[must_use]
pub fn is_temp_output(path: &Path, temp_suffix: &str) -> bool {
    !temp_suffix.is_empty()
        && path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.contains(temp_suffix))
}

/// 執行單一轉檔任務，結果記錄在任務狀態中
pub fn run_task(task: &mut EncodingTask, settings: &VideoEncoderSettings) {
    let ffmpeg_cmd = FfmpegCommand::new(&task.source_path, settings);
    info!(
        "開始轉檔: {} -> {}",
        ffmpeg_cmd.source_path().display(),
        ffmpeg_cmd.destination_path().display()
    );

    match ffmpeg_cmd.build_command().output() {
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            finalize_task(task, output.status.success(), stderr.trim());
        }
        Err(e) => task.fail(format!("無法啟動 ffmpeg: {e}")),
    }
}

/// 依 ffmpeg 結果決定是否以暫存輸出取代原始檔
pub fn finalize_task(task: &mut EncodingTask, exit_success: bool, stderr: &str) {
    let output_exists = task.destination_path.exists();
    let output_valid = output_exists
        && fs::metadata(&task.destination_path)
            .map(|m| m.len() > MIN_VALID_OUTPUT_BYTES)
            .unwrap_or(false);

    let status = if exit_success && output_exists {
        TaskStatus::Completed
    } else if output_valid {
        warn!(
            "轉檔完成但有警告: {} ({})",
            task.destination_path.display(),
            stderr
        );
        TaskStatus::CompletedWithWarning
    } else {
        if let Err(e) = remove_partial_output(&task.destination_path) {
            warn!("{e:#}");
        }
        let message = if stderr.is_empty() {
            "未產生輸出檔".to_string()
        } else {
            stderr.to_string()
        };
        task.fail(message);
        return;
    };

    match replace_original(&task.destination_path, &task.source_path) {
        Ok(()) => {
            info!("已以轉檔結果取代原始檔: {}", task.source_path.display());
            task.status = status;
        }
        Err(e) => task.fail(format!("{e:#}")),
    }
}

fn replace_original(converted: &Path, original: &Path) -> Result<()> {
    fs::rename(converted, original).with_context(|| {
        format!(
            "無法以轉檔結果取代原始檔: {} -> {}",
            converted.display(),
            original.display()
        )
    })
}

fn remove_partial_output(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("無法刪除失敗的輸出檔案: {}", path.display()))?;
        info!("已刪除失敗的輸出檔案: {}", path.display());
    }
    Ok(())
}
