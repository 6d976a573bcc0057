use super::frame_extractor::{ExtractionOutcome, ExtractionReport, extract_frames};
use crate::config::Config;
use crate::tools::{
    FfmpegDecoder, VideoDecoder, prompt_path_with_recent, scan_video_files,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 縮圖擷取統計
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub total_videos: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
}

/// 首尾幀縮圖擷取器
pub struct ThumbnailExtractor {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ThumbnailExtractor {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    /// 執行擷取流程，回傳使用者輸入的影片資料夾
    pub fn run(&self) -> Result<PathBuf> {
        println!("{}", style("=== 影片首尾幀縮圖擷取 ===").cyan().bold());

        let settings = &self.config.settings.thumbnail;
        let input_dir = prompt_path_with_recent(
            "請輸入影片資料夾路徑",
            &self.config.settings.recent_paths,
            &settings.default_directory,
        )?;
        validate_directory_exists(&input_dir)?;

        let default_output = settings
            .output_directory
            .clone()
            .unwrap_or_else(|| input_dir.to_string_lossy().to_string());
        let output_dir = PathBuf::from(self.prompt_path("請輸入縮圖輸出資料夾路徑", &default_output)?);

        println!("{}", style("掃描影片檔案中...").dim());
        let video_files = scan_video_files(&input_dir, &settings.video_extension, false)?;

        if video_files.is_empty() {
            println!(
                "{}",
                style(format!("在 {} 找不到任何影片檔案", input_dir.display())).yellow()
            );
            return Ok(input_dir);
        }

        println!(
            "{}",
            style(format!("找到 {} 個影片檔案", video_files.len())).green()
        );

        let videos: Vec<_> = video_files.into_iter().map(|v| v.path).collect();
        let summary = self.process_videos(&FfmpegDecoder, &videos, &output_dir);
        self.print_summary(&summary);

        Ok(input_dir)
    }

    fn prompt_path(&self, prompt: &str, default: &str) -> Result<String> {
        let path: String = Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    /// 逐一處理影片，單一影片失敗不影響其他影片
    pub fn process_videos<D: VideoDecoder>(
        &self,
        decoder: &D,
        videos: &[PathBuf],
        output_dir: &Path,
    ) -> ExtractionSummary {
        let mut summary = ExtractionSummary {
            total_videos: videos.len(),
            ..Default::default()
        };

        for (index, video_path) in videos.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            println!(
                "\n{} [{}/{}] {}",
                style("處理中").cyan(),
                index + 1,
                videos.len(),
                style(video_path.display()).bold()
            );

            let report = extract_frames(decoder, video_path, output_dir);
            print_report(&report);

            if report.is_success() {
                summary.successful += 1;
            } else if report.written_files().is_empty() {
                summary.failed += 1;
            } else {
                summary.partial += 1;
            }
        }

        summary
    }

    fn print_summary(&self, summary: &ExtractionSummary) {
        println!();
        println!("{}", style("=== 縮圖擷取摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", summary.total_videos);
        println!("  成功: {} 個", style(summary.successful).green());

        if summary.partial > 0 {
            println!("  部分完成: {} 個", style(summary.partial).yellow());
        }

        if summary.failed > 0 {
            println!("  失敗: {} 個", style(summary.failed).red());
        }

        info!(
            "縮圖擷取完成 - 成功: {}, 部分完成: {}, 失敗: {}",
            summary.successful, summary.partial, summary.failed
        );
    }
}

fn print_report(report: &ExtractionReport) {
    match &report.outcome {
        ExtractionOutcome::Aborted(e) => {
            println!("  {} {}", style("✗").red(), e);
        }
        ExtractionOutcome::Completed { first, last } => {
            match first {
                Ok(path) => println!("  {} 第一幀: {}", style("✓").green(), path.display()),
                Err(e) => println!("  {} {}", style("✗").red(), e),
            }
            match last {
                Ok(frame) => println!(
                    "  {} 最後一幀: {} {}",
                    style("✓").green(),
                    frame.path.display(),
                    style(format!("({})", frame.strategy)).dim()
                ),
                Err(e) => println!("  {} {}", style("✗").red(), e),
            }
        }
    }
}
