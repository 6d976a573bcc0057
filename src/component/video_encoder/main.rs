use super::encode_runner::{EncodingTask, TaskStatus, is_temp_output, run_task};
use crate::config::Config;
use crate::tools::{prompt_path_with_recent, scan_video_files, validate_directory_exists};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct VideoEncoder {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoEncoder {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    /// 執行轉檔流程，回傳使用者輸入的資料夾
    pub fn run(&self) -> Result<PathBuf> {
        println!("{}", style("=== 影片轉為 H.264 ===").cyan().bold());

        let directory = self.prompt_input_path()?;
        validate_directory_exists(&directory)?;

        let settings = &self.config.settings.video_encoder;

        println!("{}", style("掃描影片檔案中...").dim());
        let video_files: Vec<_> = scan_video_files(&directory, &settings.video_extension, true)?
            .into_iter()
            .filter(|file| !is_temp_output(&file.path, &settings.temp_suffix))
            .collect();

        if video_files.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(directory);
        }

        println!(
            "{}",
            style(format!("找到 {} 個影片檔案：", video_files.len())).green()
        );

        for (index, file) in video_files.iter().enumerate() {
            let size_mb = file.size as f64 / 1024.0 / 1024.0;
            println!(
                "  {}. {} ({:.2} MB)",
                index + 1,
                file.path.display(),
                size_mb
            );
        }

        println!();
        println!(
            "{}",
            style(format!(
                "編碼參數: {} / {} / level {} / {}",
                settings.video_codec, settings.profile, settings.level, settings.audio_codec
            ))
            .dim()
        );

        let mut tasks: Vec<_> = video_files
            .iter()
            .map(|file| EncodingTask::new(&file.path, settings))
            .collect();

        self.encode_all(&mut tasks);
        self.print_summary(&tasks);

        Ok(directory)
    }

    fn prompt_input_path(&self) -> Result<PathBuf> {
        prompt_path_with_recent(
            "請輸入影片資料夾路徑",
            &self.config.settings.recent_paths,
            ".",
        )
    }

    fn encode_all(&self, tasks: &mut [EncodingTask]) {
        let settings = &self.config.settings.video_encoder;

        let progress_bar = ProgressBar::new(tasks.len() as u64);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress_bar.set_style(bar_style.progress_chars("#>-"));
        }

        for task in tasks.iter_mut() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止轉檔");
                progress_bar.abandon_with_message("操作已中斷");
                return;
            }

            let file_name = task
                .source_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            progress_bar.set_message(file_name.clone());

            run_task(task, settings);

            match task.status {
                TaskStatus::Completed => {
                    progress_bar.println(format!("  {} {}", style("✓").green(), file_name));
                }
                TaskStatus::CompletedWithWarning => {
                    progress_bar.println(format!(
                        "  {} {} {}",
                        style("✓").yellow(),
                        file_name,
                        style("(有警告)").dim()
                    ));
                }
                TaskStatus::Failed | TaskStatus::Pending => {
                    progress_bar.println(format!(
                        "  {} {}: {}",
                        style("✗").red(),
                        file_name,
                        task.error_message.as_deref().unwrap_or("未知錯誤")
                    ));
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
    }

    fn print_summary(&self, tasks: &[EncodingTask]) {
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        let failed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count();
        let skipped = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count();

        println!();
        println!("{}", style("=== 轉檔摘要 ===").cyan().bold());
        println!("  總計: {} 個檔案", tasks.len());
        println!("  成功: {} 個", style(completed).green());
        if failed > 0 {
            println!("  失敗: {} 個", style(failed).red());
        }
        if skipped > 0 {
            println!("  未處理: {} 個", style(skipped).yellow());
        }

        info!("轉檔完成 - 成功: {completed}, 失敗: {failed}, 未處理: {skipped}");
    }
}
