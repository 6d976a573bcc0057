//! 檔名正規化主模組
//!
//! 依設定的資料夾清單預覽並執行替換

use super::name_normalizer::{NameNormalizer, RenameOutcome, RenamePlan, apply_plan};
use crate::config::Config;
use crate::tools::{prompt_path_with_recent, validate_directory_exists};
use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 重新命名結果統計
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenameResult {
    pub success_count: usize,
    pub skip_count: usize,
    pub error_count: usize,
}

pub struct FilenameNormalizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    normalizer: NameNormalizer,
}

impl FilenameNormalizer {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        let renamer = &config.settings.renamer;
        let normalizer = NameNormalizer::new(&renamer.search, &renamer.replacement);
        Self {
            config,
            shutdown_signal,
            normalizer,
        }
    }

    /// 執行正規化流程，回傳使用者輸入的基準資料夾
    pub fn run(&self) -> Result<PathBuf> {
        let renamer = &self.config.settings.renamer;
        println!(
            "{}",
            style(format!(
                "=== 檔名正規化（\"{}\" → \"{}\"）===",
                renamer.search, renamer.replacement
            ))
            .cyan()
            .bold()
        );

        let base_dir = self.prompt_base_directory()?;
        validate_directory_exists(&base_dir)?;

        let plans = self.collect_plans(&base_dir);

        if plans.is_empty() {
            println!("{}", style("沒有需要重新命名的項目").yellow());
            return Ok(base_dir);
        }

        self.display_preview(&plans);

        if !self.confirm_rename()? {
            println!("{}", style("操作已取消").yellow());
            return Ok(base_dir);
        }

        let result = self.execute_rename(&plans);
        self.display_summary(&result);

        Ok(base_dir)
    }

    fn prompt_base_directory(&self) -> Result<PathBuf> {
        prompt_path_with_recent(
            "請輸入基準資料夾路徑",
            &self.config.settings.recent_paths,
            ".",
        )
    }

    fn confirm_rename(&self) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt("確定要重新命名這些項目嗎？")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    /// 收集所有設定資料夾的改名計畫，不存在的資料夾只提示不中斷
    pub fn collect_plans(&self, base_dir: &Path) -> Vec<RenamePlan> {
        let mut plans = Vec::new();

        for directory in &self.config.settings.renamer.directories {
            let dir = base_dir.join(directory);
            match self.normalizer.plan_directory(&dir) {
                Ok(found) => {
                    println!(
                        "  {} {}: {} 個項目需要改名",
                        style("•").dim(),
                        dir.display(),
                        found.len()
                    );
                    plans.extend(found);
                }
                Err(e) => {
                    warn!("{e:#}");
                    println!("  {} {e}", style("⤳").yellow());
                }
            }
        }

        plans
    }

    fn display_preview(&self, plans: &[RenamePlan]) {
        println!();
        println!("{}", style("預覽重新命名結果：").cyan());
        for plan in plans {
            let name_of = |p: &Path| p.file_name().unwrap_or_default().to_string_lossy().to_string();
            println!("    {} {}", style("舊:").dim(), name_of(&plan.from));
            println!("    {} {}", style("新:").dim(), name_of(&plan.to));
        }
        println!();
    }

    pub fn execute_rename(&self, plans: &[RenamePlan]) -> RenameResult {
        let mut result = RenameResult::default();

        let progress_bar = ProgressBar::new(plans.len() as u64);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress_bar.set_style(bar_style.progress_chars("#>-"));
        }
        progress_bar.set_message("重新命名中...");

        for plan in plans {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                return result;
            }

            match apply_plan(plan) {
                RenameOutcome::Renamed => {
                    info!("{} -> {}", plan.from.display(), plan.to.display());
                    result.success_count += 1;
                }
                RenameOutcome::Skipped => result.skip_count += 1,
                RenameOutcome::Failed => result.error_count += 1,
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        result
    }

    fn display_summary(&self, result: &RenameResult) {
        println!();
        println!("{}", style("=== 重新命名結果 ===").cyan().bold());
        println!("  成功: {} 個", style(result.success_count).green());
        if result.skip_count > 0 {
            println!("  跳過: {} 個（目標已存在）", style(result.skip_count).yellow());
        }
        if result.error_count > 0 {
            println!("  失敗: {} 個", style(result.error_count).red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_and_execute_across_directories() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir(base.path().join("medias")).unwrap();
        fs::write(base.path().join("medias").join("a-1.mp4"), b"x").unwrap();
        fs::write(base.path().join("medias").join("b_2.mp4"), b"x").unwrap();

        let normalizer = FilenameNormalizer::new(Config::default(), Arc::new(AtomicBool::new(false)));

        // interactive_task_image 不存在，只會被略過
        let plans = normalizer.collect_plans(base.path());
        assert_eq!(plans.len(), 1);

        let result = normalizer.execute_rename(&plans);
        assert_eq!(
            result,
            RenameResult {
                success_count: 1,
                skip_count: 0,
                error_count: 0,
            }
        );
        assert!(base.path().join("medias").join("a_1.mp4").exists());
    }

    #[test]
    fn test_execute_stops_on_shutdown() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir(base.path().join("medias")).unwrap();
        fs::write(base.path().join("medias").join("a-1.mp4"), b"x").unwrap();

        let normalizer = FilenameNormalizer::new(Config::default(), Arc::new(AtomicBool::new(true)));
        let plans = normalizer.collect_plans(base.path());
        let result = normalizer.execute_rename(&plans);

        assert_eq!(result, RenameResult::default());
        assert!(base.path().join("medias").join("a-1.mp4").exists());
    }
}
