//! 檔名替換規則
//!
//! 將名稱中所有的搜尋字串換成替代字串（預設 `-` → `_`）

use anyhow::{Context, Result};
use log::{error, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 單一重新命名計畫
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// 目標名稱已存在
    Skipped,
    Failed,
}

#[derive(Debug, Clone)]
pub struct NameNormalizer {
    search: String,
    replacement: String,
}

impl NameNormalizer {
    pub fn new(search: &str, replacement: &str) -> Self {
        Self {
            search: search.to_string(),
            replacement: replacement.to_string(),
        }
    }

    /// 回傳替換後的名稱，名稱不需變更時回傳 `None`
    pub fn normalize(&self, name: &str) -> Option<String> {
        if self.search.is_empty() || !name.contains(&self.search) {
            return None;
        }
        let normalized = name.replace(&self.search, &self.replacement);
        (normalized != name).then_some(normalized)
    }

    /// 列出資料夾第一層需要改名的項目（檔案與資料夾），依名稱排序
    pub fn plan_directory(&self, directory: &Path) -> Result<Vec<RenamePlan>> {
        let mut entries: Vec<_> = fs::read_dir(directory)
            .with_context(|| format!("無法讀取資料夾: {}", directory.display()))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        entries.sort();

        Ok(entries
            .into_iter()
            .filter_map(|name| {
                let Some(name) = name.to_str().map(str::to_string) else {
                    warn!("略過非 UTF-8 名稱: {}", directory.join(&name).display());
                    return None;
                };
                let normalized = self.normalize(&name)?;
                Some(RenamePlan {
                    from: directory.join(&name),
                    to: directory.join(normalized),
                })
            })
            .collect())
    }
}

/// 執行重新命名，不覆蓋已存在的目標
pub fn apply_plan(plan: &RenamePlan) -> RenameOutcome {
    if plan.to.exists() {
        return RenameOutcome::Skipped;
    }

    match fs::rename(&plan.from, &plan.to) {
        Ok(()) => RenameOutcome::Renamed,
        Err(e) => {
            error!(
                "重新命名失敗 {} -> {}: {e}",
                plan.from.display(),
                plan.to.display()
            );
            RenameOutcome::Failed
        }
    }
}
