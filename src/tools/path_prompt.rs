use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};

const MANUAL_ENTRY: &str = "輸入新路徑...";

/// 選單項目：歷史路徑（附存在標記）+ 輸入新路徑
#[must_use]
pub fn recent_path_options(recent_paths: &[String]) -> Vec<String> {
    let mut options: Vec<String> = recent_paths
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let indicator = if Path::new(p).exists() { "✓" } else { "✗" };
            format!("{} [{}] {}", i + 1, indicator, p)
        })
        .collect();
    options.push(MANUAL_ENTRY.to_string());
    options
}

/// 詢問資料夾路徑，有歷史路徑時先讓使用者從中選擇
pub fn prompt_path_with_recent(
    prompt: &str,
    recent_paths: &[String],
    default: &str,
) -> Result<PathBuf> {
    if !recent_paths.is_empty() {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇路徑")
            .items(&recent_path_options(recent_paths))
            .default(0)
            .interact()?;

        if let Some(path) = recent_paths.get(selection) {
            return Ok(PathBuf::from(path));
        }
    }

    let path: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_list_recent_paths_before_manual_entry() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().to_string_lossy().to_string();
        let missing = dir.path().join("gone").to_string_lossy().to_string();

        let options = recent_path_options(&[existing.clone(), missing.clone()]);

        assert_eq!(options.len(), 3);
        assert_eq!(options[0], format!("1 [✓] {existing}"));
        assert_eq!(options[1], format!("2 [✗] {missing}"));
        assert_eq!(options[2], MANUAL_ENTRY);
    }

    #[test]
    fn test_options_without_history_only_offer_manual_entry() {
        assert_eq!(recent_path_options(&[]), vec![MANUAL_ENTRY.to_string()]);
    }
}
