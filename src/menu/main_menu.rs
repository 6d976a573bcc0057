use crate::config::save::save_settings;
use crate::config::types::Config;
use crate::menu::handlers::{
    run_filename_normalizer, run_thumbnail_extractor, run_video_encoder,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 媒體檔案批次維護 ===").cyan().bold());
    println!("{}", style("按 ESC 離開").dim());

    let options = [
        "擷取影片首尾幀縮圖",
        "影片轉為 H.264",
        "檔名正規化",
        "設定",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_thumbnail_extractor(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_video_encoder(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            run_filename_normalizer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(3) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        print_current_settings(config);

        let options = [
            "縮圖：影片副檔名",
            "縮圖：輸出資料夾",
            "檔名正規化：替換規則",
            "檔名正規化：資料夾清單",
            "返回",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的設定")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let settings = &mut config.settings;
        match selection {
            Some(0) => {
                let extension = prompt_text("影片副檔名", &settings.thumbnail.video_extension)?;
                settings.thumbnail.video_extension =
                    extension.trim_start_matches('.').to_lowercase();
            }
            Some(1) => {
                let current = settings.thumbnail.output_directory.clone().unwrap_or_default();
                let output: String = Input::new()
                    .with_prompt("輸出資料夾（留空表示與影片相同）")
                    .default(current)
                    .allow_empty(true)
                    .interact_text()?;
                let output = output.trim();
                settings.thumbnail.output_directory =
                    (!output.is_empty()).then(|| output.to_string());
            }
            Some(2) => {
                settings.renamer.search = prompt_text("要替換的字串", &settings.renamer.search)?;
                settings.renamer.replacement =
                    prompt_text("替換為", &settings.renamer.replacement)?;
            }
            Some(3) => {
                let joined = settings.renamer.directories.join(", ");
                let directories = prompt_text("資料夾（以逗號分隔）", &joined)?;
                settings.renamer.directories = parse_directory_list(&directories);
            }
            _ => break,
        }

        save_settings(&config.settings)?;
    }

    Ok(())
}

fn print_current_settings(config: &Config) {
    let settings = &config.settings;
    println!(
        "  {} .{}",
        style("縮圖副檔名:").dim(),
        settings.thumbnail.video_extension
    );
    println!(
        "  {} {}",
        style("縮圖輸出:").dim(),
        settings
            .thumbnail
            .output_directory
            .as_deref()
            .unwrap_or("（與影片相同）")
    );
    println!(
        "  {} \"{}\" → \"{}\"",
        style("替換規則:").dim(),
        settings.renamer.search,
        settings.renamer.replacement
    );
    println!(
        "  {} {}",
        style("資料夾:").dim(),
        settings.renamer.directories.join(", ")
    );
    println!();
}

fn prompt_text(prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(value)
}

fn parse_directory_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory_list() {
        assert_eq!(
            parse_directory_list(" medias, ,interactive_task_image ,"),
            vec!["medias", "interactive_task_image"]
        );
        assert!(parse_directory_list("").is_empty());
    }
}
