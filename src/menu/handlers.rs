use crate::component::{FilenameNormalizer, ThumbnailExtractor, VideoEncoder};
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use log::warn;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_thumbnail_extractor(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let extractor = ThumbnailExtractor::new(config.clone(), Arc::clone(shutdown_signal));
    let result = extractor.run();
    finish(term, config, result.as_deref())
}

pub fn run_video_encoder(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let encoder = VideoEncoder::new(config.clone(), Arc::clone(shutdown_signal));
    let result = encoder.run();
    finish(term, config, result.as_deref())
}

pub fn run_filename_normalizer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let normalizer = FilenameNormalizer::new(config.clone(), Arc::clone(shutdown_signal));
    let result = normalizer.run();
    finish(term, config, result.as_deref())
}

/// 顯示錯誤或記錄使用過的路徑，然後暫停
fn finish(term: &Term, config: &mut Config, result: Result<&Path, &anyhow::Error>) -> Result<()> {
    match result {
        Ok(path) => {
            add_recent_path(&mut config.settings, &path.to_string_lossy());
            if let Err(e) = save_settings(&config.settings) {
                warn!("無法儲存設定: {e:#}");
            }
        }
        Err(e) => eprintln!("{} {:#}", style("錯誤:").red().bold(), e),
    }

    pause(term)
}
