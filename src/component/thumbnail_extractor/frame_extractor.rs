//! 首尾幀擷取
//!
//! 每部影片最多輸出兩張 PNG：`{name}_thumb_first.png` 與 `{name}_thumb_last.png`。
//! 所有錯誤都在此處理並記錄，不會傳回呼叫端。

use crate::tools::{Frame, VideoDecoder, VideoSource, ensure_directory_exists, write_png};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FIRST_THUMB_SUFFIX: &str = "_thumb_first.png";
pub const LAST_THUMB_SUFFIX: &str = "_thumb_last.png";

/// 讀取畫格的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    First,
    SeekLast,
    SequentialLast,
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "第一幀"),
            Self::SeekLast => write!(f, "最後一幀（直接跳轉）"),
            Self::SequentialLast => write!(f, "最後一幀（循序讀取）"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("無法建立輸出資料夾 {}: {reason}", .path.display())]
    CreateOutputDir { path: PathBuf, reason: String },

    #[error("無法開啟影片 {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("影片 {} 沒有任何幀（回報幀數 {frame_count}）", .path.display())]
    EmptyMedia { path: PathBuf, frame_count: i64 },

    #[error("無法從 {} 讀取{phase}", .path.display())]
    FrameRead { path: PathBuf, phase: FramePhase },

    #[error("無法從 {} 讀取最後一幀", .path.display())]
    NoFrameAvailable { path: PathBuf },

    #[error("無法寫入縮圖 {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// 最後一幀的取得方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastFrameStrategy {
    DirectSeek { index: u64 },
    SequentialScan { frames_decoded: u64 },
}

impl fmt::Display for LastFrameStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectSeek { index } => write!(f, "直接跳轉至第 {index} 幀"),
            Self::SequentialScan { frames_decoded } => {
                write!(f, "循序讀取 {frames_decoded} 幀")
            }
        }
    }
}

#[derive(Debug)]
pub struct LastFrame {
    pub path: PathBuf,
    pub strategy: LastFrameStrategy,
}

#[derive(Debug)]
pub enum ExtractionOutcome {
    /// 影片無法處理，未寫出任何檔案
    Aborted(ExtractError),
    Completed {
        first: Result<PathBuf, ExtractError>,
        last: Result<LastFrame, ExtractError>,
    },
}

/// 單部影片的擷取結果
#[derive(Debug)]
pub struct ExtractionReport {
    pub video_path: PathBuf,
    pub outcome: ExtractionOutcome,
}

impl ExtractionReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self.outcome,
            ExtractionOutcome::Completed {
                first: Ok(_),
                last: Ok(_)
            }
        )
    }

    /// 本次寫出的縮圖路徑
    #[must_use]
    pub fn written_files(&self) -> Vec<&Path> {
        match &self.outcome {
            ExtractionOutcome::Aborted(_) => Vec::new(),
            ExtractionOutcome::Completed { first, last } => first
                .as_ref()
                .ok()
                .map(PathBuf::as_path)
                .into_iter()
                .chain(last.as_ref().ok().map(|l| l.path.as_path()))
                .collect(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&ExtractError> {
        match &self.outcome {
            ExtractionOutcome::Aborted(e) => vec![e],
            ExtractionOutcome::Completed { first, last } => first
                .as_ref()
                .err()
                .into_iter()
                .chain(last.as_ref().err())
                .collect(),
        }
    }
}

/// 縮圖輸出路徑
#[must_use]
pub fn thumbnail_paths(video_path: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let video_name = video_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
    (
        output_dir.join(format!("{video_name}{FIRST_THUMB_SUFFIX}")),
        output_dir.join(format!("{video_name}{LAST_THUMB_SUFFIX}")),
    )
}

/// 直接跳轉的目標幀：倒數第二幀，最小為 0
#[must_use]
pub fn seek_target(total_frames: i64) -> u64 {
    u64::try_from(total_frames.saturating_sub(2).max(0)).unwrap_or(0)
}

/// 擷取影片的第一幀與最後一幀
///
/// 每個階段都使用新開啟的影片來源，前一個來源在重新開啟前會先釋放
pub fn extract_frames<D: VideoDecoder>(
    decoder: &D,
    video_path: &Path,
    output_dir: &Path,
) -> ExtractionReport {
    let outcome = run_extraction(decoder, video_path, output_dir);

    match &outcome {
        ExtractionOutcome::Aborted(e) => error!("{e}"),
        ExtractionOutcome::Completed { first, last } => {
            match first {
                Ok(path) => info!("已儲存第一幀: {}", path.display()),
                Err(e) => error!("{e}"),
            }
            match last {
                Ok(frame) => info!(
                    "已儲存最後一幀: {} ({})",
                    frame.path.display(),
                    frame.strategy
                ),
                Err(e) => error!("{e}"),
            }
        }
    }

    ExtractionReport {
        video_path: video_path.to_path_buf(),
        outcome,
    }
}

fn run_extraction<D: VideoDecoder>(
    decoder: &D,
    video_path: &Path,
    output_dir: &Path,
) -> ExtractionOutcome {
    if let Err(e) = ensure_directory_exists(output_dir) {
        return ExtractionOutcome::Aborted(ExtractError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            reason: format!("{e:#}"),
        });
    }

    let (first_path, last_path) = thumbnail_paths(video_path, output_dir);

    let mut source = match open(decoder, video_path) {
        Ok(source) => source,
        Err(e) => return ExtractionOutcome::Aborted(e),
    };

    let total_frames = source.frame_count();
    if total_frames <= 0 {
        return ExtractionOutcome::Aborted(ExtractError::EmptyMedia {
            path: video_path.to_path_buf(),
            frame_count: total_frames,
        });
    }

    let first = source
        .read_next_frame()
        .ok_or_else(|| phase_failed(video_path, FramePhase::First))
        .and_then(|frame| save(&frame, &first_path));

    drop(source);

    let last = read_last_frame(decoder, video_path, total_frames).and_then(|(frame, strategy)| {
        save(&frame, &last_path).map(|path| LastFrame { path, strategy })
    });

    ExtractionOutcome::Completed { first, last }
}

fn read_last_frame<D: VideoDecoder>(
    decoder: &D,
    video_path: &Path,
    total_frames: i64,
) -> Result<(Frame, LastFrameStrategy), ExtractError> {
    let mut source = open(decoder, video_path)?;

    let index = seek_target(total_frames);
    let seeked = if source.seek_to_frame(index) {
        source.read_next_frame()
    } else {
        None
    };
    if let Some(frame) = seeked {
        return Ok((frame, LastFrameStrategy::DirectSeek { index }));
    }

    warn!("{}，改為循序讀取", phase_failed(video_path, FramePhase::SeekLast));

    drop(source);
    let mut source = open(decoder, video_path)?;

    let mut last_frame = None;
    let mut frames_decoded = 0u64;
    while let Some(frame) = source.read_next_frame() {
        last_frame = Some(frame);
        frames_decoded += 1;
    }

    match last_frame {
        Some(frame) => Ok((frame, LastFrameStrategy::SequentialScan { frames_decoded })),
        None => {
            warn!("{}", phase_failed(video_path, FramePhase::SequentialLast));
            Err(ExtractError::NoFrameAvailable {
                path: video_path.to_path_buf(),
            })
        }
    }
}

/// 單一階段讀不到畫格；最後一幀的兩個階段只記錄，最終以 `NoFrameAvailable` 回報
fn phase_failed(video_path: &Path, phase: FramePhase) -> ExtractError {
    ExtractError::FrameRead {
        path: video_path.to_path_buf(),
        phase,
    }
}

fn open<D: VideoDecoder>(decoder: &D, video_path: &Path) -> Result<D::Source, ExtractError> {
    decoder.open(video_path).map_err(|e| ExtractError::Open {
        path: video_path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

fn save(frame: &Frame, path: &Path) -> Result<PathBuf, ExtractError> {
    write_png(frame, path).map_err(|source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
