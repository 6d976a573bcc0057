//! E2E 測試 - 使用系統上的 ffmpeg 產生測試影片
//!
//! 找不到 ffmpeg 時略過

use std::fs;
use std::path::Path;
use std::process::Command;

use media_batch_tools::component::thumbnail_extractor::{
    ExtractionOutcome, LastFrameStrategy, extract_frames,
};
use media_batch_tools::tools::{
    FfmpegDecoder, Frame, VideoDecoder, VideoSource, get_video_info,
};

fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|bin| {
        Command::new(bin)
            .arg("-version")
            .output()
            .is_ok_and(|o| o.status.success())
    })
}

/// 產生 10 幀、每幀顏色不同的無失真影片
fn make_test_video(path: &Path) -> bool {
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x48:rate=10",
            "-frames:v",
            "10",
            "-c:v",
            "ffv1",
        ])
        .arg(path)
        .status();
    status.is_ok_and(|s| s.success())
}

fn decode_all(video: &Path) -> Vec<Frame> {
    let mut source = FfmpegDecoder.open(video).unwrap();
    std::iter::from_fn(|| source.read_next_frame()).collect()
}

#[test]
fn test_ffmpeg_decoder_reads_frames() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("video.mkv");
    if !make_test_video(&video) {
        println!("跳過測試：無法產生測試影片");
        return;
    }

    let info = get_video_info(&video).unwrap();
    assert_eq!((info.width, info.height), (64, 48));

    let mut source = FfmpegDecoder.open(&video).unwrap();
    assert!(source.frame_count() > 0);

    let first = source.read_next_frame().unwrap();
    assert_eq!(first.dimensions(), (64, 48));

    let mut count = 1;
    while source.read_next_frame().is_some() {
        count += 1;
    }
    assert_eq!(count, 10);
    assert!(source.read_next_frame().is_none());
}

#[test]
fn test_extract_frames_with_ffmpeg() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("video.mkv");
    if !make_test_video(&video) {
        println!("跳過測試：無法產生測試影片");
        return;
    }
    let output = dir.path().join("thumbs");

    let report = extract_frames(&FfmpegDecoder, &video, &output);
    assert!(report.is_success(), "{:?}", report.errors());

    let ExtractionOutcome::Completed { last: Ok(last), .. } = &report.outcome else {
        panic!("expected completed extraction");
    };
    assert_eq!(last.strategy, LastFrameStrategy::DirectSeek { index: 8 });

    // 以循序解碼的畫格作為對照，不經過跳轉
    let frames = decode_all(&video);
    assert_eq!(frames.len(), 10);

    let written_last = image::open(&last.path).unwrap().to_rgb8();
    assert_eq!(written_last, frames[8]);
    assert_ne!(written_last, frames[9]);

    let written_first = image::open(output.join("video_thumb_first.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(written_first, frames[0]);

    assert_eq!(fs::read_dir(&output).unwrap().count(), 2);
}

#[test]
fn test_non_video_file_writes_nothing() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.mp4");
    fs::write(&fake, b"not a video").unwrap();
    let output = dir.path().join("thumbs");

    let report = extract_frames(&FfmpegDecoder, &fake, &output);

    assert!(matches!(report.outcome, ExtractionOutcome::Aborted(_)));
    assert!(output.is_dir());
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}
