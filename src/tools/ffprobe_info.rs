use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub duration_seconds: Option<f64>,
    /// 容器回報的幀數；沒有時以時長乘幀率估算，兩者皆無則為 0
    pub frame_count: i64,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
    nb_frames: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_output(&stdout).with_context(|| format!("無法解析影片資訊: {}", path.display()))
}

fn parse_ffprobe_output(json: &str) -> Result<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow::anyhow!("找不到視訊串流"))?;

    let width = video_stream
        .width
        .ok_or_else(|| anyhow::anyhow!("無法取得影片寬度"))?;
    let height = video_stream
        .height
        .ok_or_else(|| anyhow::anyhow!("無法取得影片高度"))?;

    // 優先從 format，其次從 stream
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    // r_frame_rate 可能是 "0/0"，改用 avg_frame_rate
    let frame_rate = [&video_stream.r_frame_rate, &video_stream.avg_frame_rate]
        .into_iter()
        .filter_map(|r| r.as_deref().and_then(parse_frame_rate))
        .find(|r| *r > 0.0)
        .unwrap_or(30.0);

    let frame_count = video_stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<i64>().ok())
        .or_else(|| duration_seconds.map(|d| (d * frame_rate).round() as i64))
        .unwrap_or(0);

    Ok(VideoInfo {
        width,
        height,
        frame_rate,
        duration_seconds,
        frame_count,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fraction() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_invalid() {
        assert!(parse_frame_rate("invalid").is_none());
        assert!(parse_frame_rate("0/0").is_none());
    }

    #[test]
    fn test_parse_output_uses_nb_frames() {
        let json = r#"{
            "format": {"duration": "10.000000"},
            "streams": [
                {"codec_type": "video", "width": 640, "height": 360,
                 "r_frame_rate": "25/1", "nb_frames": "250"}
            ]
        }"#;
        let info = parse_ffprobe_output(json).unwrap();
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 360);
        assert_eq!(info.frame_count, 250);
    }

    #[test]
    fn test_parse_output_estimates_frame_count_from_duration() {
        let json = r#"{
            "format": {"duration": "2.0"},
            "streams": [
                {"codec_type": "video", "width": 64, "height": 48,
                 "r_frame_rate": "0/0", "avg_frame_rate": "10/1"}
            ]
        }"#;
        let info = parse_ffprobe_output(json).unwrap();
        assert_eq!(info.frame_count, 20);
        assert!((info.frame_rate - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_output_without_duration_reports_zero_frames() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 8, "height": 8, "nb_frames": "N/A"}]
        }"#;
        let info = parse_ffprobe_output(json).unwrap();
        assert_eq!(info.frame_count, 0);
        assert!(info.duration_seconds.is_none());
    }

    #[test]
    fn test_parse_output_without_video_stream_fails() {
        let json = r#"{"streams": [{"codec_type": "audio"}]}"#;
        assert!(parse_ffprobe_output(json).is_err());
    }
}
