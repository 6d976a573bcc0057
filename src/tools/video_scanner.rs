use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描資料夾中指定副檔名的影片，依檔名排序
///
/// `recursive` 為 false 時只看資料夾第一層
pub fn scan_video_files(
    directory: &Path,
    extension: &str,
    recursive: bool,
) -> Result<Vec<VideoFileInfo>> {
    let extension = extension.trim_start_matches('.').to_lowercase();
    let max_depth = if recursive { usize::MAX } else { 1 };

    let video_files = WalkDir::new(directory)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), &extension))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    Ok(video_files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.to_lowercase() == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_has_extension_case_insensitive() {
        assert!(has_extension(Path::new("/a/clip.MP4"), "mp4"));
        assert!(!has_extension(Path::new("/a/clip.mkv"), "mp4"));
        assert!(!has_extension(Path::new("/a/mp4"), "mp4"));
    }

    #[test]
    fn test_scan_respects_depth_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp4"), b"b").unwrap();
        fs::write(dir.path().join("a.mp4"), b"aa").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.mp4"), b"c").unwrap();

        let flat = scan_video_files(dir.path(), ".mp4", false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
        assert_eq!(flat[0].size, 2);

        let deep = scan_video_files(dir.path(), "mp4", true).unwrap();
        assert_eq!(deep.len(), 3);
    }
}
