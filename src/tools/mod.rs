mod ffmpeg_source;
mod ffprobe_info;
mod path_prompt;
mod path_validator;
mod video_scanner;
mod video_source;

pub use ffmpeg_source::{FfmpegDecoder, FfmpegSource};
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use path_prompt::{prompt_path_with_recent, recent_path_options};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use video_scanner::{VideoFileInfo, scan_video_files};
pub use video_source::{Frame, VideoDecoder, VideoSource, write_png};
