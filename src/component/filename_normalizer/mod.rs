//! 檔名正規化元件
//!
//! 對設定的資料夾逐一替換名稱中的字元

mod main;
mod name_normalizer;

pub use main::{FilenameNormalizer, RenameResult};
pub use name_normalizer::{NameNormalizer, RenameOutcome, RenamePlan, apply_plan};
