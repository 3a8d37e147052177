use std::path::PathBuf;

/// 生成并保存好的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// 行号（从1开始）
    pub index: usize,
    /// 本地路径
    pub local_path: PathBuf,
    /// 图片内容
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// 文件名，例如 `image_3.png`
    pub fn file_name(&self) -> String {
        artifact_file_name(self.index)
    }
}

/// 第 `index` 行图片的文件名
pub fn artifact_file_name(index: usize) -> String {
    format!("image_{}.png", index)
}
