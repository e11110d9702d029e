//! 输出路径推导
//!
//! 输入路径到输出路径的映射是纯函数：既用于写出结果，也用于判断是否跳过。

use std::path::{Path, PathBuf};

/// 输出文件后缀
pub const OUTPUT_SUFFIX: &str = ".dataseer.tei.xml";

/// 输出目录布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    input_root: PathBuf,
    output_root: Option<PathBuf>,
}

impl OutputLayout {
    /// 创建输出布局
    ///
    /// # 参数
    /// - `input_root`: 输入根目录
    /// - `output_root`: 输出根目录；为 None 时结果写在输入文件旁边
    pub fn new(input_root: impl Into<PathBuf>, output_root: Option<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root,
        }
    }

    /// 推导输入文件对应的输出路径
    ///
    /// 文件名只保留第一个 `.` 之前的部分，再加上 [`OUTPUT_SUFFIX`]。
    /// 指定了输出根目录时，保留输入文件相对于输入根目录的子目录结构。
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let file_name = output_file_name(input);

        match &self.output_root {
            Some(output_root) => {
                let relative_dir = input
                    .strip_prefix(&self.input_root)
                    .ok()
                    .and_then(Path::parent)
                    .unwrap_or_else(|| Path::new(""));
                output_root.join(relative_dir).join(file_name)
            }
            None => match input.parent() {
                Some(parent) => parent.join(file_name),
                None => PathBuf::from(file_name),
            },
        }
    }
}

fn output_file_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    format!("{}{}", stem, OUTPUT_SUFFIX)
}
