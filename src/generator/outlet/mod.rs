use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub mod renderer;

pub use renderer::MarkdownRenderer;

/// 报告输出端
pub trait Outlet {
    /// 保存渲染后的报告，返回实际写入的路径
    ///
    /// `target` 为相对路径时相对于输出目录，为空时使用默认文件名。
    async fn save(&self, markdown: &str, target: Option<&Path>) -> Result<PathBuf>;
}

/// 默认文件名：`research_report_YYYYMMDD_HHMMSS.md`
pub fn default_filename() -> String {
    format!(
        "research_report_{}.md",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// 写入本地磁盘
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, markdown: &str, target: Option<&Path>) -> Result<PathBuf> {
        let output_file_path = match target {
            Some(path) if !path.as_os_str().is_empty() => self.output_dir.join(path),
            _ => self.output_dir.join(default_filename()),
        };

        // 确保父目录存在
        if let Some(parent_dir) = output_file_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir).with_context(|| {
                    format!("Failed to create output directory {}", parent_dir.display())
                })?;
            }
        }

        fs::write(&output_file_path, markdown).with_context(|| {
            format!("Failed to write report to {}", output_file_path.display())
        })?;

        println!("💾 已保存报告: {}", output_file_path.display());
        Ok(output_file_path)
    }
}

#[cfg(test)]
mod tests;
