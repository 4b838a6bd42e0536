// ==========================================
// Courtier CRM - 暂存上传文件守卫
// ==========================================
// 职责: 独占暂存文件，保证删除恰好一次
// - cleanup(): 显式删除
// - Drop: 兜底删除（future 被取消、panic 时）
// 删除失败只记录日志，不覆盖已得到的结果
// ==========================================

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    released: bool,
}

impl TempUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 是否已执行过删除
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// 删除暂存文件；重复调用无效
    ///
    /// # 返回
    /// - true: 本次调用删除了文件
    /// - false: 已删除过、文件不存在或删除失败
    pub fn cleanup(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "暂存文件已删除");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "暂存文件已不存在");
                false
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "暂存文件删除失败");
                false
            }
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.cleanup();
    }
}
