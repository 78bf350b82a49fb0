//! 错误处理模块 (修复原则：明确抛出异常)

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件不存在: {0}")]
    ConfigNotFound(PathBuf),

    #[error("配置解析错误: {0}")]
    ConfigParse(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    // === 严格模式下的启动前检查 ===
    #[error("运行时激活脚本不存在: {0}")]
    ActivationMissing(PathBuf),

    #[error("目标程序不存在: {0}")]
    ProgramMissing(PathBuf),

    // === 子进程相关错误 ===
    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("命令无法执行: {0}")]
    NotExecutable(String),
}

impl From<toml::de::Error> for LaunchError {
    fn from(err: toml::de::Error) -> Self {
        LaunchError::ConfigParse(err.to_string())
    }
}

impl LaunchError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                LaunchError::ConfigNotFound(path) => {
                    eprintln!("配置文件不存在: {}", path.display())
                }
                LaunchError::CommandNotFound(msg) => eprintln!("{}", msg),
                LaunchError::NotExecutable(msg) => eprintln!("{}", msg),
                _ => eprintln!("错误: {}", self),
            }
        }
    }

    /// 进程退出码，沿用 shell 的约定
    ///
    /// - 127: 命令未找到
    /// - 126: 命令存在但无法执行
    /// - 1: 其它错误
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::CommandNotFound(_) => 127,
            LaunchError::NotExecutable(_) => 126,
            _ => 1,
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, LaunchError>;
