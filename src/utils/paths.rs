//! 跨平台路径处理工具 (传统原则：常识性接口设计)

use crate::error::{LaunchError, Result};
use crate::utils::env_plan::EnvMap;
use std::path::{Path, PathBuf};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// 获取用户配置目录：<config_dir>/bootstrap-token
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bootstrap-token"))
}

/// 默认布局文件路径
pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 检查目录是否存在
pub fn dir_exists(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// 读取文件内容，返回错误时提供详细信息
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(LaunchError::ConfigNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| {
        LaunchError::Io(std::io::Error::new(
            e.kind(),
            format!("读取文件 {} 失败: {}", path.display(), e),
        ))
    })
}

/// 快照当前进程的环境 (只读，保留非 UTF-8 的变量)
pub fn current_env() -> EnvMap {
    std::env::vars_os().collect()
}
