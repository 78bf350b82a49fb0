//! 配置加载：内置布局 + 可选的布局文件

pub mod layout_file;

pub use layout_file::LayoutFile;

use crate::error::Result;
use crate::types::Layout;
use std::path::{Path, PathBuf};

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verbose: bool,
    pub strict: bool,
    pub layout: Layout,
    /// 实际加载的布局文件
    pub source: Option<PathBuf>,
}

impl Config {
    /// 内置布局
    pub fn builtin(verbose: bool) -> Self {
        Self {
            verbose,
            strict: false,
            layout: Layout::default(),
            source: None,
        }
    }

    /// 加载配置：显式路径 > 默认路径 > 内置布局
    pub fn load(explicit: Option<&Path>, verbose: bool) -> Result<Self> {
        let mut config = Self::builtin(verbose);

        if let Some((path, file)) = LayoutFile::discover(explicit)? {
            config.strict = file.strict;
            config.layout = file.apply(config.layout);
            config.source = Some(path);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher.toml");
        std::fs::write(&path, "strict = true\n[paths]\nmy_base = \"/m\"\n").unwrap();

        let config = Config::load(Some(&path), true).unwrap();

        assert!(config.verbose);
        assert!(config.strict);
        assert_eq!(config.layout.my_base, "/m");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_builtin_is_not_strict() {
        let config = Config::builtin(false);

        assert!(!config.strict);
        assert_eq!(config.layout, Layout::default());
        assert!(config.source.is_none());
    }
}
