//! 运行时激活
//!
//! `source <venv>/bin/activate` 的等价实现：不执行脚本，只计算它对环境的改动，
//! 并且只作用于子进程环境。
//!
//! activate 脚本的效果：
//! - `VIRTUAL_ENV=<venv>`
//! - `PATH=<venv>/bin:$PATH`
//! - 取消 `PYTHONHOME`
//!
//! 脚本不存在时 `source` 失败，环境保持原样，调用方据此跳过这些改动。

use crate::utils::env_plan::EnvMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// 激活对环境的改动
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivationDelta {
    pub set: Vec<(String, OsString)>,
    pub unset: Vec<String>,
}

/// 虚拟环境激活
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    runtime_dir: String,
}

impl Activation {
    pub fn new(runtime_dir: impl Into<String>) -> Self {
        Self {
            runtime_dir: runtime_dir.into(),
        }
    }

    /// 激活脚本路径
    pub fn script(&self) -> PathBuf {
        Path::new(&self.runtime_dir).join("bin").join("activate")
    }

    /// 激活脚本是否存在
    pub fn is_available(&self) -> bool {
        self.script().is_file()
    }

    /// 计算激活改动
    ///
    /// PATH 按 shell 字符串拼接处理：原 PATH 未设置时结果以 `:` 结尾。
    pub fn delta(&self, inherited: &EnvMap) -> ActivationDelta {
        let mut path = OsString::from(format!("{}/bin:", self.runtime_dir));
        if let Some(original) = inherited.get(OsStr::new("PATH")) {
            path.push(original);
        }

        ActivationDelta {
            set: vec![
                ("VIRTUAL_ENV".to_string(), OsString::from(&self.runtime_dir)),
                ("PATH".to_string(), path),
            ],
            unset: vec!["PYTHONHOME".to_string()],
        }
    }
}
