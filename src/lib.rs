//! bootstrap-token - 令牌引导程序启动器
//!
//! 计算运行时激活和导出变量，只作用于子进程环境，然后委托执行目标程序。

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::config::Config;
pub use crate::core::Launcher;
pub use error::{LaunchError, Result};
pub use types::{Layout, OutputFormat, ResolvedLayout};
