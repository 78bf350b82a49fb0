//! CLI 参数定义

use crate::types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bootstrap-token - 令牌引导程序启动器
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap-token",
    version,
    about = "准备运行环境并启动令牌引导程序",
    long_about = "激活 Python 虚拟环境，导出 LD_LIBRARY_PATH、PYTHONPATH、PYTHONUSERBASE、\
                  PYTHONIOENCODING、DJANGO_CONF、DJANGO_SETTINGS_MODULE，\
                  然后启动目标程序并透传其退出码。不带子命令时等同于 run。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 布局文件路径
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// 准备环境并启动目标程序（默认）
    Run {
        /// 启动前检查激活脚本和目标程序是否存在
        #[arg(long)]
        strict: bool,
        /// 追加给目标程序的参数
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// 打印将传给目标程序的环境变量
    Env {
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
        /// 打印完整的子进程环境
        #[arg(short, long)]
        all: bool,
    },

    /// 检查布局中引用的路径
    Doctor,
}

impl Commands {
    /// 未指定子命令时的默认动作
    pub fn default_run() -> Self {
        Commands::Run {
            strict: false,
            args: Vec::new(),
        }
    }
}

/// 解析输出格式
pub fn parse_format(format: &str) -> OutputFormat {
    OutputFormat::from(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_means_default_run() {
        let cli = Cli::try_parse_from(["bootstrap-token"]).unwrap();

        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_with_trailing_args() {
        let cli =
            Cli::try_parse_from(["bootstrap-token", "run", "--strict", "--", "-x", "y"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Run {
                strict: true,
                args: vec!["-x".to_string(), "y".to_string()],
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["bootstrap-token", "env", "-v", "--config", "/tmp/l.toml"])
                .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/l.toml")));
    }

    #[test]
    fn test_env_format() {
        let cli = Cli::try_parse_from(["bootstrap-token", "env", "-f", "json", "--all"]).unwrap();

        match cli.command {
            Some(Commands::Env { format, all }) => {
                assert_eq!(parse_format(&format), OutputFormat::Json);
                assert!(all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
