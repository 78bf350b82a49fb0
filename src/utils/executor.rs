//! 子进程执行器
//!
//! 子进程使用传入的完整环境（不再叠加当前进程的环境），
//! 继承父进程的 stdin/stdout/stderr，退出码按 shell 规则透传。

use crate::error::{LaunchError, Result};
use crate::utils::env_plan::EnvMap;
use std::io::ErrorKind;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// 命令执行器
pub struct CommandExecutor;

impl CommandExecutor {
    /// 执行程序并等待结束
    ///
    /// # 参数
    /// - `program`: 程序路径；不含 `/` 时按子进程环境中的 PATH 查找
    /// - `args`: 参数
    /// - `env`: 子进程的完整环境
    ///
    /// # 返回
    /// 子进程的退出码
    pub fn exec_with_env(program: &str, args: &[String], env: &EnvMap) -> Result<i32> {
        let mut cmd = Command::new(program);
        cmd.args(args).env_clear().envs(env);

        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!(program, ?args, "启动子进程");

        let status = cmd.status().map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaunchError::CommandNotFound(format!("{}: {}", program, e)),
            _ => LaunchError::NotExecutable(format!("{}: {}", program, e)),
        })?;

        let code = Self::exit_code(status);
        debug!(code, "子进程已退出");
        Ok(code)
    }

    /// 把 ExitStatus 转为 shell 风格的退出码
    ///
    /// 被信号终止时为 128 + 信号编号。
    pub fn exit_code(status: ExitStatus) -> i32 {
        if let Some(code) = status.code() {
            return code;
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return 128 + signal;
            }
        }

        1
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use std::ffi::OsString;

    fn base_env() -> EnvMap {
        let mut env = EnvMap::new();
        env.insert(OsString::from("PATH"), OsString::from("/usr/bin:/bin"));
        env
    }

    #[test]
    fn test_exit_code_passthrough() {
        let args = vec!["-c".to_string(), "exit 7".to_string()];
        let code = CommandExecutor::exec_with_env("/bin/sh", &args, &base_env()).unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_child_sees_only_given_environment() {
        let mut env = base_env();
        env.insert(OsString::from("LAUNCH_MARKER"), OsString::from("yes"));

        let args = vec![
            "-c".to_string(),
            r#"[ "$LAUNCH_MARKER" = yes ] && [ -z "$CARGO_PKG_NAME" ]"#.to_string(),
        ];
        let code = CommandExecutor::exec_with_env("/bin/sh", &args, &env).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_non_utf8_value_reaches_child() {
        use std::os::unix::ffi::OsStringExt;

        let mut env = base_env();
        env.insert(OsString::from("WEIRD"), OsString::from_vec(b"caf\xe9".to_vec()));

        let args = vec!["-c".to_string(), r#"[ -n "$WEIRD" ]"#.to_string()];
        let code = CommandExecutor::exec_with_env("/bin/sh", &args, &env).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_missing_program_is_command_not_found() {
        let err = CommandExecutor::exec_with_env("/definitely/not/here", &[], &base_env())
            .unwrap_err();

        assert!(matches!(err, LaunchError::CommandNotFound(_)));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("plain.txt");
        std::fs::write(&script, "not a program").unwrap();

        let err = CommandExecutor::exec_with_env(&script.to_string_lossy(), &[], &base_env())
            .unwrap_err();

        assert!(matches!(err, LaunchError::NotExecutable(_)));
        assert_eq!(err.exit_code(), 126);
    }

    #[test]
    fn test_signal_maps_to_128_plus_signal() {
        let args = vec!["-c".to_string(), "kill -9 $$".to_string()];
        let code = CommandExecutor::exec_with_env("/bin/sh", &args, &base_env()).unwrap();
        assert_eq!(code, 128 + 9);
    }
}
