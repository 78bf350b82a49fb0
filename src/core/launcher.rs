//! 启动器 (环境初始化 + 委托执行)

use crate::config::Config;
use crate::error::{LaunchError, Result};
use crate::types::ResolvedLayout;
use crate::utils::activation::Activation;
use crate::utils::env_plan::{EnvMap, EnvPlan, EnvPlanner};
use crate::utils::executor::CommandExecutor;
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 启动器
///
/// 持有展开后的布局，对传入的继承环境计算子进程环境并执行目标程序。
/// 不修改当前进程的环境。
#[derive(Debug, Clone)]
pub struct Launcher {
    layout: ResolvedLayout,
    strict: bool,
}

impl Launcher {
    pub fn new(layout: ResolvedLayout, strict: bool) -> Self {
        Self { layout, strict }
    }

    pub fn from_config(config: &Config) -> Self {
        let layout = config.layout.resolve();
        debug!(?layout, strict = config.strict, "布局已展开");
        Self::new(layout, config.strict)
    }

    pub fn layout(&self) -> &ResolvedLayout {
        &self.layout
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn activation(&self) -> Activation {
        Activation::new(self.layout.runtime_dir.clone())
    }

    /// 启动计划
    ///
    /// 激活脚本不存在时计划中不含激活改动。
    pub fn plan(&self, inherited: &EnvMap) -> EnvPlan {
        EnvPlanner::plan(&self.layout, inherited, self.activation().is_available())
    }

    /// 子进程的完整环境
    pub fn child_environment(&self, inherited: &EnvMap) -> EnvMap {
        self.plan(inherited).apply(inherited)
    }

    /// 按子进程的 PATH 解析目标程序
    pub fn resolve_program(&self, child_env: &EnvMap) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        which::which_in(&self.layout.program, child_env.get(OsStr::new("PATH")), cwd).ok()
    }

    /// 启动前检查
    ///
    /// 默认模式与原脚本一致：激活脚本缺失只记录警告，不做激活改动，继续执行。
    /// 严格模式下激活脚本或目标程序缺失都会中止启动。
    pub fn preflight(&self, child_env: &EnvMap) -> Result<()> {
        let activation = self.activation();

        if !activation.is_available() {
            if self.strict {
                return Err(LaunchError::ActivationMissing(activation.script()));
            }
            warn!(script = %activation.script().display(), "运行时激活脚本不存在，继续执行");
        }

        if self.strict && self.resolve_program(child_env).is_none() {
            return Err(LaunchError::ProgramMissing(PathBuf::from(&self.layout.program)));
        }

        Ok(())
    }

    /// 启动目标程序，返回其退出码
    ///
    /// 参数顺序：布局中的固定参数，然后是 `extra_args`。
    pub fn launch(&self, inherited: &EnvMap, extra_args: &[String]) -> Result<i32> {
        let env = self.child_environment(inherited);
        self.preflight(&env)?;

        let mut args = self.layout.args.clone();
        args.extend_from_slice(extra_args);

        info!(program = %self.layout.program, "启动目标程序");
        let code = CommandExecutor::exec_with_env(&self.layout.program, &args, &env)?;

        if code != 0 {
            info!(code, "目标程序以非零状态退出");
        }

        Ok(code)
    }
}
