//! 子进程环境规划
//!
//! 顺序与原启动脚本一致（后者覆盖前者）：
//! 1. 继承的环境
//! 2. 运行时激活 (VIRTUAL_ENV / PATH / 取消 PYTHONHOME)，仅在激活脚本存在时
//! 3. 导出变量 (LD_LIBRARY_PATH, PYTHONPATH, PYTHONUSERBASE,
//!    PYTHONIOENCODING, DJANGO_CONF, DJANGO_SETTINGS_MODULE)
//!
//! 所有计算都基于传入的继承环境，不读取也不修改当前进程的环境。
//! 环境以 OsString 保存，非 UTF-8 的变量原样传给子进程。

use crate::types::ResolvedLayout;
use crate::utils::activation::Activation;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// 进程环境
pub type EnvMap = BTreeMap<OsString, OsString>;

/// 单条赋值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub key: String,
    #[serde(serialize_with = "serialize_lossy")]
    pub value: OsString,
}

impl Assignment {
    fn new(key: &str, value: impl Into<OsString>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

fn serialize_lossy<S: Serializer>(value: &OsString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string_lossy())
}

/// 启动计划：有序赋值 + 需要移除的变量
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnvPlan {
    /// 是否应用了运行时激活
    pub activated: bool,
    pub assignments: Vec<Assignment>,
    pub removals: Vec<String>,
}

impl EnvPlan {
    /// 获取某个变量在计划中的最终值
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.assignments
            .iter()
            .rev()
            .find(|a| a.key == key)
            .map(|a| a.value.as_os_str())
    }

    /// 把计划应用到继承环境上，得到子进程的完整环境
    pub fn apply(&self, inherited: &EnvMap) -> EnvMap {
        let mut env = inherited.clone();

        for key in &self.removals {
            env.remove(OsStr::new(key));
        }

        for a in &self.assignments {
            env.insert(OsString::from(&a.key), a.value.clone());
        }

        env
    }
}

/// 环境规划器
pub struct EnvPlanner;

impl EnvPlanner {
    /// 按 shell 拼接规则构造搜索路径
    ///
    /// `a:b:${EXISTING}`，EXISTING 未设置时保留末尾的 `:`，不会产生 `::`。
    pub fn join_search_path(prefix: &[&str], existing: Option<&OsStr>) -> OsString {
        let mut joined = OsString::new();
        for part in prefix {
            joined.push(part);
            joined.push(":");
        }
        if let Some(existing) = existing {
            joined.push(existing);
        }
        joined
    }

    /// 计算完整启动计划
    ///
    /// `activated` 为 false 时（激活脚本不存在）与 shell 中 `source` 失败一致，
    /// 不做任何激活改动，只导出变量。
    pub fn plan(layout: &ResolvedLayout, inherited: &EnvMap, activated: bool) -> EnvPlan {
        let mut plan = EnvPlan {
            activated,
            ..EnvPlan::default()
        };

        if activated {
            let delta = Activation::new(layout.runtime_dir.clone()).delta(inherited);
            for (key, value) in delta.set {
                plan.assignments.push(Assignment { key, value });
            }
            plan.removals.extend(delta.unset);
        }

        let python_path = Self::join_search_path(
            &[layout.warehouse_path.as_str(), layout.site_packages.as_str()],
            inherited.get(OsStr::new("PYTHONPATH")).map(OsString::as_os_str),
        );

        plan.assignments.extend([
            Assignment::new("LD_LIBRARY_PATH", layout.library_path()),
            Assignment::new("PYTHONPATH", python_path),
            Assignment::new("PYTHONUSERBASE", layout.user_base()),
            Assignment::new("PYTHONIOENCODING", layout.io_encoding.clone()),
            Assignment::new("DJANGO_CONF", layout.django_conf()),
            Assignment::new("DJANGO_SETTINGS_MODULE", layout.settings_module.clone()),
        ]);

        plan
    }
}
