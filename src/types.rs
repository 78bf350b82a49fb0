//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use crate::utils::expand::expand;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 应用安装目录
pub const DEFAULT_MY_BASE: &str = "/soft/warehouse-apps-1.0/Manage-GlobusEndpoints";
/// Python 运行时安装目录
pub const DEFAULT_PYTHON_BASE: &str = "/soft/python/python-3.7.3-base";
/// 信息仓库 (warehouse) 安装目录
pub const DEFAULT_WAREHOUSE_BASE: &str = "/soft/warehouse-1.0";

pub const DEFAULT_RUNTIME_DIR: &str = "${MY_BASE}/python";
pub const DEFAULT_WAREHOUSE_PATH: &str = "${WAREHOUSE_BASE}/PROD/django_xsede_warehouse";
pub const DEFAULT_SITE_PACKAGES: &str = "${MY_BASE}/python/lib/python3.7/site-packages";
pub const DEFAULT_PROGRAM: &str = "${MY_BASE}/sbin/bootstrap_token.py";
pub const DEFAULT_SETTINGS_MODULE: &str = "xsede_warehouse.settings";
pub const DEFAULT_IO_ENCODING: &str = "utf-8";

/// 安装布局：基础路径 + 由基础路径派生的路径模板
///
/// 模板支持 `${NAME}` / `$NAME`，可引用 `MY_BASE`、`PYTHON_BASE`、`WAREHOUSE_BASE`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub my_base: String,
    pub python_base: String,
    pub warehouse_base: String,
    /// 虚拟环境目录（包含 bin/activate）
    pub runtime_dir: String,
    pub warehouse_path: String,
    pub site_packages: String,
    pub program: String,
    pub settings_module: String,
    pub io_encoding: String,
    /// 传给子进程的固定参数，默认为空
    pub args: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            my_base: DEFAULT_MY_BASE.to_string(),
            python_base: DEFAULT_PYTHON_BASE.to_string(),
            warehouse_base: DEFAULT_WAREHOUSE_BASE.to_string(),
            runtime_dir: DEFAULT_RUNTIME_DIR.to_string(),
            warehouse_path: DEFAULT_WAREHOUSE_PATH.to_string(),
            site_packages: DEFAULT_SITE_PACKAGES.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
            settings_module: DEFAULT_SETTINGS_MODULE.to_string(),
            io_encoding: DEFAULT_IO_ENCODING.to_string(),
            args: Vec::new(),
        }
    }
}

impl Layout {
    /// 展开所有模板，得到具体路径
    ///
    /// 基础路径按 MY_BASE → PYTHON_BASE → WAREHOUSE_BASE 顺序赋值，
    /// 后面的可以引用前面的，与脚本中的顺序赋值一致。
    #[must_use]
    pub fn resolve(&self) -> ResolvedLayout {
        let mut vars = HashMap::new();

        let my_base = expand(&self.my_base, &vars);
        vars.insert("MY_BASE".to_string(), my_base.clone());

        let python_base = expand(&self.python_base, &vars);
        vars.insert("PYTHON_BASE".to_string(), python_base.clone());

        let warehouse_base = expand(&self.warehouse_base, &vars);
        vars.insert("WAREHOUSE_BASE".to_string(), warehouse_base.clone());

        ResolvedLayout {
            runtime_dir: expand(&self.runtime_dir, &vars),
            warehouse_path: expand(&self.warehouse_path, &vars),
            site_packages: expand(&self.site_packages, &vars),
            program: expand(&self.program, &vars),
            args: self.args.iter().map(|a| expand(a, &vars)).collect(),
            settings_module: self.settings_module.clone(),
            io_encoding: self.io_encoding.clone(),
            my_base,
            python_base,
            warehouse_base,
        }
    }
}

/// 展开后的布局，所有字段都是具体字符串
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayout {
    pub my_base: String,
    pub python_base: String,
    pub warehouse_base: String,
    pub runtime_dir: String,
    pub warehouse_path: String,
    pub site_packages: String,
    pub program: String,
    pub args: Vec<String>,
    pub settings_module: String,
    pub io_encoding: String,
}

impl ResolvedLayout {
    /// LD_LIBRARY_PATH 的值
    #[must_use]
    pub fn library_path(&self) -> String {
        format!("{}/lib", self.python_base)
    }

    /// PYTHONUSERBASE 的值
    #[must_use]
    pub fn user_base(&self) -> String {
        format!("{}/local/pythonuserbase", self.my_base)
    }

    /// DJANGO_CONF 的值
    #[must_use]
    pub fn django_conf(&self) -> String {
        format!("{}/conf/django_xsede_warehouse.conf", self.my_base)
    }
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}
