//! 布局文件 (TOML)
//!
//! ```toml
//! strict = false
//!
//! [paths]
//! my_base = "/soft/warehouse-apps-1.0/Manage-GlobusEndpoints"
//! python_base = "/soft/python/python-3.7.3-base"
//! site_packages = "${MY_BASE}/python/lib/python3.7/site-packages"
//!
//! [launch]
//! program = "${MY_BASE}/bin/route_globus_v3.py"
//! args = ["-l", "info"]
//! ```
//!
//! 所有键都是可选的，缺省时使用内置值；未知键视为错误。

use crate::error::Result;
use crate::types::Layout;
use crate::utils::expand::referenced_vars;
use crate::utils::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 模板中可以引用的变量
const KNOWN_VARS: [&str; 3] = ["MY_BASE", "PYTHON_BASE", "WAREHOUSE_BASE"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub my_base: Option<String>,
    pub python_base: Option<String>,
    pub warehouse_base: Option<String>,
    pub runtime_dir: Option<String>,
    pub warehouse_path: Option<String>,
    pub site_packages: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSection {
    pub program: Option<String>,
    pub settings_module: Option<String>,
    pub io_encoding: Option<String>,
    pub args: Option<Vec<String>>,
}

/// 布局文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutFile {
    /// 启动前检查激活脚本和目标程序
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub launch: LaunchSection,
}

impl LayoutFile {
    /// 解析 TOML 文本
    pub fn parse(content: &str) -> Result<Self> {
        let file: LayoutFile = toml::from_str(content)?;
        file.warn_unknown_references();
        Ok(file)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = paths::read_file(path)?;
        debug!(path = %path.display(), "加载布局文件");
        Self::parse(&content)
    }

    /// 查找并加载布局文件
    ///
    /// - 显式指定的路径必须存在
    /// - 否则尝试默认路径，不存在时返回 None（使用内置布局）
    pub fn discover(explicit: Option<&Path>) -> Result<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            return Ok(Some((path.to_path_buf(), Self::load(path)?)));
        }

        match paths::default_config_path() {
            Some(path) if paths::file_exists(&path) => {
                let file = Self::load(&path)?;
                Ok(Some((path, file)))
            }
            _ => Ok(None),
        }
    }

    /// 覆盖布局中的对应字段
    #[must_use]
    pub fn apply(&self, mut layout: Layout) -> Layout {
        let p = &self.paths;
        let l = &self.launch;

        override_with(&mut layout.my_base, &p.my_base);
        override_with(&mut layout.python_base, &p.python_base);
        override_with(&mut layout.warehouse_base, &p.warehouse_base);
        override_with(&mut layout.runtime_dir, &p.runtime_dir);
        override_with(&mut layout.warehouse_path, &p.warehouse_path);
        override_with(&mut layout.site_packages, &p.site_packages);
        override_with(&mut layout.program, &l.program);
        override_with(&mut layout.settings_module, &l.settings_module);
        override_with(&mut layout.io_encoding, &l.io_encoding);

        if let Some(args) = &l.args {
            layout.args = args.clone();
        }

        layout
    }

    fn templates(&self) -> impl Iterator<Item = &String> {
        let p = &self.paths;
        [
            &p.my_base,
            &p.python_base,
            &p.warehouse_base,
            &p.runtime_dir,
            &p.warehouse_path,
            &p.site_packages,
            &self.launch.program,
        ]
        .into_iter()
        .flatten()
        .chain(self.launch.args.iter().flatten())
    }

    /// 引用未知变量不算错误（展开为空串），但多半是拼写错误
    fn warn_unknown_references(&self) {
        for template in self.templates() {
            for name in referenced_vars(template) {
                if !KNOWN_VARS.contains(&name.as_str()) {
                    warn!(template = %template, var = %name, "模板引用了未知变量，将展开为空串");
                }
            }
        }
    }
}

fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;

    #[test]
    fn test_empty_file_keeps_defaults() {
        let file = LayoutFile::parse("").unwrap();

        assert!(!file.strict);
        assert_eq!(file.apply(Layout::default()), Layout::default());
    }

    #[test]
    fn test_partial_override() {
        let content = r#"
[paths]
my_base = "/a"
python_base = "/b"
"#;
        let layout = LayoutFile::parse(content).unwrap().apply(Layout::default());

        assert_eq!(layout.my_base, "/a");
        assert_eq!(layout.python_base, "/b");
        assert_eq!(layout.warehouse_base, crate::types::DEFAULT_WAREHOUSE_BASE);

        let resolved = layout.resolve();
        assert_eq!(resolved.library_path(), "/b/lib");
        assert_eq!(resolved.program, "/a/sbin/bootstrap_token.py");
    }

    #[test]
    fn test_launch_section() {
        let content = r#"
strict = true

[launch]
program = "${MY_BASE}/bin/route_globus_v3.py"
settings_module = "other.settings"
args = ["-l", "debug"]
"#;
        let file = LayoutFile::parse(content).unwrap();
        assert!(file.strict);

        let layout = file.apply(Layout::default());
        assert_eq!(layout.program, "${MY_BASE}/bin/route_globus_v3.py");
        assert_eq!(layout.settings_module, "other.settings");
        assert_eq!(layout.args, vec!["-l".to_string(), "debug".to_string()]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = LayoutFile::parse("[paths]\nmy_bsae = \"/a\"\n").unwrap_err();
        assert!(matches!(err, LaunchError::ConfigParse(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = LayoutFile::parse("strict = \"yes\"\n").unwrap_err();
        assert!(matches!(err, LaunchError::ConfigParse(_)));
    }

    #[test]
    fn test_discover_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("launcher.toml");

        let err = LayoutFile::discover(Some(&missing)).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigNotFound(_)));
    }

    #[test]
    fn test_discover_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher.toml");
        std::fs::write(&path, "[paths]\nmy_base = \"/x\"\n").unwrap();

        let (found, file) = LayoutFile::discover(Some(&path)).unwrap().unwrap();
        assert_eq!(found, path);
        assert_eq!(file.paths.my_base.as_deref(), Some("/x"));
    }
}
