//! 路径模板展开
//!
//! 语法与 shell 参数展开的简单形式一致：
//! - `${NAME}` / `$NAME`：替换为变量值，未定义时为空串
//! - `$$`：字面量 `$`
//! - 其它 `$`（如 `$1`、`${` 未闭合）原样保留

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*)|(\$))")
        .expect("变量模式正则无效")
});

/// 展开模板中的变量引用
#[must_use]
pub fn expand(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(3).is_some() {
                return "$".to_string();
            }

            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            vars.get(name).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// 列出模板引用到的变量名（按出现顺序，去重）
#[must_use]
pub fn referenced_vars(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in VAR_PATTERN.captures_iter(template) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2))
            && !names.iter().any(|n| n == m.as_str())
        {
            names.push(m.as_str().to_string());
        }
    }

    names
}
