//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 组件名校验与规范化（组件名 / CSS 类名）
//! - 文件名合法性、相对路径计算

use std::{
    env,
    path::{Component, Path, PathBuf},
};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from).filter(|p| !p.as_os_str().is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| truthy(&v))
}

fn truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes" | "y"
    )
}

/// 组件名必须以字母开头，且只包含字母与数字。
pub(crate) fn validate_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// 由原始名称得到 (组件名, CSS 类名)。
///
/// 组件名为首字母大写；类名在每个“大写形式等于自身”的字符前切分，
/// 再以 `-` 连接并转小写，例如 `myButton` -> `my-button`。
/// 注意数字也满足该条件：`icon2x` -> `icon-2x`。
pub(crate) fn normalize_component_name(raw: &str) -> (String, String) {
    let mut chars = raw.chars();
    let comp_name = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in raw.chars() {
        if c.to_uppercase().eq(std::iter::once(c)) && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    parts.push(current);

    (comp_name, parts.join("-").to_lowercase())
}

/// 跨平台的文件名合法性检查（不含路径分隔符、保留名等）。
pub(crate) fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > 255 || name == "." || name == ".." {
        return false;
    }
    if name
        .chars()
        .any(|c| c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
    {
        return false;
    }
    if name.ends_with('.') || name.ends_with(' ') {
        return false;
    }
    // Windows 保留设备名（忽略大小写与扩展名）
    let stem = name.split('.').next().unwrap_or("").to_ascii_uppercase();
    let reserved = matches!(stem.as_str(), "CON" | "PRN" | "AUX" | "NUL")
        || ((stem.starts_with("COM") || stem.starts_with("LPT"))
            && stem.len() == 4
            && stem.as_bytes()[3].is_ascii_digit()
            && stem.as_bytes()[3] != b'0');
    !reserved
}

/// 文件名中第一个 `.` 之前的部分
pub(crate) fn file_stem_before_dot(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().split('.').next().unwrap_or("").to_string())
        .unwrap_or_default()
}

/// 计算 `to` 相对于目录 `from` 的路径，两者需同为绝对路径或同为相对路径。
pub(crate) fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = to.components().filter(|c| *c != Component::CurDir).collect();
    let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();
    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for c in &to[common..] {
        rel.push(c.as_os_str());
    }
    rel
}

/// 路径转为 `/` 分隔的字符串（用于生成 import 语句）
pub(crate) fn to_slash(p: &Path) -> String {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_component_names() {
        assert!(validate_name("Button"));
        assert!(validate_name("myButton2"));
        assert!(!validate_name("2button"));
        assert!(!validate_name("my-button"));
        assert!(!validate_name(""));
    }

    #[test]
    fn normalizes_component_and_css_names() {
        assert_eq!(
            normalize_component_name("myButton"),
            ("MyButton".to_string(), "my-button".to_string())
        );
        assert_eq!(
            normalize_component_name("NavBarItem"),
            ("NavBarItem".to_string(), "nav-bar-item".to_string())
        );
        assert_eq!(
            normalize_component_name("icon2x"),
            ("Icon2x".to_string(), "icon-2x".to_string())
        );
    }

    #[test]
    fn filename_validation() {
        assert!(is_valid_filename("arrow-left"));
        assert!(is_valid_filename("__missing"));
        assert!(!is_valid_filename(""));
        assert!(!is_valid_filename("a/b"));
        assert!(!is_valid_filename("what?"));
        assert!(!is_valid_filename("con"));
        assert!(!is_valid_filename("LPT1"));
        assert!(is_valid_filename("COM0"));
        assert!(!is_valid_filename("trailing."));
        assert!(!is_valid_filename(&"x".repeat(256)));
    }

    #[test]
    fn relative_paths() {
        assert_eq!(
            relative_path(Path::new("/p/src"), Path::new("/p/src/components")),
            PathBuf::from("components")
        );
        assert_eq!(
            relative_path(Path::new("/p/src/pages"), Path::new("/p/src/components")),
            PathBuf::from("../components")
        );
        assert_eq!(relative_path(Path::new("/p/src"), Path::new("/p/src")), PathBuf::new());
    }

    #[test]
    fn stem_before_first_dot() {
        assert_eq!(file_stem_before_dot("src/icons/Icon.tsx"), "Icon");
        assert_eq!(file_stem_before_dot("Icon.d.ts"), "Icon");
    }

    #[test]
    fn truthy_values() {
        assert!(truthy("YES"));
        assert!(truthy(" 1 "));
        assert!(!truthy("off"));
    }
}
