//! 配置与加载模块：
//! - 定义 `Config` 及各命令的默认选项块
//! - `load_config` 读取 react-gen.config.json（缺失时告警并使用空配置）
//! - 仅在配置中出现的字段（customCode / replaceFilenameRules）的格式校验

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GenError;

pub(crate) const CONFIG_FILENAME: &str = "react-gen.config.json";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Config {
    pub(crate) component: ComponentDefaults,
    pub(crate) page: PageDefaults,
    pub(crate) icon: IconDefaults,
    /// 所有命令共享的作者名
    pub(crate) author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ComponentDefaults {
    pub(crate) out_dir: Option<String>,
    pub(crate) base_element: Option<String>,
    pub(crate) wrap_namespace: Option<bool>,
    pub(crate) style: Option<String>,
    pub(crate) style_filename: Option<String>,
    pub(crate) forward_ref: Option<bool>,
    pub(crate) index_path: Option<String>,
    pub(crate) time: Option<bool>,
    /// 仅配置：插入到生成文件中的代码行
    pub(crate) custom_code: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PageDefaults {
    pub(crate) out_dir: Option<String>,
    pub(crate) style: Option<String>,
    pub(crate) style_filename: Option<String>,
    pub(crate) time: Option<bool>,
    pub(crate) custom_code: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct IconDefaults {
    pub(crate) out_filepath: Option<String>,
    pub(crate) asset_dirs: Option<Vec<String>>,
    pub(crate) recursive: Option<bool>,
    pub(crate) monocolor: Option<bool>,
    pub(crate) normalize: Option<String>,
    pub(crate) descrip: Option<String>,
    pub(crate) time: Option<bool>,
    /// 数字或数字字符串，交给交互校验
    pub(crate) threshold: Option<Value>,
    pub(crate) wrap_namespace: Option<bool>,
    pub(crate) index_path: Option<String>,
    pub(crate) prefix_normal: Option<String>,
    pub(crate) suffix_normal: Option<String>,
    pub(crate) prefix_single_color: Option<String>,
    pub(crate) suffix_single_color: Option<String>,
    pub(crate) custom_code: Option<Value>,
    /// 仅配置：svg 文件名（不含扩展名）在转为图标名前依次应用的替换规则
    pub(crate) replace_filename_rules: Option<Value>,
}

/// 运行模式：调试模式下输出参数与合并后的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunMode {
    Production,
    Debug,
}

impl RunMode {
    pub(crate) fn log_level(self) -> log::LevelFilter {
        match self {
            RunMode::Production => log::LevelFilter::Warn,
            RunMode::Debug => log::LevelFilter::Debug,
        }
    }
}

/// 文件名替换规则，按顺序应用
#[derive(Debug, Clone)]
pub(crate) struct RenameRule {
    pub(crate) from: Regex,
    pub(crate) to: String,
}

/// 解析配置文件路径：显式路径优先，否则为当前目录下的默认文件
pub(crate) fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => cwd.join(CONFIG_FILENAME),
    }
}

/// 加载配置。
///
/// 文件不存在、无法读取或不是合法 JSON 时告警并返回空配置；
/// JSON 合法但字段类型不符时视为配置格式错误。
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!(
                "⚠️ 无法读取配置文件 {}（{}），将使用空的默认配置",
                path.display(),
                e
            );
            return Ok(Config::default());
        }
    };
    let raw: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!(
                "⚠️ 配置文件 {} 不是合法的 JSON（{}），将使用空的默认配置",
                path.display(),
                e
            );
            return Ok(Config::default());
        }
    };
    let config: Config = serde_json::from_value(raw)
        .map_err(|e| GenError::ConfigSchema(format!("{}: {}", path.display(), e)))?;
    println!("✅ 已加载配置: {}", path.display());
    Ok(config)
}

/// 解析 customCode：必须是字符串数组，以换行连接；`$component` 替换为组件名。
pub(crate) fn parse_custom_code(value: Option<&Value>, component_name: &str) -> Result<String> {
    let items = match value {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(GenError::ConfigSchema("customCode 必须是字符串数组".into()).into())
        }
    };
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => lines.push(s.replace("$component", component_name)),
            _ => {
                return Err(GenError::ConfigSchema("customCode 必须是字符串数组".into()).into())
            }
        }
    }
    Ok(lines.join("\n"))
}

/// 解析 replaceFilenameRules：`[{ "from": "<regex>", "to": "<string>" }]`
pub(crate) fn parse_rename_rules(value: Option<&Value>) -> Result<Vec<RenameRule>> {
    const SHAPE: &str = "replaceFilenameRules 必须是由 {\"from\": string, \"to\": string} 组成的数组";
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(GenError::ConfigSchema(SHAPE.into()).into()),
    };
    let mut rules = Vec::with_capacity(items.len());
    for item in items {
        let (from, to) = match (
            item.get("from").and_then(Value::as_str),
            item.get("to").and_then(Value::as_str),
        ) {
            (Some(from), Some(to)) if item.is_object() => (from, to),
            _ => return Err(GenError::ConfigSchema(SHAPE.into()).into()),
        };
        let from = Regex::new(from)
            .map_err(|e| GenError::ConfigSchema(format!("无效的正则表达式 '{}': {}", from, e)))?;
        rules.push(RenameRule {
            from,
            to: to.to_string(),
        });
    }
    Ok(rules)
}

/// threshold 的原始文本（供交互校验使用）
pub(crate) fn threshold_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_error(r: Result<impl std::fmt::Debug>) -> bool {
        matches!(
            r.unwrap_err().downcast_ref::<GenError>(),
            Some(GenError::ConfigSchema(_))
        )
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(cfg.author.is_none());
        assert!(cfg.icon.asset_dirs.is_none());
    }

    #[test]
    fn invalid_json_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config(&path).unwrap().component.out_dir.is_none());
    }

    #[test]
    fn loads_camel_case_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            json!({
                "author": "someone",
                "component": { "outDir": "src/components", "forwardRef": true },
                "icon": { "assetDirs": ["assets"], "threshold": 1024, "suffixSingleColor": "_m" },
                "unknown": 1
            })
            .to_string(),
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.author.as_deref(), Some("someone"));
        assert_eq!(cfg.component.out_dir.as_deref(), Some("src/components"));
        assert_eq!(cfg.component.forward_ref, Some(true));
        assert_eq!(cfg.icon.asset_dirs, Some(vec!["assets".to_string()]));
        assert_eq!(threshold_text(cfg.icon.threshold.as_ref()), "1024");
        assert_eq!(cfg.icon.suffix_single_color.as_deref(), Some("_m"));
    }

    #[test]
    fn wrong_field_type_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"{ "icon": { "assetDirs": "assets" } }"#).unwrap();
        assert!(schema_error(load_config(&path)));
    }

    #[test]
    fn custom_code_joins_and_interpolates() {
        let v = json!(["// $component", "const x = 1;"]);
        assert_eq!(
            parse_custom_code(Some(&v), "Button").unwrap(),
            "// Button\nconst x = 1;"
        );
        assert_eq!(parse_custom_code(None, "Button").unwrap(), "");
        assert!(schema_error(parse_custom_code(Some(&json!("x")), "B")));
        assert!(schema_error(parse_custom_code(Some(&json!([1])), "B")));
    }

    #[test]
    fn rename_rules_are_validated() {
        let rules = parse_rename_rules(Some(&json!([{ "from": "^ic_", "to": "" }]))).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(schema_error(parse_rename_rules(Some(&json!({})))));
        assert!(schema_error(parse_rename_rules(Some(&json!([{ "from": "a" }])))));
        assert!(schema_error(parse_rename_rules(Some(&json!([{ "from": "(", "to": "" }])))));
    }

    #[test]
    fn config_path_resolution() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_config_path(None, cwd), cwd.join(CONFIG_FILENAME));
        assert_eq!(
            resolve_config_path(Some(Path::new("x.json")), cwd),
            PathBuf::from("x.json")
        );
    }
}
