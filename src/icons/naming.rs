//! 图标命名：
//! - 按顺序应用 replaceFilenameRules 得到图标名
//! - 校验是否为合法文件名
//! - 同名时保留最先发现的文件
//! - 加上前后缀后的输出文件名也不能冲突，也不能占用保留图标名

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use super::emit::{is_reserved, Affix};
use crate::{config::RenameRule, utils::is_valid_filename};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IconSource {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
}

#[derive(Debug, Default)]
pub(crate) struct Resolution {
    pub(crate) sources: Vec<IconSource>,
    pub(crate) invalid: usize,
    pub(crate) duplicates: usize,
}

impl Resolution {
    pub(crate) fn problems(&self) -> usize {
        self.invalid + self.duplicates
    }
}

/// 每条规则只替换第一个匹配，后一条规则作用于前一条的结果
pub(crate) fn apply_rules(rules: &[RenameRule], raw: &str) -> String {
    rules.iter().fold(raw.to_string(), |name, rule| {
        rule.from.replace(&name, rule.to.as_str()).into_owned()
    })
}

fn raw_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn resolve(paths: &[PathBuf], rules: &[RenameRule]) -> Resolution {
    let mut res = Resolution::default();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for path in paths {
        let original = raw_name(path);
        let name = apply_rules(rules, &original);
        if !is_valid_filename(&name) {
            let dir = path.parent().unwrap_or(Path::new(""));
            eprintln!(
                "⚠️ 图标名 \"{}\"（原名 \"{}\"，位于 {}）不是合法的文件名，已跳过",
                name,
                original,
                dir.display()
            );
            res.invalid += 1;
            continue;
        }
        if let Some(&idx) = seen.get(&name) {
            eprintln!(
                "⚠️ 图标名重复 \"{}\":\n    保留: {}\n    跳过: {}",
                name,
                res.sources[idx].path.display(),
                path.display()
            );
            res.duplicates += 1;
            continue;
        }
        seen.insert(name.clone(), res.sources.len());
        res.sources.push(IconSource {
            name,
            path: path.clone(),
        });
    }
    res
}

/// 一个源文件最终写出的文件名（不含扩展名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedIcon {
    pub(crate) path: PathBuf,
    pub(crate) reserved: bool,
    pub(crate) normal: Option<String>,
    pub(crate) mono: Option<String>,
}

impl PlannedIcon {
    pub(crate) fn outputs(&self) -> usize {
        usize::from(self.normal.is_some()) + usize::from(self.mono.is_some())
    }
}

#[derive(Debug, Default)]
pub(crate) struct OutputPlan {
    pub(crate) icons: Vec<PlannedIcon>,
    pub(crate) collisions: usize,
}

fn claim(
    taken: &mut HashMap<String, PathBuf>,
    stem: String,
    reserved: bool,
    path: &Path,
) -> Option<String> {
    if !reserved && is_reserved(&stem) {
        eprintln!(
            "⚠️ 输出文件名 \"{}\" 与保留图标同名，已跳过: {}",
            stem,
            path.display()
        );
        return None;
    }
    if let Some(first) = taken.get(&stem) {
        eprintln!(
            "⚠️ 输出文件名冲突 \"{}\":\n    保留: {}\n    跳过: {}",
            stem,
            first.display(),
            path.display()
        );
        return None;
    }
    taken.insert(stem.clone(), path.to_path_buf());
    Some(stem)
}

/// 为每个图标分配输出文件名；先占先得，冲突的输出被跳过并计数。
/// 保留图标不加前后缀，也没有单色版本。
pub(crate) fn plan_outputs(sources: &[IconSource], normal: &Affix, mono: Option<&Affix>) -> OutputPlan {
    let mut plan = OutputPlan::default();
    let mut taken: HashMap<String, PathBuf> = HashMap::new();
    for src in sources {
        let reserved = is_reserved(&src.name);
        let normal_stem = if reserved {
            src.name.clone()
        } else {
            normal.stem(&src.name)
        };
        let icon = PlannedIcon {
            path: src.path.clone(),
            reserved,
            normal: claim(&mut taken, normal_stem, reserved, &src.path),
            mono: match mono {
                Some(affix) if !reserved => claim(&mut taken, affix.stem(&src.name), false, &src.path),
                _ => None,
            },
        };
        let requested = 1 + usize::from(mono.is_some() && !reserved);
        plan.collisions += requested - icon.outputs();
        if icon.outputs() > 0 {
            plan.icons.push(icon);
        }
    }
    plan
}
