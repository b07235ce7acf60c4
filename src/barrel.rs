//! index 文件更新：追加 `export * from '<相对路径>/<组件名>';`，已存在则不变

use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::utils::{relative_path, to_slash};

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(env::current_dir().context("无法获取当前目录")?.join(p))
}

/// 生成 re-export 行，路径相对于 index 文件所在目录
pub(crate) fn export_line(index_path: &Path, component_dir: &Path, name: &str) -> Result<String> {
    let index_dir = absolutize(index_path)?
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let rel = to_slash(&relative_path(&index_dir, &absolutize(component_dir)?));
    let target = if rel.is_empty() {
        format!("./{}", name)
    } else if rel.starts_with("..") {
        format!("{}/{}", rel, name)
    } else {
        format!("./{}/{}", rel, name)
    };
    Ok(format!("export * from '{}';", target))
}

/// 返回是否写入了新行
pub(crate) fn update_index(index_path: &Path, component_dir: &Path, name: &str) -> Result<bool> {
    let line = export_line(index_path, component_dir, name)?;
    let content = fs::read_to_string(index_path)
        .with_context(|| format!("读取 index 文件失败: {}", index_path.display()))?;
    if content.contains(&line) {
        println!("ℹ️ {} 已包含 {}", index_path.display(), name);
        return Ok(false);
    }
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(index_path)
        .with_context(|| format!("打开 index 文件失败: {}", index_path.display()))?;
    write!(file, "\n{}", line)
        .with_context(|| format!("写入 index 文件失败: {}", index_path.display()))?;
    println!("写入: {} ({})", index_path.display(), line);
    Ok(true)
}
