//! 初始化模块
//! - `react-gen init` 写出示例配置 react-gen.config.json

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::config::CONFIG_FILENAME;

// 内置示例（用于 init）
const SAMPLE_CONFIG: &str = include_str!("assets/sample.react-gen.config.json");

/// 在指定目录写出示例配置，已存在时需要 --force 才覆盖
pub(crate) fn init_config(dir: &Path, force: bool) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {}", dir.display()))?;
    }

    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        eprintln!("跳过: {} 已存在，使用 --force 可覆盖", cfg_path.display());
        return Ok(());
    }
    fs::write(&cfg_path, SAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("写入示例配置失败: {}", cfg_path.display()))?;
    println!("写入: {}", cfg_path.display());
    println!("✅ 初始化完成，在该目录运行: react-gen component <Name>");
    Ok(())
}
