//! 图标文件写出与懒加载分类

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::templates::{fallback_icon, Templates};

pub(crate) const MISSING: &str = "__missing";
pub(crate) const LOADING: &str = "__loading";

/// `__missing` / `__loading` 总会写出，但不参与分类
pub(crate) fn is_reserved(name: &str) -> bool {
    name == MISSING || name == LOADING
}

/// 文件名前后缀
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Affix {
    pub(crate) prefix: String,
    pub(crate) suffix: String,
}

impl Affix {
    pub(crate) fn stem(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OptimizedIcon {
    pub(crate) file_stem: String,
    pub(crate) markup: String,
    pub(crate) byte_size: usize,
    pub(crate) monocolor: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Classification {
    pub(crate) eager: Vec<String>,
    pub(crate) lazy: Vec<String>,
}

impl Classification {
    /// 体积超过阈值的图标懒加载
    pub(crate) fn add(&mut self, stem: &str, byte_size: usize, threshold: u64) {
        if byte_size as u64 > threshold {
            self.lazy.push(stem.to_string());
        } else {
            self.eager.push(stem.to_string());
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) processed: usize,
    pub(crate) successful: usize,
    pub(crate) original_bytes: usize,
    pub(crate) optimized_bytes: usize,
}

impl Stats {
    pub(crate) fn failed(&self) -> usize {
        self.processed - self.successful
    }

    pub(crate) fn reduction_percent(&self) -> f64 {
        let original = self.original_bytes.max(1) as f64;
        let optimized = self.optimized_bytes.max(1) as f64;
        (1.0 - optimized / original) * 100.0
    }

    pub(crate) fn summary(&self) -> String {
        format!(
            "{} 个已处理，{} 个成功，{} 个失败；体积减少 {:.2}%（{:.2}KB -> {:.2}KB）",
            self.processed,
            self.successful,
            self.failed(),
            self.reduction_percent(),
            self.original_bytes as f64 / 1024.0,
            self.optimized_bytes as f64 / 1024.0
        )
    }
}

pub(crate) struct IconWriter<'a> {
    pub(crate) dir: &'a Path,
    pub(crate) templates: &'a Templates,
}

impl IconWriter<'_> {
    pub(crate) fn write(&self, icon: &OptimizedIcon) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.tsx", icon.file_stem));
        let body = self.templates.icon(&icon.markup)?;
        fs::write(&path, body).with_context(|| format!("写入图标失败: {}", path.display()))?;
        log::debug!(
            "icon {} ({} bytes{})",
            path.display(),
            icon.byte_size,
            if icon.monocolor { ", monocolor" } else { "" }
        );
        Ok(path)
    }

    /// 写出内置的保留图标
    pub(crate) fn write_fallback(&self, name: &str) -> Result<PathBuf> {
        let body = fallback_icon(name)
            .with_context(|| format!("没有名为 {} 的内置图标", name))?;
        let path = self.dir.join(format!("{}.tsx", name));
        fs::write(&path, body).with_context(|| format!("写入图标失败: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_splits_on_threshold() {
        let mut c = Classification::default();
        c.add("small", 100, 100);
        c.add("big", 101, 100);
        c.add("zero", 0, 0);
        assert_eq!(c.eager, vec!["small", "zero"]);
        assert_eq!(c.lazy, vec!["big"]);
    }

    #[test]
    fn default_threshold_makes_everything_lazy() {
        let mut c = Classification::default();
        c.add("a", 1, 0);
        c.add("b", 5000, 0);
        assert!(c.eager.is_empty());
        assert_eq!(c.lazy.len(), 2);
    }

    #[test]
    fn stats_summary() {
        let s = Stats {
            processed: 3,
            successful: 2,
            original_bytes: 2048,
            optimized_bytes: 1024,
        };
        assert_eq!(s.failed(), 1);
        assert_eq!(
            s.summary(),
            "3 个已处理，2 个成功，1 个失败；体积减少 50.00%（2.00KB -> 1.00KB）"
        );
        assert_eq!(Stats::default().reduction_percent(), 0.0);
    }

    #[test]
    fn affixes_and_reserved_names() {
        let mono = Affix {
            prefix: String::new(),
            suffix: "_mono".into(),
        };
        assert_eq!(mono.stem("arrow"), "arrow_mono");
        assert!(is_reserved("__missing"));
        assert!(is_reserved("__loading"));
        assert!(!is_reserved("missing"));
    }

    #[test]
    fn writes_icons_and_fallbacks() {
        let tmp = tempfile::tempdir().unwrap();
        let templates = Templates::load().unwrap();
        let writer = IconWriter {
            dir: tmp.path(),
            templates: &templates,
        };
        let icon = OptimizedIcon {
            file_stem: "dot".into(),
            markup: "<svg><circle r=\"1\" /></svg>".into(),
            byte_size: 27,
            monocolor: false,
        };
        let path = writer.write(&icon).unwrap();
        assert!(fs::read_to_string(path)
            .unwrap()
            .contains("<svg {...props} ref={ref}><circle r=\"1\" /></svg>"));
        writer.write_fallback(MISSING).unwrap();
        assert!(tmp.path().join("__missing.tsx").is_file());
        assert!(writer.write_fallback("other").is_err());
    }
}
