//! svg 资源收集

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// 按目录顺序收集 `.svg` 文件；目录内按文件名排序，不跟随符号链接
pub(crate) fn collect_svgs(dirs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            eprintln!("⚠️ 资源目录不存在，已跳过: {}", dir.display());
            continue;
        }
        let mut walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }
        for entry in walker {
            let entry = entry.with_context(|| format!("遍历目录失败: {}", dir.display()))?;
            if entry.file_type().is_file() && is_svg(entry.path()) {
                found.push(entry.into_path());
            }
        }
    }
    log::debug!("collected {} svg files", found.len());
    Ok(found)
}

fn is_svg(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(p: &Path) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "<svg/>").unwrap();
    }

    #[test]
    fn collects_sorted_and_respects_recursion() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("assets");
        touch(&root.join("b.svg"));
        touch(&root.join("a.svg"));
        touch(&root.join("c.SVG"));
        touch(&root.join("notes.txt"));
        touch(&root.join("nested/d.svg"));

        let flat = collect_svgs(&[root.clone()], false).unwrap();
        assert_eq!(flat, vec![root.join("a.svg"), root.join("b.svg")]);

        let deep = collect_svgs(&[root.clone()], true).unwrap();
        assert_eq!(
            deep,
            vec![root.join("a.svg"), root.join("b.svg"), root.join("nested/d.svg")]
        );
    }

    #[test]
    fn missing_directories_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let other = tmp.path().join("other");
        touch(&other.join("x.svg"));
        let found = collect_svgs(&[tmp.path().join("nope"), other.clone()], true).unwrap();
        assert_eq!(found, vec![other.join("x.svg")]);
    }
}
