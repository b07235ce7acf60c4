//! 图标生成模块：
//! - 收集 svg 资源，按规则命名并去重
//! - 经优化流水线输出普通 / 单色两套图标到 `__icons`
//! - 按体积阈值划分懒加载与直接导入，生成图标组件并更新 index

pub(crate) mod collect;
pub(crate) mod emit;
pub(crate) mod naming;
pub(crate) mod size;
pub(crate) mod svg;
pub(crate) mod transform;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    barrel,
    config::RenameRule,
    error::GenError,
    prompt::Ask,
    templates::{IconComponentView, Templates},
};
use emit::{Affix, Classification, IconWriter, OptimizedIcon, Stats, LOADING, MISSING};
use size::NormalizedSize;
use transform::{Pipeline, SvgProfile};

pub(crate) const ICONS_DIRNAME: &str = "__icons";

/// 合并、校验后的 icon 命令参数
#[derive(Debug)]
pub(crate) struct IconOptions {
    pub(crate) out_dir: PathBuf,
    pub(crate) component_name: String,
    pub(crate) css_class: String,
    pub(crate) asset_dirs: Vec<PathBuf>,
    pub(crate) recursive: bool,
    pub(crate) monocolor: bool,
    pub(crate) size: Option<NormalizedSize>,
    pub(crate) threshold: u64,
    pub(crate) wrap_namespace: bool,
    pub(crate) index_path: Option<PathBuf>,
    pub(crate) normal: Affix,
    pub(crate) mono: Affix,
    pub(crate) rules: Vec<RenameRule>,
    pub(crate) custom_code: String,
    /// 已渲染的文件头
    pub(crate) header: String,
}

#[derive(Debug)]
pub(crate) struct IconReport {
    pub(crate) stats: Stats,
    pub(crate) classification: Classification,
    pub(crate) component_path: PathBuf,
}

/// 懒加载阈值：0 或正整数（字节），允许 `1024.0` 这样的写法
pub(crate) fn parse_threshold(v: &str) -> Result<u64, String> {
    let n: f64 = v.trim().parse().map_err(|_| "不是数字".to_string())?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err("必须是 0 或正整数".into());
    }
    Ok(n as u64)
}

struct Batch<'a> {
    writer: IconWriter<'a>,
    threshold: u64,
    stats: Stats,
    classification: Classification,
}

impl Batch<'_> {
    fn emit(
        &mut self,
        pipeline: &Pipeline,
        source: &Path,
        text: &str,
        file_stem: String,
        monocolor: bool,
        reserved: bool,
    ) -> Result<()> {
        self.stats.processed += 1;
        let markup = match pipeline.optimize(text) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("❌ 处理 svg 失败: {}（{}）", source.display(), e);
                return Ok(());
            }
        };
        let icon = OptimizedIcon {
            byte_size: markup.len(),
            file_stem,
            markup,
            monocolor,
        };
        self.writer.write(&icon)?;
        self.stats.successful += 1;
        self.stats.original_bytes += text.len();
        self.stats.optimized_bytes += icon.byte_size;
        if !reserved {
            self.classification
                .add(&icon.file_stem, icon.byte_size, self.threshold);
        }
        Ok(())
    }
}

/// 执行一次完整的图标生成
pub(crate) fn generate_icons(
    opts: &IconOptions,
    ask: &mut dyn Ask,
    templates: &Templates,
) -> Result<IconReport> {
    println!("ℹ️ 正在收集 svg 文件 ...");
    let paths = collect::collect_svgs(&opts.asset_dirs, opts.recursive)?;
    println!("ℹ️ 找到 {} 个 svg 文件", paths.len());

    let resolution = naming::resolve(&paths, &opts.rules);
    let plan = naming::plan_outputs(
        &resolution.sources,
        &opts.normal,
        opts.monocolor.then_some(&opts.mono),
    );
    let problems = resolution.problems() + plan.collisions;
    if problems > 0 {
        let message = format!(
            "{}/{} 个 svg 文件存在问题，忽略这些文件并继续？",
            problems,
            paths.len()
        );
        if !ask.confirm(&message)? {
            return Err(GenError::Aborted.into());
        }
    }

    let icons_dir = opts.out_dir.join(ICONS_DIRNAME);
    if icons_dir.exists() {
        fs::remove_dir_all(&icons_dir)
            .with_context(|| format!("删除旧目录失败: {}", icons_dir.display()))?;
    }
    fs::create_dir_all(&icons_dir)
        .with_context(|| format!("创建目录失败: {}", icons_dir.display()))?;

    let normal = Pipeline::for_profile(&SvgProfile {
        current_color: false,
        size: opts.size.clone(),
    });
    let mono = Pipeline::for_profile(&SvgProfile {
        current_color: true,
        size: opts.size.clone(),
    });
    let mut batch = Batch {
        writer: IconWriter {
            dir: &icons_dir,
            templates,
        },
        threshold: opts.threshold,
        stats: Stats::default(),
        classification: Classification::default(),
    };

    println!(
        "ℹ️ 正在处理 svg 文件（单色导出{}）...",
        if opts.monocolor { "已启用" } else { "未启用" }
    );
    for icon in &plan.icons {
        // 非 UTF-8 的字节按替换字符解码，交给解析器判断
        let text = match fs::read(&icon.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                eprintln!("❌ 读取 svg 失败: {}（{}）", icon.path.display(), e);
                batch.stats.processed += icon.outputs();
                continue;
            }
        };
        if let Some(stem) = &icon.normal {
            batch.emit(&normal, &icon.path, &text, stem.clone(), false, icon.reserved)?;
        }
        if let Some(stem) = &icon.mono {
            batch.emit(&mono, &icon.path, &text, stem.clone(), true, false)?;
        }
    }
    for name in [MISSING, LOADING] {
        if !icons_dir.join(format!("{}.tsx", name)).exists() {
            batch.writer.write_fallback(name)?;
        }
    }
    println!("ℹ️ {}", batch.stats.summary());

    let component_path = opts.out_dir.join(format!("{}.tsx", opts.component_name));
    let body = templates.icon_component(&IconComponentView {
        header: &opts.header,
        name: &opts.component_name,
        css_class: &opts.css_class,
        custom_code: &opts.custom_code,
        wrap_namespace: opts.wrap_namespace,
        import_dir: "./__icons",
        eager: &batch.classification.eager,
        lazy: &batch.classification.lazy,
    })?;
    fs::write(&component_path, body)
        .with_context(|| format!("写入图标组件失败: {}", component_path.display()))?;
    println!("写入: {}", component_path.display());

    if let Some(index) = &opts.index_path {
        barrel::update_index(index, &opts.out_dir, &opts.component_name)?;
    }

    Ok(IconReport {
        stats: batch.stats,
        classification: batch.classification,
        component_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedAsk;
    use regex::Regex;

    const BIG: &str = r##"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm0 18c-4.41 0-8-3.59-8-8s3.59-8 8-8 8 3.59 8 8-3.59 8-8 8z" fill="#FF0000"/></svg>"##;
    const SMALL: &str = r#"<svg viewBox="0 0 1 1"><path d="M0 0h1"/></svg>"#;

    fn options(root: &Path) -> IconOptions {
        IconOptions {
            out_dir: root.join("src"),
            component_name: "Icon".into(),
            css_class: "icon".into(),
            asset_dirs: vec![root.join("assets")],
            recursive: true,
            monocolor: false,
            size: None,
            threshold: 100,
            wrap_namespace: false,
            index_path: None,
            normal: Affix::default(),
            mono: Affix {
                prefix: String::new(),
                suffix: "_mono".into(),
            },
            rules: Vec::new(),
            custom_code: String::new(),
            header: String::new(),
        }
    }

    fn setup(files: &[(&str, &str)]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let p = tmp.path().join("assets").join(name);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, body).unwrap();
        }
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        tmp
    }

    #[test]
    fn threshold_parsing() {
        assert_eq!(parse_threshold("0"), Ok(0));
        assert_eq!(parse_threshold("2048"), Ok(2048));
        assert_eq!(parse_threshold("1024.0"), Ok(1024));
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("big").is_err());
    }

    #[test]
    fn classifies_and_writes_reserved_fallbacks() {
        let tmp = setup(&[("big.svg", BIG), ("small.svg", SMALL), ("broken.svg", "<svg><g></svg>")]);
        let templates = Templates::load().unwrap();
        let mut ask = ScriptedAsk::default();
        let report = generate_icons(&options(tmp.path()), &mut ask, &templates).unwrap();

        assert_eq!(report.classification.eager, vec!["small"]);
        assert_eq!(report.classification.lazy, vec!["big"]);
        assert_eq!(report.stats.processed, 3);
        assert_eq!(report.stats.successful, 2);

        let icons = tmp.path().join("src/__icons");
        assert!(icons.join("big.tsx").is_file());
        assert!(icons.join("small.tsx").is_file());
        assert!(!icons.join("broken.tsx").exists());
        assert!(icons.join("__missing.tsx").is_file());
        assert!(icons.join("__loading.tsx").is_file());

        let component = fs::read_to_string(&report.component_path).unwrap();
        assert!(component.contains("import Icon0 from \"./__icons/small\";"));
        assert!(component.contains("\"big\": React.lazy(() => import(\"./__icons/big\")),"));
        assert!(!component.contains("__missing\","));
        assert!(ask.asked.is_empty());
    }

    #[test]
    fn reserved_inputs_are_kept_unprefixed_and_unclassified() {
        let tmp = setup(&[("__missing.svg", SMALL), ("dot.svg", SMALL)]);
        let templates = Templates::load().unwrap();
        let mut opts = options(tmp.path());
        opts.monocolor = true;
        opts.normal = Affix {
            prefix: "Ic".into(),
            suffix: String::new(),
        };
        let report = generate_icons(&opts, &mut ScriptedAsk::default(), &templates).unwrap();

        let icons = tmp.path().join("src/__icons");
        let missing = fs::read_to_string(icons.join("__missing.tsx")).unwrap();
        assert!(missing.contains("viewBox=\"0 0 1 1\""));
        assert!(!icons.join("__missing_mono.tsx").exists());
        assert!(icons.join("Icdot.tsx").is_file());
        assert!(icons.join("dot_mono.tsx").is_file());
        assert_eq!(report.classification.eager, vec!["Icdot", "dot_mono"]);
        assert!(report.classification.lazy.is_empty());
    }

    #[test]
    fn duplicates_prompt_once_and_decline_aborts_before_output() {
        let tmp = setup(&[("IconOne.svg", SMALL), ("icon-one.svg", SMALL)]);
        let templates = Templates::load().unwrap();
        let mut opts = options(tmp.path());
        opts.rules = vec![
            RenameRule {
                from: Regex::new("^i").unwrap(),
                to: "I".into(),
            },
            RenameRule {
                from: Regex::new("-o").unwrap(),
                to: "O".into(),
            },
        ];

        let mut ask = ScriptedAsk::new(["n"]);
        let err = generate_icons(&opts, &mut ask, &templates).unwrap_err();
        assert!(matches!(err.downcast_ref::<GenError>(), Some(GenError::Aborted)));
        assert_eq!(ask.asked.len(), 1);
        assert!(!tmp.path().join("src/__icons").exists());

        let mut ask = ScriptedAsk::new(["y"]);
        let report = generate_icons(&opts, &mut ask, &templates).unwrap();
        assert_eq!(report.classification.eager, vec!["IconOne"]);
        let written: Vec<_> = fs::read_dir(tmp.path().join("src/__icons"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| !n.starts_with("__"))
            .collect();
        assert_eq!(written, vec!["IconOne.tsx"]);
    }

    #[test]
    fn recreates_icons_dir_and_updates_index() {
        let tmp = setup(&[("dot.svg", SMALL)]);
        let templates = Templates::load().unwrap();
        let stale = tmp.path().join("src/__icons/stale.tsx");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        let index = tmp.path().join("src/index.ts");
        fs::write(&index, "").unwrap();

        let mut opts = options(tmp.path());
        opts.index_path = Some(index.clone());
        generate_icons(&opts, &mut ScriptedAsk::default(), &templates).unwrap();
        generate_icons(&opts, &mut ScriptedAsk::default(), &templates).unwrap();

        assert!(!stale.exists());
        assert_eq!(
            fs::read_to_string(&index).unwrap(),
            "\nexport * from './Icon';"
        );
    }

    #[test]
    fn latin1_svg_is_decoded_and_the_batch_continues() {
        let tmp = setup(&[("a.svg", SMALL), ("c.svg", SMALL)]);
        fs::write(
            tmp.path().join("assets/b.svg"),
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><svg viewBox=\"0 0 1 1\"><title>caf\xe9</title><path d=\"M0 0h1\"/></svg>",
        )
        .unwrap();
        let stale = tmp.path().join("src/__icons/old.tsx");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        let templates = Templates::load().unwrap();

        let report = generate_icons(&options(tmp.path()), &mut ScriptedAsk::default(), &templates).unwrap();

        assert_eq!(report.stats.processed, 3);
        assert_eq!(report.stats.failed(), 0);
        assert_eq!(report.classification.eager, vec!["a", "b", "c"]);
        let icons = tmp.path().join("src/__icons");
        for name in ["a", "b", "c", "__missing", "__loading"] {
            assert!(icons.join(format!("{}.tsx", name)).is_file(), "{} missing", name);
        }
        assert!(!stale.exists());
        assert!(report.component_path.is_file());
    }

    #[test]
    fn mono_suffix_collisions_are_reported_and_skipped() {
        let tmp = setup(&[("a.svg", SMALL), ("a_mono.svg", SMALL)]);
        let templates = Templates::load().unwrap();
        let mut opts = options(tmp.path());
        opts.monocolor = true;

        let mut ask = ScriptedAsk::new(["n"]);
        let err = generate_icons(&opts, &mut ask, &templates).unwrap_err();
        assert!(matches!(err.downcast_ref::<GenError>(), Some(GenError::Aborted)));
        assert!(!tmp.path().join("src/__icons").exists());

        let mut ask = ScriptedAsk::new(["y"]);
        let report = generate_icons(&opts, &mut ask, &templates).unwrap();
        assert_eq!(ask.asked.len(), 1);
        assert_eq!(report.classification.eager, vec!["a", "a_mono", "a_mono_mono"]);
        assert!(report.classification.lazy.is_empty());

        let component = fs::read_to_string(&report.component_path).unwrap();
        assert_eq!(component.matches("\"./__icons/a_mono\"").count(), 1);
    }
}
