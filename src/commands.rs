//! 命令调度模块：
//! - 接收解析好的 CLI 参数，与配置块合并出“有效参数”
//! - 需要校验的参数交给交互式校验，随后调用脚手架 / 图标生成

use anyhow::{Context, Result};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    cli::{Cli, Command, ComponentArgs, IconArgs, PageArgs},
    config::{self, Config, RunMode},
    icons::{self, emit::Affix, size::NormalizedSize, IconOptions},
    init::init_config,
    prompt::{ensure_directory, ensure_filepath, ensure_value, ensure_value_or_empty, Ask, Hints, TerminalAsk},
    scaffold::{self, base_element, ComponentPlan, PagePlan, Style},
    templates::{FileHeader, Templates},
    utils::{env_opt_path, file_stem_before_dot, normalize_component_name, validate_name},
};

const NAME_HINTS: Hints<'static> = Hints {
    empty: "名称不能为空",
    invalid: "名称 \"$value\" 不合法：必须以字母开头，且只包含字母与数字",
    input: "请重新输入名称:",
};

const STYLE_HINTS: Hints<'static> = Hints {
    empty: "样式类型不能为空",
    invalid: "样式类型 \"$value\" 不合法",
    input: "样式类型只能是 scss、css、less 或 none，请重新输入:",
};

const INDEX_HINTS: Hints<'static> = Hints {
    empty: "",
    invalid: "无法访问 index 文件 \"$value\"",
    input: "请重新输入 index 文件路径（留空跳过）:",
};

/// 运行指定的子命令
pub(crate) fn run(cli: Cli, mode: RunMode) -> Result<()> {
    if mode == RunMode::Debug {
        log::debug!("arguments: {:#?}", cli);
    }
    let Cli {
        config: config_path,
        command,
        ..
    } = cli;
    match command {
        Command::Init { force, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            init_config(&dir, force)
        }
        Command::Remove => {
            println!("ℹ️ remove 命令尚未实现");
            Ok(())
        }
        Command::Component(args) => {
            let config = load(config_path, mode)?;
            let templates = Templates::load()?;
            component(args, &config, &mut TerminalAsk::stdin(), &templates)
        }
        Command::Page(args) => {
            let config = load(config_path, mode)?;
            let templates = Templates::load()?;
            page(args, &config, &mut TerminalAsk::stdin(), &templates)
        }
        Command::Icon(args) => {
            let config = load(config_path, mode)?;
            let templates = Templates::load()?;
            icon(args, &config, &mut TerminalAsk::stdin(), &templates)
        }
    }
}

fn load(explicit: Option<PathBuf>, mode: RunMode) -> Result<Config> {
    // 环境变量覆盖（若 CLI 未指定）
    let explicit = explicit.or_else(|| env_opt_path("REACT_GEN_CONFIG"));
    let cwd = env::current_dir().context("无法获取当前目录")?;
    let path = config::resolve_config_path(explicit.as_deref(), &cwd);
    let loaded = config::load_config(&path)?;
    if mode == RunMode::Debug {
        log::debug!("config: {:#?}", loaded);
    }
    Ok(loaded)
}

fn ensure_name(ask: &mut dyn Ask, initial: &str) -> Result<String> {
    ensure_value(ask, initial, &NAME_HINTS, |v| {
        if validate_name(v) {
            Ok(v.to_string())
        } else {
            Err(String::new())
        }
    })
}

fn ensure_style(ask: &mut dyn Ask, initial: &str) -> Result<Style> {
    ensure_value(ask, initial, &STYLE_HINTS, Style::parse)
}

fn ensure_index(ask: &mut dyn Ask, initial: &str) -> Result<Option<PathBuf>> {
    ensure_value_or_empty(ask, initial, &INDEX_HINTS, |v| {
        let p = PathBuf::from(v);
        if p.is_file() {
            Ok(p)
        } else {
            Err("文件不存在".into())
        }
    })
}

fn out_dir_hints(what: &'static str) -> Hints<'static> {
    Hints {
        empty: "输出目录不能为空（可在配置文件中设置 outDir）",
        invalid: "",
        input: what,
    }
}

pub(crate) fn component(
    args: ComponentArgs,
    config: &Config,
    ask: &mut dyn Ask,
    templates: &Templates,
) -> Result<()> {
    let defaults = &config.component;

    let name = ensure_name(ask, &args.name)?;
    let (comp_name, css_class) = normalize_component_name(&name);
    let custom_code = config::parse_custom_code(defaults.custom_code.as_ref(), &comp_name)?;

    let effective_out_dir = args
        .out_dir
        .or_else(|| defaults.out_dir.clone())
        .unwrap_or_default();
    let out_dir = ensure_directory(
        ask,
        &effective_out_dir,
        &out_dir_hints("请输入组件的输出目录:"),
    )?;

    let effective_base = args
        .base_element
        .or_else(|| defaults.base_element.clone())
        .unwrap_or_default();
    let base = ensure_value_or_empty(
        ask,
        &effective_base,
        &Hints {
            empty: "",
            invalid: "\"$value\" 不是合法的 HTML 元素",
            input: "请重新输入根元素（留空使用 div）:",
        },
        |v| base_element(v).ok_or_else(String::new),
    )?;

    let effective_style = args
        .style
        .or_else(|| defaults.style.clone())
        .unwrap_or_else(|| "css".to_string());
    let style = ensure_style(ask, &effective_style)?;
    let style_stem = args
        .style_filename
        .or_else(|| defaults.style_filename.clone())
        .unwrap_or_else(|| "$component".to_string())
        .replace("$component", &comp_name);

    let effective_index = args
        .index_path
        .or_else(|| defaults.index_path.clone())
        .unwrap_or_default();
    let index_path = ensure_index(ask, &effective_index)?;

    let author = args
        .author
        .or_else(|| config.author.clone())
        .unwrap_or_default();
    let description = args.descrip.unwrap_or_default();
    let time = args.time || defaults.time.unwrap_or(false);
    let header = templates.file_header(&FileHeader {
        name: &comp_name,
        description: &description,
        author: &author,
        time,
    })?;

    let plan = ComponentPlan {
        out_dir,
        name: comp_name,
        css_class,
        base,
        style,
        style_stem,
        wrap_namespace: args.wrap_namespace || defaults.wrap_namespace.unwrap_or(false),
        forward_ref: args.forward_ref || defaults.forward_ref.unwrap_or(false),
        index_path,
        header,
        custom_code,
    };
    log::debug!("component plan: {:?}", plan);
    scaffold::write_component(&plan, ask, templates)
}

pub(crate) fn page(
    args: PageArgs,
    config: &Config,
    ask: &mut dyn Ask,
    templates: &Templates,
) -> Result<()> {
    let defaults = &config.page;

    let name = ensure_name(ask, &args.name)?;
    let (page_name, css_class) = normalize_component_name(&name);
    let custom_code = config::parse_custom_code(defaults.custom_code.as_ref(), &page_name)?;

    let effective_out_dir = args
        .out_dir
        .or_else(|| defaults.out_dir.clone())
        .unwrap_or_default();
    let out_dir = ensure_directory(
        ask,
        &effective_out_dir,
        &out_dir_hints("请输入页面的输出目录:"),
    )?;

    let effective_style = args
        .style
        .or_else(|| defaults.style.clone())
        .unwrap_or_else(|| "css".to_string());
    let style = ensure_style(ask, &effective_style)?;
    let style_stem = args
        .style_filename
        .or_else(|| defaults.style_filename.clone())
        .unwrap_or_else(|| "$component".to_string())
        .replace("$component", &page_name);

    let author = args
        .author
        .or_else(|| config.author.clone())
        .unwrap_or_default();
    let description = args.descrip.unwrap_or_default();
    let time = args.time || defaults.time.unwrap_or(false);
    let header = templates.file_header(&FileHeader {
        name: &page_name,
        description: &description,
        author: &author,
        time,
    })?;

    let plan = PagePlan {
        out_dir,
        name: page_name,
        css_class,
        style,
        style_stem,
        header,
        custom_code,
    };
    log::debug!("page plan: {:?}", plan);
    scaffold::write_page(&plan, ask, templates)
}

pub(crate) fn icon(
    args: IconArgs,
    config: &Config,
    ask: &mut dyn Ask,
    templates: &Templates,
) -> Result<()> {
    let defaults = &config.icon;

    // 仅配置字段的格式错误要在任何文件操作之前报告
    let rules = config::parse_rename_rules(defaults.replace_filename_rules.as_ref())?;
    config::parse_custom_code(defaults.custom_code.as_ref(), "")?;

    let effective_out = args
        .out_filepath
        .or_else(|| defaults.out_filepath.clone())
        .unwrap_or_default();
    let out_filepath = ensure_filepath(
        ask,
        &effective_out,
        &Hints {
            empty: "图标组件文件路径需要在配置文件 icon.outFilepath 中指定，或作为参数传入",
            invalid: "无法从路径 \"$value\" 得到合法的组件名",
            input: "请重新输入图标组件文件路径:",
        },
        |v| {
            if validate_name(&file_stem_before_dot(v)) {
                Ok(())
            } else {
                Err(String::new())
            }
        },
    )?;
    let (comp_name, css_class) =
        normalize_component_name(&file_stem_before_dot(&out_filepath.to_string_lossy()));
    let out_dir = out_filepath
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let asset_dirs: Vec<PathBuf> = if args.asset_dirs.is_empty() {
        defaults.asset_dirs.clone().unwrap_or_default()
    } else {
        args.asset_dirs
    }
    .into_iter()
    .map(PathBuf::from)
    .collect();

    let effective_normalize = args
        .normalize
        .or_else(|| defaults.normalize.clone())
        .unwrap_or_default();
    let size = ensure_value_or_empty(
        ask,
        &effective_normalize,
        &Hints {
            empty: "",
            invalid: "\"$value\" 不是合法的尺寸，示例：6.4rem-6.4rem 或 96px-4.8rem",
            input: "请重新输入尺寸（留空不修改）:",
        },
        NormalizedSize::parse,
    )?;

    let effective_index = args
        .index_path
        .or_else(|| defaults.index_path.clone())
        .unwrap_or_default();
    let index_path = ensure_index(ask, &effective_index)?;

    let effective_threshold = args
        .threshold
        .unwrap_or_else(|| config::threshold_text(defaults.threshold.as_ref()));
    let threshold = ensure_value_or_empty(
        ask,
        &effective_threshold,
        &Hints {
            empty: "",
            invalid: "阈值 \"$value\" 不合法，必须是 0 或正整数",
            input: "请重新输入启用懒加载的体积阈值（字节，留空为 0）:",
        },
        icons::parse_threshold,
    )?
    .unwrap_or(0);

    let description = args
        .descrip
        .or_else(|| defaults.descrip.clone())
        .unwrap_or_default();
    let author = config.author.clone().unwrap_or_default();
    let time = args.time || defaults.time.unwrap_or(false);
    let header = templates.file_header(&FileHeader {
        name: &comp_name,
        description: &description,
        author: &author,
        time,
    })?;
    let custom_code = config::parse_custom_code(defaults.custom_code.as_ref(), &comp_name)?;

    let opts = IconOptions {
        out_dir,
        component_name: comp_name,
        css_class,
        asset_dirs,
        recursive: args.recursive || defaults.recursive.unwrap_or(true),
        monocolor: args.monocolor || defaults.monocolor.unwrap_or(false),
        size,
        threshold,
        wrap_namespace: args.wrap_namespace || defaults.wrap_namespace.unwrap_or(false),
        index_path,
        normal: Affix {
            prefix: args
                .prefix_normal
                .or_else(|| defaults.prefix_normal.clone())
                .unwrap_or_default(),
            suffix: args
                .suffix_normal
                .or_else(|| defaults.suffix_normal.clone())
                .unwrap_or_default(),
        },
        mono: Affix {
            prefix: args
                .prefix_single_color
                .or_else(|| defaults.prefix_single_color.clone())
                .unwrap_or_default(),
            suffix: args
                .suffix_single_color
                .or_else(|| defaults.suffix_single_color.clone())
                .unwrap_or_else(|| "_mono".to_string()),
        },
        rules,
        custom_code,
        header,
    };
    log::debug!("icon options: {:?}", opts);
    let report = icons::generate_icons(&opts, ask, templates)?;
    println!(
        "✅ 图标组件已生成: {}（直接导入 {} 个，懒加载 {} 个，失败 {} 个）",
        report.component_path.display(),
        report.classification.eager.len(),
        report.classification.lazy.len(),
        report.stats.failed()
    );
    Ok(())
}
