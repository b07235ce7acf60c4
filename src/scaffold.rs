//! 组件 / 页面脚手架：
//! - 写出 `<Name>.tsx` 与样式表，目标已存在时询问是否覆盖
//! - 组件可选地追加到 index 文件

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    barrel,
    prompt::{confirm_override, Ask},
    templates::{BaseElement, ComponentView, PageView, Templates},
};

/// 样式预处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Scss,
    Css,
    Less,
    None,
}

impl Style {
    pub(crate) fn parse(s: &str) -> Result<Self, String> {
        match s {
            "scss" => Ok(Style::Scss),
            "css" => Ok(Style::Css),
            "less" => Ok(Style::Less),
            "none" => Ok(Style::None),
            _ => Err("只能是 scss、css、less 或 none".into()),
        }
    }

    fn extension(self) -> Option<&'static str> {
        match self {
            Style::Scss => Some("scss"),
            Style::Css => Some("css"),
            Style::Less => Some("less"),
            Style::None => None,
        }
    }

    /// 样式文件名（含扩展名）
    pub(crate) fn filename(self, stem: &str) -> Option<String> {
        self.extension().map(|ext| format!("{}.{}", stem, ext))
    }
}

const HTML_ELEMENTS: &[(&str, &str)] = &[
    ("a", "HTMLAnchorElement"),
    ("abbr", "HTMLElement"),
    ("address", "HTMLElement"),
    ("area", "HTMLAreaElement"),
    ("article", "HTMLElement"),
    ("aside", "HTMLElement"),
    ("audio", "HTMLAudioElement"),
    ("b", "HTMLElement"),
    ("base", "HTMLBaseElement"),
    ("bdi", "HTMLElement"),
    ("bdo", "HTMLElement"),
    ("blockquote", "HTMLQuoteElement"),
    ("body", "HTMLBodyElement"),
    ("br", "HTMLBRElement"),
    ("button", "HTMLButtonElement"),
    ("canvas", "HTMLCanvasElement"),
    ("caption", "HTMLTableCaptionElement"),
    ("cite", "HTMLElement"),
    ("code", "HTMLElement"),
    ("col", "HTMLTableColElement"),
    ("colgroup", "HTMLTableColElement"),
    ("data", "HTMLDataElement"),
    ("datalist", "HTMLDataListElement"),
    ("dd", "HTMLElement"),
    ("del", "HTMLModElement"),
    ("details", "HTMLDetailsElement"),
    ("dfn", "HTMLElement"),
    ("dialog", "HTMLDialogElement"),
    ("div", "HTMLDivElement"),
    ("dl", "HTMLDListElement"),
    ("dt", "HTMLElement"),
    ("em", "HTMLElement"),
    ("embed", "HTMLEmbedElement"),
    ("fieldset", "HTMLFieldSetElement"),
    ("figcaption", "HTMLElement"),
    ("figure", "HTMLElement"),
    ("footer", "HTMLElement"),
    ("form", "HTMLFormElement"),
    ("h1", "HTMLHeadingElement"),
    ("h2", "HTMLHeadingElement"),
    ("h3", "HTMLHeadingElement"),
    ("h4", "HTMLHeadingElement"),
    ("h5", "HTMLHeadingElement"),
    ("h6", "HTMLHeadingElement"),
    ("head", "HTMLHeadElement"),
    ("header", "HTMLElement"),
    ("hgroup", "HTMLElement"),
    ("hr", "HTMLHRElement"),
    ("html", "HTMLHtmlElement"),
    ("i", "HTMLElement"),
    ("iframe", "HTMLIFrameElement"),
    ("img", "HTMLImageElement"),
    ("input", "HTMLInputElement"),
    ("ins", "HTMLModElement"),
    ("kbd", "HTMLElement"),
    ("label", "HTMLLabelElement"),
    ("legend", "HTMLLegendElement"),
    ("li", "HTMLLIElement"),
    ("link", "HTMLLinkElement"),
    ("main", "HTMLElement"),
    ("map", "HTMLMapElement"),
    ("mark", "HTMLElement"),
    ("menu", "HTMLElement"),
    ("meta", "HTMLMetaElement"),
    ("meter", "HTMLMeterElement"),
    ("nav", "HTMLElement"),
    ("noscript", "HTMLElement"),
    ("object", "HTMLObjectElement"),
    ("ol", "HTMLOListElement"),
    ("optgroup", "HTMLOptGroupElement"),
    ("option", "HTMLOptionElement"),
    ("output", "HTMLOutputElement"),
    ("p", "HTMLParagraphElement"),
    ("picture", "HTMLElement"),
    ("pre", "HTMLPreElement"),
    ("progress", "HTMLProgressElement"),
    ("q", "HTMLQuoteElement"),
    ("rp", "HTMLElement"),
    ("rt", "HTMLElement"),
    ("ruby", "HTMLElement"),
    ("s", "HTMLElement"),
    ("samp", "HTMLElement"),
    ("script", "HTMLScriptElement"),
    ("section", "HTMLElement"),
    ("select", "HTMLSelectElement"),
    ("slot", "HTMLSlotElement"),
    ("small", "HTMLElement"),
    ("source", "HTMLSourceElement"),
    ("span", "HTMLSpanElement"),
    ("strong", "HTMLElement"),
    ("style", "HTMLStyleElement"),
    ("sub", "HTMLElement"),
    ("summary", "HTMLElement"),
    ("sup", "HTMLElement"),
    ("table", "HTMLTableElement"),
    ("tbody", "HTMLTableSectionElement"),
    ("td", "HTMLTableCellElement"),
    ("template", "HTMLTemplateElement"),
    ("textarea", "HTMLTextAreaElement"),
    ("tfoot", "HTMLTableSectionElement"),
    ("th", "HTMLTableCellElement"),
    ("thead", "HTMLTableSectionElement"),
    ("time", "HTMLTimeElement"),
    ("title", "HTMLTitleElement"),
    ("tr", "HTMLTableRowElement"),
    ("track", "HTMLTrackElement"),
    ("u", "HTMLElement"),
    ("ul", "HTMLUListElement"),
    ("var", "HTMLElement"),
    ("video", "HTMLVideoElement"),
    ("wbr", "HTMLElement"),
];

/// HTML 标签 -> 根元素（含 DOM 类型）
pub(crate) fn base_element(tag: &str) -> Option<BaseElement> {
    HTML_ELEMENTS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|&(tag, dom_type)| BaseElement { tag, dom_type })
}

/// 合并、校验后的 component 命令参数
#[derive(Debug)]
pub(crate) struct ComponentPlan {
    pub(crate) out_dir: PathBuf,
    pub(crate) name: String,
    pub(crate) css_class: String,
    pub(crate) base: Option<BaseElement>,
    pub(crate) style: Style,
    /// 已替换 `$component` 的样式文件名（不含扩展名）
    pub(crate) style_stem: String,
    pub(crate) wrap_namespace: bool,
    pub(crate) forward_ref: bool,
    pub(crate) index_path: Option<PathBuf>,
    pub(crate) header: String,
    pub(crate) custom_code: String,
}

#[derive(Debug)]
pub(crate) struct PagePlan {
    pub(crate) out_dir: PathBuf,
    pub(crate) name: String,
    pub(crate) css_class: String,
    pub(crate) style: Style,
    pub(crate) style_stem: String,
    pub(crate) header: String,
    pub(crate) custom_code: String,
}

/// 写文件；已存在且用户拒绝覆盖时跳过，返回是否写入
fn write_with_override(ask: &mut dyn Ask, path: &Path, body: &str) -> Result<bool> {
    if !confirm_override(ask, path)? {
        println!("跳过: {}", path.display());
        return Ok(false);
    }
    fs::write(path, body).with_context(|| format!("写入失败: {}", path.display()))?;
    println!("写入: {}", path.display());
    Ok(true)
}

fn write_stylesheet(
    ask: &mut dyn Ask,
    templates: &Templates,
    dir: &Path,
    style: Style,
    stem: &str,
    css_class: &str,
) -> Result<()> {
    if let Some(filename) = style.filename(stem) {
        let body = templates.stylesheet(css_class)?;
        write_with_override(ask, &dir.join(filename), &body)?;
    }
    Ok(())
}

pub(crate) fn write_component(
    plan: &ComponentPlan,
    ask: &mut dyn Ask,
    templates: &Templates,
) -> Result<()> {
    let body = templates.component(&ComponentView {
        header: &plan.header,
        name: &plan.name,
        css_class: &plan.css_class,
        style_import: plan.style.filename(&plan.style_stem),
        custom_code: &plan.custom_code,
        wrap_namespace: plan.wrap_namespace,
        forward_ref: plan.forward_ref,
        base: plan.base,
    })?;
    let path = plan.out_dir.join(format!("{}.tsx", plan.name));
    write_with_override(ask, &path, &body)?;
    write_stylesheet(
        ask,
        templates,
        &plan.out_dir,
        plan.style,
        &plan.style_stem,
        &plan.css_class,
    )?;
    if let Some(index) = &plan.index_path {
        barrel::update_index(index, &plan.out_dir, &plan.name)?;
    }
    println!("✅ 组件 {} 生成完成", plan.name);
    Ok(())
}

pub(crate) fn write_page(plan: &PagePlan, ask: &mut dyn Ask, templates: &Templates) -> Result<()> {
    let body = templates.page(&PageView {
        header: &plan.header,
        name: &plan.name,
        css_class: &plan.css_class,
        style_import: plan.style.filename(&plan.style_stem),
        custom_code: &plan.custom_code,
    })?;
    let path = plan.out_dir.join(format!("{}.tsx", plan.name));
    write_with_override(ask, &path, &body)?;
    write_stylesheet(
        ask,
        templates,
        &plan.out_dir,
        plan.style,
        &plan.style_stem,
        &plan.css_class,
    )?;
    println!("✅ 页面 {} 生成完成", plan.name);
    Ok(())
}
