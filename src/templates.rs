//! 模板渲染模块：
//! - 内置模板目录通过 include_dir 打包进二进制
//! - 用 Tera 渲染组件、页面、样式表、图标与图标组件
//! - `fallback/` 下为 __missing / __loading 的内置图标，原样写出

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use serde::Serialize;
use tera::{Context as TContext, Tera};

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// 文件头注释参数；三项都为空时不生成文件头
pub(crate) struct FileHeader<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: &'a str,
    pub(crate) author: &'a str,
    pub(crate) time: bool,
}

/// 组件的根元素及其 DOM 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BaseElement {
    pub(crate) tag: &'static str,
    pub(crate) dom_type: &'static str,
}

pub(crate) struct ComponentView<'a> {
    pub(crate) header: &'a str,
    pub(crate) name: &'a str,
    pub(crate) css_class: &'a str,
    /// 样式文件名（含扩展名），None 表示不引入样式
    pub(crate) style_import: Option<String>,
    pub(crate) custom_code: &'a str,
    pub(crate) wrap_namespace: bool,
    pub(crate) forward_ref: bool,
    pub(crate) base: Option<BaseElement>,
}

pub(crate) struct PageView<'a> {
    pub(crate) header: &'a str,
    pub(crate) name: &'a str,
    pub(crate) css_class: &'a str,
    pub(crate) style_import: Option<String>,
    pub(crate) custom_code: &'a str,
}

/// 图标组件中的一项
#[derive(Debug, Serialize)]
pub(crate) struct IconEntry {
    pub(crate) name: String,
    pub(crate) alias: String,
    pub(crate) import_path: String,
}

pub(crate) struct IconComponentView<'a> {
    pub(crate) header: &'a str,
    pub(crate) name: &'a str,
    pub(crate) css_class: &'a str,
    pub(crate) custom_code: &'a str,
    pub(crate) wrap_namespace: bool,
    pub(crate) import_dir: &'a str,
    pub(crate) eager: &'a [String],
    pub(crate) lazy: &'a [String],
}

pub(crate) struct Templates {
    tera: Tera,
}

impl Templates {
    /// 加载内置模板（仅顶层文件，fallback/ 不参与渲染）
    pub(crate) fn load() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        let mut raw: Vec<(String, &str)> = Vec::new();
        for f in TEMPLATE_DIR.files() {
            let name = f.path().to_string_lossy().to_string();
            let body = f
                .contents_utf8()
                .with_context(|| format!("内置模板不是 UTF-8: {}", name))?;
            raw.push((name, body));
        }
        tera.add_raw_templates(raw).context("解析内置模板失败")?;
        Ok(Self { tera })
    }

    fn render(&self, name: &str, ctx: &TContext) -> Result<String> {
        self.tera
            .render(name, ctx)
            .with_context(|| format!("渲染模板 {} 失败", name))
    }

    pub(crate) fn file_header(&self, h: &FileHeader<'_>) -> Result<String> {
        if h.author.is_empty() && h.description.is_empty() && !h.time {
            return Ok(String::new());
        }
        let mut ctx = TContext::new();
        ctx.insert("name", h.name);
        ctx.insert("description", h.description);
        ctx.insert("author", h.author);
        let date = h
            .time
            .then(|| chrono::Local::now().format("%Y/%-m/%-d").to_string());
        ctx.insert("date", &date);
        self.render("header.tera", &ctx)
    }

    pub(crate) fn component(&self, v: &ComponentView<'_>) -> Result<String> {
        let mut ctx = TContext::new();
        ctx.insert("header", v.header);
        ctx.insert("name", v.name);
        ctx.insert("css_class", v.css_class);
        ctx.insert("style_import", &v.style_import);
        ctx.insert("custom_code", v.custom_code);
        ctx.insert("wrap_namespace", &v.wrap_namespace);
        ctx.insert("forward_ref", &v.forward_ref);

        let props_extends = match v.base {
            Some(b) if v.forward_ref => format!(" extends React.ComponentPropsWithRef<'{}'>", b.tag),
            Some(b) => format!(" extends React.ComponentPropsWithoutRef<'{}'>", b.tag),
            None => String::new(),
        };
        // 无根元素类型时 props 不继承内置属性，需要单独声明 className
        let class_name_prop = if v.base.is_some() { "" } else { "className?: string;" };
        let props_name = if v.wrap_namespace {
            format!("{}.Props", v.name)
        } else {
            format!("{}Props", v.name)
        };
        ctx.insert("props_extends", &props_extends);
        ctx.insert("class_name_prop", class_name_prop);
        ctx.insert("props_name", &props_name);
        ctx.insert("tag", v.base.map(|b| b.tag).unwrap_or("div"));
        ctx.insert(
            "element_type",
            v.base.map(|b| b.dom_type).unwrap_or("HTMLDivElement"),
        );
        self.render("component.tsx.tera", &ctx)
    }

    pub(crate) fn page(&self, v: &PageView<'_>) -> Result<String> {
        let mut ctx = TContext::new();
        ctx.insert("header", v.header);
        ctx.insert("name", v.name);
        ctx.insert("css_class", v.css_class);
        ctx.insert("style_import", &v.style_import);
        ctx.insert("custom_code", v.custom_code);
        self.render("page.tsx.tera", &ctx)
    }

    pub(crate) fn stylesheet(&self, css_class: &str) -> Result<String> {
        let mut ctx = TContext::new();
        ctx.insert("css_class", css_class);
        self.render("stylesheet.tera", &ctx)
    }

    /// 单个图标文件：根 svg 元素透传 props 与 ref
    pub(crate) fn icon(&self, markup: &str) -> Result<String> {
        let markup = markup.replacen("<svg", "<svg {...props} ref={ref}", 1);
        let mut ctx = TContext::new();
        ctx.insert("markup", &markup);
        self.render("icon.tsx.tera", &ctx)
    }

    pub(crate) fn icon_component(&self, v: &IconComponentView<'_>) -> Result<String> {
        let entry = |i: usize, name: &String| IconEntry {
            name: name.clone(),
            alias: format!("Icon{}", i),
            import_path: format!("{}/{}", v.import_dir, name),
        };
        let icons: Vec<IconEntry> = v.eager.iter().enumerate().map(|(i, n)| entry(i, n)).collect();
        let lazy_icons: Vec<IconEntry> = v
            .lazy
            .iter()
            .enumerate()
            .map(|(i, n)| entry(v.eager.len() + i, n))
            .collect();
        let props_name = if v.wrap_namespace {
            format!("{}.Props", v.name)
        } else {
            format!("{}Props", v.name)
        };

        let mut ctx = TContext::new();
        ctx.insert("header", v.header);
        ctx.insert("name", v.name);
        ctx.insert("css_class", v.css_class);
        ctx.insert("custom_code", v.custom_code);
        ctx.insert("wrap_namespace", &v.wrap_namespace);
        ctx.insert("import_dir", v.import_dir);
        ctx.insert("props_name", &props_name);
        ctx.insert("icons", &icons);
        ctx.insert("lazy_icons", &lazy_icons);
        self.render("icon_component.tsx.tera", &ctx)
    }
}

/// 内置的 __missing / __loading 图标源码
pub(crate) fn fallback_icon(name: &str) -> Option<&'static str> {
    TEMPLATE_DIR
        .get_file(format!("fallback/{}.tsx", name))
        .and_then(|f| f.contents_utf8())
}
