//! svg 属性树：
//! - 用 quick-xml 读入为「元素 + 有序属性 + 文本」的树，丢弃注释、声明、处理指令
//! - 输出为紧凑且可直接嵌入 JSX 的标记

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use thiserror::Error;

/// 单个图标的处理失败，只影响该图标
#[derive(Debug, Error)]
pub(crate) enum IconError {
    #[error("svg 解析失败: {0}")]
    Parse(String),
    #[error("根元素应为 <svg>，实际为 <{0}>")]
    NotSvg(String),
    #[error("文件中没有任何元素")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 已存在则原位替换，否则追加到末尾
    pub(crate) fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// 先序遍历自身及所有后代元素
    pub(crate) fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }

    /// 递归删除不满足条件的后代元素（文本节点保留）
    pub(crate) fn retain_elements(&mut self, keep: &dyn Fn(&Element) -> bool) {
        self.children.retain(|child| match child {
            Node::Element(el) => keep(el),
            Node::Text(_) => true,
        });
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.retain_elements(keep);
            }
        }
    }

    pub(crate) fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element, IconError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| IconError::Parse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| IconError::Parse(err.to_string()))?;
        el.attrs.push((key, value.into_owned()));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), IconError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => return Err(IconError::Parse(format!("多余的根元素 <{}>", el.name))),
    }
    Ok(())
}

/// 解析 svg 文本，根元素必须是 `<svg>`
pub(crate) fn parse(text: &str) -> Result<Element, IconError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        match reader
            .read_event()
            .map_err(|e| IconError::Parse(e.to_string()))?
        {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let el = start_element(&e)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| IconError::Parse("多余的结束标签".into()))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| IconError::Parse(e.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(c) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Text(String::from_utf8_lossy(&c).into_owned()));
                }
            }
            Event::Eof => break,
            // 注释、xml 声明、doctype、处理指令
            _ => {}
        }
    }
    if let Some(open) = stack.last() {
        return Err(IconError::Parse(format!("<{}> 未闭合", open.name)));
    }
    let root = root.ok_or(IconError::Empty)?;
    if root.name != "svg" {
        return Err(IconError::NotSvg(root.name));
    }
    Ok(root)
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        escape_into(v, out, false);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(c, out),
            Node::Text(t) => escape_into(t, out, true),
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

/// 文本中的花括号在 JSX 里是表达式，需要转为实体
fn escape_into(s: &str, out: &mut String, text: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' if !text => out.push_str("&quot;"),
            '>' if text => out.push_str("&gt;"),
            '{' if text => out.push_str("&#123;"),
            '}' if text => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_serializes_compactly() {
        let src = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Generator: Sketch -->
<svg width="24" height="24" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">
    <g fill="none">
        <path d="M0 0h24v24H0z"/>
    </g>
</svg>
"#;
        let root = parse(src).unwrap();
        assert_eq!(root.attr("viewBox"), Some("0 0 24 24"));
        assert_eq!(
            root.to_markup(),
            r#"<svg width="24" height="24" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><g fill="none"><path d="M0 0h24v24H0z" /></g></svg>"#
        );
    }

    #[test]
    fn text_is_escaped_for_jsx() {
        let root = parse("<svg><text>a &lt; {b}</text></svg>").unwrap();
        assert_eq!(
            root.to_markup(),
            "<svg><text>a &lt; &#123;b&#125;</text></svg>"
        );
    }

    #[test]
    fn rejects_non_svg_and_malformed() {
        assert!(matches!(parse("<html></html>"), Err(IconError::NotSvg(n)) if n == "html"));
        assert!(matches!(parse("<svg><g></svg>"), Err(IconError::Parse(_))));
        assert!(matches!(parse("<svg>"), Err(IconError::Parse(_))));
        assert!(matches!(parse("   "), Err(IconError::Empty)));
    }

    #[test]
    fn attribute_helpers() {
        let mut el = Element::new("svg");
        el.set_attr("width", "1");
        el.set_attr("height", "2");
        el.set_attr("width", "3");
        assert_eq!(el.attrs, vec![("width".into(), "3".into()), ("height".into(), "2".into())]);
        assert_eq!(el.remove_attr("width").as_deref(), Some("3"));
        assert_eq!(el.attr("width"), None);
    }
}
