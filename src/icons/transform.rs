//! svg 优化流水线：
//! - 每一步是作用在属性树上的 `TransformStep`
//! - 两套配置：普通、单色（颜色统一为 currentColor）
//! - 最后一步把带连字符 / 命名空间的属性改写为 JSX 驼峰属性

use std::collections::HashSet;

use super::{
    size::NormalizedSize,
    svg::{self, Element, IconError},
};

pub(crate) trait TransformStep {
    fn name(&self) -> &'static str;
    fn apply(&self, root: &mut Element);
}

/// 一次优化所用的参数
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SvgProfile {
    pub(crate) current_color: bool,
    pub(crate) size: Option<NormalizedSize>,
}

pub(crate) struct Pipeline {
    steps: Vec<Box<dyn TransformStep>>,
}

impl Pipeline {
    pub(crate) fn for_profile(profile: &SvgProfile) -> Self {
        Self {
            steps: vec![
                Box::new(RemoveEditorData),
                Box::new(RemoveEmptyAttrs),
                Box::new(StyleToAttrs),
                Box::new(RemoveAttrs),
                Box::new(RemoveUnusedNamespaces),
                Box::new(ConvertColors {
                    current_color: profile.current_color,
                }),
                Box::new(ModifySize {
                    size: profile.size.clone(),
                }),
                Box::new(AttrsToJsx),
            ],
        }
    }

    pub(crate) fn run(&self, root: &mut Element) {
        for step in &self.steps {
            log::trace!("svg step: {}", step.name());
            step.apply(root);
        }
    }

    /// 解析、变换并输出紧凑标记
    pub(crate) fn optimize(&self, text: &str) -> Result<String, IconError> {
        let mut root = svg::parse(text)?;
        self.run(&mut root);
        Ok(root.to_markup())
    }
}

const EDITOR_NAMESPACES: &[&str] = &["sodipodi", "inkscape", "sketch", "serif"];

fn is_editor_name(name: &str) -> bool {
    let prefix = match name.split_once(':') {
        Some(("xmlns", ns)) => ns,
        Some((ns, _)) => ns,
        None => return false,
    };
    EDITOR_NAMESPACES.contains(&prefix)
}

struct RemoveEditorData;

impl TransformStep for RemoveEditorData {
    fn name(&self) -> &'static str {
        "remove-editor-data"
    }

    fn apply(&self, root: &mut Element) {
        root.retain_elements(&|el| {
            !matches!(el.name.as_str(), "metadata" | "title" | "desc") && !is_editor_name(&el.name)
        });
        root.walk_mut(&mut |el| el.attrs.retain(|(k, _)| !is_editor_name(k)));
    }
}

struct RemoveEmptyAttrs;

impl TransformStep for RemoveEmptyAttrs {
    fn name(&self) -> &'static str {
        "remove-empty-attrs"
    }

    fn apply(&self, root: &mut Element) {
        // 条件处理属性为空时有语义（元素不渲染），保留
        root.walk_mut(&mut |el| {
            el.attrs.retain(|(k, v)| {
                !v.trim().is_empty()
                    || matches!(k.as_str(), "requiredExtensions" | "requiredFeatures" | "systemLanguage")
            })
        });
    }
}

const PRESENTATION_ATTRS: &[&str] = &[
    "alignment-baseline", "baseline-shift", "clip", "clip-path", "clip-rule", "color",
    "color-interpolation", "color-interpolation-filters", "color-profile", "color-rendering",
    "cursor", "direction", "display", "dominant-baseline", "enable-background", "fill",
    "fill-opacity", "fill-rule", "filter", "flood-color", "flood-opacity", "font", "font-family",
    "font-size", "font-size-adjust", "font-stretch", "font-style", "font-variant", "font-weight",
    "glyph-orientation-horizontal", "glyph-orientation-vertical", "image-rendering",
    "letter-spacing", "lighting-color", "marker", "marker-end", "marker-mid", "marker-start",
    "mask", "opacity", "overflow", "paint-order", "pointer-events", "shape-rendering",
    "stop-color", "stop-opacity", "stroke", "stroke-dasharray", "stroke-dashoffset",
    "stroke-linecap", "stroke-linejoin", "stroke-miterlimit", "stroke-opacity", "stroke-width",
    "text-anchor", "text-decoration", "text-overflow", "text-rendering", "transform",
    "transform-origin", "unicode-bidi", "vector-effect", "visibility", "white-space",
    "word-spacing", "writing-mode",
];

struct StyleToAttrs;

impl TransformStep for StyleToAttrs {
    fn name(&self) -> &'static str {
        "style-to-attrs"
    }

    fn apply(&self, root: &mut Element) {
        root.walk_mut(&mut |el| {
            let Some(style) = el.remove_attr("style") else {
                return;
            };
            let mut rest = Vec::new();
            for decl in style.split(';') {
                let Some((prop, value)) = decl.split_once(':') else {
                    continue;
                };
                let prop = prop.trim().to_ascii_lowercase();
                let value = value.trim();
                if PRESENTATION_ATTRS.contains(&prop.as_str()) && !value.contains("!important") {
                    el.set_attr(&prop, value);
                } else {
                    rest.push(format!("{}:{}", prop, value));
                }
            }
            if !rest.is_empty() {
                el.set_attr("style", rest.join(";"));
            }
        });
    }
}

struct RemoveAttrs;

impl TransformStep for RemoveAttrs {
    fn name(&self) -> &'static str {
        "remove-attrs"
    }

    fn apply(&self, root: &mut Element) {
        root.walk_mut(&mut |el| {
            el.attrs
                .retain(|(k, _)| !(k.starts_with("data-") || k == "style"))
        });
    }
}

/// 删除没有任何元素或属性引用的 `xmlns:*` 声明
struct RemoveUnusedNamespaces;

fn ns_prefix(name: &str) -> Option<&str> {
    name.split_once(':').map(|(ns, _)| ns)
}

impl TransformStep for RemoveUnusedNamespaces {
    fn name(&self) -> &'static str {
        "remove-unused-namespaces"
    }

    fn apply(&self, root: &mut Element) {
        let mut used = HashSet::new();
        root.walk_mut(&mut |el| {
            if let Some(ns) = ns_prefix(&el.name) {
                used.insert(ns.to_string());
            }
            for (k, _) in &el.attrs {
                match ns_prefix(k) {
                    Some("xmlns") | None => {}
                    Some(ns) => {
                        used.insert(ns.to_string());
                    }
                }
            }
        });
        root.walk_mut(&mut |el| {
            el.attrs.retain(|(k, _)| match k.strip_prefix("xmlns:") {
                Some(ns) => used.contains(ns),
                None => true,
            })
        });
    }
}

const COLOR_ATTRS: &[&str] = &[
    "fill", "stroke", "stop-color", "flood-color", "lighting-color", "color",
];

struct ConvertColors {
    current_color: bool,
}

impl TransformStep for ConvertColors {
    fn name(&self) -> &'static str {
        "convert-colors"
    }

    fn apply(&self, root: &mut Element) {
        let current_color = self.current_color;
        root.walk_mut(&mut |el| {
            for (k, v) in el.attrs.iter_mut() {
                if !COLOR_ATTRS.contains(&k.as_str()) {
                    continue;
                }
                let converted = if current_color {
                    to_current_color(v)
                } else {
                    shorten_color(v)
                };
                if let Some(c) = converted {
                    *v = c;
                }
            }
        });
    }
}

fn to_current_color(value: &str) -> Option<String> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("none") || v.starts_with("url(") {
        return None;
    }
    Some("currentColor".to_string())
}

fn shorten_color(value: &str) -> Option<String> {
    let v = value.trim();
    let hex = match rgb_to_hex(v) {
        Some(h) => h,
        None if v.starts_with('#') => v.to_ascii_lowercase(),
        None => return None,
    };
    let b = hex.as_bytes();
    if b.len() == 7 && b[1] == b[2] && b[3] == b[4] && b[5] == b[6] {
        return Some(format!("#{}{}{}", b[1] as char, b[3] as char, b[5] as char));
    }
    Some(hex)
}

/// `rgb(255, 0, 0)` / `rgb(100%, 0%, 0%)` -> `#ff0000`
fn rgb_to_hex(value: &str) -> Option<String> {
    let inner = value.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = [0u8; 3];
    let mut parts = inner.split(',');
    for slot in channels.iter_mut() {
        let part = parts.next()?.trim();
        let n: f64 = match part.strip_suffix('%') {
            Some(p) => p.trim().parse::<f64>().ok()? * 2.55,
            None => part.parse().ok()?,
        };
        *slot = n.round().clamp(0.0, 255.0) as u8;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channels[0], channels[1], channels[2]
    ))
}

struct ModifySize {
    size: Option<NormalizedSize>,
}

impl TransformStep for ModifySize {
    fn name(&self) -> &'static str {
        "modify-size"
    }

    fn apply(&self, root: &mut Element) {
        if let Some(size) = &self.size {
            root.set_attr("width", size.width.to_string());
            root.set_attr("height", size.height.to_string());
        }
    }
}

struct AttrsToJsx;

impl TransformStep for AttrsToJsx {
    fn name(&self) -> &'static str {
        "attrs-to-jsx"
    }

    fn apply(&self, root: &mut Element) {
        root.walk_mut(&mut |el| {
            for (k, _) in el.attrs.iter_mut() {
                if let Some(prop) = jsx_prop(k) {
                    *k = prop.to_string();
                }
            }
        });
    }
}

fn jsx_prop(attr: &str) -> Option<&'static str> {
    if attr == "class" {
        return Some("className");
    }
    ATTRS_TO_PROPS
        .binary_search_by(|(a, _)| a.cmp(&attr))
        .ok()
        .map(|i| ATTRS_TO_PROPS[i].1)
}

// 按属性名排序，供二分查找
const ATTRS_TO_PROPS: &[(&str, &str)] = &[
    ("accent-height", "accentHeight"),
    ("alignment-baseline", "alignmentBaseline"),
    ("allow-reorder", "allowReorder"),
    ("arabic-form", "arabicForm"),
    ("attribute-name", "attributeName"),
    ("attribute-type", "attributeType"),
    ("auto-reverse", "autoReverse"),
    ("base-frequency", "baseFrequency"),
    ("base-profile", "baseProfile"),
    ("baseline-shift", "baselineShift"),
    ("calc-mode", "calcMode"),
    ("cap-height", "capHeight"),
    ("clip-path", "clipPath"),
    ("clip-path-units", "clipPathUnits"),
    ("clip-rule", "clipRule"),
    ("color-interpolation", "colorInterpolation"),
    ("color-interpolation-filters", "colorInterpolationFilters"),
    ("color-profile", "colorProfile"),
    ("color-rendering", "colorRendering"),
    ("content-script-type", "contentScriptType"),
    ("content-style-type", "contentStyleType"),
    ("cross-origin", "crossOrigin"),
    ("diffuse-constant", "diffuseConstant"),
    ("dominant-baseline", "dominantBaseline"),
    ("edge-mode", "edgeMode"),
    ("enable-background", "enableBackground"),
    ("external-resources-required", "externalResourcesRequired"),
    ("fill-opacity", "fillOpacity"),
    ("fill-rule", "fillRule"),
    ("filter-res", "filterRes"),
    ("filter-units", "filterUnits"),
    ("flood-color", "floodColor"),
    ("flood-opacity", "floodOpacity"),
    ("font-family", "fontFamily"),
    ("font-size", "fontSize"),
    ("font-size-adjust", "fontSizeAdjust"),
    ("font-stretch", "fontStretch"),
    ("font-style", "fontStyle"),
    ("font-variant", "fontVariant"),
    ("font-weight", "fontWeight"),
    ("glyph-name", "glyphName"),
    ("glyph-orientation-horizontal", "glyphOrientationHorizontal"),
    ("glyph-orientation-vertical", "glyphOrientationVertical"),
    ("glyph-ref", "glyphRef"),
    ("gradient-transform", "gradientTransform"),
    ("gradient-units", "gradientUnits"),
    ("horiz-adv-x", "horizAdvX"),
    ("horiz-origin-x", "horizOriginX"),
    ("image-rendering", "imageRendering"),
    ("kernel-matrix", "kernelMatrix"),
    ("kernel-unit-length", "kernelUnitLength"),
    ("key-points", "keyPoints"),
    ("key-splines", "keySplines"),
    ("key-times", "keyTimes"),
    ("length-adjust", "lengthAdjust"),
    ("letter-spacing", "letterSpacing"),
    ("lighting-color", "lightingColor"),
    ("limiting-cone-angle", "limitingConeAngle"),
    ("marker-end", "markerEnd"),
    ("marker-height", "markerHeight"),
    ("marker-mid", "markerMid"),
    ("marker-start", "markerStart"),
    ("marker-units", "markerUnits"),
    ("marker-width", "markerWidth"),
    ("mask-content-units", "maskContentUnits"),
    ("mask-units", "maskUnits"),
    ("num-octaves", "numOctaves"),
    ("overline-position", "overlinePosition"),
    ("overline-thickness", "overlineThickness"),
    ("paint-order", "paintOrder"),
    ("path-length", "pathLength"),
    ("pattern-content-units", "patternContentUnits"),
    ("pattern-transform", "patternTransform"),
    ("pattern-units", "patternUnits"),
    ("pointer-events", "pointerEvents"),
    ("points-at-x", "pointsAtX"),
    ("points-at-y", "pointsAtY"),
    ("points-at-z", "pointsAtZ"),
    ("preserve-alpha", "preserveAlpha"),
    ("preserve-aspect-ratio", "preserveAspectRatio"),
    ("primitive-units", "primitiveUnits"),
    ("ref-x", "refX"),
    ("ref-y", "refY"),
    ("rendering-intent", "renderingIntent"),
    ("repeat-count", "repeatCount"),
    ("repeat-dur", "repeatDur"),
    ("required-extensions", "requiredExtensions"),
    ("required-features", "requiredFeatures"),
    ("shape-rendering", "shapeRendering"),
    ("specular-constant", "specularConstant"),
    ("specular-exponent", "specularExponent"),
    ("spread-method", "spreadMethod"),
    ("start-offset", "startOffset"),
    ("std-deviation", "stdDeviation"),
    ("stitch-tiles", "stitchTiles"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("strikethrough-position", "strikethroughPosition"),
    ("strikethrough-thickness", "strikethroughThickness"),
    ("stroke-dasharray", "strokeDasharray"),
    ("stroke-dashoffset", "strokeDashoffset"),
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-miterlimit", "strokeMiterlimit"),
    ("stroke-opacity", "strokeOpacity"),
    ("stroke-width", "strokeWidth"),
    ("surface-scale", "surfaceScale"),
    ("system-language", "systemLanguage"),
    ("tab-index", "tabIndex"),
    ("table-values", "tableValues"),
    ("target-x", "targetX"),
    ("target-y", "targetY"),
    ("text-anchor", "textAnchor"),
    ("text-decoration", "textDecoration"),
    ("text-length", "textLength"),
    ("text-rendering", "textRendering"),
    ("underline-position", "underlinePosition"),
    ("underline-thickness", "underlineThickness"),
    ("unicode-bidi", "unicodeBidi"),
    ("unicode-range", "unicodeRange"),
    ("units-per-em", "unitsPerEm"),
    ("v-alphabetic", "vAlphabetic"),
    ("v-hanging", "vHanging"),
    ("v-ideographic", "vIdeographic"),
    ("v-mathematical", "vMathematical"),
    ("vector-effect", "vectorEffect"),
    ("vert-adv-y", "vertAdvY"),
    ("vert-origin-x", "vertOriginX"),
    ("vert-origin-y", "vertOriginY"),
    ("view-box", "viewBox"),
    ("view-target", "viewTarget"),
    ("word-spacing", "wordSpacing"),
    ("writing-mode", "writingMode"),
    ("x-channel-selector", "xChannelSelector"),
    ("x-height", "xHeight"),
    ("xlink:actuate", "xlinkActuate"),
    ("xlink:arcrole", "xlinkArcrole"),
    ("xlink:href", "xlinkHref"),
    ("xlink:role", "xlinkRole"),
    ("xlink:show", "xlinkShow"),
    ("xlink:title", "xlinkTitle"),
    ("xlink:type", "xlinkType"),
    ("xml:base", "xmlBase"),
    ("xml:lang", "xmlLang"),
    ("xml:space", "xmlSpace"),
    ("xmlns:xlink", "xmlnsXlink"),
    ("y-channel-selector", "yChannelSelector"),
    ("zoom-and-pan", "zoomAndPan"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> Pipeline {
        Pipeline::for_profile(&SvgProfile {
            current_color: false,
            size: None,
        })
    }

    #[test]
    fn prop_table_is_sorted() {
        assert!(ATTRS_TO_PROPS.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(jsx_prop("stroke-width"), Some("strokeWidth"));
        assert_eq!(jsx_prop("xlink:href"), Some("xlinkHref"));
        assert_eq!(jsx_prop("zoom-and-pan"), Some("zoomAndPan"));
        assert_eq!(jsx_prop("d"), None);
    }

    #[test]
    fn removes_editor_data_and_converts_attrs() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sketch="http://www.bohemiancoding.com/sketch/ns" class="x" sketch:type="MSPage">
            <title>Icon</title><desc>Created with Sketch.</desc>
            <path d="M0 0" stroke-width="2" fill-rule="evenodd" data-name="p" id=""/>
        </svg>"#;
        let out = normal().optimize(src).unwrap();
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" className="x"><path d="M0 0" strokeWidth="2" fillRule="evenodd" /></svg>"#
        );
    }

    #[test]
    fn drops_namespaces_nobody_uses() {
        let src = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:cc="http://creativecommons.org/ns#" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:xlink="http://www.w3.org/1999/xlink">
            <metadata><rdf:RDF><cc:Work><dc:format>image/svg+xml</dc:format></cc:Work></rdf:RDF></metadata>
            <use xlink:href="#a"/>
        </svg>"##;
        let mut root = svg::parse(src).unwrap();
        normal().run(&mut root);
        assert_eq!(root.attr("xmlnsXlink"), Some("http://www.w3.org/1999/xlink"));
        assert_eq!(
            root.attrs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["xmlns", "xmlnsXlink"]
        );
        assert_eq!(
            root.to_markup(),
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlnsXlink="http://www.w3.org/1999/xlink"><use xlinkHref="#a" /></svg>"##
        );
    }

    #[test]
    fn style_moves_into_attributes() {
        let src = r#"<svg><path style="fill: #FF0000; stroke-width:2; animation: spin 1s" /></svg>"#;
        let out = normal().optimize(src).unwrap();
        assert_eq!(out, r##"<svg><path fill="#f00" strokeWidth="2" /></svg>"##);
    }

    #[test]
    fn normal_profile_shortens_colors() {
        assert_eq!(shorten_color("rgb(255, 0, 0)").as_deref(), Some("#f00"));
        assert_eq!(shorten_color("#AABBCD").as_deref(), Some("#aabbcd"));
        assert_eq!(shorten_color("rgb(100%,0%,0%)").as_deref(), Some("#f00"));
        assert_eq!(shorten_color("red"), None);
        assert_eq!(shorten_color("url(#a)"), None);
    }

    #[test]
    fn monocolor_profile_uses_current_color() {
        let pipeline = Pipeline::for_profile(&SvgProfile {
            current_color: true,
            size: None,
        });
        let src = r##"<svg fill="none"><path fill="#123456" stroke="red"/><rect fill="url(#g)"/><stop stop-color="#fff"/></svg>"##;
        let out = pipeline.optimize(src).unwrap();
        assert_eq!(
            out,
            r##"<svg fill="none"><path fill="currentColor" stroke="currentColor" /><rect fill="url(#g)" /><stop stopColor="currentColor" /></svg>"##
        );
    }

    #[test]
    fn size_is_applied_to_root_only() {
        let pipeline = Pipeline::for_profile(&SvgProfile {
            current_color: false,
            size: Some(NormalizedSize::parse("96px-4.8rem").unwrap()),
        });
        let out = pipeline
            .optimize(r#"<svg width="24"><svg width="1" /></svg>"#)
            .unwrap();
        assert_eq!(out, r#"<svg width="96px" height="4.8rem"><svg width="1" /></svg>"#);
    }
}
