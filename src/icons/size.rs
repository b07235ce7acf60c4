//! 图标尺寸：`<宽>-<高>`，例如 `96px-4.8rem`、`6.4rem-6.4rem`

use std::fmt;

const UNITS: &[&str] = &[
    "em", "ex", "cap", "ch", "ic", "rem", "lh", "rlh", "vw", "vh", "vi", "vb", "vmin", "vmax",
    "cm", "mm", "Q", "in", "pc", "pt", "px", "%",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dimension {
    pub(crate) value: f64,
    pub(crate) unit: &'static str,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl Dimension {
    fn parse(raw: &str) -> Result<Self, String> {
        let split = raw
            .find(|c: char| c == '%' || c.is_ascii_alphabetic())
            .ok_or_else(|| format!("\"{}\" 缺少单位", raw))?;
        let (num, unit) = raw.split_at(split);
        let unit = UNITS
            .iter()
            .find(|u| **u == unit)
            .ok_or_else(|| format!("不支持的单位 \"{}\"", unit))?;
        if num.is_empty() {
            return Err(format!("\"{}\" 缺少数值", raw));
        }
        let value: f64 = num
            .parse()
            .map_err(|_| format!("\"{}\" 不是合法的数值", num))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("\"{}\" 不是合法的数值", num));
        }
        Ok(Self { value, unit })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedSize {
    pub(crate) width: Dimension,
    pub(crate) height: Dimension,
}

impl NormalizedSize {
    pub(crate) fn parse(raw: &str) -> Result<Self, String> {
        let parts: Vec<&str> = raw.trim().split('-').collect();
        let [w, h] = parts.as_slice() else {
            return Err("格式应为 <宽>-<高>，例如 96px-4.8rem".into());
        };
        Ok(Self {
            width: Dimension::parse(w.trim())?,
            height: Dimension::parse(h.trim())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_units() {
        let size = NormalizedSize::parse("96px-4.8rem").unwrap();
        assert_eq!(size.width, Dimension { value: 96.0, unit: "px" });
        assert_eq!(size.height, Dimension { value: 4.8, unit: "rem" });
        assert_eq!(size.width.to_string(), "96px");
        assert_eq!(size.height.to_string(), "4.8rem");
    }

    #[test]
    fn percent_and_case_sensitive_q() {
        let size = NormalizedSize::parse("100%-2Q").unwrap();
        assert_eq!(size.width.to_string(), "100%");
        assert_eq!(size.height.unit, "Q");
        assert!(NormalizedSize::parse("1q-1q").is_err());
    }

    #[test]
    fn rejects_malformed_values() {
        for bad in ["bad-value", "96px", "1px-2px-3px", "px-1px", "1foo-1px", "1.2.3px-1px", ""] {
            assert!(NormalizedSize::parse(bad).is_err(), "{bad}");
        }
    }
}
