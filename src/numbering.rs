use crate::dom;
use markup5ever_rcdom::Handle;

const DEFAULT_SCHEME: &str = "decimal;decimal;decimal;decimal;decimal";

/// Per-level number formats for ordered lists.
///
/// Levels are 1-based; slot 0 of `scheme` is a sentinel and never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingScheme {
    scheme: Vec<String>,
    levels: usize,
    default: String,
    prefix: String,
    suffix: String,
}

impl NumberingScheme {
    pub fn new(formats: Vec<String>, prefix: &str, suffix: &str) -> Self {
        let levels = formats.len();
        let mut scheme = Vec::with_capacity(levels + 1);
        scheme.push(String::new());
        scheme.extend(formats);
        let default = scheme.get(1).cloned().unwrap_or_else(|| "decimal".to_string());
        Self {
            scheme,
            levels,
            default,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Configuration from the first `<ol>` under `body`, or the default.
    pub fn resolve(body: &Handle) -> Self {
        let Some(ol) = dom::find_first(body, "ol") else {
            return Self::default();
        };
        let formats = attr_formats(&ol).unwrap_or_else(default_formats);
        let prefix = dom::attr_get(&ol, "prefix").unwrap_or_default();
        let suffix = dom::attr_get(&ol, "suffix").unwrap_or_default();
        log::debug!("numbering scheme from first <ol>: {formats:?} prefix={prefix:?} suffix={suffix:?}");
        Self::new(formats, &prefix, &suffix)
    }

    /// Format code for `level`; anything outside `1..=levels` gets the
    /// level-1 default.
    pub fn get(&self, level: usize) -> &str {
        if (1..=self.levels).contains(&level) {
            &self.scheme[level]
        } else {
            &self.default
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// `w:numFmt` value for `level`.
    pub fn num_fmt(&self, level: usize) -> &'static str {
        word_num_fmt(self.get(level))
    }

    /// `w:lvlText` value for `level`. `%` marks a level placeholder in Word,
    /// so it is stripped from the prefix and suffix.
    pub fn lvl_text(&self, level: usize) -> String {
        let prefix = self.prefix.replace('%', "");
        let suffix = self.suffix.replace('%', "");
        if prefix.is_empty() && suffix.is_empty() {
            format!("%{level}.")
        } else {
            format!("{prefix}%{level}{suffix}")
        }
    }
}

impl Default for NumberingScheme {
    fn default() -> Self {
        Self::new(default_formats(), "", "")
    }
}

fn default_formats() -> Vec<String> {
    DEFAULT_SCHEME.split(';').map(str::to_string).collect()
}

fn attr_formats(ol: &Handle) -> Option<Vec<String>> {
    let raw = dom::attr_get(ol, "scheme")?;
    let formats: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if formats.is_empty() {
        None
    } else {
        Some(formats)
    }
}

fn word_num_fmt(code: &str) -> &'static str {
    match code {
        "decimal" => "decimal",
        "decimalZero" => "decimalZero",
        "lowerRoman" | "roman" => "lowerRoman",
        "upperRoman" => "upperRoman",
        "lowerLetter" | "alpha" => "lowerLetter",
        "upperLetter" => "upperLetter",
        "bullet" => "bullet",
        "none" => "none",
        other => {
            log::debug!("unknown numbering format {other:?}, using decimal");
            "decimal"
        }
    }
}
