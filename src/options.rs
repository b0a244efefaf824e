/// Knobs for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Tags skipped together with their whole subtree.
    pub ignore: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ignore: vec!["hr".to_string()],
        }
    }
}

impl ConvertOptions {
    pub fn is_ignored(&self, tag: &str) -> bool {
        self.ignore.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
