//! Import path rewriting for chart templates
//!
//! Chart templates are authored inside the component library, where shared
//! modules live a directory or two above them. Once installed, the chart sits
//! next to `utils/`, `hooks/` and `types/`, so every relative specifier that
//! points at a shared module is moved to its `./` form.
//!
//! Matching is textual. Anything that looks like a quoted module specifier is
//! rewritten, including inside comments and string literals, and the result is
//! not checked against the filesystem.

use regex::Regex;
use std::borrow::Cow;

/// One (pattern, replacement) pair. Replacement uses `regex` capture syntax.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(content, self.replacement)
    }
}

/// Default rules, in application order.
///
/// Every pattern starts at the opening quote and requires at least one `../`
/// (or a `shared/` segment), and no replacement produces either, so applying
/// the set twice is the same as applying it once.
const DEFAULT_RULES: &[(&str, &str, &str)] = &[
    ("utils", r#"(['"`])(?:\.\./)+utils/"#, "${1}./utils/"),
    ("hooks", r#"(['"`])(?:\.\./)+hooks/"#, "${1}./hooks/"),
    ("types", r#"(['"`])(?:\.\./)+types(['"`/])"#, "${1}./types${2}"),
    ("shared", r#"(['"`])(?:\.{1,2}/)+shared/"#, "${1}./utils/"),
];

#[derive(Debug, Clone)]
pub struct ImportRewriter {
    rules: Vec<RewriteRule>,
}

impl ImportRewriter {
    pub fn new() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|&(name, pattern, replacement)| {
                RewriteRule::new(name, pattern, replacement).expect("built-in rewrite pattern is valid")
            })
            .collect();
        Self { rules }
    }

    pub fn with_rules(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Apply every rule in order and return the rewritten text
    pub fn rewrite(&self, content: &str) -> String {
        let mut text = content.to_string();
        for rule in &self.rules {
            let rewritten = match rule.apply(&text) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = rewritten {
                tracing::trace!(rule = rule.name, "import rule applied");
                text = s;
            }
        }
        text
    }
}

impl Default for ImportRewriter {
    fn default() -> Self {
        Self::new()
    }
}
