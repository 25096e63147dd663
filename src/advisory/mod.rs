/*!
 * Code Advisory
 * Regex lint over script source before it runs in the sandbox
 *
 * This is a hint for the user, not a security boundary. Anything it misses
 * (aliasing, string building, getattr tricks) runs unhindered; isolation is the
 * interpreter's job.
 */

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{BridgeError, BridgeResult};

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Default Python rules: (pattern, severity, message)
const PYTHON_RULES: &[(&str, Severity, &str)] = &[
    (
        r"\bimport\s+subprocess\b|\bfrom\s+subprocess\s+import\b",
        Severity::Critical,
        "spawns host processes via subprocess",
    ),
    (
        r"\bos\.(system|popen|exec\w*|spawn\w*|fork)\s*\(",
        Severity::Critical,
        "spawns host processes via os",
    ),
    (
        r"(^|[^\w.])(eval|exec)\s*\(",
        Severity::Warning,
        "evaluates dynamically built code",
    ),
    (r"\b__import__\s*\(", Severity::Warning, "imports modules dynamically"),
    (
        r"\bimport\s+(socket|urllib|http\.client|requests)\b",
        Severity::Warning,
        "opens network connections",
    ),
    (
        r"\bimport\s+(ctypes|js|pyodide)\b|\bfrom\s+(js|pyodide)\b",
        Severity::Warning,
        "reaches outside the interpreter",
    ),
    (r"\bimport\s+os\b", Severity::Info, "uses the os module"),
];

/// One lint rule
#[derive(Debug, Clone)]
pub struct AdvisoryRule {
    pattern: Regex,
    pub severity: Severity,
    pub message: String,
}

impl AdvisoryRule {
    pub fn new(pattern: &str, severity: Severity, message: impl Into<String>) -> BridgeResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| BridgeError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        Ok(Self {
            pattern,
            severity,
            message: message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// A rule match on one source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line number
    pub line: usize,
    pub severity: Severity,
    pub message: String,
    pub snippet: String,
}

/// Line-oriented regex linter
#[derive(Debug, Clone, Default)]
pub struct CodeAdvisor {
    rules: Vec<AdvisoryRule>,
}

impl CodeAdvisor {
    /// Advisor with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisor loaded with the default Python rules
    pub fn python() -> BridgeResult<Self> {
        let rules = PYTHON_RULES
            .iter()
            .map(|(pattern, severity, message)| AdvisoryRule::new(pattern, *severity, *message))
            .collect::<BridgeResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn with_rule(mut self, rule: AdvisoryRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    /// Evaluate every rule against every line
    ///
    /// Comment-only lines are ignored. Findings are ordered by line, then rule.
    pub fn scan(&self, source: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for rule in &self.rules {
                if rule.pattern.is_match(line) {
                    findings.push(Finding {
                        line: index + 1,
                        severity: rule.severity,
                        message: rule.message.clone(),
                        snippet: trimmed.to_string(),
                    });
                }
            }
        }
        findings
    }

    /// Highest severity found, if any
    pub fn max_severity(findings: &[Finding]) -> Option<Severity> {
        findings.iter().map(|f| f.severity).max()
    }
}
