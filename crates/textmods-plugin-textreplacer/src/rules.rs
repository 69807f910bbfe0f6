//! Rule model and the persisted settings record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::rewriter::CompiledRule;

/// One rewrite rule.
///
/// `pattern` uses regex syntax; `replacement` may reference capture groups
/// with `$n`, `$<name>`, `$&`, `` $` `` and `$'` tokens.
///
/// Records written by older versions (`{"regex", "replace"}`) still
/// deserialize: the missing fields default to an unnamed, enabled,
/// case-sensitive rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub name: String,

    #[serde(alias = "regex")]
    pub pattern: String,

    #[serde(alias = "replace")]
    pub replacement: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, alias = "case_insensitive")]
    pub case_insensitive: bool,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// An enabled, case-sensitive rule.
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            enabled: true,
            case_insensitive: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn ignoring_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Check that the pattern compiles.
    pub fn validate(&self) -> Result<(), RuleError> {
        CompiledRule::compile(self)?;
        Ok(())
    }
}

/// Ordered rules; list order is application order.
pub type RuleSet = Vec<Rule>;

/// The rule set shipped on first run.
pub fn default_rules() -> RuleSet {
    vec![
        Rule::new("Twitter/X Embed Fix", r"//(x|twitter)\.com", "//vxtwitter.com"),
        Rule::new("Pixiv Embed Fix", r"pixiv\.net", "phixiv.net"),
        Rule::new(
            "YouTube Videos No Ads",
            r"https?://(www\.)?youtube\.com/watch\?v=([\w-]+)",
            "https://yt.cdn.13373333.one/watch?v=$2",
        )
        .disabled(),
        Rule::new(
            "YouTube Shorts No Ads",
            r"https?://(www\.)?youtube\.com/shorts/([\w-]+)",
            "https://yt.cdn.13373333.one/watch?v=$2",
        )
        .disabled(),
    ]
}

/// The persisted settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacerSettings {
    pub regexes: RuleSet,
}

impl Default for ReplacerSettings {
    fn default() -> Self {
        Self {
            regexes: default_rules(),
        }
    }
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

/// A field of [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Name,
    Pattern,
    Replacement,
    Enabled,
    CaseInsensitive,
}

impl FromStr for RuleField {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "pattern" | "regex" => Ok(Self::Pattern),
            "replacement" | "replace" => Ok(Self::Replacement),
            "enabled" => Ok(Self::Enabled),
            "caseInsensitive" | "case_insensitive" => Ok(Self::CaseInsensitive),
            other => Err(RuleError::UnknownField(other.to_owned())),
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Pattern => "pattern",
            Self::Replacement => "replacement",
            Self::Enabled => "enabled",
            Self::CaseInsensitive => "caseInsensitive",
        })
    }
}

/// A new value for exactly one field of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleFieldUpdate {
    Name(String),
    Pattern(String),
    Replacement(String),
    Enabled(bool),
    CaseInsensitive(bool),
}

impl RuleFieldUpdate {
    /// Build an update from a field name and its textual value.
    pub fn parse(field: &str, value: &str) -> Result<Self, RuleError> {
        let field: RuleField = field.parse()?;
        let flag = || {
            value.parse::<bool>().map_err(|_| RuleError::InvalidValue {
                field: field.to_string(),
                value: value.to_owned(),
            })
        };
        Ok(match field {
            RuleField::Name => Self::Name(value.to_owned()),
            RuleField::Pattern => Self::Pattern(value.to_owned()),
            RuleField::Replacement => Self::Replacement(value.to_owned()),
            RuleField::Enabled => Self::Enabled(flag()?),
            RuleField::CaseInsensitive => Self::CaseInsensitive(flag()?),
        })
    }

    pub fn field(&self) -> RuleField {
        match self {
            Self::Name(_) => RuleField::Name,
            Self::Pattern(_) => RuleField::Pattern,
            Self::Replacement(_) => RuleField::Replacement,
            Self::Enabled(_) => RuleField::Enabled,
            Self::CaseInsensitive(_) => RuleField::CaseInsensitive,
        }
    }

    /// Write the new value into `rule`, leaving every other field alone.
    pub fn apply(self, rule: &mut Rule) {
        match self {
            Self::Name(v) => rule.name = v,
            Self::Pattern(v) => rule.pattern = v,
            Self::Replacement(v) => rule.replacement = v,
            Self::Enabled(v) => rule.enabled = v,
            Self::CaseInsensitive(v) => rule.case_insensitive = v,
        }
    }
}
