use regex::Regex;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// Replace every match in place, keeping the surrounding text.
    Substitute,
    /// If the text starts with a match, the expanded template becomes the whole result.
    Relabel,
}

/// One `(matcher, rewrite)` pair. Patterns are always case-insensitive and
/// templates use `${n}` capture references.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: &'static str,
    pattern: Regex,
    template: String,
    mode: RuleMode,
}

impl RewriteRule {
    pub fn substitute(
        name: &'static str,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(&format!("(?i){}", pattern))?,
            template: template.into(),
            mode: RuleMode::Substitute,
        })
    }

    pub fn relabel(
        name: &'static str,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(&format!("(?i)^(?:{})", pattern))?,
            template: template.into(),
            mode: RuleMode::Relabel,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `None` when the rule does not fire.
    pub fn apply<'a>(&self, input: &'a str) -> Option<Cow<'a, str>> {
        match self.mode {
            RuleMode::Substitute => match self.pattern.replace_all(input, self.template.as_str()) {
                Cow::Borrowed(_) => None,
                owned => Some(owned),
            },
            RuleMode::Relabel => {
                let caps = self.pattern.captures(input)?;
                let mut out = String::new();
                caps.expand(&self.template, &mut out);
                Some(Cow::Owned(out))
            }
        }
    }
}

/// Runs every rule, in order, over the same accumulating string. Later rules
/// see text already rewritten by earlier ones.
pub fn apply_rules(rules: &[RewriteRule], input: &str) -> String {
    rules.iter().fold(input.to_string(), |acc, rule| match rule.apply(&acc) {
        Some(out) => out.into_owned(),
        None => acc,
    })
}

/// The first rule that fires wins; the rest are not consulted.
pub fn first_match<'r>(rules: &'r [RewriteRule], input: &str) -> Option<(&'r RewriteRule, String)> {
    rules
        .iter()
        .find_map(|rule| rule.apply(input).map(|out| (rule, out.into_owned())))
}
