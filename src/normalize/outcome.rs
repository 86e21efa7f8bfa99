use crate::normalize::rules::{RewriteRule, first_match};
use lazy_static::lazy_static;
use std::collections::HashMap;

const FIXED_LABELS: &[(&str, &str)] = &[
    ("yes", "예"),
    ("no", "아니오"),
    ("no change", "동결"),
    ("25 bps decrease", "25bp 인하"),
    ("25 bps cut", "25bp 인하"),
    ("50 bps decrease", "50bp 인하"),
    ("50 bps cut", "50bp 인하"),
    ("75 bps decrease", "75bp 인하"),
    ("100 bps decrease", "100bp 인하"),
    ("25 bps increase", "25bp 인상"),
    ("50 bps increase", "50bp 인상"),
    ("increase", "인상"),
    ("decrease", "인하"),
];

const UNIT: &str = r"(?:bps?|basis points?)";

lazy_static! {
    static ref LABELS: HashMap<&'static str, &'static str> = FIXED_LABELS.iter().copied().collect();

    // Anchored at the start of the trimmed outcome; first hit wins.
    static ref MAGNITUDE_RULES: Vec<RewriteRule> = vec![
        RewriteRule::relabel(
            "bps_plus_cut",
            &format!(r"(\d+(?:\.\d+)?)\+\s*{}\s*(?:decrease|cut)", UNIT),
            "${1}bp 이상 인하",
        )
        .unwrap(),
        RewriteRule::relabel(
            "bps_plus_hike",
            &format!(r"(\d+(?:\.\d+)?)\+\s*{}\s*(?:increase|hike)", UNIT),
            "${1}bp 이상 인상",
        )
        .unwrap(),
        RewriteRule::relabel(
            "bps_cut",
            &format!(r"(\d+(?:\.\d+)?)\s*{}\s*(?:decrease|cut)", UNIT),
            "${1}bp 인하",
        )
        .unwrap(),
        RewriteRule::relabel(
            "bps_hike",
            &format!(r"(\d+(?:\.\d+)?)\s*{}\s*(?:increase|hike)", UNIT),
            "${1}bp 인상",
        )
        .unwrap(),
        RewriteRule::relabel("rate_range", r"(\d+\.\d+)\s*%?\s*[-–]\s*(\d+\.\d+)", "${1}~${2}%").unwrap(),
        RewriteRule::relabel("cut_count", r"(\d+)\s*cuts?", "${1}회 인하").unwrap(),
        RewriteRule::relabel("or_more", r"(\d+)\s*or more", "${1}회 이상").unwrap(),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// Exact entry in the fixed label table.
    Mapped,
    /// A magnitude pattern, by rule name.
    Pattern(&'static str),
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeLabel {
    pub text: String,
    pub via: LabelSource,
}

pub fn classify_outcome(raw: &str) -> OutcomeLabel {
    let trimmed = raw.trim();

    if let Some(label) = LABELS.get(trimmed.to_lowercase().as_str()) {
        return OutcomeLabel {
            text: label.to_string(),
            via: LabelSource::Mapped,
        };
    }

    match first_match(&MAGNITUDE_RULES, trimmed) {
        Some((rule, text)) => OutcomeLabel {
            text,
            via: LabelSource::Pattern(rule.name()),
        },
        None => OutcomeLabel {
            text: trimmed.to_string(),
            via: LabelSource::Passthrough,
        },
    }
}

/// Outcome label -> Korean label; falls back to the trimmed input.
pub fn normalize_outcome(raw: &str) -> String {
    classify_outcome(raw).text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_label_wins_over_pattern() {
        let label = classify_outcome("25 bps decrease");
        assert_eq!(label.text, "25bp 인하");
        assert_eq!(label.via, LabelSource::Mapped);

        assert_eq!(normalize_outcome("  Yes "), "예");
        assert_eq!(normalize_outcome("No change"), "동결");
    }

    #[test]
    fn test_unmapped_magnitude_uses_pattern() {
        let label = classify_outcome("37 bps cut");
        assert_eq!(label.text, "37bp 인하");
        assert_eq!(label.via, LabelSource::Pattern("bps_cut"));

        assert_eq!(normalize_outcome("12.5 basis points hike"), "12.5bp 인상");
        assert_eq!(normalize_outcome("50+ bps decrease"), "50bp 이상 인하");
        assert_eq!(normalize_outcome("25+ bps increase"), "25bp 이상 인상");
    }

    #[test]
    fn test_ranges_and_counts() {
        assert_eq!(normalize_outcome("3.50-3.75%"), "3.50~3.75%");
        assert_eq!(normalize_outcome("3.50% – 3.75%"), "3.50~3.75%");
        assert_eq!(normalize_outcome("2 cuts"), "2회 인하");
        assert_eq!(normalize_outcome("4 or more"), "4회 이상");
    }

    #[test]
    fn test_passthrough_is_trimmed() {
        let label = classify_outcome("  Trump  ");
        assert_eq!(label.text, "Trump");
        assert_eq!(label.via, LabelSource::Passthrough);
        assert_eq!(normalize_outcome(""), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            " ",
            "Yes",
            "no",
            "No change",
            "25 bps decrease",
            "37 bps cut",
            "100+ bps cut",
            "3.25-3.50",
            "0 cuts",
            "10 or more",
            "Increase",
            "Other",
            "예",
            "5bp 인하",
            "3.50~3.75%",
        ];
        for input in inputs {
            let once = normalize_outcome(input);
            assert_eq!(normalize_outcome(&once), once, "input: {:?}", input);
        }
    }
}
