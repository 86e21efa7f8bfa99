use crate::core::types::{MONTH_LABELS_KO, MONTHS};
use crate::normalize::rules::{RewriteRule, apply_rules};
use lazy_static::lazy_static;

/// Whole-sentence question patterns first, then fragment patterns. Ordered:
/// "N or more" must run before the bare "N rate cuts" rule, and the specific
/// end-of-year phrasing before the generic "fed funds rate" one.
const LEADING_RULES: &[(&str, &str, &str)] = &[
    (
        "no_cuts_in_year",
        r"will no rate cuts? happen in \b(\d{4})\b\??",
        "${1}년 금리 인하 0회 여부",
    ),
    (
        "n_or_more_cuts_in_year",
        r"will (\d+) or more rate cuts? happen in \b(\d{4})\b\??",
        "${2}년 ${1}회 이상 금리 인하 여부",
    ),
    (
        "fewer_than_n_cuts_in_year",
        r"will fewer than (\d+) rate cuts? happen in \b(\d{4})\b\??",
        "${2}년 ${1}회 미만 금리 인하 여부",
    ),
    (
        "at_least_n_cuts_in_year",
        r"will at least (\d+) rate cuts? happen in \b(\d{4})\b\??",
        "${2}년 최소 ${1}회 금리 인하 여부",
    ),
    (
        "n_cuts_in_year",
        r"will (\d+) rate cuts? happen in \b(\d{4})\b\??",
        "${2}년 ${1}회 금리 인하 여부",
    ),
    (
        "how_many_cuts",
        r"how many (fed )?rate cuts? (in |)\b(\d{4})\b\??",
        "${3}년 Fed 금리 인하 횟수",
    ),
    (
        "number_of_cuts",
        r"number of (fed )?rate cuts?.*?\b(\d{4})\b",
        "${2}년 금리 인하 횟수",
    ),
];

const TRAILING_RULES: &[(&str, &str, &str)] = &[
    (
        "rate_at_end_of_year",
        r"what will the fed (funds )?rate be at the end of \b(\d{4})\b\??",
        "${2}년 말 Fed 기준금리 전망",
    ),
    (
        "funds_rate_end_of_year",
        r"fed funds rate (?:at )?(?:the )?end of \b(\d{4})\b",
        "${1}년 말 기준금리",
    ),
    (
        "hike_in_year",
        r"will the fed (?:raise|hike) rates?.*?\b(\d{4})\b\??",
        "${1}년 Fed 금리 인상 여부",
    ),
    (
        "cut_in_year",
        r"will the fed cut rates?.*?\b(\d{4})\b\??",
        "${1}년 Fed 금리 인하 여부",
    ),
    (
        "recession_in_year",
        r"will there be a recession.*?\b(\d{4})\b\??",
        "${1}년 경기 침체 여부",
    ),
];

lazy_static! {
    static ref TITLE_RULES: Vec<RewriteRule> = {
        let mut rules = Vec::new();
        for (name, pattern, template) in LEADING_RULES {
            rules.push(RewriteRule::substitute(name, pattern, *template).unwrap());
        }
        for (month, ko) in MONTHS.iter().zip(MONTH_LABELS_KO.iter()) {
            rules.push(
                RewriteRule::substitute(
                    "decision_in_month",
                    &format!(r"fed decision in {}\??", month),
                    format!("{} FOMC 금리 결정", ko),
                )
                .unwrap(),
            );
        }
        for (name, pattern, template) in TRAILING_RULES {
            rules.push(RewriteRule::substitute(name, pattern, *template).unwrap());
        }
        rules
    };
}

/// English market title -> Korean label. Text no rule recognises is returned as is.
pub fn normalize_title(raw: &str) -> String {
    apply_rules(&TITLE_RULES, raw)
}
