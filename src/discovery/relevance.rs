use deunicode::deunicode;

/// Lowercased, ASCII-folded text with punctuation turned into spaces and
/// whitespace collapsed, for keyword tests.
pub fn normalize_for_matching(text: &str) -> String {
    let ascii = deunicode(&text.to_lowercase());
    let words: String = ascii
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    words.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Topic predicate over a raw title. Keywords are matched as substrings, so a
/// trailing space in a keyword ("fed ") acts as a cheap word boundary.
#[derive(Debug, Clone)]
pub struct TopicMatcher {
    keywords: Vec<String>,
}

impl TopicMatcher {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_relevant(&self, title: &str) -> bool {
        // pad so "fed " still hits a title ending in "Fed"
        let text = format!("{} ", normalize_for_matching(title));
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::DiscoveryCfg;

    fn matcher() -> TopicMatcher {
        TopicMatcher::new(&DiscoveryCfg::default().keywords)
    }

    #[test]
    fn test_fed_titles_relevant() {
        let m = matcher();
        assert!(m.is_relevant("Fed decision in March?"));
        assert!(m.is_relevant("How many FOMC cuts"));
        assert!(m.is_relevant("Will the   Federal\tReserve act"));
        assert!(m.is_relevant("Who will chair the Fed"));
        assert!(m.is_relevant("Will the Fed?"));
        assert!(m.is_relevant("the Fed's next move"));
        assert!(m.is_relevant("Fed/Treasury accord"));
    }

    #[test]
    fn test_unrelated_titles_rejected() {
        let m = matcher();
        assert!(!m.is_relevant("Bitcoin above 100k"));
        assert!(!m.is_relevant("FedEx earnings beat"));
        assert!(!m.is_relevant(""));
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(normalize_for_matching("  Fédéral\n  RÉSERVE "), "federal reserve");
        assert_eq!(normalize_for_matching("Fed's (FOMC) cut?"), "fed s fomc cut");
    }
}
