//! Literal regex matching for greetings and farewells, plus known-company lookup.

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Default greeting pattern: "здравствуйте", "добрый день/вечер", "доброе утро", "привет"...
pub const GREETING_PATTERN: &str =
    "здравствуйте|(с )?добр(ый|ое|ым) (день|вечер|утром?)|привет(ствую)?";

/// Default farewell pattern: "до свидания", "всего доброго", "хорошего дня", "пока"...
pub const FAREWELL_PATTERN: &str = concat!(
    "(до (свидания|скорого))|(все(го)? (добро(го)?|хорош(о|его)))|",
    "((добро(го)?|хорош(о|его)) (дня|вечера)?)|(пока)",
);

/// Compiled greeting/farewell patterns and the known-company set.
///
/// Built once and shared read-only; matching never mutates state.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    greeting: Regex,
    farewell: Regex,
    /// Alternation over the known company names, longest first. `None` when
    /// no companies are configured, which makes every lookup a miss.
    companies: Option<Regex>,
}

impl PatternMatcher {
    pub fn new<S: AsRef<str>>(
        greeting_pattern: &str,
        farewell_pattern: &str,
        known_companies: &[S],
    ) -> Result<Self, ConfigError> {
        let greeting = compile("greeting", greeting_pattern)?;
        let farewell = compile("farewell", farewell_pattern)?;

        let mut names: Vec<String> = known_companies
            .iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let companies = if names.is_empty() {
            None
        } else {
            let alternation = names
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile("known company", &alternation)?)
        };

        Ok(Self {
            greeting,
            farewell,
            companies,
        })
    }

    pub fn matches_greeting(&self, line: &str) -> bool {
        self.greeting.is_match(line)
    }

    pub fn matches_farewell(&self, line: &str) -> bool {
        self.farewell.is_match(line)
    }

    /// Leftmost known company name in `line`, as written in the line.
    pub fn lookup_known_company<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.companies
            .as_ref()
            .and_then(|re| re.find(line))
            .map(|m| m.as_str())
    }

    pub fn has_known_companies(&self) -> bool {
        self.companies.is_some()
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(companies: &[&str]) -> PatternMatcher {
        PatternMatcher::new(GREETING_PATTERN, FAREWELL_PATTERN, companies).unwrap()
    }

    #[test]
    fn default_patterns_compile() {
        let m = matcher(&[]);
        assert!(!m.has_known_companies());
    }

    #[test]
    fn greeting_variants() {
        let m = matcher(&[]);
        assert!(m.matches_greeting("здравствуйте, слушаю вас"));
        assert!(m.matches_greeting("добрый день"));
        assert!(m.matches_greeting("доброе утро"));
        assert!(m.matches_greeting("с добрым утром"));
        assert!(m.matches_greeting("приветствую"));
        assert!(!m.matches_greeting("до свидания"));
    }

    #[test]
    fn greeting_is_case_insensitive() {
        let m = matcher(&[]);
        assert!(m.matches_greeting("Добрый Вечер"));
    }

    #[test]
    fn farewell_variants() {
        let m = matcher(&[]);
        assert!(m.matches_farewell("до свидания"));
        assert!(m.matches_farewell("всего доброго"));
        assert!(m.matches_farewell("хорошего дня"));
        assert!(m.matches_farewell("ну пока"));
        assert!(!m.matches_farewell("компания ромашка"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = PatternMatcher::new::<&str>("привет(", FAREWELL_PATTERN, &[]).unwrap_err();
        match err {
            ConfigError::InvalidPattern { name, .. } => assert_eq!(name, "greeting"),
            other => panic!("unexpected error: {other}"),
        }

        let err = PatternMatcher::new::<&str>(GREETING_PATTERN, "[пока", &[]).unwrap_err();
        assert!(err.to_string().contains("farewell"));
    }

    #[test]
    fn known_company_lookup_is_literal_and_case_insensitive() {
        let m = matcher(&["Ромашка", "Рога и Копыта"]);
        assert_eq!(
            m.lookup_known_company("вас беспокоит рога и копыта"),
            Some("рога и копыта")
        );
        assert_eq!(m.lookup_known_company("ромашка."), Some("ромашка"));
        assert_eq!(m.lookup_known_company("лютик"), None);
    }

    #[test]
    fn known_company_returns_leftmost_match() {
        let m = matcher(&["лютик", "ромашка"]);
        assert_eq!(
            m.lookup_known_company("ромашка, а не лютик"),
            Some("ромашка")
        );
    }

    #[test]
    fn longer_company_wins_at_same_position() {
        let m = matcher(&["ромашка", "ромашка плюс"]);
        assert_eq!(
            m.lookup_known_company("это ромашка плюс"),
            Some("ромашка плюс")
        );
    }

    #[test]
    fn regex_metacharacters_in_company_names_are_literal() {
        let m = matcher(&["ооо (тест)"]);
        assert_eq!(m.lookup_known_company("ооо (тест)"), Some("ооо (тест)"));
        assert_eq!(m.lookup_known_company("ооо тест"), None);
    }

    #[test]
    fn empty_company_set_never_matches() {
        let m = matcher(&["", "  "]);
        assert!(!m.has_known_companies());
        assert_eq!(m.lookup_known_company("ромашка"), None);
    }
}
