use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const INPUT_PLACEHOLDER: &str = "${inputText}";
pub const TURN_PLACEHOLDER: &str = "${turn}";
pub const ADVISOR_NAME_PLACEHOLDER: &str = "${advisorName}";
pub const INSTRUCTIONS_PLACEHOLDER: &str = "${instructions}";

/// Matches when the lowercased input contains any of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub keywords: Vec<String>,
    pub template: String,
}

impl Rule {
    pub fn matches(&self, lowered_input: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_input.contains(keyword.as_str()))
    }
}

/// An advisor's response table. Order inside each list is the priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub early: Vec<Rule>,
    #[serde(default)]
    pub general: Vec<Rule>,
    pub fallback: String,
}

/// Which template was picked; `rule` is `None` for the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub rule: Option<&'a str>,
    pub template: &'a str,
}

impl RuleBook {
    /// Parses a table and lowercases its keywords so authors can write `TOP5` or `SNS`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut book: RuleBook = serde_json::from_str(raw).context("invalid rule table")?;
        for rule in book.early.iter_mut().chain(book.general.iter_mut()) {
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                bail!("rule '{}' has no keywords", rule.name);
            }
            rule.keywords = rule
                .keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| k.to_lowercase())
                .collect();
        }
        Ok(book)
    }

    /// Early turns scan `early` then `general`; later turns only `general`. First match wins.
    pub fn select(&self, input: &str, turn: u32, early_threshold: u32) -> Selection<'_> {
        let lowered = input.to_lowercase();
        let early: &[Rule] = if turn <= early_threshold {
            &self.early
        } else {
            &[]
        };

        early
            .iter()
            .chain(self.general.iter())
            .find(|rule| rule.matches(&lowered))
            .map(|rule| Selection {
                rule: Some(rule.name.as_str()),
                template: rule.template.as_str(),
            })
            .unwrap_or(Selection {
                rule: None,
                template: self.fallback.as_str(),
            })
    }
}

/// Values substituted into templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub input: &'a str,
    pub turn: u32,
    pub advisor_name: &'a str,
    pub instructions: &'a str,
}

impl TemplateVars<'_> {
    fn lookup<'v>(&'v self, placeholder: &str, turn: &'v str) -> Option<&'v str> {
        match placeholder {
            INPUT_PLACEHOLDER => Some(self.input),
            TURN_PLACEHOLDER => Some(turn),
            ADVISOR_NAME_PLACEHOLDER => Some(self.advisor_name),
            INSTRUCTIONS_PLACEHOLDER => Some(self.instructions),
            _ => None,
        }
    }
}

/// Expands placeholders in one left-to-right pass. Substituted values are copied
/// verbatim and never scanned again; unknown `${...}` sequences are kept as is.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> String {
    let turn = vars.turn.to_string();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail
            .find('}')
            .and_then(|end| vars.lookup(&tail[..=end], &turn).map(|value| (end, value)));
        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str("${");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> RuleBook {
        RuleBook::from_json(
            r#"{
                "early": [
                    {"name": "early_stock", "keywords": ["在庫"], "template": "early stock"}
                ],
                "general": [
                    {"name": "price", "keywords": ["価格", "PRICE"], "template": "price ${turn}"},
                    {"name": "stock", "keywords": ["在庫"], "template": "general stock"},
                    {"name": "price_again", "keywords": ["価格"], "template": "never reached"}
                ],
                "fallback": "fallback: ${inputText}"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn early_rules_only_apply_up_to_threshold() {
        let book = book();
        assert_eq!(book.select("在庫", 4, 4).rule, Some("early_stock"));
        assert_eq!(book.select("在庫", 5, 4).rule, Some("stock"));
    }

    #[test]
    fn early_turns_fall_through_to_general() {
        assert_eq!(book().select("価格は？", 1, 4).rule, Some("price"));
    }

    #[test]
    fn first_declared_rule_wins() {
        let book = book();
        let selection = book.select("価格と在庫", 10, 4);
        assert_eq!(selection.rule, Some("price"));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(book().select("What about Price?", 9, 4).rule, Some("price"));
    }

    #[test]
    fn unmatched_input_selects_fallback() {
        let book = book();
        let selection = book.select("hello", 1, 4);
        assert_eq!(selection.rule, None);
        assert_eq!(selection.template, "fallback: ${inputText}");
    }

    #[test]
    fn render_substitutes_all_placeholders() {
        let vars = TemplateVars {
            input: "Hello",
            turn: 3,
            advisor_name: "販売アドバイザー",
            instructions: "丁寧に",
        };
        let rendered = render(
            "${advisorName}/${instructions}/${turn}/${inputText}",
            &vars,
        );
        assert_eq!(rendered, "販売アドバイザー/丁寧に/3/Hello");
    }

    #[test]
    fn render_does_not_expand_placeholders_typed_by_user() {
        let vars = TemplateVars {
            input: "${turn}",
            turn: 7,
            advisor_name: "A",
            instructions: "",
        };
        assert_eq!(render("echo ${inputText}", &vars), "echo ${turn}");
    }

    #[test]
    fn render_copies_configured_values_verbatim() {
        let vars = TemplateVars {
            input: "USER",
            turn: 3,
            advisor_name: "${instructions}",
            instructions: "方針 ${inputText} ${turn}",
        };
        assert_eq!(render("${advisorName}", &vars), "${instructions}");
        assert_eq!(
            render("[${instructions}] ${inputText}", &vars),
            "[方針 ${inputText} ${turn}] USER"
        );
    }

    #[test]
    fn render_keeps_unknown_and_unterminated_placeholders() {
        let vars = TemplateVars {
            input: "x",
            turn: 1,
            advisor_name: "",
            instructions: "",
        };
        assert_eq!(render("${unknown} ${turn}", &vars), "${unknown} 1");
        assert_eq!(render("${${turn}", &vars), "${1");
        assert_eq!(render("tail ${inputText", &vars), "tail ${inputText");
    }

    #[test]
    fn rejects_rule_without_keywords() {
        let raw = r#"{"general": [{"name": "x", "keywords": [" "], "template": "t"}], "fallback": "f"}"#;
        assert!(RuleBook::from_json(raw).is_err());
    }
}
