//! Canned "AI" advisors. Replies come from keyword-routed template tables;
//! nothing here performs inference or touches the network.

mod rules;

pub use rules::{render, Rule, RuleBook, Selection, TemplateVars};

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{log_debug, settings::CustomChatConfig, store::keys};

const ENABLE_LOGS: bool = true;

const SALES_TABLE: &str = include_str!("tables/sales.json");
const MARKETING_TABLE: &str = include_str!("tables/marketing.json");
const CUSTOM_TABLE: &str = include_str!("tables/custom.json");

pub const SALES_ADVISOR_NAME: &str = "販売戦略アドバイザー";
pub const MARKETING_ADVISOR_NAME: &str = "集客マーケティングアドバイザー";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "configId")]
pub enum Persona {
    Sales,
    Marketing,
    Custom(String),
}

impl Persona {
    pub fn history_key(&self) -> String {
        match self {
            Persona::Sales => keys::CHAT_HISTORY_SALES.to_string(),
            Persona::Marketing => keys::CHAT_HISTORY_MARKETING.to_string(),
            Persona::Custom(id) => keys::custom_chat_history(id),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Sales => write!(f, "sales"),
            Persona::Marketing => write!(f, "marketing"),
            Persona::Custom(id) => write!(f, "custom:{id}"),
        }
    }
}

impl FromStr for Persona {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "sales" => Ok(Persona::Sales),
            "marketing" => Ok(Persona::Marketing),
            other => match other.strip_prefix("custom:") {
                Some(id) if !id.is_empty() => Ok(Persona::Custom(id.to_string())),
                _ => bail!("unknown advisor '{other}' (expected sales, marketing or custom:<id>)"),
            },
        }
    }
}

/// The bundled rule tables, parsed once at startup.
#[derive(Debug, Clone)]
pub struct RuleLibrary {
    pub sales: Arc<RuleBook>,
    pub marketing: Arc<RuleBook>,
    pub custom: Arc<RuleBook>,
}

impl RuleLibrary {
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            sales: Arc::new(RuleBook::from_json(SALES_TABLE)?),
            marketing: Arc::new(RuleBook::from_json(MARKETING_TABLE)?),
            custom: Arc::new(RuleBook::from_json(CUSTOM_TABLE)?),
        })
    }
}

/// Timing and routing knobs shared by every advisor.
#[derive(Debug, Clone, Copy)]
pub struct AdvisorOptions {
    pub early_turn_threshold: u32,
    pub typing_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Advisor {
    persona: Persona,
    name: String,
    instructions: String,
    book: Arc<RuleBook>,
    options: AdvisorOptions,
}

impl Advisor {
    pub fn sales(library: &RuleLibrary, options: AdvisorOptions) -> Self {
        Self {
            persona: Persona::Sales,
            name: SALES_ADVISOR_NAME.to_string(),
            instructions: String::new(),
            book: Arc::clone(&library.sales),
            options,
        }
    }

    pub fn marketing(library: &RuleLibrary, options: AdvisorOptions) -> Self {
        Self {
            persona: Persona::Marketing,
            name: MARKETING_ADVISOR_NAME.to_string(),
            instructions: String::new(),
            book: Arc::clone(&library.marketing),
            options,
        }
    }

    pub fn custom(library: &RuleLibrary, config: &CustomChatConfig, options: AdvisorOptions) -> Self {
        Self {
            persona: Persona::Custom(config.id.clone()),
            name: config.name.clone(),
            instructions: config.instructions.clone(),
            book: Arc::clone(&library.custom),
            options,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Never fails: an unmatched input resolves to the fallback template.
    pub fn respond(&self, input: &str, turn: u32) -> String {
        let selection = self
            .book
            .select(input, turn, self.options.early_turn_threshold);
        log_debug!(
            "{} turn {turn}: {}",
            self.persona,
            selection.rule.unwrap_or("fallback")
        );

        render(
            selection.template,
            &TemplateVars {
                input,
                turn,
                advisor_name: &self.name,
                instructions: &self.instructions,
            },
        )
    }

    /// Same as [`Advisor::respond`] after the simulated typing delay.
    pub async fn respond_with_delay(&self, input: &str, turn: u32) -> String {
        if !self.options.typing_delay.is_zero() {
            tokio::time::sleep(self.options.typing_delay).await;
        }
        self.respond(input, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn options() -> AdvisorOptions {
        AdvisorOptions {
            early_turn_threshold: 4,
            typing_delay: Duration::ZERO,
        }
    }

    fn sales() -> Advisor {
        Advisor::sales(&RuleLibrary::bundled().unwrap(), options())
    }

    #[test]
    fn bundled_tables_parse() {
        let library = RuleLibrary::bundled().unwrap();
        assert!(!library.sales.early.is_empty());
        assert!(!library.marketing.general.is_empty());
        assert!(library.custom.fallback.contains("${instructions}"));
    }

    #[test]
    fn top_five_question_lists_prius_first() {
        let reply = sales().respond("今月の売れ筋車種TOP5を教えて", 1);
        assert!(reply.contains("トヨタ プリウス"));
    }

    #[test]
    fn inventory_keyword_on_early_turn_uses_inventory_template() {
        let input = "在庫が多すぎて困っています";
        let reply = sales().respond(input, 2);
        assert!(reply.starts_with("在庫についてのご相談ですね。"));
        assert!(reply.contains(input));
        assert!(!reply.contains(SALES_ADVISOR_NAME));
    }

    #[test]
    fn inventory_keyword_after_threshold_uses_followup() {
        let reply = sales().respond("在庫の件です", 5);
        assert!(reply.contains("5回目のご質問"));
    }

    #[test]
    fn unmatched_input_echoes_original_text() {
        let input = "Hello ABC 123";
        let reply = sales().respond(input, 1);
        assert!(reply.contains("「Hello ABC 123」"));
        assert!(reply.contains(SALES_ADVISOR_NAME));
    }

    #[test]
    fn marketing_routes_uppercase_sns() {
        let advisor = Advisor::marketing(&RuleLibrary::bundled().unwrap(), options());
        let reply = advisor.respond("SNSで集客したい", 1);
        assert!(reply.starts_with("SNS活用のご相談ですね。"));
    }

    #[test]
    fn custom_advisor_uses_its_name_and_instructions() {
        let now = Utc::now();
        let config = CustomChatConfig {
            id: "c1".into(),
            name: "店長アシスタント".into(),
            description: String::new(),
            instructions: "短く答える".into(),
            created_at: now,
            updated_at: now,
        };
        let advisor = Advisor::custom(&RuleLibrary::bundled().unwrap(), &config, options());
        assert_eq!(advisor.persona(), &Persona::Custom("c1".into()));

        let reply = advisor.respond("天気は？", 3);
        assert!(reply.contains("店長アシスタント"));
        assert!(reply.contains("短く答える"));
        assert!(reply.contains("天気は？"));
    }

    #[test]
    fn persona_parses_and_maps_to_history_key() {
        assert_eq!("sales".parse::<Persona>().unwrap(), Persona::Sales);
        assert_eq!(
            "custom:abc".parse::<Persona>().unwrap().history_key(),
            "chat_history_custom_abc"
        );
        assert!("custom:".parse::<Persona>().is_err());
        assert!("finance".parse::<Persona>().is_err());
    }

    #[tokio::test]
    async fn delayed_reply_matches_immediate_reply() {
        let advisor = Advisor::sales(
            &RuleLibrary::bundled().unwrap(),
            AdvisorOptions {
                early_turn_threshold: 4,
                typing_delay: Duration::from_millis(20),
            },
        );
        let delayed = advisor.respond_with_delay("価格を見直したい", 1).await;
        assert_eq!(delayed, advisor.respond("価格を見直したい", 1));
    }
}
