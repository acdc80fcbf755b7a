use serde::{Deserialize, Serialize};

/// Keyword text appended by an add operation, edited by the operator afterwards.
pub const KEYWORD_PLACEHOLDER: &str = "كلمة جديدة";

/// Display name given to a freshly added target row.
pub const TARGET_NAME_PLACEHOLDER: &str = "New Group";

const SEED_PRIMARY_TEMPLATE: &str = "تفضل {user}، سيتم التواصل معك.";
const SEED_ALTERNATE_TEMPLATE: &str = "Hi {user}, we will contact you shortly.";

/// The persisted reply configuration. Single source of truth: read fresh for
/// every inbound event, replaced wholesale after every reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDocument {
    /// Case-insensitive trigger strings. Duplicates permitted; order is
    /// display order only; any match short-circuits.
    pub keywords: Vec<String>,
    pub targets: Vec<Target>,
    /// Default-locale reply template, at most one `{user}` placeholder honored.
    pub primary_template: String,
    /// Alternate-locale reply template.
    pub alternate_template: String,
    /// Optimistic-concurrency counter, bumped by the store on replace.
    pub revision: u64,
}

impl Default for ConfigDocument {
    /// The first-run seed document.
    fn default() -> Self {
        Self {
            keywords: vec![
                "مرحبا".to_string(),
                "Hello".to_string(),
                "مساعدة".to_string(),
            ],
            targets: Vec::new(),
            primary_template: SEED_PRIMARY_TEMPLATE.to_string(),
            alternate_template: SEED_ALTERNATE_TEMPLATE.to_string(),
            revision: 0,
        }
    }
}

impl ConfigDocument {
    /// Content equality, ignoring the persistence revision counter.
    pub fn same_content(&self, other: &Self) -> bool {
        self.keywords == other.keywords
            && self.targets == other.targets
            && self.primary_template == other.primary_template
            && self.alternate_template == other.alternate_template
    }
}

/// A configured conversation or contact eligible for automated reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    /// External conversation/contact identifier. Lookup and deletion key,
    /// NOT enforced unique; blank on freshly added rows until edited.
    pub id: String,
    /// Display label.
    pub name: String,
    pub delivery_mode: DeliveryMode,
    pub template_choice: TemplateChoice,
    /// Per-target reply text, used only when `template_choice` is `custom`.
    pub custom_reply: String,
}

impl Default for Target {
    /// The placeholder row appended by an add operation.
    fn default() -> Self {
        Self {
            id: String::new(),
            name: TARGET_NAME_PLACEHOLDER.to_string(),
            delivery_mode: DeliveryMode::Group,
            template_choice: TemplateChoice::Primary,
            custom_reply: String::new(),
        }
    }
}

/// Where a routed reply goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Reply in place, threaded into the originating conversation.
    #[default]
    Group,
    /// Send a fresh direct message to the sender.
    Private,
}

impl DeliveryMode {
    /// Parse a dashboard form value. Unknown values are `None` (ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "group" => Some(Self::Group),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Private => "private",
        }
    }
}

/// Which reply text a target renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateChoice {
    /// The document's default-locale template.
    #[default]
    Primary,
    /// The document's alternate-locale template.
    Alternate,
    /// The target's own `custom_reply` text.
    Custom,
}

impl TemplateChoice {
    /// Parse a dashboard form value. Unknown values are `None` (ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(Self::Primary),
            "alternate" => Some(Self::Alternate),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Alternate => "alternate",
            Self::Custom => "custom",
        }
    }
}
