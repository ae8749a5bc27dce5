//! # Validation Rules
//!
//! Business rules checked at the mutation boundary of the document store.
//!
//! ## Design
//!
//! Every block change is proposed as a `(before, after)` pair. Each rule in
//! the [`RuleSet`] can veto the change; a veto leaves the store untouched and
//! is surfaced to the user as a warning notice.
//!
//! Rules also get a chance to repair blocks read from storage, so content
//! written before a rule existed still satisfies it once loaded.

use funnel_blocks::{Block, BlockContent};
use std::fmt;

/// Why a rule vetoed a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// A business rule over single blocks
pub trait ValidationRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Veto a proposed change of `before` into `after`
    fn check(&self, before: &Block, after: &Block) -> Result<(), Rejection>;

    /// Bring a stored block in line with the rule. Returns true if it changed.
    fn repair(&self, _block: &mut Block) -> bool {
        false
    }
}

/// A checkout must always keep at least one payment method enabled
#[derive(Debug)]
pub struct PaymentMethodMinimum;

impl ValidationRule for PaymentMethodMinimum {
    fn name(&self) -> &'static str {
        "payment-method-minimum"
    }

    fn check(&self, _before: &Block, after: &Block) -> Result<(), Rejection> {
        match after.content.as_checkout() {
            Some(checkout) if checkout.enabled_payment_methods() == 0 => Err(Rejection {
                rule: self.name(),
                message: "At least one payment method must stay enabled.".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn repair(&self, block: &mut Block) -> bool {
        match block.content.as_checkout_mut() {
            Some(checkout) if checkout.enabled_payment_methods() == 0 => {
                checkout.enable_card = true;
                true
            }
            _ => false,
        }
    }
}

/// Headline levels map to h1-h6
#[derive(Debug)]
pub struct HeadlineLevelRange;

impl HeadlineLevelRange {
    const LEVELS: std::ops::RangeInclusive<u8> = 1..=6;
}

impl ValidationRule for HeadlineLevelRange {
    fn name(&self) -> &'static str {
        "headline-level-range"
    }

    fn check(&self, _before: &Block, after: &Block) -> Result<(), Rejection> {
        match &after.content {
            BlockContent::Headline(headline) if !Self::LEVELS.contains(&headline.level) => Err(Rejection {
                rule: self.name(),
                message: format!("Headline level must be between 1 and 6, got {}.", headline.level),
            }),
            _ => Ok(()),
        }
    }

    fn repair(&self, block: &mut Block) -> bool {
        match &mut block.content {
            BlockContent::Headline(headline) if !Self::LEVELS.contains(&headline.level) => {
                headline.level = headline.level.clamp(1, 6);
                true
            }
            _ => false,
        }
    }
}

/// Ordered collection of rules applied by the store. Always starts from the
/// built-in rules; callers can add rules but never remove those.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleSet {
    /// Rule set with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(PaymentMethodMinimum), Box::new(HeadlineLevelRange)],
        }
    }

    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First veto wins
    pub fn check(&self, before: &Block, after: &Block) -> Result<(), Rejection> {
        self.rules.iter().try_for_each(|rule| rule.check(before, after))
    }

    /// Names of the rules that changed the block
    pub fn repair(&self, block: &mut Block) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter_map(|rule| rule.repair(block).then(|| rule.name()))
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}
