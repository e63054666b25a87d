//! Locator abstraction: an immutable strategy + value pair describing where
//! an element lives inside a scope.
//!
//! Locators are plain values. They do not know how to find anything; the
//! session/driver collaborator interprets them (see [`crate::driver`]). Two
//! locators compare equal when both strategy and value match.

use serde::{Deserialize, Serialize};

/// Recognized lookup strategies.
///
/// The set is closed: anything a page document names outside of it is
/// rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// CSS selector (e.g. `button.primary`)
    #[serde(rename = "css")]
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// `data-testid` attribute value
    #[serde(rename = "test-id")]
    TestId,
    /// Visible text content
    #[serde(rename = "text")]
    Text,
}

impl Strategy {
    /// Wire name of the strategy, as the driver boundary sees it
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::TestId => "test-id",
            Self::Text => "text",
        }
    }

    /// Parse a wire name back into a strategy
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "css" => Some(Self::Css),
            "xpath" => Some(Self::XPath),
            "test-id" => Some(Self::TestId),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable `{strategy, value}` pair. Equality is by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// How to look
    pub strategy: Strategy,
    /// What to look for
    pub value: String,
}

impl Locator {
    /// Create a locator from an explicit strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// CSS selector locator
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// `data-testid` locator
    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self::new(Strategy::TestId, value)
    }

    /// Text-content locator
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(Strategy::Text, value)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod equality_tests {
        use super::*;

        #[test]
        fn equal_by_value() {
            assert_eq!(Locator::css("form#login"), Locator::css("form#login"));
        }

        #[test]
        fn strategy_participates_in_equality() {
            assert_ne!(Locator::css(".x"), Locator::xpath(".x"));
        }

        #[test]
        fn usable_as_map_key() {
            let mut map = std::collections::HashMap::new();
            map.insert(Locator::xpath("//div"), 1);
            assert_eq!(map.get(&Locator::xpath("//div")), Some(&1));
        }
    }

    mod strategy_tests {
        use super::*;

        #[test]
        fn names_round_trip() {
            for strategy in [
                Strategy::Css,
                Strategy::XPath,
                Strategy::TestId,
                Strategy::Text,
            ] {
                assert_eq!(Strategy::parse(strategy.name()), Some(strategy));
            }
        }

        #[test]
        fn unknown_name_rejected() {
            assert_eq!(Strategy::parse("magic"), None);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn locator_serializes_as_strategy_value_pair() {
            let json = serde_json::to_value(Locator::test_id("submit")).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"strategy": "test-id", "value": "submit"})
            );
        }

        #[test]
        fn locator_deserializes() {
            let locator: Locator =
                serde_json::from_str(r#"{"strategy": "xpath", "value": "//form"}"#).unwrap();
            assert_eq!(locator, Locator::xpath("//form"));
        }
    }

    #[test]
    fn display_is_strategy_then_value() {
        assert_eq!(Locator::css("input[name=u]").to_string(), "css=input[name=u]");
    }
}
