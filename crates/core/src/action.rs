//! UI intents carried by the view as `data-action` attributes

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Attribute the view uses to tag clickable controls
pub const ACTION_ATTR: &str = "data-action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start a draw run ("Go!")
    Trigger,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trigger" => Ok(Self::Trigger),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger() {
        assert_eq!("trigger".parse::<Action>(), Ok(Action::Trigger));
        assert_eq!(Action::Trigger.to_string(), "trigger");
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "reset".parse::<Action>(),
            Err(Error::UnknownAction("reset".into()))
        );
    }
}
