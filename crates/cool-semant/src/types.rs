// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static types.
//!
//! A static type is either a class name, the self-referential `SELF_TYPE`,
//! or the marker carried by absent expressions. `SELF_TYPE` is kept distinct
//! from the enclosing class name and only resolved at the points where the
//! typing rules demand it.

use crate::names;
use ecow::EcoString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The static type of an expression or binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticType {
    /// A class, by name.
    Class(EcoString),
    /// The dynamic type of the receiver (a subtype of the enclosing class).
    SelfType,
    /// Type of an absent optional expression; conforms to everything.
    NoType,
}

impl StaticType {
    /// Parses a declared type name.
    ///
    /// ```
    /// use cool_semant::types::StaticType;
    ///
    /// assert_eq!(StaticType::from_name("SELF_TYPE"), StaticType::SelfType);
    /// assert_eq!(StaticType::from_name("Int"), StaticType::int());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            names::SELF_TYPE => Self::SelfType,
            names::NO_TYPE => Self::NoType,
            _ => Self::Class(name.into()),
        }
    }

    #[must_use]
    pub fn object() -> Self {
        Self::Class(names::OBJECT.into())
    }

    #[must_use]
    pub fn int() -> Self {
        Self::Class(names::INT.into())
    }

    #[must_use]
    pub fn bool() -> Self {
        Self::Class(names::BOOL.into())
    }

    #[must_use]
    pub fn string() -> Self {
        Self::Class(names::STRING.into())
    }

    /// Returns the class name if this is a class type.
    #[must_use]
    pub fn as_class(&self) -> Option<&EcoString> {
        match self {
            Self::Class(name) => Some(name),
            Self::SelfType | Self::NoType => None,
        }
    }

    /// Returns true if this is exactly the named class.
    #[must_use]
    pub fn is_class(&self, name: &str) -> bool {
        self.as_class().is_some_and(|class| class == name)
    }

    /// Returns true for `Int`, `Bool` and `String`.
    #[must_use]
    pub fn is_basic_value(&self) -> bool {
        self.as_class()
            .is_some_and(|class| names::BASIC_VALUE_CLASSES.contains(&class.as_str()))
    }

    /// Replaces `SELF_TYPE` with the given class.
    #[must_use]
    pub fn resolve_self(&self, current_class: &str) -> Self {
        match self {
            Self::SelfType => Self::Class(current_class.into()),
            other => other.clone(),
        }
    }

    /// The name as it would appear in source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(name) => name,
            Self::SelfType => names::SELF_TYPE,
            Self::NoType => names::NO_TYPE,
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_recognises_reserved_types() {
        assert_eq!(StaticType::from_name("SELF_TYPE"), StaticType::SelfType);
        assert_eq!(StaticType::from_name("_no_type"), StaticType::NoType);
        assert_eq!(
            StaticType::from_name("Counter"),
            StaticType::Class("Counter".into())
        );
    }

    #[test]
    fn display_round_trips_names() {
        for name in ["SELF_TYPE", "_no_type", "Object", "Main"] {
            assert_eq!(StaticType::from_name(name).to_string(), name);
        }
    }

    #[test]
    fn basic_value_types() {
        assert!(StaticType::int().is_basic_value());
        assert!(StaticType::bool().is_basic_value());
        assert!(StaticType::string().is_basic_value());
        assert!(!StaticType::object().is_basic_value());
        assert!(!StaticType::SelfType.is_basic_value());
    }

    #[test]
    fn resolve_self_only_touches_self_type() {
        assert_eq!(
            StaticType::SelfType.resolve_self("Main"),
            StaticType::Class("Main".into())
        );
        assert_eq!(StaticType::int().resolve_self("Main"), StaticType::int());
        assert_eq!(StaticType::NoType.resolve_self("Main"), StaticType::NoType);
    }
}
