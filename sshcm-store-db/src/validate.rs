// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Validation rules for user-supplied names, ids and property names.
//!
//! The property and default-setting names form closed sets. Column names are
//! only ever taken from [`Property::column`], never from raw input.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Check that a nickname is non-empty and starts with a letter.
pub fn validate_nickname(nickname: &str) -> Result<()> {
    let Some(first) = nickname.chars().next() else {
        return Err(Error::InvalidNickname);
    };
    if !first.is_alphabetic() {
        return Err(Error::NicknameMustStartWithLetter(nickname.to_owned()));
    }
    Ok(())
}

/// Check that a string is a base-10 integer id of at least 1.
///
/// Works on strings because a positional argument may hold either an id or
/// a nickname, and callers have to tell the two apart.
pub fn validate_id(id: &str) -> Result<()> {
    parse_id(id).map(|_| ())
}

/// Parse a string into a connection id, applying [`validate_id`] rules.
pub fn parse_id(id: &str) -> Result<i64> {
    match id.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::InvalidId(id.to_owned())),
    }
}

pub fn is_valid_connection_property(name: &str) -> bool {
    name.parse::<Property>().is_ok()
}

pub fn is_valid_default_name(name: &str) -> bool {
    name.parse::<DefaultName>().is_ok()
}

/// True if `s` is usable as either an id or a nickname.
pub fn is_valid_id_or_nickname(s: &str) -> bool {
    validate_id(s).is_ok() || validate_nickname(s).is_ok()
}

/// A user-visible connection property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Nickname,
    Host,
    User,
    Description,
    Args,
    Identity,
    Command,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::Nickname,
        Property::Host,
        Property::User,
        Property::Description,
        Property::Args,
        Property::Identity,
        Property::Command,
    ];

    /// Column name in the `connections` table.
    pub fn column(self) -> &'static str {
        match self {
            Property::Nickname => "nickname",
            Property::Host => "host",
            Property::User => "user",
            Property::Description => "description",
            Property::Args => "args",
            Property::Identity => "identity",
            Property::Command => "command",
        }
    }

    /// The default setting backing this property, if it has one.
    pub fn default_name(self) -> Option<DefaultName> {
        match self {
            Property::User => Some(DefaultName::User),
            Property::Args => Some(DefaultName::Args),
            Property::Identity => Some(DefaultName::Identity),
            Property::Command => Some(DefaultName::Command),
            Property::Nickname | Property::Host | Property::Description => None,
        }
    }
}

impl FromStr for Property {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Property::ALL
            .into_iter()
            .find(|p| p.column() == s)
            .ok_or_else(|| Error::InvalidProperty(s.to_owned()))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A property that may carry a global default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefaultName {
    Args,
    Command,
    Identity,
    User,
}

impl DefaultName {
    pub const ALL: [DefaultName; 4] = [
        DefaultName::Args,
        DefaultName::Command,
        DefaultName::Identity,
        DefaultName::User,
    ];

    /// Key in the `defaults` table.
    pub fn as_str(self) -> &'static str {
        match self {
            DefaultName::Args => "args",
            DefaultName::Command => "command",
            DefaultName::Identity => "identity",
            DefaultName::User => "user",
        }
    }
}

impl FromStr for DefaultName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DefaultName::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::InvalidDefaultName(s.to_owned()))
    }
}

impl fmt::Display for DefaultName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
