//! Item codes: what an item entity holds and how many.

use std::fmt;
use std::str::FromStr;

use crate::error::NetError;

/// Kind and stack size of an item.
///
/// Written on the wire as two `i32`, and as `"<kind> <amount>"` in text
/// (inventories, config files, chat commands).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemCode {
    /// Item kind, [`ItemCode::EMPTY_KIND`] for nothing.
    pub kind: i32,
    /// Stack size.
    pub amount: i32,
}

impl ItemCode {
    /// Kind value meaning "no item".
    pub const EMPTY_KIND: i32 = -1;

    /// The empty item.
    pub const EMPTY: Self = Self {
        kind: Self::EMPTY_KIND,
        amount: 0,
    };

    /// Creates an item code.
    #[must_use]
    pub const fn new(kind: i32, amount: i32) -> Self {
        Self { kind, amount }
    }

    /// True if this code holds no item.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.kind == Self::EMPTY_KIND
    }
}

impl Default for ItemCode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.amount)
    }
}

impl FromStr for ItemCode {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetError::InvalidItemCode(s.to_owned());
        let mut fields = s.split_whitespace();
        let kind = fields.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let amount = fields.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        if fields.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { kind, amount })
    }
}
