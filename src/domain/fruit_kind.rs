use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fruits a harvest can be recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    Raspberry,
    Strawberry,
    Apple,
    Cherry,
}

impl FruitKind {
    pub const ALL: [FruitKind; 4] = [
        FruitKind::Raspberry,
        FruitKind::Strawberry,
        FruitKind::Apple,
        FruitKind::Cherry,
    ];

    /// Key as stored in the database and accepted from clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            FruitKind::Raspberry => "raspberry",
            FruitKind::Strawberry => "strawberry",
            FruitKind::Apple => "apple",
            FruitKind::Cherry => "cherry",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FruitKind::Raspberry => "Raspberry",
            FruitKind::Strawberry => "Strawberry",
            FruitKind::Apple => "Apple",
            FruitKind::Cherry => "Cherry",
        }
    }
}

impl fmt::Display for FruitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFruit(pub String);

impl fmt::Display for UnknownFruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a known fruit", self.0)
    }
}

impl FromStr for FruitKind {
    type Err = UnknownFruit;

    /// Matches the storage key exactly, `"Apple"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FruitKind::ALL
            .into_iter()
            .find(|fruit| fruit.as_str() == s)
            .ok_or_else(|| UnknownFruit(s.to_owned()))
    }
}
