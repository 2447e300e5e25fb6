use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::DrapeError;

/// A named perspective of a customizable product.
///
/// The set is fixed and ordered; [`View::ALL`] is the order batch export walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum View {
    /// Front of the garment (default view).
    Front,
    /// Back of the garment.
    Back,
    /// Left sleeve.
    LeftSleeve,
    /// Right sleeve.
    RightSleeve,
    /// Label printed inside the neck.
    InsideLabel,
    /// Label sewn on the outside.
    OutsideLabel,
}

impl View {
    /// Every view, in export order.
    pub const ALL: [View; 6] = [
        View::Front,
        View::Back,
        View::LeftSleeve,
        View::RightSleeve,
        View::InsideLabel,
        View::OutsideLabel,
    ];

    /// View shown when a product is first opened.
    pub const DEFAULT: View = View::Front;

    /// Human-readable name used by the UI shell.
    pub fn label(self) -> &'static str {
        match self {
            View::Front => "Front",
            View::Back => "Back",
            View::LeftSleeve => "Left sleeve",
            View::RightSleeve => "Right sleeve",
            View::InsideLabel => "Inside label",
            View::OutsideLabel => "Outside label",
        }
    }

    /// Key used by catalog records and design documents.
    pub fn key(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::LeftSleeve => "leftSleeve",
            View::RightSleeve => "rightSleeve",
            View::InsideLabel => "insideLabel",
            View::OutsideLabel => "outsideLabel",
        }
    }

    /// File stem used inside export archives.
    pub fn file_stem(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::LeftSleeve => "left_sleeve",
            View::RightSleeve => "right_sleeve",
            View::InsideLabel => "inside_label",
            View::OutsideLabel => "outside_label",
        }
    }

    /// Position of the view in [`View::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for View {
    type Err = DrapeError;

    /// Accepts labels, keys and file stems regardless of case (`"Left sleeve"`, `"leftSleeve"`,
    /// `"left_sleeve"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "front" => Ok(View::Front),
            "back" => Ok(View::Back),
            "leftsleeve" => Ok(View::LeftSleeve),
            "rightsleeve" => Ok(View::RightSleeve),
            "insidelabel" => Ok(View::InsideLabel),
            "outsidelabel" => Ok(View::OutsideLabel),
            _ => Err(DrapeError::validation(format!("unknown view '{s}'"))),
        }
    }
}

impl Serialize for View {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/view.rs"]
mod tests;
