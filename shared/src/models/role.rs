//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role issued by the server.
///
/// Capabilities are ordered: `Admin` can do everything a `Librarian` can,
/// and a `Librarian` everything a `Student` can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Librarian,
    #[default]
    Student,
}

impl Role {
    /// Whether the role has administrator capabilities
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role has librarian capabilities (admins included)
    pub fn is_librarian(self) -> bool {
        matches!(self, Self::Admin | Self::Librarian)
    }

    /// Wire name of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Librarian => "LIBRARIAN",
            Self::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
