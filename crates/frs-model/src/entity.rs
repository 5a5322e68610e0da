//! The fixed three-level FRS entity hierarchy.
//!
//! Every survey table belongs to exactly one level: households contain
//! benefit units, which contain people. Tables are keyed by the synthetic
//! identifier of their level (see [`crate::ids`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Household serial number column.
pub const SERIAL_COLUMN: &str = "SERNUM";
/// Benefit unit number within the household.
pub const BENUNIT_COLUMN: &str = "BENUNIT";
/// Person number within the benefit unit.
pub const PERSON_COLUMN: &str = "PERSON";
/// Fallback person column used by tables describing care needs.
pub const NEED_PERSON_COLUMN: &str = "NEEDPER";

/// Person-number candidates, in lookup order.
pub const PERSON_NUMBER_COLUMNS: &[&str] = &[PERSON_COLUMN, NEED_PERSON_COLUMN];

/// Columns used only to derive identifiers; removed after indexing.
pub const ADMIN_COLUMNS: &[&str] = &[
    SERIAL_COLUMN,
    BENUNIT_COLUMN,
    PERSON_COLUMN,
    "ISSUE",
    "MONTH",
];

/// Default grossing weight column.
pub const WEIGHT_COLUMN: &str = "GROSS4";

/// Adult age candidates, in lookup order.
pub const AGE_COLUMNS: &[&str] = &["AGE80", "AGE"];

const HOUSEHOLD_TABLES: &[&str] = &[
    "househol", "renter", "mortgage", "mortcont", "owner", "endowmnt",
];
const BENUNIT_TABLES: &[&str] = &["benunit", "extchild"];
const PERSON_TABLES: &[&str] = &[
    "adult", "child", "accounts", "assets", "benefits", "care", "chldcare", "govpay", "job",
    "maint", "oddjob", "pension", "penprov",
];

/// Level of the entity hierarchy a table is keyed at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityLevel {
    Household,
    Benunit,
    Person,
}

impl EntityLevel {
    pub const ALL: [EntityLevel; 3] = [
        EntityLevel::Household,
        EntityLevel::Benunit,
        EntityLevel::Person,
    ];

    /// Name of the identifier column for this level.
    pub fn id_column(self) -> &'static str {
        match self {
            EntityLevel::Household => "household_id",
            EntityLevel::Benunit => "benunit_id",
            EntityLevel::Person => "person_id",
        }
    }

    pub fn from_id_column(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.id_column().eq_ignore_ascii_case(name.trim()))
    }

    /// This level and every level above it, outermost first.
    pub fn lineage(self) -> &'static [EntityLevel] {
        match self {
            EntityLevel::Household => &Self::ALL[..1],
            EntityLevel::Benunit => &Self::ALL[..2],
            EntityLevel::Person => &Self::ALL[..],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityLevel::Household => "household",
            EntityLevel::Benunit => "benunit",
            EntityLevel::Person => "person",
        }
    }
}

impl fmt::Display for EntityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "household" => Ok(EntityLevel::Household),
            "benunit" | "benefit_unit" => Ok(EntityLevel::Benunit),
            "person" => Ok(EntityLevel::Person),
            _ => Err(ModelError::UnknownEntityLevel(s.to_string())),
        }
    }
}

/// Classifies a raw FRS table by name.
///
/// Returns `None` for tables outside the known release layout; callers fall
/// back to inferring the level from the columns present.
pub fn classify_table(table_name: &str) -> Option<EntityLevel> {
    let name = table_name.trim().to_ascii_lowercase();
    if HOUSEHOLD_TABLES.contains(&name.as_str()) {
        Some(EntityLevel::Household)
    } else if BENUNIT_TABLES.contains(&name.as_str()) {
        Some(EntityLevel::Benunit)
    } else if PERSON_TABLES.contains(&name.as_str()) {
        Some(EntityLevel::Person)
    } else {
        None
    }
}
