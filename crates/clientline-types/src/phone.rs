use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::identity::NumberId;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\)\d{3}-\d{4}$").expect("phone pattern is valid"));

/// A phone number in `(DDD)DDD-DDDD` form.
///
/// The whole string must match: trailing or leading text such as an
/// extension (`(555)123-4567 x9`) is rejected rather than ignored.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: impl Into<String>) -> ValidationResult<Self> {
        let raw = raw.into();
        if PHONE_PATTERN.is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidPhoneNumber(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a client's `cellPhones` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneEntry {
    pub number_id: NumberId,
    pub number: PhoneNumber,
}

impl PhoneEntry {
    /// Build an entry with a freshly generated number id.
    pub fn new(number: PhoneNumber) -> Self {
        Self {
            number_id: NumberId::generate(),
            number,
        }
    }
}

/// The status tag carried by each submitted phone patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneStatus {
    Add,
    Update,
    Delete,
}

impl PhoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for PhoneStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(ValidationError::UnknownPhoneStatus(s.to_string())),
        }
    }
}

impl fmt::Display for PhoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operation against a client's phone list.
///
/// Each patch is dispatched independently: `Add` appends a new entry,
/// `Update` rewrites the number of the entry with the given id and
/// `Delete` removes it. Patches naming an id that is not on the client
/// match nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhonePatch {
    Add { number: PhoneNumber },
    Update { number_id: NumberId, number: PhoneNumber },
    Delete { number_id: NumberId },
}

impl PhonePatch {
    /// Build a patch from the loosely typed `{status, numberId, number}`
    /// triple submitted by API callers.
    pub fn from_parts(
        status: &str,
        number_id: Option<&str>,
        number: Option<&str>,
    ) -> ValidationResult<Self> {
        let status: PhoneStatus = status.parse()?;
        let require_id = || -> ValidationResult<NumberId> {
            number_id
                .ok_or(ValidationError::MissingPhoneField {
                    status: status.as_str(),
                    field: "numberId",
                })?
                .parse()
        };
        let require_number = || -> ValidationResult<PhoneNumber> {
            PhoneNumber::parse(number.ok_or(ValidationError::MissingPhoneField {
                status: status.as_str(),
                field: "number",
            })?)
        };

        match status {
            PhoneStatus::Add => Ok(Self::Add {
                number: require_number()?,
            }),
            PhoneStatus::Update => Ok(Self::Update {
                number_id: require_id()?,
                number: require_number()?,
            }),
            PhoneStatus::Delete => Ok(Self::Delete {
                number_id: require_id()?,
            }),
        }
    }

    pub fn status(&self) -> PhoneStatus {
        match self {
            Self::Add { .. } => PhoneStatus::Add,
            Self::Update { .. } => PhoneStatus::Update,
            Self::Delete { .. } => PhoneStatus::Delete,
        }
    }

    /// Apply this patch to a phone list in place.
    ///
    /// Returns `true` if the list changed.
    pub fn apply(&self, phones: &mut Vec<PhoneEntry>) -> bool {
        match self {
            Self::Add { number } => {
                phones.push(PhoneEntry::new(number.clone()));
                true
            }
            Self::Update { number_id, number } => {
                match phones.iter_mut().find(|p| p.number_id == *number_id) {
                    Some(entry) => {
                        entry.number = number.clone();
                        true
                    }
                    None => false,
                }
            }
            Self::Delete { number_id } => {
                let before = phones.len();
                phones.retain(|p| p.number_id != *number_id);
                phones.len() != before
            }
        }
    }
}
