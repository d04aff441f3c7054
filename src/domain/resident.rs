use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a resident, unique within a community.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(String);

impl ResidentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResidentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A flat, addressed by building and flat number. Displays as `A-203`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub building: String,
    pub flat_number: String,
}

impl UnitId {
    pub fn new(building: impl Into<String>, flat_number: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            flat_number: flat_number.into(),
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.building, self.flat_number)
    }
}

/// A resident taking part in a bill split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    pub email: String,
    pub unit: UnitId,
    /// Weight used by size-based splits, typically square footage.
    pub unit_size: Option<Decimal>,
    /// Amount owed under a custom split, when the resident record carries one.
    pub custom_amount: Option<Decimal>,
}

impl Resident {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        unit: UnitId,
    ) -> Self {
        Self {
            id: ResidentId::new(id),
            name: name.into(),
            email: email.into(),
            unit,
            unit_size: None,
            custom_amount: None,
        }
    }

    pub fn with_unit_size(mut self, size: Decimal) -> Self {
        self.unit_size = Some(size);
        self
    }

    pub fn with_custom_amount(mut self, amount: Decimal) -> Self {
        self.custom_amount = Some(amount);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_display() {
        assert_eq!(UnitId::new("A", "203").to_string(), "A-203");
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let resident = Resident::new("r1", "Asha", "asha@example.com", UnitId::new("B", "12"))
            .with_unit_size(dec!(1150))
            .with_custom_amount(dec!(420.50));
        assert_eq!(resident.id.as_str(), "r1");
        assert_eq!(resident.unit_size, Some(dec!(1150)));
        assert_eq!(resident.custom_amount, Some(dec!(420.50)));
    }
}
