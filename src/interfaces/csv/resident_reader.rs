use crate::domain::resident::{Resident, ResidentId, UnitId};
use crate::error::{AllocationError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One line of a resident roster.
#[derive(Debug, Deserialize)]
struct ResidentRecord {
    id: String,
    name: String,
    email: String,
    building: String,
    flat_number: String,
    unit_size: Option<Decimal>,
    custom_amount: Option<Decimal>,
}

impl From<ResidentRecord> for Resident {
    fn from(record: ResidentRecord) -> Self {
        Self {
            id: ResidentId::new(record.id),
            name: record.name,
            email: record.email,
            unit: UnitId::new(record.building, record.flat_number),
            unit_size: record.unit_size,
            custom_amount: record.custom_amount,
        }
    }
}

/// Reads a resident roster from a CSV source.
///
/// Expects the header `id,name,email,building,flat_number,unit_size,custom_amount`.
/// Whitespace is trimmed and the two trailing columns may be left empty.
pub struct ResidentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ResidentReader<R> {
    /// Creates a new `ResidentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes residents.
    pub fn residents(self) -> impl Iterator<Item = Result<Resident>> {
        self.reader
            .into_deserialize::<ResidentRecord>()
            .map(|result| result.map(Resident::from).map_err(AllocationError::from))
    }

    /// Reads the whole roster, stopping at the first malformed line.
    ///
    /// A bill split needs every resident, so a roster with a bad line is rejected
    /// as a whole.
    pub fn read_all(self) -> Result<Vec<Resident>> {
        self.residents().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "id, name, email, building, flat_number, unit_size, custom_amount\n\
                    r1, Asha, asha@example.com, A, 203, 1150, 400.50\n\
                    r2, Ravi, ravi@example.com, B, 12, , ";
        let residents = ResidentReader::new(data.as_bytes()).read_all().unwrap();

        assert_eq!(residents.len(), 2);
        assert_eq!(residents[0].id, ResidentId::from("r1"));
        assert_eq!(residents[0].unit.to_string(), "A-203");
        assert_eq!(residents[0].unit_size, Some(dec!(1150)));
        assert_eq!(residents[0].custom_amount, Some(dec!(400.50)));
        assert_eq!(residents[1].unit_size, None);
        assert_eq!(residents[1].custom_amount, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "id, name, email, building, flat_number, unit_size, custom_amount\n\
                    r1, Asha, asha@example.com, A, 203, big, ";
        let results: Vec<Result<Resident>> =
            ResidentReader::new(data.as_bytes()).residents().collect();

        assert!(matches!(results[0], Err(AllocationError::CsvError(_))));
    }
}
