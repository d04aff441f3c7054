use crate::domain::allocation::{Allocation, PaymentStatus};
use crate::domain::money::Money;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AllocationRecord<'a> {
    resident_id: &'a str,
    resident_name: &'a str,
    resident_email: &'a str,
    building: &'a str,
    flat_number: &'a str,
    amount: Money,
    status: PaymentStatus,
}

impl<'a> From<&'a Allocation> for AllocationRecord<'a> {
    fn from(allocation: &'a Allocation) -> Self {
        Self {
            resident_id: allocation.resident_id.as_str(),
            resident_name: &allocation.resident_name,
            resident_email: &allocation.resident_email,
            building: &allocation.building,
            flat_number: &allocation.flat_number,
            amount: allocation.amount,
            status: allocation.status,
        }
    }
}

/// Writes allocations as CSV, one row per resident, in the order given.
pub struct AllocationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AllocationWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_allocations<'a, I>(&mut self, allocations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Allocation>,
    {
        for allocation in allocations {
            self.writer.serialize(AllocationRecord::from(allocation))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
