pub mod allocation_writer;
pub mod resident_reader;
