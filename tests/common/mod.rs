use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes a roster of `rows` residents with random unit sizes and custom amounts.
pub fn generate_roster(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = rand::thread_rng();

    wtr.write_record([
        "id",
        "name",
        "email",
        "building",
        "flat_number",
        "unit_size",
        "custom_amount",
    ])?;

    for i in 1..=rows {
        let building = ["A", "B", "C", "D"][i % 4];
        let size: u32 = rng.gen_range(450..=2400);
        let custom: u32 = rng.gen_range(100..=5000);
        wtr.write_record([
            format!("r{i}"),
            format!("Resident {i}"),
            format!("resident{i}@example.com"),
            building.to_string(),
            format!("{}", 100 + i),
            size.to_string(),
            format!("{custom}.50"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
