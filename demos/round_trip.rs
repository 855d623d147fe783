use std::{env::temp_dir, fmt, fs};

use csv_field_mapper::{
    csv_record, error::CsvError, item::csv::csv_processor::CsvProcessor,
};
use log::info;

#[derive(Debug, Default, Clone, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
    features: Vec<String>,
}

csv_record!(Car {
    year: u16,
    make: String => { alias: "brand" },
    model: String,
    features: Vec<String> => { separator: '|' },
});

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(year={}, make={}, model={}, features={})",
            self.year,
            self.make,
            self.model,
            self.features.join("/")
        )
    }
}

fn main() -> Result<(), CsvError> {
    env_logger::init();

    let dir = temp_dir().join("csv-field-mapper-demo");
    let path = dir.join("cars.csv");
    fs::create_dir_all(&dir)?;
    fs::write(
        &path,
        "brand, model, year, features
Porsche, 356, 1948, roadster|rear engine
Ford, Mustang, 1967, fastback",
    )?;

    let processor = CsvProcessor::<Car>::new(&path);

    let cars = processor.read_file()?;
    for car in &cars {
        info!("Read {}", car);
    }

    processor.write_to_file(&[Car {
        year: 2021,
        make: "Mazda".to_owned(),
        model: "CX-30".to_owned(),
        features: vec!["suv".to_owned(), "compact".to_owned()],
    }])?;

    println!("{}", fs::read_to_string(&path)?);

    fs::remove_dir_all(&dir)?;
    Ok(())
}
