#![allow(dead_code, unused_imports)]

pub mod mocks;

use std::{env::temp_dir, path::PathBuf};

use csv_field_mapper::csv_record;
use rand::distr::{Alphanumeric, SampleString};

pub use mocks::{failing_after, MockSink};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DummyData {
    pub name: String,
    pub number: i32,
    pub split_texts: Vec<String>,
}

csv_record!(DummyData {
    name: String,
    number: i32,
    split_texts: Vec<String> => { alias: "tags", separator: '|' },
});

pub fn dummy(name: &str, number: i32, tags: &[&str]) -> DummyData {
    DummyData {
        name: name.to_owned(),
        number,
        split_texts: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

/// Unique path under the system temp directory, not created.
pub fn random_csv_path() -> PathBuf {
    let file_name = Alphanumeric.sample_string(&mut rand::rng(), 16);
    temp_dir()
        .join("csv-field-mapper-tests")
        .join(format!("{}.csv", file_name))
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
