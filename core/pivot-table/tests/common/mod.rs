//! FILENAME: core/pivot-table/tests/common/mod.rs
//! Shared fixtures for the pivot-table integration tests.

#![allow(dead_code)]

use pivot_table::{
    record, AggregationType, Dataset, PivotField, PivotFieldFactory, PivotTable,
    PivotTableFactory, PivotValue, Record,
};

pub const REGIONS: [&str; 3] = ["North", "South", "West"];
pub const PRODUCTS: [&str; 4] = ["Apples", "Pears", "Plums", "Cherries"];

/// A deterministic sales dataset: id, region, product, date, qty, amount.
pub struct SalesFixture {
    pub dataset: Dataset,
}

impl SalesFixture {
    /// `rows` sales spread over every region, product and quarter of 2024.
    pub fn new(rows: usize) -> Self {
        let dataset = (0..rows).map(sale).collect();
        SalesFixture { dataset }
    }

    /// The two-record dataset used by the basic scenario.
    pub fn two_rows() -> Dataset {
        vec![
            record([
                ("state", PivotValue::from("State 1")),
                ("group", PivotValue::from("Group 1")),
                ("category", PivotValue::from("Category 1")),
                ("amount", PivotValue::from(25.0)),
            ]),
            record([
                ("state", PivotValue::from("State 2")),
                ("group", PivotValue::from("Group 2")),
                ("category", PivotValue::from("Category 2")),
                ("amount", PivotValue::from(125.0)),
            ]),
        ]
    }

    /// Sum of `amount` over the whole dataset.
    pub fn total(&self) -> f64 {
        self.dataset
            .iter()
            .filter_map(|r| r.get("amount").and_then(PivotValue::to_number))
            .sum()
    }

    /// Region x (product) by quarter, summing amount.
    pub fn factory(&self) -> PivotTableFactory {
        PivotTableFactory::instance(self.dataset.clone())
            .with_column_fields(vec![PivotFieldFactory::quarter_titled("date", "Quarter").unwrap()])
            .unwrap()
            .with_row_fields(vec![field("region"), field("product")])
            .unwrap()
            .with_data_field(PivotFieldFactory::float("amount").unwrap())
    }

    pub fn build(&self, aggregation: AggregationType) -> PivotTable {
        self.factory()
            .with_aggregation(aggregation)
            .create()
            .expect("build failed")
            .expect("configuration is valid")
    }
}

pub fn field(name: &str) -> PivotField {
    PivotFieldFactory::default(name).unwrap()
}

fn sale(i: usize) -> Record {
    let month = (i % 12) as u32 + 1;
    let day = (i % 28) as u32 + 1;
    record([
        ("id", PivotValue::from(i as i64)),
        ("region", PivotValue::from(REGIONS[i % REGIONS.len()])),
        ("product", PivotValue::from(PRODUCTS[(i / 3) % PRODUCTS.len()])),
        ("date", PivotValue::text(format!("2024-{:02}-{:02}", month, day))),
        ("qty", PivotValue::from((i % 7 + 1) as i64)),
        ("amount", PivotValue::from(((i * 37) % 500) as f64 + 0.25)),
    ])
}
