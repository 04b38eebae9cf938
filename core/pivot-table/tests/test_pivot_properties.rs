//! FILENAME: core/pivot-table/tests/test_pivot_properties.rs
//! PURPOSE: Structural guarantees of built tables over a larger dataset.

mod common;

use std::collections::HashMap;

use common::{field, SalesFixture, PRODUCTS, REGIONS};
use pivot_table::{
    AggregationType, NodeRef, NumberFormat, PivotDefinition, PivotField, PivotFieldFactory,
    PivotTable, PivotTableFactory, Record,
};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
}

fn all_nodes<'a>(root: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut nodes = vec![root];
    for child in root.children() {
        nodes.extend(all_nodes(child));
    }
    nodes
}

fn table() -> (SalesFixture, PivotTable) {
    let fixture = SalesFixture::new(240);
    let table = fixture.build(AggregationType::Sum);
    (fixture, table)
}

#[test]
fn test_build_is_idempotent() {
    let fixture = SalesFixture::new(120);
    let first = fixture.build(AggregationType::Average);
    let second = fixture.build(AggregationType::Average);

    assert_eq!(
        first.view(&NumberFormat::General),
        second.view(&NumberFormat::General)
    );
}

#[test]
fn test_sum_is_conserved() {
    let (fixture, table) = table();

    assert_close(table.result(), fixture.total());
    assert_close(table.root_column().result(), fixture.total());
    assert_close(table.root_row().result(), fixture.total());
    let cells: f64 = table.cells().iter().map(|c| c.result()).sum();
    assert_close(cells, fixture.total());
}

#[test]
fn test_parent_sums_children() {
    let (_, table) = table();
    for root in [table.root_column(), table.root_row()] {
        for node in all_nodes(root) {
            if node.is_leaf() {
                continue;
            }
            let children: f64 = node.children().map(|c| c.result()).sum();
            assert_close(node.result(), children);
        }
    }
}

#[test]
fn test_every_cell_pair_has_leaves() {
    let (_, table) = table();
    for cell in table.cells() {
        let column = table.columns().node(cell.column()).unwrap();
        let row = table.rows().node(cell.row()).unwrap();
        assert!(column.is_leaf());
        assert!(row.is_leaf());
        assert_eq!(column.path(table.path_separator()), cell.column_path());
        assert_eq!(row.path(table.path_separator()), cell.row_path());
    }
}

#[test]
fn test_leaf_totals_match_cells() {
    let (_, table) = table();
    for row in table.root_row().last_children() {
        let across: f64 = table
            .cells()
            .iter()
            .filter(|c| c.row() == row.id())
            .map(|c| c.result())
            .sum();
        assert_close(row.result(), across);
    }
}

#[test]
fn test_tree_shape() {
    let (_, table) = table();
    let rows = table.root_row();

    assert_eq!(rows.max_level(), 2);
    assert_eq!(rows.child_count(), REGIONS.len());
    assert_eq!(rows.children_at_level(2).len(), REGIONS.len() * PRODUCTS.len());
    assert_eq!(table.root_column().max_level(), 1);

    for node in all_nodes(rows) {
        let keys: Vec<_> = node.children().map(|c| c.key().unwrap()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted, "children of '{}' unsorted or duplicated", node.title());
    }
}

#[test]
fn test_paths_resolve() {
    let (_, table) = table();
    let node = table.root_row().find_by_keys(&["South", "Plums"]).unwrap();

    assert_eq!(node.path("/"), "South/Plums");
    assert_eq!(node.depth(), 2);
    assert_eq!(node.parent().unwrap().key(), Some("South"));
    assert!(table.find_cell_by_path("2024-Q3", "South/Plums").is_some());
}

#[test]
fn test_count_matches_records() {
    let fixture = SalesFixture::new(100);
    let table = fixture.build(AggregationType::Count);

    assert_eq!(table.result(), 100.0);
    let cells: u64 = table.cells().iter().map(|c| c.count()).sum();
    assert_eq!(cells, 100);
}

#[test]
fn test_key_field_keeps_repeated_records() {
    let mut fixture = SalesFixture::new(30);
    let repeated = fixture.dataset[..10].to_vec();
    fixture.dataset.extend(repeated);

    let table = fixture
        .factory()
        .with_key_field(PivotFieldFactory::integer("id").unwrap())
        .create()
        .unwrap()
        .unwrap();

    assert_eq!(table.aggregator().count(), 40);
    assert_close(table.result(), fixture.total());
}

#[test]
fn test_every_record_lands_in_one_cell() {
    let (fixture, table) = table();
    let factory = fixture.factory();
    let path = |fields: &[PivotField], record: &Record, index: usize| {
        fields
            .iter()
            .map(|f| f.key(record, index).unwrap().key)
            .collect::<Vec<_>>()
            .join("/")
    };

    let mut expected: HashMap<(String, String), f64> = HashMap::new();
    for (index, record) in fixture.dataset.iter().enumerate() {
        let column_path = path(factory.column_fields(), record, index);
        let row_path = path(factory.row_fields(), record, index);

        let matching = table
            .cells()
            .iter()
            .filter(|c| c.equals_path(&column_path, &row_path))
            .count();
        assert_eq!(matching, 1, "record {} matches {} cells", index, matching);

        let amount = record["amount"].to_number().unwrap();
        *expected.entry((column_path, row_path)).or_insert(0.0) += amount;
    }

    assert_eq!(expected.len(), table.cells().len());
    for ((column_path, row_path), sum) in &expected {
        let cell = table.find_cell_by_path(column_path, row_path).unwrap();
        assert_close(cell.result(), *sum);
    }
}

#[test]
fn test_definition_matches_builder() {
    let fixture = SalesFixture::new(60);
    let definition = PivotDefinition::from_json(
        r#"{
            "title": "Sales",
            "column_fields": [{ "name": "date", "title": "Quarter", "kind": "Quarter" }],
            "row_fields": ["region", "product"],
            "data_field": { "name": "amount", "kind": "Float" },
            "aggregation": "sum"
        }"#,
    )
    .unwrap();

    let from_json = PivotTableFactory::from_definition(&definition, fixture.dataset.clone())
        .unwrap()
        .create()
        .unwrap()
        .unwrap();
    let built = fixture.factory().with_title("Sales").create().unwrap().unwrap();

    assert_eq!(
        from_json.view(&definition.number_format),
        built.view(&definition.number_format)
    );
}

#[test]
fn test_columns_only() {
    let fixture = SalesFixture::new(24);
    let table = PivotTableFactory::instance(fixture.dataset.clone())
        .with_column_fields(vec![field("region"), field("product")])
        .unwrap()
        .with_data_field(PivotFieldFactory::float("amount").unwrap())
        .create()
        .unwrap()
        .unwrap();

    assert!(table.root_row().is_leaf());
    for cell in table.cells() {
        assert_eq!(cell.row_path(), "");
        assert_eq!(cell.row_key(), None);
    }
    assert_close(table.result(), fixture.total());
}
