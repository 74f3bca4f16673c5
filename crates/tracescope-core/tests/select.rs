use rstest::rstest;
use tracescope_core::{extract_lineage, LineageRequest};

mod common;
use common::{column_triples, lineage};

#[test]
fn simple_select_owns_columns_by_sole_table() {
    let result = lineage("SELECT column0, column1 FROM table0");
    assert_eq!(result.table_names(), vec!["table0"]);
    assert_eq!(
        column_triples(&result),
        vec![("column0", "", "table0"), ("column1", "", "table0")]
    );
    assert!(!result.is_distinct);
    assert!(!result.is_top);
}

#[test]
fn table_and_column_aliases_are_recorded() {
    let result = lineage("SELECT o.id AS order_id, o.total FROM sales.dbo.orders AS o");
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].name, "orders");
    assert_eq!(result.tables[0].alias, "o");
    assert_eq!(
        column_triples(&result),
        vec![("id", "order_id", "orders"), ("total", "", "orders")]
    );
}

#[test]
fn multi_part_column_uses_table_part_as_qualifier() {
    let result = lineage("SELECT dbo.orders.id FROM dbo.orders");
    assert_eq!(column_triples(&result), vec![("id", "", "orders")]);
}

#[test]
fn wildcards_contribute_no_columns() {
    let result = lineage("SELECT *, o.* FROM orders o");
    assert_eq!(result.table_names(), vec!["orders"]);
    assert!(result.columns.is_empty());
}

#[test]
fn distinct_is_flagged() {
    let result = lineage("SELECT DISTINCT column0 FROM table0");
    assert!(result.is_distinct);
    assert!(!result.is_top);
}

#[rstest]
#[case("SELECT TOP 10 column0 FROM table0", false, 10)]
#[case("SELECT TOP (10) column0 FROM table0", false, 10)]
#[case("SELECT TOP 50 PERCENT column0 FROM table0", true, 50)]
#[case("SELECT TOP (@rows) column0 FROM table0", false, 0)]
fn top_filter_is_recorded(#[case] sql: &str, #[case] percent: bool, #[case] count: u64) {
    let result = lineage(sql);
    assert!(result.is_top);
    assert_eq!(result.is_top_percent, percent);
    assert_eq!(result.top_count, count);
    assert_eq!(column_triples(&result), vec![("column0", "", "table0")]);
}

#[test]
fn distinct_top_combination() {
    let result = lineage("SELECT DISTINCT TOP 3 column0 FROM table0");
    assert!(result.is_distinct);
    assert!(result.is_top);
    assert_eq!(result.top_count, 3);
}

#[test]
fn union_resolves_both_sides() {
    let result = lineage("SELECT column0 FROM table0 UNION SELECT column1 FROM table1");
    assert_eq!(result.table_names(), vec!["table0", "table1"]);
    assert_eq!(result.columns.len(), 2);
}

#[test]
fn chained_union_deduplicates_columns() {
    let result = lineage(
        "SELECT column0 FROM table0 UNION SELECT column1 FROM table1 UNION SELECT column1 FROM table2",
    );
    assert_eq!(result.tables.len(), 3);
    assert_eq!(result.columns.len(), 2);
}

#[test]
fn union_operands_each_contribute_selection_flags() {
    let result = lineage("SELECT a FROM t1 UNION ALL SELECT DISTINCT TOP 2 b FROM t2");
    assert!(result.is_distinct);
    assert!(result.is_top);
    assert_eq!(result.top_count, 2);
}

#[test]
fn long_union_all_chain_resolves() {
    let sql = (0..150)
        .map(|i| format!("SELECT c FROM t{i}"))
        .collect::<Vec<_>>()
        .join(" UNION ALL ");

    let result = extract_lineage(&LineageRequest::new(sql)).expect("flat chain should resolve");
    assert!(!result.has_errors());
    assert_eq!(result.tables.len(), 150);
    assert_eq!(result.tables[0].name, "t0");
    assert_eq!(result.tables[149].name, "t149");
    assert_eq!(
        column_triples(&result),
        vec![("c", "", "t0"), ("c", "", "")]
    );
}

#[test]
fn parenthesized_union_operands_keep_order() {
    let result = lineage("SELECT a FROM t1 UNION (SELECT b FROM t2 UNION SELECT c FROM t3)");
    assert_eq!(result.table_names(), vec!["t1", "t2", "t3"]);
    assert_eq!(result.column_names(), vec!["a", "b", "c"]);
}

#[test]
fn inner_join_orders_on_columns_before_select_list() {
    let result = lineage(
        "SELECT a.id, b.id, column1 FROM table_a a INNER JOIN table_b b ON a.id = b.id",
    );
    assert_eq!(result.column_names(), vec!["id", "id", "column1"]);
    assert_eq!(
        column_triples(&result),
        vec![
            ("id", "", "table_a"),
            ("id", "", "table_b"),
            ("column1", "", "")
        ]
    );
}

#[rstest]
#[case("LEFT JOIN")]
#[case("LEFT OUTER JOIN")]
#[case("RIGHT JOIN")]
#[case("FULL OUTER JOIN")]
fn outer_joins_resolve_like_inner_joins(#[case] join: &str) {
    let sql = format!("SELECT a.id FROM table_a a {join} table_b b ON a.id = b.a_id");
    let result = lineage(&sql);
    assert_eq!(result.table_names(), vec!["table_a", "table_b"]);
    assert_eq!(
        column_triples(&result),
        vec![("id", "", "table_a"), ("a_id", "", "table_b")]
    );
}

#[test]
fn parenthesized_joins_are_walked() {
    let result = lineage(
        "SELECT x FROM t1 JOIN (t2 JOIN t3 ON t2.k = t3.k) ON t1.k = t2.k",
    );
    assert_eq!(result.table_names(), vec!["t1", "t2", "t3"]);
    assert_eq!(
        column_triples(&result),
        vec![
            ("k", "", "t2"),
            ("k", "", "t3"),
            ("k", "", "t1"),
            ("x", "", "")
        ]
    );
}

#[test]
fn cross_apply_registers_no_on_columns() {
    let result = lineage("SELECT a.id FROM table_a a CROSS APPLY table_b b");
    assert_eq!(result.table_names(), vec!["table_a", "table_b"]);
    assert_eq!(column_triples(&result), vec![("id", "", "table_a")]);
}

#[rstest]
#[case("SELECT column0 FROM table0 WHERE column1 IN (SELECT column2 FROM table1 WHERE column3 IN (SELECT column4 FROM table2))")]
#[case("SELECT column0 FROM table0 WHERE column1 = (SELECT column2 FROM table1 WHERE column3 = (SELECT column4 FROM table2))")]
#[case("SELECT column0 FROM table0 WHERE column1 IN (SELECT column2 FROM table1 WHERE column3 = (SELECT column4 FROM table2))")]
fn nested_subqueries_are_resolved(#[case] sql: &str) {
    let result = lineage(sql);
    assert_eq!(result.table_names(), vec!["table0", "table1", "table2"]);
    assert_eq!(
        result.column_names(),
        vec!["column0", "column1", "column2", "column3", "column4"]
    );
    assert_eq!(result.columns[0].owning_table, "table0");
    assert_eq!(result.columns[1].owning_table, "table0");
    assert_eq!(result.columns[4].owning_table, "");
}

#[test]
fn aggregate_arguments_take_the_item_alias() {
    let result = lineage("SELECT COUNT(id) AS total, MAX(amount) FROM orders");
    assert_eq!(
        column_triples(&result),
        vec![("id", "total", "orders"), ("amount", "", "orders")]
    );
}

#[test]
fn literal_only_projection_has_no_columns() {
    let result = lineage("SELECT 1, 'x' FROM orders");
    assert_eq!(result.table_names(), vec!["orders"]);
    assert!(result.columns.is_empty());
}

#[test]
fn select_without_from_records_nothing() {
    let result = lineage("SELECT @@IDENTITY");
    assert!(result.tables.is_empty());
    assert!(result.columns.is_empty());
}

#[test]
fn derived_tables_are_not_registered() {
    let result = lineage("SELECT o.id FROM (SELECT x FROM inner_t) AS d JOIN outer_t o ON o.id = 1");
    assert_eq!(result.table_names(), vec!["outer_t"]);
}

#[test]
fn invalid_sql_yields_errors_and_no_lineage() {
    let result = extract_lineage(&LineageRequest::new("SELECT column0 FROM")).unwrap();
    assert!(result.has_errors());
    assert!(result.tables.is_empty());
    assert!(result.columns.is_empty());
    assert!(result.errors[0].to_string().starts_with("syntax error"));
}

#[test]
fn empty_script_is_empty_lineage() {
    let result = lineage("");
    assert!(result.tables.is_empty());
    assert!(result.columns.is_empty());
    assert_eq!(result.top_count, 0);
}
