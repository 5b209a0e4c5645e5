use chrono::{DateTime, Utc};
use orderlens_core::basket;
use orderlens_core::records::{OrderItemRecord, OrderRecord, OrderStatus};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn order(id: &str, status: OrderStatus) -> OrderRecord {
    OrderRecord {
        id: id.into(),
        branch_id: "downtown".into(),
        customer_phone: "555-0001".into(),
        placed_at: "2026-06-01T09:00:00Z".parse::<DateTime<Utc>>().expect("timestamp"),
        status,
        total_amount: 10.0,
    }
}

fn line(order_id: &str, product_id: &str) -> OrderItemRecord {
    OrderItemRecord {
        order_id: order_id.into(),
        product_id: product_id.into(),
        product_name: product_id.to_uppercase(),
        quantity: 1,
        unit_price: 4.0,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Two orders holding {A, B} and one holding only {A}: the pair counts 2,
/// the single-product order stays out of the denominator, support is 1.0.
#[test]
fn pair_counts_and_support_denominator() {
    let orders = vec![
        order("o1", OrderStatus::Completed),
        order("o2", OrderStatus::Completed),
        order("o3", OrderStatus::Completed),
    ];
    let items = vec![
        line("o1", "p-a"),
        line("o1", "p-b"),
        line("o2", "p-a"),
        line("o2", "p-b"),
        line("o3", "p-a"),
    ];

    let report = basket::analyze(&orders, &items, 1);

    assert_eq!(
        report.total_orders_analyzed, 2,
        "only multi-product orders count"
    );
    assert_eq!(report.combinations.len(), 1);
    let pair = &report.combinations[0];
    assert_eq!(pair.products, ["p-a".to_string(), "p-b".to_string()]);
    assert_eq!(pair.co_order_count, 2);
    assert!(
        (pair.support_rate - 1.0).abs() < 1e-9,
        "2 of 2 analyzed orders, got {}",
        pair.support_rate
    );
}

/// Two latte lines in one order are one latte for pairing purposes.
#[test]
fn duplicate_lines_collapse_per_order() {
    let orders = vec![order("o1", OrderStatus::Completed)];
    let items = vec![
        line("o1", "p-latte"),
        line("o1", "p-latte"),
        line("o1", "p-scone"),
    ];

    let report = basket::analyze(&orders, &items, 1);

    assert_eq!(report.combinations.len(), 1);
    assert_eq!(
        report.combinations[0].co_order_count, 1,
        "duplicate lines must not inflate the pair"
    );
}

/// A pair is reported once, in ascending id order, never mirrored.
#[test]
fn pairs_have_one_orientation() {
    let orders = vec![
        order("o1", OrderStatus::Completed),
        order("o2", OrderStatus::Completed),
    ];
    // The same two products arrive in opposite line order per order.
    let items = vec![
        line("o1", "p-z"),
        line("o1", "p-a"),
        line("o2", "p-a"),
        line("o2", "p-z"),
    ];

    let report = basket::analyze(&orders, &items, 1);

    assert_eq!(report.combinations.len(), 1, "one row for the unordered pair");
    assert_eq!(
        report.combinations[0].products,
        ["p-a".to_string(), "p-z".to_string()],
        "ids are stored ascending"
    );
    assert_eq!(report.combinations[0].co_order_count, 2);
}

/// Pairs below the threshold are dropped; a threshold of 0 behaves as 1.
#[test]
fn min_count_filters_rare_pairs() {
    let orders = vec![
        order("o1", OrderStatus::Completed),
        order("o2", OrderStatus::Completed),
    ];
    let items = vec![
        line("o1", "p-a"),
        line("o1", "p-b"),
        line("o2", "p-a"),
        line("o2", "p-b"),
        line("o2", "p-c"),
    ];

    let strict = basket::analyze(&orders, &items, 2);
    assert_eq!(strict.combinations.len(), 1, "only (a, b) reaches 2 co-orders");
    assert_eq!(strict.combinations[0].products[1], "p-b");

    let lax = basket::analyze(&orders, &items, 0);
    assert_eq!(lax.combinations.len(), 3, "threshold 0 behaves as 1");
}

/// Cancelled orders never feed baskets or the denominator.
#[test]
fn cancelled_orders_are_ignored() {
    let orders = vec![
        order("o1", OrderStatus::Cancelled),
        order("o2", OrderStatus::Completed),
    ];
    let items = vec![
        line("o1", "p-a"),
        line("o1", "p-b"),
        line("o2", "p-a"),
    ];

    let report = basket::analyze(&orders, &items, 1);

    assert_eq!(report.total_orders_analyzed, 0);
    assert!(report.combinations.is_empty());
}

/// Busier pairs rank first; equal counts keep ascending id order.
#[test]
fn combinations_sort_by_count_then_ids() {
    let orders = vec![
        order("o1", OrderStatus::Completed),
        order("o2", OrderStatus::Completed),
        order("o3", OrderStatus::Completed),
    ];
    let items = vec![
        line("o1", "p-a"),
        line("o1", "p-b"),
        line("o2", "p-a"),
        line("o2", "p-b"),
        line("o3", "p-b"),
        line("o3", "p-c"),
    ];

    let report = basket::analyze(&orders, &items, 1);

    let pairs: Vec<(&str, &str, u64)> = report
        .combinations
        .iter()
        .map(|c| (c.products[0].as_str(), c.products[1].as_str(), c.co_order_count))
        .collect();
    assert_eq!(
        pairs,
        vec![("p-a", "p-b", 2), ("p-b", "p-c", 1)],
        "count descending, then pair ids ascending"
    );
}
