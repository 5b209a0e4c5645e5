use chrono::{DateTime, NaiveDate, Utc};
use orderlens_core::metrics::customer;
use orderlens_core::period::AnalyticsPeriod;
use orderlens_core::records::{CustomerLifetime, OrderRecord, OrderStatus};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("timestamp")
}

fn order(id: &str, phone: &str, at: &str) -> OrderRecord {
    OrderRecord {
        id: id.into(),
        branch_id: "downtown".into(),
        customer_phone: phone.into(),
        placed_at: ts(at),
        status: OrderStatus::Completed,
        total_amount: 12.0,
    }
}

fn lifetime(phone: &str, first_at: &str, orders: u64, spend: f64) -> CustomerLifetime {
    CustomerLifetime {
        phone: phone.into(),
        first_order_at: ts(first_at),
        order_count: orders,
        total_spend: spend,
    }
}

fn june() -> AnalyticsPeriod {
    AnalyticsPeriod::new(
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    )
    .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// New customers are those whose first-ever order lands inside the range;
/// earlier regulars do not count as new again.
#[test]
fn new_customers_come_from_first_order_dates() {
    let lifetimes = vec![
        lifetime("555-0001", "2026-03-10T09:00:00Z", 8, 96.0),
        lifetime("555-0002", "2026-06-05T10:00:00Z", 1, 12.0),
        lifetime("555-0003", "2026-06-20T11:00:00Z", 2, 24.0),
    ];
    let orders = vec![
        order("o1", "555-0001", "2026-06-02T09:00:00Z"),
        order("o2", "555-0002", "2026-06-05T10:00:00Z"),
        order("o3", "555-0003", "2026-06-20T11:00:00Z"),
        order("o4", "555-0003", "2026-06-22T11:00:00Z"),
    ];

    let summary = customer::summarize(&orders, &lifetimes, &june());

    assert_eq!(summary.total_customers, 3, "all-history population");
    assert_eq!(summary.new_customers, 2, "0002 and 0003 first ordered in June");
    assert_eq!(
        summary.returning_customers, 1,
        "only 0003 ordered twice inside the range"
    );
}

/// Lifetime value averages all-history spend over the whole population.
#[test]
fn lifetime_value_is_mean_spend() {
    let lifetimes = vec![
        lifetime("555-0001", "2026-01-01T09:00:00Z", 10, 150.0),
        lifetime("555-0002", "2026-02-01T09:00:00Z", 2, 30.0),
    ];
    let orders = vec![order("o1", "555-0001", "2026-06-02T09:00:00Z")];

    let summary = customer::summarize(&orders, &lifetimes, &june());

    assert!(
        (summary.customer_lifetime_value - 90.0).abs() < 1e-9,
        "(150 + 30) / 2, got {}",
        summary.customer_lifetime_value
    );
}

/// Repeat rate is returning customers over the whole population; orders
/// per customer divides by the customers active in range.
#[test]
fn rates_use_their_documented_denominators() {
    let lifetimes = vec![
        lifetime("555-0001", "2026-01-01T09:00:00Z", 10, 150.0),
        lifetime("555-0002", "2026-02-01T09:00:00Z", 3, 45.0),
        lifetime("555-0003", "2026-03-01T09:00:00Z", 1, 15.0),
        lifetime("555-0004", "2026-04-01T09:00:00Z", 1, 15.0),
    ];
    let orders = vec![
        order("o1", "555-0001", "2026-06-02T09:00:00Z"),
        order("o2", "555-0001", "2026-06-09T09:00:00Z"),
        order("o3", "555-0002", "2026-06-10T09:00:00Z"),
    ];

    let summary = customer::summarize(&orders, &lifetimes, &june());

    assert!(
        (summary.repeat_customer_rate - 25.0).abs() < 1e-9,
        "1 returning of 4 total, got {}",
        summary.repeat_customer_rate
    );
    assert!(
        (summary.avg_orders_per_customer - 1.5).abs() < 1e-9,
        "3 orders over 2 active customers, got {}",
        summary.avg_orders_per_customer
    );
}

/// An empty scope produces zeros across the board.
#[test]
fn empty_scope_is_all_zeros() {
    let summary = customer::summarize(&[], &[], &june());

    assert_eq!(summary.total_customers, 0);
    assert_eq!(summary.new_customers, 0);
    assert_eq!(summary.returning_customers, 0);
    assert_eq!(summary.customer_lifetime_value, 0.0);
    assert_eq!(summary.repeat_customer_rate, 0.0);
    assert_eq!(summary.avg_orders_per_customer, 0.0);
}
