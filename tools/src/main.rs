//! report-runner: headless report generator for OrderLens.
//!
//! Usage:
//!   report-runner --seed 12345 --db demo.db
//!   report-runner --branch downtown --start 2026-06-01 --end 2026-06-30
//!   report-runner --compare --granularity WEEK --min-count 2 --json
//!
//! Seeds a demo order store (unless the database already holds rows), runs
//! every report against it, and prints the results. With --json the whole
//! report set is emitted as a single JSON document on stdout.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::json;

use orderlens_core::basket::BasketReport;
use orderlens_core::cohort::CohortReport;
use orderlens_core::compare::AnalyticsView;
use orderlens_core::config::SeedProfile;
use orderlens_core::engine::{AnalyticsEngine, DashboardReport};
use orderlens_core::hourly::HourlyDemandReport;
use orderlens_core::period::Granularity;
use orderlens_core::request::{AnalyticsRequest, Scope};
use orderlens_core::rfm::RfmReport;
use orderlens_core::seed;
use orderlens_core::store::OrderStore;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let min_count = parse_arg(&args, "--min-count", 2u64);
    let compare = args.iter().any(|a| a == "--compare");
    let json_out = args.iter().any(|a| a == "--json");
    let db = parse_str(&args, "--db").unwrap_or_else(|| ":memory:".to_string());
    let granularity = match parse_str(&args, "--granularity") {
        Some(raw) => Granularity::parse(&raw)?,
        None => Granularity::Week,
    };
    let as_of_date = match parse_str(&args, "--as-of") {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{raw}'"))?,
        None => Utc::now().date_naive(),
    };
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let as_of = as_of_date.and_time(noon).and_utc();

    let mut profile = match parse_str(&args, "--profile") {
        Some(path) => SeedProfile::load(&path)?,
        None => SeedProfile::default_demo(),
    };
    profile.days = parse_arg(&args, "--days", profile.days);

    let scope = match parse_str(&args, "--branch") {
        Some(id) => Scope::branch(id),
        None => Scope::Brand {
            brand_id: "demo-brand".to_string(),
            branch_ids: profile.branches.clone(),
        },
    };
    let scope_label = match &scope {
        Scope::Branch { branch_id } => branch_id.clone(),
        Scope::Brand {
            brand_id,
            branch_ids,
        } => format!("{brand_id} ({} branches)", branch_ids.len()),
    };

    let store = if db == ":memory:" {
        OrderStore::in_memory()?
    } else {
        OrderStore::open(&db)?
    };
    store.migrate()?;

    // A file database that already holds orders is reused as-is; seeding
    // again would collide on order ids.
    let stats = if store.order_count()? > 0 {
        log::info!("database {db} already seeded, reusing its rows");
        None
    } else {
        Some(seed::seed_store(&store, &profile, seed, as_of_date)?)
    };

    if !json_out {
        println!("OrderLens report-runner");
        println!("  seed:   {seed}");
        println!("  db:     {db}");
        println!("  scope:  {scope_label}");
        println!("  as of:  {as_of_date}");
        if let Some(stats) = &stats {
            println!(
                "  seeded: {} orders / {} items, {} .. {}",
                stats.orders, stats.items, stats.first_date, stats.last_date
            );
        }
        println!();
    }

    let mut request = AnalyticsRequest::new(scope, as_of);
    request.start_date = parse_str(&args, "--start");
    request.end_date = parse_str(&args, "--end");
    request.compare = compare;

    let stock_levels = seed::stock_levels(&profile);
    let engine = AnalyticsEngine::new(store);

    let dashboard = engine.dashboard(&request, &stock_levels)?;
    let hourly = engine.hourly_report(&request)?;
    let basket = engine.basket_report(&request, min_count)?;
    let cohorts = engine.cohort_report(&request, granularity)?;
    let rfm = engine.rfm_report(&request)?;

    // The dashboard carries plain current-period summaries; comparisons
    // come from the per-section reports.
    let section_views = if compare {
        Some((
            engine.sales_report(&request)?,
            engine.product_report(&request, &stock_levels)?,
            engine.order_report(&request)?,
            engine.customer_report(&request)?,
            engine.abc_report(&request)?,
        ))
    } else {
        None
    };

    if json_out {
        let mut doc = json!({
            "seed": seed,
            "dashboard": dashboard,
            "hourly_demand": hourly,
            "basket": basket,
            "cohorts": cohorts,
            "rfm": rfm,
        });
        if let Some((sales, products, orders, customers, abc)) = &section_views {
            doc["comparisons"] = json!({
                "sales": sales,
                "products": products,
                "orders": orders,
                "customers": customers,
                "abc": abc,
            });
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    print_report(&dashboard, &hourly, &basket, &cohorts, &rfm);

    if let Some((sales, products, orders, customers, abc)) = &section_views {
        println!("=== VS PREVIOUS PERIOD ===");
        print_changes("sales", sales);
        print_changes("products", products);
        print_changes("orders", orders);
        print_changes("customers", customers);
        print_changes("abc", abc);
        print_changes("hourly", &hourly);
        print_changes("basket", &basket);
        print_changes("cohorts", &cohorts);
        print_changes("rfm", &rfm);
    }
    Ok(())
}

fn print_report(
    dashboard: &DashboardReport,
    hourly: &AnalyticsView<HourlyDemandReport>,
    basket: &AnalyticsView<BasketReport>,
    cohorts: &AnalyticsView<CohortReport>,
    rfm: &AnalyticsView<RfmReport>,
) {
    println!("=== SALES ===");
    println!("  period:          {} .. {}", dashboard.period.start, dashboard.period.end);
    println!("  revenue:         ${:.2}", dashboard.sales.total_revenue);
    println!("  orders:          {}", dashboard.sales.order_count);
    println!("  avg order value: ${:.2}", dashboard.sales.avg_order_value);

    println!("=== TOP PRODUCTS ===");
    for (rank, product) in dashboard.products.top_products.iter().enumerate().take(5) {
        println!(
            "  {}. {:<22} x{:<5} ${:>9.2}  {:>5.1}%",
            rank + 1,
            product.product_name,
            product.quantity,
            product.revenue,
            product.revenue_percentage
        );
    }
    println!(
        "  inventory turnover: {:.2} over {} days",
        dashboard.products.inventory_turnover.average_turnover_rate,
        dashboard.products.inventory_turnover.period_days
    );

    println!("=== ABC CLASSIFICATION ===");
    for grade in &dashboard.abc.summary {
        println!(
            "  {:?}: {:>3} products  {:>5.1}% of revenue",
            grade.grade, grade.count, grade.revenue_percentage
        );
    }

    println!("=== ORDER MIX ===");
    for slice in &dashboard.orders.status_distribution {
        println!(
            "  {:<10} {:>5}  {:>5.1}%",
            slice.status.as_str(),
            slice.count,
            slice.percentage
        );
    }
    let mut busiest: Vec<_> = dashboard.orders.peak_hours.iter().collect();
    busiest.sort_by(|a, b| b.order_count.cmp(&a.order_count).then(a.hour.cmp(&b.hour)));
    let labels: Vec<String> = busiest
        .iter()
        .take(3)
        .map(|h| format!("{:02}:00 ({})", h.hour, h.order_count))
        .collect();
    println!("  peak hours: {}", labels.join(", "));

    println!("=== CUSTOMERS ===");
    println!(
        "  total {} / new {} / returning {} ({:.1}%)",
        dashboard.customers.total_customers,
        dashboard.customers.new_customers,
        dashboard.customers.returning_customers,
        dashboard.customers.repeat_customer_rate
    );
    println!(
        "  lifetime value ${:.2}, {:.2} orders per customer",
        dashboard.customers.customer_lifetime_value,
        dashboard.customers.avg_orders_per_customer
    );

    if dashboard.by_branch.len() > 1 {
        println!("=== BY BRANCH ===");
        for row in &dashboard.by_branch {
            println!(
                "  {:<14} ${:>10.2}  {:>5} orders",
                row.branch_id, row.revenue, row.order_count
            );
        }
    }

    println!("=== HOURLY DEMAND ===");
    let mut slots: Vec<_> = hourly.data().hourly_data.iter().collect();
    slots.sort_by(|a, b| b.total_orders.cmp(&a.total_orders).then(a.hour.cmp(&b.hour)));
    for slot in slots.iter().take(4) {
        let top = slot
            .top_products
            .first()
            .map(|p| format!("{} x{}", p.product_name, p.quantity))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:02}:00  {:>4} orders  top: {}",
            slot.hour, slot.total_orders, top
        );
    }

    let pairs = basket.data();
    println!("=== BASKET PAIRS ===");
    println!("  orders analyzed: {}", pairs.total_orders_analyzed);
    for combo in pairs.combinations.iter().take(5) {
        println!(
            "  {} + {}  x{}  support {:.3}",
            combo.products[0], combo.products[1], combo.co_order_count, combo.support_rate
        );
    }

    let retention = cohorts.data();
    println!("=== COHORTS ({}) ===", retention.granularity.as_str());
    for cohort in &retention.cohorts {
        let series: Vec<String> = cohort
            .retention
            .iter()
            .map(|point| format!("{:.0}", point.retention_rate))
            .collect();
        println!(
            "  {:<10} size {:>4}  {}",
            cohort.cohort_key,
            cohort.cohort_size,
            series.join(" ")
        );
    }

    println!("=== RFM SEGMENTS ===");
    for segment in &rfm.data().summary {
        println!(
            "  {:<10} {:>4} customers  avg ${:>8.2}",
            segment.segment.label(),
            segment.customer_count,
            segment.avg_monetary
        );
    }
}

/// One line per section: the comparison change map, `-` when no metric
/// was comparable.
fn print_changes<T>(label: &str, view: &AnalyticsView<T>) {
    if let AnalyticsView::Comparison { changes, .. } = view {
        let parts: Vec<String> = changes
            .iter()
            .map(|(name, pct)| format!("{name} {pct:+.1}%"))
            .collect();
        let line = if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(", ")
        };
        println!("  {label:<10} {line}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn parse_str(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
