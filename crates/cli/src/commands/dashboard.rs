//! Dashboard summary.

use shop_console::api::Period;
use shop_console::{Dashboard, DashboardSnapshot, Panel};

use super::{CliError, Context};

/// Fetch every panel and print what loaded.
///
/// # Errors
///
/// Not logged in. Panel failures are printed, not returned.
pub async fn show(ctx: &Context, period: Period) -> Result<(), CliError> {
    ctx.require_login()?;
    let dashboard = Dashboard::new(ctx.api.clone(), period);
    let failed = dashboard.refresh().await;
    ctx.report_session_end();

    let snapshot = dashboard.snapshot();
    print_snapshot(&snapshot);
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|p| p.label()).collect();
        println!("\nUnavailable: {}", names.join(", "));
    }
    Ok(())
}

fn print_snapshot(s: &DashboardSnapshot) {
    println!("Dashboard ({})", s.period);

    if let Some(c) = &s.product_counts {
        println!("\nProducts: {} total, {} in stock, {} out of stock", c.total, c.in_stock, c.out_of_stock);
        println!(
            "  best sellers {} | featured {} | most loved {} | loved items {}",
            c.best_sellers, c.featured, c.most_loved, c.loved_items
        );
    }
    if let Some(u) = &s.user_stats {
        println!(
            "\nCustomers: {} total, {} active, {} blocked, {} new this month ({} orders)",
            u.total_users, u.active_users, u.blocked_users, u.new_users_this_month, u.total_orders
        );
    }
    if let Some(sales) = &s.sales {
        println!(
            "\nSales: {} over {} orders (avg {})",
            sales.total_sales, sales.total_orders, sales.average_order_value
        );
        for top in sales.top_products.iter().take(5) {
            println!("  {:<30} x{:<5} {}", top.name, top.quantity, top.revenue);
        }
    }
    if let Some(stock) = &s.stock {
        println!(
            "\nStock: {} in stock, {} low, {} out",
            stock.in_stock, stock.low_stock, stock.out_of_stock
        );
        for item in &stock.low_stock_items {
            println!("  {:<30} {}", item.name, item.stock);
        }
    }
    if s.has_failed(Panel::Revenue) {
        return;
    }
    if let Some(breakdown) = s.revenue_breakdown() {
        println!(
            "\nRevenue: earned {} | confirmed {} | unconfirmed {} | refunded {}",
            breakdown.earned,
            breakdown.confirmed,
            breakdown.unconfirmed(),
            breakdown.refunded
        );
        for row in &breakdown.rows {
            println!(
                "  {:<7} {:>4} orders  earned {}  confirmed {}  refunded {}",
                row.method.to_string(),
                row.orders,
                row.earned,
                row.confirmed,
                row.refunded
            );
        }
    }
}
