//! Order workflow commands.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use shop_console::models::Order;
use shop_console::orders::{CancellationBucket, OrderActions, OrderFilter};
use shop_console::{OrderConsole, WorkflowError};
use shop_console_core::{OrderId, OrderStatus, Price, RefundStatus};

use super::{CliError, Context};

async fn loaded_console(ctx: &Context) -> Result<OrderConsole, CliError> {
    ctx.require_login()?;
    let console = OrderConsole::new(ctx.api.clone(), ctx.config.notices);
    let loaded = console.load().await;
    ctx.report_session_end();
    loaded?;
    Ok(console)
}

fn print_outcome(console: &OrderConsole) {
    if let Some(notice) = console.latest_notice() {
        println!("{}", notice.message);
    }
}

fn print_row(order: &Order) {
    println!(
        "{:<26} {:<12} {:>10} {:<6} {:<10} {}",
        order.id.as_str(),
        order.order_status.as_str(),
        order.total_amount.to_string(),
        order.payment_method.to_string(),
        order.cancellation_status.to_string(),
        order.customer_name,
    );
}

/// # Errors
///
/// Invalid bucket, missing session or backend failure.
pub async fn list(
    ctx: &Context,
    statuses: Vec<OrderStatus>,
    cancellation: &str,
    search: Option<String>,
) -> Result<(), CliError> {
    let bucket: CancellationBucket = cancellation.parse().map_err(CliError::InvalidArgument)?;
    let console = loaded_console(ctx).await?;
    console.set_filter(
        OrderFilter::default()
            .with_statuses(statuses)
            .with_cancellation(bucket)
            .with_search(search.unwrap_or_default()),
    );

    let visible = console.visible_orders();
    for order in &visible {
        print_row(order);
    }

    let summary = console.summary();
    println!(
        "\n{} of {} orders | {} cancellation requests | {} refunds outstanding | {} COD awaiting confirmation | gross {}",
        visible.len(),
        summary.total,
        summary.pending_cancellations,
        summary.refunds_outstanding,
        summary.awaiting_cod_confirmation,
        summary.gross,
    );
    Ok(())
}

/// # Errors
///
/// Unknown order or backend failure.
pub async fn show(ctx: &Context, id: &OrderId) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let order = console
        .order(id)
        .ok_or_else(|| CliError::NotFound(format!("order {id}")))?;

    println!("Order {}", order.id);
    println!(
        "  customer: {} <{}> {}",
        order.customer_name, order.customer_email, order.customer_phone
    );
    if let Some(address) = &order.shipping_address {
        println!("  ship to:  {address}");
    }
    for item in &order.items {
        println!("  - {} x{} @ {} = {}", item.name, item.quantity, item.price, item.subtotal());
    }
    println!(
        "  total:    {} ({}, {:?})",
        order.total_amount, order.payment_method, order.payment_status
    );
    if order.is_cod() {
        println!("  upfront:  {}", order.upfront());
        println!("  revenue:  {:?}", order.revenue_status);
    }
    println!("  status:   {}", order.order_status);
    println!("  cancel:   {}", order.cancellation_status);
    if let Some(reason) = &order.cancellation_reason {
        println!("            reason: {reason}");
    }
    if let Some(refund) = order.effective_refund_status() {
        println!("  refund:   {refund}");
        if let Some(reason) = &order.refund_failed_reason {
            println!("            failed: {reason}");
        }
    }

    if let Some(actions) = console.actions(id) {
        print_actions(&actions);
    }
    Ok(())
}

fn print_actions(actions: &OrderActions) {
    let mut available = Vec::new();
    if actions.can_update_status {
        available.push("set-status".to_string());
    }
    if actions.can_decide_cancellation {
        available.push("approve".to_string());
        available.push("reject".to_string());
    }
    if let Some(plan) = &actions.refund {
        let verb = if actions.retry_refund { "refund (retry)" } else { "refund" };
        available.push(format!("{verb} {}", plan.amount()));
    }
    if actions.can_confirm_cod {
        let amount = actions.suggested_cod_amount.unwrap_or(Price::ZERO);
        available.push(format!("confirm-cod {amount}"));
    }
    if available.is_empty() {
        println!("  actions:  none");
    } else {
        println!("  actions:  {}", available.join(", "));
    }
}

/// # Errors
///
/// Locked status, busy order or backend failure.
pub async fn set_status(ctx: &Context, id: &OrderId, status: OrderStatus) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let result = console.update_status(id, status).await;
    finish(ctx, &console, result)
}

/// # Errors
///
/// No pending request or backend failure.
pub async fn approve(ctx: &Context, id: &OrderId) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let result = console.approve_cancellation(id).await;
    finish(ctx, &console, result)
}

/// # Errors
///
/// Blank reason, no pending request or backend failure.
pub async fn reject(ctx: &Context, id: &OrderId, reason: &str) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let result = console.reject_cancellation(id, reason).await;
    finish(ctx, &console, result)
}

/// # Errors
///
/// Refund not available or backend failure.
pub async fn refund(ctx: &Context, id: &OrderId) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let result = console.process_refund(id).await;
    ctx.report_session_end();
    let status = result?;
    print_outcome(&console);
    if status == RefundStatus::Failed {
        println!("Refund failed; retry with `shop-console orders refund {id}`");
    }
    Ok(())
}

/// # Errors
///
/// Not a delivered COD order, already confirmed, bad amount or backend failure.
pub async fn confirm_cod(ctx: &Context, id: &OrderId, amount: Option<Price>) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    let result = console.confirm_cod_payment(id, amount).await;
    ctx.report_session_end();
    let confirmed = result?;
    print_outcome(&console);
    println!("Confirmed {confirmed}");
    Ok(())
}

/// # Errors
///
/// Backend failure or the output cannot be written.
pub async fn export(ctx: &Context, output: Option<PathBuf>) -> Result<(), CliError> {
    let console = loaded_console(ctx).await?;
    match output {
        Some(path) => {
            let file = File::create(&path)?;
            let written = console.export_csv(BufWriter::new(file))?;
            println!("Wrote {written} orders to {}", path.display());
        }
        None => {
            console.export_csv(io::stdout().lock())?;
        }
    }
    Ok(())
}

fn finish(ctx: &Context, console: &OrderConsole, result: Result<(), WorkflowError>) -> Result<(), CliError> {
    ctx.report_session_end();
    result?;
    print_outcome(console);
    Ok(())
}
