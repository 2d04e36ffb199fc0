//! Product and category commands.

use shop_console::api::Catalog;
use shop_console::views::{CategoriesView, ProductsView};
use shop_console_core::ProductId;

use super::{CliError, Context, confirmer};

const fn catalog(loved: bool) -> Catalog {
    if loved { Catalog::Loved } else { Catalog::Shop }
}

async fn loaded_products(ctx: &Context, loved: bool) -> Result<ProductsView, CliError> {
    ctx.require_login()?;
    let mut view = ProductsView::new(ctx.api.clone(), catalog(loved), ctx.config.notices);
    let loaded = view.load().await;
    ctx.report_session_end();
    loaded?;
    Ok(view)
}

/// # Errors
///
/// Not logged in or backend failure.
pub async fn list_products(ctx: &Context, loved: bool) -> Result<(), CliError> {
    let view = loaded_products(ctx, loved).await?;
    for product in view.products() {
        let category = product
            .category
            .as_ref()
            .and_then(|c| c.name())
            .unwrap_or("-");
        println!(
            "{:<26} {:>10} {:>5} {:<20} {}",
            product.id.as_str(),
            product.price.to_string(),
            product.stock,
            category,
            product.name
        );
    }
    println!("\n{} {}s", view.products().len(), view.catalog().label().to_lowercase());
    Ok(())
}

/// # Errors
///
/// Backend failure.
pub async fn delete_product(ctx: &Context, id: &ProductId, loved: bool, yes: bool) -> Result<(), CliError> {
    let mut view = loaded_products(ctx, loved).await?;
    let result = view.delete(id, &confirmer(yes)).await;
    ctx.report_session_end();
    if result? {
        if let Some(notice) = view.latest_notice() {
            println!("{}", notice.message);
        }
    } else {
        println!("Cancelled");
    }
    Ok(())
}

/// Print the category tree, subcategories indented under their parent.
///
/// # Errors
///
/// Not logged in or backend failure.
pub async fn list_categories(ctx: &Context) -> Result<(), CliError> {
    ctx.require_login()?;
    let mut view = CategoriesView::new(ctx.api.clone(), ctx.config.notices);
    let loaded = view.load().await;
    ctx.report_session_end();
    loaded?;

    for main in view.main_categories() {
        println!("{:<26} {}", main.id.as_str(), main.name);
        for sub in view.sub_categories(&main.id) {
            println!("  {:<24} {}", sub.id.as_str(), sub.name);
        }
    }
    Ok(())
}
