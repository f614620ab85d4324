mod delete;
mod get;
mod post;
mod update;

pub use delete::*;
pub use get::*;
pub use post::*;
pub use update::*;

pub(crate) fn parse_items(items: String) -> Result<String, String> {
    let items = items.trim().to_string();
    if items.is_empty() {
        return Err("items must not be empty".to_string())
    }

    Ok(items)
}

pub(crate) fn parse_amount(amount: f64) -> Result<f64, String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("amount must be a non-negative number".to_string())
    }

    Ok(amount)
}
