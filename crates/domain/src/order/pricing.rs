//! Normalisation and pricing of raw cart lines.

use std::num::NonZeroU32;

use common::Money;

use super::{CartLine, LineItem, OrderError, resolve_category};
use crate::error::DomainError;

/// Turns one raw cart line into a priced line item.
///
/// A missing base price counts as zero. A caller-supplied total is kept
/// verbatim, otherwise the total is base price times quantity in exact
/// decimal arithmetic. Selections are encoded to their stored text form.
pub fn normalize_line(line: CartLine) -> Result<LineItem, DomainError> {
    let category = resolve_category(line.product_type.as_deref())?;
    let quantity = positive_quantity(line.quantity)?;

    let base_price = line.base_price.unwrap_or_default();
    let line_total = match line.total_price {
        Some(total) => total,
        None => base_price
            .checked_mul(quantity.get())
            .ok_or(OrderError::AmountOutOfRange)?,
    };

    let selections = line
        .selections
        .as_ref()
        .map(|selections| selections.encode())
        .transpose()?;

    Ok(LineItem {
        product_front_id: line.product_front_id,
        category,
        product_name: line.product_name,
        base_price,
        line_total,
        quantity: quantity.get(),
        selections,
        description: line.description,
    })
}

fn positive_quantity(quantity: i64) -> Result<NonZeroU32, OrderError> {
    u32::try_from(quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(OrderError::InvalidQuantity { quantity })
}
