//! Bin width arithmetic.
//!
//! Units of a product stack into groups of at most `max_group_size`; every started group
//! occupies the product's full `unit_bin_width`.

use ohub_domain::models::ProductType;
use rust_decimal::Decimal;
use std::num::NonZeroU32;

/// Number of groups needed for `quantity` units: `ceil(quantity / max_group_size)`.
#[must_use]
pub const fn group_count(quantity: NonZeroU32, max_group_size: NonZeroU32) -> u32 {
    (quantity.get() - 1) / max_group_size.get() + 1
}

/// Bin width one order entry occupies, or `None` on decimal overflow.
#[must_use]
pub fn contribution(product_type: &ProductType, quantity: NonZeroU32) -> Option<Decimal> {
    let groups = group_count(quantity, product_type.max_group_size);
    product_type.unit_bin_width.checked_mul(Decimal::from(groups))
}

/// Exact sum of all entry contributions, normalized (`47.0` becomes `47`).
#[must_use]
pub fn min_bin_width<'a, I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (&'a ProductType, NonZeroU32)>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, (product_type, quantity)| {
            total.checked_add(contribution(product_type, quantity)?)
        })
        .map(|total| total.normalize())
}
