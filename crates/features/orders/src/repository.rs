use crate::error::{OrdersError, OrdersErrorExt};
use ohub_database::Database;
use ohub_kernel::safe_nanoid;
use rust_decimal::Decimal;
use std::num::NonZeroU32;
use std::str::FromStr;
use surrealdb::types::SurrealValue;
use tracing::{instrument, warn};
use uuid::Uuid;

/// An order ready to be written: codes already resolved to product type ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_id: Uuid,
    pub min_bin_width: Decimal,
    /// In submission order.
    pub entries: Vec<NewOrderEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderEntry {
    pub product_type_id: u32,
    pub quantity: NonZeroU32,
}

/// A persisted order as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub order_id: Uuid,
    pub min_bin_width: Decimal,
    /// Ordered by submission position.
    pub entries: Vec<StoredEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub entry_id: String,
    pub product_type_id: u32,
    pub quantity: NonZeroU32,
}

/// Persistence boundary for orders.
///
/// `insert` writes the order and all of its entries or nothing, and reports a duplicate
/// `order_id` as [`OrdersError::AlreadyExists`].
pub trait OrderRepository: Send + Sync + 'static {
    fn exists(&self, order_id: Uuid) -> impl Future<Output = Result<bool, OrdersError>> + Send;

    fn insert(&self, order: NewOrder) -> impl Future<Output = Result<(), OrdersError>> + Send;

    fn fetch(
        &self,
        order_id: Uuid,
    ) -> impl Future<Output = Result<Option<StoredOrder>, OrdersError>> + Send;
}

const INSERT_ORDER: &str = "
BEGIN TRANSACTION;
CREATE orders CONTENT { order_id: $order_id, min_bin_width: $min_bin_width };
INSERT INTO order_entry $entries;
COMMIT TRANSACTION;
";

const SELECT_ORDER: &str = "
SELECT order_id, min_bin_width FROM orders WHERE order_id = $order_id LIMIT 1;
SELECT entry_id, product_type_id, quantity, line_no FROM order_entry
    WHERE order_id = $order_id ORDER BY line_no;
";

const ORDER_EXISTS: &str = "SELECT VALUE order_id FROM orders WHERE order_id = $order_id LIMIT 1";

#[derive(Debug, SurrealValue)]
struct EntryRecord {
    entry_id: String,
    order_id: String,
    product_type_id: i64,
    quantity: i64,
    line_no: i64,
}

#[derive(Debug, SurrealValue)]
struct OrderRow {
    order_id: String,
    min_bin_width: String,
}

#[derive(Debug, SurrealValue)]
struct EntryRow {
    entry_id: String,
    product_type_id: i64,
    quantity: i64,
    line_no: i64,
}

/// `SurrealDB` backed repository over the `orders` and `order_entry` tables.
#[derive(Debug, Clone)]
pub struct SurrealOrderRepository {
    db: Database,
}

impl SurrealOrderRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl OrderRepository for SurrealOrderRepository {
    async fn exists(&self, order_id: Uuid) -> Result<bool, OrdersError> {
        let found = self
            .db
            .query(ORDER_EXISTS)
            .bind(("order_id", order_id.to_string()))
            .await
            .context("Checking order id")?
            .take::<Vec<String>>(0)
            .context("Parsing order id check")?;

        Ok(!found.is_empty())
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id, entries = order.entries.len()))]
    async fn insert(&self, order: NewOrder) -> Result<(), OrdersError> {
        let order_id = order.order_id.to_string();
        let entries: Vec<EntryRecord> = order
            .entries
            .iter()
            .zip(0_i64..)
            .map(|(entry, line_no)| EntryRecord {
                entry_id: safe_nanoid!(),
                order_id: order_id.clone(),
                product_type_id: i64::from(entry.product_type_id),
                quantity: i64::from(entry.quantity.get()),
                line_no,
            })
            .collect();

        let outcome = self
            .db
            .query(INSERT_ORDER)
            .bind(("order_id", order_id))
            .bind(("min_bin_width", order.min_bin_width.to_string()))
            .bind(("entries", entries))
            .await
            .and_then(|response| response.check().map_err(surrealdb::Error::from));

        let Err(source) = outcome else {
            return Ok(());
        };

        // The transaction rolled back; a concurrent writer holding the id means a duplicate.
        if self.exists(order.order_id).await.unwrap_or(false) {
            warn!("Order id claimed by a concurrent request");
            return Err(OrdersError::AlreadyExists {
                order_id: order.order_id,
                context: Some("Storing order".into()),
            });
        }

        Err(OrdersError::Query { source, context: Some("Storing order".into()) })
    }

    #[instrument(skip(self))]
    async fn fetch(&self, order_id: Uuid) -> Result<Option<StoredOrder>, OrdersError> {
        let mut response = self
            .db
            .query(SELECT_ORDER)
            .bind(("order_id", order_id.to_string()))
            .await
            .context("Fetching order")?;

        let Some(order) =
            response.take::<Vec<OrderRow>>(0).context("Parsing order")?.into_iter().next()
        else {
            return Ok(None);
        };
        let entries = response.take::<Vec<EntryRow>>(1).context("Parsing order entries")?;

        stored_order(order, entries).map(Some)
    }
}

fn stored_order(order: OrderRow, mut entries: Vec<EntryRow>) -> Result<StoredOrder, OrdersError> {
    let corrupt = |message: String| OrdersError::Internal {
        message: message.into(),
        context: Some(format!("Stored order {}", order.order_id).into()),
    };

    let order_id = Uuid::parse_str(&order.order_id)
        .map_err(|e| corrupt(format!("invalid order id: {e}")))?;
    let min_bin_width = Decimal::from_str(&order.min_bin_width)
        .map_err(|e| corrupt(format!("invalid min_bin_width '{}': {e}", order.min_bin_width)))?;

    entries.sort_by_key(|row| row.line_no);
    let entries = entries
        .into_iter()
        .map(|row| {
            let product_type_id = u32::try_from(row.product_type_id)
                .map_err(|_| corrupt(format!("entry {} has product type {}", row.entry_id, row.product_type_id)))?;
            let quantity = u32::try_from(row.quantity)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| corrupt(format!("entry {} has quantity {}", row.entry_id, row.quantity)))?;
            Ok(StoredEntry { entry_id: row.entry_id, product_type_id, quantity })
        })
        .collect::<Result<Vec<_>, OrdersError>>()?;

    Ok(StoredOrder { order_id, min_bin_width, entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_id: &str, product_type_id: i64, quantity: i64, line_no: i64) -> EntryRow {
        EntryRow { entry_id: entry_id.to_owned(), product_type_id, quantity, line_no }
    }

    #[test]
    fn rows_convert_to_stored_order() {
        let id = Uuid::new_v4();
        let order = OrderRow { order_id: id.to_string(), min_bin_width: "37.6".to_owned() };

        let stored =
            stored_order(order, vec![entry("b", 5, 9, 1), entry("a", 4, 8, 0)]).unwrap();
        assert_eq!(stored.order_id, id);
        assert_eq!(stored.min_bin_width, Decimal::new(376, 1));
        assert_eq!(stored.entries[0].entry_id, "a");
        assert_eq!(stored.entries[0].quantity.get(), 8);
        assert_eq!(stored.entries[1].product_type_id, 5);
    }

    #[test]
    fn corrupt_rows_are_internal_errors() {
        let bad_width = OrderRow { order_id: Uuid::nil().to_string(), min_bin_width: "x".to_owned() };
        assert!(matches!(stored_order(bad_width, vec![]), Err(OrdersError::Internal { .. })));

        let ok = || OrderRow { order_id: Uuid::nil().to_string(), min_bin_width: "1".to_owned() };
        assert!(stored_order(ok(), vec![entry("a", 1, 0, 0)]).is_err());
        assert!(stored_order(ok(), vec![entry("a", -3, 1, 0)]).is_err());
    }
}
