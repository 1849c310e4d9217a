use crate::error::OrdersError;
use crate::packing;
use crate::repository::{NewOrder, NewOrderEntry, OrderRepository};
use fxhash::{FxHashMap, FxHashSet};
use ohub_catalog::CatalogStore;
use ohub_domain::models::{Order, OrderEntry, ProductType};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

/// Creates and looks up orders.
///
/// Validation runs in a fixed order so clients always see the same error for the same
/// input: missing entries, then a taken id, then unknown product codes.
#[derive(Debug, Clone)]
pub struct OrderService<R, C> {
    repository: R,
    catalog: C,
}

impl<R, C> OrderService<R, C>
where
    R: OrderRepository,
    C: CatalogStore,
{
    pub const fn new(repository: R, catalog: C) -> Self {
        Self { repository, catalog }
    }

    /// Validates and stores a new order, returning its minimum bin width.
    ///
    /// # Errors
    /// * [`OrdersError::NoEntries`] when `entries` is empty.
    /// * [`OrdersError::AlreadyExists`] when `order_id` is taken.
    /// * [`OrdersError::UnknownProductCodes`] listing every unresolved code once, in order of
    ///   first appearance.
    /// * Catalog and store failures as they occur; nothing is written in that case.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn create(&self, order_id: Uuid, entries: Vec<OrderEntry>) -> Result<Decimal, OrdersError> {
        if entries.is_empty() {
            return Err(OrdersError::NoEntries { context: None });
        }

        if self.repository.exists(order_id).await? {
            return Err(OrdersError::AlreadyExists { order_id, context: None });
        }

        let product_types = self.resolve_codes(&entries).await?;
        let lines = entries.iter().filter_map(|entry| {
            product_types.get(entry.product_code.as_str()).map(|pt| (pt, entry.quantity))
        });
        let min_bin_width = packing::min_bin_width(lines).ok_or_else(|| OrdersError::Internal {
            message: "minimum bin width overflows".into(),
            context: None,
        })?;

        let new_entries = entries
            .iter()
            .filter_map(|entry| {
                product_types.get(entry.product_code.as_str()).map(|pt| NewOrderEntry {
                    product_type_id: pt.id,
                    quantity: entry.quantity,
                })
            })
            .collect();

        self.repository.insert(NewOrder { order_id, min_bin_width, entries: new_entries }).await?;
        info!(%min_bin_width, "Order created");

        Ok(min_bin_width)
    }

    /// Loads an order and resolves its product type ids back to codes.
    ///
    /// # Errors
    /// * [`OrdersError::NotFound`] when no order has this id.
    /// * [`OrdersError::Internal`] when a stored entry references an unknown product type.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Order, OrdersError> {
        let stored = self
            .repository
            .fetch(order_id)
            .await?
            .ok_or(OrdersError::NotFound { order_id, context: None })?;

        let ids: Vec<u32> = distinct(stored.entries.iter().map(|entry| entry.product_type_id));
        let codes: FxHashMap<u32, String> = self
            .catalog
            .resolve_ids(&ids)
            .await?
            .into_iter()
            .map(|pt| (pt.id, pt.code))
            .collect();

        let entries = stored
            .entries
            .into_iter()
            .map(|entry| {
                let code = codes.get(&entry.product_type_id).ok_or_else(|| OrdersError::Internal {
                    message: format!("product type {} no longer resolves", entry.product_type_id).into(),
                    context: Some(format!("Loading order {order_id}").into()),
                })?;
                Ok(OrderEntry::new(code.clone(), entry.quantity))
            })
            .collect::<Result<Vec<_>, OrdersError>>()?;

        Ok(Order { order_id: stored.order_id, min_bin_width: stored.min_bin_width, entries })
    }

    /// Resolves every distinct code, failing with all unknown ones at once.
    async fn resolve_codes(
        &self,
        entries: &[OrderEntry],
    ) -> Result<FxHashMap<String, ProductType>, OrdersError> {
        let codes = distinct(entries.iter().map(|entry| entry.product_code.clone()));
        let found: FxHashMap<String, ProductType> = self
            .catalog
            .resolve_codes(&codes)
            .await?
            .into_iter()
            .map(|pt| (pt.code.clone(), pt))
            .collect();

        let unknown: Vec<String> = codes.into_iter().filter(|code| !found.contains_key(code)).collect();
        if !unknown.is_empty() {
            return Err(OrdersError::UnknownProductCodes { codes: unknown, context: None });
        }

        Ok(found)
    }
}

/// Deduplicates while keeping first-appearance order.
fn distinct<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + std::hash::Hash + Clone,
{
    let mut seen = FxHashSet::default();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{StoredEntry, StoredOrder};
    use ohub_catalog::MemoryCatalog;
    use parking_lot::Mutex;
    use std::num::NonZeroU32;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    struct MemoryRepository {
        orders: Arc<Mutex<Vec<NewOrder>>>,
    }

    impl MemoryRepository {
        fn stored(&self) -> Vec<NewOrder> {
            self.orders.lock().clone()
        }
    }

    impl OrderRepository for MemoryRepository {
        async fn exists(&self, order_id: Uuid) -> Result<bool, OrdersError> {
            Ok(self.orders.lock().iter().any(|order| order.order_id == order_id))
        }

        async fn insert(&self, order: NewOrder) -> Result<(), OrdersError> {
            let mut orders = self.orders.lock();
            if orders.iter().any(|stored| stored.order_id == order.order_id) {
                return Err(OrdersError::AlreadyExists { order_id: order.order_id, context: None });
            }
            orders.push(order);
            Ok(())
        }

        async fn fetch(&self, order_id: Uuid) -> Result<Option<StoredOrder>, OrdersError> {
            Ok(self.orders.lock().iter().find(|order| order.order_id == order_id).map(|order| {
                StoredOrder {
                    order_id: order.order_id,
                    min_bin_width: order.min_bin_width,
                    entries: order
                        .entries
                        .iter()
                        .enumerate()
                        .map(|(i, entry)| StoredEntry {
                            entry_id: format!("e{i}"),
                            product_type_id: entry.product_type_id,
                            quantity: entry.quantity,
                        })
                        .collect(),
                }
            }))
        }
    }

    fn service() -> (OrderService<MemoryRepository, MemoryCatalog>, MemoryRepository) {
        let repository = MemoryRepository::default();
        (OrderService::new(repository.clone(), MemoryCatalog::seeded()), repository)
    }

    fn entry(code: &str, quantity: u32) -> OrderEntry {
        OrderEntry::new(code, NonZeroU32::new(quantity).unwrap())
    }

    #[tokio::test]
    async fn computes_and_stores_min_bin_width() {
        let (service, repository) = service();
        let id = Uuid::new_v4();

        let width = service.create(id, vec![entry("photoBook", 3), entry("mug", 9)]).await.unwrap();
        assert_eq!(width.to_string(), "339");

        let stored = repository.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].min_bin_width, width);
        assert_eq!(
            stored[0].entries,
            vec![
                NewOrderEntry { product_type_id: 1, quantity: NonZeroU32::new(3).unwrap() },
                NewOrderEntry { product_type_id: 5, quantity: NonZeroU32::new(9).unwrap() },
            ]
        );
    }

    #[tokio::test]
    async fn fractional_widths_are_exact() {
        let (service, _) = service();
        let width = service.create(Uuid::new_v4(), vec![entry("cards", 8)]).await.unwrap();
        assert_eq!(width, Decimal::new(376, 1));
    }

    #[tokio::test]
    async fn repeated_codes_contribute_per_entry() {
        let (service, _) = service();
        let width = service.create(Uuid::new_v4(), vec![entry("mug", 3), entry("mug", 3)]).await.unwrap();
        assert_eq!(width, Decimal::from(188));
    }

    #[tokio::test]
    async fn empty_order_is_rejected_first() {
        let (service, repository) = service();
        let err = service.create(Uuid::new_v4(), vec![]).await.unwrap_err();
        assert!(matches!(err, OrdersError::NoEntries { .. }));
        assert!(repository.stored().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_before_codes_are_checked() {
        let (service, repository) = service();
        let id = Uuid::new_v4();
        service.create(id, vec![entry("canvas", 1)]).await.unwrap();

        let err = service.create(id, vec![entry("poster", 1)]).await.unwrap_err();
        assert!(matches!(err, OrdersError::AlreadyExists { order_id, .. } if order_id == id));
        assert_eq!(repository.stored().len(), 1);
        assert_eq!(repository.stored()[0].entries.len(), 1);
    }

    #[tokio::test]
    async fn unknown_codes_are_all_reported_in_first_seen_order() {
        let (service, repository) = service();
        let entries =
            vec![entry("poster", 1), entry("mug", 2), entry("sticker", 1), entry("poster", 4)];

        match service.create(Uuid::new_v4(), entries).await {
            Err(OrdersError::UnknownProductCodes { codes, .. }) => {
                assert_eq!(codes, ["poster", "sticker"]);
            }
            other => panic!("expected unknown codes, got {other:?}"),
        }
        assert!(repository.stored().is_empty());
    }

    #[tokio::test]
    async fn find_round_trips_created_order() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        let entries = vec![entry("calendar", 2), entry("mug", 5)];
        let width = service.create(id, entries.clone()).await.unwrap();

        let order = service.find_by_id(id).await.unwrap();
        assert_eq!(order.order_id, id);
        assert_eq!(order.min_bin_width, width);
        assert_eq!(order.entries, entries);
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        let err = service.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, OrdersError::NotFound { order_id, .. } if order_id == id));
    }

    #[tokio::test]
    async fn dangling_product_type_is_internal() {
        let repository = MemoryRepository::default();
        let id = Uuid::new_v4();
        repository
            .insert(NewOrder {
                order_id: id,
                min_bin_width: Decimal::ONE,
                entries: vec![NewOrderEntry { product_type_id: 42, quantity: NonZeroU32::MIN }],
            })
            .await
            .unwrap();

        let service = OrderService::new(repository, MemoryCatalog::seeded());
        let err = service.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, OrdersError::Internal { .. }));
    }

    #[test]
    fn distinct_keeps_first_appearance() {
        assert_eq!(distinct(["b", "a", "b", "c", "a"]), ["b", "a", "c"]);
    }
}
