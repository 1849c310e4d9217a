use crate::error::{CatalogError, CatalogErrorExt};
use fxhash::FxHashMap;
use ohub_database::Database;
use ohub_domain::models::ProductType;
use rust_decimal::Decimal;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use surrealdb::types::SurrealValue;
use tracing::instrument;

/// Read-only access to product types.
///
/// Bulk lookups take one round trip each and return only the matches, in no particular
/// order; callers compare the result with their input to find what is missing.
pub trait CatalogStore: Send + Sync + 'static {
    fn resolve_codes(
        &self,
        codes: &[String],
    ) -> impl Future<Output = Result<Vec<ProductType>, CatalogError>> + Send;

    fn resolve_ids(
        &self,
        ids: &[u32],
    ) -> impl Future<Output = Result<Vec<ProductType>, CatalogError>> + Send;

    fn resolve(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<ProductType>, CatalogError>> + Send {
        let codes = [code.to_owned()];
        async move { Ok(self.resolve_codes(&codes).await?.into_iter().next()) }
    }
}

#[derive(Debug, SurrealValue)]
struct ProductTypeRow {
    type_id: i64,
    code: String,
    unit_bin_width: String,
    max_group_size: i64,
}

impl TryFrom<ProductTypeRow> for ProductType {
    type Error = CatalogError;

    fn try_from(row: ProductTypeRow) -> Result<Self, Self::Error> {
        let corrupt = |message: String| CatalogError::Corrupt {
            message: message.into(),
            context: Some(format!("product_type {}", row.code).into()),
        };

        let id = u32::try_from(row.type_id)
            .map_err(|_| corrupt(format!("type_id {} is out of range", row.type_id)))?;
        let unit_bin_width = Decimal::from_str(&row.unit_bin_width)
            .map_err(|e| corrupt(format!("unit_bin_width '{}': {e}", row.unit_bin_width)))?;
        let max_group_size = u32::try_from(row.max_group_size)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| corrupt(format!("max_group_size {} must be >= 1", row.max_group_size)))?;

        Ok(Self { id, code: row.code, unit_bin_width, max_group_size })
    }
}

/// Catalog backed by the seeded `product_type` table.
#[derive(Debug, Clone)]
pub struct SurrealCatalog {
    db: Database,
}

impl SurrealCatalog {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Number of stored product types.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] if the table cannot be read.
    pub async fn count(&self) -> Result<u64, CatalogError> {
        let count = self
            .db
            .query("RETURN count(SELECT VALUE type_id FROM product_type)")
            .await
            .context("Counting product types")?
            .take::<Option<i64>>(0)
            .context("Parsing product type count")?
            .unwrap_or_default();

        Ok(count.unsigned_abs())
    }
}

const SELECT_BY_CODES: &str = "SELECT type_id, code, unit_bin_width, max_group_size \
     FROM product_type WHERE code IN $codes";
const SELECT_BY_IDS: &str = "SELECT type_id, code, unit_bin_width, max_group_size \
     FROM product_type WHERE type_id IN $ids";

fn into_product_types(rows: Vec<ProductTypeRow>) -> Result<Vec<ProductType>, CatalogError> {
    rows.into_iter().map(ProductType::try_from).collect()
}

impl CatalogStore for SurrealCatalog {
    #[instrument(skip(self), fields(count = codes.len()))]
    async fn resolve_codes(&self, codes: &[String]) -> Result<Vec<ProductType>, CatalogError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .db
            .query(SELECT_BY_CODES)
            .bind(("codes", codes.to_vec()))
            .await
            .context("Resolving product codes")?
            .take::<Vec<ProductTypeRow>>(0)
            .context("Parsing product types")?;

        into_product_types(rows)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn resolve_ids(&self, ids: &[u32]) -> Result<Vec<ProductType>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().copied().map(i64::from).collect();
        let rows = self
            .db
            .query(SELECT_BY_IDS)
            .bind(("ids", ids))
            .await
            .context("Resolving product type ids")?
            .take::<Vec<ProductTypeRow>>(0)
            .context("Parsing product types")?;

        into_product_types(rows)
    }
}

/// In-process catalog, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    by_code: Arc<FxHashMap<String, ProductType>>,
}

impl MemoryCatalog {
    pub fn new(product_types: impl IntoIterator<Item = ProductType>) -> Self {
        let by_code = product_types.into_iter().map(|pt| (pt.code.clone(), pt)).collect();
        Self { by_code: Arc::new(by_code) }
    }

    /// The same product types the database migration seeds.
    pub fn seeded() -> Self {
        Self::new(crate::standard_product_types())
    }
}

impl CatalogStore for MemoryCatalog {
    async fn resolve_codes(&self, codes: &[String]) -> Result<Vec<ProductType>, CatalogError> {
        Ok(codes.iter().filter_map(|code| self.by_code.get(code)).cloned().collect())
    }

    async fn resolve_ids(&self, ids: &[u32]) -> Result<Vec<ProductType>, CatalogError> {
        Ok(self.by_code.values().filter(|pt| ids.contains(&pt.id)).cloned().collect())
    }
}
