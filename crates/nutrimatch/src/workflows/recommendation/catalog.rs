use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{NutritionFacts, Product, ProductId, SupplementCategory, TenantId};

/// Read abstraction over a tenant's product catalog.
///
/// `snapshot` applies the candidate invariant (active, in stock, matching
/// category) before the analysis core ever sees a product; the core does not
/// re-check tenant scoping.
pub trait ProductCatalog: Send + Sync {
    fn snapshot(
        &self,
        tenant_id: TenantId,
        category: SupplementCategory,
    ) -> Result<Vec<Product>, CatalogError>;

    /// Whole-tenant listing used to join analytics records to product names.
    fn tenant_products(&self, tenant_id: TenantId) -> Result<Vec<Product>, CatalogError>;
}

/// Error enumeration for catalog queries.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Error enumeration for CSV catalog imports.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to open catalog csv: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Imports tenant catalogs from CSV exports.
///
/// Expected headers: `id` (optional), `brand_name`, `product_name`,
/// `category`, nutrition columns (`protein_g`, `carbs_g`, `fat_g`,
/// `calories`), flag columns (`lactose_free`, `gluten_free`, `vegan`,
/// `contains_maltodextrin`, `contains_artificial_sweeteners`),
/// `certifications` (`;`-separated), `price`, `currency`, `stock_quantity`,
/// `is_active`. Missing nutrition values default permissively.
pub struct CsvCatalogImporter;

impl CsvCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        tenant_id: TenantId,
    ) -> Result<Vec<Product>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, tenant_id)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        tenant_id: TenantId,
    ) -> Result<Vec<Product>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut products = Vec::new();

        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = record?;
            let line = index + 1;

            if !row.price.is_finite() || row.price <= 0.0 {
                return Err(CatalogImportError::InvalidRow {
                    row: line,
                    message: format!("price must be positive, found {}", row.price),
                });
            }

            products.push(row.into_product(tenant_id, line as u64));
        }

        Ok(products)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    id: Option<u64>,
    brand_name: String,
    product_name: String,
    category: SupplementCategory,
    #[serde(default)]
    protein_g: f64,
    #[serde(default)]
    carbs_g: f64,
    #[serde(default)]
    fat_g: f64,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    lactose_free: bool,
    #[serde(default)]
    gluten_free: bool,
    #[serde(default)]
    vegan: bool,
    #[serde(default)]
    contains_maltodextrin: bool,
    #[serde(default)]
    contains_artificial_sweeteners: bool,
    #[serde(default, deserialize_with = "semicolon_list")]
    certifications: Vec<String>,
    price: f64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    stock_quantity: u32,
    #[serde(default)]
    is_active: Option<bool>,
}

impl CatalogRow {
    fn into_product(self, tenant_id: TenantId, fallback_id: u64) -> Product {
        Product {
            id: ProductId(self.id.unwrap_or(fallback_id)),
            tenant_id,
            brand_name: self.brand_name,
            product_name: self.product_name,
            category: self.category,
            nutrition: NutritionFacts {
                protein_g: self.protein_g,
                carbs_g: self.carbs_g,
                fat_g: self.fat_g,
                calories: self.calories,
                lactose_free: self.lactose_free,
                gluten_free: self.gluten_free,
                vegan: self.vegan,
                contains_maltodextrin: self.contains_maltodextrin,
                contains_artificial_sweeteners: self.contains_artificial_sweeteners,
            },
            certifications: self.certifications,
            price: self.price,
            currency: self.currency.unwrap_or_else(|| "BRL".to_string()),
            stock_quantity: self.stock_quantity,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

fn semicolon_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| {
            value
                .split(';')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
brand_name,product_name,category,protein_g,lactose_free,gluten_free,vegan,contains_maltodextrin,contains_artificial_sweeteners,certifications,price,stock_quantity,is_active
Growth Supplements,Whey Protein Concentrado,protein,24.0,false,true,false,false,true,ANVISA;GMP,89.90,50,true
IntegralMedica,Whey Zero Lactose,protein,25.0,true,true,false,false,false,ANVISA;GMP;SEM LACTOSE,129.90,25,true
";

    #[test]
    fn parses_products_with_flags_and_certifications() {
        let products = CsvCatalogImporter::from_reader(SAMPLE.as_bytes(), TenantId(1))
            .expect("sample csv parses");

        assert_eq!(products.len(), 2);
        let growth = &products[0];
        assert_eq!(growth.id, ProductId(1));
        assert_eq!(growth.brand_name, "Growth Supplements");
        assert_eq!(growth.category, SupplementCategory::Protein);
        assert_eq!(growth.nutrition.protein_g, 24.0);
        assert!(growth.nutrition.contains_artificial_sweeteners);
        assert!(!growth.nutrition.lactose_free);
        assert_eq!(growth.certifications, vec!["ANVISA", "GMP"]);
        assert_eq!(growth.currency, "BRL");
        assert!(growth.is_available());

        let zero_lactose = &products[1];
        assert!(zero_lactose.nutrition.lactose_free);
        assert_eq!(zero_lactose.certifications.len(), 3);
    }

    #[test]
    fn rejects_non_positive_price() {
        let csv = "\
brand_name,product_name,category,price
Acme,Free Sample,protein,0.0
";
        let result = CsvCatalogImporter::from_reader(csv.as_bytes(), TenantId(1));
        match result {
            Err(CatalogImportError::InvalidRow { row, message }) => {
                assert_eq!(row, 1);
                assert!(message.contains("price"));
            }
            other => panic!("expected invalid row error, got {other:?}"),
        }
    }
}
