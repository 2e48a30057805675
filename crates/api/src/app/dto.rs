use serde::Deserialize;

use catalog_core::{InvalidPageRequest, PageRequest, ProductId};
use catalog_products::{NewProduct, ProductPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            price: req.price,
            image: req.image,
        }
    }
}

/// Unknown fields (including `id` and `available`) are ignored. An explicit
/// `"image": null` clears the image.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "catalog_products::product::present")]
    pub image: Option<Option<String>>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            name: req.name,
            price: req.price,
            image: req.image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Missing values default to page 1 of 10; zero is rejected.
    pub fn into_page_request(self) -> Result<PageRequest, InvalidPageRequest> {
        let defaults = PageRequest::default();
        PageRequest::try_new(
            self.page.unwrap_or(defaults.page()),
            self.limit.unwrap_or(defaults.limit()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateProductsRequest {
    pub ids: Vec<ProductId>,
}
