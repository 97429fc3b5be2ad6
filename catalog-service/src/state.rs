//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::Config;
use crate::handlers::{ListEndpoint, ListSettings, Responder};
use crate::models::{Category, Product};
use crate::observability::Logger;
use crate::repository::ListRepository;

/// Operation name for the category list
pub const LIST_CATEGORIES_OP: &str = "CategoryHandler.ListCategories";
/// Operation name for the product list
pub const LIST_PRODUCTS_OP: &str = "ProductHandler.ListProducts";

const CATEGORIES_MESSAGE: &str = "Successfully fetched list of categories";
const PRODUCTS_MESSAGE: &str = "Successfully fetched list of products";

/// Endpoints for every resource, generic over their storage backends
pub struct AppState<C, P> {
    pub categories: Arc<ListEndpoint<Category, C>>,
    pub products: Arc<ListEndpoint<Product, P>>,
    request_timeout: Duration,
}

// Manual impl so C and P need not be Clone
impl<C, P> Clone for AppState<C, P> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            products: Arc::clone(&self.products),
            request_timeout: self.request_timeout,
        }
    }
}

impl<C, P> AppState<C, P>
where
    C: ListRepository<Category>,
    P: ListRepository<Product>,
{
    /// Wire both endpoints from configuration, one logger and two repositories
    pub fn new(config: &Config, logger: &Logger, categories: C, products: P) -> Self {
        let settings = ListSettings::from_config(config);

        Self {
            categories: Arc::new(ListEndpoint::new(
                categories,
                Responder::new(logger.clone(), LIST_CATEGORIES_OP),
                settings,
                CATEGORIES_MESSAGE,
            )),
            products: Arc::new(ListEndpoint::new(
                products,
                Responder::new(logger.clone(), LIST_PRODUCTS_OP),
                settings,
                PRODUCTS_MESSAGE,
            )),
            request_timeout: config.service.timeout(),
        }
    }
}

impl<C, P> AppState<C, P> {
    /// Deadline for a request arriving now
    ///
    /// Endpoints answer with an error envelope at this instant, ahead of the
    /// server's outer timeout layer.
    pub fn request_deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}
