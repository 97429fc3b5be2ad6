//! HTTP routes
//!
//! ```text
//! GET /categories?cursor=<opaque>&limit=<int>
//! GET /products?cursor=<opaque>&limit=<int>
//! ```

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};

use crate::handlers::{BufferedResponse, PaginationParams};
use crate::models::{Category, Product};
use crate::repository::ListRepository;
use crate::state::AppState;

/// Build the service router
pub fn router<C, P>(state: AppState<C, P>) -> Router
where
    C: ListRepository<Category> + 'static,
    P: ListRepository<Product> + 'static,
{
    Router::new()
        .route("/categories", get(list_categories::<C, P>))
        .route("/products", get(list_products::<C, P>))
        .with_state(state)
}

async fn list_categories<C, P>(
    State(state): State<AppState<C, P>>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> BufferedResponse
where
    C: ListRepository<Category> + 'static,
    P: ListRepository<Product> + 'static,
{
    let mut response = BufferedResponse::new();
    match query {
        Ok(Query(params)) => {
            let deadline = state.request_deadline();
            state
                .categories
                .list(&params, Some(deadline), &mut response)
                .await
        }
        Err(rejection) => state.categories.reject_query(&mut response, &rejection),
    }
    response
}

async fn list_products<C, P>(
    State(state): State<AppState<C, P>>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> BufferedResponse
where
    C: ListRepository<Category> + 'static,
    P: ListRepository<Product> + 'static,
{
    let mut response = BufferedResponse::new();
    match query {
        Ok(Query(params)) => {
            let deadline = state.request_deadline();
            state
                .products
                .list(&params, Some(deadline), &mut response)
                .await
        }
        Err(rejection) => state.products.reject_query(&mut response, &rejection),
    }
    response
}
