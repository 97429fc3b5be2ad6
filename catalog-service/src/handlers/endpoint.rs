//! Paginated list endpoint
//!
//! One [`ListEndpoint`] exists per resource type. A request runs linearly:
//! parse pagination, call storage under a deadline, render the envelope.
//! There are no retries.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::ErrorCode;
use super::query::{parse_pagination, PaginationParams};
use super::responder::Responder;
use super::response::PaginationMeta;
use super::writer::ResponseWriter;
use crate::config::Config;
use crate::repository::{ListRepository, RepositoryError, RepositoryOperation};

/// How long a cancelled storage call may take to wind down
const CANCEL_GRACE: Duration = Duration::from_millis(100);

/// Per-endpoint limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    /// Limit used when the client sends none
    pub default_limit: i32,
    /// Budget for one storage call
    pub timeout: Duration,
}

impl ListSettings {
    /// Derive settings from the service configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_limit: config.pagination.default_limit,
            timeout: config.storage.query_timeout(),
        }
    }
}

/// List endpoint for records of type `T` stored in `R`
pub struct ListEndpoint<T, R> {
    repository: R,
    responder: Responder,
    settings: ListSettings,
    success_message: Arc<str>,
    _record: PhantomData<fn() -> T>,
}

impl<T, R> ListEndpoint<T, R>
where
    T: Serialize + Send,
    R: ListRepository<T>,
{
    /// Create an endpoint
    pub fn new(
        repository: R,
        responder: Responder,
        settings: ListSettings,
        success_message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            repository,
            responder,
            settings,
            success_message: success_message.into(),
            _record: PhantomData,
        }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repository
    }

    /// Serve one list request
    ///
    /// `inbound_deadline` is the caller's own deadline, if it has one; the
    /// earlier of it and the configured budget applies.
    pub async fn list<W>(
        &self,
        params: &PaginationParams,
        inbound_deadline: Option<Instant>,
        writer: &mut W,
    ) where
        W: ResponseWriter + Send + ?Sized,
    {
        let query = match parse_pagination(params, self.settings.default_limit) {
            Ok(query) => query,
            Err(err) => {
                self.responder
                    .write_error(writer, ErrorCode::InvalidFieldFormat, &err, None);
                return;
            }
        };

        let deadline = self.deadline(inbound_deadline);
        let cancel = CancellationToken::new();
        let storage = self.repository.list_items(query, cancel.clone());
        tokio::pin!(storage);

        // On the deadline the token fires and storage gets a short grace
        // period to observe it; whatever it returns then is discarded.
        let outcome = tokio::select! {
            outcome = &mut storage => outcome,
            _ = tokio::time::sleep_until(deadline) => {
                cancel.cancel();
                let _ = tokio::time::timeout(CANCEL_GRACE, &mut storage).await;
                Err(RepositoryError::timeout(
                    RepositoryOperation::List,
                    "storage did not respond before the request deadline",
                ))
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                self.responder
                    .write_error(writer, ErrorCode::InternalServerError, &err, None);
                return;
            }
        };

        let pagination = PaginationMeta::new(result.next_cursor, result.has_more);
        self.responder.write_success(
            writer,
            StatusCode::OK,
            &self.success_message,
            &result.items,
            Some(pagination),
        );
    }

    /// Report a query string that could not be extracted at all
    pub fn reject_query<W>(&self, writer: &mut W, rejection: &dyn Display)
    where
        W: ResponseWriter + ?Sized,
    {
        self.responder
            .write_error(writer, ErrorCode::InvalidFieldFormat, rejection, None);
    }

    fn deadline(&self, inbound: Option<Instant>) -> Instant {
        let budget = Instant::now() + self.settings.timeout;
        match inbound {
            Some(inbound) => inbound.min(budget),
            None => budget,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Outcome, StubRepository};
    use super::*;
    use crate::handlers::BufferedResponse;
    use crate::models::Category;
    use crate::observability::testing::CapturedLogs;
    use crate::pagination::{encode_cursor, Watermark};
    use crate::repository::ListQuery;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;

    const OP: &str = "CategoryHandler.ListCategories";

    fn endpoint(
        logs: &CapturedLogs,
        repository: StubRepository,
        timeout: Duration,
    ) -> ListEndpoint<Category, StubRepository> {
        ListEndpoint::new(
            repository,
            Responder::new(logs.logger("ProductService"), OP),
            ListSettings {
                default_limit: 20,
                timeout,
            },
            "Successfully fetched list of categories",
        )
    }

    fn body(writer: &BufferedResponse) -> Value {
        serde_json::from_slice(writer.body()).unwrap()
    }

    #[tokio::test]
    async fn test_success_renders_page() {
        let logs = CapturedLogs::default();
        let endpoint = endpoint(&logs, StubRepository::two_categories(), Duration::from_secs(5));
        let at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let cursor = encode_cursor(Watermark::new(at).unwrap());
        let params = PaginationParams::default().with_cursor(cursor.clone()).with_limit("10");

        let mut writer = BufferedResponse::new();
        endpoint.list(&params, None, &mut writer).await;

        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(
            body(&writer),
            json!({
                "status": "success",
                "data": [
                    {
                        "id": "f2aa335f-6f91-4d4d-8057-53b0009bc376",
                        "name": "Test Category A",
                        "description": "Test category a description"
                    },
                    {
                        "id": "b12f2176-28ca-4acf-85b9-cc97ca1b3cf6",
                        "name": "Test Category B",
                        "description": "Test category B description"
                    }
                ],
                "pagination": {"next_cursor": "MDAwMS0wMS0wMVQwMDowMDowMFo", "has_more": false},
                "message": "Successfully fetched list of categories"
            })
        );

        let expected = ListQuery::new(crate::pagination::decode_cursor(&cursor).unwrap(), 10);
        assert_eq!(endpoint.repository().last_query(), Some(expected));
        assert!(logs.errors().is_empty());
    }

    #[tokio::test]
    async fn test_defaults_reach_storage() {
        let logs = CapturedLogs::default();
        let endpoint = endpoint(&logs, StubRepository::two_categories(), Duration::from_secs(5));

        let mut writer = BufferedResponse::new();
        endpoint.list(&PaginationParams::default(), None, &mut writer).await;

        assert_eq!(
            endpoint.repository().last_query(),
            Some(ListQuery::new(Watermark::zero(), 20))
        );
    }

    #[tokio::test]
    async fn test_invalid_limit_skips_storage() {
        let logs = CapturedLogs::default();
        let endpoint = endpoint(&logs, StubRepository::two_categories(), Duration::from_secs(5));
        let params = PaginationParams::default().with_limit("ss");

        let mut writer = BufferedResponse::new();
        endpoint.list(&params, None, &mut writer).await;

        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body(&writer),
            json!({"status": "error", "error": {"code": 1002, "message": "Invalid field format"}})
        );
        assert!(endpoint.repository().last_query().is_none());

        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["op"], OP);
        assert_eq!(
            errors[0]["error"],
            "invalid limit value: `ss`, error: invalid digit found in string"
        );
    }

    #[tokio::test]
    async fn test_storage_error_is_internal() {
        let logs = CapturedLogs::default();
        let failure = RepositoryError::database_error(RepositoryOperation::List, "database error");
        let repository = StubRepository::new(Outcome::Fail(failure));
        let endpoint = endpoint(&logs, repository, Duration::from_secs(5));

        let mut writer = BufferedResponse::new();
        endpoint.list(&PaginationParams::default(), None, &mut writer).await;

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            std::str::from_utf8(writer.body()).unwrap(),
            r#"{"status":"error","error":{"code":1600,"message":"Internal server error"}}"#
        );

        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["service"], "ProductService");
        assert_eq!(errors[0]["code"], 1600);
        assert_eq!(errors[0]["message"], "Internal server error");
        assert_eq!(
            errors[0]["error"],
            "Repository database_error error during list: database error"
        );
    }

    #[tokio::test]
    async fn test_budget_timeout_cancels_storage() {
        let logs = CapturedLogs::default();
        let repository = StubRepository::new(Outcome::Hang);
        let endpoint = endpoint(&logs, repository, Duration::from_millis(20));

        let mut writer = BufferedResponse::new();
        endpoint.list(&PaginationParams::default(), None, &mut writer).await;

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        let tokens = endpoint.repository().tokens.lock().unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_cancelled());

        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]["error"].as_str().unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn test_storage_observes_cancellation_at_deadline() {
        let logs = CapturedLogs::default();
        let repository = StubRepository::new(Outcome::AwaitCancel);
        let endpoint = endpoint(&logs, repository, Duration::from_millis(20));

        let mut writer = BufferedResponse::new();
        endpoint.list(&PaginationParams::default(), None, &mut writer).await;

        assert!(endpoint.repository().observed_cancel.load(Ordering::SeqCst));
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        // The late cancellation result is dropped in favour of the timeout
        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0]["error"],
            "Repository timeout error during list: \
             storage did not respond before the request deadline"
        );
    }

    #[tokio::test]
    async fn test_inbound_deadline_wins_when_stricter() {
        let logs = CapturedLogs::default();
        let repository = StubRepository::new(Outcome::Hang);
        let endpoint = endpoint(&logs, repository, Duration::from_secs(60));

        let started = Instant::now();
        let mut writer = BufferedResponse::new();
        endpoint
            .list(
                &PaginationParams::default(),
                Some(started + Duration::from_millis(20)),
                &mut writer,
            )
            .await;

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_reject_query() {
        let logs = CapturedLogs::default();
        let endpoint = endpoint(&logs, StubRepository::two_categories(), Duration::from_secs(5));

        let mut writer = BufferedResponse::new();
        endpoint.reject_query(&mut writer, &"Failed to deserialize query string");

        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(body(&writer)["error"]["code"], 1002);
        assert_eq!(logs.errors().len(), 1);
    }
}
