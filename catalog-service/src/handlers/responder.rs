//! Envelope rendering with structured error logging
//!
//! A [`Responder`] is bound to one operation name. It serializes the full
//! body before touching the transport, so a serialization failure can still
//! be turned into a clean error response. Every error path logs exactly once
//! per failure before any byte is written.

use std::fmt::Display;
use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::error::ErrorCode;
use super::response::{ErrorEnvelope, PaginationMeta, SuccessEnvelope};
use super::writer::ResponseWriter;
use crate::observability::Logger;

/// Body used when even the encoding-failure envelope cannot be rendered
const LAST_RESORT_BODY: &[u8] =
    br#"{"status":"error","error":{"code":1601,"message":"Internal server error"}}"#;

/// Writes success and error envelopes for one operation
#[derive(Debug, Clone)]
pub struct Responder {
    logger: Logger,
    op: Arc<str>,
}

impl Responder {
    /// Create a responder for `op`
    pub fn new(logger: Logger, op: impl Into<Arc<str>>) -> Self {
        Self {
            logger,
            op: op.into(),
        }
    }

    /// Render a success envelope
    #[track_caller]
    pub fn write_success<W, T>(
        &self,
        writer: &mut W,
        status: StatusCode,
        message: &str,
        data: &T,
        pagination: Option<PaginationMeta>,
    ) where
        W: ResponseWriter + ?Sized,
        T: Serialize + ?Sized,
    {
        let envelope = SuccessEnvelope::new(data, message, pagination);
        match serde_json::to_vec(&envelope) {
            Ok(body) => self.send(writer, status, &body),
            Err(err) => self.encoding_failure(writer, &err),
        }
    }

    /// Log a failure and render its error envelope
    ///
    /// `diagnostic` is logged only; the client sees the code's fixed message
    /// and the optional `details`.
    #[track_caller]
    pub fn write_error<W>(
        &self,
        writer: &mut W,
        code: ErrorCode,
        diagnostic: &dyn Display,
        details: Option<Value>,
    ) where
        W: ResponseWriter + ?Sized,
    {
        self.logger.error(&self.op, code, diagnostic, details.as_ref());

        let envelope = ErrorEnvelope::new(code, details);
        match serde_json::to_vec(&envelope) {
            Ok(body) => self.send(writer, code.status_code(), &body),
            Err(err) => self.encoding_failure(writer, &err),
        }
    }

    /// Replace an unserializable body with the generic encoding error
    #[track_caller]
    fn encoding_failure<W>(&self, writer: &mut W, err: &serde_json::Error)
    where
        W: ResponseWriter + ?Sized,
    {
        let code = ErrorCode::JsonEncoding;
        self.logger.error(&self.op, code, err, None);

        let body = serde_json::to_vec(&ErrorEnvelope::new(code, None))
            .unwrap_or_else(|_| LAST_RESORT_BODY.to_vec());
        self.send(writer, code.status_code(), &body);
    }

    #[track_caller]
    fn send<W>(&self, writer: &mut W, status: StatusCode, body: &[u8])
    where
        W: ResponseWriter + ?Sized,
    {
        writer.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        writer.commit(status);

        // status is already out; nothing left to tell the client
        if let Err(err) = writer.write_body(body) {
            self.logger.error(&self.op, ErrorCode::ResponseWrite, &err, None);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::BrokenPipe;
    use super::*;
    use crate::handlers::BufferedResponse;
    use crate::observability::testing::CapturedLogs;
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    const OP: &str = "CategoryHandler.ListCategories";

    fn responder(logs: &CapturedLogs) -> Responder {
        Responder::new(logs.logger("ProductService"), OP)
    }

    fn body_json(writer: &BufferedResponse) -> Value {
        serde_json::from_slice(writer.body()).unwrap()
    }

    struct Node {
        name: &'static str,
        next: RefCell<Option<Rc<Node>>>,
    }

    /// Linked nodes serialized as a list of names; refuses to loop forever
    struct Chain(Rc<Node>);

    impl Serialize for Chain {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seen: Vec<Rc<Node>> = Vec::new();
            let mut current = Some(Rc::clone(&self.0));
            while let Some(node) = current {
                if seen.iter().any(|visited| Rc::ptr_eq(visited, &node)) {
                    return Err(S::Error::custom("encountered a cycle via Node"));
                }
                current = node.next.borrow().clone();
                seen.push(node);
            }
            let names: Vec<&str> = seen.iter().map(|node| node.name).collect();
            names.serialize(serializer)
        }
    }

    #[test]
    fn test_success_envelope() {
        let logs = CapturedLogs::default();
        let mut writer = BufferedResponse::new();

        responder(&logs).write_success(
            &mut writer,
            StatusCode::OK,
            "Successfully fetched list of categories",
            &json!([{"id": 1}]),
            Some(PaginationMeta::new(crate::pagination::Watermark::zero(), true)),
        );

        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(writer.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(&writer),
            json!({
                "status": "success",
                "data": [{"id": 1}],
                "pagination": {"next_cursor": "MDAwMS0wMS0wMVQwMDowMDowMFo", "has_more": true},
                "message": "Successfully fetched list of categories"
            })
        );
        assert!(logs.errors().is_empty());
    }

    #[test]
    fn test_error_is_logged_once_and_hides_diagnostic() {
        let logs = CapturedLogs::default();
        let mut writer = BufferedResponse::new();

        responder(&logs).write_error(
            &mut writer,
            ErrorCode::InternalServerError,
            &"connection refused by db-primary",
            None,
        );

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            std::str::from_utf8(writer.body()).unwrap(),
            r#"{"status":"error","error":{"code":1600,"message":"Internal server error"}}"#
        );

        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["op"], OP);
        assert_eq!(errors[0]["code"], 1600);
        assert_eq!(errors[0]["error"], "connection refused by db-primary");
        assert!(errors[0]["caller"].as_str().unwrap().starts_with(file!()));
    }

    #[test]
    fn test_error_details_reach_client_and_log() {
        let logs = CapturedLogs::default();
        let mut writer = BufferedResponse::new();

        responder(&logs).write_error(
            &mut writer,
            ErrorCode::InvalidFieldFormat,
            &"invalid limit value",
            Some(json!({"field": "limit"})),
        );

        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(body_json(&writer)["error"]["details"], json!({"field": "limit"}));
        assert_eq!(logs.errors()[0]["details"], r#"{"field":"limit"}"#);
    }

    #[test]
    fn test_cyclic_data_falls_back_to_generic_error() {
        let logs = CapturedLogs::default();
        let mut writer = BufferedResponse::new();

        let a = Rc::new(Node { name: "a", next: RefCell::new(None) });
        let b = Rc::new(Node { name: "b", next: RefCell::new(Some(Rc::clone(&a))) });
        *a.next.borrow_mut() = Some(Rc::clone(&b));

        let data = Chain(Rc::clone(&a));
        responder(&logs).write_success(&mut writer, StatusCode::OK, "ok", &data, None);

        // break the cycle so the nodes are freed
        a.next.borrow_mut().take();

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            body_json(&writer),
            json!({"status": "error", "error": {"code": 1601, "message": "Internal server error"}})
        );

        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["code"], 1601);
        assert_eq!(errors[0]["message"], "JSON encoding error");
        assert!(errors[0]["error"].as_str().unwrap().contains("encountered a cycle via Node"));
    }

    #[test]
    fn test_acyclic_chain_serializes() {
        let logs = CapturedLogs::default();
        let mut writer = BufferedResponse::new();

        let tail = Rc::new(Node { name: "b", next: RefCell::new(None) });
        let head = Rc::new(Node { name: "a", next: RefCell::new(Some(tail)) });

        responder(&logs).write_success(&mut writer, StatusCode::OK, "ok", &Chain(head), None);

        assert_eq!(body_json(&writer)["data"], json!(["a", "b"]));
    }

    #[test]
    fn test_transport_failure_is_logged_only() {
        let logs = CapturedLogs::default();
        let mut writer = BrokenPipe::default();

        responder(&logs).write_success(&mut writer, StatusCode::OK, "ok", &json!([]), None);

        assert_eq!(writer.inner.status(), Some(StatusCode::OK));
        let errors = logs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["code"], 1602);
        assert_eq!(errors[0]["message"], "Failed response writer");
        assert_eq!(errors[0]["error"], "connection reset by peer");
    }

    #[test]
    fn test_last_resort_body_is_valid_envelope() {
        let envelope: ErrorEnvelope = serde_json::from_slice(LAST_RESORT_BODY).unwrap();
        assert_eq!(envelope, ErrorEnvelope::new(ErrorCode::JsonEncoding, None));
    }
}
