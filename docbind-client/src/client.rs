//! The remote-client abstraction.

use crate::error::ClientResult;
use async_trait::async_trait;
use docbind_query::Expr;
use docbind_types::Ref;
use serde_json::Value;

/// A client able to evaluate operations against the remote document store.
///
/// Every method is a single suspend point that resolves with a plain JSON
/// resource or fails with a [`ClientError`](crate::ClientError). Retries,
/// timeouts and connection handling are the implementation's business.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Evaluates a query expression.
    async fn query(&self, expr: &Expr) -> ClientResult<Value>;

    /// Fetches the resource at `r`.
    async fn get(&self, r: &Ref) -> ClientResult<Value> {
        self.query(&Expr::get(r)).await
    }

    /// Creates an instance of the class named by `class_ref` from a raw
    /// document, returning the stored resource.
    async fn post(&self, class_ref: &Ref, doc: &Value) -> ClientResult<Value> {
        self.query(&Expr::create(class_ref, Expr::value(doc.clone())))
            .await
    }
}
