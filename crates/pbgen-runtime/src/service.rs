//! Typed CRUD over one collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ClientError;
use crate::model::Model;
use crate::record::Record;
use crate::transport::{record_path, records_path, Body, Method, Request, Transport};
use crate::Result;

/// Largest page the server hands out.
pub const MAX_PER_PAGE: u32 = 500;

/// Query refinements for single-record calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Relations to expand, comma separated.
    pub expand: String,
    /// Fields to return, comma separated.
    pub fields: String,
}

impl RecordOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = expand.into();
        self
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_non_empty(&mut query, "expand", &self.expand);
        push_non_empty(&mut query, "fields", &self.fields);
        query
    }
}

/// Query refinements for list calls. Zero and empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub filter: String,
    pub expand: String,
    pub fields: String,
    /// Ask the server not to count the total.
    pub skip_total: bool,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = expand.into();
        self
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    pub fn skip_total(mut self, skip_total: bool) -> Self {
        self.skip_total = skip_total;
        self
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if self.page > 0 {
            query.push(("page".to_string(), self.page.to_string()));
        }
        if self.per_page > 0 {
            query.push(("perPage".to_string(), self.per_page.to_string()));
        }
        push_non_empty(&mut query, "sort", &self.sort);
        push_non_empty(&mut query, "filter", &self.filter);
        push_non_empty(&mut query, "expand", &self.expand);
        push_non_empty(&mut query, "fields", &self.fields);
        if self.skip_total {
            query.push(("skipTotal".to_string(), "true".to_string()));
        }
        query
    }
}

fn push_non_empty(query: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !value.is_empty() {
        query.push((key.to_string(), value.to_string()));
    }
}

/// One page of a list call.
///
/// With `skip_total` the server reports `-1` for both totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    per_page: u32,
    #[serde(default)]
    total_items: i64,
    #[serde(default)]
    total_pages: i64,
    #[serde(default)]
    items: Vec<Record>,
}

/// Typed access to the records of one collection.
///
/// Holds only the collection name and a shared transport handle, so one
/// instance can serve any number of concurrent calls.
pub struct Service<T, Tr: ?Sized = dyn Transport> {
    collection: String,
    transport: Arc<Tr>,
    _model: PhantomData<fn() -> T>,
}

impl<T, Tr: ?Sized> Clone for Service<T, Tr> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            transport: Arc::clone(&self.transport),
            _model: PhantomData,
        }
    }
}

impl<T, Tr> Service<T, Tr>
where
    T: Model,
    Tr: Transport + ?Sized,
{
    pub fn new(collection: impl Into<String>, transport: Arc<Tr>) -> Self {
        Self {
            collection: collection.into(),
            transport,
            _model: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fetches one record. A 404 becomes [`ClientError::NotFound`].
    pub async fn get_one(
        &self,
        ctx: &CancellationToken,
        id: &str,
        options: Option<&RecordOptions>,
    ) -> Result<T> {
        let request = Request::new(Method::Get, record_path(&self.collection, id))
            .with_query(options.map(RecordOptions::query).unwrap_or_default());

        match self.send(ctx, request).await {
            Ok(value) => decode_model(value),
            Err(ClientError::Transport { status: 404, .. }) => Err(ClientError::NotFound {
                collection: self.collection.clone(),
                id: id.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    /// Fetches one page.
    pub async fn get_list(
        &self,
        ctx: &CancellationToken,
        options: Option<&ListOptions>,
    ) -> Result<ListResult<T>> {
        let request = Request::new(Method::Get, records_path(&self.collection))
            .with_query(options.map(ListOptions::query).unwrap_or_default());

        let value = self.send(ctx, request).await?;
        let response: ListResponse = serde_json::from_value(value).map_err(decode_error)?;

        Ok(ListResult {
            page: response.page,
            per_page: response.per_page,
            total_items: response.total_items,
            total_pages: response.total_pages,
            items: response.items.iter().map(T::from_record).collect(),
        })
    }

    /// Fetches every record, one page after another.
    ///
    /// Stops at the first page shorter than the page size; the reported
    /// total is never trusted since records may be added while paging.
    /// Any failure, including cancellation, discards what was collected.
    pub async fn get_all(
        &self,
        ctx: &CancellationToken,
        options: Option<&ListOptions>,
    ) -> Result<Vec<T>> {
        let mut page_options = options.cloned().unwrap_or_default();
        let per_page = match page_options.per_page {
            0 => MAX_PER_PAGE,
            n => n.min(MAX_PER_PAGE),
        };
        page_options.per_page = per_page;
        page_options.skip_total = true;

        let mut items = Vec::new();
        let mut page = 1;
        loop {
            if ctx.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            page_options.page = page;
            let result = self.get_list(ctx, Some(&page_options)).await?;
            let received = result.items.len();
            items.extend(result.items);

            debug!(collection = %self.collection, page, received, "fetched page");

            if received < per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Creates a record. An empty id lets the server assign one.
    pub async fn create(
        &self,
        ctx: &CancellationToken,
        model: &T,
        options: Option<&RecordOptions>,
    ) -> Result<T> {
        let mut record = model.to_record();
        if Model::id(&record).is_empty() {
            record.remove("id");
        }

        let request = Request::new(Method::Post, records_path(&self.collection))
            .with_query(options.map(RecordOptions::query).unwrap_or_default())
            .with_body(Body::Json(record.into()));

        decode_model(self.send(ctx, request).await?)
    }

    /// Updates the record `id` with the fields of `model`.
    pub async fn update(
        &self,
        ctx: &CancellationToken,
        id: &str,
        model: &T,
        options: Option<&RecordOptions>,
    ) -> Result<T> {
        let request = Request::new(Method::Patch, record_path(&self.collection, id))
            .with_query(options.map(RecordOptions::query).unwrap_or_default())
            .with_body(Body::Json(model.to_record().into()));

        decode_model(self.send(ctx, request).await?)
    }

    /// Deletes the record `id`. The request carries an explicit empty body.
    pub async fn delete(&self, ctx: &CancellationToken, id: &str) -> Result<()> {
        let request = Request::new(Method::Delete, record_path(&self.collection, id))
            .with_body(Body::empty());
        self.send(ctx, request).await?;
        Ok(())
    }

    async fn send(&self, ctx: &CancellationToken, request: Request) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "sending request");
        self.transport.send(ctx, request).await.map_err(ClientError::from)
    }
}

fn decode_model<T: Model>(value: Value) -> Result<T> {
    match value {
        Value::Object(map) => Ok(T::from_record(&Record::from(map))),
        other => Err(ClientError::Decode {
            message: format!("expected a record object, got {}", json_kind(&other)),
        }),
    }
}

fn decode_error(err: serde_json::Error) -> ClientError {
    ClientError::Decode {
        message: err.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_query() {
        let options = ListOptions::new()
            .page(2)
            .per_page(50)
            .sort("-created")
            .filter("")
            .skip_total(true);
        assert_eq!(
            options.query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("perPage".to_string(), "50".to_string()),
                ("sort".to_string(), "-created".to_string()),
                ("skipTotal".to_string(), "true".to_string()),
            ]
        );
        assert!(ListOptions::default().query().is_empty());
    }

    #[test]
    fn test_record_options_query() {
        let options = RecordOptions::new().expand("author").fields("id,title");
        assert_eq!(
            options.query(),
            vec![
                ("expand".to_string(), "author".to_string()),
                ("fields".to_string(), "id,title".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_model_rejects_non_objects() {
        let err = decode_model::<Record>(Value::Array(vec![])).unwrap_err();
        assert!(matches!(err, ClientError::Decode { message } if message.contains("an array")));
    }
}
