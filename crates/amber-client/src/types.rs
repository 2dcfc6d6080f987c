//! Request and response types for the storage API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::query::QueryParams;

macro_rules! opaque_entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl $name {
            /// Look up a field of the entity
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

            /// Look up a string field of the entity
            pub fn get_str(&self, field: &str) -> Option<&str> {
                self.0.get(field).and_then(Value::as_str)
            }

            /// The entity's `id`, if it carries one
            pub fn id(&self) -> Option<&str> {
                self.get_str("id")
            }
        }
    };
}

opaque_entity!(
    /// A stored file, as the API describes it
    StorageFile
);
opaque_entity!(
    /// The account's quota status
    QuotaStatus
);
opaque_entity!(
    /// Usage of one product or category
    UsageBreakdown
);
opaque_entity!(
    /// An export job record
    StorageExport
);

// ==================== Enumerations ====================

/// Sort key for file listings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    SizeBytes,
    Filename,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::SizeBytes => "size_bytes",
            Self::Filename => "filename",
        }
    }
}

/// Sort direction for file listings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// What an export job packages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    Full,
    Blog,
    Ivy,
    Category,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Blog => "blog",
            Self::Ivy => "ivy",
            Self::Category => "category",
        }
    }
}

macro_rules! wire_enum_str {
    ($name:ident, [$($variant:ident),+]) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                let expected = [$(Self::$variant.as_str()),+].join(", ");
                Err(format!(
                    "invalid {} '{}', expected one of: {}",
                    stringify!($name),
                    s,
                    expected
                ))
            }
        }
    };
}

wire_enum_str!(SortKey, [CreatedAt, SizeBytes, Filename]);
wire_enum_str!(SortOrder, [Asc, Desc]);
wire_enum_str!(ExportType, [Full, Blog, Ivy, Category]);

// ==================== Requests ====================

/// Filters, sorting and paging for file listings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilesOptions {
    /// Only files of this product
    pub product: Option<String>,
    /// Only files of this category
    pub category: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
    /// Maximum files to return. `Some(0)` is sent as `limit=0`, not
    /// dropped.
    pub limit: Option<u64>,
    /// Files to skip. `Some(0)` is sent as `offset=0`.
    pub offset: Option<u64>,
}

impl FilesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query parameters in their fixed order:
    /// product, category, search, sort, order, limit, offset
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push_str("product", self.product.as_deref())
            .push_str("category", self.category.as_deref())
            .push_str("search", self.search.as_deref())
            .push_display("sort", self.sort.as_ref())
            .push_display("order", self.order.as_ref())
            .push_num("limit", self.limit)
            .push_num("offset", self.offset);
        params
    }
}

/// Body of an export creation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExportRequest {
    #[serde(rename = "type")]
    pub export_type: ExportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<BTreeMap<String, String>>,
}

impl CreateExportRequest {
    pub fn new(export_type: ExportType) -> Self {
        Self {
            export_type,
            filters: None,
        }
    }

    /// Add one filter entry
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Body of an add-on purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseAddonRequest {
    pub addon_type: String,
}

// ==================== Responses ====================

/// Quota and per-product usage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageInfoResponse {
    pub quota: QuotaStatus,
    pub breakdown: Vec<UsageBreakdown>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<StorageFile>,
    /// Files matching the filters, across all pages
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement of a delete, restore or cancel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Trashed files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrashResponse {
    pub files: Vec<StorageFile>,
    /// Bytes held by the trash
    pub total_size: u64,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyTrashResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub freed_bytes: u64,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentDeleteResponse {
    pub success: bool,
    pub freed_bytes: u64,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A freshly queued export job
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub export_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signed download link of a finished export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDownload {
    pub download_url: String,
    /// Expiry time, in whatever format the API sends
    pub expires_at: String,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportDownload {
    /// `expires_at` as a UTC time, when it is in a recognised format
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }
}

/// Add-on offered for purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableAddon {
    #[serde(rename = "type")]
    pub addon_type: String,
    /// Extra capacity in GB
    pub gb: u64,
    pub price_cents: u64,
    /// Formatted price, e.g. "$4.99/mo"
    pub price_display: String,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Add-on the account already bought
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedAddon {
    pub id: String,
    pub addon_type: String,
    pub gb_amount: u64,
    pub active: bool,
    pub created_at: String,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PurchasedAddon {
    /// `created_at` as a UTC time, when it is in a recognised format
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonsResponse {
    pub available: Vec<AvailableAddon>,
    pub purchased: Vec<PurchasedAddon>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Checkout handoff for an add-on purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseAddonResponse {
    pub message: String,
    pub redirect_url: String,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM:SS` one read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_files_query_is_stable() {
        let options = FilesOptions::new()
            .sort(SortKey::Filename)
            .order(SortOrder::Asc)
            .limit(10);

        let first = options.to_query().to_query_string();
        let second = options.clone().to_query().to_query_string();
        assert_eq!(first, "sort=filename&order=asc&limit=10");
        assert_eq!(first, second);
    }

    #[test]
    fn test_files_query_field_order() {
        // Builder order must not leak into the query string
        let options = FilesOptions::new()
            .offset(20)
            .limit(10)
            .order(SortOrder::Desc)
            .sort(SortKey::SizeBytes)
            .search("q")
            .category("images")
            .product("blog");

        assert_eq!(
            options.to_query().to_query_string(),
            "product=blog&category=images&search=q&sort=size_bytes&order=desc&limit=10&offset=20"
        );
    }

    #[test]
    fn test_empty_options_have_no_query() {
        let options = FilesOptions {
            product: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(options.to_query().append_to("/files"), "/files");
    }

    #[test]
    fn test_create_export_body() {
        let body = serde_json::to_value(CreateExportRequest::new(ExportType::Blog)).unwrap();
        assert_eq!(body, json!({ "type": "blog" }));

        let body = serde_json::to_value(
            CreateExportRequest::new(ExportType::Category).with_filter("category", "invoices"),
        )
        .unwrap();
        assert_eq!(
            body,
            json!({ "type": "category", "filters": { "category": "invoices" } })
        );
    }

    #[test]
    fn test_wire_enum_parsing() {
        assert_eq!("size_bytes".parse::<SortKey>().unwrap(), SortKey::SizeBytes);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("ivy".parse::<ExportType>().unwrap(), ExportType::Ivy);
        assert_eq!(ExportType::Full.to_string(), "full");

        let err = "name".parse::<SortKey>().unwrap_err();
        assert!(err.contains("created_at, size_bytes, filename"));
    }

    #[test]
    fn test_opaque_entity_passthrough() {
        let raw = json!({
            "id": "f1",
            "filename": "a.png",
            "size_bytes": 12,
            "extra": { "x": 1 }
        });
        let file: StorageFile = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(file.id(), Some("f1"));
        assert_eq!(file.get_str("filename"), Some("a.png"));
        assert_eq!(serde_json::to_value(&file).unwrap(), raw);
    }

    #[test]
    fn test_addons_response_decodes() {
        let body = json!({
            "available": [
                {
                    "type": "extra_100gb",
                    "gb": 100,
                    "price_cents": 499,
                    "price_display": "$4.99/mo"
                }
            ],
            "purchased": [
                {
                    "id": "a1",
                    "addon_type": "extra_100gb",
                    "gb_amount": 100,
                    "active": true,
                    "created_at": "2024-05-01T12:00:00Z"
                }
            ]
        });

        let addons: AddonsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(addons.available[0].addon_type, "extra_100gb");
        assert_eq!(addons.purchased[0].gb_amount, 100);
        assert!(addons.purchased[0].active);
        assert_eq!(
            addons.purchased[0].created_at_utc().unwrap().to_rfc3339(),
            "2024-05-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_timestamp_without_offset_still_decodes() {
        let body = json!({
            "id": "a2",
            "addon_type": "extra_1tb",
            "gb_amount": 1000,
            "active": false,
            "created_at": "2024-05-01 12:00:00"
        });

        let addon: PurchasedAddon = serde_json::from_value(body).unwrap();
        assert_eq!(addon.created_at, "2024-05-01 12:00:00");
        assert_eq!(
            addon.created_at_utc().unwrap().to_rfc3339(),
            "2024-05-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_unparsable_timestamp_is_kept_verbatim() {
        let body = json!({ "download_url": "https://cdn.example/e.zip", "expires_at": "tomorrow" });

        let link: ExportDownload = serde_json::from_value(body).unwrap();
        assert_eq!(link.expires_at, "tomorrow");
        assert!(link.expires_at_utc().is_none());
    }

    #[test]
    fn test_response_keeps_unmodelled_fields() {
        let body = json!({
            "files": [],
            "total": 0,
            "limit": 50,
            "offset": 0,
            "has_more": false
        });

        let page: FilesResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(page.extra.get("has_more"), Some(&Value::Bool(false)));
        assert_eq!(serde_json::to_value(&page).unwrap(), body);
    }

    #[test]
    fn test_zero_limit_is_sent() {
        let options = FilesOptions::new().limit(0).offset(0);
        assert_eq!(options.to_query().to_query_string(), "limit=0&offset=0");
    }
}
