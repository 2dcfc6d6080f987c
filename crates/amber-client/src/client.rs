//! Main client implementation

use crate::{
    query::encode_segment,
    transport::{RequestDescriptor, Transport},
    types::*,
    Config, Outcome, Result,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

/// Amber storage client
#[derive(Clone, Debug)]
pub struct AmberClient {
    config: Config,
    transport: Transport,
}

impl AmberClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Create with default configuration
    pub fn default_local() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Create with endpoint URL
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Self::new(Config::new(endpoint))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The transport core, for requests this client has no wrapper for
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // ==================== Storage Info ====================

    /// Quota status and per-product usage
    #[instrument(skip(self))]
    pub async fn get_storage_info(&self) -> Outcome<StorageInfoResponse> {
        self.transport.send(RequestDescriptor::get("")).await
    }

    // ==================== Files ====================

    /// List files matching `options`
    #[instrument(skip(self))]
    pub async fn get_files(&self, options: &FilesOptions) -> Outcome<FilesResponse> {
        let path = options.to_query().append_to("/files");
        self.transport.send(RequestDescriptor::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn get_file(&self, id: &str) -> Outcome<StorageFile> {
        let path = format!("/files/{}", encode_segment(id));
        self.transport.send(RequestDescriptor::get(path)).await
    }

    /// Move a file to the trash
    #[instrument(skip(self))]
    pub async fn delete_file(&self, id: &str) -> Outcome<ActionResponse> {
        let path = format!("/files/{}", encode_segment(id));
        self.transport.send(RequestDescriptor::delete(path)).await
    }

    /// Bring a file back out of the trash
    #[instrument(skip(self))]
    pub async fn restore_file(&self, id: &str) -> Outcome<ActionResponse> {
        let path = format!("/files/{}/restore", encode_segment(id));
        self.transport.send(RequestDescriptor::post(path)).await
    }

    // ==================== Trash ====================

    #[instrument(skip(self))]
    pub async fn get_trash(&self) -> Outcome<TrashResponse> {
        self.transport.send(RequestDescriptor::get("/trash")).await
    }

    #[instrument(skip(self))]
    pub async fn empty_trash(&self) -> Outcome<EmptyTrashResponse> {
        self.transport.send(RequestDescriptor::delete("/trash")).await
    }

    /// Delete a trashed file for good
    #[instrument(skip(self))]
    pub async fn permanently_delete_file(&self, id: &str) -> Outcome<PermanentDeleteResponse> {
        let path = format!("/trash/{}", encode_segment(id));
        self.transport.send(RequestDescriptor::delete(path)).await
    }

    // ==================== Exports ====================

    /// Queue an export job
    #[instrument(skip(self))]
    pub async fn create_export(&self, request: &CreateExportRequest) -> Outcome<ExportResponse> {
        self.send_json(RequestDescriptor::post("/export"), request).await
    }

    /// Current state of an export job
    #[instrument(skip(self))]
    pub async fn get_export(&self, id: &str) -> Outcome<StorageExport> {
        let path = format!("/export/{}", encode_segment(id));
        self.transport.send(RequestDescriptor::get(path)).await
    }

    /// Signed download link of a finished export
    #[instrument(skip(self))]
    pub async fn get_export_download(&self, id: &str) -> Outcome<ExportDownload> {
        let path = format!("/export/{}/download", encode_segment(id));
        self.transport.send(RequestDescriptor::get(path)).await
    }

    // ==================== Add-ons ====================

    /// Add-ons on offer and add-ons already bought
    #[instrument(skip(self))]
    pub async fn get_addons(&self) -> Outcome<AddonsResponse> {
        self.transport.send(RequestDescriptor::get("/addons")).await
    }

    /// Start checkout for an add-on
    #[instrument(skip(self))]
    pub async fn purchase_addon(&self, addon_type: &str) -> Outcome<PurchaseAddonResponse> {
        let request = PurchaseAddonRequest {
            addon_type: addon_type.to_string(),
        };
        self.send_json(RequestDescriptor::post("/addons"), &request).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_addon(&self, id: &str) -> Outcome<ActionResponse> {
        let path = format!("/addons/{}", encode_segment(id));
        self.transport.send(RequestDescriptor::delete(path)).await
    }

    // ==================== Download ====================

    /// Download path of a stored object, relative to the server origin
    pub fn download_path(&self, key: &str) -> String {
        let key = encode_segment(key);
        match self.config.base_path.trim_matches('/') {
            "" => format!("/download/{}", key),
            base_path => format!("/{}/download/{}", base_path, key),
        }
    }

    /// Absolute download URL of a stored object. No request is made.
    pub fn download_url(&self, key: &str) -> String {
        self.transport
            .url_for(&format!("/download/{}", encode_segment(key)))
    }

    // ==================== Helper Methods ====================

    async fn send_json<B, T>(&self, descriptor: RequestDescriptor, body: &B) -> Outcome<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match descriptor.json(body) {
            Ok(descriptor) => self.transport.send(descriptor).await,
            Err(err) => Outcome::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_key() {
        let client = AmberClient::with_endpoint("https://amber.example").unwrap();

        let url = client.download_url("blog/2024/header image.png");
        assert_eq!(
            url,
            "https://amber.example/api/storage/download/blog%2F2024%2Fheader%20image.png"
        );
        assert_eq!(url, client.download_url("blog/2024/header image.png"));
    }

    #[test]
    fn test_download_path_is_relative() {
        let client = AmberClient::with_endpoint("https://amber.example").unwrap();
        assert_eq!(client.download_path("a/b"), "/api/storage/download/a%2Fb");
    }
}
