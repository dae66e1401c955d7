//! Azure Blob Storage uploads over the REST API.
//!
//! Requests are authorized with the connection string's SAS token when it has
//! one, otherwise with a SharedKey signature.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;
use std::collections::HashMap;
use tracing::debug;

use super::ObjectStore;
use crate::error::{IngestError, Result};

type HmacSha256 = Hmac<Sha256>;

const API_VERSION: &str = "2021-08-06";
const CONTENT_TYPE: &str = "application/json";
const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Parsed `AZURE_STORAGE_CONNECTION_STRING`.
#[derive(Debug, Clone, PartialEq)]
pub struct AzureConnection {
    pub account_name: String,
    pub account_key: Option<Vec<u8>>,
    pub blob_endpoint: String,
    pub sas_token: Option<String>,
}

impl AzureConnection {
    pub fn parse(connection_string: &str) -> Result<Self> {
        let parts: HashMap<String, String> = connection_string
            .split(';')
            .filter_map(|part| part.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        if parts.get("UseDevelopmentStorage").map(|v| v.eq_ignore_ascii_case("true")) == Some(true) {
            return Ok(Self {
                account_name: DEV_ACCOUNT_NAME.to_string(),
                account_key: Some(decode_key(DEV_ACCOUNT_KEY)?),
                blob_endpoint: format!("http://127.0.0.1:10000/{}", DEV_ACCOUNT_NAME),
                sas_token: None,
            });
        }

        let account_name = parts
            .get("AccountName")
            .cloned()
            .ok_or_else(|| IngestError::Config("connection string has no AccountName".to_string()))?;
        let account_key = parts.get("AccountKey").map(|k| decode_key(k)).transpose()?;
        let sas_token = parts
            .get("SharedAccessSignature")
            .map(|s| s.trim_start_matches('?').to_string());
        if account_key.is_none() && sas_token.is_none() {
            return Err(IngestError::Config(
                "connection string needs AccountKey or SharedAccessSignature".to_string(),
            ));
        }

        let blob_endpoint = match parts.get("BlobEndpoint") {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let protocol = parts.get("DefaultEndpointsProtocol").map(String::as_str).unwrap_or("https");
                let suffix = parts.get("EndpointSuffix").map(String::as_str).unwrap_or("core.windows.net");
                format!("{}://{}.blob.{}", protocol, account_name, suffix)
            }
        };

        Ok(Self {
            account_name,
            account_key,
            blob_endpoint,
            sas_token,
        })
    }
}

fn decode_key(key: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(key)
        .map_err(|e| IngestError::Config(format!("AccountKey is not valid base64: {}", e)))
}

/// Canonical string-to-sign for a `Put Blob` request.
pub fn string_to_sign(
    account_name: &str,
    resource_path: &str,
    content_length: usize,
    if_none_match: Option<&str>,
    ms_date: &str,
) -> String {
    let length = if content_length == 0 { String::new() } else { content_length.to_string() };
    format!(
        "PUT\n\n\n{length}\n\n{content_type}\n\n\n\n{if_none_match}\n\n\n\
         x-ms-blob-type:BlockBlob\nx-ms-date:{ms_date}\nx-ms-version:{version}\n/{account}{path}",
        length = length,
        content_type = CONTENT_TYPE,
        if_none_match = if_none_match.unwrap_or_default(),
        ms_date = ms_date,
        version = API_VERSION,
        account = account_name,
        path = resource_path,
    )
}

pub fn sign(account_key: &[u8], string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(account_key)
        .map_err(|e| IngestError::Config(format!("invalid account key: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

pub struct AzureBlobStore {
    client: reqwest::Client,
    connection: AzureConnection,
}

impl AzureBlobStore {
    pub fn new(connection: AzureConnection) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, connection })
    }

    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        Self::new(AzureConnection::parse(connection_string)?)
    }

    pub fn account_name(&self) -> &str {
        &self.connection.account_name
    }

    /// `{endpoint}/{container}/{key}` with each key segment percent-encoded,
    /// plus the SAS token as query string when there is one.
    fn blob_url(&self, container: &str, key: &str) -> Result<Url> {
        let endpoint = &self.connection.blob_endpoint;
        let mut url = Url::parse(endpoint)
            .map_err(|e| IngestError::Config(format!("invalid blob endpoint {}: {}", endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| IngestError::Config(format!("blob endpoint {} cannot be a base", endpoint)))?
            .pop_if_empty()
            .push(container)
            .extend(key.split('/'));
        url.set_query(self.connection.sas_token.as_deref());
        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    fn name(&self) -> &str {
        "azure_blob"
    }

    async fn put(&self, container: &str, key: &str, payload: Vec<u8>, overwrite: bool) -> Result<()> {
        let url = self.blob_url(container, key)?;
        let ms_date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let if_none_match = (!overwrite).then_some("*");

        let mut request = self
            .client
            .put(url.clone())
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &ms_date)
            .header("x-ms-version", API_VERSION)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE);
        if let Some(value) = if_none_match {
            request = request.header(reqwest::header::IF_NONE_MATCH, value);
        }
        if self.connection.sas_token.is_none() {
            if let Some(account_key) = &self.connection.account_key {
                let to_sign = string_to_sign(
                    &self.connection.account_name,
                    url.path(),
                    payload.len(),
                    if_none_match,
                    &ms_date,
                );
                let signature = sign(account_key, &to_sign)?;
                request = request.header(
                    reqwest::header::AUTHORIZATION,
                    format!("SharedKey {}:{}", self.connection.account_name, signature),
                );
            }
        }

        debug!(container, key, bytes = payload.len(), "Uploading blob");
        let response = request.body(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Archive(format!(
                "upload of {}/{} failed with HTTP {}: {}",
                container, key, status, body
            )));
        }
        Ok(())
    }
}
