use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fixed transformation applied to every profile photo: square crop centred
/// on the detected face region.
const PHOTO_TRANSFORMATION: &str = "c_fill,g_face,h_500,w_500";

const SIGNATURE_ALGORITHM: &str = "sha256";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// API endpoint base, normally `https://api.cloudinary.com`.
    pub base_url: String,

    pub cloud_name: String,

    pub api_key: String,

    pub api_secret: String,
}

/// The usable reference returned by a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        Url::parse(&config.base_url).context("Invalid Cloudinary base URL")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Uploads an image and returns the hosted reference.
    ///
    /// Single attempt. Any transport error, non-success status, or response
    /// without a usable reference is surfaced to the caller.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResult> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_upload(&timestamp, PHOTO_TRANSFORMATION, &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("transformation", PHOTO_TRANSFORMATION)
            .text("signature_algorithm", SIGNATURE_ALGORITHM)
            .text("signature", signature);

        debug!(file_name, "Uploading image to Cloudinary");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("Cloudinary upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Cloudinary returned {status}: {body}");
        }

        let result: UploadResult = response
            .json()
            .await
            .context("Failed to parse Cloudinary response")?;

        if result.secure_url.is_empty() || result.public_id.is_empty() {
            bail!("Cloudinary response is missing the asset reference");
        }

        info!(public_id = %result.public_id, "Image uploaded");

        Ok(result)
    }
}

/// Parameters that participate in the request signature, in the alphabetical
/// order Cloudinary expects, with the API secret appended.
fn string_to_sign(timestamp: &str, transformation: &str, api_secret: &str) -> String {
    format!(
        "signature_algorithm={SIGNATURE_ALGORITHM}&timestamp={timestamp}&transformation={transformation}{api_secret}"
    )
}

fn sign_upload(timestamp: &str, transformation: &str, api_secret: &str) -> String {
    use sha2::{Digest, Sha256};

    let payload = string_to_sign(timestamp, transformation, api_secret);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_sign_orders_params_and_appends_secret() {
        let payload = string_to_sign("1700000000", "c_fill,g_face,h_500,w_500", "shhh");
        assert_eq!(
            payload,
            "signature_algorithm=sha256&timestamp=1700000000&transformation=c_fill,g_face,h_500,w_500shhh"
        );
    }

    #[test]
    fn signature_is_hex_sha256_and_keyed_on_secret() {
        let a = sign_upload("1700000000", PHOTO_TRANSFORMATION, "secret-a");
        let b = sign_upload("1700000000", PHOTO_TRANSFORMATION, "secret-b");

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        assert_eq!(a, sign_upload("1700000000", PHOTO_TRANSFORMATION, "secret-a"));
    }

    #[test]
    fn upload_url_is_built_from_cloud_name() {
        let client = CloudinaryClient::new(CloudinaryConfig {
            base_url: "https://api.cloudinary.com".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = CloudinaryClient::new(CloudinaryConfig {
            base_url: "not a url".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });

        assert!(result.is_err());
    }
}
