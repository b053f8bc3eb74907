//! Pre-signed attachment uploads

use crate::{CoreError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    presigning::PresigningConfig,
    Client,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default lifetime of an upload URL
pub const DEFAULT_UPLOAD_EXPIRY: Duration = Duration::from_secs(300);

/// A signed, time-limited write URL for one object
#[derive(Clone, Debug, PartialEq)]
pub struct PresignedUpload {
    /// URL the client PUTs the file to
    pub upload_url: String,
    /// Where the object will be readable once uploaded
    pub object_url: String,
    /// When the upload URL stops working
    pub expires_at: DateTime<Utc>,
}

/// Issues pre-signed upload URLs
#[async_trait]
pub trait UploadUrlSigner: Send + Sync {
    /// Sign a single PUT for `object_key`
    async fn presign_upload(&self, object_key: &str) -> Result<PresignedUpload>;
}

/// Upload signer for an S3 (or S3-compatible) bucket
#[derive(Clone)]
pub struct S3UploadSigner {
    client: Client,
    bucket: String,
    endpoint: Option<String>,
    expires_in: Duration,
}

impl S3UploadSigner {
    /// Create a signer from shared AWS configuration.
    ///
    /// A custom `endpoint` switches to path-style addressing, which is what
    /// MinIO and LocalStack expect.
    pub fn from_sdk_config(
        config: &SdkConfig,
        bucket: impl Into<String>,
        endpoint: Option<String>,
        expires_in: Duration,
    ) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(config);
        if let Some(url) = &endpoint {
            builder = builder.endpoint_url(url).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.into(),
            endpoint,
            expires_in,
        }
    }

    /// Create a signer with fixed credentials
    pub fn with_static_credentials(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "todo-static",
            ))
            .build();

        Self {
            client: Client::from_conf(config),
            bucket: bucket.into(),
            endpoint: None,
            expires_in,
        }
    }

    /// Bucket receiving attachments
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public location of an object in the bucket
    pub fn object_url(&self, object_key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                object_key
            ),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, object_key),
        }
    }
}

#[async_trait]
impl UploadUrlSigner for S3UploadSigner {
    async fn presign_upload(&self, object_key: &str) -> Result<PresignedUpload> {
        let presigning = PresigningConfig::expires_in(self.expires_in)
            .map_err(|e| CoreError::Signing(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(object_key)
            .presigned(presigning)
            .await
            .map_err(|e| CoreError::Signing(DisplayErrorContext(e).to_string()))?;

        let expires_in = chrono::Duration::from_std(self.expires_in)
            .map_err(|e| CoreError::Signing(e.to_string()))?;

        Ok(PresignedUpload {
            upload_url: request.uri().to_string(),
            object_url: self.object_url(object_key),
            expires_at: Utc::now() + expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> S3UploadSigner {
        S3UploadSigner::with_static_credentials(
            "us-east-1",
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "todo-attachments",
            DEFAULT_UPLOAD_EXPIRY,
        )
    }

    #[tokio::test]
    async fn test_presign_upload_url() {
        let upload = signer().presign_upload("todo-123").await.unwrap();

        assert!(upload.upload_url.contains("todo-attachments"));
        assert!(upload.upload_url.contains("/todo-123?"));
        assert!(upload.upload_url.contains("X-Amz-Signature="));
        assert!(upload.upload_url.contains("X-Amz-Expires=300"));
        assert_eq!(
            upload.object_url,
            "https://todo-attachments.s3.amazonaws.com/todo-123"
        );
        assert!(upload.expires_at > Utc::now());
    }

    #[test]
    fn test_object_url_with_custom_endpoint() {
        let config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let signer = S3UploadSigner::from_sdk_config(
            &config,
            "attachments",
            Some("http://localhost:4566/".to_string()),
            DEFAULT_UPLOAD_EXPIRY,
        );

        assert_eq!(
            signer.object_url("abc"),
            "http://localhost:4566/attachments/abc"
        );
    }
}
