use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{join_public_url, validate_object_path, ObjectStore, StorageConfig, StorageError};

/// [`ObjectStore`] backed by an S3-compatible service.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from `config` and the ambient AWS credential chain.
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        url::Url::parse(&config.public_base_url).map_err(|e| {
            StorageError::Config(format!(
                "STORAGE_PUBLIC_URL '{}' is not a URL: {e}",
                config.public_base_url
            ))
        })?;

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::info!(
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            region = %config.region,
            "Object storage client configured"
        );

        Ok(Self {
            client: Client::from_conf(s3_config),
            public_base_url: config.public_base_url.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_object_path(path)?;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("put {bucket}/{path}: {e}")))?;

        tracing::debug!(bucket, path, size, "Object uploaded");
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        join_public_url(&self.public_base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        validate_object_path(path)?;
        self.client
            .delete_object()
            .bucket(bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("delete {bucket}/{path}: {e}")))?;

        tracing::debug!(bucket, path, "Object removed");
        Ok(())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        validate_object_path(path)?;
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        path: path.to_string(),
                    }
                } else {
                    StorageError::Backend(format!("get {bucket}/{path}: {e}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("read {bucket}/{path}: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }
}
