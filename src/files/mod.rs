//! Upload URL generation for avatar files.
//!
//! The real object storage service is an external collaborator; this module
//! only produces the boundary contract: a storage key, the target bucket,
//! and a time-limited signed PUT URL. Persisted metadata lives in the
//! `files` table.

use crate::error::Result;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where the client should upload, returned by
/// `files.generateUserAvatarUploadUrl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub signed_url: String,
    pub key: String,
    pub bucket: String,
}

/// Boundary to the object storage collaborator.
pub trait ObjectStore {
    /// Produce a pre-signed upload target for a user avatar.
    ///
    /// # Errors
    ///
    /// Returns an error if a target cannot be produced.
    fn presign_avatar_upload(&self, filename: &str, mime_type: &str) -> Result<UploadTarget>;
}

/// Signs upload URLs against a shared secret.
///
/// Keys follow the `avatars/{millis}-{filename}` convention so uploads never
/// collide and sort by time within the prefix.
#[derive(Debug, Clone)]
pub struct PresignedStore {
    endpoint: String,
    bucket: String,
    signing_secret: String,
    url_ttl_secs: u64,
}

impl PresignedStore {
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        signing_secret: impl Into<String>,
        url_ttl_secs: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            signing_secret: signing_secret.into(),
            url_ttl_secs,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn sign(&self, method: &str, key: &str, expires_at: i64) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.signing_secret.as_str(),
            method,
            key,
            &expires_at.to_string(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Check a signature produced by [`Self::sign`] and its expiry.
    #[must_use]
    pub fn verify(&self, method: &str, key: &str, expires_at: i64, signature: &str) -> bool {
        expires_at >= Utc::now().timestamp() && self.sign(method, key, expires_at) == signature
    }
}

/// Keep the original filename readable in the key without letting path
/// separators or query metacharacters through.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl ObjectStore for PresignedStore {
    fn presign_avatar_upload(&self, filename: &str, _mime_type: &str) -> Result<UploadTarget> {
        let now = Utc::now();
        let key = format!(
            "avatars/{}-{}",
            now.timestamp_millis(),
            sanitize_filename(filename)
        );
        let expires_at = now.timestamp() + i64::try_from(self.url_ttl_secs).unwrap_or(i64::MAX);
        let signature = self.sign("PUT", &key, expires_at);
        let signed_url = format!(
            "{}/{}/{}?X-Expires={}&X-Signature={}",
            self.endpoint, self.bucket, key, expires_at, signature
        );
        Ok(UploadTarget {
            signed_url,
            key,
            bucket: self.bucket.clone(),
        })
    }
}
