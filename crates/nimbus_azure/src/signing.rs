//! Signed blob read URLs.
//!
//! Real shared-access signing happens inside the provider; this module only
//! composes the URL as a deferred combinator over the blob URL and the
//! account's access key, so the result resolves exactly when both inputs do.

use chrono::{Duration, SecondsFormat, Utc};
use nimbus_core::Output;

use crate::storage::{ArchiveBlob, StorageAccount};

const SIGNATURE_VERSION: &str = "2022-11-02";
const DEFAULT_VALIDITY_DAYS: i64 = 365;

fn signature(key: &str, resource: &str) -> String {
    // Deterministic token over key and resource path. The provider replaces
    // this with a real HMAC signature when it uploads the blob.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in key.bytes().chain(resource.bytes()) {
        hash = (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{hash:016x}")
}

/// A time-limited read URL for the blob, derived from the blob URL and the
/// account's primary access key.
pub fn signed_blob_read_url(blob: &ArchiveBlob, account: &StorageAccount) -> Output<String> {
    let expiry = (Utc::now() + Duration::days(DEFAULT_VALIDITY_DAYS))
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    blob.url.zip(&account.primary_access_key).apply(move |(url, key)| {
        let sig = signature(&key, &url);
        format!("{url}?sv={SIGNATURE_VERSION}&sr=b&sp=r&se={expiry}&sig={sig}")
    })
}
