//! Spoken-word image descriptions.
//!
//! Sends an image to an OpenAI-compatible vision model and returns a text
//! description aimed at screen reader users. Results are cached on disk.

mod cache;
mod client;
mod credentials;
mod retry;

pub use cache::DescriptionCache;
pub use credentials::{prompt_for_api_key, save_api_key, setup_client, API_KEY_URL, ENV_FILE};
pub use client::{
    image_data_url, mask_api_key, DescribeError, DescriptionClient, API_KEY_ENV,
    DEFAULT_BASE_URL, DEFAULT_MODEL, DESCRIPTION_PROMPT, MAX_TOKENS,
};
pub use retry::{
    calculate_backoff, is_transient_network_error, parse_retry_after, RetryPolicy,
    DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX, DEFAULT_MAX_RETRIES, DEFAULT_NETWORK_RETRIES,
};

/// Describe `image` with `client`, consulting `cache` first and storing a
/// fresh description afterwards. A failed cache write is logged, not
/// returned.
pub async fn describe_cached(
    client: &DescriptionClient,
    cache: &DescriptionCache,
    image: &[u8],
) -> Result<String, DescribeError> {
    if let Some(hit) = cache.get(client.model(), image) {
        return Ok(hit);
    }
    let description = client.describe_with_retry(image).await?;
    if let Err(e) = cache.store(client.model(), image, &description) {
        log::warn!("failed to cache description: {}", e);
    }
    Ok(description)
}
