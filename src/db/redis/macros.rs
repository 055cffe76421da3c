/// Read-through caching for provider calls.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues the result for a background write with `$ttl` seconds to live, and
/// returns it. A failed cache read is logged and treated as a miss. Errors from
/// `$block` are propagated with `?`, so the macro must be used inside a function
/// returning `AppResult`.
///
/// ```ignore
/// cached!(self.cache, CacheKey::VideoDetails(id.to_string()), DETAILS_CACHE_TTL, async move {
///     self.fetch_video(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let cached = match $cache.get_from_cache(&key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache read failed, fetching from source");
                None
            }
        };
        if let Some(cached) = cached {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::db::{create_redis_client, Cache, CacheKey};
    use crate::error::{AppError, AppResult};

    async fn unreachable_cache() -> Cache {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        Cache::new(client).await.0
    }

    async fn lookup(cache: &Cache, fail: bool) -> AppResult<Vec<String>> {
        cached!(
            cache,
            CacheKey::VideoDetails("macro_test".to_string()),
            60,
            async move {
                if fail {
                    return Err(AppError::ExternalApi("source down".to_string()));
                }
                Ok::<_, AppError>(vec!["fresh".to_string()])
            }
        )
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_through_to_source() {
        let cache = unreachable_cache().await;

        let value = lookup(&cache, false).await.unwrap();
        assert_eq!(value, vec!["fresh".to_string()]);
    }

    #[tokio::test]
    async fn test_source_error_still_propagates_without_cache() {
        let cache = unreachable_cache().await;

        let result = lookup(&cache, true).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
