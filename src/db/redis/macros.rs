/// Read-through caching around an async computation.
///
/// Checks the cache for `$key` and returns the hit if present. On a miss the
/// block is awaited, its value queued for a background cache write with the
/// given TTL, and returned.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`]
/// * `$key`: the [`crate::db::CacheKey`] to read and write
/// * `$ttl`: cache TTL in seconds
/// * `$block`: async block computing the value on a miss
///
/// # Example
/// ```ignore
/// let page = cached!(cache, CacheKey::TmdbPopular(1), 3600, async move {
///     fetch_popular_page(1)
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
