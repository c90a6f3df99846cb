//! Cache key composition.

use reqwest::Method;

/// Builds the cache key for a request: `"<METHOD>:<url>"`.
pub fn cache_key(method: &Method, url: &str) -> String {
    format!("{}:{}", method.as_str(), url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_key_format() {
        assert_eq!(
            cache_key(&Method::GET, "/api/influencers"),
            "GET:/api/influencers"
        );
    }

    proptest! {
        #[test]
        fn property_key_is_deterministic(url in "/[a-z/?=&0-9]{0,40}") {
            prop_assert_eq!(cache_key(&Method::GET, &url), cache_key(&Method::GET, &url));
        }

        #[test]
        fn property_method_separates_keys(url in "/[a-z/0-9]{0,40}") {
            prop_assert_ne!(cache_key(&Method::GET, &url), cache_key(&Method::POST, &url));
            prop_assert_ne!(cache_key(&Method::PUT, &url), cache_key(&Method::DELETE, &url));
        }
    }
}
