//! Runtime feature checks.
//!
//! Optional integrations are switched on by a `use_*` flag in `AppConfig`
//! together with the matching configuration section. The `openapi` cargo
//! feature is the only compile-time switch.

use imagify_config::AppConfig;

/// A feature is enabled when its flag is set and its section is present.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Razorpay payment routes should be mounted.
pub fn is_razorpay_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_razorpay, config.razorpay.as_ref())
}
