//! Configuration access port trait.

/// Typed access to `[section] key = value` configuration. Lookups with a
/// default never fail; absence is only observable through [`get_string`].
///
/// [`get_string`]: ConfigPort::get_string
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
