use std::collections::HashMap;

use crate::core::config::ZendeskConfig;

/// Sentinel returned for carriers with no configured tag. Distinct from the
/// empty-string sentinel used by the other tables; downstream reporting
/// filters on this literal.
const CARRIER_NOT_FOUND: &str = "Carrier Not Found";

/// Immutable lookup tables mapping the domain vocabulary (human status
/// strings, carrier display names, requestor-type codes) to the opaque ids
/// the helpdesk system uses. Built once at startup from configuration and
/// shared by reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TagResolver {
    status_tags: HashMap<String, String>,
    carrier_tags: HashMap<String, String>,
    requestor_tags: HashMap<i32, String>,
}

impl TagResolver {
    pub fn new(
        status_tags: HashMap<String, String>,
        carrier_tags: HashMap<String, String>,
        requestor_tags: HashMap<i32, String>,
    ) -> Self {
        Self {
            status_tags,
            carrier_tags,
            requestor_tags,
        }
    }

    pub fn from_config(config: &ZendeskConfig) -> Self {
        Self::new(
            config.status_tags.clone(),
            config.carrier_tags.clone(),
            config.requestor_tags.clone(),
        )
    }

    /// Resolves a human ticket status to its remote tag id. Status strings
    /// arrive with trailing whitespace from some sources, so the key match
    /// trims the end. Unknown statuses resolve to an empty string.
    pub fn status_tag(&self, status: &str) -> String {
        self.status_tags
            .get(status.trim_end())
            .cloned()
            .unwrap_or_default()
    }

    /// Resolves a carrier display name to its remote tag. Unknown carriers
    /// resolve to the literal "Carrier Not Found" sentinel.
    pub fn carrier_tag(&self, carrier_name: &str) -> String {
        self.carrier_tags
            .get(carrier_name.trim())
            .cloned()
            .unwrap_or_else(|| CARRIER_NOT_FOUND.to_string())
    }

    /// Resolves a requestor-type code to its tag string. Unknown codes
    /// resolve to an empty string.
    pub fn requestor_type_tag(&self, code: i32) -> String {
        self.requestor_tags.get(&code).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TagResolver {
        TagResolver::new(
            HashMap::from([
                ("New".to_string(), "111".to_string()),
                ("Closed Approved".to_string(), "222".to_string()),
            ]),
            HashMap::from([("Acme Health".to_string(), "carrier_acme".to_string())]),
            HashMap::from([(1, "requestor_member".to_string())]),
        )
    }

    #[test]
    fn test_status_tag_lookup() {
        let r = resolver();
        assert_eq!(r.status_tag("New"), "111");
        assert_eq!(r.status_tag("Closed Approved"), "222");
    }

    #[test]
    fn test_status_tag_ignores_trailing_whitespace() {
        let r = resolver();
        assert_eq!(r.status_tag("New  "), "111");
    }

    #[test]
    fn test_unknown_status_resolves_to_empty() {
        let r = resolver();
        assert_eq!(r.status_tag("Nonexistent"), "");
    }

    #[test]
    fn test_carrier_tag_lookup() {
        let r = resolver();
        assert_eq!(r.carrier_tag("Acme Health"), "carrier_acme");
    }

    #[test]
    fn test_unknown_carrier_resolves_to_sentinel() {
        let r = resolver();
        assert_eq!(r.carrier_tag("Unknown Carrier"), "Carrier Not Found");
        assert_ne!(r.carrier_tag("Unknown Carrier"), "");
    }

    #[test]
    fn test_requestor_type_tag() {
        let r = resolver();
        assert_eq!(r.requestor_type_tag(1), "requestor_member");
        assert_eq!(r.requestor_type_tag(99), "");
    }
}
