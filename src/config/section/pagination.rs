//! `[pagination]` section configuration.
//!
//! ```toml
//! [pagination]
//! size = 10   # items per listing page
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { size: 10 }
    }
}

impl PaginationConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.size == 0 {
            diag.error_with_hint(
                FieldPath::new("pagination.size"),
                "must be greater than 0",
                "use a positive page size such as 10",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_pagination_default() {
        assert_eq!(test_parse_config("").pagination.size, 10);
    }

    #[test]
    fn test_pagination_zero_rejected() {
        let config = test_parse_config("[pagination]\nsize = 0");
        let mut diag = ConfigDiagnostics::new();
        config.pagination.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
