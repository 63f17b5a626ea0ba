//! The fixed user-facing message for each failure category.
use crate::types::ErrorCategory;

/// Message shown for a validation list whose first item has no message.
pub const VALIDATION_FALLBACK_MESSAGE: &str = "Validation failed. Please check your input.";

/// The user-facing sentence for `category`.
pub fn user_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Network => "Network error. Please check your internet connection.",
        ErrorCategory::Auth => "Session expired. Please login again.",
        ErrorCategory::Validation => "Invalid data provided. Please check your input.",
        ErrorCategory::Server => "Server error. Please try again later.",
        ErrorCategory::Unknown => "An unexpected error occurred. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_category_has_a_distinct_message() {
        let messages: HashSet<_> = ErrorCategory::ALL.into_iter().map(user_message).collect();
        assert_eq!(messages.len(), ErrorCategory::ALL.len());
        assert!(messages.iter().all(|m| !m.is_empty()));
    }
}
