//! Stable identifiers for reason checks and reason codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_INTENT_STRUCTURE: &str = "intent.structure";
pub const CHECK_POLICY_DAILY_BUDGET: &str = "policy.daily_budget";
pub const CHECK_POLICY_CATEGORY_CAP: &str = "policy.category_cap";
pub const CHECK_POLICY_BLOCKED_MERCHANT: &str = "policy.blocked_merchant";

// Codes
pub const CODE_INVALID_INTENT: &str = "invalid_intent";
pub const CODE_DAILY_BUDGET_EXCEEDED: &str = "daily_budget_exceeded";
pub const CODE_CATEGORY_CAP_EXCEEDED: &str = "category_cap_exceeded";
pub const CODE_MERCHANT_BLOCKED: &str = "merchant_blocked";

/// Reason emitted for a structurally invalid intent.
pub const REASON_INVALID_INTENT: &str = "invalid intent: date/category/amount required";

/// Lane used when the policy does not partition by category, and for the block placeholder.
pub const DEFAULT_LANE: &str = "default";

/// Policy version reported when the policy document carries none.
pub const DEFAULT_POLICY_VERSION: &str = "v0";
