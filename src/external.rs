//! External collaborator interfaces.
//!
//! The engine consumes two outside services: an auth token provider that
//! supplies the opaque bearer token attached to outbound collaborator calls,
//! and a payment authorizer invoked before a paid booking is persisted.
//! Both are traits so tests and local runs can swap in deterministic
//! implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Supplies the opaque bearer token attached to outbound collaborator calls.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    /// Return the current bearer token.
    async fn auth_token(&self) -> String;
}

/// Fixed-token provider, configured once at startup.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthTokenProvider for StaticTokenProvider {
    async fn auth_token(&self) -> String {
        self.token.clone()
    }
}

/// Result of a payment authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Authorized; the reference identifies the payment intent.
    Approved { reference: String },
    /// Declined by the payment provider.
    Declined { reason: String },
}

/// Authorizes payment for a booking before it is persisted.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Attempt to authorize `amount` for the caller identified by `token`.
    async fn authorize(&self, token: &str, amount: Decimal) -> PaymentOutcome;
}

/// Authorizer that approves every charge with a fresh payment reference.
///
/// Suitable for local development and tests that exercise the happy path.
#[derive(Default)]
pub struct AutoApproveAuthorizer;

#[async_trait]
impl PaymentAuthorizer for AutoApproveAuthorizer {
    async fn authorize(&self, _token: &str, _amount: Decimal) -> PaymentOutcome {
        PaymentOutcome::Approved {
            reference: format!("pay_{}", Uuid::new_v4()),
        }
    }
}

/// Authorizer that declines every charge, for failure injection in tests.
pub struct DecliningAuthorizer {
    reason: String,
}

impl DecliningAuthorizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for DecliningAuthorizer {
    fn default() -> Self {
        Self::new("card declined")
    }
}

#[async_trait]
impl PaymentAuthorizer for DecliningAuthorizer {
    async fn authorize(&self, _token: &str, _amount: Decimal) -> PaymentOutcome {
        PaymentOutcome::Declined {
            reason: self.reason.clone(),
        }
    }
}
