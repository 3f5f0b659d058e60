//! # Payment Abstraction
//!
//! Pluggable payment authorization: a `PaymentStrategy` approves or
//! declines a charge, and the `PaymentHandler` façade validates inputs
//! before delegating a single authorization attempt.
//!
//! ## Authorization Flow
//! ```text
//! Order ──► PaymentHandler::process_payment(amount, strategy)
//!                │
//!                ├── strategy absent?  → false, no side effect
//!                ├── amount ≤ 0?       → false, no side effect
//!                │
//!                ▼
//!           strategy.authorize(amount)   (exactly one attempt)
//!                │
//!                ├── Cash:   always approves
//!                ├── Card:   simulated gateway, 95% success
//!                └── Wallet: simulated gateway, 90% success
//! ```
//!
//! The stochastic gateway decision sits behind the [`PaymentGateway`]
//! trait so tests can substitute a deterministic outcome. Every strategy
//! emits a structured authorization trace (amount, masked identifier)
//! whether or not the authorization clears. Retries, if desired, belong
//! to the calling layer.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_required;

/// Simulated card gateway success rate, in basis points.
pub const CARD_SUCCESS_RATE_BPS: u32 = 9_500;

/// Simulated wallet gateway success rate, in basis points.
pub const WALLET_SUCCESS_RATE_BPS: u32 = 9_000;

// =============================================================================
// Gateway
// =============================================================================

/// Source of simulated gateway decisions.
///
/// Production strategies use [`SimulatedGateway`]; tests inject a fixed
/// outcome to make authorization deterministic.
pub trait PaymentGateway: Send + Sync {
    /// Returns true if an authorization with the given success rate clears.
    fn approve(&self, success_rate_bps: u32) -> bool;
}

/// Pseudo-random gateway matching the configured success rate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGateway;

impl PaymentGateway for SimulatedGateway {
    fn approve(&self, success_rate_bps: u32) -> bool {
        rand::thread_rng().gen_range(0..10_000) < success_rate_bps
    }
}

/// Gateway with a fixed outcome, for deterministic callers.
#[derive(Debug, Clone, Copy)]
pub struct FixedGateway(pub bool);

impl PaymentGateway for FixedGateway {
    fn approve(&self, _success_rate_bps: u32) -> bool {
        self.0
    }
}

// =============================================================================
// Payment Strategy
// =============================================================================

/// A pluggable authorization mechanism.
///
/// ## Contract
/// - `authorize` returns false for `amount ≤ 0` without attempting
///   authorization
/// - exactly one attempt per call; no retries
/// - an authorization trace is emitted regardless of outcome
pub trait PaymentStrategy: Send + Sync {
    /// Human-readable method name ("Cash", "Card", "Wallet").
    fn method_name(&self) -> &'static str;

    /// Attempts to authorize `amount`. Returns whether it cleared.
    fn authorize(&self, amount: Money) -> bool;
}

// =============================================================================
// Cash
// =============================================================================

/// Cash handed to a cashier. Always succeeds for positive amounts.
pub struct CashPayment {
    cashier_id: String,
}

impl CashPayment {
    /// Creates a cash strategy. Fails if the cashier id is blank.
    pub fn new(cashier_id: &str) -> Result<Self, ValidationError> {
        Ok(CashPayment {
            cashier_id: validate_required("cashier id", cashier_id)?,
        })
    }

    /// The receiving cashier.
    pub fn cashier_id(&self) -> &str {
        &self.cashier_id
    }
}

impl PaymentStrategy for CashPayment {
    fn method_name(&self) -> &'static str {
        "Cash"
    }

    fn authorize(&self, amount: Money) -> bool {
        if !amount.is_positive() {
            warn!(amount = %amount, "cash payment rejected: non-positive amount");
            return false;
        }

        info!(amount = %amount, cashier = %self.cashier_id, "cash payment received");
        true
    }
}

// =============================================================================
// Card
// =============================================================================

/// Card authorization against a simulated gateway.
///
/// The card number is masked to its last 4 digits at construction; the
/// full number is never stored.
pub struct CardPayment {
    masked_number: String,
    authorization_code: String,
    gateway: Arc<dyn PaymentGateway>,
}

impl CardPayment {
    /// Creates a card strategy backed by the pseudo-random gateway.
    ///
    /// Fails if the card number or authorization code is blank.
    pub fn new(card_number: &str, authorization_code: &str) -> Result<Self, ValidationError> {
        Self::with_gateway(card_number, authorization_code, Arc::new(SimulatedGateway))
    }

    /// Creates a card strategy with an injected gateway decision.
    pub fn with_gateway(
        card_number: &str,
        authorization_code: &str,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, ValidationError> {
        let card_number = validate_required("card number", card_number)?;

        Ok(CardPayment {
            masked_number: mask_card_number(&card_number),
            authorization_code: validate_required("authorization code", authorization_code)?,
            gateway,
        })
    }

    /// The card number masked to its last 4 digits, e.g. `****4242`.
    pub fn masked_number(&self) -> &str {
        &self.masked_number
    }

    /// The caller-supplied authorization code.
    pub fn authorization_code(&self) -> &str {
        &self.authorization_code
    }
}

impl PaymentStrategy for CardPayment {
    fn method_name(&self) -> &'static str {
        "Card"
    }

    fn authorize(&self, amount: Money) -> bool {
        if !amount.is_positive() {
            warn!(amount = %amount, "card payment rejected: non-positive amount");
            return false;
        }

        info!(
            amount = %amount,
            card = %self.masked_number,
            auth_code = %self.authorization_code,
            "requesting card authorization"
        );

        let approved = self.gateway.approve(CARD_SUCCESS_RATE_BPS);
        if approved {
            info!(
                card = %self.masked_number,
                reference = %Uuid::new_v4(),
                "card authorization approved"
            );
        } else {
            warn!(card = %self.masked_number, "card authorization declined");
        }
        approved
    }
}

// =============================================================================
// Wallet
// =============================================================================

/// Mobile wallet authorization against a simulated gateway.
pub struct WalletPayment {
    wallet_id: String,
    gateway: Arc<dyn PaymentGateway>,
}

impl WalletPayment {
    /// Creates a wallet strategy backed by the pseudo-random gateway.
    ///
    /// Fails if the wallet id is blank.
    pub fn new(wallet_id: &str) -> Result<Self, ValidationError> {
        Self::with_gateway(wallet_id, Arc::new(SimulatedGateway))
    }

    /// Creates a wallet strategy with an injected gateway decision.
    pub fn with_gateway(
        wallet_id: &str,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, ValidationError> {
        Ok(WalletPayment {
            wallet_id: validate_required("wallet id", wallet_id)?,
            gateway,
        })
    }

    /// The wallet identifier.
    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }
}

impl PaymentStrategy for WalletPayment {
    fn method_name(&self) -> &'static str {
        "Wallet"
    }

    fn authorize(&self, amount: Money) -> bool {
        if !amount.is_positive() {
            warn!(amount = %amount, "wallet payment rejected: non-positive amount");
            return false;
        }

        info!(amount = %amount, wallet = %self.wallet_id, "calling wallet gateway");

        let approved = self.gateway.approve(WALLET_SUCCESS_RATE_BPS);
        if approved {
            info!(
                wallet = %self.wallet_id,
                reference = %Uuid::new_v4(),
                "wallet authorization approved"
            );
        } else {
            warn!(wallet = %self.wallet_id, "wallet authorization declined");
        }
        approved
    }
}

/// Masks a card number to its last 4 digits.
fn mask_card_number(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }

    let last4: String = chars[chars.len() - 4..].iter().collect();
    format!("****{last4}")
}

// =============================================================================
// Payment Handler
// =============================================================================

/// Thin façade validating inputs before delegating to a strategy.
///
/// Performs no retry: one authorization attempt per call. Callers decide
/// whether to re-prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaymentHandler;

impl PaymentHandler {
    /// Creates a handler.
    pub fn new() -> Self {
        PaymentHandler
    }

    /// Runs a single authorization attempt.
    ///
    /// Returns false with no side effect when `strategy` is absent or
    /// `amount ≤ 0`; otherwise returns the strategy's outcome.
    pub fn process_payment(&self, amount: Money, strategy: Option<&dyn PaymentStrategy>) -> bool {
        let Some(strategy) = strategy else {
            warn!("payment rejected: no strategy assigned");
            return false;
        };

        if !amount.is_positive() {
            warn!(amount = %amount, "payment rejected: invalid amount");
            return false;
        }

        debug!(
            method = strategy.method_name(),
            amount = %amount,
            "delegating authorization"
        );
        strategy.authorize(amount)
    }

    /// The method name of the assigned strategy, or `"none"`.
    pub fn method_name(&self, strategy: Option<&dyn PaymentStrategy>) -> &'static str {
        strategy.map_or("none", |s| s.method_name())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Gateway that counts how often it was consulted.
    struct CountingGateway {
        outcome: bool,
        calls: AtomicU32,
    }

    impl CountingGateway {
        fn new(outcome: bool) -> Self {
            CountingGateway {
                outcome,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl PaymentGateway for CountingGateway {
        fn approve(&self, _success_rate_bps: u32) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    #[test]
    fn test_blank_identifiers_fail_construction() {
        assert!(CashPayment::new("").is_err());
        assert!(CashPayment::new("   ").is_err());
        assert!(CardPayment::new("", "AUTH-1").is_err());
        assert!(CardPayment::new("4242424242424242", "").is_err());
        assert!(WalletPayment::new("").is_err());
    }

    #[test]
    fn test_card_number_masked_at_construction() {
        let card = CardPayment::new("4242424242424242", "AUTH-1").unwrap();
        assert_eq!(card.masked_number(), "****4242");

        let short = CardPayment::new("4242", "AUTH-1").unwrap();
        assert_eq!(short.masked_number(), "****");
    }

    #[test]
    fn test_cash_succeeds_for_positive_amounts() {
        let cash = CashPayment::new("C-07").unwrap();
        assert!(cash.authorize(Money::from_cents(6270)));
        assert!(!cash.authorize(Money::zero()));
        assert!(!cash.authorize(Money::from_cents(-100)));
    }

    #[test]
    fn test_card_follows_gateway_outcome() {
        let approve = CardPayment::with_gateway(
            "4242424242424242",
            "AUTH-1",
            Arc::new(FixedGateway(true)),
        )
        .unwrap();
        assert!(approve.authorize(Money::from_cents(100)));

        let decline = CardPayment::with_gateway(
            "4242424242424242",
            "AUTH-1",
            Arc::new(FixedGateway(false)),
        )
        .unwrap();
        assert!(!decline.authorize(Money::from_cents(100)));
    }

    #[test]
    fn test_non_positive_amount_never_reaches_gateway() {
        let gateway = Arc::new(CountingGateway::new(true));
        let wallet = WalletPayment::with_gateway("W-1", Arc::clone(&gateway) as _).unwrap();

        assert!(!wallet.authorize(Money::zero()));
        assert!(!wallet.authorize(Money::from_cents(-500)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        assert!(wallet.authorize(Money::from_cents(500)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_guards_missing_strategy_and_amount() {
        let handler = PaymentHandler::new();
        let cash = CashPayment::new("C-07").unwrap();

        assert!(!handler.process_payment(Money::from_cents(100), None));
        assert!(!handler.process_payment(Money::zero(), Some(&cash)));
        assert!(!handler.process_payment(Money::from_cents(-1), Some(&cash)));
        assert!(handler.process_payment(Money::from_cents(100), Some(&cash)));
    }

    #[test]
    fn test_handler_single_attempt() {
        let gateway = Arc::new(CountingGateway::new(false));
        let card = CardPayment::with_gateway("4242424242424242", "AUTH-1", Arc::clone(&gateway) as _)
            .unwrap();

        let handler = PaymentHandler::new();
        assert!(!handler.process_payment(Money::from_cents(100), Some(&card)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_method_names() {
        let handler = PaymentHandler::new();
        let cash = CashPayment::new("C-07").unwrap();

        assert_eq!(handler.method_name(Some(&cash)), "Cash");
        assert_eq!(handler.method_name(None), "none");
    }
}
