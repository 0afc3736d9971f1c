use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use super::session_store::SessionStore;
use crate::core::{AppError, Currency, Result};
use crate::modules::cart::{ItemLedger, NewItem};
use crate::modules::checkout::models::{
    CallbackOutcome, CallbackParams, CheckoutId, CheckoutState, PendingPayment,
};
use crate::modules::gateways::models::{CreatedIntent, PaymentIntentRequest};
use crate::modules::gateways::services::PaymentGateway;

/// Drives one checkout attempt through create → buyer approval → capture.
///
/// The pending payment is stored under the checkout id's session key, so the
/// callback can be handled by a fresh coordinator built with the same id.
/// The coordinator never redirects; callers send the buyer to the returned
/// approval URL. Gateway calls carry no timeout of their own beyond the HTTP
/// client's connect timeout; wrap them if you need one.
pub struct PaymentSessionCoordinator<S: SessionStore> {
    gateway: Arc<dyn PaymentGateway>,
    store: S,
    checkout_id: CheckoutId,
    ledger: ItemLedger,
    return_url: Option<String>,
    cancel_url: Option<String>,
    token_ttl: Option<Duration>,
    state: CheckoutState,
}

impl<S: SessionStore> PaymentSessionCoordinator<S> {
    pub fn new(gateway: Arc<dyn PaymentGateway>, store: S, checkout_id: CheckoutId) -> Self {
        Self {
            gateway,
            store,
            checkout_id,
            ledger: ItemLedger::default(),
            return_url: None,
            cancel_url: None,
            token_ttl: None,
            state: CheckoutState::Idle,
        }
    }

    /// Pending payments older than `ttl` are treated as absent
    pub fn with_token_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn set_currency(&mut self, currency: Currency) -> &mut Self {
        self.ledger.set_currency(currency);
        self
    }

    pub fn add_item(&mut self, item: NewItem) -> Result<&mut Self> {
        self.ledger.add_item(item)?;
        Ok(self)
    }

    pub fn add_items<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = NewItem>,
    {
        self.ledger.add_items(items)?;
        Ok(self)
    }

    pub fn set_return_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn set_cancel_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.cancel_url = Some(url.into());
        self
    }

    pub fn ledger(&self) -> &ItemLedger {
        &self.ledger
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn checkout_id(&self) -> &CheckoutId {
        &self.checkout_id
    }

    /// Pending payment currently stored for this checkout, if any
    pub fn pending_payment(&self) -> Result<Option<PendingPayment>> {
        self.store.get(&self.checkout_id.session_key())
    }

    /// Snapshot the ledger into a gateway request.
    ///
    /// # Errors
    /// * `Configuration` - no return URL set
    /// * `EmptyCart` - no items added
    pub fn build_request(&self, description: &str) -> Result<PaymentIntentRequest> {
        let return_url = self
            .return_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::configuration("Return URL must be set before creating a payment")
            })?;

        if self.ledger.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let cancel_url = self
            .cancel_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(return_url);

        Ok(PaymentIntentRequest {
            currency: self.ledger.currency(),
            total: self.ledger.total(),
            line_items: self.ledger.items().to_vec(),
            description: description.to_string(),
            return_url: return_url.to_string(),
            cancel_url: cancel_url.to_string(),
        })
    }

    /// Create the payment intent and remember it for the callback.
    ///
    /// A second call before the callback replaces the stored pending payment.
    pub async fn create_payment(&mut self, description: &str) -> Result<CreatedIntent> {
        let request = self.build_request(description)?;

        info!(
            checkout_id = %self.checkout_id,
            gateway = self.gateway.name(),
            total = %request.total,
            currency = %request.currency,
            items = request.line_items.len(),
            "Creating payment intent"
        );

        let created = match self.gateway.create_intent(&request).await {
            Ok(created) => created,
            Err(e) => {
                self.state = CheckoutState::Failed;
                error!(
                    checkout_id = %self.checkout_id,
                    error = %e,
                    "Failed to create payment intent"
                );
                return Err(e);
            }
        };

        if let Err(e) = self.remember(&created.intent_id) {
            self.state = CheckoutState::Failed;
            error!(
                checkout_id = %self.checkout_id,
                intent_id = %created.intent_id,
                error = %e,
                "Payment intent created but not stored"
            );
            return Err(AppError::session(format!(
                "Payment intent {} was created but could not be stored: {}",
                created.intent_id, e
            )));
        }
        self.state = CheckoutState::PendingApproval;

        info!(
            checkout_id = %self.checkout_id,
            intent_id = %created.intent_id,
            "Payment intent awaiting buyer approval"
        );

        Ok(created)
    }

    fn remember(&self, intent_id: &str) -> Result<()> {
        let key = self.checkout_id.session_key();
        if let Some(previous) = self.store.get(&key)? {
            warn!(
                checkout_id = %self.checkout_id,
                previous_intent_id = %previous.intent_id,
                "Replacing pending payment that was never captured"
            );
        }

        self.store.put(&key, &PendingPayment::new(intent_id))
    }

    /// Handle PayPal's return redirect.
    ///
    /// Returns `NoPendingPayment` when nothing is stored for this checkout, the
    /// stored payment has expired, or the callback lacks `PayerID`/`token`.
    /// The stored payment is removed before the gateway call, so a failed or
    /// timed-out execute cannot be retried with the same state; start a new
    /// checkout instead.
    pub async fn resolve_callback(&mut self, params: &CallbackParams) -> Result<CallbackOutcome> {
        let key = self.checkout_id.session_key();

        let pending = match self.store.get(&key)? {
            Some(pending) => pending,
            None => {
                debug!(checkout_id = %self.checkout_id, "Callback without a pending payment");
                return Ok(CallbackOutcome::NoPendingPayment);
            }
        };

        if pending.is_expired(self.token_ttl, Utc::now()) {
            self.store.remove(&key)?;
            warn!(
                checkout_id = %self.checkout_id,
                intent_id = %pending.intent_id,
                "Pending payment expired before the buyer returned"
            );
            return Ok(CallbackOutcome::NoPendingPayment);
        }

        self.state = CheckoutState::PendingApproval;

        let payer_id = match (params.payer_id(), params.token()) {
            (Some(payer_id), Some(_)) => payer_id,
            _ => {
                info!(
                    checkout_id = %self.checkout_id,
                    "Callback missing PayerID or token, nothing to capture"
                );
                return Ok(CallbackOutcome::NoPendingPayment);
            }
        };

        if let Some(payment_id) = params.payment_id() {
            if payment_id != pending.intent_id {
                warn!(
                    checkout_id = %self.checkout_id,
                    expected = %pending.intent_id,
                    received = %payment_id,
                    "Callback refers to a different payment"
                );
                return Ok(CallbackOutcome::NoPendingPayment);
            }
        }

        // Consume before executing so the same approval is never executed twice
        self.store.remove(&key)?;

        match self.gateway.execute_intent(&pending.intent_id, payer_id).await {
            Ok(details) => {
                self.state = CheckoutState::Captured;
                info!(
                    checkout_id = %self.checkout_id,
                    intent_id = %pending.intent_id,
                    state = ?details.state,
                    "Payment executed"
                );
                Ok(CallbackOutcome::Captured(details))
            }
            Err(e) => {
                self.state = CheckoutState::Failed;
                error!(
                    checkout_id = %self.checkout_id,
                    intent_id = %pending.intent_id,
                    error = %e,
                    "Payment execution failed"
                );
                Err(e.with_correlation_id(pending.intent_id))
            }
        }
    }
}
