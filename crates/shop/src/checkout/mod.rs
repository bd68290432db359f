//! Checkout submission flow.
//!
//! One submission attempt moves through `Idle -> Validating ->
//! (Authorizing ->) Submitting -> {Succeeded, Failed}`. Failure of any
//! step returns the flow to an editable idle state; nothing is retried.
//!
//! Cash on delivery is a single order-creation call. Card payments insert
//! an authorization round trip: the platform API issues a one-shot client
//! secret, the gateway confirms the charge with it, and only a confirmed
//! charge proceeds to order creation.

pub mod forms;
pub mod gate;

use core::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use techmart_core::{FieldErrors, PaymentMethod};

use crate::cancel::CancelToken;
use crate::clients::payments::PaymentIntentStatus;
use crate::clients::{OrdersClient, PaymentGatewayClient};
use crate::refetch::RefetchHub;
use crate::session::{Cart, CheckoutSession, CurrentUser};

use forms::{CheckoutForm, ShippingAddress};

/// Where the UI navigates after a successful checkout.
pub const PROFILE_REDIRECT: &str = "/user/profile";

/// Fixed currency-conversion divisor applied to card charge amounts.
///
/// The platform API expects card totals pre-divided by 300 (LKR to USD).
/// External contract; the value is not configurable.
const CARD_CHARGE_DIVISOR: i64 = 300;

/// The amount sent when requesting a payment authorization.
#[must_use]
pub fn charge_amount(total_price: Decimal) -> Decimal {
    total_price / Decimal::from(CARD_CHARGE_DIVISOR)
}

/// Phase of a submission attempt, recorded on the flow's tracing span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No submission in progress.
    Idle,
    /// Running the pure validation pass.
    Validating,
    /// Authorizing a card charge with the gateway.
    Authorizing,
    /// Creating the order on the platform API.
    Submitting,
    /// The order was created.
    Succeeded,
    /// The attempt ended without an order.
    Failed,
}

impl Phase {
    /// Phase name as recorded in spans.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Authorizing => "authorizing",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order-creation payload sent to the platform API.
///
/// Assembled fresh per submission attempt and discarded once the call
/// resolves. The total price is caller-supplied and forwarded untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Validated shipping details.
    pub shipping_address: ShippingAddress,
    /// Session user, when logged in.
    pub user: Option<CurrentUser>,
    /// Session cart, when present.
    pub cart: Option<Cart>,
    /// Order total as supplied by the caller.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
}

/// Result of one submission attempt.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// The order was created.
    Placed {
        /// Notification message.
        message: String,
        /// Navigation target.
        redirect: &'static str,
    },
    /// Validation blocked the submission; no network call was made.
    Rejected {
        /// Aggregate notification message.
        message: String,
        /// Per-field messages.
        errors: FieldErrors,
    },
    /// The gateway rejected the charge; its message is surfaced verbatim.
    Declined {
        /// Gateway-reported message.
        message: String,
    },
    /// The gateway reported a status that is neither success nor an error.
    /// No order was created.
    Pending {
        /// Notification message naming the gateway status.
        message: String,
    },
    /// The submission was cancelled before side effects were applied.
    Cancelled,
    /// A transport or API failure ended the attempt.
    Failed {
        /// Notification message.
        message: String,
    },
}

/// Orchestrates checkout submissions.
#[derive(Clone)]
pub struct CheckoutFlow {
    orders: OrdersClient,
    gateway: PaymentGatewayClient,
    refetch: RefetchHub,
}

impl CheckoutFlow {
    /// Create a flow over the given clients.
    #[must_use]
    pub const fn new(
        orders: OrdersClient,
        gateway: PaymentGatewayClient,
        refetch: RefetchHub,
    ) -> Self {
        Self {
            orders,
            gateway,
            refetch,
        }
    }

    /// Run one submission attempt.
    ///
    /// The cancellation token is checked before any completed call's side
    /// effects are applied; a cancelled submission changes nothing.
    #[instrument(
        skip_all,
        fields(payment_method = %form.payment_method, phase = Phase::Idle.as_str())
    )]
    pub async fn submit(
        &self,
        form: CheckoutForm,
        session: CheckoutSession,
        token: CancelToken,
    ) -> CheckoutOutcome {
        record_phase(Phase::Validating);

        let address = match forms::validate(&form) {
            Ok(address) => address,
            Err(errors) => {
                record_phase(Phase::Failed);
                return CheckoutOutcome::Rejected {
                    message: "Please correct the errors in the form.".to_owned(),
                    errors,
                };
            }
        };

        let user = session.load_user().await;
        let cart = session.load_cart().await;

        if let Some(cart) = &cart {
            // Trust boundary: the total is caller-supplied and forwarded
            // as-is; a disagreement with the cart is only logged.
            if cart.computed_total() != form.total_price {
                tracing::warn!(
                    supplied = %form.total_price,
                    computed = %cart.computed_total(),
                    "supplied total price disagrees with cart contents"
                );
            }
        }

        let request = CheckoutRequest {
            shipping_address: address.clone(),
            user,
            cart,
            total_price: form.total_price,
            payment_method: form.payment_method,
        };

        if form.payment_method.requires_card() {
            self.submit_card(&form, &address, &request, &session, &token)
                .await
        } else {
            self.create_order(&request, &session, &token, "Order placed successfully")
                .await
        }
    }

    /// Card path: authorize, confirm, then create the order.
    async fn submit_card(
        &self,
        form: &CheckoutForm,
        address: &ShippingAddress,
        request: &CheckoutRequest,
        session: &CheckoutSession,
        token: &CancelToken,
    ) -> CheckoutOutcome {
        // Validation guarantees complete card data on this path.
        let Some(card) = form.card.as_ref() else {
            let mut errors = FieldErrors::new();
            errors.insert("card", "Credit card information is incomplete");
            return CheckoutOutcome::Rejected {
                message: "Please correct the errors in the form.".to_owned(),
                errors,
            };
        };

        record_phase(Phase::Authorizing);

        let authorization = match self
            .orders
            .create_payment_intent(charge_amount(form.total_price))
            .await
        {
            Ok(authorization) => authorization,
            Err(e) => {
                tracing::error!(error = %e, "failed to create payment intent");
                record_phase(Phase::Failed);
                return CheckoutOutcome::Failed {
                    message: "Failed to place order".to_owned(),
                };
            }
        };

        if token.is_cancelled() {
            tracing::warn!("submission cancelled after payment intent creation");
            return CheckoutOutcome::Cancelled;
        }

        let confirmation = match self
            .gateway
            .confirm_card_payment(&authorization, card, &address.name, address.email.as_str())
            .await
        {
            Ok(confirmation) => confirmation,
            Err(e) => {
                tracing::error!(error = %e, "card confirmation request failed");
                record_phase(Phase::Failed);
                return CheckoutOutcome::Failed {
                    message: "Failed to place order".to_owned(),
                };
            }
        };

        if let Some(error) = confirmation.error {
            tracing::warn!(code = ?error.code, "gateway declined the charge");
            record_phase(Phase::Failed);
            return CheckoutOutcome::Declined {
                message: error.message,
            };
        }

        match confirmation.status {
            PaymentIntentStatus::Succeeded => {
                self.create_order(request, session, token, "Payment successful, order placed!")
                    .await
            }
            status => {
                tracing::warn!(%status, "charge neither succeeded nor errored; order not created");
                CheckoutOutcome::Pending {
                    message: format!(
                        "Card payment status is '{status}'; the order was not placed."
                    ),
                }
            }
        }
    }

    /// Create the order and, unless cancelled, apply success side effects.
    async fn create_order(
        &self,
        request: &CheckoutRequest,
        session: &CheckoutSession,
        token: &CancelToken,
        success_message: &str,
    ) -> CheckoutOutcome {
        record_phase(Phase::Submitting);

        if let Err(e) = self.orders.create_order(request).await {
            tracing::error!(error = %e, "failed to place order");
            record_phase(Phase::Failed);
            return CheckoutOutcome::Failed {
                message: "Failed to place order".to_owned(),
            };
        }

        if token.is_cancelled() {
            tracing::warn!("submission cancelled before side effects were applied");
            return CheckoutOutcome::Cancelled;
        }

        if let Err(e) = session.clear_cart().await {
            tracing::error!(error = %e, "failed to clear cart after checkout");
        }
        self.refetch.publish();

        record_phase(Phase::Succeeded);
        CheckoutOutcome::Placed {
            message: success_message.to_owned(),
            redirect: PROFILE_REDIRECT,
        }
    }
}

/// Record the current phase on the flow's span.
fn record_phase(phase: Phase) {
    tracing::Span::current().record("phase", phase.as_str());
}
