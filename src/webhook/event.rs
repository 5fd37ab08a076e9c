//! Webhook event model.
//!
//! A delivery names its type with a wire string. The platform's own
//! subscription and portal events are matched first, then the provider's.
//! Both sets are closed; a string in neither is rejected.

use serde::{Serialize, Serializer};

/// Declares a closed set of event types with their wire names.
macro_rules! event_types {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member of the set, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }

            /// Looks up a wire name; `None` if it is not in the set.
            #[must_use]
            pub fn from_wire(s: &str) -> Option<Self> {
                match s {
                    $( $wire => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

event_types! {
    /// Event types emitted by the payment provider.
    pub enum ProviderEventType {
        PayinNormalCreated => "PAYIN_NORMAL_CREATED",
        PayinNormalSucceeded => "PAYIN_NORMAL_SUCCEEDED",
        PayinNormalFailed => "PAYIN_NORMAL_FAILED",
        PayinRefundCreated => "PAYIN_REFUND_CREATED",
        PayinRefundSucceeded => "PAYIN_REFUND_SUCCEEDED",
        PayinRefundFailed => "PAYIN_REFUND_FAILED",
        PayinRepudiationCreated => "PAYIN_REPUDIATION_CREATED",
        PayinRepudiationSucceeded => "PAYIN_REPUDIATION_SUCCEEDED",
        PayinRepudiationFailed => "PAYIN_REPUDIATION_FAILED",
        PayoutNormalCreated => "PAYOUT_NORMAL_CREATED",
        PayoutNormalSucceeded => "PAYOUT_NORMAL_SUCCEEDED",
        PayoutNormalFailed => "PAYOUT_NORMAL_FAILED",
        PayoutRefundCreated => "PAYOUT_REFUND_CREATED",
        PayoutRefundSucceeded => "PAYOUT_REFUND_SUCCEEDED",
        PayoutRefundFailed => "PAYOUT_REFUND_FAILED",
        InstantPayoutSucceeded => "INSTANT_PAYOUT_SUCCEEDED",
        InstantPayoutFallbacked => "INSTANT_PAYOUT_FALLBACKED",
        TransferNormalCreated => "TRANSFER_NORMAL_CREATED",
        TransferNormalSucceeded => "TRANSFER_NORMAL_SUCCEEDED",
        TransferNormalFailed => "TRANSFER_NORMAL_FAILED",
        TransferRefundCreated => "TRANSFER_REFUND_CREATED",
        TransferRefundSucceeded => "TRANSFER_REFUND_SUCCEEDED",
        TransferRefundFailed => "TRANSFER_REFUND_FAILED",
        TransferSettlementCreated => "TRANSFER_SETTLEMENT_CREATED",
        TransferSettlementSucceeded => "TRANSFER_SETTLEMENT_SUCCEEDED",
        TransferSettlementFailed => "TRANSFER_SETTLEMENT_FAILED",
        PreauthorizationCreated => "PREAUTHORIZATION_CREATED",
        PreauthorizationSucceeded => "PREAUTHORIZATION_SUCCEEDED",
        PreauthorizationFailed => "PREAUTHORIZATION_FAILED",
        PreauthorizationPaymentWaiting => "PREAUTHORIZATION_PAYMENT_WAITING",
        PreauthorizationPaymentExpired => "PREAUTHORIZATION_PAYMENT_EXPIRED",
        PreauthorizationPaymentCanceled => "PREAUTHORIZATION_PAYMENT_CANCELED",
        PreauthorizationPaymentValidated => "PREAUTHORIZATION_PAYMENT_VALIDATED",
        DepositPreauthorizationCreated => "DEPOSIT_PREAUTHORIZATION_CREATED",
        DepositPreauthorizationFailed => "DEPOSIT_PREAUTHORIZATION_FAILED",
        DepositPreauthorizationPaymentWaiting => "DEPOSIT_PREAUTHORIZATION_PAYMENT_WAITING",
        DepositPreauthorizationPaymentExpired => "DEPOSIT_PREAUTHORIZATION_PAYMENT_EXPIRED",
        DepositPreauthorizationPaymentCanceled => "DEPOSIT_PREAUTHORIZATION_PAYMENT_CANCELED",
        DepositPreauthorizationPaymentValidated => "DEPOSIT_PREAUTHORIZATION_PAYMENT_VALIDATED",
        DisputeCreated => "DISPUTE_CREATED",
        DisputeSubmitted => "DISPUTE_SUBMITTED",
        DisputeActionRequired => "DISPUTE_ACTION_REQUIRED",
        DisputeFurtherActionRequired => "DISPUTE_FURTHER_ACTION_REQUIRED",
        DisputeClosed => "DISPUTE_CLOSED",
        DisputeSentToBank => "DISPUTE_SENT_TO_BANK",
        DisputeDocumentCreated => "DISPUTE_DOCUMENT_CREATED",
        DisputeDocumentValidationAsked => "DISPUTE_DOCUMENT_VALIDATION_ASKED",
        DisputeDocumentSucceeded => "DISPUTE_DOCUMENT_SUCCEEDED",
        DisputeDocumentFailed => "DISPUTE_DOCUMENT_FAILED",
        KycCreated => "KYC_CREATED",
        KycValidationAsked => "KYC_VALIDATION_ASKED",
        KycSucceeded => "KYC_SUCCEEDED",
        KycFailed => "KYC_FAILED",
        KycOutdated => "KYC_OUTDATED",
        UboDeclarationCreated => "UBO_DECLARATION_CREATED",
        UboDeclarationValidationAsked => "UBO_DECLARATION_VALIDATION_ASKED",
        UboDeclarationRefused => "UBO_DECLARATION_REFUSED",
        UboDeclarationValidated => "UBO_DECLARATION_VALIDATED",
        UboDeclarationIncomplete => "UBO_DECLARATION_INCOMPLETE",
        UserKycRegular => "USER_KYC_REGULAR",
        UserKycLight => "USER_KYC_LIGHT",
        UserInflowsBlocked => "USER_INFLOWS_BLOCKED",
        UserInflowsUnblocked => "USER_INFLOWS_UNBLOCKED",
        UserOutflowsBlocked => "USER_OUTFLOWS_BLOCKED",
        UserOutflowsUnblocked => "USER_OUTFLOWS_UNBLOCKED",
        MandateCreated => "MANDATE_CREATED",
        MandateSubmitted => "MANDATE_SUBMITTED",
        MandateActivated => "MANDATE_ACTIVATED",
        MandateFailed => "MANDATE_FAILED",
        MandateExpired => "MANDATE_EXPIRED",
        RecurringRegistrationCreated => "RECURRING_REGISTRATION_CREATED",
        RecurringRegistrationAuthNeeded => "RECURRING_REGISTRATION_AUTH_NEEDED",
        RecurringRegistrationInProgress => "RECURRING_REGISTRATION_IN_PROGRESS",
        RecurringRegistrationEnded => "RECURRING_REGISTRATION_ENDED",
        CardValidationCreated => "CARD_VALIDATION_CREATED",
        CardValidationSucceeded => "CARD_VALIDATION_SUCCEEDED",
        CardValidationFailed => "CARD_VALIDATION_FAILED",
        RecipientActive => "RECIPIENT_ACTIVE",
        RecipientCanceled => "RECIPIENT_CANCELED",
        RecipientDeactivated => "RECIPIENT_DEACTIVATED",
    }
}

event_types! {
    /// Event types emitted by the platform's subscription and portal layer.
    pub enum PlatformEventType {
        SubscriptionCreated => "subscription.created",
        SubscriptionActivated => "subscription.activated",
        SubscriptionUpdated => "subscription.updated",
        SubscriptionRenewed => "subscription.renewed",
        SubscriptionTrialEnding => "subscription.trial_ending",
        SubscriptionPastDue => "subscription.past_due",
        SubscriptionPaused => "subscription.paused",
        SubscriptionResumed => "subscription.resumed",
        SubscriptionCanceled => "subscription.canceled",
        SubscriptionEnded => "subscription.ended",
        SubscriptionPaymentSucceeded => "subscription.payment_succeeded",
        SubscriptionPaymentFailed => "subscription.payment_failed",
        InvoiceCreated => "invoice.created",
        InvoicePaid => "invoice.paid",
        InvoicePaymentFailed => "invoice.payment_failed",
        PortalSessionCreated => "portal.session_created",
    }
}

/// Which system emitted an event, with its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EventKind {
    /// Emitted by the payment provider.
    Provider(ProviderEventType),
    /// Emitted by the platform layer.
    Platform(PlatformEventType),
}

impl EventKind {
    /// Classifies a wire name, preferring the platform set.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        PlatformEventType::from_wire(s)
            .map(Self::Platform)
            .or_else(|| ProviderEventType::from_wire(s).map(Self::Provider))
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provider(t) => t.as_str(),
            Self::Platform(t) => t.as_str(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed webhook delivery.
///
/// Serializes back to the wire field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookEvent {
    /// Event identifier
    pub id: String,
    /// Unix seconds at which the event was emitted
    pub date: i64,
    /// Identifier of the affected resource
    pub resource_id: String,
    /// Opaque data attached by the integrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    /// Event type and origin
    #[serde(rename = "EventType")]
    pub kind: EventKind,
}

impl WebhookEvent {
    /// Returns the provider event type, if this is a provider event.
    #[must_use]
    pub const fn provider_type(&self) -> Option<ProviderEventType> {
        match self.kind {
            EventKind::Provider(t) => Some(t),
            EventKind::Platform(_) => None,
        }
    }

    /// Returns the platform event type, if this is a platform event.
    #[must_use]
    pub const fn platform_type(&self) -> Option<PlatformEventType> {
        match self.kind {
            EventKind::Platform(t) => Some(t),
            EventKind::Provider(_) => None,
        }
    }

    /// Returns true if the platform layer emitted this event.
    #[must_use]
    pub const fn is_platform(&self) -> bool {
        matches!(self.kind, EventKind::Platform(_))
    }
}
