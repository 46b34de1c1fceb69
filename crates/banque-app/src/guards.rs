//! # Presentation Guards
//!
//! Render-side decisions derived from a snapshot and its visibility flags:
//! which banners to show, which routes to redirect, which buttons to block
//! and which menu entries to enable.
//!
//! Everything here is pure. Blocking an action yields a local [`Notice`];
//! nothing is persisted and no remote call is made.

use banque_core::{
    resolve_visibility, Feature, UserStatusSnapshot, VerificationStatus, VisibilityFlags,
};
use serde::{Deserialize, Serialize};

use crate::errors::ToastLevel;

// ============================================================================
// Banners
// ============================================================================

/// Status banner shown above protected pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    /// Identity not verified yet
    VerificationRequired,
    /// Documents under review
    VerificationPending,
    /// Documents rejected, with the reviewer's reason when available
    VerificationRejected {
        /// Reviewer's reason, if one was recorded
        reason: Option<String>,
    },
    /// Email address not confirmed with the auth provider
    EmailUnverified,
}

impl Banner {
    /// Message key for the localized banner text
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::VerificationRequired => "kyc.banner.required",
            Self::VerificationPending => "kyc.banner.pending",
            Self::VerificationRejected { .. } => "kyc.banner.rejected",
            Self::EmailUnverified => "account.banner.email_unverified",
        }
    }

    /// Visual severity
    pub fn level(&self) -> ToastLevel {
        match self {
            Self::VerificationRequired | Self::EmailUnverified => ToastLevel::Warning,
            Self::VerificationPending => ToastLevel::Info,
            Self::VerificationRejected { .. } => ToastLevel::Error,
        }
    }

    /// Whether the banner links to the verification page
    pub fn links_to_verification(&self) -> bool {
        matches!(
            self,
            Self::VerificationRequired | Self::VerificationRejected { .. }
        )
    }
}

/// Banners for a snapshot, status banner first.
pub fn banners_for(snapshot: &UserStatusSnapshot) -> Vec<Banner> {
    let mut banners = Vec::with_capacity(2);
    match snapshot.status() {
        VerificationStatus::Unverified => banners.push(Banner::VerificationRequired),
        VerificationStatus::Pending => banners.push(Banner::VerificationPending),
        VerificationStatus::Rejected => banners.push(Banner::VerificationRejected {
            reason: snapshot.rejection_reason().map(str::to_string),
        }),
        VerificationStatus::Verified => {}
    }
    if !snapshot.email_verified() {
        banners.push(Banner::EmailUnverified);
    }
    banners
}

// ============================================================================
// Routes
// ============================================================================

/// Navigable pages of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Account overview
    Dashboard,
    /// Invoices and billing settings
    Billing,
    /// Outgoing transfers
    Transfers,
    /// Saved transfer recipients
    Beneficiaries,
    /// Card spending limits
    CardLimits,
    /// Uploaded identity documents
    Documents,
    /// Secure messaging with an advisor
    Messages,
    /// Document submission
    Verification,
    /// Profile and preferences
    Settings,
    /// Sign-in page
    SignIn,
}

impl Route {
    /// All routes
    pub const ALL: [Self; 10] = [
        Self::Dashboard,
        Self::Billing,
        Self::Transfers,
        Self::Beneficiaries,
        Self::CardLimits,
        Self::Documents,
        Self::Messages,
        Self::Verification,
        Self::Settings,
        Self::SignIn,
    ];

    /// URL path
    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Billing => "/billing",
            Self::Transfers => "/transfers",
            Self::Beneficiaries => "/beneficiaries",
            Self::CardLimits => "/cards/limits",
            Self::Documents => "/documents",
            Self::Messages => "/messages",
            Self::Verification => "/verification",
            Self::Settings => "/settings",
            Self::SignIn => "/sign-in",
        }
    }

    /// Route for a URL path, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    /// Message key for the menu label
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Dashboard => "menu.dashboard",
            Self::Billing => "menu.billing",
            Self::Transfers => "menu.transfers",
            Self::Beneficiaries => "menu.beneficiaries",
            Self::CardLimits => "menu.card_limits",
            Self::Documents => "menu.documents",
            Self::Messages => "menu.messages",
            Self::Verification => "menu.verification",
            Self::Settings => "menu.settings",
            Self::SignIn => "menu.sign_in",
        }
    }

    /// Feature the route is gated on, if any
    pub fn required_feature(&self) -> Option<Feature> {
        match self {
            Self::Billing => Some(Feature::Billing),
            Self::Transfers => Some(Feature::Transfers),
            Self::Beneficiaries => Some(Feature::Beneficiaries),
            Self::CardLimits => Some(Feature::CardLimits),
            Self::Documents => Some(Feature::Documents),
            Self::Messages => Some(Feature::Messaging),
            Self::Dashboard | Self::Verification | Self::Settings | Self::SignIn => None,
        }
    }
}

/// Outcome of a route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteDecision {
    /// Render the requested page
    Allow,
    /// Navigate elsewhere instead
    Redirect(Route),
}

/// Redirect gated routes to the verification page when their feature is hidden.
pub fn guard_route(route: Route, flags: &VisibilityFlags) -> RouteDecision {
    match route.required_feature() {
        Some(feature) if !flags.allows(feature) => RouteDecision::Redirect(Route::Verification),
        _ => RouteDecision::Allow,
    }
}

// ============================================================================
// Action gates
// ============================================================================

/// Buttons whose availability depends on verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedAction {
    /// Send an advisor message
    SendMessage,
    /// Start a transfer
    StartTransfer,
    /// Save a new beneficiary
    AddBeneficiary,
    /// Open billing
    ViewBilling,
    /// Change card limits
    AdjustCardLimits,
    /// Upload a document
    UploadDocument,
    /// Submit verification documents for review
    SubmitVerification,
}

impl GatedAction {
    /// Feature the action belongs to. Submitting verification depends on the
    /// status itself rather than a feature flag.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            Self::SendMessage => Some(Feature::Messaging),
            Self::StartTransfer => Some(Feature::Transfers),
            Self::AddBeneficiary => Some(Feature::Beneficiaries),
            Self::ViewBilling => Some(Feature::Billing),
            Self::AdjustCardLimits => Some(Feature::CardLimits),
            Self::UploadDocument => Some(Feature::Documents),
            Self::SubmitVerification => None,
        }
    }
}

/// Local explanatory message shown when an action is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Message key for localized text
    pub key: &'static str,
    /// Fallback text when the key has no translation
    pub default_text: &'static str,
}

impl Notice {
    const VERIFY_FIRST: Self = Self {
        key: "kyc.notice.verify_first",
        default_text: "Verify your identity to use this feature.",
    };
    const UNDER_REVIEW: Self = Self {
        key: "kyc.notice.under_review",
        default_text: "Your documents are under review. This feature unlocks once verification completes.",
    };
    const RESUBMIT: Self = Self {
        key: "kyc.notice.resubmit",
        default_text: "Your verification was rejected. Resubmit your documents to use this feature.",
    };
    const ALREADY_PENDING: Self = Self {
        key: "kyc.notice.already_pending",
        default_text: "Your documents are already under review.",
    };
    const ALREADY_VERIFIED: Self = Self {
        key: "kyc.notice.already_verified",
        default_text: "Your identity is already verified.",
    };

    fn feature_blocked(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Pending => Self::UNDER_REVIEW,
            VerificationStatus::Rejected => Self::RESUBMIT,
            VerificationStatus::Unverified | VerificationStatus::Verified => Self::VERIFY_FIRST,
        }
    }

    fn submission_blocked(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Verified => Self::ALREADY_VERIFIED,
            _ => Self::ALREADY_PENDING,
        }
    }
}

/// Outcome of an action gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateOutcome {
    /// Proceed with the action
    Allowed,
    /// Show the notice instead
    Blocked(Notice),
}

impl GateOutcome {
    /// Whether the action may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decide whether an action may proceed for the given snapshot.
pub fn gate_action(action: GatedAction, snapshot: &UserStatusSnapshot) -> GateOutcome {
    let status = snapshot.status();
    match action.feature() {
        Some(feature) => {
            if resolve_visibility(snapshot).allows(feature) {
                GateOutcome::Allowed
            } else {
                GateOutcome::Blocked(Notice::feature_blocked(status))
            }
        }
        None if status.can_submit() => GateOutcome::Allowed,
        None => GateOutcome::Blocked(Notice::submission_blocked(status)),
    }
}

// ============================================================================
// Menu
// ============================================================================

/// Navigation menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Target page
    pub route: Route,
    /// Message key for the label
    pub label_key: &'static str,
    /// Disabled entries stay visible but greyed out
    pub enabled: bool,
}

const MENU: [Route; 8] = [
    Route::Dashboard,
    Route::Transfers,
    Route::Beneficiaries,
    Route::Billing,
    Route::CardLimits,
    Route::Documents,
    Route::Messages,
    Route::Settings,
];

/// Menu entries with their enabled state.
pub fn menu_entries(flags: &VisibilityFlags) -> Vec<MenuEntry> {
    MENU.into_iter()
        .map(|route| MenuEntry {
            route,
            label_key: route.label_key(),
            enabled: guard_route(route, flags) == RouteDecision::Allow,
        })
        .collect()
}
