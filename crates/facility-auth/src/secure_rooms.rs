//! # Secure-room card scans
//!
//! Card readers on secure-room doors post a scan: the card number plus the
//! reader and controller identifiers. The reply either asks the tablet to
//! pick one of the scanning user's accounts or denies entry.
//!
//! Account disambiguation ([`resolve_accounts_for_actor`]) is a pure step and
//! does not consult the grant set. [`ScanService`] wraps it with device
//! authentication and record lookups through a [`ScanDirectory`].
//!
//! | Situation                 | Status | Response         |
//! |---------------------------|--------|------------------|
//! | several accounts          | 300    | `select_account` |
//! | one account               | 200    | `select_account` |
//! | no accounts               | 403    | `deny`           |
//! | unknown card or reader    | 404    | `deny`           |
//! | bad device credentials    | 401    | error            |

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use facility_org::{AccountId, AccountSummary, Actor, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::SecureRoomsApiConfig;
use crate::error::{AuthError, AuthResult};

/// Reason sent when the scanning user has no accounts.
pub const NO_ACCOUNTS_REASON: &str = "No accounts found";

/// A scan posted by a card reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRequest {
    /// Number on the scanned card
    pub card_number: String,

    /// Reader number
    pub reader_identifier: String,

    /// Control device number
    pub controller_identifier: String,
}

impl ScanRequest {
    /// Creates a new scan request.
    pub fn new(
        card_number: impl Into<String>,
        reader_identifier: impl Into<String>,
        controller_identifier: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            reader_identifier: reader_identifier.into(),
            controller_identifier: controller_identifier.into(),
        }
    }
}

/// A registered card reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardReader {
    /// Unique identifier
    pub id: Uuid,

    /// Reader number
    pub card_reader_number: String,

    /// Number of the control device the reader is wired to
    pub control_device_number: String,

    /// Free-form description
    pub description: Option<String>,
}

impl CardReader {
    /// Creates a new card reader.
    pub fn new(card_reader_number: impl Into<String>, control_device_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            card_reader_number: card_reader_number.into(),
            control_device_number: control_device_number.into(),
            description: None,
        }
    }
}

/// Record lookups needed to answer a scan.
#[async_trait]
pub trait ScanDirectory: Send + Sync {
    /// Find the user holding a card.
    async fn find_user_by_card_number(&self, card_number: &str) -> AuthResult<Option<Actor>>;

    /// Find a reader by its reader and control device numbers.
    async fn find_card_reader(
        &self,
        card_reader_number: &str,
        control_device_number: &str,
    ) -> AuthResult<Option<CardReader>>;

    /// Accounts the user may charge to.
    async fn accounts_for_user(&self, user_id: UserId) -> AuthResult<Vec<AccountSummary>>;
}

/// Result of account disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The tablet should offer these accounts.
    SelectAccount {
        /// Display name of the scanning user
        name: String,
        /// Candidate accounts, never empty
        accounts: Vec<AccountSummary>,
    },

    /// Entry is refused.
    Deny {
        /// Human-readable reason
        reason: String,
    },
}

impl ScanOutcome {
    /// Check if entry was refused.
    pub fn is_denied(&self) -> bool {
        matches!(self, ScanOutcome::Deny { .. })
    }
}

/// Present the actor's accounts for selection, or deny when there are none.
pub fn resolve_accounts_for_actor(actor: &Actor, accounts: Vec<AccountSummary>) -> ScanOutcome {
    if accounts.is_empty() {
        return ScanOutcome::Deny {
            reason: NO_ACCOUNTS_REASON.to_string(),
        };
    }

    ScanOutcome::SelectAccount {
        name: actor.full_name.clone(),
        accounts,
    }
}

/// An account as shown on the tablet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountPresenter {
    /// Account ID
    pub id: AccountId,

    /// Account number
    pub account_number: String,

    /// Description
    pub description: String,

    /// Payment source type
    #[serde(rename = "type")]
    pub account_type: String,

    /// Expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AccountSummary> for AccountPresenter {
    fn from(account: &AccountSummary) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number.clone(),
            description: account.description.clone(),
            account_type: account.account_type.clone(),
            expires_at: account.expires_at,
        }
    }
}

/// JSON body returned to the reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum ScanResponse {
    /// Ask the tablet to pick an account.
    SelectAccount {
        /// Tablet the choice is shown on
        tablet_identifier: String,
        /// Display name of the scanning user
        name: String,
        /// Candidate accounts
        accounts: Vec<AccountPresenter>,
    },

    /// Refuse entry.
    Deny {
        /// Human-readable reason
        reason: String,
    },
}

/// HTTP status and body for a scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanReply {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: ScanResponse,
}

impl ScanReply {
    /// Reply for a disambiguation outcome.
    pub fn from_outcome(outcome: ScanOutcome, tablet_identifier: &str) -> Self {
        match outcome {
            ScanOutcome::SelectAccount { name, accounts } => Self {
                status: if accounts.len() > 1 { 300 } else { 200 },
                body: ScanResponse::SelectAccount {
                    tablet_identifier: tablet_identifier.to_string(),
                    name,
                    accounts: accounts.iter().map(AccountPresenter::from).collect(),
                },
            },
            ScanOutcome::Deny { reason } => Self {
                status: 403,
                body: ScanResponse::Deny { reason },
            },
        }
    }

    /// Reply for a card or reader that does not exist.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self {
            status: 404,
            body: ScanResponse::Deny {
                reason: reason.into(),
            },
        }
    }

    /// Serialize the body to JSON.
    pub fn to_json(&self) -> AuthResult<String> {
        serde_json::to_string(&self.body).map_err(|e| AuthError::Internal(e.to_string()))
    }
}

/// Answers card scans for one deployment.
pub struct ScanService<D> {
    directory: D,
    config: SecureRoomsApiConfig,
}

impl<D: ScanDirectory> ScanService<D> {
    /// Creates a new scan service.
    pub fn new(directory: D, config: SecureRoomsApiConfig) -> Self {
        Self { directory, config }
    }

    /// The record directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Check an `Authorization: Basic ...` header against the configured
    /// device credentials.
    pub fn verify_basic_auth(&self, authorization: Option<&str>) -> AuthResult<()> {
        let (expected_name, expected_password) = self.config.credentials().ok_or_else(|| {
            AuthError::ConfigError("secure rooms API credentials are not configured".to_string())
        })?;

        let encoded = authorization
            .and_then(|header| header.strip_prefix("Basic "))
            .ok_or(AuthError::InvalidCredentials)?;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::InvalidCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;
        let (name, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;

        // compare SHA-256 digests of both sides
        let name_matches = Sha256::digest(name.as_bytes()) == Sha256::digest(expected_name.as_bytes());
        let password_matches =
            Sha256::digest(password.as_bytes()) == Sha256::digest(expected_password.as_bytes());

        if name_matches && password_matches {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Answer one scan.
    ///
    /// Device authentication failures are errors; every other outcome,
    /// including unknown cards and readers, is a reply.
    #[instrument(
        level = "debug",
        skip_all,
        fields(reader = %request.reader_identifier, controller = %request.controller_identifier)
    )]
    pub async fn scan(&self, authorization: Option<&str>, request: &ScanRequest) -> AuthResult<ScanReply> {
        if let Err(err) = self.verify_basic_auth(authorization) {
            warn!(error = %err, "card reader authentication failed");
            return Err(err);
        }

        let (actor, reader) = match self.load_scan_records(request).await {
            Ok(records) => records,
            Err(AuthError::NotFound(reason)) => {
                warn!(reason = %reason, "scan references an unknown record");
                return Ok(ScanReply::not_found(reason));
            }
            Err(err) => return Err(err),
        };

        let accounts = self.directory.accounts_for_user(actor.id).await?;
        let outcome = resolve_accounts_for_actor(&actor, accounts);

        match &outcome {
            ScanOutcome::SelectAccount { accounts, .. } => info!(
                user_id = %actor.id,
                card_reader_id = %reader.id,
                accounts = accounts.len(),
                "scan resolved"
            ),
            ScanOutcome::Deny { reason } => warn!(
                user_id = %actor.id,
                card_reader_id = %reader.id,
                reason = %reason,
                "scan denied"
            ),
        }

        Ok(ScanReply::from_outcome(outcome, &self.config.tablet_identifier))
    }

    /// Load the card holder and the reader, failing with
    /// [`AuthError::NotFound`] when either does not exist.
    pub async fn load_scan_records(&self, request: &ScanRequest) -> AuthResult<(Actor, CardReader)> {
        let actor = self
            .directory
            .find_user_by_card_number(&request.card_number)
            .await?
            .ok_or_else(|| AuthError::NotFound("Couldn't find User".to_string()))?;

        let reader = self
            .directory
            .find_card_reader(&request.reader_identifier, &request.controller_identifier)
            .await?
            .ok_or_else(|| AuthError::NotFound("Couldn't find CardReader".to_string()))?;

        Ok((actor, reader))
    }
}
