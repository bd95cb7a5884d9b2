//! # Verbs
//!
//! Defines every operation an actor can request on a resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations that can be requested on resources.
///
/// Most verbs correspond to a screen or endpoint action. A few are umbrella
/// verbs that cover others when granted:
/// - **Manage**: covers every verb
/// - **Read**: covers `Index` and `Show`
/// - **Create**: covers `New`
/// - **Update**: covers `Edit`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Full control of the resource.
    Manage,
    /// View a resource or list of resources.
    Read,
    /// Browse a collection.
    Index,
    /// View a single resource.
    Show,
    /// Open the creation form.
    New,
    /// Create a resource.
    Create,
    /// Open the edit form.
    Edit,
    /// Modify a resource.
    Update,
    /// Remove a resource.
    Destroy,
    /// List resources in a facility-wide listing.
    List,
    /// Suspend an account.
    Suspend,
    /// Lift an account suspension.
    Unsuspend,
    /// View an instrument schedule.
    Schedule,
    /// View the facility agenda.
    Agenda,
    /// Activate a survey.
    Activate,
    /// Deactivate a survey.
    Deactivate,
    /// View orders with problems.
    ShowProblems,
    /// Complete a survey.
    Complete,
    /// Search users of an account.
    UserSearch,
    /// List accounts of a user.
    UserAccounts,
    /// List statements.
    Statements,
    /// View a single statement.
    ShowStatement,
    /// List members of an account.
    Members,
    /// Search resources.
    Search,
    /// View the accounts receivable report.
    AccountsReceivable,
    /// Start or stop an instrument reservation.
    StartStop,
}

impl Verb {
    /// Get the string representation of the verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Manage => "manage",
            Verb::Read => "read",
            Verb::Index => "index",
            Verb::Show => "show",
            Verb::New => "new",
            Verb::Create => "create",
            Verb::Edit => "edit",
            Verb::Update => "update",
            Verb::Destroy => "destroy",
            Verb::List => "list",
            Verb::Suspend => "suspend",
            Verb::Unsuspend => "unsuspend",
            Verb::Schedule => "schedule",
            Verb::Agenda => "agenda",
            Verb::Activate => "activate",
            Verb::Deactivate => "deactivate",
            Verb::ShowProblems => "show_problems",
            Verb::Complete => "complete",
            Verb::UserSearch => "user_search",
            Verb::UserAccounts => "user_accounts",
            Verb::Statements => "statements",
            Verb::ShowStatement => "show_statement",
            Verb::Members => "members",
            Verb::Search => "search",
            Verb::AccountsReceivable => "accounts_receivable",
            Verb::StartStop => "start_stop",
        }
    }

    /// Parse verb from string representation.
    ///
    /// Unknown verbs return `None`; callers treat that as a denial.
    ///
    /// # Example
    ///
    /// ```
    /// use facility_rbac::verbs::Verb;
    ///
    /// assert_eq!(Verb::parse("show_problems"), Some(Verb::ShowProblems));
    /// assert_eq!(Verb::parse("Manage"), Some(Verb::Manage));
    /// assert_eq!(Verb::parse("teleport"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().trim_start_matches(':').to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|verb| verb.as_str() == normalized)
    }

    /// Get all verbs.
    pub fn all() -> &'static [Verb] {
        &[
            Verb::Manage,
            Verb::Read,
            Verb::Index,
            Verb::Show,
            Verb::New,
            Verb::Create,
            Verb::Edit,
            Verb::Update,
            Verb::Destroy,
            Verb::List,
            Verb::Suspend,
            Verb::Unsuspend,
            Verb::Schedule,
            Verb::Agenda,
            Verb::Activate,
            Verb::Deactivate,
            Verb::ShowProblems,
            Verb::Complete,
            Verb::UserSearch,
            Verb::UserAccounts,
            Verb::Statements,
            Verb::ShowStatement,
            Verb::Members,
            Verb::Search,
            Verb::AccountsReceivable,
            Verb::StartStop,
        ]
    }

    /// Check if granting this verb implicitly grants another one.
    ///
    /// - `Manage` implies every verb
    /// - `Read` implies `Index` and `Show`
    /// - `Create` implies `New`
    /// - `Update` implies `Edit`
    ///
    /// # Example
    ///
    /// ```
    /// use facility_rbac::verbs::Verb;
    ///
    /// assert!(Verb::Manage.implies(Verb::ShowProblems));
    /// assert!(Verb::Read.implies(Verb::Show));
    /// assert!(!Verb::Show.implies(Verb::Read));
    /// ```
    pub fn implies(&self, other: Verb) -> bool {
        match self {
            Verb::Manage => true,
            Verb::Read => matches!(other, Verb::Index | Verb::Show),
            Verb::Create => other == Verb::New,
            Verb::Update => other == Verb::Edit,
            _ => false,
        }
    }

    /// Check if granting this verb grants `other`, either directly or
    /// through [`Verb::implies`].
    pub fn covers(&self, other: Verb) -> bool {
        *self == other || self.implies(other)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
