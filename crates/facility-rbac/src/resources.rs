//! # Resources
//!
//! Defines the resource classes the engine knows about and the references
//! used both as rule subjects and as query targets.
//!
//! Some resources are facility-scoped through a related record rather than
//! their own column (a reservation belongs to a facility through its order
//! detail's order). The caller resolves those relations up front and attaches
//! the resulting facility ids to the instance under a [`RelationPath`]; the
//! engine never walks relations itself.

use facility_org::{AccountId, FacilityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Resource classes that can appear in grant rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    // Organization
    /// A facility.
    Facility,
    /// A user.
    User,
    /// Facility survey hooks.
    Surveyor,

    // Ordering
    /// An order (a cart of order details).
    Order,
    /// A single line of an order.
    OrderDetail,
    /// An instrument reservation.
    Reservation,
    /// Order detail status definitions.
    OrderStatus,

    // Billing
    /// A billing account.
    Account,
    /// A user's membership on an account.
    AccountUser,
    /// A facility-owned account.
    FacilityAccount,
    /// A journal posting order details to the ledger.
    Journal,
    /// A billing statement.
    Statement,
    /// An uploaded file attached to billing records.
    FileUpload,

    // Products
    /// Any product.
    Product,
    /// A bookable instrument.
    Instrument,
    /// A stock item.
    Item,
    /// A service.
    Service,
    /// A bundle of products.
    Bundle,
    /// A product inside a bundle.
    BundleProduct,
    /// A user's access to a restricted product.
    ProductUser,
    /// An accessory attached to a product.
    ProductAccessory,
    /// A scheduling access group.
    ProductAccessGroup,
    /// An instrument schedule rule.
    ScheduleRule,

    // Pricing
    /// A price group.
    PriceGroup,
    /// A product's membership in a price group.
    PriceGroupProduct,
    /// An account's membership in a price group.
    AccountPriceGroupMember,
    /// A user's membership in a price group.
    UserPriceGroupMember,
    /// Instrument pricing rules.
    InstrumentPricePolicy,
    /// Item pricing rules.
    ItemPricePolicy,
    /// Service pricing rules.
    ServicePricePolicy,

    // Reporting
    /// The reports subsystem.
    Reports,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Facility => "facility",
            ResourceType::User => "user",
            ResourceType::Surveyor => "surveyor",
            ResourceType::Order => "order",
            ResourceType::OrderDetail => "order_detail",
            ResourceType::Reservation => "reservation",
            ResourceType::OrderStatus => "order_status",
            ResourceType::Account => "account",
            ResourceType::AccountUser => "account_user",
            ResourceType::FacilityAccount => "facility_account",
            ResourceType::Journal => "journal",
            ResourceType::Statement => "statement",
            ResourceType::FileUpload => "file_upload",
            ResourceType::Product => "product",
            ResourceType::Instrument => "instrument",
            ResourceType::Item => "item",
            ResourceType::Service => "service",
            ResourceType::Bundle => "bundle",
            ResourceType::BundleProduct => "bundle_product",
            ResourceType::ProductUser => "product_user",
            ResourceType::ProductAccessory => "product_accessory",
            ResourceType::ProductAccessGroup => "product_access_group",
            ResourceType::ScheduleRule => "schedule_rule",
            ResourceType::PriceGroup => "price_group",
            ResourceType::PriceGroupProduct => "price_group_product",
            ResourceType::AccountPriceGroupMember => "account_price_group_member",
            ResourceType::UserPriceGroupMember => "user_price_group_member",
            ResourceType::InstrumentPricePolicy => "instrument_price_policy",
            ResourceType::ItemPricePolicy => "item_price_policy",
            ResourceType::ServicePricePolicy => "service_price_policy",
            ResourceType::Reports => "reports",
        }
    }

    /// Get all resource types.
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Facility,
            ResourceType::User,
            ResourceType::Surveyor,
            ResourceType::Order,
            ResourceType::OrderDetail,
            ResourceType::Reservation,
            ResourceType::OrderStatus,
            ResourceType::Account,
            ResourceType::AccountUser,
            ResourceType::FacilityAccount,
            ResourceType::Journal,
            ResourceType::Statement,
            ResourceType::FileUpload,
            ResourceType::Product,
            ResourceType::Instrument,
            ResourceType::Item,
            ResourceType::Service,
            ResourceType::Bundle,
            ResourceType::BundleProduct,
            ResourceType::ProductUser,
            ResourceType::ProductAccessory,
            ResourceType::ProductAccessGroup,
            ResourceType::ScheduleRule,
            ResourceType::PriceGroup,
            ResourceType::PriceGroupProduct,
            ResourceType::AccountPriceGroupMember,
            ResourceType::UserPriceGroupMember,
            ResourceType::InstrumentPricePolicy,
            ResourceType::ItemPricePolicy,
            ResourceType::ServicePricePolicy,
            ResourceType::Reports,
        ]
    }

    /// Parse resource type from a class or table name.
    ///
    /// # Arguments
    ///
    /// * `s` - Name to parse (snake_case or CamelCase, singular or plural)
    ///
    /// # Returns
    ///
    /// `Some(ResourceType)` if known, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use facility_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("OrderDetail"), Some(ResourceType::OrderDetail));
    /// assert_eq!(ResourceType::parse("facilities"), Some(ResourceType::Facility));
    /// assert_eq!(ResourceType::parse("ReportsController"), Some(ResourceType::Reports));
    /// assert_eq!(ResourceType::parse("spaceship"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let name = to_snake_case(s.trim());
        if name == "reports_controller" {
            return Some(ResourceType::Reports);
        }

        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == name || pluralize(t.as_str()) == name)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

fn pluralize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix('y') {
        format!("{}ies", stem)
    } else if s.ends_with('s') {
        format!("{}es", s)
    } else {
        format!("{}s", s)
    }
}

/// One hop in a relation path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// The owning order.
    Order,
    /// The owning order detail.
    OrderDetail,
    /// Every row of a journal.
    JournalRows,
}

impl Relation {
    /// Get the string representation of the relation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Order => "order",
            Relation::OrderDetail => "order_detail",
            Relation::JournalRows => "journal_rows",
        }
    }

    /// Parse a relation name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "order" => Some(Relation::Order),
            "order_detail" => Some(Relation::OrderDetail),
            "journal_rows" => Some(Relation::JournalRows),
            _ => None,
        }
    }
}

/// A declarative path from a resource to the record whose `facility_id`
/// scopes it.
///
/// The empty path means the resource's own `facility_id`. Paths render as
/// dotted names, e.g. `order_detail.order`.
///
/// # Example
///
/// ```
/// use facility_rbac::resources::{Relation, RelationPath};
///
/// let path = RelationPath::new([Relation::OrderDetail, Relation::Order]);
/// assert_eq!(path.to_string(), "order_detail.order");
/// assert!(RelationPath::own().is_own());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct RelationPath(Vec<Relation>);

impl RelationPath {
    /// Build a path from its hops.
    pub fn new(hops: impl IntoIterator<Item = Relation>) -> Self {
        Self(hops.into_iter().collect())
    }

    /// The resource's own facility.
    pub fn own() -> Self {
        Self(Vec::new())
    }

    /// Check if this is the empty path.
    pub fn is_own(&self) -> bool {
        self.0.is_empty()
    }

    /// The hops of this path.
    pub fn hops(&self) -> &[Relation] {
        &self.0
    }
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Relation::as_str).collect();
        f.write_str(&names.join("."))
    }
}

impl From<RelationPath> for String {
    fn from(path: RelationPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for RelationPath {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Ok(Self::own());
        }
        s.split('.')
            .map(|hop| Relation::parse(hop).ok_or_else(|| format!("unknown relation: {}", hop)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A concrete resource with its pre-resolved facility and account links.
///
/// # Example
///
/// ```
/// use facility_org::FacilityId;
/// use facility_rbac::resources::{Relation, RelationPath, ResourceInstance, ResourceType};
/// use uuid::Uuid;
///
/// let facility = FacilityId::generate();
/// let reservation = ResourceInstance::new(ResourceType::Reservation, Uuid::now_v7())
///     .with_related(RelationPath::new([Relation::OrderDetail, Relation::Order]), [facility]);
///
/// assert!(reservation.facility_id.is_none());
/// assert!(reservation
///     .facility_ids_at(&RelationPath::new([Relation::OrderDetail, Relation::Order]))
///     .contains(&facility));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceInstance {
    /// Resource class
    pub resource_type: ResourceType,

    /// Resource ID
    pub id: Uuid,

    /// The resource's own facility column, if it has one
    pub facility_id: Option<FacilityId>,

    /// The resource's own account column, if it has one
    pub account_id: Option<AccountId>,

    /// Facility ids reached through related records
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_facility_ids: BTreeMap<RelationPath, BTreeSet<FacilityId>>,
}

impl ResourceInstance {
    /// Create an instance with no facility or account links.
    pub fn new(resource_type: ResourceType, id: Uuid) -> Self {
        Self {
            resource_type,
            id,
            facility_id: None,
            account_id: None,
            related_facility_ids: BTreeMap::new(),
        }
    }

    /// A facility instance. A facility is its own facility.
    pub fn facility(facility_id: FacilityId) -> Self {
        Self::new(ResourceType::Facility, facility_id.into_inner()).in_facility(facility_id)
    }

    /// An account instance; `owner_facility` is `None` for unaffiliated accounts.
    /// An account is its own account.
    pub fn account(account_id: AccountId, owner_facility: Option<FacilityId>) -> Self {
        let mut instance =
            Self::new(ResourceType::Account, account_id.into_inner()).for_account(account_id);
        instance.facility_id = owner_facility;
        instance
    }

    /// Set the resource's own facility.
    pub fn in_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    /// Set the resource's own account.
    pub fn for_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Attach facility ids reached through `path`.
    pub fn with_related(
        mut self,
        path: RelationPath,
        facility_ids: impl IntoIterator<Item = FacilityId>,
    ) -> Self {
        self.related_facility_ids
            .entry(path)
            .or_default()
            .extend(facility_ids);
        self
    }

    /// Facility ids reachable at `path`; empty when the caller did not
    /// resolve that path.
    pub fn facility_ids_at(&self, path: &RelationPath) -> BTreeSet<FacilityId> {
        if path.is_own() {
            return self.facility_id.into_iter().collect();
        }
        self.related_facility_ids
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// The facility this instance *is*, for facility instances.
    pub fn as_facility(&self) -> Option<FacilityId> {
        (self.resource_type == ResourceType::Facility).then(|| FacilityId::new(self.id))
    }

    /// The account this instance *is*, for account instances.
    pub fn as_account(&self) -> Option<AccountId> {
        (self.resource_type == ResourceType::Account).then(|| AccountId::new(self.id))
    }
}

/// Reference to a resource, used as a rule subject, a query target or the
/// contextual resource an ability is built around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ResourceRef {
    /// Every resource.
    All,

    /// The billing tab: a screen-level sentinel that enables billing grants.
    BillingTab,

    /// A resource class as a whole.
    Class(ResourceType),

    /// One concrete resource.
    Instance(ResourceInstance),
}

impl ResourceRef {
    /// Reference a concrete facility.
    pub fn facility(facility_id: FacilityId) -> Self {
        ResourceRef::Instance(ResourceInstance::facility(facility_id))
    }

    /// Reference a concrete account.
    pub fn account(account_id: AccountId, owner_facility: Option<FacilityId>) -> Self {
        ResourceRef::Instance(ResourceInstance::account(account_id, owner_facility))
    }

    /// The resource class, if this references one.
    pub fn resource_type(&self) -> Option<ResourceType> {
        match self {
            ResourceRef::Class(t) => Some(*t),
            ResourceRef::Instance(i) => Some(i.resource_type),
            ResourceRef::All | ResourceRef::BillingTab => None,
        }
    }

    /// The instance, if this references one.
    pub fn instance(&self) -> Option<&ResourceInstance> {
        match self {
            ResourceRef::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// Check if this is the billing tab sentinel.
    pub fn is_billing_tab(&self) -> bool {
        matches!(self, ResourceRef::BillingTab)
    }
}

impl From<ResourceType> for ResourceRef {
    fn from(resource_type: ResourceType) -> Self {
        ResourceRef::Class(resource_type)
    }
}

impl From<ResourceInstance> for ResourceRef {
    fn from(instance: ResourceInstance) -> Self {
        ResourceRef::Instance(instance)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::All => f.write_str("all"),
            ResourceRef::BillingTab => f.write_str("billing_tab"),
            ResourceRef::Class(t) => f.write_str(t.as_str()),
            ResourceRef::Instance(i) => write!(f, "{}:{}", i.resource_type, i.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parse_round_trip() {
        for t in ResourceType::all() {
            assert_eq!(ResourceType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn test_resource_type_parse_variants() {
        assert_eq!(ResourceType::parse("AccountPriceGroupMember"), Some(ResourceType::AccountPriceGroupMember));
        assert_eq!(ResourceType::parse("order_statuses"), Some(ResourceType::OrderStatus));
        assert_eq!(ResourceType::parse("journals"), Some(ResourceType::Journal));
        assert_eq!(ResourceType::parse("Reports"), Some(ResourceType::Reports));
        assert_eq!(ResourceType::parse("Widget"), None);
    }

    #[test]
    fn test_relation_path_string_round_trip() {
        let path = RelationPath::new([Relation::JournalRows, Relation::OrderDetail, Relation::Order]);
        let s: String = path.clone().into();
        assert_eq!(s, "journal_rows.order_detail.order");
        assert_eq!(RelationPath::try_from(s).unwrap(), path);
        assert_eq!(RelationPath::try_from(String::new()).unwrap(), RelationPath::own());
        assert!(RelationPath::try_from("order.nowhere".to_string()).is_err());
    }

    #[test]
    fn test_facility_ids_at_own_and_related() {
        let own = FacilityId::generate();
        let related = FacilityId::generate();
        let path = RelationPath::new([Relation::Order]);
        let detail = ResourceInstance::new(ResourceType::OrderDetail, Uuid::now_v7())
            .in_facility(own)
            .with_related(path.clone(), [related]);

        assert_eq!(detail.facility_ids_at(&RelationPath::own()), BTreeSet::from([own]));
        assert_eq!(detail.facility_ids_at(&path), BTreeSet::from([related]));
        assert!(detail
            .facility_ids_at(&RelationPath::new([Relation::OrderDetail, Relation::Order]))
            .is_empty());
    }

    #[test]
    fn test_instance_identity_helpers() {
        let facility = FacilityId::generate();
        let account = AccountId::generate();

        assert_eq!(ResourceInstance::facility(facility).as_facility(), Some(facility));
        assert_eq!(ResourceInstance::facility(facility).as_account(), None);
        assert_eq!(ResourceInstance::account(account, None).as_account(), Some(account));
    }

    #[test]
    fn test_facility_and_account_instances_carry_their_own_ids() {
        let facility = FacilityId::generate();
        let owner = FacilityId::generate();
        let account = AccountId::generate();

        assert_eq!(ResourceInstance::facility(facility).facility_id, Some(facility));

        let instance = ResourceInstance::account(account, Some(owner));
        assert_eq!(instance.account_id, Some(account));
        assert_eq!(instance.facility_id, Some(owner));
        assert_eq!(ResourceInstance::account(account, None).facility_id, None);
    }

    #[test]
    fn test_resource_ref_serializes_with_relation_paths() {
        let instance = ResourceInstance::new(ResourceType::Reservation, Uuid::now_v7())
            .with_related(RelationPath::new([Relation::OrderDetail, Relation::Order]), [FacilityId::generate()]);
        let reference = ResourceRef::Instance(instance);

        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("\"order_detail.order\""));
        let back: ResourceRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }

    #[test]
    fn test_resource_ref_display() {
        assert_eq!(ResourceRef::All.to_string(), "all");
        assert_eq!(ResourceRef::BillingTab.to_string(), "billing_tab");
        assert_eq!(ResourceRef::Class(ResourceType::OrderDetail).to_string(), "order_detail");
    }
}
