//! Domain objects returned by the Smartwaiver v4 API.
//!
//! # Design
//! Each type is built from the raw JSON mapping found in a response payload
//! via `from_raw`, which runs the type's `Schema` first and then copies every
//! field into typed storage. Nested objects (participants, custom fields,
//! guardian) are built recursively and their errors propagate unchanged.
//!
//! Everything except `WebhookConfig` is read-only after construction. All
//! types serialize back to the camelCase wire mapping they came from.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::validate::{Fields, Schema, ValidationError};

/// A waiver template configured on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    template_id: String,
    title: String,
    published_version: i64,
    published_on: String,
    web_url: String,
    kiosk_url: String,
}

impl Template {
    pub const SCHEMA: Schema = Schema::new(
        "Template",
        &[
            "templateId",
            "title",
            "publishedVersion",
            "publishedOn",
            "webUrl",
            "kioskUrl",
        ],
    );

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            template_id: fields.string("templateId")?,
            title: fields.string("title")?,
            published_version: fields.integer("publishedVersion")?,
            published_on: fields.string("publishedOn")?,
            web_url: fields.string("webUrl")?,
            kiosk_url: fields.string("kioskUrl")?,
        })
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn published_version(&self) -> i64 {
        self.published_version
    }

    /// Publication date as sent by the server.
    pub fn published_on(&self) -> &str {
        &self.published_on
    }

    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    pub fn kiosk_url(&self) -> &str {
        &self.kiosk_url
    }
}

/// The summary form of a signed waiver, as returned by the waiver list query.
///
/// The person fields describe the first participant on the waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaiverSummary {
    waiver_id: String,
    template_id: String,
    title: String,
    created_on: String,
    expiration_date: String,
    expired: bool,
    verified: bool,
    kiosk: bool,
    first_name: String,
    middle_name: String,
    last_name: String,
    dob: String,
    is_minor: bool,
    tags: Vec<String>,
}

impl WaiverSummary {
    pub const SCHEMA: Schema = Schema::new(
        "WaiverSummary",
        &[
            "waiverId",
            "templateId",
            "title",
            "createdOn",
            "expirationDate",
            "expired",
            "verified",
            "kiosk",
            "firstName",
            "middleName",
            "lastName",
            "dob",
            "isMinor",
            "tags",
        ],
    );

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            waiver_id: fields.string("waiverId")?,
            template_id: fields.string("templateId")?,
            title: fields.string("title")?,
            created_on: fields.string("createdOn")?,
            expiration_date: fields.string("expirationDate")?,
            expired: fields.boolean("expired")?,
            verified: fields.boolean("verified")?,
            kiosk: fields.boolean("kiosk")?,
            first_name: fields.string("firstName")?,
            middle_name: fields.string("middleName")?,
            last_name: fields.string("lastName")?,
            dob: fields.string("dob")?,
            is_minor: fields.boolean("isMinor")?,
            tags: fields.strings("tags")?,
        })
    }

    pub fn waiver_id(&self) -> &str {
        &self.waiver_id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_on(&self) -> &str {
        &self.created_on
    }

    /// Empty when the waiver never expires.
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Whether the signer confirmed their email address.
    pub fn verified(&self) -> bool {
        self.verified
    }

    /// Whether the waiver was signed at a kiosk.
    pub fn kiosk(&self) -> bool {
        self.kiosk
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn dob(&self) -> &str {
        &self.dob
    }

    pub fn is_minor(&self) -> bool {
        self.is_minor
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A fully detailed signed waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Waiver {
    waiver_id: String,
    template_id: String,
    title: String,
    created_on: String,
    expiration_date: String,
    expired: bool,
    verified: bool,
    kiosk: bool,
    first_name: String,
    middle_name: String,
    last_name: String,
    dob: String,
    is_minor: bool,
    #[serde(rename = "clientIP")]
    client_ip: String,
    tags: Vec<String>,
    participants: Vec<Participant>,
    email: String,
    marketing_allowed: bool,
    address_line_one: String,
    address_line_two: String,
    address_city: String,
    address_state: String,
    address_zip: String,
    address_country: String,
    emergency_contact_name: String,
    emergency_contact_phone: String,
    insurance_carrier: String,
    insurance_policy_number: String,
    drivers_license_number: String,
    drivers_license_state: String,
    custom_waiver_fields: BTreeMap<String, CustomField>,
    guardian: Option<Guardian>,
    pdf: String,
}

impl Waiver {
    pub const SCHEMA: Schema = Schema::new(
        "Waiver",
        &[
            "waiverId",
            "templateId",
            "title",
            "createdOn",
            "expirationDate",
            "expired",
            "verified",
            "kiosk",
            "firstName",
            "middleName",
            "lastName",
            "dob",
            "isMinor",
            "clientIP",
            "tags",
            "participants",
            "email",
            "marketingAllowed",
            "addressLineOne",
            "addressLineTwo",
            "addressCity",
            "addressState",
            "addressZip",
            "addressCountry",
            "emergencyContactName",
            "emergencyContactPhone",
            "insuranceCarrier",
            "insurancePolicyNumber",
            "driversLicenseNumber",
            "driversLicenseState",
            "customWaiverFields",
            "guardian",
            "pdf",
        ],
    );

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            waiver_id: fields.string("waiverId")?,
            template_id: fields.string("templateId")?,
            title: fields.string("title")?,
            created_on: fields.string("createdOn")?,
            expiration_date: fields.string("expirationDate")?,
            expired: fields.boolean("expired")?,
            verified: fields.boolean("verified")?,
            kiosk: fields.boolean("kiosk")?,
            first_name: fields.string("firstName")?,
            middle_name: fields.string("middleName")?,
            last_name: fields.string("lastName")?,
            dob: fields.string("dob")?,
            is_minor: fields.boolean("isMinor")?,
            client_ip: fields.string("clientIP")?,
            tags: fields.strings("tags")?,
            participants: fields
                .value("participants")?
                .as_array()
                .ok_or(ValidationError::ParticipantsNotAList)?
                .iter()
                .map(Participant::from_raw)
                .collect::<Result<Vec<_>, _>>()?,
            email: fields.string("email")?,
            marketing_allowed: fields.boolean("marketingAllowed")?,
            address_line_one: fields.string("addressLineOne")?,
            address_line_two: fields.string("addressLineTwo")?,
            address_city: fields.string("addressCity")?,
            address_state: fields.string("addressState")?,
            address_zip: fields.string("addressZip")?,
            address_country: fields.string("addressCountry")?,
            emergency_contact_name: fields.string("emergencyContactName")?,
            emergency_contact_phone: fields.string("emergencyContactPhone")?,
            insurance_carrier: fields.string("insuranceCarrier")?,
            insurance_policy_number: fields.string("insurancePolicyNumber")?,
            drivers_license_number: fields.string("driversLicenseNumber")?,
            drivers_license_state: fields.string("driversLicenseState")?,
            custom_waiver_fields: custom_fields(&fields, "customWaiverFields", "waiver")?,
            guardian: match fields.value("guardian")? {
                Value::Null => None,
                raw => Some(Guardian::from_raw(raw)?),
            },
            pdf: fields.string("pdf")?,
        })
    }

    pub fn waiver_id(&self) -> &str {
        &self.waiver_id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_on(&self) -> &str {
        &self.created_on
    }

    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    pub fn expired(&self) -> bool {
        self.expired
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn kiosk(&self) -> bool {
        self.kiosk
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn dob(&self) -> &str {
        &self.dob
    }

    pub fn is_minor(&self) -> bool {
        self.is_minor
    }

    /// IP address the waiver was submitted from.
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn marketing_allowed(&self) -> bool {
        self.marketing_allowed
    }

    pub fn address_line_one(&self) -> &str {
        &self.address_line_one
    }

    pub fn address_line_two(&self) -> &str {
        &self.address_line_two
    }

    pub fn address_city(&self) -> &str {
        &self.address_city
    }

    pub fn address_state(&self) -> &str {
        &self.address_state
    }

    pub fn address_zip(&self) -> &str {
        &self.address_zip
    }

    pub fn address_country(&self) -> &str {
        &self.address_country
    }

    pub fn emergency_contact_name(&self) -> &str {
        &self.emergency_contact_name
    }

    pub fn emergency_contact_phone(&self) -> &str {
        &self.emergency_contact_phone
    }

    pub fn insurance_carrier(&self) -> &str {
        &self.insurance_carrier
    }

    pub fn insurance_policy_number(&self) -> &str {
        &self.insurance_policy_number
    }

    pub fn drivers_license_number(&self) -> &str {
        &self.drivers_license_number
    }

    pub fn drivers_license_state(&self) -> &str {
        &self.drivers_license_state
    }

    /// Custom waiver fields keyed by their GUID.
    pub fn custom_waiver_fields(&self) -> &BTreeMap<String, CustomField> {
        &self.custom_waiver_fields
    }

    /// Present only when every participant on the waiver is a minor.
    pub fn guardian(&self) -> Option<&Guardian> {
        self.guardian.as_ref()
    }

    /// Base64 encoded PDF, empty unless it was requested.
    pub fn pdf(&self) -> &str {
        &self.pdf
    }
}

/// One person covered by a signed waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    first_name: String,
    middle_name: String,
    last_name: String,
    dob: String,
    is_minor: bool,
    gender: String,
    phone: String,
    tags: Vec<String>,
    custom_participant_fields: BTreeMap<String, CustomField>,
}

impl Participant {
    pub const SCHEMA: Schema = Schema::new(
        "Participant",
        &[
            "firstName",
            "middleName",
            "lastName",
            "dob",
            "isMinor",
            "gender",
            "phone",
            "tags",
            "customParticipantFields",
        ],
    );

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            first_name: fields.string("firstName")?,
            middle_name: fields.string("middleName")?,
            last_name: fields.string("lastName")?,
            dob: fields.string("dob")?,
            is_minor: fields.boolean("isMinor")?,
            gender: fields.string("gender")?,
            phone: fields.string("phone")?,
            tags: fields.strings("tags")?,
            custom_participant_fields: custom_fields(
                &fields,
                "customParticipantFields",
                "participant",
            )?,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn dob(&self) -> &str {
        &self.dob
    }

    pub fn is_minor(&self) -> bool {
        self.is_minor
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn custom_participant_fields(&self) -> &BTreeMap<String, CustomField> {
        &self.custom_participant_fields
    }
}

/// A custom question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    value: String,
    display_text: String,
}

impl CustomField {
    pub const SCHEMA: Schema = Schema::new("CustomField", &["value", "displayText"]);

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            value: fields.string("value")?,
            display_text: fields.string("displayText")?,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }
}

/// The adult signing on behalf of minor participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    first_name: String,
    middle_name: String,
    last_name: String,
    phone: String,
    relationship: String,
}

impl Guardian {
    pub const SCHEMA: Schema = Schema::new(
        "Guardian",
        &["firstName", "middleName", "lastName", "phone", "relationship"],
    );

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        Ok(Self {
            first_name: fields.string("firstName")?,
            middle_name: fields.string("middleName")?,
            last_name: fields.string("lastName")?,
            phone: fields.string("phone")?,
            relationship: fields.string("relationship")?,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Relationship of the guardian to the minors.
    pub fn relationship(&self) -> &str {
        &self.relationship
    }
}

/// When the account's webhook fires relative to email verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailValidation {
    /// Sent as soon as the waiver is signed. Wire value `"no"`.
    BeforeEmailOnly,
    /// Sent only after the email address is verified. Wire value `"yes"`.
    AfterEmailOnly,
    /// Sent on signing and again after verification. Wire value `"both"`.
    BeforeAndAfterEmail,
}

impl EmailValidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailValidation::BeforeEmailOnly => "no",
            EmailValidation::AfterEmailOnly => "yes",
            EmailValidation::BeforeAndAfterEmail => "both",
        }
    }
}

impl fmt::Display for EmailValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown `emailValidationRequired` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown email validation setting: {0:?} (expected \"no\", \"yes\" or \"both\")")]
pub struct UnknownEmailValidation(pub String);

impl FromStr for EmailValidation {
    type Err = UnknownEmailValidation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(EmailValidation::BeforeEmailOnly),
            "yes" => Ok(EmailValidation::AfterEmailOnly),
            "both" => Ok(EmailValidation::BeforeAndAfterEmail),
            other => Err(UnknownEmailValidation(other.to_string())),
        }
    }
}

impl Serialize for EmailValidation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The account's webhook configuration.
///
/// Unlike the other domain objects this one is meant to be edited locally
/// and pushed back with `SmartwaiverClient::set_webhook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub endpoint: String,
    pub email_validation_required: EmailValidation,
}

impl WebhookConfig {
    pub const SCHEMA: Schema = Schema::new("WebhookConfig", &["endpoint", "emailValidationRequired"]);

    pub fn new(endpoint: impl Into<String>, email_validation_required: EmailValidation) -> Self {
        Self {
            endpoint: endpoint.into(),
            email_validation_required,
        }
    }

    pub fn from_raw(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Self::SCHEMA.check(raw)?;
        let endpoint = fields.string("endpoint")?;
        let email_validation_required = fields
            .string("emailValidationRequired")?
            .parse::<EmailValidation>()
            .map_err(|_| fields.invalid("emailValidationRequired", "\"no\", \"yes\" or \"both\""))?;
        Ok(Self {
            endpoint,
            email_validation_required,
        })
    }
}

/// Builds a GUID -> `CustomField` map from the mapping stored under `field`.
fn custom_fields(
    fields: &Fields<'_>,
    field: &'static str,
    scope: &'static str,
) -> Result<BTreeMap<String, CustomField>, ValidationError> {
    fields
        .value(field)?
        .as_object()
        .ok_or(ValidationError::CustomFieldsNotAMapping { scope })?
        .iter()
        .map(|(guid, raw)| Ok((guid.clone(), CustomField::from_raw(raw)?)))
        .collect()
}
