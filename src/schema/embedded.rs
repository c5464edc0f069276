//! Embedded core schema documents.
//!
//! The RFC 7643 User, Group and Enterprise User schemas, compiled into the binary so
//! a server can start without schema files on disk. Common attributes (`id`,
//! `externalId`, `meta`) are handled by the resource type and are not part of these
//! documents. Sub-attributes named `$ref` are left out because they fall outside the
//! attribute name grammar.

pub const USER_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const GROUP_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
pub const ENTERPRISE_USER_SCHEMA_URN: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Core User schema (`urn:ietf:params:scim:schemas:core:2.0:User`).
pub fn core_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:User",
  "name": "User",
  "description": "User Account",
  "attributes": [
    {
      "name": "userName", "type": "string", "multiValued": false, "required": true,
      "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "server",
      "description": "Unique identifier for the User, typically used by the user to directly authenticate to the service provider."
    },
    {
      "name": "name", "type": "complex", "multiValued": false, "required": false,
      "mutability": "readWrite", "returned": "default", "uniqueness": "none",
      "description": "The components of the user's real name.",
      "subAttributes": [
        {"name": "formatted", "type": "string", "description": "The full name, including all middle names, titles, and suffixes as appropriate, formatted for display."},
        {"name": "familyName", "type": "string", "description": "The family name of the User."},
        {"name": "givenName", "type": "string", "description": "The given name of the User."},
        {"name": "middleName", "type": "string", "description": "The middle name(s) of the User."},
        {"name": "honorificPrefix", "type": "string", "description": "The honorific prefix(es) of the User."},
        {"name": "honorificSuffix", "type": "string", "description": "The honorific suffix(es) of the User."}
      ]
    },
    {"name": "displayName", "type": "string", "description": "The name of the User, suitable for display to end-users."},
    {"name": "nickName", "type": "string", "description": "The casual way to address the user in real life."},
    {"name": "profileUrl", "type": "reference", "referenceTypes": ["external"], "description": "A fully qualified URL pointing to a page representing the User's online profile."},
    {"name": "title", "type": "string", "description": "The user's title, such as \"Vice President.\""},
    {"name": "userType", "type": "string", "description": "Used to identify the relationship between the organization and the user."},
    {"name": "preferredLanguage", "type": "string", "description": "Indicates the User's preferred written or spoken language."},
    {"name": "locale", "type": "string", "description": "Used to indicate the User's default location for purposes of localizing items such as currency, date time format, or numerical representations."},
    {"name": "timezone", "type": "string", "description": "The User's time zone in the 'Olson' time zone database format, e.g., 'America/Los_Angeles'."},
    {"name": "active", "type": "boolean", "description": "A Boolean value indicating the User's administrative status."},
    {
      "name": "password", "type": "string", "mutability": "writeOnly", "returned": "never",
      "description": "The User's cleartext password."
    },
    {
      "name": "emails", "type": "complex", "multiValued": true,
      "description": "Email addresses for the user.",
      "subAttributes": [
        {"name": "value", "type": "string", "description": "Email addresses for the user."},
        {"name": "display", "type": "string", "description": "A human-readable name, primarily used for display purposes."},
        {"name": "type", "type": "string", "canonicalValues": ["work", "home", "other"], "description": "A label indicating the attribute's function, e.g., 'work' or 'home'."},
        {"name": "primary", "type": "boolean", "description": "A Boolean value indicating the 'primary' or preferred attribute value for this attribute."}
      ]
    },
    {
      "name": "phoneNumbers", "type": "complex", "multiValued": true,
      "description": "Phone numbers for the User.",
      "subAttributes": [
        {"name": "value", "type": "string", "description": "Phone number of the User."},
        {"name": "display", "type": "string", "description": "A human-readable name, primarily used for display purposes."},
        {"name": "type", "type": "string", "canonicalValues": ["work", "home", "mobile", "fax", "pager", "other"], "description": "A label indicating the attribute's function."},
        {"name": "primary", "type": "boolean", "description": "A Boolean value indicating the 'primary' or preferred attribute value for this attribute."}
      ]
    },
    {
      "name": "ims", "type": "complex", "multiValued": true,
      "description": "Instant messaging addresses for the User.",
      "subAttributes": [
        {"name": "value", "type": "string"},
        {"name": "display", "type": "string"},
        {"name": "type", "type": "string", "canonicalValues": ["aim", "gtalk", "icq", "xmpp", "msn", "skype", "qq", "yahoo"]},
        {"name": "primary", "type": "boolean"}
      ]
    },
    {
      "name": "photos", "type": "complex", "multiValued": true,
      "description": "URLs of photos of the User.",
      "subAttributes": [
        {"name": "value", "type": "reference", "referenceTypes": ["external"]},
        {"name": "display", "type": "string"},
        {"name": "type", "type": "string", "canonicalValues": ["photo", "thumbnail"]},
        {"name": "primary", "type": "boolean"}
      ]
    },
    {
      "name": "addresses", "type": "complex", "multiValued": true,
      "description": "A physical mailing address for this User.",
      "subAttributes": [
        {"name": "formatted", "type": "string", "description": "The full mailing address, formatted for display or use with a mailing label."},
        {"name": "streetAddress", "type": "string", "description": "The full street address component."},
        {"name": "locality", "type": "string", "description": "The city or locality component."},
        {"name": "region", "type": "string", "description": "The state or region component."},
        {"name": "postalCode", "type": "string", "description": "The zip code or postal code component."},
        {"name": "country", "type": "string", "description": "The country name component."},
        {"name": "type", "type": "string", "canonicalValues": ["work", "home", "other"]},
        {"name": "primary", "type": "boolean"}
      ]
    },
    {
      "name": "groups", "type": "complex", "multiValued": true, "mutability": "readOnly",
      "description": "A list of groups to which the user belongs.",
      "subAttributes": [
        {"name": "value", "type": "string", "mutability": "readOnly"},
        {"name": "display", "type": "string", "mutability": "readOnly"},
        {"name": "type", "type": "string", "mutability": "readOnly", "canonicalValues": ["direct", "indirect"]}
      ]
    },
    {
      "name": "entitlements", "type": "complex", "multiValued": true,
      "description": "A list of entitlements for the User that represent a thing the User has.",
      "subAttributes": [
        {"name": "value", "type": "string"},
        {"name": "display", "type": "string"},
        {"name": "type", "type": "string"},
        {"name": "primary", "type": "boolean"}
      ]
    },
    {
      "name": "roles", "type": "complex", "multiValued": true,
      "description": "A list of roles for the User that collectively represent who the User is.",
      "subAttributes": [
        {"name": "value", "type": "string"},
        {"name": "display", "type": "string"},
        {"name": "type", "type": "string"},
        {"name": "primary", "type": "boolean"}
      ]
    },
    {
      "name": "x509Certificates", "type": "complex", "multiValued": true,
      "description": "A list of certificates issued to the User.",
      "subAttributes": [
        {"name": "value", "type": "binary", "description": "The value of an X.509 certificate."},
        {"name": "display", "type": "string"},
        {"name": "type", "type": "string"},
        {"name": "primary", "type": "boolean"}
      ]
    }
  ]
}"#
}

/// Core Group schema (`urn:ietf:params:scim:schemas:core:2.0:Group`).
pub fn core_group_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:Group",
  "name": "Group",
  "description": "Group",
  "attributes": [
    {
      "name": "displayName", "type": "string", "required": true,
      "description": "A human-readable name for the Group."
    },
    {
      "name": "members", "type": "complex", "multiValued": true,
      "description": "A list of members of the Group.",
      "subAttributes": [
        {"name": "value", "type": "string", "mutability": "immutable", "description": "Identifier of the member of this Group."},
        {"name": "display", "type": "string", "description": "A human-readable name for the member."},
        {"name": "type", "type": "string", "mutability": "immutable", "canonicalValues": ["User", "Group"], "description": "A label indicating the type of resource."}
      ]
    }
  ]
}"#
}

/// Enterprise User extension
/// (`urn:ietf:params:scim:schemas:extension:enterprise:2.0:User`).
pub fn enterprise_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
  "name": "EnterpriseUser",
  "description": "Enterprise User",
  "attributes": [
    {"name": "employeeNumber", "type": "string", "description": "Numeric or alphanumeric identifier assigned to a person."},
    {"name": "costCenter", "type": "string", "description": "Identifies the name of a cost center."},
    {"name": "organization", "type": "string", "description": "Identifies the name of an organization."},
    {"name": "division", "type": "string", "description": "Identifies the name of a division."},
    {"name": "department", "type": "string", "description": "Identifies the name of a department."},
    {
      "name": "manager", "type": "complex",
      "description": "The User's manager.",
      "subAttributes": [
        {"name": "value", "type": "string", "description": "The id of the SCIM resource representing the User's manager."},
        {"name": "displayName", "type": "string", "mutability": "readOnly", "description": "The displayName of the User's manager."}
      ]
    }
  ]
}"#
}
