//! Screen definitions for the resources the console manages.
//!
//! A kind is plain configuration: collection root, labels, the form schema
//! and the static messages shown to the user. Controllers are generic over
//! it.

use crate::mode::CREATE_SENTINEL;
use crate::model::FieldSpec;

/// Static notification texts for an edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub save_failed: &'static str,
    pub load_failed: &'static str,
}

/// Everything an edit screen needs to know about its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditKind {
    /// Collection endpoint, e.g. `/ca_certificates`.
    pub collection: &'static str,
    /// Title case name used in the screen title.
    pub singular: &'static str,
    /// Lower case name shown in confirmation dialogs.
    pub resource_label: &'static str,
    /// Parent list view, navigated to after a failed load or a delete.
    pub list_route: &'static str,
    pub sentinel: &'static str,
    pub schema: &'static [FieldSpec],
    /// Field that must carry meaningful content before submitting.
    pub primary_field: &'static str,
    /// Optional fingerprint field, dropped from the payload when too short.
    pub digest_field: Option<&'static str>,
    pub messages: EditMessages,
}

/// Everything a list screen needs to know about its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListKind {
    pub collection: &'static str,
    pub title: &'static str,
    /// The list view's own route, e.g. `#!/routes`.
    pub route: &'static str,
    pub new_label: &'static str,
    pub load_failed: &'static str,
}

impl ListKind {
    /// Route of the matching create screen.
    pub fn create_route(&self) -> String {
        format!("{}/{CREATE_SENTINEL}", self.route)
    }
}

pub const CA_CERTIFICATE: EditKind = EditKind {
    collection: "/ca_certificates",
    singular: "CA Certificate",
    resource_label: "CA certificate",
    list_route: "#!/certificates",
    sentinel: CREATE_SENTINEL,
    schema: &[
        FieldSpec::text("cert"),
        FieldSpec::text("cert_digest"),
        FieldSpec::list("tags"),
    ],
    primary_field: "cert",
    digest_field: Some("cert_digest"),
    messages: EditMessages {
        created: "New CA certificate added.",
        updated: "CA certificate details updated.",
        save_failed: "Unable to save CA certificate details.",
        load_failed: "Could not load CA details",
    },
};

pub const ROUTES: ListKind = ListKind {
    collection: "/routes",
    title: "Routes",
    route: "#!/routes",
    new_label: "New Route",
    load_failed: "Could not load list of routes.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_route_uses_sentinel() {
        assert_eq!(ROUTES.create_route(), "#!/routes/__create__");
    }

    #[test]
    fn ca_certificate_fields_are_in_schema() {
        let names: Vec<_> = CA_CERTIFICATE.schema.iter().map(|spec| spec.name).collect();
        assert!(names.contains(&CA_CERTIFICATE.primary_field));
        assert!(names.contains(&CA_CERTIFICATE.digest_field.unwrap()));
    }
}
