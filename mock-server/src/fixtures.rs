//! Canned account data served by the mock API.

use serde_json::{json, Map, Value};

/// Fields of a full waiver that also appear in its list summary.
pub const SUMMARY_FIELDS: [&str; 14] = [
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
];

/// Base64 of a minimal PDF header, returned when a waiver is fetched with
/// `pdf=true`.
pub const PDF_BASE64: &str = "JVBERi0xLjQKJcfsj6IK";

pub fn templates() -> Vec<Value> {
    vec![
        json!({
            "templateId": "sprswrvh2keeh",
            "title": "Demo Waiver",
            "publishedVersion": 78015,
            "publishedOn": "2017-01-24 11:14:25",
            "webUrl": "https://www.smartwaiver.com/w/sprswrvh2keeh/web/",
            "kioskUrl": "https://www.smartwaiver.com/w/sprswrvh2keeh/kiosk/"
        }),
        json!({
            "templateId": "alkagaldeab",
            "title": "Equipment Rental Agreement",
            "publishedVersion": 43120,
            "publishedOn": "2017-03-02 08:30:00",
            "webUrl": "https://www.smartwaiver.com/w/alkagaldeab/web/",
            "kioskUrl": "https://www.smartwaiver.com/w/alkagaldeab/kiosk/"
        }),
    ]
}

pub fn waivers() -> Vec<Value> {
    vec![
        json!({
            "waiverId": "6jebdfxzvrdkd",
            "templateId": "sprswrvh2keeh",
            "title": "Demo Waiver",
            "createdOn": "2017-01-24 13:12:29",
            "expirationDate": "",
            "expired": false,
            "verified": true,
            "kiosk": true,
            "firstName": "Kyle",
            "middleName": "",
            "lastName": "Smith",
            "dob": "2008-12-25",
            "isMinor": true,
            "clientIP": "192.0.2.0",
            "tags": ["Green Team"],
            "participants": [{
                "firstName": "Kyle",
                "middleName": "",
                "lastName": "Smith",
                "dob": "2008-12-25",
                "isMinor": true,
                "gender": "Male",
                "phone": "",
                "tags": [],
                "customParticipantFields": {
                    "bk3xydss4e9dy": {
                        "value": "YES",
                        "displayText": "Is this participant ready to have fun?"
                    }
                }
            }],
            "email": "example@smartwaiver.com",
            "marketingAllowed": false,
            "addressLineOne": "626 NW Arizona Ave.",
            "addressLineTwo": "Suite 2",
            "addressCity": "Bend",
            "addressState": "OR",
            "addressZip": "97703",
            "addressCountry": "US",
            "emergencyContactName": "Mary Smith",
            "emergencyContactPhone": "111-111-1111",
            "insuranceCarrier": "Aetna",
            "insurancePolicyNumber": "1234567",
            "driversLicenseNumber": "9876543",
            "driversLicenseState": "OR",
            "customWaiverFields": {
                "ha5bs1jy5wdop": {
                    "value": "A friend",
                    "displayText": "How did you hear about this company?"
                }
            },
            "guardian": {
                "firstName": "Jane",
                "middleName": "",
                "lastName": "Smith",
                "phone": "111-111-1111",
                "relationship": "Mother"
            },
            "pdf": ""
        }),
        json!({
            "waiverId": "vp7ne3rtmzhhq",
            "templateId": "alkagaldeab",
            "title": "Equipment Rental Agreement",
            "createdOn": "2017-03-04 16:45:02",
            "expirationDate": "2018-03-04",
            "expired": false,
            "verified": false,
            "kiosk": false,
            "firstName": "Alex",
            "middleName": "J",
            "lastName": "Rivera",
            "dob": "1985-06-14",
            "isMinor": false,
            "clientIP": "198.51.100.7",
            "tags": [],
            "participants": [{
                "firstName": "Alex",
                "middleName": "J",
                "lastName": "Rivera",
                "dob": "1985-06-14",
                "isMinor": false,
                "gender": "",
                "phone": "541-555-0100",
                "tags": [],
                "customParticipantFields": {}
            }],
            "email": "alex.rivera@example.org",
            "marketingAllowed": true,
            "addressLineOne": "",
            "addressLineTwo": "",
            "addressCity": "",
            "addressState": "",
            "addressZip": "",
            "addressCountry": "",
            "emergencyContactName": "",
            "emergencyContactPhone": "",
            "insuranceCarrier": "",
            "insurancePolicyNumber": "",
            "driversLicenseNumber": "",
            "driversLicenseState": "",
            "customWaiverFields": {},
            "guardian": null,
            "pdf": ""
        }),
    ]
}

/// Projects a full waiver onto the fields of its list summary.
pub fn summary(waiver: &Value) -> Value {
    let fields: Map<String, Value> = SUMMARY_FIELDS
        .iter()
        .filter_map(|field| waiver.get(*field).map(|value| (field.to_string(), value.clone())))
        .collect();
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_keeps_only_summary_fields() {
        let waiver = &waivers()[0];
        let summary = summary(waiver);
        let object = summary.as_object().unwrap();
        assert_eq!(object.len(), SUMMARY_FIELDS.len());
        assert_eq!(summary["waiverId"], "6jebdfxzvrdkd");
        assert!(summary.get("participants").is_none());
        assert!(summary.get("pdf").is_none());
    }

    #[test]
    fn waivers_reference_known_templates() {
        let template_ids: Vec<Value> = templates().iter().map(|t| t["templateId"].clone()).collect();
        for waiver in waivers() {
            assert!(template_ids.contains(&waiver["templateId"]));
        }
    }
}
