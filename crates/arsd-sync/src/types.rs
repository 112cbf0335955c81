//! Core data types: credentials, extracted records, and the error taxonomy.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Login credentials for one run. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "rollNo")]
    pub roll_number: String,
    #[serde(rename = "name")]
    pub full_name: String,
    /// `DD-MM-YYYY`; day and month may be a single digit.
    #[serde(rename = "dob")]
    pub date_of_birth: String,
}

fn dob_pattern() -> &'static Regex {
    static DOB: OnceLock<Regex> = OnceLock::new();
    DOB.get_or_init(|| Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").expect("dob regex is valid"))
}

impl Credentials {
    /// Build validated credentials. Roll number and name are kept verbatim.
    pub fn new(
        roll_number: impl Into<String>,
        full_name: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> SyncResult<Self> {
        let creds = Self {
            roll_number: roll_number.into(),
            full_name: full_name.into(),
            date_of_birth: date_of_birth.into(),
        };
        creds.validate()?;
        Ok(creds)
    }

    /// Check the fields the login form needs.
    pub fn validate(&self) -> SyncResult<()> {
        if self.roll_number.trim().is_empty() {
            return Err(SyncError::InvalidCredentials("roll number is empty".into()));
        }
        if self.full_name.trim().is_empty() {
            return Err(SyncError::InvalidCredentials("name is empty".into()));
        }
        if !dob_pattern().is_match(&self.date_of_birth) {
            return Err(SyncError::InvalidCredentials(
                "date of birth must be DD-MM-YYYY (e.g. 15-08-2004)".into(),
            ));
        }
        Ok(())
    }

    /// Day, month, and year components of the date of birth.
    ///
    /// Components the string does not contain come back empty, which never
    /// matches a select option.
    pub fn dob_parts(&self) -> [&str; 3] {
        let mut parts = self.date_of_birth.split('-');
        [
            parts.next().unwrap_or(""),
            parts.next().unwrap_or(""),
            parts.next().unwrap_or(""),
        ]
    }
}

/// One table row: header → cell text, in header order.
///
/// The portal's column set varies between page generations, so headers are
/// read from the table itself rather than fixed in a struct. Serializes as a
/// JSON object whose key order follows the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap(Vec<(String, String)>);

impl RowMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a cell; a repeated header overwrites the earlier value in place.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.0.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.0.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowMap::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (h, v) in &self.0 {
            map.serialize_entry(h, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RowMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RowMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column header to cell text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RowMap, A::Error> {
                let mut row = RowMap::new();
                while let Some((h, v)) = access.next_entry::<String, String>()? {
                    row.insert(h, v);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Attendance rows grouped by subject name.
pub type SubjectTable = BTreeMap<String, Vec<RowMap>>;

/// Faculty assignments in table order.
pub type FacultyList = Vec<RowMap>;

/// Student profile from the basic-details page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub roll_no: String,
    pub enrollment_number: String,
    pub father_name: String,
    pub course: String,
    pub year: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorRecord {
    pub mentor: String,
}

/// Theory and practical attendance merged from the two filter passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub theory_percent: String,
    pub practical_percent: String,
    pub theory_rows: SubjectTable,
    pub practical_rows: SubjectTable,
}

/// A record produced by one page handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedRecord {
    Profile(Profile),
    Mentor(MentorRecord),
    Attendance(AttendanceReport),
    Faculty(FacultyList),
}

/// Failures a run can end with. `Display` is the text shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The login page came back after a submission.
    #[error("Wrong credentials or Server Error")]
    CredentialsRejected,

    #[error("{0}")]
    PortalUnavailable(String),

    #[error("Timed out waiting for {page} details.")]
    ExtractionTimeout { page: String },

    #[error("Could not find the dropdown to select record type.")]
    FilterControlMissing,

    #[error("Network Error: {0}")]
    Transport(String),

    /// The detail is kept for logs; users only see the generic text.
    #[error("Data parsing failed.")]
    ProtocolParse(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Sync timed out. Please try again.")]
    HostTimeout,
}

impl SyncError {
    pub fn login_not_loading() -> Self {
        Self::PortalUnavailable("Connection timed out. Login page not loading.".into())
    }

    pub fn server_not_responding() -> Self {
        Self::PortalUnavailable("Server not responding. Please try again.".into())
    }

    pub fn extraction_timeout(page: &str) -> Self {
        Self::ExtractionTimeout {
            page: page.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::ProtocolParse(e.to_string())
    }
}

/// Convenience result type.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("21/1234", "Asha Verma", "15-08-2004").is_ok());
        assert!(Credentials::new("21/1234", "Asha Verma", "5-8-2004").is_ok());
        assert!(matches!(
            Credentials::new("", "Asha Verma", "15-08-2004"),
            Err(SyncError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("21/1234", "  ", "15-08-2004"),
            Err(SyncError::InvalidCredentials(_))
        ));
        assert!(Credentials::new("21/1234", "Asha Verma", "2004-08-15").is_err());
        assert!(Credentials::new("21/1234", "Asha Verma", "15/08/2004").is_err());
    }

    #[test]
    fn test_dob_parts() {
        let creds = Credentials::new("1", "A", "05-11-2003").unwrap();
        assert_eq!(creds.dob_parts(), ["05", "11", "2003"]);
    }

    #[test]
    fn test_credentials_wire_names() {
        let creds = Credentials::new("21/1234", "Asha Verma", "15-08-2004").unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["rollNo"], "21/1234");
        assert_eq!(json["name"], "Asha Verma");
        assert_eq!(json["dob"], "15-08-2004");
    }

    #[test]
    fn test_row_map_keeps_header_order() {
        let row: RowMap = [("Month", "Jan"), ("Subject", "Maths"), ("Held", "20")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Month":"Jan","Subject":"Maths","Held":"20"}"#);

        let parsed: RowMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.headers().collect::<Vec<_>>(), ["Month", "Subject", "Held"]);
    }

    #[test]
    fn test_row_map_duplicate_header_overwrites() {
        let mut row = RowMap::new();
        row.insert("A", "1");
        row.insert("B", "2");
        row.insert("A", "3");
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("A"), Some("3"));
        assert_eq!(row.headers().next(), Some("A"));
    }

    #[test]
    fn test_profile_camel_case() {
        let profile = Profile {
            roll_no: "21/1234".into(),
            enrollment_number: "E1".into(),
            father_name: "R. Verma".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["rollNo"], "21/1234");
        assert_eq!(json["enrollmentNumber"], "E1");
        assert_eq!(json["fatherName"], "R. Verma");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SyncError::CredentialsRejected.to_string(),
            "Wrong credentials or Server Error"
        );
        assert_eq!(
            SyncError::server_not_responding().to_string(),
            "Server not responding. Please try again."
        );
        assert_eq!(
            SyncError::extraction_timeout("profile").to_string(),
            "Timed out waiting for profile details."
        );
        assert_eq!(
            SyncError::ProtocolParse("eof".into()).to_string(),
            "Data parsing failed."
        );
    }
}
