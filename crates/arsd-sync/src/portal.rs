//! Fixed strings tied to the live portal. They must match its routing and
//! markup byte-for-byte.

/// Page paths relative to the portal root.
pub mod paths {
    pub const LOGIN: &str = "Login.aspx";
    pub const BASIC_DETAILS: &str = "STD_Basic_Details.aspx";
    pub const MENTOR: &str = "STD_Mentor_Details.aspx";
    pub const ATTENDANCE: &str = "Attendance_Report_Monthly.aspx";
    pub const FACULTY: &str = "Check_Student_Faculty_Details.aspx";
}

/// URL and body markers used by the classifier.
pub mod markers {
    /// Compared against the lower-cased URL.
    pub const LOGIN: &str = "login";
    pub const BASIC_DETAILS: &str = super::paths::BASIC_DETAILS;
    pub const MENTOR: &str = super::paths::MENTOR;
    pub const ATTENDANCE: &str = super::paths::ATTENDANCE;
    pub const FACULTY: &str = super::paths::FACULTY;
    pub const HOME: &str = "Home.aspx";
    /// Searched for in the rendered body text.
    pub const WELCOME: &str = "Welcome";
}

/// Element IDs.
pub mod ids {
    pub const ROLL_NO_INPUT: &str = "txtrollno";
    pub const NAME_INPUT: &str = "txtname";
    pub const SUBMIT: &str = "btnsearch";

    pub const NAME: &str = "lblname";
    pub const ROLL_NO: &str = "lblrollno";
    pub const ENROLLMENT_NO: &str = "lbleno";
    pub const FATHER_NAME: &str = "lblfname";
    pub const COURSE_CODE: &str = "lblcoursecode";
    pub const COURSE_NAME: &str = "lblcoursename";
    pub const PART: &str = "lblpart";
    pub const SEMESTER: &str = "lblsem";
    pub const MOBILE: &str = "lblmobileno";
    pub const EMAIL: &str = "lblemail";
    pub const ADDRESS: &str = "lbladdress_local";

    pub const MENTOR_NAME: &str = "lblmentorname";

    pub const RECORD_TYPE: &str = "ddlpapertype";
    pub const RESULTS_TABLE: &str = "gvshow";
    pub const PERCENTAGE: &str = "lbl_percentage";
}

/// Fallback when the submit button has no ID.
pub const SUBMIT_FALLBACK_SELECTOR: &str = r#"input[type="submit"]"#;

/// Record-type filter option values. The quotes are part of the value.
pub const THEORY_OPTION: &str = "'TE'";
pub const PRACTICAL_OPTION: &str = "'PR'";

/// Lower-cased header fragments that mark the subject column.
pub const SUBJECT_HEADERS: &[&str] = &["subject", "paper name", "paper_name"];

/// Subject used when a row names none.
pub const GENERAL_SUBJECT: &str = "General";
