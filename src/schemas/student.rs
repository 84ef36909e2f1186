use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::Student;

// school_id/session_id never appear here: they are derived from the class.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[serde(alias = "admissionNo")]
    #[validate(length(min = 1, message = "Admission number is required"))]
    pub(crate) admission_no: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub(crate) dob: String,
    #[serde(alias = "fatherName")]
    #[validate(length(min = 1, message = "Father name is required"))]
    pub(crate) father_name: String,
    #[serde(alias = "motherName")]
    #[validate(length(min = 1, message = "Mother name is required"))]
    pub(crate) mother_name: String,
    #[validate(length(min = 1, message = "Mobile is required"))]
    pub(crate) mobile: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub(crate) address: String,
    #[serde(default)]
    pub(crate) aadhaar: Option<String>,
    #[serde(default)]
    #[serde(alias = "photoUrl")]
    pub(crate) photo_url: Option<String>,
    #[serde(alias = "classId")]
    #[validate(length(min = 1, message = "Class ID is required"))]
    pub(crate) class_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentUpdate {
    #[serde(default)]
    #[serde(alias = "admissionNo")]
    pub(crate) admission_no: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) dob: Option<String>,
    #[serde(default)]
    #[serde(alias = "fatherName")]
    pub(crate) father_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "motherName")]
    pub(crate) mother_name: Option<String>,
    #[serde(default)]
    pub(crate) mobile: Option<String>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) aadhaar: Option<String>,
    #[serde(default)]
    #[serde(alias = "photoUrl")]
    pub(crate) photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) admission_no: String,
    pub(crate) name: String,
    pub(crate) dob: String,
    pub(crate) father_name: String,
    pub(crate) mother_name: String,
    pub(crate) mobile: String,
    pub(crate) address: String,
    pub(crate) aadhaar: Option<String>,
    pub(crate) photo_url: Option<String>,
    pub(crate) class_id: String,
    pub(crate) session_id: String,
    pub(crate) school_id: String,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            admission_no: student.admission_no,
            name: student.name,
            dob: format_date(student.dob),
            father_name: student.father_name,
            mother_name: student.mother_name,
            mobile: student.mobile,
            address: student.address,
            aadhaar: student.aadhaar,
            photo_url: student.photo_url,
            class_id: student.class_id,
            session_id: student.session_id,
            school_id: student.school_id,
            created_at: format_primitive(student.created_at),
        }
    }
}
