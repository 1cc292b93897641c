//! Out-of-the-box job specification entries.
//!
//! These entries seed a fresh installation: a few common characteristics
//! plus the fields that map onto schema.org `JobPosting` properties. Keys
//! are stable identifiers so jobs keep their meta values across renames.

use serde_json::json;

use crate::general::{DEFAULT_ARCHIVE_SLUG, DEFAULT_POST_SLUG};
use crate::job_specification::{SALARY_CURRENCIES, SALARY_UNITS, SETTINGS_KEY};

/// The default settings tree, used when nothing has been configured yet.
pub fn default_settings() -> serde_json::Value {
    json!({
        "general": {
            "archive_slug": DEFAULT_ARCHIVE_SLUG,
            "post_slug": DEFAULT_POST_SLUG,
        },
        SETTINGS_KEY: default_entries(),
    })
}

/// The default job specification entries.
pub fn default_entries() -> serde_json::Value {
    json!({
        "d:00000000000000001": {
            "allowed_choices": "3",
            "help": "",
            "key": "d:00000000000000001",
            "name": "Employment type",
            "possible_values": [
                "Full time",
                "Part time",
                "Contract",
                "Temporary",
                "Seasonal",
                "Internship",
            ],
            "type": "array_of_strings",
        },
        "d:00000000000000002": {
            "allowed_choices": "3",
            "help": "",
            "key": "d:00000000000000002",
            "name": "Workplace",
            "possible_values": ["Remote", "Hybrid", "On-site"],
            "type": "array_of_strings",
        },
        "d:00000000000000003": {
            "default_value": true,
            "help": "",
            "key": "d:00000000000000003",
            "name": "Paid time off",
            "type": "boolean",
        },
        "d:00000000000000004": {
            "default_value": false,
            "help": "",
            "key": "d:00000000000000004",
            "name": "Relocation bonus",
            "type": "boolean",
        },
        "d:00000000000000010": {
            "currencies": SALARY_CURRENCIES.as_slice(),
            "default_max": 10_000,
            "default_min": 5_000,
            "default_value": "",
            "help": "The base salary of the job or of an employee.",
            "key": "d:00000000000000010",
            "name": "Base salary",
            "type": "salary",
            "units": SALARY_UNITS,
        },
        "d:00000000000000011": {
            "default_value": "",
            "help": "Educational background needed for the position.",
            "key": "d:00000000000000011",
            "name": "Education requirements",
            "type": "text",
        },
        "d:00000000000000012": {
            "default_value": "",
            "help": "The legal requirements such as citizenship, visa and other documentation required for an applicant to this job.",
            "key": "d:00000000000000012",
            "name": "Eligibility to work requirement",
            "type": "text",
        },
        "d:00000000000000013": {
            "default_value": "",
            "help": "A description of the employer, career opportunities and work environment for this position.",
            "key": "d:00000000000000013",
            "name": "Employer overview",
            "type": "text",
        },
        "d:00000000000000014": {
            "default_value": true,
            "help": "",
            "key": "d:00000000000000014",
            "name": "Experience in place of education",
            "type": "boolean",
        },
        "d:00000000000000015": {
            "default_value": "",
            "help": "Description of skills and experience needed for the position.",
            "key": "d:00000000000000015",
            "name": "Experience requirements",
            "type": "text",
        },
        "d:00000000000000016": {
            "default_value": "",
            "help": "Description of bonus and commission compensation aspects of the job.",
            "key": "d:00000000000000016",
            "name": "Incentive compensation",
            "type": "text",
        },
        "d:00000000000000017": {
            "default_value": "",
            "help": "The industry associated with the job position.",
            "key": "d:00000000000000017",
            "name": "Industry",
            "type": "text",
        },
        "d:00000000000000018": {
            "default_value": "",
            "help": "Description of benefits associated with the job.",
            "key": "d:00000000000000018",
            "name": "Job benefits",
            "type": "text",
        },
        "d:00000000000000019": {
            "default_value": true,
            "help": "An indicator as to whether a position is available for an immediate start.",
            "key": "d:00000000000000019",
            "name": "Immediate start",
            "type": "boolean",
        },
        "d:00000000000000020": {
            "allow_empty": true,
            "default_value": "",
            "help": "The date on which a successful applicant for this job would be expected to start work. Choose a specific date in the future or use the \"Immediate start\" property to indicate the position is to be filled as soon as possible.",
            "key": "d:00000000000000020",
            "name": "Start date",
            "type": "date",
        },
        "d:00000000000000021": {
            "default_value": "",
            "help": "A category describing the job, preferably using a term from a taxonomy such as BLS O*NET-SOC, ISCO-08 or similar.",
            "key": "d:00000000000000021",
            "name": "Occupational category",
            "type": "text",
        },
        "d:00000000000000022": {
            "default_value": "",
            "help": "A description of the types of physical activity associated with the job.",
            "key": "d:00000000000000022",
            "name": "Physical requirement",
            "type": "text",
        },
        "d:00000000000000023": {
            "default_value": "",
            "help": "Specific qualifications required for this role.",
            "key": "d:00000000000000023",
            "name": "Qualifications",
            "type": "text",
        },
        "d:00000000000000024": {
            "default_value": "",
            "help": "Responsibilities associated with this role.",
            "key": "d:00000000000000024",
            "name": "Responsibilities",
            "type": "text",
        },
        "d:00000000000000025": {
            "default_value": "",
            "help": "A description of any security clearance requirements of the job.",
            "key": "d:00000000000000025",
            "name": "Security clearance requirement",
            "type": "text",
        },
        "d:00000000000000026": {
            "default_value": "",
            "help": "A description of any sensory requirements and levels necessary to function on the job, including hearing and vision.",
            "key": "d:00000000000000026",
            "name": "Sensory requirement",
            "type": "text",
        },
        "d:00000000000000027": {
            "default_value": "",
            "help": "A statement of knowledge, skill, ability, task or any other assertion expressing a competency that is desired or required to fulfill this role.",
            "key": "d:00000000000000027",
            "name": "Skills",
            "type": "text",
        },
        "d:00000000000000028": {
            "default_value": "",
            "help": "Any special commitments associated with this job posting. Valid entries include VeteranCommit, MilitarySpouseCommit, etc.",
            "key": "d:00000000000000028",
            "name": "Special commitments",
            "type": "text",
        },
        "d:00000000000000029": {
            "default_value": 1,
            "help": "The number of positions open for this job posting.",
            "key": "d:00000000000000029",
            "max": 10_000,
            "min": 1,
            "name": "Total job openings",
            "type": "integer",
            "use_max": false,
        },
        "d:00000000000000030": {
            "allow_empty": true,
            "default_value": "",
            "help": "Date after which the job advertisement becomes invalid.",
            "key": "d:00000000000000030",
            "name": "Valid through",
            "type": "date",
        },
        "d:00000000000000031": {
            "default_value": "",
            "help": "The typical working hours for this job (e.g. 1st shift, night shift, 8am-5pm).",
            "key": "d:00000000000000031",
            "name": "Work hours",
            "type": "text",
        },
    })
}
