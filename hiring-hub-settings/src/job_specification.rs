//! The "job_specification" dynamic fields group.
//!
//! Site administrators define their own job specification fields against a
//! fixed set of templates. Each template describes the configuration one
//! entry carries (name, help text, type-specific parameters) and the
//! policies applied to per-job values of fields built from it.

use hiring_hub_fields::{
    policies, FieldConfig, FieldContext, FieldError, FieldTemplate, FieldValue, GroupConfig,
    TemplateRegistry, ValueType,
};

/// Settings key of the job specification group
pub const SETTINGS_KEY: &str = "job_specification";

/// Salary units
pub const SALARY_UNITS: [&str; 6] = ["hour", "day", "week", "month", "quarter", "year"];

/// Salary currencies, in ISO 4217 currency format
///
/// See <https://en.wikipedia.org/wiki/ISO_4217>
pub const SALARY_CURRENCIES: [&str; 179] = [
    "USD", "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD",
    "BDT", "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN",
    "BZD", "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW",
    "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD",
    "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SOS",
    "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD",
    "TWD", "TZS", "UAH", "UGX", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES", "VND", "VUV",
    "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF", "XPD", "XPF",
    "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWG", "ZWL",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// The template registry of the job specification group.
pub fn templates() -> TemplateRegistry {
    TemplateRegistry::new()
        .register(
            "array_of_strings",
            FieldTemplate::new(
                ValueType::StringArray,
                GroupConfig::new()
                    .field(
                        "allowed_choices",
                        FieldConfig::string_of_choice(
                            "unlimited",
                            strings(&[
                                "unlimited", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
                            ]),
                        ),
                    )
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("possible_values", FieldConfig::array_of_strings(Vec::new()))
                    .field("type", FieldConfig::exact_string("array_of_strings")),
            )
            .with_validator(validate_array_of_strings)
            .with_restorer(restore_array_of_strings),
        )
        .register(
            "boolean",
            FieldTemplate::new(
                ValueType::Boolean,
                GroupConfig::new()
                    .field("default_value", FieldConfig::boolean(false))
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("boolean")),
            ),
        )
        .register(
            "date",
            FieldTemplate::new(
                ValueType::String,
                GroupConfig::new()
                    .field("allow_empty", FieldConfig::boolean(true))
                    .field(
                        "default_value",
                        FieldConfig::string("")
                            .with_validator(policies::date_validator())
                            .with_restorer(policies::date_restorer()),
                    )
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("date")),
            )
            .with_validator(policies::date_validator())
            .with_restorer(policies::date_restorer()),
        )
        .register(
            "integer",
            FieldTemplate::new(
                ValueType::Integer,
                GroupConfig::new()
                    .field("default_value", FieldConfig::integer(1, 0))
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("max", FieldConfig::integer(10_000, 0))
                    .field("min", FieldConfig::integer(0, 0))
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("integer"))
                    .field("use_max", FieldConfig::boolean(false)),
            ),
        )
        .register(
            "salary",
            FieldTemplate::new(
                ValueType::String,
                GroupConfig::new()
                    .field(
                        "currencies",
                        FieldConfig::array_of_strings(strings(&SALARY_CURRENCIES))
                            .with_sanitizer(policies::alphanumeric_strings_sanitizer()),
                    )
                    .field("default_max", FieldConfig::integer(10_000, 0))
                    .field("default_min", FieldConfig::integer(5_000, 0))
                    .field("default_value", FieldConfig::string(""))
                    .field(
                        "help",
                        FieldConfig::string("The salary of the job or of an employee."),
                    )
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("salary"))
                    .field(
                        "units",
                        FieldConfig::array_of_strings(strings(&SALARY_UNITS))
                            .with_sanitizer(policies::alphanumeric_strings_sanitizer()),
                    ),
            )
            .with_validator(validate_salary)
            .with_restorer(|_raw, _context| FieldValue::String(String::new())),
        )
        .register(
            "text",
            FieldTemplate::new(
                ValueType::String,
                GroupConfig::new()
                    .field("default_value", FieldConfig::string(""))
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("text")),
            ),
        )
        .register(
            "url",
            FieldTemplate::new(
                ValueType::String,
                GroupConfig::new()
                    .field(
                        "default_value",
                        FieldConfig::string("")
                            .with_sanitizer(policies::url_sanitizer())
                            .with_validator(policies::url_validator()),
                    )
                    .field("help", FieldConfig::string(""))
                    .field("key", FieldConfig::dynamic_key())
                    .field("name", FieldConfig::string("New field"))
                    .field("type", FieldConfig::exact_string("url")),
            )
            .with_sanitizer(policies::url_sanitizer())
            .with_validator(policies::url_validator()),
        )
}

/// Validator for fields built from the "array_of_strings" template.
///
/// Every value must be a member of the entry's `possible_values`, and the
/// selection count must respect its `allowed_choices` cap. The whole value
/// is rejected on violation; the restorer is the lenient path.
fn validate_array_of_strings(
    values: &FieldValue,
    context: &FieldContext,
) -> Result<(), FieldError> {
    let Some(values) = values.as_strings() else {
        return Err(FieldError::TypeMismatch {
            expected: "array",
            actual: values.value_type().as_str().to_string(),
        });
    };

    let possible_values = context.strings_value("possible_values").unwrap_or(&[]);
    for value in values {
        if !possible_values.contains(value) {
            return Err(FieldError::NotInChoices {
                value: value.clone(),
                choices: possible_values.to_vec(),
            });
        }
    }

    if let Some(allowed) = selection_cap(context) {
        if values.len() > allowed {
            return Err(FieldError::TooManySelections {
                allowed,
                given: values.len(),
            });
        }
    }

    Ok(())
}

/// Restorer for fields built from the "array_of_strings" template: keeps
/// the values that are members of `possible_values` and truncates the rest
/// down to the `allowed_choices` cap.
fn restore_array_of_strings(raw: &serde_json::Value, context: &FieldContext) -> FieldValue {
    let possible_values = context.strings_value("possible_values").unwrap_or(&[]);

    let mut values: Vec<String> = match raw.as_array() {
        Some(items) => items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(|value| value.trim().to_string())
            .filter(|value| possible_values.contains(value))
            .collect(),
        None => Vec::new(),
    };

    if let Some(allowed) = selection_cap(context) {
        values.truncate(allowed);
    }

    FieldValue::StringArray(values)
}

fn selection_cap(context: &FieldContext) -> Option<usize> {
    let allowed = context.str_value("allowed_choices").unwrap_or("unlimited");
    if allowed == "unlimited" {
        None
    } else {
        allowed.parse().ok()
    }
}

/// Validator for fields built from the "salary" template.
///
/// The value is a JSON-encoded `{currency, unit, min, max}` object. Checks
/// run in a fixed order and every missing or invalid member produces its
/// own message, so the settings screen can say exactly what to fix.
fn validate_salary(value: &FieldValue, context: &FieldContext) -> Result<(), FieldError> {
    let Some(raw) = value.as_str() else {
        return Err(FieldError::TypeMismatch {
            expected: "string",
            actual: value.value_type().as_str().to_string(),
        });
    };

    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Err(FieldError::NotJson);
    };
    let empty = serde_json::Map::new();
    let salary = parsed.as_object().unwrap_or(&empty);

    let currencies = context.strings_value("currencies").unwrap_or(&[]);
    match salary.get("currency") {
        None => return Err(FieldError::invalid("Missing currency.")),
        Some(serde_json::Value::String(currency)) => {
            if !currencies.contains(currency) {
                return Err(FieldError::invalid(format!(
                    "\"{currency}\" currency is not within the set of supported currencies ({}).",
                    currencies.join(", "),
                )));
            }
        }
        Some(other) => {
            return Err(FieldError::invalid(format!(
                "Currency must be a string, {} given.",
                hiring_hub_fields::json_type_name(other),
            )))
        }
    }

    let units = context.strings_value("units").unwrap_or(&[]);
    match salary.get("unit") {
        None => return Err(FieldError::invalid("Missing unit.")),
        Some(serde_json::Value::String(unit)) => {
            if !units.contains(unit) {
                return Err(FieldError::invalid(format!(
                    "\"{unit}\" unit is not within the set of supported units ({}).",
                    units.join(", "),
                )));
            }
        }
        Some(other) => {
            return Err(FieldError::invalid(format!(
                "Unit must be a string, {} given.",
                hiring_hub_fields::json_type_name(other),
            )))
        }
    }

    let min = match salary.get("min") {
        None => return Err(FieldError::invalid("Missing min.")),
        Some(value) => match value.as_i64() {
            Some(min) if min >= 0 => min,
            Some(_) => {
                return Err(FieldError::invalid(
                    "Min must be greater than or equal to 0.",
                ))
            }
            None => {
                return Err(FieldError::invalid(format!(
                    "Min must be an integer, {} given.",
                    hiring_hub_fields::json_type_name(value),
                )))
            }
        },
    };

    match salary.get("max") {
        None => Err(FieldError::invalid("Missing max.")),
        Some(value) => match value.as_i64() {
            Some(max) if min <= max => Ok(()),
            Some(_) => Err(FieldError::invalid(format!(
                "Max must be greater than or equal to {min}.",
            ))),
            None => Err(FieldError::invalid(format!(
                "Max must be an integer, {} given.",
                hiring_hub_fields::json_type_name(value),
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiring_hub_fields::DynamicFieldsGroup;
    use serde_json::json;

    fn salary_context() -> FieldContext {
        FieldContext::empty()
            .with_value("currencies", FieldValue::StringArray(strings(&["USD", "EUR"])))
            .with_value("units", FieldValue::StringArray(strings(&SALARY_UNITS)))
    }

    #[test]
    fn salary_checks_run_in_order_with_distinct_messages() {
        let context = salary_context();
        let cases = [
            ("not json", "value must be a valid JSON"),
            ("{}", "Missing currency."),
            (r#"{"currency": 5}"#, "Currency must be a string, number given."),
            (
                r#"{"currency": "PLN"}"#,
                "\"PLN\" currency is not within the set of supported currencies (USD, EUR).",
            ),
            (r#"{"currency": "USD"}"#, "Missing unit."),
            (
                r#"{"currency": "USD", "unit": "decade"}"#,
                "\"decade\" unit is not within the set of supported units (hour, day, week, month, quarter, year).",
            ),
            (r#"{"currency": "USD", "unit": "month"}"#, "Missing min."),
            (
                r#"{"currency": "USD", "unit": "month", "min": "low"}"#,
                "Min must be an integer, string given.",
            ),
            (
                r#"{"currency": "USD", "unit": "month", "min": -5}"#,
                "Min must be greater than or equal to 0.",
            ),
            (
                r#"{"currency": "USD", "unit": "month", "min": 5000}"#,
                "Missing max.",
            ),
            (
                r#"{"currency": "USD", "unit": "month", "min": 5000, "max": 3000}"#,
                "Max must be greater than or equal to 5000.",
            ),
        ];

        for (raw, expected) in cases {
            let error = validate_salary(&FieldValue::String(raw.to_string()), &context)
                .expect_err(raw);
            assert_eq!(error.to_string(), expected, "input: {raw}");
        }

        assert!(validate_salary(
            &FieldValue::String(
                r#"{"currency": "USD", "unit": "month", "min": 5000, "max": 8000}"#.to_string(),
            ),
            &context,
        )
        .is_ok());
    }

    #[test]
    fn invalid_salary_restores_to_empty_string() {
        let mut group = DynamicFieldsGroup::new(SETTINGS_KEY, templates());
        group.set_values(
            &json!({
                "base_salary": {
                    "key": "base_salary",
                    "name": "Base salary",
                    "type": "salary",
                    "currencies": ["USD"],
                    "units": ["month"],
                    "default_min": 5_000,
                    "default_max": 10_000,
                    "default_value": "",
                    "help": "",
                },
            }),
            true,
        );
        assert!(!group.has_validation_errors());

        let mut fields = group.dynamic_fields("job_specification_fields").unwrap();
        fields.set_values(
            &json!({"base_salary": r#"{"currency":"USD","unit":"month","min":5000,"max":3000}"#}),
            true,
        );

        let field = fields.field("base_salary").unwrap();
        assert!(field.has_validation_error());
        assert_eq!(field.value(), &FieldValue::String(String::new()));
    }

    #[test]
    fn array_of_strings_rejects_on_validate_but_truncates_on_restore() {
        let context = FieldContext::empty()
            .with_value(
                "possible_values",
                FieldValue::StringArray(strings(&["a", "b", "c"])),
            )
            .with_value("allowed_choices", FieldValue::String("2".to_string()));

        let over_limit = FieldValue::StringArray(strings(&["a", "b", "c"]));
        assert_eq!(
            validate_array_of_strings(&over_limit, &context),
            Err(FieldError::TooManySelections {
                allowed: 2,
                given: 3,
            }),
        );

        assert_eq!(
            restore_array_of_strings(&json!(["a", "b", "c"]), &context),
            FieldValue::StringArray(strings(&["a", "b"])),
        );
    }

    #[test]
    fn array_of_strings_rejects_values_outside_the_possible_set() {
        let context = FieldContext::empty()
            .with_value(
                "possible_values",
                FieldValue::StringArray(strings(&["Remote", "Hybrid"])),
            )
            .with_value("allowed_choices", FieldValue::String("unlimited".to_string()));

        let outside = FieldValue::StringArray(strings(&["Remote", "On the moon"]));
        assert!(matches!(
            validate_array_of_strings(&outside, &context),
            Err(FieldError::NotInChoices { .. }),
        ));

        assert_eq!(
            restore_array_of_strings(&json!(["Remote", "On the moon"]), &context),
            FieldValue::StringArray(strings(&["Remote"])),
        );
    }

    #[test]
    fn array_instance_applies_entry_configuration_end_to_end() {
        let mut group = DynamicFieldsGroup::new(SETTINGS_KEY, templates());
        group.set_values(
            &json!({
                "employment_type": {
                    "allowed_choices": "2",
                    "help": "",
                    "key": "employment_type",
                    "name": "Employment type",
                    "possible_values": ["Full time", "Part time", "Contract"],
                    "type": "array_of_strings",
                },
            }),
            true,
        );
        assert!(!group.has_validation_errors());

        let mut fields = group.dynamic_fields("job_specification_fields").unwrap();
        fields.set_values(
            &json!({"employment_type": ["Full time", "Part time", "Contract"]}),
            true,
        );

        let field = fields.field("employment_type").unwrap();
        assert!(field.has_validation_error());
        assert_eq!(
            field.value(),
            &FieldValue::StringArray(strings(&["Full time", "Part time"])),
        );
    }

    #[test]
    fn url_instance_sanitizes_and_validates() {
        let mut group = DynamicFieldsGroup::new(SETTINGS_KEY, templates());
        group.set_values(
            &json!({
                "apply_link": {
                    "default_value": "",
                    "help": "",
                    "key": "apply_link",
                    "name": "Apply link",
                    "type": "url",
                },
            }),
            true,
        );

        let mut fields = group.dynamic_fields("job_specification_fields").unwrap();
        fields.set_values(&json!({"apply_link": " Careers@Example.com "}), true);
        let field = fields.field("apply_link").unwrap();
        assert!(!field.has_validation_error());
        assert_eq!(
            field.value(),
            &FieldValue::String("careers@example.com".to_string()),
        );

        fields.set_values(&json!({"apply_link": "not a link"}), true);
        let field = fields.field("apply_link").unwrap();
        assert!(field.has_validation_error());
        assert_eq!(field.value(), &FieldValue::String(String::new()));
    }

    #[test]
    fn every_template_is_registered() {
        let registry = templates();
        for type_name in [
            "array_of_strings",
            "boolean",
            "date",
            "integer",
            "salary",
            "text",
            "url",
        ] {
            assert!(registry.template(type_name).is_some(), "{type_name}");
        }
        assert_eq!(registry.len(), 7);
    }
}
