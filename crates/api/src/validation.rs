//! Field-by-field validation of progress status requests.
//!
//! Every field is checked in one pass and all violations are reported
//! together. Only a request that passes every check, including the window
//! size guard, becomes a [`ProgressRequest`].

use chrono::{DateTime, FixedOffset};
use coursepace_core::{ProgressRequest, RequestError, MAX_PROGRESS_PERCENT, MIN_COURSE_DURATION};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Raw request fields, keyed by name.
pub type RequestFields = Map<String, Value>;

/// Course content duration in seconds.
pub const COURSE_DURATION: &str = "course_duration";
/// Learner progress percentage.
pub const PROGRESS_PERCENT: &str = "progress_percent";
/// Assignment timestamp.
pub const ASSIGNMENT_DATE: &str = "assignment_date";
/// Due timestamp.
pub const DUE_DATE: &str = "due_date";

/// Canonical form quoted back to callers. Parsing accepts any RFC 3339
/// timestamp: `Z` or numeric offsets, fractional seconds, and a space or
/// lowercase `t` as the date/time separator. A date without time or offset is
/// rejected.
const DATE_FORMAT_HINT: &str = "Y-m-d\\TH:i:sP.Ex.: 2020-01-30T00:00:01+00:00";

/// Validation messages grouped by field, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field.to_string(), vec![message])),
        }
    }

    /// Whether a field has any message.
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Fields with messages, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields with messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field has a message.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Validate raw fields and build the evaluation request.
pub fn validate_fields(fields: &RequestFields) -> Result<ProgressRequest, FieldErrors> {
    let mut errors = FieldErrors::new();

    let course_duration = integer_field(
        fields,
        COURSE_DURATION,
        i128::from(MIN_COURSE_DURATION),
        None,
        &mut errors,
    );
    let progress_percent = integer_field(
        fields,
        PROGRESS_PERCENT,
        0,
        Some(i128::from(MAX_PROGRESS_PERCENT)),
        &mut errors,
    );
    let assignment = date_field(fields, ASSIGNMENT_DATE, &mut errors);
    let due = date_field(fields, DUE_DATE, &mut errors);

    if let (Some(assignment), Some(due)) = (assignment, due) {
        if due <= assignment {
            errors.add(
                DUE_DATE,
                format!(
                    "The {} must be a date after {}.",
                    words(DUE_DATE),
                    words(ASSIGNMENT_DATE)
                ),
            );
        }
    }

    let (Some(course_duration), Some(progress_percent), Some(assignment), Some(due)) =
        (course_duration, progress_percent, assignment, due)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    // Both values were range-checked above.
    let course_duration = u64::try_from(course_duration).unwrap_or(u64::MAX);
    let progress_percent = u8::try_from(progress_percent).unwrap_or(MAX_PROGRESS_PERCENT);

    ProgressRequest::new(course_duration, progress_percent, assignment, due)
        .map_err(|err| contract_violation(&err))
}

/// Map a contract violation onto the field that caused it.
fn contract_violation(err: &RequestError) -> FieldErrors {
    match err {
        RequestError::DurationTooShort(_) => FieldErrors::single(
            COURSE_DURATION,
            format!("The {} must be at least {}.", words(COURSE_DURATION), MIN_COURSE_DURATION),
        ),
        RequestError::ProgressOutOfRange(_) => FieldErrors::single(
            PROGRESS_PERCENT,
            format!(
                "The {} must not be greater than {}.",
                words(PROGRESS_PERCENT),
                MAX_PROGRESS_PERCENT
            ),
        ),
        RequestError::DueNotAfterAssignment { .. } => FieldErrors::single(
            DUE_DATE,
            format!(
                "The {} must be a date after {}.",
                words(DUE_DATE),
                words(ASSIGNMENT_DATE)
            ),
        ),
        RequestError::WindowTooSmall { .. } => FieldErrors::single(
            DUE_DATE,
            "The due date is too close to the assignment date!",
        ),
    }
}

/// Field name as it reads in a message.
fn words(field: &str) -> String {
    field.replace('_', " ")
}

/// Look up a field, treating `null` and blank strings as absent.
fn present<'a>(fields: &'a RequestFields, name: &str) -> Option<&'a Value> {
    match fields.get(name)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        value => Some(value),
    }
}

fn integer_field(
    fields: &RequestFields,
    name: &str,
    min: i128,
    max: Option<i128>,
    errors: &mut FieldErrors,
) -> Option<i128> {
    let Some(value) = present(fields, name) else {
        errors.add(name, format!("The {} field is required.", words(name)));
        return None;
    };

    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    let Some(number) = parsed else {
        errors.add(name, format!("The {} must be an integer.", words(name)));
        return None;
    };

    if number < min {
        errors.add(name, format!("The {} must be at least {}.", words(name), min));
        return None;
    }
    if let Some(max) = max {
        if number > max {
            errors.add(
                name,
                format!("The {} must not be greater than {}.", words(name), max),
            );
            return None;
        }
    }

    Some(number)
}

fn date_field(
    fields: &RequestFields,
    name: &str,
    errors: &mut FieldErrors,
) -> Option<DateTime<FixedOffset>> {
    let Some(value) = present(fields, name) else {
        errors.add(name, format!("The {} field is required.", words(name)));
        return None;
    };

    let parsed = value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok());
    if parsed.is_none() {
        errors.add(
            name,
            format!("The {} does not match the format {}", words(name), DATE_FORMAT_HINT),
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> RequestFields {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fields must be an object"),
        }
    }

    fn valid() -> RequestFields {
        fields(json!({
            "course_duration": 30000,
            "progress_percent": 49,
            "assignment_date": "2023-11-04T22:13:20+00:00",
            "due_date": "2023-11-24T22:13:25+00:00",
        }))
    }

    #[test]
    fn test_valid_fields_build_request() {
        let request = validate_fields(&valid()).unwrap();
        assert_eq!(request.course_duration(), 30_000);
        assert_eq!(request.progress_percent(), 49);
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let errors = validate_fields(&RequestFields::new()).unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "course_duration": ["The course duration field is required."],
                "progress_percent": ["The progress percent field is required."],
                "assignment_date": ["The assignment date field is required."],
                "due_date": ["The due date field is required."],
            })
        );
        let order: Vec<_> = errors.fields().collect();
        assert_eq!(
            order,
            vec!["course_duration", "progress_percent", "assignment_date", "due_date"]
        );
    }

    #[test]
    fn test_null_and_blank_count_as_missing() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), Value::Null);
        input.insert(DUE_DATE.into(), json!("  "));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(COURSE_DURATION).unwrap(),
            ["The course duration field is required."]
        );
        assert_eq!(errors.get(DUE_DATE).unwrap(), ["The due date field is required."]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_fractional_duration_is_not_integer() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), json!(15.5));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(COURSE_DURATION).unwrap(),
            ["The course duration must be an integer."]
        );
    }

    #[test]
    fn test_integer_strings_accepted() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), json!("30000"));
        input.insert(PROGRESS_PERCENT.into(), json!(" 49 "));

        let request = validate_fields(&input).unwrap();
        assert_eq!(request.course_duration(), 30_000);
        assert_eq!(request.progress_percent(), 49);
    }

    #[test]
    fn test_non_numeric_types_rejected() {
        let mut input = valid();
        input.insert(PROGRESS_PERCENT.into(), json!(true));
        input.insert(COURSE_DURATION.into(), json!([10]));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(PROGRESS_PERCENT).unwrap(),
            ["The progress percent must be an integer."]
        );
        assert_eq!(
            errors.get(COURSE_DURATION).unwrap(),
            ["The course duration must be an integer."]
        );
    }

    #[test]
    fn test_duration_below_minimum() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), json!(9));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(COURSE_DURATION).unwrap(),
            ["The course duration must be at least 10."]
        );
    }

    #[test]
    fn test_progress_out_of_range() {
        let mut input = valid();
        input.insert(PROGRESS_PERCENT.into(), json!(-1));
        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(PROGRESS_PERCENT).unwrap(),
            ["The progress percent must be at least 0."]
        );

        input.insert(PROGRESS_PERCENT.into(), json!(101));
        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(PROGRESS_PERCENT).unwrap(),
            ["The progress percent must not be greater than 100."]
        );
    }

    #[test]
    fn test_truncated_timestamp_rejected() {
        let mut input = valid();
        input.insert(ASSIGNMENT_DATE.into(), json!("2023-11-04T22:13:20+00:0"));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(ASSIGNMENT_DATE).unwrap(),
            ["The assignment date does not match the format Y-m-d\\TH:i:sP.Ex.: 2020-01-30T00:00:01+00:00"]
        );
        assert!(!errors.contains(DUE_DATE));
    }

    #[test]
    fn test_non_string_timestamp_rejected() {
        let mut input = valid();
        input.insert(DUE_DATE.into(), json!(1_700_000_000));

        let errors = validate_fields(&input).unwrap_err();
        assert!(errors.get(DUE_DATE).unwrap()[0].starts_with("The due date does not match"));
    }

    #[test]
    fn test_due_before_assignment_reported_with_other_errors() {
        let input = fields(json!({
            "assignment_date": "2023-11-14T22:13:20+00:00",
            "due_date": "2023-11-13T22:13:20+00:00",
        }));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "course_duration": ["The course duration field is required."],
                "progress_percent": ["The progress percent field is required."],
                "due_date": ["The due date must be a date after assignment date."],
            })
        );
    }

    #[test]
    fn test_due_equal_to_assignment_rejected() {
        let mut input = valid();
        input.insert(DUE_DATE.into(), json!("2023-11-04T22:13:20+00:00"));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(DUE_DATE).unwrap(),
            ["The due date must be a date after assignment date."]
        );
    }

    #[test]
    fn test_ordering_compares_instants_across_offsets() {
        let mut input = valid();
        // 23:00+02:00 is 21:00 UTC, before the 22:13 UTC assignment.
        input.insert(DUE_DATE.into(), json!("2023-11-04T23:00:00+02:00"));

        let errors = validate_fields(&input).unwrap_err();
        assert!(errors.contains(DUE_DATE));
    }

    #[test]
    fn test_window_too_small_for_duration() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), json!(3600));
        input.insert(ASSIGNMENT_DATE.into(), json!("2023-11-04T10:00:00+00:00"));
        input.insert(DUE_DATE.into(), json!("2023-11-04T11:00:00+00:00"));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "due_date": ["The due date is too close to the assignment date!"] })
        );
    }

    #[test]
    fn test_window_guard_waits_for_schema_errors() {
        let mut input = valid();
        input.insert(COURSE_DURATION.into(), json!(3600));
        input.insert(PROGRESS_PERCENT.into(), json!(500));
        input.insert(ASSIGNMENT_DATE.into(), json!("2023-11-04T10:00:00+00:00"));
        input.insert(DUE_DATE.into(), json!("2023-11-04T11:00:00+00:00"));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![PROGRESS_PERCENT]);
    }

    #[test]
    fn test_zulu_and_fractional_timestamps_accepted() {
        let mut input = valid();
        input.insert(ASSIGNMENT_DATE.into(), json!("2023-11-04T22:13:20Z"));
        input.insert(DUE_DATE.into(), json!("2023-11-24T22:13:25.250+00:00"));

        assert!(validate_fields(&input).is_ok());
    }

    #[test]
    fn test_space_separated_timestamps_accepted() {
        let mut input = valid();
        input.insert(ASSIGNMENT_DATE.into(), json!("2023-11-04 22:13:20+00:00"));
        input.insert(DUE_DATE.into(), json!("2023-11-24t22:13:20Z"));

        let request = validate_fields(&input).unwrap();
        assert_eq!(request.due_time() - request.assignment_time(), chrono::Duration::days(20));
    }

    #[test]
    fn test_timestamp_without_offset_rejected() {
        let mut input = valid();
        input.insert(DUE_DATE.into(), json!("2023-11-24T22:13:20"));

        let errors = validate_fields(&input).unwrap_err();
        assert_eq!(
            errors.get(DUE_DATE).unwrap(),
            ["The due date does not match the format Y-m-d\\TH:i:sP.Ex.: 2020-01-30T00:00:01+00:00"]
        );
    }

    #[test]
    fn test_field_errors_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add(DUE_DATE, "first");
        errors.add(COURSE_DURATION, "other");
        errors.add(DUE_DATE, "second");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(DUE_DATE).unwrap(), ["first", "second"]);
    }
}
