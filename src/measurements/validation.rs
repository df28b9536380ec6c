//! Entry validation. Checks run in a fixed order and the first failure is
//! the one reported; no store call happens until all of them pass.

use super::models::{MeasurementDraft, ValidMeasurement};
use crate::common::errors::{BusinessError, BusinessResult};
use crate::common::identity::Actor;
use crate::validation_error;
use crate::variables::models::Variable;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

pub const INVALID_PLOT: &str = "Please select a valid plot.";
pub const MISSING_DATE: &str = "Please select a measurement date.";
pub const INVALID_VARIABLE: &str = "Please select a variable.";

lazy_static! {
    static ref CANONICAL_UUID: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .expect("Invalid UUID regex");
}

/// Hyphenated 8-4-4-4-12 hex form only. `Uuid::parse_str` alone would also
/// take the simple and braced forms.
pub fn is_canonical_uuid(raw: &str) -> bool {
    CANONICAL_UUID.is_match(raw)
}

fn canonical_uuid(raw: Option<&str>) -> Option<Uuid> {
    raw.filter(|raw| is_canonical_uuid(raw))
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

pub fn missing_value_message(variable_id: Uuid, variables: &[Variable]) -> String {
    variables
        .iter()
        .find(|variable| variable.id == variable_id)
        .map_or_else(
            || "Please enter a value for the variable.".to_string(),
            |variable| format!("Please enter a value for {}.", variable.name),
        )
}

/// Authentication comes first, then plot, date, variable and value.
/// `variables` is only used to name the variable in the missing-value
/// message.
pub fn validate_measurement<'a>(
    actor: Option<&'a Actor>,
    draft: &MeasurementDraft,
    variables: &[Variable],
) -> BusinessResult<(&'a Actor, ValidMeasurement)> {
    let actor = actor.ok_or(BusinessError::Unauthenticated)?;

    let plot_id = canonical_uuid(draft.plot_id.as_deref())
        .ok_or_else(|| validation_error!("plot_id", INVALID_PLOT))?;

    let measurement_date = parse_date(draft.measurement_date.as_deref())
        .ok_or_else(|| validation_error!("measurement_date", MISSING_DATE))?;

    let variable_id = canonical_uuid(draft.variable_id.as_deref())
        .ok_or_else(|| validation_error!("variable_id", INVALID_VARIABLE))?;

    let value = draft
        .value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| validation_error!("value", missing_value_message(variable_id, variables)))?;

    let notes = draft
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(ToString::to_string);

    Ok((
        actor,
        ValidMeasurement {
            plot_id,
            measurement_date,
            variable_id,
            value: value.to_string(),
            notes,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PLOT: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";
    const VARIABLE: &str = "9b2d5c3a-1e4f-4a6b-8c7d-2e1f0a9b8c7d";

    fn draft() -> MeasurementDraft {
        MeasurementDraft {
            plot_id: Some(PLOT.to_string()),
            measurement_date: Some("2025-06-01".to_string()),
            variable_id: Some(VARIABLE.to_string()),
            value: Some(" 450 ".to_string()),
            notes: None,
        }
    }

    fn message(err: BusinessError) -> String {
        match err {
            BusinessError::ValidationError { message, .. } => message,
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(PLOT, true)]
    #[case("3F2504E0-4F89-41D3-9A0C-0305E82C3301", true)]
    #[case("3f2504e04f8941d39a0c0305e82c3301", false)]
    #[case("{3f2504e0-4f89-41d3-9a0c-0305e82c3301}", false)]
    #[case("P1", false)]
    #[case("", false)]
    fn test_canonical_uuid_shape(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_canonical_uuid(raw), expected);
    }

    #[test]
    fn test_well_formed_draft_passes_and_trims_value() {
        let actor = Actor::new(Uuid::new_v4());
        let (returned, valid) = validate_measurement(Some(&actor), &draft(), &[]).unwrap();

        assert_eq!(returned, &actor);
        assert_eq!(valid.value, "450");
        assert_eq!(valid.plot_id.to_string(), PLOT);
        assert_eq!(
            valid.measurement_date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_missing_actor_wins_over_bad_payload() {
        let err = validate_measurement(None, &MeasurementDraft::default(), &[]).unwrap_err();
        assert_eq!(err, BusinessError::Unauthenticated);
    }

    #[rstest]
    #[case::missing_plot(MeasurementDraft { plot_id: None, ..draft() }, INVALID_PLOT)]
    #[case::malformed_plot(
        MeasurementDraft { plot_id: Some("P1".into()), ..draft() },
        INVALID_PLOT
    )]
    #[case::blank_date(
        MeasurementDraft { measurement_date: Some("  ".into()), ..draft() },
        MISSING_DATE
    )]
    #[case::unparsable_date(
        MeasurementDraft { measurement_date: Some("01/06/2025".into()), ..draft() },
        MISSING_DATE
    )]
    #[case::missing_variable(MeasurementDraft { variable_id: None, ..draft() }, INVALID_VARIABLE)]
    #[case::blank_value(
        MeasurementDraft { value: Some("   ".into()), ..draft() },
        "Please enter a value for the variable."
    )]
    #[case::plot_checked_before_date(
        MeasurementDraft { plot_id: None, measurement_date: None, ..draft() },
        INVALID_PLOT
    )]
    fn test_first_failure_wins(#[case] input: MeasurementDraft, #[case] expected: &str) {
        let actor = Actor::new(Uuid::new_v4());
        let err = validate_measurement(Some(&actor), &input, &[]).unwrap_err();
        assert_eq!(message(err), expected);
    }

    #[test]
    fn test_missing_value_names_the_variable() {
        let now = chrono::Utc::now();
        let variable = Variable {
            id: Uuid::parse_str(VARIABLE).unwrap(),
            trial_id: Uuid::new_v4(),
            name: "Yield".to_string(),
            unit: Some("kg/ha".to_string()),
            frequency: None,
            description: None,
            data_type: None,
            created_at: now,
            updated_at: now,
        };
        let input = MeasurementDraft {
            value: None,
            ..draft()
        };

        let actor = Actor::new(Uuid::new_v4());
        let err = validate_measurement(Some(&actor), &input, &[variable]).unwrap_err();
        assert_eq!(message(err), "Please enter a value for Yield.");
    }
}
