//! Create/update payloads and their validation rules.

use serde::{Deserialize, Serialize};

use super::TimeSensitivity;
use crate::error::ValidationError;

pub(crate) const MAX_TITLE_CHARS: usize = 200;
pub(crate) const MAX_DESCRIPTION_CHARS: usize = 1000;
/// Eight hours.
pub(crate) const MAX_DURATION_MINUTES: u32 = 480;

/// Input for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub time_sensitivity: TimeSensitivity,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}

impl CreateTaskInput {
    /// # Errors
    ///
    /// Returns the first field that violates its rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_time_sensitivity(self.time_sensitivity)?;
        validate_duration(self.estimated_duration.map(i64::from))
    }
}

/// Partial update of a task. `None` leaves the field as is; the nested
/// options on `description` and `estimated_duration` allow clearing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub time_sensitivity: Option<TimeSensitivity>,
    #[serde(default)]
    pub estimated_duration: Option<Option<u32>>,
}

impl UpdateTaskInput {
    /// # Errors
    ///
    /// Returns the first field that violates its rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description.as_deref())?;
        }
        if let Some(sensitivity) = self.time_sensitivity {
            validate_time_sensitivity(sensitivity)?;
        }
        if let Some(duration) = self.estimated_duration {
            validate_duration(duration.map(i64::from))?;
        }
        Ok(())
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_CHARS,
            len,
        });
    }
    Ok(())
}

pub(crate) fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    let Some(text) = description else {
        return Ok(());
    };
    let len = text.chars().count();
    if len > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_CHARS,
            len,
        });
    }
    Ok(())
}

pub(crate) fn validate_time_sensitivity(value: TimeSensitivity) -> Result<(), ValidationError> {
    if value.is_known() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: "time_sensitivity".into(),
            message: "expected today, this_week or anytime".into(),
        })
    }
}

pub(crate) fn validate_duration(duration: Option<i64>) -> Result<(), ValidationError> {
    let max = i64::from(MAX_DURATION_MINUTES);
    match duration {
        Some(minutes) if !(1..=max).contains(&minutes) => Err(ValidationError::OutOfRange {
            field: "estimated_duration",
            min: 1,
            max,
            value: minutes,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateTaskInput {
        CreateTaskInput {
            title: "Plan sprint".into(),
            description: Some("Outline goals".into()),
            time_sensitivity: TimeSensitivity::ThisWeek,
            estimated_duration: Some(60),
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn title_length_is_counted_in_chars() {
        let input = CreateTaskInput {
            title: "任".repeat(MAX_TITLE_CHARS),
            ..valid()
        };
        assert!(input.validate().is_ok());

        let input = CreateTaskInput {
            title: "x".repeat(MAX_TITLE_CHARS + 1),
            ..valid()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_CHARS,
                len: MAX_TITLE_CHARS + 1,
            })
        );
    }

    #[test]
    fn rejects_long_description() {
        let input = CreateTaskInput {
            description: Some("d".repeat(MAX_DESCRIPTION_CHARS + 1)),
            ..valid()
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::TooLong { field: "description", .. })
        ));
    }

    #[test]
    fn duration_bounds() {
        for ok in [None, Some(1), Some(30), Some(MAX_DURATION_MINUTES)] {
            let input = CreateTaskInput {
                estimated_duration: ok,
                ..valid()
            };
            assert!(input.validate().is_ok(), "{ok:?} should be accepted");
        }
        for bad in [0, MAX_DURATION_MINUTES + 1] {
            let input = CreateTaskInput {
                estimated_duration: Some(bad),
                ..valid()
            };
            assert!(matches!(
                input.validate(),
                Err(ValidationError::OutOfRange { field: "estimated_duration", .. })
            ));
        }
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(UpdateTaskInput::default().validate().is_ok());

        let update = UpdateTaskInput {
            time_sensitivity: Some(TimeSensitivity::Unrecognized),
            ..UpdateTaskInput::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateTaskInput {
            description: Some(None),
            estimated_duration: Some(None),
            ..UpdateTaskInput::default()
        };
        assert!(update.validate().is_ok());
    }
}
