//! Translation of user-selected parameters into the query text shown in the
//! transcript and the payload sent to the query endpoint.

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ChatbotError, ChatbotResult};
use crate::question::{ParamKind, QuestionId};
use crate::types::{FormattedParameters, ParamValue, RawParameters};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month written as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES
            .get((self.month as usize).wrapping_sub(1))
            .copied()
            .unwrap_or("Unknown")
    }

    /// `March 2024`
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ChatbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChatbotError::InvalidParameter {
            name: s.to_string(),
            reason: reason.to_string(),
        };

        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-MM"))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| invalid("year is not a number"))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| invalid("month is not a number"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 1 and 12"));
        }

        Ok(Self { year, month })
    }
}

fn month_param(raw: &RawParameters, name: &str) -> Option<YearMonth> {
    raw.get(name).and_then(|value| value.parse().ok())
}

fn present<'a>(raw: &'a RawParameters, name: &str) -> Option<&'a str> {
    raw.get(name)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Builds the sentence shown in the transcript for a question.
///
/// Never fails: absent or malformed parameters fall back to a generic phrase.
pub fn build_user_query(question_id: QuestionId, raw: &RawParameters) -> String {
    match question_id {
        QuestionId::AttendanceSummaryMonth => match month_param(raw, "month") {
            Some(month) => format!("Show my attendance for {}", month.label()),
            None => "Show my attendance".to_string(),
        },
        QuestionId::OvertimeAnalysisMonth => match month_param(raw, "month") {
            Some(month) => format!("Show my overtime for {}", month.label()),
            None => "Show my overtime".to_string(),
        },
        QuestionId::LeaveBalance => "What is my remaining leave balance?".to_string(),
        QuestionId::ProjectHoursMonth => format!(
            "Show hours for {} in {}",
            present(raw, "project").unwrap_or("my project"),
            present(raw, "month").unwrap_or("this month")
        ),
        QuestionId::MonthlyComparison => {
            match (present(raw, "month1"), present(raw, "month2")) {
                (Some(first), Some(second)) => {
                    format!("Compare my attendance between {} and {}", first, second)
                }
                _ => "Compare my attendance between two months".to_string(),
            }
        }
        QuestionId::AttendanceOnDate => match present(raw, "date") {
            Some(date) => format!("What was my attendance on {}?", date),
            None => "What was my attendance on the selected date?".to_string(),
        },
        QuestionId::LastDayOff => "When was my last day off?".to_string(),
    }
}

/// Converts raw parameters into the payload for the query endpoint.
///
/// Driven by the question's parameter table: a month parameter `monthN`
/// becomes numeric `monthN`/`yearN` entries, dates and free text are copied.
/// Missing or unparseable values are omitted.
pub fn format_parameters(question_id: QuestionId, raw: &RawParameters) -> FormattedParameters {
    let mut formatted = FormattedParameters::new();

    for param in question_id.spec().parameters {
        match param.kind {
            ParamKind::Month => {
                if let Some(month) = month_param(raw, param.name) {
                    let suffix = param.name.strip_prefix("month").unwrap_or_default();
                    formatted.insert(param.name.to_string(), ParamValue::from(month.month));
                    formatted.insert(format!("year{}", suffix), ParamValue::from(month.year));
                }
            }
            ParamKind::Date | ParamKind::Text => {
                if let Some(value) = present(raw, param.name) {
                    formatted.insert(param.name.to_string(), ParamValue::from(value));
                }
            }
        }
    }

    formatted
}

/// Checks that every parameter the question declares is present and well formed
pub fn validate_parameters(question_id: QuestionId, raw: &RawParameters) -> ChatbotResult<()> {
    for param in question_id.spec().parameters {
        let value = present(raw, param.name).ok_or_else(|| ChatbotError::MissingParameter {
            question: question_id.to_string(),
            name: param.name.to_string(),
        })?;

        match param.kind {
            ParamKind::Month => {
                value
                    .parse::<YearMonth>()
                    .map_err(|_| ChatbotError::InvalidParameter {
                        name: param.name.to_string(),
                        reason: format!("'{}' is not a YYYY-MM month", value),
                    })?;
            }
            ParamKind::Date => {
                NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    ChatbotError::InvalidParameter {
                        name: param.name.to_string(),
                        reason: format!("'{}' is not a YYYY-MM-DD date", value),
                    }
                })?;
            }
            ParamKind::Text => {}
        }
    }

    Ok(())
}

/// Selectable months from a year before `today` to two months after, oldest first
pub fn month_options(today: NaiveDate) -> Vec<YearMonth> {
    let Some(first) = today.with_day(1) else {
        return Vec::new();
    };

    (-12i32..=2)
        .filter_map(|offset| {
            let shifted = if offset < 0 {
                first.checked_sub_months(Months::new(offset.unsigned_abs()))
            } else {
                first.checked_add_months(Months::new(offset as u32))
            };
            shifted.map(YearMonth::from_date)
        })
        .collect()
}

/// Pre-filled parameters for a question, as offered before the user edits them
pub fn default_parameters(
    question_id: QuestionId,
    today: NaiveDate,
    projects: &[String],
) -> RawParameters {
    let current = YearMonth::from_date(today);
    let previous = today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(1)))
        .map(YearMonth::from_date)
        .unwrap_or(current);

    let mut params = RawParameters::new();
    match question_id {
        QuestionId::AttendanceSummaryMonth | QuestionId::OvertimeAnalysisMonth => {
            params.insert("month".to_string(), current.to_string());
        }
        QuestionId::ProjectHoursMonth => {
            params.insert(
                "project".to_string(),
                projects.first().cloned().unwrap_or_default(),
            );
            params.insert("month".to_string(), current.to_string());
        }
        QuestionId::MonthlyComparison => {
            params.insert("month1".to_string(), previous.to_string());
            params.insert("month2".to_string(), current.to_string());
        }
        QuestionId::AttendanceOnDate => {
            params.insert("date".to_string(), today.format("%Y-%m-%d").to_string());
        }
        QuestionId::LeaveBalance | QuestionId::LastDayOff => {}
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_formats_month_into_numbers() {
        let formatted = format_parameters(
            QuestionId::AttendanceSummaryMonth,
            &raw(&[("month", "2024-03")]),
        );

        let mut expected = FormattedParameters::new();
        expected.insert("month".to_string(), ParamValue::Number(3));
        expected.insert("year".to_string(), ParamValue::Number(2024));
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_parameterless_questions_format_empty() {
        assert!(format_parameters(QuestionId::LeaveBalance, &RawParameters::new()).is_empty());
        assert!(format_parameters(QuestionId::LastDayOff, &raw(&[("month", "2024-03")])).is_empty());
    }

    #[test]
    fn test_formats_monthly_comparison() {
        let formatted = format_parameters(
            QuestionId::MonthlyComparison,
            &raw(&[("month1", "2023-12"), ("month2", "2024-01")]),
        );

        let mut expected = FormattedParameters::new();
        expected.insert("month1".to_string(), ParamValue::Number(12));
        expected.insert("year1".to_string(), ParamValue::Number(2023));
        expected.insert("month2".to_string(), ParamValue::Number(1));
        expected.insert("year2".to_string(), ParamValue::Number(2024));
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_formats_project_hours() {
        let formatted = format_parameters(
            QuestionId::ProjectHoursMonth,
            &raw(&[("project", "Acme"), ("month", "2024-11")]),
        );

        assert_eq!(formatted.get("project"), Some(&ParamValue::from("Acme")));
        assert_eq!(formatted.get("month"), Some(&ParamValue::Number(11)));
        assert_eq!(formatted.get("year"), Some(&ParamValue::Number(2024)));
    }

    #[test]
    fn test_missing_and_malformed_fields_are_omitted() {
        let formatted = format_parameters(
            QuestionId::MonthlyComparison,
            &raw(&[("month1", "not-a-month"), ("extra", "ignored")]),
        );
        assert!(formatted.is_empty());

        let formatted = format_parameters(QuestionId::AttendanceOnDate, &RawParameters::new());
        assert!(formatted.is_empty());
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let params = raw(&[("project", "Acme"), ("month", "2024-03")]);
        let first = format_parameters(QuestionId::ProjectHoursMonth, &params);
        let second = format_parameters(QuestionId::ProjectHoursMonth, &params);
        assert_eq!(first, second);
    }

    #[test]
    fn test_user_query_names_the_month() {
        assert_eq!(
            build_user_query(
                QuestionId::AttendanceSummaryMonth,
                &raw(&[("month", "2024-03")])
            ),
            "Show my attendance for March 2024"
        );
        assert_eq!(
            build_user_query(
                QuestionId::OvertimeAnalysisMonth,
                &raw(&[("month", "2023-12")])
            ),
            "Show my overtime for December 2023"
        );
    }

    #[test]
    fn test_user_query_contains_date() {
        let query = build_user_query(
            QuestionId::AttendanceOnDate,
            &raw(&[("date", "2024-03-15")]),
        );
        assert!(query.contains("2024-03-15"));
    }

    #[test]
    fn test_user_query_defaults_when_parameters_absent() {
        assert_eq!(
            build_user_query(QuestionId::AttendanceSummaryMonth, &RawParameters::new()),
            "Show my attendance"
        );
        assert_eq!(
            build_user_query(QuestionId::ProjectHoursMonth, &RawParameters::new()),
            "Show hours for my project in this month"
        );
        assert_eq!(
            build_user_query(QuestionId::MonthlyComparison, &raw(&[("month1", "2024-01")])),
            "Compare my attendance between two months"
        );
    }

    #[test]
    fn test_user_query_never_empty() {
        let shapes = [
            RawParameters::new(),
            raw(&[("month", "2024-13")]),
            raw(&[("month", "")]),
            raw(&[
                ("month", "2024-03"),
                ("month1", "2024-01"),
                ("month2", "2024-02"),
                ("date", "2024-03-15"),
                ("project", "Acme"),
            ]),
        ];

        for id in QuestionId::ALL {
            for params in &shapes {
                assert!(!build_user_query(id, params).is_empty(), "{} produced empty query", id);
            }
        }
    }

    #[test]
    fn test_year_month_parsing() {
        assert_eq!(
            "2024-03".parse::<YearMonth>().unwrap(),
            YearMonth {
                year: 2024,
                month: 3
            }
        );
        assert!("2024-00".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth { year: 2024, month: 3 }.to_string(), "2024-03");
    }

    #[test]
    fn test_validation_reports_missing_parameter() {
        let err = validate_parameters(QuestionId::ProjectHoursMonth, &raw(&[("month", "2024-03")]))
            .unwrap_err();
        assert!(matches!(err, ChatbotError::MissingParameter { ref name, .. } if name == "project"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(validate_parameters(QuestionId::AttendanceOnDate, &raw(&[("date", "2024-02-30")])).is_err());
        assert!(validate_parameters(QuestionId::AttendanceSummaryMonth, &raw(&[("month", "03-2024")])).is_err());
        assert!(validate_parameters(QuestionId::LeaveBalance, &RawParameters::new()).is_ok());
        assert!(validate_parameters(
            QuestionId::MonthlyComparison,
            &raw(&[("month1", "2023-12"), ("month2", "2024-01")])
        )
        .is_ok());
    }

    #[test]
    fn test_month_options_span_fifteen_months() {
        let options = month_options(date(2024, 3, 15));

        assert_eq!(options.len(), 15);
        assert_eq!(options.first().unwrap().to_string(), "2023-03");
        assert_eq!(options[12].to_string(), "2024-03");
        assert_eq!(options.last().unwrap().to_string(), "2024-05");
        assert_eq!(options[9].label(), "December 2023");
    }

    #[test]
    fn test_default_parameters() {
        let today = date(2024, 1, 31);
        let projects = vec!["Acme".to_string(), "Globex".to_string()];

        let comparison = default_parameters(QuestionId::MonthlyComparison, today, &projects);
        assert_eq!(comparison.get("month1").map(String::as_str), Some("2023-12"));
        assert_eq!(comparison.get("month2").map(String::as_str), Some("2024-01"));

        let hours = default_parameters(QuestionId::ProjectHoursMonth, today, &projects);
        assert_eq!(hours.get("project").map(String::as_str), Some("Acme"));

        let on_date = default_parameters(QuestionId::AttendanceOnDate, today, &[]);
        assert_eq!(on_date.get("date").map(String::as_str), Some("2024-01-31"));

        assert!(default_parameters(QuestionId::LastDayOff, today, &projects).is_empty());
    }
}
