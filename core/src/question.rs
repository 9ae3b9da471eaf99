use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ChatbotError;

/// The fixed set of attendance questions the chatbot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    AttendanceSummaryMonth,
    OvertimeAnalysisMonth,
    LeaveBalance,
    ProjectHoursMonth,
    MonthlyComparison,
    AttendanceOnDate,
    LastDayOff,
}

/// How a parameter is entered and normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `YYYY-MM`, sent as a numeric month/year pair
    Month,
    /// `YYYY-MM-DD`, sent verbatim
    Date,
    /// Free text, sent verbatim
    Text,
}

/// A parameter a question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Static description of a question as presented to the user
#[derive(Debug, Clone, Copy)]
pub struct QuestionSpec {
    pub label: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub parameters: &'static [ParamSpec],
    pub follow_ups: [&'static str; 3],
}

impl QuestionSpec {
    pub fn requires_params(&self) -> bool {
        !self.parameters.is_empty()
    }
}

const MONTH: ParamSpec = ParamSpec {
    name: "month",
    kind: ParamKind::Month,
};

/// Follow-ups offered when a question cannot be identified
pub const DEFAULT_FOLLOW_UPS: [&str; 3] = [
    "Show monthly summary",
    "Check leave balance",
    "View overtime analysis",
];

impl QuestionId {
    pub const ALL: [QuestionId; 7] = [
        QuestionId::AttendanceSummaryMonth,
        QuestionId::OvertimeAnalysisMonth,
        QuestionId::LeaveBalance,
        QuestionId::ProjectHoursMonth,
        QuestionId::MonthlyComparison,
        QuestionId::AttendanceOnDate,
        QuestionId::LastDayOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionId::AttendanceSummaryMonth => "attendance_summary_month",
            QuestionId::OvertimeAnalysisMonth => "overtime_analysis_month",
            QuestionId::LeaveBalance => "leave_balance",
            QuestionId::ProjectHoursMonth => "project_hours_month",
            QuestionId::MonthlyComparison => "monthly_comparison",
            QuestionId::AttendanceOnDate => "attendance_on_date",
            QuestionId::LastDayOff => "last_day_off",
        }
    }

    pub fn spec(&self) -> &'static QuestionSpec {
        match self {
            QuestionId::AttendanceSummaryMonth => &QuestionSpec {
                label: "Monthly Attendance Summary",
                description: "View your attendance for a specific month",
                category: "attendance",
                parameters: &[MONTH],
                follow_ups: [
                    "Show me overtime for this month",
                    "Compare with last month",
                    "What's my leave balance?",
                ],
            },
            QuestionId::OvertimeAnalysisMonth => &QuestionSpec {
                label: "Overtime Analysis",
                description: "Check overtime hours for a month",
                category: "overtime",
                parameters: &[MONTH],
                follow_ups: [
                    "Show monthly attendance summary",
                    "Check project hours",
                    "When was my last day off?",
                ],
            },
            QuestionId::LeaveBalance => &QuestionSpec {
                label: "Leave Balance",
                description: "Check your remaining paid leave days",
                category: "leave",
                parameters: &[],
                follow_ups: [
                    "Show attendance summary",
                    "When was my last day off?",
                    "Check overtime hours",
                ],
            },
            QuestionId::ProjectHoursMonth => &QuestionSpec {
                label: "Project Hours",
                description: "View hours worked on a specific project",
                category: "project",
                parameters: &[
                    ParamSpec {
                        name: "project",
                        kind: ParamKind::Text,
                    },
                    MONTH,
                ],
                follow_ups: [
                    "Show total monthly hours",
                    "Compare with other projects",
                    "Check overtime analysis",
                ],
            },
            QuestionId::MonthlyComparison => &QuestionSpec {
                label: "Compare Months",
                description: "Compare attendance between two months",
                category: "comparison",
                parameters: &[
                    ParamSpec {
                        name: "month1",
                        kind: ParamKind::Month,
                    },
                    ParamSpec {
                        name: "month2",
                        kind: ParamKind::Month,
                    },
                ],
                follow_ups: [
                    "Show current month details",
                    "Check leave balance",
                    "Analyze overtime trends",
                ],
            },
            QuestionId::AttendanceOnDate => &QuestionSpec {
                label: "Specific Date Attendance",
                description: "Check attendance for a specific date",
                category: "date",
                parameters: &[ParamSpec {
                    name: "date",
                    kind: ParamKind::Date,
                }],
                follow_ups: [
                    "Show weekly summary",
                    "Check nearby dates",
                    "View monthly overview",
                ],
            },
            QuestionId::LastDayOff => &QuestionSpec {
                label: "Last Day Off",
                description: "Find your most recent day off",
                category: "leave",
                parameters: &[],
                follow_ups: [
                    "Check leave balance",
                    "Show recent attendance",
                    "Plan next time off",
                ],
            },
        }
    }

    pub fn requires_params(&self) -> bool {
        self.spec().requires_params()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = ChatbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ChatbotError::UnknownQuestion(s.to_string()))
    }
}

/// Follow-up suggestions for a question id as reported by the server
pub fn follow_ups_for(question_id: &str) -> [&'static str; 3] {
    question_id
        .parse::<QuestionId>()
        .map(|id| id.spec().follow_ups)
        .unwrap_or(DEFAULT_FOLLOW_UPS)
}
