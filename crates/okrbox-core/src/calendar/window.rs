use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Reporting period a rollup score is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportWindow {
    Week,
    Month,
    Quarter,
}

impl ReportWindow {
    pub const ALL: [ReportWindow; 3] = [ReportWindow::Week, ReportWindow::Month, ReportWindow::Quarter];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportWindow::Week => "week",
            ReportWindow::Month => "month",
            ReportWindow::Quarter => "quarter",
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(ReportWindow::Week),
            "month" | "m" => Ok(ReportWindow::Month),
            "quarter" | "q" => Ok(ReportWindow::Quarter),
            _ => Err(ValidationError::UnknownWindow(s.to_string())),
        }
    }
}

/// Week-of-year label `第NN周`.
///
/// Weeks start on Monday and week 1 is the week containing 1 January, so a
/// year can begin with a partial week 1 and end in week 53 or 54.
pub fn plan_week_label(date: NaiveDate) -> String {
    let jan_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|jan1| jan1.weekday().num_days_from_monday())
        .unwrap_or(0);
    let week = (date.ordinal0() + jan_offset) / 7 + 1;
    format!("第{week:02}周")
}
