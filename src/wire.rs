//! JSON request/response adapter.
//!
//! Converts between the wire format used by calendar front-ends and the
//! millisecond time model of the core. Timestamps travel as naive local
//! date-times (`2015-11-11T09:00:00`); internally they become milliseconds
//! since the Unix epoch in the same naive time, so no time zone is applied
//! in either direction.
//!
//! Transport (HTTP, CORS) is left to the caller.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::ga::operators::GeneticOperators;
use crate::ga::GaConfig;
use crate::models::{HOUR_MS, StudentRecord, TimeWindow};
use crate::optimizer::{OptimizationResult, TimetableOptimizer};

/// Wire timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a wire timestamp into epoch milliseconds.
///
/// Accepts `T` or a space between date and time.
pub fn parse_timestamp(value: &str) -> Result<i64, TimetableError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.and_utc().timestamp_millis())
        .map_err(|e| TimetableError::Wire(format!("bad timestamp '{value}': {e}")))
}

/// Converts epoch milliseconds to a naive date-time.
pub fn to_naive(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Formats epoch milliseconds in the wire format.
///
/// Out-of-range values fall back to the raw millisecond count.
pub fn format_timestamp(ms: i64) -> String {
    match to_naive(ms) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => ms.to_string(),
    }
}

/// A time window on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDto {
    pub start: String,
    pub end: String,
}

/// A student on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDto {
    pub id: String,
    pub subjects: Vec<String>,
}

fn default_exam_duration_hours() -> f64 {
    1.0
}

/// Optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRequest {
    pub windows: Vec<WindowDto>,
    pub students: Vec<StudentDto>,
    #[serde(default = "default_exam_duration_hours")]
    pub exam_duration_hours: f64,
    #[serde(default)]
    pub config: Option<GaConfig>,
    #[serde(default)]
    pub operators: Option<GeneticOperators>,
}

impl TimetableRequest {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, TimetableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts wire windows to the core time model.
    pub fn time_windows(&self) -> Result<Vec<TimeWindow>, TimetableError> {
        self.windows
            .iter()
            .map(|w| -> Result<TimeWindow, TimetableError> {
                Ok(TimeWindow::new(parse_timestamp(&w.start)?, parse_timestamp(&w.end)?))
            })
            .collect()
    }

    /// Converts wire students to roster records.
    pub fn student_records(&self) -> Vec<StudentRecord> {
        self.students
            .iter()
            .map(|s| StudentRecord::new(s.id.clone()).with_subjects(s.subjects.iter().cloned()))
            .collect()
    }

    /// Exam duration in milliseconds (rounded).
    pub fn exam_duration_ms(&self) -> i64 {
        (self.exam_duration_hours * HOUR_MS as f64).round() as i64
    }

    /// Builds an optimizer for this request.
    pub fn into_optimizer(self) -> Result<TimetableOptimizer, TimetableError> {
        let mut optimizer = TimetableOptimizer::new(self.time_windows()?, self.student_records())
            .with_exam_duration_ms(self.exam_duration_ms());
        if let Some(config) = self.config {
            optimizer = optimizer.with_config(config);
        }
        if let Some(operators) = self.operators {
            optimizer = optimizer.with_operators(operators);
        }
        Ok(optimizer)
    }
}

/// A calendar event on the wire.
///
/// Exams carry the subject as title; each input window is echoed as a
/// `"background"` event so front-ends can shade the available sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendering: Option<String>,
}

/// Optimization response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableResponse {
    pub events: Vec<EventDto>,
    /// Worst student's smallest gap; `None` when unconstrained.
    pub min_revision_hours: Option<f64>,
    pub generations: usize,
}

impl TimetableResponse {
    /// Builds the response for a result and the windows it was run on.
    pub fn from_result(result: &OptimizationResult, windows: &[TimeWindow]) -> Self {
        let exams = result.schedule.slots.iter().map(|slot| EventDto {
            title: slot.subject.clone(),
            start: format_timestamp(slot.start_ms),
            end: format_timestamp(slot.end_ms),
            rendering: None,
        });
        let backgrounds = windows.iter().map(|w| EventDto {
            title: String::new(),
            start: format_timestamp(w.start_ms),
            end: format_timestamp(w.end_ms),
            rendering: Some("background".into()),
        });

        Self {
            events: exams.chain(backgrounds).collect(),
            min_revision_hours: Some(result.fitness_hours).filter(|f| f.is_finite()),
            generations: result.generations,
        }
    }

    /// Serializes the response to JSON.
    pub fn to_json(&self) -> Result<String, TimetableError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses a JSON request, runs the optimizer and returns the JSON response.
pub fn handle_request(json: &str) -> Result<String, TimetableError> {
    let request = TimetableRequest::from_json(json)?;
    let windows = request.time_windows()?;
    let result = request.into_optimizer()?.optimize()?;
    TimetableResponse::from_result(&result, &windows).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ExamGenome;
    use crate::models::{ExamSlot, Schedule};

    const REQUEST: &str = r#"{
        "windows": [
            {"start": "2015-11-11T09:00:00", "end": "2015-11-11T12:00:00"},
            {"start": "2015-11-12 09:00:00", "end": "2015-11-12 12:00:00"}
        ],
        "students": [
            {"id": "A", "subjects": ["Chinese", "English"]},
            {"id": "B", "subjects": ["Chinese", "English", "Math"]}
        ],
        "config": {"population_size": 20, "max_generations": 5}
    }"#;

    #[test]
    fn test_timestamp_round_trip_naive() {
        let ms = parse_timestamp("2015-11-11T09:00:00").unwrap();
        assert_eq!(ms, 1_447_232_400_000);
        assert_eq!(format_timestamp(ms), "2015-11-11T09:00:00");
        assert_eq!(format_timestamp(ms + 3 * HOUR_MS), "2015-11-11T12:00:00");
    }

    #[test]
    fn test_bad_timestamp() {
        let err = parse_timestamp("11/11/2015 9am").unwrap_err();
        assert!(matches!(err, TimetableError::Wire(_)));
    }

    #[test]
    fn test_request_parsing() {
        let req = TimetableRequest::from_json(REQUEST).unwrap();
        assert_eq!(req.exam_duration_hours, 1.0);
        assert_eq!(req.exam_duration_ms(), HOUR_MS);

        let windows = req.time_windows().unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].duration_ms(), 3 * HOUR_MS);
        assert_eq!(windows[1].start_ms - windows[0].start_ms, 24 * HOUR_MS);

        let students = req.student_records();
        assert_eq!(students[1].subjects, vec!["Chinese", "English", "Math"]);

        let config = req.config.clone().unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.crossover_rate, 0.5);
    }

    #[test]
    fn test_huge_exam_duration_reported() {
        let json = REQUEST.replace(
            "\"config\"",
            "\"exam_duration_hours\": 1e300, \"config\"",
        );
        let err = handle_request(&json).unwrap_err();
        assert!(matches!(err, TimetableError::InfeasibleInput { .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TimetableRequest::from_json("{\"windows\": 3}"),
            Err(TimetableError::Wire(_))
        ));
    }

    #[test]
    fn test_response_has_background_per_window() {
        let windows = vec![
            TimeWindow::new(0, 3 * HOUR_MS),
            TimeWindow::new(24 * HOUR_MS, 27 * HOUR_MS),
        ];
        let mut schedule = Schedule::new();
        schedule.add_slot(ExamSlot::new("Math", 0, HOUR_MS));
        let result = OptimizationResult {
            schedule,
            fitness_hours: f64::INFINITY,
            genome: ExamGenome::new(vec![0], vec![0]),
            generations: 3,
            cancelled: false,
            stats: vec![],
        };

        let resp = TimetableResponse::from_result(&result, &windows);
        assert_eq!(resp.events.len(), 3);
        assert_eq!(resp.events[0].title, "Math");
        assert_eq!(resp.events[0].start, "1970-01-01T00:00:00");
        assert_eq!(
            resp.events
                .iter()
                .filter(|e| e.rendering.as_deref() == Some("background"))
                .count(),
            2
        );
        assert_eq!(resp.min_revision_hours, None);

        let json = resp.to_json().unwrap();
        assert!(json.contains("\"rendering\":\"background\""));
        assert!(json.contains("\"min_revision_hours\":null"));
    }

    #[test]
    fn test_handle_request() {
        let json = handle_request(REQUEST).unwrap();
        let resp: TimetableResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(resp.events.iter().filter(|e| e.rendering.is_none()).count(), 3);
        assert_eq!(resp.generations, 5);
        assert!(resp.min_revision_hours.is_some());
    }
}
