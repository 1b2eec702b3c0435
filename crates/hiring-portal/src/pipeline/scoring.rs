use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Criterion, InterviewType, Rating, Score};

const TECHNICAL_CORE: &[Criterion] = &[Criterion::LogicBuilding, Criterion::Oop, Criterion::Db];
const LEADERSHIP: &[Criterion] = &[
    Criterion::LogicBuilding,
    Criterion::Oop,
    Criterion::Db,
    Criterion::Communication,
];

/// Criteria an interviewer must rate for the given interview type, in display order.
pub fn required_criteria(interview_type: InterviewType) -> &'static [Criterion] {
    match interview_type {
        InterviewType::InitialScreening | InterviewType::Architect => TECHNICAL_CORE,
        InterviewType::Director => LEADERSHIP,
        _ => &[],
    }
}

/// Raw feedback-form values keyed by criterion name, as the form produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreForm(BTreeMap<String, Value>);

impl ScoreForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: Criterion, value: impl Into<Value>) -> Self {
        self.0.insert(criterion.key().to_string(), value.into());
        self
    }

    pub fn get(&self, criterion: Criterion) -> Option<&Value> {
        self.0.get(criterion.key())
    }
}

impl From<BTreeMap<String, Value>> for ScoreForm {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }
}

/// Why a required criterion could not be turned into a rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreProblem {
    Absent,
    NotWholeNumber,
    OutOfRange(i64),
}

impl fmt::Display for ScoreProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreProblem::Absent => f.write_str("no rating given"),
            ScoreProblem::NotWholeNumber => f.write_str("rating must be a whole number"),
            ScoreProblem::OutOfRange(value) => write!(f, "rating {value} is outside 1..=5"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("missing score for {criterion}: {problem}")]
    MissingCriterionScore {
        criterion: Criterion,
        problem: ScoreProblem,
    },
}

/// Turn form values into the score list the result submission carries.
///
/// Only the criteria required by `interview_type` are read; anything else in the form is
/// ignored. Types without required criteria produce an empty list.
pub fn build_score_payload(
    interview_type: InterviewType,
    form: &ScoreForm,
) -> Result<Vec<Score>, ScoringError> {
    required_criteria(interview_type)
        .iter()
        .map(|&criterion| {
            read_rating(form.get(criterion))
                .map(|score| Score { criteria: criterion, score })
                .map_err(|problem| ScoringError::MissingCriterionScore { criterion, problem })
        })
        .collect()
}

fn read_rating(value: Option<&Value>) -> Result<Rating, ScoreProblem> {
    let whole = match value {
        None | Some(Value::Null) => return Err(ScoreProblem::Absent),
        Some(Value::Number(number)) => whole_number(number.as_i64(), number.as_f64())?,
        Some(Value::String(raw)) if raw.trim().is_empty() => return Err(ScoreProblem::Absent),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            whole_number(raw.parse::<i64>().ok(), raw.parse::<f64>().ok())?
        }
        Some(_) => return Err(ScoreProblem::NotWholeNumber),
    };

    Rating::try_from(whole).map_err(|_| ScoreProblem::OutOfRange(whole))
}

fn whole_number(integer: Option<i64>, float: Option<f64>) -> Result<i64, ScoreProblem> {
    if let Some(value) = integer {
        return Ok(value);
    }
    match float {
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(ScoreProblem::NotWholeNumber),
    }
}
