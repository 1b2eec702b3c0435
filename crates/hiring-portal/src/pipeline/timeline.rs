use serde::{Deserialize, Serialize};

use super::domain::{Application, Interview, InterviewId, InterviewResult};
use super::stage::{is_final_round, Stage, StageEvent, StageTrigger, TransitionError};

/// An application together with every interview scheduled against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationTimeline {
    pub application: Application,
    pub interviews: Vec<Interview>,
}

impl ApplicationTimeline {
    /// Keep only the interviews that belong to `application`.
    pub fn new(application: Application, interviews: Vec<Interview>) -> Self {
        let interviews = interviews
            .into_iter()
            .filter(|interview| interview.application_id == application.id)
            .collect();
        Self {
            application,
            interviews,
        }
    }

    pub fn interview(&self, id: &InterviewId) -> Option<&Interview> {
        self.interviews.iter().find(|interview| &interview.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Interview> {
        self.interviews
            .iter()
            .filter(|interview| interview.result.is_pending())
    }

    /// The stage the application should reach if `interview_id` is recorded with `result`.
    pub fn project_outcome(
        &self,
        interview_id: &InterviewId,
        result: InterviewResult,
        trigger: StageTrigger,
    ) -> Result<Stage, TransitionError> {
        let interview = self
            .interview(interview_id)
            .ok_or_else(|| TransitionError::UnknownInterview(interview_id.clone()))?;

        let event = StageEvent::InterviewOutcome {
            interview_type: interview.interview_type,
            result,
            final_round: is_final_round(interview, &self.interviews),
        };

        self.application.current_stage().next(&event, trigger)
    }
}
