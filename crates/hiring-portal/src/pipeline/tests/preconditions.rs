use super::common::*;
use crate::access::Action;
use crate::pipeline::{
    can_apply, can_schedule, can_schedule_at, can_submit_result, check_result_form,
    ActionDecision, CandidateRecord, InterviewResult, InterviewType, JobStatus,
    PreconditionFailure, Stage,
};
use crate::session::Role;

#[test]
fn resume_upload_then_duplicate_application() {
    let candidate = candidate();
    let open = job("job-1", JobStatus::Open);

    let mut record = CandidateRecord::new(false, Vec::new());
    assert_eq!(
        can_apply(&candidate, &open, &record),
        ActionDecision::Denied(PreconditionFailure::NoResumeOnFile)
    );

    record.resume_on_file = true;
    assert!(can_apply(&candidate, &open, &record).is_allowed());

    record
        .applications
        .push(application("app-1", "job-1", "cand-1", Stage::Applied));
    assert_eq!(
        can_apply(&candidate, &open, &record),
        ActionDecision::Denied(PreconditionFailure::AlreadyApplied)
    );
}

#[test]
fn duplicate_check_matches_exact_job_and_user_pair() {
    let candidate = candidate();
    let open = job("job-1", JobStatus::Open);
    let record = CandidateRecord::new(
        true,
        vec![
            application("app-1", "job-2", "cand-1", Stage::Applied),
            application("app-2", "job-1", "cand-9", Stage::Applied),
        ],
    );

    assert!(can_apply(&candidate, &open, &record).is_allowed());
}

#[test]
fn closed_and_draft_jobs_refuse_applications() {
    let candidate = candidate();
    let record = CandidateRecord::new(true, Vec::new());

    for status in [JobStatus::Closed, JobStatus::Draft] {
        assert_eq!(
            can_apply(&candidate, &job("job-1", status), &record),
            ActionDecision::Denied(PreconditionFailure::JobNotOpen { status })
        );
    }
}

#[test]
fn non_candidates_cannot_apply() {
    let record = CandidateRecord::new(true, Vec::new());
    let decision = can_apply(&recruiter(), &job("job-1", JobStatus::Open), &record);

    assert_eq!(
        decision,
        ActionDecision::Denied(PreconditionFailure::RoleNotPermitted {
            role: Role::Recruiter,
            action: Action::ApplyToJob,
        })
    );
    assert!(decision.summary().contains("RECRUITER"));
}

#[test]
fn terminal_applications_cannot_be_scheduled() {
    for stage in [Stage::Hired, Stage::Rejected] {
        assert_eq!(
            can_schedule(&application("app-1", "job-1", "cand-1", stage)),
            ActionDecision::Denied(PreconditionFailure::AlreadyTerminal { stage })
        );
    }
    assert!(can_schedule(&application("app-1", "job-1", "cand-1", Stage::Offered)).is_allowed());
}

#[test]
fn scheduling_rejects_past_times() {
    let app = application("app-1", "job-1", "cand-1", Stage::Screened);

    assert_eq!(
        can_schedule_at(&recruiter(), &app, at(9), at(10)),
        ActionDecision::Denied(PreconditionFailure::ScheduledInPast)
    );
    assert!(can_schedule_at(&recruiter(), &app, at(11), at(10)).is_allowed());
    assert!(!can_schedule_at(&admin(), &app, at(11), at(10)).is_allowed());
}

#[test]
fn only_the_assigned_interviewer_records_a_result_once() {
    let pending = interview(
        "iv-1",
        "app-1",
        "int-1",
        InterviewType::Technical,
        10,
        InterviewResult::Pending,
    );

    assert!(can_submit_result(&interviewer("int-1"), &pending).is_allowed());
    assert_eq!(
        can_submit_result(&interviewer("int-2"), &pending),
        ActionDecision::Denied(PreconditionFailure::NotAssignedInterviewer)
    );

    let recorded = interview(
        "iv-1",
        "app-1",
        "int-1",
        InterviewType::Technical,
        10,
        InterviewResult::Passed,
    );
    assert_eq!(
        can_submit_result(&interviewer("int-1"), &recorded),
        ActionDecision::Denied(PreconditionFailure::ResultAlreadyRecorded {
            result: InterviewResult::Passed
        })
    );
}

#[test]
fn result_form_needs_decision_and_feedback() {
    assert_eq!(
        check_result_form(InterviewResult::Pending, "solid"),
        Err(PreconditionFailure::ResultRequired)
    );
    assert_eq!(
        check_result_form(InterviewResult::Failed, "   "),
        Err(PreconditionFailure::FeedbackRequired)
    );
    assert_eq!(check_result_form(InterviewResult::Passed, "strong design"), Ok(()));
}

#[test]
fn every_denial_has_a_message() {
    let reasons = [
        PreconditionFailure::NoResumeOnFile,
        PreconditionFailure::AlreadyApplied,
        PreconditionFailure::JobNotOpen {
            status: JobStatus::Closed,
        },
        PreconditionFailure::AlreadyTerminal {
            stage: Stage::Hired,
        },
        PreconditionFailure::NotAssignedInterviewer,
        PreconditionFailure::ResultRequired,
        PreconditionFailure::FeedbackRequired,
        PreconditionFailure::ScheduledInPast,
    ];

    for reason in reasons {
        assert!(!reason.summary().is_empty());
        assert_eq!(
            ActionDecision::Denied(reason.clone()).summary(),
            reason.summary()
        );
    }
    assert_eq!(
        PreconditionFailure::JobNotOpen {
            status: JobStatus::Closed
        }
        .summary(),
        "this job is closed and not accepting applications"
    );
}
