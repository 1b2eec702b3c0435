use crate::infra::{ConsoleNavigator, InMemoryBackend};
use chrono::{Duration, Utc};
use clap::Args;
use hiring_portal::api::HiringApi;
use hiring_portal::config::AppConfig;
use hiring_portal::error::AppError;
use hiring_portal::pipeline::{
    Application, CandidateRecord, Criterion, InterviewPlan, InterviewResult, InterviewType, Job,
    JobDraft, JobStatus, ResultSubmission, ScoreForm, StageTrigger,
};
use hiring_portal::session::{Identity, MemoryCredentialStorage, RegistrationProfile, Role};
use hiring_portal::{Portal, PortalSettings};
use std::sync::Arc;

type DemoPortal = Portal<InMemoryBackend>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Which passed interview produces an offer (final | any). Defaults to PORTAL_STAGE_TRIGGER.
    #[arg(long, value_parser = hiring_portal::config::parse_stage_trigger)]
    pub(crate) stage_trigger: Option<StageTrigger>,
    /// Stop after the candidate has applied.
    #[arg(long)]
    pub(crate) skip_interviews: bool,
}

pub(crate) async fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let mut settings = PortalSettings::from(config);
    if let Some(trigger) = args.stage_trigger {
        settings.stage_trigger = trigger;
    }
    let backend = Arc::new(InMemoryBackend::new(settings.stage_trigger).with_staff());

    println!("Hiring portal demo");
    println!(
        "Policies: role mismatch {:?}, after register {:?}, offers on {:?}",
        settings.role_mismatch, settings.register_redirect, settings.stage_trigger
    );

    let admin_tab = open_tab(&backend, "admin", settings);
    let admin = admin_tab
        .session()
        .login("admin@portal.dev", "Portal2024")
        .await?;
    let jobs = post_jobs(&admin_tab, &admin).await?;

    let candidate_tab = open_tab(&backend, "candidate", settings);
    let candidate = register_candidate(&candidate_tab).await?;
    let application = apply_once(&candidate_tab, &candidate, &jobs[0]).await?;

    if !args.skip_interviews {
        let recruiter_tab = open_tab(&backend, "recruiter", settings);
        let recruiter = recruiter_tab
            .session()
            .login("ravi@portal.dev", "Portal2024")
            .await?;
        schedule_rounds(&recruiter_tab, &recruiter, &jobs[0], &application).await?;

        record_round(
            &backend,
            settings,
            ("iris@portal.dev", "iris"),
            &application,
            ResultSubmission {
                result: InterviewResult::Passed,
                feedback: "Solid fundamentals, clear reasoning on data modelling.".to_string(),
                scores: ScoreForm::new()
                    .with(Criterion::LogicBuilding, 4)
                    .with(Criterion::Oop, 4)
                    .with(Criterion::Db, 3),
            },
        )
        .await?;

        record_round(
            &backend,
            settings,
            ("tomas@portal.dev", "tomas"),
            &application,
            ResultSubmission {
                result: InterviewResult::Passed,
                feedback: "Strong ownership; ready to lead the billing rewrite.".to_string(),
                scores: ScoreForm::new()
                    .with(Criterion::LogicBuilding, 5)
                    .with(Criterion::Oop, 4)
                    .with(Criterion::Db, "4")
                    .with(Criterion::Communication, 5),
            },
        )
        .await?;

        recruiter_tab.session().logout().await;
    }

    println!("\nCandidate view after the rounds");
    let board = candidate_tab
        .settle(candidate_tab.desk().candidate_board(&candidate, true).await)?;
    for application in &board.applications {
        println!(
            "  {} on {}: {}",
            application.id,
            application.job_id,
            application.current_stage()
        );
    }

    println!("\nRoute guard");
    for path in ["/candidate/dashboard", "/recruiter/dashboard", "/jobs", "/nowhere"] {
        let (route, decision) = candidate_tab.navigate(path);
        println!("  {path} -> {route}: {decision:?}");
    }

    candidate_tab.session().logout().await;
    let (_, decision) = candidate_tab.navigate("/candidate/dashboard");
    println!("  after logout, /candidate/dashboard: {decision:?}");

    admin_tab.session().logout().await;
    Ok(())
}

fn open_tab(backend: &Arc<InMemoryBackend>, label: &str, settings: PortalSettings) -> DemoPortal {
    let (portal, _) = Portal::start(
        backend.clone(),
        Arc::new(MemoryCredentialStorage::default()),
        Arc::new(ConsoleNavigator::new(label)),
        settings,
    );
    portal
}

async fn post_jobs(tab: &DemoPortal, admin: &Identity) -> Result<Vec<Job>, AppError> {
    println!("\nPosting jobs as {}", admin.display_name());
    let mut posted = Vec::new();
    for (title, status) in [
        ("Backend Engineer", JobStatus::Open),
        ("Data Analyst", JobStatus::Closed),
    ] {
        let draft = JobDraft {
            title: title.to_string(),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            description: format!("{title} for the payments platform."),
            requirements: Some("3+ years of production experience".to_string()),
            status,
        };
        let job = tab.settle(tab.desk().post_job(admin, &draft).await)?;
        println!("  {} {} [{}]", job.id, job.title, job.status.label());
        posted.push(job);
    }
    Ok(posted)
}

async fn register_candidate(tab: &DemoPortal) -> Result<Identity, AppError> {
    println!("\nCandidate registration");
    let mut profile = RegistrationProfile {
        first_name: "Mei".to_string(),
        last_name: "Tanaka".to_string(),
        email: "mei.tanaka@mail.dev".to_string(),
        password: "password".to_string(),
        confirm_password: "password".to_string(),
        role: Role::Candidate,
        skills: vec!["rust".to_string(), "postgres".to_string()],
    };
    if let Err(err) = tab.session().register(&profile).await {
        println!("  Rejected locally: {err}");
    }

    profile.password = "Harbour2024".to_string();
    profile.confirm_password = profile.password.clone();
    let identity = tab.session().register(&profile).await?;
    println!("  Registered {} as {}", identity.display_name(), identity.id());
    Ok(identity)
}

async fn apply_once(
    tab: &DemoPortal,
    candidate: &Identity,
    job: &Job,
) -> Result<Application, AppError> {
    println!("\nJob board without a resume on file");
    let board = tab.settle(tab.desk().candidate_board(candidate, false).await)?;
    for listing in &board.listings {
        println!("  {}: {}", listing.job.title, listing.eligibility.summary());
    }

    println!("Job board with a resume on file");
    let board = tab.settle(tab.desk().candidate_board(candidate, true).await)?;
    for listing in &board.listings {
        println!("  {}: {}", listing.job.title, listing.eligibility.summary());
    }

    let job = tab.settle(tab.desk().job_detail(candidate, &job.id).await)?;
    println!("  Opening {} ({}, {})", job.title, job.location, job.status.label());
    let record = CandidateRecord::new(true, board.applications);
    let application = tab.settle(tab.desk().apply(candidate, &job, &record).await)?;
    println!(
        "  Applied to {} ({}), stage {}",
        job.title,
        application.id,
        application.current_stage()
    );

    let board = tab.settle(tab.desk().candidate_board(candidate, true).await)?;
    let record = CandidateRecord::new(true, board.applications);
    match tab.desk().apply(candidate, &job, &record).await {
        Ok(duplicate) => println!("  Unexpected second application {}", duplicate.id),
        Err(err) => println!("  Second application refused: {err}"),
    }
    Ok(application)
}

async fn schedule_rounds(
    tab: &DemoPortal,
    recruiter: &Identity,
    job: &Job,
    application: &Application,
) -> Result<(), AppError> {
    println!("\nScheduling interviews as {}", recruiter.display_name());
    let pipeline = tab.settle(tab.desk().job_pipeline(recruiter, &job.id).await)?;
    println!("  {} application(s) for {}", pipeline.len(), job.title);

    let late = InterviewPlan {
        interviewer_id: "u-300".into(),
        interview_type: InterviewType::InitialScreening,
        scheduled_time: Utc::now() - Duration::hours(2),
        details: None,
    };
    if let Err(err) = tab.desk().schedule_interview(recruiter, application, late).await {
        println!("  Refused: {err}");
    }

    let tomorrow = Utc::now() + Duration::days(1);
    for (interviewer, interview_type, offset, details) in [
        ("u-300", InterviewType::InitialScreening, 0, "Video call, 45 minutes"),
        ("u-301", InterviewType::Director, 2, ""),
    ] {
        let plan = InterviewPlan {
            interviewer_id: interviewer.into(),
            interview_type,
            scheduled_time: tomorrow + Duration::days(offset),
            details: Some(details.to_string()),
        };
        let interview = tab.settle(
            tab.desk()
                .schedule_interview(recruiter, application, plan)
                .await,
        )?;
        println!(
            "  {} {} with {} at {}",
            interview.id,
            interview.interview_type,
            interview.interviewer_id,
            interview.scheduled_time.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn record_round(
    backend: &Arc<InMemoryBackend>,
    settings: PortalSettings,
    (email, label): (&str, &str),
    application: &Application,
    submission: ResultSubmission,
) -> Result<(), AppError> {
    let tab = open_tab(backend, label, settings);
    let interviewer = tab.session().login(email, "Portal2024").await?;
    println!("\nInterviewer {}", interviewer.display_name());

    let queue = tab.settle(tab.desk().interviewer_queue(&interviewer).await)?;
    let Some(interview) = queue.iter().find(|interview| interview.result.is_pending()) else {
        println!("  Nothing pending");
        return Ok(());
    };
    println!("  Pending: {} {}", interview.id, interview.interview_type);

    let application = current_copy(backend, application).await?;

    let mut incomplete = submission.clone();
    incomplete.scores = ScoreForm::new().with(Criterion::LogicBuilding, 4);
    if let Err(err) = tab
        .desk()
        .submit_interview_result(&interviewer, &application, &interview.id, &incomplete)
        .await
    {
        println!("  Incomplete form refused: {err}");
    }

    let outcome = tab.settle(
        tab.desk()
            .submit_interview_result(&interviewer, &application, &interview.id, &submission)
            .await,
    )?;
    println!(
        "  Recorded {} -> application now {}",
        outcome.interview.result.label(),
        outcome.projected_stage
    );

    tab.session().logout().await;
    Ok(())
}

/// Fresh server copy of the application, so the stage reflects earlier rounds.
async fn current_copy(
    backend: &Arc<InMemoryBackend>,
    known: &Application,
) -> Result<Application, AppError> {
    let application = backend
        .applications_for_job(&known.job_id)
        .await?
        .into_iter()
        .find(|application| application.id == known.id)
        .unwrap_or_else(|| known.clone());
    Ok(application)
}
