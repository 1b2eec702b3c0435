use chrono::Utc;
use clap::Args;
use hiring_portal::access::{capabilities, default_route, RoleMismatchPolicy, RouteGuard};
use hiring_portal::config::AppConfig;
use hiring_portal::error::AppError;
use hiring_portal::session::{decode_claims, Identity, SessionError};

#[derive(Args, Debug)]
pub(crate) struct TokenInspectArgs {
    /// Bearer credential as issued by `auth/login`
    pub(crate) token: String,
}

#[derive(Args, Debug)]
pub(crate) struct RouteCheckArgs {
    /// Path to evaluate, e.g. /recruiter/jobs/42
    pub(crate) path: String,
    /// Credential of the user navigating; omit to evaluate as a visitor
    #[arg(long)]
    pub(crate) token: Option<String>,
    /// Role mismatch policy (login | dashboard). Defaults to PORTAL_ROLE_MISMATCH.
    #[arg(long, value_parser = hiring_portal::config::parse_role_mismatch)]
    pub(crate) policy: Option<RoleMismatchPolicy>,
}

pub(crate) fn run_token_inspect(args: TokenInspectArgs) -> Result<(), AppError> {
    let claims = decode_claims(&args.token).map_err(SessionError::from)?;
    let identity = claims.identity();
    let now = Utc::now();

    println!("== Credential ==");
    println!("User     : {} ({})", identity.display_name(), identity.id());
    if let Some(email) = identity.email() {
        println!("Email    : {email}");
    }
    println!("Role     : {}", identity.role());
    match claims.expires_at() {
        Some(exp) if claims.is_expired_at(now) => println!("Expires  : {exp} (EXPIRED)"),
        Some(exp) => println!("Expires  : {exp}"),
        None => println!("Expires  : never"),
    }
    println!("Lands on : {}", default_route(identity.role()));

    let granted = capabilities(identity.role());
    if granted.is_empty() {
        println!("Capabilities: none");
    } else {
        println!("Capabilities:");
        for (action, scope) in granted {
            println!("  - {action} ({scope:?})");
        }
    }
    Ok(())
}

pub(crate) fn run_route_check(config: &AppConfig, args: RouteCheckArgs) -> Result<(), AppError> {
    let identity = args.token.as_deref().map(fresh_identity).transpose()?;
    let policy = args.policy.unwrap_or(config.session.role_mismatch);
    let guard = RouteGuard::new(policy);

    let (route, decision) = guard.navigate(identity.as_ref(), &args.path);
    let visitor = identity
        .as_ref()
        .map(|identity| format!("{} ({})", identity.id(), identity.role()))
        .unwrap_or_else(|| "visitor".to_string());

    println!("Route    : {route}");
    println!("Visitor  : {visitor}");
    match route.required_roles() {
        Some(roles) => {
            let roles: Vec<&str> = roles.iter().map(|role| role.label()).collect();
            println!("Requires : {}", roles.join(", "));
        }
        None => println!("Requires : nothing (public)"),
    }
    println!("Policy   : {policy:?}");
    println!("Decision : {decision:?}");
    Ok(())
}

fn fresh_identity(token: &str) -> Result<Identity, AppError> {
    let identity = decode_claims(token)
        .and_then(|claims| claims.into_fresh_identity(Utc::now()))
        .map_err(SessionError::from)?;
    Ok(identity)
}
