use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bozor_auth::{
    AuthorizationGate, FileSessionStore, GateConfig, GateState, ProtectedView, RenderState,
    Requirement,
};
use colored::Colorize;

use crate::cli::CheckArgs;
use crate::output::{print_error, print_success};

/// Exit code for a denied session.
pub const EXIT_DENIED: u8 = 3;

pub async fn check(store: FileSessionStore, config: GateConfig, args: &CheckArgs) -> Result<ExitCode> {
    let requirement = Requirement::new(args.role).with_company(!args.no_company);

    let mut gate = AuthorizationGate::from_config(Arc::new(store), config)
        .context("Failed to set up authorization gate")?;
    if args.trace {
        gate = gate.with_observer(Arc::new(|state: &GateState| {
            eprintln!("{} {}", "→".dimmed(), state);
        }));
    }

    let view = ProtectedView::mount(Arc::new(gate), requirement);
    let outcome = view.resolved().await;
    view.unmount();

    let company = if requirement.require_company {
        "with company"
    } else {
        "company optional"
    };
    match outcome {
        RenderState::Content => {
            print_success(&format!("Allowed: {} ({company})", requirement.role));
            Ok(ExitCode::SUCCESS)
        }
        RenderState::Redirect(route) => {
            print_error(&format!(
                "Denied: {} ({company}) → redirect to {}",
                requirement.role,
                route.cyan()
            ));
            Ok(ExitCode::from(EXIT_DENIED))
        }
        RenderState::Loading => anyhow::bail!("Gate finished without a decision"),
    }
}
