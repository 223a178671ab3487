use colored::Colorize;
use counter_forge::{ChainConfig, Session};

use crate::{
    cli::{ChainOptions, RunArgs},
    error::{CliError, Result},
    scenario::{self, Report, Scenario},
    ui,
};

pub fn load_session(options: &ChainOptions) -> Result<Session> {
    let config = match &options.config {
        Some(path) => {
            if options.verbose {
                ui::status(format!("Loading chain config from {}", path.display()));
            }
            ChainConfig::load(path)?
        }
        None => ChainConfig::default(),
    };
    Ok(Session::ephemeral(config)?)
}

pub fn run(args: RunArgs) -> Result<()> {
    ui::init_tracing(args.chain.verbose);

    let scenario = Scenario::load(&args.scenario)?;
    let mut session = load_session(&args.chain)?;

    ui::status(format!(
        "Running {} ({} steps)",
        scenario
            .name
            .as_deref()
            .unwrap_or_else(|| args.scenario.to_str().unwrap_or("scenario")),
        scenario.steps.len()
    ));

    let report = scenario::execute(&mut session, &scenario)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.replayed != report.x {
        return Err(CliError::Message(format!(
            "event log replays to {} but x() reads {}",
            report.replayed, report.x
        )));
    }

    let failed = report.failures().count();
    if failed > 0 {
        for step in report.failures() {
            let err = CliError::ExpectationFailed {
                step: step.step,
                call: step.call.clone(),
                detail: match &step.error {
                    Some(error) => format!("expected {:?}, got: {error}", step.expect),
                    None => format!("expected {:?}, but the call was confirmed", step.expect),
                },
            };
            ui::error(err.to_string());
        }
        return Err(CliError::ScenarioFailed {
            failed,
            total: report.steps.len(),
        });
    }

    ui::success(format!("All {} steps behaved as expected", report.steps.len()));
    Ok(())
}

fn print_report(report: &Report) {
    println!("contract  {} (block {})", report.contract, report.deployed_at);

    for step in &report.steps {
        let mark = if step.passed {
            "pass".green().bold()
        } else {
            "FAIL".red().bold()
        };
        let outcome = match (&step.block_height, &step.error) {
            (Some(height), _) => format!("block {height} [{}]", step.events.join(", ")),
            (None, Some(error)) => error.clone(),
            (None, None) => String::new(),
        };
        println!("{mark} {:>3}  {:<40} {outcome}", step.step, step.call);
    }

    if report.replayed != report.x {
        ui::warn("event log does not reconcile with the counter value");
    }

    println!("x         {}", report.x);
    println!("owner     {}", report.owner);
    println!(
        "events    {} increment, {} decrement, {} reset, {} data stored, {} ownership transfer",
        report.events.increments,
        report.events.decrements,
        report.events.resets,
        report.events.data_stored.len(),
        report.events.ownership_transfers
    );
    println!("height    {}", report.block_height);
}
