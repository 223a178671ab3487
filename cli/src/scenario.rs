use std::fmt;
use std::fs;
use std::path::Path;

use counter_forge::{Address, CallReceipt, CounterClient, Session};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// A scenario file.
///
/// ```toml
/// name = "owner resets"
///
/// [[step]]
/// call = "inc_by"
/// by = 5
///
/// [[step]]
/// call = "reset"
/// from = 1
/// expect = "unauthorized"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::MissingScenario(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// One `[[step]]` table: the `call` tag and its arguments, plus the
/// optional `from` and `expect` keys. Any other key is rejected.
#[derive(Debug, Deserialize)]
#[serde(try_from = "toml::Table")]
pub struct Step {
    pub call: Call,
    /// Index of the sending account.
    pub from: usize,
    pub expect: Expect,
}

impl TryFrom<toml::Table> for Step {
    type Error = String;

    fn try_from(mut table: toml::Table) -> std::result::Result<Self, Self::Error> {
        let from = table
            .remove("from")
            .map(toml::Value::try_into)
            .transpose()
            .map_err(|err| format!("invalid `from`: {err}"))?
            .unwrap_or_default();
        let expect = table
            .remove("expect")
            .map(toml::Value::try_into)
            .transpose()
            .map_err(|err| format!("invalid `expect`: {err}"))?
            .unwrap_or_default();

        let call: Call = toml::Value::Table(table.clone())
            .try_into()
            .map_err(|err| err.to_string())?;
        if let Some(key) = table
            .keys()
            .find(|key| *key != "call" && !call.arguments().contains(&key.as_str()))
        {
            return Err(format!("unknown key `{key}` in a `{call}` step"));
        }

        Ok(Self { call, from, expect })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    Inc,
    IncBy { by: u64 },
    Dec,
    DecBy { by: u64 },
    Reset,
    StoreData { data: String },
    TransferOwnership { to: AccountRef },
}

impl Call {
    /// Keys the call takes besides `call`.
    fn arguments(&self) -> &'static [&'static str] {
        match self {
            Self::IncBy { .. } | Self::DecBy { .. } => &["by"],
            Self::StoreData { .. } => &["data"],
            Self::TransferOwnership { .. } => &["to"],
            Self::Inc | Self::Dec | Self::Reset => &[],
        }
    }

    fn execute(
        &self,
        counter: &CounterClient,
        session: &mut Session,
        sender: Address,
    ) -> counter_forge::Result<CallReceipt<()>> {
        match self {
            Self::Inc => counter.inc(session, sender),
            Self::IncBy { by } => counter.inc_by(session, sender, *by),
            Self::Dec => counter.dec(session, sender),
            Self::DecBy { by } => counter.dec_by(session, sender, *by),
            Self::Reset => counter.reset(session, sender),
            Self::StoreData { data } => counter.store_data(session, sender, data),
            Self::TransferOwnership { to } => {
                let new_owner = to.resolve(session)?;
                counter.transfer_ownership(session, sender, new_owner)
            }
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inc => write!(f, "inc()"),
            Self::IncBy { by } => write!(f, "inc_by({by})"),
            Self::Dec => write!(f, "dec()"),
            Self::DecBy { by } => write!(f, "dec_by({by})"),
            Self::Reset => write!(f, "reset()"),
            Self::StoreData { data } => write!(f, "store_data({data:?})"),
            Self::TransferOwnership { to } => write!(f, "transfer_ownership({to})"),
        }
    }
}

/// An account given either by index or by address.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Index(usize),
    Address(Address),
}

impl AccountRef {
    fn resolve(&self, session: &Session) -> counter_forge::Result<Address> {
        match self {
            Self::Index(index) => session.account(*index),
            Self::Address(address) => Ok(*address),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "account #{index}"),
            Self::Address(address) => write!(f, "{address}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    /// The call is confirmed.
    #[default]
    Ok,
    /// The call reverts for any reason.
    Revert,
    /// The call reverts on an access-control check.
    Unauthorized,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub call: String,
    pub from: Address,
    pub expect: Expect,
    pub passed: bool,
    pub block_height: Option<u64>,
    pub events: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct EventSummary {
    pub increments: usize,
    pub decrements: usize,
    pub resets: usize,
    pub data_stored: Vec<String>,
    pub ownership_transfers: usize,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub name: Option<String>,
    pub contract: Address,
    pub deployed_at: u64,
    pub block_height: u64,
    pub x: u64,
    pub replayed: u64,
    pub owner: Address,
    pub events: EventSummary,
    pub steps: Vec<StepReport>,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.passed)
    }
}

/// Deploys a fresh counter from the session's deployer and runs every step,
/// recording whether each call behaved as expected.
pub fn execute(session: &mut Session, scenario: &Scenario) -> Result<Report> {
    let deployer = session.deployer();
    let counter = CounterClient::deploy(session, deployer)?;

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let step_no = index + 1;
        let sender = session.account(step.from)?;
        let outcome = step.call.execute(&counter, session, sender);

        let passed = match (&outcome, step.expect) {
            (Ok(_), Expect::Ok) => true,
            (Err(err), Expect::Revert) => err.revert_reason().is_some(),
            (Err(err), Expect::Unauthorized) => err.is_unauthorized(),
            _ => false,
        };

        tracing::debug!(step = step_no, call = %step.call, passed, "scenario step");

        steps.push(StepReport {
            step: step_no,
            call: step.call.to_string(),
            from: sender,
            expect: step.expect,
            passed,
            block_height: outcome.as_ref().ok().map(|receipt| receipt.block_height),
            events: outcome
                .as_ref()
                .map(|receipt| receipt.events.iter().map(|e| e.topic.clone()).collect())
                .unwrap_or_default(),
            error: outcome.as_ref().err().map(ToString::to_string),
        });
    }

    let from = counter.deployed_at();
    let events = EventSummary {
        increments: counter.increments(session, from)?.len(),
        decrements: counter.decrements(session, from)?.len(),
        resets: counter.resets(session, from)?.len(),
        data_stored: counter
            .data_stored(session, from)?
            .iter()
            .map(|event| crate::ui::format_digest(&event.args.data))
            .collect(),
        ownership_transfers: counter.ownership_transfers(session, from)?.len(),
    };

    Ok(Report {
        name: scenario.name.clone(),
        contract: counter.address(),
        deployed_at: from,
        block_height: session.block_height(),
        x: counter.x(session)?,
        replayed: counter.replay(session)?,
        owner: counter.owner(session)?,
        events,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use counter_forge::ChainConfig;

    use super::*;

    fn session() -> Session {
        Session::ephemeral(ChainConfig {
            accounts: 3,
            genesis_timestamp: Some(1),
            ..ChainConfig::default()
        })
        .expect("session")
    }

    #[test]
    fn parses_every_call_kind() {
        let scenario: Scenario = toml::from_str(
            r#"
            name = "all"

            [[step]]
            call = "inc"

            [[step]]
            call = "inc_by"
            by = 3

            [[step]]
            call = "dec"

            [[step]]
            call = "dec_by"
            by = 1

            [[step]]
            call = "store_data"
            data = "hello"

            [[step]]
            call = "transfer_ownership"
            to = 2

            [[step]]
            call = "reset"
            from = 2
            "#,
        )
        .expect("parse scenario");

        assert_eq!(scenario.steps.len(), 7);
        assert!(matches!(scenario.steps[1].call, Call::IncBy { by: 3 }));
        assert!(matches!(
            scenario.steps[5].call,
            Call::TransferOwnership {
                to: AccountRef::Index(2)
            }
        ));
        assert_eq!(scenario.steps[6].from, 2);
        assert_eq!(scenario.steps[6].expect, Expect::Ok);
    }

    #[test]
    fn accepts_addresses_as_transfer_targets() {
        let target = Address::from_bytes([0x11; 20]);
        let doc = format!("[[step]]\ncall = \"transfer_ownership\"\nto = \"{target}\"\n");
        let scenario: Scenario = toml::from_str(&doc).expect("parse scenario");

        assert!(matches!(
            scenario.steps[0].call,
            Call::TransferOwnership {
                to: AccountRef::Address(address)
            } if address == target
        ));
    }

    #[test]
    fn rejects_unknown_calls() {
        let err = toml::from_str::<Scenario>("[[step]]\ncall = \"explode\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn rejects_misspelled_step_keys() {
        let err = toml::from_str::<Scenario>("[[step]]\ncall = \"reset\"\nform = 1\n")
            .expect_err("typo in `from`");
        assert!(err.to_string().contains("unknown key `form`"));

        let err = toml::from_str::<Scenario>("[[step]]\ncall = \"inc\"\nby = 2\n")
            .expect_err("inc takes no argument");
        assert!(err.to_string().contains("unknown key `by`"));
    }

    #[test]
    fn execute_reports_expectations() {
        let scenario: Scenario = toml::from_str(
            r#"
            [[step]]
            call = "inc_by"
            by = 6

            [[step]]
            call = "reset"
            from = 1
            expect = "unauthorized"

            [[step]]
            call = "dec_by"
            by = 10
            expect = "revert"

            [[step]]
            call = "store_data"
            data = "test data"

            [[step]]
            call = "dec"
            "#,
        )
        .expect("parse scenario");

        let mut session = session();
        let report = execute(&mut session, &scenario).expect("execute");

        assert_eq!(report.failures().count(), 0);
        assert_eq!(report.x, 5);
        assert_eq!(report.replayed, 5);
        assert_eq!(report.events.increments, 1);
        assert_eq!(report.events.decrements, 1);
        assert_eq!(report.events.data_stored.len(), 1);
        assert_eq!(report.steps[0].events, ["Increment"]);
        assert!(report.steps[1].error.as_deref().is_some_and(|e| e.contains("Unauthorized")));
    }

    #[test]
    fn execute_flags_unmet_expectations() {
        let scenario: Scenario = toml::from_str(
            r#"
            [[step]]
            call = "store_data"
            data = "x"
            from = 1
            "#,
        )
        .expect("parse scenario");

        let mut session = session();
        let report = execute(&mut session, &scenario).expect("execute");

        let failed: Vec<_> = report.failures().map(|s| s.step).collect();
        assert_eq!(failed, [1]);
    }

    #[test]
    fn unknown_sender_index_is_an_error() {
        let scenario: Scenario =
            toml::from_str("[[step]]\ncall = \"inc\"\nfrom = 9\n").expect("parse scenario");

        let mut session = session();
        let err = execute(&mut session, &scenario).expect_err("unknown account");
        assert!(matches!(
            err,
            CliError::Chain(counter_forge::Error::UnknownAccount(9))
        ));
    }
}
