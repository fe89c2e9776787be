//! Scenario isolation
//!
//! Scenarios leave correlation data (DIDs, connection records, VDR urls) in
//! actor memory. Left alone it leaks into the next scenario's assertions, so
//! after every scenario the manager scrubs each actor back to the run-level
//! configuration it was given at start-up.

use harness_core::{
    connection_key, Actor, HarnessError, PreservedKeySet, Stage, DEFAULT_ROSTER,
};
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, instrument, warn};

/// Which keys a scrub removes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrubPolicy {
    /// Everything the actor remembers except the preserved keys.
    #[default]
    AllExceptPreserved,
    /// A closed list of scenario keys, plus `connection-with-<name>` for every
    /// roster name. Keys not on the list survive.
    Explicit(BTreeSet<String>),
}

impl ScrubPolicy {
    pub fn explicit<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScrubPolicy::Explicit(keys.into_iter().map(Into::into).collect())
    }
}

/// Which actors a scrub visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roster {
    /// A fixed list of names; names outside it are never scrubbed.
    Fixed(Vec<String>),
    /// Every actor currently registered on the stage.
    Registered,
}

impl Roster {
    pub fn fixed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Roster::Fixed(names.into_iter().map(Into::into).collect())
    }

    fn names(&self, stage: &Stage) -> Vec<String> {
        match self {
            Roster::Fixed(names) => names.clone(),
            Roster::Registered => stage.names(),
        }
    }
}

impl Default for Roster {
    fn default() -> Self {
        Roster::fixed(DEFAULT_ROSTER.iter().copied())
    }
}

/// Result of one isolation pass. Warnings never fail the scenario.
#[derive(Debug, Default)]
pub struct IsolationReport {
    pub scenario: String,
    pub actors_scrubbed: Vec<String>,
    pub actors_skipped: Vec<String>,
    pub keys_removed: usize,
    pub warnings: Vec<HarnessError>,
}

impl IsolationReport {
    fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioIsolation {
    preserved: PreservedKeySet,
    policy: ScrubPolicy,
    roster: Roster,
}

impl ScenarioIsolation {
    pub fn new(preserved: PreservedKeySet, policy: ScrubPolicy, roster: Roster) -> Self {
        Self {
            preserved,
            policy,
            roster,
        }
    }

    pub fn with_policy(mut self, policy: ScrubPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn preserved(&self) -> &PreservedKeySet {
        &self.preserved
    }

    /// Reserved for per-scenario setup. Run-level configuration set up before
    /// the first scenario is left alone.
    pub fn before_scenario(&self, _stage: &Stage, scenario: &str) {
        debug!(scenario, "starting scenario");
    }

    /// Scrub every roster actor. Never fails: problems end up as warnings in
    /// the report and in the log.
    #[instrument(skip(self, stage))]
    pub fn after_scenario(&self, stage: &Stage, scenario: &str) -> IsolationReport {
        let report = self.scrub_stage_with(stage, scenario, |actor, roster, report| {
            self.scrub_actor(actor, roster, report)
        });

        for warning in &report.warnings {
            if warning.is_housekeeping() {
                warn!(scenario, %warning, "failed to clear actor memory");
            } else {
                error!(scenario, %warning, "unexpected failure while clearing actor memory");
            }
        }
        info!(
            scenario,
            scrubbed = report.actors_scrubbed.len(),
            skipped = report.actors_skipped.len(),
            removed = report.keys_removed,
            "actor memory cleared"
        );
        report
    }

    /// Run `scrub` for every roster actor on the stage. A panic inside one
    /// actor's scrub becomes a warning and the pass moves on to the next actor.
    fn scrub_stage_with<F>(&self, stage: &Stage, scenario: &str, scrub: F) -> IsolationReport
    where
        F: Fn(&Actor, &[String], &mut IsolationReport),
    {
        let mut report = IsolationReport::new(scenario);
        let roster = self.roster.names(stage);

        for name in &roster {
            match stage.find(name) {
                Ok(actor) => {
                    let scrubbed =
                        catch_unwind(AssertUnwindSafe(|| scrub(&actor, &roster, &mut report)));
                    if let Err(payload) = scrubbed {
                        report.warnings.push(HarnessError::IsolationCleanup {
                            actor: name.clone(),
                            reason: panic_message(payload.as_ref()),
                        });
                    }
                }
                Err(HarnessError::ActorNotFound { .. }) => {
                    debug!(actor = %name, "actor not on stage, skipping");
                    report.actors_skipped.push(name.clone());
                }
                Err(other) => report.warnings.push(other),
            }
        }
        report
    }

    /// Remove the scenario keys from one actor, accumulating per-key failures.
    pub fn scrub_actor(&self, actor: &Actor, roster: &[String], report: &mut IsolationReport) {
        if actor.is_retired() {
            report.warnings.push(HarnessError::IsolationCleanup {
                actor: actor.name().to_string(),
                reason: "actor was retired".to_string(),
            });
            return;
        }

        for key in self.keys_to_scrub(actor, roster) {
            match actor.try_forget(&key) {
                Ok(Some(_)) => report.keys_removed += 1,
                Ok(None) => {}
                Err(err) => report.warnings.push(HarnessError::IsolationCleanup {
                    actor: actor.name().to_string(),
                    reason: format!("could not forget '{key}': {err}"),
                }),
            }
        }
        report.actors_scrubbed.push(actor.name().to_string());
    }

    /// Keys the policy selects for `actor`, never including preserved keys.
    pub fn keys_to_scrub(&self, actor: &Actor, roster: &[String]) -> BTreeSet<String> {
        let candidates: BTreeSet<String> = match &self.policy {
            ScrubPolicy::AllExceptPreserved => actor.keys().into_iter().collect(),
            ScrubPolicy::Explicit(keys) => keys
                .iter()
                .cloned()
                .chain(roster.iter().map(|name| connection_key(name)))
                .collect(),
        };

        candidates
            .into_iter()
            .filter(|key| !self.preserved.contains(key))
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic during isolation".to_string()
    }
}
