//! Task planner: goal decomposition and agent selection.
//!
//! Deliberately simple and keyword-driven. The contract worth preserving is
//! determinism: for a fixed registry, goal string, and pattern list, the
//! same plan comes out every time, so planning is reproducible and
//! testable. Any richer planner may replace this one behind the same
//! contract.

use std::sync::Arc;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::Task;
use crate::domain::similarity::word_set;
use crate::services::access_gate::{AccessGate, OperationClass};
use crate::services::agent_registry::AgentRegistry;

/// Generic steps every goal starts from.
pub const BASE_STEPS: [&str; 2] = ["assess goal viability", "optimize execution strategy"];

/// Domain-specific steps appended when the goal mentions a keyword.
const KEYWORD_STEPS: [(&str, &str); 3] = [
    ("deliver", "optimize delivery routes"),
    ("route", "optimize delivery routes"),
    ("revenue", "draft revenue playbook"),
];

/// Decomposes a goal into ordered subtasks and assigns each to the
/// best-matching registered agent.
pub struct TaskPlanner {
    registry: Arc<AgentRegistry>,
    gate: AccessGate,
}

impl TaskPlanner {
    pub fn new(registry: Arc<AgentRegistry>, gate: AccessGate) -> Self {
        Self { registry, gate }
    }

    /// Plan a goal into tasks. Fails with `Ineligible` when the gate
    /// rejects the score, and with `Worker` when no agent is registered.
    ///
    /// `patterns` are reinforced task descriptions from the evolution
    /// engine; ones sharing a word with the goal are appended as extra
    /// steps, biasing the plan toward what recently worked.
    pub async fn plan(
        &self,
        goal: &str,
        eligibility_score: f64,
        patterns: &[String],
    ) -> SwarmResult<Vec<Task>> {
        self.gate.authorize(eligibility_score, OperationClass::Standard)?;

        let registrations = self.registry.registrations().await;
        if registrations.is_empty() {
            return Err(SwarmError::Worker {
                agent: "<none>".to_string(),
                reason: "no agents registered".to_string(),
            });
        }

        let steps = decompose(goal, patterns);
        let tasks = steps
            .into_iter()
            .map(|step| {
                let assigned_agent = pick_agent(&step, &registrations);
                Task {
                    description: step,
                    assigned_agent,
                    goal: goal.to_string(),
                    eligibility_score,
                }
            })
            .collect();

        Ok(tasks)
    }
}

/// Split a goal into step strings: fixed base sequence, keyword-driven
/// extras, then matching reinforced patterns. Duplicates are dropped while
/// preserving first-seen order.
fn decompose(goal: &str, patterns: &[String]) -> Vec<String> {
    let goal_lower = goal.to_lowercase();
    let mut steps: Vec<String> = BASE_STEPS.iter().map(ToString::to_string).collect();

    for (keyword, step) in KEYWORD_STEPS {
        if goal_lower.contains(keyword) && !steps.iter().any(|s| s == step) {
            steps.push(step.to_string());
        }
    }

    let goal_words = word_set(goal);
    for pattern in patterns {
        let overlaps = word_set(pattern).intersection(&goal_words).next().is_some();
        if overlaps && !steps.iter().any(|s| s == pattern) {
            steps.push(pattern.clone());
        }
    }

    steps
}

/// Pick the agent for a step: the first registration whose specialty tag
/// appears in the step text wins; otherwise the first-registered agent.
fn pick_agent(step: &str, registrations: &[crate::domain::models::AgentRegistration]) -> String {
    let step_lower = step.to_lowercase();
    for reg in registrations {
        let tag = reg.specialty.to_lowercase();
        if !tag.is_empty() && step_lower.contains(&tag) {
            return reg.name.clone();
        }
    }
    registrations[0].name.clone()
}
