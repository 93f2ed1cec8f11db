//! Execution plans for `mcpt run`. Plans are only ever displayed; nothing is
//! installed or spawned.

use mcpt_registry::ToolEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub tool_id: String,
    pub tool_name: String,
    pub action: &'static str,
    pub install: PlannedInstall,
    pub args: Vec<String>,
    pub safe_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedInstall {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

pub fn generate_run_plan(tool: &ToolEntry, args: &[String]) -> RunPlan {
    RunPlan {
        tool_id: tool.id.clone(),
        tool_name: tool.name.clone(),
        action: "run",
        install: PlannedInstall {
            kind: tool.install.kind.clone(),
            url: tool.install.url.clone(),
            git_ref: tool.install.default_ref.clone(),
        },
        args: args.to_vec(),
        safe_run: tool.defaults.safe_run,
    }
}

/// Human rendering of a plan under the stub-mode banner.
pub fn render_stub(plan: &RunPlan) -> String {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let args = if plan.args.is_empty() {
        "(none)".to_string()
    } else {
        plan.args.join(" ")
    };
    let rows = [
        ("Tool ID", plan.tool_id.clone()),
        ("Tool Name", plan.tool_name.clone()),
        ("Install Type", dash(&plan.install.kind)),
        ("Git URL", dash(&plan.install.url)),
        ("Git Ref", dash(&plan.install.git_ref)),
        ("Arguments", args),
        ("Safe Run", plan.safe_run.to_string()),
    ];

    let mut out = format!("STUB MODE - would run tool: {}\n\n", plan.tool_id);
    for (key, value) in rows {
        out.push_str(&format!("  {key:<14}{value}\n"));
    }
    out.push_str("\nUse --real to actually execute the tool.");
    out
}
