use serde::Serialize;

use crate::error::DispatchError;
use crate::invoker::CliInvoker;

/// `wh` subcommand printing the installed modules, whitespace separated
pub const LIST_SUBCOMMAND: &str = "getmodulelist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleList {
    pub modules: Vec<String>,
    pub count: usize,
}

impl ModuleList {
    pub fn parse(output: &str) -> Self {
        let modules: Vec<String> = output.split_whitespace().map(String::from).collect();
        Self {
            count: modules.len(),
            modules,
        }
    }
}

pub async fn execute(invoker: &CliInvoker) -> Result<String, DispatchError> {
    let output = invoker.invoke(LIST_SUBCOMMAND, &[]).await?;
    Ok(serde_json::to_string_pretty(&ModuleList::parse(&output))?)
}
