//! User-facing error message construction.
//!
//! Responsibilities:
//! - Assemble the multi-line message attached to missing/invalid value errors.
//! - Allow a `ConfigManager` to swap in a custom builder.
//!
//! Invariants:
//! - Lines are joined with `\n`; empty lines are dropped.
//! - The key line and option-docs line only appear when a key is known.

use std::sync::Arc;

use crate::namespace::{Namespace, generate_uppercase_key};

/// Everything a message builder gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct MsgContext<'a> {
    pub namespace: Option<&'a Namespace>,
    pub key: Option<&'a str>,
    pub parser: Option<&'a str>,
    pub msg: &'a str,
    pub option_doc: &'a str,
    pub config_doc: &'a str,
}

/// Pluggable message builder.
pub type MsgBuilder = Arc<dyn Fn(&MsgContext<'_>) -> String + Send + Sync>;

pub(crate) fn default_msg_builder() -> MsgBuilder {
    Arc::new(build_msg)
}

/// Default message layout:
///
/// ```text
/// <msg>
/// <FULL_KEY> requires a value parseable by <parser>
/// <FULL_KEY> docs: <option_doc>
/// Project docs: <config_doc>
/// ```
pub fn build_msg(ctx: &MsgContext<'_>) -> String {
    let mut lines: Vec<String> = vec![ctx.msg.to_string()];

    let full_key = match (ctx.key, ctx.parser) {
        (Some(key), Some(parser)) => {
            let root = Namespace::root();
            let full_key = generate_uppercase_key(key, ctx.namespace.unwrap_or(&root));
            lines.push(format!("{full_key} requires a value parseable by {parser}"));
            Some(full_key)
        }
        _ => None,
    };

    if let Some(full_key) = full_key
        && !ctx.option_doc.is_empty()
    {
        lines.push(format!("{full_key} docs: {}", ctx.option_doc));
    }
    if !ctx.config_doc.is_empty() {
        lines.push(format!("Project docs: {}", ctx.config_doc));
    }

    lines.retain(|line| !line.is_empty());
    lines.join("\n")
}
