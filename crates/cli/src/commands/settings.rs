//! `settings get | set`.

use serde_json::{Value, json};

use super::parse_pairs;
use crate::context::CommandContext;
use crate::error::Result;
use crate::output::emit_success;

pub async fn get(ctx: &CommandContext) -> Result<()> {
	let settings = ctx.session()?.settings().await?;
	emit_success("settings get", Value::Null, Value::Object(settings), ctx.format);
	Ok(())
}

pub async fn set(ctx: &CommandContext, pairs: &[String]) -> Result<()> {
	let partial = parse_pairs(pairs)?;
	let inputs = json!({ "settings": partial });
	let updated = ctx.session()?.update_settings(partial).await?;
	emit_success("settings set", inputs, Value::Object(updated), ctx.format);
	Ok(())
}
