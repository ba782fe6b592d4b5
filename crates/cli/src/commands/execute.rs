//! `execute`: run a driver-side script.

use serde_json::json;

use super::find::describe;
use super::parse_value;
use crate::context::CommandContext;
use crate::error::Result;
use crate::output::emit_success;

pub async fn execute(ctx: &CommandContext, script: &str, raw_args: &[String], element: bool) -> Result<()> {
	let args: Vec<_> = raw_args.iter().map(|raw| parse_value(raw)).collect();
	let inputs = json!({ "script": script, "args": args });
	let session = ctx.session()?;

	if element {
		let found = session.execute_element(script, args).await?;
		let data = describe(&found, &[]).await?;
		emit_success("execute", inputs, data, ctx.format);
	} else {
		let value = session.execute(script, args).await?;
		emit_success("execute", inputs, value, ctx.format);
	}
	Ok(())
}
