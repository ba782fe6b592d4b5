//! `find`: locate elements and report their text and attributes.

use appdrive::{Element, Locator, LocatorStrategy};
use serde_json::{Map, Value, json};

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{ElementData, FindData, emit_success};

pub struct FindArgs {
	pub using: LocatorStrategy,
	pub value: String,
	pub all: bool,
	pub within: Option<String>,
	pub attributes: Vec<String>,
}

/// Reads text and the requested attributes of `element`.
pub(crate) async fn describe(element: &Element, attributes: &[String]) -> Result<ElementData> {
	let text = element.text().await?;
	let mut attrs = Map::new();
	for name in attributes {
		let value = element.attribute(name).await?.map_or(Value::Null, Value::String);
		attrs.insert(name.clone(), value);
	}
	Ok(ElementData {
		id: element.id().to_string(),
		text: Some(text),
		attributes: attrs,
	})
}

pub async fn execute(ctx: &CommandContext, args: FindArgs) -> Result<()> {
	let session = ctx.session()?;
	let locator = Locator::new(args.using, args.value);

	let elements = match (&args.within, args.all) {
		(Some(root), true) => session.element(root.clone()).find_elements(locator.clone()).await?,
		(Some(root), false) => vec![session.element(root.clone()).find_element(locator.clone()).await?],
		(None, true) => session.find_elements(locator.clone()).await?,
		(None, false) => vec![session.find_element(locator.clone()).await?],
	};

	let mut described = Vec::with_capacity(elements.len());
	for element in &elements {
		described.push(describe(element, &args.attributes).await?);
	}

	emit_success(
		"find",
		json!({
			"using": locator.using.as_str(),
			"value": locator.value,
			"all": args.all,
			"within": args.within,
		}),
		FindData {
			locator: locator.to_string(),
			count: described.len(),
			elements: described,
		},
		ctx.format,
	);
	Ok(())
}
