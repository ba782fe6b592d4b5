//! Shared fixtures: a UICatalog-like app served by the loopback driver.

#![allow(dead_code)]

use appdrive::{Capabilities, Driver, LoopbackDriver, Platform, Session, UiNode};

pub const BUTTONS_CELL: &str = "Buttons, Various uses of UIButton";
pub const TEXT_FIELDS_CELL: &str = "TextFields, Uses of UITextField";

pub fn catalog() -> LoopbackDriver {
	let main = UiNode::new("window").child(
		UiNode::new("tableView").with_class("UIATableView").children([
			UiNode::new("cell")
				.with_name(BUTTONS_CELL)
				.navigates_to("buttons")
				.child(UiNode::new("text").with_name(BUTTONS_CELL)),
			UiNode::new("cell")
				.with_name("Controls, Various uses of UIControl")
				.child(UiNode::new("text").with_name("Controls, Various uses of UIControl")),
			UiNode::new("cell")
				.with_name(TEXT_FIELDS_CELL)
				.navigates_to("textfields")
				.child(UiNode::new("text").with_name(TEXT_FIELDS_CELL)),
		]),
	);

	let buttons = UiNode::new("window").children([
		UiNode::new("navigationBar")
			.with_name("Buttons")
			.child(UiNode::new("button").with_name("UICatalog")),
		UiNode::new("tableView").children([
			UiNode::new("cell").child(
				UiNode::new("button")
					.with_id("grayButton")
					.with_name("Gray")
					.with_class("UIAButton"),
			),
			UiNode::new("cell").child(UiNode::new("button").with_name("Image").with_class("UIAButton")),
			UiNode::new("cell").child(UiNode::new("button").with_name("Disabled").hidden()),
		]),
	]);

	let text_fields = UiNode::new("window").child(
		UiNode::new("tableView").children([
			UiNode::new("cell").child(UiNode::new("textfield").with_name("Normal").with_value("")),
			UiNode::new("cell").child(
				UiNode::new("group").child(UiNode::new("textfield").with_name("Nested").with_value("deep")),
			),
			UiNode::new("cell").child(UiNode::new("textfield").with_name("Rounded").with_value("rounded")),
		]),
	);

	LoopbackDriver::new(main)
		.with_screen("buttons", buttons)
		.with_screen("textfields", text_fields)
}

pub async fn catalog_session() -> Session {
	session_on(catalog().into_driver()).await
}

pub async fn session_on(driver: Driver) -> Session {
	let caps: Capabilities = Platform::Ios.capabilities().app("UICatalog");
	driver.new_session(caps).await.unwrap()
}
