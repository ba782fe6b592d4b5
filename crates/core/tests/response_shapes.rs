//! Client handling of server response shapes the loopback driver never
//! produces: W3C session creation, base64 screenshots and settings updates
//! answered with the merged view.

use std::sync::Arc;

use appdrive::{Capabilities, Driver, Error, Result, Settings, Transport};
use appdrive_protocol::{Command, WireResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

type Reply = Box<dyn Fn(&Command) -> WireResponse + Send + Sync>;

/// Answers every command through `reply` and records command names.
struct Scripted {
	reply: Reply,
	sent: Mutex<Vec<&'static str>>,
}

impl Scripted {
	fn new(reply: impl Fn(&Command) -> WireResponse + Send + Sync + 'static) -> Arc<Self> {
		Arc::new(Self {
			reply: Box::new(reply),
			sent: Mutex::new(Vec::new()),
		})
	}

	fn sent(&self) -> Vec<&'static str> {
		self.sent.lock().clone()
	}
}

#[async_trait]
impl Transport for Scripted {
	async fn execute(&self, _session_id: Option<&str>, command: Command) -> Result<WireResponse> {
		self.sent.lock().push(command.name());
		Ok((self.reply)(&command))
	}
}

fn settings(value: Value) -> Settings {
	match value {
		Value::Object(map) => map,
		other => panic!("not an object: {other}"),
	}
}

#[tokio::test]
async fn w3c_new_session_reads_nested_id_and_capabilities() {
	let transport = Scripted::new(|_| {
		WireResponse::success(
			None,
			json!({
				"sessionId": "w3c-1",
				"capabilities": { "platformName": "iOS", "automationName": "XCUITest" },
			}),
		)
	});
	let driver = Driver::new(transport.clone());

	let session = driver.new_session(Capabilities::new().app("UICatalog")).await.unwrap();
	assert_eq!(session.id(), "w3c-1");
	assert_eq!(session.capabilities()["platformName"], "iOS");
	assert_eq!(session.capabilities()["automationName"], "XCUITest");
	assert!(session.capabilities().get("sessionId").is_none());
	assert_eq!(transport.sent(), vec!["newSession"]);
}

#[tokio::test]
async fn legacy_new_session_keeps_value_as_capabilities() {
	let transport = Scripted::new(|_| WireResponse::success(Some("legacy-1"), json!({ "platformName": "Android" })));
	let session = Driver::new(transport).new_session(Capabilities::new()).await.unwrap();
	assert_eq!(session.id(), "legacy-1");
	assert_eq!(session.capabilities()["platformName"], "Android");
}

#[tokio::test]
async fn new_session_without_id_is_protocol_error() {
	let transport = Scripted::new(|_| WireResponse::success(None, json!({ "platformName": "iOS" })));
	let err = Driver::new(transport).new_session(Capabilities::new()).await.unwrap_err();
	assert!(matches!(err, Error::Protocol(_)), "got {err:?}");
}

#[tokio::test]
async fn screenshot_decodes_wrapped_base64() {
	// "PNG\r\n" plus two arbitrary bytes, wrapped the way some drivers do.
	let transport = Scripted::new(|_| WireResponse::success(Some("s1"), json!("UE5H\nDQr/\r\nAA==\n")));
	let session = Driver::new(transport).attach("s1");
	let png = session.screenshot().await.unwrap();
	assert_eq!(png, b"PNG\r\n\xff\x00".to_vec());
}

#[tokio::test]
async fn screenshot_rejects_invalid_base64() {
	let transport = Scripted::new(|_| WireResponse::success(Some("s1"), json!("not*base64")));
	let err = Driver::new(transport).attach("s1").screenshot().await.unwrap_err();
	assert!(matches!(err, Error::Protocol(_)), "got {err:?}");
}

#[tokio::test]
async fn settings_update_answered_with_merged_view_skips_read() {
	let transport = Scripted::new(|command| match command {
		Command::UpdateSettings(_) => WireResponse::success(
			Some("s1"),
			json!({ "ignoreUnimportantViews": true, "settlers of": "Catan" }),
		),
		_ => WireResponse::success(Some("s1"), json!({})),
	});
	let session = Driver::new(transport.clone()).attach("s1");

	let updated = session
		.update_settings(settings(json!({ "settlers of": "Catan" })))
		.await
		.unwrap();
	assert_eq!(
		Value::Object(updated),
		json!({ "ignoreUnimportantViews": true, "settlers of": "Catan" })
	);
	assert_eq!(transport.sent(), vec!["updateSettings"]);
}

#[tokio::test]
async fn settings_update_answered_with_null_reads_back() {
	let transport = Scripted::new(|command| match command {
		Command::UpdateSettings(_) => WireResponse::success(Some("s1"), Value::Null),
		_ => WireResponse::success(Some("s1"), json!({ "settlers of": "Catan" })),
	});
	let session = Driver::new(transport.clone()).attach("s1");

	let updated = session
		.update_settings(settings(json!({ "settlers of": "Catan" })))
		.await
		.unwrap();
	assert_eq!(updated["settlers of"], "Catan");
	assert_eq!(transport.sent(), vec!["updateSettings", "getSettings"]);
}

#[tokio::test]
async fn settings_update_with_unexpected_value_is_protocol_error() {
	let transport = Scripted::new(|_| WireResponse::success(Some("s1"), json!(true)));
	let err = Driver::new(transport)
		.attach("s1")
		.update_settings(Settings::new())
		.await
		.unwrap_err();
	assert!(matches!(err, Error::Protocol(_)), "got {err:?}");
}
