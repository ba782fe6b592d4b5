use super::*;

#[test]
fn result_builder_success() {
	let result: CommandResult<AppPathData> = ResultBuilder::new("app-path")
		.inputs(serde_json::json!({ "app": "TestApp" }))
		.data(AppPathData {
			app: "TestApp".into(),
			platform: "ios".into(),
			path: "sample-code/apps/TestApp/build/Release-iphonesimulator/TestApp.app".into(),
		})
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "app-path");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.data.is_some());
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error() {
	let result: CommandResult<FindData> = ResultBuilder::new("find")
		.failure(CommandError {
			code: ErrorCode::ElementNotFound,
			message: "no element matches name=Sliders".into(),
			details: None,
		})
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::ElementNotFound);
}

#[test]
fn missing_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("back").build();
	assert!(!result.ok);
}

#[test]
fn error_code_display_matches_serde() {
	for code in [
		ErrorCode::ElementNotFound,
		ErrorCode::PackageNotFound,
		ErrorCode::SessionError,
		ErrorCode::ConnectionFailed,
		ErrorCode::InvalidSelector,
	] {
		let serialized = serde_json::to_value(code).unwrap();
		assert_eq!(serialized, serde_json::Value::String(code.to_string()));
	}
	assert_eq!(ErrorCode::ElementNotFound.to_string(), "ELEMENT_NOT_FOUND");
}

#[test]
fn output_format_parse() {
	assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
	assert_eq!("TOON".parse::<OutputFormat>().unwrap(), OutputFormat::Toon);
	assert!("yaml".parse::<OutputFormat>().is_err());
}

#[test]
fn serialize_command_result_camel_case() {
	let result: CommandResult<SessionData> = ResultBuilder::new("session new")
		.data(SessionData {
			session_id: "abc".into(),
			server: "http://127.0.0.1:4723/wd/hub".into(),
			server_source: None,
			capabilities: serde_json::Value::Null,
		})
		.build();

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["ok"], true);
	assert_eq!(json["schemaVersion"], SCHEMA_VERSION);
	assert_eq!(json["data"]["sessionId"], "abc");
	assert!(json["data"].get("capabilities").is_none());
	assert!(json["timings"]["durationMs"].is_u64());
}
