use inspector_session::models::server::{
    is_reserved_key, Protocol, ServerAuth, ServerParams, ServerType, ADD_CLOUD_PROVIDER_KEY,
    REMOTE_KEY,
};
use inspector_session::models::tabs::{ServerTab, WorkflowTab};
use inspector_session::AppError;
use serde_json::json;

#[test]
fn server_type_parses_keys() {
    assert_eq!(ServerType::parse("remote").unwrap(), ServerType::Remote);
    assert_eq!(
        ServerType::parse("browserstack").unwrap(),
        ServerType::Provider("browserstack".into())
    );
    assert!(matches!(ServerType::parse(""), Err(AppError::Provider(_))));
    assert!(matches!(
        ServerType::parse(ADD_CLOUD_PROVIDER_KEY),
        Err(AppError::Provider(_))
    ));
}

#[test]
fn server_type_serializes_as_its_key() {
    assert_eq!(serde_json::to_value(ServerType::Remote).unwrap(), json!("remote"));
    assert_eq!(
        serde_json::to_value(ServerType::Provider("kobiton".into())).unwrap(),
        json!("kobiton")
    );
    let parsed: ServerType = serde_json::from_value(json!("kobiton")).unwrap();
    assert_eq!(parsed.key(), "kobiton");
}

#[test]
fn reserved_keys() {
    assert!(is_reserved_key(REMOTE_KEY));
    assert!(is_reserved_key(ADD_CLOUD_PROVIDER_KEY));
    assert!(!is_reserved_key("sauce"));
}

#[test]
fn base_url_joins_parts() {
    let mut params = ServerParams::empty(ServerType::Remote);
    params.host = "127.0.0.1".into();
    params.port = Some(4723);
    assert_eq!(params.base_url().unwrap(), "http://127.0.0.1:4723");

    params.path = "/wd/hub/".into();
    assert_eq!(params.base_url().unwrap(), "http://127.0.0.1:4723/wd/hub");

    params.path = "wd/hub".into();
    params.port = None;
    params.protocol = Protocol::Https;
    assert_eq!(params.base_url().unwrap(), "https://127.0.0.1/wd/hub");
}

#[test]
fn base_url_needs_a_host() {
    let params = ServerParams::empty(ServerType::Provider("perfecto".into()));
    let err = params.base_url().unwrap_err();
    assert!(matches!(err, AppError::Config(ref msg) if msg.contains("perfecto")));
}

#[test]
fn server_params_use_camel_case() {
    let mut params = ServerParams::empty(ServerType::Provider("sauce".into()));
    params.host = "h".into();
    params.auth = Some(ServerAuth {
        username: "u".into(),
        access_key: "k".into(),
    });
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["serverType"], json!("sauce"));
    assert_eq!(value["auth"]["accessKey"], json!("k"));
    assert_eq!(value["protocol"], json!("http"));
}

#[test]
fn server_params_fill_defaults() {
    let params: ServerParams = serde_json::from_value(json!({"serverType": "remote"})).unwrap();
    assert_eq!(params, ServerParams::empty(ServerType::Remote));
}

#[test]
fn tab_keys_round_trip_through_from_str() {
    for tab in WorkflowTab::ALL {
        assert_eq!(tab.as_str().parse::<WorkflowTab>().unwrap(), tab);
    }
    assert!("history".parse::<WorkflowTab>().is_err());

    assert_eq!(
        ADD_CLOUD_PROVIDER_KEY.parse::<ServerTab>().unwrap(),
        ServerTab::AddCloudProvider
    );
    assert_eq!(
        "remote".parse::<ServerTab>().unwrap(),
        ServerTab::Server(ServerType::Remote)
    );
    assert_eq!(ServerTab::AddCloudProvider.key(), ADD_CLOUD_PROVIDER_KEY);
}
