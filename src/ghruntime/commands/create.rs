use crate::client::{deployment_path, with_query, Body, RemoteClient};
use crate::commands::{require_app, CmdMessage, CmdResult};
use crate::error::{Result, RuntimeError};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct CreateRequest {
    pub environment_variables: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone)]
pub struct CreateOptions {
    pub app: Option<String>,
    /// `key=value` pairs.
    pub env: Vec<String>,
    /// `key=value` pairs.
    pub secrets: Vec<String>,
    pub revision_name: Option<String>,
}

pub fn run<C: RemoteClient>(client: &C, options: &CreateOptions) -> Result<CmdResult> {
    let app = require_app(options.app.as_deref())?;

    let request = CreateRequest {
        environment_variables: parse_pairs("environment variable", &options.env)?,
        secrets: parse_pairs("secret", &options.secrets)?,
    };

    let path = with_query(
        &deployment_path(app),
        &[(
            "revision_name",
            options.revision_name.as_deref().unwrap_or_default(),
        )],
    );
    debug!(app, env = request.environment_variables.len(), secrets = request.secrets.len(), "creating app");

    let response = client.put(&path, Body::json(&request)?)?;

    let mut result = CmdResult::default().with_app(app);
    result.add_message(CmdMessage::success(format!(
        "App created: {}",
        response.text().trim()
    )));
    Ok(result)
}

/// Split each `key=value` pair on its first `=`. Later keys overwrite earlier ones.
pub fn parse_pairs(kind: &'static str, pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| RuntimeError::InvalidPair {
                kind,
                pair: pair.clone(),
            })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryClient;
    use crate::client::Method;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_pairs_splits_on_first_equals() {
        let map = parse_pairs("secret", &strings(&["a=1", "b=x=y", "c="])).unwrap();
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], "x=y");
        assert_eq!(map["c"], "");
    }

    #[test]
    fn test_parse_pairs_rejects_missing_equals() {
        let err = parse_pairs("environment variable", &strings(&["ok=1", "broken"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable format (broken). Must be in the form 'key=value'"
        );
    }

    #[test]
    fn test_create_puts_request_body() {
        let client = MemoryClient::new();
        let options = CreateOptions {
            app: Some("my-app".into()),
            env: strings(&["key1=value1", "key2=value2"]),
            secrets: strings(&["key3=value3"]),
            revision_name: None,
        };

        let result = run(&client, &options).unwrap();
        assert_eq!(result.app.as_deref(), Some("my-app"));

        let request = client.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "runtime/my-app/deployment");
        match request.body {
            Body::Json(bytes) => {
                let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                assert_eq!(value["environment_variables"]["key1"], "value1");
                assert_eq!(value["environment_variables"]["key2"], "value2");
                assert_eq!(value["secrets"]["key3"], "value3");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_create_with_revision_name() {
        let client = MemoryClient::new();
        let options = CreateOptions {
            app: Some("my-app".into()),
            revision_name: Some("first".into()),
            ..CreateOptions::default()
        };

        run(&client, &options).unwrap();
        assert_eq!(
            client.last_request().unwrap().path,
            "runtime/my-app/deployment?revision_name=first"
        );
    }

    #[test]
    fn test_create_sends_empty_maps() {
        let client = MemoryClient::new();
        let options = CreateOptions {
            app: Some("bare".into()),
            ..CreateOptions::default()
        };

        run(&client, &options).unwrap();
        let expected = br#"{"environment_variables":{},"secrets":{}}"#.to_vec();
        assert_eq!(client.last_request().unwrap().body, Body::Json(expected));
    }

    #[test]
    fn test_create_invalid_pair_sends_nothing() {
        let client = MemoryClient::new();
        let options = CreateOptions {
            app: Some("my-app".into()),
            secrets: strings(&["nope"]),
            ..CreateOptions::default()
        };

        let err = run(&client, &options).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidPair { kind: "secret", .. }));
        assert!(client.requests().is_empty());
    }

    #[test]
    fn test_create_requires_app() {
        let client = MemoryClient::new();
        let err = run(&client, &CreateOptions::default()).unwrap_err();
        assert!(matches!(err, RuntimeError::Usage(_)));
    }
}
