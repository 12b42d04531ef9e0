//! Integration tests for the web-stack declarator.

use std::path::Path;

use nimbus_azure::webstack::{
    declare_web_stack, WebStackOptions, OUTPUT_ENDPOINT, OUTPUT_STORAGE_CONNECTION_STRING,
};
use nimbus_azure::{appservice, group, sql, storage};
use nimbus_core::{NodeId, ResourceAttrs, Stack, StackConfig, TypeToken};
use tempfile::TempDir;

fn app_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
    dir
}

fn options_for(dir: &Path) -> WebStackOptions {
    WebStackOptions {
        app_path: dir.to_path_buf(),
    }
}

fn config_with_password() -> StackConfig {
    let mut config = StackConfig::new();
    config.set_secret("sqlPassword", "P");
    config
}

fn node_id(stack: &Stack, token: TypeToken) -> NodeId {
    stack
        .nodes()
        .into_iter()
        .find(|n| n.type_token == token)
        .unwrap_or_else(|| panic!("no {token} node declared"))
        .id
}

fn name_attrs(name: &str) -> ResourceAttrs {
    let mut attrs = ResourceAttrs::new();
    attrs.insert("name".to_string(), serde_json::json!(name));
    attrs
}

#[test]
fn missing_sql_password_fails_before_any_declaration() {
    let dir = app_dir();
    let stack = Stack::new("dev");
    let config = StackConfig::new();

    let result = declare_web_stack(&stack, &config, &options_for(dir.path()));
    assert!(result.is_err());
    assert!(stack.is_empty());
}

#[test]
fn sql_admin_defaults_to_pulumi() {
    let dir = app_dir();
    let stack = Stack::new("dev");

    declare_web_stack(&stack, &config_with_password(), &options_for(dir.path())).unwrap();

    let server = stack.node(node_id(&stack, sql::SQL_SERVER)).unwrap();
    assert_eq!(
        server.args["administrator_login"].resolved().as_deref(),
        Some("pulumi")
    );
}

#[test]
fn connection_string_combines_three_values_with_exact_template() {
    let dir = app_dir();
    let stack = Stack::new("dev");
    let mut config = config_with_password();
    config.set("sqlAdmin", "U");

    declare_web_stack(&stack, &config, &options_for(dir.path())).unwrap();

    stack
        .realize(node_id(&stack, sql::SQL_SERVER), &name_attrs("S"))
        .unwrap();
    stack
        .realize(node_id(&stack, sql::SQL_DATABASE), &name_attrs("D"))
        .unwrap();

    let app = stack.node(node_id(&stack, appservice::APP_SERVICE)).unwrap();
    let value = &app.args["connection_strings.db.value"];
    assert!(value.is_secret());
    assert_eq!(
        value.resolved().as_deref(),
        Some(
            "Server= tcp:S.database.windows.net;initial catalog=D;userID=U;password=P;Min Pool Size=0;Max Pool Size=30;Persist Security Info=true;"
        )
    );
}

#[test]
fn published_outputs_are_exactly_endpoint_and_connection_string() {
    let dir = app_dir();
    let stack = Stack::new("dev");

    let outputs =
        declare_web_stack(&stack, &config_with_password(), &options_for(dir.path())).unwrap();

    let keys: Vec<&str> = outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![OUTPUT_ENDPOINT, OUTPUT_STORAGE_CONNECTION_STRING]);

    // Both are deferred values bound to declared nodes.
    for out in outputs.values() {
        assert!(!out.deps().is_empty());
    }

    let mut attrs = ResourceAttrs::new();
    attrs.insert(
        "default_site_hostname".to_string(),
        serde_json::json!("pulumiwebapp.azurewebsites.net"),
    );
    stack
        .realize(node_id(&stack, appservice::APP_SERVICE), &attrs)
        .unwrap();
    assert_eq!(
        outputs[OUTPUT_ENDPOINT].try_get().as_deref(),
        Some("pulumiwebapp.azurewebsites.net")
    );
}

#[test]
fn run_from_package_binds_signed_url_after_blob_and_account() {
    let dir = app_dir();
    let stack = Stack::new("dev");

    declare_web_stack(&stack, &config_with_password(), &options_for(dir.path())).unwrap();

    let account = node_id(&stack, storage::STORAGE_ACCOUNT);
    let blob = node_id(&stack, storage::ARCHIVE_BLOB);
    let app = stack.node(node_id(&stack, appservice::APP_SERVICE)).unwrap();

    let setting = &app.args["app_settings.WEBSITE_RUN_FROM_PACKAGE"];
    let mut deps = setting.deps();
    deps.sort_unstable();
    assert_eq!(deps, vec![account, blob]);

    // The signed URL can only be declared after its inputs exist.
    assert!(account < blob);
    assert!(blob < app.id);
}

#[test]
fn declaration_order_follows_the_dependency_graph() {
    let dir = app_dir();
    let stack = Stack::new("dev");

    declare_web_stack(&stack, &config_with_password(), &options_for(dir.path())).unwrap();
    assert_eq!(stack.len(), 8);

    let order = stack.dependency_order().unwrap();
    let position = |token| order.iter().position(|id| *id == node_id(&stack, token)).unwrap();

    assert!(position(group::RESOURCE_GROUP) < position(storage::STORAGE_ACCOUNT));
    assert!(position(storage::STORAGE_ACCOUNT) < position(storage::STORAGE_CONTAINER));
    assert!(position(storage::STORAGE_CONTAINER) < position(storage::ARCHIVE_BLOB));
    assert!(position(sql::SQL_SERVER) < position(sql::SQL_DATABASE));
    assert!(position(sql::SQL_DATABASE) < position(appservice::APP_SERVICE));
    assert!(position(appservice::APP_SERVICE_PLAN) < position(appservice::APP_SERVICE));
}

#[test]
fn redeclaring_with_identical_inputs_is_idempotent() {
    let dir = app_dir();

    let first = Stack::new("dev");
    declare_web_stack(&first, &config_with_password(), &options_for(dir.path())).unwrap();

    let second = Stack::new("dev");
    declare_web_stack(&second, &config_with_password(), &options_for(dir.path())).unwrap();

    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn password_never_appears_in_the_graph_fingerprint() {
    let dir = app_dir();
    let stack = Stack::new("dev");

    declare_web_stack(&stack, &config_with_password(), &options_for(dir.path())).unwrap();

    let rendered = serde_json::to_string(&stack.fingerprint()).unwrap();
    assert!(!rendered.contains("\"P\""));
    assert!(rendered.contains("[secret]"));
}
