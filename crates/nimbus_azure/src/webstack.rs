//! The web-stack topology declarator.
//!
//! Declares the full application topology: resource group, storage account,
//! app service plan, blob container, archive blob, SQL server and database,
//! and the web app wired to a signed package URL and a derived connection
//! string. The resulting graph is handed to the realization engine; this
//! module creates no resources itself.

use std::collections::BTreeMap;
use std::path::PathBuf;

use nimbus_core::{tuple3, Input, Output, Stack, StackConfig};
use tracing::info;

use crate::appservice::{
    AppServicePlan, AppServicePlanArgs, ConnectionStringType, PlanSku, WebApp, WebAppArgs,
};
use crate::archive::FileArchive;
use crate::error::AzureResult;
use crate::group::{ResourceGroup, ResourceGroupArgs};
use crate::signing::signed_blob_read_url;
use crate::sql::{self, SqlDatabase, SqlDatabaseArgs, SqlServer, SqlServerArgs};
use crate::storage::{
    AccountTier, ArchiveBlob, ArchiveBlobArgs, ContainerAccessType, ReplicationType,
    StorageAccount, StorageAccountArgs, StorageContainer, StorageContainerArgs,
};

/// Published output: the web app's default hostname.
pub const OUTPUT_ENDPOINT: &str = "endpoint";
/// Published output: the storage account's primary connection string.
pub const OUTPUT_STORAGE_CONNECTION_STRING: &str = "storageConnectionString";

const CONFIG_SQL_ADMIN: &str = "sqlAdmin";
const CONFIG_SQL_PASSWORD: &str = "sqlPassword";
const DEFAULT_SQL_ADMIN: &str = "pulumi";

/// The named outputs a declarator publishes back to the engine.
pub type StackOutputs = BTreeMap<String, Output<String>>;

/// Declaration-time options for the web stack.
#[derive(Debug, Clone)]
pub struct WebStackOptions {
    /// Directory packaged and uploaded as the application blob.
    pub app_path: PathBuf,
}

impl Default for WebStackOptions {
    fn default() -> Self {
        Self {
            app_path: PathBuf::from("wwwroot"),
        }
    }
}

/// Declare the web stack into `stack` and return the published outputs.
///
/// Configuration is read up front: a missing `sqlPassword` secret aborts
/// before any resource is declared.
pub fn declare_web_stack(
    stack: &Stack,
    config: &StackConfig,
    options: &WebStackOptions,
) -> AzureResult<StackOutputs> {
    let username = config.get_or(CONFIG_SQL_ADMIN, DEFAULT_SQL_ADMIN);
    let password = config.require_secret(CONFIG_SQL_PASSWORD)?;

    info!("Declaring web stack '{}'", stack.name());

    let resource_group =
        ResourceGroup::declare(stack, "resourceGroup", ResourceGroupArgs::new("pulumi"))?;

    let storage_account = StorageAccount::declare(
        stack,
        "storage",
        StorageAccountArgs {
            name: "wwwcontainer".to_string(),
            resource_group_name: Input::from(&resource_group.name),
            account_replication_type: ReplicationType::Lrs,
            account_tier: AccountTier::Standard,
        },
    )?;

    let plan = AppServicePlan::declare(
        stack,
        "asp",
        AppServicePlanArgs {
            name: "website".to_string(),
            resource_group_name: Input::from(&resource_group.name),
            kind: "App".to_string(),
            sku: PlanSku::basic_b1(),
        },
    )?;

    let container = StorageContainer::declare(
        stack,
        "zips",
        StorageContainerArgs {
            storage_account_name: Input::from(&storage_account.name),
            container_access_type: ContainerAccessType::Private,
        },
    )?;

    let blob = ArchiveBlob::declare(
        stack,
        "zip",
        ArchiveBlobArgs {
            storage_account_name: Input::from(&storage_account.name),
            storage_container_name: Input::from(&container.name),
            content: FileArchive::new(&options.app_path),
        },
    )?;

    let code_blob_url = signed_blob_read_url(&blob, &storage_account);

    let sql_server = SqlServer::declare(
        stack,
        "sql",
        SqlServerArgs {
            name: "pulumiserver".to_string(),
            resource_group_name: Input::from(&resource_group.name),
            administrator_login: username.clone(),
            administrator_login_password: password.clone(),
            version: "12.0".to_string(),
        },
    )?;

    let database = SqlDatabase::declare(
        stack,
        "db",
        SqlDatabaseArgs {
            name: "pulumidatabase".to_string(),
            resource_group_name: Input::from(&resource_group.name),
            server_name: Input::from(&sql_server.name),
            requested_service_objective_name: "S0".to_string(),
        },
    )?;

    // Combines the three deferred values exactly once when all resolve.
    // Secretness of the password carries over to the whole string.
    let db_connection = tuple3(&sql_server.name, &database.name, &password).apply(
        move |(server, database, pwd)| sql::connection_string(&server, &database, &username, &pwd),
    );

    let app = WebApp::declare(
        stack,
        "app",
        WebAppArgs::new("pulumiwebapp")
            .resource_group_name(&resource_group.name)
            .app_service_plan_id(&plan.plan_id)
            .app_setting("WEBSITE_RUN_FROM_PACKAGE", &code_blob_url)
            .connection_string("db", ConnectionStringType::SqlAzure, db_connection),
    )?;

    info!("Declared {} resources", stack.len());

    let mut outputs = StackOutputs::new();
    outputs.insert(
        OUTPUT_ENDPOINT.to_string(),
        app.default_site_hostname.clone(),
    );
    outputs.insert(
        OUTPUT_STORAGE_CONNECTION_STRING.to_string(),
        storage_account.primary_connection_string.clone(),
    );
    Ok(outputs)
}
