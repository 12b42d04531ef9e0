//! SQL servers and databases.

use std::collections::BTreeMap;

use nimbus_core::{Input, NodeId, Output, Stack, TypeToken};
use tracing::debug;

use crate::bind::bind_attr;
use crate::error::AzureResult;
use crate::naming;

pub const SQL_SERVER: TypeToken = TypeToken("azure:sql/sqlServer:SqlServer");
pub const SQL_DATABASE: TypeToken = TypeToken("azure:sql/database:Database");

/// Arguments for a SQL server declaration. The administrator password is a
/// secret output and never enters the graph in plaintext.
#[derive(Debug, Clone)]
pub struct SqlServerArgs {
    pub name: String,
    pub resource_group_name: Input,
    pub administrator_login: String,
    pub administrator_login_password: Output<String>,
    pub version: String,
}

/// A declared SQL server.
pub struct SqlServer {
    pub id: NodeId,
    pub name: Output<String>,
}

impl SqlServer {
    pub fn declare(stack: &Stack, logical_name: &str, args: SqlServerArgs) -> AzureResult<Self> {
        naming::validate_dns_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        node_args.insert("resource_group_name".to_string(), args.resource_group_name);
        node_args.insert(
            "administrator_login".to_string(),
            Input::from(args.administrator_login),
        );
        node_args.insert(
            "administrator_login_password".to_string(),
            Input::from(args.administrator_login_password),
        );
        node_args.insert("version".to_string(), Input::from(args.version));
        let id = stack.register(SQL_SERVER, logical_name, node_args);
        debug!("Declared SQL server '{logical_name}'");

        let name = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        Ok(Self { id, name })
    }
}

/// Arguments for a SQL database declaration.
#[derive(Debug, Clone)]
pub struct SqlDatabaseArgs {
    pub name: String,
    pub resource_group_name: Input,
    pub server_name: Input,
    pub requested_service_objective_name: String,
}

/// A declared SQL database.
pub struct SqlDatabase {
    pub id: NodeId,
    pub name: Output<String>,
}

impl SqlDatabase {
    pub fn declare(stack: &Stack, logical_name: &str, args: SqlDatabaseArgs) -> AzureResult<Self> {
        naming::validate_dns_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        node_args.insert("resource_group_name".to_string(), args.resource_group_name);
        node_args.insert("server_name".to_string(), args.server_name);
        node_args.insert(
            "requested_service_objective_name".to_string(),
            Input::from(args.requested_service_objective_name),
        );
        let id = stack.register(SQL_DATABASE, logical_name, node_args);
        debug!("Declared SQL database '{logical_name}'");

        let name = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        Ok(Self { id, name })
    }
}

/// ADO.NET connection string for an Azure SQL database. The shape is relied
/// on by downstream consumers; do not reformat.
pub fn connection_string(server: &str, database: &str, username: &str, password: &str) -> String {
    format!(
        "Server= tcp:{server}.database.windows.net;initial catalog={database};userID={username};password={password};Min Pool Size=0;Max Pool Size=30;Persist Security Info=true;"
    )
}
