//! Command line interface definitions and dispatch.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use mgmt_api::error::MgmtError;
use mgmt_api::mgmt_api::{ConnectionFilter, FieldsFilter, MgmtApi};
use mgmt_api::models::{Client, Connection};
use mgmt_api::transport::Transport;

#[derive(Parser, Debug)]
#[command(name = "mgmt-api")]
#[command(about = "Manage clients, connections and client grants through the Management API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Request timeout in seconds (overrides MGMT_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Log request and response bodies at trace level
    #[arg(long, global = true)]
    pub log_bodies: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Client (application) operations
    #[command(subcommand)]
    Clients(ClientCommand),

    /// Connection operations
    #[command(subcommand)]
    Connections(ConnectionCommand),

    /// Client grant operations
    #[command(subcommand)]
    Grants(GrantCommand),
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List all clients
    List,
    /// Show a single client
    Get { id: String },
    /// Create a client
    Create {
        /// Client name
        #[arg(long)]
        name: String,
        /// Application type (native, spa, regular_web, non_interactive)
        #[arg(long)]
        app_type: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a client
    Delete { id: String },
    /// Rotate a client secret
    RotateSecret { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConnectionCommand {
    /// List connections
    List {
        /// Only connections with this strategy
        #[arg(long)]
        strategy: Option<String>,
        /// Only the connection with this name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Show a single connection
    Get {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Create a connection
    Create {
        /// Connection name
        #[arg(long)]
        name: String,
        /// Identity provider strategy
        #[arg(long)]
        strategy: String,
    },
    /// Delete a connection
    Delete { id: String },
    /// Delete a user from a database connection
    DeleteUser {
        id: String,
        /// Email of the user to delete
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GrantCommand {
    /// List all client grants
    List,
    /// Grant scopes of an API to a client
    Create {
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        audience: String,
        /// Scope to grant (repeatable)
        #[arg(long = "scope")]
        scope: Vec<String>,
    },
    /// Replace the scopes of a grant
    Update {
        id: String,
        /// Scope to grant (repeatable)
        #[arg(long = "scope")]
        scope: Vec<String>,
    },
    /// Delete a client grant
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Comma separated list of fields
    #[arg(long)]
    fields: Option<String>,
    /// Exclude the given fields instead of including them
    #[arg(long, requires = "fields")]
    exclude_fields: bool,
}

impl FieldArgs {
    fn to_filter(&self) -> FieldsFilter {
        match &self.fields {
            Some(fields) => FieldsFilter::new().with_fields(fields.clone(), !self.exclude_fields),
            None => FieldsFilter::new(),
        }
    }
}

/// Runs one command and prints its result to stdout.
pub async fn run<T: Transport>(api: &MgmtApi<T>, command: Command) -> Result<()> {
    match command {
        Command::Clients(cmd) => run_clients(api, cmd).await,
        Command::Connections(cmd) => run_connections(api, cmd).await,
        Command::Grants(cmd) => run_grants(api, cmd).await,
    }
}

async fn run_clients<T: Transport>(api: &MgmtApi<T>, command: ClientCommand) -> Result<()> {
    match command {
        ClientCommand::List => print_json(&api.list_clients()?.execute().await?),
        ClientCommand::Get { id } => print_json(&api.get_client(&id)?.execute().await?),
        ClientCommand::Create {
            name,
            app_type,
            description,
        } => {
            let mut client = Client::new(name);
            client.app_type = app_type;
            client.description = description;
            print_json(&api.create_client(&client)?.execute().await?)
        }
        ClientCommand::Delete { id } => {
            api.delete_client(&id)?.execute().await?;
            println!("Deleted client {}", id);
            Ok(())
        }
        ClientCommand::RotateSecret { id } => {
            print_json(&api.rotate_client_secret(&id)?.execute().await?)
        }
    }
}

async fn run_connections<T: Transport>(api: &MgmtApi<T>, command: ConnectionCommand) -> Result<()> {
    match command {
        ConnectionCommand::List {
            strategy,
            name,
            fields,
        } => {
            let mut filter = ConnectionFilter::new().with_fields_filter(fields.to_filter());
            if let Some(strategy) = strategy {
                filter = filter.with_strategy(strategy);
            }
            if let Some(name) = name {
                filter = filter.with_name(name);
            }
            print_json(&api.list_connections(&filter)?.execute().await?)
        }
        ConnectionCommand::Get { id, fields } => {
            print_json(&api.get_connection(&id, &fields.to_filter())?.execute().await?)
        }
        ConnectionCommand::Create { name, strategy } => {
            let connection = Connection::new(name, strategy);
            print_json(&api.create_connection(&connection)?.execute().await?)
        }
        ConnectionCommand::Delete { id } => {
            api.delete_connection(&id)?.execute().await?;
            println!("Deleted connection {}", id);
            Ok(())
        }
        ConnectionCommand::DeleteUser { id, email } => {
            api.delete_connection_user(&id, &email)?.execute().await?;
            println!("Deleted user {} from connection {}", email, id);
            Ok(())
        }
    }
}

async fn run_grants<T: Transport>(api: &MgmtApi<T>, command: GrantCommand) -> Result<()> {
    match command {
        GrantCommand::List => print_json(&api.list_client_grants()?.execute().await?),
        GrantCommand::Create {
            client_id,
            audience,
            scope,
        } => print_json(
            &api.create_client_grant(&client_id, &audience, scope.as_slice())?
                .execute()
                .await?,
        ),
        GrantCommand::Update { id, scope } => {
            print_json(&api.update_client_grant(&id, scope.as_slice())?.execute().await?)
        }
        GrantCommand::Delete { id } => {
            api.delete_client_grant(&id)?.execute().await?;
            println!("Deleted client grant {}", id);
            Ok(())
        }
    }
}

fn print_json<V: Serialize>(value: &V) -> Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

fn render_json<V: Serialize>(value: &V) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Error text for the user, with the API token scrubbed.
pub fn error_message(err: &anyhow::Error, api_token: &str) -> String {
    match err.downcast_ref::<MgmtError>() {
        Some(err) => err.sanitized_display(api_token),
        None => MgmtError::sanitize_message(&format!("{:#}", err), api_token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmt_api::models::ClientGrant;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_rendered_resources_include_ids() {
        let clients: Vec<Client> =
            serde_json::from_value(json!([{"client_id": "abc123", "name": "App"}])).unwrap();
        let out = render_json(&clients).unwrap();
        assert!(out.contains(r#""client_id": "abc123""#), "{}", out);

        let grant: ClientGrant =
            serde_json::from_value(json!({"id": "cgr_1", "client_id": "abc"})).unwrap();
        let out: serde_json::Value = serde_json::from_str(&render_json(&grant).unwrap()).unwrap();
        assert_eq!(out["id"], "cgr_1");

        let conn: Connection = serde_json::from_value(json!({"id": "con_1", "name": "db"})).unwrap();
        let out: serde_json::Value = serde_json::from_str(&render_json(&conn).unwrap()).unwrap();
        assert_eq!(out, json!({"id": "con_1", "name": "db"}));
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["mgmt-api", "--timeout", "0", "clients", "list"]).is_err());

        let cli = Cli::try_parse_from(["mgmt-api", "clients", "list", "--timeout", "5"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_connection_list_fields_flags() {
        let cli = Cli::try_parse_from([
            "mgmt-api",
            "connections",
            "list",
            "--fields",
            "id,name",
            "--exclude-fields",
        ])
        .unwrap();
        match cli.command {
            Command::Connections(ConnectionCommand::List { fields, .. }) => assert_eq!(
                fields.to_filter(),
                FieldsFilter::new().with_fields("id,name", false)
            ),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["mgmt-api", "connections", "list", "--exclude-fields"]).is_err());
    }

    #[test]
    fn test_error_message_scrubs_token() {
        let err = anyhow::Error::new(MgmtError::api_status(
            StatusCode::UNAUTHORIZED,
            br#"{"message":"bad token secret-token"}"#,
        ));
        assert_eq!(
            error_message(&err, "secret-token"),
            "API returned HTTP 401 Unauthorized: bad token [REDACTED]"
        );

        let other = anyhow::anyhow!("secret-token leaked").context("while listing");
        assert_eq!(
            error_message(&other, "secret-token"),
            "while listing: [REDACTED] leaked"
        );
    }
}
