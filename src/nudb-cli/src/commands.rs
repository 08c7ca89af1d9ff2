//! CLI argument definitions and command dispatch
//!
//! Commands map one to one onto client operations:
//! - nudb info <db>
//! - nudb search <field=value>...
//! - nudb get|delete <id>
//! - nudb put <data> / put-file <path>
//! - nudb update <id> <data>

use clap::{Parser, Subcommand};
use nudb_core::params;
use nudb_rs::{
    Client, ClientConfig, PutOptions, RecordOptions, Reply, RequestOptions, UpdateOptions,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;

/// nudb - command line client for the NuDB record database
#[derive(Parser, Debug)]
#[command(name = "nudb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./nudb.json")]
    pub config: PathBuf,

    /// Server host, overrides the configuration file
    #[arg(long)]
    pub host: Option<String>,

    /// Server port, overrides the configuration file
    #[arg(long)]
    pub port: Option<u16>,

    /// Default database, overrides the configuration file
    #[arg(long)]
    pub db: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also write JSON logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show database information
    Info {
        /// Database name
        db: String,
    },

    /// Run a query given as field=value pairs (add out=json to decode the reply)
    Search {
        #[arg(required = true, value_parser = parse_pair)]
        terms: Vec<(String, String)>,
    },

    /// Fetch one record
    Get {
        id: String,
        /// rid or key
        #[arg(long)]
        search_field: Option<String>,
    },

    /// Store record data
    Put {
        data: String,
        /// json or text
        #[arg(long)]
        format: String,
        /// Record delimiter, required for text
        #[arg(long)]
        rec_beg: Option<String>,
    },

    /// Upload a file of records
    PutFile {
        path: PathBuf,
        /// json or text
        #[arg(long)]
        format: String,
        /// Record delimiter, required for text
        #[arg(long)]
        rec_beg: Option<String>,
    },

    /// Delete one record
    Delete {
        id: String,
        /// rid or key
        #[arg(long)]
        search_field: Option<String>,
    },

    /// Update one record
    Update {
        id: String,
        data: String,
        /// json or text
        #[arg(long)]
        format: String,
        /// rid or key
        #[arg(long)]
        search_field: Option<String>,
        /// replaceRecord or replaceField
        #[arg(long)]
        update_method: Option<String>,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", s)),
    }
}

impl Cli {
    /// Configuration file (or defaults when it is missing) plus flag overrides
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::load(&self.config).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {:?} ({}), using defaults", self.config, e);
            ClientConfig::default()
        });

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(db) = &self.db {
            config.db = db.clone();
        }
        config
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }
}

/// Execute one command against the client
pub async fn run(
    client: &Client,
    command: Command,
    timeout: Option<Duration>,
) -> nudb_rs::Result<Reply> {
    let defaults = *client.defaults();
    let search_field =
        |value: Option<String>| params::resolve_search_field(value.as_deref(), Some(defaults.search_field));

    let value = match command {
        Command::Info { db } => {
            client
                .database_info(&db, RequestOptions { db: None, timeout })
                .await?
        }
        Command::Search { terms } => {
            let query: Map<String, Value> = terms
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect();
            return client
                .search(Value::Object(query), RequestOptions { db: None, timeout })
                .await;
        }
        Command::Get { id, search_field: field } => {
            let options = RecordOptions {
                search_field: Some(search_field(field)),
                timeout,
                ..RecordOptions::default()
            };
            client.get_record(&id, options).await?
        }
        Command::Put { data, format, rec_beg } => {
            let options = PutOptions {
                rec_beg,
                timeout,
                ..PutOptions::default()
            };
            client.put_record(data, &format, options).await?
        }
        Command::PutFile { path, format, rec_beg } => {
            let options = PutOptions {
                rec_beg,
                timeout,
                ..PutOptions::default()
            };
            client.put_file(&path, &format, options).await?
        }
        Command::Delete { id, search_field: field } => {
            let options = RecordOptions {
                search_field: Some(search_field(field)),
                timeout,
                ..RecordOptions::default()
            };
            client.delete_record(&id, options).await?
        }
        Command::Update {
            id,
            data,
            format,
            search_field: field,
            update_method,
        } => {
            let options = UpdateOptions {
                search_field: Some(search_field(field)),
                update_method: Some(params::resolve_update_method(
                    update_method.as_deref(),
                    Some(defaults.update_method),
                )),
                timeout,
                ..UpdateOptions::default()
            };
            client.update_record(&id, data, &format, options).await?
        }
    };

    Ok(Reply::Json(value))
}

/// JSON pretty-printed, text verbatim
pub fn render(reply: &Reply) -> serde_json::Result<String> {
    match reply {
        Reply::Json(value) => serde_json::to_string_pretty(value),
        Reply::Text(text) => Ok(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nudb_core::RequestDescriptor;
    use nudb_rs::{ClientError, ParameterError, Transport, TransportError};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct CannedTransport {
        body: String,
        requests: Mutex<Vec<RequestDescriptor>>,
    }

    impl CannedTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> RequestDescriptor {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: RequestDescriptor) -> Result<String, TransportError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.body.clone())
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nudb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_update_command() {
        let cli = parse(&[
            "--db",
            "news",
            "update",
            "42",
            r#"{"x":1}"#,
            "--format",
            "json",
            "--search-field",
            "key",
            "--update-method",
            "replaceField",
        ]);
        assert_eq!(cli.db.as_deref(), Some("news"));
        assert_eq!(
            cli.command,
            Command::Update {
                id: "42".to_string(),
                data: r#"{"x":1}"#.to_string(),
                format: "json".to_string(),
                search_field: Some("key".to_string()),
                update_method: Some("replaceField".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_search_pairs() {
        let cli = parse(&["search", "q=rust", "out=json"]);
        assert_eq!(
            cli.command,
            Command::Search {
                terms: vec![
                    ("q".to_string(), "rust".to_string()),
                    ("out".to_string(), "json".to_string()),
                ]
            }
        );

        assert!(Cli::try_parse_from(["nudb", "search", "no-equals"]).is_err());
        assert!(Cli::try_parse_from(["nudb", "search"]).is_err());
    }

    #[test]
    fn test_put_requires_format() {
        assert!(Cli::try_parse_from(["nudb", "put", "{}"]).is_err());
    }

    #[test]
    fn test_flag_overrides_on_missing_config() {
        let cli = parse(&[
            "--config",
            "does/not/exist.json",
            "--host",
            "db.internal",
            "--port",
            "5900",
            "--timeout",
            "2500",
            "get",
            "1",
        ]);
        let config = cli.client_config();
        assert_eq!(config.connection().base_endpoint, "http://db.internal:5900/nudb/");
        assert_eq!(config.db, "test");
        assert_eq!(cli.request_timeout(), Some(Duration::from_millis(2500)));
    }

    #[tokio::test]
    async fn test_run_resolves_soft_flags() {
        let transport = CannedTransport::new(r#"{"status":"ok"}"#);
        let client = Client::with_transport(&ClientConfig::default(), transport.clone());

        let reply = run(
            &client,
            Command::Update {
                id: "42".to_string(),
                data: r#"{"x":1}"#.to_string(),
                format: "json".to_string(),
                search_field: Some("bogus".to_string()),
                update_method: Some("replaceField".to_string()),
            },
            Some(Duration::from_secs(1)),
        )
        .await
        .unwrap();
        assert_eq!(reply, Reply::Json(json!({"status": "ok"})));

        let sent = transport.last();
        assert_eq!(sent.get("rid"), Some("42"));
        assert_eq!(sent.get("field"), Some(r#"{"x":1}"#));
        assert_eq!(sent.timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_run_search_passes_text_through() {
        let transport = CannedTransport::new("@rid:1\n");
        let client = Client::with_transport(&ClientConfig::default(), transport.clone());

        let reply = run(
            &client,
            Command::Search {
                terms: vec![("q".to_string(), "rust".to_string())],
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(render(&reply).unwrap(), "@rid:1\n");
        assert_eq!(transport.last().get("q"), Some("rust"));
    }

    #[tokio::test]
    async fn test_run_reports_parameter_errors() {
        let client = Client::with_transport(&ClientConfig::default(), CannedTransport::new("{}"));

        let err = run(
            &client,
            Command::Put {
                data: "{oops".to_string(),
                format: "json".to_string(),
                rec_beg: None,
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Parameter(ParameterError::WrongFormat(_))
        ));
    }

    #[test]
    fn test_render_json_pretty() {
        let rendered = render(&Reply::Json(json!({"a": 1}))).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }
}
