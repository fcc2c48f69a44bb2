use clap::{Args, Parser, Subcommand};
use introducer_core::{Connector, Person};
use introducer_graph::{GraphConfig, MemoryConnector, Neo4jConnector};
use introducer_api::RestApi;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Records people and friendships in a Neo4j graph
#[derive(Parser, Debug)]
#[command(name = "introducer")]
#[command(about = "Records people and friendships in a Neo4j graph", long_about = None)]
struct Cli {
    #[command(flatten)]
    graph: GraphArgs,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Bolt connection URI
    #[arg(long, env = "NEO4J_URI", default_value = introducer_graph::config::DEFAULT_URI, global = true)]
    bolt_uri: String,

    /// Database user
    #[arg(long, env = "NEO4J_USER", default_value = introducer_graph::config::DEFAULT_USER, global = true)]
    user: String,

    /// Database password
    #[arg(long, env = "NEO4J_PASSWORD", default_value = introducer_graph::config::DEFAULT_PASSWORD, global = true, hide_env_values = true)]
    password: String,

    /// Target database (server default when omitted)
    #[arg(long, global = true)]
    database: Option<String>,
}

impl From<GraphArgs> for GraphConfig {
    fn from(args: GraphArgs) -> Self {
        let config = GraphConfig::new(args.bolt_uri, args.user, args.password);
        match args.database {
            Some(db) => config.with_database(db),
            None => config,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Create a FRIEND relationship between two recorded people
    Introduce {
        /// person_id of the first person
        #[arg(long)]
        first: String,
        /// person_id of the second person
        #[arg(long)]
        second: String,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8068)]
    http_port: u16,

    /// Keep the graph in process instead of connecting to Neo4j
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = GraphConfig::from(cli.graph);

    match cli.command {
        Some(Command::Introduce { first, second }) => introduce(config, first, second).await,
        Some(Command::Serve(args)) => serve(config, args).await,
        None => {
            let args = ServeArgs {
                host: "0.0.0.0".to_string(),
                http_port: 8068,
                in_memory: false,
            };
            serve(config, args).await
        }
    }
}

async fn serve(config: GraphConfig, args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting introducer v{}", env!("CARGO_PKG_VERSION"));

    let connector: Arc<dyn Connector> = if args.in_memory {
        info!("Using in-memory graph");
        Arc::new(MemoryConnector::default())
    } else {
        info!("Graph database: {} as {}", config.uri, config.user);
        Arc::new(Neo4jConnector::new(config)?)
    };

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(RestApi::start(connector, host, http_port))
    });

    info!("HTTP API: http://{}:{}/add", args.host, args.http_port);

    let mut server = tokio::task::spawn_blocking(move || http_handle.join());

    let signal = tokio::select! {
        res = shutdown_signal() => res,
        res = &mut server => return server_outcome(res?),
    };

    match signal {
        Ok(()) => {
            // in-flight requests are not drained
            info!("Shutdown signal received, shutting down...");
            std::process::exit(0)
        }
        Err(e) => {
            warn!("Signal listener failed, serving until the server stops: {}", e);
            server_outcome(server.await?)
        }
    }
}

/// Map how the HTTP server thread ended to the process result.
fn server_outcome(outcome: std::thread::Result<std::io::Result<()>>) -> anyhow::Result<()> {
    match outcome {
        Ok(Ok(())) => {
            info!("HTTP server stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            error!("HTTP server error: {}", e);
            Err(anyhow::Error::new(e).context("HTTP server failed"))
        }
        Err(_) => {
            error!("HTTP server thread panicked");
            Err(anyhow::anyhow!("HTTP server thread panicked"))
        }
    }
}

async fn introduce(config: GraphConfig, first: String, second: String) -> anyhow::Result<()> {
    let connector = Neo4jConnector::new(config)?;
    let client = connector.connect().await?;

    let result = client
        .introduce(&Person::new("", "", "", first.as_str()), &Person::new("", "", "", second.as_str()))
        .await;
    if let Err(e) = client.close().await {
        warn!("Failed to close client: {}", e);
    }
    result?;

    info!("Introduced {} to {}", first, second);
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_clean_server_stop_is_ok() {
        assert!(server_outcome(Ok(Ok(()))).is_ok());
    }

    #[test]
    fn test_bind_failure_is_an_error() {
        let err = io::Error::new(io::ErrorKind::AddrInUse, "address in use");
        let result = server_outcome(Ok(Err(err)));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("HTTP server failed"));
        assert!(message.contains("address in use"));
    }

    #[test]
    fn test_server_panic_is_an_error() {
        let panic: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert!(server_outcome(Err(panic)).is_err());
    }

    #[test]
    fn test_serve_is_the_default_command() {
        let cli = Cli::parse_from(["introducer", "--bolt-uri", "bolt://db:7687"]);
        assert!(cli.command.is_none());
        assert_eq!(GraphConfig::from(cli.graph).uri, "bolt://db:7687");
    }
}
