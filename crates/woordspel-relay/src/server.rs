//! Minimal HTTP/1.1 transport for the relay.
//!
//! One request per connection; every response closes the connection.
//! The request path is ignored.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
    Take,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::RelayConfig;
use crate::handler::{Relay, RelayError, RelayResponse};

/// Largest request body the relay accepts.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Largest request line plus headers the relay reads.
pub const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Pause after a failed `accept`, so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Per-server connection limits.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// How long a client may take to send its full request.
    pub read_timeout: Duration,
    /// Connections handled at once. Further clients wait in the backlog.
    pub max_connections: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(10),
            max_connections: 256,
        }
    }
}

impl From<&RelayConfig> for Limits {
    fn from(config: &RelayConfig) -> Self {
        Self {
            read_timeout: Duration::from_secs(config.timeout_secs),
            ..Self::default()
        }
    }
}

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn run(
    config: RelayConfig,
    shutdown: impl Future<Output = ()> + Send,
) -> anyhow::Result<()> {
    let relay = Arc::new(Relay::new(&config)?);
    let listener = TcpListener::bind(config.addr()).await?;
    let limits = Limits::from(&config);
    tracing::info!(
        addr = %listener.local_addr()?,
        max_connections = limits.max_connections,
        "woordspel relay listening"
    );

    tokio::select! {
        result = serve_with(listener, relay, limits) => result,
        () = shutdown => {
            tracing::info!("shutting down relay");
            Ok(())
        }
    }
}

/// Accept connections forever with the default [`Limits`].
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> anyhow::Result<()> {
    serve_with(listener, relay, Limits::default()).await
}

/// Accept connections forever, handling each on its own task.
pub async fn serve_with(
    listener: TcpListener,
    relay: Arc<Relay>,
    limits: Limits,
) -> anyhow::Result<()> {
    accept_loop(listener, relay, limits).await
}

/// Source of incoming connections.
#[async_trait]
trait Accept: Send {
    async fn next_connection(&mut self) -> io::Result<(TcpStream, SocketAddr)>;
}

#[async_trait]
impl Accept for TcpListener {
    async fn next_connection(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        self.accept().await
    }
}

async fn accept_loop<A: Accept>(
    mut acceptor: A,
    relay: Arc<Relay>,
    limits: Limits,
) -> anyhow::Result<()> {
    let slots = Arc::new(Semaphore::new(limits.max_connections));
    loop {
        let permit = Arc::clone(&slots).acquire_owned().await?;
        let (stream, peer) = match acceptor.next_connection().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("accept failed: {e}");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let relay = Arc::clone(&relay);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = handle_connection(stream, &relay, limits.read_timeout).await {
                tracing::debug!(%peer, "connection error: {e}");
            }
        });
    }
}

async fn handle_connection<S>(stream: S, relay: &Relay, read_timeout: Duration) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    let response = match tokio::time::timeout(read_timeout, read_request(&mut reader)).await {
        Ok(parsed) => match parsed? {
            Ok((method, body)) => relay.handle(&method, &body).await,
            Err(e) => RelayResponse::from_error(&e),
        },
        Err(_) => {
            tracing::debug!(?read_timeout, "client did not finish its request in time");
            RelayResponse::from_error(&RelayError::RequestTimeout)
        }
    };

    write_half.write_all(&response.to_http()).await?;
    write_half.flush().await?;
    write_half.shutdown().await
}

type ParsedRequest = Result<(String, String), RelayError>;

async fn read_request<R>(reader: &mut R) -> io::Result<ParsedRequest>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = (&mut *reader).take(MAX_HEAD_BYTES as u64);

    let request_line = match head_line(&mut head).await? {
        Ok(line) => line,
        Err(e) => return Ok(Err(e)),
    };
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Ok(Err(RelayError::BadRequest));
    }
    let method = parts[0].to_string();

    let mut content_length: usize = 0;
    let mut transfer_encoded = false;
    loop {
        let line = match head_line(&mut head).await? {
            Ok(line) => line,
            Err(e) => return Ok(Err(e)),
        };
        if line.trim().is_empty() {
            break;
        }
        if let Some((key, value)) = line.trim().split_once(':') {
            let key = key.trim();
            if key.eq_ignore_ascii_case("content-length") {
                match value.trim().parse() {
                    Ok(n) => content_length = n,
                    Err(_) => return Ok(Err(RelayError::BadRequest)),
                }
            } else if key.eq_ignore_ascii_case("transfer-encoding") {
                transfer_encoded = true;
            }
        }
    }

    if transfer_encoded {
        return Ok(Err(RelayError::LengthRequired));
    }
    if content_length > MAX_BODY_BYTES {
        return Ok(Err(RelayError::PayloadTooLarge));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;
    Ok(Ok((method, String::from_utf8_lossy(&body).into_owned())))
}

/// Read one head line. Running out of head budget mid-line is a 431; an
/// empty string means the client closed the connection.
async fn head_line<R>(head: &mut Take<R>) -> io::Result<Result<String, RelayError>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    match head.read_line(&mut line).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Ok(Err(RelayError::BadRequest));
        }
        Err(e) => return Err(e),
    }
    if !line.ends_with('\n') && head.limit() == 0 {
        return Ok(Err(RelayError::HeaderTooLarge));
    }
    Ok(Ok(line))
}
