//! Server transports
//!
//! stdio serves desktop editors. The WebSocket listener serves the Monaco
//! editor embedded in the node dialog: each text frame carries one bare
//! JSON-RPC message, which is re-framed with a `Content-Length` header
//! before it reaches the server, and unframed again on the way back.

use std::future::Future as StdFuture;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, error::SendError, error::TrySendError, OwnedPermit};
use tokio_tungstenite::tungstenite::Message;
use tower_lsp::{ClientSocket, LspService, Server};

use super::backend::{BackendConfig, LspBackend};
use super::protocol;

/// Build the service with the expression extension methods attached.
pub fn build_service(config: BackendConfig) -> (LspService<LspBackend>, ClientSocket) {
    LspService::build(|client| LspBackend::new(client, config))
        .custom_method(protocol::SET_INPUTS, LspBackend::set_inputs)
        .custom_method(protocol::SET_CATALOG, LspBackend::set_catalog)
        .custom_method(
            protocol::PUBLISH_DIAGNOSTICS,
            LspBackend::publish_expression_diagnostics,
        )
        .custom_method(protocol::THEME, LspBackend::theme)
        .finish()
}

/// Serve one client over stdin and stdout until it disconnects.
pub async fn run_stdio(config: BackendConfig) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service(config);
    tracing::info!("serving over stdio");

    Server::new(stdin, stdout, socket).serve(service).await;
}

/// Accept WebSocket clients on `addr`.
///
/// Every connection gets its own server instance built from `config`.
pub async fn run_websocket(addr: SocketAddr, config: BackendConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "WebSocket server listening");

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        tracing::info!(%peer_addr, "new WebSocket connection");

        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_websocket_connection(stream, config).await {
                tracing::warn!(%peer_addr, error = %e, "WebSocket connection error");
            }
        });
    }
}

/// Bridge one WebSocket client to its own server instance.
///
/// Each text or binary frame holds one JSON-RPC message. Frames are given
/// Content-Length headers on the way in and stripped of them on the way out.
async fn handle_websocket_connection(
    stream: TcpStream,
    config: BackendConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_write, mut ws_read) = ws_stream.split();

    let (input_tx, input_rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);
    let (output_tx, mut output_rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);

    let (service, socket) = build_service(config);
    let server_handle = tokio::spawn(async move {
        Server::new(ChannelReader::new(input_rx), ChannelWriter::new(output_tx), socket)
            .serve(service)
            .await;
    });

    let ws_to_lsp = async {
        while let Some(msg) = ws_read.next().await {
            let payload = match msg {
                Ok(Message::Text(text)) => frame_message(text.as_bytes()),
                Ok(Message::Binary(data)) => frame_message(&data),
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "WebSocket read error");
                    break;
                }
            };
            if input_tx.send(payload).await.is_err() {
                break;
            }
        }
    };

    let lsp_to_ws = async {
        let mut buffer = Vec::new();
        while let Some(data) = output_rx.recv().await {
            buffer.extend_from_slice(&data);
            while let Some(json) = extract_lsp_message(&mut buffer) {
                if ws_write.send(Message::Text(json.into())).await.is_err() {
                    return;
                }
            }
        }
    };

    tokio::select! {
        _ = ws_to_lsp => {}
        _ = lsp_to_ws => {}
    }

    // Closing the input ends the server's read loop.
    drop(input_tx);
    let _ = server_handle.await;
    tracing::debug!("WebSocket connection closed");

    Ok(())
}

const CHANNEL_CAPACITY: usize = 32;
const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Prefix a JSON-RPC payload with its Content-Length header.
fn frame_message(payload: &[u8]) -> Vec<u8> {
    let mut framed = format!("Content-Length: {}\r\n\r\n", payload.len()).into_bytes();
    framed.extend_from_slice(payload);
    framed
}

/// Take one complete message off the front of `buffer` and return its body.
/// Returns `None` until the whole body has arrived.
fn extract_lsp_message(buffer: &mut Vec<u8>) -> Option<String> {
    let header_end = find_header_end(buffer)?;
    let header = std::str::from_utf8(&buffer[..header_end]).ok()?;
    let body_start = header_end + HEADER_SEPARATOR.len();
    let body_end = body_start + parse_content_length(header)?;
    if buffer.len() < body_end {
        return None;
    }

    let body = String::from_utf8_lossy(&buffer[body_start..body_end]).into_owned();
    buffer.drain(..body_end);
    Some(body)
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_SEPARATOR.len())
        .position(|window| window == HEADER_SEPARATOR)
}

fn parse_content_length(header: &str) -> Option<usize> {
    header.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-length")
            .then(|| value.trim().parse().ok())
            .flatten()
    })
}

/// `AsyncRead` over a channel of byte chunks. A closed channel reads as EOF.
struct ChannelReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
}

impl ChannelReader {
    fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            offset: 0,
        }
    }
}

impl AsyncRead for ChannelReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.offset >= self.pending.len() {
            match ready!(self.rx.poll_recv(cx)) {
                Some(chunk) => {
                    self.pending = chunk;
                    self.offset = 0;
                }
                None => return Poll::Ready(Ok(())),
            }
        }

        let this = &mut *self;
        let available = &this.pending[this.offset..];
        let n = available.len().min(buf.remaining());
        buf.put_slice(&available[..n]);
        this.offset += n;
        Poll::Ready(Ok(()))
    }
}

type ReserveFuture =
    Pin<Box<dyn StdFuture<Output = Result<OwnedPermit<Vec<u8>>, SendError<()>>> + Send>>;

/// `AsyncWrite` into a bounded channel. A full channel makes writes pend
/// until a slot frees up.
struct ChannelWriter {
    tx: mpsc::Sender<Vec<u8>>,
    reserve: Option<ReserveFuture>,
}

impl ChannelWriter {
    fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx, reserve: None }
    }

    fn closed() -> io::Error {
        io::Error::new(io::ErrorKind::BrokenPipe, "LSP output channel closed")
    }
}

impl AsyncWrite for ChannelWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let reserve = match self.reserve.take() {
            Some(reserve) => reserve,
            None => match self.tx.clone().try_reserve_owned() {
                Ok(permit) => {
                    permit.send(buf.to_vec());
                    return Poll::Ready(Ok(buf.len()));
                }
                Err(TrySendError::Closed(_)) => return Poll::Ready(Err(Self::closed())),
                Err(TrySendError::Full(_)) => Box::pin(self.tx.clone().reserve_owned()),
            },
        };

        let mut reserve = reserve;
        match reserve.as_mut().poll(cx) {
            Poll::Ready(Ok(permit)) => {
                permit.send(buf.to_vec());
                Poll::Ready(Ok(buf.len()))
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(Self::closed())),
            Poll::Pending => {
                self.reserve = Some(reserve);
                Poll::Pending
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
